//! Command-line host: lists the registered tools, or opens one, applies edits
//! and prints the rendered frame.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use labkit::config::ShellConfig;
use labkit::registry::ToolRegistry;
use labkit::shell::{HostShell, register_configured_tools};
use labkit::state::tracing_listener;
use labkit::telemetry::init_tracing;
use tracing::{debug, warn};

/// Protein science calculators from the terminal.
#[derive(Parser, Debug)]
#[command(name = "labkit", version, about, long_about = None)]
struct Cli {
    /// JSON configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log filter, overriding the configuration and `RUST_LOG`.
    #[arg(long, global = true)]
    log: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List available tools.
    List {
        /// Print the menu as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Open a tool, apply edits and print the result.
    ///
    /// Examples:
    ///   labkit run beer_lambert --set epsilon=1 --set path_length=2 --set concentration=0.5
    ///   labkit run thermodynamics --mode temperature --set delta_g=-10 --set delta_h=-50 --set delta_s=-100
    Run {
        /// Tool id, as printed by `list`.
        tool: String,

        /// Calculation mode.
        #[arg(short, long)]
        mode: Option<String>,

        /// Input as `field=value`; may be repeated.
        #[arg(short, long = "set", value_name = "FIELD=VALUE", value_parser = parse_assignment)]
        set: Vec<(String, String)>,

        /// Print the frame as JSON.
        #[arg(long)]
        json: bool,
    },
}

fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    let (field, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=VALUE, got `{raw}`"))?;
    let field = field.trim();
    if field.is_empty() {
        return Err(format!("missing field name in `{raw}`"));
    }
    Ok((field.to_owned(), value.trim().to_owned()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = ShellConfig::load_or_default(cli.config.as_deref())
        .context("failed to load configuration")?;
    let mut telemetry = config.telemetry.clone();
    if let Some(filter) = &cli.log {
        telemetry = telemetry.with_filter(filter.as_str());
    }
    init_tracing(&telemetry).context("failed to initialise logging")?;

    let registry = ToolRegistry::global();
    register_configured_tools(registry, &config).context("failed to register tools")?;
    debug!(tools = registry.len(), "registry ready");

    let mut shell = HostShell::with_config(registry, &config);
    match cli.command {
        None => print!("{}", shell.render()),
        Some(Command::List { json }) => {
            if json {
                let entries: Vec<_> = shell.menu().collect();
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else {
                for entry in shell.menu() {
                    println!("{}\t{}", entry.id, entry.display_name);
                }
            }
        }
        Some(Command::Run {
            tool,
            mode,
            set,
            json,
        }) => run(&mut shell, &tool, mode.as_deref(), &set, json)?,
    }
    Ok(())
}

fn run(
    shell: &mut HostShell<'_>,
    tool: &str,
    mode: Option<&str>,
    assignments: &[(String, String)],
    json: bool,
) -> Result<()> {
    let instance = shell
        .open(tool)
        .with_context(|| format!("tool `{tool}` is unavailable"))?;
    let controller = instance.presentation().controller();
    controller.subscribe(tracing_listener(
        controller.tool_id().clone(),
        controller.instance_id(),
    ));
    let presentation = instance.presentation_mut();

    if let Some(mode) = mode {
        presentation
            .select_mode(mode)
            .with_context(|| format!("cannot switch `{tool}` to mode `{mode}`"))?;
    }

    let mut rejected = 0_usize;
    for (field, value) in assignments {
        if let Err(err) = presentation.edit(field, value) {
            warn!(field = field.as_str(), error = %err, "input rejected");
            rejected += 1;
        }
    }

    let frame = instance.render();
    if json {
        println!("{}", serde_json::to_string_pretty(&frame)?);
    } else {
        println!("{}", shell.title());
        print!("{frame}");
    }

    if rejected > 0 {
        bail!("{rejected} input(s) rejected");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_assignments() {
        assert_eq!(
            parse_assignment("epsilon = 6220").unwrap(),
            ("epsilon".to_owned(), "6220".to_owned())
        );
        assert!(parse_assignment("epsilon").is_err());
        assert!(parse_assignment("=1").is_err());
    }

    #[test]
    fn cli_parses_run() {
        let cli = Cli::try_parse_from([
            "labkit",
            "run",
            "beer_lambert",
            "--mode",
            "concentration",
            "--set",
            "absorbance=0.5",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Some(Command::Run { ref tool, ref set, .. }) if tool == "beer_lambert" && set.len() == 1
        ));
    }
}
