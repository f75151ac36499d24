//! Tools shipped with labkit.

use labkit_config::ShellConfig;
use labkit_primitives::ToolId;
use labkit_registry::{RegistryResult, ToolRegistration, ToolRegistry};
use labkit_state::{BeerLambertController, PlaceholderController, ThermodynamicsController};
use labkit_views::{BeerLambertView, PlaceholderView, ThermodynamicsView};
use tracing::debug;

/// Id of the Beer-Lambert calculator.
pub const BEER_LAMBERT: &str = "beer_lambert";
/// Id of the thermodynamics calculator.
pub const THERMODYNAMICS: &str = "thermodynamics";

const PLACEHOLDERS: [(&str, &str, &str); 3] = [
    (
        "standard_curve",
        "Standard Curve",
        "Fit and interpolate standard curves",
    ),
    (
        "protein_calc",
        "Protein Calculator",
        "Calculate protein properties (MW, pI, extinction coeff.)",
    ),
    (
        "dilution_calc",
        "Dilution Calculator",
        "Calculate dilution ratios and final concentrations",
    ),
];

/// Registers every built-in tool with default settings.
///
/// # Errors
///
/// Returns [`RegistryError::DuplicateToolId`](labkit_registry::RegistryError::DuplicateToolId)
/// if any built-in id is already taken.
pub fn register_builtin_tools(registry: &ToolRegistry) -> RegistryResult<()> {
    register_configured_tools(registry, &ShellConfig::default())
}

/// Registers the built-in tools honouring `config`: the thermodynamics plots
/// use its temperature range and placeholders are skipped unless enabled.
///
/// # Errors
///
/// See [`register_builtin_tools`].
pub fn register_configured_tools(registry: &ToolRegistry, config: &ShellConfig) -> RegistryResult<()> {
    let id = ToolId::new(BEER_LAMBERT)?;
    registry.register_tool(
        ToolRegistration::new(BEER_LAMBERT, "Beer-Lambert Calculator", move || {
            BeerLambertView::new(BeerLambertController::new(id.clone()))
        })
        .with_description("Calculate absorbance using the Beer-Lambert law (A = ε·l·c)"),
    )?;

    let id = ToolId::new(THERMODYNAMICS)?;
    let range: (f64, f64) = config.temperature_range.into();
    registry.register_tool(
        ToolRegistration::new(THERMODYNAMICS, "Thermodynamics Tool", move || {
            ThermodynamicsView::new(ThermodynamicsController::with_temperature_range(
                id.clone(),
                range,
            ))
        })
        .with_description("Calculate ΔG, ΔH, ΔS, T, and K for chemical reactions"),
    )?;

    if config.show_placeholders {
        for (raw, name, description) in PLACEHOLDERS {
            let id = ToolId::new(raw)?;
            registry.register_tool(
                ToolRegistration::new(raw, name, move || {
                    PlaceholderView::new(PlaceholderController::new(id.clone()), name)
                })
                .with_description(description),
            )?;
        }
    }

    debug!(tools = registry.len(), "built-in tools registered");
    Ok(())
}
