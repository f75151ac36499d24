use labkit::primitives::ToolId;
use labkit::registry::{RegistryError, ToolRegistry};
use labkit::shell::{HostShell, register_builtin_tools};
use labkit::state::{BeerLambertController, EventRecorder, StateEvent, ToolController};
use labkit::views::BeerLambertView;

fn registry() -> ToolRegistry {
    let registry = ToolRegistry::new();
    register_builtin_tools(&registry).unwrap();
    registry
}

#[test]
fn beer_lambert_three_sets() {
    let mut controller = BeerLambertController::new(ToolId::new("beer_lambert").unwrap());
    let recorder = EventRecorder::new();
    controller.subscribe(recorder.listener());

    controller.set_input("epsilon", 1.0).unwrap();
    controller.set_input("path_length", 2.0).unwrap();
    controller.set_input("concentration", 0.5).unwrap();

    assert_eq!(controller.absorbance(), 1.0);
    assert_eq!(recorder.state_changes(), 3);
    let snapshot = controller.snapshot();
    let inputs: Vec<_> = snapshot.inputs.iter().map(|f| (f.name, f.value)).collect();
    assert_eq!(
        inputs,
        vec![("epsilon", 1.0), ("path_length", 2.0), ("concentration", 0.5)]
    );
}

#[test]
fn beer_lambert_through_registry() {
    let registry = registry();
    let mut instance = registry.create("beer_lambert").unwrap();
    let view = instance.presentation_mut();
    view.edit("epsilon", "1.0").unwrap();
    view.edit("path_length", "2.0").unwrap();
    view.edit("concentration", "0.5").unwrap();
    assert!(view.needs_redraw());

    let frame = instance.render();
    assert_eq!(frame.row("absorbance").unwrap().value, 1.0);
    assert!(!instance.presentation().needs_redraw());
}

#[test]
fn create_missing_fails() {
    let registry = registry();
    let err = registry.create("missing").unwrap_err();
    assert!(matches!(err, RegistryError::UnknownToolId { ref id } if id == "missing"));
    assert_eq!(err.to_string(), "tool `missing` is not registered");
}

#[test]
fn duplicate_registration_retains_first() {
    let registry = registry();
    let err = registry
        .register("beer_lambert", "Other", || {
            BeerLambertView::with_title(
                BeerLambertController::new(ToolId::new("beer_lambert").unwrap()),
                "Other",
            )
        })
        .unwrap_err();
    assert!(matches!(err, RegistryError::DuplicateToolId { .. }));
    assert_eq!(registry.len(), 5);
    assert_eq!(
        registry.create("beer_lambert").unwrap().presentation().title(),
        "Beer-Lambert Calculator"
    );
}

#[test]
fn instances_do_not_share_state() {
    let registry = registry();
    let mut a = registry.create("thermodynamics").unwrap();
    let mut b = registry.create("thermodynamics").unwrap();

    a.presentation_mut().edit("delta_h", "-40").unwrap();
    assert_eq!(a.render().row("delta_h").unwrap().value, -40.0);
    assert_eq!(b.render().row("delta_h").unwrap().value, 0.0);
    assert_ne!(a.instance_id(), b.instance_id());
}

#[test]
fn list_never_builds_tools() {
    let registry = registry();
    let names: Vec<_> = registry.list().map(|e| e.display_name).collect();
    assert_eq!(
        names,
        [
            "Beer-Lambert Calculator",
            "Thermodynamics Tool",
            "Standard Curve",
            "Protein Calculator",
            "Dilution Calculator"
        ]
    );
    assert_eq!(registry.list().count(), registry.list().count());
}

#[test]
fn shell_swap_home_and_title() {
    let registry = registry();
    let mut shell = HostShell::new(&registry);
    assert_eq!(shell.title(), "Protein Science Toolkit");

    shell.open("beer_lambert").unwrap();
    assert_eq!(shell.title(), "Protein Science Toolkit - Beer-Lambert Calculator");
    shell
        .current_mut()
        .unwrap()
        .presentation_mut()
        .edit("epsilon", "3")
        .unwrap();

    shell.open("thermodynamics").unwrap();
    assert_eq!(shell.title(), "Protein Science Toolkit - Thermodynamics Tool");

    assert!(shell.open("missing").is_err());
    assert_eq!(shell.title(), "Protein Science Toolkit - Thermodynamics Tool");

    shell.open("beer_lambert").unwrap();
    let frame = shell.current_mut().unwrap().render();
    assert_eq!(frame.row("epsilon").unwrap().value, 0.0);

    assert!(shell.home());
    assert_eq!(shell.title(), "Protein Science Toolkit");
}

#[test]
fn mode_switch_changes_derived_field() {
    let mut controller = BeerLambertController::new(ToolId::new("beer_lambert").unwrap());
    let recorder = EventRecorder::new();
    controller.subscribe(recorder.listener());

    controller.set_input("epsilon", 5000.0).unwrap();
    controller.set_input("path_length", 1.0).unwrap();
    assert!(controller.set_mode("concentration").unwrap());
    controller.set_input("absorbance", 0.5).unwrap();

    assert!((controller.concentration() - 1.0e-4).abs() < 1e-12);
    assert!(recorder
        .events()
        .contains(&StateEvent::ModeChanged { mode: "concentration" }));
    assert!(controller.set_input("concentration", 1.0).is_err());
}

#[test]
fn invalid_input_is_reported_not_raised() {
    let registry = registry();
    let mut instance = registry.create("thermodynamics").unwrap();
    let view = instance.presentation_mut();
    view.select_mode("gibbs_from_k").unwrap();
    view.edit("equilibrium_constant", "0").unwrap();

    let frame = instance.render();
    assert!(frame.status.is_some());
    assert!(instance.presentation().controller().last_error().is_some());
    let json = serde_json::to_value(&frame).unwrap();
    assert_eq!(json["mode"], "gibbs_from_k");
}
