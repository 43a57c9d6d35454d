//! State graph resolution from class path resources.

use metro_builder::{BuildError, ClassPath, StateResolver};
use metro_state::{State, TriggerEvent};
use std::path::PathBuf;
use std::sync::Arc;

fn fixtures() -> ClassPath {
    ClassPath::new().with_root(PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures"))
}

#[test]
fn missing_graph_is_the_shared_null_state() {
    let loader = fixtures();
    let first = StateResolver.resolve_state_graph("acme.Nothing", &loader).unwrap();
    let second = StateResolver.resolve_state_graph("acme.Nothing", &loader).unwrap();
    assert!(first.is_null());
    assert!(Arc::ptr_eq(&first, &second));
    assert!(Arc::ptr_eq(&first, &State::null()));
}

#[test]
fn widget_graph_is_decoded() {
    let graph = StateResolver.resolve_state_graph("acme.Widget", &fixtures()).unwrap();
    assert!(!graph.is_null());
    let names: Vec<_> = graph.states().iter().map(State::name).collect();
    assert_eq!(names, ["available", "suspended", "disposed"]);
    assert!(graph.trigger(TriggerEvent::Initialization).is_some());

    let available = graph.state("available").unwrap();
    assert_eq!(available.operations()[0].name(), "status");
    assert_eq!(available.transitions()[0].target(), "../suspended");
    assert!(available.trigger(TriggerEvent::Termination).is_some());
    assert!(graph.state("disposed").unwrap().is_terminal());
}

#[test]
fn malformed_graph_names_the_resource() {
    let err = StateResolver.resolve_state_graph("acme.Broken", &fixtures()).unwrap_err();
    let BuildError::StateGraph { resource, .. } = &err else {
        panic!("expected a state graph error, got {err:?}");
    };
    assert!(resource.ends_with("acme/Broken.xgraph"), "{resource}");
}

#[test]
fn in_memory_resources_are_resolved() {
    let loader = ClassPath::new().with_resource(
        "acme/Lamp.xgraph",
        r#"<state xmlns="dpml:state"><state name="on"/><state name="off"/></state>"#,
    );
    let graph = StateResolver.resolve_state_graph("acme.Lamp", &loader).unwrap();
    assert_eq!(graph.states().len(), 2);
}
