//! `.xgraph` encoding tests.

use metro_state::{State, StateDecoder, StateEncoder};
use std::path::PathBuf;

fn fixture() -> State {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/lifecycle.xgraph");
    StateDecoder::load(path).unwrap()
}

#[test]
fn decoded_fixture_has_expected_shape() {
    let graph = fixture();
    assert_eq!(graph.name(), "");
    assert_eq!(graph.states().len(), 3);
    assert_eq!(graph.state("started").unwrap().interfaces(), ["acme.WidgetManager"]);
    assert!(graph.state("terminated").unwrap().is_terminal());
}

#[test]
fn encoded_graph_decodes_to_equal_graph() {
    let graph = fixture();
    let xml = StateEncoder::default().encode(&graph);
    assert_eq!(StateDecoder::parse_str(&xml).unwrap(), graph);
}

#[test]
fn null_graph_encodes_to_empty_root() {
    let xml = StateEncoder::default().encode(&State::null());
    let decoded = StateDecoder::parse_str(&xml).unwrap();
    assert!(decoded.is_null());
}

#[test]
fn encoder_writes_configured_namespace() {
    let xml = StateEncoder::new("urn:test:state").encode(&State::root());
    assert!(xml.contains("xmlns=\"urn:test:state\""));
}
