//! `.xgraph` encoder.

use crate::state::{Action, Operation, State, Transition};
use metro_dom::XmlWriter;

/// Namespace written on the root element when none is configured.
pub const DEFAULT_STATE_NAMESPACE: &str = "dpml:state";

/// Writes state graphs as `.xgraph` documents readable by
/// [`StateDecoder`](crate::StateDecoder).
#[derive(Debug, Clone)]
pub struct StateEncoder {
    namespace: String,
}

impl Default for StateEncoder {
    fn default() -> Self {
        Self::new(DEFAULT_STATE_NAMESPACE)
    }
}

impl StateEncoder {
    /// Creates an encoder writing the given root namespace.
    #[must_use]
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
        }
    }

    /// Encodes a complete document.
    #[must_use]
    pub fn encode(&self, state: &State) -> String {
        let mut writer = XmlWriter::new();
        writer.declaration();
        self.write(&mut writer, state);
        writer.finish()
    }

    /// Writes `state` as the root element of a graph into `writer`.
    ///
    /// Used when a graph is embedded in a larger document.
    pub fn write(&self, writer: &mut XmlWriter, state: &State) {
        writer.open("state").attr("xmlns", &self.namespace);
        Self::write_body(writer, state);
        writer.close();
    }

    fn write_state(writer: &mut XmlWriter, state: &State) {
        writer.open("state").attr("name", state.name());
        Self::write_body(writer, state);
        writer.close();
    }

    fn write_body(writer: &mut XmlWriter, state: &State) {
        if state.is_terminal() {
            writer.attr("terminal", "true");
        }
        for trigger in state.triggers() {
            writer.open("trigger").attr("event", trigger.event().as_str());
            match trigger.action() {
                Action::Transition(transition) => Self::write_transition(writer, transition),
                Action::Operation(operation) => Self::write_operation(writer, operation),
                Action::Apply(id) => {
                    writer.open("apply").attr("id", id);
                    writer.close();
                }
                Action::Exec(id) => {
                    writer.open("exec").attr("id", id);
                    writer.close();
                }
            }
            writer.close();
        }
        for interface in state.interfaces() {
            writer.open("interface").attr("class", interface);
            writer.close();
        }
        for operation in state.operations() {
            Self::write_operation(writer, operation);
        }
        for transition in state.transitions() {
            Self::write_transition(writer, transition);
        }
        for child in state.states() {
            Self::write_state(writer, child);
        }
    }

    fn write_transition(writer: &mut XmlWriter, transition: &Transition) {
        writer
            .open("transition")
            .attr("name", transition.name())
            .attr("target", transition.target());
        if let Some(operation) = transition.operation() {
            Self::write_operation(writer, operation);
        }
        writer.close();
    }

    fn write_operation(writer: &mut XmlWriter, operation: &Operation) {
        writer
            .open("operation")
            .attr("name", operation.name())
            .attr_opt("method", operation.method());
        writer.close();
    }
}
