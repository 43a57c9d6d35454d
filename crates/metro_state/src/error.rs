//! Error types for state graph decoding and state machines.

use crate::machine::InvocationError;
use crate::validate::ValidationError;
use metro_dom::{DecodingError, DomError};

/// Errors raised while reading a `.xgraph` declaration.
#[derive(Debug, thiserror::Error)]
pub enum StateDecodeError {
    /// The document is not well-formed XML.
    #[error(transparent)]
    Dom(#[from] DomError),
    /// An element does not have the expected shape.
    #[error(transparent)]
    Decoding(#[from] DecodingError),
    /// The graph is well-formed but structurally invalid.
    #[error("state graph is invalid: {}", render(.0))]
    Invalid(Vec<ValidationError>),
}

fn render(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Errors raised by a [`StateMachine`](crate::StateMachine).
#[derive(Debug, thiserror::Error)]
pub enum MachineError {
    /// The machine was disposed.
    #[error("Instance has been disposed.")]
    Disposed,
    /// No transition with the requested name is visible from the current state.
    #[error("Unable to resolve a transition named [{name}] relative to the state [{state}].")]
    UnknownTransition {
        /// Requested transition name.
        name: String,
        /// Qualified name of the current state.
        state: String,
    },
    /// No operation with the requested name is visible from the current state.
    #[error("Unable to resolve an operation named [{name}] relative to the state [{state}].")]
    UnknownOperation {
        /// Requested operation name.
        name: String,
        /// Qualified name of the current state.
        state: String,
    },
    /// A transition target does not resolve to a state.
    #[error(
        "Transition [{transition}] declares the target [{target}] which does not resolve relative to the state [{state}]."
    )]
    InvalidTarget {
        /// Transition name.
        transition: String,
        /// Declared target path.
        target: String,
        /// Qualified name of the declaring state.
        state: String,
    },
    /// The component rejected a method invocation.
    #[error("Invocation of the method [{method}] failed.")]
    Invocation {
        /// Invoked method name.
        method: String,
        /// Error returned by the component.
        #[source]
        source: InvocationError,
    },
}
