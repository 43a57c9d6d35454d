//! Lifecycle state graphs.
//!
//! A component type declares its lifecycle as a tree of named [`State`]s.
//! Each state may declare [`Transition`]s (named edges to a target state),
//! [`Operation`]s (named actions that leave the state unchanged), management
//! interfaces, and [`Trigger`]s that fire on initialization or termination.
//! Transitions and operations declared by a state are visible from all of
//! its descendants; the nearest declaration wins.
//!
//! The graph model is immutable and side-effect free, so one graph can be
//! shared by every instance of a component type. Per-instance progress
//! through the graph is tracked by a [`StateMachine`], which serializes
//! transitions behind a lock.
//!
//! # Resources
//!
//! Graphs are declared in `.xgraph` documents, read with [`StateDecoder`] and
//! written with [`StateEncoder`]:
//!
//! ```xml
//! <state xmlns="dpml:state">
//!   <trigger event="initialization">
//!     <transition name="init" target="started"/>
//!   </trigger>
//!   <state name="started">
//!     <transition name="stop" target="../stopped"/>
//!   </state>
//!   <state name="stopped"/>
//! </state>
//! ```

mod decoder;
mod encoder;
mod error;
mod machine;
mod state;
mod validate;

pub use decoder::StateDecoder;
pub use encoder::{DEFAULT_STATE_NAMESPACE, StateEncoder};
pub use error::{MachineError, StateDecodeError};
pub use machine::{InvocationError, Invoker, StateChange, StateHandle, StateMachine};
pub use state::{Action, Operation, State, Transition, Trigger, TriggerEvent};
pub use validate::ValidationError;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use crate::{
        Action, Invoker, Operation, State, StateDecoder, StateEncoder, StateMachine, Transition,
        Trigger, TriggerEvent,
    };
}
