//! Structural validation of state graphs.

use crate::state::{Action, State};

/// Errors detected when validating a state graph.
///
/// Validation collects every problem rather than stopping at the first, so
/// a malformed `.xgraph` document can be fixed in one pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A nested state has no name.
    UnnamedState {
        /// Qualified name of the parent state.
        parent: String,
    },
    /// Two sibling states share a name.
    DuplicateState {
        /// Qualified name of the parent state.
        parent: String,
        /// The repeated name.
        name: String,
    },
    /// A state declares two transitions with the same name.
    DuplicateTransition {
        /// Qualified name of the declaring state.
        state: String,
        /// The repeated name.
        name: String,
    },
    /// A state declares two operations with the same name.
    DuplicateOperation {
        /// Qualified name of the declaring state.
        state: String,
        /// The repeated name.
        name: String,
    },
    /// A transition target does not resolve to a state.
    UnresolvedTarget {
        /// Qualified name of the declaring state.
        state: String,
        /// The transition name.
        transition: String,
        /// The declared target.
        target: String,
    },
    /// An `apply` trigger names a transition that is not visible.
    UnknownApply {
        /// Qualified name of the declaring state.
        state: String,
        /// The referenced transition name.
        id: String,
    },
    /// An `exec` trigger names an operation that is not visible.
    UnknownExec {
        /// Qualified name of the declaring state.
        state: String,
        /// The referenced operation name.
        id: String,
    },
}

impl core::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ValidationError::UnnamedState { parent } => {
                write!(f, "state nested in '{parent}' has no name")
            }
            ValidationError::DuplicateState { parent, name } => {
                write!(f, "state '{parent}' declares substate '{name}' more than once")
            }
            ValidationError::DuplicateTransition { state, name } => {
                write!(f, "state '{state}' declares transition '{name}' more than once")
            }
            ValidationError::DuplicateOperation { state, name } => {
                write!(f, "state '{state}' declares operation '{name}' more than once")
            }
            ValidationError::UnresolvedTarget {
                state,
                transition,
                target,
            } => {
                write!(
                    f,
                    "transition '{transition}' in state '{state}' has unresolvable target: {target}"
                )
            }
            ValidationError::UnknownApply { state, id } => {
                write!(f, "trigger in state '{state}' applies unknown transition: {id}")
            }
            ValidationError::UnknownExec { state, id } => {
                write!(f, "trigger in state '{state}' executes unknown operation: {id}")
            }
        }
    }
}

impl core::error::Error for ValidationError {}

impl State {
    /// Validates the graph rooted at this state.
    ///
    /// # Errors
    ///
    /// Returns every [`ValidationError`] found.
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        self.validate_state(&mut Vec::new(), &mut errors);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_state(&self, path: &mut Vec<usize>, errors: &mut Vec<ValidationError>) {
        let Some(state) = self.at(path) else {
            return;
        };
        let qualified = self.qualified_name(path);

        for (index, transition) in state.transitions().iter().enumerate() {
            if state.transitions()[..index]
                .iter()
                .any(|earlier| earlier.name() == transition.name())
            {
                errors.push(ValidationError::DuplicateTransition {
                    state: qualified.clone(),
                    name: transition.name().to_string(),
                });
            }
            if self.resolve(path, transition.target()).is_none() {
                errors.push(ValidationError::UnresolvedTarget {
                    state: qualified.clone(),
                    transition: transition.name().to_string(),
                    target: transition.target().to_string(),
                });
            }
        }

        for (index, operation) in state.operations().iter().enumerate() {
            if state.operations()[..index]
                .iter()
                .any(|earlier| earlier.name() == operation.name())
            {
                errors.push(ValidationError::DuplicateOperation {
                    state: qualified.clone(),
                    name: operation.name().to_string(),
                });
            }
        }

        for trigger in state.triggers() {
            match trigger.action() {
                Action::Transition(transition) => {
                    if self.resolve(path, transition.target()).is_none() {
                        errors.push(ValidationError::UnresolvedTarget {
                            state: qualified.clone(),
                            transition: transition.name().to_string(),
                            target: transition.target().to_string(),
                        });
                    }
                }
                Action::Apply(id) => {
                    if self.find_transition(path, id).is_none() {
                        errors.push(ValidationError::UnknownApply {
                            state: qualified.clone(),
                            id: id.clone(),
                        });
                    }
                }
                Action::Exec(id) => {
                    if self.find_operation(path, id).is_none() {
                        errors.push(ValidationError::UnknownExec {
                            state: qualified.clone(),
                            id: id.clone(),
                        });
                    }
                }
                Action::Operation(_) => {}
            }
        }

        for (index, child) in state.states().iter().enumerate() {
            if child.name().is_empty() {
                errors.push(ValidationError::UnnamedState {
                    parent: qualified.clone(),
                });
            } else if state.states()[..index]
                .iter()
                .any(|earlier| earlier.name() == child.name())
            {
                errors.push(ValidationError::DuplicateState {
                    parent: qualified.clone(),
                    name: child.name().to_string(),
                });
            }
            path.push(index);
            self.validate_state(path, errors);
            path.pop();
        }
    }
}
