//! Per-instance state machine.

use crate::error::MachineError;
use crate::state::{Action, Operation, State, Transition, TriggerEvent};
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;

/// Error returned by a component when an invoked method fails.
pub type InvocationError = Box<dyn core::error::Error + Send + Sync + 'static>;

/// Invokes lifecycle methods on a component instance.
///
/// Implemented for any `FnMut(&str) -> Result<(), InvocationError>`, so a
/// closure dispatching on the method name is usually enough.
///
/// The invoker runs while the machine holds its transition lock and must
/// not call back into the same machine.
pub trait Invoker {
    /// Invokes the named method.
    ///
    /// # Errors
    ///
    /// Returns the component's error if the method fails.
    fn invoke(&mut self, method: &str) -> Result<(), InvocationError>;
}

impl<F> Invoker for F
where
    F: FnMut(&str) -> Result<(), InvocationError>,
{
    fn invoke(&mut self, method: &str) -> Result<(), InvocationError> {
        self(method)
    }
}

/// Notification sent to listeners after the active state changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateChange {
    /// Qualified name of the previous state.
    pub from: String,
    /// Qualified name of the new state.
    pub to: String,
    /// Name of the transition that caused the change.
    pub transition: String,
}

type Listener = Arc<dyn Fn(&StateChange) + Send + Sync>;

/// A reference to one state within a shared graph.
#[derive(Debug, Clone)]
pub struct StateHandle {
    graph: Arc<State>,
    path: Vec<usize>,
}

impl StateHandle {
    /// Returns the referenced state.
    #[must_use]
    pub fn state(&self) -> &State {
        self.graph.at(&self.path).unwrap_or(&self.graph)
    }

    /// Returns the index path from the root.
    #[must_use]
    pub fn path(&self) -> &[usize] {
        &self.path
    }

    /// Returns the state name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.state().name()
    }

    /// Returns the slash-separated path of the state.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        self.graph.qualified_name(&self.path)
    }
}

impl PartialEq for StateHandle {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.graph, &other.graph) && self.path == other.path
    }
}

impl Eq for StateHandle {}

#[derive(Debug, Default)]
struct Inner {
    current: Vec<usize>,
    active: bool,
    disposed: bool,
}

/// Tracks one component instance's progress through a state graph.
///
/// The graph is shared; only the current position is per instance. All
/// state-changing calls are serialized by an internal lock, and listeners
/// are notified after the lock is released.
///
/// # Example
///
/// ```
/// use metro_state::{InvocationError, State, StateMachine, Transition, Trigger, TriggerEvent, Action};
/// use std::sync::Arc;
///
/// let graph = Arc::new(
///     State::root()
///         .with_trigger(Trigger::new(
///             TriggerEvent::Initialization,
///             Action::Transition(Transition::new("init", "started")),
///         ))
///         .with_state(State::new("started")),
/// );
/// let machine = StateMachine::new(graph);
/// let mut component = |_: &str| -> Result<(), InvocationError> { Ok(()) };
/// let state = machine.initialize(&mut component).unwrap();
/// assert_eq!(state.name(), "started");
/// ```
pub struct StateMachine {
    graph: Arc<State>,
    inner: Mutex<Inner>,
    listeners: RwLock<Vec<Listener>>,
}

impl core::fmt::Debug for StateMachine {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("StateMachine")
            .field("graph", &self.graph)
            .field("inner", &*self.inner.lock())
            .field("listeners", &self.listeners.read().len())
            .finish()
    }
}

enum Resolved {
    Transition(Transition, Vec<usize>),
    Operation(Operation),
}

impl StateMachine {
    /// Creates a machine positioned at the root of `graph`.
    #[must_use]
    pub fn new(graph: Arc<State>) -> Self {
        Self {
            graph,
            inner: Mutex::new(Inner::default()),
            listeners: RwLock::new(Vec::new()),
        }
    }

    /// Returns the shared graph.
    #[must_use]
    pub fn graph(&self) -> &Arc<State> {
        &self.graph
    }

    /// Returns the current state.
    ///
    /// # Errors
    ///
    /// Returns [`MachineError::Disposed`] after [`StateMachine::dispose`].
    pub fn current(&self) -> Result<StateHandle, MachineError> {
        let inner = self.inner.lock();
        Self::check(&inner)?;
        Ok(self.handle(&inner.current))
    }

    /// Returns `true` between initialization and termination.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.inner.lock().active
    }

    /// Registers a listener for state changes.
    ///
    /// # Errors
    ///
    /// Returns [`MachineError::Disposed`] after [`StateMachine::dispose`].
    pub fn add_listener(
        &self,
        listener: impl Fn(&StateChange) + Send + Sync + 'static,
    ) -> Result<(), MachineError> {
        Self::check(&self.inner.lock())?;
        self.listeners.write().push(Arc::new(listener));
        Ok(())
    }

    /// Returns the initialization action visible from the current state.
    ///
    /// `apply` and `exec` references are resolved to the transition or
    /// operation they name.
    ///
    /// # Errors
    ///
    /// Returns an error if the machine is disposed or a reference does not
    /// resolve.
    pub fn initialization_action(&self) -> Result<Option<Action>, MachineError> {
        self.lifecycle_action(TriggerEvent::Initialization)
    }

    /// Returns the termination action visible from the current state.
    ///
    /// # Errors
    ///
    /// See [`StateMachine::initialization_action`].
    pub fn termination_action(&self) -> Result<Option<Action>, MachineError> {
        self.lifecycle_action(TriggerEvent::Termination)
    }

    fn lifecycle_action(&self, event: TriggerEvent) -> Result<Option<Action>, MachineError> {
        let inner = self.inner.lock();
        Self::check(&inner)?;
        Ok(self
            .resolve_trigger(&inner.current, event)?
            .map(|resolved| match resolved {
                Resolved::Transition(transition, _) => Action::Transition(transition),
                Resolved::Operation(operation) => Action::Operation(operation),
            }))
    }

    /// Runs initialization actions until the state stops changing.
    ///
    /// Each step resolves the initialization trigger visible from the
    /// current state. A transition moves the machine and the loop repeats;
    /// an operation is invoked and ends the loop. An action seen twice ends
    /// the loop, so cyclic triggers terminate.
    ///
    /// # Errors
    ///
    /// Returns an error if the machine is disposed, an action does not
    /// resolve, or the component rejects an invocation.
    pub fn initialize(&self, target: &mut dyn Invoker) -> Result<StateHandle, MachineError> {
        self.run_lifecycle(TriggerEvent::Initialization, target)
    }

    /// Runs termination actions until the state stops changing, then marks
    /// the machine inactive.
    ///
    /// # Errors
    ///
    /// See [`StateMachine::initialize`].
    pub fn terminate(&self, target: &mut dyn Invoker) -> Result<StateHandle, MachineError> {
        self.run_lifecycle(TriggerEvent::Termination, target)
    }

    fn run_lifecycle(
        &self,
        event: TriggerEvent,
        target: &mut dyn Invoker,
    ) -> Result<StateHandle, MachineError> {
        let mut changes = Vec::new();
        let result = {
            let mut inner = self.inner.lock();
            Self::check(&inner)?;
            tracing::debug!(
                event = %event,
                state = %self.graph.qualified_name(&inner.current),
                "running lifecycle triggers"
            );
            let outcome = self.run_triggers(&mut inner, event, target, &mut changes);
            if outcome.is_ok() {
                inner.active = event == TriggerEvent::Initialization;
            }
            outcome.map(|()| self.handle(&inner.current))
        };
        self.notify(&changes);
        result
    }

    fn run_triggers(
        &self,
        inner: &mut Inner,
        event: TriggerEvent,
        target: &mut dyn Invoker,
        changes: &mut Vec<StateChange>,
    ) -> Result<(), MachineError> {
        let mut visited: Vec<(Vec<usize>, String)> = Vec::new();
        while let Some(resolved) = self.resolve_trigger(&inner.current, event)? {
            match resolved {
                Resolved::Transition(transition, declared) => {
                    let key = (declared.clone(), transition.name().to_string());
                    if visited.contains(&key) {
                        break;
                    }
                    visited.push(key);
                    let before = inner.current.clone();
                    self.perform(inner, &transition, &declared, target, changes)?;
                    if inner.current == before {
                        break;
                    }
                }
                Resolved::Operation(operation) => {
                    Self::invoke(&operation, target)?;
                    break;
                }
            }
        }
        Ok(())
    }

    /// Applies the named transition visible from the current state.
    ///
    /// # Errors
    ///
    /// Returns [`MachineError::UnknownTransition`] if no such transition is
    /// visible, [`MachineError::InvalidTarget`] if its target does not
    /// resolve, or an invocation error from the transition's operation.
    pub fn apply(&self, name: &str, target: &mut dyn Invoker) -> Result<StateHandle, MachineError> {
        let mut changes = Vec::new();
        let result = {
            let mut inner = self.inner.lock();
            Self::check(&inner)?;
            let Some((transition, declared)) = self.graph.find_transition(&inner.current, name)
            else {
                return Err(MachineError::UnknownTransition {
                    name: name.to_string(),
                    state: self.graph.qualified_name(&inner.current),
                });
            };
            let transition = transition.clone();
            self.perform(&mut inner, &transition, &declared, target, &mut changes)
                .map(|()| self.handle(&inner.current))
        };
        self.notify(&changes);
        result
    }

    /// Executes the named operation visible from the current state.
    ///
    /// # Errors
    ///
    /// Returns [`MachineError::UnknownOperation`] if no such operation is
    /// visible, or the component's invocation error.
    pub fn execute(&self, name: &str, target: &mut dyn Invoker) -> Result<(), MachineError> {
        let inner = self.inner.lock();
        Self::check(&inner)?;
        let Some(operation) = self.graph.find_operation(&inner.current, name) else {
            return Err(MachineError::UnknownOperation {
                name: name.to_string(),
                state: self.graph.qualified_name(&inner.current),
            });
        };
        Self::invoke(operation, target)
    }

    /// Returns the transitions visible from the current state, nearest first.
    ///
    /// # Errors
    ///
    /// Returns [`MachineError::Disposed`] after [`StateMachine::dispose`].
    pub fn transitions(&self) -> Result<Vec<Transition>, MachineError> {
        let inner = self.inner.lock();
        Self::check(&inner)?;
        Ok(self
            .graph
            .visible_transitions(&inner.current)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Returns the operations visible from the current state, nearest first.
    ///
    /// # Errors
    ///
    /// Returns [`MachineError::Disposed`] after [`StateMachine::dispose`].
    pub fn operations(&self) -> Result<Vec<Operation>, MachineError> {
        let inner = self.inner.lock();
        Self::check(&inner)?;
        Ok(self
            .graph
            .visible_operations(&inner.current)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Disposes the machine. Every later call fails with
    /// [`MachineError::Disposed`].
    pub fn dispose(&self) {
        let mut inner = self.inner.lock();
        inner.disposed = true;
        inner.active = false;
        self.listeners.write().clear();
        tracing::debug!("state machine disposed");
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internals
    // ─────────────────────────────────────────────────────────────────────────

    fn check(inner: &Inner) -> Result<(), MachineError> {
        if inner.disposed {
            Err(MachineError::Disposed)
        } else {
            Ok(())
        }
    }

    fn handle(&self, path: &[usize]) -> StateHandle {
        StateHandle {
            graph: Arc::clone(&self.graph),
            path: path.to_vec(),
        }
    }

    fn resolve_trigger(
        &self,
        current: &[usize],
        event: TriggerEvent,
    ) -> Result<Option<Resolved>, MachineError> {
        let Some((trigger, declared)) = self.graph.find_trigger(current, event) else {
            return Ok(None);
        };
        let resolved = match trigger.action() {
            Action::Transition(transition) => Resolved::Transition(transition.clone(), declared),
            Action::Operation(operation) => Resolved::Operation(operation.clone()),
            Action::Apply(id) => match self.graph.find_transition(&declared, id) {
                Some((transition, owner)) => Resolved::Transition(transition.clone(), owner),
                None => {
                    return Err(MachineError::UnknownTransition {
                        name: id.clone(),
                        state: self.graph.qualified_name(&declared),
                    });
                }
            },
            Action::Exec(id) => match self.graph.find_operation(&declared, id) {
                Some(operation) => Resolved::Operation(operation.clone()),
                None => {
                    return Err(MachineError::UnknownOperation {
                        name: id.clone(),
                        state: self.graph.qualified_name(&declared),
                    });
                }
            },
        };
        Ok(Some(resolved))
    }

    fn perform(
        &self,
        inner: &mut Inner,
        transition: &Transition,
        declared: &[usize],
        target: &mut dyn Invoker,
        changes: &mut Vec<StateChange>,
    ) -> Result<(), MachineError> {
        let Some(destination) = self.graph.resolve(declared, transition.target()) else {
            return Err(MachineError::InvalidTarget {
                transition: transition.name().to_string(),
                target: transition.target().to_string(),
                state: self.graph.qualified_name(declared),
            });
        };
        if let Some(operation) = transition.operation() {
            Self::invoke(operation, target)?;
        }
        if destination == inner.current {
            tracing::trace!(transition = transition.name(), "transition stays in the current state");
            return Ok(());
        }
        let change = StateChange {
            from: self.graph.qualified_name(&inner.current),
            to: self.graph.qualified_name(&destination),
            transition: transition.name().to_string(),
        };
        tracing::debug!(
            transition = %change.transition,
            from = %change.from,
            to = %change.to,
            "transition applied"
        );
        inner.current = destination;
        changes.push(change);
        Ok(())
    }

    fn invoke(operation: &Operation, target: &mut dyn Invoker) -> Result<(), MachineError> {
        let method = operation.method_name();
        tracing::debug!(operation = operation.name(), method = %method, "invoking operation");
        target
            .invoke(&method)
            .map_err(|source| MachineError::Invocation { method, source })
    }

    fn notify(&self, changes: &[StateChange]) {
        if changes.is_empty() {
            return;
        }
        // Listeners may call back into the machine.
        let listeners = self.listeners.read().clone();
        for change in changes {
            for listener in listeners.iter() {
                listener(change);
            }
        }
    }
}
