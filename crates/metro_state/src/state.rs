//! State graph model and navigation.

use serde::{Deserialize, Serialize};
use std::sync::{Arc, LazyLock};

static NULL_STATE: LazyLock<Arc<State>> = LazyLock::new(|| Arc::new(State::root()));

// ─────────────────────────────────────────────────────────────────────────────
// Operation
// ─────────────────────────────────────────────────────────────────────────────

/// A named action that does not change state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Operation {
    name: String,
    method: Option<String>,
}

impl Operation {
    /// Creates an operation whose method name is derived from its name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            method: None,
        }
    }

    /// Sets an explicit method name.
    #[must_use]
    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    /// Returns the operation name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the explicitly declared method name, if any.
    #[must_use]
    pub fn method(&self) -> Option<&str> {
        self.method.as_deref()
    }

    /// Returns the method invoked on the component.
    ///
    /// Defaults to `get` followed by the capitalized operation name, so the
    /// operation `audit` invokes `getAudit`.
    #[must_use]
    pub fn method_name(&self) -> String {
        if let Some(method) = &self.method {
            return method.clone();
        }
        let mut chars = self.name.chars();
        match chars.next() {
            Some(first) => format!("get{}{}", first.to_uppercase(), chars.as_str()),
            None => "get".to_string(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Transition
// ─────────────────────────────────────────────────────────────────────────────

/// A named edge to a target state.
///
/// The target is a path relative to the state declaring the transition:
/// a child name, a composite path such as `a/b`, a parent-relative path
/// such as `../stopped`, an absolute path such as `/started`, or `.` for the
/// declaring state itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Transition {
    name: String,
    target: String,
    operation: Option<Operation>,
}

impl Transition {
    /// Creates a transition to `target`.
    #[must_use]
    pub fn new(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            target: target.into(),
            operation: None,
        }
    }

    /// Attaches an operation invoked before the state changes.
    #[must_use]
    pub fn with_operation(mut self, operation: Operation) -> Self {
        self.operation = Some(operation);
        self
    }

    /// Returns the transition name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the target path.
    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Returns the attached operation.
    #[must_use]
    pub fn operation(&self) -> Option<&Operation> {
        self.operation.as_ref()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Trigger
// ─────────────────────────────────────────────────────────────────────────────

/// Lifecycle event a trigger responds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TriggerEvent {
    /// Fired when the owning component is initialized.
    Initialization,
    /// Fired when the owning component is terminated.
    Termination,
}

impl TriggerEvent {
    /// Parses an event name.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "initialization" => Some(Self::Initialization),
            "termination" => Some(Self::Termination),
            _ => None,
        }
    }

    /// Returns the declared event name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Initialization => "initialization",
            Self::Termination => "termination",
        }
    }
}

impl core::fmt::Display for TriggerEvent {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The action a trigger performs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// An inline transition.
    Transition(Transition),
    /// An inline operation.
    Operation(Operation),
    /// Applies the named transition visible from the trigger's state.
    Apply(String),
    /// Executes the named operation visible from the trigger's state.
    Exec(String),
}

/// Binds an action to a lifecycle event.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Trigger {
    event: TriggerEvent,
    action: Action,
}

impl Trigger {
    /// Creates a trigger.
    #[must_use]
    pub fn new(event: TriggerEvent, action: Action) -> Self {
        Self { event, action }
    }

    /// Returns the event.
    #[must_use]
    pub fn event(&self) -> TriggerEvent {
        self.event
    }

    /// Returns the action.
    #[must_use]
    pub fn action(&self) -> &Action {
        &self.action
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// State
// ─────────────────────────────────────────────────────────────────────────────

/// A node in a lifecycle state graph.
///
/// The root state carries an empty name; every nested state is named.
/// States are addressed by their index path from the root, so the graph
/// holds no parent links and can be shared freely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct State {
    name: String,
    terminal: bool,
    triggers: Vec<Trigger>,
    transitions: Vec<Transition>,
    operations: Vec<Operation>,
    interfaces: Vec<String>,
    states: Vec<State>,
}

impl State {
    /// Returns the shared degenerate graph: a single unnamed state with no
    /// triggers, transitions, operations, or substates.
    ///
    /// Every call returns the same allocation.
    #[must_use]
    pub fn null() -> Arc<State> {
        Arc::clone(&NULL_STATE)
    }

    /// Creates an empty root state.
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// Creates an empty named state.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Marks the state as terminal.
    #[must_use]
    pub fn terminal(mut self, terminal: bool) -> Self {
        self.terminal = terminal;
        self
    }

    /// Adds a trigger.
    #[must_use]
    pub fn with_trigger(mut self, trigger: Trigger) -> Self {
        self.triggers.push(trigger);
        self
    }

    /// Adds a transition.
    #[must_use]
    pub fn with_transition(mut self, transition: Transition) -> Self {
        self.transitions.push(transition);
        self
    }

    /// Adds an operation.
    #[must_use]
    pub fn with_operation(mut self, operation: Operation) -> Self {
        self.operations.push(operation);
        self
    }

    /// Adds a management interface exposed while this state is active.
    #[must_use]
    pub fn with_interface(mut self, classname: impl Into<String>) -> Self {
        self.interfaces.push(classname.into());
        self
    }

    /// Adds a substate.
    #[must_use]
    pub fn with_state(mut self, state: State) -> Self {
        self.states.push(state);
        self
    }

    /// Returns the state name (empty for the root).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns `true` if this state is terminal.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.terminal
    }

    /// Returns `true` if this graph is structurally the null graph.
    #[must_use]
    pub fn is_null(&self) -> bool {
        *self == **NULL_STATE
    }

    /// Returns the declared triggers.
    #[must_use]
    pub fn triggers(&self) -> &[Trigger] {
        &self.triggers
    }

    /// Returns the locally declared transitions.
    #[must_use]
    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// Returns the locally declared operations.
    #[must_use]
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Returns the management interfaces.
    #[must_use]
    pub fn interfaces(&self) -> &[String] {
        &self.interfaces
    }

    /// Returns the substates.
    #[must_use]
    pub fn states(&self) -> &[State] {
        &self.states
    }

    /// Returns the substate with the given name.
    #[must_use]
    pub fn state(&self, name: &str) -> Option<&State> {
        self.states.iter().find(|state| state.name == name)
    }

    /// Returns the locally declared trigger for `event`.
    #[must_use]
    pub fn trigger(&self, event: TriggerEvent) -> Option<&Trigger> {
        self.triggers.iter().find(|trigger| trigger.event == event)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Navigation (self is the graph root)
    // ─────────────────────────────────────────────────────────────────────────

    /// Returns the state at `path`, an index path from this root.
    #[must_use]
    pub fn at(&self, path: &[usize]) -> Option<&State> {
        let mut state = self;
        for &index in path {
            state = state.states.get(index)?;
        }
        Some(state)
    }

    /// Returns the slash-separated path of the state at `path`.
    ///
    /// The root renders as `/`.
    #[must_use]
    pub fn qualified_name(&self, path: &[usize]) -> String {
        let mut out = String::new();
        let mut state = self;
        for &index in path {
            let Some(next) = state.states.get(index) else {
                break;
            };
            out.push('/');
            out.push_str(&next.name);
            state = next;
        }
        if out.is_empty() {
            out.push('/');
        }
        out
    }

    /// Resolves a target path relative to the state at `from`.
    ///
    /// Returns `None` if any segment does not name an existing state or a
    /// `..` segment climbs above the root.
    #[must_use]
    pub fn resolve(&self, from: &[usize], target: &str) -> Option<Vec<usize>> {
        let (mut path, rest) = match target.strip_prefix('/') {
            Some(rest) => (Vec::new(), rest),
            None => (from.to_vec(), target),
        };
        for segment in rest.split('/') {
            match segment {
                "" | "." => {}
                ".." => {
                    path.pop()?;
                }
                name => {
                    let current = self.at(&path)?;
                    let index = current.states.iter().position(|state| state.name == name)?;
                    path.push(index);
                }
            }
        }
        self.at(&path).map(|_| path)
    }

    /// Iterates the state at `path` and its ancestors, nearest first, paired
    /// with their own paths.
    pub fn lineage<'a>(
        &'a self,
        path: &[usize],
    ) -> impl Iterator<Item = (&'a State, Vec<usize>)> + use<'a> {
        let depth = path.len();
        let path = path.to_vec();
        (0..=depth)
            .rev()
            .filter_map(move |len| self.at(&path[..len]).map(|state| (state, path[..len].to_vec())))
    }

    /// Finds the nearest transition named `name` visible from `path`,
    /// returned with the path of the state that declares it.
    #[must_use]
    pub fn find_transition(&self, path: &[usize], name: &str) -> Option<(&Transition, Vec<usize>)> {
        self.lineage(path).find_map(|(state, declared)| {
            state
                .transitions
                .iter()
                .find(|transition| transition.name == name)
                .map(|transition| (transition, declared))
        })
    }

    /// Finds the nearest operation named `name` visible from `path`.
    #[must_use]
    pub fn find_operation(&self, path: &[usize], name: &str) -> Option<&Operation> {
        self.lineage(path).find_map(|(state, _)| {
            state
                .operations
                .iter()
                .find(|operation| operation.name == name)
        })
    }

    /// Finds the nearest trigger for `event` visible from `path`, returned
    /// with the path of the state that declares it.
    #[must_use]
    pub fn find_trigger(&self, path: &[usize], event: TriggerEvent) -> Option<(&Trigger, Vec<usize>)> {
        self.lineage(path)
            .find_map(|(state, declared)| state.trigger(event).map(|trigger| (trigger, declared)))
    }

    /// Returns every transition visible from `path`, nearest first, with
    /// shadowed names removed.
    #[must_use]
    pub fn visible_transitions(&self, path: &[usize]) -> Vec<&Transition> {
        let mut visible: Vec<&Transition> = Vec::new();
        for (state, _) in self.lineage(path) {
            for transition in &state.transitions {
                if !visible.iter().any(|seen| seen.name == transition.name) {
                    visible.push(transition);
                }
            }
        }
        visible
    }

    /// Returns every operation visible from `path`, nearest first, with
    /// shadowed names removed.
    #[must_use]
    pub fn visible_operations(&self, path: &[usize]) -> Vec<&Operation> {
        let mut visible: Vec<&Operation> = Vec::new();
        for (state, _) in self.lineage(path) {
            for operation in &state.operations {
                if !visible.iter().any(|seen| seen.name == operation.name) {
                    visible.push(operation);
                }
            }
        }
        visible
    }
}

impl core::fmt::Display for State {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        if self.name.is_empty() {
            f.write_str("/")
        } else {
            f.write_str(&self.name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph() -> State {
        State::root()
            .with_transition(Transition::new("reset", "/idle"))
            .with_state(
                State::new("idle").with_transition(Transition::new("go", "../running/fast")),
            )
            .with_state(
                State::new("running")
                    .with_operation(Operation::new("audit"))
                    .with_state(State::new("slow"))
                    .with_state(
                        State::new("fast").with_transition(Transition::new("reset", "../slow")),
                    ),
            )
    }

    #[test]
    fn null_state_is_shared() {
        assert!(Arc::ptr_eq(&State::null(), &State::null()));
        assert!(State::null().is_null());
        assert_eq!(State::null().name(), "");
    }

    #[test]
    fn resolve_relative_and_absolute_paths() {
        let graph = graph();
        assert_eq!(graph.resolve(&[], "idle"), Some(vec![0]));
        assert_eq!(graph.resolve(&[0], "../running/fast"), Some(vec![1, 1]));
        assert_eq!(graph.resolve(&[1, 1], "/idle"), Some(vec![0]));
        assert_eq!(graph.resolve(&[1], "."), Some(vec![1]));
        assert_eq!(graph.resolve(&[1, 0], ".."), Some(vec![1]));
    }

    #[test]
    fn resolve_rejects_unknown_and_escaping_paths() {
        let graph = graph();
        assert_eq!(graph.resolve(&[], "missing"), None);
        assert_eq!(graph.resolve(&[], ".."), None);
        assert_eq!(graph.resolve(&[0], "../running/medium"), None);
    }

    #[test]
    fn nearest_transition_wins() {
        let graph = graph();
        let (transition, declared) = graph.find_transition(&[1, 1], "reset").unwrap();
        assert_eq!(transition.target(), "../slow");
        assert_eq!(declared, vec![1, 1]);

        let (transition, declared) = graph.find_transition(&[1, 0], "reset").unwrap();
        assert_eq!(transition.target(), "/idle");
        assert!(declared.is_empty());
    }

    #[test]
    fn visible_transitions_are_deduplicated() {
        let graph = graph();
        let names: Vec<_> = graph
            .visible_transitions(&[1, 1])
            .iter()
            .map(|transition| transition.name())
            .collect();
        assert_eq!(names, vec!["reset"]);
    }

    #[test]
    fn operations_are_inherited() {
        let graph = graph();
        assert!(graph.find_operation(&[1, 0], "audit").is_some());
        assert!(graph.find_operation(&[0], "audit").is_none());
    }

    #[test]
    fn qualified_names() {
        let graph = graph();
        assert_eq!(graph.qualified_name(&[]), "/");
        assert_eq!(graph.qualified_name(&[1, 1]), "/running/fast");
    }

    #[test]
    fn operation_method_name_defaults() {
        assert_eq!(Operation::new("audit").method_name(), "getAudit");
        assert_eq!(
            Operation::new("audit").with_method("audit").method_name(),
            "audit"
        );
    }
}
