//! State machine lifecycle tests.
//!
//! Drives a component through the `lifecycle.xgraph` fixture: initialization
//! into `started`, explicit stop and restart, operation execution, and
//! termination into the terminal state.

use metro_state::{
    Action, InvocationError, MachineError, State, StateDecoder, StateMachine, Transition, Trigger,
    TriggerEvent,
};
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;

fn fixture() -> Arc<State> {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/lifecycle.xgraph");
    Arc::new(StateDecoder::load(path).unwrap())
}

/// Records every method the machine invokes.
#[derive(Default)]
struct Recorder {
    calls: Vec<String>,
}

impl metro_state::Invoker for Recorder {
    fn invoke(&mut self, method: &str) -> Result<(), InvocationError> {
        self.calls.push(method.to_string());
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Lifecycle
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn initialize_moves_to_started() {
    let machine = StateMachine::new(fixture());
    let mut component = Recorder::default();

    let state = machine.initialize(&mut component).unwrap();

    assert_eq!(state.name(), "started");
    assert_eq!(state.qualified_name(), "/started");
    assert!(machine.is_active());
    assert_eq!(component.calls, vec!["start"]);
}

#[test]
fn started_state_exposes_stop_and_audit() {
    let machine = StateMachine::new(fixture());
    machine.initialize(&mut Recorder::default()).unwrap();

    let transitions = machine.transitions().unwrap();
    assert_eq!(transitions.len(), 1);
    assert_eq!(transitions[0].name(), "stop");

    let operations = machine.operations().unwrap();
    assert_eq!(operations.len(), 1);
    assert_eq!(operations[0].name(), "audit");

    let action = machine.termination_action().unwrap();
    assert!(matches!(action, Some(Action::Transition(t)) if t.name() == "stop"));
}

#[test]
fn stop_and_restart() {
    let machine = StateMachine::new(fixture());
    let mut component = Recorder::default();
    machine.initialize(&mut component).unwrap();

    assert_eq!(machine.apply("stop", &mut component).unwrap().name(), "stopped");
    assert_eq!(machine.apply("start", &mut component).unwrap().name(), "started");
    assert_eq!(component.calls, vec!["start", "stop", "start"]);
}

#[test]
fn terminate_reaches_terminal_state() {
    let machine = StateMachine::new(fixture());
    let mut component = Recorder::default();
    machine.initialize(&mut component).unwrap();

    let state = machine.terminate(&mut component).unwrap();

    assert_eq!(state.name(), "terminated");
    assert!(state.state().is_terminal());
    assert!(!machine.is_active());
}

#[test]
fn execute_invokes_derived_method() {
    let machine = StateMachine::new(fixture());
    let mut component = Recorder::default();
    machine.initialize(&mut component).unwrap();

    machine.execute("audit", &mut component).unwrap();
    assert_eq!(component.calls.last().map(String::as_str), Some("getAudit"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Rejections
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn apply_unknown_transition_fails() {
    let machine = StateMachine::new(fixture());
    machine.initialize(&mut Recorder::default()).unwrap();

    let result = machine.apply("start", &mut Recorder::default());
    assert!(matches!(
        result,
        Err(MachineError::UnknownTransition { ref name, ref state }) if name == "start" && state == "/started"
    ));
}

#[test]
fn execute_unknown_operation_fails() {
    let machine = StateMachine::new(fixture());
    let result = machine.execute("audit", &mut Recorder::default());
    assert!(matches!(result, Err(MachineError::UnknownOperation { .. })));
}

#[test]
fn failed_invocation_leaves_state_unchanged() {
    let machine = StateMachine::new(fixture());
    machine.initialize(&mut Recorder::default()).unwrap();

    let mut failing = |_: &str| -> Result<(), InvocationError> { Err("refused".into()) };
    let result = machine.apply("stop", &mut failing);

    assert!(matches!(result, Err(MachineError::Invocation { ref method, .. }) if method == "stop"));
    assert_eq!(machine.current().unwrap().name(), "started");
}

#[test]
fn disposed_machine_rejects_calls() {
    let machine = StateMachine::new(fixture());
    machine.dispose();

    assert!(matches!(machine.current(), Err(MachineError::Disposed)));
    assert!(matches!(
        machine.initialize(&mut Recorder::default()),
        Err(MachineError::Disposed)
    ));
    assert!(matches!(machine.transitions(), Err(MachineError::Disposed)));
    assert_eq!(MachineError::Disposed.to_string(), "Instance has been disposed.");
}

// ─────────────────────────────────────────────────────────────────────────────
// Listeners and cycles
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn listeners_observe_changes() {
    let machine = StateMachine::new(fixture());
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    machine
        .add_listener(move |change| sink.lock().push((change.from.clone(), change.to.clone())))
        .unwrap();

    let mut component = Recorder::default();
    machine.initialize(&mut component).unwrap();
    machine.terminate(&mut component).unwrap();

    let seen = seen.lock();
    assert_eq!(
        *seen,
        vec![
            ("/".to_string(), "/started".to_string()),
            ("/started".to_string(), "/stopped".to_string()),
            ("/stopped".to_string(), "/terminated".to_string()),
        ]
    );
}

#[test]
fn cyclic_initialization_terminates() {
    let graph = State::root()
        .with_trigger(Trigger::new(
            TriggerEvent::Initialization,
            Action::Apply("flip".to_string()),
        ))
        .with_transition(Transition::new("flip", "/b"))
        .with_state(State::new("a"))
        .with_state(
            State::new("b")
                .with_trigger(Trigger::new(
                    TriggerEvent::Initialization,
                    Action::Transition(Transition::new("flop", "../a")),
                )),
        );
    let machine = StateMachine::new(Arc::new(graph));

    // root -> b -> a, then the root trigger repeats and the loop stops.
    let state = machine.initialize(&mut Recorder::default()).unwrap();
    assert_eq!(state.name(), "a");
}

#[test]
fn null_graph_initializes_in_place() {
    let machine = StateMachine::new(State::null());
    let state = machine.initialize(&mut Recorder::default()).unwrap();
    assert_eq!(state.qualified_name(), "/");
    assert!(machine.transitions().unwrap().is_empty());
}

#[test]
fn listener_can_dispose_the_machine() {
    let machine = Arc::new(StateMachine::new(fixture()));
    let weak = Arc::downgrade(&machine);
    machine
        .add_listener(move |change| {
            let stopped = change.to.ends_with("stopped");
            if let Some(machine) = weak.upgrade().filter(|_| stopped) {
                machine.dispose();
            }
        })
        .unwrap();
    machine.initialize(&mut Recorder::default()).unwrap();

    let (done, finished) = std::sync::mpsc::channel();
    let worker = Arc::clone(&machine);
    std::thread::spawn(move || {
        let state = worker.apply("stop", &mut Recorder::default()).map(|state| state.qualified_name());
        done.send(state).unwrap();
    });
    let state = finished
        .recv_timeout(std::time::Duration::from_secs(3))
        .expect("apply returned");

    assert_eq!(state.unwrap(), "/stopped");
    assert!(matches!(machine.current(), Err(MachineError::Disposed)));
}

#[test]
fn self_transition_does_not_notify() {
    let graph = State::root()
        .with_trigger(Trigger::new(
            TriggerEvent::Initialization,
            Action::Transition(Transition::new("init", "idle")),
        ))
        .with_state(State::new("idle").with_transition(Transition::new("poke", ".")));
    let machine = StateMachine::new(Arc::new(graph));
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    machine
        .add_listener(move |change| sink.lock().push(change.transition.clone()))
        .unwrap();

    machine.initialize(&mut Recorder::default()).unwrap();
    let state = machine.apply("poke", &mut Recorder::default()).unwrap();

    assert_eq!(state.qualified_name(), "/idle");
    assert_eq!(*seen.lock(), vec!["init".to_string()]);
}
