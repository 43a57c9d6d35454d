//! `.xgraph` decoder.

use crate::error::StateDecodeError;
use crate::state::{Action, Operation, State, Transition, Trigger, TriggerEvent};
use metro_dom::{DecodingError, Element};
use std::path::Path;

/// Reads state graphs from `.xgraph` documents.
///
/// Decoding is strict: unknown attributes and unknown child elements are
/// rejected, the root state may not be named, and every nested state must
/// be. A decoded graph is validated before it is returned.
#[derive(Debug, Clone, Copy, Default)]
pub struct StateDecoder;

impl StateDecoder {
    /// Parses and validates a graph from document text.
    ///
    /// # Errors
    ///
    /// Returns [`StateDecodeError`] if the text is not well-formed, an
    /// element has an unexpected shape, or the graph fails validation.
    pub fn parse_str(source: &str) -> Result<State, StateDecodeError> {
        let root = Element::parse_str(source)?;
        Self::decode(&root)
    }

    /// Reads, parses, and validates the graph stored at `path`.
    ///
    /// # Errors
    ///
    /// See [`StateDecoder::parse_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<State, StateDecodeError> {
        let root = Element::parse_file(path)?;
        Self::decode(&root)
    }

    /// Builds and validates a graph from its root `<state>` element.
    ///
    /// # Errors
    ///
    /// See [`StateDecoder::parse_str`].
    pub fn decode(element: &Element) -> Result<State, StateDecodeError> {
        let state = Self::build_state(element, true)?;
        state.validate().map_err(StateDecodeError::Invalid)?;
        Ok(state)
    }

    fn build_state(element: &Element, root: bool) -> Result<State, DecodingError> {
        if element.name() != "state" {
            return Err(DecodingError::new(
                element,
                format!("Element name [{}] is not a state.", element.name()),
            ));
        }

        let mut state = State::root();
        let mut name = None;
        let mut terminal = false;
        for (key, value) in element.attributes() {
            match key {
                "name" if root => {
                    return Err(DecodingError::new(
                        element,
                        "The root state may not declare a name.",
                    ));
                }
                "name" => name = Some(value),
                "terminal" => terminal = element.bool_attribute("terminal", false)?,
                other => {
                    return Err(DecodingError::new(
                        element,
                        format!("State attribute [{other}] is not recognized."),
                    ));
                }
            }
        }
        if !root {
            let Some(name) = name.filter(|name| !name.is_empty()) else {
                return Err(DecodingError::new(
                    element,
                    "A nested state must declare a name.",
                ));
            };
            state = State::new(name);
        }
        state = state.terminal(terminal);

        for child in element.children() {
            state = match child.name() {
                "trigger" => state.with_trigger(Self::build_trigger(child)?),
                "transition" => state.with_transition(Self::build_transition(child)?),
                "operation" => state.with_operation(Self::build_operation(child)?),
                "interface" => state.with_interface(child.required_attribute("class")?),
                "state" => state.with_state(Self::build_state(child, false)?),
                other => {
                    return Err(DecodingError::new(
                        child,
                        format!("State child element [{other}] is not recognized."),
                    ));
                }
            };
        }
        Ok(state)
    }

    fn build_trigger(element: &Element) -> Result<Trigger, DecodingError> {
        Self::check_attributes(element, &["event"])?;
        let event = element.required_attribute("event")?;
        let Some(event) = TriggerEvent::parse(event) else {
            return Err(DecodingError::new(
                element,
                format!("Trigger event [{event}] is not recognized."),
            ));
        };
        let [child] = element.children() else {
            return Err(DecodingError::new(
                element,
                "A trigger must declare exactly one action.",
            ));
        };
        let action = match child.name() {
            "transition" => Action::Transition(Self::build_transition(child)?),
            "operation" => Action::Operation(Self::build_operation(child)?),
            "apply" => {
                Self::check_attributes(child, &["id"])?;
                Action::Apply(child.required_attribute("id")?.to_string())
            }
            "exec" => {
                Self::check_attributes(child, &["id"])?;
                Action::Exec(child.required_attribute("id")?.to_string())
            }
            other => {
                return Err(DecodingError::new(
                    child,
                    format!("Trigger action [{other}] is not recognized."),
                ));
            }
        };
        Ok(Trigger::new(event, action))
    }

    fn build_transition(element: &Element) -> Result<Transition, DecodingError> {
        Self::check_attributes(element, &["name", "target"])?;
        let name = element.required_attribute("name")?;
        let target = element.attribute("target").unwrap_or(".");
        let mut transition = Transition::new(name, target);
        match element.children() {
            [] => {}
            [child] if child.name() == "operation" => {
                transition = transition.with_operation(Self::build_operation(child)?);
            }
            [child] => {
                return Err(DecodingError::new(
                    child,
                    format!("Transition child element [{}] is not recognized.", child.name()),
                ));
            }
            _ => {
                return Err(DecodingError::new(
                    element,
                    "A transition may declare at most one operation.",
                ));
            }
        }
        Ok(transition)
    }

    fn build_operation(element: &Element) -> Result<Operation, DecodingError> {
        Self::check_attributes(element, &["name", "method"])?;
        if let Some(child) = element.children().first() {
            return Err(DecodingError::new(
                child,
                format!("Operation child element [{}] is not recognized.", child.name()),
            ));
        }
        let mut operation = Operation::new(element.required_attribute("name")?);
        if let Some(method) = element.attribute("method") {
            operation = operation.with_method(method);
        }
        Ok(operation)
    }

    fn check_attributes(element: &Element, allowed: &[&str]) -> Result<(), DecodingError> {
        match element.attributes().find(|(key, _)| !allowed.contains(key)) {
            Some((key, _)) => Err(DecodingError::new(
                element,
                format!("Attribute [{key}] is not recognized."),
            )),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_root_is_rejected() {
        let result = StateDecoder::parse_str(r#"<state name="root"/>"#);
        assert!(matches!(result, Err(StateDecodeError::Decoding(_))));
    }

    #[test]
    fn unnamed_substate_is_rejected() {
        let result = StateDecoder::parse_str("<state><state/></state>");
        assert!(matches!(result, Err(StateDecodeError::Decoding(_))));
    }

    #[test]
    fn unknown_child_is_rejected() {
        let result = StateDecoder::parse_str("<state><widget/></state>");
        let Err(StateDecodeError::Decoding(error)) = result else {
            panic!("expected a decoding error");
        };
        assert_eq!(error.element(), "<widget>");
    }

    #[test]
    fn unknown_attribute_is_rejected() {
        assert!(StateDecoder::parse_str(r#"<state colour="red"/>"#).is_err());
        assert!(
            StateDecoder::parse_str(r#"<state><operation name="a" colour="red"/></state>"#)
                .is_err()
        );
    }

    #[test]
    fn trigger_requires_single_action() {
        let result = StateDecoder::parse_str(
            r#"<state><trigger event="initialization"><apply id="a"/><apply id="b"/></trigger></state>"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn transition_target_defaults_to_self() {
        let state =
            StateDecoder::parse_str(r#"<state><transition name="refresh"/></state>"#).unwrap();
        assert_eq!(state.transitions()[0].target(), ".");
    }

    #[test]
    fn unresolved_target_fails_validation() {
        let result =
            StateDecoder::parse_str(r#"<state><transition name="go" target="nowhere"/></state>"#);
        let Err(StateDecodeError::Invalid(errors)) = result else {
            panic!("expected validation errors");
        };
        assert_eq!(errors.len(), 1);
    }
}
