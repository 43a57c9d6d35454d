//! A desk lamp assembled from its class shape, resources, and a deployment
//! directive.
//!
//! The lamp's context entries, part accessors, and lifecycle graph are not
//! written by hand: [`TypeIntrospector`] derives them from
//! [`Lamp::class_descriptor`] and the resources under `resources/`. The
//! deployment directive in `resources/lamp.xml` is then checked against the
//! derived type before the lamp is driven through its lifecycle.

use metro_builder::{
    BuildError, ClassDescriptor, ClassPath, ComponentDecoder, Configuration, EncodeError, FieldDescriptor,
    FieldValue, Introspect, LoadError, MethodDescriptor, PropertyResolver, TypeEncoder, TypeIntrospector,
};
use metro_model::data::ComponentDirective;
use metro_model::info::{Attributes, Type};
use metro_model::{Composite, LifestylePolicy, Version};
use metro_state::{InvocationError, MachineError, StateMachine};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Failures while assembling or running the lamp.
#[derive(Debug, thiserror::Error)]
pub enum LampError {
    /// The type could not be built.
    #[error(transparent)]
    Build(#[from] BuildError),
    /// The deployment directive could not be loaded.
    #[error(transparent)]
    Load(#[from] LoadError),
    /// The type document could not be written.
    #[error(transparent)]
    Encode(#[from] EncodeError),
    /// A lifecycle step failed.
    #[error(transparent)]
    Machine(#[from] MachineError),
    /// The directive leaves a required context entry unset.
    #[error("The directive does not supply the required context entry [{0}].")]
    MissingEntry(String),
}

// ─────────────────────────────────────────────────────────────────────────────
// Component
// ─────────────────────────────────────────────────────────────────────────────

/// A lamp whose lifecycle methods record what they were asked to do.
#[derive(Debug, Default)]
pub struct Lamp {
    lit: bool,
    calls: Vec<String>,
}

impl Introspect for Lamp {
    fn class_descriptor() -> ClassDescriptor {
        ClassDescriptor::class("acme.Lamp")
            .implements("acme.Light")
            .field(FieldDescriptor::constant(
                "TYPE_CONFIGURATION_SCHEMA",
                "java.lang.String",
                FieldValue::Text("urn:acme:lamp".into()),
            ))
            .field(FieldDescriptor::constant(
                "TYPE_INFO_PROPERTIES",
                "java.util.Properties",
                FieldValue::Properties(Attributes::new().with("vendor", "acme")),
            ))
            .inner(
                ClassDescriptor::interface("acme.Lamp$Context")
                    .method(MethodDescriptor::new("getColor").returns("java.lang.String"))
                    .method(MethodDescriptor::new("getBrightness").returns("int").param("int")),
            )
            .inner(
                ClassDescriptor::interface("acme.Lamp$Parts")
                    .method(MethodDescriptor::new("getBulb").returns("acme.Bulb"))
                    .method(MethodDescriptor::new("releaseBulb").param("acme.Bulb")),
            )
    }
}

impl Lamp {
    /// Returns `true` while the lamp is switched on.
    #[must_use]
    pub fn is_lit(&self) -> bool {
        self.lit
    }

    /// Returns the lifecycle methods invoked so far, in order.
    #[must_use]
    pub fn calls(&self) -> &[String] {
        &self.calls
    }

    /// Dispatches a lifecycle method by name.
    ///
    /// # Errors
    ///
    /// Returns an error for a method the lamp does not have.
    pub fn invoke(&mut self, method: &str) -> Result<(), InvocationError> {
        match method {
            "warmUp" | "getStatus" => {}
            "ignite" => self.lit = true,
            other => return Err(format!("acme.Lamp has no method [{other}]").into()),
        }
        self.calls.push(method.to_string());
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Assembly
// ─────────────────────────────────────────────────────────────────────────────

/// Returns the resource directory shipped with this crate.
#[must_use]
pub fn resources() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("resources")
}

/// The lamp type together with its deployment settings.
#[derive(Debug)]
pub struct Assembly {
    /// The introspected component type.
    pub component_type: Type,
    /// The decoded deployment directive.
    pub directive: ComponentDirective,
    /// The default configuration, if the class ships one.
    pub configuration: Option<Configuration>,
}

impl Assembly {
    /// Builds the lamp type from resources under `root` and loads the
    /// directive at `directive`, expanding `${lamp.color}` to `color`.
    ///
    /// # Errors
    ///
    /// Returns [`LampError::MissingEntry`] if the directive omits a required
    /// context entry, or the error of the failing build step.
    pub fn load(root: &Path, directive: &Path, color: &str) -> Result<Self, LampError> {
        let loader = ClassPath::new().with_class(Lamp::class_descriptor()).with_root(root);
        let introspector = TypeIntrospector::new()
            .with_version(Version::new(1, 2, 0))
            .with_lifestyle(LifestylePolicy::Singleton);
        let component_type = introspector.build_type_of::<Lamp>(&loader)?;
        let configuration = introspector.default_configuration(&Lamp::class_descriptor(), &loader)?;

        let decoder = ComponentDecoder::new().with_resolver(PropertyResolver::new().with_property("lamp.color", color));
        let directive = decoder.load_component_directive(&directive.display().to_string())?;

        for entry in component_type.context().required_entries() {
            if directive.context().directive(entry.key()).is_none() {
                return Err(LampError::MissingEntry(entry.key().to_string()));
            }
        }
        tracing::info!(
            name = component_type.info().name(),
            entries = component_type.context().entries().len(),
            parts = directive.part_keys().len(),
            "assembled lamp"
        );
        Ok(Self {
            component_type,
            directive,
            configuration,
        })
    }

    /// Writes the type as a `.type` document.
    ///
    /// # Errors
    ///
    /// See [`TypeEncoder::encode`].
    pub fn type_document(&self) -> Result<String, LampError> {
        Ok(TypeEncoder::new().encode(&self.component_type)?)
    }

    /// Drives `lamp` through start, switch on, dim, and shutdown.
    ///
    /// # Errors
    ///
    /// Returns [`LampError::Machine`] for the first failing step.
    pub fn run(&self, lamp: &mut Lamp) -> Result<Vec<String>, LampError> {
        let machine = StateMachine::new(Arc::clone(self.component_type.state_graph()));
        machine.add_listener(|change| {
            tracing::info!(from = %change.from, to = %change.to, transition = %change.transition, "lamp changed state");
        })?;

        let mut visited = Vec::new();
        let mut invoke = |method: &str| lamp.invoke(method);
        visited.push(machine.initialize(&mut invoke)?.qualified_name());
        visited.push(machine.apply("switch", &mut invoke)?.qualified_name());
        machine.execute("status", &mut invoke)?;
        visited.push(machine.apply("dim", &mut invoke)?.qualified_name());
        visited.push(machine.terminate(&mut invoke)?.qualified_name());
        machine.dispose();
        Ok(visited)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use metro_model::data::{Directive, ValueDirective};

    fn assembly() -> Assembly {
        Assembly::load(&resources(), &resources().join("lamp.xml"), "amber").unwrap()
    }

    #[test]
    fn type_is_derived_from_the_class() {
        let assembly = assembly();
        let info = assembly.component_type.info();
        assert_eq!(info.name(), "lamp");
        assert_eq!(info.configuration_schema(), Some("urn:acme:lamp"));
        assert_eq!(info.attributes().get("vendor"), Some("acme"));
        assert!(assembly.component_type.context().entry("color").unwrap().is_required());
        assert!(assembly.component_type.part_descriptor("bulb").is_some());
        assert_eq!(assembly.component_type.services()[0].classname(), "acme.Light");
    }

    #[test]
    fn directive_values_are_resolved() {
        let assembly = assembly();
        let color = assembly.directive.context().directive("color").and_then(Directive::as_value);
        assert_eq!(color.and_then(ValueDirective::value), Some("amber"));
        let bulb = assembly.configuration.as_ref().and_then(|config| config.child("bulb"));
        assert_eq!(bulb.and_then(|bulb| bulb.attribute("watts")), Some("40"));
    }

    #[test]
    fn lifecycle_visits_each_state() {
        let assembly = assembly();
        let mut lamp = Lamp::default();
        let visited = assembly.run(&mut lamp).unwrap();
        assert_eq!(visited.len(), 4);
        assert!(visited[0].ends_with("off"));
        assert!(visited[1].ends_with("on"));
        assert!(visited[2].ends_with("on"));
        assert!(visited[3].ends_with("off"));
        assert!(lamp.is_lit());
        assert_eq!(lamp.calls(), ["warmUp", "ignite", "getStatus"]);
    }

    #[test]
    fn missing_entries_are_reported() {
        let dir = std::env::temp_dir().join("metro-lamp-missing-entry");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("lamp.xml");
        std::fs::write(&path, r#"<component type="acme.Lamp"/>"#).unwrap();
        let err = Assembly::load(&resources(), &path, "amber").unwrap_err();
        assert!(matches!(err, LampError::MissingEntry(key) if key == "color"));
    }
}
