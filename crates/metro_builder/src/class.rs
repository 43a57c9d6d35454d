//! Structural description of implementation classes.
//!
//! Introspection never touches live objects. A component implementation
//! publishes its shape as a [`ClassDescriptor`]: its name, supertypes,
//! nested interfaces, method signatures, and static constants.

use metro_model::info::Attributes;

const PRIMITIVES: [&str; 9] = [
    "boolean", "byte", "char", "short", "int", "long", "float", "double", "void",
];

/// A reference to a type in a signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeRef {
    name: String,
    dimensions: usize,
}

impl TypeRef {
    /// A non-array type.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dimensions: 0,
        }
    }

    /// The `void` pseudo type.
    #[must_use]
    pub fn void() -> Self {
        Self::named("void")
    }

    /// An array of `component` with the given number of dimensions.
    #[must_use]
    pub fn array(component: impl Into<String>, dimensions: usize) -> Self {
        Self {
            name: component.into(),
            dimensions,
        }
    }

    /// Returns `true` for `void`.
    #[must_use]
    pub fn is_void(&self) -> bool {
        self.dimensions == 0 && self.name == "void"
    }

    /// Returns `true` for array types.
    #[must_use]
    pub fn is_array(&self) -> bool {
        self.dimensions > 0
    }

    /// Returns `true` for primitive non-array types, `void` included.
    #[must_use]
    pub fn is_primitive(&self) -> bool {
        self.dimensions == 0 && PRIMITIVES.contains(&self.name.as_str())
    }

    /// Returns `true` for `boolean` and its boxed form.
    #[must_use]
    pub fn is_boolean(&self) -> bool {
        self.dimensions == 0 && (self.name == "boolean" || self.name == "java.lang.Boolean")
    }

    /// Returns the element type name, without array brackets.
    #[must_use]
    pub fn component_name(&self) -> &str {
        &self.name
    }

    /// Returns the type name with one `[]` per array dimension.
    #[must_use]
    pub fn classname(&self) -> String {
        let mut name = self.name.clone();
        for _ in 0..self.dimensions {
            name.push_str("[]");
        }
        name
    }
}

impl From<&str> for TypeRef {
    fn from(value: &str) -> Self {
        let mut name = value.trim();
        let mut dimensions = 0;
        while let Some(stripped) = name.strip_suffix("[]") {
            name = stripped.trim_end();
            dimensions += 1;
        }
        Self::array(name, dimensions)
    }
}

impl core::fmt::Display for TypeRef {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.classname())
    }
}

/// A method signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDescriptor {
    name: String,
    return_type: TypeRef,
    parameters: Vec<TypeRef>,
    exceptions: Vec<String>,
}

impl MethodDescriptor {
    /// A `void` method without parameters.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            return_type: TypeRef::void(),
            parameters: Vec::new(),
            exceptions: Vec::new(),
        }
    }

    /// Sets the return type.
    #[must_use]
    pub fn returns(mut self, return_type: impl Into<TypeRef>) -> Self {
        self.return_type = return_type.into();
        self
    }

    /// Appends a parameter.
    #[must_use]
    pub fn param(mut self, parameter: impl Into<TypeRef>) -> Self {
        self.parameters.push(parameter.into());
        self
    }

    /// Appends a declared exception.
    #[must_use]
    pub fn throws(mut self, exception: impl Into<String>) -> Self {
        self.exceptions.push(exception.into());
        self
    }

    /// Returns the name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the return type.
    #[must_use]
    pub fn return_type(&self) -> &TypeRef {
        &self.return_type
    }

    /// Returns the parameter types in order.
    #[must_use]
    pub fn parameters(&self) -> &[TypeRef] {
        &self.parameters
    }

    /// Returns the declared exceptions.
    #[must_use]
    pub fn exceptions(&self) -> &[String] {
        &self.exceptions
    }
}

/// The initial value of a static field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FieldValue {
    /// No value (`null`).
    #[default]
    Null,
    /// A string constant.
    Text(String),
    /// A property table.
    Properties(Attributes),
}

/// A field declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    name: String,
    classname: String,
    is_static: bool,
    value: FieldValue,
}

impl FieldDescriptor {
    /// An instance field without a value.
    #[must_use]
    pub fn new(name: impl Into<String>, classname: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            classname: classname.into(),
            is_static: false,
            value: FieldValue::Null,
        }
    }

    /// A static field holding `value`.
    #[must_use]
    pub fn constant(name: impl Into<String>, classname: impl Into<String>, value: FieldValue) -> Self {
        Self::new(name, classname).with_static(true).with_value(value)
    }

    /// Sets the static modifier.
    #[must_use]
    pub fn with_static(mut self, is_static: bool) -> Self {
        self.is_static = is_static;
        self
    }

    /// Sets the initial value.
    #[must_use]
    pub fn with_value(mut self, value: FieldValue) -> Self {
        self.value = value;
        self
    }

    /// Returns the name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the declared type.
    #[must_use]
    pub fn classname(&self) -> &str {
        &self.classname
    }

    /// Returns `true` for static fields.
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.is_static
    }

    /// Returns the initial value.
    #[must_use]
    pub fn value(&self) -> &FieldValue {
        &self.value
    }
}

/// The shape of a class or interface.
///
/// Nested classes carry fully qualified names using `$` as the nesting
/// separator, so the context interface of `acme.Widget` is named
/// `acme.Widget$Context`.
///
/// ```
/// use metro_builder::{ClassDescriptor, MethodDescriptor};
///
/// let widget = ClassDescriptor::class("acme.Widget").inner(
///     ClassDescriptor::interface("acme.Widget$Context")
///         .method(MethodDescriptor::new("getColor").returns("java.awt.Color")),
/// );
/// assert!(widget.inner_class("$Context").is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDescriptor {
    name: String,
    superclass: Option<String>,
    interfaces: Vec<String>,
    is_interface: bool,
    methods: Vec<MethodDescriptor>,
    fields: Vec<FieldDescriptor>,
    inner: Vec<ClassDescriptor>,
}

impl ClassDescriptor {
    /// A concrete class extending `java.lang.Object`.
    #[must_use]
    pub fn class(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            superclass: Some(crate::loader::OBJECT_CLASS.to_string()),
            interfaces: Vec::new(),
            is_interface: false,
            methods: Vec::new(),
            fields: Vec::new(),
            inner: Vec::new(),
        }
    }

    /// An interface.
    #[must_use]
    pub fn interface(name: impl Into<String>) -> Self {
        Self {
            superclass: None,
            is_interface: true,
            ..Self::class(name)
        }
    }

    /// Sets the superclass.
    #[must_use]
    pub fn extends(mut self, superclass: impl Into<String>) -> Self {
        self.superclass = Some(superclass.into());
        self
    }

    /// Adds an implemented (or, for interfaces, extended) interface.
    #[must_use]
    pub fn implements(mut self, interface: impl Into<String>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    /// Adds a method.
    #[must_use]
    pub fn method(mut self, method: MethodDescriptor) -> Self {
        self.methods.push(method);
        self
    }

    /// Adds a field.
    #[must_use]
    pub fn field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    /// Adds a nested class.
    #[must_use]
    pub fn inner(mut self, class: ClassDescriptor) -> Self {
        self.inner.push(class);
        self
    }

    /// Returns the name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the superclass, `None` for interfaces.
    #[must_use]
    pub fn superclass(&self) -> Option<&str> {
        self.superclass.as_deref()
    }

    /// Returns the directly implemented interfaces.
    #[must_use]
    pub fn interfaces(&self) -> &[String] {
        &self.interfaces
    }

    /// Returns `true` for interfaces.
    #[must_use]
    pub fn is_interface(&self) -> bool {
        self.is_interface
    }

    /// Returns the methods in declaration order.
    #[must_use]
    pub fn methods(&self) -> &[MethodDescriptor] {
        &self.methods
    }

    /// Returns the fields.
    #[must_use]
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Returns the field named `name`.
    #[must_use]
    pub fn field_named(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Returns the nested classes.
    #[must_use]
    pub fn inner_classes(&self) -> &[ClassDescriptor] {
        &self.inner
    }

    /// Returns the nested interface whose name is this class's name followed
    /// by `suffix` (for example `"$Context"`).
    #[must_use]
    pub fn inner_class(&self, suffix: &str) -> Option<&ClassDescriptor> {
        self.inner.iter().find(|class| {
            class.is_interface
                && class
                    .name
                    .strip_prefix(self.name.as_str())
                    .is_some_and(|rest| rest == suffix)
        })
    }

    /// Returns `true` if `classname` names a class nested in this one.
    #[must_use]
    pub fn encloses(&self, classname: &str) -> bool {
        classname
            .strip_prefix(self.name.as_str())
            .is_some_and(|rest| rest.starts_with('$'))
    }

    /// Returns the resource path prefix for this class: the dotted package
    /// path with `/` separators.
    #[must_use]
    pub fn resource_base(&self) -> String {
        self.name.replace('.', "/")
    }
}

/// Implemented by component types that describe their own shape.
///
/// ```
/// use metro_builder::{ClassDescriptor, Introspect};
///
/// struct Gadget;
///
/// impl Introspect for Gadget {
///     fn class_descriptor() -> ClassDescriptor {
///         ClassDescriptor::class("acme.Gadget")
///     }
/// }
///
/// assert_eq!(Gadget::class_descriptor().name(), "acme.Gadget");
/// ```
pub trait Introspect {
    /// Returns the class shape used to build the component type.
    fn class_descriptor() -> ClassDescriptor;
}
