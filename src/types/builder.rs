use super::descriptor::{Descriptor, DescriptorKind, ElementRule, PrimitiveKind};
use indexmap::IndexMap;

/// Entry point for building descriptors.
///
/// ```rust
/// use patchbay::types::Types;
///
/// let tags = Types::array().of(Types::string().required()).required();
/// let shape = Types::shape().field("tags", tags).required();
/// assert_eq!(patchbay::Descriptor::from(shape).describe(), "{ string: [ string ] }");
/// ```
pub struct Types;

impl Types {
    pub fn string() -> Descriptor {
        Descriptor::new(DescriptorKind::Primitive(PrimitiveKind::String))
    }

    pub fn number() -> Descriptor {
        Descriptor::new(DescriptorKind::Primitive(PrimitiveKind::Number))
    }

    pub fn bool() -> Descriptor {
        Descriptor::new(DescriptorKind::Primitive(PrimitiveKind::Boolean))
    }

    pub fn array() -> ArrayType {
        ArrayType {
            elements: ElementRule::Any,
            required: false,
        }
    }

    /// An object shape that tolerates keys it does not declare.
    pub fn shape() -> ShapeType {
        ShapeType::new(false)
    }

    /// An object shape that rejects keys it does not declare.
    pub fn exact_shape() -> ShapeType {
        ShapeType::new(true)
    }
}

/// Builder for array descriptors.
#[derive(Debug, Clone)]
pub struct ArrayType {
    elements: ElementRule,
    required: bool,
}

impl ArrayType {
    /// Every element must satisfy `element`.
    pub fn of(mut self, element: impl Into<Descriptor>) -> Self {
        self.elements = ElementRule::One(Box::new(element.into()));
        self
    }

    /// Every element must satisfy at least one of `alternatives`.
    pub fn one_of<I, D>(mut self, alternatives: I) -> Self
    where
        I: IntoIterator<Item = D>,
        D: Into<Descriptor>,
    {
        self.elements = ElementRule::OneOf(alternatives.into_iter().map(Into::into).collect());
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn build(self) -> Descriptor {
        self.into()
    }
}

impl From<ArrayType> for Descriptor {
    fn from(builder: ArrayType) -> Self {
        let descriptor = Descriptor::new(DescriptorKind::Array(builder.elements));
        if builder.required {
            descriptor.required()
        } else {
            descriptor
        }
    }
}

/// Builder for object descriptors.
#[derive(Debug, Clone)]
pub struct ShapeType {
    fields: IndexMap<String, Descriptor>,
    exact: bool,
    required: bool,
}

impl ShapeType {
    fn new(exact: bool) -> Self {
        Self {
            fields: IndexMap::new(),
            exact,
            required: false,
        }
    }

    /// Adds (or replaces) one field.
    pub fn field(mut self, name: impl Into<String>, descriptor: impl Into<Descriptor>) -> Self {
        self.fields.insert(name.into(), descriptor.into());
        self
    }

    /// Replaces all fields at once.
    pub fn of<I, K>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = (K, Descriptor)>,
        K: Into<String>,
    {
        self.fields = fields.into_iter().map(|(k, d)| (k.into(), d)).collect();
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn build(self) -> Descriptor {
        self.into()
    }
}

impl From<ShapeType> for Descriptor {
    fn from(builder: ShapeType) -> Self {
        let descriptor = Descriptor::new(DescriptorKind::Object {
            fields: builder.fields,
            exact: builder.exact,
        });
        if builder.required {
            descriptor.required()
        } else {
            descriptor
        }
    }
}
