//! Declarative resource schemas
//!
//! Each resource attribute declares its type, whether it is required,
//! whether changing it forces replacement, whether it is sensitive, its
//! default and the values it may take. Hosts read these to plan changes; the
//! reconcilers read `force_new` to refuse in-place updates of immutable
//! attributes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::traits::ResourceField;

/// Attribute value type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeType {
    String,
    Int,
    Bool,
    /// Ordered list of strings
    StringList,
}

/// Schema of a single resource attribute
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attribute {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub kind: AttributeType,
    pub description: &'static str,
    pub required: bool,
    /// Set by the remote service, never by configuration
    pub computed: bool,
    /// Changing the value forces delete + create
    pub force_new: bool,
    pub sensitive: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Permitted values; empty means unconstrained
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub allowed_values: Vec<Value>,
    /// Value must parse as an absolute URL
    pub url: bool,
}

impl Attribute {
    fn new(name: &'static str, kind: AttributeType, description: &'static str) -> Self {
        Self {
            name,
            kind,
            description,
            required: false,
            computed: false,
            force_new: false,
            sensitive: false,
            default: None,
            allowed_values: Vec::new(),
            url: false,
        }
    }

    pub fn required_string(name: &'static str, description: &'static str) -> Self {
        Self::optional_string(name, description).required()
    }

    pub fn optional_string(name: &'static str, description: &'static str) -> Self {
        Self::new(name, AttributeType::String, description)
    }

    pub fn required_int(name: &'static str, description: &'static str) -> Self {
        Self::optional_int(name, description).required()
    }

    pub fn optional_int(name: &'static str, description: &'static str) -> Self {
        Self::new(name, AttributeType::Int, description)
    }

    pub fn optional_bool(name: &'static str, description: &'static str) -> Self {
        Self::new(name, AttributeType::Bool, description).with_default(Value::Bool(false))
    }

    pub fn string_list(name: &'static str, description: &'static str) -> Self {
        Self::new(name, AttributeType::StringList, description)
    }

    pub fn computed_string(name: &'static str, description: &'static str) -> Self {
        let mut attr = Self::new(name, AttributeType::String, description);
        attr.computed = true;
        attr
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn force_new(mut self) -> Self {
        self.force_new = true;
        self
    }

    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    pub fn url(mut self) -> Self {
        self.url = true;
        self
    }

    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn one_of<V: Into<Value>>(mut self, values: impl IntoIterator<Item = V>) -> Self {
        self.allowed_values = values.into_iter().map(Into::into).collect();
        self
    }
}

/// Schema of a resource type
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceSchema {
    pub type_name: &'static str,
    pub description: &'static str,
    pub attributes: Vec<Attribute>,
}

impl ResourceSchema {
    /// Build the schema from a resource's field set
    ///
    /// The computed `id` attribute is always listed first.
    pub fn from_fields<F: ResourceField>(type_name: &'static str, description: &'static str) -> Self {
        let mut attributes = vec![Attribute::computed_string(
            "id",
            "Identifier assigned by StatusCake",
        )];
        attributes.extend(F::ALL.iter().map(ResourceField::attribute));

        Self {
            type_name,
            description,
            attributes,
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|attr| attr.name == name)
    }

    /// Names of attributes whose change forces replacement
    pub fn force_new_attributes(&self) -> Vec<&'static str> {
        self.attributes
            .iter()
            .filter(|attr| attr.force_new)
            .map(|attr| attr.name)
            .collect()
    }
}
