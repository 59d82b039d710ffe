use std::fmt;

use serde::{Deserialize, Serialize};

/// Classified value of a JSX attribute.
///
/// Literal kinds carry the literal itself; every other kind carries the
/// source snippet of the attribute value. Serialized as
/// `{"kind": "...", "value": ...}` so it flattens into [`PropRecord`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum PropValue {
    String(String),
    Number(f64),
    Boolean(bool),
    Null,
    Identifier(String),
    Object(String),
    Array(String),
    Function(String),
    Fragment(String),
    Spread(String),
    Expression(String),
}

/// Discriminant of [`PropValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropKind {
    String,
    Number,
    Boolean,
    Null,
    Identifier,
    Object,
    Array,
    Function,
    Fragment,
    Spread,
    Expression,
}

impl PropValue {
    pub fn kind(&self) -> PropKind {
        match self {
            PropValue::String(_) => PropKind::String,
            PropValue::Number(_) => PropKind::Number,
            PropValue::Boolean(_) => PropKind::Boolean,
            PropValue::Null => PropKind::Null,
            PropValue::Identifier(_) => PropKind::Identifier,
            PropValue::Object(_) => PropKind::Object,
            PropValue::Array(_) => PropKind::Array,
            PropValue::Function(_) => PropKind::Function,
            PropValue::Fragment(_) => PropKind::Fragment,
            PropValue::Spread(_) => PropKind::Spread,
            PropValue::Expression(_) => PropKind::Expression,
        }
    }
}

impl fmt::Display for PropKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PropKind::String => "string",
            PropKind::Number => "number",
            PropKind::Boolean => "boolean",
            PropKind::Null => "null",
            PropKind::Identifier => "identifier",
            PropKind::Object => "object",
            PropKind::Array => "array",
            PropKind::Function => "function",
            PropKind::Fragment => "fragment",
            PropKind::Spread => "spread",
            PropKind::Expression => "expression",
        };
        f.write_str(name)
    }
}

/// Name used for spread attributes (`<Button {...rest} />`).
pub const SPREAD_PROP_NAME: &str = "...";

/// One attribute observed on a component invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropRecord {
    pub name: String,
    #[serde(flatten)]
    pub value: PropValue,
}

impl PropRecord {
    pub fn new(name: impl Into<String>, value: PropValue) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    /// Spread attributes are always recorded under `...`.
    pub fn spread(snippet: impl Into<String>) -> Self {
        Self {
            name: SPREAD_PROP_NAME.to_string(),
            value: PropValue::Spread(snippet.into()),
        }
    }

    pub fn kind(&self) -> PropKind {
        self.value.kind()
    }
}

/// Evidence that a usage site restyles the component.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customization {
    #[serde(default, skip_serializing_if = "is_false")]
    pub wrapped_in_style_extension: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub has_inline_style_override: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub overridden_properties: Vec<String>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl Customization {
    pub fn is_empty(&self) -> bool {
        !self.wrapped_in_style_extension
            && !self.has_inline_style_override
            && self.overridden_properties.is_empty()
    }

    /// Add a property name, keeping first-seen order without duplicates.
    pub fn add_property(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !self.overridden_properties.contains(&name) {
            self.overridden_properties.push(name);
        }
    }
}

/// One occurrence of a canonical component within one file.
///
/// `component_name` is always a name from the canonical directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageRecord {
    pub component_name: String,
    pub file_path: String,
    pub host_codebase: String,
    /// 1-indexed line of the invocation, or of the import for import-only records.
    pub line_number: usize,
    #[serde(default)]
    pub props: Vec<PropRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customization: Option<Customization>,
    /// The component was imported but never invoked or wrapped in this file.
    #[serde(default, skip_serializing_if = "is_false")]
    pub import_only: bool,
}
