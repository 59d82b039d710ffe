use serde::{Deserialize, Serialize};

/// A component published by the library's export manifest.
///
/// `name` is unique within a directory and is the aggregation key everywhere
/// downstream.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalComponent {
    pub name: String,
    /// Library-relative path of the defining file.
    pub definition_path: String,
}

impl CanonicalComponent {
    pub fn new(name: impl Into<String>, definition_path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            definition_path: definition_path.into(),
        }
    }
}
