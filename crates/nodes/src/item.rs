//! Input items as handed to the node by the host.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Binary payload attached to an item, stored base64-encoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BinaryData {
    pub data: String,
    pub mime_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
}

/// One unit of work: the node parameters resolved for this item plus any
/// binary properties it carries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Item {
    #[serde(default)]
    pub parameters: Map<String, Value>,
    #[serde(default)]
    pub binary: BTreeMap<String, BinaryData>,
}

impl Item {
    /// Build an item from a JSON object of parameters.  Non-object values
    /// yield an item without parameters.
    pub fn with_parameters(parameters: Value) -> Self {
        match parameters {
            Value::Object(map) => Self {
                parameters: map,
                binary: BTreeMap::new(),
            },
            _ => Self::default(),
        }
    }

    pub fn with_binary(mut self, property: impl Into<String>, data: BinaryData) -> Self {
        self.binary.insert(property.into(), data);
        self
    }
}
