//! Typed parameter retrieval for a single item.
//!
//! Values come from the item first.  When the item does not carry a
//! parameter, the default declared in the catalog for the current
//! resource/operation is used, except for required fields whose declared
//! default is only an empty placeholder: those fail with
//! [`NodeError::MissingParameter`].

use base64::{engine::general_purpose::STANDARD, Engine as _};
use gateway::BinaryPart;
use serde_json::Value;

use crate::catalog::{self, Resource};
use crate::item::Item;
use crate::NodeError;

/// File name used when the binary data carries none.
const DEFAULT_FILE_NAME: &str = "file";

pub struct Parameters<'a> {
    item: &'a Item,
    scope: Option<(Resource, &'a str)>,
}

impl<'a> Parameters<'a> {
    /// Unscoped view: only values present on the item are visible.
    pub fn new(item: &'a Item) -> Self {
        Self { item, scope: None }
    }

    /// View that falls back to catalog defaults for `resource`/`operation`.
    pub fn scoped(item: &'a Item, resource: Resource, operation: &'a str) -> Self {
        Self {
            item,
            scope: Some((resource, operation)),
        }
    }

    fn value(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.item.parameters.get(name).filter(|v| !v.is_null()) {
            return Some(value.clone());
        }

        let (resource, operation) = self.scope?;
        let property = catalog::find_property(resource, operation, name)?;
        if property.required && !property.has_meaningful_default() {
            return None;
        }
        Some(property.default.clone())
    }

    fn required(&self, name: &str) -> Result<Value, NodeError> {
        self.value(name)
            .ok_or_else(|| NodeError::MissingParameter(name.to_owned()))
    }

    /// Required string parameter.  Numbers and booleans are accepted and
    /// rendered as text.
    pub fn string(&self, name: &str) -> Result<String, NodeError> {
        as_string(name, self.required(name)?)
    }

    /// Optional string parameter; empty strings count as unset.
    pub fn optional_string(&self, name: &str) -> Result<Option<String>, NodeError> {
        match self.value(name) {
            Some(value) => Ok(Some(as_string(name, value)?).filter(|s| !s.is_empty())),
            None => Ok(None),
        }
    }

    /// Required boolean parameter.
    pub fn boolean(&self, name: &str) -> Result<bool, NodeError> {
        as_bool(name, self.required(name)?)
    }

    /// Optional boolean flag; unset means `false`.
    pub fn flag(&self, name: &str) -> Result<bool, NodeError> {
        match self.value(name) {
            Some(value) => as_bool(name, value),
            None => Ok(false),
        }
    }

    /// Tri-state filter: `""`/unset → `None`, otherwise `Some(bool)`.
    pub fn tri_state(&self, name: &str) -> Result<Option<bool>, NodeError> {
        match self.value(name) {
            None => Ok(None),
            Some(Value::String(s)) if s.is_empty() => Ok(None),
            Some(value) => as_bool(name, value).map(Some),
        }
    }

    /// Required non-negative integer parameter.
    pub fn unsigned(&self, name: &str) -> Result<u64, NodeError> {
        as_u64(name, self.required(name)?)
    }

    /// Optional non-negative integer; `None` when unset or `""`.
    pub fn optional_unsigned(&self, name: &str) -> Result<Option<u64>, NodeError> {
        match self.value(name) {
            None => Ok(None),
            Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
            Some(value) => as_u64(name, value).map(Some),
        }
    }

    /// Required id that is interpolated as one URL path segment.  Empty,
    /// `.` and `..` are refused since they would not stay a segment.
    pub fn path_segment(&self, name: &str) -> Result<String, NodeError> {
        let id = self.string(name)?;
        match id.as_str() {
            "" => Err(NodeError::MissingParameter(name.to_owned())),
            "." | ".." => Err(NodeError::invalid(name, format!("'{id}' is not a valid id"))),
            _ => Ok(id),
        }
    }

    /// Required comma-separated list, split and trimmed.
    pub fn list(&self, name: &str) -> Result<Vec<String>, NodeError> {
        Ok(split_list(&self.string(name)?))
    }

    /// Optional comma-separated list; `None` when unset or empty.
    pub fn optional_list(&self, name: &str) -> Result<Option<Vec<String>>, NodeError> {
        Ok(self
            .optional_string(name)?
            .map(|raw| split_list(&raw))
            .filter(|list| !list.is_empty()))
    }

    /// Read the binary property whose name is held by parameter `name`.
    ///
    /// # Errors
    /// [`NodeError::MissingBinary`] when the item carries no such property,
    /// [`NodeError::InvalidBinary`] when its data is not valid base64.
    pub fn binary(&self, name: &str) -> Result<BinaryPart, NodeError> {
        let property = self.string(name)?;
        let binary = self
            .item
            .binary
            .get(&property)
            .ok_or_else(|| NodeError::MissingBinary(property.clone()))?;

        let data = STANDARD
            .decode(binary.data.trim())
            .map_err(|e| NodeError::InvalidBinary {
                property: property.clone(),
                reason: e.to_string(),
            })?;

        Ok(BinaryPart {
            data,
            file_name: binary
                .file_name
                .clone()
                .filter(|f| !f.is_empty())
                .unwrap_or_else(|| DEFAULT_FILE_NAME.to_owned()),
            mime_type: binary.mime_type.clone(),
        })
    }
}

/// Split a comma-separated input into trimmed entries, dropping empty ones.
/// Order is preserved.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_owned)
        .collect()
}

fn as_string(name: &str, value: Value) -> Result<String, NodeError> {
    match value {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(NodeError::invalid(name, format!("expected a string, got {other}"))),
    }
}

fn as_bool(name: &str, value: Value) -> Result<bool, NodeError> {
    match value {
        Value::Bool(b) => Ok(b),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" => Ok(true),
            "false" | "" => Ok(false),
            _ => Err(NodeError::invalid(name, format!("expected a boolean, got '{s}'"))),
        },
        other => Err(NodeError::invalid(name, format!("expected a boolean, got {other}"))),
    }
}

fn as_u64(name: &str, value: Value) -> Result<u64, NodeError> {
    let parsed = match &value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0 && f.fract() == 0.0).map(|f| f as u64)),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| {
        NodeError::invalid(name, format!("expected a non-negative integer, got {value}"))
    })
}
