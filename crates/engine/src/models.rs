//! Output shapes handed back to the host.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// OutputItem
// ---------------------------------------------------------------------------

/// One output value, linked to the input item that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputItem {
    pub json: Value,
    /// Index of the originating input item.
    pub paired_item: usize,
    /// Set when the item failed under continue-on-fail.
    #[serde(skip)]
    pub failed: bool,
}

impl OutputItem {
    pub fn new(json: Value, paired_item: usize) -> Self {
        Self {
            json,
            paired_item,
            failed: false,
        }
    }

    /// The `{error: message}` item recorded under continue-on-fail.
    pub fn error(message: impl Into<String>, paired_item: usize) -> Self {
        Self {
            failed: true,
            ..Self::new(json!({ "error": message.into() }), paired_item)
        }
    }

    pub fn is_error(&self) -> bool {
        self.failed
    }
}

// ---------------------------------------------------------------------------
// ExecutionResult
// ---------------------------------------------------------------------------

/// Everything one run produced, in input order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionResult {
    pub execution_id: Uuid,
    pub items: Vec<OutputItem>,
}

impl ExecutionResult {
    /// Just the JSON payloads, dropping the pairing.
    pub fn values(&self) -> Vec<&Value> {
        self.items.iter().map(|item| &item.json).collect()
    }

    /// Number of items recorded as `{error}` under continue-on-fail.
    pub fn failed(&self) -> usize {
        self.items.iter().filter(|item| item.is_error()).count()
    }
}
