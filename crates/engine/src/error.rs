//! Engine-level error types.

use nodes::NodeError;
use thiserror::Error;

/// Errors produced by the item executor.
#[derive(Debug, Error)]
pub enum EngineError {
    /// An item failed while continue-on-fail was off; the run stopped there.
    #[error("item {index} failed: {source}")]
    ItemFailed {
        index: usize,
        #[source]
        source: NodeError,
    },
}

impl EngineError {
    /// Index of the input item that stopped the run.
    pub fn item_index(&self) -> usize {
        match self {
            Self::ItemFailed { index, .. } => *index,
        }
    }
}
