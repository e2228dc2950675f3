//! The `ExecutableNode` trait, the contract the item executor drives.

use async_trait::async_trait;
use gateway::Credentials;
use serde_json::Value;
use uuid::Uuid;

use crate::item::Item;
use crate::NodeError;

/// Shared context passed to the node for every item of one run.
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    /// ID of the current execution run.
    pub execution_id: Uuid,
    /// Gateway credentials, read on every request and never mutated.
    pub credentials: Credentials,
}

impl ExecutionContext {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            execution_id: Uuid::new_v4(),
            credentials,
        }
    }
}

#[async_trait]
pub trait ExecutableNode: Send + Sync {
    /// Execute the node for one input item and return its output JSON
    /// values (usually one; several when the gateway answers with a list).
    async fn execute(
        &self,
        item: &Item,
        item_index: usize,
        ctx: &ExecutionContext,
    ) -> Result<Vec<Value>, NodeError>;
}
