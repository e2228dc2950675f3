//! Item execution engine.
//!
//! `ItemExecutor` plays the host's per-item loop:
//! 1. Builds one `ExecutionContext` (fresh execution id, shared credentials).
//! 2. Runs the node for each input item, strictly in order, one at a time.
//! 3. Pairs every output value with the index of the item that produced it.
//! 4. On failure either records `{error: message}` for that item and moves
//!    on (continue-on-fail) or stops and reports the failing index.

use std::sync::Arc;

use gateway::Credentials;
use nodes::{ExecutableNode, ExecutionContext, Item};
use tracing::{info, instrument, warn};

use crate::{EngineError, ExecutionResult, OutputItem};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Tuning knobs for the executor.
#[derive(Debug, Clone, Default)]
pub struct ExecutorConfig {
    /// Turn item failures into `{error}` outputs instead of aborting.
    pub continue_on_fail: bool,
}

// ---------------------------------------------------------------------------
// ItemExecutor
// ---------------------------------------------------------------------------

/// Runs a batch of items through a single node.
pub struct ItemExecutor {
    node: Arc<dyn ExecutableNode>,
    config: ExecutorConfig,
}

impl ItemExecutor {
    pub fn new(node: Arc<dyn ExecutableNode>, config: ExecutorConfig) -> Self {
        Self { node, config }
    }

    /// Run every item and collect the outputs in input order.
    ///
    /// # Errors
    /// Returns [`EngineError::ItemFailed`] for the first failing item when
    /// `continue_on_fail` is off.  Items after it are not executed.
    pub async fn run(
        &self,
        items: &[Item],
        credentials: Credentials,
    ) -> Result<ExecutionResult, EngineError> {
        let ctx = ExecutionContext::new(credentials);
        self.run_with_context(items, &ctx).await
    }

    #[instrument(skip_all, fields(execution_id = %ctx.execution_id, items = items.len()))]
    pub async fn run_with_context(
        &self,
        items: &[Item],
        ctx: &ExecutionContext,
    ) -> Result<ExecutionResult, EngineError> {
        let mut outputs = Vec::with_capacity(items.len());

        for (index, item) in items.iter().enumerate() {
            match self.node.execute(item, index, ctx).await {
                Ok(values) => {
                    info!(item = index, outputs = values.len(), "item succeeded");
                    outputs.extend(values.into_iter().map(|v| OutputItem::new(v, index)));
                }
                Err(err) if self.config.continue_on_fail => {
                    warn!(item = index, error = %err, "item failed, continuing");
                    outputs.push(OutputItem::error(err.to_string(), index));
                }
                Err(source) => {
                    warn!(item = index, error = %source, "item failed, aborting run");
                    return Err(EngineError::ItemFailed { index, source });
                }
            }
        }

        info!(outputs = outputs.len(), "execution finished");
        Ok(ExecutionResult {
            execution_id: ctx.execution_id,
            items: outputs,
        })
    }
}
