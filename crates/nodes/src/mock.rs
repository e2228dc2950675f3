//! `MockNode` — a test double for `ExecutableNode`.
//!
//! Lets executor tests run without a gateway: the node answers with a fixed
//! value and can be told to fail on chosen item indices.

use async_trait::async_trait;
use gateway::GatewayError;
use serde_json::Value;
use std::sync::{Arc, Mutex};

use crate::item::Item;
use crate::node::into_output_values;
use crate::{ExecutableNode, ExecutionContext, NodeError};

/// Behaviour injected into `MockNode` at construction time.
pub enum MockBehaviour {
    /// Return this JSON value (arrays fan out like gateway responses do).
    ReturnValue(Value),
    /// Fail with a gateway status error on the listed item indices and
    /// return the value otherwise.
    FailOn {
        indices: Vec<usize>,
        status: u16,
        value: Value,
    },
    /// Fail every call with a configuration error.
    FailMissing(String),
}

/// A mock node that records every item it receives.
pub struct MockNode {
    pub behaviour: MockBehaviour,
    /// `(item_index, item)` pairs in call order.
    pub calls: Arc<Mutex<Vec<(usize, Item)>>>,
}

impl MockNode {
    fn with(behaviour: MockBehaviour) -> Self {
        Self {
            behaviour,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a mock that always succeeds with the given value.
    pub fn returning(value: Value) -> Self {
        Self::with(MockBehaviour::ReturnValue(value))
    }

    /// Create a mock that fails with `status` on the given item indices.
    pub fn failing_on(indices: &[usize], status: u16, value: Value) -> Self {
        Self::with(MockBehaviour::FailOn {
            indices: indices.to_vec(),
            status,
            value,
        })
    }

    /// Create a mock that always fails with a missing-parameter error.
    pub fn failing_missing(parameter: impl Into<String>) -> Self {
        Self::with(MockBehaviour::FailMissing(parameter.into()))
    }

    /// Number of items this node has executed.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Item indices seen so far, in call order.
    pub fn seen_indices(&self) -> Vec<usize> {
        self.calls.lock().unwrap().iter().map(|(i, _)| *i).collect()
    }
}

#[async_trait]
impl ExecutableNode for MockNode {
    async fn execute(
        &self,
        item: &Item,
        item_index: usize,
        _ctx: &ExecutionContext,
    ) -> Result<Vec<Value>, NodeError> {
        self.calls.lock().unwrap().push((item_index, item.clone()));

        match &self.behaviour {
            MockBehaviour::ReturnValue(v) => Ok(into_output_values(v.clone())),
            MockBehaviour::FailOn {
                indices,
                status,
                value,
            } => {
                if indices.contains(&item_index) {
                    Err(NodeError::Gateway(GatewayError::Status {
                        status: *status,
                        body: format!("item {item_index} rejected"),
                    }))
                } else {
                    Ok(into_output_values(value.clone()))
                }
            }
            MockBehaviour::FailMissing(name) => Err(NodeError::MissingParameter(name.clone())),
        }
    }
}
