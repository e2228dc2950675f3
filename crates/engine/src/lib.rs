//! `engine` crate — the per-item executor that drives a node over a batch
//! of input items.

pub mod models;
pub mod error;
pub mod executor;

pub use models::{ExecutionResult, OutputItem};
pub use error::EngineError;
pub use executor::{ExecutorConfig, ItemExecutor};
