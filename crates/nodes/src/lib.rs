//! `nodes` crate — the GOWA node: operation catalog, typed per-resource
//! commands and the `ExecutableNode` implementation.
//!
//! The engine crate drives execution through the [`ExecutableNode`] trait
//! object; [`GowaNode`] is the real implementation and [`mock::MockNode`]
//! the test double.

pub mod catalog;
pub mod command;
pub mod error;
pub mod item;
pub mod mock;
pub mod node;
pub mod params;
pub mod resources;
pub mod traits;

pub use catalog::{node_description, NodeDescription, Resource};
pub use command::Command;
pub use error::NodeError;
pub use item::{BinaryData, Item};
pub use node::GowaNode;
pub use traits::{ExecutableNode, ExecutionContext};

#[cfg(test)]
mod dispatch_tests;
