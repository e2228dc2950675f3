//! One module per resource.
//!
//! Each resource exposes three things that must stay in step:
//!
//! * a fieldless operation kind enum implementing [`OperationKind`], which
//!   is also the source of the operation selector in the catalog;
//! * a command enum implementing [`ResourceCommand`], holding the typed
//!   parameters of one invocation;
//! * `properties()`, the input fields shown for the resource.
//!
//! Both `parse` and `request` match exhaustively on the kind, so adding an
//! operation without wiring it through fails to compile.

use gateway::{RequestDescriptor, RequestFactory};

use crate::catalog::{OperationInfo, OptionValue, Property, Resource};
use crate::params::Parameters;
use crate::NodeError;

pub mod app;
pub mod chat;
pub mod device;
pub mod group;
pub mod message;
pub mod newsletter;
pub mod send;
pub mod user;

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

/// The closed set of operations of one resource.
pub trait OperationKind: Copy + Eq + std::fmt::Debug + Sized + 'static {
    const RESOURCE: Resource;
    /// Every kind, in catalog order.
    const ALL: &'static [Self];
    /// Preselected operation in the selector.
    const DEFAULT: Self;

    fn info(self) -> OperationInfo;

    fn value(self) -> &'static str {
        self.info().value
    }

    /// # Errors
    /// [`NodeError::UnknownOperation`] when `value` names no operation of
    /// this resource.
    fn from_value(value: &str) -> Result<Self, NodeError> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.value() == value)
            .ok_or_else(|| NodeError::UnknownOperation {
                resource: Self::RESOURCE.value().to_owned(),
                operation: value.to_owned(),
            })
    }
}

/// A fully-parsed invocation of one resource operation.
pub trait ResourceCommand: Sized {
    type Kind: OperationKind;

    /// Read the parameters `kind` needs.
    fn parse(kind: Self::Kind, params: &Parameters<'_>) -> Result<Self, NodeError>;

    fn kind(&self) -> Self::Kind;

    /// Build the request.  Infallible: all validation happens in `parse`.
    fn request(&self, api: &RequestFactory) -> RequestDescriptor;
}

// ---------------------------------------------------------------------------
// Catalog helpers
// ---------------------------------------------------------------------------

/// Operation records of `K`, in catalog order.
pub fn catalog_of<K: OperationKind>() -> Vec<OperationInfo> {
    K::ALL.iter().map(|kind| kind.info()).collect()
}

/// The `operation` selector shown for `K::RESOURCE`.
pub fn operation_selector<K: OperationKind>() -> Property {
    Property::options(
        "operation",
        "Operation",
        catalog_of::<K>().into_iter().map(OptionValue::from).collect(),
        K::DEFAULT.value(),
    )
    .no_data_expression()
    .show(K::RESOURCE, &[])
}

fn section<K: OperationKind>(fields: Vec<Property>) -> Vec<Property> {
    let mut properties = vec![operation_selector::<K>()];
    properties.extend(fields);
    properties
}

/// Every resource's operation selector followed by its fields.
pub fn all_properties() -> Vec<Property> {
    [
        section::<app::AppOperation>(app::properties()),
        section::<chat::ChatOperation>(chat::properties()),
        section::<device::DeviceOperation>(device::properties()),
        section::<group::GroupOperation>(group::properties()),
        section::<message::MessageOperation>(message::properties()),
        section::<newsletter::NewsletterOperation>(newsletter::properties()),
        section::<send::SendOperation>(send::properties()),
        section::<user::UserOperation>(user::properties()),
    ]
    .into_iter()
    .flatten()
    .collect()
}

// ---------------------------------------------------------------------------
// Test support
// ---------------------------------------------------------------------------
