//! `gateway` crate — everything needed to talk to a GOWA server.
//!
//! Provides the credential descriptor, the plain-value request descriptor
//! every operation produces, a request factory that owns base-URL handling,
//! and the authenticated transport.  No operation semantics live here.

pub mod error;
pub mod credentials;
pub mod request;
pub mod client;
pub mod mock;

pub use error::GatewayError;
pub use credentials::{credential_description, Credentials, CREDENTIAL_NAME, DEFAULT_HOST_URL, DEVICE_ID_HEADER};
pub use request::{BinaryPart, FormValue, Method, RequestDescriptor, RequestFactory, ResponseFormat};
pub use client::{GatewayClient, GatewayResponse, HttpGateway, HttpGatewayConfig};

#[cfg(test)]
mod client_tests;
