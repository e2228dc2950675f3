//! Resource dispatch: one variant per resource, each wrapping that
//! resource's typed command.

use gateway::{RequestDescriptor, RequestFactory};

use crate::catalog::Resource;
use crate::item::Item;
use crate::params::Parameters;
use crate::resources::app::AppCommand;
use crate::resources::chat::ChatCommand;
use crate::resources::device::DeviceCommand;
use crate::resources::group::GroupCommand;
use crate::resources::message::MessageCommand;
use crate::resources::newsletter::NewsletterCommand;
use crate::resources::send::SendCommand;
use crate::resources::user::UserCommand;
use crate::resources::{OperationKind, ResourceCommand};
use crate::NodeError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    App(AppCommand),
    Chat(ChatCommand),
    Device(DeviceCommand),
    Group(GroupCommand),
    Message(MessageCommand),
    Newsletter(NewsletterCommand),
    Send(SendCommand),
    User(UserCommand),
}

fn parse_as<C: ResourceCommand>(operation: &str, item: &Item) -> Result<C, NodeError> {
    let kind = C::Kind::from_value(operation)?;
    let params = Parameters::scoped(item, C::Kind::RESOURCE, kind.value());
    C::parse(kind, &params)
}

impl Command {
    /// Read the parameters of `resource`/`operation` from `item`.
    ///
    /// # Errors
    /// Unknown operations and missing or malformed parameters, all raised
    /// before any request is built.
    pub fn parse(resource: Resource, operation: &str, item: &Item) -> Result<Self, NodeError> {
        Ok(match resource {
            Resource::App => Self::App(parse_as(operation, item)?),
            Resource::Chat => Self::Chat(parse_as(operation, item)?),
            Resource::Device => Self::Device(parse_as(operation, item)?),
            Resource::Group => Self::Group(parse_as(operation, item)?),
            Resource::Message => Self::Message(parse_as(operation, item)?),
            Resource::Newsletter => Self::Newsletter(parse_as(operation, item)?),
            Resource::Send => Self::Send(parse_as(operation, item)?),
            Resource::User => Self::User(parse_as(operation, item)?),
        })
    }

    pub fn resource(&self) -> Resource {
        match self {
            Self::App(_) => Resource::App,
            Self::Chat(_) => Resource::Chat,
            Self::Device(_) => Resource::Device,
            Self::Group(_) => Resource::Group,
            Self::Message(_) => Resource::Message,
            Self::Newsletter(_) => Resource::Newsletter,
            Self::Send(_) => Resource::Send,
            Self::User(_) => Resource::User,
        }
    }

    /// Catalog value of the operation, e.g. `sendText`.
    pub fn operation(&self) -> &'static str {
        match self {
            Self::App(c) => c.kind().value(),
            Self::Chat(c) => c.kind().value(),
            Self::Device(c) => c.kind().value(),
            Self::Group(c) => c.kind().value(),
            Self::Message(c) => c.kind().value(),
            Self::Newsletter(c) => c.kind().value(),
            Self::Send(c) => c.kind().value(),
            Self::User(c) => c.kind().value(),
        }
    }

    pub fn request(&self, api: &RequestFactory) -> RequestDescriptor {
        match self {
            Self::App(c) => c.request(api),
            Self::Chat(c) => c.request(api),
            Self::Device(c) => c.request(api),
            Self::Group(c) => c.request(api),
            Self::Message(c) => c.request(api),
            Self::Newsletter(c) => c.request(api),
            Self::Send(c) => c.request(api),
            Self::User(c) => c.request(api),
        }
    }

    /// Cleaned path of a media download, if this is one.
    pub fn media_path(&self) -> Option<&str> {
        match self {
            Self::App(c) => c.media_path(),
            _ => None,
        }
    }
}
