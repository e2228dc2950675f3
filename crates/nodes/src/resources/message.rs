//! Actions on an already-sent message, addressed by chat and message id.
//!
//! Every operation posts to `/message/{messageId}/{action}` with the chat
//! (`phone`) in the body.

use gateway::{RequestDescriptor, RequestFactory};

use super::{OperationKind, ResourceCommand};
use crate::catalog::{OperationInfo, Property, Resource};
use crate::params::Parameters;
use crate::NodeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageOperation {
    DeleteMessage,
    ReactMessage,
    ReadMessage,
    RevokeMessage,
    StarMessage,
    UnstarMessage,
    UpdateMessage,
}

impl OperationKind for MessageOperation {
    const RESOURCE: Resource = Resource::Message;
    const ALL: &'static [Self] = &[
        Self::DeleteMessage,
        Self::ReactMessage,
        Self::ReadMessage,
        Self::RevokeMessage,
        Self::StarMessage,
        Self::UnstarMessage,
        Self::UpdateMessage,
    ];
    const DEFAULT: Self = Self::RevokeMessage;

    fn info(self) -> OperationInfo {
        match self {
            Self::DeleteMessage => OperationInfo::new(
                "deleteMessage",
                "Delete Message",
                Some("Delete a message"),
                "Delete a message",
            ),
            Self::ReactMessage => OperationInfo::new(
                "reactMessage",
                "React to Message",
                Some("React to a message"),
                "React to a message",
            ),
            Self::ReadMessage => OperationInfo::new(
                "readMessage",
                "Read Message",
                Some("Mark message as read"),
                "Mark message as read",
            ),
            Self::RevokeMessage => OperationInfo::new(
                "revokeMessage",
                "Revoke Message",
                Some("Revoke a message"),
                "Revoke a message",
            ),
            Self::StarMessage => OperationInfo::new(
                "starMessage",
                "Star Message",
                Some("Star a message"),
                "Star a message",
            ),
            Self::UnstarMessage => OperationInfo::new(
                "unstarMessage",
                "Unstar Message",
                Some("Unstar a message"),
                "Unstar a message",
            ),
            Self::UpdateMessage => OperationInfo::new(
                "updateMessage",
                "Update Message",
                Some("Update a message"),
                "Update a message",
            ),
        }
    }
}

/// What to do with the message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageAction {
    Delete,
    React { emoji: String },
    Read,
    Revoke,
    Star,
    Unstar,
    Update { message: String },
}

impl MessageAction {
    fn path_segment(&self) -> &'static str {
        match self {
            Self::Delete => "delete",
            Self::React { .. } => "reaction",
            Self::Read => "read",
            Self::Revoke => "revoke",
            Self::Star => "star",
            Self::Unstar => "unstar",
            Self::Update { .. } => "update",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageCommand {
    /// Phone number or group id of the chat holding the message.
    pub chat: String,
    pub message_id: String,
    pub action: MessageAction,
}

impl ResourceCommand for MessageCommand {
    type Kind = MessageOperation;

    fn parse(kind: MessageOperation, params: &Parameters<'_>) -> Result<Self, NodeError> {
        let action = match kind {
            MessageOperation::DeleteMessage => MessageAction::Delete,
            MessageOperation::ReactMessage => MessageAction::React {
                emoji: params.string("emoji")?,
            },
            MessageOperation::ReadMessage => MessageAction::Read,
            MessageOperation::RevokeMessage => MessageAction::Revoke,
            MessageOperation::StarMessage => MessageAction::Star,
            MessageOperation::UnstarMessage => MessageAction::Unstar,
            MessageOperation::UpdateMessage => MessageAction::Update {
                message: params.string("newMessage")?,
            },
        };

        Ok(Self {
            chat: params.string("phoneOrGroupId")?,
            message_id: params.path_segment("messageId")?,
            action,
        })
    }

    fn kind(&self) -> MessageOperation {
        match self.action {
            MessageAction::Delete => MessageOperation::DeleteMessage,
            MessageAction::React { .. } => MessageOperation::ReactMessage,
            MessageAction::Read => MessageOperation::ReadMessage,
            MessageAction::Revoke => MessageOperation::RevokeMessage,
            MessageAction::Star => MessageOperation::StarMessage,
            MessageAction::Unstar => MessageOperation::UnstarMessage,
            MessageAction::Update { .. } => MessageOperation::UpdateMessage,
        }
    }

    fn request(&self, api: &RequestFactory) -> RequestDescriptor {
        let url = api.url_from_segments(&["message", self.message_id.as_str(), self.action.path_segment()]);
        let request = RequestDescriptor::post(url).body_field("phone", self.chat.as_str());

        match &self.action {
            MessageAction::React { emoji } => request.body_field("emoji", emoji.as_str()),
            MessageAction::Update { message } => request.body_field("message", message.as_str()),
            _ => request,
        }
    }
}

pub fn properties() -> Vec<Property> {
    vec![
        Property::string("phoneOrGroupId", "Phone Number or Group ID")
            .required()
            .show(Resource::Message, &[])
            .description("Phone number (for private chat) or Group ID (for group chat)"),
        Property::string("messageId", "Message ID")
            .required()
            .show(Resource::Message, &[])
            .description("ID of the message to operate on"),
        Property::string("emoji", "Emoji")
            .default_value("👍")
            .show(Resource::Message, &["reactMessage"])
            .description("Emoji reaction to add"),
        Property::string("newMessage", "New Message")
            .required()
            .show(Resource::Message, &["updateMessage"])
            .description("The new content of the message"),
    ]
}
