//! Chat listing, history, pinning and disappearing timers.

use gateway::{RequestDescriptor, RequestFactory};
use serde_json::Value;

use super::{OperationKind, ResourceCommand};
use crate::catalog::{OperationInfo, OptionValue, Property, Resource};
use crate::params::Parameters;
use crate::NodeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatOperation {
    ListChats,
    GetChatMessages,
    PinChat,
    SetDisappearingTimer,
}

impl OperationKind for ChatOperation {
    const RESOURCE: Resource = Resource::Chat;
    const ALL: &'static [Self] = &[
        Self::ListChats,
        Self::GetChatMessages,
        Self::PinChat,
        Self::SetDisappearingTimer,
    ];
    const DEFAULT: Self = Self::ListChats;

    fn info(self) -> OperationInfo {
        match self {
            Self::ListChats => OperationInfo::new(
                "listChats",
                "List Chats",
                Some("Get list of chats"),
                "Get list of chats",
            ),
            Self::GetChatMessages => OperationInfo::new(
                "getChatMessages",
                "Get Chat Messages",
                Some("Get messages from a specific chat"),
                "Get messages from a specific chat",
            ),
            Self::PinChat => OperationInfo::new(
                "pinChat",
                "Pin Chat",
                Some("Pin or unpin a chat"),
                "Pin or unpin a chat",
            ),
            Self::SetDisappearingTimer => OperationInfo::new(
                "setDisappearingTimer",
                "Set Disappearing Timer",
                Some("Set or disable disappearing messages for a chat"),
                "Set or disable disappearing messages for a chat",
            ),
        }
    }
}

/// The timer values the gateway accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisappearingTimer {
    Off,
    Day,
    Week,
    Quarter,
}

impl DisappearingTimer {
    pub fn seconds(self) -> u64 {
        match self {
            Self::Off => 0,
            Self::Day => 86_400,
            Self::Week => 604_800,
            Self::Quarter => 7_776_000,
        }
    }

    pub fn from_seconds(seconds: u64) -> Result<Self, NodeError> {
        match seconds {
            0 => Ok(Self::Off),
            86_400 => Ok(Self::Day),
            604_800 => Ok(Self::Week),
            7_776_000 => Ok(Self::Quarter),
            other => Err(NodeError::invalid(
                "timerSeconds",
                format!("unsupported timer {other}; expected 0, 86400, 604800 or 7776000"),
            )),
        }
    }
}

/// Paging window shared by the listing operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: u64,
    pub offset: u64,
}

impl Page {
    fn parse(params: &Parameters<'_>) -> Result<Self, NodeError> {
        let limit = params.unsigned("limit")?;
        if limit == 0 {
            return Err(NodeError::invalid("limit", "must be at least 1"));
        }
        Ok(Self {
            limit,
            offset: params.unsigned("offset")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageFilter {
    pub start_time: String,
    pub end_time: String,
    pub media_only: bool,
    pub search: String,
    /// `None` returns messages from both sides.
    pub is_from_me: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    List {
        page: Page,
        search: String,
        has_media: bool,
    },
    Messages {
        chat_jid: String,
        page: Page,
        filter: MessageFilter,
    },
    Pin {
        chat_jid: String,
        pinned: bool,
    },
    SetDisappearing {
        chat_jid: String,
        timer: DisappearingTimer,
    },
}

/// Empty string for unset optional text filters.
fn text(params: &Parameters<'_>, name: &str) -> Result<String, NodeError> {
    Ok(params.optional_string(name)?.unwrap_or_default())
}

impl ResourceCommand for ChatCommand {
    type Kind = ChatOperation;

    fn parse(kind: ChatOperation, params: &Parameters<'_>) -> Result<Self, NodeError> {
        Ok(match kind {
            ChatOperation::ListChats => Self::List {
                page: Page::parse(params)?,
                search: text(params, "search")?,
                has_media: params.flag("hasMedia")?,
            },
            ChatOperation::GetChatMessages => Self::Messages {
                chat_jid: params.path_segment("chatJid")?,
                page: Page::parse(params)?,
                filter: MessageFilter {
                    start_time: text(params, "startTime")?,
                    end_time: text(params, "endTime")?,
                    media_only: params.flag("mediaOnly")?,
                    search: text(params, "search")?,
                    is_from_me: params.tri_state("isFromMe")?,
                },
            },
            ChatOperation::PinChat => Self::Pin {
                chat_jid: params.path_segment("chatJid")?,
                pinned: params.boolean("pinned")?,
            },
            ChatOperation::SetDisappearingTimer => Self::SetDisappearing {
                chat_jid: params.path_segment("chatJid")?,
                timer: DisappearingTimer::from_seconds(params.unsigned("timerSeconds")?)?,
            },
        })
    }

    fn kind(&self) -> ChatOperation {
        match self {
            Self::List { .. } => ChatOperation::ListChats,
            Self::Messages { .. } => ChatOperation::GetChatMessages,
            Self::Pin { .. } => ChatOperation::PinChat,
            Self::SetDisappearing { .. } => ChatOperation::SetDisappearingTimer,
        }
    }

    fn request(&self, api: &RequestFactory) -> RequestDescriptor {
        match self {
            Self::List {
                page,
                search,
                has_media,
            } => api
                .get("/chats")
                .query_param("limit", page.limit)
                .query_param("offset", page.offset)
                .query_param("search", search.as_str())
                .query_param("has_media", *has_media),
            Self::Messages {
                chat_jid,
                page,
                filter,
            } => RequestDescriptor::get(api.url_from_segments(&["chat", chat_jid.as_str(), "messages"]))
                .query_param("limit", page.limit)
                .query_param("offset", page.offset)
                .query_param("start_time", filter.start_time.as_str())
                .query_param("end_time", filter.end_time.as_str())
                .query_param("media_only", filter.media_only)
                .query_param("search", filter.search.as_str())
                .query_param_opt("is_from_me", filter.is_from_me),
            Self::Pin { chat_jid, pinned } => {
                RequestDescriptor::post(api.url_from_segments(&["chat", chat_jid.as_str(), "pin"]))
                    .body_field("pinned", *pinned)
            }
            Self::SetDisappearing { chat_jid, timer } => {
                RequestDescriptor::post(api.url_from_segments(&["chat", chat_jid.as_str(), "disappearing"]))
                    .body_field("timer_seconds", timer.seconds())
            }
        }
    }
}

pub fn properties() -> Vec<Property> {
    vec![
        Property::number("limit", "Limit", 50)
            .min_value(1)
            .show(Resource::Chat, &["listChats", "getChatMessages"])
            .description("Max number of results to return"),
        Property::number("offset", "Offset", 0)
            .show(Resource::Chat, &["listChats", "getChatMessages"])
            .description("Number of chats to skip (for pagination)"),
        Property::string("search", "Search")
            .show(Resource::Chat, &["listChats"])
            .description("Search chats by name"),
        Property::boolean("hasMedia", "Has Media", false)
            .show(Resource::Chat, &["listChats"])
            .description("Whether to filter chats that contain media messages"),
        Property::string("chatJid", "Chat JID")
            .required()
            .show(Resource::Chat, &["getChatMessages", "pinChat", "setDisappearingTimer"])
            .placeholder("6289685028129@s.whatsapp.net")
            .description(
                "Chat JID (e.g., phone@s.whatsapp.net for individual or groupid@g.us for group)",
            ),
        Property::string("startTime", "Start Time")
            .show(Resource::Chat, &["getChatMessages"])
            .description("Filter messages from this timestamp (ISO 8601 format)"),
        Property::string("endTime", "End Time")
            .show(Resource::Chat, &["getChatMessages"])
            .description("Filter messages until this timestamp (ISO 8601 format)"),
        Property::boolean("mediaOnly", "Media Only", false)
            .show(Resource::Chat, &["getChatMessages"])
            .description("Whether to only return messages with media content"),
        Property::options(
            "isFromMe",
            "Is From Me",
            vec![
                OptionValue::new("All Messages", ""),
                OptionValue::new("Messages Sent by Me", true),
                OptionValue::new("Messages Received", false),
            ],
            "",
        )
        .show(Resource::Chat, &["getChatMessages"])
        .description(
            "Filter messages by sender (true for messages sent by you, false for received \
             messages). When both media_only=true and isFromMe=false are provided, media_only \
             takes precedence and will return all media messages regardless of sender.",
        ),
        Property::string("search", "Search")
            .show(Resource::Chat, &["getChatMessages"])
            .description("Search messages by content text"),
        Property::boolean("pinned", "Pinned", true)
            .required()
            .show(Resource::Chat, &["pinChat"])
            .description("Whether to pin (true) or unpin (false) the chat"),
        Property::options(
            "timerSeconds",
            "Timer",
            vec![
                OptionValue::new("Off", 0).with_description("Disable disappearing messages"),
                OptionValue::new("24 Hours", 86_400),
                OptionValue::new("7 Days", 604_800),
                OptionValue::new("90 Days", 7_776_000),
            ],
            Value::from(86_400),
        )
        .required()
        .show(Resource::Chat, &["setDisappearingTimer"])
        .description("Timer duration for disappearing messages"),
    ]
}
