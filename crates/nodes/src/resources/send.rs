//! `send` — outgoing messages, media and presence.
//!
//! Media operations either reference a URL (JSON body) or upload an item's
//! binary property (multipart form).  The same scalar fields are written to
//! whichever payload is in use; boolean flags become `true` in JSON and the
//! text `"true"` in forms, and are omitted entirely when unset.

use gateway::{BinaryPart, RequestDescriptor, RequestFactory};

use super::{OperationKind, ResourceCommand};
use crate::catalog::{OperationInfo, OptionValue, Property, Resource};
use crate::params::Parameters;
use crate::NodeError;

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOperation {
    SendAudio,
    SendChatPresence,
    SendContact,
    SendFile,
    SendImage,
    SendLink,
    SendLocation,
    SendPoll,
    SendPresence,
    SendText,
    SendVideo,
}

impl OperationKind for SendOperation {
    const RESOURCE: Resource = Resource::Send;
    const ALL: &'static [Self] = &[
        Self::SendAudio,
        Self::SendChatPresence,
        Self::SendContact,
        Self::SendFile,
        Self::SendImage,
        Self::SendLink,
        Self::SendLocation,
        Self::SendPoll,
        Self::SendPresence,
        Self::SendText,
        Self::SendVideo,
    ];
    const DEFAULT: Self = Self::SendText;

    fn info(self) -> OperationInfo {
        match self {
            Self::SendAudio => OperationInfo::new(
                "sendAudio",
                "Send Audio",
                Some("Send an audio file"),
                "Send an audio file",
            ),
            Self::SendChatPresence => OperationInfo::new(
                "sendChatPresence",
                "Send Chat Presence",
                Some("Send typing indicator to start or stop showing that you are composing a message"),
                "Send chat presence typing indicator",
            ),
            Self::SendContact => OperationInfo::new(
                "sendContact",
                "Send Contact",
                Some("Send a contact"),
                "Send a contact",
            ),
            Self::SendFile => OperationInfo::new(
                "sendFile",
                "Send File",
                Some("Send a document file"),
                "Send a file",
            ),
            Self::SendImage => OperationInfo::new(
                "sendImage",
                "Send Image",
                Some("Send an image"),
                "Send an image",
            ),
            Self::SendLink => OperationInfo::new(
                "sendLink",
                "Send Link",
                Some("Send a link"),
                "Send a link",
            ),
            Self::SendLocation => OperationInfo::new(
                "sendLocation",
                "Send Location",
                Some("Send a location"),
                "Send a location",
            ),
            Self::SendPoll => OperationInfo::new(
                "sendPoll",
                "Send Poll",
                Some("Send a poll"),
                "Send a poll",
            ),
            Self::SendPresence => OperationInfo::new(
                "sendPresence",
                "Send Presence",
                Some("Send presence status"),
                "Send presence status",
            ),
            Self::SendText => OperationInfo::new(
                "sendText",
                "Send Text",
                Some("Send a text message"),
                "Send a text message",
            ),
            Self::SendVideo => OperationInfo::new(
                "sendVideo",
                "Send Video",
                Some("Send a video"),
                "Send a video",
            ),
        }
    }
}

/// Operations that deliver a message into a chat and therefore accept a
/// reply target and a disappearing duration.
const MESSAGE_OPERATIONS: &[&str] = &[
    "sendText",
    "sendLink",
    "sendImage",
    "sendAudio",
    "sendVideo",
    "sendFile",
    "sendContact",
    "sendLocation",
    "sendPoll",
];

// ---------------------------------------------------------------------------
// Typed values
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaSource {
    Url(String),
    File(BinaryPart),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenceType {
    Available,
    Unavailable,
}

impl PresenceType {
    fn parse(value: &str) -> Result<Self, NodeError> {
        match value {
            "available" => Ok(Self::Available),
            "unavailable" => Ok(Self::Unavailable),
            other => Err(NodeError::invalid(
                "presenceType",
                format!("expected 'available' or 'unavailable', got '{other}'"),
            )),
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Unavailable => "unavailable",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatPresenceAction {
    Start,
    Stop,
}

impl ChatPresenceAction {
    fn parse(value: &str) -> Result<Self, NodeError> {
        match value {
            "start" => Ok(Self::Start),
            "stop" => Ok(Self::Stop),
            other => Err(NodeError::invalid(
                "chatPresenceAction",
                format!("expected 'start' or 'stop', got '{other}'"),
            )),
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Stop => "stop",
        }
    }
}

/// Addressing and delivery options shared by message-bearing operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub phone: String,
    pub reply_message_id: Option<String>,
    /// Disappearing duration in seconds; `None` when zero or unset.
    pub duration: Option<u64>,
    pub is_forwarded: bool,
}

impl Envelope {
    fn parse(params: &Parameters<'_>) -> Result<Self, NodeError> {
        Ok(Self {
            phone: params.string("phoneNumber")?,
            reply_message_id: params.optional_string("replyMessageId")?,
            duration: params.optional_unsigned("duration")?.filter(|d| *d > 0),
            is_forwarded: params.flag("isForwarded")?,
        })
    }

    fn write(&self, out: Outgoing) -> Outgoing {
        out.text("phone", &self.phone)
            .text_opt("reply_message_id", self.reply_message_id.as_deref())
            .number_opt("duration", self.duration)
            .flag("is_forwarded", self.is_forwarded)
    }
}

// ---------------------------------------------------------------------------
// Command
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendCommand {
    Text {
        envelope: Envelope,
        message: String,
    },
    Link {
        envelope: Envelope,
        link: String,
        caption: Option<String>,
    },
    Image {
        envelope: Envelope,
        source: MediaSource,
        caption: Option<String>,
        view_once: bool,
        compress: bool,
    },
    Audio {
        envelope: Envelope,
        source: MediaSource,
    },
    Video {
        envelope: Envelope,
        source: MediaSource,
        caption: Option<String>,
        view_once: bool,
        compress: bool,
    },
    File {
        envelope: Envelope,
        file: BinaryPart,
        caption: Option<String>,
    },
    Contact {
        envelope: Envelope,
        name: String,
        phone: String,
    },
    Location {
        envelope: Envelope,
        latitude: String,
        longitude: String,
    },
    Poll {
        envelope: Envelope,
        question: String,
        options: Vec<String>,
        max_answer: u64,
    },
    Presence {
        presence: PresenceType,
        is_forwarded: bool,
    },
    ChatPresence {
        phone: String,
        action: ChatPresenceAction,
        is_forwarded: bool,
    },
}

fn media_source(
    params: &Parameters<'_>,
    source: &str,
    url: &str,
    file: &str,
) -> Result<MediaSource, NodeError> {
    match params.string(source)?.as_str() {
        "file" => Ok(MediaSource::File(params.binary(file)?)),
        "url" => Ok(MediaSource::Url(params.string(url)?)),
        other => Err(NodeError::invalid(
            source,
            format!("expected 'file' or 'url', got '{other}'"),
        )),
    }
}

impl ResourceCommand for SendCommand {
    type Kind = SendOperation;

    fn parse(kind: SendOperation, params: &Parameters<'_>) -> Result<Self, NodeError> {
        Ok(match kind {
            SendOperation::SendText => Self::Text {
                envelope: Envelope::parse(params)?,
                message: params.string("message")?,
            },
            SendOperation::SendLink => Self::Link {
                envelope: Envelope::parse(params)?,
                link: params.string("link")?,
                caption: params.optional_string("caption")?,
            },
            SendOperation::SendImage => Self::Image {
                envelope: Envelope::parse(params)?,
                source: media_source(params, "imageSource", "imageUrl", "imageFile")?,
                caption: params.optional_string("caption")?,
                view_once: params.flag("viewOnce")?,
                compress: params.flag("compress")?,
            },
            SendOperation::SendAudio => Self::Audio {
                envelope: Envelope::parse(params)?,
                source: media_source(params, "audioSource", "audioUrl", "audioFile")?,
            },
            SendOperation::SendVideo => Self::Video {
                envelope: Envelope::parse(params)?,
                source: media_source(params, "videoSource", "videoUrl", "videoFile")?,
                caption: params.optional_string("caption")?,
                view_once: params.flag("viewOnce")?,
                compress: params.flag("compress")?,
            },
            SendOperation::SendFile => Self::File {
                envelope: Envelope::parse(params)?,
                file: params.binary("documentFile")?,
                caption: params.optional_string("caption")?,
            },
            SendOperation::SendContact => Self::Contact {
                envelope: Envelope::parse(params)?,
                name: params.string("contactName")?,
                phone: params.string("contactPhone")?,
            },
            SendOperation::SendLocation => Self::Location {
                envelope: Envelope::parse(params)?,
                latitude: params.string("latitude")?,
                longitude: params.string("longitude")?,
            },
            SendOperation::SendPoll => {
                let options = params.list("pollOptions")?;
                if options.is_empty() {
                    return Err(NodeError::invalid("pollOptions", "at least one option is required"));
                }
                Self::Poll {
                    envelope: Envelope::parse(params)?,
                    question: params.string("pollQuestion")?,
                    options,
                    max_answer: params.unsigned("maxAnswer")?.max(1),
                }
            }
            SendOperation::SendPresence => Self::Presence {
                presence: PresenceType::parse(&params.string("presenceType")?)?,
                is_forwarded: params.flag("isForwarded")?,
            },
            SendOperation::SendChatPresence => Self::ChatPresence {
                phone: params.string("phoneNumber")?,
                action: ChatPresenceAction::parse(&params.string("chatPresenceAction")?)?,
                is_forwarded: params.flag("isForwarded")?,
            },
        })
    }

    fn kind(&self) -> SendOperation {
        match self {
            Self::Text { .. } => SendOperation::SendText,
            Self::Link { .. } => SendOperation::SendLink,
            Self::Image { .. } => SendOperation::SendImage,
            Self::Audio { .. } => SendOperation::SendAudio,
            Self::Video { .. } => SendOperation::SendVideo,
            Self::File { .. } => SendOperation::SendFile,
            Self::Contact { .. } => SendOperation::SendContact,
            Self::Location { .. } => SendOperation::SendLocation,
            Self::Poll { .. } => SendOperation::SendPoll,
            Self::Presence { .. } => SendOperation::SendPresence,
            Self::ChatPresence { .. } => SendOperation::SendChatPresence,
        }
    }

    fn request(&self, api: &RequestFactory) -> RequestDescriptor {
        match self {
            Self::Text { envelope, message } => envelope
                .write(Outgoing::json(api.post("/send/message")))
                .text("message", message)
                .finish(),
            Self::Link {
                envelope,
                link,
                caption,
            } => envelope
                .write(Outgoing::json(api.post("/send/link")))
                .text("link", link)
                .text_opt("caption", caption.as_deref())
                .finish(),
            Self::Image {
                envelope,
                source,
                caption,
                view_once,
                compress,
            } => media(api.post("/send/image"), envelope, source, "image_url", "image")
                .text_opt("caption", caption.as_deref())
                .flag("view_once", *view_once)
                .flag("compress", *compress)
                .finish(),
            Self::Audio { envelope, source } => {
                media(api.post("/send/audio"), envelope, source, "audio_url", "audio").finish()
            }
            Self::Video {
                envelope,
                source,
                caption,
                view_once,
                compress,
            } => media(api.post("/send/video"), envelope, source, "video_url", "video")
                .text_opt("caption", caption.as_deref())
                .flag("view_once", *view_once)
                .flag("compress", *compress)
                .finish(),
            Self::File {
                envelope,
                file,
                caption,
            } => envelope
                .write(Outgoing::form(api.post("/send/file")))
                .file("file", file)
                .text_opt("caption", caption.as_deref())
                .finish(),
            Self::Contact {
                envelope,
                name,
                phone,
            } => envelope
                .write(Outgoing::json(api.post("/send/contact")))
                .text("contact_name", name)
                .text("contact_phone", phone)
                .finish(),
            Self::Location {
                envelope,
                latitude,
                longitude,
            } => envelope
                .write(Outgoing::json(api.post("/send/location")))
                .text("latitude", latitude)
                .text("longitude", longitude)
                .finish(),
            Self::Poll {
                envelope,
                question,
                options,
                max_answer,
            } => {
                let request = envelope
                    .write(Outgoing::json(api.post("/send/poll")))
                    .text("question", question)
                    .finish();
                request
                    .body_field("options", options.clone())
                    .body_field("max_answer", *max_answer)
            }
            Self::Presence {
                presence,
                is_forwarded,
            } => Outgoing::json(api.post("/send/presence"))
                .text("type", presence.as_str())
                .flag("is_forwarded", *is_forwarded)
                .finish(),
            Self::ChatPresence {
                phone,
                action,
                is_forwarded,
            } => Outgoing::json(api.post("/send/chat-presence"))
                .text("phone", phone)
                .text("action", action.as_str())
                .flag("is_forwarded", *is_forwarded)
                .finish(),
        }
    }
}

fn media(
    request: RequestDescriptor,
    envelope: &Envelope,
    source: &MediaSource,
    url_field: &str,
    file_field: &str,
) -> Outgoing {
    match source {
        MediaSource::Url(url) => envelope.write(Outgoing::json(request)).text(url_field, url),
        MediaSource::File(part) => envelope.write(Outgoing::form(request)).file(file_field, part),
    }
}

// ---------------------------------------------------------------------------
// Payload writer
// ---------------------------------------------------------------------------

/// Writes scalar fields into either a JSON body or a multipart form.
struct Outgoing {
    request: RequestDescriptor,
    multipart: bool,
}

impl Outgoing {
    fn json(request: RequestDescriptor) -> Self {
        Self {
            request: request.empty_body(),
            multipart: false,
        }
    }

    fn form(request: RequestDescriptor) -> Self {
        Self {
            request,
            multipart: true,
        }
    }

    fn text(mut self, key: &str, value: &str) -> Self {
        self.request = if self.multipart {
            self.request.form_text(key, value)
        } else {
            self.request.body_field(key, value)
        };
        self
    }

    fn text_opt(self, key: &str, value: Option<&str>) -> Self {
        match value {
            Some(value) => self.text(key, value),
            None => self,
        }
    }

    fn number_opt(mut self, key: &str, value: Option<u64>) -> Self {
        let Some(value) = value else { return self };
        self.request = if self.multipart {
            self.request.form_text(key, value.to_string())
        } else {
            self.request.body_field(key, value)
        };
        self
    }

    /// Written only when set.
    fn flag(mut self, key: &str, set: bool) -> Self {
        if !set {
            return self;
        }
        self.request = if self.multipart {
            self.request.form_text(key, "true")
        } else {
            self.request.body_field(key, true)
        };
        self
    }

    fn file(mut self, key: &str, part: &BinaryPart) -> Self {
        self.request = self.request.form_file(key, part.clone());
        self
    }

    fn finish(self) -> RequestDescriptor {
        self.request
    }
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

fn source_options(file_description: &'static str, url_name: &'static str, url_description: &'static str) -> Vec<OptionValue> {
    vec![
        OptionValue::new("File Upload", "file").with_description(file_description),
        OptionValue::new(url_name, "url").with_description(url_description),
    ]
}

pub fn properties() -> Vec<Property> {
    let mut with_phone: Vec<&'static str> = MESSAGE_OPERATIONS.to_vec();
    with_phone.push("sendChatPresence");

    vec![
        Property::string("phoneNumber", "Phone or Group ID")
            .required()
            .show(Resource::Send, &with_phone)
            .placeholder("628123456789")
            .description("Phone number with country code or Group ID"),
        Property::string("message", "Message")
            .required()
            .show(Resource::Send, &["sendText"])
            .description("Text message to send"),
        Property::string("link", "Link")
            .required()
            .show(Resource::Send, &["sendLink"])
            .placeholder("https://example.com")
            .description("URL link to send"),
        Property::options(
            "presenceType",
            "Presence Type",
            vec![
                OptionValue::new("Available", "available"),
                OptionValue::new("Unavailable", "unavailable"),
            ],
            "available",
        )
        .required()
        .show(Resource::Send, &["sendPresence"])
        .description("Presence status to send"),
        Property::options(
            "chatPresenceAction",
            "Chat Presence Action",
            vec![
                OptionValue::new("Start Typing", "start")
                    .with_description("Start showing typing indicator"),
                OptionValue::new("Stop Typing", "stop")
                    .with_description("Stop showing typing indicator"),
            ],
            "start",
        )
        .required()
        .show(Resource::Send, &["sendChatPresence"]),
        // Image
        Property::options(
            "imageSource",
            "Image Source",
            source_options(
                "Upload image file from binary data",
                "Image URL",
                "Send image from URL",
            ),
            "url",
        )
        .required()
        .show(Resource::Send, &["sendImage"])
        .description("Choose whether to upload a file or use an image URL"),
        Property::string("imageFile", "Image File Property")
            .required()
            .default_value("data")
            .show(Resource::Send, &["sendImage"])
            .show_when("imageSource", &["file"])
            .description("Name of the binary property containing the image file"),
        Property::string("imageUrl", "Image URL")
            .required()
            .show(Resource::Send, &["sendImage"])
            .show_when("imageSource", &["url"])
            .placeholder("https://example.com/image.jpg")
            .description("URL of the image to send"),
        // Audio
        Property::options(
            "audioSource",
            "Audio Source",
            source_options(
                "Upload audio file from binary data",
                "Audio URL",
                "Send audio from URL",
            ),
            "url",
        )
        .required()
        .show(Resource::Send, &["sendAudio"])
        .description("Choose whether to upload a file or use an audio URL"),
        Property::string("audioFile", "Audio File Property")
            .required()
            .default_value("data")
            .show(Resource::Send, &["sendAudio"])
            .show_when("audioSource", &["file"])
            .description("Name of the binary property containing the audio file"),
        Property::string("audioUrl", "Audio URL")
            .required()
            .show(Resource::Send, &["sendAudio"])
            .show_when("audioSource", &["url"])
            .placeholder("https://example.com/audio.mp3")
            .description("URL of the audio to send"),
        // Video
        Property::options(
            "videoSource",
            "Video Source",
            source_options(
                "Upload video file from binary data",
                "Video URL",
                "Send video from URL",
            ),
            "url",
        )
        .required()
        .show(Resource::Send, &["sendVideo"])
        .description("Choose whether to upload a file or use a video URL"),
        Property::string("videoFile", "Video File Property")
            .required()
            .default_value("data")
            .show(Resource::Send, &["sendVideo"])
            .show_when("videoSource", &["file"])
            .description("Name of the binary property containing the video file"),
        Property::string("videoUrl", "Video URL")
            .required()
            .show(Resource::Send, &["sendVideo"])
            .show_when("videoSource", &["url"])
            .placeholder("https://example.com/video.mp4")
            .description("URL of the video to send"),
        // Document
        Property::string("documentFile", "File Property")
            .required()
            .default_value("data")
            .show(Resource::Send, &["sendFile"])
            .description("Name of the binary property containing the file to send"),
        Property::string("caption", "Caption")
            .show(Resource::Send, &["sendImage", "sendLink", "sendVideo", "sendFile"])
            .description("Caption for the media or link"),
        // Contact
        Property::string("contactName", "Contact Name")
            .required()
            .show(Resource::Send, &["sendContact"])
            .description("Name of the contact to send"),
        Property::string("contactPhone", "Contact Phone")
            .required()
            .show(Resource::Send, &["sendContact"])
            .description("Phone number of the contact to send"),
        // Location
        Property::string("latitude", "Latitude")
            .required()
            .show(Resource::Send, &["sendLocation"])
            .placeholder("-7.797068")
            .description("Latitude coordinate"),
        Property::string("longitude", "Longitude")
            .required()
            .show(Resource::Send, &["sendLocation"])
            .placeholder("110.370529")
            .description("Longitude coordinate"),
        // Poll
        Property::string("pollQuestion", "Poll Question")
            .required()
            .show(Resource::Send, &["sendPoll"])
            .description("Question for the poll"),
        Property::string("pollOptions", "Poll Options")
            .required()
            .show(Resource::Send, &["sendPoll"])
            .placeholder("Option 1, Option 2, Option 3")
            .description("Poll options separated by commas"),
        Property::number("maxAnswer", "Max Answers", 1)
            .min_value(1)
            .show(Resource::Send, &["sendPoll"])
            .description("Maximum number of options a participant may pick"),
        // Delivery options
        Property::string("replyMessageId", "Reply to Message ID")
            .show(Resource::Send, MESSAGE_OPERATIONS)
            .description("Message ID to reply to"),
        Property::number("duration", "Disappearing Duration", 0)
            .min_value(0)
            .show(Resource::Send, MESSAGE_OPERATIONS)
            .description("Seconds until the message disappears (0 keeps the chat setting)"),
        Property::boolean("isForwarded", "Is Forwarded", false)
            .show(Resource::Send, &[])
            .description("Whether this is a forwarded message"),
        Property::boolean("viewOnce", "View Once", false)
            .show(Resource::Send, &["sendImage", "sendVideo"])
            .description("Whether the media should be viewed only once"),
        Property::boolean("compress", "Compress", false)
            .show(Resource::Send, &["sendImage", "sendVideo"])
            .description("Whether to compress the media"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{BinaryData, Item};
    use crate::resources::testing::{body, build, build_item};
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use serde_json::json;

    fn png(item: Item, property: &str) -> Item {
        item.with_binary(
            property,
            BinaryData {
                data: STANDARD.encode(b"\x89PNG"),
                mime_type: "image/png".into(),
                file_name: Some("pic.png".into()),
            },
        )
    }

    #[test]
    fn text_body_has_only_phone_and_message() {
        let request = build::<SendCommand>(
            "sendText",
            json!({ "phoneNumber": "628123456789", "message": "hello" }),
        )
        .unwrap();
        assert_eq!(request.url, "http://localhost:3000/send/message");
        assert_eq!(body(&request), json!({ "phone": "628123456789", "message": "hello" }));
    }

    #[test]
    fn reply_duration_and_forward_flag_are_included_when_set() {
        let request = build::<SendCommand>(
            "sendText",
            json!({
                "phoneNumber": "628123456789",
                "message": "hello",
                "replyMessageId": "3EB0",
                "duration": 86400,
                "isForwarded": true,
            }),
        )
        .unwrap();
        assert_eq!(
            body(&request),
            json!({
                "phone": "628123456789",
                "message": "hello",
                "reply_message_id": "3EB0",
                "duration": 86400,
                "is_forwarded": true,
            })
        );
    }

    #[test]
    fn empty_duration_is_left_out() {
        let request = build::<SendCommand>(
            "sendText",
            json!({ "phoneNumber": "628123456789", "message": "hello", "duration": "" }),
        )
        .unwrap();
        assert_eq!(body(&request), json!({ "phone": "628123456789", "message": "hello" }));
    }

    #[test]
    fn poll_options_are_split_and_trimmed() {
        let request = build::<SendCommand>(
            "sendPoll",
            json!({
                "phoneNumber": "628123456789",
                "pollQuestion": "Lunch?",
                "pollOptions": "A, B ,C",
            }),
        )
        .unwrap();
        assert_eq!(request.url, "http://localhost:3000/send/poll");
        let body = body(&request);
        assert_eq!(body["options"], json!(["A", "B", "C"]));
        assert_eq!(body["question"], "Lunch?");
        assert_eq!(body["max_answer"], 1);
    }

    #[test]
    fn poll_without_options_is_rejected() {
        let err = build::<SendCommand>(
            "sendPoll",
            json!({ "phoneNumber": "628123", "pollQuestion": "Q", "pollOptions": " , " }),
        )
        .unwrap_err();
        assert!(matches!(err, NodeError::InvalidParameter { ref name, .. } if name == "pollOptions"));
    }

    #[test]
    fn image_from_url_uses_json_body() {
        let request = build::<SendCommand>(
            "sendImage",
            json!({
                "phoneNumber": "628123",
                "imageUrl": "https://example.com/a.jpg",
                "caption": "look",
                "viewOnce": true,
            }),
        )
        .unwrap();
        assert!(request.form.is_none());
        assert_eq!(
            body(&request),
            json!({
                "phone": "628123",
                "image_url": "https://example.com/a.jpg",
                "caption": "look",
                "view_once": true,
            })
        );
    }

    #[test]
    fn image_upload_builds_multipart_form() {
        let item = png(
            Item::with_parameters(json!({
                "phoneNumber": "628123",
                "imageSource": "file",
                "compress": true,
                "isForwarded": true,
            })),
            "data",
        );
        let request = build_item::<SendCommand>("sendImage", &item).unwrap();

        assert!(request.body.is_none());
        assert_eq!(request.form_text_value("phone"), Some("628123"));
        assert_eq!(request.form_text_value("compress"), Some("true"));
        assert_eq!(request.form_text_value("is_forwarded"), Some("true"));
        assert_eq!(request.form_text_value("view_once"), None);
        let part = request.form_file_value("image").unwrap();
        assert_eq!(part.file_name, "pic.png");
        assert_eq!(part.data, b"\x89PNG");
    }

    #[test]
    fn upload_without_binary_fails_before_request() {
        let item = Item::with_parameters(json!({
            "phoneNumber": "628123",
            "audioSource": "file",
            "audioFile": "voice",
        }));
        let err = build_item::<SendCommand>("sendAudio", &item).unwrap_err();
        assert!(matches!(err, NodeError::MissingBinary(ref p) if p == "voice"));
    }

    #[test]
    fn file_is_always_multipart() {
        let item = png(
            Item::with_parameters(json!({ "phoneNumber": "628123", "caption": "report" })),
            "data",
        );
        let request = build_item::<SendCommand>("sendFile", &item).unwrap();
        assert_eq!(request.url, "http://localhost:3000/send/file");
        assert!(request.form_file_value("file").is_some());
        assert_eq!(request.form_text_value("caption"), Some("report"));
    }

    #[test]
    fn video_from_url() {
        let request = build::<SendCommand>(
            "sendVideo",
            json!({ "phoneNumber": "628123", "videoUrl": "https://example.com/v.mp4" }),
        )
        .unwrap();
        assert_eq!(request.url, "http://localhost:3000/send/video");
        assert_eq!(
            body(&request),
            json!({ "phone": "628123", "video_url": "https://example.com/v.mp4" })
        );
    }

    #[test]
    fn presence_has_no_phone() {
        let request = build::<SendCommand>("sendPresence", json!({})).unwrap();
        assert_eq!(request.url, "http://localhost:3000/send/presence");
        assert_eq!(body(&request), json!({ "type": "available" }));
    }

    #[test]
    fn chat_presence_ignores_reply_target() {
        let request = build::<SendCommand>(
            "sendChatPresence",
            json!({ "phoneNumber": "628123", "chatPresenceAction": "stop", "replyMessageId": "X" }),
        )
        .unwrap();
        assert_eq!(body(&request), json!({ "phone": "628123", "action": "stop" }));
    }

    #[test]
    fn location_coordinates_are_sent_as_strings() {
        let request = build::<SendCommand>(
            "sendLocation",
            json!({ "phoneNumber": "628123", "latitude": -7.797068, "longitude": "110.370529" }),
        )
        .unwrap();
        let body = body(&request);
        assert_eq!(body["latitude"], "-7.797068");
        assert_eq!(body["longitude"], "110.370529");
    }

    #[test]
    fn unknown_presence_type_is_invalid() {
        let err = build::<SendCommand>("sendPresence", json!({ "presenceType": "away" })).unwrap_err();
        assert!(err.is_configuration());
    }
}
