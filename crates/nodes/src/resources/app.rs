//! `app` — connection state and login of the default device.

use gateway::{RequestDescriptor, RequestFactory};

use super::{OperationKind, ResourceCommand};
use crate::catalog::{OperationInfo, Property, Resource};
use crate::params::Parameters;
use crate::NodeError;

/// Prefix every downloadable media path must carry.
pub const MEDIA_PREFIX: &str = "statics/";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppOperation {
    GetStatus,
    GetDeviceInfo,
    GetMediaByPath,
    Login,
    LoginWithCode,
    Logout,
    Reconnect,
}

impl OperationKind for AppOperation {
    const RESOURCE: Resource = Resource::App;
    const ALL: &'static [Self] = &[
        Self::GetStatus,
        Self::GetDeviceInfo,
        Self::GetMediaByPath,
        Self::Login,
        Self::LoginWithCode,
        Self::Logout,
        Self::Reconnect,
    ];
    const DEFAULT: Self = Self::GetDeviceInfo;

    fn info(self) -> OperationInfo {
        match self {
            Self::GetStatus => OperationInfo::new(
                "getStatus",
                "Get Connection Status",
                Some("Check whether the WhatsApp client is connected and logged in"),
                "Get connection status",
            ),
            Self::GetDeviceInfo => OperationInfo::new(
                "getDeviceInfo",
                "Get Device Info",
                Some("Get device information"),
                "Get device information",
            ),
            Self::GetMediaByPath => OperationInfo::new(
                "getMediaByPath",
                "Get Media by Path",
                Some("Get media file by its storage path"),
                "Get media file by storage path",
            ),
            Self::Login => OperationInfo::new(
                "login",
                "Login",
                Some("Login to WhatsApp server with QR code"),
                "Login to whats app server",
            ),
            Self::LoginWithCode => OperationInfo::new(
                "loginWithCode",
                "Login with Code",
                Some("Login with pairing code"),
                "Login with pairing code",
            ),
            Self::Logout => OperationInfo::new(
                "logout",
                "Logout",
                Some("Remove database and logout"),
                "Logout from whats app",
            ),
            Self::Reconnect => OperationInfo::new(
                "reconnect",
                "Reconnect",
                Some("Reconnect to WhatsApp Web"),
                "Reconnect to whats app web",
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    GetStatus,
    GetDeviceInfo,
    /// `path` is already cleaned: no leading slash, starts with `statics/`.
    GetMediaByPath { path: String },
    Login,
    LoginWithCode { phone: String },
    Logout,
    Reconnect,
}

impl AppCommand {
    /// Cleaned media path of a `getMediaByPath` command.
    pub fn media_path(&self) -> Option<&str> {
        match self {
            Self::GetMediaByPath { path } => Some(path.as_str()),
            _ => None,
        }
    }
}

/// Strip leading slashes, require the `statics/` prefix and refuse dot
/// segments.
pub fn clean_media_path(raw: &str) -> Result<String, NodeError> {
    if raw.is_empty() {
        return Err(NodeError::MissingParameter("mediaPath".to_owned()));
    }
    let clean = raw.trim_start_matches('/');
    if !clean.starts_with(MEDIA_PREFIX) {
        return Err(NodeError::invalid(
            "mediaPath",
            format!("media path must start with \"{MEDIA_PREFIX}\""),
        ));
    }
    if clean.split('/').any(|segment| segment == "." || segment == "..") {
        return Err(NodeError::invalid(
            "mediaPath",
            "media path must not contain '.' or '..' segments",
        ));
    }
    Ok(clean.to_owned())
}

impl ResourceCommand for AppCommand {
    type Kind = AppOperation;

    fn parse(kind: AppOperation, params: &Parameters<'_>) -> Result<Self, NodeError> {
        Ok(match kind {
            AppOperation::GetStatus => Self::GetStatus,
            AppOperation::GetDeviceInfo => Self::GetDeviceInfo,
            AppOperation::GetMediaByPath => Self::GetMediaByPath {
                path: clean_media_path(&params.string("mediaPath")?)?,
            },
            AppOperation::Login => Self::Login,
            AppOperation::LoginWithCode => Self::LoginWithCode {
                phone: params.string("phone")?,
            },
            AppOperation::Logout => Self::Logout,
            AppOperation::Reconnect => Self::Reconnect,
        })
    }

    fn kind(&self) -> AppOperation {
        match self {
            Self::GetStatus => AppOperation::GetStatus,
            Self::GetDeviceInfo => AppOperation::GetDeviceInfo,
            Self::GetMediaByPath { .. } => AppOperation::GetMediaByPath,
            Self::Login => AppOperation::Login,
            Self::LoginWithCode { .. } => AppOperation::LoginWithCode,
            Self::Logout => AppOperation::Logout,
            Self::Reconnect => AppOperation::Reconnect,
        }
    }

    fn request(&self, api: &RequestFactory) -> RequestDescriptor {
        match self {
            Self::GetStatus => api.get("/app/status"),
            Self::GetDeviceInfo => api.get("/app/devices"),
            Self::GetMediaByPath { path } => {
                RequestDescriptor::get(api.url_from_encoded_path(path)).raw_response()
            }
            Self::Login => api.get("/app/login"),
            Self::LoginWithCode { phone } => api
                .get("/app/login-with-code")
                .query_param("phone", phone.as_str()),
            Self::Logout => api.get("/app/logout"),
            Self::Reconnect => api.get("/app/reconnect"),
        }
    }
}

pub fn properties() -> Vec<Property> {
    vec![
        Property::string("mediaPath", "Media Path")
            .required()
            .show(Resource::App, &["getMediaByPath"])
            .placeholder("statics/media/628123456789/2024-01-15/1705123456-abc123.jpg")
            .description(
                "The relative path to the media file (e.g., statics/media/phone/date/filename)",
            ),
        Property::string("phone", "Phone Number")
            .required()
            .show(Resource::App, &["loginWithCode"])
            .placeholder("628912344551")
            .description("Your phone number for pairing"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::testing::{build, query};
    use gateway::{Method, ResponseFormat};
    use serde_json::json;

    #[test]
    fn status_and_login_are_plain_gets() {
        let status = build::<AppCommand>("getStatus", json!({})).unwrap();
        assert_eq!(status.method, Method::Get);
        assert_eq!(status.url, "http://localhost:3000/app/status");
        assert!(status.body.is_none());

        let devices = build::<AppCommand>("getDeviceInfo", json!({})).unwrap();
        assert_eq!(devices.url, "http://localhost:3000/app/devices");
    }

    #[test]
    fn login_with_code_passes_phone_as_query() {
        let request = build::<AppCommand>("loginWithCode", json!({ "phone": "628912344551" })).unwrap();
        assert_eq!(request.url, "http://localhost:3000/app/login-with-code");
        assert_eq!(query(&request), json!({ "phone": "628912344551" }));
    }

    #[test]
    fn media_path_is_cleaned_and_fetched_raw() {
        let request = build::<AppCommand>(
            "getMediaByPath",
            json!({ "mediaPath": "/statics/media/628123/a.jpg" }),
        )
        .unwrap();
        assert_eq!(request.url, "http://localhost:3000/statics/media/628123/a.jpg");
        assert_eq!(request.response, ResponseFormat::Raw);
    }

    #[test]
    fn media_path_outside_statics_is_rejected() {
        let err = build::<AppCommand>("getMediaByPath", json!({ "mediaPath": "/etc/passwd" }))
            .unwrap_err();
        assert!(matches!(err, NodeError::InvalidParameter { ref name, .. } if name == "mediaPath"));

        let err = build::<AppCommand>("getMediaByPath", json!({ "mediaPath": "" })).unwrap_err();
        assert!(matches!(err, NodeError::MissingParameter(_)));
    }

    #[test]
    fn unknown_operation_is_reported_with_resource() {
        let err = build::<AppCommand>("shutdown", json!({})).unwrap_err();
        assert_eq!(err.to_string(), "unknown app operation: shutdown");
    }

    #[test]
    fn media_path_keeps_existing_escapes() {
        let request = build::<AppCommand>(
            "getMediaByPath",
            json!({ "mediaPath": "statics/media/a%20b.jpg" }),
        )
        .unwrap();
        assert_eq!(request.url, "http://localhost:3000/statics/media/a%20b.jpg");
    }

    #[test]
    fn media_path_cannot_climb_out_of_statics() {
        for path in ["statics/../app/logout", "/statics/./media/a.jpg"] {
            let err = build::<AppCommand>("getMediaByPath", json!({ "mediaPath": path })).unwrap_err();
            assert!(
                matches!(err, NodeError::InvalidParameter { ref name, .. } if name == "mediaPath"),
                "{path}"
            );
        }
    }
}
