//! The `goWhatsappApi` credential descriptor.
//!
//! Holds the connection fields a user enters once (host URL, Basic-Auth
//! username/password, optional device ID) and knows how to turn them into
//! the headers every outgoing request carries.

use std::fmt;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::request::RequestDescriptor;

/// Name the node uses to reference these credentials.
pub const CREDENTIAL_NAME: &str = "goWhatsappApi";

/// Host used when the credential leaves `hostUrl` blank.
pub const DEFAULT_HOST_URL: &str = "http://localhost:3000";

/// Header that scopes a request to one device on a multi-device gateway.
pub const DEVICE_ID_HEADER: &str = "X-Device-Id";

/// Connection credentials for a GOWA gateway.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    #[serde(default = "default_host_url")]
    pub host_url: String,
    #[serde(default)]
    pub username: String,
    #[serde(default = "empty_password")]
    pub password: Secret<String>,
    /// Device identifier for multi-device gateways.  When unset the gateway
    /// routes to its sole/default device.
    #[serde(default)]
    pub device_id: Option<String>,
}

fn default_host_url() -> String {
    DEFAULT_HOST_URL.to_owned()
}

fn empty_password() -> Secret<String> {
    Secret::new(String::new())
}

impl Credentials {
    pub fn new(
        host_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            host_url: host_url.into(),
            username: username.into(),
            password: Secret::new(password.into()),
            device_id: None,
        }
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Secret::new(password.into());
        self
    }

    pub fn with_device_id(mut self, device_id: impl Into<String>) -> Self {
        self.device_id = Some(device_id.into());
        self
    }

    /// Host URL with any trailing slash removed, falling back to
    /// [`DEFAULT_HOST_URL`] when blank.
    pub fn base_url(&self) -> &str {
        let trimmed = self.host_url.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            DEFAULT_HOST_URL
        } else {
            trimmed
        }
    }

    /// Value of the `Authorization` header: `Basic base64(username:password)`.
    pub fn authorization(&self) -> String {
        let pair = format!("{}:{}", self.username, self.password.expose_secret());
        format!("Basic {}", STANDARD.encode(pair))
    }

    /// The configured device ID, or `None` when it is unset or blank.
    pub fn device_id(&self) -> Option<&str> {
        self.device_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }

    /// All credential-derived headers, in the order they are attached.
    pub fn headers(&self) -> Vec<(&'static str, String)> {
        let mut headers = vec![("Authorization", self.authorization())];
        if let Some(device_id) = self.device_id() {
            headers.push((DEVICE_ID_HEADER, device_id.to_owned()));
        }
        headers
    }

    /// Cheap request used to validate the credentials interactively.
    pub fn test_request(&self) -> RequestDescriptor {
        RequestDescriptor::get(format!("{}/", self.base_url()))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("host_url", &self.host_url)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("device_id", &self.device_id)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Descriptor metadata
// ---------------------------------------------------------------------------

/// One input field of the credential form.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialField {
    pub display_name: &'static str,
    pub name: &'static str,
    #[serde(rename = "type")]
    pub field_type: &'static str,
    pub default: &'static str,
    #[serde(skip_serializing_if = "is_false")]
    pub password: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'static str>,
}

fn is_false(flag: &bool) -> bool {
    !*flag
}

/// Static description of the credential type, as shown by the host UI.
pub fn credential_description() -> Value {
    let fields = [
        CredentialField {
            display_name: "Host URL",
            name: "hostUrl",
            field_type: "string",
            default: DEFAULT_HOST_URL,
            password: false,
            description: None,
        },
        CredentialField {
            display_name: "Username",
            name: "username",
            field_type: "string",
            default: "",
            password: false,
            description: None,
        },
        CredentialField {
            display_name: "Password",
            name: "password",
            field_type: "string",
            default: "",
            password: true,
            description: None,
        },
        CredentialField {
            display_name: "Device ID",
            name: "deviceId",
            field_type: "string",
            default: "",
            password: false,
            description: Some(
                "Device identifier for multi-device support. If only one device is registered, it will be used as the default.",
            ),
        },
    ];

    json!({
        "name": CREDENTIAL_NAME,
        "displayName": "GOWA API",
        "documentationUrl": "https://github.com/aldinokemal/go-whatsapp-web-multidevice",
        "properties": fields,
        "authenticate": {
            "type": "basic",
            "headers": ["Authorization", DEVICE_ID_HEADER],
        },
        "test": { "method": "GET", "url": "/" },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authorization_is_basic_base64_of_username_and_password() {
        let creds = Credentials::new("http://gw:3000", "user", "pass");
        assert_eq!(creds.authorization(), "Basic dXNlcjpwYXNz");
    }

    #[test]
    fn base_url_strips_trailing_slash_and_defaults_when_blank() {
        assert_eq!(Credentials::new("http://gw:3000/", "", "").base_url(), "http://gw:3000");
        assert_eq!(Credentials::new("  ", "", "").base_url(), DEFAULT_HOST_URL);
    }

    #[test]
    fn blank_device_id_produces_no_header() {
        let creds = Credentials::new("http://gw", "u", "p").with_device_id("   ");
        assert_eq!(creds.device_id(), None);
        assert!(creds.headers().iter().all(|(name, _)| *name != DEVICE_ID_HEADER));

        let creds = creds.with_device_id("dev1");
        assert!(creds.headers().contains(&(DEVICE_ID_HEADER, "dev1".to_owned())));
    }

    #[test]
    fn deserializes_with_defaults() {
        let creds: Credentials = serde_json::from_value(json!({ "username": "admin" })).unwrap();
        assert_eq!(creds.base_url(), DEFAULT_HOST_URL);
        assert_eq!(creds.device_id(), None);
        assert_eq!(creds.authorization(), format!("Basic {}", STANDARD.encode("admin:")));
    }

    #[test]
    fn debug_output_redacts_password() {
        let creds = Credentials::new("http://gw", "u", "hunter2");
        assert!(!format!("{creds:?}").contains("hunter2"));
    }

    #[test]
    fn test_request_targets_host_root() {
        let creds = Credentials::new("http://gw:3000/", "u", "p");
        let request = creds.test_request();
        assert_eq!(request.url, "http://gw:3000/");
    }
}
