//! The request descriptor every operation produces, and the factory that
//! turns endpoint paths into absolute gateway URLs.
//!
//! A [`RequestDescriptor`] is a plain value: method, absolute URL and at
//! most one kind of payload (JSON body, query string, multipart form).
//! Nothing in here performs I/O.

use serde::Serialize;
use serde_json::{Map, Value};
use url::Url;

use crate::{Credentials, GatewayError};

// ---------------------------------------------------------------------------
// Method / response format
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Delete,
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Get => write!(f, "GET"),
            Self::Post => write!(f, "POST"),
            Self::Delete => write!(f, "DELETE"),
        }
    }
}

/// How the caller wants the response handed back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseFormat {
    /// Parse the body as JSON.
    #[default]
    Json,
    /// Keep status, headers and raw bytes (media downloads).
    Raw,
}

// ---------------------------------------------------------------------------
// Multipart form values
// ---------------------------------------------------------------------------

/// A file embedded in a multipart form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BinaryPart {
    #[serde(skip)]
    pub data: Vec<u8>,
    pub file_name: String,
    pub mime_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FormValue {
    Text(String),
    File(BinaryPart),
}

// ---------------------------------------------------------------------------
// RequestDescriptor
// ---------------------------------------------------------------------------

/// Everything the transport needs to perform one gateway call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestDescriptor {
    pub method: Method,
    /// Absolute URL, already joined with the gateway base.
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<Map<String, Value>>,
    /// Ordered multipart fields; when present it replaces `body`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form: Option<Vec<(String, FormValue)>>,
    pub response: ResponseFormat,
}

impl RequestDescriptor {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            body: None,
            query: None,
            form: None,
            response: ResponseFormat::Json,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::Get, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::Post, url)
    }

    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(Method::Delete, url)
    }

    /// Set a JSON body field, creating the body on first use.
    pub fn body_field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.body
            .get_or_insert_with(Map::new)
            .insert(key.to_owned(), value.into());
        self
    }

    /// Set a JSON body field only when `value` is present.
    pub fn body_field_opt<V: Into<Value>>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.body_field(key, value),
            None => self,
        }
    }

    /// Ensure a (possibly empty) JSON body is sent.
    pub fn empty_body(mut self) -> Self {
        self.body.get_or_insert_with(Map::new);
        self
    }

    pub fn query_param(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.query
            .get_or_insert_with(Map::new)
            .insert(key.to_owned(), value.into());
        self
    }

    pub fn query_param_opt<V: Into<Value>>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.query_param(key, value),
            None => self,
        }
    }

    pub fn form_text(mut self, key: &str, value: impl Into<String>) -> Self {
        self.form
            .get_or_insert_with(Vec::new)
            .push((key.to_owned(), FormValue::Text(value.into())));
        self
    }

    pub fn form_text_opt<V: Into<String>>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.form_text(key, value),
            None => self,
        }
    }

    pub fn form_file(mut self, key: &str, part: BinaryPart) -> Self {
        self.form
            .get_or_insert_with(Vec::new)
            .push((key.to_owned(), FormValue::File(part)));
        self
    }

    pub fn raw_response(mut self) -> Self {
        self.response = ResponseFormat::Raw;
        self
    }

    /// Look up a text field of the multipart form.
    pub fn form_text_value(&self, key: &str) -> Option<&str> {
        self.form.as_ref()?.iter().find_map(|(k, v)| match v {
            FormValue::Text(text) if k == key => Some(text.as_str()),
            _ => None,
        })
    }

    /// Look up a file part of the multipart form.
    pub fn form_file_value(&self, key: &str) -> Option<&BinaryPart> {
        self.form.as_ref()?.iter().find_map(|(k, v)| match v {
            FormValue::File(part) if k == key => Some(part),
            _ => None,
        })
    }
}

// ---------------------------------------------------------------------------
// RequestFactory
// ---------------------------------------------------------------------------

/// Joins endpoint paths onto the gateway base URL.
///
/// Built once per item from the credentials and handed to every operation,
/// so no operation formats base URLs by hand.
#[derive(Debug, Clone)]
pub struct RequestFactory {
    base: Url,
}

impl RequestFactory {
    pub fn new(credentials: &Credentials) -> Result<Self, GatewayError> {
        Self::from_base_url(credentials.base_url())
    }

    pub fn from_base_url(base_url: &str) -> Result<Self, GatewayError> {
        let base = Url::parse(base_url).map_err(|e| GatewayError::InvalidHostUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        if base.cannot_be_a_base() || !matches!(base.scheme(), "http" | "https") {
            return Err(GatewayError::InvalidHostUrl {
                url: base_url.to_owned(),
                reason: "expected an http(s) URL".to_owned(),
            });
        }

        Ok(Self { base })
    }

    /// Absolute URL for a fixed endpoint path such as `/send/message`.
    pub fn url(&self, path: &str) -> String {
        let segments: Vec<&str> = path.trim_start_matches('/').split('/').collect();
        self.url_from_segments(&segments)
    }

    /// Absolute URL built from individual path segments.  Each segment is
    /// percent-encoded on its own, so ids containing `/` or `?` stay inside
    /// their segment.
    pub fn url_from_segments(&self, segments: &[&str]) -> String {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url.to_string()
    }

    /// Absolute URL for a path that is already percent-encoded, such as a
    /// media path issued by the gateway.  Existing `%XX` escapes are kept.
    pub fn url_from_encoded_path(&self, path: &str) -> String {
        let mut url = self.base.clone();
        let joined = format!(
            "{}/{}",
            self.base.path().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        url.set_path(&joined);
        url.to_string()
    }

    pub fn get(&self, path: &str) -> RequestDescriptor {
        RequestDescriptor::get(self.url(path))
    }

    pub fn post(&self, path: &str) -> RequestDescriptor {
        RequestDescriptor::post(self.url(path))
    }

    pub fn delete(&self, path: &str) -> RequestDescriptor {
        RequestDescriptor::delete(self.url(path))
    }
}
