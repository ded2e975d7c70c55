//! Canonical request descriptor

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::payload::Payload;

/// HTTP verb of a request descriptor.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    #[default]
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
    Trace,
    Connect,
}

impl Method {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
            Self::Trace => "TRACE",
            Self::Connect => "CONNECT",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown HTTP method '{0}'")]
pub struct UnknownMethod(pub String);

impl FromStr for Method {
    type Err = UnknownMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "PATCH" => Ok(Self::Patch),
            "DELETE" => Ok(Self::Delete),
            "HEAD" => Ok(Self::Head),
            "OPTIONS" => Ok(Self::Options),
            "TRACE" => Ok(Self::Trace),
            "CONNECT" => Ok(Self::Connect),
            _ => Err(UnknownMethod(s.to_string())),
        }
    }
}

/// One example HTTP request in structured form.
///
/// Built once by the extractor and never mutated in place afterwards;
/// generators clone it before applying a mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RequestDescriptor {
    pub method: Method,
    pub url: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<serde_json::Value>")]
    pub payload: Option<Payload>,
}

impl RequestDescriptor {
    #[must_use]
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: BTreeMap::new(),
            payload: None,
        }
    }

    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_payload(mut self, payload: Payload) -> Self {
        self.payload = Some(payload);
        self
    }

    /// Stored name of a header, matched case-insensitively.
    #[must_use]
    pub fn header_key(&self, name: &str) -> Option<&str> {
        self.headers
            .keys()
            .find(|k| k.eq_ignore_ascii_case(name))
            .map(String::as_str)
    }

    /// Header value, matched case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.header("Content-Type")
    }

    /// Leading `scheme://` of the URL, if it has one.
    ///
    /// A `://` later in the URL (`localhost/cb?u=http://x`) is not a scheme.
    #[must_use]
    pub fn scheme(&self) -> Option<&str> {
        url_scheme(&self.url)
    }

    /// Serialized request body, if a payload is present.
    #[must_use]
    pub fn body(&self) -> Option<String> {
        self.payload.as_ref().map(Payload::to_json_string)
    }
}

/// RFC 3986 scheme prefix: a letter, then letters, digits, `+`, `-` or `.`.
#[must_use]
pub fn url_scheme(url: &str) -> Option<&str> {
    let (scheme, _) = url.split_once("://")?;
    let mut chars = scheme.chars();
    let valid = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    valid.then_some(scheme)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn method_parse_is_case_insensitive() {
        assert_eq!("post".parse::<Method>(), Ok(Method::Post));
        assert_eq!("Patch".parse::<Method>(), Ok(Method::Patch));
        assert!("FETCH".parse::<Method>().is_err());
    }

    #[test]
    fn method_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&Method::Delete).unwrap(), "\"DELETE\"");
    }

    #[test]
    fn header_lookup_ignores_case() {
        let req = RequestDescriptor::new(Method::Post, "http://localhost/objects")
            .with_header("content-type", "application/json");
        assert_eq!(req.content_type(), Some("application/json"));
        assert_eq!(req.header_key("Content-Type"), Some("content-type"));
        assert_eq!(req.header("Accept"), None);
    }

    #[test]
    fn body_is_compact_json() {
        let req = RequestDescriptor::new(Method::Post, "http://localhost/objects")
            .with_payload(Payload::from(json!({"name": "Widget", "year": 2020})));
        assert_eq!(req.body().as_deref(), Some(r#"{"name":"Widget","year":2020}"#));
        assert_eq!(RequestDescriptor::new(Method::Get, "http://x").body(), None);
    }

    #[test]
    fn scheme_must_lead_the_url() {
        let scheme = |url: &str| RequestDescriptor::new(Method::Get, url).scheme().map(str::to_owned);
        assert_eq!(scheme("https://h/x").as_deref(), Some("https"));
        assert_eq!(scheme("svn+ssh://h/x").as_deref(), Some("svn+ssh"));
        assert_eq!(scheme("localhost:8080/cb?u=http://x"), None);
        assert_eq!(scheme("localhost/x"), None);
        assert_eq!(scheme("://h"), None);
    }
}
