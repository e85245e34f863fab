//! Request-scoped context threaded through every token operation.

use std::collections::HashMap;

use http::header::COOKIE;
use http::{HeaderMap, HeaderName, HeaderValue};

/// The inbound request as seen by token strategies.
///
/// Transport layers build one per request from whatever they parsed;
/// extractors and hooks only read from it.
#[derive(Debug, Clone, Default)]
pub struct AuthContext {
    /// Request headers.
    headers: HeaderMap,
    /// Decoded form fields.
    form: HashMap<String, String>,
}

impl AuthContext {
    /// Creates a context from request headers.
    pub fn from_headers(headers: HeaderMap) -> Self {
        Self {
            headers,
            form: HashMap::new(),
        }
    }

    /// Adds a header.
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    /// Adds a form field.
    pub fn with_form_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.form.insert(name.into(), value.into());
        self
    }

    /// Request headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// First value of header `name`, if it is valid visible ASCII.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Form field `name`.
    pub fn form_field(&self, name: &str) -> Option<&str> {
        self.form.get(name).map(String::as_str)
    }

    /// Cookie `name` from any `Cookie` header.
    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(|line| line.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_lookup() {
        let ctx = AuthContext::default()
            .with_header(COOKIE, HeaderValue::from_static("theme=dark; authorization=abc"))
            .with_header(COOKIE, HeaderValue::from_static("lang=en"));
        assert_eq!(ctx.cookie("authorization"), Some("abc"));
        assert_eq!(ctx.cookie("lang"), Some("en"));
        assert_eq!(ctx.cookie("missing"), None);
    }

    #[test]
    fn test_header_case_insensitive() {
        let ctx = AuthContext::default().with_header(
            http::header::AUTHORIZATION,
            HeaderValue::from_static("Bearer t"),
        );
        assert_eq!(ctx.header("Authorization"), Some("Bearer t"));
    }
}
