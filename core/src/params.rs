//! URL query parameters, path expansion and the parameters every endpoint
//! shares.
//!
//! Path variables are percent-encoded one segment at a time. List-valued
//! variables encode each element and join them with a literal comma, which the
//! engine reads as a multi-target expression.

use std::collections::BTreeMap;
use std::fmt;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::error::ApiError;
use crate::http::HttpRequest;

/// Everything except RFC 3986 unreserved characters.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Query parameters keyed by name. Keys are kept sorted so the encoded
/// query string is stable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(BTreeMap<String, String>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: &str, value: impl fmt::Display) {
        self.0.insert(key.to_string(), value.to_string());
    }

    /// Set `key` only when a value is present.
    pub fn opt<T: fmt::Display>(&mut self, key: &str, value: &Option<T>) {
        if let Some(value) = value {
            self.set(key, value);
        }
    }

    /// Set `key` to the comma-joined list, skipping empty lists.
    pub fn list(&mut self, key: &str, values: &[String]) {
        if !values.is_empty() {
            self.set(key, values.join(","));
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Form-encoded query string without the leading `?`.
    pub fn encode(&self) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (k, v) in &self.0 {
            serializer.append_pair(k, v);
        }
        serializer.finish()
    }
}

/// Parameters accepted by every endpoint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommonParams {
    pub pretty: Option<bool>,
    pub human: Option<bool>,
    pub error_trace: Option<bool>,
    pub filter_path: Vec<String>,
    pub headers: Vec<(String, String)>,
}

impl CommonParams {
    /// Write the shared parameters and headers onto `request`.
    pub fn apply(&self, request: &mut HttpRequest) {
        request.params.opt("pretty", &self.pretty);
        request.params.opt("human", &self.human);
        request.params.opt("error_trace", &self.error_trace);
        request.params.list("filter_path", &self.filter_path);
        for (name, value) in &self.headers {
            request.set_header(name, value);
        }
    }
}

/// Adds the shared setters to a builder that stores its `CommonParams` in a
/// field named `common`.
macro_rules! common_setters {
    () => {
        /// Indent the JSON response.
        pub fn pretty(mut self, pretty: bool) -> Self {
            self.common.pretty = Some(pretty);
            self
        }

        /// Return human readable values for statistics.
        pub fn human(mut self, human: bool) -> Self {
            self.common.human = Some(human);
            self
        }

        /// Include the stack trace of returned errors.
        pub fn error_trace(mut self, error_trace: bool) -> Self {
            self.common.error_trace = Some(error_trace);
            self
        }

        /// Restrict the response to the given dotted paths.
        pub fn filter_path<I, S>(mut self, paths: I) -> Self
        where
            I: IntoIterator<Item = S>,
            S: Into<String>,
        {
            self.common.filter_path.extend(paths.into_iter().map(Into::into));
            self
        }

        /// Add a header sent with this request only.
        pub fn header(mut self, name: &str, value: &str) -> Self {
            self.common.headers.push((name.to_string(), value.to_string()));
            self
        }

        /// Replace all per-request headers.
        pub fn headers(mut self, headers: Vec<(String, String)>) -> Self {
            self.common.headers = headers;
            self
        }
    };
}

/// Percent-encode a single path segment.
pub fn segment(value: &str) -> String {
    utf8_percent_encode(value, PATH_SEGMENT).to_string()
}

/// Encode each element and join with a literal comma.
pub fn segments<S: AsRef<str>>(values: &[S]) -> String {
    values
        .iter()
        .map(|v| segment(v.as_ref()))
        .collect::<Vec<_>>()
        .join(",")
}

/// Substitute `{name}` placeholders in `template` with pre-encoded values.
///
/// Fails when a placeholder has no value or a value is empty, so a request
/// can never be sent to a path with a missing segment.
pub fn expand(template: &str, vars: &[(&str, String)]) -> Result<String, ApiError> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let end = rest[start..]
            .find('}')
            .map(|i| start + i)
            .ok_or_else(|| ApiError::InvalidArgument(format!("unterminated placeholder in {template}")))?;
        let name = &rest[start + 1..end];
        let value = vars
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.as_str())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ApiError::InvalidArgument(format!("no value for path variable {name}")))?;
        out.push_str(value);
        rest = &rest[end + 1..];
    }
    out.push_str(rest);
    Ok(out)
}

pub(crate) fn strings<I, S>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    values.into_iter().map(Into::into).collect()
}

/// Collects the names of required fields that were left empty.
#[derive(Debug, Default)]
pub(crate) struct Missing(Vec<String>);

impl Missing {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn check(&mut self, name: &str, present: bool) -> &mut Self {
        if !present {
            self.0.push(name.to_string());
        }
        self
    }

    pub(crate) fn finish(&mut self) -> Result<(), ApiError> {
        ApiError::check_missing(std::mem::take(&mut self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpMethod;

    #[test]
    fn segment_encodes_reserved_characters() {
        assert_eq!(segment("twitter"), "twitter");
        assert_eq!(segment("my index/1"), "my%20index%2F1");
        assert_eq!(segment("logs-2024.01_a~b"), "logs-2024.01_a~b");
        assert_eq!(segment("a,b"), "a%2Cb");
    }

    #[test]
    fn segments_join_with_literal_comma() {
        assert_eq!(segments(&["a", "b c"]), "a,b%20c");
        assert_eq!(segments::<String>(&[]), "");
    }

    #[test]
    fn expand_substitutes_placeholders() {
        let path = expand(
            "/{index}/_doc/{id}",
            &[("index", segment("twitter")), ("id", segment("1"))],
        )
        .unwrap();
        assert_eq!(path, "/twitter/_doc/1");
    }

    #[test]
    fn expand_rejects_missing_or_empty_values() {
        assert!(expand("/{index}/_doc", &[]).is_err());
        assert!(expand("/{index}/_doc", &[("index", String::new())]).is_err());
        assert!(expand("/{index", &[("index", "a".into())]).is_err());
    }

    #[test]
    fn query_params_skip_absent_values() {
        let mut params = QueryParams::new();
        params.opt::<bool>("local", &None);
        params.opt("timeout", &Some("1s"));
        params.list("h", &[]);
        params.list("filter_path", &["a".to_string(), "b".to_string()]);
        assert_eq!(params.get("timeout"), Some("1s"));
        assert_eq!(params.get("filter_path"), Some("a,b"));
        assert!(!params.contains("local"));
        assert!(!params.contains("h"));
    }

    #[test]
    fn query_params_encode_sorted_and_escaped() {
        let mut params = QueryParams::new();
        params.set("q", "a b");
        params.set("filter_path", "hits.hits._id,_scroll_id");
        assert_eq!(params.encode(), "filter_path=hits.hits._id%2C_scroll_id&q=a+b");
    }

    #[test]
    fn common_params_apply_to_request() {
        let common = CommonParams {
            pretty: Some(true),
            human: Some(false),
            error_trace: None,
            filter_path: vec!["took".into()],
            headers: vec![("X-Opaque-Id".into(), "42".into())],
        };
        let mut req = HttpRequest::new(HttpMethod::Get, "/");
        common.apply(&mut req);
        assert_eq!(req.params.get("pretty"), Some("true"));
        assert_eq!(req.params.get("human"), Some("false"));
        assert!(!req.params.contains("error_trace"));
        assert_eq!(req.params.get("filter_path"), Some("took"));
        assert_eq!(req.header("x-opaque-id"), Some("42"));
    }

    #[test]
    fn missing_collects_all_names() {
        let err = Missing::new()
            .check("Index", false)
            .check("Id", false)
            .check("Body", true)
            .finish()
            .unwrap_err();
        assert_eq!(err.to_string(), "missing required fields: [Index, Id]");
    }
}
