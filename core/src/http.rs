//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! These types describe HTTP requests and responses as plain data. The core
//! crate builds `HttpRequest` values and parses `HttpResponse` values without
//! ever touching the network. The caller (host) executes the exchange with
//! whatever HTTP stack it already has, along with TLS, compression and
//! connection reuse.
//!
//! `path` is the absolute URL, query string included. Query parameters are
//! form-urlencoded in the order they were supplied, because the order of
//! schema-lookup inputs is observable on the wire.

use url::form_urlencoded;

/// Header carrying the opaque API key on every request.
pub const API_KEY_HEADER: &str = "X-SEERAPI-Key";

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

/// An HTTP request described as plain data.
///
/// Built by `SeerClient::build_*` methods. The caller is responsible for
/// executing this request against the network and returning the corresponding
/// `HttpResponse`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// Value of the first header named `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Decoded query parameters of `path`, in wire order.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        match self.path.split_once('?') {
            Some((_, query)) => form_urlencoded::parse(query.as_bytes())
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect(),
            None => Vec::new(),
        }
    }
}

/// An HTTP response described as plain data.
///
/// Constructed by the caller after executing an `HttpRequest`, then passed
/// to `SeerClient::parse_*` methods for deserialization.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Join `base` and `segment` and append `params` as a query string.
///
/// No `?` is written when `params` is empty.
pub(crate) fn build_url<K, V>(base: &str, segment: &str, params: &[(K, V)]) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut url = format!("{base}{segment}");
    if params.is_empty() {
        return url;
    }
    let query = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(params.iter().map(|(k, v)| (AsRef::<str>::as_ref(k), AsRef::<str>::as_ref(v))))
        .finish();
    url.push('?');
    url.push_str(&query);
    url
}

/// Percent-encode a single path segment (ids, versions).
pub(crate) fn encode_segment(segment: &str) -> String {
    form_urlencoded::byte_serialize(segment.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_url_without_params_has_no_question_mark() {
        let url = build_url::<&str, &str>("http://h", "/a", &[]);
        assert_eq!(url, "http://h/a");
    }

    #[test]
    fn build_url_keeps_param_order_and_encodes() {
        let url = build_url("http://h", "/a", &[("q", "a b"), ("site", "C509"), ("hist", "8000/3")]);
        assert_eq!(url, "http://h/a?q=a+b&site=C509&hist=8000%2F3");
    }

    #[test]
    fn query_pairs_decodes_in_wire_order() {
        let req = HttpRequest {
            method: HttpMethod::Get,
            path: "http://h/a?z=1&a=x+y".to_string(),
            headers: vec![("Accept".to_string(), "application/json".to_string())],
            body: None,
        };
        assert_eq!(
            req.query_pairs(),
            vec![("z".to_string(), "1".to_string()), ("a".to_string(), "x y".to_string())]
        );
        assert_eq!(req.header("accept"), Some("application/json"));
    }

    #[test]
    fn encode_segment_escapes_spaces_and_slashes() {
        assert_eq!(encode_segment("02.05.50"), "02.05.50");
        assert_eq!(encode_segment("a b/c"), "a%20b%2Fc");
    }
}
