//! Request-to-command conversion.
//!
//! # Design
//! One forward pass over the request: method, body, headers, URL, trailing
//! flags. The first error aborts the call and nothing partial is returned.
//! Each call owns its builder and options, so concurrent conversions of
//! distinct requests share nothing.

use tracing::{debug, trace};

use crate::body;
use crate::command::{CommandBuilder, CurlCommand};
use crate::error::ConvertError;
use crate::escape::shell_quote;
use crate::http::{Headers, HttpRequest};
use crate::options::{CurlOption, CurlOptions};

/// Headers that describe the encoded body; dropped once it has been gunzipped.
const STALE_AFTER_DECOMPRESSION: [&str; 2] = ["Content-Encoding", "Content-Length"];

/// Convert `request` into a curl command, applying `options` left to right.
///
/// The request body, if any, is drained and replaced with an in-memory copy of
/// the same bytes, so the caller can still read it afterwards.
pub fn convert(request: &mut HttpRequest, options: &[CurlOption]) -> Result<CurlCommand, ConvertError> {
    convert_with(request, CurlOptions::from_options(options))
}

/// Like [`convert`], with the options already resolved.
pub fn convert_with(request: &mut HttpRequest, options: CurlOptions) -> Result<CurlCommand, ConvertError> {
    debug!(method = %request.method, url = %request.url, ?options, "converting request");

    let mut command = CommandBuilder::new(options);
    command.push("curl");

    if options.insecure_skip_verify && request.url.scheme == "https" {
        command.push("-k");
    }

    command.push_pair("-X", shell_quote(&request.method));

    let mut decompressed = false;
    if let Some(prepared) = body::prepare(request, &options)? {
        body::render(&prepared, &options, &mut command);
        decompressed = prepared.decompressed;
    }

    for line in header_lines(&request.headers, decompressed) {
        command.push_pair("-H", shell_quote(&line));
    }

    command.push(shell_quote(&resolve_url(request)));

    if options.enable_compression {
        command.push("--compressed");
    }

    let command = command.finish();
    trace!(tokens = command.tokens().len(), "built curl command");
    Ok(command)
}

/// `Name: v1 v2` lines in sorted name order.
fn header_lines(headers: &Headers, decompressed: bool) -> Vec<String> {
    headers
        .names()
        .into_iter()
        .filter(|name| !(decompressed && STALE_AFTER_DECOMPRESSION.contains(name)))
        .map(|name| format!("{name}: {}", headers.values(name).join(" ")))
        .collect()
}

/// The request's own URL when it has a scheme. Otherwise `scheme://host/path`
/// with the scheme taken from the TLS flag; query and fragment are not carried
/// over in that case.
pub fn resolve_url(request: &HttpRequest) -> String {
    let url = &request.url;
    if url.has_scheme() {
        return url.to_string();
    }

    let scheme = if request.tls { "https" } else { "http" };
    let separator = if url.path.is_empty() || url.path.starts_with('/') {
        ""
    } else {
        "/"
    };
    format!("{scheme}://{}{separator}{}", url.host, url.path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::RequestUrl;

    #[test]
    fn get_without_body_or_headers() {
        let mut request = HttpRequest::new("GET", "http://example.com");
        let command = convert(&mut request, &[]).unwrap();
        assert_eq!(command.to_string(), "curl -X 'GET' 'http://example.com'");
    }

    #[test]
    fn headers_are_emitted_in_sorted_order() {
        let mut request = HttpRequest::new("GET", "http://example.com")
            .with_header("B", "2")
            .with_header("A", "1");
        let command = convert(&mut request, &[]).unwrap();
        assert_eq!(
            command.to_string(),
            "curl -X 'GET' -H 'A: 1' -H 'B: 2' 'http://example.com'"
        );
    }

    #[test]
    fn multi_valued_header_is_joined_with_spaces() {
        let mut request = HttpRequest::new("GET", "http://example.com");
        request.headers.append("Accept", "text/html");
        request.headers.append("Accept", "application/json");
        let command = convert(&mut request, &[]).unwrap();
        assert_eq!(
            command.to_string(),
            "curl -X 'GET' -H 'Accept: text/html application/json' 'http://example.com'"
        );
    }

    #[test]
    fn header_values_are_quoted() {
        let mut request = HttpRequest::new("GET", "http://example.com").with_header("X-Note", "it's");
        let command = convert(&mut request, &[]).unwrap();
        assert_eq!(
            command.to_string(),
            "curl -X 'GET' -H 'X-Note: it'\\''s' 'http://example.com'"
        );
    }

    #[test]
    fn stale_headers_kept_without_decompression() {
        let mut headers = Headers::new();
        headers.set("Content-Length", "4");
        headers.set("Content-Encoding", "gzip");
        assert_eq!(
            header_lines(&headers, false),
            ["Content-Encoding: gzip", "Content-Length: 4"]
        );
        assert!(header_lines(&headers, true).is_empty());
    }

    #[test]
    fn insecure_flag_needs_https() {
        let mut plain = HttpRequest::new("GET", "http://example.com");
        let command = convert(&mut plain, &[CurlOption::InsecureSkipVerify]).unwrap();
        assert!(!command.tokens().contains(&"-k".to_string()));

        let mut secure = HttpRequest::new("GET", "https://example.com");
        let command = convert(&mut secure, &[CurlOption::InsecureSkipVerify]).unwrap();
        assert_eq!(command.to_string(), "curl -k -X 'GET' 'https://example.com'");
    }

    #[test]
    fn insecure_flag_matches_uppercase_https() {
        let mut request = HttpRequest::new("GET", "HTTPS://example.com/");
        let command = convert(&mut request, &[CurlOption::InsecureSkipVerify]).unwrap();
        assert_eq!(command.to_string(), "curl -k -X 'GET' 'https://example.com/'");
    }

    #[test]
    fn insecure_flag_ignores_tls_flag_for_schemeless_urls() {
        let mut request = HttpRequest::new("GET", "/x").with_tls(true);
        request.url.host = "example.com".to_string();
        let command = convert(&mut request, &[CurlOption::InsecureSkipVerify]).unwrap();
        assert_eq!(command.to_string(), "curl -X 'GET' 'https://example.com/x'");
    }

    #[test]
    fn compressed_flag_is_last() {
        let mut request = HttpRequest::new("GET", "http://example.com");
        let command = convert(&mut request, &[CurlOption::Compression]).unwrap();
        assert_eq!(command.to_string(), "curl -X 'GET' 'http://example.com' --compressed");
    }

    #[test]
    fn resolve_url_uses_full_form_when_scheme_present() {
        let request = HttpRequest::new("GET", "http://example.com/a?b=c#d");
        assert_eq!(resolve_url(&request), "http://example.com/a?b=c#d");
    }

    #[test]
    fn resolve_url_synthesizes_scheme_and_drops_query() {
        let mut request = HttpRequest::new("GET", "/todos?page=2");
        request.url.host = "api.local:8080".to_string();
        assert_eq!(resolve_url(&request), "http://api.local:8080/todos");

        request.tls = true;
        assert_eq!(resolve_url(&request), "https://api.local:8080/todos");
    }

    #[test]
    fn resolve_url_inserts_slash_before_relative_path() {
        let request = HttpRequest {
            url: RequestUrl {
                host: "h".to_string(),
                path: "p".to_string(),
                ..RequestUrl::default()
            },
            ..HttpRequest::new("GET", "")
        };
        assert_eq!(resolve_url(&request), "http://h/p");
    }

    #[test]
    fn method_is_quoted() {
        let mut request = HttpRequest::new("PATCH", "http://example.com");
        let command = convert(&mut request, &[]).unwrap();
        assert_eq!(command.tokens()[..3], ["curl", "-X", "'PATCH'"]);
    }
}
