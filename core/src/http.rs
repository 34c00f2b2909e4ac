//! HTTP request types consumed by the converter.
//!
//! # Design
//! The request is plain data owned by the caller. Nothing here performs I/O
//! except [`Body`], which wraps whatever reader the caller hands in. The URL
//! is kept as its raw parts rather than a normalised URL type so that a
//! schemeless capture (`/path?q`) is representable and an absolute URL is
//! displayed byte-for-byte as it was given.

use std::collections::HashMap;
use std::fmt;
use std::io::{self, Cursor, Read};

/// An HTTP request described as plain data.
///
/// `tls` records whether the transport was TLS at the point of capture; it is
/// only consulted when `url` has no scheme.
#[derive(Debug)]
pub struct HttpRequest {
    pub method: String,
    pub url: RequestUrl,
    pub headers: Headers,
    pub body: Option<Body>,
    pub tls: bool,
}

impl HttpRequest {
    pub fn new(method: &str, url: &str) -> Self {
        Self {
            method: method.to_string(),
            url: RequestUrl::parse(url),
            headers: Headers::new(),
            body: None,
            tls: false,
        }
    }

    /// Set a header, replacing any previous values under the same name.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.set(name, value);
        self
    }

    pub fn with_body(mut self, body: impl Into<Body>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_tls(mut self, tls: bool) -> Self {
        self.tls = tls;
        self
    }
}

// ---------------------------------------------------------------------------
// URL
// ---------------------------------------------------------------------------

/// The parts of a request URL. Any part may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestUrl {
    pub scheme: String,
    /// Host, including the port when one was given.
    pub host: String,
    pub path: String,
    /// Raw query string without the leading `?`.
    pub query: String,
    /// Fragment without the leading `#`.
    pub fragment: String,
}

impl RequestUrl {
    /// Split `input` into its parts. Only the scheme is normalised, to
    /// lowercase; everything else is kept as given.
    ///
    /// Accepts absolute URLs (`https://host:8443/a?b#c`) and origin-form
    /// targets as seen by a server (`/a?b`).
    pub fn parse(input: &str) -> Self {
        let (rest, fragment) = match input.split_once('#') {
            Some((rest, fragment)) => (rest, fragment),
            None => (input, ""),
        };

        let (scheme, rest) = match rest.split_once("://") {
            Some((scheme, after)) if is_scheme(scheme) => (scheme, after),
            _ => ("", rest),
        };

        let (host, rest) = if scheme.is_empty() {
            ("", rest)
        } else {
            let end = rest.find(|c: char| c == '/' || c == '?').unwrap_or(rest.len());
            rest.split_at(end)
        };

        let (path, query) = match rest.split_once('?') {
            Some((path, query)) => (path, query),
            None => (rest, ""),
        };

        Self {
            scheme: scheme.to_ascii_lowercase(),
            host: host.to_string(),
            path: path.to_string(),
            query: query.to_string(),
            fragment: fragment.to_string(),
        }
    }

    pub fn has_scheme(&self) -> bool {
        !self.scheme.is_empty()
    }
}

/// RFC 3986: `ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )`.
fn is_scheme(candidate: &str) -> bool {
    let mut chars = candidate.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

impl fmt::Display for RequestUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.scheme.is_empty() {
            write!(f, "{}://", self.scheme)?;
        } else if !self.host.is_empty() {
            f.write_str("//")?;
        }
        f.write_str(&self.host)?;
        if !self.host.is_empty() && !self.path.is_empty() && !self.path.starts_with('/') {
            f.write_str("/")?;
        }
        f.write_str(&self.path)?;
        if !self.query.is_empty() {
            write!(f, "?{}", self.query)?;
        }
        if !self.fragment.is_empty() {
            write!(f, "#{}", self.fragment)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Headers
// ---------------------------------------------------------------------------

/// Header multimap: name to the ordered list of its values.
///
/// `append`, `set` and `get` canonicalise names (`content-type` becomes
/// `Content-Type`); `insert_raw` stores the name exactly as given.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: HashMap<String, Vec<String>>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `value` after any existing values for `name`.
    pub fn append(&mut self, name: &str, value: &str) {
        self.insert_raw(&canonical_header_name(name), value);
    }

    /// Replace all values for `name` with `value`.
    pub fn set(&mut self, name: &str, value: &str) {
        self.entries
            .insert(canonical_header_name(name), vec![value.to_string()]);
    }

    /// Append under `name` verbatim, without canonicalising it.
    pub fn insert_raw(&mut self, name: &str, value: &str) {
        self.entries
            .entry(name.to_string())
            .or_default()
            .push(value.to_string());
    }

    /// First value stored under the canonical form of `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .get(&canonical_header_name(name))
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// All values stored under `name` exactly as given.
    pub fn values(&self, name: &str) -> &[String] {
        self.entries.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Header names in ordinal (byte-wise) order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// MIME canonical form of a header name: the first letter and every letter
/// after a `-` upper-cased, the rest lower-cased. Names containing bytes
/// outside the HTTP token set are returned unchanged.
pub fn canonical_header_name(name: &str) -> String {
    if !name.bytes().all(is_token_byte) {
        return name.to_string();
    }
    let mut upper = true;
    name.chars()
        .map(|c| {
            let out = if upper {
                c.to_ascii_uppercase()
            } else {
                c.to_ascii_lowercase()
            };
            upper = c == '-';
            out
        })
        .collect()
}

fn is_token_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b)
}

// ---------------------------------------------------------------------------
// Body
// ---------------------------------------------------------------------------

/// A consumable request body.
///
/// Wraps any `Read + Send` source. Once read it is exhausted, which is why the
/// converter puts a fresh in-memory body back on the request after draining it.
pub struct Body {
    reader: Box<dyn Read + Send>,
}

impl Body {
    pub fn from_reader<R>(reader: R) -> Self
    where
        R: Read + Send + 'static,
    {
        Self {
            reader: Box::new(reader),
        }
    }

    /// A replayable in-memory body.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self::from_reader(Cursor::new(bytes.into()))
    }

    pub fn empty() -> Self {
        Self::from_bytes(Vec::new())
    }
}

impl Read for Body {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reader.read(buf)
    }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Body").finish_non_exhaustive()
    }
}

impl From<Vec<u8>> for Body {
    fn from(bytes: Vec<u8>) -> Self {
        Self::from_bytes(bytes)
    }
}

impl From<&[u8]> for Body {
    fn from(bytes: &[u8]) -> Self {
        Self::from_bytes(bytes.to_vec())
    }
}

impl From<String> for Body {
    fn from(text: String) -> Self {
        Self::from_bytes(text.into_bytes())
    }
}

impl From<&str> for Body {
    fn from(text: &str) -> Self {
        Self::from_bytes(text.as_bytes().to_vec())
    }
}
