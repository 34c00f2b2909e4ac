//! Turn an in-memory HTTP request into a copy/paste curl command.
//!
//! # Overview
//! [`convert`] takes an [`HttpRequest`] plus zero or more [`CurlOption`]s and
//! returns a [`CurlCommand`] whose `Display` form is a single shell command
//! line. Nothing touches the network; the only I/O is draining the request
//! body, which is put back on the request as an in-memory copy.
//!
//! # Design
//! - Every piece of request data is emitted as one single-quoted shell word
//!   (see [`shell_quote`]).
//! - Headers are emitted in sorted name order, so output is deterministic.
//! - Errors abort the whole call; there is no partial command.
//!
//! ```
//! use curlify_core::{convert, CurlOption, HttpRequest};
//!
//! let mut request = HttpRequest::new("GET", "https://example.com/")
//!     .with_header("accept", "application/json");
//! let command = convert(&mut request, &[CurlOption::Compression]).unwrap();
//! assert_eq!(
//!     command.to_string(),
//!     "curl -X 'GET' -H 'Accept: application/json' 'https://example.com/' --compressed"
//! );
//! ```

mod body;
pub mod command;
pub mod convert;
pub mod error;
pub mod escape;
pub mod http;
pub mod options;

pub use command::CurlCommand;
pub use convert::{convert, convert_with, resolve_url};
pub use error::{ConvertError, ConvertErrorKind};
pub use escape::shell_quote;
pub use http::{Body, Headers, HttpRequest, RequestUrl};
pub use options::{CurlOption, CurlOptions};
