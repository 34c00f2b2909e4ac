//! Error types for request conversion.
//!
//! # Design
//! A conversion either produces a complete command or fails with one of two
//! errors. Both wrap the underlying `io::Error` so callers can inspect the
//! cause through `source()`. Neither is retried: the body stream belongs to the
//! caller and may already be partially consumed.

use std::io;

/// Errors returned by [`convert`](crate::convert()) and
/// [`convert_with`](crate::convert_with()).
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// The request body stream failed while being drained.
    #[error("failed to read request body")]
    BodyRead(#[source] io::Error),

    /// The body was declared `Content-Encoding: gzip` but is not a valid
    /// gzip stream.
    #[error("gzip decompression failed")]
    Decompression(#[source] io::Error),
}

/// Fieldless discriminant of [`ConvertError`], for callers that map errors to
/// codes (the C ABI, JSON responses).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvertErrorKind {
    BodyRead,
    Decompression,
}

impl ConvertErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ConvertErrorKind::BodyRead => "body_read",
            ConvertErrorKind::Decompression => "decompression",
        }
    }
}

impl ConvertError {
    pub fn kind(&self) -> ConvertErrorKind {
        match self {
            ConvertError::BodyRead(_) => ConvertErrorKind::BodyRead,
            ConvertError::Decompression(_) => ConvertErrorKind::Decompression,
        }
    }

    /// The I/O error behind this failure.
    pub fn cause(&self) -> &io::Error {
        match self {
            ConvertError::BodyRead(err) | ConvertError::Decompression(err) => err,
        }
    }

    /// The message followed by its cause, for single-string channels such as
    /// the C ABI and JSON error bodies.
    pub fn detail(&self) -> String {
        format!("{self}: {}", self.cause())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn display_leaves_the_cause_to_source() {
        let err = ConvertError::BodyRead(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"));
        assert_eq!(err.to_string(), "failed to read request body");
        assert_eq!(err.source().unwrap().to_string(), "pipe closed");
        assert_eq!(err.detail(), "failed to read request body: pipe closed");
    }

    #[test]
    fn source_is_the_io_error() {
        let err = ConvertError::Decompression(io::Error::new(io::ErrorKind::InvalidInput, "bad header"));
        let source = err.source().unwrap();
        assert_eq!(source.to_string(), "bad header");
        assert_eq!(err.kind(), ConvertErrorKind::Decompression);
        assert_eq!(err.kind().as_str(), "decompression");
    }
}
