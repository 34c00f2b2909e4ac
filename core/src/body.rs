//! Request body handling: drain, re-buffer, optionally gunzip, render.

use std::borrow::Cow;
use std::io::{self, Cursor, Read};

use flate2::read::MultiGzDecoder;
use tracing::debug;

use crate::command::CommandBuilder;
use crate::error::ConvertError;
use crate::escape::shell_quote;
use crate::http::{Body, HttpRequest};
use crate::options::CurlOptions;

/// The body bytes a command will carry, after optional decompression.
#[derive(Debug, Default)]
pub(crate) struct PreparedBody {
    pub(crate) bytes: Vec<u8>,
    /// Set when the bytes were gunzipped; the original encoding and length
    /// headers no longer describe them.
    pub(crate) decompressed: bool,
}

/// Drain the request body and put a replayable copy of the raw bytes back.
///
/// Returns `None` when the request has no body. On a read error the bytes
/// already read are chained in front of the remaining stream, so the caller
/// loses nothing.
pub(crate) fn drain(request: &mut HttpRequest) -> Result<Option<Vec<u8>>, ConvertError> {
    let Some(mut body) = request.body.take() else {
        return Ok(None);
    };

    let mut buffer = Vec::new();
    if let Err(err) = body.read_to_end(&mut buffer) {
        request.body = Some(Body::from_reader(Cursor::new(buffer).chain(body)));
        return Err(ConvertError::BodyRead(err));
    }

    request.body = Some(Body::from_bytes(buffer.clone()));
    Ok(Some(buffer))
}

/// Drain the body and gunzip it when asked to and the request declares
/// `Content-Encoding: gzip` (exact, case-sensitive value).
pub(crate) fn prepare(
    request: &mut HttpRequest,
    options: &CurlOptions,
) -> Result<Option<PreparedBody>, ConvertError> {
    let Some(bytes) = drain(request)? else {
        return Ok(None);
    };

    let gzipped = request.headers.get("Content-Encoding") == Some("gzip");
    if options.auto_decompress_gzip && gzipped {
        let inflated = gunzip(&bytes).map_err(ConvertError::Decompression)?;
        debug!(
            compressed = bytes.len(),
            decompressed = inflated.len(),
            "decompressed gzip body"
        );
        return Ok(Some(PreparedBody {
            bytes: inflated,
            decompressed: true,
        }));
    }

    debug!(len = bytes.len(), "buffered request body");
    Ok(Some(PreparedBody {
        bytes,
        decompressed: false,
    }))
}

/// Inflate every gzip member in `data`. Bytes after the last member that do
/// not start another member are an error.
fn gunzip(data: &[u8]) -> io::Result<Vec<u8>> {
    if data.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "empty gzip stream",
        ));
    }
    let mut decoder = MultiGzDecoder::new(data);
    let mut out = Vec::new();
    decoder.read_to_end(&mut out)?;
    Ok(out)
}

/// Emit the body tokens. An empty body emits nothing.
///
/// The body is quoted and every newline becomes the two characters `\n`. By
/// default that text is inlined after `-d`. With escaped newlines it is fed
/// through `echo -e`, which turns `\n` back into real newlines, and curl reads
/// it from stdin.
pub(crate) fn render(body: &PreparedBody, options: &CurlOptions, command: &mut CommandBuilder) {
    if body.bytes.is_empty() {
        return;
    }

    let text = String::from_utf8_lossy(&body.bytes);
    if let Cow::Owned(_) = text {
        debug!(len = body.bytes.len(), "body is not valid UTF-8; invalid sequences replaced");
    }
    let escaped = shell_quote(&text).replace('\n', "\\n");

    if options.escaped_newlines {
        command.set_prefix(["echo", "-e", escaped.as_str(), "|"]);
        command.push_pair("-d", "@-");
    } else {
        command.push_pair("-d", escaped);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingReader {
        served: bool,
    }

    impl Read for FailingReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.served {
                return Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset"));
            }
            self.served = true;
            buf[..3].copy_from_slice(b"abc");
            Ok(3)
        }
    }

    #[test]
    fn drain_without_body_is_none() {
        let mut request = HttpRequest::new("GET", "http://example.com");
        assert!(drain(&mut request).unwrap().is_none());
        assert!(request.body.is_none());
    }

    #[test]
    fn drain_leaves_a_replayable_body() {
        let mut request = HttpRequest::new("POST", "http://example.com").with_body("payload");
        assert_eq!(drain(&mut request).unwrap().unwrap(), b"payload");

        let mut replay = String::new();
        request.body.as_mut().unwrap().read_to_string(&mut replay).unwrap();
        assert_eq!(replay, "payload");
    }

    #[test]
    fn drain_failure_keeps_bytes_already_read() {
        let mut request = HttpRequest::new("POST", "http://example.com")
            .with_body(Body::from_reader(FailingReader { served: false }));
        let err = drain(&mut request).unwrap_err();
        assert!(matches!(err, ConvertError::BodyRead(_)));

        let mut first = [0u8; 3];
        request.body.as_mut().unwrap().read_exact(&mut first).unwrap();
        assert_eq!(&first, b"abc");
    }

    #[test]
    fn gunzip_rejects_empty_input() {
        assert_eq!(gunzip(&[]).unwrap_err().kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn gzip_is_ignored_without_the_option() {
        let mut request = HttpRequest::new("POST", "http://example.com")
            .with_header("Content-Encoding", "gzip")
            .with_body(vec![0x01u8, 0x02]);
        let prepared = prepare(&mut request, &CurlOptions::default()).unwrap().unwrap();
        assert_eq!(prepared.bytes, [0x01, 0x02]);
        assert!(!prepared.decompressed);
    }

    #[test]
    fn encoding_match_is_case_sensitive() {
        let options = CurlOptions {
            auto_decompress_gzip: true,
            ..CurlOptions::default()
        };
        let mut request = HttpRequest::new("POST", "http://example.com")
            .with_header("Content-Encoding", "GZIP")
            .with_body("plain");
        let prepared = prepare(&mut request, &options).unwrap().unwrap();
        assert_eq!(prepared.bytes, b"plain");
        assert!(!prepared.decompressed);
    }

    #[test]
    fn render_inlines_with_literal_newlines() {
        let mut command = CommandBuilder::new(CurlOptions::default());
        let body = PreparedBody {
            bytes: b"a\nb".to_vec(),
            decompressed: false,
        };
        render(&body, &CurlOptions::default(), &mut command);
        assert_eq!(command.finish().to_string(), "-d 'a\\nb'");
    }

    #[test]
    fn render_replaces_invalid_utf8() {
        let mut command = CommandBuilder::new(CurlOptions::default());
        let body = PreparedBody {
            bytes: vec![b'a', 0xff, b'b'],
            decompressed: false,
        };
        render(&body, &CurlOptions::default(), &mut command);
        assert_eq!(command.finish().to_string(), "-d 'a\u{fffd}b'");
    }

    #[test]
    fn render_skips_empty_body() {
        let mut command = CommandBuilder::new(CurlOptions::default());
        render(&PreparedBody::default(), &CurlOptions::default(), &mut command);
        assert!(command.finish().tokens().is_empty());
    }
}
