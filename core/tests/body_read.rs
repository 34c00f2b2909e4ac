//! Body streams that fail while being drained.

use std::io::{self, Read};

use curlify_core::{convert, Body, ConvertErrorKind, HttpRequest};

struct BrokenStream;

impl Read for BrokenStream {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::TimedOut, "stalled upstream"))
    }
}

#[test]
fn body_read_failure_is_reported() {
    let mut request =
        HttpRequest::new("POST", "http://example.com").with_body(Body::from_reader(BrokenStream));

    let err = convert(&mut request, &[]).unwrap_err();
    assert_eq!(err.kind(), ConvertErrorKind::BodyRead);
    assert!(err.to_string().contains("stalled upstream"));
}
