//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! The request handle is opaque: C callers build it up through
//! `curlify_request_*` calls and never see its layout. Results come back in a
//! single envelope carrying an error code plus either the command or a message.

use std::ffi::CString;
use std::os::raw::c_char;

use curlify_core::{ConvertError, ConvertErrorKind, CurlCommand, HttpRequest};

/// Option bit for `-k` on https URLs.
pub const CURLIFY_OPT_INSECURE: u32 = 1 << 0;
/// Option bit for a trailing `--compressed`.
pub const CURLIFY_OPT_COMPRESSED: u32 = 1 << 1;
/// Option bit for gunzipping `Content-Encoding: gzip` bodies.
pub const CURLIFY_OPT_DECOMPRESS_GZIP: u32 = 1 << 2;
/// Option bit for piping the body through `echo -e`.
pub const CURLIFY_OPT_ESCAPE_NEWLINES: u32 = 1 << 3;

/// Opaque handle to an `HttpRequest`.
pub struct FfiRequest {
    pub(crate) inner: HttpRequest,
}

/// Error codes returned in `FfiCurlResult`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    BodyRead = 1,
    Decompression = 2,
    NullArg = 3,
    Panic = 4,
    /// The command contains a NUL byte and cannot be returned as a C string.
    InteriorNul = 5,
}

/// Result envelope for `curlify_convert`.
///
/// On success `error_code` is `Ok`, `command` holds the command line and
/// `error_message` is null. On failure `command` is null.
#[repr(C)]
pub struct FfiCurlResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub command: *mut c_char,
}

impl FfiCurlResult {
    pub(crate) fn ok(command: CurlCommand) -> *mut Self {
        match CString::new(command.into_string()) {
            Ok(command) => Self::boxed(FfiErrorCode::Ok, None, command.into_raw()),
            Err(_) => Self::error(FfiErrorCode::InteriorNul, "command contains a NUL byte"),
        }
    }

    pub(crate) fn from_error(err: ConvertError) -> *mut Self {
        let code = match err.kind() {
            ConvertErrorKind::BodyRead => FfiErrorCode::BodyRead,
            ConvertErrorKind::Decompression => FfiErrorCode::Decompression,
        };
        Self::error(code, &err.detail())
    }

    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::error(FfiErrorCode::NullArg, &format!("null argument: {name}"))
    }

    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::error(FfiErrorCode::Panic, msg)
    }

    fn error(code: FfiErrorCode, msg: &str) -> *mut Self {
        let message = CString::new(msg.replace('\0', " ")).unwrap_or_default();
        Self::boxed(code, Some(message), std::ptr::null_mut())
    }

    fn boxed(error_code: FfiErrorCode, message: Option<CString>, command: *mut c_char) -> *mut Self {
        let result = Box::new(FfiCurlResult {
            error_code,
            error_message: message.map_or(std::ptr::null_mut(), CString::into_raw),
            command,
        });
        Box::into_raw(result)
    }
}
