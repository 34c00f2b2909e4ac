//! C-ABI wrapper around `curlify-core`.
//!
//! # Overview
//! Lets any language with a C FFI describe a request (method, URL, headers,
//! body bytes, TLS flag) and get back the equivalent curl command line.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - Options are passed as a bitmask of the `CURLIFY_OPT_*` constants.
//! - The C caller owns all returned pointers and must release them with the
//!   matching `curlify_*_free` function.

pub mod types;

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::panic::{catch_unwind, AssertUnwindSafe};

use curlify_core::{convert_with, Body, CurlOptions, HttpRequest};

pub use types::*;

/// Read a C string argument. `None` for null or non-UTF-8 input.
fn str_arg<'a>(ptr: *const c_char) -> Option<&'a str> {
    if ptr.is_null() {
        return None;
    }
    unsafe { CStr::from_ptr(ptr) }.to_str().ok()
}

// ---------------------------------------------------------------------------
// Request lifecycle
// ---------------------------------------------------------------------------

/// Create a request with `method` and `url` and no headers or body.
///
/// Returns null if either argument is null or not valid UTF-8.
/// The caller must free the returned pointer with `curlify_request_free`.
#[unsafe(no_mangle)]
pub extern "C" fn curlify_request_new(method: *const c_char, url: *const c_char) -> *mut FfiRequest {
    catch_unwind(|| {
        let (Some(method), Some(url)) = (str_arg(method), str_arg(url)) else {
            return std::ptr::null_mut();
        };
        let request = HttpRequest::new(method, url);
        Box::into_raw(Box::new(FfiRequest { inner: request }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Append a header value. Returns false on null or non-UTF-8 arguments.
#[unsafe(no_mangle)]
pub extern "C" fn curlify_request_add_header(
    request: *mut FfiRequest,
    name: *const c_char,
    value: *const c_char,
) -> bool {
    catch_unwind(AssertUnwindSafe(|| {
        if request.is_null() {
            return false;
        }
        let (Some(name), Some(value)) = (str_arg(name), str_arg(value)) else {
            return false;
        };
        let request = unsafe { &mut *request };
        request.inner.headers.append(name, value);
        true
    }))
    .unwrap_or(false)
}

/// Set the body to a copy of `len` bytes at `data`.
///
/// `data` may be null only when `len` is 0, which sets an empty body.
#[unsafe(no_mangle)]
pub extern "C" fn curlify_request_set_body(request: *mut FfiRequest, data: *const u8, len: usize) -> bool {
    catch_unwind(AssertUnwindSafe(|| {
        if request.is_null() || (data.is_null() && len > 0) {
            return false;
        }
        let bytes = if len == 0 {
            Vec::new()
        } else {
            unsafe { std::slice::from_raw_parts(data, len) }.to_vec()
        };
        let request = unsafe { &mut *request };
        request.inner.body = Some(Body::from_bytes(bytes));
        true
    }))
    .unwrap_or(false)
}

/// Record whether the request arrived over TLS. Only affects schemeless URLs.
#[unsafe(no_mangle)]
pub extern "C" fn curlify_request_set_tls(request: *mut FfiRequest, tls: bool) {
    if request.is_null() {
        return;
    }
    let _ = catch_unwind(AssertUnwindSafe(|| {
        let request = unsafe { &mut *request };
        request.inner.tls = tls;
    }));
}

/// Free a request created by `curlify_request_new`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn curlify_request_free(request: *mut FfiRequest) {
    if !request.is_null() {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            drop(unsafe { Box::from_raw(request) });
        }));
    }
}

// ---------------------------------------------------------------------------
// Conversion
// ---------------------------------------------------------------------------

/// Convert `request` into a curl command using the `CURLIFY_OPT_*` bits in
/// `options`. Unknown bits are ignored.
///
/// The request stays valid and keeps its body. The caller must free the
/// result with `curlify_free_result`.
#[unsafe(no_mangle)]
pub extern "C" fn curlify_convert(request: *mut FfiRequest, options: u32) -> *mut FfiCurlResult {
    catch_unwind(AssertUnwindSafe(|| {
        if request.is_null() {
            return FfiCurlResult::null_arg("request");
        }
        let request = unsafe { &mut *request };
        match convert_with(&mut request.inner, CurlOptions::from_bits(options)) {
            Ok(command) => FfiCurlResult::ok(command),
            Err(e) => FfiCurlResult::from_error(e),
        }
    }))
    .unwrap_or_else(|_| FfiCurlResult::panic("panic in curlify_convert"))
}

/// Free an `FfiCurlResult` returned by `curlify_convert`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn curlify_free_result(result: *mut FfiCurlResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(AssertUnwindSafe(|| {
        let result = unsafe { Box::from_raw(result) };
        if !result.error_message.is_null() {
            drop(unsafe { CString::from_raw(result.error_message) });
        }
        if !result.command.is_null() {
            drop(unsafe { CString::from_raw(result.command) });
        }
    }));
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
