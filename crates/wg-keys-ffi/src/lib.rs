//! wg-keys C FFI bindings.
//!
//! Provides a C-compatible API for key pair generation, public key
//! derivation, and preshared key generation.
//!
#![allow(clippy::doc_overindented_list_items)]
//! # Memory contract
//!
//! - All `*mut c_char` output strings are heap-allocated via [`CString`] and
//!   **must** be freed by the caller using [`wgk_free_string`].
//! - The static string returned by [`wgk_version`] is baked into the binary;
//!   it must **not** be freed.
//!
//! # Error codes
//!
//! | Constant                | Value | Meaning                               |
//! |-------------------------|-------|---------------------------------------|
//! | `WGK_OK`                | 0     | Success                               |
//! | `WGK_ERR_NULL_PTR`      | -1    | A required pointer was null           |
//! | `WGK_ERR_INVALID_UTF8`  | -2    | A string was not valid UTF-8          |
//! | `WGK_ERR_INVALID_KEY`   | -3    | Key text was not a valid 32-byte key  |
//! | `WGK_ERR_ENTROPY`       | -4    | The OS random source failed           |
//! | `WGK_ERR_SERIALIZATION` | -5    | JSON serialization failure            |
//!
//! [`wgk_generate_key_pair`] reports a bad private key inside its JSON body
//! (`{"error": ...}`) and still returns `WGK_OK`, so C callers branch on the
//! body the same way browser callers do.

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

use wg_keys::{generate_key_pair, generate_pre_key, KeyError, KeyPairResponse};

// ── Error codes ───────────────────────────────────────────────────────────────

/// Success.
pub const WGK_OK: i32 = 0;
/// A required pointer argument was null.
pub const WGK_ERR_NULL_PTR: i32 = -1;
/// A string argument contained invalid UTF-8.
pub const WGK_ERR_INVALID_UTF8: i32 = -2;
/// Key text did not decode to exactly 32 bytes.
pub const WGK_ERR_INVALID_KEY: i32 = -3;
/// The secure random source could not produce bytes.
pub const WGK_ERR_ENTROPY: i32 = -4;
/// A JSON serialization operation failed.
pub const WGK_ERR_SERIALIZATION: i32 = -5;

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Convert a `*const c_char` to a `&str`, returning an error code on failure.
///
/// # Safety
///
/// `ptr` must either be null (handled gracefully) or point to a valid,
/// null-terminated C string that remains valid for the duration of `'a`.
unsafe fn cstr_to_str<'a>(ptr: *const c_char) -> Result<&'a str, i32> {
    if ptr.is_null() {
        return Err(WGK_ERR_NULL_PTR);
    }
    CStr::from_ptr(ptr)
        .to_str()
        .map_err(|_| WGK_ERR_INVALID_UTF8)
}

/// Allocate a `CString` and write it into `*out`.
///
/// # Safety
///
/// `out` must be non-null.
unsafe fn write_string_out(s: String, out: *mut *mut c_char) -> i32 {
    if out.is_null() {
        return WGK_ERR_NULL_PTR;
    }
    match CString::new(s) {
        Ok(cs) => {
            *out = cs.into_raw();
            WGK_OK
        }
        Err(_) => WGK_ERR_SERIALIZATION,
    }
}

/// Map a [`KeyError`] to one of the `WGK_ERR_*` constants.
fn map_error(e: &KeyError) -> i32 {
    match e {
        KeyError::EntropyFailure(_) => {
            log::error!("{e}");
            WGK_ERR_ENTROPY
        }
        KeyError::InvalidEncoding(_)
        | KeyError::InvalidLength(_)
        | KeyError::InvalidField { .. } => WGK_ERR_INVALID_KEY,
        KeyError::InvalidConfig { .. } => WGK_ERR_SERIALIZATION,
    }
}

// ── Version ───────────────────────────────────────────────────────────────────

/// Return the library version string as a null-terminated C string.
///
/// The caller **must not** free this pointer.
#[no_mangle]
pub extern "C" fn wgk_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}

// ── Keys ──────────────────────────────────────────────────────────────────────

/// Generate a key pair, or derive the public key of `private_key`.
///
/// # Parameters
///
/// - `private_key` — base64 private key; pass `NULL` to generate a new one.
/// - `json_out`    — on `WGK_OK`, receives `{"private":...,"public":...}` or
///                   `{"error":...}` as an owned string that the caller must
///                   free with [`wgk_free_string`].
///
/// # Returns
///
/// `WGK_OK` whenever a JSON body was written, including decode failures;
/// `WGK_ERR_ENTROPY` if generation could not draw random bytes.
///
/// # Safety
///
/// `json_out` must be non-null. `private_key` may be null.
#[no_mangle]
pub unsafe extern "C" fn wgk_generate_key_pair(
    private_key: *const c_char, // nullable
    json_out: *mut *mut c_char,
) -> i32 {
    let existing = if private_key.is_null() {
        None
    } else {
        match cstr_to_str(private_key) {
            Ok(s) => Some(s),
            Err(e) => return e,
        }
    };

    if json_out.is_null() {
        return WGK_ERR_NULL_PTR;
    }

    let response = match generate_key_pair(existing) {
        Ok(r) => r,
        Err(e) => return map_error(&e),
    };

    match response.to_json() {
        Ok(json) => write_string_out(json, json_out),
        Err(_) => WGK_ERR_SERIALIZATION,
    }
}

/// Derive the base64 public key for a base64 private key.
///
/// # Returns
///
/// `WGK_OK` on success, `WGK_ERR_INVALID_KEY` if `private_key` does not
/// decode to 32 bytes.
///
/// # Safety
///
/// Both pointers must be non-null; `private_key` must be a valid C string.
#[no_mangle]
pub unsafe extern "C" fn wgk_public_key(
    private_key: *const c_char,
    public_out: *mut *mut c_char,
) -> i32 {
    let text = match cstr_to_str(private_key) {
        Ok(s) => s,
        Err(e) => return e,
    };

    if public_out.is_null() {
        return WGK_ERR_NULL_PTR;
    }

    match generate_key_pair(Some(text)) {
        Ok(KeyPairResponse::Pair { public, .. }) => write_string_out(public, public_out),
        Ok(KeyPairResponse::Failure { .. }) => WGK_ERR_INVALID_KEY,
        Err(e) => map_error(&e),
    }
}

/// Generate a base64 preshared key into `*key_out`.
///
/// # Safety
///
/// `key_out` must be non-null.
#[no_mangle]
pub unsafe extern "C" fn wgk_generate_pre_key(key_out: *mut *mut c_char) -> i32 {
    if key_out.is_null() {
        return WGK_ERR_NULL_PTR;
    }
    match generate_pre_key() {
        Ok(psk) => write_string_out(psk, key_out),
        Err(e) => map_error(&e),
    }
}

// ── Memory ────────────────────────────────────────────────────────────────────

/// Free a string previously returned by one of the `wgk_*` functions.
///
/// Passing `NULL` is a no-op.
///
/// # Safety
///
/// `s` must be either null or a pointer that was returned by one of the
/// `wgk_*` functions in this crate and that has not already been freed.
#[no_mangle]
pub unsafe extern "C" fn wgk_free_string(s: *mut c_char) {
    if !s.is_null() {
        drop(CString::from_raw(s));
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
