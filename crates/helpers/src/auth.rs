//! HTTP Basic authentication for Functions
//!
//! The expected credentials come from the `AUTH_USERNAME` and `AUTH_PASSCODE`
//! configuration values. Both fields are always compared, in constant time, so a
//! caller cannot learn which one was wrong from the response time.

use once_cell::sync::Lazy;
use regex::Regex;
use runtime_helpers_common::constants::{AUTH_PASSCODE_KEY, AUTH_USERNAME_KEY};
use runtime_helpers_common::{FunctionEvent, HelperError, Result, decode_header_token};
use sha2::{Digest, Sha256};
use std::fmt;
use subtle::ConstantTimeEq;
use tracing::debug;

use crate::context::Context;

/// `Basic <token>`, scheme case-insensitive, surrounding spaces allowed
static BASIC_SCHEME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^ *(?i:basic) +([A-Za-z0-9._~+/-]+=*) *$").expect("valid basic scheme regex")
});

/// `user:pass`, split on the first colon
static USER_PASS_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([^:]*):(.*)$").expect("valid user-pass regex"));

/// Credentials decoded from an `Authorization` header
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub name: String,
    pub pass: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("name", &self.name)
            .field("pass", &"<redacted>")
            .finish()
    }
}

/// Compares a supplied secret against an expected one
pub trait SecretComparator {
    fn matches(&self, supplied: &str, expected: &str) -> bool;
}

/// Constant-time comparison of the SHA-256 digests of both values
///
/// Hashing first gives both operands the same length, so the comparison time
/// does not depend on how long the expected value is.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConstantTimeComparator;

impl SecretComparator for ConstantTimeComparator {
    fn matches(&self, supplied: &str, expected: &str) -> bool {
        let supplied = Sha256::digest(supplied.as_bytes());
        let expected = Sha256::digest(expected.as_bytes());
        supplied.as_slice().ct_eq(expected.as_slice()).into()
    }
}

/// Parse a Basic `Authorization` header value
///
/// Returns `None` if the scheme is not `Basic`, the token is not valid base64, or
/// the decoded text has no colon.
pub fn parse_basic_credentials(header: &str) -> Option<Credentials> {
    let token = BASIC_SCHEME_REGEX.captures(header)?.get(1)?.as_str();
    let decoded = decode_header_token(token).ok()?;
    let decoded = String::from_utf8_lossy(&decoded);

    let parts = USER_PASS_REGEX.captures(&decoded)?;
    Some(Credentials {
        name: parts.get(1)?.as_str().to_string(),
        pass: parts.get(2)?.as_str().to_string(),
    })
}

/// Check the request's Basic credentials against the configured ones
///
/// # Errors
///
/// `MissingConfig` if `AUTH_USERNAME` or `AUTH_PASSCODE` is unset or empty,
/// `MissingHeader` if the request has no `Authorization` header. A header that
/// is present but malformed yields `Ok(false)`.
pub fn is_authenticated(ctx: &Context, event: &FunctionEvent) -> Result<bool> {
    is_authenticated_with(ctx, event, &ConstantTimeComparator)
}

/// [`is_authenticated`] with an explicit comparator
pub fn is_authenticated_with<C>(ctx: &Context, event: &FunctionEvent, comparator: &C) -> Result<bool>
where
    C: SecretComparator + ?Sized,
{
    let expected_name = ctx.require_var(AUTH_USERNAME_KEY)?;
    let expected_pass = ctx.require_var(AUTH_PASSCODE_KEY)?;

    if !event.headers.contains_key("authorization") {
        return Err(HelperError::MissingHeader("authorization".to_string()));
    }

    let Some(credentials) = event.authorization().and_then(parse_basic_credentials) else {
        debug!("Authorization header is not valid Basic credentials");
        return Ok(false);
    };

    // Non-short-circuiting: the passcode is compared even when the name differs.
    let mut valid = comparator.matches(&credentials.name, expected_name);
    valid &= comparator.matches(&credentials.pass, expected_pass);

    if !valid {
        debug!("Basic credentials did not match");
    }
    Ok(valid)
}
