//! HTTP Basic auth gate for the action endpoint.
//!
//! One configured username/password pair. Both fields are compared in constant
//! time and independently, so neither the position of the first mismatching
//! byte nor which field failed is observable from timing.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use base64::Engine;
use std::sync::Arc;
use subtle::{Choice, ConstantTimeEq};

const REALM_CHALLENGE: &str = "Basic realm=\"magic-mirror\"";

/// The single accepted credential pair.
#[derive(Clone)]
pub struct Credentials {
    username: String,
    password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// True while the pair is still the compiled-in default.
    pub fn is_builtin_default(&self) -> bool {
        crate::config::uses_default_credentials(&self.username, &self.password)
    }

    /// True only when both fields match. Both comparisons always run.
    pub fn matches(&self, username: &str, password: &str) -> bool {
        let user_ok = constant_time_eq(username.as_bytes(), self.username.as_bytes());
        let pass_ok = constant_time_eq(password.as_bytes(), self.password.as_bytes());
        (user_ok & pass_ok).into()
    }
}

/// Compare two byte strings without exiting early on content or length.
/// Inputs are padded to the longer length with different fill bytes so a
/// length mismatch never compares equal.
fn constant_time_eq(provided: &[u8], expected: &[u8]) -> Choice {
    let max_len = provided.len().max(expected.len());
    let mut a = vec![0u8; max_len];
    let mut b = vec![0xFFu8; max_len];
    a[..provided.len()].copy_from_slice(provided);
    b[..expected.len()].copy_from_slice(expected);

    let lengths_equal = (provided.len() as u64).ct_eq(&(expected.len() as u64));
    lengths_equal & a.ct_eq(&b)
}

/// Parse an `Authorization` header value of the form `Basic base64(user:pass)`.
/// Returns None for any other scheme, bad base64, non-UTF-8 content, or a missing `:`.
pub fn parse_basic_auth(value: &str) -> Option<(String, String)> {
    let (scheme, encoded) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }
    let decoded = base64::engine::general_purpose::STANDARD
        .decode(encoded.trim())
        .ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (user, pass) = decoded.split_once(':')?;
    Some((user.to_string(), pass.to_string()))
}

fn basic_auth_from_headers(headers: &HeaderMap) -> Option<(String, String)> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(parse_basic_auth)
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        [(header::WWW_AUTHENTICATE, REALM_CHALLENGE)],
        "Unauthorised",
    )
        .into_response()
}

/// Middleware: reject with 401 unless the request carries the configured Basic credentials.
/// The request (body included) is passed on untouched when admitted.
pub async fn require_basic_auth(
    State(credentials): State<Arc<Credentials>>,
    req: Request,
    next: Next,
) -> Response {
    let provided = basic_auth_from_headers(req.headers());
    match provided {
        Some((user, pass)) if credentials.matches(&user, &pass) => next.run(req).await,
        Some((user, _)) => {
            log::warn!("auth: rejected credentials for user {:?} on {}", user, req.uri().path());
            unauthorized()
        }
        None => {
            log::warn!("auth: missing or malformed Authorization header on {}", req.uri().path());
            unauthorized()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(raw: &str) -> String {
        format!(
            "Basic {}",
            base64::engine::general_purpose::STANDARD.encode(raw)
        )
    }

    fn mirror() -> Credentials {
        Credentials::new("MagicMirror", "rorriMcigaM")
    }

    #[test]
    fn exact_pair_matches() {
        assert!(mirror().matches("MagicMirror", "rorriMcigaM"));
    }

    #[test]
    fn any_other_pair_is_rejected() {
        let creds = mirror();
        let cases = [
            ("MagicMirror", "password"),
            ("MagicMirror", ""),
            ("MagicMirror", "rorriMcigaM "),
            ("MagicMirror", "rorriMcigaMX"),
            ("MagicMirror", "rorriMciga"),
            ("magicmirror", "rorriMcigaM"),
            ("", "rorriMcigaM"),
            ("", ""),
            ("rorriMcigaM", "MagicMirror"),
        ];
        for (user, pass) in cases {
            assert!(!creds.matches(user, pass), "{}:{} should be rejected", user, pass);
        }
    }

    #[test]
    fn constant_time_eq_handles_lengths() {
        assert!(bool::from(constant_time_eq(b"abc", b"abc")));
        assert!(!bool::from(constant_time_eq(b"abc", b"abcd")));
        assert!(!bool::from(constant_time_eq(b"", b"a")));
        assert!(bool::from(constant_time_eq(b"", b"")));
        // shorter input padded with 0x00 must not equal expected padded with 0xFF
        assert!(!bool::from(constant_time_eq(b"ab", b"ab\xFF")));
    }

    #[test]
    fn parses_basic_header() {
        assert_eq!(
            parse_basic_auth(&encode("MagicMirror:rorriMcigaM")),
            Some(("MagicMirror".to_string(), "rorriMcigaM".to_string()))
        );
    }

    #[test]
    fn password_may_contain_colon() {
        assert_eq!(
            parse_basic_auth(&encode("user:pa:ss")),
            Some(("user".to_string(), "pa:ss".to_string()))
        );
    }

    #[test]
    fn scheme_is_case_insensitive() {
        let header = encode("a:b").replacen("Basic", "bAsIc", 1);
        assert_eq!(parse_basic_auth(&header), Some(("a".to_string(), "b".to_string())));
    }

    #[test]
    fn malformed_headers_are_rejected() {
        assert_eq!(parse_basic_auth("Bearer abc"), None);
        assert_eq!(parse_basic_auth("Basic"), None);
        assert_eq!(parse_basic_auth("Basic !!!not-base64!!!"), None);
        assert_eq!(parse_basic_auth(&encode("no-colon")), None);
        let non_utf8 = format!(
            "Basic {}",
            base64::engine::general_purpose::STANDARD.encode([0xff, 0xfe, b':', b'x'])
        );
        assert_eq!(parse_basic_auth(&non_utf8), None);
    }

    #[test]
    fn builtin_default_detected() {
        assert!(mirror().is_builtin_default());
        assert!(!Credentials::new("MagicMirror", "apple").is_builtin_default());
    }

    #[test]
    fn debug_redacts_password() {
        let printed = format!("{:?}", mirror());
        assert!(printed.contains("MagicMirror"));
        assert!(!printed.contains("rorriMcigaM"));
    }
}
