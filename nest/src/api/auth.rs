//! HTTP Basic authentication.
//!
//! [`Authenticated`] is an extractor: placing it first in a handler's
//! argument list rejects the request with 401 before the body is read.

use axum::{extract::FromRequestParts, http::header, http::request::Parts};
use base64::{engine::general_purpose::STANDARD, Engine as _};

use super::server::AppState;
use super::types::ApiError;

/// Proof that the request carried valid credentials.
#[derive(Debug, Clone)]
pub struct Authenticated {
    pub username: String,
}

impl FromRequestParts<AppState> for Authenticated {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let (username, password) = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(decode_basic)
            .ok_or(ApiError::NotAuthenticated)?;

        if !state.credentials.verify(&username, &password) {
            tracing::warn!(username = %username, "rejected credentials");
            return Err(ApiError::InvalidCredentials);
        }

        Ok(Self { username })
    }
}

/// Decode `Basic <base64(username:password)>`.
fn decode_basic(value: &str) -> Option<(String, String)> {
    let (scheme, encoded) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }
    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}

/// Build an `Authorization` header value.
#[cfg(test)]
pub(crate) fn basic_header(username: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{}:{}", username, password)))
}
