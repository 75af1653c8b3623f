//! Custom Axum extractors.
//!
//! - `MaybeBearerToken`: an optional `Authorization: Bearer` token

use crate::error::AppError;
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

/// Bearer token from the `Authorization` header, if one was sent.
///
/// No header yields `None`. A header that is present but is not a
/// non-empty `Bearer` credential is rejected with 401, so callers never
/// silently fall back to anonymous handling on a garbled token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaybeBearerToken(pub Option<String>);

impl MaybeBearerToken {
    fn parse(value: &str) -> Option<String> {
        let (scheme, token) = value.trim().split_once(' ')?;
        let token = token.trim();
        (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then(|| token.to_string())
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for MaybeBearerToken
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(header) = parts.headers.get(AUTHORIZATION) else {
            return Ok(Self(None));
        };

        header
            .to_str()
            .ok()
            .and_then(Self::parse)
            .map(|token| Self(Some(token)))
            .ok_or_else(|| AppError::unauthorized("Invalid authorization header"))
    }
}
