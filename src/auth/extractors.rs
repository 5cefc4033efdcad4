use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use tracing::{debug, warn};

use super::jwt::TokenService;
use crate::error::{ApiError, INVALID_TOKEN};

/// Authenticated caller; holds the token subject (the user's email).
#[derive(Debug, Clone)]
pub struct AuthUser(pub String);

/// Pulls the bearer token out of `Authorization` and validates it.
pub fn authorize(headers: &HeaderMap, tokens: &TokenService) -> Result<String, ApiError> {
    let Some(value) = headers.get(AUTHORIZATION) else {
        debug!("missing Authorization header");
        return Err(ApiError::Unauthorized(INVALID_TOKEN));
    };

    let token = value
        .to_str()
        .ok()
        .and_then(|v| v.trim().split_once(' '))
        .filter(|(scheme, _)| scheme.eq_ignore_ascii_case("bearer"))
        .map(|(_, token)| token.trim())
        .filter(|token| !token.is_empty())
        .ok_or_else(|| {
            debug!("Authorization header is not a bearer credential");
            ApiError::Unauthorized(INVALID_TOKEN)
        })?;

    let claims = tokens.validate(token).map_err(|_| {
        warn!("invalid or expired token");
        ApiError::Unauthorized(INVALID_TOKEN)
    })?;

    Ok(claims.sub)
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    Arc<TokenService>: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let tokens = Arc::<TokenService>::from_ref(state);
        authorize(&parts.headers, &tokens).map(AuthUser)
    }
}
