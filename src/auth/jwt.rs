use std::sync::Arc;

use axum::extract::FromRef;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use time::{Duration, OffsetDateTime};
use tracing::{debug, warn};

use super::claims::Claims;
use crate::{
    config::{ConfigError, JwtConfig},
    state::AppState,
};

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// Malformed, badly signed or expired. Callers only ever see this one.
    #[error("invalid or expired token")]
    Invalid,
    #[error("token expiry out of range")]
    ExpiryOverflow,
    #[error("jwt signing failed: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

/// Issues and validates HMAC-signed access tokens.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    algorithm: Algorithm,
    access_ttl: Duration,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("algorithm", &self.algorithm)
            .field("access_ttl", &self.access_ttl)
            .finish_non_exhaustive()
    }
}

impl FromRef<AppState> for Arc<TokenService> {
    fn from_ref(state: &AppState) -> Self {
        state.tokens.clone()
    }
}

impl TokenService {
    /// Fails when the secret is unset, the algorithm is not an HMAC one or the
    /// TTL is out of range.
    pub fn new(cfg: &JwtConfig) -> Result<Self, ConfigError> {
        if cfg.secret.is_empty() {
            return Err(ConfigError::Missing("SECRET_KEY"));
        }
        let algorithm = cfg.algorithm()?;
        let access_ttl = cfg.ttl()?;
        Ok(Self {
            encoding: EncodingKey::from_secret(cfg.secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            algorithm,
            access_ttl,
        })
    }

    pub fn issue(&self, subject: &str, ttl: Duration) -> Result<String, TokenError> {
        let now = OffsetDateTime::now_utc();
        let exp = now.checked_add(ttl).ok_or(TokenError::ExpiryOverflow)?;
        let claims = Claims {
            sub: subject.to_owned(),
            iat: now.unix_timestamp(),
            exp: exp.unix_timestamp(),
        };
        let token = encode(&Header::new(self.algorithm), &claims, &self.encoding)
            .map_err(TokenError::Signing)?;
        debug!(sub = %subject, exp = %exp, "jwt signed");
        Ok(token)
    }

    pub fn issue_access(&self, subject: &str) -> Result<String, TokenError> {
        self.issue(subject, self.access_ttl)
    }

    pub fn validate(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;

        let data = decode::<Claims>(token, &self.decoding, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => debug!("jwt expired"),
                ErrorKind::InvalidSignature => warn!("jwt signature mismatch"),
                other => warn!(reason = ?other, "jwt rejected"),
            }
            TokenError::Invalid
        })?;

        // the library accepts exp == now; a token is dead from its exp second on
        if data.claims.exp <= OffsetDateTime::now_utc().unix_timestamp() {
            debug!("jwt expired");
            return Err(TokenError::Invalid);
        }

        debug!(sub = %data.claims.sub, "jwt verified");
        Ok(data.claims)
    }
}
