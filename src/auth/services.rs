use std::sync::Arc;

use anyhow::Context;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, instrument, warn};

use super::{
    jwt::{TokenError, TokenService},
    password::{hash_password, verify_password},
    repo::{StoreError, UserStore},
    repo_types::User,
};

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Email already registered")]
    Conflict,
    #[error("Invalid email")]
    InvalidEmail,
    #[error("Password must not be empty")]
    EmptyPassword,
    /// Unknown email and wrong password both end up here.
    #[error("Invalid credentials")]
    Unauthorized,
    #[error(transparent)]
    Token(#[from] TokenError),
    #[error(transparent)]
    Store(StoreError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<StoreError> for AuthError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Conflict => AuthError::Conflict,
            other => AuthError::Store(other),
        }
    }
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Registration and login on top of a user store and the token service.
pub struct AuthService {
    users: Arc<dyn UserStore>,
    tokens: Arc<TokenService>,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, tokens: Arc<TokenService>) -> Self {
        Self { users, tokens }
    }

    #[instrument(skip(self, password))]
    pub async fn register(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = normalize_email(email);
        if !is_valid_email(&email) {
            warn!(%email, "invalid email");
            return Err(AuthError::InvalidEmail);
        }
        if password.is_empty() {
            warn!("empty password");
            return Err(AuthError::EmptyPassword);
        }

        // saves a hash for the common case; insert_if_absent is what guarantees uniqueness
        if self.users.find_by_email(&email).await?.is_some() {
            warn!(%email, "email already registered");
            return Err(AuthError::Conflict);
        }

        let plain = password.to_owned();
        let hash = tokio::task::spawn_blocking(move || hash_password(&plain))
            .await
            .context("password hashing task")??;

        let user = self.users.insert_if_absent(&email, &hash).await.map_err(|e| {
            if matches!(e, StoreError::Conflict) {
                warn!(%email, "lost registration race");
            }
            AuthError::from(e)
        })?;

        info!(user_id = %user.id, email = %user.email, "user registered");
        Ok(user)
    }

    /// Returns a signed access token whose subject is the user's email.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<String, AuthError> {
        let email = normalize_email(email);

        let Some(user) = self.users.find_by_email(&email).await? else {
            warn!(%email, "login unknown email");
            return Err(AuthError::Unauthorized);
        };

        let plain = password.to_owned();
        let stored = user.password_hash.clone();
        let ok = tokio::task::spawn_blocking(move || verify_password(&plain, &stored))
            .await
            .context("password verification task")?;

        if !ok {
            warn!(%email, user_id = %user.id, "login invalid password");
            return Err(AuthError::Unauthorized);
        }

        let token = self.tokens.issue_access(&user.email)?;
        info!(user_id = %user.id, email = %user.email, "user logged in");
        Ok(token)
    }

    /// Get-or-create for the demo account. Returns whether a user was created.
    pub async fn seed_demo_user(&self, email: &str, password: &str) -> Result<bool, AuthError> {
        match self.register(email, password).await {
            Ok(_) => Ok(true),
            Err(AuthError::Conflict) => {
                info!(%email, "demo user already exists");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }
}
