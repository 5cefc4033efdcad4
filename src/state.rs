use std::sync::Arc;

use sqlx::PgPool;

use crate::auth::{
    jwt::TokenService,
    repo::{PgUserStore, UserStore},
    services::AuthService,
};
use crate::config::{AppConfig, ConfigError};
use crate::energy::repo::{EnergyStore, PgEnergyStore};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub tokens: Arc<TokenService>,
    pub auth: Arc<AuthService>,
    pub energy: Arc<dyn EnergyStore>,
}

impl AppState {
    /// Wires the Postgres-backed stores.
    pub fn init(config: AppConfig, db: PgPool) -> Result<Self, ConfigError> {
        Self::from_parts(
            config,
            Arc::new(PgUserStore::new(db.clone())),
            Arc::new(PgEnergyStore::new(db)),
        )
    }

    pub fn from_parts(
        config: AppConfig,
        users: Arc<dyn UserStore>,
        energy: Arc<dyn EnergyStore>,
    ) -> Result<Self, ConfigError> {
        let tokens = Arc::new(TokenService::new(&config.jwt)?);
        let auth = Arc::new(AuthService::new(users, tokens.clone()));
        Ok(Self {
            config: Arc::new(config),
            tokens,
            auth,
            energy,
        })
    }
}
