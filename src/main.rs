mod app;
mod auth;
mod config;
mod db;
mod energy;
mod error;
mod extract;
mod state;
#[cfg(test)]
mod testing;

use crate::{config::AppConfig, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env()?;

    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        format!(
            "energyviz={level},axum=info,tower_http=info,sqlx=warn",
            level = config.log_level.to_lowercase()
        )
    });
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let db = db::connect(&config).await?;
    db::migrate(&db).await?;

    let app_state = AppState::init(config, db)?;

    let demo = &app_state.config.demo_user;
    if app_state.auth.seed_demo_user(&demo.email, &demo.password).await? {
        tracing::info!(email = %demo.email, "demo user created");
    }

    app::serve(app::build_app(app_state)).await
}
