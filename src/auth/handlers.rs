use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::{
        dto::{
            LoginForm, MeResponse, MessageResponse, RegisterRequest, RegisteredResponse,
            TokenResponse,
        },
        extractors::AuthUser,
    },
    error::ApiError,
    extract::{ApiForm, ApiJson},
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/me", get(get_me))
        .route("/auth/dashboard", get(dashboard))
}

#[instrument(skip_all)]
pub async fn register(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisteredResponse>), ApiError> {
    let user = state.auth.register(&payload.email, &payload.password).await?;
    Ok((
        StatusCode::CREATED,
        Json(RegisteredResponse {
            email: user.email,
            message: "User registered successfully".into(),
        }),
    ))
}

#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    ApiForm(form): ApiForm<LoginForm>,
) -> Result<Json<TokenResponse>, ApiError> {
    let token = state.auth.login(&form.username, &form.password).await?;
    Ok(Json(TokenResponse::bearer(token)))
}

#[instrument(skip_all)]
pub async fn get_me(AuthUser(email): AuthUser) -> Json<MeResponse> {
    Json(MeResponse { email })
}

#[instrument(skip_all)]
pub async fn dashboard(AuthUser(email): AuthUser) -> Json<MessageResponse> {
    Json(MessageResponse {
        message: format!("Welcome to your dashboard, {email}!"),
    })
}
