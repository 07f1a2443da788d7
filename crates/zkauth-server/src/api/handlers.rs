use super::error::{extract_json, ApiError};
use super::responses::*;
use crate::auth::{AuthService, LoginAttempt};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use chrono::Utc;

#[derive(Clone)]
pub struct AppState {
    pub auth: AuthService,
}

impl AppState {
    pub fn new(auth: AuthService) -> Self {
        Self { auth }
    }
}

pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Json<RegisterResponse>, ApiError> {
    let req = extract_json(body)?;
    state
        .auth
        .register(&req.username, &req.commitment, &req.nonce)
        .await?;
    Ok(Json(RegisterResponse { success: true }))
}

pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let req = extract_json(body)?;
    let proof = req
        .proof
        .filter(|p| !p.is_null())
        .ok_or_else(|| ApiError::bad_request("proof is required"))?;

    let attempt = LoginAttempt {
        username: req.username,
        proof,
        public_signals: req.public_signals,
    };
    let grant = state.auth.login(&attempt).await?;
    Ok(Json(LoginResponse::from(grant)))
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".to_string(),
        timestamp: Utc::now(),
        verifier_ready: state.auth.verifier_ready(),
    })
}
