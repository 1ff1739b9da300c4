// SPDX-License-Identifier: MIT

//! Registration, login and token refresh.

use crate::error::{AppError, Result};
use crate::middleware::auth::{create_access_token, create_refresh_token, verify_refresh_token};
use crate::models::{DailyGoals, ProficiencyLevel, User};
use crate::routes::users::UserResponse;
use crate::validation::{validate_level, validate_payload};
use crate::AppState;
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
}

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
    #[validate(email(message = "Enter a valid email"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    #[validate(custom(function = validate_level))]
    pub proficiency_level: String,
    #[validate(length(min = 1, message = "Learning language is required"))]
    pub learning_language: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Enter a valid email"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RefreshRequest {
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}

#[derive(Serialize)]
pub struct AuthResponse {
    pub user: UserResponse,
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Serialize)]
pub struct RefreshResponse {
    pub access_token: String,
    pub refresh_token: String,
}

/// Register a new account and issue a token pair.
async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(axum::http::StatusCode, Json<AuthResponse>)> {
    validate_payload(&payload)?;

    if state.db.find_user_by_email(&payload.email).await?.is_some() {
        return Err(AppError::Conflict(format!(
            "A user with email {} already exists",
            payload.email
        )));
    }

    let now = chrono::Utc::now().to_rfc3339();
    let mut user = User {
        id: uuid::Uuid::new_v4().to_string(),
        first_name: payload.first_name,
        last_name: payload.last_name,
        email: payload.email,
        password_hash: hash_password(&payload.password)?,
        proficiency_level: ProficiencyLevel::parse(&payload.proficiency_level)
            .ok_or_else(|| AppError::BadRequest("Invalid proficiency level".to_string()))?,
        learning_language: payload.learning_language,
        goals: DailyGoals::default(),
        streak_days: 0,
        read_articles: vec![],
        uploaded_articles: vec![],
        refresh_token: None,
        created_at: now.clone(),
        updated_at: now,
    };

    let access_token = create_access_token(&user.id, &state.config.jwt_access_secret)?;
    let refresh_token = create_refresh_token(&user.id, &state.config.jwt_refresh_secret)?;
    user.refresh_token = Some(refresh_token.clone());

    state.db.upsert_user(&user).await?;
    tracing::info!(user_id = %user.id, "User registered");

    Ok((
        axum::http::StatusCode::CREATED,
        Json(AuthResponse {
            user: UserResponse::from(&user),
            access_token,
            refresh_token,
        }),
    ))
}

/// Verify credentials and issue a fresh token pair.
async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    validate_payload(&payload)?;

    // Same message for unknown email and wrong password.
    let mut user = state
        .db
        .find_user_by_email(&payload.email)
        .await?
        .ok_or_else(|| AppError::BadRequest("Invalid email or password".to_string()))?;

    if !verify_password(&payload.password, &user.password_hash) {
        return Err(AppError::BadRequest(
            "Invalid email or password".to_string(),
        ));
    }

    let access_token = create_access_token(&user.id, &state.config.jwt_access_secret)?;
    let refresh_token = create_refresh_token(&user.id, &state.config.jwt_refresh_secret)?;

    user.refresh_token = Some(refresh_token.clone());
    user.updated_at = chrono::Utc::now().to_rfc3339();
    state.db.upsert_user(&user).await?;

    tracing::debug!(user_id = %user.id, "User logged in");

    Ok(Json(AuthResponse {
        user: UserResponse::from(&user),
        access_token,
        refresh_token,
    }))
}

/// Rotate a token pair. The presented refresh token must verify against
/// the refresh secret AND match the one stored on the user record.
async fn refresh(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<RefreshResponse>> {
    validate_payload(&payload)?;

    let claims = verify_refresh_token(&payload.refresh_token, &state.config.jwt_refresh_secret)?;

    let mut user = state
        .db
        .get_user(&claims.sub)
        .await?
        .ok_or(AppError::InvalidToken)?;

    if user.refresh_token.as_deref() != Some(payload.refresh_token.as_str()) {
        return Err(AppError::Forbidden(
            "Refresh token does not match the active session".to_string(),
        ));
    }

    let access_token = create_access_token(&user.id, &state.config.jwt_access_secret)?;
    let refresh_token = create_refresh_token(&user.id, &state.config.jwt_refresh_secret)?;

    user.refresh_token = Some(refresh_token.clone());
    user.updated_at = chrono::Utc::now().to_rfc3339();
    state.db.upsert_user(&user).await?;

    Ok(Json(RefreshResponse {
        access_token,
        refresh_token,
    }))
}

/// Hash a password with argon2id and a random salt.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(anyhow::anyhow!("password hashing failed: {}", e)))
}

/// Verify a password against a stored PHC-format hash.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}
