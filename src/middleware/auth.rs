// SPDX-License-Identifier: MIT

//! JWT authentication middleware and token issuance.
//!
//! Access and refresh tokens are HS256 JWTs signed with separate secrets.
//! The refresh token is additionally persisted on the user record and must
//! match on refresh.

use crate::AppState;
use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const ACCESS_TOKEN_TTL_SECS: usize = 60 * 60; // 1 hour
const REFRESH_TOKEN_TTL_SECS: usize = 7 * 24 * 60 * 60; // 7 days

/// JWT claims structure.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    pub iat: usize,
}

/// Authenticated user extracted from a Bearer token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
}

/// Middleware that requires a valid Bearer access token.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(h) if h.starts_with("Bearer ") => &h[7..],
        _ => return Err(StatusCode::UNAUTHORIZED),
    };

    let key = DecodingKey::from_secret(&state.config.jwt_access_secret);
    let validation = Validation::new(Algorithm::HS256);

    let token_data =
        decode::<Claims>(token, &key, &validation).map_err(|_| StatusCode::UNAUTHORIZED)?;

    let auth_user = AuthUser {
        user_id: token_data.claims.sub,
    };
    request.extensions_mut().insert(auth_user);

    Ok(next.run(request).await)
}

/// Create a short-lived access token for a user session.
pub fn create_access_token(user_id: &str, signing_key: &[u8]) -> anyhow::Result<String> {
    create_token(user_id, signing_key, ACCESS_TOKEN_TTL_SECS)
}

/// Create a refresh token. The caller persists it on the user record.
pub fn create_refresh_token(user_id: &str, signing_key: &[u8]) -> anyhow::Result<String> {
    create_token(user_id, signing_key, REFRESH_TOKEN_TTL_SECS)
}

/// Verify a refresh token's signature and expiry, returning its claims.
pub fn verify_refresh_token(token: &str, signing_key: &[u8]) -> Result<Claims, crate::error::AppError> {
    let key = DecodingKey::from_secret(signing_key);
    let validation = Validation::new(Algorithm::HS256);
    decode::<Claims>(token, &key, &validation)
        .map(|data| data.claims)
        .map_err(|_| crate::error::AppError::InvalidToken)
}

fn create_token(user_id: &str, signing_key: &[u8], ttl_secs: usize) -> anyhow::Result<String> {
    use std::time::{SystemTime, UNIX_EPOCH};

    let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs() as usize;

    let claims = Claims {
        sub: user_id.to_string(),
        iat: now,
        exp: now + ttl_secs,
    };

    Ok(encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(signing_key),
    )?)
}
