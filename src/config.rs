//! Application configuration loaded from environment variables.
//!
//! Secrets (JWT signing keys, the oracle API key) are read once at startup
//! and cached in memory for the lifetime of the process.

use std::env;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Environment Variables (non-sensitive) ---
    /// GCP project ID for Firestore
    pub gcp_project_id: String,
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// Server port
    pub port: u16,
    /// Definition oracle endpoint (chat-completion style API)
    pub oracle_api_url: String,
    /// Model name sent to the oracle
    pub oracle_model: String,
    /// Per-request oracle deadline in seconds
    pub oracle_timeout_secs: u64,
    /// When true, tracker operations verify that the referenced user and
    /// word exist before writing. Default false (soft references allowed
    /// to dangle).
    pub strict_references: bool,

    // --- Secrets ---
    /// HS256 key for access tokens
    pub jwt_access_secret: Vec<u8>,
    /// HS256 key for refresh tokens
    pub jwt_refresh_secret: Vec<u8>,
    /// Bearer key for the definition oracle
    pub oracle_api_key: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            oracle_api_url: env::var("ORACLE_API_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1/chat/completions".to_string()),
            oracle_model: env::var("ORACLE_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string()),
            oracle_timeout_secs: env::var("ORACLE_TIMEOUT_SECS")
                .unwrap_or_else(|_| "20".to_string())
                .parse()
                .unwrap_or(20),
            strict_references: env::var("STRICT_REFERENCES")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),

            jwt_access_secret: env::var("JWT_ACCESS_SECRET")
                .map_err(|_| ConfigError::Missing("JWT_ACCESS_SECRET"))?
                .into_bytes(),
            jwt_refresh_secret: env::var("JWT_REFRESH_SECRET")
                .map_err(|_| ConfigError::Missing("JWT_REFRESH_SECRET"))?
                .into_bytes(),
            oracle_api_key: env::var("ORACLE_API_KEY")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("ORACLE_API_KEY"))?,
        })
    }

    /// Default config for tests only.
    pub fn test_default() -> Self {
        Self {
            gcp_project_id: "test-project".to_string(),
            frontend_url: "http://localhost:5173".to_string(),
            port: 8080,
            oracle_api_url: "http://localhost:9/unreachable".to_string(),
            oracle_model: "test-model".to_string(),
            oracle_timeout_secs: 1,
            strict_references: false,
            jwt_access_secret: b"test_access_key_32_bytes_minimum".to_vec(),
            jwt_refresh_secret: b"test_refresh_key_32_bytes_minim!".to_vec(),
            oracle_api_key: "test_oracle_key".to_string(),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}
