//! Caller Identity and Ingest Authentication
//!
//! Every points query runs on behalf of one company. The company is resolved
//! per request and handed to handlers as a [`CallerCompany`] extension.
//!
//! # Identity
//!
//! ## Bearer Token (auth enabled)
//! ```text
//! Authorization: Bearer your-token-here
//! ```
//! Each token maps to exactly one company id.
//!
//! ## Trusted Header (auth disabled)
//! ```text
//! X-Company-Id: 42
//! ```
//! Set by the upstream portal session layer.
//!
//! # Ledger Ingest
//! ```text
//! X-API-Key: your-ingest-key
//! ```
//! Appending ledger rows requires a configured ingest key; with none
//! configured the endpoint is closed.
//!
//! # Configuration
//! - `HCMS_AUTH_ENABLED`: resolve companies from bearer tokens (default: false)
//! - `HCMS_API_TOKENS`: `token:company_id` pairs, comma separated
//! - `HCMS_INGEST_API_KEYS`: comma separated ingest keys

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use hcms_core::CompanyId;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use subtle::ConstantTimeEq;

use crate::state::AppState;

/// Trusted company header
pub const COMPANY_HEADER: &str = "X-Company-Id";
/// Ingest key header
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Company on whose behalf the request runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallerCompany(pub CompanyId);

/// Authentication configuration
#[derive(Debug, Clone, Default)]
pub struct AuthConfig {
    /// Whether bearer authentication is enabled
    pub enabled: bool,
    /// Bearer tokens and the company each resolves to
    pub bearer_tokens: Vec<(String, CompanyId)>,
    /// Keys accepted on the ledger ingest endpoint
    pub ingest_api_keys: Vec<String>,
}

impl AuthConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let enabled = std::env::var("HCMS_AUTH_ENABLED")
            .map(|v| v.to_lowercase() == "true" || v == "1")
            .unwrap_or(false);

        let bearer_tokens = std::env::var("HCMS_API_TOKENS")
            .map(|v| parse_token_pairs(&v))
            .unwrap_or_default();

        let ingest_api_keys: Vec<String> = std::env::var("HCMS_INGEST_API_KEYS")
            .map(|v| {
                v.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        if enabled && bearer_tokens.is_empty() {
            tracing::warn!("HCMS_AUTH_ENABLED is set but no HCMS_API_TOKENS are configured");
        }

        Self {
            enabled,
            bearer_tokens,
            ingest_api_keys,
        }
    }

    /// Company a bearer token resolves to
    pub fn company_for_token(&self, token: &str) -> Option<CompanyId> {
        let mut found = None;
        for (candidate, company_id) in &self.bearer_tokens {
            if bool::from(candidate.as_bytes().ct_eq(token.as_bytes())) {
                found = Some(*company_id);
            }
        }
        found
    }

    /// Validate an ingest key
    pub fn validate_ingest_key(&self, key: &str) -> bool {
        self.ingest_api_keys
            .iter()
            .fold(false, |acc, k| acc | bool::from(k.as_bytes().ct_eq(key.as_bytes())))
    }
}

/// Parse `token:company_id` pairs; malformed pairs are skipped
fn parse_token_pairs(raw: &str) -> Vec<(String, CompanyId)> {
    raw.split(',')
        .filter_map(|pair| {
            let (token, company) = pair.trim().rsplit_once(':')?;
            match company.trim().parse::<i64>() {
                Ok(id) if !token.is_empty() => Some((token.to_string(), CompanyId(id))),
                _ => {
                    tracing::warn!("Skipping malformed HCMS_API_TOKENS entry");
                    None
                }
            }
        })
        .collect()
}

/// Authentication error response
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthErrorResponse {
    pub code: String,
    pub message: String,
}

impl AuthErrorResponse {
    pub fn unauthorized(message: &str) -> Self {
        Self {
            code: "UNAUTHORIZED".to_string(),
            message: message.to_string(),
        }
    }

    pub fn forbidden(message: &str) -> Self {
        Self {
            code: "FORBIDDEN".to_string(),
            message: message.to_string(),
        }
    }
}

fn reject(status: StatusCode, body: AuthErrorResponse) -> Response {
    (status, Json(body)).into_response()
}

/// Resolves the caller's company and attaches it to the request
pub async fn company_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_config = &state.auth_config;

    let company_id = if auth_config.enabled {
        let token = request
            .headers()
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "));
        match token.and_then(|t| auth_config.company_for_token(t)) {
            Some(company_id) => company_id,
            None => {
                return reject(
                    StatusCode::UNAUTHORIZED,
                    AuthErrorResponse::unauthorized(
                        "Authentication required. Provide Authorization: Bearer <token>",
                    ),
                )
            }
        }
    } else {
        let header = request
            .headers()
            .get(COMPANY_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<i64>().ok());
        match header {
            Some(id) => CompanyId(id),
            None => {
                return reject(
                    StatusCode::UNAUTHORIZED,
                    AuthErrorResponse::unauthorized("Missing or invalid X-Company-Id header"),
                )
            }
        }
    };

    tracing::debug!(company_id = %company_id, path = %request.uri().path(), "Resolved caller");
    request.extensions_mut().insert(CallerCompany(company_id));
    next.run(request).await
}

/// Guards ledger ingest with an API key
pub async fn ingest_key_middleware(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let auth_config = &state.auth_config;

    if auth_config.ingest_api_keys.is_empty() {
        return reject(
            StatusCode::FORBIDDEN,
            AuthErrorResponse::forbidden("Ledger ingest is not enabled"),
        );
    }

    let key = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok());
    match key {
        Some(key) if auth_config.validate_ingest_key(key) => next.run(request).await,
        Some(_) => reject(
            StatusCode::UNAUTHORIZED,
            AuthErrorResponse::unauthorized("Invalid API key"),
        ),
        None => reject(
            StatusCode::UNAUTHORIZED,
            AuthErrorResponse::unauthorized("Provide X-API-Key header"),
        ),
    }
}
