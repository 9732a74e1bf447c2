//! OAuth2 access tokens for the Data API.
//!
//! Service accounts use the JWT-bearer grant: a short-lived RS256 assertion
//! signed with the account's private key is exchanged at the key's
//! `token_uri` for a bearer token. Tokens are cached until shortly before
//! they expire.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use ga4_connector_core::error::ReportError;

use crate::credentials::{CredentialsError, ServiceAccountKey};

pub const ANALYTICS_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/analytics.readonly";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECONDS: i64 = 3600;
const DEFAULT_TOKEN_LIFETIME_SECONDS: u64 = 3600;
const EXPIRY_SKEW_SECONDS: u64 = 60;

/// Supplies bearer tokens for Data API calls.
#[async_trait]
pub trait AccessTokenSource: Send + Sync + 'static {
    async fn access_token(&self) -> Result<String, ReportError>;
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AssertionClaims {
    pub iss: String,
    pub scope: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct TokenErrorResponse {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

struct CachedToken {
    value: String,
    refresh_at: Instant,
}

/// Token source backed by a service-account key.
pub struct ServiceAccountTokenSource {
    http: reqwest::Client,
    key: ServiceAccountKey,
    encoding_key: EncodingKey,
    scope: String,
    cache: RwLock<Option<CachedToken>>,
}

impl ServiceAccountTokenSource {
    pub fn new(http: reqwest::Client, key: ServiceAccountKey) -> Result<Self, CredentialsError> {
        let encoding_key = key.encoding_key()?;
        Ok(Self {
            http,
            key,
            encoding_key,
            scope: ANALYTICS_READONLY_SCOPE.to_string(),
            cache: RwLock::new(None),
        })
    }

    pub fn client_email(&self) -> &str {
        &self.key.client_email
    }

    fn sign_assertion(&self) -> Result<String, ReportError> {
        let now = Utc::now().timestamp();
        let claims = AssertionClaims {
            iss: self.key.client_email.clone(),
            scope: self.scope.clone(),
            aud: self.key.token_uri.clone(),
            iat: now,
            exp: now + ASSERTION_LIFETIME_SECONDS,
        };
        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.key.private_key_id.clone();

        encode(&header, &claims, &self.encoding_key)
            .map_err(|e| ReportError::Auth(format!("failed to sign token assertion: {e}")))
    }

    async fn fetch_token(&self) -> Result<CachedToken, ReportError> {
        let assertion = self.sign_assertion()?;
        let requested_at = Instant::now();

        let response = self
            .http
            .post(&self.key.token_uri)
            .form(&[
                ("grant_type", JWT_BEARER_GRANT),
                ("assertion", assertion.as_str()),
            ])
            .send()
            .await
            .map_err(|e| ReportError::Auth(format!("token request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = match serde_json::from_str::<TokenErrorResponse>(&body) {
                Ok(err) => match err.error_description {
                    Some(description) => format!("{}: {description}", err.error),
                    None => err.error,
                },
                Err(_) => body,
            };
            warn!(
                status = %status,
                client_email = %self.key.client_email,
                "Token exchange rejected"
            );
            return Err(ReportError::Auth(format!(
                "token exchange failed ({status}): {detail}"
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| ReportError::Auth(format!("invalid token response: {e}")))?;

        let lifetime = token
            .expires_in
            .unwrap_or(DEFAULT_TOKEN_LIFETIME_SECONDS)
            .saturating_sub(EXPIRY_SKEW_SECONDS);
        debug!(lifetime_seconds = lifetime, "Access token refreshed");

        Ok(CachedToken {
            value: token.access_token,
            refresh_at: requested_at + Duration::from_secs(lifetime),
        })
    }
}

#[async_trait]
impl AccessTokenSource for ServiceAccountTokenSource {
    async fn access_token(&self) -> Result<String, ReportError> {
        {
            let guard = self.cache.read().await;
            if let Some(cached) = guard.as_ref() {
                if cached.refresh_at > Instant::now() {
                    return Ok(cached.value.clone());
                }
            }
        }

        let mut guard = self.cache.write().await;
        // Another request may have refreshed while we waited for the lock.
        if let Some(cached) = guard.as_ref() {
            if cached.refresh_at > Instant::now() {
                return Ok(cached.value.clone());
            }
        }
        let fresh = self.fetch_token().await?;
        let value = fresh.value.clone();
        *guard = Some(fresh);
        Ok(value)
    }
}
