pub mod http;
pub mod mock;

use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;

use crate::config::Identity;
use crate::error::SolverError;

/// Destination and credential issued by the registration endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateResponse {
    pub webhook_url: String,
    pub access_token: String,
}

#[derive(Deserialize)]
struct RawGenerateResponse {
    #[serde(default)]
    webhook: Option<String>,
    #[serde(default, rename = "accessToken")]
    access_token: Option<String>,
}

impl GenerateResponse {
    /// Parse a registration response body. Both fields must be present and
    /// non-blank.
    pub fn from_body(body: &str) -> Result<Self> {
        let raw: RawGenerateResponse =
            serde_json::from_str(body).map_err(|e| SolverError::InvalidRegistration {
                reason: format!("{e}; raw: {body}"),
            })?;

        let webhook_url = non_blank(raw.webhook, "webhook", body)?;
        let access_token = non_blank(raw.access_token, "accessToken", body)?;
        Ok(Self {
            webhook_url,
            access_token,
        })
    }
}

fn non_blank(value: Option<String>, field: &str, body: &str) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(SolverError::InvalidRegistration {
            reason: format!("`{field}` missing or empty in {body}"),
        }
        .into()),
    }
}

/// The two outbound calls of a run.
#[async_trait]
pub trait WebhookApi: Send + Sync {
    /// Register the identity and obtain a webhook URL plus access token.
    async fn register(&self, identity: &Identity) -> Result<GenerateResponse>;

    /// Post `{"finalQuery": query}` to `url`, authorised with `token`.
    /// Returns the response body untouched.
    async fn submit_answer(&self, url: &str, token: &str, query: &str) -> Result<String>;
}
