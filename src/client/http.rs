use anyhow::Result;
use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use tracing::info;

use super::{GenerateResponse, WebhookApi};
use crate::config::{AuthScheme, Identity};
use crate::error::SolverError;

/// [`WebhookApi`] over HTTP. No retries and no timeout beyond the client's
/// defaults; any failure is returned to the caller as-is.
pub struct HttpWebhookClient {
    client: reqwest::Client,
    generate_url: String,
    auth_scheme: AuthScheme,
}

impl HttpWebhookClient {
    pub fn new(generate_url: impl Into<String>, auth_scheme: AuthScheme) -> Self {
        Self {
            client: reqwest::Client::new(),
            generate_url: generate_url.into(),
            auth_scheme,
        }
    }

    async fn read_body(endpoint: &str, resp: reqwest::Response) -> Result<String> {
        let status = resp.status();
        let body = resp.text().await.map_err(|source| SolverError::Transport {
            endpoint: endpoint.to_string(),
            source,
        })?;
        if !status.is_success() {
            return Err(SolverError::BadStatus {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                body,
            }
            .into());
        }
        Ok(body)
    }
}

#[async_trait]
impl WebhookApi for HttpWebhookClient {
    async fn register(&self, identity: &Identity) -> Result<GenerateResponse> {
        info!(url = %self.generate_url, reg_no = %identity.reg_no, "requesting webhook");

        let resp = self
            .client
            .post(&self.generate_url)
            .json(identity)
            .send()
            .await
            .map_err(|source| SolverError::Transport {
                endpoint: self.generate_url.clone(),
                source,
            })?;

        let body = Self::read_body(&self.generate_url, resp).await?;
        let generated = GenerateResponse::from_body(&body)?;
        info!(webhook = %generated.webhook_url, "webhook issued");
        Ok(generated)
    }

    async fn submit_answer(&self, url: &str, token: &str, query: &str) -> Result<String> {
        info!(url, bytes = query.len(), "submitting final query");

        let body = serde_json::json!({ "finalQuery": query });
        let resp = self
            .client
            .post(url)
            .header(AUTHORIZATION, self.auth_scheme.header_value(token))
            .json(&body)
            .send()
            .await
            .map_err(|source| SolverError::Transport {
                endpoint: url.to_string(),
                source,
            })?;

        let body = Self::read_body(url, resp).await?;
        info!(response = %body, "submission response");
        Ok(body)
    }
}
