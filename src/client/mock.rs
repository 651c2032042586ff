use std::sync::Mutex;

use anyhow::{Result, anyhow};
use async_trait::async_trait;

use super::{GenerateResponse, WebhookApi};
use crate::config::Identity;

/// One recorded `submit_answer` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitCall {
    pub url: String,
    pub token: String,
    pub query: String,
}

/// A scripted [`WebhookApi`] for tests. Returns canned results and records
/// every call it receives.
pub struct MockWebhookApi {
    registration: std::result::Result<GenerateResponse, String>,
    submit_response: std::result::Result<String, String>,
    registered: Mutex<Vec<Identity>>,
    submitted: Mutex<Vec<SubmitCall>>,
}

impl MockWebhookApi {
    pub fn new(webhook_url: &str, access_token: &str) -> Self {
        Self {
            registration: Ok(GenerateResponse {
                webhook_url: webhook_url.to_string(),
                access_token: access_token.to_string(),
            }),
            submit_response: Ok("ok".to_string()),
            registered: Mutex::new(Vec::new()),
            submitted: Mutex::new(Vec::new()),
        }
    }

    /// Make `register` fail with `message`.
    pub fn failing_registration(mut self, message: &str) -> Self {
        self.registration = Err(message.to_string());
        self
    }

    /// Make `submit_answer` return `response`.
    pub fn with_submit_response(mut self, response: &str) -> Self {
        self.submit_response = Ok(response.to_string());
        self
    }

    /// Make `submit_answer` fail with `message`.
    pub fn failing_submission(mut self, message: &str) -> Self {
        self.submit_response = Err(message.to_string());
        self
    }

    pub fn registered(&self) -> Vec<Identity> {
        self.registered.lock().map(|v| v.to_vec()).unwrap_or_default()
    }

    pub fn submitted(&self) -> Vec<SubmitCall> {
        self.submitted.lock().map(|v| v.to_vec()).unwrap_or_default()
    }
}

#[async_trait]
impl WebhookApi for MockWebhookApi {
    async fn register(&self, identity: &Identity) -> Result<GenerateResponse> {
        self.registered
            .lock()
            .map_err(|_| anyhow!("MockWebhookApi: lock poisoned"))?
            .push(identity.clone());
        self.registration.clone().map_err(|e| anyhow!(e))
    }

    async fn submit_answer(&self, url: &str, token: &str, query: &str) -> Result<String> {
        self.submitted
            .lock()
            .map_err(|_| anyhow!("MockWebhookApi: lock poisoned"))?
            .push(SubmitCall {
                url: url.to_string(),
                token: token.to_string(),
                query: query.to_string(),
            });
        self.submit_response.clone().map_err(|e| anyhow!(e))
    }
}
