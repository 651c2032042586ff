//! The one-shot startup flow: register, pick the question, load the answer,
//! submit it, record it.

use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use tracing::{info, warn};

use crate::answer::AnswerLoader;
use crate::client::WebhookApi;
use crate::config::{Settings, SubmitTarget};
use crate::question::derive_question_number;
use crate::store::{NewSubmission, SubmissionStore};

/// What a completed run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub question_number: u32,
    pub submitted_to: String,
    pub response_body: String,
    /// `None` when the submission went out but could not be recorded.
    pub submission_id: Option<i64>,
}

/// Wires together the settings, a [`WebhookApi`], an [`AnswerLoader`] and a
/// [`SubmissionStore`].
pub struct Runner<'a> {
    settings: &'a Settings,
    api: Arc<dyn WebhookApi>,
    answers: AnswerLoader,
    store: Arc<dyn SubmissionStore>,
}

impl<'a> Runner<'a> {
    pub fn new(
        settings: &'a Settings,
        api: Arc<dyn WebhookApi>,
        answers: AnswerLoader,
        store: Arc<dyn SubmissionStore>,
    ) -> Self {
        Self {
            settings,
            api,
            answers,
            store,
        }
    }

    /// Run every step in order. Any failure before the submission is
    /// recorded aborts the run; a failure to record it is only logged.
    pub async fn run(&self) -> Result<RunReport> {
        let identity = &self.settings.identity;

        let generated = self.api.register(identity).await?;

        let question_number = derive_question_number(&identity.reg_no);
        info!(reg_no = %identity.reg_no, question_number, "question selected");

        let final_query = self.answers.load(question_number)?;

        let url = match self.settings.submit_to {
            SubmitTarget::Webhook => generated.webhook_url.as_str(),
            SubmitTarget::Test => self.settings.test_webhook_url.as_str(),
        };
        let response_body = self
            .api
            .submit_answer(url, &generated.access_token, &final_query)
            .await?;

        let record = NewSubmission {
            reg_no: identity.reg_no.clone(),
            final_query,
            submitted_at: Utc::now(),
        };
        let submission_id = match self.store.save(&record).await {
            Ok(id) => {
                info!(id, "submission recorded");
                Some(id)
            }
            Err(e) => {
                warn!(error = %format!("{e:#}"), "submission sent but not recorded");
                None
            }
        };

        Ok(RunReport {
            question_number,
            submitted_to: url.to_string(),
            response_body,
            submission_id,
        })
    }
}
