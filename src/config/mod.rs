//! Run settings.
//!
//! Every value comes from a command-line flag or its `APP_*` environment
//! variable (a `.env` file is loaded first by `main`). [`Settings`] is built
//! once and handed to the runner by reference.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, ValueEnum};

use crate::error::SolverError;

/// How the access token is placed in the `Authorization` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum AuthScheme {
    /// The token exactly as the provider issued it.
    #[default]
    Raw,
    /// `Bearer <token>`.
    Bearer,
}

impl AuthScheme {
    pub fn header_value(self, token: &str) -> String {
        match self {
            AuthScheme::Raw => token.to_string(),
            AuthScheme::Bearer => format!("Bearer {token}"),
        }
    }
}

/// Where the final query is posted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SubmitTarget {
    /// The webhook URL returned by registration.
    #[default]
    Webhook,
    /// The fixed test-webhook URL from the settings.
    Test,
}

/// Raw flags for the `run` subcommand.
#[derive(Debug, Clone, Args)]
pub struct RunArgs {
    /// Candidate name sent at registration
    #[arg(long, env = "APP_NAME")]
    pub name: String,

    /// Registration number; also selects the question
    #[arg(long, env = "APP_REG_NO")]
    pub reg_no: String,

    /// Candidate email sent at registration
    #[arg(long, env = "APP_EMAIL")]
    pub email: String,

    /// Endpoint that issues the webhook URL and access token
    #[arg(long, env = "APP_GENERATE_WEBHOOK_URL")]
    pub generate_webhook_url: String,

    /// Fixed submission endpoint, used with `--submit-to test`
    #[arg(long, env = "APP_TEST_WEBHOOK_URL")]
    pub test_webhook_url: String,

    /// Directory containing question{n}.sql files [default: bundled answers]
    #[arg(long, env = "APP_SQL_DIR")]
    pub sql_dir: Option<PathBuf>,

    /// Authorization header format for the submission call
    #[arg(long, env = "APP_AUTH_SCHEME", value_enum, default_value_t = AuthScheme::Raw)]
    pub auth_scheme: AuthScheme,

    /// Which URL receives the final query
    #[arg(long, env = "APP_SUBMIT_TO", value_enum, default_value_t = SubmitTarget::Webhook)]
    pub submit_to: SubmitTarget,
}

/// Identity fields posted to the registration endpoint.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub name: String,
    pub reg_no: String,
    pub email: String,
}

/// Validated settings for one run.
#[derive(Debug, Clone)]
pub struct Settings {
    pub identity: Identity,
    pub generate_webhook_url: String,
    pub test_webhook_url: String,
    /// `None` reads the answers compiled into the binary.
    pub sql_dir: Option<PathBuf>,
    pub auth_scheme: AuthScheme,
    pub submit_to: SubmitTarget,
}

impl TryFrom<RunArgs> for Settings {
    type Error = anyhow::Error;

    fn try_from(args: RunArgs) -> Result<Self> {
        Ok(Settings {
            identity: Identity {
                name: required("app.name", args.name)?,
                reg_no: required("app.regNo", args.reg_no)?,
                email: required("app.email", args.email)?,
            },
            generate_webhook_url: required("app.generate-webhook-url", args.generate_webhook_url)?,
            test_webhook_url: required("app.test-webhook-url", args.test_webhook_url)?,
            sql_dir: args.sql_dir,
            auth_scheme: args.auth_scheme,
            submit_to: args.submit_to,
        })
    }
}

fn required(key: &'static str, value: String) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(SolverError::MissingConfig { key }.into());
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        run: RunArgs,
    }

    const FULL: &[&str] = &[
        "test",
        "--name",
        "Jane Doe",
        "--reg-no",
        "REG12347",
        "--email",
        "jane@example.com",
        "--generate-webhook-url",
        "http://localhost/generate",
        "--test-webhook-url",
        "http://localhost/test",
    ];

    fn parse(extra: &[&str]) -> RunArgs {
        let argv: Vec<&str> = FULL.iter().chain(extra.iter()).copied().collect();
        TestCli::try_parse_from(argv).unwrap().run
    }

    #[test]
    fn parses_required_flags_with_defaults() {
        let args = parse(&[]);
        assert_eq!(args.reg_no, "REG12347");
        assert_eq!(args.sql_dir, None);
        assert_eq!(args.auth_scheme, AuthScheme::Raw);
        assert_eq!(args.submit_to, SubmitTarget::Webhook);
    }

    #[test]
    fn parses_optional_flags() {
        let args = parse(&[
            "--auth-scheme",
            "bearer",
            "--submit-to",
            "test",
            "--sql-dir",
            "answers",
        ]);
        assert_eq!(args.auth_scheme, AuthScheme::Bearer);
        assert_eq!(args.submit_to, SubmitTarget::Test);
        assert_eq!(args.sql_dir, Some(PathBuf::from("answers")));
    }

    #[test]
    fn settings_from_args() {
        let settings = Settings::try_from(parse(&[])).unwrap();
        assert_eq!(settings.identity.name, "Jane Doe");
        assert_eq!(settings.identity.email, "jane@example.com");
        assert_eq!(settings.generate_webhook_url, "http://localhost/generate");
    }

    #[test]
    fn blank_setting_is_missing_config() {
        let mut args = parse(&[]);
        args.reg_no = "   ".to_string();
        let err = Settings::try_from(args).unwrap_err();
        match err.downcast_ref::<SolverError>() {
            Some(SolverError::MissingConfig { key }) => assert_eq!(*key, "app.regNo"),
            other => panic!("expected MissingConfig, got {other:?}"),
        }
    }

    #[test]
    fn raw_scheme_sends_token_verbatim() {
        assert_eq!(AuthScheme::Raw.header_value("tok"), "tok");
    }

    #[test]
    fn bearer_scheme_prefixes_token() {
        assert_eq!(AuthScheme::Bearer.header_value("tok"), "Bearer tok");
    }

    #[test]
    fn identity_serializes_camel_case() {
        let identity = Identity {
            name: "n".to_string(),
            reg_no: "r".to_string(),
            email: "e".to_string(),
        };
        let json = serde_json::to_value(&identity).unwrap();
        assert_eq!(json, serde_json::json!({"name": "n", "regNo": "r", "email": "e"}));
    }
}
