use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use webhook_solver::answer::AnswerLoader;
use webhook_solver::client::http::HttpWebhookClient;
use webhook_solver::config::{RunArgs, Settings};
use webhook_solver::consts::{DEFAULT_HISTORY_LIMIT, default_db_path, preview};
use webhook_solver::runner::Runner;
use webhook_solver::store::SubmissionStore;
use webhook_solver::store::sqlite::SqliteStore;

#[derive(Parser)]
#[command(
    name = "webhook-solver",
    version,
    about = "Registers for a webhook and submits the SQL answer for your question."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// SQLite database for submission records (use :memory: for ephemeral)
    #[arg(long, env = "APP_DB", global = true)]
    db: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Register, submit the answer once, and record it
    Run(RunArgs),
    /// List recorded submissions, newest first
    History {
        /// Maximum number of rows to show
        #[arg(short, long, default_value_t = DEFAULT_HISTORY_LIMIT)]
        limit: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let db_path = cli.db.unwrap_or_else(default_db_path);

    match cli.command {
        Command::Run(args) => run(args, &db_path).await,
        Command::History { limit } => history(&db_path, limit).await,
    }
}

async fn run(args: RunArgs, db_path: &Path) -> anyhow::Result<()> {
    let settings = Settings::try_from(args)?;
    tracing::info!(version = webhook_solver::consts::VERSION, "starting webhook solver");

    let api = Arc::new(HttpWebhookClient::new(
        settings.generate_webhook_url.clone(),
        settings.auth_scheme,
    ));
    let answers = AnswerLoader::new(settings.sql_dir.clone());
    let store = Arc::new(SqliteStore::open_or_in_memory(db_path)?);

    let report = Runner::new(&settings, api, answers, store).run().await?;

    println!("question:  {}", report.question_number);
    println!("posted to: {}", report.submitted_to);
    println!("response:  {}", report.response_body);
    match report.submission_id {
        Some(id) => println!("recorded:  #{id}"),
        None => println!("recorded:  no (see log)"),
    }
    Ok(())
}

async fn history(db_path: &Path, limit: usize) -> anyhow::Result<()> {
    let Some(store) = SqliteStore::open_existing(db_path)? else {
        println!("no database at {}", db_path.display());
        return Ok(());
    };
    let rows = store.recent(limit).await?;
    if rows.is_empty() {
        println!("no submissions recorded in {}", db_path.display());
        return Ok(());
    }
    for row in rows {
        println!(
            "#{:<4} {:<16} {}  {}",
            row.id,
            row.reg_no,
            row.submitted_at.format("%Y-%m-%d %H:%M:%S"),
            preview(&row.final_query, 60)
        );
    }
    Ok(())
}
