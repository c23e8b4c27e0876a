use std::{env, error::Error, fs, process};

use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use pr_linter::{LintConfig, PullRequestContext, Verdict, run_lint};

#[tokio::main]
async fn main() {
    // Load environment variables from .env when present (local runs).
    // CI runners provide everything through the process environment.
    dotenvy::dotenv().ok();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .init();

    // Single failure boundary: any fault below logs one message and
    // fails the run instead of crashing without output.
    if let Err(e) = run().await {
        error!("pr lint failed: {e}");
        process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn Error>> {
    let repository =
        env::var("GITHUB_REPOSITORY").map_err(|_| "GITHUB_REPOSITORY must be set in environment")?;
    let event_path =
        env::var("GITHUB_EVENT_PATH").map_err(|_| "GITHUB_EVENT_PATH must be set in environment")?;
    let payload = fs::read_to_string(&event_path)?;

    let ctx = PullRequestContext::from_event(&repository, &payload)?;
    let cfg = LintConfig::from_env();

    match run_lint(&cfg, &ctx).await? {
        Verdict::Pass => info!("all lint checks passed"),
        Verdict::Skipped => info!("branch is exempt from lint"),
        Verdict::Fail(reason) => {
            error!("{reason}");
            process::exit(1);
        }
    }

    Ok(())
}
