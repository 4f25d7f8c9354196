use std::error::Error;

use ai_llm_service::config::default_config::config_from_env;
use ai_llm_service::{LlmClient, telemetry};
use pr_reviewer::{GitHubClient, ReviewerConfig, SYSTEM_PROMPT, run_review};
use tracing::{Level, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Targets whose events are rendered by the shared fmt layer.
const LOG_TARGETS: &[&str] = &["pr_review_bot", "pr_reviewer", telemetry::TARGET_PREFIX];

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // A .env file is optional; in CI everything comes from the environment.
    let _ = dotenvy::dotenv();

    let review_cfg = ReviewerConfig::from_env()?;
    let level = if review_cfg.debug {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::registry()
        .with(telemetry::env_filter_with_level("info", LOG_TARGETS, level))
        .with(telemetry::layer(LOG_TARGETS))
        .try_init()?;

    let llm_cfg = config_from_env()?.with_system_prompt(SYSTEM_PROMPT);
    info!(
        "starting review repo={} pr={} provider={} model={}",
        review_cfg.repo, review_cfg.pr_number, llm_cfg.provider, llm_cfg.model
    );

    let generator = LlmClient::from_config(llm_cfg)?;
    let platform = GitHubClient::new(&review_cfg)?;

    let summary = run_review(&platform, &generator, &review_cfg).await?;
    info!(
        "PR review completed. Posted {} comments in total.",
        summary.comments_posted
    );

    Ok(())
}
