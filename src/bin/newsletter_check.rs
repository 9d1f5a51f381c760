use std::path::PathBuf;

use clap::Parser;
use dotenvy::dotenv;
use feedwatch::{
    config::NewsletterConfig,
    discord::DiscordWebhook,
    feeds::HttpFeedFetcher,
    observability::init_logging,
    tasks::state_diff::{runner, types::FeedOutcome},
};

/// Notify when a watched newsletter's latest post changes
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Where last-seen post identifiers are kept (overrides FEEDWATCH_STATE_FILE)
    #[clap(long)]
    state_file: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    dotenv().ok();
    init_logging("newsletter-check");
    let args = Args::parse();

    let mut config = NewsletterConfig::from_env();
    if let Some(path) = args.state_file {
        tracing::info!(path = %path.display(), "Using state file from --state-file");
        config.state_path = path;
    }

    let fetcher = HttpFeedFetcher::new();
    let channel = DiscordWebhook::new(config.webhook_url.clone());

    match runner::run(&config, &fetcher, &channel).await {
        Ok(summary) => {
            for report in &summary.reports {
                match &report.outcome {
                    FeedOutcome::FetchFailed(e) => {
                        tracing::warn!(newsletter = %report.name, error = %e, "Feed skipped");
                    }
                    FeedOutcome::Notified { id } => {
                        tracing::info!(newsletter = %report.name, id = %id, "Notification delivered");
                    }
                    _ => {}
                }
            }
            if let Some(e) = &summary.save_error {
                tracing::error!(error = %e, "State not saved; notified posts may be sent again next run");
            }
            tracing::info!(
                checked = summary.reports.len(),
                notified = summary.count("notified"),
                baseline = summary.count("baseline"),
                delivery_failed = summary.count("delivery_failed"),
                fetch_failed = summary.count("fetch_failed"),
                state_written = summary.state_written,
                "Check complete"
            );
        }
        Err(e) => {
            tracing::error!(error = %e, "Check aborted");
        }
    }
}
