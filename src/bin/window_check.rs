use clap::Parser;
use dotenvy::dotenv;
use feedwatch::{
    config::{window_from_minutes, WindowConfig, MAX_WINDOW_MINUTES},
    discord::DiscordWebhook,
    feeds::HttpFeedFetcher,
    observability::init_logging,
    tasks::time_window::runner,
};

/// Notify every post published within the recent time window
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// How far back to look, in minutes (overrides FEEDWATCH_WINDOW_MINUTES)
    #[clap(long, value_parser = clap::value_parser!(i64).range(1..=MAX_WINDOW_MINUTES))]
    window_minutes: Option<i64>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    dotenv().ok();
    init_logging("window-check");
    let args = Args::parse();

    let mut config = match WindowConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Check aborted");
            return;
        }
    };
    if let Some(minutes) = args.window_minutes {
        tracing::info!(minutes, "Using time window from --window-minutes");
        config.window = match window_from_minutes(minutes) {
            Ok(window) => window,
            Err(e) => {
                tracing::error!(error = %e, "Check aborted");
                return;
            }
        };
    }

    let now = chrono::Utc::now();
    tracing::info!(started_at = %now, "Starting check");

    let fetcher = HttpFeedFetcher::new();
    let channel = DiscordWebhook::new(config.webhook_url.clone());
    let summary = runner::run(&config, &fetcher, &channel, now).await;

    tracing::info!(
        sites = summary.reports.len(),
        notified = summary.total_notified(),
        delivery_failed = summary.total_failed(),
        "Check complete"
    );
}
