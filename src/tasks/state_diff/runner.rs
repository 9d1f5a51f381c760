use super::types::{FeedOutcome, NewsletterReport, RunSummary};
use crate::{
    config::{Newsletter, NewsletterConfig},
    discord::{Embed, EmbedFooter, NotifyChannel, WebhookPayload},
    errors::{AppError, AppResult},
    feeds::{FeedEntry, FeedFetcher},
    state::FeedState,
    text::{plain_text, truncate_chars},
};

pub const BOT_NAME: &str = "Newsletter Bot";
pub const EMBED_COLOR: u32 = 16739072; // orange
pub const FOOTER_TEXT: &str = "Substack Notification";
pub const EXCERPT_CHARS: usize = 150;

/// Check every configured newsletter once, notifying on a changed latest entry.
///
/// Fails before any fetch when no webhook is configured or the state file
/// cannot be read. Per-newsletter failures, and a failure to write the state
/// back, are recorded in the summary.
pub async fn run(
    config: &NewsletterConfig,
    fetcher: &dyn FeedFetcher,
    channel: &dyn NotifyChannel,
) -> AppResult<RunSummary> {
    if config.webhook_url.is_none() {
        return Err(AppError::MissingWebhook);
    }

    let mut state = FeedState::load(&config.state_path)?;
    let mut summary = RunSummary::default();

    for newsletter in &config.newsletters {
        log::info!("Checking {}...", newsletter.name);
        let outcome = check_newsletter(newsletter, &mut state, fetcher, channel).await;
        summary.reports.push(NewsletterReport {
            name: newsletter.name.clone(),
            outcome,
        });
    }

    if summary.is_dirty() {
        match state.save(&config.state_path) {
            Ok(()) => {
                summary.state_written = true;
                log::info!("State updated.");
            }
            Err(e) => {
                log::error!(
                    "Unable to save state to {}: {e}",
                    config.state_path.display()
                );
                summary.save_error = Some(e);
            }
        }
    }

    Ok(summary)
}

async fn check_newsletter(
    newsletter: &Newsletter,
    state: &mut FeedState,
    fetcher: &dyn FeedFetcher,
    channel: &dyn NotifyChannel,
) -> FeedOutcome {
    let feed = match fetcher.fetch(&newsletter.url).await {
        Ok(feed) => feed,
        Err(e) => {
            log::warn!("Error checking {}: {e}", newsletter.name);
            return FeedOutcome::FetchFailed(e);
        }
    };

    let Some(latest) = feed.entries.first() else {
        log::info!("No entries found for {}", newsletter.name);
        return FeedOutcome::Empty;
    };

    let Some(latest_id) = latest.identifier() else {
        log::warn!("Latest entry for {} has neither id nor link", newsletter.name);
        return FeedOutcome::NoIdentifier;
    };
    let latest_id = latest_id.to_string();

    let Some(seen) = state.get(&newsletter.name).map(str::to_string) else {
        state.record(&newsletter.name, &latest_id);
        log::info!("Initialized history for {}", newsletter.name);
        return FeedOutcome::Baseline { id: latest_id };
    };

    if seen == latest_id {
        log::debug!("No new post for {}", newsletter.name);
        return FeedOutcome::Unchanged;
    }

    log::info!("Sending notification for {}...", newsletter.name);
    let payload = format_notification(&newsletter.name, latest);
    let delivery = channel.send(&payload).await;

    // A lost notification is not retried: the identifier moves on either way.
    state.record(&newsletter.name, &latest_id);

    match delivery {
        Ok(()) => FeedOutcome::Notified { id: latest_id },
        Err(error) => {
            log::error!(
                "Failed to send to {} for {}: {error}",
                channel.name(),
                newsletter.name
            );
            FeedOutcome::DeliveryFailed {
                id: latest_id,
                error,
            }
        }
    }
}

pub fn format_notification(name: &str, entry: &FeedEntry) -> WebhookPayload {
    let summary = entry.summary.as_deref().map(plain_text).unwrap_or_default();
    let excerpt = truncate_chars(&summary, EXCERPT_CHARS);

    WebhookPayload::embed(
        BOT_NAME,
        Embed {
            title: entry.title_or_default().to_string(),
            description: format!("**New post from {name}**\n{excerpt}..."),
            url: entry.link.clone(),
            color: EMBED_COLOR,
            footer: Some(EmbedFooter {
                text: FOOTER_TEXT.to_string(),
            }),
        },
    )
}
