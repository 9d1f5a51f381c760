use chrono::{DateTime, Utc};
use url::Url;

use super::types::{ScanCounts, ScanResult, SiteReport, WindowSummary};
use crate::{
    config::WindowConfig,
    discord::{NotifyChannel, WebhookPayload},
    feeds::{FeedEntry, FeedFetcher},
};

pub const FEED_SUFFIX: &str = "/feed";

/// Notify every entry published after `now - config.window`, site by site.
///
/// A missing webhook only produces a warning; each send then fails on its own.
pub async fn run(
    config: &WindowConfig,
    fetcher: &dyn FeedFetcher,
    channel: &dyn NotifyChannel,
    now: DateTime<Utc>,
) -> WindowSummary {
    if config.webhook_url.is_none() || !channel.enabled() {
        log::warn!("No webhook URL found. Notifications will fail.");
    }

    // An unrepresentable cutoff means every dated entry is inside the window
    let cutoff = now
        .checked_sub_signed(config.window)
        .unwrap_or(DateTime::<Utc>::MIN_UTC);
    let mut summary = WindowSummary::default();

    for site in &config.sites {
        let feed_url = feed_url_for(site);
        log::info!("Checking: {feed_url}...");
        let result = check_site(&feed_url, cutoff, fetcher, channel).await;
        summary.reports.push(SiteReport { feed_url, result });
    }

    summary
}

pub fn feed_url_for(site: &str) -> String {
    format!("{}{FEED_SUFFIX}", site.trim_end_matches('/'))
}

async fn check_site(
    feed_url: &str,
    cutoff: DateTime<Utc>,
    fetcher: &dyn FeedFetcher,
    channel: &dyn NotifyChannel,
) -> ScanResult {
    let feed = match fetcher.fetch(feed_url).await {
        Ok(feed) => feed,
        Err(e) => {
            log::warn!("Error getting feed {feed_url}: {e}");
            return ScanResult::FetchFailed(e);
        }
    };

    if feed.entries.is_empty() {
        log::info!("No entries found in {feed_url}");
        return ScanResult::Empty;
    }

    let author = match &feed.title {
        Some(title) => title.clone(),
        None => host_of(feed_url),
    };

    let mut counts = ScanCounts::default();
    // Entries are newest first, so the first one at or before the cutoff ends the scan.
    for entry in &feed.entries {
        let Some(published) = entry.published else {
            counts.skipped += 1;
            continue;
        };

        if published <= cutoff {
            counts.reached_cutoff = true;
            break;
        }

        log::info!("Found new post: {}", entry.title_or_default());
        match channel.send(&format_notification(&author, entry)).await {
            Ok(()) => {
                log::info!("Notification sent for: {}", entry.title_or_default());
                counts.notified += 1;
            }
            Err(e) => {
                log::error!("Failed to send notification: {e}");
                counts.delivery_failed += 1;
            }
        }
    }

    ScanResult::Scanned(counts)
}

fn host_of(feed_url: &str) -> String {
    Url::parse(feed_url)
        .ok()
        .and_then(|url| url.host_str().map(str::to_string))
        .unwrap_or_else(|| feed_url.to_string())
}

pub fn format_notification(author: &str, entry: &FeedEntry) -> WebhookPayload {
    WebhookPayload::text(format!(
        "**New Post from {author}!**\n{}\n{}",
        entry.title_or_default(),
        entry.link_or_default()
    ))
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};
    use reqwest::StatusCode;

    use super::*;
    use crate::test_helpers::{entry, feed, FakeFetcher, RecordingChannel};

    const PRAGMATIC: &str = "https://newsletter.pragmaticengineer.com";
    const LENNY: &str = "https://www.lennysnewsletter.com/";

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 17, 12, 0, 0).unwrap()
    }

    fn minutes_ago(minutes: i64) -> Option<DateTime<Utc>> {
        Some(now() - Duration::minutes(minutes))
    }

    fn config(sites: &[&str]) -> WindowConfig {
        WindowConfig {
            webhook_url: Some("https://discord.test/hook".to_string()),
            sites: sites.iter().map(|s| s.to_string()).collect(),
            window: Duration::minutes(70),
        }
    }

    #[test]
    fn test_feed_url_for() {
        assert_eq!(
            feed_url_for("https://www.lennysnewsletter.com/"),
            "https://www.lennysnewsletter.com/feed"
        );
        assert_eq!(feed_url_for("https://a.test//"), "https://a.test/feed");
        assert_eq!(feed_url_for("https://a.test"), "https://a.test/feed");
    }

    #[tokio::test]
    async fn test_cutoff_boundary() {
        let cutoff = now() - Duration::minutes(70);
        let feed_url = feed_url_for(PRAGMATIC);
        let fetcher = FakeFetcher::new().with_feed(
            &feed_url,
            feed(
                "The Pragmatic Engineer",
                vec![
                    entry("just-in", Some(cutoff + Duration::seconds(1))),
                    entry("on-the-line", Some(cutoff)),
                ],
            ),
        );
        let channel = RecordingChannel::new();

        let summary = run(&config(&[PRAGMATIC]), &fetcher, &channel, now()).await;

        let sent = channel.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(
            sent[0].content.as_deref(),
            Some("**New Post from The Pragmatic Engineer!**\nPost just-in\nhttps://example.com/p/just-in")
        );
        let counts = summary.report(&feed_url).unwrap().counts().unwrap();
        assert!(counts.reached_cutoff);
    }

    #[tokio::test]
    async fn test_scan_stops_at_first_old_entry() {
        let feed_url = feed_url_for(PRAGMATIC);
        let fetcher = FakeFetcher::new().with_feed(
            &feed_url,
            feed(
                "The Pragmatic Engineer",
                vec![
                    entry("new-1", minutes_ago(5)),
                    entry("new-2", minutes_ago(30)),
                    entry("old", minutes_ago(200)),
                    entry("new-3", minutes_ago(1)),
                ],
            ),
        );
        let channel = RecordingChannel::new();

        let summary = run(&config(&[PRAGMATIC]), &fetcher, &channel, now()).await;

        let contents: Vec<String> = channel
            .sent()
            .into_iter()
            .filter_map(|p| p.content)
            .collect();
        assert_eq!(contents.len(), 2);
        assert!(contents[0].contains("Post new-1"));
        assert!(contents[1].contains("Post new-2"));
        assert_eq!(summary.total_notified(), 2);
    }

    #[tokio::test]
    async fn test_entries_without_publish_time_are_skipped() {
        let feed_url = feed_url_for(PRAGMATIC);
        let fetcher = FakeFetcher::new().with_feed(
            &feed_url,
            feed(
                "The Pragmatic Engineer",
                vec![
                    entry("undated", None),
                    entry("new", minutes_ago(10)),
                    entry("old", minutes_ago(100)),
                ],
            ),
        );
        let channel = RecordingChannel::new();

        let summary = run(&config(&[PRAGMATIC]), &fetcher, &channel, now()).await;

        let counts = summary.report(&feed_url).unwrap().counts().unwrap();
        assert_eq!(
            counts,
            &ScanCounts {
                notified: 1,
                delivery_failed: 0,
                skipped: 1,
                reached_cutoff: true,
            }
        );
    }

    #[tokio::test]
    async fn test_failing_site_does_not_stop_others() {
        let fetcher = FakeFetcher::new()
            .with_failure(&feed_url_for(PRAGMATIC), StatusCode::INTERNAL_SERVER_ERROR)
            .with_feed(
                &feed_url_for(LENNY),
                feed("Lenny's Newsletter", vec![entry("fresh", minutes_ago(3))]),
            );
        let channel = RecordingChannel::new();

        let summary = run(&config(&[PRAGMATIC, LENNY]), &fetcher, &channel, now()).await;

        assert_eq!(fetcher.requested().len(), 2);
        assert!(matches!(
            summary.report(&feed_url_for(PRAGMATIC)).unwrap().result,
            ScanResult::FetchFailed(_)
        ));
        assert_eq!(channel.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_feed() {
        let feed_url = feed_url_for(PRAGMATIC);
        let fetcher = FakeFetcher::new().with_feed(&feed_url, feed("Empty", vec![]));
        let channel = RecordingChannel::new();

        let summary = run(&config(&[PRAGMATIC]), &fetcher, &channel, now()).await;

        assert!(matches!(
            summary.report(&feed_url).unwrap().result,
            ScanResult::Empty
        ));
        assert!(channel.sent().is_empty());
    }

    #[tokio::test]
    async fn test_delivery_failures_are_counted_and_scan_continues() {
        let feed_url = feed_url_for(PRAGMATIC);
        let fetcher = FakeFetcher::new().with_feed(
            &feed_url,
            feed(
                "The Pragmatic Engineer",
                vec![entry("a", minutes_ago(1)), entry("b", minutes_ago(2))],
            ),
        );
        let channel = RecordingChannel::failing();

        let summary = run(&config(&[PRAGMATIC]), &fetcher, &channel, now()).await;

        assert_eq!(channel.sent().len(), 2);
        assert_eq!(summary.total_failed(), 2);
        assert_eq!(summary.total_notified(), 0);
    }

    #[tokio::test]
    async fn test_missing_webhook_still_fetches() {
        let feed_url = feed_url_for(PRAGMATIC);
        let fetcher = FakeFetcher::new().with_feed(
            &feed_url,
            feed("The Pragmatic Engineer", vec![entry("a", minutes_ago(1))]),
        );
        let channel = crate::discord::DiscordWebhook::new(None);
        let mut config = config(&[PRAGMATIC]);
        config.webhook_url = None;

        let summary = run(&config, &fetcher, &channel, now()).await;

        assert_eq!(fetcher.requested(), vec![feed_url]);
        assert_eq!(summary.total_failed(), 1);
    }

    #[tokio::test]
    async fn test_oversized_window_does_not_overflow() {
        let feed_url = feed_url_for(PRAGMATIC);
        let fetcher = FakeFetcher::new().with_feed(
            &feed_url,
            feed(
                "The Pragmatic Engineer",
                vec![entry("recent", minutes_ago(1)), entry("ancient", minutes_ago(5_000_000))],
            ),
        );
        let channel = RecordingChannel::new();
        let mut config = config(&[PRAGMATIC]);
        config.window = Duration::MAX;

        let summary = run(&config, &fetcher, &channel, now()).await;

        assert_eq!(summary.total_notified(), 2);
    }

    #[test]
    fn test_author_falls_back_to_host() {
        assert_eq!(
            host_of("https://www.lennysnewsletter.com/feed"),
            "www.lennysnewsletter.com"
        );
        assert_eq!(host_of("not a url"), "not a url");
    }
}
