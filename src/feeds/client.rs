use async_trait::async_trait;
use reqwest::Client;

use super::types::{FeedDocument, FeedFetcher};
use crate::errors::FetchError;

// See: https://stackoverflow.com/a/7001617/5155484
const ACCEPT: &str = "application/rss+xml, application/rdf+xml, application/atom+xml, application/feed+json, application/xml;q=0.9, text/xml;q=0.8";
const USER_AGENT: &str = concat!("feedwatch/", env!("CARGO_PKG_VERSION"));

/// Fetches feeds over HTTP and parses them with `feed-rs`
pub struct HttpFeedFetcher {
    client: Client,
}

impl HttpFeedFetcher {
    pub fn new() -> Self {
        Self::with_client(Client::new())
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl Default for HttpFeedFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FeedFetcher for HttpFeedFetcher {
    async fn fetch(&self, url: &str) -> Result<FeedDocument, FetchError> {
        let response = self
            .client
            .get(url)
            .header("Accept", ACCEPT)
            .header("User-Agent", USER_AGENT)
            .send()
            .await?;

        if !response.status().is_success() {
            log::warn!(
                "Got non-success response for feed {}: {}",
                url,
                response.status()
            );
            return Err(FetchError::Status(response.status()));
        }

        let body = response.bytes().await?;
        let feed = FeedDocument::parse(body.as_ref())?;
        log::debug!("Parsed {} entries from {}", feed.entries.len(), url);

        Ok(feed)
    }
}
