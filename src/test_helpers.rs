use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::StatusCode;

use crate::discord::{NotifyChannel, WebhookPayload};
use crate::errors::{ChannelError, FetchError};
use crate::feeds::{FeedDocument, FeedEntry, FeedFetcher};

/// In-memory feeds keyed by URL; unknown URLs answer 404
#[derive(Default)]
pub struct FakeFetcher {
    feeds: HashMap<String, Result<FeedDocument, StatusCode>>,
    requested: Mutex<Vec<String>>,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_feed(mut self, url: &str, feed: FeedDocument) -> Self {
        self.feeds.insert(url.to_string(), Ok(feed));
        self
    }

    pub fn with_failure(mut self, url: &str, status: StatusCode) -> Self {
        self.feeds.insert(url.to_string(), Err(status));
        self
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl FeedFetcher for FakeFetcher {
    async fn fetch(&self, url: &str) -> Result<FeedDocument, FetchError> {
        self.requested.lock().unwrap().push(url.to_string());
        match self.feeds.get(url) {
            Some(Ok(feed)) => Ok(feed.clone()),
            Some(Err(status)) => Err(FetchError::Status(*status)),
            None => Err(FetchError::Status(StatusCode::NOT_FOUND)),
        }
    }
}

/// Records every payload; optionally fails each send after recording it
#[derive(Default)]
pub struct RecordingChannel {
    sent: Mutex<Vec<WebhookPayload>>,
    fail: bool,
}

impl RecordingChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn sent(&self) -> Vec<WebhookPayload> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotifyChannel for RecordingChannel {
    fn name(&self) -> &'static str {
        "recording"
    }

    fn enabled(&self) -> bool {
        true
    }

    async fn send(&self, payload: &WebhookPayload) -> Result<(), ChannelError> {
        self.sent.lock().unwrap().push(payload.clone());
        if self.fail {
            return Err(ChannelError::Rejected {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                body: "boom".to_string(),
            });
        }
        Ok(())
    }
}

pub fn entry(id: &str, published: Option<DateTime<Utc>>) -> FeedEntry {
    FeedEntry {
        id: Some(id.to_string()),
        title: Some(format!("Post {id}")),
        link: Some(format!("https://example.com/p/{id}")),
        summary: Some(format!("Summary of {id}")),
        published,
    }
}

pub fn feed(title: &str, entries: Vec<FeedEntry>) -> FeedDocument {
    FeedDocument {
        title: Some(title.to_string()),
        entries,
    }
}
