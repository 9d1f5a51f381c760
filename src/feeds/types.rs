use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::errors::FetchError;

/// A fetched feed, reduced to the fields the checkers read
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedDocument {
    /// The feed's own declared title
    pub title: Option<String>,
    /// Entries in document order, newest first by convention
    pub entries: Vec<FeedEntry>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedEntry {
    pub id: Option<String>,
    pub title: Option<String>,
    pub link: Option<String>,
    pub summary: Option<String>,
    /// `None` when the entry has no publish time or it could not be parsed
    pub published: Option<DateTime<Utc>>,
}

impl FeedEntry {
    /// Stable identifier for change detection: the entry id, else its link
    pub fn identifier(&self) -> Option<&str> {
        self.id.as_deref().or(self.link.as_deref())
    }

    pub fn title_or_default(&self) -> &str {
        self.title.as_deref().unwrap_or("Untitled post")
    }

    pub fn link_or_default(&self) -> &str {
        self.link.as_deref().unwrap_or_default()
    }
}

impl FeedDocument {
    /// Parse a feed body. Entries without an id get an empty one, which
    /// `From<Entry>` turns into `None` so `identifier()` falls back to the link.
    pub fn parse(body: &[u8]) -> Result<Self, feed_rs::parser::ParseFeedError> {
        let parsed = feed_rs::parser::Builder::new()
            .id_generator(|_, _, _| String::new())
            .build()
            .parse(body)?;
        Ok(parsed.into())
    }
}

impl From<feed_rs::model::Feed> for FeedDocument {
    fn from(parsed: feed_rs::model::Feed) -> Self {
        FeedDocument {
            title: parsed.title.map(|t| t.content).filter(|t| !t.trim().is_empty()),
            entries: parsed.entries.into_iter().map(FeedEntry::from).collect(),
        }
    }
}

impl From<feed_rs::model::Entry> for FeedEntry {
    fn from(entry: feed_rs::model::Entry) -> Self {
        // entry.links may be an empty Vec
        let link = entry.links.into_iter().next().map(|l| l.href);
        FeedEntry {
            id: Some(entry.id).filter(|id| !id.trim().is_empty()),
            title: entry.title.map(|t| t.content),
            link,
            summary: entry.summary.map(|s| s.content),
            published: entry.published,
        }
    }
}

/// Source of parsed feeds, keyed by feed URL
#[async_trait]
pub trait FeedFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FeedDocument, FetchError>;
}
