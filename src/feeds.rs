//! Feed retrieval: the [`FeedFetcher`] seam and its HTTP implementation.

pub mod client;
pub mod types;

pub use client::HttpFeedFetcher;
pub use types::{FeedDocument, FeedEntry, FeedFetcher};
