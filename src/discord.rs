//! Discord webhook delivery.

pub mod client;
pub mod types;

pub use client::{DiscordWebhook, NotifyChannel};
pub use types::{Embed, EmbedFooter, WebhookPayload};
