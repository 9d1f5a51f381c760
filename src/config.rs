use std::env;
use std::path::PathBuf;

use chrono::Duration;

use crate::errors::{AppError, AppResult};

pub const WEBHOOK_ENV: &str = "DISCORD_WEBHOOK_URL";
pub const STATE_FILE_ENV: &str = "FEEDWATCH_STATE_FILE";
pub const WINDOW_MINUTES_ENV: &str = "FEEDWATCH_WINDOW_MINUTES";

pub const DEFAULT_STATE_FILE: &str = "feed_state.json";
pub const DEFAULT_WINDOW_MINUTES: i64 = 70;
/// One year; longer windows would only replay a feed's whole history
pub const MAX_WINDOW_MINUTES: i64 = 60 * 24 * 365;

/// Newsletters watched for a changed latest entry, as (name, feed URL)
pub const NEWSLETTERS: &[(&str, &str)] = &[
    ("Thing of Things", "https://thingofthings.substack.com/feed"),
    ("Slow Boring", "https://www.slowboring.com/feed"),
    ("Astral Codex Ten", "https://www.astralcodexten.com/feed"),
    ("Bentham's Bulldog", "https://benthamsbulldog.substack.com/feed"),
    ("Celeste's Newsletter", "https://celestemarcus.substack.com/feed"),
];

/// Sites watched for recently published entries; `/feed` is appended
pub const SITES: &[&str] = &[
    "https://newsletter.pragmaticengineer.com",
    "https://www.lennysnewsletter.com",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Newsletter {
    pub name: String,
    pub url: String,
}

/// Configuration for the latest-identifier checker
#[derive(Debug, Clone)]
pub struct NewsletterConfig {
    pub webhook_url: Option<String>,
    pub state_path: PathBuf,
    pub newsletters: Vec<Newsletter>,
}

impl NewsletterConfig {
    pub fn from_env() -> Self {
        let state_path = match env::var(STATE_FILE_ENV) {
            Ok(path) => {
                log::info!("Using state file from {STATE_FILE_ENV}: {path}");
                PathBuf::from(path)
            }
            Err(_) => {
                log::info!("Using default state file: {DEFAULT_STATE_FILE}");
                PathBuf::from(DEFAULT_STATE_FILE)
            }
        };

        Self {
            webhook_url: webhook_from_env(),
            state_path,
            newsletters: default_newsletters(),
        }
    }
}

/// Configuration for the publish-time window checker
#[derive(Debug, Clone)]
pub struct WindowConfig {
    pub webhook_url: Option<String>,
    pub sites: Vec<String>,
    pub window: Duration,
}

impl WindowConfig {
    pub fn from_env() -> AppResult<Self> {
        let window = match env::var(WINDOW_MINUTES_ENV) {
            Ok(minutes) => {
                log::info!("Using time window from {WINDOW_MINUTES_ENV}: {minutes} minutes");
                parse_window_minutes(&minutes)?
            }
            Err(_) => {
                log::info!("Using default time window: {DEFAULT_WINDOW_MINUTES} minutes");
                Duration::minutes(DEFAULT_WINDOW_MINUTES)
            }
        };

        Ok(Self {
            webhook_url: webhook_from_env(),
            sites: SITES.iter().map(|s| s.to_string()).collect(),
            window,
        })
    }
}

fn webhook_from_env() -> Option<String> {
    env::var(WEBHOOK_ENV)
        .ok()
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty())
}

pub fn default_newsletters() -> Vec<Newsletter> {
    NEWSLETTERS
        .iter()
        .map(|(name, url)| Newsletter {
            name: name.to_string(),
            url: url.to_string(),
        })
        .collect()
}

pub fn parse_window_minutes(value: &str) -> AppResult<Duration> {
    let minutes = value.trim().parse::<i64>().map_err(|_| {
        AppError::invalid_config(WINDOW_MINUTES_ENV, "must be a whole number of minutes")
    })?;
    window_from_minutes(minutes)
}

pub fn window_from_minutes(minutes: i64) -> AppResult<Duration> {
    if !(1..=MAX_WINDOW_MINUTES).contains(&minutes) {
        return Err(AppError::invalid_config(
            WINDOW_MINUTES_ENV,
            &format!("must be between 1 and {MAX_WINDOW_MINUTES} minutes"),
        ));
    }
    Duration::try_minutes(minutes)
        .ok_or_else(|| AppError::invalid_config(WINDOW_MINUTES_ENV, "out of range"))
}
