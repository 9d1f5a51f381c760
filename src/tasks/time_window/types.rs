use crate::errors::FetchError;

/// How a site's scan ended
#[derive(Debug)]
pub enum ScanResult {
    Scanned(ScanCounts),
    Empty,
    FetchFailed(FetchError),
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScanCounts {
    pub notified: usize,
    pub delivery_failed: usize,
    /// Entries without a usable publish time
    pub skipped: usize,
    /// Set when an entry at or before the cutoff ended the scan
    pub reached_cutoff: bool,
}

#[derive(Debug)]
pub struct SiteReport {
    pub feed_url: String,
    pub result: ScanResult,
}

impl SiteReport {
    pub fn counts(&self) -> Option<&ScanCounts> {
        match &self.result {
            ScanResult::Scanned(counts) => Some(counts),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
pub struct WindowSummary {
    pub reports: Vec<SiteReport>,
}

impl WindowSummary {
    pub fn report(&self, feed_url: &str) -> Option<&SiteReport> {
        self.reports.iter().find(|r| r.feed_url == feed_url)
    }

    pub fn total_notified(&self) -> usize {
        self.reports
            .iter()
            .filter_map(SiteReport::counts)
            .map(|c| c.notified)
            .sum()
    }

    pub fn total_failed(&self) -> usize {
        self.reports
            .iter()
            .filter_map(SiteReport::counts)
            .map(|c| c.delivery_failed)
            .sum()
    }
}
