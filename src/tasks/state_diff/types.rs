use crate::errors::{ChannelError, FetchError, StateError};

/// What happened to one newsletter during a run
#[derive(Debug)]
pub enum FeedOutcome {
    /// First sighting; identifier stored without notifying
    Baseline { id: String },
    Unchanged,
    Notified { id: String },
    /// Identifier advanced even though the notification was lost
    DeliveryFailed { id: String, error: ChannelError },
    Empty,
    NoIdentifier,
    FetchFailed(FetchError),
}

impl FeedOutcome {
    /// Whether this outcome changed the stored identifier
    pub fn updates_state(&self) -> bool {
        matches!(
            self,
            FeedOutcome::Baseline { .. }
                | FeedOutcome::Notified { .. }
                | FeedOutcome::DeliveryFailed { .. }
        )
    }

    pub fn label(&self) -> &'static str {
        match self {
            FeedOutcome::Baseline { .. } => "baseline",
            FeedOutcome::Unchanged => "unchanged",
            FeedOutcome::Notified { .. } => "notified",
            FeedOutcome::DeliveryFailed { .. } => "delivery_failed",
            FeedOutcome::Empty => "empty",
            FeedOutcome::NoIdentifier => "no_identifier",
            FeedOutcome::FetchFailed(_) => "fetch_failed",
        }
    }
}

#[derive(Debug)]
pub struct NewsletterReport {
    pub name: String,
    pub outcome: FeedOutcome,
}

#[derive(Debug, Default)]
pub struct RunSummary {
    pub reports: Vec<NewsletterReport>,
    pub state_written: bool,
    /// Set when the run was dirty but the state file could not be replaced
    pub save_error: Option<StateError>,
}

impl RunSummary {
    pub fn outcome(&self, name: &str) -> Option<&FeedOutcome> {
        self.reports
            .iter()
            .find(|r| r.name == name)
            .map(|r| &r.outcome)
    }

    pub fn count(&self, label: &str) -> usize {
        self.reports
            .iter()
            .filter(|r| r.outcome.label() == label)
            .count()
    }

    pub fn is_dirty(&self) -> bool {
        self.reports.iter().any(|r| r.outcome.updates_state())
    }
}
