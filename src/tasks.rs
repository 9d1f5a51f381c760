//! The two checkers. Each exposes a `runner::run` that performs one pass over
//! its configured feeds and returns a summary of per-feed outcomes.

pub mod state_diff {
    pub mod runner;
    pub mod types;
}

pub mod time_window {
    pub mod runner;
    pub mod types;
}
