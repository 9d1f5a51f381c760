pub mod config;
pub mod discord;
pub mod errors;
pub mod feeds;
pub mod observability;
pub mod state;
pub mod tasks;
#[cfg(test)]
pub mod test_helpers;
pub mod text;
