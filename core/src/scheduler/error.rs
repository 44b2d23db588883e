//! Error types for scheduler commands
//!
//! None of these are fatal. The service logs them with [`SchedulerError::report`]
//! and keeps running in its last valid state.

use thiserror::Error;
use tracing::{error, warn};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedulerError {
    #[error("no pages are configured")]
    NoPages,

    #[error("hidden page '{name}' does not exist")]
    UnknownOverlay { name: String },

    #[error("invalid page input for {command}: {input}")]
    InvalidNavigation { command: &'static str, input: String },

    #[error("rotation is already paused")]
    AlreadyPaused,

    #[error("rotation is already running")]
    AlreadyRunning,

    #[error("no hidden page is being shown")]
    NotOnOverlay,
}

impl SchedulerError {
    /// Commands that asked for the state the scheduler is already in.
    pub fn is_redundant(&self) -> bool {
        matches!(self, Self::AlreadyPaused | Self::AlreadyRunning | Self::NotOnOverlay)
    }

    /// Log at the level this error deserves.
    pub fn report(&self) {
        if self.is_redundant() {
            warn!(error = %self, "ignoring redundant command");
        } else {
            error!(error = %self, "command rejected");
        }
    }
}
