use std::fmt;

use crate::models::error::Error;
use crate::models::metadata::ModMetadata;

/// What a single install attempt did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    /// The mod was extracted into the game directory.
    Ok,
    /// The mod was already installed and `keep` mode left it alone.
    Exists,
}

impl fmt::Display for InstallOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstallOutcome::Ok => write!(f, "ok"),
            InstallOutcome::Exists => write!(f, "exists"),
        }
    }
}

/// Lifecycle events emitted while the orchestrator walks a mod collection.
/// End events own the outcome, failures included, so a sink sees the exact
/// cause without the batch aborting.
#[derive(Debug)]
pub enum ModEvent {
    InstallStart {
        metadata: ModMetadata,
    },
    InstallEnd {
        metadata: ModMetadata,
        outcome: Result<InstallOutcome, Error>,
    },
    RegisterStart {
        metadata: ModMetadata,
    },
    RegisterEnd {
        metadata: ModMetadata,
        outcome: Result<(), Error>,
    },
}
