//! Worker lifecycle tracking.

use std::fmt;

use serde::Serialize;

/// States a worker version moves through.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkerState {
    /// Script evaluated, not yet installing.
    #[default]
    Parsed,
    /// Install handler running.
    Installing,
    /// Pre-cache complete.
    Installed,
    /// Activate handler running.
    Activating,
    /// Controlling clients.
    Activated,
    /// Failed to install or replaced.
    Redundant,
}

impl WorkerState {
    /// Only an activated worker receives fetch events.
    pub fn can_intercept_fetch(&self) -> bool {
        matches!(self, Self::Activated)
    }

    /// No transitions leave this state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Redundant)
    }

    /// Check whether moving to `next` is a legal lifecycle step.
    ///
    /// The host may stop a worker between events and start a fresh instance,
    /// so a freshly parsed worker may go straight to activating.
    pub fn transition(self, next: WorkerState) -> Result<WorkerState, LifecycleError> {
        use WorkerState::*;

        let allowed = matches!(
            (self, next),
            (Parsed, Installing)
                | (Parsed, Activating)
                | (Installing, Installed)
                | (Installed, Activating)
                | (Activating, Activated)
                | (_, Redundant)
        );

        if allowed && !self.is_terminal() {
            Ok(next)
        } else {
            Err(LifecycleError::InvalidTransition { from: self, to: next })
        }
    }
}

impl fmt::Display for WorkerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parsed => write!(f, "parsed"),
            Self::Installing => write!(f, "installing"),
            Self::Installed => write!(f, "installed"),
            Self::Activating => write!(f, "activating"),
            Self::Activated => write!(f, "activated"),
            Self::Redundant => write!(f, "redundant"),
        }
    }
}

/// Error for lifecycle violations.
#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    #[error("invalid lifecycle transition: {from} -> {to}")]
    InvalidTransition { from: WorkerState, to: WorkerState },
}
