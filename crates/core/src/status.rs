// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tagged enumerations for persisted and reported target status.
//!
//! Represented as tagged sums rather than strings so invalid states are
//! unrepresentable and matches are exhaustive.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Persisted execution-state record value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetState {
    Unknown,
    Submitted,
    Running,
    Completed,
    Failed,
    Cancelled,
    Killed,
}

impl TargetState {
    pub fn is_unknown(self) -> bool {
        matches!(self, TargetState::Unknown)
    }

    pub fn is_submitted(self) -> bool {
        matches!(self, TargetState::Submitted)
    }

    pub fn is_running(self) -> bool {
        matches!(self, TargetState::Running)
    }

    pub fn is_completed(self) -> bool {
        matches!(self, TargetState::Completed)
    }

    pub fn is_failed(self) -> bool {
        matches!(self, TargetState::Failed)
    }

    pub fn is_cancelled(self) -> bool {
        matches!(self, TargetState::Cancelled)
    }

    pub fn is_killed(self) -> bool {
        matches!(self, TargetState::Killed)
    }

    /// States that, when observed on a dependency, force the dependent's
    /// persisted state back to `Unknown`.
    pub fn forces_dependent_reset(self) -> bool {
        matches!(
            self,
            TargetState::Failed | TargetState::Cancelled | TargetState::Killed | TargetState::Unknown
        )
    }
}

impl Default for TargetState {
    fn default() -> Self {
        TargetState::Unknown
    }
}

impl fmt::Display for TargetState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TargetState::Unknown => "unknown",
            TargetState::Submitted => "submitted",
            TargetState::Running => "running",
            TargetState::Completed => "completed",
            TargetState::Failed => "failed",
            TargetState::Cancelled => "cancelled",
            TargetState::Killed => "killed",
        };
        write!(f, "{s}")
    }
}

/// Status of a target as reported by the scheduler, fusing persisted
/// `TargetState` with the live staleness decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetStatus {
    ShouldRun,
    Submitted,
    Running,
    Completed,
    Failed,
    Cancelled,
    Killed,
}

impl TargetStatus {
    /// Status values that make a dependent's own `must_run` decision true.
    pub fn forces_dependent_run(self) -> bool {
        matches!(
            self,
            TargetStatus::Failed
                | TargetStatus::Killed
                | TargetStatus::Cancelled
                | TargetStatus::ShouldRun
        )
    }

    /// Pure function of `(state, should_run)`.
    pub fn resolve(state: TargetState, should_run: bool) -> Self {
        match state {
            TargetState::Unknown | TargetState::Completed => {
                if should_run {
                    TargetStatus::ShouldRun
                } else {
                    TargetStatus::Completed
                }
            }
            TargetState::Submitted => TargetStatus::Submitted,
            TargetState::Running => TargetStatus::Running,
            TargetState::Failed => TargetStatus::Failed,
            TargetState::Cancelled => TargetStatus::Cancelled,
            TargetState::Killed => TargetStatus::Killed,
        }
    }
}

impl fmt::Display for TargetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TargetStatus::ShouldRun => "should-run",
            TargetStatus::Submitted => "submitted",
            TargetStatus::Running => "running",
            TargetStatus::Completed => "completed",
            TargetStatus::Failed => "failed",
            TargetStatus::Cancelled => "cancelled",
            TargetStatus::Killed => "killed",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
