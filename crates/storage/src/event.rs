// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The WAL's unit of record: one state transition for one target.

use flowctl_core::TargetState;
use serde::{Deserialize, Serialize};

/// An operation applied to a single target's persisted state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Op {
    Reset,
    Submitted,
    Mark(TargetState),
}

/// A named operation, as appended to the write-ahead log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateEvent {
    pub target: String,
    pub op: Op,
}

impl StateEvent {
    pub fn apply_to(&self, state: &mut std::collections::HashMap<String, TargetState>) {
        let entry = state.entry(self.target.clone()).or_default();
        *entry = match &self.op {
            Op::Reset => TargetState::Unknown,
            Op::Submitted => TargetState::Submitted,
            Op::Mark(s) => *s,
        };
    }
}
