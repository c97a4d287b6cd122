// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the CLI crate.

use std::path::PathBuf;

/// Resolve the default state directory:
/// `FLOWCTL_STATE_DIR` > `XDG_STATE_HOME/flowctl` > `~/.local/state/flowctl`.
pub fn default_state_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var("FLOWCTL_STATE_DIR") {
        return Some(PathBuf::from(dir));
    }
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return Some(PathBuf::from(xdg).join("flowctl"));
    }
    let home = std::env::var("HOME").ok()?;
    Some(PathBuf::from(home).join(".local/state/flowctl"))
}

/// `FLOWCTL_BACKEND` override for the default backend name.
pub fn default_backend() -> Option<String> {
    std::env::var("FLOWCTL_BACKEND").ok()
}
