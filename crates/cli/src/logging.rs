// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `tracing`/`tracing-subscriber` setup for a short-lived foreground
//! process: logs go to stderr, and `-v`/`--verbose` raises the default
//! filter, rather than writing to a rotated log file a long-lived daemon
//! would own.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install a global `tracing` subscriber writing to stderr.
///
/// `RUST_LOG` always wins if set; otherwise the default level is `warn`,
/// raised to `info` for one `-v` and `debug` for two or more.
pub fn init(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}
