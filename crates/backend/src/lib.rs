// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Concrete [`flowctl_engine::Backend`] implementations.
//!
//! `flowctl-engine` only specifies the contract a backend must satisfy;
//! this crate supplies the one the CLI actually ships with —
//! [`LocalBackend`], which runs a target's shell spec as a child process on
//! the machine `flowctl` itself runs on. A call-recording `FakeBackend`
//! for scheduler tests lives in `flowctl_engine::test_support` instead,
//! since the scheduler's own test suite needs it without depending on this
//! crate.

mod local;

pub use local::LocalBackend;
