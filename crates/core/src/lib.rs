// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! flowctl-core: dependency graph, staleness model and target data model
//! for the flowctl workflow build engine.

pub mod error;
pub mod file_cache;
pub mod graph;
pub mod option_value;
pub mod path_collection;
pub mod status;
pub mod target;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use error::{FileInfoCacheError, GraphError, TargetError};
pub use file_cache::{FileInfoCache, FileState};
pub use graph::{Graph, TargetIdx};
pub use option_value::OptionValue;
pub use path_collection::PathCollection;
pub use status::{TargetState, TargetStatus};
pub use target::Target;
