//! Output module for run reporting
//!
//! This module turns a finished batch or follow-up pass into statistics for
//! the operator.

pub mod stats;

pub use stats::{print_follow_up_statistics, print_statistics, BatchStats, FollowUpStats};
