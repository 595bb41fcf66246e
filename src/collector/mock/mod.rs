//! Mock filesystem implementations for testing.
//!
//! This module provides `MockFs` and pre-built scenarios for testing
//! parsers without requiring access to a live `/proc` filesystem.

mod filesystem;
mod scenarios;

pub use filesystem::MockFs;
pub use scenarios::{SAMPLE_MEMINFO, SAMPLE_NET_DEV, SAMPLE_STAT};
