//! Process and host metrics read from the Linux `/proc` filesystem.
//!
//! This module provides infrastructure for reading process and system metrics
//! with support for mocking, so every parser can be tested without a live kernel.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         Collector                           │
//! │            (per-PID sampling, error policy, logs)           │
//! │                            │                                │
//! │                     ┌──────▼──────┐     ┌────────────────┐  │
//! │                     │ ProcParser  │◄────│  SystemConfig  │  │
//! │                     │ - [pid]/*   │     │ (trait)        │  │
//! │                     │ - stat      │     └────────────────┘  │
//! │                     │ - meminfo   │                         │
//! │                     └──────┬──────┘                         │
//! │                     ┌──────▼──────┐                         │
//! │                     │  FileSystem │ (trait)                 │
//! │                     └──────┬──────┘                         │
//! └────────────────────────────┼────────────────────────────────┘
//!                              │
//!              ┌───────────────┼───────────────┐
//!              │               │               │
//!       ┌──────▼──────┐ ┌──────▼──────┐ ┌──────▼──────┐
//!       │   RealFs    │ │   MockFs    │ │  Scenarios  │
//!       │ (Linux)     │ │ (Testing)   │ │ (Fixtures)  │
//!       └─────────────┘ └─────────────┘ └─────────────┘
//! ```
//!
//! # Usage
//!
//! ## Production (Linux)
//!
//! ```ignore
//! use procscope::collector::{ProcParser, RealFs};
//! use procscope::config::HostConfig;
//!
//! let parser = ProcParser::new(RealFs::new(), HostConfig::detect()?)?;
//! let mut stats = procscope::models::ProcessStats::default();
//! parser.parse_proc_pid_stat(std::process::id(), &mut stats)?;
//! ```
//!
//! ## Testing (with MockFs)
//!
//! ```
//! use procscope::collector::{MockFs, ProcParser};
//! use procscope::config::FixedConfig;
//! use procscope::models::NetworkStats;
//!
//! let parser = ProcParser::new(MockFs::sample_host(), FixedConfig::new("/proc")).unwrap();
//! let mut net = NetworkStats::default();
//! parser.parse_proc_pid_net_dev(123, &mut net).unwrap();
//! assert_eq!(net.rx_bytes, 54504114);
//! ```

#[allow(clippy::module_inception)]
mod collector;
pub mod mock;
pub mod procfs;
pub mod traits;

pub use collector::{Collector, CollectorTiming, ProcessSample, Snapshot};
pub use mock::MockFs;
pub use procfs::{LoopbackPolicy, ProcParser};
pub use traits::{FileSystem, RealFs};
