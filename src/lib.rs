//! procscope - typed, unit-normalized readers for the Linux `/proc` filesystem.
//!
//! Provides:
//! - `collector`: `/proc` parsers, the `FileSystem` abstraction, mocks and a sampling `Collector`
//! - `config`: host constants (page size, tick rate, clock offset, proc root)
//! - `models`: `NetworkStats`, `ProcessStats`, `SystemStats` records
//! - `error`: `ProcError`, separating vanished processes from format and config problems

pub mod collector;
pub mod config;
pub mod error;
pub mod models;

pub use collector::{Collector, FileSystem, LoopbackPolicy, MockFs, ProcParser, RealFs};
pub use config::{FixedConfig, HostConfig, SystemConfig};
pub use error::{ProcError, ProcFile};
