//! Typed records produced by the `/proc` parsers.
//!
//! - [`network`]: per-process network counters from `/proc/[pid]/net/dev`
//! - [`process`]: per-process CPU, memory and I/O from `/proc/[pid]/{stat,io,status}`
//! - [`system`]: host-wide CPU and memory from `/proc/{stat,meminfo}`
//!
//! All values are normalized: times in nanoseconds, sizes in bytes.
//! Records are plain values; the parser never keeps a copy.

mod network;
mod process;
mod system;

pub use network::NetworkStats;
pub use process::{ProcessStats, Uids};
pub use system::SystemStats;
