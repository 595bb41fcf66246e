//! Per-process resource usage.

use serde::{Deserialize, Serialize};

/// CPU, memory and I/O usage of a single process.
///
/// Filled in two steps: `/proc/[pid]/stat` provides the name, CPU time,
/// faults and memory; `/proc/[pid]/io` provides the I/O counters. Each
/// parse writes only its own fields.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq, Default)]
pub struct ProcessStats {
    /// Command name, as the kernel stores it (may contain spaces and parentheses).
    /// Source: `/proc/[pid]/stat` field 2
    pub process_name: String,

    /// Time scheduled in user mode (ns).
    /// Source: `/proc/[pid]/stat` utime, converted from clock ticks
    pub utime_ns: u64,

    /// Time scheduled in kernel mode (ns).
    /// Source: `/proc/[pid]/stat` stime, converted from clock ticks
    pub ktime_ns: u64,

    /// Number of threads.
    /// Source: `/proc/[pid]/stat` num_threads
    pub num_threads: u32,

    /// Faults that required loading a page from disk.
    /// Source: `/proc/[pid]/stat` majflt
    pub major_faults: u64,

    /// Faults served without disk I/O.
    /// Source: `/proc/[pid]/stat` minflt
    pub minor_faults: u64,

    /// Virtual memory size (bytes).
    /// Source: `/proc/[pid]/stat` vsize
    pub vsize_bytes: u64,

    /// Resident set size (bytes).
    /// Source: `/proc/[pid]/stat` rss, converted from pages
    pub rss_bytes: u64,

    /// Bytes passed to read-like syscalls, including page cache hits.
    /// Source: `/proc/[pid]/io` rchar
    pub rchar_bytes: u64,

    /// Bytes passed to write-like syscalls.
    /// Source: `/proc/[pid]/io` wchar
    pub wchar_bytes: u64,

    /// Bytes actually fetched from the storage layer.
    /// Source: `/proc/[pid]/io` read_bytes
    pub read_bytes: u64,

    /// Bytes sent to the storage layer.
    /// Source: `/proc/[pid]/io` write_bytes
    pub write_bytes: u64,
}

/// User ids of a process.
///
/// Source: `Uid:` line of `/proc/[pid]/status`
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Default)]
pub struct Uids {
    pub real: u32,
    pub effective: u32,
    pub saved: u32,
    pub filesystem: u32,
}
