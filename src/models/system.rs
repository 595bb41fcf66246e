//! Host-wide aggregates.

use serde::{Deserialize, Serialize};

/// CPU time and memory usage of the whole host.
///
/// CPU fields come from the aggregate `cpu` line of `/proc/stat`, memory
/// fields from `/proc/meminfo`. Each parse writes only its own fields.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq, Default)]
pub struct SystemStats {
    /// User plus nice time across all CPUs (ns).
    pub cpu_utime_ns: u64,
    /// System, irq and softirq time across all CPUs (ns).
    pub cpu_ktime_ns: u64,

    /// Source: `MemTotal`
    pub mem_total_bytes: u64,
    /// Source: `MemFree`
    pub mem_free_bytes: u64,
    /// Source: `MemAvailable`
    pub mem_available_bytes: u64,
    /// Source: `Buffers`
    pub mem_buffer_bytes: u64,
    /// Source: `Cached`
    pub mem_cached_bytes: u64,
    /// Source: `SwapCached`
    pub mem_swap_cached_bytes: u64,
    /// Source: `Active`
    pub mem_active_bytes: u64,
    /// Source: `Inactive`
    pub mem_inactive_bytes: u64,
}
