//! Network counters for the network namespace of a process.

use serde::{Deserialize, Serialize};

/// Network device counters summed across interfaces.
///
/// Source: `/proc/[pid]/net/dev`
///
/// The kernel reports these per network namespace, so every process in the
/// same namespace sees the same values. Counters only grow until the
/// namespace is torn down.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq, Default)]
pub struct NetworkStats {
    /// Bytes received.
    pub rx_bytes: u64,
    /// Packets received.
    pub rx_packets: u64,
    /// Receive packets dropped.
    pub rx_drops: u64,
    /// Receive errors.
    pub rx_errs: u64,
    /// Bytes transmitted.
    pub tx_bytes: u64,
    /// Packets transmitted.
    pub tx_packets: u64,
    /// Transmit packets dropped.
    pub tx_drops: u64,
    /// Transmit errors.
    pub tx_errs: u64,
}
