//! Parsers for `/proc` filesystem files.
//!
//! These are pure functions that parse the content of various `/proc` files
//! into structured data. They are designed to be easily testable with string inputs.
//! Unit conversion and I/O live in [`ProcParser`](super::ProcParser).

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{NetworkStats, Uids};

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Error type for parsing failures.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Parse error: {message}")]
pub struct ParseError {
    pub message: String,
}

impl ParseError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
        }
    }
}

/// Converts clock ticks to nanoseconds.
///
/// Uses 128-bit intermediates: `ticks * 1e9` overflows `u64` after a few
/// years of aggregate CPU time at 100 ticks/s. Fails if the result does not
/// fit in `u64` nanoseconds (about 584 years).
pub fn ticks_to_ns(ticks: u64, ticks_per_second: u64) -> Result<u64, ParseError> {
    let ns = ticks as u128 * NANOS_PER_SEC / ticks_per_second as u128;
    u64::try_from(ns).map_err(|_| ParseError::new(format!("{} ticks overflow nanoseconds", ticks)))
}

/// Converts a `kB` value (really KiB) from `/proc` to bytes.
pub fn kb_to_bytes(kb: u64) -> Result<u64, ParseError> {
    kb.checked_mul(1024)
        .ok_or_else(|| ParseError::new(format!("{} kB overflows bytes", kb)))
}

/// Adds two counters read from `/proc`, failing instead of wrapping.
pub fn checked_sum(a: u64, b: u64, name: &str) -> Result<u64, ParseError> {
    a.checked_add(b)
        .ok_or_else(|| ParseError::new(format!("{} overflows u64", name)))
}

fn parse_u64(value: &str, name: &str) -> Result<u64, ParseError> {
    value
        .parse()
        .map_err(|_| ParseError::new(format!("invalid {}: {:?}", name, value)))
}

// ============ /proc/[pid]/stat ============

/// Number of fields after the comm field that we need (up to and including rss).
const STAT_REQUIRED_FIELDS: usize = 22;

/// Parsed data from `/proc/[pid]/stat`.
///
/// Only the fields consumed by the records are kept. Field numbers in the
/// comments are 1-indexed positions after the comm field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcStat {
    pub pid: u32,
    pub comm: String,
    /// 1
    pub state: char,
    /// 2
    pub ppid: u32,
    /// 8
    pub minflt: u64,
    /// 10
    pub majflt: u64,
    /// 12, clock ticks
    pub utime: u64,
    /// 13, clock ticks
    pub stime: u64,
    /// 18
    pub num_threads: u32,
    /// 20, clock ticks since boot
    pub starttime: u64,
    /// 21, bytes
    pub vsize: u64,
    /// 22, pages
    pub rss: i64,
}

/// Splits a stat line into `(pid, comm, fields after comm)`.
///
/// The comm field can contain spaces and parentheses, so it spans from the
/// first `(` to the last `)` of the line.
fn split_proc_stat(content: &str) -> Result<(u32, &str, Vec<&str>), ParseError> {
    let content = content.trim();

    let open_paren = content
        .find('(')
        .ok_or_else(|| ParseError::new("missing '(' in stat"))?;
    let close_paren = content
        .rfind(')')
        .ok_or_else(|| ParseError::new("missing ')' in stat"))?;

    if close_paren <= open_paren {
        return Err(ParseError::new("invalid parentheses in stat"));
    }

    let pid = content[..open_paren]
        .trim()
        .parse()
        .map_err(|_| ParseError::new("invalid pid"))?;
    let comm = &content[open_paren + 1..close_paren];
    let fields: Vec<&str> = content[close_paren + 1..].split_whitespace().collect();

    Ok((pid, comm, fields))
}

/// Parses `/proc/[pid]/stat` content.
///
/// Format: pid (comm) state ppid pgrp session tty_nr tpgid flags minflt ...
pub fn parse_proc_stat(content: &str) -> Result<ProcStat, ParseError> {
    let (pid, comm, fields) = split_proc_stat(content)?;

    if fields.len() < STAT_REQUIRED_FIELDS {
        return Err(ParseError::new(format!(
            "not enough fields in stat: expected {}+, got {}",
            STAT_REQUIRED_FIELDS,
            fields.len()
        )));
    }

    // `pos` is the 1-indexed field position after comm.
    let field = |pos: usize, name: &str| -> Result<u64, ParseError> {
        parse_u64(fields[pos - 1], name)
    };
    let signed_field = |pos: usize, name: &str| -> Result<i64, ParseError> {
        fields[pos - 1]
            .parse()
            .map_err(|_| ParseError::new(format!("invalid {}: {:?}", name, fields[pos - 1])))
    };

    let state = fields[0]
        .chars()
        .next()
        .ok_or_else(|| ParseError::new("empty state"))?;

    Ok(ProcStat {
        pid,
        comm: comm.to_string(),
        state,
        ppid: fields[1]
            .parse()
            .map_err(|_| ParseError::new(format!("invalid ppid: {:?}", fields[1])))?,
        minflt: field(8, "minflt")?,
        majflt: field(10, "majflt")?,
        utime: field(12, "utime")?,
        stime: field(13, "stime")?,
        num_threads: signed_field(18, "num_threads")?.max(0) as u32,
        starttime: field(20, "starttime")?,
        vsize: field(21, "vsize")?,
        rss: signed_field(22, "rss")?,
    })
}

/// Extracts only the start time (field 20) from `/proc/[pid]/stat`.
pub fn parse_proc_stat_starttime(content: &str) -> Result<u64, ParseError> {
    let (_, _, fields) = split_proc_stat(content)?;
    let value = fields
        .get(19)
        .ok_or_else(|| ParseError::new(format!("missing starttime, got {} fields", fields.len())))?;
    parse_u64(value, "starttime")
}

// ============ /proc/[pid]/io ============

/// Parsed data from `/proc/[pid]/io`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcIo {
    pub rchar: u64,
    pub wchar: u64,
    pub read_bytes: u64,
    pub write_bytes: u64,
}

/// Parses `/proc/[pid]/io` content.
///
/// Format is key: value pairs, one per line. `rchar`, `wchar`, `read_bytes`
/// and `write_bytes` must be present; other keys are ignored.
pub fn parse_proc_io(content: &str) -> Result<ProcIo, ParseError> {
    let mut rchar = None;
    let mut wchar = None;
    let mut read_bytes = None;
    let mut write_bytes = None;

    for line in content.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let slot = match key.trim() {
            "rchar" => &mut rchar,
            "wchar" => &mut wchar,
            "read_bytes" => &mut read_bytes,
            "write_bytes" => &mut write_bytes,
            _ => continue,
        };
        *slot = Some(parse_u64(value.trim(), key.trim())?);
    }

    let require = |value: Option<u64>, key: &str| {
        value.ok_or_else(|| ParseError::new(format!("missing {} in io", key)))
    };

    Ok(ProcIo {
        rchar: require(rchar, "rchar")?,
        wchar: require(wchar, "wchar")?,
        read_bytes: require(read_bytes, "read_bytes")?,
        write_bytes: require(write_bytes, "write_bytes")?,
    })
}

// ============ /proc/meminfo ============

/// Parsed data from `/proc/meminfo`, in kB as the kernel reports it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemInfo {
    pub mem_total: u64,
    pub mem_free: u64,
    pub mem_available: u64,
    pub buffers: u64,
    pub cached: u64,
    pub swap_cached: u64,
    pub active: u64,
    pub inactive: u64,
}

const MEMINFO_KEYS: [&str; 8] = [
    "MemTotal",
    "MemFree",
    "MemAvailable",
    "Buffers",
    "Cached",
    "SwapCached",
    "Active",
    "Inactive",
];

/// Parses `/proc/meminfo` content.
///
/// Format: `Key:   value kB`. Keys are matched exactly, so `Active(anon)`
/// never shadows `Active`. All keys of [`MemInfo`] are required.
pub fn parse_meminfo(content: &str) -> Result<MemInfo, ParseError> {
    let mut values: [Option<u64>; MEMINFO_KEYS.len()] = [None; MEMINFO_KEYS.len()];

    for line in content.lines() {
        let Some((key, rest)) = line.split_once(':') else {
            continue;
        };
        let Some(idx) = MEMINFO_KEYS.iter().position(|k| *k == key.trim()) else {
            continue;
        };

        let mut parts = rest.split_whitespace();
        let value = parts
            .next()
            .ok_or_else(|| ParseError::new(format!("missing value for {}", key)))?;
        match parts.next() {
            None | Some("kB") => {}
            Some(unit) => {
                return Err(ParseError::new(format!(
                    "unexpected unit {:?} for {}",
                    unit, key
                )));
            }
        }
        values[idx] = Some(parse_u64(value, key)?);
    }

    let get = |idx: usize| {
        values[idx]
            .ok_or_else(|| ParseError::new(format!("missing {} in meminfo", MEMINFO_KEYS[idx])))
    };

    Ok(MemInfo {
        mem_total: get(0)?,
        mem_free: get(1)?,
        mem_available: get(2)?,
        buffers: get(3)?,
        cached: get(4)?,
        swap_cached: get(5)?,
        active: get(6)?,
        inactive: get(7)?,
    })
}

// ============ /proc/stat ============

/// Aggregate CPU times from the `cpu` line of `/proc/stat`, in clock ticks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CpuStat {
    pub user: u64,
    pub nice: u64,
    pub system: u64,
    pub idle: u64,
    pub iowait: u64,
    pub irq: u64,
    pub softirq: u64,
    pub steal: u64,
}

/// Parses the aggregate `cpu` line of `/proc/stat` content.
///
/// Per-CPU lines (`cpu0`, `cpu1`, ...) and all other lines are skipped.
/// `steal` is optional since kernels before 2.6.11 do not report it.
pub fn parse_cpu_stat(content: &str) -> Result<CpuStat, ParseError> {
    let line = content
        .lines()
        .find(|line| line.split_whitespace().next() == Some("cpu"))
        .ok_or_else(|| ParseError::new("missing cpu line in stat"))?;

    let values = line
        .split_whitespace()
        .skip(1)
        .map(|v| parse_u64(v, "cpu time"))
        .collect::<Result<Vec<u64>, _>>()?;

    if values.len() < 7 {
        return Err(ParseError::new(format!(
            "not enough cpu fields: expected 7+, got {}",
            values.len()
        )));
    }

    Ok(CpuStat {
        user: values[0],
        nice: values[1],
        system: values[2],
        idle: values[3],
        iowait: values[4],
        irq: values[5],
        softirq: values[6],
        steal: values.get(7).copied().unwrap_or(0),
    })
}

// ============ /proc/[pid]/net/dev ============

/// Name of the loopback interface.
pub const LOOPBACK_INTERFACE: &str = "lo";

/// Whether loopback traffic counts towards a process's network totals.
///
/// Loopback traffic never leaves the host, so by default it is excluded
/// from cross-process network telemetry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LoopbackPolicy {
    /// Skip the `lo` interface when summing.
    #[default]
    Exclude,
    /// Sum every interface, `lo` included.
    Include,
}

impl LoopbackPolicy {
    /// Returns `true` if the interface contributes to the sum.
    pub fn counts(&self, interface: &str) -> bool {
        match self {
            LoopbackPolicy::Exclude => interface != LOOPBACK_INTERFACE,
            LoopbackPolicy::Include => true,
        }
    }
}

/// Network device statistics from `/proc/[pid]/net/dev`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NetDevStats {
    /// Interface name
    pub interface: String,
    /// Bytes received
    pub rx_bytes: u64,
    /// Packets received
    pub rx_packets: u64,
    /// Receive errors
    pub rx_errs: u64,
    /// Receive drops
    pub rx_drop: u64,
    /// Bytes transmitted
    pub tx_bytes: u64,
    /// Packets transmitted
    pub tx_packets: u64,
    /// Transmit errors
    pub tx_errs: u64,
    /// Transmit drops
    pub tx_drop: u64,
}

/// Number of header lines before the per-interface rows.
const NET_DEV_HEADER_LINES: usize = 2;
/// Number of counters on each interface row.
const NET_DEV_COUNTERS: usize = 16;

/// Parses `/proc/[pid]/net/dev` content.
///
/// Format:
/// Inter-|   Receive                                                |  Transmit
///  face |bytes    packets errs drop fifo frame compressed multicast|bytes    packets errs drop fifo colls carrier compressed
///    lo: 1234567     1234    0    0    0     0          0         0  1234567     1234    0    0    0     0       0          0
pub fn parse_net_dev(content: &str) -> Result<Vec<NetDevStats>, ParseError> {
    let mut lines = content.lines();
    for _ in 0..NET_DEV_HEADER_LINES {
        lines
            .next()
            .ok_or_else(|| ParseError::new("missing net/dev header"))?;
    }

    let mut devices = Vec::new();

    for line in lines {
        if line.trim().is_empty() {
            continue;
        }

        // Large counters can run into the colon ("eth0:123"), so split on it
        // rather than on whitespace.
        let (interface, counters) = line
            .split_once(':')
            .ok_or_else(|| ParseError::new(format!("missing ':' in net/dev line {:?}", line)))?;

        let values = counters
            .split_whitespace()
            .map(|v| parse_u64(v, "net/dev counter"))
            .collect::<Result<Vec<u64>, _>>()?;
        if values.len() < NET_DEV_COUNTERS {
            return Err(ParseError::new(format!(
                "not enough counters for {}: expected {}, got {}",
                interface.trim(),
                NET_DEV_COUNTERS,
                values.len()
            )));
        }

        devices.push(NetDevStats {
            interface: interface.trim().to_string(),
            rx_bytes: values[0],
            rx_packets: values[1],
            rx_errs: values[2],
            rx_drop: values[3],
            tx_bytes: values[8],
            tx_packets: values[9],
            tx_errs: values[10],
            tx_drop: values[11],
        });
    }

    Ok(devices)
}

/// Sums per-interface counters, honoring the loopback policy.
///
/// Fails if a total does not fit in `u64`.
pub fn sum_net_dev(
    devices: &[NetDevStats],
    policy: LoopbackPolicy,
) -> Result<NetworkStats, ParseError> {
    let mut acc = NetworkStats::default();
    for dev in devices.iter().filter(|dev| policy.counts(&dev.interface)) {
        acc.rx_bytes = checked_sum(acc.rx_bytes, dev.rx_bytes, "rx_bytes")?;
        acc.rx_packets = checked_sum(acc.rx_packets, dev.rx_packets, "rx_packets")?;
        acc.rx_errs = checked_sum(acc.rx_errs, dev.rx_errs, "rx_errs")?;
        acc.rx_drops = checked_sum(acc.rx_drops, dev.rx_drop, "rx_drop")?;
        acc.tx_bytes = checked_sum(acc.tx_bytes, dev.tx_bytes, "tx_bytes")?;
        acc.tx_packets = checked_sum(acc.tx_packets, dev.tx_packets, "tx_packets")?;
        acc.tx_errs = checked_sum(acc.tx_errs, dev.tx_errs, "tx_errs")?;
        acc.tx_drops = checked_sum(acc.tx_drops, dev.tx_drop, "tx_drop")?;
    }
    Ok(acc)
}

// ============ /proc/[pid]/cmdline ============

/// Parses `/proc/[pid]/cmdline` content.
///
/// Arguments are NUL-separated with a trailing NUL. Trailing NULs are
/// dropped and the remaining separators become single spaces; argument
/// bytes are kept as-is (invalid UTF-8 is replaced).
pub fn parse_cmdline(content: &[u8]) -> String {
    let end = content
        .iter()
        .rposition(|&b| b != 0)
        .map_or(0, |pos| pos + 1);
    String::from_utf8_lossy(&content[..end]).replace('\0', " ")
}

// ============ /proc/[pid]/status ============

fn status_field<'a>(content: &'a str, key: &str) -> Option<&'a str> {
    content.lines().find_map(|line| {
        let (k, v) = line.split_once(':')?;
        (k == key).then_some(v.trim())
    })
}

/// Parses the `Uid:` line of `/proc/[pid]/status`.
///
/// Format: `Uid:\treal\teffective\tsaved\tfilesystem`
pub fn parse_status_uids(content: &str) -> Result<Uids, ParseError> {
    let line = status_field(content, "Uid").ok_or_else(|| ParseError::new("missing Uid"))?;
    let ids = line
        .split_whitespace()
        .map(|v| {
            v.parse::<u32>()
                .map_err(|_| ParseError::new(format!("invalid uid: {:?}", v)))
        })
        .collect::<Result<Vec<u32>, _>>()?;

    if ids.len() < 4 {
        return Err(ParseError::new(format!(
            "expected 4 uids, got {}",
            ids.len()
        )));
    }

    Ok(Uids {
        real: ids[0],
        effective: ids[1],
        saved: ids[2],
        filesystem: ids[3],
    })
}

/// Parses the `NSpid:` line of `/proc/[pid]/status`.
///
/// Returns the pid as seen from each nested pid namespace, outermost first.
/// `None` if the kernel does not report namespace pids (before 4.1).
pub fn parse_status_ns_pids(content: &str) -> Result<Option<Vec<u32>>, ParseError> {
    let Some(line) = status_field(content, "NSpid") else {
        return Ok(None);
    };
    let pids = line
        .split_whitespace()
        .map(|v| {
            v.parse::<u32>()
                .map_err(|_| ParseError::new(format!("invalid NSpid: {:?}", v)))
        })
        .collect::<Result<Vec<u32>, _>>()?;

    if pids.is_empty() {
        return Err(ParseError::new("empty NSpid"));
    }
    Ok(Some(pids))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::mock::{SAMPLE_MEMINFO, SAMPLE_NET_DEV, SAMPLE_STAT};

    #[test]
    fn test_parse_proc_stat_basic() {
        let content = "1234 (bash) S 1233 1234 1234 34816 1235 4194304 5000 50000 10 20 100 50 200 100 20 0 1 0 100000 25000000 2000 18446744073709551615 0 0 0 0 0 0 65536 3670020 1266777851 0 0 0 17 2 0 0 5 0 0 0 0 0 0 0 0 0 0";
        let stat = parse_proc_stat(content).unwrap();

        assert_eq!(stat.pid, 1234);
        assert_eq!(stat.comm, "bash");
        assert_eq!(stat.state, 'S');
        assert_eq!(stat.ppid, 1233);
        assert_eq!(stat.minflt, 5000);
        assert_eq!(stat.majflt, 10);
        assert_eq!(stat.utime, 100);
        assert_eq!(stat.stime, 50);
        assert_eq!(stat.num_threads, 1);
        assert_eq!(stat.starttime, 100000);
        assert_eq!(stat.vsize, 25000000);
        assert_eq!(stat.rss, 2000);
    }

    #[test]
    fn test_parse_proc_stat_with_spaces_in_comm() {
        let content = "5000 (Web Content) S 4999 5000 4999 0 -1 4194304 100000 0 500 0 5000 1000 0 0 20 0 20 0 500000 2000000000 50000 18446744073709551615 0 0 0 0 0 0 0 0 0 0 0 0 17 0 0 0 0 0 0 0 0 0 0 0 0 0 0";
        let stat = parse_proc_stat(content).unwrap();

        assert_eq!(stat.pid, 5000);
        assert_eq!(stat.comm, "Web Content");
        assert_eq!(stat.state, 'S');
        assert_eq!(stat.ppid, 4999);
        assert_eq!(stat.num_threads, 20);
    }

    #[test]
    fn test_parse_proc_stat_with_close_paren_in_comm() {
        let content = "5001 (a) b) R 1 5001 5001 0 -1 4194304 42 0 1 0 10 5 0 0 20 0 2 0 500100 10000000 1000 18446744073709551615";
        let stat = parse_proc_stat(content).unwrap();

        assert_eq!(stat.comm, "a) b");
        assert_eq!(stat.state, 'R');
        assert_eq!(stat.ppid, 1);
        assert_eq!(stat.minflt, 42);
        assert_eq!(stat.majflt, 1);
        assert_eq!(stat.starttime, 500100);
    }

    #[test]
    fn test_parse_proc_stat_with_parentheses_in_comm() {
        let content = "5002 (test(1)) S 1 5002 5002 0 -1 4194304 1000 0 0 0 10 5 0 0 20 0 1 0 500100 10000000 1000 18446744073709551615 0 0 0 0 0 0 0 0 0 0 0 0 17 0 0 0 0 0 0 0 0 0 0 0 0 0 0";
        let stat = parse_proc_stat(content).unwrap();

        assert_eq!(stat.pid, 5002);
        assert_eq!(stat.comm, "test(1)");
    }

    #[test]
    fn test_parse_proc_stat_zombie() {
        let content = "4000 (defunct) Z 1000 4000 1000 0 -1 4194308 0 0 0 0 0 0 0 0 20 0 1 0 400000 0 0 18446744073709551615 0 0 0 0 0 0 0 0 0 0 0 0 -1 0 0 0 0 0 0 0 0 0 0 0 0 0 0";
        let stat = parse_proc_stat(content).unwrap();

        assert_eq!(stat.pid, 4000);
        assert_eq!(stat.state, 'Z');
        assert_eq!(stat.vsize, 0);
        assert_eq!(stat.rss, 0);
    }

    #[test]
    fn test_parse_proc_stat_truncated() {
        let err = parse_proc_stat("777 (legacy) S 1 777 777 0 -1 4194304 10 0 0 0 1 1").unwrap_err();
        assert!(err.message.contains("not enough fields"));
    }

    #[test]
    fn test_parse_proc_stat_garbage() {
        assert!(parse_proc_stat("").is_err());
        assert!(parse_proc_stat("123 bash S 1").is_err());
        assert!(parse_proc_stat("123 )bash( S 1").is_err());
        assert!(parse_proc_stat("x (bash) S 1 2 3 4 5 6 7 8 9 10 11 12 13 14 15 16 17 18 19 20 21").is_err());
    }

    #[test]
    fn test_parse_proc_stat_non_numeric_field() {
        let content = "1 (init) S 0 1 1 0 -1 4194560 abc 0 0 0 1 1 0 0 20 0 1 0 1 1000 10";
        let err = parse_proc_stat(content).unwrap_err();
        assert!(err.message.contains("minflt"));
    }

    #[test]
    fn test_parse_proc_stat_ppid_out_of_range() {
        let content = "1 (init) S 4294967296 1 1 0 -1 4194560 0 0 0 0 1 1 0 0 20 0 1 0 1 1000 10";
        let err = parse_proc_stat(content).unwrap_err();
        assert!(err.message.contains("ppid"));
    }

    #[test]
    fn test_parse_proc_stat_starttime() {
        let content = "123 (ibazel) S 1 123 123 0 -1 1077936384 1799 6520 55 0 8 23 3 11 20 0 13 0 14329 114384896 2577";
        assert_eq!(parse_proc_stat_starttime(content).unwrap(), 14329);
        assert!(parse_proc_stat_starttime("123 (ibazel) S 1 123").is_err());
    }

    #[test]
    fn test_ticks_to_ns() {
        assert_eq!(ticks_to_ns(8, 10_000_000).unwrap(), 800);
        assert_eq!(ticks_to_ns(1, 100).unwrap(), 10_000_000);
        assert_eq!(ticks_to_ns(0, 100).unwrap(), 0);
        // Would overflow u64 if multiplied first in 64 bits.
        assert_eq!(
            ticks_to_ns(100_000_000_000, 100).unwrap(),
            1_000_000_000_000_000_000
        );
    }

    #[test]
    fn test_ticks_to_ns_overflow() {
        assert!(ticks_to_ns(u64::MAX, 100).is_err());
        // Sub-nanosecond ticks shrink the value, so the maximum still fits.
        assert_eq!(ticks_to_ns(u64::MAX, 2_000_000_000).unwrap(), u64::MAX / 2);
    }

    #[test]
    fn test_kb_to_bytes() {
        assert_eq!(kb_to_bytes(65652452).unwrap(), 67228110848);
        assert!(kb_to_bytes(u64::MAX).is_err());
        assert!(kb_to_bytes(u64::MAX / 1024 + 1).is_err());
        assert_eq!(kb_to_bytes(u64::MAX / 1024).unwrap(), u64::MAX / 1024 * 1024);
    }

    #[test]
    fn test_checked_sum() {
        assert_eq!(checked_sum(2400, 87, "user").unwrap(), 2487);
        let err = checked_sum(u64::MAX, 1, "user").unwrap_err();
        assert!(err.message.contains("user"));
    }

    #[test]
    fn test_parse_proc_io() {
        let content = "\
rchar: 1000000
wchar: 500000
syscr: 5000
syscw: 2500
read_bytes: 100000
write_bytes: 50000
cancelled_write_bytes: 1000
";
        let io = parse_proc_io(content).unwrap();

        assert_eq!(io.rchar, 1000000);
        assert_eq!(io.wchar, 500000);
        assert_eq!(io.read_bytes, 100000);
        assert_eq!(io.write_bytes, 50000);
    }

    #[test]
    fn test_parse_proc_io_missing_key() {
        let err = parse_proc_io("rchar: 100\nwchar: 50\nwrite_bytes: 0\n").unwrap_err();
        assert!(err.message.contains("read_bytes"));
    }

    #[test]
    fn test_parse_proc_io_invalid_value() {
        let err =
            parse_proc_io("rchar: 1\nwchar: x\nread_bytes: 0\nwrite_bytes: 0\n").unwrap_err();
        assert!(err.message.contains("wchar"));
    }

    #[test]
    fn test_parse_meminfo() {
        let info = parse_meminfo(SAMPLE_MEMINFO).unwrap();

        assert_eq!(info.mem_total, 65652452);
        assert_eq!(info.mem_free, 17221344);
        assert_eq!(info.mem_available, 50742364);
        assert_eq!(info.buffers, 6498668);
        assert_eq!(info.cached, 24950648);
        assert_eq!(info.swap_cached, 24);
        // Exact key match: not Active(anon) / Inactive(file).
        assert_eq!(info.active, 27723168);
        assert_eq!(info.inactive, 15365816);
    }

    #[test]
    fn test_parse_meminfo_missing_key() {
        let content = SAMPLE_MEMINFO.replace("MemAvailable:   50742364 kB\n", "");
        let err = parse_meminfo(&content).unwrap_err();
        assert!(err.message.contains("MemAvailable"));
    }

    #[test]
    fn test_parse_meminfo_bad_unit() {
        let content = SAMPLE_MEMINFO.replace("MemFree:        17221344 kB", "MemFree: 17221344 MB");
        let err = parse_meminfo(&content).unwrap_err();
        assert!(err.message.contains("unit"));
    }

    #[test]
    fn test_parse_cpu_stat() {
        let cpu = parse_cpu_stat(SAMPLE_STAT).unwrap();

        assert_eq!(cpu.user, 2400);
        assert_eq!(cpu.nice, 87);
        assert_eq!(cpu.system, 600);
        assert_eq!(cpu.idle, 100000);
        assert_eq!(cpu.iowait, 50);
        assert_eq!(cpu.irq, 100);
        assert_eq!(cpu.softirq, 83);
        assert_eq!(cpu.steal, 0);
    }

    #[test]
    fn test_parse_cpu_stat_skips_per_cpu_lines() {
        let content = "cpu0 1 2 3 4 5 6 7 8\ncpu  10 20 30 40 50 60 70\n";
        let cpu = parse_cpu_stat(content).unwrap();
        assert_eq!(cpu.user, 10);
        assert_eq!(cpu.steal, 0);
    }

    #[test]
    fn test_parse_cpu_stat_errors() {
        assert!(parse_cpu_stat("intr 1 2\nctxt 3\n").is_err());
        assert!(parse_cpu_stat("cpu 1 2 3\n").is_err());
        assert!(parse_cpu_stat("cpu 1 2 3 4 5 6 x\n").is_err());
    }

    #[test]
    fn test_parse_net_dev() {
        let devices = parse_net_dev(SAMPLE_NET_DEV).unwrap();

        assert_eq!(devices.len(), 3);

        assert_eq!(devices[0].interface, "lo");
        assert_eq!(devices[0].rx_bytes, 123456);
        assert_eq!(devices[0].rx_packets, 1234);

        assert_eq!(devices[1].interface, "eth0");
        assert_eq!(devices[1].rx_bytes, 54000000);
        assert_eq!(devices[1].tx_bytes, 4000000);
        assert_eq!(devices[1].tx_packets, 39000);
    }

    #[test]
    fn test_parse_net_dev_errors_and_drops() {
        let content = "\
Inter-|   Receive                                                |  Transmit
 face |bytes    packets errs drop fifo frame compressed multicast|bytes    packets errs drop fifo colls carrier compressed
  eth0:9876543     5678    1    2    0     0          0        10 87654321     4321    3    4    0     0       0          0
";
        let devices = parse_net_dev(content).unwrap();

        assert_eq!(devices.len(), 1);
        assert_eq!(devices[0].interface, "eth0");
        assert_eq!(devices[0].rx_bytes, 9876543);
        assert_eq!(devices[0].rx_errs, 1);
        assert_eq!(devices[0].rx_drop, 2);
        assert_eq!(devices[0].tx_bytes, 87654321);
        assert_eq!(devices[0].tx_errs, 3);
        assert_eq!(devices[0].tx_drop, 4);
    }

    #[test]
    fn test_parse_net_dev_malformed() {
        let header = "Inter-| Receive | Transmit\n face |bytes|bytes\n";
        assert!(parse_net_dev("Inter-| Receive | Transmit\n").is_err());
        assert!(parse_net_dev(&format!("{header}  eth0 1 2 3\n")).is_err());
        assert!(parse_net_dev(&format!("{header}  eth0: 1 2 3\n")).is_err());
        assert!(
            parse_net_dev(&format!("{header}  eth0: 1 2 3 4 5 6 7 8 9 10 11 12 13 14 15 x\n"))
                .is_err()
        );
        // Header only: a namespace with no interfaces.
        assert!(parse_net_dev(header).unwrap().is_empty());
    }

    #[test]
    fn test_sum_net_dev_excludes_loopback() {
        let devices = parse_net_dev(SAMPLE_NET_DEV).unwrap();
        let sum = sum_net_dev(&devices, LoopbackPolicy::Exclude).unwrap();

        assert_eq!(sum.rx_bytes, 54504114);
        assert_eq!(sum.rx_packets, 65296);
        assert_eq!(sum.tx_bytes, 4258632);
        assert_eq!(sum.tx_packets, 39739);
    }

    #[test]
    fn test_sum_net_dev_includes_loopback() {
        let devices = parse_net_dev(SAMPLE_NET_DEV).unwrap();
        let sum = sum_net_dev(&devices, LoopbackPolicy::Include).unwrap();

        assert_eq!(sum.rx_bytes, 54504114 + 123456);
        assert_eq!(sum.rx_packets, 65296 + 1234);
        assert_eq!(sum.tx_bytes, 4258632 + 123456);
        assert_eq!(sum.tx_packets, 39739 + 1234);
    }

    #[test]
    fn test_sum_net_dev_overflow() {
        let devices = vec![
            NetDevStats {
                interface: "eth0".to_string(),
                rx_bytes: u64::MAX,
                ..Default::default()
            },
            NetDevStats {
                interface: "eth1".to_string(),
                rx_bytes: 1,
                ..Default::default()
            },
        ];
        let err = sum_net_dev(&devices, LoopbackPolicy::Exclude).unwrap_err();
        assert!(err.message.contains("rx_bytes"));

        // The loopback row is not summed, so it cannot overflow the total.
        let devices = vec![
            NetDevStats {
                interface: "lo".to_string(),
                rx_bytes: u64::MAX,
                ..Default::default()
            },
            NetDevStats {
                interface: "eth0".to_string(),
                rx_bytes: 1,
                ..Default::default()
            },
        ];
        assert_eq!(
            sum_net_dev(&devices, LoopbackPolicy::Exclude).unwrap().rx_bytes,
            1
        );
    }

    #[test]
    fn test_loopback_policy_matches_exact_name() {
        let policy = LoopbackPolicy::default();
        assert!(!policy.counts("lo"));
        assert!(policy.counts("lo0"));
        assert!(policy.counts("eth0"));
        assert!(LoopbackPolicy::Include.counts("lo"));
    }

    #[test]
    fn test_parse_cmdline() {
        assert_eq!(
            parse_cmdline(b"/usr/lib/slack/slack\0--force-device-scale-factor=1.5\0--high-dpi-support=1\0"),
            "/usr/lib/slack/slack --force-device-scale-factor=1.5 --high-dpi-support=1"
        );
        // Trailing NUL padding
        assert_eq!(
            parse_cmdline(b"/usr/bin/registryd\0--use-gnome-session\0\0\0"),
            "/usr/bin/registryd --use-gnome-session"
        );
        // Spaces inside one argument are kept
        assert_eq!(parse_cmdline(b"sh\0-c\0echo a  b\0"), "sh -c echo a  b");
        // No trailing NUL (rewritten by setproctitle)
        assert_eq!(parse_cmdline(b"postgres: checkpointer"), "postgres: checkpointer");
    }

    #[test]
    fn test_parse_cmdline_empty() {
        assert_eq!(parse_cmdline(b""), "");
        assert_eq!(parse_cmdline(b"\0"), "");
    }

    #[test]
    fn test_parse_status_uids() {
        let content = "Name:\tbash\nUid:\t1000\t1001\t1002\t1003\nGid:\t1\t1\t1\t1\n";
        let uids = parse_status_uids(content).unwrap();
        assert_eq!(
            uids,
            Uids {
                real: 1000,
                effective: 1001,
                saved: 1002,
                filesystem: 1003,
            }
        );

        assert!(parse_status_uids("Name:\tbash\n").is_err());
        assert!(parse_status_uids("Uid:\t1000\t1000\n").is_err());
    }

    #[test]
    fn test_parse_status_ns_pids() {
        let content = "Pid:\t123\nNStgid:\t123\t7\nNSpid:\t123\t7\n";
        assert_eq!(parse_status_ns_pids(content).unwrap(), Some(vec![123, 7]));
        assert_eq!(parse_status_ns_pids("Pid:\t1\n").unwrap(), None);
        assert!(parse_status_ns_pids("NSpid:\t\n").is_err());
    }
}
