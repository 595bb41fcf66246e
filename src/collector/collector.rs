//! Sampling loop building block that applies the error policy of the parsers.
//!
//! The `Collector` turns a list of PIDs into a `Snapshot`. Which PIDs to
//! sample and how often is up to the caller. Each call reads fresh data; the
//! only state kept between calls is which format errors were already reported.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::collector::procfs::ProcParser;
use crate::collector::traits::FileSystem;
use crate::config::SystemConfig;
use crate::error::{ProcError, ProcFile};
use crate::models::{NetworkStats, ProcessStats, SystemStats};

/// Timing information for each collector phase.
///
/// Used for debugging and performance monitoring.
#[derive(Debug, Clone, Default)]
pub struct CollectorTiming {
    /// Total snapshot collection time.
    pub total: Duration,
    /// Time to collect `/proc/stat` and `/proc/meminfo`.
    pub system: Duration,
    /// Time to collect all requested processes.
    pub processes: Duration,
}

/// Everything read for one process in one sampling round.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct ProcessSample {
    pub pid: u32,
    /// Clock ticks since boot; together with `pid` identifies the process.
    pub start_time_ticks: u64,
    pub cmdline: String,
    pub stats: ProcessStats,
    /// `None` if the network namespace of the process could not be read.
    pub network: Option<NetworkStats>,
}

/// Result of one sampling round.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Snapshot {
    /// Unix timestamp (seconds) at the start of the round.
    pub timestamp: i64,
    /// `None` if the host-wide files could not be parsed.
    pub system: Option<SystemStats>,
    /// Processes that were alive for the whole round, in request order.
    pub processes: Vec<ProcessSample>,
}

/// Collects host and per-process samples through a [`ProcParser`].
///
/// Failure handling:
/// - a process that vanishes is skipped and logged at debug level,
/// - a format error is logged as a warning once per file family, then at debug level,
/// - unreadable optional files (`io` of another user, `net/dev`) leave their fields empty.
pub struct Collector<F: FileSystem, C: SystemConfig> {
    parser: ProcParser<F, C>,
    warned: HashSet<ProcFile>,
    /// Timing information from the last collect_snapshot call.
    last_timing: Option<CollectorTiming>,
}

impl<F: FileSystem, C: SystemConfig> Collector<F, C> {
    pub fn new(parser: ProcParser<F, C>) -> Self {
        Self {
            parser,
            warned: HashSet::new(),
            last_timing: None,
        }
    }

    pub fn parser(&self) -> &ProcParser<F, C> {
        &self.parser
    }

    /// Returns timing information from the last collect_snapshot call.
    pub fn last_timing(&self) -> Option<&CollectorTiming> {
        self.last_timing.as_ref()
    }

    /// Returns the file families that already produced a format warning.
    pub fn warned_files(&self) -> &HashSet<ProcFile> {
        &self.warned
    }

    /// Samples the host and every PID in `pids`.
    ///
    /// PIDs that cannot be sampled are left out of the snapshot.
    pub fn collect_snapshot(&mut self, pids: &[u32]) -> Snapshot {
        let total_start = Instant::now();
        let mut timing = CollectorTiming::default();
        let timestamp = Utc::now().timestamp();

        let start = Instant::now();
        let system = self.collect_system();
        timing.system = start.elapsed();

        let start = Instant::now();
        let mut processes = Vec::with_capacity(pids.len());
        for &pid in pids {
            match self.collect_process(pid) {
                Ok(sample) => processes.push(sample),
                Err(e) => self.report(pid, &e),
            }
        }
        timing.processes = start.elapsed();

        timing.total = total_start.elapsed();
        debug!(
            pids = pids.len(),
            sampled = processes.len(),
            total_us = timing.total.as_micros() as u64,
            "snapshot collected"
        );
        self.last_timing = Some(timing);

        Snapshot {
            timestamp,
            system,
            processes,
        }
    }

    /// Reads host-wide CPU and memory counters.
    pub fn collect_system(&mut self) -> Option<SystemStats> {
        let mut stats = SystemStats::default();
        let result = self
            .parser
            .parse_proc_stat(&mut stats)
            .and_then(|_| self.parser.parse_proc_meminfo(&mut stats));

        match result {
            Ok(()) => Some(stats),
            Err(e) => {
                self.report(0, &e);
                None
            }
        }
    }

    /// Reads everything for one process.
    ///
    /// Fails if the process is gone or its `stat` is unreadable; problems with
    /// `io` and `net/dev` only leave the corresponding fields empty.
    pub fn collect_process(&mut self, pid: u32) -> Result<ProcessSample, ProcError> {
        let mut stats = ProcessStats::default();
        let start_time_ticks = self
            .parser
            .parse_proc_pid_stat_with_start_time(pid, &mut stats)?;

        // Kernels without task I/O accounting have no io file at all.
        if let Err(e) = self.parser.parse_proc_pid_stat_io(pid, &mut stats) {
            self.report(pid, &e);
        }

        let mut network = NetworkStats::default();
        let network = match self.parser.parse_proc_pid_net_dev(pid, &mut network) {
            Ok(()) => Some(network),
            Err(e) => {
                self.report(pid, &e);
                None
            }
        };

        // Fails if the process exited while we were reading the optional files.
        let cmdline = self.parser.get_pid_cmdline(pid)?;

        Ok(ProcessSample {
            pid,
            start_time_ticks,
            cmdline,
            stats,
            network,
        })
    }

    fn report(&mut self, pid: u32, err: &ProcError) {
        match err {
            ProcError::NotFound { .. } => {
                debug!(pid, error = %err, "not found during sampling");
            }
            ProcError::Format { file, .. } => {
                if self.warned.insert(*file) {
                    warn!(
                        pid,
                        error = %err,
                        "unexpected {} layout; repeats are logged at debug level",
                        file
                    );
                } else {
                    debug!(pid, error = %err, "format error");
                }
            }
            ProcError::Io { .. } | ProcError::Config(_) => {
                debug!(pid, error = %err, "read failed");
            }
        }
    }
}
