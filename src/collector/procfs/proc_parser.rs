//! Typed, unit-normalized access to `/proc` files.

use std::path::{Path, PathBuf};

use tracing::trace;

use crate::collector::procfs::parser::{
    LoopbackPolicy, ParseError, checked_sum, kb_to_bytes, parse_cmdline, parse_cpu_stat,
    parse_meminfo, parse_net_dev, parse_proc_io, parse_proc_stat, parse_proc_stat_starttime,
    parse_status_ns_pids, parse_status_uids, sum_net_dev, ticks_to_ns,
};
use crate::collector::procfs::paths::ProcPaths;
use crate::collector::traits::FileSystem;
use crate::config::SystemConfig;
use crate::error::{ProcError, ProcFile};
use crate::models::{NetworkStats, ProcessStats, SystemStats, Uids};

/// Reads and parses `/proc` files for a single process or the whole host.
///
/// Every operation is a synchronous, read-only function of the file content
/// and the config. Nothing is cached between calls, so a shared `&ProcParser`
/// can be used from many threads at once.
///
/// Record operations take an output record and write only the fields that
/// their file provides; on error the record may be partially written.
pub struct ProcParser<F: FileSystem, C: SystemConfig> {
    fs: F,
    config: C,
    paths: ProcPaths,
    loopback: LoopbackPolicy,
}

impl<F: FileSystem, C: SystemConfig> ProcParser<F, C> {
    /// Creates a parser over `fs` using the host constants in `config`.
    ///
    /// Fails with [`ProcError::Config`] if the config is not initialized or
    /// reports a zero page size or tick rate.
    pub fn new(fs: F, config: C) -> Result<Self, ProcError> {
        if !config.has_config() {
            return Err(ProcError::Config("system config is not initialized".into()));
        }
        if config.page_size() == 0 {
            return Err(ProcError::Config("page size is zero".into()));
        }
        if config.kernel_ticks_per_second() == 0 {
            return Err(ProcError::Config("kernel ticks per second is zero".into()));
        }

        let paths = ProcPaths::new(config.proc_path());
        Ok(Self {
            fs,
            config,
            paths,
            loopback: LoopbackPolicy::default(),
        })
    }

    /// Sets whether the `lo` interface counts towards network totals.
    pub fn with_loopback_policy(mut self, policy: LoopbackPolicy) -> Self {
        self.loopback = policy;
        self
    }

    pub fn loopback_policy(&self) -> LoopbackPolicy {
        self.loopback
    }

    pub fn config(&self) -> &C {
        &self.config
    }

    pub fn proc_path(&self) -> &Path {
        self.paths.root()
    }

    fn read_string(&self, path: &Path) -> Result<String, ProcError> {
        trace!(path = %path.display(), "reading");
        self.fs
            .read_to_string(path)
            .map_err(|e| ProcError::from_io(path, e))
    }

    fn read_first_line(&self, path: &Path) -> Result<String, ProcError> {
        trace!(path = %path.display(), "reading first line");
        self.fs
            .read_first_line(path)
            .map_err(|e| ProcError::from_io(path, e))
    }

    fn read_link(&self, path: &Path) -> Result<PathBuf, ProcError> {
        trace!(path = %path.display(), "reading link");
        self.fs
            .read_link(path)
            .map_err(|e| ProcError::from_io(path, e))
    }

    fn ticks_to_ns(&self, ticks: u64) -> Result<u64, ParseError> {
        ticks_to_ns(ticks, self.config.kernel_ticks_per_second())
    }

    /// Sums the network counters of `/proc/[pid]/net/dev` across interfaces.
    ///
    /// The `lo` interface is skipped unless the parser was built with
    /// [`LoopbackPolicy::Include`].
    pub fn parse_proc_pid_net_dev(
        &self,
        pid: u32,
        out: &mut NetworkStats,
    ) -> Result<(), ProcError> {
        let path = self.paths.pid_file(pid, "net/dev");
        let content = self.read_string(&path)?;
        let devices =
            parse_net_dev(&content).map_err(|e| ProcError::format(ProcFile::NetDev, &path, e))?;

        *out = sum_net_dev(&devices, self.loopback)
            .map_err(|e| ProcError::format(ProcFile::NetDev, &path, e))?;
        Ok(())
    }

    /// Fills the I/O fields of `out` from `/proc/[pid]/io`.
    pub fn parse_proc_pid_stat_io(
        &self,
        pid: u32,
        out: &mut ProcessStats,
    ) -> Result<(), ProcError> {
        let path = self.paths.pid_file(pid, "io");
        let content = self.read_string(&path)?;
        let io = parse_proc_io(&content).map_err(|e| ProcError::format(ProcFile::Io, &path, e))?;

        out.rchar_bytes = io.rchar;
        out.wchar_bytes = io.wchar;
        out.read_bytes = io.read_bytes;
        out.write_bytes = io.write_bytes;
        Ok(())
    }

    /// Fills name, CPU time, faults and memory of `out` from `/proc/[pid]/stat`.
    pub fn parse_proc_pid_stat(&self, pid: u32, out: &mut ProcessStats) -> Result<(), ProcError> {
        self.parse_proc_pid_stat_with_start_time(pid, out)?;
        Ok(())
    }

    /// Same as [`parse_proc_pid_stat`](Self::parse_proc_pid_stat), also
    /// returning the start time in ticks taken from the same read.
    ///
    /// Use this to pair stats with a process identity: two separate reads may
    /// see two different processes if the pid was reused in between.
    pub fn parse_proc_pid_stat_with_start_time(
        &self,
        pid: u32,
        out: &mut ProcessStats,
    ) -> Result<u64, ProcError> {
        let path = self.paths.pid_file(pid, "stat");
        let line = self.read_first_line(&path)?;
        let format_err = |e| ProcError::format(ProcFile::PidStat, &path, e);
        let stat = parse_proc_stat(&line).map_err(format_err)?;

        let rss_bytes = (stat.rss.max(0) as u64)
            .checked_mul(self.config.page_size())
            .ok_or_else(|| {
                format_err(ParseError::new(format!(
                    "rss of {} pages overflows bytes",
                    stat.rss
                )))
            })?;

        out.process_name = stat.comm;
        out.utime_ns = self.ticks_to_ns(stat.utime).map_err(format_err)?;
        out.ktime_ns = self.ticks_to_ns(stat.stime).map_err(format_err)?;
        out.num_threads = stat.num_threads;
        out.major_faults = stat.majflt;
        out.minor_faults = stat.minflt;
        out.vsize_bytes = stat.vsize;
        out.rss_bytes = rss_bytes;
        Ok(stat.starttime)
    }

    /// Fills the CPU fields of `out` from the aggregate line of `/proc/stat`.
    pub fn parse_proc_stat(&self, out: &mut SystemStats) -> Result<(), ProcError> {
        let path = self.paths.system_file("stat");
        let content = self.read_string(&path)?;
        let format_err = |e| ProcError::format(ProcFile::Stat, &path, e);
        let cpu = parse_cpu_stat(&content).map_err(format_err)?;

        let user = checked_sum(cpu.user, cpu.nice, "user + nice").map_err(format_err)?;
        let kernel = checked_sum(cpu.system, cpu.irq, "system + irq")
            .and_then(|ticks| checked_sum(ticks, cpu.softirq, "system + irq + softirq"))
            .map_err(format_err)?;

        out.cpu_utime_ns = self.ticks_to_ns(user).map_err(format_err)?;
        out.cpu_ktime_ns = self.ticks_to_ns(kernel).map_err(format_err)?;
        Ok(())
    }

    /// Fills the memory fields of `out` from `/proc/meminfo`.
    pub fn parse_proc_meminfo(&self, out: &mut SystemStats) -> Result<(), ProcError> {
        let path = self.paths.system_file("meminfo");
        let content = self.read_string(&path)?;
        let format_err = |e| ProcError::format(ProcFile::MemInfo, &path, e);
        let info = parse_meminfo(&content).map_err(format_err)?;

        out.mem_total_bytes = kb_to_bytes(info.mem_total).map_err(format_err)?;
        out.mem_free_bytes = kb_to_bytes(info.mem_free).map_err(format_err)?;
        out.mem_available_bytes = kb_to_bytes(info.mem_available).map_err(format_err)?;
        out.mem_buffer_bytes = kb_to_bytes(info.buffers).map_err(format_err)?;
        out.mem_cached_bytes = kb_to_bytes(info.cached).map_err(format_err)?;
        out.mem_swap_cached_bytes = kb_to_bytes(info.swap_cached).map_err(format_err)?;
        out.mem_active_bytes = kb_to_bytes(info.active).map_err(format_err)?;
        out.mem_inactive_bytes = kb_to_bytes(info.inactive).map_err(format_err)?;
        Ok(())
    }

    /// Returns the start time of the process in clock ticks since boot.
    ///
    /// A pid can be reused by the kernel; pid plus start time cannot.
    pub fn get_pid_start_time_ticks(&self, pid: u32) -> Result<u64, ProcError> {
        let path = self.paths.pid_file(pid, "stat");
        let line = self.read_first_line(&path)?;
        parse_proc_stat_starttime(&line).map_err(|e| ProcError::format(ProcFile::PidStat, &path, e))
    }

    /// Returns the wall-clock time the process started, in ns since the epoch.
    pub fn get_pid_start_time_realtime_ns(&self, pid: u32) -> Result<i64, ProcError> {
        let ticks = self.get_pid_start_time_ticks(pid)?;
        let out_of_range = || {
            ProcError::format(
                ProcFile::PidStat,
                &self.paths.pid_file(pid, "stat"),
                ParseError::new(format!("starttime {} out of range", ticks)),
            )
        };
        let since_boot = self
            .ticks_to_ns(ticks)
            .ok()
            .and_then(|ns| i64::try_from(ns).ok())
            .ok_or_else(out_of_range)?;
        since_boot
            .checked_add(self.config.clock_realtime_offset())
            .ok_or_else(out_of_range)
    }

    /// Returns the command line with arguments joined by single spaces.
    ///
    /// Kernel threads and zombies have an empty command line.
    pub fn get_pid_cmdline(&self, pid: u32) -> Result<String, ProcError> {
        let path = self.paths.pid_file(pid, "cmdline");
        let content = self
            .fs
            .read(&path)
            .map_err(|e| ProcError::from_io(&path, e))?;
        Ok(parse_cmdline(&content))
    }

    /// Returns the target of `/proc/[pid]/fd/[fd]` verbatim.
    ///
    /// Targets are paths or pseudo-paths like `socket:[12345]` and `pipe:[678]`.
    pub fn read_proc_pid_fd_link(&self, pid: u32, fd: u32) -> Result<String, ProcError> {
        let path = self.paths.fd_link(pid, fd);
        let target = self.read_link(&path)?;
        Ok(target.to_string_lossy().into_owned())
    }

    /// Returns the path of the executable of the process.
    pub fn get_exe_path(&self, pid: u32) -> Result<PathBuf, ProcError> {
        self.read_link(&self.paths.pid_file(pid, "exe"))
    }

    /// Returns the real, effective, saved and filesystem uids of the process.
    pub fn read_pid_uids(&self, pid: u32) -> Result<Uids, ProcError> {
        let path = self.paths.pid_file(pid, "status");
        let content = self.read_string(&path)?;
        parse_status_uids(&content).map_err(|e| ProcError::format(ProcFile::Status, &path, e))
    }

    /// Returns the pid of the process in each nested pid namespace, outermost first.
    ///
    /// On kernels without `NSpid` the process is assumed to live in the root
    /// namespace and `[pid]` is returned.
    pub fn read_pid_ns_pids(&self, pid: u32) -> Result<Vec<u32>, ProcError> {
        let path = self.paths.pid_file(pid, "status");
        let content = self.read_string(&path)?;
        let ns_pids = parse_status_ns_pids(&content)
            .map_err(|e| ProcError::format(ProcFile::Status, &path, e))?;
        Ok(ns_pids.unwrap_or_else(|| vec![pid]))
    }
}
