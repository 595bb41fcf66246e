//! Host constants needed to turn raw `/proc` values into real units.
//!
//! The `SystemConfig` trait lets parsers run against the live kernel
//! (`HostConfig`) or against fixture trees with fixed values (`FixedConfig`).

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::ProcError;

/// Default mount point of the proc filesystem.
pub const DEFAULT_PROC_PATH: &str = "/proc";

/// Read-only host constants used for unit conversion and path resolution.
///
/// Implementations must not change their answers after construction.
pub trait SystemConfig: Send + Sync {
    /// Returns `true` once the constants have been determined.
    fn has_config(&self) -> bool;

    /// Memory page size in bytes.
    fn page_size(&self) -> u64;

    /// Clock ticks per second (`USER_HZ`).
    fn kernel_ticks_per_second(&self) -> u64;

    /// Nanoseconds to add to a since-boot timestamp to get wall-clock epoch time.
    fn clock_realtime_offset(&self) -> i64;

    /// Base directory standing in for `/proc`.
    fn proc_path(&self) -> &Path;
}

impl<T: SystemConfig + ?Sized> SystemConfig for &T {
    fn has_config(&self) -> bool {
        (**self).has_config()
    }
    fn page_size(&self) -> u64 {
        (**self).page_size()
    }
    fn kernel_ticks_per_second(&self) -> u64 {
        (**self).kernel_ticks_per_second()
    }
    fn clock_realtime_offset(&self) -> i64 {
        (**self).clock_realtime_offset()
    }
    fn proc_path(&self) -> &Path {
        (**self).proc_path()
    }
}

impl<T: SystemConfig + ?Sized> SystemConfig for Arc<T> {
    fn has_config(&self) -> bool {
        (**self).has_config()
    }
    fn page_size(&self) -> u64 {
        (**self).page_size()
    }
    fn kernel_ticks_per_second(&self) -> u64 {
        (**self).kernel_ticks_per_second()
    }
    fn clock_realtime_offset(&self) -> i64 {
        (**self).clock_realtime_offset()
    }
    fn proc_path(&self) -> &Path {
        (**self).proc_path()
    }
}

/// Constants queried from the running kernel.
#[derive(Debug, Clone)]
pub struct HostConfig {
    page_size: u64,
    ticks_per_second: u64,
    realtime_offset_ns: i64,
    proc_path: PathBuf,
}

impl HostConfig {
    /// Queries page size, tick rate and clock offset from the host.
    ///
    /// Fails with [`ProcError::Config`] if any of them cannot be determined,
    /// since every conversion downstream depends on them.
    pub fn detect() -> Result<Self, ProcError> {
        // SAFETY: sysconf has no side effects and is thread-safe for these names.
        let page_size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
        if page_size <= 0 {
            return Err(ProcError::Config(format!(
                "sysconf(_SC_PAGESIZE) returned {page_size}"
            )));
        }

        // SAFETY: same as above.
        let ticks_per_second = unsafe { libc::sysconf(libc::_SC_CLK_TCK) };
        if ticks_per_second <= 0 {
            return Err(ProcError::Config(format!(
                "sysconf(_SC_CLK_TCK) returned {ticks_per_second}"
            )));
        }

        let realtime = clock_ns(libc::CLOCK_REALTIME)?;
        let boottime = clock_ns(libc::CLOCK_BOOTTIME)?;

        Ok(Self {
            page_size: page_size as u64,
            ticks_per_second: ticks_per_second as u64,
            realtime_offset_ns: realtime - boottime,
            proc_path: PathBuf::from(DEFAULT_PROC_PATH),
        })
    }

    /// Points the config at an alternate proc mount (containers, fixtures).
    pub fn with_proc_path(mut self, proc_path: impl Into<PathBuf>) -> Self {
        self.proc_path = proc_path.into();
        self
    }
}

fn clock_ns(clock: libc::clockid_t) -> Result<i64, ProcError> {
    let mut ts = libc::timespec {
        tv_sec: 0,
        tv_nsec: 0,
    };
    // SAFETY: `ts` is a valid, writable timespec for the duration of the call.
    if unsafe { libc::clock_gettime(clock, &mut ts) } != 0 {
        return Err(ProcError::Config(format!(
            "clock_gettime({clock}) failed: {}",
            std::io::Error::last_os_error()
        )));
    }
    Ok(ts.tv_sec as i64 * 1_000_000_000 + ts.tv_nsec as i64)
}

impl SystemConfig for HostConfig {
    fn has_config(&self) -> bool {
        true
    }

    fn page_size(&self) -> u64 {
        self.page_size
    }

    fn kernel_ticks_per_second(&self) -> u64 {
        self.ticks_per_second
    }

    fn clock_realtime_offset(&self) -> i64 {
        self.realtime_offset_ns
    }

    fn proc_path(&self) -> &Path {
        &self.proc_path
    }
}

/// Config with explicit values, for fixture trees and tests.
#[derive(Debug, Clone)]
pub struct FixedConfig {
    pub initialized: bool,
    pub page_size: u64,
    pub ticks_per_second: u64,
    pub realtime_offset_ns: i64,
    pub proc_path: PathBuf,
}

impl FixedConfig {
    /// Creates a config with common x86_64 values: 4 KiB pages, 100 ticks/s.
    pub fn new(proc_path: impl Into<PathBuf>) -> Self {
        Self {
            initialized: true,
            page_size: 4096,
            ticks_per_second: 100,
            realtime_offset_ns: 0,
            proc_path: proc_path.into(),
        }
    }

    /// A config that reports itself as not initialized.
    pub fn uninitialized() -> Self {
        Self {
            initialized: false,
            ..Self::new(DEFAULT_PROC_PATH)
        }
    }

    pub fn with_page_size(mut self, page_size: u64) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_ticks_per_second(mut self, ticks_per_second: u64) -> Self {
        self.ticks_per_second = ticks_per_second;
        self
    }

    pub fn with_realtime_offset(mut self, offset_ns: i64) -> Self {
        self.realtime_offset_ns = offset_ns;
        self
    }
}

impl SystemConfig for FixedConfig {
    fn has_config(&self) -> bool {
        self.initialized
    }

    fn page_size(&self) -> u64 {
        self.page_size
    }

    fn kernel_ticks_per_second(&self) -> u64 {
        self.ticks_per_second
    }

    fn clock_realtime_offset(&self) -> i64 {
        self.realtime_offset_ns
    }

    fn proc_path(&self) -> &Path {
        &self.proc_path
    }
}
