//! Error types shared by every `/proc` reader.
//!
//! Three failure kinds matter to callers:
//! - [`ProcError::NotFound`]: the process or fd went away; routine during sampling.
//! - [`ProcError::Format`]: the file exists but its layout is not what we parse.
//! - [`ProcError::Config`]: host constants are unusable; fatal for the whole pass.
//!
//! Anything else the kernel reports (permission denied and friends) is [`ProcError::Io`].

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use crate::collector::procfs::parser::ParseError;

/// The `/proc` file family a format error came from.
///
/// Only files with a grammar appear here; `cmdline` and symlinks are taken
/// verbatim and never fail to parse.
///
/// Used as the deduplication key when warning about format errors, so one
/// unexpected kernel layout produces one warning instead of one per process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ProcFile {
    /// `/proc/[pid]/net/dev`
    NetDev,
    /// `/proc/[pid]/io`
    Io,
    /// `/proc/[pid]/stat`
    PidStat,
    /// `/proc/[pid]/status`
    Status,
    /// `/proc/stat`
    Stat,
    /// `/proc/meminfo`
    MemInfo,
}

impl ProcFile {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcFile::NetDev => "net/dev",
            ProcFile::Io => "io",
            ProcFile::PidStat => "pid stat",
            ProcFile::Status => "status",
            ProcFile::Stat => "stat",
            ProcFile::MemInfo => "meminfo",
        }
    }
}

impl fmt::Display for ProcFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned by [`ProcParser`](crate::collector::procfs::ProcParser) operations.
#[derive(Debug, Error)]
pub enum ProcError {
    /// Target path is absent: the process exited or the fd was closed.
    #[error("{} not found", .path.display())]
    NotFound { path: PathBuf },

    /// File is present but does not match the expected grammar.
    #[error("malformed {file} file {}: {message}", .path.display())]
    Format {
        file: ProcFile,
        path: PathBuf,
        message: String,
    },

    /// System configuration is missing or unusable.
    #[error("system config unavailable: {0}")]
    Config(String),

    /// Any other I/O failure, e.g. permission denied.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ProcError {
    /// Classifies an I/O error raised while reading `path`.
    ///
    /// `ESRCH` shows up when a task exits while its files are open, so it
    /// counts as not found.
    pub fn from_io(path: &Path, err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::NotFound || err.raw_os_error() == Some(libc::ESRCH) {
            ProcError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            ProcError::Io {
                path: path.to_path_buf(),
                source: err,
            }
        }
    }

    pub fn format(file: ProcFile, path: &Path, err: ParseError) -> Self {
        ProcError::Format {
            file,
            path: path.to_path_buf(),
            message: err.message,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ProcError::NotFound { .. })
    }

    pub fn is_format(&self) -> bool {
        matches!(self, ProcError::Format { .. })
    }

    pub fn is_config(&self) -> bool {
        matches!(self, ProcError::Config(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_io_not_found() {
        let err = io::Error::new(io::ErrorKind::NotFound, "gone");
        let e = ProcError::from_io(Path::new("/proc/1/stat"), err);
        assert!(e.is_not_found());
        assert_eq!(e.to_string(), "/proc/1/stat not found");
    }

    #[test]
    fn test_from_io_esrch_is_not_found() {
        let err = io::Error::from_raw_os_error(libc::ESRCH);
        let e = ProcError::from_io(Path::new("/proc/1/io"), err);
        assert!(e.is_not_found());
    }

    #[test]
    fn test_from_io_permission_denied() {
        let err = io::Error::from_raw_os_error(libc::EACCES);
        let e = ProcError::from_io(Path::new("/proc/1/io"), err);
        assert!(matches!(e, ProcError::Io { .. }));
        assert!(!e.is_not_found());
    }

    #[test]
    fn test_format_display() {
        let e = ProcError::format(
            ProcFile::MemInfo,
            Path::new("/proc/meminfo"),
            ParseError::new("missing MemTotal"),
        );
        assert!(e.is_format());
        assert_eq!(
            e.to_string(),
            "malformed meminfo file /proc/meminfo: missing MemTotal"
        );
    }
}
