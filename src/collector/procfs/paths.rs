//! Path construction under a configurable proc root.

use std::path::{Path, PathBuf};

/// Builds paths below the proc root, never assuming `/proc`.
#[derive(Debug, Clone)]
pub struct ProcPaths {
    root: PathBuf,
}

impl ProcPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `{root}/{name}`, e.g. `/proc/meminfo`.
    pub fn system_file(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// `{root}/{pid}/{subpath}`, e.g. `/proc/42/net/dev`.
    pub fn pid_file(&self, pid: u32, subpath: &str) -> PathBuf {
        let mut path = self.root.join(pid.to_string());
        path.push(subpath);
        path
    }

    /// `{root}/{pid}/fd/{fd}`.
    pub fn fd_link(&self, pid: u32, fd: u32) -> PathBuf {
        let mut path = self.pid_file(pid, "fd");
        path.push(fd.to_string());
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        let paths = ProcPaths::new("/host/proc");
        assert_eq!(paths.root(), Path::new("/host/proc"));
        assert_eq!(paths.system_file("meminfo"), Path::new("/host/proc/meminfo"));
        assert_eq!(paths.pid_file(42, "net/dev"), Path::new("/host/proc/42/net/dev"));
        assert_eq!(paths.fd_link(42, 3), Path::new("/host/proc/42/fd/3"));
    }
}
