//! In-memory mock filesystem for testing parsers without real `/proc`.
//!
//! This module provides `MockFs` which simulates a filesystem in memory,
//! allowing tests to run on any host and without privileges.

use crate::collector::traits::FileSystem;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

/// In-memory filesystem for testing.
///
/// Stores files and symbolic links in memory, allowing tests to simulate
/// various `/proc` states, including processes that vanish mid-sample.
#[derive(Debug, Clone, Default)]
pub struct MockFs {
    /// Map from path to file contents.
    files: HashMap<PathBuf, Vec<u8>>,
    /// Map from link path to link target.
    links: HashMap<PathBuf, PathBuf>,
}

impl MockFs {
    /// Creates a new empty mock filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file with the given content.
    pub fn add_file(&mut self, path: impl AsRef<Path>, content: impl AsRef<[u8]>) {
        self.files
            .insert(path.as_ref().to_path_buf(), content.as_ref().to_vec());
    }

    /// Adds a symbolic link pointing at `target`.
    ///
    /// The target is stored verbatim and never resolved, so pseudo-targets
    /// like `socket:[12345]` work.
    pub fn add_symlink(&mut self, path: impl AsRef<Path>, target: impl AsRef<Path>) {
        self.links
            .insert(path.as_ref().to_path_buf(), target.as_ref().to_path_buf());
    }

    /// Removes everything under `/proc/[pid]/`, as if the process exited.
    pub fn remove_process(&mut self, proc_path: impl AsRef<Path>, pid: u32) {
        let base = proc_path.as_ref().join(pid.to_string());
        self.files.retain(|path, _| !path.starts_with(&base));
        self.links.retain(|path, _| !path.starts_with(&base));
    }

    /// Adds a process with its typical `/proc/[pid]/` files.
    ///
    /// # Arguments
    /// * `pid` - Process ID
    /// * `stat` - Content of `/proc/[pid]/stat`
    /// * `status` - Content of `/proc/[pid]/status`
    /// * `io` - Content of `/proc/[pid]/io` (can be empty if not accessible)
    /// * `cmdline` - Content of `/proc/[pid]/cmdline`
    pub fn add_process(&mut self, pid: u32, stat: &str, status: &str, io: &str, cmdline: &str) {
        let base = PathBuf::from(format!("/proc/{}", pid));
        self.add_file(base.join("stat"), stat);
        self.add_file(base.join("status"), status);
        if !io.is_empty() {
            self.add_file(base.join("io"), io);
        }
        self.add_file(base.join("cmdline"), cmdline);
    }

    /// Loads a mock filesystem from a directory snapshot, mounting it at `mount`.
    ///
    /// Symbolic links are recorded with their targets, not followed.
    /// This is useful for regression tests with captured `/proc` trees.
    pub fn from_snapshot(dir: &Path, mount: &Path) -> io::Result<Self> {
        let mut fs = Self::new();
        load_directory_recursive(&mut fs, dir, mount)?;
        Ok(fs)
    }
}

fn load_directory_recursive(
    fs: &mut MockFs,
    real_path: &Path,
    virtual_path: &Path,
) -> io::Result<()> {
    for entry in std::fs::read_dir(real_path)? {
        let entry = entry?;
        let file_type = entry.file_type()?;
        let real_child = entry.path();
        let virtual_child = virtual_path.join(entry.file_name());

        if file_type.is_symlink() {
            fs.add_symlink(&virtual_child, std::fs::read_link(&real_child)?);
        } else if file_type.is_dir() {
            load_directory_recursive(fs, &real_child, &virtual_child)?;
        } else if file_type.is_file() {
            fs.add_file(&virtual_child, std::fs::read(&real_child)?);
        }
    }
    Ok(())
}

fn not_found(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::NotFound,
        format!("file not found: {:?}", path),
    )
}

impl FileSystem for MockFs {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        self.files.get(path).cloned().ok_or_else(|| not_found(path))
    }

    fn read_link(&self, path: &Path) -> io::Result<PathBuf> {
        self.links.get(path).cloned().ok_or_else(|| not_found(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_fs_add_file() {
        let mut fs = MockFs::new();
        fs.add_file("/proc/meminfo", "MemTotal: 16384 kB\n");

        let content = fs.read_to_string(Path::new("/proc/meminfo")).unwrap();
        assert_eq!(content, "MemTotal: 16384 kB\n");
        assert_eq!(
            fs.read_first_line(Path::new("/proc/meminfo")).unwrap(),
            "MemTotal: 16384 kB"
        );
    }

    #[test]
    fn test_mock_fs_binary_content() {
        let mut fs = MockFs::new();
        fs.add_file("/proc/1/cmdline", b"/sbin/init\0\xff\0");

        assert_eq!(
            fs.read(Path::new("/proc/1/cmdline")).unwrap(),
            b"/sbin/init\0\xff\0"
        );
        assert_eq!(
            fs.read_to_string(Path::new("/proc/1/cmdline")).unwrap(),
            "/sbin/init\0\u{FFFD}\0"
        );
    }

    #[test]
    fn test_mock_fs_symlink() {
        let mut fs = MockFs::new();
        fs.add_symlink("/proc/1/fd/3", "socket:[4242]");

        assert_eq!(
            fs.read_link(Path::new("/proc/1/fd/3")).unwrap(),
            PathBuf::from("socket:[4242]")
        );
        // A link is not a regular file.
        assert!(fs.read(Path::new("/proc/1/fd/3")).is_err());
    }

    #[test]
    fn test_mock_fs_add_and_remove_process() {
        let mut fs = MockFs::new();
        fs.add_process(
            1234,
            "1234 (bash) S 1233 1234 1234 0 -1 4194304 100 0 0 0 10 5 0 0 20 0 1 0 12345 12345678 100 18446744073709551615 0 0 0 0 0 0 0 0 0 0 0 0 17 0 0 0 0 0 0 0 0 0 0 0 0 0 0",
            "Name:\tbash\nPid:\t1234\nPPid:\t1233\nUid:\t1000\t1000\t1000\t1000\n",
            "rchar: 1000\nwchar: 500\nsyscr: 100\nsyscw: 50\nread_bytes: 4096\nwrite_bytes: 2048\ncancelled_write_bytes: 0\n",
            "/bin/bash\0--login\0",
        );
        fs.add_symlink("/proc/1234/fd/0", "/dev/pts/0");

        assert!(fs.read(Path::new("/proc/1234/stat")).is_ok());
        assert!(fs.read(Path::new("/proc/1234/io")).is_ok());
        assert!(fs.read_link(Path::new("/proc/1234/fd/0")).is_ok());

        fs.remove_process("/proc", 1234);

        assert!(fs.read(Path::new("/proc/1234/stat")).is_err());
        assert!(fs.read_link(Path::new("/proc/1234/fd/0")).is_err());
    }

    #[test]
    fn test_mock_fs_not_found() {
        let fs = MockFs::new();
        let result = fs.read_to_string(Path::new("/nonexistent"));
        assert!(result.is_err());
        assert_eq!(result.unwrap_err().kind(), io::ErrorKind::NotFound);
    }
}
