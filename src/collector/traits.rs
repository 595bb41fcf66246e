//! Abstractions for filesystem access to enable testing and mocking.
//!
//! The `FileSystem` trait allows the parsers to work with both the real `/proc`
//! filesystem on Linux and in-memory fixtures for testing.
//!
//! Every read is scoped to a single call: handles are dropped before the call
//! returns, on success and on error alike.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Abstraction for filesystem operations.
pub trait FileSystem: Send + Sync {
    /// Reads the entire contents of a file as raw bytes.
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Reads the entire contents of a file as a string.
    ///
    /// `/proc` text files embed process names, which are arbitrary bytes
    /// cut at 15 bytes by the kernel. Invalid UTF-8 is replaced, not rejected.
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        let bytes = self.read(path)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Reads the first line of a file, without the trailing newline.
    ///
    /// The default implementation reads the whole file.
    fn read_first_line(&self, path: &Path) -> io::Result<String> {
        let content = self.read_to_string(path)?;
        Ok(content.lines().next().unwrap_or_default().to_string())
    }

    /// Returns the target of a symbolic link without following it.
    fn read_link(&self, path: &Path) -> io::Result<PathBuf>;
}

/// Real filesystem implementation that delegates to `std::fs`.
///
/// Use this in production to read from the actual `/proc` filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealFs;

impl RealFs {
    /// Creates a new `RealFs` instance.
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for RealFs {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }

    fn read_first_line(&self, path: &Path) -> io::Result<String> {
        let mut reader = BufReader::new(File::open(path)?);
        let mut line = Vec::new();
        reader.read_until(b'\n', &mut line)?;
        if line.last() == Some(&b'\n') {
            line.pop();
        }
        Ok(String::from_utf8_lossy(&line).into_owned())
    }

    fn read_link(&self, path: &Path) -> io::Result<PathBuf> {
        std::fs::read_link(path)
    }
}
