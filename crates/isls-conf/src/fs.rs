//! File system abstraction used by the configuration resolver.
//!
//! Rule configuration discovery only needs to read files and tell
//! directories apart from files, so the trait stays small. Tests swap in
//! [`InMemoryFileSystem`] to observe how often the resolver touches disk.

use std::io;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use camino::Utf8Path;
use camino::Utf8PathBuf;
use dashmap::DashMap;

pub trait FileSystem: Send + Sync {
    /// Read the entire contents of a file
    fn read_to_string(&self, path: &Utf8Path) -> io::Result<String>;

    /// Check if a path is a directory
    fn is_directory(&self, path: &Utf8Path) -> bool;
}

/// Standard file system implementation that uses `std::fs`
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
    fn read_to_string(&self, path: &Utf8Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn is_directory(&self, path: &Utf8Path) -> bool {
        path.is_dir()
    }
}

/// In-memory file system that counts reads.
///
/// Directories are implicit: any ancestor of a stored file is a directory.
#[derive(Default)]
pub struct InMemoryFileSystem {
    files: DashMap<Utf8PathBuf, String>,
    reads: AtomicUsize,
}

impl InMemoryFileSystem {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&self, path: impl Into<Utf8PathBuf>, content: impl Into<String>) {
        self.files.insert(path.into(), content.into());
    }

    pub fn remove_file(&self, path: &Utf8Path) {
        self.files.remove(path);
    }

    /// Number of `read_to_string` calls served so far, including failed ones.
    #[must_use]
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::Relaxed)
    }
}

impl FileSystem for InMemoryFileSystem {
    fn read_to_string(&self, path: &Utf8Path) -> io::Result<String> {
        self.reads.fetch_add(1, Ordering::Relaxed);
        self.files
            .get(path)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("{path} not found")))
    }

    fn is_directory(&self, path: &Utf8Path) -> bool {
        self.files
            .iter()
            .any(|entry| entry.key() != path && entry.key().starts_with(path))
    }
}
