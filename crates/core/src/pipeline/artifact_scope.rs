use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

const DIR_PREFIX: &str = "kaiwa-";

/// Request-scoped owner of temporary on-disk artifacts.
///
/// Each scope gets its own uniquely named directory, so concurrent requests
/// never share filenames. Every path handed out by `register` is removed when
/// the scope is dropped, on success, early return or unwinding alike, and the
/// directory goes with it. Removal failures are logged and swallowed.
#[derive(Debug)]
pub struct ArtifactScope {
    dir: TempDir,
    artifacts: Vec<PathBuf>,
}

impl ArtifactScope {
    /// Open a scope under the system temporary directory.
    pub fn new() -> io::Result<Self> {
        Self::from_dir(tempfile::Builder::new().prefix(DIR_PREFIX).tempdir()?)
    }

    /// Open a scope under `root`.
    pub fn new_in(root: &Path) -> io::Result<Self> {
        Self::from_dir(tempfile::Builder::new().prefix(DIR_PREFIX).tempdir_in(root)?)
    }

    fn from_dir(dir: TempDir) -> io::Result<Self> {
        log::debug!("Opened artifact scope {}", dir.path().display());
        Ok(Self {
            dir,
            artifacts: Vec::new(),
        })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Claim `name` inside the scope directory for later removal.
    pub fn register(&mut self, name: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        self.track(path.clone());
        path
    }

    /// Claim an arbitrary path, e.g. one reported by an external tool.
    pub fn track(&mut self, path: PathBuf) {
        if !self.artifacts.contains(&path) {
            self.artifacts.push(path);
        }
    }

    pub fn artifacts(&self) -> &[PathBuf] {
        &self.artifacts
    }
}

impl Drop for ArtifactScope {
    fn drop(&mut self) {
        for path in self.artifacts.drain(..) {
            match fs::remove_file(&path) {
                Ok(()) => log::debug!("Removed artifact {}", path.display()),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => log::warn!("Could not remove artifact {}: {e}", path.display()),
            }
        }
        // `dir` is dropped next and removes the directory with any leftovers.
    }
}
