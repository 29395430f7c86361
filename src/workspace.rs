//! File-system capability seam.
//!
//! The engine never touches the disk directly outside this trait, so the
//! host (editor plugin, tests) can substitute its own file access.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Read/write capability consumed by impact analysis and patch application.
pub trait Workspace {
    fn read_text(&self, path: &Path) -> io::Result<String>;
    fn write_text(&self, path: &Path, content: &str) -> io::Result<()>;
}

/// Default workspace backed by the local file system, rooted at a project
/// directory. Relative paths are resolved against the root.
pub struct FsWorkspace {
    root: PathBuf,
}

impl FsWorkspace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn full_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

impl Workspace for FsWorkspace {
    fn read_text(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(self.full_path(path))
    }

    fn write_text(&self, path: &Path, content: &str) -> io::Result<()> {
        let full = self.full_path(path);
        // Atomic replace: write a sibling temp file, then persist over the
        // original, so a crash mid-write never leaves a truncated source file.
        let dir = full.parent().unwrap_or(Path::new("."));
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        io::Write::write_all(&mut tmp, content.as_bytes())?;
        tmp.persist(&full).map_err(|e| e.error)?;
        Ok(())
    }
}
