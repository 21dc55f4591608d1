//! Document I/O operations

use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use lineedit_core::LineBuffer;
use thiserror::Error;
use tracing::{debug, warn};

/// Document I/O error
#[derive(Debug, Error)]
pub enum IoError {
    #[error("failed to read {}: {}", .path.display(), .source)]
    Read { path: PathBuf, source: io::Error },

    #[error("invalid UTF-8 content in {}", .path.display())]
    InvalidUtf8 { path: PathBuf },

    #[error("failed to write {}: {}", .path.display(), .source)]
    Write { path: PathBuf, source: io::Error },
}

/// Open result containing the loaded buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenResult {
    pub buffer: LineBuffer,
    /// True when nothing existed at the path yet
    pub is_new: bool,
}

/// Save result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveResult {
    pub lines_written: usize,
    pub bytes_written: usize,
}

/// Editor I/O abstraction.
pub trait DocumentIo {
    /// Load the document at `path`. A missing file is not an error: it
    /// opens as an empty, new document.
    fn open(&mut self, path: &Path) -> Result<OpenResult, IoError>;

    /// Overwrite the document at `path` with the buffer's contents.
    fn save(&mut self, path: &Path, buffer: &LineBuffer) -> Result<SaveResult, IoError>;
}

/// Filesystem-backed document I/O.
///
/// Saves go through a temporary file in the target's directory that is
/// renamed over the target, so a failed save never leaves a truncated file.
#[derive(Debug, Clone)]
pub struct FileDocumentIo {
    create_parents: bool,
}

impl FileDocumentIo {
    pub fn new() -> Self {
        Self {
            create_parents: true,
        }
    }

    /// Whether `open` creates missing parent directories of a new document
    pub fn with_create_parents(mut self, create_parents: bool) -> Self {
        self.create_parents = create_parents;
        self
    }

    fn ensure_parent_dir(&self, path: &Path) {
        let Some(parent) = parent_dir(path) else {
            return;
        };
        if parent.is_dir() {
            return;
        }
        // Not fatal here; a missing directory surfaces when saving.
        match fs::create_dir_all(parent) {
            Ok(()) => debug!(dir = %parent.display(), "created parent directory"),
            Err(err) => warn!(dir = %parent.display(), %err, "could not create parent directory"),
        }
    }
}

impl Default for FileDocumentIo {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentIo for FileDocumentIo {
    fn open(&mut self, path: &Path) -> Result<OpenResult, IoError> {
        match fs::read_to_string(path) {
            Ok(content) => Ok(OpenResult {
                buffer: LineBuffer::from_text(&content),
                is_new: false,
            }),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                if self.create_parents {
                    self.ensure_parent_dir(path);
                }
                Ok(OpenResult {
                    buffer: LineBuffer::new(),
                    is_new: true,
                })
            }
            Err(err) if err.kind() == io::ErrorKind::InvalidData => Err(IoError::InvalidUtf8 {
                path: path.to_path_buf(),
            }),
            Err(source) => Err(IoError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    fn save(&mut self, path: &Path, buffer: &LineBuffer) -> Result<SaveResult, IoError> {
        let write_err = |source: io::Error| IoError::Write {
            path: path.to_path_buf(),
            source,
        };

        let dir = parent_dir(path).unwrap_or_else(|| Path::new("."));
        let content = buffer.to_text();

        let mut builder = tempfile::Builder::new();
        builder.prefix(".lineedit-");
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            // Same mode as a plain create, before the umask.
            builder.permissions(fs::Permissions::from_mode(0o666));
        }
        let mut tmp = builder.tempfile_in(dir).map_err(write_err)?;

        // An existing document keeps its permissions across the rename.
        if let Ok(existing) = fs::metadata(path) {
            tmp.as_file()
                .set_permissions(existing.permissions())
                .map_err(write_err)?;
        }

        tmp.write_all(content.as_bytes()).map_err(write_err)?;
        tmp.as_file().sync_all().map_err(write_err)?;
        tmp.persist(path).map_err(|err| write_err(err.error))?;

        Ok(SaveResult {
            lines_written: buffer.line_count(),
            bytes_written: content.len(),
        })
    }
}

/// In-memory document store
///
/// Paths listed in `failing` reject saves, for exercising error paths.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocumentIo {
    documents: HashMap<PathBuf, String>,
    failing: Vec<PathBuf>,
}

impl MemoryDocumentIo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(mut self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.documents.insert(path.into(), content.into());
        self
    }

    pub fn with_failing_save(mut self, path: impl Into<PathBuf>) -> Self {
        self.failing.push(path.into());
        self
    }

    pub fn document(&self, path: impl AsRef<Path>) -> Option<&str> {
        self.documents.get(path.as_ref()).map(|s| s.as_str())
    }
}

impl DocumentIo for MemoryDocumentIo {
    fn open(&mut self, path: &Path) -> Result<OpenResult, IoError> {
        Ok(match self.documents.get(path) {
            Some(content) => OpenResult {
                buffer: LineBuffer::from_text(content),
                is_new: false,
            },
            None => OpenResult {
                buffer: LineBuffer::new(),
                is_new: true,
            },
        })
    }

    fn save(&mut self, path: &Path, buffer: &LineBuffer) -> Result<SaveResult, IoError> {
        if self.failing.iter().any(|p| p == path) {
            return Err(IoError::Write {
                path: path.to_path_buf(),
                source: io::Error::new(io::ErrorKind::PermissionDenied, "read-only document"),
            });
        }
        let content = buffer.to_text();
        let result = SaveResult {
            lines_written: buffer.line_count(),
            bytes_written: content.len(),
        };
        self.documents.insert(path.to_path_buf(), content);
        Ok(result)
    }
}

fn parent_dir(path: &Path) -> Option<&Path> {
    path.parent().filter(|p| !p.as_os_str().is_empty())
}
