//! Writing extracted records to disk, or describing what would be written.
//!
//! In [`Mode::Preview`] nothing touches the filesystem. In [`Mode::Write`]
//! every parent directory is created (existing ones are fine) and files are
//! overwritten without confirmation. When two records share a destination,
//! the later one wins.
//!
//! Progress is reported through a callback, one [`MaterializeEvent`] per
//! directory (first time it is seen) and per file. The current directory
//! (`.`) is never reported.

use crate::types::FileRecord;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Characters of content shown in a preview line.
pub const PREVIEW_CHARS: usize = 100;

#[derive(Error, Debug)]
pub enum MaterializeError {
    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Report planned actions only.
    Preview,
    /// Create directories and write files.
    Write,
}

impl Mode {
    pub fn is_preview(self) -> bool {
        self == Mode::Preview
    }
}

/// One planned or completed action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MaterializeEvent {
    Directory {
        path: PathBuf,
        /// False in preview mode.
        created: bool,
    },
    File {
        path: PathBuf,
        size: usize,
        /// Escaped, truncated start of the content.
        preview: String,
        approx_source_line: i64,
        /// False in preview mode.
        written: bool,
    },
}

/// Totals after a materialize pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MaterializeStats {
    pub directories: usize,
    pub files: usize,
    pub bytes: usize,
}

/// Create (or preview) every record in order.
///
/// Stops at the first I/O failure; files already written stay on disk.
pub fn materialize(
    records: &[FileRecord],
    mode: Mode,
    mut on_event: impl FnMut(&MaterializeEvent),
) -> Result<MaterializeStats, MaterializeError> {
    let mut seen_dirs: HashSet<&Path> = HashSet::new();
    let mut stats = MaterializeStats::default();

    for record in records {
        if let Some(dir) = record.path.parent()
            && !dir.as_os_str().is_empty()
            && dir != Path::new(".")
            && seen_dirs.insert(dir)
        {
            if mode == Mode::Write {
                fs::create_dir_all(dir).map_err(|source| MaterializeError::CreateDir {
                    path: dir.to_path_buf(),
                    source,
                })?;
                debug!(path = %dir.display(), "created directory");
            }
            stats.directories += 1;
            on_event(&MaterializeEvent::Directory {
                path: dir.to_path_buf(),
                created: mode == Mode::Write,
            });
        }

        if mode == Mode::Write {
            fs::write(&record.path, &record.content).map_err(|source| {
                MaterializeError::Write {
                    path: record.path.clone(),
                    source,
                }
            })?;
            debug!(path = %record.path.display(), bytes = record.size(), "wrote file");
        }
        stats.files += 1;
        stats.bytes += record.size();
        on_event(&MaterializeEvent::File {
            path: record.path.clone(),
            size: record.size(),
            preview: content_preview(&record.content, PREVIEW_CHARS),
            approx_source_line: record.approx_source_line,
            written: mode == Mode::Write,
        });
    }

    Ok(stats)
}

/// First `max` characters with newlines shown as `\n`, plus `...` if cut.
pub fn content_preview(content: &str, max: usize) -> String {
    let mut chars = content.chars();
    let head: String = chars.by_ref().take(max).collect();
    let mut preview = head.replace('\n', "\\n");
    if chars.next().is_some() {
        preview.push_str("...");
    }
    preview
}
