//! Shared types passed between the parse, report, and materialize stages.
//!
//! A [`FileRecord`] is produced once by the parser and only read afterwards.
//! It also serializes to the JSON manifest written by `--manifest`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One extracted file section, ready for reporting or writing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Path exactly as written after the header prefix (trimmed).
    pub relative_path: String,
    /// Destination path: the output directory joined with `relative_path`.
    pub path: PathBuf,
    /// File content, trailing whitespace trimmed, ending in exactly one `\n`.
    pub content: String,
    /// Rough line of the section body in the source document. Diagnostics only;
    /// can be off by a few lines or negative near the top of the document.
    pub approx_source_line: i64,
}

impl FileRecord {
    /// Content size in bytes as it will be written.
    pub fn size(&self) -> usize {
        self.content.len()
    }
}
