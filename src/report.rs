//! Structure analysis and integrity checks over extracted records.
//!
//! Everything here is advisory. Issues are collected and shown to the user,
//! but extraction always proceeds.

use crate::types::FileRecord;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::{Path, PathBuf};

/// Key used in the extension histogram for files without one.
pub const NO_EXTENSION: &str = "no extension";

/// An integrity finding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Issue {
    /// Records whose content is empty or whitespace-only.
    EmptyFiles(Vec<PathBuf>),
    /// Destination paths produced by more than one section (sorted, unique).
    DuplicatePaths(Vec<PathBuf>),
    /// A record larger than the configured threshold.
    LargeFile { path: PathBuf, size: usize },
}

/// Summary of the planned output tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    /// File names grouped by parent directory, both sorted.
    pub directories: BTreeMap<PathBuf, Vec<String>>,
    /// Number of records (duplicates counted individually).
    pub file_count: usize,
    /// Count of records per extension (`.ts`) or [`NO_EXTENSION`].
    pub extensions: BTreeMap<String, usize>,
    pub issues: Vec<Issue>,
}

impl Report {
    pub fn directory_count(&self) -> usize {
        self.directories.len()
    }

    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }
}

/// Analyze `records`, flagging files larger than `large_file_threshold` bytes.
pub fn analyze(records: &[FileRecord], large_file_threshold: usize) -> Report {
    let mut directories: BTreeMap<PathBuf, Vec<String>> = BTreeMap::new();
    let mut extensions: BTreeMap<String, usize> = BTreeMap::new();

    for record in records {
        let parent = record
            .path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let name = record
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        directories.entry(parent).or_default().push(name);
        *extensions.entry(extension_key(&record.path)).or_default() += 1;
    }
    for names in directories.values_mut() {
        names.sort();
    }

    let mut issues = Vec::new();

    let empty: Vec<PathBuf> = records
        .iter()
        .filter(|r| r.content.trim().is_empty())
        .map(|r| r.path.clone())
        .collect();
    if !empty.is_empty() {
        issues.push(Issue::EmptyFiles(empty));
    }

    let duplicates = duplicate_paths(records);
    if !duplicates.is_empty() {
        issues.push(Issue::DuplicatePaths(duplicates));
    }

    for record in records {
        if record.size() > large_file_threshold {
            issues.push(Issue::LargeFile {
                path: record.path.clone(),
                size: record.size(),
            });
        }
    }

    Report {
        directories,
        file_count: records.len(),
        extensions,
        issues,
    }
}

fn extension_key(path: &Path) -> String {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_else(|| NO_EXTENSION.to_string())
}

fn duplicate_paths(records: &[FileRecord]) -> Vec<PathBuf> {
    let mut counts: HashMap<&Path, usize> = HashMap::new();
    for record in records {
        *counts.entry(record.path.as_path()).or_default() += 1;
    }
    counts
        .into_iter()
        .filter(|(_, n)| *n > 1)
        .map(|(p, _)| p.to_path_buf())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
