//! End-to-end split: read, parse, report, materialize.
//!
//! [`SplitJob::run`] drives the stages in order and hands every display line
//! to a caller-supplied sink, so the binary prints to stdout while tests
//! collect lines. Any failure carries the last processed input line.

use crate::config::{self, ConfigError, ProfileConfig};
use crate::filter::SkipSet;
use crate::materialize::{self, MaterializeError, MaterializeStats, Mode};
use crate::output;
use crate::parser::{ParseOutcome, SectionParser};
use crate::report::{self, Report};
use crate::rewrite::Rewriter;
use crate::types::FileRecord;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum SplitError {
    #[error("Input file '{0}' not found!")]
    InputNotFound(PathBuf),
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Materialize(#[from] MaterializeError),
    #[error("Failed to serialize manifest: {0}")]
    Manifest(#[from] serde_json::Error),
    #[error("Failed to write manifest {path}: {source}")]
    ManifestWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A failed run, with the last input line processed before the failure.
#[derive(Error, Debug)]
#[error("{error}")]
pub struct RunFailure {
    /// 0 when the failure happened before any line was read.
    pub last_line: usize,
    #[source]
    pub error: SplitError,
}

impl RunFailure {
    fn at(last_line: usize) -> impl FnOnce(SplitError) -> RunFailure {
        move |error| RunFailure { last_line, error }
    }
}

/// What a successful run produced.
#[derive(Debug, Clone)]
pub struct SplitSummary {
    pub records: Vec<FileRecord>,
    pub skipped: Vec<String>,
    pub report: Report,
    pub stats: MaterializeStats,
    pub mode: Mode,
}

/// JSON manifest written by `--manifest`.
#[derive(Debug, Serialize)]
struct Manifest<'a> {
    input: &'a Path,
    output_dir: &'a Path,
    header_prefix: &'a str,
    skipped: &'a [String],
    files: &'a [FileRecord],
}

/// A fully resolved split: inputs, parsing rules, and mode.
#[derive(Debug, Clone)]
pub struct SplitJob {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub header_prefix: String,
    pub skip: SkipSet,
    pub rewriter: Rewriter,
    pub large_file_threshold: usize,
    pub mode: Mode,
    pub manifest: Option<PathBuf>,
}

impl SplitJob {
    /// A preview job using a profile's defaults for everything.
    pub fn from_profile(profile: &ProfileConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            input: PathBuf::from(&profile.input_file),
            output_dir: PathBuf::from(&profile.output_dir),
            header_prefix: profile.header_prefix.clone(),
            skip: profile.skip_set(),
            rewriter: profile.rewrite.build()?,
            large_file_threshold: profile.large_file_threshold,
            mode: Mode::Preview,
            manifest: None,
        })
    }

    pub fn with_input(mut self, input: impl Into<PathBuf>) -> Self {
        self.input = input.into();
        self
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    pub fn with_header_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.header_prefix = prefix.into();
        self
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_manifest(mut self, manifest: Option<PathBuf>) -> Self {
        self.manifest = manifest;
        self
    }

    /// Re-check settings that command-line overrides can change.
    pub fn validate(&self) -> Result<(), ConfigError> {
        config::validate_header_prefix(&self.header_prefix)
    }

    /// Parse a document with this job's prefix, skip-set, and rewrites.
    pub fn parse(&self, text: &str) -> ParseOutcome {
        SectionParser::new(
            &self.header_prefix,
            &self.output_dir,
            &self.skip,
            &self.rewriter,
        )
        .parse(text)
    }

    fn read_input(&self) -> Result<String, SplitError> {
        if !self.input.is_file() {
            return Err(SplitError::InputNotFound(self.input.clone()));
        }
        fs::read_to_string(&self.input).map_err(|source| SplitError::Read {
            path: self.input.clone(),
            source,
        })
    }

    fn write_manifest(&self, path: &Path, outcome: &ParseOutcome) -> Result<(), SplitError> {
        let manifest = Manifest {
            input: &self.input,
            output_dir: &self.output_dir,
            header_prefix: &self.header_prefix,
            skipped: &outcome.skipped,
            files: &outcome.records,
        };
        let json = serde_json::to_string_pretty(&manifest)?;
        fs::write(path, json).map_err(|source| SplitError::ManifestWrite {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Run every stage, sending display lines to `emit`.
    pub fn run(&self, mut emit: impl FnMut(&str)) -> Result<SplitSummary, RunFailure> {
        let mut emit_all = |lines: Vec<String>| lines.iter().for_each(|l| emit(l.as_str()));
        let mode = self.mode;

        emit_all(output::format_parse_start(&self.input, mode));
        let text = self.read_input().map_err(RunFailure::at(0))?;

        let outcome = self.parse(&text);
        let last_line = outcome.lines_read;
        info!(
            records = outcome.records.len(),
            skipped = outcome.skipped_count(),
            lines = last_line,
            "parsed {}",
            self.input.display()
        );
        emit_all(output::format_skipped(&outcome, mode));

        let report = report::analyze(&outcome.records, self.large_file_threshold);
        for issue in &report.issues {
            debug!("{}", output::format_issue(issue));
        }
        emit_all(output::format_structure(&report, &self.output_dir, mode));
        emit_all(output::format_validation(&report, mode));

        if let Some(path) = &self.manifest {
            self.write_manifest(path, &outcome)
                .map_err(RunFailure::at(last_line))?;
        }

        emit_all(output::format_processing_start(outcome.records.len(), mode));
        let stats = materialize::materialize(&outcome.records, mode, |event| {
            emit_all(output::format_event(event))
        })
        .map_err(|e| RunFailure::at(last_line)(e.into()))?;

        emit_all(output::format_completion(stats.files, mode));

        Ok(SplitSummary {
            records: outcome.records,
            skipped: outcome.skipped,
            report,
            stats,
            mode,
        })
    }
}
