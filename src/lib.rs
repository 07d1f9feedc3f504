//! # splitdoc
//!
//! Unpacks a single consolidated document, one where many files are pasted
//! under `## <root>/<path>` headings inside fenced code blocks, into a real
//! directory tree.
//!
//! # Architecture: Parse, Report, Materialize
//!
//! ```text
//! 1. Parse        document  →  Vec<FileRecord>   (pure, in memory)
//! 2. Report       records   →  Report            (tree, histogram, issues)
//! 3. Materialize  records   →  output dir/       (or a preview of it)
//! ```
//!
//! Parsing never fails: malformed sections degrade to best-effort records.
//! Reporting never blocks: issues are warnings. Only I/O can fail a run.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scanner`] | Numbered line iteration that keeps line terminators |
//! | [`parser`] | The section state machine: headers, separators, fences, content |
//! | [`filter`] | Skip-set of destination paths that never produce output |
//! | [`rewrite`] | Ordered regex and literal rewrite rules applied to content |
//! | [`types`] | [`FileRecord`](types::FileRecord), shared by all stages |
//! | [`report`] | Directory grouping, extension histogram, integrity checks |
//! | [`materialize`] | Directory creation and file writes, or their preview |
//! | [`output`] | CLI output formatting for every stage |
//! | [`config`] | `splitdoc.toml` loading, profile defaults, validation |
//! | [`split`] | Orchestration of one run, with last-line error context |
//!
//! # Design Decisions
//!
//! ## Preview by Default
//!
//! A run only writes when `--create` is passed. The preview prints exactly the
//! same structure analysis and validation as a real run, so a dry run is a
//! faithful rehearsal.
//!
//! ## Fence Parity
//!
//! Content mode flips on every fence line. There is no nesting and no
//! open/close matching; see [`parser`] for the consequences.
//!
//! ## Rules as Data
//!
//! The skip-set and rewrite tables come from configuration. The parser takes
//! them by reference and has no knowledge of any particular project layout.

pub mod config;
pub mod filter;
pub mod materialize;
pub mod output;
pub mod parser;
pub mod report;
pub mod rewrite;
pub mod scanner;
pub mod split;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
