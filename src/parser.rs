//! Section parser: turns a consolidated document into [`FileRecord`]s.
//!
//! ## Document Format
//!
//! ~~~text
//! ## study-buddy/src/app.ts        <- header: prefix + relative path
//! ---                              <- separator, ignored while a section is open
//! ```ts                            <- first fence: content starts (tag ignored)
//! export const x = 1;              <- content, kept verbatim
//! ```                              <- second fence: content ends
//! ~~~
//!
//! ## State Machine
//!
//! Lines are classified in precedence order: header, separator, fence,
//! content. At most one section is open at a time. A section is finalized
//! lazily, when the next header arrives or the document ends, which is also
//! when trailing blank lines are trimmed.
//!
//! Content mode is driven by fence parity, not by matching open/close
//! markers: an odd fence count means "inside content". A stray third fence
//! re-enters content mode and a fourth leaves it again. Inputs in the wild
//! rely on this, so nested fences are deliberately not detected.
//!
//! Suppressed sections (see [`SkipSet`]) are tracked for their boundaries
//! but accumulate nothing.

use crate::filter::SkipSet;
use crate::rewrite::Rewriter;
use crate::scanner;
use crate::types::FileRecord;
use std::path::{Path, PathBuf};
use tracing::debug;

const FENCE: &str = "```";
const SEPARATOR: &str = "---";

/// Result of parsing one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseOutcome {
    /// Emitted records, in document order.
    pub records: Vec<FileRecord>,
    /// Relative paths of suppressed sections, in document order.
    pub skipped: Vec<String>,
    /// Number of lines consumed.
    pub lines_read: usize,
}

impl ParseOutcome {
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }
}

/// Parses consolidated documents for one header prefix.
#[derive(Debug, Clone)]
pub struct SectionParser<'a> {
    header_prefix: &'a str,
    output_dir: &'a Path,
    skip: &'a SkipSet,
    rewriter: &'a Rewriter,
}

impl<'a> SectionParser<'a> {
    pub fn new(
        header_prefix: &'a str,
        output_dir: &'a Path,
        skip: &'a SkipSet,
        rewriter: &'a Rewriter,
    ) -> Self {
        Self {
            header_prefix,
            output_dir,
            skip,
            rewriter,
        }
    }

    /// Parse a whole document held in memory.
    pub fn parse(&self, text: &str) -> ParseOutcome {
        let mut state = ParserState::default();
        let mut outcome = ParseOutcome::default();

        for line in scanner::lines(text) {
            state.line_number = line.number;
            self.feed(&mut state, line.text, &mut outcome);
        }

        self.finalize(&mut state, &mut outcome);
        outcome.lines_read = state.line_number;
        outcome
    }

    fn feed<'t>(&self, state: &mut ParserState<'t>, line: &'t str, outcome: &mut ParseOutcome) {
        if let Some(rest) = line.strip_prefix(self.header_prefix) {
            self.finalize(state, outcome);
            let path = rest.trim().to_string();
            let suppressed = self.skip.is_suppressed(&path);
            if suppressed {
                debug!(line = state.line_number, path = %path, "suppressing section");
                outcome.skipped.push(path.clone());
            } else {
                debug!(line = state.line_number, path = %path, "section opened");
            }
            state.open(path, suppressed);
            return;
        }

        let trimmed = line.trim();
        if trimmed == SEPARATOR && state.current.is_some() {
            return;
        }

        if trimmed.starts_with(FENCE) {
            state.fence_count += 1;
            state.inside_content = state.fence_count % 2 == 1;
            return;
        }

        if state.inside_content
            && let Some(section) = &state.current
            && !section.suppressed
        {
            state.accumulated.push(line);
        }
    }

    /// Close the open section, emitting a record if it has content.
    fn finalize(&self, state: &mut ParserState<'_>, outcome: &mut ParseOutcome) {
        let Some(section) = state.current.take() else {
            return;
        };
        if section.suppressed {
            return;
        }

        let joined: String = state.accumulated.concat();
        if joined.trim().is_empty() {
            debug!(path = %section.path, "discarding empty section");
            return;
        }

        let rewritten = self.rewriter.apply(&joined);
        let content = format!("{}\n", rewritten.trim_end());
        let approx_source_line = state.line_number as i64 - state.accumulated.len() as i64 - 2;
        let path: PathBuf = self.output_dir.join(&section.path);

        debug!(
            path = %path.display(),
            bytes = content.len(),
            approx_source_line,
            "section finalized"
        );
        outcome.records.push(FileRecord {
            relative_path: section.path,
            path,
            content,
            approx_source_line,
        });
    }
}

/// The section currently open, if any.
#[derive(Debug)]
struct OpenSection {
    path: String,
    suppressed: bool,
}

/// Transient scanning state. Content lines borrow from the input document.
#[derive(Debug, Default)]
struct ParserState<'t> {
    current: Option<OpenSection>,
    accumulated: Vec<&'t str>,
    fence_count: usize,
    inside_content: bool,
    line_number: usize,
}

impl ParserState<'_> {
    fn open(&mut self, path: String, suppressed: bool) {
        self.current = Some(OpenSection { path, suppressed });
        self.accumulated.clear();
        self.fence_count = 0;
        self.inside_content = false;
    }
}
