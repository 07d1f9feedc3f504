//! Shared test utilities for the splitdoc test suite.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let out = parse_plain(&sample_document());
//! assert_eq!(record_paths(&out), vec!["package.json", "src/index.ts", "src/lib/util.ts"]);
//! ```

use std::path::{Path, PathBuf};

use crate::filter::SkipSet;
use crate::parser::{ParseOutcome, SectionParser};
use crate::rewrite::Rewriter;
use crate::types::FileRecord;

/// Header prefix used by [`parse_plain`] and [`sample_document`].
pub const PREFIX: &str = "## proj/";

// =========================================================================
// Parsing shortcuts
// =========================================================================

/// Parse with the `## proj/` prefix into `out/`, no skip-set, no rewrites.
pub fn parse_plain(doc: &str) -> ParseOutcome {
    let skip = SkipSet::empty();
    let rw = Rewriter::none();
    SectionParser::new(PREFIX, Path::new("out"), &skip, &rw).parse(doc)
}

/// Relative paths of emitted records, in order.
pub fn record_paths(outcome: &ParseOutcome) -> Vec<&str> {
    outcome
        .records
        .iter()
        .map(|r| r.relative_path.as_str())
        .collect()
}

/// A small well-formed document: three files with content, one empty section.
pub fn sample_document() -> String {
    [
        "# Project bundle",
        "",
        "## proj/package.json",
        "```json",
        "{ \"name\": \"proj\" }",
        "```",
        "",
        "---",
        "",
        "## proj/src/index.ts",
        "```ts",
        "import { util } from './lib/util';",
        "",
        "util();",
        "```",
        "",
        "## proj/src/empty.ts",
        "```ts",
        "```",
        "",
        "## proj/src/lib/util.ts",
        "```ts",
        "export function util() {}",
        "```",
        "",
    ]
    .join("\n")
}

// =========================================================================
// Record builders
// =========================================================================

/// Build a record under `out/` with the given content.
pub fn record(relative: &str, content: &str) -> FileRecord {
    FileRecord {
        relative_path: relative.to_string(),
        path: PathBuf::from("out").join(relative),
        content: content.to_string(),
        approx_source_line: 1,
    }
}

/// Find a record by relative path. Panics if not found.
pub fn find_record<'a>(outcome: &'a ParseOutcome, relative: &str) -> &'a FileRecord {
    outcome
        .records
        .iter()
        .find(|r| r.relative_path == relative)
        .unwrap_or_else(|| {
            let paths = record_paths(outcome);
            panic!("record '{relative}' not found. Available: {paths:?}")
        })
}
