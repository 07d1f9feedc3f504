//! CLI output formatting for every stage of a split.
//!
//! # Output Format
//!
//! ## Preview (default)
//!
//! ```text
//! [DRY RUN] Parsing bundle.txt...
//! [DRY RUN] Skipping legacy section: App.tsx
//!
//! [DRY RUN] Project Structure Analysis:
//! ============================================================
//! study-buddy/
//!   package.json
//!   src/
//!     index.ts
//!
//! Summary:
//!   Total files: 2
//!   Total directories: 2
//!
//! File types:
//!   .json: 1 file(s)
//!   .ts: 1 file(s)
//!
//! [DRY RUN] Validation Results:
//! ============================================================
//! [OK] No issues found!
//!
//! [DRY RUN] Processing 2 files...
//!
//! [DRY RUN] Would create directory: study-buddy
//! [DRY RUN] Would create file: study-buddy/package.json
//!           Size: 18 bytes
//!           Preview: { "name": "x" }\n
//!           Source lines: around 4
//! ```
//!
//! ## Write (`--create`)
//!
//! Stage headings lose the `[DRY RUN]` prefix and per-file lines become
//! `Created directory: ...` and `Created file: ... (N bytes)`.
//!
//! # Architecture
//!
//! Each stage has a `format_*` function (returns `Vec<String>`) for testability.
//! Format functions are pure: no I/O, no side effects. The caller decides where
//! lines go.

use crate::materialize::{MaterializeEvent, Mode};
use crate::parser::ParseOutcome;
use crate::report::{Issue, Report};
use std::path::{Path, PathBuf};

const RULE_WIDTH: usize = 60;

/// Indentation for continuation lines under a preview entry.
const DETAIL_INDENT: &str = "          ";

// ============================================================================
// Shared helpers
// ============================================================================

fn dry_prefix(mode: Mode) -> &'static str {
    match mode {
        Mode::Preview => "[DRY RUN] ",
        Mode::Write => "",
    }
}

/// Return indentation string: 2 spaces per depth level.
fn indent(depth: usize) -> String {
    "  ".repeat(depth)
}

fn heading(mode: Mode, title: &str) -> Vec<String> {
    vec![
        String::new(),
        format!("{}{}", dry_prefix(mode), title),
        "=".repeat(RULE_WIDTH),
    ]
}

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

// ============================================================================
// Parse
// ============================================================================

/// Opening line of a run.
pub fn format_parse_start(input: &Path, mode: Mode) -> Vec<String> {
    vec![format!("{}Parsing {}...", dry_prefix(mode), input.display())]
}

/// Suppressed sections. Only listed in preview mode.
pub fn format_skipped(outcome: &ParseOutcome, mode: Mode) -> Vec<String> {
    if !mode.is_preview() {
        return Vec::new();
    }
    outcome
        .skipped
        .iter()
        .map(|path| format!("[DRY RUN] Skipping legacy section: {path}"))
        .collect()
}

// ============================================================================
// Report
// ============================================================================

/// Directory tree, totals, and file-type histogram.
pub fn format_structure(report: &Report, output_dir: &Path, mode: Mode) -> Vec<String> {
    let mut lines = heading(mode, "Project Structure Analysis:");

    for (dir, files) in &report.directories {
        let depth = dir.components().count().saturating_sub(1);
        let name = match dir.file_name() {
            Some(name) => name.to_string_lossy().into_owned(),
            None => format!("{} (root)", output_dir.display()),
        };
        lines.push(format!("{}{}/", indent(depth), name));
        for file in files {
            lines.push(format!("{}{}", indent(depth + 1), file));
        }
    }

    lines.push(String::new());
    lines.push("Summary:".to_string());
    lines.push(format!("  Total files: {}", report.file_count));
    lines.push(format!("  Total directories: {}", report.directory_count()));

    lines.push(String::new());
    lines.push("File types:".to_string());
    for (ext, count) in &report.extensions {
        lines.push(format!("  {ext}: {count} file(s)"));
    }

    lines
}

/// One display line per integrity issue.
pub fn format_issue(issue: &Issue) -> String {
    match issue {
        Issue::EmptyFiles(paths) => format!("Empty files detected: {}", join_paths(paths)),
        Issue::DuplicatePaths(paths) => format!("Duplicate file paths: {}", join_paths(paths)),
        Issue::LargeFile { path, size } => {
            format!("Large file detected: {} ({} bytes)", path.display(), size)
        }
    }
}

/// Validation block: either the issue list or an all-clear.
pub fn format_validation(report: &Report, mode: Mode) -> Vec<String> {
    let mut lines = heading(mode, "Validation Results:");
    if report.has_issues() {
        lines.push("[WARN] Issues found:".to_string());
        for issue in &report.issues {
            lines.push(format!("  - {}", format_issue(issue)));
        }
    } else {
        lines.push("[OK] No issues found!".to_string());
    }
    lines
}

// ============================================================================
// Materialize
// ============================================================================

pub fn format_processing_start(file_count: usize, mode: Mode) -> Vec<String> {
    vec![
        String::new(),
        format!("{}Processing {} files...", dry_prefix(mode), file_count),
        String::new(),
    ]
}

/// Format a single materialize event as display lines.
pub fn format_event(event: &MaterializeEvent) -> Vec<String> {
    match event {
        MaterializeEvent::Directory {
            path,
            created: false,
        } => vec![format!("[DRY RUN] Would create directory: {}", path.display())],
        MaterializeEvent::Directory {
            path,
            created: true,
        } => vec![format!("Created directory: {}", path.display())],
        MaterializeEvent::File {
            path,
            size,
            preview,
            approx_source_line,
            written: false,
        } => vec![
            format!("[DRY RUN] Would create file: {}", path.display()),
            format!("{DETAIL_INDENT}Size: {size} bytes"),
            format!("{DETAIL_INDENT}Preview: {preview}"),
            format!("{DETAIL_INDENT}Source lines: around {approx_source_line}"),
            String::new(),
        ],
        MaterializeEvent::File {
            path,
            size,
            written: true,
            ..
        } => vec![format!("Created file: {} ({} bytes)", path.display(), size)],
    }
}

/// Closing lines of a successful run.
pub fn format_completion(file_count: usize, mode: Mode) -> Vec<String> {
    match mode {
        Mode::Preview => vec![
            String::new(),
            "[DRY RUN COMPLETE] No files were created.".to_string(),
            "To actually create the files, run again with --create".to_string(),
        ],
        Mode::Write => vec![
            String::new(),
            format!("[OK] Successfully created {file_count} files!"),
        ],
    }
}

/// Lines describing a failed run.
pub fn format_failure(message: &str, last_line: usize) -> Vec<String> {
    let mut lines = vec![String::new(), format!("[ERROR] {message}")];
    if last_line > 0 {
        lines.push(format!("   Last processed line: {last_line}"));
    }
    lines
}

/// Print one report line to stdout. Used as the sink for [`crate::split::SplitJob::run`].
pub fn print_line(line: &str) {
    println!("{line}");
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::analyze;
    use crate::test_helpers::*;

    #[test]
    fn indent_levels() {
        assert_eq!(indent(0), "");
        assert_eq!(indent(2), "    ");
    }

    #[test]
    fn parse_start_has_dry_prefix_in_preview() {
        assert_eq!(
            format_parse_start(Path::new("bundle.txt"), Mode::Preview),
            vec!["[DRY RUN] Parsing bundle.txt..."]
        );
        assert_eq!(
            format_parse_start(Path::new("bundle.txt"), Mode::Write),
            vec!["Parsing bundle.txt..."]
        );
    }

    #[test]
    fn skipped_sections_listed_only_in_preview() {
        let outcome = ParseOutcome {
            skipped: vec!["App.tsx".to_string()],
            ..Default::default()
        };
        assert_eq!(
            format_skipped(&outcome, Mode::Preview),
            vec!["[DRY RUN] Skipping legacy section: App.tsx"]
        );
        assert!(format_skipped(&outcome, Mode::Write).is_empty());
    }

    #[test]
    fn structure_tree_is_indented_by_depth() {
        let records = vec![
            record("package.json", "{}\n"),
            record("src/index.ts", "x\n"),
            record("src/lib/util.ts", "y\n"),
        ];
        let report = analyze(&records, 1000);
        let lines = format_structure(&report, Path::new("out"), Mode::Write);
        assert_eq!(lines[1], "Project Structure Analysis:");
        assert_eq!(lines[2], "=".repeat(60));
        assert_eq!(
            &lines[3..9],
            &[
                "out/",
                "  package.json",
                "  src/",
                "    index.ts",
                "    lib/",
                "      util.ts",
            ]
        );
        assert!(lines.contains(&"  Total files: 3".to_string()));
        assert!(lines.contains(&"  Total directories: 3".to_string()));
        assert!(lines.contains(&"  .json: 1 file(s)".to_string()));
        assert!(lines.contains(&"  .ts: 2 file(s)".to_string()));
    }

    #[test]
    fn structure_root_label_when_directory_is_empty() {
        let records = vec![crate::types::FileRecord {
            relative_path: "a.txt".to_string(),
            path: PathBuf::from("a.txt"),
            content: "a\n".to_string(),
            approx_source_line: 1,
        }];
        let report = analyze(&records, 1000);
        let lines = format_structure(&report, Path::new("study-buddy"), Mode::Preview);
        assert_eq!(lines[1], "[DRY RUN] Project Structure Analysis:");
        assert_eq!(lines[3], "study-buddy (root)/");
        assert_eq!(lines[4], "  a.txt");
    }

    #[test]
    fn validation_ok() {
        let report = analyze(&[record("a.ts", "a\n")], 1000);
        let lines = format_validation(&report, Mode::Write);
        assert_eq!(lines.last().unwrap(), "[OK] No issues found!");
    }

    #[test]
    fn validation_lists_issues() {
        let records = vec![
            record("a.ts", "1\n"),
            record("a.ts", "2\n"),
            record("big.ts", &"x".repeat(20)),
        ];
        let report = analyze(&records, 10);
        let lines = format_validation(&report, Mode::Preview);
        assert_eq!(lines[1], "[DRY RUN] Validation Results:");
        assert_eq!(lines[3], "[WARN] Issues found:");
        assert_eq!(lines[4], "  - Duplicate file paths: out/a.ts");
        assert_eq!(lines[5], "  - Large file detected: out/big.ts (20 bytes)");
    }

    #[test]
    fn issue_empty_files_joined() {
        let issue = Issue::EmptyFiles(vec![PathBuf::from("a"), PathBuf::from("b")]);
        assert_eq!(format_issue(&issue), "Empty files detected: a, b");
    }

    #[test]
    fn event_preview_file() {
        let lines = format_event(&MaterializeEvent::File {
            path: PathBuf::from("out/a.ts"),
            size: 12,
            preview: "x\\n".to_string(),
            approx_source_line: 7,
            written: false,
        });
        assert_eq!(
            lines,
            vec![
                "[DRY RUN] Would create file: out/a.ts",
                "          Size: 12 bytes",
                "          Preview: x\\n",
                "          Source lines: around 7",
                "",
            ]
        );
    }

    #[test]
    fn event_written_file_and_directory() {
        let dir = format_event(&MaterializeEvent::Directory {
            path: PathBuf::from("out/src"),
            created: true,
        });
        assert_eq!(dir, vec!["Created directory: out/src"]);
        let file = format_event(&MaterializeEvent::File {
            path: PathBuf::from("out/src/a.ts"),
            size: 3,
            preview: String::new(),
            approx_source_line: 1,
            written: true,
        });
        assert_eq!(file, vec!["Created file: out/src/a.ts (3 bytes)"]);
    }

    #[test]
    fn event_preview_directory() {
        let dir = format_event(&MaterializeEvent::Directory {
            path: PathBuf::from("out"),
            created: false,
        });
        assert_eq!(dir, vec!["[DRY RUN] Would create directory: out"]);
    }

    #[test]
    fn completion_messages() {
        assert_eq!(
            format_completion(3, Mode::Preview)[1],
            "[DRY RUN COMPLETE] No files were created."
        );
        assert_eq!(
            format_completion(3, Mode::Write)[1],
            "[OK] Successfully created 3 files!"
        );
    }

    #[test]
    fn failure_includes_last_line_when_known() {
        assert_eq!(
            format_failure("boom", 42),
            vec!["", "[ERROR] boom", "   Last processed line: 42"]
        );
        assert_eq!(format_failure("boom", 0), vec!["", "[ERROR] boom"]);
    }
}
