//! Splitter configuration.
//!
//! Handles loading, validating, and merging `splitdoc.toml`. Stock defaults
//! describe the two built-in profiles; a user file overrides any subset of
//! them, and CLI flags override both.
//!
//! ## Config File Location
//!
//! `splitdoc.toml` in the current directory is picked up automatically.
//! `--config <FILE>` points at a specific file instead (which must exist).
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown for the `tests` profile
//!
//! [tests]
//! input_file = "study-buddy-testing.txt"
//! output_dir = "study-buddy-tests"
//! header_prefix = "## study-buddy-tests/"
//! skip_paths = []
//! large_file_threshold = 50000
//!
//! [tests.rewrite]
//! rules = []
//! literals = []
//! ```
//!
//! Rewrite tables are lists of rules and literals. The `app` profile ships
//! with rules of this shape:
//!
//! ```toml
//! [[app.rewrite.rules]]
//! pattern = "from\\s+['\"]@utils/"
//! replacement = "from '@/app/lib/"
//!
//! [[app.rewrite.literals]]
//! from = "require('../assets/animations/"
//! to = "require('../../assets/animations/"
//! ```
//!
//! ## Partial Configuration
//!
//! Tables merge key by key. Arrays (`skip_paths`, `rules`, `literals`)
//! replace the stock array wholesale, so listing one rule drops the stock
//! rules of that profile:
//!
//! ```toml
//! [app]
//! output_dir = "mobile"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::filter::SkipSet;
use crate::rewrite::{LiteralReplacement, RewriteRule, Rewriter};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// File name looked up in the working directory when `--config` is absent.
pub const CONFIG_FILE_NAME: &str = "splitdoc.toml";

/// Files larger than this many bytes are flagged by the report.
pub const DEFAULT_LARGE_FILE_THRESHOLD: usize = 50_000;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),
    #[error("Config validation error: {0}")]
    Validation(String),
    #[error("Invalid rewrite pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Which built-in variant of the splitter to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Application sources: legacy skip-list and import rewriting.
    App,
    /// Test sources: configurable header prefix, no rewriting.
    Tests,
}

impl Profile {
    pub fn name(self) -> &'static str {
        match self {
            Profile::App => "app",
            Profile::Tests => "tests",
        }
    }
}

/// Top-level configuration: one table per profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SplitConfig {
    pub app: ProfileConfig,
    pub tests: ProfileConfig,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            app: ProfileConfig::app(),
            tests: ProfileConfig::tests(),
        }
    }
}

impl SplitConfig {
    pub fn profile(&self, profile: Profile) -> &ProfileConfig {
        match profile {
            Profile::App => &self.app,
            Profile::Tests => &self.tests,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.app.validate()?;
        self.tests.validate()
    }
}

/// Settings for a single profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProfileConfig {
    /// Consolidated document read when no input is given on the command line.
    pub input_file: String,
    /// Directory the extracted tree is rooted at.
    pub output_dir: String,
    /// Literal prefix marking a section header; the path follows it.
    pub header_prefix: String,
    /// Relative paths whose sections are dropped entirely.
    pub skip_paths: Vec<String>,
    /// Size in bytes above which a file is reported as large.
    pub large_file_threshold: usize,
    /// Content rewriting applied to every extracted file.
    #[serde(default)]
    pub rewrite: RewriteConfig,
}

impl ProfileConfig {
    /// Stock settings for application sources.
    pub fn app() -> Self {
        Self {
            input_file: "study-buddy-app newer.txt".to_string(),
            output_dir: "study-buddy".to_string(),
            header_prefix: "## study-buddy/".to_string(),
            skip_paths: [
                "src/utils/constants.ts",
                "src/utils/i18n.ts",
                "src/utils/speech.ts",
                "src/utils/photoManager.ts",
                "src/utils/storage.ts",
                "src/utils/audio.ts",
                "src/utils/peerLines.ts",
                "src/utils/voice.ts",
                "App.tsx",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            large_file_threshold: DEFAULT_LARGE_FILE_THRESHOLD,
            rewrite: RewriteConfig::expo_router(),
        }
    }

    /// Stock settings for test sources.
    pub fn tests() -> Self {
        Self {
            input_file: "study-buddy-testing.txt".to_string(),
            output_dir: "study-buddy-tests".to_string(),
            header_prefix: "## study-buddy-tests/".to_string(),
            skip_paths: Vec::new(),
            large_file_threshold: DEFAULT_LARGE_FILE_THRESHOLD,
            rewrite: RewriteConfig::default(),
        }
    }

    pub fn skip_set(&self) -> SkipSet {
        SkipSet::new(self.skip_paths.iter().cloned())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_header_prefix(&self.header_prefix)?;
        if self.large_file_threshold == 0 {
            return Err(ConfigError::Validation(
                "large_file_threshold must be greater than zero".into(),
            ));
        }
        self.rewrite.build()?;
        Ok(())
    }
}

/// An empty prefix would turn every line into a header.
pub fn validate_header_prefix(prefix: &str) -> Result<(), ConfigError> {
    if prefix.is_empty() {
        return Err(ConfigError::Validation(
            "header_prefix must not be empty".into(),
        ));
    }
    Ok(())
}

/// Rewrite tables as written in the config file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RewriteConfig {
    /// Regex rules, applied in order.
    pub rules: Vec<RuleConfig>,
    /// Literal substring replacements, applied after the rules.
    pub literals: Vec<LiteralConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleConfig {
    pub pattern: String,
    pub replacement: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LiteralConfig {
    pub from: String,
    pub to: String,
}

impl RewriteConfig {
    /// Alias imports (`@utils/`, `@ui/`, ...) rewritten to the `@/` root alias
    /// used by an Expo Router layout.
    pub fn expo_router() -> Self {
        let rules = [
            (r#"from\s+['"]@utils/"#, "from '@/app/lib/"),
            (r#"from\s+['"]@config/?"#, "from '@/app/lib/config"),
            (r#"from\s+['"]@types/"#, "from '@/app/lib/types/"),
            (r#"from\s+['"]@content/"#, "from '@/app/lib/content/"),
            (r#"from\s+['"]@ui/alerts['"]"#, "from '@/app/lib/ui/alerts'"),
            (r#"from\s+['"]@ui/tokens['"]"#, "from '@/app/lib/ui/tokens'"),
            (r#"from\s+['"]@ui/"#, "from '@/app/lib/ui/"),
            (r#"from\s+['"]@components/"#, "from '@/components/"),
            (r#"from\s+['"]@assets/"#, "from '@/assets/"),
        ]
        .into_iter()
        .map(|(pattern, replacement)| RuleConfig {
            pattern: pattern.to_string(),
            replacement: replacement.to_string(),
        })
        .collect();

        // The asset registry moved one level deeper than the animations it requires.
        let literals = vec![LiteralConfig {
            from: "require('../assets/animations/".to_string(),
            to: "require('../../assets/animations/".to_string(),
        }];

        Self { rules, literals }
    }

    /// Compile into a [`Rewriter`], failing on the first bad pattern.
    pub fn build(&self) -> Result<Rewriter, ConfigError> {
        let rules = self
            .rules
            .iter()
            .map(|r| {
                RewriteRule::new(&r.pattern, r.replacement.clone()).map_err(|source| {
                    ConfigError::Pattern {
                        pattern: r.pattern.clone(),
                        source,
                    }
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let literals = self
            .literals
            .iter()
            .map(|l| LiteralReplacement::new(l.from.clone(), l.to.clone()))
            .collect();
        let rewriter = Rewriter::new(rules, literals);
        for rule in rewriter.rules() {
            debug!(
                pattern = rule.pattern(),
                replacement = rule.replacement(),
                "compiled rewrite rule"
            );
        }
        for literal in rewriter.literals() {
            debug!(from = %literal.from, to = %literal.to, "literal rewrite");
        }
        Ok(rewriter)
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SplitConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay, arrays included, replace base values.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Read a config file as a raw TOML value.
pub fn load_raw_config(path: &Path) -> Result<toml::Value, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Merge an optional overlay onto the stock defaults, then deserialize and validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<SplitConfig, ConfigError> {
    let base = stock_defaults_value();
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SplitConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load configuration.
///
/// With `explicit`, that file must exist. Otherwise `splitdoc.toml` in
/// `working_dir` is used when present, and stock defaults when not.
pub fn load_config(explicit: Option<&Path>, working_dir: &Path) -> Result<SplitConfig, ConfigError> {
    let overlay = match explicit {
        Some(path) => {
            if !path.is_file() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Some(load_raw_config(path)?)
        }
        None => {
            let path = working_dir.join(CONFIG_FILE_NAME);
            if path.is_file() {
                Some(load_raw_config(&path)?)
            } else {
                None
            }
        }
    };
    resolve_config(overlay)
}

/// Returns a fully-commented stock `splitdoc.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r###"# splitdoc configuration
# ======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Tables merge key by key over these defaults. Arrays (skip_paths, rules,
# literals) replace the default array entirely.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# `splitdoc app`: application sources
# ---------------------------------------------------------------------------
[app]
# Consolidated document read when no input file is given.
input_file = "study-buddy-app newer.txt"

# Directory the extracted tree is written under.
output_dir = "study-buddy"

# Lines starting with this prefix open a new file section.
header_prefix = "## study-buddy/"

# Sections with these exact paths are dropped (no normalization, no globs).
skip_paths = [
    "src/utils/constants.ts",
    "src/utils/i18n.ts",
    "src/utils/speech.ts",
    "src/utils/photoManager.ts",
    "src/utils/storage.ts",
    "src/utils/audio.ts",
    "src/utils/peerLines.ts",
    "src/utils/voice.ts",
    "App.tsx",
]

# Files larger than this (bytes) are flagged during validation.
large_file_threshold = 50000

# Regex rewrite rules, applied in order to every extracted file.
# Each rule sees the output of the previous one.
# Replacements may reference capture groups as $1 or ${name}.
[[app.rewrite.rules]]
pattern = "from\\s+['\"]@utils/"
replacement = "from '@/app/lib/"

[[app.rewrite.rules]]
pattern = "from\\s+['\"]@config/?"
replacement = "from '@/app/lib/config"

[[app.rewrite.rules]]
pattern = "from\\s+['\"]@types/"
replacement = "from '@/app/lib/types/"

[[app.rewrite.rules]]
pattern = "from\\s+['\"]@content/"
replacement = "from '@/app/lib/content/"

[[app.rewrite.rules]]
pattern = "from\\s+['\"]@ui/alerts['\"]"
replacement = "from '@/app/lib/ui/alerts'"

[[app.rewrite.rules]]
pattern = "from\\s+['\"]@ui/tokens['\"]"
replacement = "from '@/app/lib/ui/tokens'"

[[app.rewrite.rules]]
pattern = "from\\s+['\"]@ui/"
replacement = "from '@/app/lib/ui/"

[[app.rewrite.rules]]
pattern = "from\\s+['\"]@components/"
replacement = "from '@/components/"

[[app.rewrite.rules]]
pattern = "from\\s+['\"]@assets/"
replacement = "from '@/assets/"

# Literal substring replacements, applied after the rules.
[[app.rewrite.literals]]
from = "require('../assets/animations/"
to = "require('../../assets/animations/"

# ---------------------------------------------------------------------------
# `splitdoc tests`: test sources
# ---------------------------------------------------------------------------
[tests]
input_file = "study-buddy-testing.txt"
output_dir = "study-buddy-tests"
header_prefix = "## study-buddy-tests/"
skip_paths = []
large_file_threshold = 50000
"###
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_app_profile() {
        let config = SplitConfig::default();
        assert_eq!(config.app.header_prefix, "## study-buddy/");
        assert_eq!(config.app.output_dir, "study-buddy");
        assert_eq!(config.app.skip_paths.len(), 9);
        assert_eq!(config.app.rewrite.rules.len(), 9);
        assert_eq!(config.app.rewrite.literals.len(), 1);
    }

    #[test]
    fn default_tests_profile_has_no_rewrites() {
        let config = SplitConfig::default();
        assert_eq!(config.tests.header_prefix, "## study-buddy-tests/");
        assert!(config.tests.skip_paths.is_empty());
        assert_eq!(config.tests.rewrite, RewriteConfig::default());
    }

    #[test]
    fn profile_lookup() {
        let config = SplitConfig::default();
        assert_eq!(config.profile(Profile::App).output_dir, "study-buddy");
        assert_eq!(config.profile(Profile::Tests).output_dir, "study-buddy-tests");
        assert_eq!(Profile::Tests.name(), "tests");
    }

    #[test]
    fn stock_config_toml_matches_defaults() {
        let value: toml::Value = toml::from_str(stock_config_toml()).unwrap();
        let parsed: SplitConfig = value.try_into().unwrap();
        assert_eq!(parsed, SplitConfig::default());
    }

    #[test]
    fn tests_profile_has_no_rewrites() {
        assert_eq!(ProfileConfig::tests().rewrite, RewriteConfig::default());
        assert!(ProfileConfig::tests().rewrite.build().unwrap().is_empty());
    }

    #[test]
    fn build_keeps_rule_and_literal_order() {
        let config = RewriteConfig::expo_router();
        let rewriter = config.build().unwrap();
        assert_eq!(rewriter.rules().len(), config.rules.len());
        assert_eq!(rewriter.rules()[0].pattern(), config.rules[0].pattern);
        assert_eq!(rewriter.rules()[0].replacement(), "from '@/app/lib/");
        assert_eq!(rewriter.literals()[0].from, "require('../assets/animations/");
    }

    #[test]
    fn validate_default_config_passes() {
        assert!(SplitConfig::default().validate().is_ok());
    }

    #[test]
    fn skip_set_from_profile() {
        let skip = ProfileConfig::app().skip_set();
        assert!(skip.is_suppressed("App.tsx"));
        assert!(!skip.is_suppressed("app/index.tsx"));
    }

    // =========================================================================
    // Merging
    // =========================================================================

    #[test]
    fn merge_toml_scalar_override() {
        let base: toml::Value = toml::from_str("a = 1\nb = 2").unwrap();
        let overlay: toml::Value = toml::from_str("b = 3").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["a"].as_integer(), Some(1));
        assert_eq!(merged["b"].as_integer(), Some(3));
    }

    #[test]
    fn merge_toml_arrays_replace() {
        let base: toml::Value = toml::from_str("xs = [1, 2, 3]").unwrap();
        let overlay: toml::Value = toml::from_str("xs = [9]").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["xs"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn partial_overlay_keeps_other_keys() {
        let overlay: toml::Value = toml::from_str("[app]\noutput_dir = \"mobile\"").unwrap();
        let config = resolve_config(Some(overlay)).unwrap();
        assert_eq!(config.app.output_dir, "mobile");
        assert_eq!(config.app.header_prefix, "## study-buddy/");
        assert_eq!(config.app.rewrite.rules.len(), 9);
        assert_eq!(config.tests, ProfileConfig::tests());
    }

    #[test]
    fn overlay_rules_replace_stock_rules() {
        let overlay: toml::Value = toml::from_str(
            r#"
[[app.rewrite.rules]]
pattern = "@old/"
replacement = "@new/"
"#,
        )
        .unwrap();
        let config = resolve_config(Some(overlay)).unwrap();
        assert_eq!(config.app.rewrite.rules.len(), 1);
        assert_eq!(config.app.rewrite.literals.len(), 1);
        let rw = config.app.rewrite.build().unwrap();
        assert_eq!(rw.apply("x @old/y"), "x @new/y");
    }

    #[test]
    fn unknown_key_rejected() {
        let overlay: toml::Value = toml::from_str("[app]\nheader = \"## x/\"").unwrap();
        assert!(matches!(
            resolve_config(Some(overlay)),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn unknown_profile_rejected() {
        let overlay: toml::Value = toml::from_str("[docs]\noutput_dir = \"d\"").unwrap();
        assert!(matches!(
            resolve_config(Some(overlay)),
            Err(ConfigError::Toml(_))
        ));
    }

    // =========================================================================
    // Validation
    // =========================================================================

    #[test]
    fn empty_header_prefix_rejected() {
        let overlay: toml::Value = toml::from_str("[tests]\nheader_prefix = \"\"").unwrap();
        assert!(matches!(
            resolve_config(Some(overlay)),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn zero_threshold_rejected() {
        let mut profile = ProfileConfig::tests();
        profile.large_file_threshold = 0;
        assert!(matches!(
            profile.validate(),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn bad_pattern_rejected() {
        let overlay: toml::Value = toml::from_str(
            r#"
[[tests.rewrite.rules]]
pattern = "from\\s+("
replacement = "x"
"#,
        )
        .unwrap();
        let err = resolve_config(Some(overlay)).unwrap_err();
        match err {
            ConfigError::Pattern { pattern, .. } => assert_eq!(pattern, "from\\s+("),
            other => panic!("expected pattern error, got {other:?}"),
        }
    }

    // =========================================================================
    // Loading from disk
    // =========================================================================

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(None, tmp.path()).unwrap();
        assert_eq!(config, SplitConfig::default());
    }

    #[test]
    fn load_config_reads_working_dir_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE_NAME),
            "[tests]\nheader_prefix = \"## e2e/\"\n",
        )
        .unwrap();
        let config = load_config(None, tmp.path()).unwrap();
        assert_eq!(config.tests.header_prefix, "## e2e/");
    }

    #[test]
    fn load_config_explicit_path() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("custom.toml");
        fs::write(&path, "[app]\nlarge_file_threshold = 10\n").unwrap();
        let config = load_config(Some(&path), Path::new("/nonexistent")).unwrap();
        assert_eq!(config.app.large_file_threshold, 10);
    }

    #[test]
    fn load_config_explicit_missing_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("missing.toml");
        assert!(matches!(
            load_config(Some(&path), tmp.path()),
            Err(ConfigError::NotFound(_))
        ));
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE_NAME), "this is not valid toml [[[").unwrap();
        assert!(matches!(
            load_config(None, tmp.path()),
            Err(ConfigError::Toml(_))
        ));
    }
}
