//! Skip-list of destination paths that must never produce output.
//!
//! Matching is exact string equality against the path text after the header
//! prefix. No normalization, no globbing: `./App.tsx` and `App.tsx` are
//! different entries.

use std::collections::HashSet;

/// Set of relative paths whose sections are suppressed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkipSet {
    paths: HashSet<String>,
}

impl SkipSet {
    /// An empty skip-set; nothing is suppressed.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether a section with this relative path is suppressed.
    pub fn is_suppressed(&self, path: &str) -> bool {
        self.paths.contains(path)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_set_suppresses_nothing() {
        let skip = SkipSet::empty();
        assert!(skip.is_empty());
        assert!(!skip.is_suppressed("App.tsx"));
    }

    #[test]
    fn exact_match_is_suppressed() {
        let skip = SkipSet::new(["App.tsx", "src/utils/i18n.ts"]);
        assert_eq!(skip.len(), 2);
        assert!(skip.is_suppressed("App.tsx"));
        assert!(skip.is_suppressed("src/utils/i18n.ts"));
    }

    #[test]
    fn no_normalization_is_applied() {
        let skip = SkipSet::new(["App.tsx"]);
        assert!(!skip.is_suppressed("./App.tsx"));
        assert!(!skip.is_suppressed("app.tsx"));
        assert!(!skip.is_suppressed("App.tsx "));
        assert!(!skip.is_suppressed("src/App.tsx"));
    }
}
