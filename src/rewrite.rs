//! Content rewriting applied to each extracted file.
//!
//! A [`Rewriter`] is an ordered table of regex rules followed by literal
//! substring replacements. Every rule runs over the whole content and sees the
//! output of the rule before it, so rules can compound:
//!
//! ```text
//! from "@ui/alerts"    --rule 5-->  from '@/app/lib/ui/alerts'
//! from "@ui/buttons"   --rule 7-->  from '@/app/lib/ui/buttons"
//! ```
//!
//! The engine knows nothing about imports; the tables live in configuration
//! (see [`crate::config::RewriteConfig`]).

use regex::Regex;
use std::borrow::Cow;

/// A pattern-based rewrite. The replacement uses `regex` syntax, so `$1` and
/// `${name}` expand capture groups.
#[derive(Debug, Clone)]
pub struct RewriteRule {
    pattern: Regex,
    replacement: String,
}

impl RewriteRule {
    pub fn new(pattern: &str, replacement: impl Into<String>) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            replacement: replacement.into(),
        })
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    /// Replace every match in `content`.
    pub fn apply<'a>(&self, content: &'a str) -> Cow<'a, str> {
        self.pattern.replace_all(content, self.replacement.as_str())
    }
}

/// A fixed substring replacement, applied after all pattern rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiteralReplacement {
    pub from: String,
    pub to: String,
}

impl LiteralReplacement {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    pub fn apply<'a>(&self, content: &'a str) -> Cow<'a, str> {
        if self.from.is_empty() || !content.contains(&self.from) {
            Cow::Borrowed(content)
        } else {
            Cow::Owned(content.replace(&self.from, &self.to))
        }
    }
}

/// Ordered rewrite table. An empty rewriter returns content unchanged.
#[derive(Debug, Clone, Default)]
pub struct Rewriter {
    rules: Vec<RewriteRule>,
    literals: Vec<LiteralReplacement>,
}

impl Rewriter {
    /// A rewriter with no rules.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn new(rules: Vec<RewriteRule>, literals: Vec<LiteralReplacement>) -> Self {
        Self { rules, literals }
    }

    pub fn with_rule(mut self, rule: RewriteRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn with_literal(mut self, literal: LiteralReplacement) -> Self {
        self.literals.push(literal);
        self
    }

    pub fn rules(&self) -> &[RewriteRule] {
        &self.rules
    }

    pub fn literals(&self) -> &[LiteralReplacement] {
        &self.literals
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty() && self.literals.is_empty()
    }

    /// Run all rules in order, then all literal replacements in order.
    pub fn apply(&self, content: &str) -> String {
        let mut current = content.to_string();
        for rule in &self.rules {
            current = rule.apply(&current).into_owned();
        }
        for literal in &self.literals {
            current = literal.apply(&current).into_owned();
        }
        current
    }
}
