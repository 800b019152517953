//! Ignore rules and the predicate deciding whether a filesystem entry is excluded.
//!
//! A rule set is either the built-in defaults or the patterns read from a
//! `.cortxtignore` file, never a mix of both. On top of whichever set is active
//! a small safety net of directories and lockfiles is always excluded.

use crate::error::CortxtError;
use globset::{GlobBuilder, GlobMatcher};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Name of the per-project custom rule file.
pub const IGNORE_FILE_NAME: &str = ".cortxtignore";

/// Rules used when no usable custom rule file exists.
pub const DEFAULT_PATTERNS: &[&str] = &[
    "node_modules",
    ".git",
    "dist",
    "build",
    ".cache",
    "coverage",
    ".nyc_output",
    "*.log",
    ".DS_Store",
    "Thumbs.db",
    "package-lock.json",
    "yarn.lock",
    "pnpm-lock.yaml",
    ".env*",
    "*.tmp",
    "*.temp",
];

/// Directory names excluded regardless of the active rule set.
pub const SAFETY_NET_DIRS: &[&str] = &["node_modules", ".git", "dist", "build"];
/// Lockfile names excluded regardless of the active rule set.
pub const SAFETY_NET_FILES: &[&str] = &["package-lock.json", "yarn.lock"];

const IGNORE_FILE_HEADER: &str = "# Cortxt Ignore Patterns
# This file specifies which files and directories to ignore when using cortxt commands
# Each line should contain one pattern (supports * and ? wildcards)
# Lines starting with # are comments

";

/// A single ignore pattern. Patterns containing `*` or `?` are globs, anything
/// else is matched literally.
#[derive(Debug, Clone)]
pub enum IgnoreRule {
    Literal(String),
    Glob {
        pattern: String,
        matcher: GlobMatcher,
    },
}

impl IgnoreRule {
    /// Builds a rule from a raw pattern. Returns `None` for blank patterns or
    /// globs that cannot be compiled.
    pub fn parse(pattern: &str) -> Option<Self> {
        let pattern = pattern.trim();
        if pattern.is_empty() {
            return None;
        }
        if !has_wildcard(pattern) {
            return Some(IgnoreRule::Literal(pattern.to_string()));
        }
        match compile_glob(pattern) {
            Ok(matcher) => Some(IgnoreRule::Glob {
                pattern: pattern.to_string(),
                matcher,
            }),
            Err(e) => {
                tracing::warn!("Dropping ignore pattern '{}': {}", pattern, e);
                None
            }
        }
    }

    pub fn pattern(&self) -> &str {
        match self {
            IgnoreRule::Literal(p) => p,
            IgnoreRule::Glob { pattern, .. } => pattern,
        }
    }

    pub fn is_glob(&self) -> bool {
        matches!(self, IgnoreRule::Glob { .. })
    }

    fn matches(&self, forms: &PathForms<'_>) -> bool {
        match self {
            IgnoreRule::Glob { matcher, .. } => {
                matcher.is_match(forms.name)
                    || matcher.is_match(&forms.relative)
                    || matcher.is_match(&forms.absolute)
            }
            IgnoreRule::Literal(p) => {
                forms.name == p.as_str()
                    || forms.relative.contains(p.as_str())
                    || forms.absolute.contains(p.as_str())
            }
        }
    }
}

fn has_wildcard(pattern: &str) -> bool {
    pattern.contains(['*', '?'])
}

/// Compiles an anchored matcher where `*` is any sequence (separators included),
/// `?` any single character, and every other glob metacharacter is literal.
fn compile_glob(pattern: &str) -> Result<GlobMatcher, globset::Error> {
    let mut escaped = String::with_capacity(pattern.len() * 2);
    let mut prev_star = false;
    for c in pattern.chars() {
        match c {
            // Runs of `*` collapse to one; `**` has path semantics in globset.
            '*' if prev_star => continue,
            '*' => escaped.push('*'),
            '?' => escaped.push('?'),
            '[' | ']' | '{' | '}' | '\\' => {
                escaped.push('\\');
                escaped.push(c);
            }
            _ => escaped.push(c),
        }
        prev_star = c == '*';
    }
    let glob = GlobBuilder::new(&escaped)
        .literal_separator(false)
        .backslash_escape(true)
        .build()?;
    Ok(glob.compile_matcher())
}

/// Where the active rule set came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleSource {
    Default,
    Custom(PathBuf),
}

/// An ordered rule set.
#[derive(Debug, Clone)]
pub struct IgnoreRules {
    rules: Vec<IgnoreRule>,
    source: RuleSource,
}

impl IgnoreRules {
    pub fn defaults() -> Self {
        Self {
            rules: DEFAULT_PATTERNS
                .iter()
                .filter_map(|p| IgnoreRule::parse(p))
                .collect(),
            source: RuleSource::Default,
        }
    }

    /// Builds a custom rule set. Falls back to the defaults when no pattern
    /// survives parsing.
    pub fn custom<I, S>(patterns: I, origin: impl Into<PathBuf>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let rules: Vec<IgnoreRule> = patterns
            .into_iter()
            .filter_map(|p| IgnoreRule::parse(p.as_ref()))
            .collect();
        if rules.is_empty() {
            return Self::defaults();
        }
        Self {
            rules,
            source: RuleSource::Custom(origin.into()),
        }
    }

    /// Loads the rule file at `path`. Never fails: a missing, unreadable or
    /// empty file yields the default rules.
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(text) => {
                let patterns = parse_patterns(&text);
                if patterns.is_empty() {
                    tracing::debug!("{} has no patterns, using defaults", path.display());
                }
                Self::custom(patterns, path)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Self::defaults(),
            Err(e) => {
                tracing::warn!(
                    "Could not read {}, using default ignore rules: {}",
                    path.display(),
                    e
                );
                Self::defaults()
            }
        }
    }

    pub fn rules(&self) -> &[IgnoreRule] {
        &self.rules
    }

    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(IgnoreRule::pattern)
    }

    pub fn source(&self) -> &RuleSource {
        &self.source
    }

    pub fn is_default(&self) -> bool {
        self.source == RuleSource::Default
    }
}

impl Default for IgnoreRules {
    fn default() -> Self {
        Self::defaults()
    }
}

/// Splits rule-file text into patterns, dropping blanks and `#` comments.
pub fn parse_patterns(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(String::from)
        .collect()
}

struct PathForms<'a> {
    name: &'a str,
    relative: String,
    absolute: String,
}

fn normalize(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Decides whether an entry under a traversal root is excluded.
#[derive(Debug, Clone)]
pub struct IgnoreMatcher {
    root: PathBuf,
    rules: IgnoreRules,
}

impl IgnoreMatcher {
    pub fn new(root: impl Into<PathBuf>, rules: IgnoreRules) -> Self {
        Self {
            root: root.into(),
            rules,
        }
    }

    /// Matcher for `root` using the rule file at `ignore_file`.
    pub fn from_file(root: impl Into<PathBuf>, ignore_file: &Path) -> Self {
        Self::new(root, IgnoreRules::load(ignore_file))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn rules(&self) -> &IgnoreRules {
        &self.rules
    }

    /// True if the entry at `path` (named `name`) must be excluded.
    pub fn is_ignored(&self, path: &Path, name: &str) -> bool {
        let relative_path = path.strip_prefix(&self.root).unwrap_or(path);
        if is_safety_net(relative_path, name) {
            return true;
        }
        let forms = PathForms {
            name,
            relative: normalize(relative_path),
            absolute: normalize(path),
        };
        self.rules.rules.iter().any(|rule| rule.matches(&forms))
    }
}

fn is_safety_net(relative_path: &Path, name: &str) -> bool {
    SAFETY_NET_FILES.contains(&name)
        || relative_path.components().any(|c| {
            c.as_os_str()
                .to_str()
                .is_some_and(|segment| SAFETY_NET_DIRS.contains(&segment))
        })
}

/// Result of adding a pattern to the rule file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    AlreadyPresent,
}

/// Result of removing a pattern from the rule file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed,
    PatternNotFound,
    NoIgnoreFile,
}

/// Reads the patterns stored in a rule file, or `None` if there is no file.
pub fn read_ignore_file(path: &Path) -> Result<Option<Vec<String>>, CortxtError> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(parse_patterns(&text))),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(CortxtError::io(path, e)),
    }
}

/// Renders a rule file with its comment header.
pub fn render_ignore_file(patterns: &[String]) -> String {
    let mut out = String::from(IGNORE_FILE_HEADER);
    for pattern in patterns {
        out.push_str(pattern);
        out.push('\n');
    }
    out
}

fn write_ignore_file(path: &Path, patterns: &[String]) -> Result<(), CortxtError> {
    fs::write(path, render_ignore_file(patterns)).map_err(|e| CortxtError::io(path, e))
}

fn default_pattern_list() -> Vec<String> {
    DEFAULT_PATTERNS.iter().map(|p| p.to_string()).collect()
}

/// Appends `pattern`. A missing file is first seeded with the defaults so the
/// new rule extends them instead of replacing them.
pub fn add_pattern(path: &Path, pattern: &str) -> Result<AddOutcome, CortxtError> {
    let pattern = pattern.trim();
    let mut patterns = read_ignore_file(path)?.unwrap_or_else(default_pattern_list);
    if patterns.iter().any(|p| p == pattern) {
        return Ok(AddOutcome::AlreadyPresent);
    }
    patterns.push(pattern.to_string());
    write_ignore_file(path, &patterns)?;
    tracing::debug!("Added '{}' to {}", pattern, path.display());
    Ok(AddOutcome::Added)
}

pub fn remove_pattern(path: &Path, pattern: &str) -> Result<RemoveOutcome, CortxtError> {
    let pattern = pattern.trim();
    let Some(mut patterns) = read_ignore_file(path)? else {
        return Ok(RemoveOutcome::NoIgnoreFile);
    };
    let before = patterns.len();
    patterns.retain(|p| p != pattern);
    if patterns.len() == before {
        return Ok(RemoveOutcome::PatternNotFound);
    }
    write_ignore_file(path, &patterns)?;
    Ok(RemoveOutcome::Removed)
}

/// Rewrites the rule file with the default patterns.
pub fn reset_ignore_file(path: &Path) -> Result<(), CortxtError> {
    write_ignore_file(path, &default_pattern_list())
}
