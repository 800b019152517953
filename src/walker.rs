//! Recursive traversal producing the eligible file set.
//!
//! Every entry the walk touches, other than directories it descends into, ends
//! in exactly one [`EntryOutcome`]. Ignored entries are pruned before descent
//! (an ignored directory is never entered). Symlinked directories that are not
//! followed count as ignored. Surviving files go through the size, binary and
//! decoding checks in that order.

use crate::binary::BinaryClassifier;
use crate::error::CortxtError;
use crate::ignore_rules::{IgnoreMatcher, IgnoreRules};
use crate::options::CortxtOptions;
use ignore::WalkBuilder;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Why an entry was or was not included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryOutcome {
    Included,
    SkippedBinary,
    SkippedOversized,
    SkippedUnreadable,
    SkippedIgnored,
}

impl EntryOutcome {
    /// Whether the outcome adds to [`ScanResult::skipped`]. Ignored entries do not.
    pub fn counts_as_skipped(self) -> bool {
        matches!(
            self,
            EntryOutcome::SkippedBinary
                | EntryOutcome::SkippedOversized
                | EntryOutcome::SkippedUnreadable
        )
    }
}

/// One visited entry. Content for included files lives in
/// [`ScanResult::content_by_path`] under the same `relative_path`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileRecord {
    /// Path relative to the root, `/`-separated.
    pub relative_path: String,
    pub absolute_path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    pub is_binary: bool,
    pub outcome: EntryOutcome,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ScanResult {
    /// Included files in traversal order.
    pub content_by_path: IndexMap<String, String>,
    /// Entries dropped as binary, oversized or unreadable.
    pub skipped: usize,
    pub records: Vec<FileRecord>,
}

impl ScanResult {
    pub fn is_empty(&self) -> bool {
        self.content_by_path.is_empty()
    }

    /// Sum of included content lengths in bytes.
    pub fn total_bytes(&self) -> usize {
        self.content_by_path.values().map(String::len).sum()
    }

    pub fn count(&self, outcome: EntryOutcome) -> usize {
        self.records.iter().filter(|r| r.outcome == outcome).count()
    }

    pub fn outcome_of(&self, relative_path: &str) -> Option<EntryOutcome> {
        self.records
            .iter()
            .find(|r| r.relative_path == relative_path)
            .map(|r| r.outcome)
    }

    /// `(path, content)` pairs in traversal order.
    pub fn files(&self) -> Vec<(String, String)> {
        self.content_by_path
            .iter()
            .map(|(p, c)| (p.clone(), c.clone()))
            .collect()
    }

    fn push(&mut self, record: FileRecord, content: Option<String>) {
        if record.outcome.counts_as_skipped() {
            self.skipped += 1;
        }
        if let Some(content) = content {
            self.content_by_path
                .insert(record.relative_path.clone(), content);
        }
        self.records.push(record);
    }
}

/// Resolves the traversal root, failing if it is not an existing directory.
pub fn resolve_root(root: &Path) -> Result<PathBuf, CortxtError> {
    match fs::canonicalize(root) {
        Ok(path) if path.is_dir() => Ok(path),
        _ => Err(CortxtError::RootNotFound(root.to_path_buf())),
    }
}

pub(crate) fn relative_key(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}

pub struct Walker<'a> {
    options: &'a CortxtOptions,
    matcher: IgnoreMatcher,
    classifier: BinaryClassifier,
}

impl<'a> Walker<'a> {
    /// Builds a walker over `options.root` using `rules`.
    pub fn new(options: &'a CortxtOptions, rules: IgnoreRules) -> Result<Self, CortxtError> {
        let root = resolve_root(&options.root)?;
        Ok(Self {
            options,
            matcher: IgnoreMatcher::new(root, rules),
            classifier: BinaryClassifier::new(options.binary_detection),
        })
    }

    pub fn root(&self) -> &Path {
        self.matcher.root()
    }

    pub fn scan(&self) -> Result<ScanResult, CortxtError> {
        let root = self.root().to_path_buf();
        tracing::debug!("Scanning {}", root.display());

        let pruned: Arc<Mutex<Vec<FileRecord>>> = Arc::default();
        let mut builder = WalkBuilder::new(&root);
        builder
            .standard_filters(false)
            .git_ignore(self.options.respect_gitignore)
            .git_exclude(self.options.respect_gitignore)
            .require_git(false)
            .follow_links(self.options.follow_links);
        {
            let matcher = self.matcher.clone();
            let pruned = Arc::clone(&pruned);
            builder.filter_entry(move |entry| {
                if entry.depth() == 0 {
                    return true;
                }
                let name = entry.file_name().to_string_lossy();
                if !matcher.is_ignored(entry.path(), &name) {
                    return true;
                }
                let record = FileRecord {
                    relative_path: relative_key(matcher.root(), entry.path()),
                    absolute_path: entry.path().to_path_buf(),
                    size: None,
                    is_binary: false,
                    outcome: EntryOutcome::SkippedIgnored,
                };
                pruned
                    .lock()
                    .unwrap_or_else(|poisoned| poisoned.into_inner())
                    .push(record);
                false
            });
        }

        let mut result = ScanResult::default();
        for entry in builder.build() {
            drain_pruned(&pruned, &mut result);
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Skipping entry: {}", e);
                    result.skipped += 1;
                    if let Some(path) = error_path(&e) {
                        result.records.push(FileRecord {
                            relative_path: relative_key(&root, &path),
                            absolute_path: path,
                            size: None,
                            is_binary: false,
                            outcome: EntryOutcome::SkippedUnreadable,
                        });
                    }
                    continue;
                }
            };
            if entry.depth() == 0 || entry.file_type().is_some_and(|t| t.is_dir()) {
                continue;
            }
            let (record, content) = self.visit_file(entry.path());
            result.push(record, content);
        }
        drain_pruned(&pruned, &mut result);

        tracing::debug!(
            "Scan finished: {} included, {} skipped, {} ignored",
            result.content_by_path.len(),
            result.skipped,
            result.count(EntryOutcome::SkippedIgnored)
        );
        Ok(result)
    }

    /// Applies size, binary and decoding policy to one file.
    fn visit_file(&self, path: &Path) -> (FileRecord, Option<String>) {
        let mut record = FileRecord {
            relative_path: relative_key(self.root(), path),
            absolute_path: path.to_path_buf(),
            size: None,
            is_binary: false,
            outcome: EntryOutcome::SkippedUnreadable,
        };
        let metadata = match fs::metadata(path) {
            Ok(m) => m,
            Err(e) => {
                tracing::warn!("Skipping {}: {}", record.relative_path, e);
                return (record, None);
            }
        };
        if metadata.is_dir() {
            tracing::debug!("Not following symlinked directory {}", record.relative_path);
            record.outcome = EntryOutcome::SkippedIgnored;
            return (record, None);
        }
        record.size = Some(metadata.len());

        if metadata.len() > self.options.max_file_size && !self.options.force_include_all {
            tracing::debug!(
                "Skipping {}: {} bytes exceeds {}",
                record.relative_path,
                metadata.len(),
                self.options.max_file_size
            );
            record.outcome = EntryOutcome::SkippedOversized;
            return (record, None);
        }
        if self.classifier.has_binary_extension(path) {
            record.is_binary = true;
            record.outcome = EntryOutcome::SkippedBinary;
            return (record, None);
        }
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!("Skipping {}: {}", record.relative_path, e);
                return (record, None);
            }
        };
        match self.classifier.decode(bytes) {
            Some(content) => {
                record.outcome = EntryOutcome::Included;
                (record, Some(content))
            }
            None => {
                tracing::debug!("Binary content detected: {}", record.relative_path);
                record.is_binary = true;
                record.outcome = EntryOutcome::SkippedBinary;
                (record, None)
            }
        }
    }
}

fn drain_pruned(pruned: &Mutex<Vec<FileRecord>>, result: &mut ScanResult) {
    let mut pruned = pruned
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    result.records.append(&mut pruned);
}

fn error_path(err: &ignore::Error) -> Option<PathBuf> {
    match err {
        ignore::Error::WithPath { path, .. } => Some(path.clone()),
        ignore::Error::WithDepth { err, .. } | ignore::Error::WithLineNumber { err, .. } => {
            error_path(err)
        }
        ignore::Error::Loop { child, .. } => Some(child.clone()),
        _ => None,
    }
}

/// Scans `options.root` with an explicit rule set.
pub fn scan(options: &CortxtOptions, rules: IgnoreRules) -> Result<ScanResult, CortxtError> {
    Walker::new(options, rules)?.scan()
}
