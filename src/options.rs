use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Files larger than this are skipped unless everything is forced in.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 1024 * 1024;
/// Raw content total above which budgeting engages.
pub const DEFAULT_ACTIVATION_THRESHOLD: usize = 500_000;
/// Per-file cap applied while budgeting.
pub const DEFAULT_TRUNCATE_CAP: usize = 5_000;
/// Output ceiling in kilobytes.
pub const DEFAULT_MAX_TOTAL_KB: usize = 400;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryDetection {
    /// Known binary extensions, plus content that is not valid UTF-8.
    #[default]
    Simple,
    /// `Simple`, plus a `content_inspector` pass over the leading bytes.
    Accurate,
}
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CortxtOptions {
    pub root: PathBuf,
    pub force_include_all: bool,
    pub max_total_kb: usize,
    pub max_file_size: u64,
    pub truncate_cap: usize,
    pub activation_threshold: usize,
    pub binary_detection: BinaryDetection,
    pub follow_links: bool,
    pub respect_gitignore: bool,
    /// Custom rule file. `None` means `<root>/.cortxtignore`.
    pub ignore_file: Option<PathBuf>,
}
impl Default for CortxtOptions {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            force_include_all: false,
            max_total_kb: DEFAULT_MAX_TOTAL_KB,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            truncate_cap: DEFAULT_TRUNCATE_CAP,
            activation_threshold: DEFAULT_ACTIVATION_THRESHOLD,
            binary_detection: BinaryDetection::Simple,
            follow_links: false,
            respect_gitignore: false,
            ignore_file: None,
        }
    }
}
impl CortxtOptions {
    /// Location of the custom ignore rules for this run.
    pub fn ignore_file_path(&self) -> PathBuf {
        self.ignore_file
            .clone()
            .unwrap_or_else(|| self.root.join(crate::ignore_rules::IGNORE_FILE_NAME))
    }
}
#[derive(Debug, Default)]
pub struct CortxtBuilder {
    options: CortxtOptions,
}
impl CortxtBuilder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            options: CortxtOptions {
                root: root.into(),
                ..Default::default()
            },
        }
    }
    pub fn force_include_all(mut self, yes: bool) -> Self {
        self.options.force_include_all = yes;
        self
    }
    pub fn max_total_kb(mut self, kb: usize) -> Self {
        self.options.max_total_kb = kb;
        self
    }
    pub fn max_file_size(mut self, bytes: u64) -> Self {
        self.options.max_file_size = bytes;
        self
    }
    pub fn truncate_cap(mut self, cap: usize) -> Self {
        self.options.truncate_cap = cap;
        self
    }
    pub fn activation_threshold(mut self, bytes: usize) -> Self {
        self.options.activation_threshold = bytes;
        self
    }
    pub fn binary_detection(mut self, method: BinaryDetection) -> Self {
        self.options.binary_detection = method;
        self
    }
    pub fn follow_links(mut self, yes: bool) -> Self {
        self.options.follow_links = yes;
        self
    }
    pub fn respect_gitignore(mut self, yes: bool) -> Self {
        self.options.respect_gitignore = yes;
        self
    }
    pub fn ignore_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.options.ignore_file = Some(path.into());
        self
    }
    pub fn build(self) -> CortxtOptions {
        self.options
    }
}
