//! # Cortxt
//!
//! `cortxt` turns a project directory into a single bounded text artifact that
//! can be pasted into an AI assistant's context window.
//!
//! The pipeline walks the project (dropping ignored, oversized, binary and
//! unreadable entries), and when the collected content is too large it keeps a
//! deterministic, priority-ordered and truncated subset that fits a byte budget.
//! The result is rendered as one Markdown document.
//!
//! # Example
//!
//! ```no_run
//! use cortxt::{CortxtBuilder, ContextOutcome, cortxt};
//!
//! let options = CortxtBuilder::new(".")
//!     .max_total_kb(400)
//!     .build();
//!
//! match cortxt(options).expect("Failed to scan directory") {
//!     ContextOutcome::Rendered(report) => {
//!         println!("{}", report.rendered);
//!         eprintln!("{} of {} files", report.final_count(), report.original_count());
//!     }
//!     ContextOutcome::NothingToProcess { .. } => eprintln!("No files found to process"),
//! }
//! ```

mod binary;
pub mod budget;
mod context;
pub mod deps;
mod error;
pub mod extract;
pub mod ignore_rules;
mod options;
pub mod output;
pub mod stats;
pub mod tree;
mod walker;

pub use binary::{BINARY_EXTENSIONS, BinaryClassifier};
pub use budget::{Budget, Budgeter, PriorityRule, PriorityTable, SelectedFile, Selection};
pub use context::{ContextOutcome, ContextReport, Pipeline, cortxt};
pub use error::CortxtError;
pub use ignore_rules::{IgnoreMatcher, IgnoreRule, IgnoreRules};
pub use options::{
    BinaryDetection, CortxtBuilder, CortxtOptions, DEFAULT_ACTIVATION_THRESHOLD,
    DEFAULT_MAX_FILE_SIZE, DEFAULT_MAX_TOTAL_KB, DEFAULT_TRUNCATE_CAP,
};
pub use walker::{EntryOutcome, FileRecord, ScanResult, Walker, resolve_root, scan};
