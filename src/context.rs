//! The full pipeline: walk the project, budget the result if it is too large,
//! render what remains.

use crate::budget::{Budget, Budgeter, PriorityTable, Selection};
use crate::error::CortxtError;
use crate::ignore_rules::IgnoreRules;
use crate::options::CortxtOptions;
use crate::output::{self, OutputFormat};
use crate::walker::Walker;
use serde::Serialize;
use std::path::PathBuf;

/// Everything a caller needs to report on a finished run.
#[derive(Debug, Serialize)]
pub struct ContextReport {
    pub root: PathBuf,
    pub rendered: String,
    pub selection: Selection,
    /// Entries dropped during the walk. Budgeting never adds to this.
    pub skipped: usize,
}

impl ContextReport {
    pub fn original_count(&self) -> usize {
        self.selection.raw_count
    }

    pub fn original_bytes(&self) -> usize {
        self.selection.raw_bytes
    }

    pub fn final_count(&self) -> usize {
        self.selection.files.len()
    }

    pub fn final_bytes(&self) -> usize {
        self.selection.total_bytes()
    }

    /// Rough token estimate at four bytes per token.
    pub fn estimated_tokens(&self) -> usize {
        self.final_bytes().div_ceil(4)
    }
}

#[derive(Debug)]
pub enum ContextOutcome {
    Rendered(ContextReport),
    /// The walk finished but produced no eligible file.
    NothingToProcess { skipped: usize },
}

pub struct Pipeline {
    options: CortxtOptions,
    rules: IgnoreRules,
    table: PriorityTable,
    format: OutputFormat,
}

impl Pipeline {
    /// Pipeline over `options.root`, with rules loaded from the configured
    /// ignore file (or the defaults).
    pub fn new(options: CortxtOptions) -> Self {
        let rules = IgnoreRules::load(&options.ignore_file_path());
        Self {
            options,
            rules,
            table: PriorityTable::default(),
            format: OutputFormat::Markdown,
        }
    }

    pub fn with_rules(mut self, rules: IgnoreRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_priority_table(mut self, table: PriorityTable) -> Self {
        self.table = table;
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn rules(&self) -> &IgnoreRules {
        &self.rules
    }

    pub fn run(&self) -> Result<ContextOutcome, CortxtError> {
        let walker = Walker::new(&self.options, self.rules.clone())?;
        let scan = walker.scan()?;
        if scan.is_empty() {
            tracing::debug!("No eligible files under {}", walker.root().display());
            return Ok(ContextOutcome::NothingToProcess {
                skipped: scan.skipped,
            });
        }

        let budgeter = Budgeter::new(self.table.clone(), Budget::from_options(&self.options));
        let skipped = scan.skipped;
        let selection = budgeter.apply(
            scan.content_by_path.into_iter().collect(),
            self.options.force_include_all,
        );
        let rendered = output::render(selection.pairs(), self.format)?;

        Ok(ContextOutcome::Rendered(ContextReport {
            root: walker.root().to_path_buf(),
            rendered,
            selection,
            skipped,
        }))
    }
}

/// Runs the pipeline with default rules lookup, priorities and markdown output.
pub fn cortxt(options: CortxtOptions) -> Result<ContextOutcome, CortxtError> {
    Pipeline::new(options).run()
}
