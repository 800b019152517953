//! Priority scoring, truncation and selection under a byte budget.
//!
//! Budgeting only engages when the raw content total exceeds the activation
//! threshold. When it does, every file longer than the per-file cap is
//! truncated, files are ranked by score (ties keep traversal order) and the
//! longest prefix of that ranking that fits the budget is kept. If not even the
//! first file fits it is kept alone.

use crate::options::CortxtOptions;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Score for files no rule matches.
pub const DEFAULT_SCORE: i32 = 20;

/// One row of a [`PriorityTable`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriorityRule {
    /// Exact, case-sensitive basename match.
    Exact { name: String, score: i32 },
    /// Case-insensitive extension match, without the dot.
    Extension { ext: String, score: i32 },
}

impl PriorityRule {
    pub fn exact(name: impl Into<String>, score: i32) -> Self {
        PriorityRule::Exact {
            name: name.into(),
            score,
        }
    }

    pub fn extension(ext: impl Into<String>, score: i32) -> Self {
        PriorityRule::Extension {
            ext: ext.into().trim_start_matches('.').to_ascii_lowercase(),
            score,
        }
    }

    fn score_for(&self, name: &str, ext: Option<&str>) -> Option<i32> {
        match self {
            PriorityRule::Exact { name: n, score } => (n == name).then_some(*score),
            PriorityRule::Extension { ext: e, score } => {
                ext.is_some_and(|x| x.eq_ignore_ascii_case(e)).then_some(*score)
            }
        }
    }
}

/// Rules evaluated top to bottom; the first match wins, otherwise the default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityTable {
    rules: Vec<PriorityRule>,
    default_score: i32,
}

impl PriorityTable {
    pub fn new(rules: Vec<PriorityRule>, default_score: i32) -> Self {
        Self {
            rules,
            default_score,
        }
    }

    pub fn rules(&self) -> &[PriorityRule] {
        &self.rules
    }

    pub fn default_score(&self) -> i32 {
        self.default_score
    }

    /// Score of a `/`-separated relative path, judged by its basename.
    pub fn score(&self, path: &str) -> i32 {
        let name = path.rsplit('/').next().unwrap_or(path);
        let ext = Path::new(name).extension().and_then(|e| e.to_str());
        self.rules
            .iter()
            .find_map(|rule| rule.score_for(name, ext))
            .unwrap_or(self.default_score)
    }
}

impl Default for PriorityTable {
    fn default() -> Self {
        use PriorityRule as R;
        Self::new(
            vec![
                // manifests, readme, entry points
                R::exact("package.json", 100),
                R::exact("Cargo.toml", 100),
                R::exact("README.md", 90),
                R::exact("index.js", 80),
                R::exact("main.js", 80),
                R::exact("app.js", 80),
                R::exact("main.rs", 80),
                R::exact("lib.rs", 80),
                R::exact("server.js", 75),
                // source and markup before data and config
                R::extension("js", 70),
                R::extension("ts", 70),
                R::extension("jsx", 65),
                R::extension("tsx", 65),
                R::extension("vue", 60),
                R::extension("py", 60),
                R::extension("go", 55),
                R::extension("rs", 55),
                R::extension("md", 50),
                R::extension("json", 30),
                R::extension("yaml", 25),
                R::extension("yml", 25),
            ],
            DEFAULT_SCORE,
        )
    }
}

/// Output ceilings for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    pub max_total_bytes: usize,
    pub truncate_cap: usize,
    pub activation_threshold: usize,
}

impl Budget {
    pub fn from_kb(max_total_kb: usize) -> Self {
        Self {
            max_total_bytes: max_total_kb.saturating_mul(1024),
            truncate_cap: crate::options::DEFAULT_TRUNCATE_CAP,
            activation_threshold: crate::options::DEFAULT_ACTIVATION_THRESHOLD,
        }
    }

    pub fn from_options(options: &CortxtOptions) -> Self {
        Self {
            max_total_bytes: options.max_total_kb.saturating_mul(1024),
            truncate_cap: options.truncate_cap,
            activation_threshold: options.activation_threshold,
        }
    }
}

impl Default for Budget {
    fn default() -> Self {
        Self::from_kb(crate::options::DEFAULT_MAX_TOTAL_KB)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedFile {
    pub path: String,
    pub content: String,
    pub truncated: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Selection {
    pub files: Vec<SelectedFile>,
    /// Whether budgeting engaged. When false `files` is the input unchanged.
    pub activated: bool,
    pub raw_count: usize,
    pub raw_bytes: usize,
}

impl Selection {
    pub fn total_bytes(&self) -> usize {
        self.files.iter().map(|f| f.content.len()).sum()
    }

    pub fn truncated_count(&self) -> usize {
        self.files.iter().filter(|f| f.truncated).count()
    }

    /// True if anything was dropped or shortened.
    pub fn was_reduced(&self) -> bool {
        self.files.len() != self.raw_count || self.total_bytes() != self.raw_bytes
    }

    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.files
            .iter()
            .map(|f| (f.path.as_str(), f.content.as_str()))
    }
}

fn truncation_note(shown: usize, total: usize, path: &str) -> String {
    format!(
        "\n\n// ... (file truncated - showing first {shown} of {total} bytes)\n// Use 'cortxt file {path}' for complete content"
    )
}

fn floor_char_boundary(s: &str, index: usize) -> usize {
    let mut i = index.min(s.len());
    while !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}

/// Longest prefix of at most `limit` bytes, ending before the last newline in it.
fn cut_at_line(content: &str, limit: usize) -> &str {
    let window = &content[..floor_char_boundary(content, limit)];
    match window.rfind('\n') {
        Some(i) if i > 0 => &window[..i],
        _ => window,
    }
}

/// Shortens `content` to at most `cap` bytes including the trailing note,
/// cutting at the last newline that fits. Returns `None` if no cut is needed.
///
/// When the note alone would not fit in `cap`, the body is kept without it.
pub fn truncate(content: &str, path: &str, cap: usize) -> Option<String> {
    if content.len() <= cap {
        return None;
    }
    // Reserve room for the note as rendered with the widest possible count.
    let reserve = truncation_note(cap, content.len(), path).len();
    if reserve >= cap {
        return Some(cut_at_line(content, cap).to_string());
    }
    let body = cut_at_line(content, cap - reserve);
    let mut out = String::with_capacity(body.len() + reserve);
    out.push_str(body);
    out.push_str(&truncation_note(body.len(), content.len(), path));
    Some(out)
}

/// Reduces a file set to fit a [`Budget`].
#[derive(Debug, Clone, Default)]
pub struct Budgeter {
    table: PriorityTable,
    budget: Budget,
}

impl Budgeter {
    pub fn new(table: PriorityTable, budget: Budget) -> Self {
        Self { table, budget }
    }

    pub fn budget(&self) -> &Budget {
        &self.budget
    }

    pub fn table(&self) -> &PriorityTable {
        &self.table
    }

    pub fn apply(&self, files: Vec<(String, String)>, force_include_all: bool) -> Selection {
        let raw_count = files.len();
        let raw_bytes: usize = files.iter().map(|(_, c)| c.len()).sum();

        if force_include_all || raw_bytes <= self.budget.activation_threshold {
            return Selection {
                files: files
                    .into_iter()
                    .map(|(path, content)| SelectedFile {
                        path,
                        content,
                        truncated: false,
                    })
                    .collect(),
                activated: false,
                raw_count,
                raw_bytes,
            };
        }
        tracing::debug!(
            "Budgeting {} files ({} bytes) into {} bytes",
            raw_count,
            raw_bytes,
            self.budget.max_total_bytes
        );

        let mut ranked: Vec<(i32, SelectedFile)> = files
            .into_iter()
            .map(|(path, content)| {
                let score = self.table.score(&path);
                let file = match truncate(&content, &path, self.budget.truncate_cap) {
                    Some(short) => SelectedFile {
                        path,
                        content: short,
                        truncated: true,
                    },
                    None => SelectedFile {
                        path,
                        content,
                        truncated: false,
                    },
                };
                (score, file)
            })
            .collect();
        // Stable: equal scores keep traversal order.
        ranked.sort_by(|a, b| b.0.cmp(&a.0));

        let mut total = 0usize;
        let mut selected = Vec::new();
        for (_, file) in ranked {
            let len = file.content.len();
            if total + len <= self.budget.max_total_bytes {
                total += len;
                selected.push(file);
            } else {
                if selected.is_empty() {
                    tracing::debug!("{} alone exceeds the budget, keeping it", file.path);
                    selected.push(file);
                }
                break;
            }
        }
        tracing::debug!("Selected {} of {} files", selected.len(), raw_count);

        Selection {
            files: selected,
            activated: true,
            raw_count,
            raw_bytes,
        }
    }
}
