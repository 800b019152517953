//! Project statistics over the walker's included files.

use crate::walker::ScanResult;
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt::Write;

const TOP_EXTENSIONS: usize = 8;
const TOP_LARGEST: usize = 5;
const NO_EXTENSION: &str = "no extension";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtensionCount {
    pub extension: String,
    pub files: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileSize {
    pub path: String,
    pub bytes: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectStats {
    pub total_files: usize,
    pub total_bytes: usize,
    pub total_lines: usize,
    /// Most common extensions, most frequent first.
    pub extensions: Vec<ExtensionCount>,
    /// Largest files, largest first.
    pub largest: Vec<FileSize>,
}

fn extension_of(path: &str) -> String {
    let name = path.rsplit('/').next().unwrap_or(path);
    match name.rfind('.') {
        Some(i) if i > 0 => name[i..].to_string(),
        _ => NO_EXTENSION.to_string(),
    }
}

/// Files per extension, most frequent first, keeping at most `top` rows.
/// Equal counts keep first-seen order.
pub fn extension_breakdown<'a>(
    paths: impl IntoIterator<Item = &'a str>,
    top: usize,
) -> Vec<ExtensionCount> {
    let mut by_ext: IndexMap<String, usize> = IndexMap::new();
    for path in paths {
        *by_ext.entry(extension_of(path)).or_default() += 1;
    }
    let mut extensions: Vec<ExtensionCount> = by_ext
        .into_iter()
        .map(|(extension, files)| ExtensionCount { extension, files })
        .collect();
    extensions.sort_by(|a, b| b.files.cmp(&a.files));
    extensions.truncate(top);
    extensions
}

impl ProjectStats {
    pub fn from_scan(scan: &ScanResult) -> Self {
        let mut largest = Vec::with_capacity(scan.content_by_path.len());
        let mut total_lines = 0;
        for (path, content) in &scan.content_by_path {
            total_lines += content.split('\n').count();
            largest.push(FileSize {
                path: path.clone(),
                bytes: content.len(),
            });
        }

        let extensions =
            extension_breakdown(scan.content_by_path.keys().map(String::as_str), TOP_EXTENSIONS);

        largest.sort_by(|a, b| b.bytes.cmp(&a.bytes));
        largest.truncate(TOP_LARGEST);

        Self {
            total_files: scan.content_by_path.len(),
            total_bytes: scan.total_bytes(),
            total_lines,
            extensions,
            largest,
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Project Statistics");
        let _ = writeln!(out, "{}", "━".repeat(20));
        let _ = writeln!(out, "Total files: {}", self.total_files);
        let _ = writeln!(out, "Total size: {}", format_bytes(self.total_bytes));
        let _ = writeln!(out, "Lines of code: {}", self.total_lines);
        let _ = writeln!(out, "\nFile Types:");
        for ext in &self.extensions {
            let pct = if self.total_files == 0 {
                0.0
            } else {
                ext.files as f64 * 100.0 / self.total_files as f64
            };
            let _ = writeln!(
                out,
                "  {:<8} {:>2} files ({:.1}%)",
                ext.extension, ext.files, pct
            );
        }
        let _ = writeln!(out, "\nTop {} Largest Files:", TOP_LARGEST);
        for file in &self.largest {
            let _ = writeln!(out, "  {:<30} {}", file.path, format_bytes(file.bytes));
        }
        out
    }
}

/// Human-readable byte count, e.g. `1.5 KB`.
pub fn format_bytes(bytes: usize) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", value, UNITS[unit])
}
