//! Extraction of individually named files, bypassing the walk and the budget.

use crate::error::CortxtError;
use crate::output::number_lines;
use std::fs;
use std::path::Path;

#[derive(Debug)]
pub struct ExtractedFile {
    /// The path as the caller named it.
    pub path: String,
    pub content: String,
    pub bytes: usize,
    pub lines: usize,
}

/// Per-file results of an extraction, in request order.
#[derive(Debug, Default)]
pub struct Extraction {
    pub files: Vec<ExtractedFile>,
    pub failures: Vec<(String, CortxtError)>,
}

impl Extraction {
    pub fn total_bytes(&self) -> usize {
        self.files.iter().map(|f| f.bytes).sum()
    }

    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.files
            .iter()
            .map(|f| (f.path.as_str(), f.content.as_str()))
    }

    /// Fails with [`CortxtError::NothingExtracted`] when no requested file was read.
    pub fn require_any(self) -> Result<Self, CortxtError> {
        if self.files.is_empty() {
            return Err(CortxtError::NothingExtracted);
        }
        Ok(self)
    }
}

/// Reads each of `paths` relative to `root`. With `line_numbers` the content
/// is prefixed line by line; sizes always describe the file as stored.
pub fn extract_files<S: AsRef<str>>(root: &Path, paths: &[S], line_numbers: bool) -> Extraction {
    let mut extraction = Extraction::default();
    for requested in paths {
        let requested = requested.as_ref();
        match read_one(&root.join(requested)) {
            Ok(code) => {
                let bytes = code.len();
                let lines = code.split('\n').count();
                let content = if line_numbers {
                    number_lines(&code)
                } else {
                    code
                };
                extraction.files.push(ExtractedFile {
                    path: requested.to_string(),
                    content,
                    bytes,
                    lines,
                });
            }
            Err(e) => {
                tracing::warn!("Could not read {}: {}", requested, e);
                extraction.failures.push((requested.to_string(), e));
            }
        }
    }
    extraction
}

fn read_one(path: &Path) -> Result<String, CortxtError> {
    if path.is_dir() {
        return Err(CortxtError::NotAFile(path.to_path_buf()));
    }
    fs::read_to_string(path).map_err(|e| CortxtError::io(path, e))
}
