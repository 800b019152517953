//! Renders an ordered list of `(path, content)` pairs into one text artifact.
//!
//! Markdown is the default and the format intended for pasting: each file is a
//! `### path` header followed by a fenced block, files separated by blank lines.

use crate::CortxtError;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Supported output formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Markdown,
    Text,
    Json,
}

impl OutputFormat {
    /// Returns the conventional file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Markdown => "md",
            OutputFormat::Text => "txt",
            OutputFormat::Json => "json",
        }
    }
}

#[derive(Serialize)]
struct JsonFile<'a> {
    path: &'a str,
    content: &'a str,
}

/// Renders the pairs in order.
pub fn render<'a, I>(files: I, format: OutputFormat) -> Result<String, CortxtError>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    match format {
        OutputFormat::Markdown => Ok(render_markdown(files)),
        OutputFormat::Text => Ok(render_text(files)),
        OutputFormat::Json => render_json(files),
    }
}

/// Renders and writes the pairs to `path`.
pub fn write_rendered<'a, I>(
    files: I,
    format: OutputFormat,
    path: impl AsRef<Path>,
) -> Result<(), CortxtError>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let content = render(files, format)?;
    fs::write(&path, content).map_err(|e| CortxtError::io(path.as_ref(), e))?;
    Ok(())
}

pub fn render_markdown<'a, I>(files: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    files
        .into_iter()
        .map(|(path, content)| format!("\n\n### {path}\n```\n{content}\n```"))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_text<'a, I>(files: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut out = String::with_capacity(1024);
    for (path, content) in files {
        out.push_str(&format!("\n--- {path} ---\n"));
        out.push_str(content);
        if !content.ends_with('\n') {
            out.push('\n');
        }
    }
    out
}

fn render_json<'a, I>(files: I) -> Result<String, CortxtError>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let files: Vec<JsonFile<'_>> = files
        .into_iter()
        .map(|(path, content)| JsonFile { path, content })
        .collect();
    Ok(serde_json::to_string_pretty(&files)?)
}

/// Prefixes every line with its right-aligned 1-based number.
pub fn number_lines(content: &str) -> String {
    content
        .split('\n')
        .enumerate()
        .map(|(i, line)| format!("{:>3}: {}", i + 1, line))
        .collect::<Vec<_>>()
        .join("\n")
}
