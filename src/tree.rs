//! Depth-limited project tree honouring the ignore rules.

use crate::error::CortxtError;
use crate::ignore_rules::{IgnoreMatcher, IgnoreRules};
use crate::walker::resolve_root;
use ignore::WalkBuilder;
use std::path::Path;

pub const DEFAULT_TREE_DEPTH: usize = 3;

#[derive(Debug, Default)]
struct Node {
    children: Vec<(String, bool, Node)>,
}

impl Node {
    // Walk order is pre-order and sorted, so a parent is always the last child.
    fn insert(&mut self, components: &[String], is_dir: bool) {
        let Some((first, rest)) = components.split_first() else {
            return;
        };
        if rest.is_empty() {
            self.children.push((first.clone(), is_dir, Node::default()));
            return;
        }
        if let Some((name, _, child)) = self.children.last_mut() {
            if name == first {
                child.insert(rest, is_dir);
            }
        }
    }

    fn render(&self, prefix: &str, out: &mut String) {
        let count = self.children.len();
        for (i, (name, is_dir, child)) in self.children.iter().enumerate() {
            let last = i + 1 == count;
            out.push_str(prefix);
            out.push_str(if last { "└── " } else { "├── " });
            out.push_str(name);
            if *is_dir {
                out.push('/');
            }
            out.push('\n');
            let next = format!("{}{}", prefix, if last { "    " } else { "│   " });
            child.render(&next, out);
        }
    }
}

/// Builds a visual tree of `root` down to `max_depth` levels, entries sorted by
/// name, directories marked with a trailing `/`.
///
/// # Errors
///
/// Returns [`CortxtError::RootNotFound`] if `root` is not a directory.
pub fn build_tree(root: &Path, rules: IgnoreRules, max_depth: usize) -> Result<String, CortxtError> {
    let root = resolve_root(root)?;
    let matcher = IgnoreMatcher::new(root.clone(), rules);

    let mut builder = WalkBuilder::new(&root);
    builder
        .standard_filters(false)
        .max_depth(Some(max_depth))
        .sort_by_file_name(|a, b| a.cmp(b));
    {
        let matcher = matcher.clone();
        builder.filter_entry(move |entry| {
            entry.depth() == 0
                || !matcher.is_ignored(entry.path(), &entry.file_name().to_string_lossy())
        });
    }

    let mut tree = Node::default();
    for entry in builder.build() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::debug!("Tree skipping entry: {}", e);
                continue;
            }
        };
        if entry.depth() == 0 {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(&root) else {
            continue;
        };
        let components: Vec<String> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        let is_dir = entry.file_type().is_some_and(|t| t.is_dir());
        tree.insert(&components, is_dir);
    }

    let name = root
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| root.display().to_string());
    let mut out = format!("{name}/\n");
    tree.render("", &mut out);
    Ok(out)
}
