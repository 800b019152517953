//! Dependency extraction from `package.json`.

use crate::error::CortxtError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

pub const MANIFEST_NAME: &str = "package.json";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DependencyScope {
    #[default]
    All,
    ProdOnly,
    DevOnly,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dependencies {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dev_dependencies: Option<Map<String, Value>>,
}

impl Dependencies {
    /// Keeps only the sections `scope` asks for; kept sections that are absent
    /// from the manifest become empty maps.
    pub fn scoped(self, scope: DependencyScope) -> Self {
        let prod = self.dependencies.unwrap_or_default();
        let dev = self.dev_dependencies.unwrap_or_default();
        match scope {
            DependencyScope::All => Self {
                dependencies: Some(prod),
                dev_dependencies: Some(dev),
            },
            DependencyScope::ProdOnly => Self {
                dependencies: Some(prod),
                dev_dependencies: None,
            },
            DependencyScope::DevOnly => Self {
                dependencies: None,
                dev_dependencies: Some(dev),
            },
        }
    }

    pub fn render(&self) -> Result<String, CortxtError> {
        let json = serde_json::to_string_pretty(self)?;
        Ok(format!(
            "\n\n### {MANIFEST_NAME} dependencies\n```json\n{json}\n```"
        ))
    }
}

/// Reads the dependency sections of `<root>/package.json`.
pub fn read_dependencies(root: &Path, scope: DependencyScope) -> Result<Dependencies, CortxtError> {
    let path = root.join(MANIFEST_NAME);
    let text = fs::read_to_string(&path).map_err(|e| CortxtError::io(&path, e))?;
    let deps: Dependencies =
        serde_json::from_str(&text).map_err(|e| CortxtError::Manifest {
            path: path.clone(),
            reason: e.to_string(),
        })?;
    Ok(deps.scoped(scope))
}
