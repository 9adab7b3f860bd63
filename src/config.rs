//! JSON import descriptor: workbook, module list, backup flag.

use crate::error::KitResult;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Name of the descriptor auto-loaded from the working directory.
pub const DEFAULT_FILE_NAME: &str = "vba_import_config.json";

/// Import run descriptor, persisted as JSON.
///
/// Loading is permissive: missing keys fall back to the defaults below.
/// The default value is an explicit constant of this type; there is no
/// shared mutable global.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Target workbook, relative to the project root.
    pub workbook: String,
    /// Module file names, resolved against `modules_dir`.
    pub modules: Vec<String>,
    pub auto_backup: bool,
    pub modules_dir: String,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            workbook: String::new(),
            modules: Vec::new(),
            auto_backup: true,
            modules_dir: "modules".to_string(),
        }
    }
}

impl ImportConfig {
    pub fn load(path: &Path) -> KitResult<Self> {
        let text = fs::read_to_string(path)?;
        let config = serde_json::from_str(&text)?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> KitResult<()> {
        let mut text = serde_json::to_string_pretty(self)?;
        text.push('\n');
        fs::write(path, text)?;
        Ok(())
    }

    /// Workbook path resolved against the project root, if configured.
    pub fn workbook_path(&self, root: &Path) -> Option<PathBuf> {
        if self.workbook.is_empty() {
            None
        } else {
            Some(root.join(&self.workbook))
        }
    }

    /// Resolve the configured module names against `root/modules_dir`.
    /// Missing files are warned about and skipped.
    pub fn resolve_modules(&self, root: &Path) -> Vec<PathBuf> {
        let dir = root.join(&self.modules_dir);
        let mut resolved = Vec::new();

        for name in &self.modules {
            let path = dir.join(name);
            if path.exists() {
                resolved.push(path);
            } else {
                warn!("module not found: {}", path.display());
            }
        }

        resolved
    }
}
