//! Ordered registry of tracked VBA module files.

use crate::encoding::{self, DetectedEncoding};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Lifecycle label of a tracked module file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleStatus {
    Pending,
    Converted,
    ConversionFailed,
    NotNeeded,
    Unconverted,
    ImportSucceeded,
    ImportFailed,
}

impl fmt::Display for ModuleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ModuleStatus::Pending => "pending",
            ModuleStatus::Converted => "converted",
            ModuleStatus::ConversionFailed => "conversion failed",
            ModuleStatus::NotNeeded => "not needed",
            ModuleStatus::Unconverted => "unconverted",
            ModuleStatus::ImportSucceeded => "import succeeded",
            ModuleStatus::ImportFailed => "import failed",
        };
        write!(f, "{}", label)
    }
}

/// One tracked module file: path, detected encoding, current status.
#[derive(Debug, Clone)]
pub struct ModuleEntry {
    pub path: PathBuf,
    pub encoding: DetectedEncoding,
    pub status: ModuleStatus,
}

impl ModuleEntry {
    /// File name as displayed to the user.
    pub fn file_name(&self) -> &str {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
    }

    /// Logical VBA module name: the file name stem.
    pub fn module_name(&self) -> &str {
        self.path
            .file_stem()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
    }
}

/// Result of [`FileRegistry::add`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    /// The path was already tracked; the registry is unchanged.
    Duplicate,
}

/// Ordered collection of module entries, unique by path.
#[derive(Debug, Default)]
pub struct FileRegistry {
    entries: Vec<ModuleEntry>,
}

impl FileRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a new file. Duplicates (by full path) are rejected with a
    /// warning. Encoding detection failures degrade to `Unknown` rather
    /// than blocking the add.
    pub fn add(&mut self, path: &Path) -> AddOutcome {
        if self.entries.iter().any(|e| e.path == path) {
            warn!("already tracked: {}", path.display());
            return AddOutcome::Duplicate;
        }

        let encoding = match encoding::detect(path) {
            Ok(enc) => enc,
            Err(e) => {
                warn!("encoding detection failed for {}: {}", path.display(), e);
                DetectedEncoding::Unknown
            }
        };

        self.entries.push(ModuleEntry {
            path: path.to_path_buf(),
            encoding,
            status: ModuleStatus::Pending,
        });
        AddOutcome::Added
    }

    /// Remove every entry whose path is in `paths`.
    pub fn remove(&mut self, paths: &[PathBuf]) {
        self.entries.retain(|e| !paths.contains(&e.path));
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Update the FIRST entry whose display name matches.
    ///
    /// Matching is by file name, not path. If two tracked paths share a
    /// file name, updates for the second silently land on the first; kept
    /// as-is to mirror the historical table-row update behavior.
    pub fn update_status(
        &mut self,
        file_name: &str,
        encoding: Option<DetectedEncoding>,
        status: Option<ModuleStatus>,
    ) {
        if let Some(entry) = self
            .entries
            .iter_mut()
            .find(|e| e.file_name() == file_name)
        {
            if let Some(enc) = encoding {
                entry.encoding = enc;
            }
            if let Some(st) = status {
                entry.status = st;
            }
        }
    }

    pub fn entries(&self) -> &[ModuleEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ModuleEntry> {
        self.entries.iter()
    }
}
