//! Two-phase batch import: normalize module encodings, then import the
//! modules into the workbook through the automation port.
//!
//! Failure semantics:
//! - Validation errors (missing workbook, empty registry) abort before
//!   any side effect.
//! - Backup failure is logged and the run continues.
//! - A per-module conversion or import failure marks that entry and the
//!   batch continues with its siblings.
//! - Failing to open the automation session, or to save at the end,
//!   aborts the import phase as a single fatal error.

use crate::automation::{AutomationHost, WorkbookSession};
use crate::backup;
use crate::encoding::{self, DetectedEncoding};
use crate::error::{KitError, KitResult};
use crate::registry::{FileRegistry, ModuleStatus};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// Command object describing one import run, decoupled from any UI.
#[derive(Debug, Clone)]
pub struct ImportRequest {
    pub workbook: PathBuf,
    pub auto_backup: bool,
}

/// Aggregated result of a run.
#[derive(Debug, Clone)]
pub struct ImportOutcome {
    pub succeeded: usize,
    pub total: usize,
    pub backup: Option<PathBuf>,
}

impl ImportOutcome {
    /// True only when every entry imported.
    pub fn is_success(&self) -> bool {
        self.succeeded == self.total
    }
}

/// Orchestrates the batch protocol against an automation host.
pub struct ImportExecutor<'a> {
    host: &'a dyn AutomationHost,
}

impl<'a> ImportExecutor<'a> {
    pub fn new(host: &'a dyn AutomationHost) -> Self {
        Self { host }
    }

    /// Run the full batch: validate, back up, normalize, import.
    pub fn run(
        &self,
        request: &ImportRequest,
        registry: &mut FileRegistry,
    ) -> KitResult<ImportOutcome> {
        if !request.workbook.exists() {
            return Err(KitError::Validation(format!(
                "workbook not found: {}",
                request.workbook.display()
            )));
        }
        if registry.is_empty() {
            return Err(KitError::Validation(
                "no module files to import".to_string(),
            ));
        }

        let backup = if request.auto_backup {
            match backup::create_backup(&request.workbook) {
                Ok(path) => Some(path),
                Err(e) => {
                    warn!("backup failed, continuing without one: {}", e);
                    None
                }
            }
        } else {
            None
        };

        normalize(registry);

        let succeeded = self.import_all(&request.workbook, registry)?;

        Ok(ImportOutcome {
            succeeded,
            total: registry.len(),
            backup,
        })
    }

    /// Phase 2: open the workbook once and import every entry in registry
    /// order. Returns the number of entries that imported.
    fn import_all(&self, workbook: &Path, registry: &mut FileRegistry) -> KitResult<usize> {
        info!("opening workbook: {}", workbook.display());
        let mut session = self.host.open(workbook)?;

        let planned: Vec<(String, String, PathBuf)> = registry
            .iter()
            .map(|e| {
                (
                    e.file_name().to_string(),
                    e.module_name().to_string(),
                    e.path.clone(),
                )
            })
            .collect();

        let mut succeeded = 0;
        for (file_name, module_name, path) in planned {
            match import_one(session.as_mut(), &module_name, &path) {
                Ok(()) => {
                    info!("imported: {}", file_name);
                    registry.update_status(&file_name, None, Some(ModuleStatus::ImportSucceeded));
                    succeeded += 1;
                }
                Err(e) => {
                    error!("import failed: {} - {}", file_name, e);
                    registry.update_status(&file_name, None, Some(ModuleStatus::ImportFailed));
                }
            }
        }

        info!("saving workbook");
        session.save()?;

        Ok(succeeded)
    }
}

/// Phase 1: bring every tracked file to Shift-JIS where possible.
///
/// UTF-8 entries are converted in place; Shift-JIS entries need nothing;
/// entries with any other encoding are left untouched but do not block
/// the import phase.
pub fn normalize(registry: &mut FileRegistry) {
    let planned: Vec<(String, PathBuf, DetectedEncoding)> = registry
        .iter()
        .map(|e| (e.file_name().to_string(), e.path.clone(), e.encoding.clone()))
        .collect();

    for (file_name, path, detected) in planned {
        match detected {
            DetectedEncoding::Utf8 => match encoding::convert_to_shift_jis(&path) {
                Ok(()) => {
                    info!("converted to Shift-JIS: {}", file_name);
                    registry.update_status(
                        &file_name,
                        Some(DetectedEncoding::ShiftJis),
                        Some(ModuleStatus::Converted),
                    );
                }
                Err(e) => {
                    error!("conversion failed: {} - {}", file_name, e);
                    registry.update_status(&file_name, None, Some(ModuleStatus::ConversionFailed));
                }
            },
            DetectedEncoding::ShiftJis => {
                info!("already Shift-JIS: {}", file_name);
                registry.update_status(&file_name, None, Some(ModuleStatus::NotNeeded));
            }
            _ => {
                warn!("unknown encoding, continuing anyway: {}", file_name);
                registry.update_status(&file_name, None, Some(ModuleStatus::Unconverted));
            }
        }
    }
}

/// Import a single module: drop any existing component with the same
/// name, then load the new source.
fn import_one(
    session: &mut dyn WorkbookSession,
    module_name: &str,
    path: &Path,
) -> KitResult<()> {
    let existing = session.component_names()?;
    if existing.iter().any(|n| n == module_name) {
        info!("removing existing module: {}", module_name);
        session.remove_component(module_name)?;
    }
    session.import_component(path)
}
