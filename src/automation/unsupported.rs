//! Stand-in host for non-Windows targets, where Excel COM automation is
//! not available. The rest of the CLI (encoding conversion, template
//! packaging, config handling) works everywhere.

use super::{AutomationHost, WorkbookSession};
use crate::error::{KitError, KitResult};
use std::path::Path;

#[derive(Debug, Default)]
pub struct ExcelHost;

impl ExcelHost {
    pub fn new() -> Self {
        Self
    }
}

impl AutomationHost for ExcelHost {
    fn open(&self, _workbook: &Path) -> KitResult<Box<dyn WorkbookSession>> {
        Err(KitError::Automation(
            "Excel COM automation is only available on Windows".to_string(),
        ))
    }
}
