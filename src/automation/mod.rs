//! Narrow port over the host automation surface.
//!
//! The import protocol only needs four operations on an open workbook:
//! list the named code units in its VBA project, remove one, import one
//! from a file, and save. Everything Excel-specific lives behind these
//! traits so the batch protocol can run against a fake host in tests.

use crate::error::KitResult;
use std::path::Path;

/// An open workbook inside a host automation session.
pub trait WorkbookSession {
    /// Names of the code units currently in the VBA project.
    fn component_names(&mut self) -> KitResult<Vec<String>>;

    /// Remove the code unit with this exact name.
    fn remove_component(&mut self, name: &str) -> KitResult<()>;

    /// Import a `.bas` source file as a new code unit.
    fn import_component(&mut self, path: &Path) -> KitResult<()>;

    /// Persist the workbook.
    fn save(&mut self) -> KitResult<()>;
}

/// Factory for automation sessions.
pub trait AutomationHost {
    /// Start a session and open the workbook. Any failure here is fatal
    /// for the whole import phase.
    fn open(&self, workbook: &Path) -> KitResult<Box<dyn WorkbookSession>>;
}

#[cfg(windows)]
mod excel_com;
#[cfg(windows)]
pub use excel_com::ExcelHost;

#[cfg(not(windows))]
mod unsupported;
#[cfg(not(windows))]
pub use unsupported::ExcelHost;
