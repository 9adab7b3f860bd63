//! vbakit - Excel billing workflow toolkit
//!
//! This library backs a small CLI that supports an Excel-based billing
//! workflow in two independent flows:
//!
//! - Batch VBA module import: track `.bas` source files, normalize their
//!   encoding to Shift-JIS, back up the target `.xlsm` workbook, and import
//!   the modules through host automation (Excel COM on Windows).
//! - Template packaging: build the clean billing template workbook, strip
//!   computed formulas from an existing one, and embed the result as a
//!   Base64 string in a generated JavaScript fragment.
//!
//! The automation surface is isolated behind the narrow port in
//! [`automation`], so the batch import protocol in [`import`] is fully
//! testable against a fake host.
//!
//! # Example
//!
//! ```no_run
//! use vbakit::import::{ImportExecutor, ImportRequest};
//! use vbakit::registry::FileRegistry;
//! use vbakit::automation::ExcelHost;
//! use std::path::PathBuf;
//!
//! let mut registry = FileRegistry::new();
//! registry.add(std::path::Path::new("modules/ExcelDocumentModule.bas"));
//!
//! let host = ExcelHost::new();
//! let executor = ImportExecutor::new(&host);
//! let request = ImportRequest {
//!     workbook: PathBuf::from("billing.xlsm"),
//!     auto_backup: true,
//! };
//! let outcome = executor.run(&request, &mut registry)?;
//! println!("{}/{} modules imported", outcome.succeeded, outcome.total);
//! # Ok::<(), vbakit::error::KitError>(())
//! ```

pub mod automation;
pub mod backup;
pub mod cli;
pub mod config;
pub mod encoding;
pub mod error;
pub mod import;
pub mod registry;
pub mod template;

// Re-export commonly used types
pub use config::ImportConfig;
pub use encoding::DetectedEncoding;
pub use error::{KitError, KitResult};
pub use import::{ImportExecutor, ImportOutcome, ImportRequest};
pub use registry::{AddOutcome, FileRegistry, ModuleEntry, ModuleStatus};
