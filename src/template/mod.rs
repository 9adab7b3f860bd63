//! Flow A: billing template construction and Base64 packaging.

pub mod builder;
pub mod packager;

pub use builder::{build_template, strip_formulas};
pub use packager::{package, PackageStats};
