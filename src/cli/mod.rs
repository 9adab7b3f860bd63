//! CLI command handlers

pub mod commands;

pub use commands::{config_init, config_show, convert, detect, import, package, template};
