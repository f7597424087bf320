//! CLI library components for the reconciliation tool.

pub mod config;
pub mod logging;
pub mod pairs;
pub mod render;
pub mod shell;
pub mod workbench;
