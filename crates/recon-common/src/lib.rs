//! Shared utilities for the reconciliation crates.
//!
//! Every table in the workspace is a Polars `DataFrame` whose columns hold
//! text. This crate provides the small set of helpers used to build such
//! frames and read cells back out of them as plain strings.

pub mod polars;

pub use polars::{
    any_to_string, column_names, column_value_string, column_values, format_numeric,
    render_row, row_values, rows_frame, string_frame,
};
