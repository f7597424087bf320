use polars::prelude::DataFrame;
use recon_common::column_names;

/// A loaded input table.
///
/// All columns are text. `label` names the file the table came from and is
/// used in error messages and logs.
#[derive(Debug, Clone)]
pub struct SourceTable {
    pub label: String,
    pub data: DataFrame,
}

impl SourceTable {
    pub fn new(label: impl Into<String>, data: DataFrame) -> Self {
        Self {
            label: label.into(),
            data,
        }
    }

    pub fn height(&self) -> usize {
        self.data.height()
    }

    pub fn width(&self) -> usize {
        self.data.width()
    }

    pub fn is_empty(&self) -> bool {
        self.data.height() == 0
    }

    pub fn column_names(&self) -> Vec<String> {
        column_names(&self.data)
    }
}
