//! Export builder for reconciliation results.
//!
//! [`build_partition`] turns the mapped tables and the final pairing session
//! into three disjoint frames sharing one column superset:
//! registry columns prefixed `SIGA__`, survey columns prefixed `FORM__`,
//! then `status`. The writers serialize them as a multi-sheet workbook,
//! a flat CSV (UTF-8 with BOM) or a zip of one CSV per set.

mod error;
mod io;
mod options;
mod partition;
mod writers;

pub use error::{ReportError, Result};
pub use io::write_atomic;
pub use options::{ExportFormat, ExportOptions};
pub use partition::{ExportPartition, PartitionCounts, build_partition};
pub use writers::{csv_bytes, workbook_bytes, zip_bytes};

use std::path::{Path, PathBuf};

use tracing::info;

/// Write the requested formats into `out_dir` as `<base_name>.<ext>`.
///
/// Each file is written atomically; returns the written paths in format
/// order.
pub fn export_to_dir(
    partition: &ExportPartition,
    options: &ExportOptions,
    out_dir: &Path,
    base_name: &str,
    formats: &[ExportFormat],
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(formats.len());
    for format in formats {
        let path = out_dir.join(format!("{base_name}.{}", format.extension()));
        let bytes = match format {
            ExportFormat::Xlsx => workbook_bytes(partition, options)?,
            ExportFormat::Csv => csv_bytes(&partition.flat()?)?,
            ExportFormat::Zip => zip_bytes(partition)?,
        };
        write_atomic(&path, &bytes)?;
        info!(path = %path.display(), format = %format, bytes = bytes.len(), "export written");
        written.push(path);
    }
    Ok(written)
}
