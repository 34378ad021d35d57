use std::path::Path;

use super::model::FileTable;
use super::spe::read_spe;
use super::text::{read_text, Delimiter};
use crate::error::Result;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load one measurement file.  Dispatch by extension.
///
/// Supported formats:
/// * `.spe` – binary instrument file, one column per frame
/// * anything else – header-less delimited text, first column is the axis
pub fn load_file(path: &Path, delimiter: Delimiter) -> Result<FileTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "spe" => read_spe(path)?.to_table(path),
        _ => read_text(path, delimiter)?,
    };

    log::debug!(
        "{}: {} rows x {} column(s)",
        path.display(),
        table.len(),
        table.columns.len()
    );
    Ok(table)
}

/// Load every file in order.  The first fatal error aborts the whole batch.
pub fn load_files<P: AsRef<Path>>(paths: &[P], delimiter: Delimiter) -> Result<Vec<FileTable>> {
    paths
        .iter()
        .map(|p| load_file(p.as_ref(), delimiter))
        .collect()
}
