use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::model::FileTable;
use crate::error::{PipelineError, Result};

// ---------------------------------------------------------------------------
// Delimiter
// ---------------------------------------------------------------------------

/// Column separator for header-less text spectra.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Delimiter {
    /// Any run of tabs and spaces.
    #[default]
    Whitespace,
    Comma,
    Semicolon,
}

impl Delimiter {
    pub const ALL: [Delimiter; 3] = [Delimiter::Whitespace, Delimiter::Comma, Delimiter::Semicolon];

    fn byte(self) -> Option<u8> {
        match self {
            Delimiter::Whitespace => None,
            Delimiter::Comma => Some(b','),
            Delimiter::Semicolon => Some(b';'),
        }
    }
}

impl fmt::Display for Delimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Delimiter::Whitespace => write!(f, "Tab/space"),
            Delimiter::Comma => write!(f, ","),
            Delimiter::Semicolon => write!(f, ";"),
        }
    }
}

// ---------------------------------------------------------------------------
// Row accumulation
// ---------------------------------------------------------------------------

/// Collects numeric rows; the first non-empty row fixes the width.
#[derive(Debug, Default)]
struct Rows {
    width: Option<usize>,
    axis: Vec<f64>,
    columns: Vec<Vec<f64>>,
    dropped: usize,
}

impl Rows {
    fn push<'a>(&mut self, fields: impl Iterator<Item = &'a str>) {
        let parsed: Option<Vec<f64>> = fields.map(parse_field).collect();
        let Some(values) = parsed else {
            self.dropped += 1;
            return;
        };
        if values.is_empty() {
            return;
        }

        let width = *self.width.get_or_insert(values.len());
        if values.len() != width {
            self.dropped += 1;
            return;
        }
        if self.columns.len() + 1 != width {
            self.columns = vec![Vec::new(); width - 1];
        }

        self.axis.push(values[0]);
        for (col, v) in self.columns.iter_mut().zip(&values[1..]) {
            col.push(*v);
        }
    }
}

/// A field is usable when it parses as a number other than NaN.
fn parse_field(field: &str) -> Option<f64> {
    field.trim().parse::<f64>().ok().filter(|v| !v.is_nan())
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parse an in-memory text spectrum.  Returns the table and the number of
/// malformed rows that were dropped.
pub fn parse_text(
    path: &Path,
    content: &[u8],
    delimiter: Delimiter,
) -> Result<(FileTable, usize)> {
    let mut rows = Rows::default();

    match delimiter.byte() {
        None => {
            for line in content.split(|&b| b == b'\n') {
                let line = String::from_utf8_lossy(line);
                if line.trim().is_empty() {
                    continue;
                }
                rows.push(line.split_whitespace());
            }
        }
        Some(byte) => {
            let mut reader = csv::ReaderBuilder::new()
                .delimiter(byte)
                .has_headers(false)
                .flexible(true)
                .trim(csv::Trim::All)
                .from_reader(content);

            for record in reader.byte_records() {
                let record = record.map_err(|source| PipelineError::Csv {
                    path: path.to_path_buf(),
                    source,
                })?;
                let fields: Option<Vec<&str>> =
                    record.iter().map(|f| std::str::from_utf8(f).ok()).collect();
                match fields {
                    Some(fields) if fields.iter().all(|f| f.is_empty()) => continue,
                    Some(fields) => rows.push(fields.into_iter()),
                    None => rows.dropped += 1,
                }
            }
        }
    }

    let Rows {
        axis,
        columns,
        dropped,
        ..
    } = rows;

    if dropped > 0 {
        log::debug!("{}: dropped {dropped} malformed row(s)", path.display());
    }
    if axis.is_empty() {
        return Err(PipelineError::EmptyFile(path.to_path_buf()));
    }

    let table = FileTable {
        source: path.to_path_buf(),
        axis,
        columns,
    };
    Ok((table, dropped))
}

/// Read a text spectrum from disk (whole buffer) and parse it.
pub fn read_text(path: &Path, delimiter: Delimiter) -> Result<FileTable> {
    let content = std::fs::read(path).map_err(|e| PipelineError::io(path, e))?;
    let (table, _) = parse_text(path, &content, delimiter)?;
    Ok(table)
}
