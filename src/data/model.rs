use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

// ---------------------------------------------------------------------------
// ColumnId – identifier of one acquisition column
// ---------------------------------------------------------------------------

/// Identifier of a non-axis column.
///
/// Columns start out positional (`Index(1..=N)`); the raster-scan remap turns
/// them into `Pixel` coordinates.  Tags are not stored here, they are applied
/// as labels at output time (see [`SpectralDataset::column_labels`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ColumnId {
    Index(usize),
    Pixel { x: usize, y: usize },
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnId::Index(i) => write!(f, "{i}"),
            ColumnId::Pixel { x, y } => write!(f, "x={x} y={y}"),
        }
    }
}

// ---------------------------------------------------------------------------
// FileTable – the output of one decoder
// ---------------------------------------------------------------------------

/// One decoded file: an axis plus `y1..yN` columns of equal length.
#[derive(Debug, Clone, PartialEq)]
pub struct FileTable {
    pub source: PathBuf,
    pub axis: Vec<f64>,
    pub columns: Vec<Vec<f64>>,
}

impl FileTable {
    pub fn len(&self) -> usize {
        self.axis.len()
    }

    pub fn is_empty(&self) -> bool {
        self.axis.is_empty()
    }

    /// Positional names as produced by the decoders: `x`, `y1`, `y2`, ...
    pub fn column_names(&self) -> Vec<String> {
        std::iter::once("x".to_string())
            .chain((1..=self.columns.len()).map(|i| format!("y{i}")))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// SpectralDataset – the aligned table
// ---------------------------------------------------------------------------

/// One intensity column of the aligned dataset.  `None` marks a cell left
/// undefined by an outer join.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub id: ColumnId,
    pub values: Vec<Option<f64>>,
}

/// The aligned dataset: a shared axis plus axis-aligned intensity columns.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpectralDataset {
    pub axis: Vec<f64>,
    pub columns: Vec<Column>,
}

impl SpectralDataset {
    /// Seed a dataset from a single decoded file.
    pub fn from_table(table: FileTable) -> Self {
        let columns = table
            .columns
            .into_iter()
            .enumerate()
            .map(|(i, values)| Column {
                id: ColumnId::Index(i + 1),
                values: values.into_iter().map(Some).collect(),
            })
            .collect();
        SpectralDataset {
            axis: table.axis,
            columns,
        }
    }

    /// Number of rows (axis samples).
    pub fn len(&self) -> usize {
        self.axis.len()
    }

    pub fn is_empty(&self) -> bool {
        self.axis.is_empty()
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    /// `(min, max)` of the axis, `None` for an empty dataset.
    pub fn axis_extent(&self) -> Option<(f64, f64)> {
        min_max(self.axis.iter().copied())
    }

    /// `(min, max)` over every defined intensity cell.
    pub fn intensity_extent(&self) -> Option<(f64, f64)> {
        min_max(
            self.columns
                .iter()
                .flat_map(|c| c.values.iter().filter_map(|v| *v)),
        )
    }

    /// Renumber all columns positionally `1..=N`.
    pub fn renumber(&mut self) {
        for (i, col) in self.columns.iter_mut().enumerate() {
            col.id = ColumnId::Index(i + 1);
        }
    }

    /// Reinterpret the columns as a square raster scan of side
    /// `floor(sqrt(N))`, labelling them `(x, y)` with x in the outer loop.
    ///
    /// Columns beyond `side²` keep their positional id.  Returns the side.
    pub fn remap_to_grid(&mut self) -> usize {
        let n = self.columns.len();
        let side = (n as f64).sqrt().floor() as usize;
        // Guard against float rounding on large perfect squares.
        let side = if (side + 1) * (side + 1) <= n { side + 1 } else { side };

        if side * side != n {
            log::warn!(
                "{n} columns do not form a square grid; {} left with positional ids",
                n - side * side
            );
        }

        let coords = (0..side).flat_map(|x| (0..side).map(move |y| ColumnId::Pixel { x, y }));
        for (col, id) in self.columns.iter_mut().zip(coords) {
            col.id = id;
        }
        side
    }

    /// Display labels for every column: `tags[i]` where present, otherwise the
    /// column's own id.  Extra tags are ignored.
    pub fn column_labels(&self, tags: Option<&TagSequence>) -> Vec<String> {
        let tags = tags.map(|t| t.values()).unwrap_or(&[]);
        if !tags.is_empty() && tags.len() != self.columns.len() {
            log::warn!(
                "{} tags for {} columns; labelling positionally",
                tags.len(),
                self.columns.len()
            );
        }
        self.columns
            .iter()
            .enumerate()
            .map(|(i, col)| match tags.get(i) {
                Some(tag) => format_value(*tag),
                None => col.id.to_string(),
            })
            .collect()
    }
}

fn min_max(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

/// Shortest round-trip text for a numeric label.
pub fn format_value(v: f64) -> String {
    format!("{v}")
}

// ---------------------------------------------------------------------------
// TagSequence / RangeWindow / IntegralSeries
// ---------------------------------------------------------------------------

/// Ordered operator variable.  Only constructed with at least two values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagSequence(Vec<f64>);

impl TagSequence {
    /// `None` when fewer than two values are supplied.
    pub fn new(values: Vec<f64>) -> Option<Self> {
        (values.len() >= 2).then_some(TagSequence(values))
    }

    pub fn values(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Resolved analysis bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RangeWindow {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl RangeWindow {
    pub fn contains_x(&self, x: f64) -> bool {
        x >= self.x_min && x <= self.x_max
    }
}

/// One integrated value per column, in column order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntegralPoint {
    pub label: String,
    /// Numeric position for plotting: the tag when active, else the column
    /// ordinal (1-based).
    pub position: f64,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct IntegralSeries {
    pub points: Vec<IntegralPoint>,
}

impl IntegralSeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }
}
