use super::model::{RangeWindow, SpectralDataset};
use super::tags::parse_entry;

// ---------------------------------------------------------------------------
// Operator bounds
// ---------------------------------------------------------------------------

/// The four bound entries as typed by the operator.  Blank or unparsable text
/// means "use the data extent".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RangeInput {
    pub x_min: String,
    pub x_max: String,
    pub y_min: String,
    pub y_max: String,
}

impl RangeInput {
    pub fn new(
        x_min: impl Into<String>,
        x_max: impl Into<String>,
        y_min: impl Into<String>,
        y_max: impl Into<String>,
    ) -> Self {
        Self {
            x_min: x_min.into(),
            x_max: x_max.into(),
            y_min: y_min.into(),
            y_max: y_max.into(),
        }
    }
}

/// Resolve each bound independently, falling back to the axis extent for x
/// and to the extent of every defined intensity cell for y.
pub fn resolve_window(dataset: &SpectralDataset, input: &RangeInput) -> RangeWindow {
    let (ax_lo, ax_hi) = dataset.axis_extent().unwrap_or((0.0, 0.0));
    let (in_lo, in_hi) = dataset.intensity_extent().unwrap_or((0.0, 0.0));

    RangeWindow {
        x_min: bound(&input.x_min, ax_lo),
        x_max: bound(&input.x_max, ax_hi),
        y_min: bound(&input.y_min, in_lo),
        y_max: bound(&input.y_max, in_hi),
    }
}

fn bound(text: &str, fallback: f64) -> f64 {
    parse_entry(text).unwrap_or_else(|| {
        if !text.trim().is_empty() {
            log::debug!("invalid bound {text:?}, using {fallback}");
        }
        fallback
    })
}

// ---------------------------------------------------------------------------
// Restricted view
// ---------------------------------------------------------------------------

/// Rows of a dataset whose axis value lies inside a window.  Borrowing view,
/// the dataset itself is untouched.
#[derive(Debug, Clone)]
pub struct RangeView<'a> {
    pub dataset: &'a SpectralDataset,
    pub window: RangeWindow,
    /// Indices into the dataset rows, in dataset order.
    pub rows: Vec<usize>,
}

impl<'a> RangeView<'a> {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row indices ordered by ascending axis value.
    pub fn rows_by_axis(&self) -> Vec<usize> {
        let mut rows = self.rows.clone();
        rows.sort_by(|&a, &b| self.dataset.axis[a].total_cmp(&self.dataset.axis[b]));
        rows
    }
}

/// Indices of rows with `x_min <= x <= x_max`.
pub fn filtered_indices(dataset: &SpectralDataset, window: &RangeWindow) -> Vec<usize> {
    dataset
        .axis
        .iter()
        .enumerate()
        .filter(|(_, x)| window.contains_x(**x))
        .map(|(i, _)| i)
        .collect()
}

/// Restrict a dataset to a window.
pub fn restrict<'a>(dataset: &'a SpectralDataset, window: RangeWindow) -> RangeView<'a> {
    RangeView {
        rows: filtered_indices(dataset, &window),
        dataset,
        window,
    }
}
