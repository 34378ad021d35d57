use super::filter::{restrict, RangeView};
use super::model::{IntegralPoint, IntegralSeries, RangeWindow, SpectralDataset, TagSequence};

/// Trapezoidal integral of `|y|` over `(x, y)` samples already sorted by x.
pub fn trapezoid_abs(samples: &[(f64, f64)]) -> f64 {
    samples
        .windows(2)
        .map(|w| {
            let (x0, y0) = w[0];
            let (x1, y1) = w[1];
            (x1 - x0) * (y0.abs() + y1.abs()) / 2.0
        })
        .sum()
}

/// Integrate every column of a restricted view.
///
/// Rows are visited in ascending axis order.  Undefined cells are skipped,
/// so a column integrates over its own defined samples only; fewer than two
/// defined samples give `0.0`.
pub fn integrate_view(view: &RangeView<'_>, tags: Option<&TagSequence>) -> IntegralSeries {
    let rows = view.rows_by_axis();
    let labels = view.dataset.column_labels(tags);
    let tag_values = tags.map(|t| t.values()).unwrap_or(&[]);

    let points = view
        .dataset
        .columns
        .iter()
        .zip(labels)
        .enumerate()
        .map(|(i, (col, label))| {
            let samples: Vec<(f64, f64)> = rows
                .iter()
                .filter_map(|&r| col.values[r].map(|y| (view.dataset.axis[r], y)))
                .collect();
            IntegralPoint {
                label,
                position: tag_values.get(i).copied().unwrap_or((i + 1) as f64),
                value: trapezoid_abs(&samples),
            }
        })
        .collect();

    IntegralSeries { points }
}

/// Restrict `dataset` to `window` and integrate each column.
pub fn compute_integrals(
    dataset: &SpectralDataset,
    window: &RangeWindow,
    tags: Option<&TagSequence>,
) -> IntegralSeries {
    integrate_view(&restrict(dataset, *window), tags)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{resolve_window, RangeInput};
    use crate::data::model::{Column, ColumnId};

    fn constant_dataset(constants: &[f64]) -> SpectralDataset {
        let axis: Vec<f64> = (0..=10).map(|i| i as f64 * 0.5).collect();
        let columns = constants
            .iter()
            .enumerate()
            .map(|(i, &c)| Column {
                id: ColumnId::Index(i + 1),
                values: vec![Some(c); axis.len()],
            })
            .collect();
        SpectralDataset { axis, columns }
    }

    #[test]
    fn test_constant_column_integrates_to_area() {
        let ds = constant_dataset(&[3.0, -2.0]);
        let window = resolve_window(&ds, &RangeInput::new("1", "4", "", ""));
        let series = compute_integrals(&ds, &window, None);
        assert_eq!(series.len(), 2);
        assert!((series.points[0].value - 3.0 * 3.0).abs() < 1e-12);
        // absolute value is integrated
        assert!((series.points[1].value - 2.0 * 3.0).abs() < 1e-12);
        assert_eq!(series.points[0].label, "1");
        assert_eq!(series.points[1].position, 2.0);
    }

    #[test]
    fn test_unsorted_rows_are_sorted_first() {
        let ds = SpectralDataset {
            axis: vec![2.0, 0.0, 1.0],
            columns: vec![Column {
                id: ColumnId::Index(1),
                values: vec![Some(2.0), Some(0.0), Some(1.0)],
            }],
        };
        let window = resolve_window(&ds, &RangeInput::default());
        let series = compute_integrals(&ds, &window, None);
        // y = x on [0, 2]
        assert!((series.points[0].value - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_undefined_cells_skipped() {
        let ds = SpectralDataset {
            axis: vec![0.0, 1.0, 2.0, 3.0],
            columns: vec![
                Column {
                    id: ColumnId::Index(1),
                    values: vec![Some(1.0), None, Some(1.0), None],
                },
                Column {
                    id: ColumnId::Index(2),
                    values: vec![None, None, None, Some(4.0)],
                },
            ],
        };
        let window = resolve_window(&ds, &RangeInput::default());
        let series = compute_integrals(&ds, &window, None);
        assert_eq!(series.values(), vec![2.0, 0.0]);
    }

    #[test]
    fn test_labels_follow_tags() {
        let ds = constant_dataset(&[1.0, 1.0, 1.0]);
        let tags = TagSequence::new(vec![0.5, 1.0]).unwrap();
        let window = resolve_window(&ds, &RangeInput::default());
        let series = compute_integrals(&ds, &window, Some(&tags));
        let labels: Vec<_> = series.points.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["0.5", "1", "3"]);
        let positions: Vec<_> = series.points.iter().map(|p| p.position).collect();
        assert_eq!(positions, vec![0.5, 1.0, 3.0]);
    }

    #[test]
    fn test_trapezoid_abs() {
        assert_eq!(trapezoid_abs(&[]), 0.0);
        assert_eq!(trapezoid_abs(&[(1.0, 5.0)]), 0.0);
        assert_eq!(trapezoid_abs(&[(0.0, -1.0), (2.0, 3.0)]), 4.0);
    }
}
