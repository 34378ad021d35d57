use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};

use super::model::{Column, FileTable, SpectralDataset};
use crate::error::{PipelineError, Result};

// ---------------------------------------------------------------------------
// Axis key – f64 with a total order
// ---------------------------------------------------------------------------

/// Join key.  `-0.0` and `0.0` are the same key.
#[derive(Debug, Clone, Copy)]
struct AxisKey(f64);

impl AxisKey {
    fn new(v: f64) -> Self {
        AxisKey(if v == 0.0 { 0.0 } else { v })
    }
}

impl PartialEq for AxisKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for AxisKey {}

impl PartialOrd for AxisKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for AxisKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

fn cell_bits(v: Option<f64>) -> Option<u64> {
    v.map(|v| AxisKey::new(v).0.to_bits())
}

// ---------------------------------------------------------------------------
// Assembly
// ---------------------------------------------------------------------------

/// Merge decoded files into one dataset.
///
/// The first table seeds the dataset; each further table is full-outer-joined
/// on the axis and the columns are renumbered `1..=N`.  Exact duplicate rows
/// are removed at the end.
pub fn assemble(tables: Vec<FileTable>) -> Result<SpectralDataset> {
    let mut tables = tables.into_iter();
    let first = tables.next().ok_or(PipelineError::NoData)?;

    let mut dataset = SpectralDataset::from_table(first);
    for table in tables {
        dataset = outer_join(&dataset, &SpectralDataset::from_table(table));
        dataset.renumber();
    }

    let removed = dedup_rows(&mut dataset);
    if removed > 0 {
        log::debug!("removed {removed} duplicate row(s)");
    }
    log::info!(
        "assembled {} rows x {} column(s)",
        dataset.len(),
        dataset.n_columns()
    );
    Ok(dataset)
}

/// Full outer join on the axis value.
///
/// Keys come out in ascending order.  A key present on both sides several
/// times yields every left/right pairing; a key present on one side only gets
/// undefined cells for the other side's columns.
pub fn outer_join(left: &SpectralDataset, right: &SpectralDataset) -> SpectralDataset {
    let mut keys: BTreeMap<AxisKey, (Vec<usize>, Vec<usize>)> = BTreeMap::new();
    for (i, &x) in left.axis.iter().enumerate() {
        keys.entry(AxisKey::new(x)).or_default().0.push(i);
    }
    for (i, &x) in right.axis.iter().enumerate() {
        keys.entry(AxisKey::new(x)).or_default().1.push(i);
    }

    let mut pairs: Vec<(f64, Option<usize>, Option<usize>)> = Vec::new();
    for (key, (lrows, rrows)) in &keys {
        match (lrows.is_empty(), rrows.is_empty()) {
            (false, true) => pairs.extend(lrows.iter().map(|&l| (key.0, Some(l), None))),
            (true, false) => pairs.extend(rrows.iter().map(|&r| (key.0, None, Some(r)))),
            _ => {
                for &l in lrows {
                    pairs.extend(rrows.iter().map(|&r| (key.0, Some(l), Some(r))));
                }
            }
        }
    }

    let pick = |side: &SpectralDataset, rows: Vec<Option<usize>>| -> Vec<Column> {
        side.columns
            .iter()
            .map(|col| Column {
                id: col.id,
                values: rows
                    .iter()
                    .map(|row| row.and_then(|r| col.values[r]))
                    .collect(),
            })
            .collect()
    };

    let axis = pairs.iter().map(|p| p.0).collect();
    let mut columns = pick(left, pairs.iter().map(|p| p.1).collect());
    columns.extend(pick(right, pairs.iter().map(|p| p.2).collect()));

    SpectralDataset { axis, columns }
}

/// Remove rows identical in every column (axis included), keeping the first
/// occurrence.  Undefined cells compare equal to each other.  Returns the
/// number of rows removed.
pub fn dedup_rows(dataset: &mut SpectralDataset) -> usize {
    let mut seen: HashSet<Vec<Option<u64>>> = HashSet::with_capacity(dataset.len());
    let keep: Vec<bool> = (0..dataset.len())
        .map(|row| {
            let key: Vec<Option<u64>> = std::iter::once(cell_bits(Some(dataset.axis[row])))
                .chain(dataset.columns.iter().map(|c| cell_bits(c.values[row])))
                .collect();
            seen.insert(key)
        })
        .collect();

    let removed = keep.iter().filter(|k| !**k).count();
    if removed == 0 {
        return 0;
    }

    retain_flagged(&mut dataset.axis, &keep);
    for col in &mut dataset.columns {
        retain_flagged(&mut col.values, &keep);
    }
    removed
}

fn retain_flagged<T>(values: &mut Vec<T>, keep: &[bool]) {
    let mut flags = keep.iter();
    values.retain(|_| flags.next().copied().unwrap_or(true));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::ColumnId;
    use std::path::PathBuf;

    fn table(axis: &[f64], columns: &[&[f64]]) -> FileTable {
        FileTable {
            source: PathBuf::from("mem"),
            axis: axis.to_vec(),
            columns: columns.iter().map(|c| c.to_vec()).collect(),
        }
    }

    #[test]
    fn test_single_file_seeds_dataset() {
        let ds = assemble(vec![table(&[3.0, 1.0, 2.0], &[&[30.0, 10.0, 20.0]])]).unwrap();
        // no join, so file order is kept
        assert_eq!(ds.axis, vec![3.0, 1.0, 2.0]);
        assert_eq!(ds.columns[0].values, vec![Some(30.0), Some(10.0), Some(20.0)]);
    }

    #[test]
    fn test_disjoint_axes_union() {
        let ds = assemble(vec![
            table(&[1.0, 2.0, 3.0], &[&[1.0, 2.0, 3.0]]),
            table(&[4.0, 5.0, 6.0], &[&[4.0, 5.0, 6.0]]),
        ])
        .unwrap();

        assert_eq!(ds.axis, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(
            ds.columns[0].values,
            vec![Some(1.0), Some(2.0), Some(3.0), None, None, None]
        );
        assert_eq!(
            ds.columns[1].values,
            vec![None, None, None, Some(4.0), Some(5.0), Some(6.0)]
        );
    }

    #[test]
    fn test_columns_renumbered_after_join() {
        let ds = assemble(vec![
            table(&[1.0, 2.0], &[&[1.0, 1.0], &[2.0, 2.0]]),
            table(&[2.0, 3.0], &[&[3.0, 3.0]]),
            table(&[1.0], &[&[4.0]]),
        ])
        .unwrap();
        let ids: Vec<_> = ds.columns.iter().map(|c| c.id).collect();
        assert_eq!(
            ids,
            vec![ColumnId::Index(1), ColumnId::Index(2), ColumnId::Index(3), ColumnId::Index(4)]
        );
        assert_eq!(ds.axis, vec![1.0, 2.0, 3.0]);
        assert_eq!(ds.columns[2].values, vec![None, Some(3.0), Some(3.0)]);
        assert_eq!(ds.columns[3].values, vec![Some(4.0), None, None]);
    }

    #[test]
    fn test_repeated_keys_cross_product() {
        let left = SpectralDataset::from_table(table(&[1.0, 1.0], &[&[10.0, 11.0]]));
        let right = SpectralDataset::from_table(table(&[1.0, 1.0], &[&[20.0, 21.0]]));
        let joined = outer_join(&left, &right);
        assert_eq!(joined.len(), 4);
        assert_eq!(
            joined.columns[1].values,
            vec![Some(20.0), Some(21.0), Some(20.0), Some(21.0)]
        );
    }

    #[test]
    fn test_negative_zero_joins_with_zero() {
        let left = SpectralDataset::from_table(table(&[-0.0], &[&[1.0]]));
        let right = SpectralDataset::from_table(table(&[0.0], &[&[2.0]]));
        assert_eq!(outer_join(&left, &right).len(), 1);
    }

    #[test]
    fn test_dedup_identical_rows_collapse() {
        let ds = assemble(vec![table(&[1.0, 1.0, 2.0], &[&[5.0, 5.0, 6.0]])]).unwrap();
        assert_eq!(ds.axis, vec![1.0, 2.0]);
        assert_eq!(ds.columns[0].values, vec![Some(5.0), Some(6.0)]);
    }

    #[test]
    fn test_dedup_keeps_rows_sharing_only_axis() {
        let ds = assemble(vec![table(&[1.0, 1.0], &[&[5.0, 7.0]])]).unwrap();
        assert_eq!(ds.len(), 2);
    }

    #[test]
    fn test_dedup_treats_undefined_as_equal() {
        let mut ds = SpectralDataset {
            axis: vec![1.0, 1.0],
            columns: vec![Column {
                id: ColumnId::Index(1),
                values: vec![None, None],
            }],
        };
        assert_eq!(dedup_rows(&mut ds), 1);
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.columns[0].values.len(), 1);
    }

    #[test]
    fn test_empty_input_is_no_data() {
        assert!(matches!(assemble(Vec::new()), Err(PipelineError::NoData)));
    }
}
