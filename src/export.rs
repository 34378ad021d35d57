//! Writers for the restricted table and its false-colour snapshot.

use std::path::{Path, PathBuf};

use image::{Rgb, RgbImage};

use crate::color::ColorScale;
use crate::data::filter::RangeView;
use crate::data::model::format_value;
use crate::error::{PipelineError, Result};

/// Header of the axis column in exported tables.
pub const AXIS_HEADER: &str = "wavedata";

/// Text written for undefined cells.
const UNDEFINED_CELL: &str = "NaN";

/// Files produced by one export.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportPaths {
    pub data: PathBuf,
    pub image: Option<PathBuf>,
}

/// Write the rows of `view` as space-delimited text.  The header is
/// `wavedata` followed by one label per column.
pub fn write_table(path: &Path, view: &RangeView<'_>, labels: &[String]) -> Result<()> {
    let csv_err = |source: csv::Error| PipelineError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = csv::WriterBuilder::new()
        .delimiter(b' ')
        .from_path(path)
        .map_err(csv_err)?;

    let header = std::iter::once(AXIS_HEADER.to_string()).chain(labels.iter().cloned());
    writer.write_record(header).map_err(csv_err)?;

    let dataset = view.dataset;
    for &row in &view.rows {
        let record = std::iter::once(format_value(dataset.axis[row])).chain(
            dataset.columns.iter().map(|col| match col.values[row] {
                Some(v) => format_value(v),
                None => UNDEFINED_CELL.to_string(),
            }),
        );
        writer.write_record(record).map_err(csv_err)?;
    }
    writer
        .flush()
        .map_err(|e| PipelineError::io(path, e))?;

    log::info!(
        "exported {} rows x {} column(s) to {}",
        view.len(),
        dataset.n_columns(),
        path.display()
    );
    Ok(())
}

/// Render the view as a false-colour map: one horizontal band of
/// `band_height` pixels per column (first column at the bottom), one pixel
/// per axis sample in ascending order, colours clamped to the window's
/// intensity bounds.
pub fn render_false_color(view: &RangeView<'_>, band_height: u32) -> Result<RgbImage> {
    let dataset = view.dataset;
    if view.is_empty() || dataset.columns.is_empty() {
        return Err(PipelineError::NoData);
    }

    let rows = view.rows_by_axis();
    let band_height = band_height.max(1);
    let width = rows.len() as u32;
    let n_cols = dataset.columns.len() as u32;
    let scale = ColorScale::new(view.window.y_min, view.window.y_max);

    let mut img = RgbImage::new(width, n_cols * band_height);
    for (c, col) in dataset.columns.iter().enumerate() {
        let band_top = (n_cols - 1 - c as u32) * band_height;
        for (px, &row) in rows.iter().enumerate() {
            let color = Rgb(scale.color_for(col.values[row]));
            for dy in 0..band_height {
                img.put_pixel(px as u32, band_top + dy, color);
            }
        }
    }
    Ok(img)
}

/// Render and save the false-colour snapshot as PNG.
pub fn write_snapshot(path: &Path, view: &RangeView<'_>, band_height: u32) -> Result<()> {
    let img = render_false_color(view, band_height)?;
    img.save_with_format(path, image::ImageFormat::Png)
        .map_err(|source| PipelineError::Image {
            path: path.to_path_buf(),
            source,
        })?;
    log::info!("wrote snapshot {}x{} to {}", img.width(), img.height(), path.display());
    Ok(())
}
