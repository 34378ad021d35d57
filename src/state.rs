use std::path::{Path, PathBuf};

use eframe::egui::{self, Color32, TextureHandle};

use rusty_lumen::color::generate_palette;
use rusty_lumen::config::Config;
use rusty_lumen::data::filter::RangeInput;
use rusty_lumen::data::model::IntegralSeries;
use rusty_lumen::data::spe::decode;
use rusty_lumen::data::tags::TagTriple;
use rusty_lumen::data::text::Delimiter;
use rusty_lumen::export::render_false_color;
use rusty_lumen::Pipeline;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Import → analysis pipeline; owns the dataset and derived state.
    pub pipeline: Pipeline,

    /// Separator used for the next text import.
    pub delimiter: Delimiter,

    /// Tag rows as typed by the operator.
    pub tag_rows: Vec<TagTriple>,

    /// Range entries as typed by the operator.
    pub range_input: RangeInput,

    /// Write the false-colour snapshot on export.
    pub export_image: bool,

    /// Integrals for the current window / tags (cached).
    pub integrals: Option<IntegralSeries>,

    /// One line colour per column.
    pub line_colors: Vec<Color32>,

    /// Summary of the first imported SPE header.
    pub header_info: Option<String>,

    /// False-colour map texture; `None` when it must be rebuilt.
    pub false_color: Option<TextureHandle>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            delimiter: config.delimiter,
            tag_rows: vec![TagTriple::default(); config.tag_slots],
            range_input: RangeInput::default(),
            export_image: config.export.with_image,
            integrals: None,
            line_colors: Vec::new(),
            header_info: None,
            false_color: None,
            status_message: None,
            pipeline: Pipeline::new(config),
        }
    }

    /// Import a batch of files, replacing everything derived from the last one.
    pub fn import(&mut self, paths: Vec<PathBuf>) {
        match self.pipeline.import_files(&paths, self.delimiter) {
            Ok(dataset) => {
                self.line_colors = generate_palette(dataset.n_columns())
                    .into_iter()
                    .map(|[r, g, b]| Color32::from_rgb(r, g, b))
                    .collect();
                self.range_input = RangeInput::default();
                self.header_info = paths.iter().find_map(|p| spe_summary(p, self.precision()));
                self.status_message = None;
                self.refresh();
            }
            Err(e) => {
                log::error!("Failed to import: {e}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    fn precision(&self) -> usize {
        self.pipeline.config().label_precision
    }

    /// Recompute integrals and invalidate the false-colour texture.
    pub fn refresh(&mut self) {
        self.integrals = self.pipeline.compute_integrals().ok();
        self.false_color = None;
    }

    pub fn apply_tags(&mut self) {
        match self.pipeline.apply_tags(&self.tag_rows) {
            Ok(Some(tags)) => self.status_message = Some(format!("{} tags applied", tags.len())),
            Ok(None) => self.status_message = Some("Tags cleared".to_string()),
            Err(e) => self.status_message = Some(format!("Error: {e}")),
        }
        self.refresh();
    }

    pub fn crop(&mut self) {
        if let Err(e) = self.pipeline.set_range(&self.range_input) {
            self.status_message = Some(format!("Error: {e}"));
        }
        self.refresh();
    }

    pub fn remap_to_grid(&mut self) {
        match self.pipeline.remap_to_grid() {
            Ok(side) => self.status_message = Some(format!("Mapped to {side}x{side} grid")),
            Err(e) => self.status_message = Some(format!("Error: {e}")),
        }
        self.refresh();
    }

    pub fn export(&mut self, dir: &Path) {
        match self.pipeline.export(dir, self.export_image) {
            Ok(paths) => {
                self.status_message = Some(format!("Exported {}", paths.data.display()));
            }
            Err(e) => {
                log::error!("Failed to export: {e}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// The false-colour texture, built on first use after a change.
    pub fn false_color_texture(&mut self, ctx: &egui::Context) -> Option<&TextureHandle> {
        if self.false_color.is_none() {
            let context = self.pipeline.context()?;
            let band = self.pipeline.config().export.image_band_height;
            let img = render_false_color(&context.view(), band).ok()?;
            let size = [img.width() as usize, img.height() as usize];
            let color_image = egui::ColorImage::from_rgb(size, img.as_raw());
            self.false_color =
                Some(ctx.load_texture("false_color", color_image, egui::TextureOptions::NEAREST));
        }
        self.false_color.as_ref()
    }
}

/// Header summary for SPE files; `None` for anything else.
fn spe_summary(path: &Path, precision: usize) -> Option<String> {
    let is_spe = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("spe"));
    if !is_spe {
        return None;
    }
    let bytes = std::fs::read(path).ok()?;
    let spe = decode(&bytes).ok()?;
    let labels = spe.axis_labels(precision);
    let name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
    Some(format!(
        "Loaded file: {name}\n{}\nAxis: {} – {} ({} samples)",
        spe.header,
        labels.first()?,
        labels.last()?,
        labels.len()
    ))
}
