use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::data::assemble::assemble;
use crate::data::filter::{resolve_window, restrict, RangeInput, RangeView};
use crate::data::integral::integrate_view;
use crate::data::loader::load_files;
use crate::data::model::{IntegralSeries, RangeWindow, SpectralDataset, TagSequence};
use crate::data::tags::{build_tags, TagTriple};
use crate::data::text::Delimiter;
use crate::error::{PipelineError, Result};
use crate::export::{write_snapshot, write_table, ExportPaths};

// ---------------------------------------------------------------------------
// Pipeline context
// ---------------------------------------------------------------------------

/// Everything derived from one import.  Replaced wholesale on re-import.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineContext {
    pub files: Vec<PathBuf>,
    pub dataset: SpectralDataset,
    pub tags: Option<TagSequence>,
    /// `None` until the operator sets a range; readers fall back to the data
    /// extents.
    pub window: Option<RangeWindow>,
}

impl PipelineContext {
    pub fn new(files: Vec<PathBuf>, dataset: SpectralDataset) -> Self {
        Self {
            files,
            dataset,
            tags: None,
            window: None,
        }
    }

    /// The operator's window, or the full data extent.
    pub fn window(&self) -> RangeWindow {
        self.window
            .unwrap_or_else(|| resolve_window(&self.dataset, &RangeInput::default()))
    }

    pub fn view(&self) -> RangeView<'_> {
        restrict(&self.dataset, self.window())
    }

    /// Column labels under the current tags.
    pub fn labels(&self) -> Vec<String> {
        self.dataset.column_labels(self.tags.as_ref())
    }
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Import → tag / range → integrate → export.  The viewer holds one of these
/// and only calls its operations.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    config: Config,
    context: Option<PipelineContext>,
}

impl Pipeline {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            context: None,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn context(&self) -> Option<&PipelineContext> {
        self.context.as_ref()
    }

    pub fn dataset(&self) -> Option<&SpectralDataset> {
        self.context.as_ref().map(|c| &c.dataset)
    }

    fn context_mut(&mut self) -> Result<&mut PipelineContext> {
        self.context.as_mut().ok_or(PipelineError::NoData)
    }

    fn context_ref(&self) -> Result<&PipelineContext> {
        self.context.as_ref().ok_or(PipelineError::NoData)
    }

    /// Load, align and deduplicate `paths`.  On success all derived state
    /// (tags, range) is discarded; on failure the previous import is kept
    /// untouched.
    pub fn import_files<P: AsRef<Path>>(
        &mut self,
        paths: &[P],
        delimiter: Delimiter,
    ) -> Result<&SpectralDataset> {
        let tables = load_files(paths, delimiter)?;
        let mut dataset = assemble(tables)?;
        if self.config.raster_scan {
            dataset.remap_to_grid();
        }

        let files = paths.iter().map(|p| p.as_ref().to_path_buf()).collect();
        log::info!(
            "imported {} file(s): {} rows x {} column(s)",
            paths.len(),
            dataset.len(),
            dataset.n_columns()
        );
        let context = self.context.insert(PipelineContext::new(files, dataset));
        Ok(&context.dataset)
    }

    /// Relabel columns as a square raster scan.  Returns the grid side.
    pub fn remap_to_grid(&mut self) -> Result<usize> {
        Ok(self.context_mut()?.dataset.remap_to_grid())
    }

    /// Replace the tag sequence.  `None` when fewer than two tags result.
    pub fn apply_tags(&mut self, triples: &[TagTriple]) -> Result<Option<&TagSequence>> {
        let context = self.context_mut()?;
        context.tags = build_tags(triples);
        match &context.tags {
            Some(tags) => log::info!("applied {} tag(s)", tags.len()),
            None => log::info!("tags cleared"),
        }
        Ok(context.tags.as_ref())
    }

    /// Resolve and store the analysis window.
    pub fn set_range(&mut self, input: &RangeInput) -> Result<RangeWindow> {
        let context = self.context_mut()?;
        let window = resolve_window(&context.dataset, input);
        context.window = Some(window);
        log::debug!("range set to {window:?}");
        Ok(window)
    }

    /// Current window (operator's or full extent).
    pub fn window(&self) -> Result<RangeWindow> {
        Ok(self.context_ref()?.window())
    }

    /// Integrated |intensity| per column over the current window.
    pub fn compute_integrals(&self) -> Result<IntegralSeries> {
        let context = self.context_ref()?;
        Ok(integrate_view(&context.view(), context.tags.as_ref()))
    }

    /// Write the windowed table (and optionally the snapshot) into `dir`
    /// using the configured file names.
    pub fn export(&self, dir: &Path, with_image: bool) -> Result<ExportPaths> {
        let context = self.context_ref()?;
        let view = context.view();
        let export = &self.config.export;

        let data = dir.join(&export.data_file);
        write_table(&data, &view, &context.labels())?;

        let image = if with_image {
            let path = dir.join(&export.image_file);
            write_snapshot(&path, &view, export.image_band_height)?;
            Some(path)
        } else {
            None
        };
        Ok(ExportPaths { data, image })
    }
}
