//! Photoluminescence spectra pipeline.
//!
//! Imports SPE binary files or delimited text spectra, aligns them on a shared
//! axis, lets the operator tag the acquisitions with an experimental variable,
//! restricts the axis range and integrates each acquisition.
//!
//! # Example
//!
//! ```no_run
//! use rusty_lumen::config::Config;
//! use rusty_lumen::data::filter::RangeInput;
//! use rusty_lumen::data::tags::TagTriple;
//! use rusty_lumen::data::text::Delimiter;
//! use rusty_lumen::pipeline::Pipeline;
//!
//! let mut pipeline = Pipeline::new(Config::default());
//! pipeline.import_files(&["field_sweep.spe"], Delimiter::Whitespace)?;
//! pipeline.apply_tags(&[TagTriple::new("0", "9", "1")])?;
//! pipeline.set_range(&RangeInput::new("700", "760", "", ""))?;
//! for point in pipeline.compute_integrals()?.points {
//!     println!("{} {}", point.label, point.value);
//! }
//! # Ok::<(), rusty_lumen::error::PipelineError>(())
//! ```

pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod export;
pub mod pipeline;

pub use config::Config;
pub use data::model::{IntegralSeries, RangeWindow, SpectralDataset, TagSequence};
pub use error::{PipelineError, Result};
pub use pipeline::{Pipeline, PipelineContext};
