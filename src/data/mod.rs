/// Data layer: core types, decoding, alignment, tagging, filtering and
/// integration.
///
/// Architecture:
/// ```text
///   .spe            .txt / .csv / .dat
///     │                   │
///     ▼                   ▼
///   ┌──────┐          ┌──────┐
///   │ spe  │          │ text │   decode file → FileTable
///   └──────┘          └──────┘
///        \              /
///         ▼            ▼
///        ┌──────────────┐
///        │   assemble   │  outer join on axis, renumber, dedup
///        └──────────────┘
///          │          │
///          ▼          ▼
///     ┌──────┐    ┌────────┐
///     │ tags │    │ filter │  TagSequence / RangeWindow + RangeView
///     └──────┘    └────────┘
///          \          /
///           ▼        ▼
///        ┌──────────────┐
///        │   integral   │  ∫|y| dx per column
///        └──────────────┘
/// ```

pub mod assemble;
pub mod filter;
pub mod integral;
pub mod loader;
pub mod model;
pub mod spe;
pub mod tags;
pub mod text;
