//! Module implementing the caption layout: line wrapping & vertical placement.
//!
//! Everything here is pure computation over text measurements.
//! Actual glyphs are only touched by whatever implements `Measure`.

mod metrics;
mod plan;
mod wrap;


pub use self::metrics::{Bounds, GlyphMetrics, Measure};
pub use self::plan::{Gravity, LayoutResult, DESCENDERS, plan};
pub use self::wrap::{WrappedLines, available_width, wrap};
