//! flowlens turns a sequence of app screenshots into one analyzable flow and back.
//!
//! # Pipeline overview
//!
//! 1. **Compose**: `RasterImage[] -> CompositeImage` (slides stacked vertically, narrow
//!    slides centered) plus the [`CompositeLayout`] needed to undo it.
//! 2. **Map**: `AnnotationPoint[]` in composite percentages `-> SlideAnnotation[]` in
//!    per-slide percentages.
//! 3. **Render**: per-slide points `-> HeatmapRaster`, a severity-weighted density overlay.
//!
//! Every stage is a pure function over in-memory data. File IO lives in the `flowlens`
//! binary only.
#![forbid(unsafe_code)]

mod compose;
mod foundation;
mod heatmap;
mod mapping;
mod model;
mod settings;

pub use compose::{
    ComposeSettings, CompositeImage, CompositeLayout, RasterImage, compose,
    downsample::{downsample, fit_within},
    slide_set::SlideSet,
};
pub use foundation::core::{PixelSize, Point, Rgba8Premul, clamp_pct};
pub use foundation::error::{FlowlensError, FlowlensResult};
pub use heatmap::field::{DensityField, HeatPoint, accumulate};
pub use heatmap::ramp::{alpha_for, colorize_density, ramp_rgb};
pub use heatmap::render::{
    HeatmapRaster, colorize, overlay_onto, render_heatmap, render_slide_heatmap,
};
pub use heatmap::settings::{FieldParams, HeatmapSettings, HeatmapThreading};
pub use mapping::mapper::{
    MapperSettings, MismatchPolicy, SlidePoint, annotations_for_slide, map_annotations,
    map_point, to_composite,
};
pub use model::annotation::{
    AnnotationPoint, AuditRecord, Severity, SlideAnnotation, parse_annotations,
};
pub use settings::EngineSettings;
