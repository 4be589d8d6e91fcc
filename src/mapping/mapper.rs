//! Reprojection from composite-percentage space onto individual slides.
//!
//! Composite coordinates are percentages of the stitched image; slide coordinates are
//! percentages of one slide's own box. The [`CompositeLayout`] recorded at composition
//! time is all that is needed to go between the two.

use crate::{
    compose::CompositeLayout,
    foundation::{
        core::clamp_pct,
        error::{FlowlensError, FlowlensResult},
    },
    model::annotation::{AnnotationPoint, SlideAnnotation},
};

/// What to do when the stored layout does not describe the slide list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MismatchPolicy {
    /// Return a layout error.
    Strict,
    /// Log a warning and place every point on slide 0 without horizontal correction.
    Degrade,
}

impl Default for MismatchPolicy {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            Self::Strict
        } else {
            Self::Degrade
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MapperSettings {
    pub on_mismatch: MismatchPolicy,
}

/// A point resolved onto one slide.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SlidePoint {
    pub slide_index: usize,
    pub x: f64,
    pub y: f64,
}

/// Map one composite-percentage point onto the slide that contains it.
///
/// `layout` may be `None` only for single-slide (legacy) data. Input coordinates are
/// clamped to `[0, 100]`; so are the results, which pins points that fall in a narrow
/// slide's side margin to its edge. An empty slide list has nowhere to place a point
/// and is rejected under either mismatch policy.
pub fn map_point(
    x: f64,
    y: f64,
    slide_count: usize,
    layout: Option<&CompositeLayout>,
    settings: &MapperSettings,
) -> FlowlensResult<SlidePoint> {
    if slide_count == 0 {
        return Err(FlowlensError::validation("cannot map a point onto an empty slide list"));
    }
    let (x, y) = (clamp_pct(x), clamp_pct(y));

    if slide_count == 1 {
        return Ok(SlidePoint {
            slide_index: 0,
            x,
            y,
        });
    }

    let checked = match layout {
        Some(l) => l.validate_for(slide_count).map(|_| l),
        None => Err(FlowlensError::layout(format!(
            "no layout recorded for {slide_count} slides"
        ))),
    };
    let layout = match (checked, settings.on_mismatch) {
        (Ok(l), _) => l,
        (Err(e), MismatchPolicy::Strict) => return Err(e),
        (Err(e), MismatchPolicy::Degrade) => {
            tracing::warn!(error = %e, "inconsistent composite layout; pinning to slide 0");
            return Ok(SlidePoint {
                slide_index: 0,
                x,
                y,
            });
        }
    };

    Ok(locate(x, y, layout))
}

/// Steps 2-7 of the reprojection on an already validated layout.
fn locate(x: f64, y: f64, layout: &CompositeLayout) -> SlidePoint {
    let total = layout.total_height() as f64;
    let y_abs = y * total / 100.0;
    let offsets = layout.y_offsets();
    let last = offsets.len() - 1;

    let mut slide_index = offsets
        .iter()
        .enumerate()
        .position(|(i, &top)| {
            let bottom = offsets.get(i + 1).map_or(f64::INFINITY, |&b| b as f64);
            top as f64 <= y_abs && y_abs < bottom
        })
        .unwrap_or(last);

    // Absorb rounding at the very bottom edge.
    if y_abs >= total - 1.0 {
        slide_index = last;
    }

    let top = offsets[slide_index] as f64;
    let height = f64::from(layout.heights[slide_index]);
    let slide_y = (y_abs - top) / height * 100.0;

    let slide_x = match layout.horizontal() {
        Some((widths, canvas)) => {
            let width = f64::from(widths[slide_index]);
            let x_off = f64::from(canvas.saturating_sub(widths[slide_index]) / 2);
            let x_abs = x * f64::from(canvas) / 100.0;
            (x_abs - x_off) / width * 100.0
        }
        None => x,
    };

    SlidePoint {
        slide_index,
        x: clamp_pct(slide_x),
        y: clamp_pct(slide_y),
    }
}

/// Inverse of [`map_point`]: slide percentages back to composite percentages.
pub fn to_composite(
    slide_index: usize,
    x: f64,
    y: f64,
    layout: &CompositeLayout,
) -> FlowlensResult<(f64, f64)> {
    layout.validate_for(layout.slide_count())?;
    let offsets = layout.y_offsets();
    let top = *offsets.get(slide_index).ok_or_else(|| {
        FlowlensError::validation(format!(
            "slide index {slide_index} out of range for {} slides",
            offsets.len()
        ))
    })? as f64;
    let (x, y) = (clamp_pct(x), clamp_pct(y));

    let height = f64::from(layout.heights[slide_index]);
    let comp_y = (top + y * height / 100.0) / layout.total_height() as f64 * 100.0;

    let comp_x = match layout.horizontal() {
        Some((widths, canvas)) => {
            let width = f64::from(widths[slide_index]);
            let x_off = f64::from(canvas.saturating_sub(widths[slide_index]) / 2);
            (x_off + x * width / 100.0) / f64::from(canvas) * 100.0
        }
        None => x,
    };
    Ok((comp_x, comp_y))
}

/// Reproject every annotation, preserving input order. One output per input.
///
/// An empty slide list yields nothing when there is nothing to place and an error
/// otherwise.
#[tracing::instrument(skip(points, layout, settings), fields(points = points.len()))]
pub fn map_annotations(
    points: &[AnnotationPoint],
    slide_count: usize,
    layout: Option<&CompositeLayout>,
    settings: &MapperSettings,
) -> FlowlensResult<Vec<SlideAnnotation>> {
    points
        .iter()
        .map(|p| {
            let sp = map_point(p.x, p.y, slide_count, layout, settings)?;
            Ok(SlideAnnotation {
                point: p.clone(),
                slide_index: sp.slide_index,
                slide_x: sp.x,
                slide_y: sp.y,
            })
        })
        .collect()
}

/// The annotations shown on slide `index`.
pub fn annotations_for_slide(
    annotations: &[SlideAnnotation],
    index: usize,
) -> impl Iterator<Item = &SlideAnnotation> {
    annotations.iter().filter(move |a| a.slide_index == index)
}

#[cfg(test)]
#[path = "../../tests/unit/mapping/mapper.rs"]
mod tests;
