use rayon::prelude::*;

use crate::{
    foundation::{
        core::{PixelSize, Point, clamp_pct},
        error::{FlowlensError, FlowlensResult},
    },
    heatmap::settings::{HeatmapSettings, HeatmapThreading},
    model::annotation::{Severity, SlideAnnotation},
};

/// A point to render, in slide-relative percentages.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeatPoint {
    pub x: f64,
    pub y: f64,
    pub severity: Severity,
}

impl From<&SlideAnnotation> for HeatPoint {
    fn from(a: &SlideAnnotation) -> Self {
        Self {
            x: a.slide_x,
            y: a.slide_y,
            severity: a.severity(),
        }
    }
}

/// A point placed in pixel space with its falloff parameters resolved.
#[derive(Clone, Copy, Debug)]
struct PlacedField {
    center: Point,
    radius: f64,
    peak: f64,
}

impl PlacedField {
    fn value_at(&self, p: Point) -> f64 {
        let dist = self.center.distance(p);
        if dist >= self.radius {
            return 0.0;
        }
        self.peak * (1.0 - dist / self.radius)
    }

    fn spans_row(&self, y: f64) -> bool {
        (self.center.y - y).abs() < self.radius
    }
}

/// Accumulated density in `[0, 1]` per pixel, row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct DensityField {
    pub size: PixelSize,
    pub values: Vec<f32>,
}

impl DensityField {
    /// Density at pixel `(x, y)`; 0 outside the field.
    pub fn at(&self, x: u32, y: u32) -> f32 {
        if x >= self.size.width || y >= self.size.height {
            return 0.0;
        }
        self.values[y as usize * self.size.width as usize + x as usize]
    }

    pub fn max(&self) -> f32 {
        self.values.iter().copied().fold(0.0, f32::max)
    }
}

/// Sum every point's radial field with screen accumulation, `d = 1 - Π(1 - v)`.
///
/// Points are sorted into a canonical order first so the result does not depend on
/// the order they arrive in.
pub fn accumulate(
    points: &[HeatPoint],
    size: PixelSize,
    settings: &HeatmapSettings,
) -> FlowlensResult<DensityField> {
    in_pool(&settings.threading, || fill_density(points, size, settings))?
}

/// [`accumulate`] on whichever rayon pool is current.
pub(crate) fn fill_density(
    points: &[HeatPoint],
    size: PixelSize,
    settings: &HeatmapSettings,
) -> FlowlensResult<DensityField> {
    if size.is_empty() {
        return Ok(DensityField {
            size,
            values: Vec::new(),
        });
    }
    let len = size.rgba8_len()? / 4;

    let mut fields: Vec<PlacedField> = points
        .iter()
        .map(|p| {
            let params = settings.params_for(p.severity);
            PlacedField {
                center: Point::new(
                    clamp_pct(p.x) / 100.0 * f64::from(size.width),
                    clamp_pct(p.y) / 100.0 * f64::from(size.height),
                ),
                radius: params.radius_px,
                peak: params.peak.clamp(0.0, 1.0),
            }
        })
        .collect();
    fields.sort_by(|a, b| {
        a.center
            .y
            .total_cmp(&b.center.y)
            .then(a.center.x.total_cmp(&b.center.x))
            .then(a.radius.total_cmp(&b.radius))
            .then(a.peak.total_cmp(&b.peak))
    });

    let mut values = vec![0.0f32; len];
    let width = size.width as usize;
    let fill_row = |(y, row): (usize, &mut [f32])| {
        let cy = y as f64 + 0.5;
        let near: Vec<&PlacedField> = fields.iter().filter(|f| f.spans_row(cy)).collect();
        if near.is_empty() {
            return;
        }
        for (x, out) in row.iter_mut().enumerate() {
            let p = Point::new(x as f64 + 0.5, cy);
            let mut remaining = 1.0f64;
            for f in &near {
                remaining *= 1.0 - f.value_at(p);
            }
            *out = (1.0 - remaining).clamp(0.0, 1.0) as f32;
        }
    };

    if settings.threading.parallel {
        values.par_chunks_mut(width).enumerate().for_each(fill_row);
    } else {
        values.chunks_mut(width).enumerate().for_each(fill_row);
    }

    Ok(DensityField { size, values })
}

/// Run `f` inside a dedicated pool when one is configured, otherwise on the caller's.
///
/// The pool lives for this one call, so callers with several parallel stages should
/// put all of them inside a single `f`.
pub(crate) fn in_pool<R, F>(threading: &HeatmapThreading, f: F) -> FlowlensResult<R>
where
    F: FnOnce() -> R + Send,
    R: Send,
{
    match (threading.parallel, threading.threads) {
        (true, Some(n)) => Ok(build_thread_pool(n)?.install(f)),
        _ => Ok(f()),
    }
}

fn build_thread_pool(threads: usize) -> FlowlensResult<rayon::ThreadPool> {
    if threads == 0 {
        return Err(FlowlensError::validation(
            "heatmap threading 'threads' must be >= 1 when set",
        ));
    }
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .map_err(|e| FlowlensError::render(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/heatmap/field.rs"]
mod tests;
