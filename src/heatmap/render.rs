use std::io::Cursor;

use anyhow::Context;
use rayon::prelude::*;

use crate::{
    compose::blend::over_in_place,
    foundation::{
        core::PixelSize,
        error::{FlowlensError, FlowlensResult},
        math::{premultiply_rgba8_in_place, unpremultiply_rgba8_in_place},
    },
    heatmap::{
        field::{DensityField, HeatPoint, fill_density, in_pool},
        ramp::colorize_density,
        settings::HeatmapSettings,
    },
    mapping::mapper::annotations_for_slide,
    model::annotation::SlideAnnotation,
};

/// Colorized density overlay. Straight (non-premultiplied) RGBA8, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeatmapRaster {
    pub size: PixelSize,
    pub rgba8: Vec<u8>,
}

impl HeatmapRaster {
    pub fn is_empty(&self) -> bool {
        self.rgba8.is_empty()
    }

    pub fn to_rgba_image(&self) -> FlowlensResult<image::RgbaImage> {
        image::RgbaImage::from_raw(self.size.width, self.size.height, self.rgba8.clone())
            .ok_or_else(|| FlowlensError::render("heatmap buffer does not match its size"))
    }

    pub fn encode_png(&self) -> FlowlensResult<Vec<u8>> {
        let mut buf = Vec::new();
        image::DynamicImage::ImageRgba8(self.to_rgba_image()?)
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .context("encode heatmap png")?;
        Ok(buf)
    }
}

pub fn colorize(field: &DensityField, settings: &HeatmapSettings) -> FlowlensResult<HeatmapRaster> {
    in_pool(&settings.threading, || paint(field, settings))
}

fn paint(field: &DensityField, settings: &HeatmapSettings) -> HeatmapRaster {
    let mut rgba8 = vec![0u8; field.values.len() * 4];
    let paint_px = |(out, &d): (&mut [u8], &f32)| {
        out.copy_from_slice(&colorize_density(d, settings));
    };
    if settings.threading.parallel {
        rgba8
            .par_chunks_exact_mut(4)
            .zip(field.values.par_iter())
            .for_each(paint_px);
    } else {
        rgba8
            .chunks_exact_mut(4)
            .zip(field.values.iter())
            .for_each(paint_px);
    }
    HeatmapRaster {
        size: field.size,
        rgba8,
    }
}

/// Render a density overlay for `points` into a `size` pixel box.
///
/// Pure and idempotent: equal inputs give byte-identical output.
#[tracing::instrument(skip(points, settings), fields(points = points.len()))]
pub fn render_heatmap(
    points: &[HeatPoint],
    size: PixelSize,
    settings: &HeatmapSettings,
) -> FlowlensResult<HeatmapRaster> {
    settings.validate()?;
    // Both stages share one dedicated pool when `threads` is set.
    let (field, raster) = in_pool(&settings.threading, || {
        let field = fill_density(points, size, settings)?;
        let raster = paint(&field, settings);
        Ok::<_, FlowlensError>((field, raster))
    })??;
    tracing::debug!(peak = field.max(), "heatmap rendered");
    Ok(raster)
}

/// Heatmap for the annotations that landed on one slide.
pub fn render_slide_heatmap(
    annotations: &[SlideAnnotation],
    slide_index: usize,
    size: PixelSize,
    settings: &HeatmapSettings,
) -> FlowlensResult<HeatmapRaster> {
    let points: Vec<HeatPoint> = annotations_for_slide(annotations, slide_index)
        .map(HeatPoint::from)
        .collect();
    render_heatmap(&points, size, settings)
}

/// Flatten `heatmap` over `base` (source-over). Both must be the same size.
pub fn overlay_onto(
    base: &image::RgbaImage,
    heatmap: &HeatmapRaster,
) -> FlowlensResult<image::RgbaImage> {
    if base.dimensions() != (heatmap.size.width, heatmap.size.height) {
        return Err(FlowlensError::validation(format!(
            "overlay size {}x{} does not match base {}x{}",
            heatmap.size.width,
            heatmap.size.height,
            base.width(),
            base.height()
        )));
    }
    let mut dst = base.as_raw().clone();
    let mut src = heatmap.rgba8.clone();
    premultiply_rgba8_in_place(&mut dst);
    premultiply_rgba8_in_place(&mut src);
    over_in_place(&mut dst, &src, 1.0)?;
    unpremultiply_rgba8_in_place(&mut dst);
    image::RgbaImage::from_raw(base.width(), base.height(), dst)
        .ok_or_else(|| FlowlensError::render("overlay buffer does not match its size"))
}

#[cfg(test)]
#[path = "../../tests/unit/heatmap/render.rs"]
mod tests;
