use image::{RgbaImage, imageops::FilterType};

use crate::foundation::{
    core::PixelSize,
    error::{FlowlensError, FlowlensResult},
};

/// Largest size no bigger than `max_width` x `max_height` with the same aspect ratio.
///
/// Width is fitted first; the result is then re-checked against `max_height`, since a
/// tall stack of screens can exceed the height limit even after the width fit.
/// Never upscales.
pub fn fit_within(size: PixelSize, max_width: u32, max_height: u32) -> PixelSize {
    let (mut w, mut h) = (u64::from(size.width), u64::from(size.height));
    let (max_w, max_h) = (u64::from(max_width), u64::from(max_height));

    if w > max_w && w > 0 {
        h = scale_round(h, max_w, w);
        w = max_w;
    }
    if h > max_h && h > 0 {
        w = scale_round(w, max_h, h);
        h = max_h;
    }
    PixelSize::new(w as u32, h as u32)
}

fn scale_round(v: u64, num: u64, den: u64) -> u64 {
    ((v * num + den / 2) / den).max(1)
}

#[tracing::instrument(skip(image), fields(width = image.width(), height = image.height()))]
pub fn downsample(image: &RgbaImage, max_width: u32, max_height: u32) -> FlowlensResult<RgbaImage> {
    if max_width == 0 || max_height == 0 {
        return Err(FlowlensError::validation("downsample bounds must be > 0"));
    }
    let src = PixelSize::new(image.width(), image.height());
    let dst = fit_within(src, max_width, max_height);
    if dst == src {
        return Ok(image.clone());
    }
    tracing::debug!(to_width = dst.width, to_height = dst.height, "downsampling");
    Ok(image::imageops::resize(
        image,
        dst.width,
        dst.height,
        FilterType::Triangle,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/compose/downsample.rs"]
mod tests;
