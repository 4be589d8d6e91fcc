use std::io::Cursor;

use anyhow::Context;

use crate::{
    compose::{
        blend::over,
        downsample::downsample,
        layout::CompositeLayout,
        raster::RasterImage,
    },
    foundation::{
        core::{PixelSize, Rgba8Premul},
        error::{FlowlensError, FlowlensResult},
        math::unpremultiply_rgba8_in_place,
    },
};

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ComposeSettings {
    /// Straight RGBA fill behind every slide; keeps seams and margins free of transparency.
    pub background_rgba: [u8; 4],
    /// Upper bounds applied by [`CompositeImage::fit_for_upload`].
    pub max_width: u32,
    pub max_height: u32,
}

impl Default for ComposeSettings {
    fn default() -> Self {
        Self {
            background_rgba: [255, 255, 255, 255],
            max_width: 1568,
            max_height: 8000,
        }
    }
}

impl ComposeSettings {
    pub fn validate(&self) -> FlowlensResult<()> {
        if self.max_width == 0 || self.max_height == 0 {
            return Err(FlowlensError::validation(
                "compose max_width and max_height must be > 0",
            ));
        }
        Ok(())
    }
}

/// Slides stacked top to bottom on one canvas, plus the geometry to undo it.
///
/// Pixels are straight (non-premultiplied) RGBA8. The layout always describes the
/// slides at their natural size, even after [`downsample`](CompositeImage::downsampled).
#[derive(Clone, Debug)]
pub struct CompositeImage {
    pub size: PixelSize,
    pub rgba8: Vec<u8>,
    pub layout: CompositeLayout,
}

impl CompositeImage {
    pub fn width(&self) -> u32 {
        self.size.width
    }

    pub fn height(&self) -> u32 {
        self.size.height
    }

    pub fn to_rgba_image(&self) -> FlowlensResult<image::RgbaImage> {
        image::RgbaImage::from_raw(self.size.width, self.size.height, self.rgba8.clone())
            .ok_or_else(|| FlowlensError::render("composite buffer does not match its size"))
    }

    /// Encode the composite pixels for the analysis service.
    pub fn encode(&self, format: image::ImageFormat) -> FlowlensResult<Vec<u8>> {
        let img = self.to_rgba_image()?;
        let mut buf = Vec::new();
        let dynamic = image::DynamicImage::ImageRgba8(img);
        // JPEG has no alpha channel.
        let dynamic = match format {
            image::ImageFormat::Jpeg => image::DynamicImage::ImageRgb8(dynamic.to_rgb8()),
            _ => dynamic,
        };
        dynamic
            .write_to(&mut Cursor::new(&mut buf), format)
            .with_context(|| format!("encode composite as {format:?}"))?;
        Ok(buf)
    }

    pub fn downsampled(&self, max_width: u32, max_height: u32) -> FlowlensResult<Self> {
        let resized = downsample(&self.to_rgba_image()?, max_width, max_height)?;
        let (width, height) = resized.dimensions();
        Ok(Self {
            size: PixelSize::new(width, height),
            rgba8: resized.into_raw(),
            layout: self.layout.clone(),
        })
    }

    /// Shrink to the configured payload limits.
    pub fn fit_for_upload(&self, settings: &ComposeSettings) -> FlowlensResult<Self> {
        self.downsampled(settings.max_width, settings.max_height)
    }
}

/// Stack `images` vertically, centering narrower slides on the widest one.
///
/// Any decode failure aborts the whole composition so the layout can never drift
/// out of step with the slide list.
#[tracing::instrument(skip(images, settings), fields(slides = images.len()))]
pub fn compose(
    images: &[RasterImage],
    settings: &ComposeSettings,
) -> FlowlensResult<CompositeImage> {
    if images.is_empty() {
        return Err(FlowlensError::validation("compose requires at least one image"));
    }

    let mut decoded = Vec::with_capacity(images.len());
    for (idx, img) in images.iter().enumerate() {
        let px = img
            .decode_premul()
            .with_context(|| format!("decode slide {idx}"))?;
        decoded.push(px);
    }

    let sizes: Vec<PixelSize> = images.iter().map(RasterImage::size).collect();
    let layout = CompositeLayout::from_sizes(&sizes);
    let canvas_width = layout
        .canvas_width()
        .ok_or_else(|| FlowlensError::validation("compose requires at least one image"))?;
    let total_height = u32::try_from(layout.total_height())
        .map_err(|_| FlowlensError::validation("composite height overflows u32"))?;
    let size = PixelSize::new(canvas_width, total_height);

    let [r, g, b, a] = settings.background_rgba;
    let bg = Rgba8Premul::from_straight_rgba(r, g, b, a).to_array();
    let mut out = bg.repeat(size.rgba8_len()? / 4);

    let row_stride = canvas_width as usize * 4;
    let mut running_y = 0usize;
    for (idx, (img, px)) in images.iter().zip(&decoded).enumerate() {
        let x_off = layout.x_offset(idx).unwrap_or(0) as usize;
        let src_stride = img.width() as usize * 4;
        for (row, src_row) in px.chunks_exact(src_stride).enumerate() {
            let start = (running_y + row) * row_stride + x_off * 4;
            let dst_row = &mut out[start..start + src_stride];
            for (d, s) in dst_row.chunks_exact_mut(4).zip(src_row.chunks_exact(4)) {
                let blended = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]], 1.0);
                d.copy_from_slice(&blended);
            }
        }
        tracing::debug!(slide = idx, x_off, y_off = running_y, "placed slide");
        running_y += img.height() as usize;
    }

    unpremultiply_rgba8_in_place(&mut out);

    tracing::debug!(
        width = size.width,
        height = size.height,
        "composed {} slides",
        images.len()
    );
    Ok(CompositeImage {
        size,
        rgba8: out,
        layout,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/compose/compositor.rs"]
mod tests;
