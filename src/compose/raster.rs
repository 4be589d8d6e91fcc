use std::{io::Cursor, sync::Arc};

use anyhow::Context;

use crate::foundation::{
    core::PixelSize,
    error::{FlowlensError, FlowlensResult},
    math::premultiply_rgba8_in_place,
};

/// Where a raster's pixels come from.
#[derive(Clone, Debug)]
enum RasterSource {
    /// Encoded file bytes (PNG, JPEG, ...), decoded lazily at composition time.
    Encoded(Arc<[u8]>),
    /// Straight (non-premultiplied) RGBA8 pixels, row-major.
    Rgba8(Arc<[u8]>),
}

/// One uploaded screen. Immutable once constructed.
#[derive(Clone, Debug)]
pub struct RasterImage {
    width: u32,
    height: u32,
    source: RasterSource,
}

impl RasterImage {
    /// Wrap encoded bytes whose natural dimensions are already known to the caller.
    pub fn encoded(width: u32, height: u32, bytes: impl Into<Arc<[u8]>>) -> FlowlensResult<Self> {
        check_dims(width, height)?;
        Ok(Self {
            width,
            height,
            source: RasterSource::Encoded(bytes.into()),
        })
    }

    /// Wrap encoded bytes, reading the natural dimensions from the image header.
    pub fn probe(bytes: impl Into<Arc<[u8]>>) -> FlowlensResult<Self> {
        let bytes: Arc<[u8]> = bytes.into();
        let (width, height) = image::ImageReader::new(Cursor::new(&bytes[..]))
            .with_guessed_format()
            .context("guess image format")?
            .into_dimensions()
            .context("read image dimensions")?;
        Self::encoded(width, height, bytes)
    }

    pub fn from_rgba8(
        width: u32,
        height: u32,
        pixels: impl Into<Arc<[u8]>>,
    ) -> FlowlensResult<Self> {
        check_dims(width, height)?;
        let pixels: Arc<[u8]> = pixels.into();
        if pixels.len() != PixelSize::new(width, height).rgba8_len()? {
            return Err(FlowlensError::validation("rgba8 raster expects width*height*4 bytes"));
        }
        Ok(Self {
            width,
            height,
            source: RasterSource::Rgba8(pixels),
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> PixelSize {
        PixelSize::new(self.width, self.height)
    }

    /// Decode to premultiplied RGBA8 at the declared size.
    pub(crate) fn decode_premul(&self) -> FlowlensResult<Vec<u8>> {
        let mut rgba = match &self.source {
            RasterSource::Rgba8(px) => px.to_vec(),
            RasterSource::Encoded(bytes) => {
                let img = image::load_from_memory(bytes)
                    .context("decode image from memory")?
                    .to_rgba8();
                if img.dimensions() != (self.width, self.height) {
                    return Err(FlowlensError::validation(format!(
                        "decoded size {}x{} disagrees with declared {}x{}",
                        img.width(),
                        img.height(),
                        self.width,
                        self.height
                    )));
                }
                img.into_raw()
            }
        };
        premultiply_rgba8_in_place(&mut rgba);
        Ok(rgba)
    }
}

fn check_dims(width: u32, height: u32) -> FlowlensResult<()> {
    if width == 0 || height == 0 {
        return Err(FlowlensError::validation("raster width and height must be > 0"));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/compose/raster.rs"]
mod tests;
