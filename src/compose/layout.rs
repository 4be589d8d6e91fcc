use crate::foundation::{
    core::PixelSize,
    error::{FlowlensError, FlowlensResult},
};

/// Per-slide geometry needed to undo a vertical composition.
///
/// `heights` is always present. `widths`/`canvas_width` are missing in records written
/// before horizontal centering was tracked; without them no horizontal correction is made.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositeLayout {
    pub heights: Vec<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub widths: Option<Vec<u32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canvas_width: Option<u32>,
}

impl CompositeLayout {
    pub fn from_sizes(sizes: &[PixelSize]) -> Self {
        let heights = sizes.iter().map(|s| s.height).collect();
        let widths: Vec<u32> = sizes.iter().map(|s| s.width).collect();
        let canvas_width = widths.iter().copied().max();
        Self {
            heights,
            widths: Some(widths),
            canvas_width,
        }
    }

    pub fn slide_count(&self) -> usize {
        self.heights.len()
    }

    pub fn total_height(&self) -> u64 {
        self.heights.iter().map(|&h| u64::from(h)).sum()
    }

    /// Top edge of every slide in composite pixels; `offsets[0] == 0`.
    pub fn y_offsets(&self) -> Vec<u64> {
        let mut acc = 0u64;
        self.heights
            .iter()
            .map(|&h| {
                let top = acc;
                acc += u64::from(h);
                top
            })
            .collect()
    }

    /// Width of the composite canvas, falling back to the widest slide.
    pub fn canvas_width(&self) -> Option<u32> {
        self.canvas_width
            .or_else(|| self.widths.as_ref()?.iter().copied().max())
    }

    /// Left edge of slide `index` inside the canvas, as drawn by the compositor.
    pub fn x_offset(&self, index: usize) -> Option<u32> {
        let w = *self.widths.as_ref()?.get(index)?;
        let canvas = self.canvas_width()?;
        Some(canvas.saturating_sub(w) / 2)
    }

    /// Horizontal geometry, if the record carries it.
    pub(crate) fn horizontal(&self) -> Option<(&[u32], u32)> {
        let widths = self.widths.as_deref()?;
        Some((widths, self.canvas_width()?))
    }

    /// Check the layout against the number of slides it is supposed to describe.
    pub fn validate_for(&self, slide_count: usize) -> FlowlensResult<()> {
        if self.heights.len() != slide_count {
            return Err(FlowlensError::layout(format!(
                "heights has {} entries for {} slides",
                self.heights.len(),
                slide_count
            )));
        }
        if self.heights.contains(&0) {
            return Err(FlowlensError::layout("slide heights must be > 0"));
        }
        if let Some(widths) = &self.widths {
            if widths.len() != slide_count {
                return Err(FlowlensError::layout(format!(
                    "widths has {} entries for {} slides",
                    widths.len(),
                    slide_count
                )));
            }
            if widths.contains(&0) {
                return Err(FlowlensError::layout("slide widths must be > 0"));
            }
            let widest = widths.iter().copied().max().unwrap_or(0);
            if let Some(canvas) = self.canvas_width
                && canvas < widest
            {
                return Err(FlowlensError::layout(format!(
                    "canvas width {canvas} is narrower than widest slide {widest}"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/layout.rs"]
mod tests;
