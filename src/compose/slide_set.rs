use std::sync::Arc;

use crate::{
    compose::{
        compositor::{ComposeSettings, CompositeImage, compose},
        raster::RasterImage,
    },
    foundation::error::{FlowlensError, FlowlensResult},
};

/// Ordered slides awaiting analysis.
///
/// The composite is built on demand and cached; any reorder or removal drops it.
#[derive(Debug, Default)]
pub struct SlideSet {
    images: Vec<RasterImage>,
    settings: ComposeSettings,
    composite: Option<Arc<CompositeImage>>,
}

impl SlideSet {
    pub fn new(settings: ComposeSettings) -> Self {
        Self {
            images: Vec::new(),
            settings,
            composite: None,
        }
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn images(&self) -> &[RasterImage] {
        &self.images
    }

    pub fn is_composed(&self) -> bool {
        self.composite.is_some()
    }

    pub fn push(&mut self, image: RasterImage) {
        self.images.push(image);
        self.composite = None;
    }

    pub fn remove(&mut self, index: usize) -> FlowlensResult<RasterImage> {
        if index >= self.images.len() {
            return Err(FlowlensError::validation(format!(
                "slide index {index} out of range for {} slides",
                self.images.len()
            )));
        }
        self.composite = None;
        Ok(self.images.remove(index))
    }

    /// Move the slide at `from` so it ends up at position `to`.
    pub fn reorder(&mut self, from: usize, to: usize) -> FlowlensResult<()> {
        let n = self.images.len();
        if from >= n || to >= n {
            return Err(FlowlensError::validation(format!(
                "reorder {from} -> {to} out of range for {n} slides"
            )));
        }
        if from == to {
            return Ok(());
        }
        let img = self.images.remove(from);
        self.images.insert(to, img);
        self.composite = None;
        Ok(())
    }

    /// The current composite, building it if needed. `None` when there are no slides.
    pub fn composite(&mut self) -> FlowlensResult<Option<Arc<CompositeImage>>> {
        if self.images.is_empty() {
            return Ok(None);
        }
        if let Some(c) = &self.composite {
            return Ok(Some(Arc::clone(c)));
        }
        let built = Arc::new(compose(&self.images, &self.settings)?);
        self.composite = Some(Arc::clone(&built));
        Ok(Some(built))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/slide_set.rs"]
mod tests;
