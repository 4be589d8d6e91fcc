pub(crate) mod blend;
pub(crate) mod compositor;
pub(crate) mod downsample;
pub(crate) mod layout;
pub(crate) mod raster;
pub(crate) mod slide_set;

pub use compositor::{ComposeSettings, CompositeImage, compose};
pub use layout::CompositeLayout;
pub use raster::RasterImage;
