mod image_planes;
mod machinery;
mod shading;
mod worker;

pub use image_planes::{RgbaPlanes, color_to_image};
pub use machinery::{RenderProgress, render};
pub use worker::{TraceStats, Worker};

const DEFAULT_TILE_SIZE: std::num::NonZeroU32 = std::num::NonZeroU32::new(64).unwrap();

#[derive(Copy, Clone, Debug)]
pub struct RenderSettings {
    /// Side of the square tiles the image is rendered in
    pub tile_size: std::num::NonZeroU32,
    /// Number of mirror bounces followed after the primary hit
    pub max_bounce: u32,
}

impl Default for RenderSettings {
    fn default() -> Self {
        RenderSettings {
            tile_size: DEFAULT_TILE_SIZE,
            max_bounce: 5,
        }
    }
}
