mod camera;
pub mod config;
pub mod geometry;
mod renderer;
pub mod scene;
mod screen_block;
mod util;

pub use crate::renderer::{
    RenderProgress, RenderSettings, RgbaPlanes, TraceStats, Worker, color_to_image, render,
};
pub use camera::{Camera, Projection};
pub use scene::Scene;
pub use util::{Rgba, Stats};
