use std::fmt::Display;

use crate::{
    camera::Camera,
    geometry::{ScreenBlock, ScreenPoint},
    renderer::{RenderSettings, RgbaPlanes},
    scene::{Scene, triangle_bvh},
    screen_block::ScreenBlockExt as _,
    util::Rgba,
};

/// Ray counts collected while rendering.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TraceStats {
    pub primary_rays: u64,
    pub shadow_rays: u64,
    /// Shadow rays that hit something before reaching the light
    pub occluded_shadow_rays: u64,
    pub reflection_rays: u64,
}

impl Display for TraceStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} primary rays, {} shadow rays ({} occluded), {} reflection rays",
            self.primary_rays, self.shadow_rays, self.occluded_shadow_rays, self.reflection_rays
        )
    }
}

/// Per-render state: traversal stack reused across rays and ray statistics.
#[derive(Clone, Debug, Default)]
pub struct Worker {
    pub(super) bvh_stack_cache: triangle_bvh::StackCache,
    pub(super) stats: TraceStats,
}

impl Worker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> &TraceStats {
        &self.stats
    }

    pub fn render_tile(
        &mut self,
        scene: &Scene,
        camera: &Camera,
        settings: &RenderSettings,
        tile: &ScreenBlock,
        output: &mut RgbaPlanes,
    ) {
        for point in tile.internal_points() {
            let pixel = self.render_pixel(scene, camera, settings, &point);
            output.put_pixel(&point, pixel);
        }
    }

    pub fn render_pixel(
        &mut self,
        scene: &Scene,
        camera: &Camera,
        settings: &RenderSettings,
        point: &ScreenPoint,
    ) -> Rgba {
        let ray = camera.ray_for_pixel(point);
        self.stats.primary_rays += 1;
        self.shade(scene, &ray, settings.max_bounce)
    }
}
