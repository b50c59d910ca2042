use std::time::Instant;

use crate::{
    camera::Camera,
    geometry::ScreenBlock,
    renderer::{RenderSettings, RgbaPlanes, TraceStats, Worker},
    scene::Scene,
    screen_block::ScreenBlockExt as _,
};

/// Number of finished and total tiles.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RenderProgress {
    pub finished: usize,
    pub total: usize,
}

impl RenderProgress {
    pub fn percent(&self) -> f32 {
        if self.total == 0 {
            100.0
        } else {
            100.0 * (self.finished as f32) / (self.total as f32)
        }
    }
}

/// Renders the whole image tile by tile, calling `finished_tile_callback` after each tile.
pub fn render<F: FnMut(&ScreenBlock, RenderProgress)>(
    scene: &Scene,
    camera: &Camera,
    settings: &RenderSettings,
    mut finished_tile_callback: F,
) -> (RgbaPlanes, TraceStats) {
    let start = Instant::now();
    let resolution = camera.get_resolution();
    let mut output = RgbaPlanes::new(resolution);
    let mut worker = Worker::new();

    let tiles = ScreenBlock::from_size(resolution).tiles(settings.tile_size);
    let total = tiles.len();

    log::info!(
        "Rendering {}x{} pixels in {} tiles, max bounce {}",
        resolution.x,
        resolution.y,
        total,
        settings.max_bounce
    );

    for (i, tile) in tiles.enumerate() {
        worker.render_tile(scene, camera, settings, &tile, &mut output);
        finished_tile_callback(
            &tile,
            RenderProgress {
                finished: i + 1,
                total,
            },
        );
    }

    let stats = *worker.stats();
    log::info!("Rendered in {:.2?}: {}", start.elapsed(), stats);

    (output, stats)
}
