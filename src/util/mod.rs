mod stats;

pub use stats::Stats;

use crate::geometry::FloatType;

/// Linear color with alpha, unclamped.
pub type Rgba = rgb::RGBA<FloatType>;

pub const TRANSPARENT: Rgba = Rgba {
    r: 0.0,
    g: 0.0,
    b: 0.0,
    a: 0.0,
};

/// Componentwise product of two colors (light color filtered by a surface color).
pub fn component_mul(a: Rgba, b: Rgba) -> Rgba {
    Rgba::new(a.r * b.r, a.g * b.g, a.b * b.b, a.a * b.a)
}

/// True if the color doesn't contribute anything when used as a filter.
pub fn is_black(color: &Rgba) -> bool {
    color.r == 0.0 && color.g == 0.0 && color.b == 0.0
}
