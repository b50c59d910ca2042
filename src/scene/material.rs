use crate::{geometry::FloatType, util::Rgba};

/// Phong material with a reflective tint.
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    /// Multiplied by the scene's ambient light
    pub ambient: Rgba,
    pub diffuse: Rgba,
    pub specular: Rgba,
    pub specular_exponent: FloatType,
    /// Filter applied to the light arriving along the mirror direction
    pub reflection: Rgba,
}

impl Default for Material {
    fn default() -> Self {
        Material {
            ambient: Rgba::new(0.0, 0.5, 0.0, 0.0),
            diffuse: Rgba::new(0.5, 0.5, 0.5, 0.0),
            specular: Rgba::new(0.2, 0.2, 0.2, 0.0),
            specular_exponent: 256.0,
            reflection: Rgba::new(0.7, 0.7, 0.7, 0.0),
        }
    }
}
