use assert2::assert;
use bon::bon;
use nalgebra::Unit;
use serde::{Deserialize, Serialize};

use crate::geometry::{EPSILON, FloatType, Ray, ScreenPoint, ScreenSize, WorldPoint, WorldVector};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Projection {
    /// Rays diverge from the camera center
    #[default]
    Perspective,
    /// Parallel rays along the forward direction
    Orthographic,
}

#[derive(Copy, Clone, Debug)]
pub struct Camera {
    center: WorldPoint,
    forward: Unit<WorldVector>,

    resolution: ScreenSize,
    projection: Projection,

    /// Top left corner of the image plane
    image_origin: WorldPoint,
    /// Step between horizontally adjacent pixels on the image plane
    pixel_right: WorldVector,
    /// Step between vertically adjacent pixels (going down)
    pixel_down: WorldVector,
    focal_length: FloatType,
}

#[bon]
impl Camera {
    /// The image plane lies `focal_length` in front of the camera,
    /// its vertical extent is given by the field of view (in radians).
    #[builder]
    pub fn new(
        center: WorldPoint,
        forward: WorldVector,
        up: WorldVector,
        resolution: ScreenSize,
        field_of_view: FloatType,
        focal_length: FloatType,
        #[builder(default)] projection: Projection,
    ) -> Self {
        let forward = Unit::try_new(forward, EPSILON).expect("Forward vector must be non-zero");
        let up = Unit::try_new(up, EPSILON).expect("Up vector must be no-zero");
        let right = Unit::try_new(forward.cross(&up), EPSILON)
            .expect("`up` and `forward` must be linearly independent");
        let up = Unit::new_normalize(right.cross(&forward));

        assert!(resolution.x > 0);
        assert!(resolution.y > 0);
        assert!(field_of_view > 0.0);
        assert!(field_of_view < std::f64::consts::PI);
        assert!(focal_length > 0.0);

        let aspect_ratio = resolution.x as FloatType / resolution.y as FloatType;
        let half_height = (field_of_view / 2.0).tan() * focal_length;
        let half_width = half_height * aspect_ratio;

        let image_origin = center + forward.as_ref() * focal_length - right.as_ref() * half_width
            + up.as_ref() * half_height;

        Camera {
            center,
            forward,

            resolution,
            projection,

            image_origin,
            pixel_right: right.as_ref() * (2.0 * half_width / resolution.x as FloatType),
            pixel_down: -up.as_ref() * (2.0 * half_height / resolution.y as FloatType),
            focal_length,
        }
    }
}

impl Camera {
    pub fn get_resolution(&self) -> ScreenSize {
        self.resolution
    }

    /// Ray through the center of the given pixel.
    pub fn ray_for_pixel(&self, point: &ScreenPoint) -> Ray {
        let pixel_center = self.image_origin
            + self.pixel_right * (point.x as FloatType + 0.5)
            + self.pixel_down * (point.y as FloatType + 0.5);

        match self.projection {
            Projection::Perspective => Ray::new(self.center, pixel_center - self.center),
            Projection::Orthographic => Ray::new(
                pixel_center - self.forward.as_ref() * self.focal_length,
                self.forward.into_inner(),
            ),
        }
    }
}
