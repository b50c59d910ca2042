mod aabb;
mod ray_box_intersection;
mod ray_triangle_intersection;
mod triangle;

use nalgebra::{Point2, Point3, Unit, Vector2, Vector3};

pub use aabb::AABB;
pub use ray_box_intersection::RayIntersectionExt;
pub use triangle::{BarycentricCoordinates, Triangle};

pub type FloatType = f64;

/// Tolerance used for degenerate geometry checks (zero length vectors, parallel planes).
pub const EPSILON: FloatType = 1e-7;

pub type ScreenPoint = Point2<u32>;
pub type ScreenSize = Vector2<u32>;
pub type ScreenBlock = AABB<ScreenPoint>;

pub type WorldPoint = Point3<FloatType>;
pub type WorldVector = Vector3<FloatType>;
pub type WorldBox = AABB<WorldPoint>;

#[derive(Copy, Clone, Debug)]
pub struct Ray {
    pub origin: WorldPoint,
    /// Normalized direction of the ray
    pub direction: Unit<WorldVector>,

    /// Componentwise inverse of the ray direction
    /// Zeros in direction get turned into positive infinity regardless of the sign of the zero
    pub inv_direction: WorldVector,
}

impl Ray {
    /// Creates a new ray, normalizing the direction.
    /// Direction must be non-zero.
    pub fn new(origin: WorldPoint, direction: WorldVector) -> Ray {
        let direction = Unit::new_normalize(direction);
        let inv_direction = direction.map(|x| if x == 0.0 { FloatType::INFINITY } else { 1.0 / x });

        Ray {
            origin,
            direction,
            inv_direction,
        }
    }

    pub fn point_at(&self, distance: FloatType) -> WorldPoint {
        self.origin + self.direction.as_ref() * distance
    }
}

/// Result of a successful ray-primitive intersection.
#[derive(Clone, Debug)]
pub struct HitRecord {
    /// Distance along the ray, always non-negative
    pub t: FloatType,
    pub point: WorldPoint,
    /// Surface normal, oriented against the incoming ray for planar primitives
    pub normal: Unit<WorldVector>,
}

/// Turns the normal so that it faces against the ray direction.
pub fn face_forward(normal: Unit<WorldVector>, ray: &Ray) -> Unit<WorldVector> {
    if normal.dot(ray.direction.as_ref()) > 0.0 {
        -normal
    } else {
        normal
    }
}
