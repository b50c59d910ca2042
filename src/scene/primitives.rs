use nalgebra::Unit;

use crate::geometry::{
    EPSILON, FloatType, HitRecord, Ray, WorldBox, WorldPoint, WorldVector, face_forward,
};

use super::Object;

#[derive(Clone, Debug, PartialEq)]
pub struct Sphere {
    pub center: WorldPoint,
    pub radius: FloatType,
    /// Index into the scene's material list
    pub material: usize,
}

impl Object for Sphere {
    fn intersect(&self, ray: &Ray) -> Option<HitRecord> {
        let oc = ray.origin - self.center;
        let b = oc.dot(ray.direction.as_ref());
        let c = oc.dot(&oc) - self.radius * self.radius;
        let discriminant = b * b - c;

        if discriminant < 0.0 {
            return None;
        }

        let sqrt_disc = discriminant.sqrt();
        let t1 = -b - sqrt_disc;
        let t2 = -b + sqrt_disc;
        let t = if t1 >= 0.0 {
            t1
        } else if t2 >= 0.0 {
            t2
        } else {
            return None;
        };

        let point = ray.point_at(t);
        let normal = Unit::new_normalize(point - self.center);

        Some(HitRecord { t, point, normal })
    }

    fn get_bounding_box(&self) -> WorldBox {
        let r_vec = WorldVector::repeat(self.radius);
        WorldBox {
            min: self.center - r_vec,
            max: self.center + r_vec,
        }
    }
}

/// Planar quad spanned by two edge vectors from a corner.
#[derive(Clone, Debug, PartialEq)]
pub struct Parallelogram {
    pub origin: WorldPoint,
    pub u: WorldVector,
    pub v: WorldVector,
    pub material: usize,
}

impl Parallelogram {
    /// Parallelogram with corners `origin`, `a`, `b` and `a + b - origin`.
    pub fn from_corners(origin: WorldPoint, a: WorldPoint, b: WorldPoint, material: usize) -> Self {
        Parallelogram {
            origin,
            u: a - origin,
            v: b - origin,
            material,
        }
    }
}

impl Object for Parallelogram {
    fn intersect(&self, ray: &Ray) -> Option<HitRecord> {
        let n = self.u.cross(&self.v);
        let n_len_squared = n.norm_squared();
        let denom = n.dot(ray.direction.as_ref());

        // Degenerate quad or a ray parallel to its plane
        if n_len_squared < EPSILON || denom.abs() < EPSILON * n_len_squared.sqrt() {
            return None;
        }

        let t = (self.origin - ray.origin).dot(&n) / denom;
        if t < 0.0 {
            return None;
        }

        let point = ray.point_at(t);
        let w = point - self.origin;
        let alpha = w.cross(&self.v).dot(&n) / n_len_squared;
        let beta = self.u.cross(&w).dot(&n) / n_len_squared;
        if !(0.0..=1.0).contains(&alpha) || !(0.0..=1.0).contains(&beta) {
            return None;
        }

        Some(HitRecord {
            t,
            point,
            normal: face_forward(Unit::new_normalize(n), ray),
        })
    }

    fn get_bounding_box(&self) -> WorldBox {
        let b = WorldBox::new(self.origin, self.origin);
        b.extended(&(self.origin + self.u))
            .extended(&(self.origin + self.v))
            .extended(&(self.origin + self.u + self.v))
    }
}
