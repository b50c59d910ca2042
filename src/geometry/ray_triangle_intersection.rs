use nalgebra::Unit;

use super::{BarycentricCoordinates, EPSILON, FloatType, HitRecord, Ray, Triangle, WorldPoint, face_forward};

impl Triangle<WorldPoint> {
    /// Calculates ray intersection with the (two sided) triangle.
    /// Returns distance along ray and barycentric uv coordinates.
    /// Adapted from https://en.wikipedia.org/wiki/M%C3%B6ller%E2%80%93Trumbore_intersection_algorithm#Rust_implementation
    pub fn intersect(&self, ray: &Ray) -> Option<(FloatType, BarycentricCoordinates<FloatType>)> {
        let [e1, e2] = self.edges();

        let ray_cross_e2 = ray.direction.cross(&e2);
        let det = e1.dot(&ray_cross_e2);

        if det.abs() < EPSILON {
            // Ray is parallel to the triangle plane
            return None;
        }

        let inv_det = 1.0 / det;
        let s = ray.origin - self[0];
        let u = inv_det * s.dot(&ray_cross_e2);
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let s_cross_e1 = s.cross(&e1);
        let v = inv_det * ray.direction.dot(&s_cross_e1);
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = inv_det * e2.dot(&s_cross_e1);
        if t < 0.0 {
            return None;
        }

        Some((t, BarycentricCoordinates { u, v }))
    }

    /// Full hit record of the ray with this triangle, normal facing against the ray.
    pub fn hit(&self, ray: &Ray) -> Option<HitRecord> {
        let (t, _uv) = self.intersect(ray)?;
        let normal = face_forward(Unit::new_normalize(self.normal()), ray);
        Some(HitRecord {
            t,
            point: ray.point_at(t),
            normal,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::geometry::{
        WorldVector,
        test::{ray, world_point},
    };

    use assert2::{assert, let_assert};
    use proptest::prelude::*;
    use test_strategy::proptest;

    fn triangle() -> impl Strategy<Value = Triangle<WorldPoint>> {
        (world_point(), world_point(), world_point()).prop_map(|(a, b, c)| Triangle::new(a, b, c))
    }

    /// Barycentric coordinates of a point (assumed to be in the plane of the triangle),
    /// calculated independently of Möller-Trumbore.
    fn barycentric_of(triangle: &Triangle<WorldPoint>, p: &WorldPoint) -> (FloatType, FloatType) {
        let [e1, e2] = triangle.edges();
        let w = p - triangle[0];
        let d00 = e1.dot(&e1);
        let d01 = e1.dot(&e2);
        let d11 = e2.dot(&e2);
        let d20 = w.dot(&e1);
        let d21 = w.dot(&e2);
        let denom = d00 * d11 - d01 * d01;
        (
            (d11 * d20 - d01 * d21) / denom,
            (d00 * d21 - d01 * d20) / denom,
        )
    }

    #[proptest]
    fn hit_is_on_ray_and_in_triangle(
        #[strategy(triangle())] triangle: Triangle<WorldPoint>,
        #[strategy(ray())] ray: Ray,
    ) {
        if let Some(hit) = triangle.hit(&ray) {
            prop_assert!(hit.t >= 0.0);
            prop_assert!((hit.point - ray.point_at(hit.t)).norm() < 1e-6);
            prop_assert!(hit.normal.dot(ray.direction.as_ref()) <= 0.0);

            // Nearly degenerate triangles make the independent barycentrics too imprecise
            if triangle.normal().norm() > 1e-1 {
                let (u, v) = barycentric_of(&triangle, &hit.point);
                prop_assert!(u >= -1e-6, "u = {u}");
                prop_assert!(v >= -1e-6, "v = {v}");
                prop_assert!(u + v <= 1.0 + 1e-6, "u + v = {}", u + v);
            }
        }
    }

    #[proptest]
    fn aimed_ray_hits(
        #[strategy(triangle())] triangle: Triangle<WorldPoint>,
        #[strategy(world_point())] origin: WorldPoint,
        #[strategy(0.01..0.49)] a: FloatType,
        #[strategy(0.01..0.49)] b: FloatType,
    ) {
        let target = BarycentricCoordinates { u: a, v: b }.interpolate_triangle(&triangle);
        let direction = target - origin;
        let normal = triangle.normal();
        prop_assume!(direction.norm() > 1e-3);
        prop_assume!(normal.norm() > 1e-1);
        // Skip rays grazing the triangle plane
        prop_assume!(direction.normalize().dot(&normal.normalize()).abs() > 1e-2);

        let ray = Ray::new(origin, direction);
        let hit = triangle.intersect(&ray);
        prop_assert!(hit.is_some());
        let (t, uv) = hit.unwrap();
        prop_assert!((t - direction.norm()).abs() < 1e-6 * direction.norm().max(1.0));
        prop_assert!((uv.u - a).abs() < 1e-6);
        prop_assert!((uv.v - b).abs() < 1e-6);
    }

    #[test]
    fn parallel_ray_misses() {
        let triangle = Triangle::new(
            WorldPoint::new(0.0, 0.0, 0.0),
            WorldPoint::new(1.0, 0.0, 0.0),
            WorldPoint::new(0.0, 1.0, 0.0),
        );
        let ray = Ray::new(
            WorldPoint::new(-1.0, 0.25, 0.0),
            WorldVector::new(1.0, 0.0, 0.0),
        );
        assert!(triangle.intersect(&ray).is_none());
    }

    #[test]
    fn triangle_behind_ray_misses() {
        let triangle = Triangle::new(
            WorldPoint::new(0.0, 0.0, 0.0),
            WorldPoint::new(1.0, 0.0, 0.0),
            WorldPoint::new(0.0, 1.0, 0.0),
        );
        let ray = Ray::new(
            WorldPoint::new(0.25, 0.25, 1.0),
            WorldVector::new(0.0, 0.0, 1.0),
        );
        assert!(triangle.intersect(&ray).is_none());
    }

    #[test]
    fn normal_faces_the_ray() {
        let triangle = Triangle::new(
            WorldPoint::new(0.0, 0.0, 0.0),
            WorldPoint::new(1.0, 0.0, 0.0),
            WorldPoint::new(0.0, 1.0, 0.0),
        );
        let from_below = Ray::new(
            WorldPoint::new(0.25, 0.25, -2.0),
            WorldVector::new(0.0, 0.0, 1.0),
        );
        let_assert!(Some(hit) = triangle.hit(&from_below));
        assert!(hit.t == 2.0);
        assert!(hit.normal.into_inner() == WorldVector::new(0.0, 0.0, -1.0));
    }
}
