use super::{FloatType, Ray, WorldBox};

pub trait RayIntersectionExt {
    type DistanceType;
    /// Calculate first and last ray intersection with the box
    fn intersect(&self, ray: &Ray) -> (Self::DistanceType, Self::DistanceType);

    /// True if the ray enters the box at some non-negative distance.
    fn is_hit_by(&self, ray: &Ray) -> bool;
}

impl RayIntersectionExt for WorldBox {
    type DistanceType = FloatType;

    /// Calculates ray intersection with the box.
    /// Returns minimum and maximum distance along the ray, ray intersects if min <= max.
    fn intersect(&self, ray: &Ray) -> (FloatType, FloatType) {
        // Componentwise distances along the ray to the box's min and max corners
        // The multiplication is NAN if the ray is starting inside the slab bounding plane
        // and is parallel to it. In this case we replace it with +-infinity, so that the range
        // becomes infinite
        let to_box_min = (self.min - ray.origin)
            .component_mul(&ray.inv_direction)
            .map(|x| if x.is_nan() { FloatType::NEG_INFINITY } else { x });
        let to_box_max = (self.max - ray.origin)
            .component_mul(&ray.inv_direction)
            .map(|x| if x.is_nan() { FloatType::INFINITY } else { x });

        // Correctly ordered (min_t <= max_t)
        let componentwise_min_t = to_box_min.zip_map(&to_box_max, FloatType::min);
        let componentwise_max_t = to_box_min.zip_map(&to_box_max, FloatType::max);

        let min_t = componentwise_min_t
            .x
            .max(componentwise_min_t.y.max(componentwise_min_t.z));
        let max_t = componentwise_max_t
            .x
            .min(componentwise_max_t.y.min(componentwise_max_t.z));

        (min_t, max_t)
    }

    fn is_hit_by(&self, ray: &Ray) -> bool {
        let (min_t, max_t) = self.intersect(ray);
        min_t <= max_t && max_t >= 0.0
    }
}

#[cfg(test)]
pub mod test {
    use assert2::assert;
    use test_case::{test_case, test_matrix};

    use super::*;

    use crate::geometry::{WorldPoint, WorldVector};

    fn test_box() -> WorldBox {
        WorldBox::new([5.0, 5.0, 5.0].into(), [10.0, 10.0, 10.0].into())
    }

    /// Checks cases when the ray hits the box, including some corner cases.
    #[test_matrix(
        [5.0, 7.0, 10.0],
        [5.0, 7.0, 10.0],
        [5.0, 7.0, 10.0],
        [-1.0, 0.0, 2.0],
        [-1.0, 0.0, 2.0],
        [-1.0, 0.0, 2.0],
        [-10.0, -1.0, 0.0, 2.0, 5.0, 20.0]
    )]
    fn hit(
        px: FloatType,
        py: FloatType,
        pz: FloatType,
        dx: FloatType,
        dy: FloatType,
        dz: FloatType,
        origin_pos: FloatType,
    ) {
        if dx == 0.0 && dy == 0.0 && dz == 0.0 {
            return;
        }

        let b = test_box();

        let p = WorldPoint::new(px, py, pz);
        let d = WorldVector::new(dx, dy, dz);
        let temp_r = Ray::new(p, d);
        let origin = temp_r.point_at(origin_pos);
        let r = Ray::new(origin, d);

        let (t1, t2) = intersection_to_option(b.intersect(&r))
            .expect("The ray passes through a point of the box, we should always have an intersection");

        let p1 = r.point_at(t1);
        let p2 = r.point_at(t2);

        assert!(point_is_on_box_surface(&p1, &b), "{p1:?} must be in {b:?}");
        assert!(point_is_on_box_surface(&p2, &b), "{p2:?} must be in {b:?}");
    }

    /// Returns the intersection if one was found, merging intervals that are empty only
    /// because of rounding.
    fn intersection_to_option(result: (FloatType, FloatType)) -> Option<(FloatType, FloatType)> {
        const TOLERANCE: FloatType = 1e-6;

        let (t1, t2) = result;

        if t1 <= t2 {
            Some((t1, t2))
        } else if t1 <= t2 + TOLERANCE {
            let t = (t1 + t2) / 2.0;
            Some((t, t))
        } else {
            None
        }
    }

    /// Just a manual example of ray grazing along an edge.
    #[test]
    fn hit_along_edge() {
        let r = Ray::new(
            WorldPoint::new(5.0, 5.0, 0.0),
            WorldVector::new(0.0, 0.0, 1.0),
        );

        let result = intersection_to_option(test_box().intersect(&r));

        assert!(result == Some((5.0, 10.0)));
        assert!(test_box().is_hit_by(&r));
    }

    /// Rays that lie parallel to one axis and start outside the corresponding slab
    /// must miss, even if they move toward the box on other axes or remain unchanged.
    #[test_case( 0.0,  7.0,  7.0,   0.0, 1.0, 0.0 ; "low_x_parallel_miss")]
    #[test_case(12.0,  7.0,  7.0,   0.0, 1.0, 0.0 ; "high_x_parallel_miss")]
    #[test_case( 7.0,  0.0,  7.0,   1.0, 0.0, 0.0 ; "low_y_parallel_miss")]
    #[test_case( 7.0, 12.0,  7.0,   1.0, 0.0, 0.0 ; "high_y_parallel_miss")]
    #[test_case( 7.0,  7.0,  0.0,   1.0, 0.0, 0.0 ; "low_z_parallel_miss")]
    #[test_case( 7.0,  7.0, 12.0,   1.0, 0.0, 0.0 ; "high_z_parallel_miss")]
    #[test_case( 0.0,  5.0,  7.0,   1.0, 0.0, 1.0 ; "corner_miss")]
    #[test_case( 0.0,  0.0,  0.0,  -1.0, 1.0, 1.0 ; "corner_miss2")]
    fn only_misses(
        px: FloatType,
        py: FloatType,
        pz: FloatType,
        dx: FloatType,
        dy: FloatType,
        dz: FloatType,
    ) {
        let r = Ray::new(WorldPoint::new(px, py, pz), WorldVector::new(dx, dy, dz));

        assert!(intersection_to_option(test_box().intersect(&r)) == None);
        assert!(!test_box().is_hit_by(&r));
    }

    /// The box lies entirely behind the ray origin.
    #[test]
    fn box_behind_origin() {
        let r = Ray::new(
            WorldPoint::new(7.0, 7.0, 20.0),
            WorldVector::new(0.0, 0.0, 1.0),
        );
        let (t1, t2) = test_box().intersect(&r);
        assert!(t1 <= t2);
        assert!(t2 < 0.0);
        assert!(!test_box().is_hit_by(&r));
    }

    #[test]
    fn origin_inside_box() {
        let r = Ray::new(
            WorldPoint::new(7.0, 7.0, 7.0),
            WorldVector::new(1.0, 0.0, 0.0),
        );
        let (t1, t2) = test_box().intersect(&r);
        assert!(t1 == -2.0);
        assert!(t2 == 3.0);
        assert!(test_box().is_hit_by(&r));
    }

    fn point_is_on_box_surface(p: &WorldPoint, b: &WorldBox) -> bool {
        const TOLERANCE: FloatType = 1e-6;

        let within = |axis: usize| {
            p[axis] >= b.min[axis] - TOLERANCE && p[axis] <= b.max[axis] + TOLERANCE
        };
        let on_face = |axis: usize| {
            (p[axis] - b.min[axis]).abs() <= TOLERANCE || (p[axis] - b.max[axis]).abs() <= TOLERANCE
        };

        (0..3).all(within) && (0..3).any(on_face)
    }
}
