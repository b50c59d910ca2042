use crate::geometry::{FloatType, Ray};

use super::{Entity, Object, Scene, SceneHit, triangle_bvh::StackCache};

impl Scene {
    /// Nearest hit along the ray over the mesh, spheres and parallelograms.
    pub fn find_nearest(&self, ray: &Ray, stack: &mut StackCache) -> Option<SceneHit> {
        self.find_nearest_within(ray, FloatType::INFINITY, stack)
    }

    /// Nearest hit strictly closer than `max_t`.
    pub fn find_nearest_within(
        &self,
        ray: &Ray,
        max_t: FloatType,
        stack: &mut StackCache,
    ) -> Option<SceneHit> {
        let mut best = self
            .mesh
            .intersect(ray, max_t, stack)
            .map(|(hit, triangle)| SceneHit {
                hit,
                entity: Entity::Triangle(triangle),
            });
        let mut best_t = best.as_ref().map_or(max_t, |b| b.hit.t);

        let spheres = self
            .spheres
            .iter()
            .enumerate()
            .map(|(i, s)| (Entity::Sphere(i), s as &dyn Object));
        let parallelograms = self
            .parallelograms
            .iter()
            .enumerate()
            .map(|(i, p)| (Entity::Parallelogram(i), p as &dyn Object));

        for (entity, object) in spheres.chain(parallelograms) {
            if let Some(hit) = object.intersect(ray) {
                if hit.t < best_t {
                    best_t = hit.t;
                    best = Some(SceneHit { hit, entity });
                }
            }
        }

        best
    }
}
