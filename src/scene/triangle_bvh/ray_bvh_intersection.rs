use assert2::debug_assert;

use super::{NodeContent, NodeIdx, TriangleBvh};
use crate::{
    geometry::{FloatType, HitRecord, Ray, RayIntersectionExt as _},
    scene::mesh::TriangleIdx,
};

/// Relative slack when comparing box entry and exit distances, so that rays grazing
/// a box face (or flat boxes of axis aligned triangles) don't get rejected by rounding.
const BOX_TOLERANCE: FloatType = 1e-9;

/// Traversal stack that can be reused between queries to avoid allocations.
#[derive(Clone, Debug, Default)]
#[repr(transparent)]
pub struct StackCache {
    stack: Vec<(NodeIdx, FloatType)>,
}

impl TriangleBvh {
    /// Finds the nearest triangle hit by the ray with distance strictly less than `max_t`.
    pub fn intersect(
        &self,
        ray: &Ray,
        max_t: FloatType,
        stack: &mut StackCache,
    ) -> Option<(HitRecord, TriangleIdx)> {
        let root = self.root?;
        let root_t1 = self.entry_distance(root, ray, max_t)?;

        debug_assert!(stack.stack.is_empty());
        stack.stack.push((root, root_t1));

        let mut best_t = max_t;
        let mut best = None;

        while let Some((index, node_t1)) = stack.stack.pop() {
            if node_t1 >= best_t {
                // The node starts further away than the best hit found so far,
                // nothing inside can improve it.
                continue;
            }

            match self.nodes[index].content {
                NodeContent::Inner { left, right } => {
                    let left = self.entry_distance(left, ray, best_t).map(|t| (left, t));
                    let right = self.entry_distance(right, ray, best_t).map(|t| (right, t));

                    // The closer child goes on top of the stack to be processed first
                    match (left, right) {
                        (Some(a), Some(b)) if a.1 < b.1 => stack.stack.extend([b, a]),
                        (Some(a), Some(b)) => stack.stack.extend([a, b]),
                        (Some(a), None) | (None, Some(a)) => stack.stack.push(a),
                        (None, None) => {}
                    }
                }
                NodeContent::Leaf { triangle } => {
                    if let Some((t, _uv)) = self.mesh.triangle(triangle).intersect(ray) {
                        if t < best_t {
                            best_t = t;
                            best = Some(triangle);
                        }
                    }
                }
            }
        }

        let triangle = best?;
        self.hit_record(triangle, ray)
    }

    /// Reference implementation of `intersect` that tests every triangle.
    pub fn intersect_exhaustive(
        &self,
        ray: &Ray,
        max_t: FloatType,
    ) -> Option<(HitRecord, TriangleIdx)> {
        let mut best_t = max_t;
        let mut best = None;

        for (index, triangle) in self.mesh.triangles() {
            if let Some((t, _uv)) = triangle.intersect(ray) {
                if t < best_t {
                    best_t = t;
                    best = Some(index);
                }
            }
        }

        self.hit_record(best?, ray)
    }

    fn hit_record(&self, triangle: TriangleIdx, ray: &Ray) -> Option<(HitRecord, TriangleIdx)> {
        let hit = self.mesh.triangle(triangle).hit(ray)?;
        Some((hit, triangle))
    }

    /// Distance at which the ray enters the node's box, clamped to the ray start.
    /// None if the box is missed or lies entirely past `max_t`.
    fn entry_distance(&self, node: NodeIdx, ray: &Ray, max_t: FloatType) -> Option<FloatType> {
        let (t1, t2) = self.nodes[node].bounding_box.intersect(ray);
        let t1 = t1.max(0.0);
        let t2 = t2.min(max_t);
        let tolerance = BOX_TOLERANCE * t1.abs().max(t2.abs()).max(1.0);

        (t1 <= t2 + tolerance).then_some(t1)
    }
}
