use std::path::Path;

use index_vec::IndexVec;
use ordered_float::OrderedFloat;

use crate::{
    geometry::{WorldBox, WorldPoint},
    scene::mesh::{Mesh, MeshError, TriangleIdx},
};

use super::{Node, NodeContent, NodeIdx, TriangleBvh};

impl TriangleBvh {
    /// Loads a mesh file (.off or .obj) and builds the hierarchy over it.
    pub fn with_mesh_file(path: impl AsRef<Path>) -> Result<TriangleBvh, MeshError> {
        Ok(Self::build(Mesh::load(path)?))
    }

    /// Builds the hierarchy, taking ownership of the mesh buffers.
    pub fn build(mesh: Mesh) -> TriangleBvh {
        let centroids: IndexVec<TriangleIdx, WorldPoint> = mesh
            .triangles()
            .map(|(_, triangle)| triangle.centroid())
            .collect();
        let mut triangles: Vec<TriangleIdx> = mesh.faces().indices().collect();

        let mut bvh = TriangleBvh {
            nodes: IndexVec::with_capacity((2 * triangles.len()).saturating_sub(1)),
            mesh,
            root: None,
        };

        if !triangles.is_empty() {
            bvh.root = Some(bvh.build_recursive(&mut triangles, &centroids));
        }

        log::info!(
            "Built BVH with {} nodes over {} triangles",
            bvh.nodes.len(),
            bvh.mesh.triangle_count()
        );

        bvh
    }

    /// Builds a subtree over a non-empty set of triangles.
    /// Children are pushed to the arena before their parent.
    fn build_recursive(
        &mut self,
        triangles: &mut [TriangleIdx],
        centroids: &IndexVec<TriangleIdx, WorldPoint>,
    ) -> NodeIdx {
        if let [triangle] = *triangles {
            return self.nodes.push(Node {
                bounding_box: self.mesh.triangle(triangle).bounding_box(),
                parent: None,
                content: NodeContent::Leaf { triangle },
            });
        }

        let axis = split_axis(triangles, centroids);
        let middle = triangles.len() / 2;
        triangles.select_nth_unstable_by_key(middle, |t| OrderedFloat(centroids[*t][axis]));

        let (left, right) = triangles.split_at_mut(middle);
        let left = self.build_recursive(left, centroids);
        let right = self.build_recursive(right, centroids);

        let bounding_box = self.nodes[left]
            .bounding_box
            .union(&self.nodes[right].bounding_box);
        let index = self.nodes.push(Node {
            bounding_box,
            parent: None,
            content: NodeContent::Inner { left, right },
        });
        self.nodes[left].parent = Some(index);
        self.nodes[right].parent = Some(index);

        index
    }
}

/// Axis with the greatest spread of triangle centroids.
fn split_axis(triangles: &[TriangleIdx], centroids: &IndexVec<TriangleIdx, WorldPoint>) -> usize {
    WorldBox::from_points(triangles.iter().map(|t| &centroids[*t]))
        .map_or(0, |centroid_box| centroid_box.longest_axis())
}
