mod building;
mod printing;
mod ray_bvh_intersection;

use index_vec::IndexVec;

use crate::geometry::WorldBox;

use super::mesh::{Mesh, TriangleIdx};

pub use printing::BvhStatistics;
pub use ray_bvh_intersection::StackCache;

/// Binary bounding volume hierarchy over the triangles of a mesh.
/// Every leaf holds exactly one triangle, nodes live in a flat arena and refer to each other by index.
#[derive(Clone, Debug, Default)]
pub struct TriangleBvh {
    mesh: Mesh,
    nodes: IndexVec<NodeIdx, Node>,
    /// None for an empty mesh
    root: Option<NodeIdx>,
}

#[derive(Clone, Debug)]
struct Node {
    bounding_box: WorldBox,
    parent: Option<NodeIdx>,
    content: NodeContent,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum NodeContent {
    Inner { left: NodeIdx, right: NodeIdx },
    Leaf { triangle: TriangleIdx },
}

index_vec::define_index_type! {
    struct NodeIdx = u32;
}

impl TriangleBvh {
    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Bounding box of the whole mesh, None if the mesh is empty.
    pub fn bounding_box(&self) -> Option<&WorldBox> {
        self.root.map(|root| &self.nodes[root].bounding_box)
    }
}
