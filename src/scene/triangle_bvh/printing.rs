use std::fmt::Write as _;

use crate::util::Stats;

use super::{NodeContent, NodeIdx, TriangleBvh};

#[derive(Clone, Debug, PartialEq)]
pub struct BvhStatistics {
    pub triangle_count: usize,
    pub node_count: usize,
    /// Depth of each leaf, root has depth 1
    pub leaf_depth: Stats,
}

impl TriangleBvh {
    pub fn statistics(&self) -> BvhStatistics {
        let mut leaf_depth = Stats::default();
        let mut stack: Vec<(NodeIdx, usize)> = self.root.map(|root| (root, 1)).into_iter().collect();

        while let Some((index, depth)) = stack.pop() {
            match self.nodes[index].content {
                NodeContent::Inner { left, right } => {
                    stack.push((left, depth + 1));
                    stack.push((right, depth + 1));
                }
                NodeContent::Leaf { .. } => leaf_depth.add_sample(depth),
            }
        }

        BvhStatistics {
            triangle_count: self.mesh.triangle_count(),
            node_count: self.nodes.len(),
            leaf_depth,
        }
    }

    pub fn print_statistics(&self) {
        let stats = self.statistics();
        log::info!(
            "BVH: {} triangles, {} nodes",
            stats.triangle_count,
            stats.node_count
        );
        log::info!("BVH leaf depth: {}", stats.leaf_depth);
    }

    /// Indented dump of the node hierarchy with boxes and triangle indices.
    pub fn format_tree(&self) -> String {
        let mut output = String::new();
        if let Some(root) = self.root {
            self.format_recursive(&mut output, 0, root);
        }
        output
    }

    pub fn print_tree(&self) {
        print!("{}", self.format_tree());
    }

    fn format_recursive(&self, output: &mut String, indent: usize, index: NodeIdx) {
        let node = &self.nodes[index];
        let bb = &node.bounding_box;
        let indent_str = "  ".repeat(indent);

        match node.content {
            NodeContent::Inner { left, right } => {
                // Writing to a String never fails
                let _ = writeln!(
                    output,
                    "{indent_str}- I{}: {:?}-{:?}",
                    index.index(),
                    bb.min.coords.as_slice(),
                    bb.max.coords.as_slice()
                );
                self.format_recursive(output, indent + 1, left);
                self.format_recursive(output, indent + 1, right);
            }
            NodeContent::Leaf { triangle } => {
                let _ = writeln!(
                    output,
                    "{indent_str}- L{}: triangle {}",
                    index.index(),
                    triangle.index()
                );
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{geometry::WorldPoint, scene::mesh::Mesh};

    use assert2::assert;

    fn strip(count: usize) -> TriangleBvh {
        let vertices = (0..=count)
            .flat_map(|i| {
                let x = i as f64;
                [WorldPoint::new(x, 0.0, 0.0), WorldPoint::new(x, 1.0, 0.0)]
            })
            .collect();
        let faces = (0..count).map(|i| [2 * i, 2 * i + 2, 2 * i + 1]).collect();
        TriangleBvh::build(Mesh::new(vertices, faces).unwrap())
    }

    #[test]
    fn statistics_of_balanced_tree() {
        let stats = strip(8).statistics();
        assert!(stats.triangle_count == 8);
        assert!(stats.node_count == 15);
        assert!(stats.leaf_depth.count == 8);
        assert!(stats.leaf_depth.min == 4);
        assert!(stats.leaf_depth.max == 4);
    }

    #[test]
    fn statistics_of_empty_tree() {
        let stats = TriangleBvh::default().statistics();
        assert!(stats.node_count == 0);
        assert!(stats.leaf_depth.is_empty());
    }

    #[test]
    fn tree_lists_every_leaf() {
        let tree = strip(3).format_tree();
        assert!(tree.lines().count() == 5);
        assert!(tree.starts_with("- I"));
        for i in 0..3 {
            assert!(tree.contains(&format!("triangle {i}\n")));
        }
    }
}
