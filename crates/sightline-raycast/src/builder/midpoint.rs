//! Naive spatial-midpoint builder.

use crate::bounds::BoundingBox;
use crate::builder::{TreeBuilder, TreeSink, MAX_TREE_DEPTH};
use crate::error::BuildError;
use crate::tree::KdTree;
use crate::triangle::Triangle;

/// Stop splitting below this many triangles.
const LEAF_TRIANGLE_LIMIT: usize = 25;

/// The naive reference strategy: split the longest axis at its spatial
/// midpoint, no cost evaluation.
///
/// Produces noticeably worse trees than the SAH strategies but is simple
/// enough to serve as ground truth for correctness testing.
pub struct MidpointBuilder;

impl TreeBuilder for MidpointBuilder {
    fn name(&self) -> &'static str {
        "midpoint"
    }

    fn build(&self, bounds: &BoundingBox, triangles: &[Triangle]) -> Result<KdTree, BuildError> {
        let mut sink = TreeSink::new(triangles.len())?;
        let positions = (0..triangles.len() as u32).collect();
        build_node(&mut sink, 0, triangles, positions, bounds, MAX_TREE_DEPTH);
        Ok(sink.into_tree(bounds, triangles.len() as u32))
    }
}

fn build_node(
    sink: &mut TreeSink,
    node: u32,
    triangles: &[Triangle],
    positions: Vec<u32>,
    bounds: &BoundingBox,
    depth: u32,
) {
    if depth == 0 || positions.len() < LEAF_TRIANGLE_LIMIT {
        sink.make_leaf(node, positions.iter().map(|&p| triangles[p as usize].index));
        return;
    }

    let axis = bounds.longest_axis();
    let i = axis.index();
    let split = bounds.min[i] + 0.5 * (bounds.max[i] - bounds.min[i]);

    // A box too thin to place a plane strictly inside cannot be subdivided.
    if !(bounds.min[i] < split && split < bounds.max[i]) {
        sink.make_leaf(node, positions.iter().map(|&p| triangles[p as usize].index));
        return;
    }

    let mut front = Vec::new();
    let mut back = Vec::new();
    for &p in &positions {
        let (tri_min, tri_max) = triangles[p as usize].interval(axis);
        if tri_max <= split {
            back.push(p);
        } else if tri_min > split {
            front.push(p);
        } else {
            front.push(p);
            back.push(p);
        }
    }

    let front_child = sink.alloc_children();
    sink.set_inner(node, axis, split, front_child);

    let (front_bounds, back_bounds) = bounds.split(axis, split);
    build_node(sink, front_child, triangles, front, &front_bounds, depth - 1);
    build_node(sink, front_child + 1, triangles, back, &back_bounds, depth - 1);
}
