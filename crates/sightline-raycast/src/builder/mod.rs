//! Tree construction strategies.
//!
//! All strategies share the same contract: consume the scene bounds and a set
//! of triangle references, produce the packed node store. They differ only in
//! how split planes are chosen, never in which triangles end up reachable.
//! A straddling triangle always goes to both children, so every strategy
//! yields the same hit sets.

mod midpoint;
mod shifted;
mod sweep;

pub use midpoint::MidpointBuilder;
pub use shifted::ShiftedMedianBuilder;
pub use sweep::SweepBuilder;

use sightline_math::Axis;

use crate::bounds::BoundingBox;
use crate::error::BuildError;
use crate::tree::{KdNode, KdTree};
use crate::triangle::Triangle;

/// Hard recursion limit shared by every strategy.
pub const MAX_TREE_DEPTH: u32 = 28;

/// Node populations at or below this always become a leaf.
pub(crate) const MIN_LEAF_TRIANGLES: usize = 2;

/// Estimated cost of one ray-triangle test, relative to a traversal step.
pub(crate) const INTERSECT_COST: f32 = 5.0;

/// Distance a shifted split plane is pushed past the extreme triangle
/// coordinate of the populated side.
pub(crate) const PLANE_SHIFT: f32 = 1e-5;

/// A pluggable tree construction algorithm.
pub trait TreeBuilder {
    /// Strategy name used in build diagnostics.
    fn name(&self) -> &'static str;

    /// Build a tree over `triangles`, all of which must fall inside `bounds`.
    ///
    /// An empty triangle set produces a single zero-triangle leaf.
    fn build(&self, bounds: &BoundingBox, triangles: &[Triangle]) -> Result<KdTree, BuildError>;
}

/// Surface-area-heuristic cost of splitting `bounds` on `axis` at `position`,
/// with the given child populations.
///
/// Child areas are expressed as fractions of the parent's surface area, so
/// the result is directly comparable to the no-split baseline
/// `count * INTERSECT_COST`.
pub(crate) fn sah_cost(
    bounds: &BoundingBox,
    axis: Axis,
    position: f32,
    front_count: usize,
    back_count: usize,
) -> f32 {
    let size = bounds.extent();
    let (u, v) = axis.others();
    let su = size[u.index()];
    let sv = size[v.index()];
    let sw = size[axis.index()];

    // The two faces perpendicular to the split axis are common to parent and
    // both children, so the half-area ratios below stay normalized.
    let constant_faces = su * sv;
    let inv_whole_area = 1.0 / (constant_faces + su * sw + sv * sw);

    let back_size = position - bounds.min[axis.index()];
    let front_size = sw - back_size;
    let front_area = (constant_faces + front_size * (su + sv)) * inv_whole_area;
    let back_area = (constant_faces + back_size * (su + sv)) * inv_whole_area;

    1.0 + INTERSECT_COST * (front_area * front_count as f32 + back_area * back_count as f32)
}

/// Growable node/index storage a build writes into.
///
/// Mirrors the layout invariants of the finished tree: node 0 is the root,
/// children are allocated as adjacent pairs, each leaf's triangle ids occupy
/// one contiguous slice of the index array.
pub(crate) struct TreeSink {
    nodes: Vec<KdNode>,
    indices: Vec<u32>,
}

impl TreeSink {
    /// Create a sink holding a placeholder root, with storage reserved for a
    /// typical tree over `triangle_count` triangles.
    pub(crate) fn new(triangle_count: usize) -> Result<Self, BuildError> {
        let mut nodes = Vec::new();
        nodes.try_reserve(2 * triangle_count.max(1))?;
        let mut indices = Vec::new();
        indices.try_reserve(2 * triangle_count)?;

        nodes.push(KdNode::Leaf {
            first_index: 0,
            index_count: 0,
        });
        Ok(Self { nodes, indices })
    }

    /// Allocate an adjacent child pair, returning the front child's index.
    pub(crate) fn alloc_children(&mut self) -> u32 {
        debug_assert!(self.nodes.len() + 2 <= u32::MAX as usize);
        let front = self.nodes.len() as u32;
        let placeholder = KdNode::Leaf {
            first_index: 0,
            index_count: 0,
        };
        self.nodes.push(placeholder);
        self.nodes.push(placeholder);
        front
    }

    /// Turn `node` into an inner node.
    pub(crate) fn set_inner(&mut self, node: u32, axis: Axis, split: f32, front_child: u32) {
        self.nodes[node as usize] = KdNode::Inner {
            axis,
            front_child,
            split,
        };
    }

    /// Turn `node` into a leaf over the given global triangle ids.
    pub(crate) fn make_leaf(&mut self, node: u32, triangle_ids: impl Iterator<Item = u32>) {
        let first_index = self.indices.len() as u32;
        self.indices.extend(triangle_ids);
        self.nodes[node as usize] = KdNode::Leaf {
            first_index,
            index_count: self.indices.len() as u32 - first_index,
        };
    }

    /// Finish the build.
    pub(crate) fn into_tree(self, bounds: &BoundingBox, triangle_count: u32) -> KdTree {
        KdTree::new(*bounds, self.nodes, self.indices, triangle_count)
    }
}
