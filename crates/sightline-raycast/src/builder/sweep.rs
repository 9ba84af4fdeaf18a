//! Full sweep surface-area-heuristic builder.

use sightline_math::Axis;

use crate::bounds::BoundingBox;
use crate::builder::{
    sah_cost, TreeBuilder, TreeSink, INTERSECT_COST, MAX_TREE_DEPTH, MIN_LEAF_TRIANGLES,
};
use crate::error::BuildError;
use crate::tree::KdTree;
use crate::triangle::Triangle;

/// The event-sweep SAH strategy, in the manner of Havran's construction.
///
/// Instead of testing only the spatial median, every triangle-extent boundary
/// on every axis becomes a candidate plane. Sweeping the sorted boundaries
/// while keeping running population counts lets each candidate be costed in
/// constant time, for an `O(n log n)` sort per node. This is the default
/// strategy: slowest build, best trees.
pub struct SweepBuilder;

/// One candidate plane: a triangle extent starts or ends here.
#[derive(Clone, Copy)]
struct SplitEvent {
    value: f32,
    /// True when this is the upper boundary of a triangle extent.
    is_max: bool,
}

struct BestSplit {
    axis: Axis,
    position: f32,
    cost: f32,
}

impl TreeBuilder for SweepBuilder {
    fn name(&self) -> &'static str {
        "sweep"
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
    if depth == 0 || positions.len() <= MIN_LEAF_TRIANGLES {
        sink.make_leaf(node, positions.iter().map(|&p| triangles[p as usize].index));
        return;
    }

    let no_split_cost = positions.len() as f32 * INTERSECT_COST;
    let best = Axis::ALL
        .into_iter()
        .filter_map(|axis| sweep_axis(axis, bounds, triangles, &positions))
        .reduce(|best, candidate| {
            if candidate.cost < best.cost {
                candidate
            } else {
                best
            }
        });

    let Some(split) = best.filter(|s| s.cost <= no_split_cost) else {
        sink.make_leaf(node, positions.iter().map(|&p| triangles[p as usize].index));
        return;
    };

    let mut front = Vec::new();
    let mut back = Vec::new();
    for &p in &positions {
        let (lo, hi) = triangles[p as usize].interval(split.axis);
        if hi <= split.position {
            back.push(p);
        } else if lo > split.position {
            front.push(p);
        } else {
            front.push(p);
            back.push(p);
        }
    }

    // A plane that separates nothing would recurse forever.
    if front.len() == positions.len() && back.len() == positions.len() {
        sink.make_leaf(node, positions.iter().map(|&p| triangles[p as usize].index));
        return;
    }

    let front_child = sink.alloc_children();
    sink.set_inner(node, split.axis, split.position, front_child);

    let (front_bounds, back_bounds) = bounds.split(split.axis, split.position);
    build_node(sink, front_child, triangles, front, &front_bounds, depth - 1);
    build_node(
        sink,
        front_child + 1,
        triangles,
        back,
        &back_bounds,
        depth - 1,
    );
}

/// Sweep all extent boundaries on one axis, returning the cheapest candidate
/// plane strictly inside the node bounds.
fn sweep_axis(
    axis: Axis,
    bounds: &BoundingBox,
    triangles: &[Triangle],
    positions: &[u32],
) -> Option<BestSplit> {
    let i = axis.index();
    if bounds.max[i] == bounds.min[i] {
        return None;
    }

    let mut events = Vec::with_capacity(positions.len() * 2);
    for &p in positions {
        let (lo, hi) = triangles[p as usize].interval(axis);
        events.push(SplitEvent {
            value: lo,
            is_max: false,
        });
        events.push(SplitEvent {
            value: hi,
            is_max: true,
        });
    }
    events.sort_unstable_by(|a, b| a.value.total_cmp(&b.value));

    let total = positions.len();
    // Triangles entirely behind a candidate (`max <= p`) and entirely in
    // front of it (`min > p`). Straddlers are the remainder and count toward
    // both children.
    let mut behind = 0usize;
    let mut in_front = total;

    let mut best: Option<BestSplit> = None;
    let mut cursor = 0;
    while cursor < events.len() {
        let value = events[cursor].value;
        // Fold in every boundary at this position before costing it: a
        // triangle ending here is now fully behind the plane, one starting
        // here is no longer fully in front.
        while cursor < events.len() && events[cursor].value == value {
            if events[cursor].is_max {
                behind += 1;
            } else {
                in_front -= 1;
            }
            cursor += 1;
        }

        if value <= bounds.min[i] || value >= bounds.max[i] {
            continue;
        }

        let front_count = total - behind;
        let back_count = total - in_front;
        let cost = sah_cost(bounds, axis, value, front_count, back_count);
        if best.as_ref().map_or(true, |b| cost < b.cost) {
            best = Some(BestSplit {
                axis,
                position: value,
                cost,
            });
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use sightline_math::Point3;

    fn slab(index: u32, x0: f32, x1: f32) -> Triangle {
        Triangle::new(
            index,
            [
                Point3::new(x0, 0.0, 0.0),
                Point3::new(x1, 0.0, 1.0),
                Point3::new(x0, 1.0, 0.5),
            ],
        )
    }

    #[test]
    fn test_empty_input_is_single_empty_leaf() {
        let tree = SweepBuilder.build(&BoundingBox::empty(), &[]).unwrap();
        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.index_count(), 0);
    }

    #[test]
    fn test_sweep_finds_the_gap() {
        // Four triangles on the left of a wide gap, four on the right. The
        // best sweep candidate is one of the extent boundaries adjacent to
        // the gap, never a plane cutting through a cluster.
        let mut triangles = Vec::new();
        for i in 0..4 {
            triangles.push(slab(i, i as f32, i as f32 + 1.0));
        }
        for i in 4..8 {
            triangles.push(slab(i, 96.0 + (i - 4) as f32, 97.0 + (i - 4) as f32));
        }
        let mut bounds = BoundingBox::empty();
        for tri in &triangles {
            bounds = bounds.union(&tri.bounds);
        }

        let best = sweep_axis(Axis::X, &bounds, &triangles, &(0..8).collect::<Vec<_>>())
            .unwrap();
        assert!(
            (best.position - 4.0).abs() < 1e-4 || (best.position - 96.0).abs() < 1e-4,
            "split at {} does not border the gap",
            best.position
        );
    }

    #[test]
    fn test_covers_every_triangle() {
        let triangles: Vec<Triangle> = (0..64).map(|i| slab(i, i as f32, i as f32 + 1.5)).collect();
        let mut bounds = BoundingBox::empty();
        for tri in &triangles {
            bounds = bounds.union(&tri.bounds);
        }

        let tree = SweepBuilder.build(&bounds, &triangles).unwrap();
        assert!(tree.node_count() > 1);
        assert!(tree.max_depth() <= MAX_TREE_DEPTH);

        let mut ids: Vec<u32> = tree.triangle_indices().to_vec();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids, (0..64).collect::<Vec<_>>());
    }

    #[test]
    fn test_identical_triangles_terminate() {
        // A stack of identical triangles can never be separated; the build
        // must settle on a leaf instead of recursing to the depth limit.
        let triangles: Vec<Triangle> = (0..16).map(|i| slab(i, 2.0, 3.0)).collect();
        let mut bounds = BoundingBox::empty();
        for tri in &triangles {
            bounds = bounds.union(&tri.bounds);
        }

        let tree = SweepBuilder.build(&bounds, &triangles).unwrap();
        for &id in tree.triangle_indices() {
            assert!(id < 16);
        }
        assert_eq!(tree.leaf_count(), (tree.node_count() + 1) / 2);
    }
}
