//! The engine facade: build once per static scene, query many times.

use sightline_math::{Point3, Vec3};
use tracing::debug;

use crate::bounds::BoundingBox;
use crate::builder::{SweepBuilder, TreeBuilder};
use crate::error::{BuildError, QueryError};
use crate::mesh::Mesh;
use crate::ray::{Hit, Ray};
use crate::traverse::Traversal;
use crate::tree::KdTree;
use crate::triangle::{FaceOrigin, PreparedTriangle, Triangle};

/// Padding added to every side of the scene bounds. Absorbs precision loss
/// for flat geometry lying exactly on a box face.
const SCENE_BOUNDS_MARGIN: f32 = 1e-3;

/// A ray-casting engine over a fixed set of triangle meshes.
///
/// Building concatenates all input meshes' triangles into one global table
/// (the position of a triangle in that table is the `face_id` reported in
/// hits), then constructs a KD-tree over it. The tree is immutable for the
/// engine's lifetime; a new scene means a new engine.
///
/// Queries take `&mut self` because they advance the ray-id counter and
/// write triangle mailboxes. One engine therefore serves one thread; cast
/// against independent engine instances to parallelize across scenes.
pub struct RayCaster {
    tree: KdTree,
    triangles: Vec<PreparedTriangle>,
    origins: Vec<FaceOrigin>,
    traversal: Traversal,
    hits: Vec<Hit>,
}

impl RayCaster {
    /// Build an engine using the default (sweep SAH) strategy.
    ///
    /// An empty or triangle-less mesh list is not an error: the resulting
    /// engine simply reports no hits.
    pub fn build(meshes: &[Mesh]) -> Result<Self, BuildError> {
        Self::build_with(meshes, &SweepBuilder)
    }

    /// Build an engine with an explicit tree-construction strategy.
    pub fn build_with(meshes: &[Mesh], builder: &dyn TreeBuilder) -> Result<Self, BuildError> {
        let total: usize = meshes.iter().map(|m| m.faces().len()).sum();

        let mut references = Vec::new();
        references.try_reserve_exact(total)?;
        let mut triangles = Vec::new();
        triangles.try_reserve_exact(total)?;
        let mut origins = Vec::new();
        origins.try_reserve_exact(total)?;

        for (mesh_index, mesh) in meshes.iter().enumerate() {
            for local in 0..mesh.triangle_count() {
                let vertices = mesh.face_vertices(local);
                let face_id = triangles.len() as u32;
                references.push(Triangle::new(face_id, vertices));
                triangles.push(PreparedTriangle::new(vertices, mesh.face_normal(local)));
                origins.push(FaceOrigin {
                    mesh: mesh_index as u32,
                    triangle: local,
                });
            }
        }

        let mut bounds = BoundingBox::empty();
        for reference in &references {
            bounds = bounds.union(&reference.bounds);
        }
        if !bounds.is_empty() {
            let margin = Vec3::new(
                SCENE_BOUNDS_MARGIN,
                SCENE_BOUNDS_MARGIN,
                SCENE_BOUNDS_MARGIN,
            );
            bounds = BoundingBox::new(bounds.min - margin, bounds.max + margin);
        }

        let tree = builder.build(&bounds, &references)?;
        debug!(
            strategy = builder.name(),
            triangles = tree.triangle_count(),
            nodes = tree.node_count(),
            leaves = tree.leaf_count(),
            depth = tree.max_depth(),
            indices = tree.index_count(),
            "built kd-tree"
        );

        let traversal = Traversal::new(triangles.len())?;
        Ok(Self {
            tree,
            triangles,
            origins,
            traversal,
            hits: Vec::new(),
        })
    }

    /// All hits along the ray, sorted by ascending distance.
    ///
    /// The returned slice borrows an internal buffer that is overwritten by
    /// the next call; no allocation happens unless the buffer must grow. On
    /// allocation failure the result is empty, never partial.
    pub fn find_all_hits(
        &mut self,
        origin: Point3,
        direction: Vec3,
    ) -> Result<&[Hit], QueryError> {
        self.hits.clear();
        let ray = Ray::new(origin, direction);
        if let Err(err) =
            self.traversal
                .find_all_hits(&self.tree, &self.triangles, &ray, &mut self.hits)
        {
            self.hits.clear();
            return Err(err);
        }

        self.hits
            .sort_unstable_by(|a, b| a.distance.total_cmp(&b.distance));

        debug_assert!(
            {
                let mut ids: Vec<u32> = self.hits.iter().map(|h| h.face_id).collect();
                ids.sort_unstable();
                ids.windows(2).all(|w| w[0] != w[1])
            },
            "duplicate face id in hit set"
        );

        Ok(&self.hits)
    }

    /// The closest hit along the ray, if any.
    pub fn find_nearest_hit(&mut self, origin: Point3, direction: Vec3) -> Option<Hit> {
        let ray = Ray::new(origin, direction);
        self.traversal
            .find_nearest_hit(&self.tree, &self.triangles, &ray)
    }

    /// Recompute the per-triangle backface flags for a view direction.
    ///
    /// Typically called once per sample viewpoint, between queries; the tree
    /// is not rebuilt.
    pub fn cull_backfaces(&mut self, view_dir: Vec3, cull_ccw: bool) {
        self.traversal
            .cull_backfaces(&self.triangles, view_dir, cull_ccw);
    }

    /// The (padded) scene bounding box.
    pub fn scene_bounds(&self) -> &BoundingBox {
        self.tree.scene_bounds()
    }

    /// Where the ray exits the scene bounding box.
    ///
    /// Used to bound camera rays that hit no geometry. `None` when the ray
    /// misses the box or the box lies entirely behind the origin.
    pub fn scene_bounds_hit(&self, origin: Point3, direction: Vec3) -> Option<Point3> {
        let ray = Ray::new(origin, direction);
        let (_, t_max) = self.tree.scene_bounds().ray_hit(&ray)?;
        (t_max >= 0.0).then(|| ray.at(t_max))
    }

    /// The mesh and local triangle a global face id came from.
    pub fn face_origin(&self, face_id: u32) -> FaceOrigin {
        self.origins[face_id as usize]
    }

    /// Number of triangles across all input meshes.
    pub fn triangle_count(&self) -> u32 {
        self.triangles.len() as u32
    }

    /// The underlying node store, for statistics and inspection.
    pub fn tree(&self) -> &KdTree {
        &self.tree
    }
}
