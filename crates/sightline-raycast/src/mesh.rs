//! Read-only indexed triangle meshes consumed by the engine.

use sightline_math::{Point3, Vec3};

use crate::bounds::BoundingBox;

/// An indexed triangle mesh.
///
/// A mesh owns an array of vertex positions, a triangle index buffer, and one
/// normal per face. Face normals may be supplied by the producer (they usually
/// are, since normal computation happens during soup construction); when they
/// are absent they are computed from the winding order. The engine never
/// mutates a mesh once it has been handed over.
#[derive(Debug, Clone)]
pub struct Mesh {
    positions: Vec<Point3>,
    faces: Vec<[u32; 3]>,
    face_normals: Vec<Vec3>,
}

impl Mesh {
    /// Create a mesh, computing face normals from the vertex winding.
    pub fn new(positions: Vec<Point3>, faces: Vec<[u32; 3]>) -> Self {
        let face_normals = compute_face_normals(&positions, &faces);
        Self {
            positions,
            faces,
            face_normals,
        }
    }

    /// Create a mesh with producer-supplied face normals.
    ///
    /// `face_normals` must hold exactly one normal per face.
    pub fn with_face_normals(
        positions: Vec<Point3>,
        faces: Vec<[u32; 3]>,
        face_normals: Vec<Vec3>,
    ) -> Self {
        debug_assert_eq!(faces.len(), face_normals.len());
        Self {
            positions,
            faces,
            face_normals,
        }
    }

    /// Vertex positions.
    pub fn positions(&self) -> &[Point3] {
        &self.positions
    }

    /// Triangle index buffer.
    pub fn faces(&self) -> &[[u32; 3]] {
        &self.faces
    }

    /// Number of triangles in the mesh.
    pub fn triangle_count(&self) -> u32 {
        self.faces.len() as u32
    }

    /// The three corner positions of face `index`.
    pub fn face_vertices(&self, index: u32) -> [Point3; 3] {
        let face = self.faces[index as usize];
        [
            self.positions[face[0] as usize],
            self.positions[face[1] as usize],
            self.positions[face[2] as usize],
        ]
    }

    /// The normal of face `index`.
    pub fn face_normal(&self, index: u32) -> Vec3 {
        self.face_normals[index as usize]
    }

    /// Bounding box of all vertex positions.
    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_points(&self.positions)
    }
}

/// One unit normal per face, from the cross product of the first two edges.
/// Degenerate faces get a zero normal rather than NaN.
fn compute_face_normals(positions: &[Point3], faces: &[[u32; 3]]) -> Vec<Vec3> {
    faces
        .iter()
        .map(|face| {
            let v0 = positions[face[0] as usize];
            let v1 = positions[face[1] as usize];
            let v2 = positions[face[2] as usize];
            let normal = (v1 - v0).cross(&(v2 - v0));
            let len = normal.norm();
            if len > 0.0 {
                normal / len
            } else {
                Vec3::zeros()
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_triangle() -> Mesh {
        Mesh::new(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            vec![[0, 1, 2]],
        )
    }

    #[test]
    fn test_computed_face_normal() {
        let mesh = single_triangle();
        let n = mesh.face_normal(0);
        assert!((n.z - 1.0).abs() < 1e-6);
        assert!(n.x.abs() < 1e-6);
        assert!(n.y.abs() < 1e-6);
    }

    #[test]
    fn test_degenerate_face_gets_zero_normal() {
        let mesh = Mesh::new(
            vec![Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0)],
            vec![[0, 0, 1]],
        );
        assert_eq!(mesh.face_normal(0), Vec3::zeros());
    }

    #[test]
    fn test_supplied_normals_are_kept() {
        let mesh = Mesh::with_face_normals(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            vec![[0, 1, 2]],
            vec![Vec3::new(0.0, 0.0, -1.0)],
        );
        assert_eq!(mesh.face_normal(0), Vec3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn test_face_vertices_and_bounds() {
        let mesh = single_triangle();
        let [v0, _, v2] = mesh.face_vertices(0);
        assert_eq!(v0, Point3::new(0.0, 0.0, 0.0));
        assert_eq!(v2, Point3::new(0.0, 1.0, 0.0));

        let bounds = mesh.bounding_box();
        assert_eq!(bounds.min, Point3::new(0.0, 0.0, 0.0));
        assert_eq!(bounds.max, Point3::new(1.0, 1.0, 0.0));
    }
}
