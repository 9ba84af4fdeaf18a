#![warn(missing_docs)]

//! KD-tree ray casting over static triangle scenes.
//!
//! This crate is the query core of the sightline visibility tools: given a
//! fixed set of triangle meshes it builds an axis-aligned KD-tree once, then
//! answers ray queries against it, typically many thousands per sample
//! viewpoint when estimating visibility and overdraw.
//!
//! # Architecture
//!
//! - [`Mesh`] - read-only indexed triangle meshes supplied by the caller
//! - [`BoundingBox`] - axis-aligned boxes with slab-method ray intersection
//! - [`builder`] - pluggable tree construction strategies (naive midpoint,
//!   shifted-median SAH, full sweep SAH)
//! - [`KdTree`] - the immutable packed node store a builder produces
//! - [`Traversal`] - mutable per-engine query state (mailboxes, backface
//!   flags, ray ids)
//! - [`RayCaster`] - the facade: build from meshes, cast rays
//!
//! # Example
//!
//! ```ignore
//! use sightline_math::{Point3, Vec3};
//! use sightline_raycast::{Mesh, RayCaster};
//!
//! let mesh = Mesh::new(positions, faces);
//! let mut engine = RayCaster::build(&[mesh])?;
//!
//! engine.cull_backfaces(view_dir, true);
//! for hit in engine.find_all_hits(eye, view_dir)? {
//!     println!("face {} at distance {}", hit.face_id, hit.distance);
//! }
//! ```
//!
//! An engine instance is single-threaded: queries mutate the mailbox state,
//! so parallel casting means one engine per thread, each over its own scene.

pub mod bounds;
pub mod builder;
pub mod engine;
pub mod error;
pub mod mesh;
mod ray;
pub mod traverse;
pub mod tree;
pub mod triangle;

pub use bounds::BoundingBox;
pub use builder::{MidpointBuilder, ShiftedMedianBuilder, SweepBuilder, TreeBuilder};
pub use engine::RayCaster;
pub use error::{BuildError, QueryError};
pub use mesh::Mesh;
pub use ray::{Hit, Ray};
pub use traverse::Traversal;
pub use tree::{KdNode, KdTree};
pub use triangle::FaceOrigin;
