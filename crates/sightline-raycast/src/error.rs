//! Error types for engine construction and ray queries.

use std::collections::TryReserveError;

use thiserror::Error;

/// Errors that can occur while building a ray-casting engine.
#[derive(Error, Debug)]
pub enum BuildError {
    /// Storage for the tree or its per-triangle state could not be allocated.
    #[error("allocation failed while building the scene tree: {0}")]
    Allocation(#[from] TryReserveError),
}

/// Errors that can occur while answering a ray query.
#[derive(Error, Debug)]
pub enum QueryError {
    /// The hit buffer could not grow to hold every intersection.
    ///
    /// The query result is discarded entirely; a partial hit list is never
    /// returned.
    #[error("allocation failed while collecting ray hits: {0}")]
    OutOfMemory(#[from] TryReserveError),
}
