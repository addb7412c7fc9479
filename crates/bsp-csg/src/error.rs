//! Error types.
//!
//! Degenerate geometry is not an error: the kernel drops it and carries on.
//! These types only cover misuse of the mesh interfaces and I/O failures.

use thiserror::Error;

/// Errors raised while turning a triangle mesh into a polygon soup.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MeshError {
    /// An index buffer entry points past the end of the position list.
    #[error(
        "triangle {triangle} references vertex {index}, but the mesh only has {vertex_count} vertices"
    )]
    IndexOutOfRange {
        /// Triangle that holds the bad index.
        triangle: usize,
        /// The offending index.
        index: u32,
        /// Number of positions in the mesh.
        vertex_count: usize,
    },
}

/// Errors raised while writing binary STL.
#[derive(Error, Debug)]
pub enum StlError {
    /// The underlying writer failed.
    #[error("failed to write STL data: {0}")]
    Io(#[from] std::io::Error),

    /// Binary STL stores the triangle count as a `u32`.
    #[error("mesh has {0} triangles, binary STL supports at most u32::MAX")]
    TooManyTriangles(usize),
}
