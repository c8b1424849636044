// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Error types surfaced by the tessellator.

use std::fmt;

use thiserror::Error;

/// Which ring of the mesh a consistency failure was found in.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Ring {
    Face,
    Vertex,
    Edge,
}

impl fmt::Display for Ring {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Ring::Face => "face",
            Ring::Vertex => "vertex",
            Ring::Edge => "edge",
        };
        f.write_str(name)
    }
}

/// A broken half-edge mesh invariant, reported by `Mesh::check`.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MeshError {
    #[error("stale handle reached while walking the {0} ring")]
    StaleHandle(Ring),
    #[error("{ring} ring violates `{invariant}`")]
    Invariant {
        ring: Ring,
        invariant: &'static str,
    },
    #[error("{ring} ring holds {found} entries but {expected} are allocated")]
    CountMismatch {
        ring: Ring,
        found: usize,
        expected: usize,
    },
}

#[derive(Clone, Debug, PartialEq, Error)]
pub enum TessError {
    #[error("contour vertices must have 2 or 3 components, got {0}")]
    InvalidVertexSize(usize),
    #[error("{len} coordinates do not split into vertices of {size}")]
    PartialVertex { len: usize, size: usize },
    #[error("coordinate {value} is not finite or lies outside +/-2^23")]
    InvalidCoordinate { value: f32 },
    #[error("mesh consistency check failed: {0}")]
    Mesh(#[from] MeshError),
    #[error("sweep lost the {0} of an active region")]
    Sweep(&'static str),
}
