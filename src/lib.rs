// polytess: polygon tessellation by sweep line (libtess lineage)
// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)

pub mod dict;
pub mod error;
pub mod geom;
pub mod mesh;
pub mod pool;
pub mod priorityq;
pub mod sweep;
pub mod tess;

pub use error::{MeshError, TessError};
pub use geom::{Real, Vec3};
pub use tess::{
    ContourOrientation, ContourVertex, ElementType, TessOption, TessOptions, Tessellator,
    WindingRule, TESS_UNDEF,
};
