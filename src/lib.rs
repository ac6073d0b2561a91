//! Unstructured 2D mesh interpolation core.
//!
//! Given scalar values known at triangular or quadrangular element centers,
//! this crate computes interpolated values at arbitrary query points inside
//! the mesh, via two coupled subsystems:
//!
//! - a pseudo-Laplacian node-value builder ([`laplacian`]) that derives
//!   per-node values from surrounding element centers by a clamped
//!   weighted least-squares solve, and
//! - point-in-element interpolation ([`interpolate`]) that blends one
//!   element-center value and two node values, with a delete-value
//!   propagation policy for missing data.
//!
//! [`mesh`] and [`topology`] supply the underlying structural data both
//! subsystems consume; [`spatial`] locates the element containing a query
//! point; [`mesh_to_mesh`] ties every component together into the
//! `MeshInterpolator` most callers will actually construct.
//! [`polygon_weights`] answers a different question — overlap weights
//! against a query polygon — reusing the same mesh, topology, and spatial
//! index.
//!
//! Reading and writing mesh or time-series file formats, command-line
//! argument parsing, and the polygon-intersection geometry engine itself
//! are out of scope; those are external collaborators injected through
//! traits (see [`polygon_weights::GeometryOps`]).

pub mod config;
pub mod error;
pub mod interpolate;
pub mod laplacian;
pub mod mesh;
pub mod mesh_to_mesh;
pub mod polygon_weights;
pub mod spatial;
pub mod topology;

pub mod prelude {
    pub use crate::config::InterpolationConfig;
    pub use crate::error::{MeshError, MeshResult};
    pub use crate::interpolate::{triangle, quad, QuadWeights, TriangleWeights};
    pub use crate::laplacian::{NodeWeightTable, NodeWeights};
    pub use crate::mesh::{Element, ElementType, Mesh};
    pub use crate::mesh_to_mesh::MeshInterpolator;
    pub use crate::polygon_weights::{calculate_weights, Geometry, GeometryOps, PolygonWeight, PolygonWeightResult, WeightMode};
    pub use crate::spatial::SpatialIndex;
    pub use crate::topology::{BoundaryFace, NodeToElements, Polyline, Topology};
}
