use thiserror::Error;

/// Errors raised while constructing a [`crate::mesh::Mesh`] or its derived
/// topology.
///
/// Query-time anomalies — a point outside every element, a degenerate or
/// non-convex element encountered mid-query — are **not** represented here.
/// Per the delete-value contract, those are absorbed into `delete_value`
/// results so the interpolation hot loop stays branch-simple; only
/// structural problems discovered at construction are fatal.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MeshError {
    /// A structural validation failure: out-of-range node index, a node
    /// count outside `{3, 4}`, non-finite coordinates, or a non-manifold
    /// edge shared by more than two elements.
    #[error("invalid mesh: {0}")]
    InvalidMesh(String),

    /// Two or more caller-supplied arrays disagree in length.
    #[error("incompatible inputs: {0}")]
    IncompatibleInputs(String),

    /// A polygon-weight query received a geometry that is not a polygon or
    /// multi-polygon.
    #[error("unsupported geometry: {0}")]
    UnsupportedGeometry(String),
}

pub type MeshResult<T> = Result<T, MeshError>;
