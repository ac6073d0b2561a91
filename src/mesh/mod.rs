//! The mesh store (component A): owns node coordinates, element
//! connectivity, element-type tags, boundary codes, and cached element
//! centers.

mod element;

pub use element::{Element, ElementType};

use arrayvec::ArrayVec;
use ndarray::Array1;

use crate::error::{MeshError, MeshResult};

/// A struct-of-arrays 2D mesh: parallel node columns plus an element table.
///
/// Node and element identity is positional (index into the parallel arrays);
/// `node_id`/`element_id` are optional caller-supplied labels carried
/// alongside for round-tripping through external formats, never used
/// internally for lookups.
#[derive(Debug, Clone)]
pub struct Mesh {
    projection: String,
    x: Array1<f64>,
    y: Array1<f64>,
    z: Array1<f64>,
    code: Array1<i64>,
    node_id: Option<Vec<i64>>,
    elements: Vec<Element>,
    element_id: Option<Vec<i64>>,
}

impl Mesh {
    /// Builds a mesh from raw caller-supplied arrays, validating the
    /// invariants spec.md §3 and §4.1 require: array lengths agree, node
    /// indices referenced by elements are in range, element node counts are
    /// in `{3, 4}`, element-type tags agree with node counts, and
    /// coordinates are finite.
    ///
    /// Node ordering within an element is assumed counter-clockwise, as
    /// required for the signed-area tests in [`crate::spatial`]; this is not
    /// independently verified here (it would require an orientation test
    /// per element, not performed at construction).
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        projection: impl Into<String>,
        x: Array1<f64>,
        y: Array1<f64>,
        z: Array1<f64>,
        code: Array1<i64>,
        node_id: Option<Vec<i64>>,
        connectivity: Vec<Vec<usize>>,
        element_types: Vec<ElementType>,
        element_id: Option<Vec<i64>>,
    ) -> MeshResult<Self> {
        let node_count = x.len();
        if y.len() != node_count || z.len() != node_count || code.len() != node_count {
            return Err(MeshError::IncompatibleInputs(format!(
                "node arrays disagree in length: x={}, y={}, z={}, code={}",
                node_count,
                y.len(),
                z.len(),
                code.len()
            )));
        }
        if let Some(ids) = &node_id {
            if ids.len() != node_count {
                return Err(MeshError::IncompatibleInputs(format!(
                    "node_id length {} disagrees with node count {}",
                    ids.len(),
                    node_count
                )));
            }
        }
        if connectivity.len() != element_types.len() {
            return Err(MeshError::IncompatibleInputs(format!(
                "connectivity length {} disagrees with element_types length {}",
                connectivity.len(),
                element_types.len()
            )));
        }
        if let Some(ids) = &element_id {
            if ids.len() != connectivity.len() {
                return Err(MeshError::IncompatibleInputs(format!(
                    "element_id length {} disagrees with element count {}",
                    ids.len(),
                    connectivity.len()
                )));
            }
        }

        for i in 0..node_count {
            if !x[i].is_finite() || !y[i].is_finite() || !z[i].is_finite() {
                return Err(MeshError::InvalidMesh(format!(
                    "node {i} has non-finite coordinates"
                )));
            }
        }

        let mut elements = Vec::with_capacity(connectivity.len());
        for (e, (conn, element_type)) in connectivity.into_iter().zip(element_types).enumerate() {
            if conn.len() < 3 || conn.len() > 4 {
                return Err(MeshError::InvalidMesh(format!(
                    "element {e} has {} nodes, expected 3 or 4",
                    conn.len()
                )));
            }
            if let Some(expected) = element_type.node_count() {
                if expected != conn.len() {
                    return Err(MeshError::InvalidMesh(format!(
                        "element {e} tagged {element_type:?} but has {} nodes",
                        conn.len()
                    )));
                }
            }
            for &n in &conn {
                if n >= node_count {
                    return Err(MeshError::InvalidMesh(format!(
                        "element {e} references out-of-range node {n}"
                    )));
                }
            }

            let mut cx = 0.0;
            let mut cy = 0.0;
            for &n in &conn {
                cx += x[n];
                cy += y[n];
            }
            let k = conn.len() as f64;
            let nodes = ArrayVec::try_from(conn.as_slice())
                .map_err(|_| MeshError::InvalidMesh(format!("element {e} has more than 4 nodes")))?;

            elements.push(Element {
                nodes,
                element_type,
                center: [cx / k, cy / k],
            });
        }

        Ok(Self {
            projection: projection.into(),
            x,
            y,
            z,
            code,
            node_id,
            elements,
            element_id,
        })
    }

    pub fn projection(&self) -> &str {
        &self.projection
    }

    pub fn node_count(&self) -> usize {
        self.x.len()
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Returns `(x, y, z, code)` for node `i`.
    pub fn node(&self, i: usize) -> (f64, f64, f64, i64) {
        (self.x[i], self.y[i], self.z[i], self.code[i])
    }

    pub fn node_xy(&self, i: usize) -> [f64; 2] {
        [self.x[i], self.y[i]]
    }

    pub fn node_code(&self, i: usize) -> i64 {
        self.code[i]
    }

    pub fn node_id(&self, i: usize) -> Option<i64> {
        self.node_id.as_ref().map(|ids| ids[i])
    }

    pub fn element(&self, e: usize) -> &Element {
        &self.elements[e]
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn element_center(&self, e: usize) -> [f64; 2] {
        self.elements[e].center
    }

    pub fn element_id(&self, e: usize) -> Option<i64> {
        self.element_id.as_ref().map(|ids| ids[e])
    }
}
