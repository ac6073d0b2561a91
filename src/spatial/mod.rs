//! Spatial index (component C): envelope-based element lookup for point and
//! envelope queries, with a linear-scan fallback.

mod predicates;

pub use predicates::{point_in_quadrangle, point_in_triangle, signed_area2};

use rstar::{RTree, RTreeObject, AABB};

use crate::mesh::{ElementType, Mesh};

/// One element's axis-aligned bounding envelope, the payload stored in the
/// R-tree. Mirrors the teacher crate's `to_aabb2` helper on `ElementGeo`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementEnvelope {
    pub element_index: usize,
    envelope: AABB<[f64; 2]>,
}

impl RTreeObject for ElementEnvelope {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

fn element_envelope(mesh: &Mesh, e: usize) -> ElementEnvelope {
    let element = mesh.element(e);
    let mut min = [f64::INFINITY, f64::INFINITY];
    let mut max = [f64::NEG_INFINITY, f64::NEG_INFINITY];
    for &n in element.nodes() {
        let [x, y] = mesh.node_xy(n);
        min[0] = min[0].min(x);
        min[1] = min[1].min(y);
        max[0] = max[0].max(x);
        max[1] = max[1].max(y);
    }
    ElementEnvelope {
        element_index: e,
        envelope: AABB::from_corners(min, max),
    }
}

/// Element lookup backed either by an STR-packed R-tree (the "initialized"
/// mode spec.md §4.3 requires, O(log N) expected per query) or a linear
/// scan over all elements (the required fallback, also what an empty or
/// tiny mesh gets since bulk-loading it buys nothing).
#[derive(Debug, Clone)]
pub enum SpatialIndex {
    Indexed(RTree<ElementEnvelope>),
    Linear(Vec<ElementEnvelope>),
}

impl SpatialIndex {
    pub fn build(mesh: &Mesh) -> Self {
        let envelopes: Vec<_> = (0..mesh.element_count())
            .map(|e| element_envelope(mesh, e))
            .collect();
        SpatialIndex::Indexed(RTree::bulk_load(envelopes))
    }

    pub fn build_linear(mesh: &Mesh) -> Self {
        let envelopes: Vec<_> = (0..mesh.element_count())
            .map(|e| element_envelope(mesh, e))
            .collect();
        SpatialIndex::Linear(envelopes)
    }

    fn candidates_at(&self, point: [f64; 2]) -> Box<dyn Iterator<Item = usize> + '_> {
        match self {
            SpatialIndex::Indexed(tree) => {
                let query = AABB::from_point(point);
                Box::new(
                    tree.locate_in_envelope_intersecting(&query)
                        .map(|env| env.element_index),
                )
            }
            SpatialIndex::Linear(envelopes) => Box::new(
                envelopes
                    .iter()
                    .filter(move |env| env.envelope.contains_point(&point))
                    .map(|env| env.element_index),
            ),
        }
    }

    /// Finds the element containing `point`, resolving ties between
    /// candidate elements (e.g. a point exactly on a shared edge) by
    /// smallest element index, per spec.md §4.3.
    pub fn find_element(&self, mesh: &Mesh, point: [f64; 2]) -> Option<usize> {
        let mut candidates: Vec<usize> = self.candidates_at(point).collect();
        candidates.sort_unstable();
        candidates
            .into_iter()
            .find(|&e| element_contains_point(mesh, e, point))
    }

    /// Elements whose bounding rectangle intersects `envelope`.
    pub fn query_envelope(&self, envelope: AABB<[f64; 2]>) -> Vec<usize> {
        match self {
            SpatialIndex::Indexed(tree) => tree
                .locate_in_envelope_intersecting(&envelope)
                .map(|env| env.element_index)
                .collect(),
            SpatialIndex::Linear(envelopes) => envelopes
                .iter()
                .filter(|env| env.envelope.intersects(&envelope))
                .map(|env| env.element_index)
                .collect(),
        }
    }
}

fn element_contains_point(mesh: &Mesh, e: usize, point: [f64; 2]) -> bool {
    let element = mesh.element(e);
    let nodes = element.nodes();
    match element.element_type() {
        ElementType::Triangle => {
            let p0 = mesh.node_xy(nodes[0]);
            let p1 = mesh.node_xy(nodes[1]);
            let p2 = mesh.node_xy(nodes[2]);
            point_in_triangle(point, p0, p1, p2)
        }
        ElementType::Quadrangle => {
            let n0 = mesh.node_xy(nodes[0]);
            let n1 = mesh.node_xy(nodes[1]);
            let n2 = mesh.node_xy(nodes[2]);
            let n3 = mesh.node_xy(nodes[3]);
            point_in_quadrangle(point, n0, n1, n2, n3)
        }
        ElementType::Other => false,
    }
}
