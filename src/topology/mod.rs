//! Derived topology (component B): node→element inverse index,
//! element→element neighbor list, and boundary face/polyline extraction.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::error::{MeshError, MeshResult};
use crate::mesh::Mesh;

/// CSR-style inverse index: which elements touch each node.
///
/// Mirrors the teacher crate's `IndirectIndex` (`data` + `offsets`, where
/// element `i`'s slice runs from `offsets[i-1]` to `offsets[i]`, with an
/// implicit `0` start for `i == 0`).
#[derive(Debug, Clone)]
pub struct NodeToElements {
    data: Vec<usize>,
    offsets: Vec<usize>,
}

impl NodeToElements {
    fn build(mesh: &Mesh) -> Self {
        let node_count = mesh.node_count();
        let mut counts = vec![0usize; node_count];
        for element in mesh.elements() {
            for &n in element.nodes() {
                counts[n] += 1;
            }
        }
        let mut offsets = Vec::with_capacity(node_count);
        let mut running = 0usize;
        for c in &counts {
            running += c;
            offsets.push(running);
        }

        let mut cursor = vec![0usize; node_count];
        for i in 1..node_count {
            cursor[i] = offsets[i - 1];
        }
        let mut data = vec![0usize; running];
        for (e, element) in mesh.elements().iter().enumerate() {
            for &n in element.nodes() {
                data[cursor[n]] = e;
                cursor[n] += 1;
            }
        }

        Self { data, offsets }
    }

    /// Elements touching node `n`, in construction order (no particular
    /// sort guaranteed).
    pub fn get(&self, n: usize) -> &[usize] {
        let start = if n == 0 { 0 } else { self.offsets[n - 1] };
        let stop = self.offsets[n];
        &self.data[start..stop]
    }
}

/// A boundary edge, with the code derived per spec.md §4.2's tie-break rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundaryFace {
    pub node_a: usize,
    pub node_b: usize,
    pub code: i64,
}

/// An ordered chain of boundary nodes sharing one code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Polyline {
    pub code: i64,
    pub nodes: Vec<usize>,
    pub closed: bool,
}

fn sorted_pair(a: usize, b: usize) -> (usize, usize) {
    if a <= b { (a, b) } else { (b, a) }
}

fn derive_boundary_code(code_a: i64, code_b: i64) -> i64 {
    match (code_a > 0, code_b > 0) {
        (true, true) => code_a.min(code_b),
        (true, false) => code_a,
        (false, true) => code_b,
        (false, false) => {
            tracing::warn!(
                "boundary edge with both endpoint codes 0; well-formed meshes should not \
                 produce this, emitting code 0"
            );
            0
        }
    }
}

/// Node→elements, element neighbors, and boundary faces/polylines, built
/// once from a [`Mesh`] and immutable afterward.
#[derive(Debug, Clone)]
pub struct Topology {
    node_to_elements: NodeToElements,
    /// `neighbors[e][local_edge]` is the neighboring element index, or
    /// `None` on the boundary.
    neighbors: Vec<Vec<Option<usize>>>,
    boundary_faces: Vec<BoundaryFace>,
    boundary_polylines: Vec<Polyline>,
}

impl Topology {
    pub fn build(mesh: &Mesh) -> MeshResult<Self> {
        let node_to_elements = NodeToElements::build(mesh);

        // Each edge key maps to the (element, local_edge_index) occurrences
        // touching it. A conforming 2D mesh edge touches at most 2
        // elements, hence SmallVec<[_; 2]> with no spill in the common case.
        let mut edge_map: FxHashMap<(usize, usize), SmallVec<[(usize, usize); 2]>> =
            FxHashMap::default();
        for (e, element) in mesh.elements().iter().enumerate() {
            for (local, (a, b)) in element.edges().enumerate() {
                edge_map.entry(sorted_pair(a, b)).or_default().push((e, local));
            }
        }

        let mut neighbors: Vec<Vec<Option<usize>>> = mesh
            .elements()
            .iter()
            .map(|el| vec![None; el.nodes().len()])
            .collect();

        let mut boundary_faces = Vec::new();

        for (&(a, b), occurrences) in &edge_map {
            match occurrences.as_slice() {
                [(e0, local0)] => {
                    let (node_a, node_b) = mesh.element(*e0).edges().nth(*local0).unwrap();
                    let code = derive_boundary_code(mesh.node_code(node_a), mesh.node_code(node_b));
                    boundary_faces.push(BoundaryFace { node_a, node_b, code });
                }
                [(e0, local0), (e1, local1)] => {
                    neighbors[*e0][*local0] = Some(*e1);
                    neighbors[*e1][*local1] = Some(*e0);
                }
                more => {
                    return Err(MeshError::InvalidMesh(format!(
                        "edge ({a}, {b}) is shared by {} elements, expected at most 2",
                        more.len()
                    )));
                }
            }
        }

        let boundary_polylines = group_into_polylines(&boundary_faces);

        Ok(Self {
            node_to_elements,
            neighbors,
            boundary_faces,
            boundary_polylines,
        })
    }

    pub fn elements_touching_node(&self, n: usize) -> &[usize] {
        self.node_to_elements.get(n)
    }

    /// The neighbor across local edge `local` of element `e`, or `None` on
    /// the boundary.
    pub fn neighbor(&self, e: usize, local: usize) -> Option<usize> {
        self.neighbors[e][local]
    }

    pub fn boundary_faces(&self) -> &[BoundaryFace] {
        &self.boundary_faces
    }

    pub fn boundary_polylines(&self) -> &[Polyline] {
        &self.boundary_polylines
    }
}

/// Groups boundary faces sharing a code into connected polylines, walking
/// each chain from-node to to-node. A mesh boundary is either an open chain
/// (used in the face-ordering test suite) or a closed loop.
fn group_into_polylines(faces: &[BoundaryFace]) -> Vec<Polyline> {
    let mut by_code: FxHashMap<i64, Vec<&BoundaryFace>> = FxHashMap::default();
    for face in faces {
        by_code.entry(face.code).or_default().push(face);
    }

    let mut polylines = Vec::new();
    for (code, group) in by_code {
        let mut from_lookup: FxHashMap<usize, usize> = FxHashMap::default();
        for (i, face) in group.iter().enumerate() {
            from_lookup.insert(face.node_a, i);
        }
        let mut used = vec![false; group.len()];

        for start in 0..group.len() {
            if used[start] {
                continue;
            }
            let mut chain = vec![group[start].node_a, group[start].node_b];
            used[start] = true;
            let mut current = group[start].node_b;
            loop {
                let Some(&next_idx) = from_lookup.get(&current) else {
                    break;
                };
                if used[next_idx] {
                    break;
                }
                used[next_idx] = true;
                current = group[next_idx].node_b;
                chain.push(current);
            }
            let closed = chain.first() == chain.last() && chain.len() > 1;
            polylines.push(Polyline { code, nodes: chain, closed });
        }
    }
    polylines
}
