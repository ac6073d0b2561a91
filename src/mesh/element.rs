use arrayvec::ArrayVec;
use itertools::Itertools;

/// Narrowed element-type tag.
///
/// Only triangles and quadrangles are ever interpolated; every other kind
/// (vertices, segments, tets, hexes, polygons, splines...) collapses into
/// `Other` — accepted at construction, but reported as an undefined weight
/// if a query ever reaches it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    Triangle,
    Quadrangle,
    Other,
}

impl ElementType {
    pub fn node_count(self) -> Option<usize> {
        match self {
            ElementType::Triangle => Some(3),
            ElementType::Quadrangle => Some(4),
            ElementType::Other => None,
        }
    }
}

/// One mesh element: its node connectivity, type tag, and cached center.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub(crate) nodes: ArrayVec<usize, 4>,
    pub(crate) element_type: ElementType,
    pub(crate) center: [f64; 2],
}

impl Element {
    pub fn nodes(&self) -> &[usize] {
        &self.nodes
    }

    pub fn element_type(&self) -> ElementType {
        self.element_type
    }

    pub fn center(&self) -> [f64; 2] {
        self.center
    }

    /// Iterates the element's edges as ordered `(a, b)` node-index pairs,
    /// closing the polygon by pairing the last node back to the first.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.nodes.iter().copied().circular_tuple_windows()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges_close_the_polygon() {
        let e = Element {
            nodes: ArrayVec::from_iter([0, 1, 2]),
            element_type: ElementType::Triangle,
            center: [0.0, 0.0],
        };
        let edges: Vec<_> = e.edges().collect();
        assert_eq!(edges, vec![(0, 1), (1, 2), (2, 0)]);
    }
}
