//! Polygon-overlap weight calculator (component H): for a query polygon,
//! finds intersecting elements and assigns weights under one of three
//! modes. The actual polygon-intersection geometry is delegated to an
//! injected [`GeometryOps`] collaborator; this module only prunes
//! candidates via the spatial index and normalizes the resulting areas.

use rstar::AABB;

use crate::error::{MeshError, MeshResult};
use crate::mesh::Mesh;
use crate::spatial::SpatialIndex;

/// A polygon or multi-polygon, expressed as one or more closed rings of
/// coordinates. `Other` covers any geometry kind the caller's backend
/// understands but this crate does not interpolate against.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Polygon(Vec<[f64; 2]>),
    MultiPolygon(Vec<Vec<[f64; 2]>>),
    Other,
}

/// Geometry services this crate consumes but does not implement: polygon
/// intersection area, envelope computation, and geometry-kind
/// classification. Callers inject a real backend (e.g. a `geo`-crate
/// wrapper); tests inject a stub.
pub trait GeometryOps {
    fn intersection_area(&self, a: &Geometry, b: &Geometry) -> f64;
    fn envelope_of(&self, geom: &Geometry) -> AABB<[f64; 2]>;
    fn is_polygon(&self, geom: &Geometry) -> bool;
}

/// Selects how intersection areas become weights, per spec.md §4.8.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeightMode {
    /// `intersection_area(E, Q) / total_intersecting_area`; sums to 1.
    Weight,
    /// `intersection_area(E, Q)` in absolute units.
    Area,
    /// `intersection_area(E, Q) / element_area(E)`; does not sum to 1.
    Fraction,
}

/// One element's share of the query polygon's overlap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolygonWeight {
    pub element_index: usize,
    pub weight: f64,
}

/// The full result of a polygon-weight query: per-element weights plus the
/// observable total intersecting area (the sum of all per-element pieces,
/// before any mode-specific normalization).
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonWeightResult {
    pub per_element: Vec<PolygonWeight>,
    pub intersection_area: f64,
}

/// Shoelace-formula polygon area, used for the `Fraction` mode's
/// denominator.
fn polygon_area(ring: &[[f64; 2]]) -> f64 {
    let n = ring.len();
    if n < 3 {
        return 0.0;
    }
    let mut acc = 0.0;
    for i in 0..n {
        let (x0, y0) = (ring[i][0], ring[i][1]);
        let (x1, y1) = (ring[(i + 1) % n][0], ring[(i + 1) % n][1]);
        acc += x0 * y1 - x1 * y0;
    }
    (acc / 2.0).abs()
}

fn element_ring(mesh: &Mesh, e: usize) -> Vec<[f64; 2]> {
    mesh.element(e).nodes().iter().map(|&n| mesh.node_xy(n)).collect()
}

/// Finds all elements with non-empty geometric intersection with `polygon`
/// and weights each under `mode`, per spec.md §4.8.
pub fn calculate_weights(
    mesh: &Mesh,
    spatial: &SpatialIndex,
    geometry_ops: &dyn GeometryOps,
    polygon: &Geometry,
    mode: WeightMode,
) -> MeshResult<PolygonWeightResult> {
    if !geometry_ops.is_polygon(polygon) {
        return Err(MeshError::UnsupportedGeometry(
            "polygon-weight query requires a Polygon or MultiPolygon geometry".to_string(),
        ));
    }

    let envelope = geometry_ops.envelope_of(polygon);
    let candidates = spatial.query_envelope(envelope);

    let mut pieces: Vec<(usize, f64)> = Vec::new();
    for e in candidates {
        let ring = element_ring(mesh, e);
        let element_geom = Geometry::Polygon(ring);
        let area = geometry_ops.intersection_area(&element_geom, polygon);
        if area > 0.0 {
            pieces.push((e, area));
        }
    }

    let intersection_area: f64 = pieces.iter().map(|&(_, a)| a).sum();

    let per_element = match mode {
        WeightMode::Weight => {
            if intersection_area == 0.0 {
                Vec::new()
            } else {
                pieces
                    .iter()
                    .map(|&(e, a)| PolygonWeight { element_index: e, weight: a / intersection_area })
                    .collect()
            }
        }
        WeightMode::Area => pieces
            .iter()
            .map(|&(e, a)| PolygonWeight { element_index: e, weight: a })
            .collect(),
        WeightMode::Fraction => pieces
            .iter()
            .map(|&(e, a)| {
                let element_area = polygon_area(&element_ring(mesh, e));
                let weight = if element_area == 0.0 { 0.0 } else { a / element_area };
                PolygonWeight { element_index: e, weight }
            })
            .collect(),
    };

    Ok(PolygonWeightResult { per_element, intersection_area })
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::mesh::fixtures::unit_square_quad;

    /// A stub backend treating every `Geometry::Polygon` as an axis-aligned
    /// rectangle (its bounding box), sufficient to exercise the weighting
    /// modes without a real polygon-clipping implementation.
    struct RectangleStub;

    fn bbox(ring: &[[f64; 2]]) -> ([f64; 2], [f64; 2]) {
        let mut min = [f64::INFINITY, f64::INFINITY];
        let mut max = [f64::NEG_INFINITY, f64::NEG_INFINITY];
        for p in ring {
            min[0] = min[0].min(p[0]);
            min[1] = min[1].min(p[1]);
            max[0] = max[0].max(p[0]);
            max[1] = max[1].max(p[1]);
        }
        (min, max)
    }

    impl GeometryOps for RectangleStub {
        fn intersection_area(&self, a: &Geometry, b: &Geometry) -> f64 {
            let (Geometry::Polygon(ra), Geometry::Polygon(rb)) = (a, b) else {
                return 0.0;
            };
            let (amin, amax) = bbox(ra);
            let (bmin, bmax) = bbox(rb);
            let dx = (amax[0].min(bmax[0]) - amin[0].max(bmin[0])).max(0.0);
            let dy = (amax[1].min(bmax[1]) - amin[1].max(bmin[1])).max(0.0);
            dx * dy
        }

        fn envelope_of(&self, geom: &Geometry) -> AABB<[f64; 2]> {
            match geom {
                Geometry::Polygon(ring) => {
                    let (min, max) = bbox(ring);
                    AABB::from_corners(min, max)
                }
                _ => AABB::from_corners([0.0, 0.0], [0.0, 0.0]),
            }
        }

        fn is_polygon(&self, geom: &Geometry) -> bool {
            matches!(geom, Geometry::Polygon(_) | Geometry::MultiPolygon(_))
        }
    }

    #[test]
    fn scenario_6_half_covering_polygon_all_three_modes() {
        let mesh = unit_square_quad();
        let spatial = SpatialIndex::build(&mesh);
        let ops = RectangleStub;
        let half = Geometry::Polygon(vec![[0.0, 0.0], [0.5, 0.0], [0.5, 1.0], [0.0, 1.0]]);

        let weight_result = calculate_weights(&mesh, &spatial, &ops, &half, WeightMode::Weight).unwrap();
        assert_eq!(weight_result.per_element.len(), 1);
        assert_abs_diff_eq!(weight_result.per_element[0].weight, 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(weight_result.intersection_area, 0.5, epsilon = 1e-9);

        let area_result = calculate_weights(&mesh, &spatial, &ops, &half, WeightMode::Area).unwrap();
        assert_abs_diff_eq!(area_result.per_element[0].weight, 0.5, epsilon = 1e-9);

        let fraction_result = calculate_weights(&mesh, &spatial, &ops, &half, WeightMode::Fraction).unwrap();
        assert_abs_diff_eq!(fraction_result.per_element[0].weight, 0.5, epsilon = 1e-9);
    }

    #[test]
    fn non_overlapping_polygon_returns_empty() {
        let mesh = unit_square_quad();
        let spatial = SpatialIndex::build(&mesh);
        let ops = RectangleStub;
        let far_away = Geometry::Polygon(vec![[10.0, 10.0], [11.0, 10.0], [11.0, 11.0], [10.0, 11.0]]);
        let result = calculate_weights(&mesh, &spatial, &ops, &far_away, WeightMode::Weight).unwrap();
        assert!(result.per_element.is_empty());
        assert_eq!(result.intersection_area, 0.0);
    }

    #[test]
    fn non_polygon_geometry_is_rejected() {
        let mesh = unit_square_quad();
        let spatial = SpatialIndex::build(&mesh);
        let ops = RectangleStub;
        let result = calculate_weights(&mesh, &spatial, &ops, &Geometry::Other, WeightMode::Weight);
        assert!(matches!(result, Err(MeshError::UnsupportedGeometry(_))));
    }
}
