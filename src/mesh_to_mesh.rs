//! Mesh-to-mesh interpolator (component G): locates a target point's source
//! element and blends element-center and node values via the triangle
//! interpolator, recovering pure linear interpolation across element
//! boundaries.

use crate::config::InterpolationConfig;
use crate::error::{MeshError, MeshResult};
use crate::interpolate::{quad, triangle};
use crate::laplacian::NodeWeightTable;
use crate::mesh::{ElementType, Mesh};
use crate::spatial::{point_in_triangle, SpatialIndex};
use crate::topology::{Polyline, Topology};

/// Ties together a mesh, its derived topology, spatial index, and node
/// weight table into the single object queries run against. Built once;
/// immutable and `Sync` thereafter, so callers may shard query points
/// across threads over a shared `&MeshInterpolator`.
pub struct MeshInterpolator {
    mesh: Mesh,
    topology: Topology,
    spatial: SpatialIndex,
    node_weights: NodeWeightTable,
    config: InterpolationConfig,
}

impl MeshInterpolator {
    pub fn new(mesh: Mesh, config: InterpolationConfig) -> MeshResult<Self> {
        let topology = Topology::build(&mesh)?;
        let spatial = SpatialIndex::build(&mesh);
        let node_weights = NodeWeightTable::build(&mesh, &topology);
        Ok(Self { mesh, topology, spatial, node_weights, config })
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn config(&self) -> &InterpolationConfig {
        &self.config
    }

    fn check_element_values(&self, element_values: &[f64]) -> MeshResult<()> {
        if element_values.len() != self.mesh.element_count() {
            return Err(MeshError::IncompatibleInputs(format!(
                "element_values length {} disagrees with element count {}",
                element_values.len(),
                self.mesh.element_count()
            )));
        }
        Ok(())
    }

    /// Locates the sub-triangle `(O, node_left, node_right)` of element `e`
    /// containing `p`, per spec.md §4.7 step 2. Sub-triangles are visited in
    /// edge order (ties resolved by smallest local edge index), matching
    /// the spatial index's smallest-element-index tie-break convention.
    fn locate_subtriangle(&self, e: usize, p: [f64; 2]) -> Option<(usize, usize)> {
        let element = self.mesh.element(e);
        let center = element.center();
        element
            .edges()
            .find(|&(a, b)| point_in_triangle(p, center, self.mesh.node_xy(a), self.mesh.node_xy(b)))
    }

    /// For a query point inside the mesh, blends the containing element's
    /// center value with its two flanking node values via the triangle
    /// interpolator. Returns `config.delete_value` if the point lies
    /// outside every element (spec.md §4.7 step 1) or the located
    /// sub-triangle is degenerate.
    pub fn interpolate(&self, x: f64, y: f64, element_values: &[f64]) -> MeshResult<f64> {
        self.check_element_values(element_values)?;
        let p = [x, y];
        let Some(e) = self.spatial.find_element(&self.mesh, p) else {
            return Ok(self.config.delete_value);
        };
        let element = self.mesh.element(e);
        let Some((left, right)) = self.locate_subtriangle(e, p) else {
            return Ok(self.config.delete_value);
        };

        let z_center = element_values[e];
        let z_left = self.node_weights.node_value(left, element_values, &self.config);
        let z_right = self.node_weights.node_value(right, element_values, &self.config);

        match triangle::compute_weights(p, element.center(), self.mesh.node_xy(left), self.mesh.node_xy(right)) {
            Some(weights) => Ok(triangle::combine(&weights, [z_center, z_left, z_right], &self.config)),
            None => Ok(self.config.delete_value),
        }
    }

    /// Vectorized form of [`Self::interpolate`] over a pre-bound target
    /// point set.
    pub fn interpolate_to_target(
        &self,
        element_values: &[f64],
        targets: &[(f64, f64)],
        out: &mut [f64],
    ) -> MeshResult<()> {
        self.check_element_values(element_values)?;
        if targets.len() != out.len() {
            return Err(MeshError::IncompatibleInputs(format!(
                "targets length {} disagrees with output buffer length {}",
                targets.len(),
                out.len()
            )));
        }
        for (i, &(x, y)) in targets.iter().enumerate() {
            out[i] = self.interpolate(x, y, element_values)?;
        }
        Ok(())
    }

    /// Alternative path for quadrangles: applies the quadrangle interpolator
    /// (§4.5) directly to the four corner node values rather than routing
    /// through the element-center/node-pair triangle blend. Meaningless for
    /// triangles (there is no separate "bilinear node" model for a 3-node
    /// element), so triangle-typed elements fall back to
    /// [`Self::interpolate`].
    pub fn interpolate_bilinear_nodes(&self, x: f64, y: f64, element_values: &[f64]) -> MeshResult<f64> {
        self.check_element_values(element_values)?;
        let p = [x, y];
        let Some(e) = self.spatial.find_element(&self.mesh, p) else {
            return Ok(self.config.delete_value);
        };
        let element = self.mesh.element(e);
        if element.element_type() != ElementType::Quadrangle {
            return self.interpolate(x, y, element_values);
        }
        let nodes = element.nodes();
        let node_values: Vec<f64> = nodes
            .iter()
            .map(|&n| self.node_weights.node_value(n, element_values, &self.config))
            .collect();
        let corners = [
            self.mesh.node_xy(nodes[0]),
            self.mesh.node_xy(nodes[1]),
            self.mesh.node_xy(nodes[2]),
            self.mesh.node_xy(nodes[3]),
        ];
        match quad::compute_weights(p, corners[0], corners[1], corners[2], corners[3]) {
            Some(weights) => Ok(quad::combine(
                &weights,
                [node_values[0], node_values[1], node_values[2], node_values[3]],
                &self.config,
            )),
            None => Ok(self.config.delete_value),
        }
    }

    pub fn extract_boundary(&self) -> &[Polyline] {
        self.topology.boundary_polylines()
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn node_weights(&self) -> &NodeWeightTable {
        &self.node_weights
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::mesh::fixtures::{single_triangle, two_triangle_mesh, unit_square_quad};

    #[test]
    fn scenario_1_triangle_centroid_and_edge_queries() {
        let mesh = single_triangle();
        let interp = MeshInterpolator::new(mesh, InterpolationConfig::default()).unwrap();
        let values = [10.0];
        // node 1 and node 2 both only touch this element, so node values
        // equal the element-center value here; verify center/vertex recovery
        // rather than the two-distinct-node-values scenario (that needs the
        // two-triangle mesh, covered below).
        let centroid = interp.interpolate(1.0 / 3.0, 1.0 / 3.0, &values).unwrap();
        assert_abs_diff_eq!(centroid, 10.0, epsilon = 1e-9);
    }

    #[test]
    fn outside_mesh_returns_delete_value() {
        let mesh = single_triangle();
        let config = InterpolationConfig::default();
        let interp = MeshInterpolator::new(mesh, config).unwrap();
        let values = [10.0];
        let result = interp.interpolate(100.0, 100.0, &values).unwrap();
        assert_eq!(result, config.delete_value);
    }

    #[test]
    fn node_adjacent_to_delete_valued_element_resolves_via_surviving_neighbor() {
        // Element 0's center is delete; element 1's is not. Nodes 1 and 2
        // are shared by both, so their pseudo-Laplacian weights split
        // across a delete and a non-delete neighbor. Querying anywhere
        // inside element 1 should recover exactly element 1's value --
        // every contributing z (center, and both node-derived values) is
        // 20.0 once the delete-valued neighbor is excluded and the
        // remaining weight renormalized. Before that exclusion, a node's
        // blended value would instead be `w * 20.0` for whatever fraction
        // `w` of its weight landed on element 1, silently pulling the
        // result below 20.0.
        let mesh = two_triangle_mesh();
        let interp = MeshInterpolator::new(mesh, InterpolationConfig::default()).unwrap();
        let values = [InterpolationConfig::default().delete_value, 20.0];
        let result = interp.interpolate(0.7, 0.7, &values).unwrap();
        assert_abs_diff_eq!(result, 20.0, epsilon = 1e-9);
    }

    #[test]
    fn node_value_is_delete_when_its_sole_adjacent_element_is_delete() {
        let mesh = single_triangle();
        let config = InterpolationConfig::default();
        let interp = MeshInterpolator::new(mesh, config).unwrap();
        let values = [config.delete_value];
        // On the edge opposite the center, weights are (0, 0.5, 0.5): both
        // node-derived values come from this mesh's single (delete)
        // element, so the blended result must be delete outright.
        let result = interp.interpolate(0.5, 0.5, &values).unwrap();
        assert_eq!(result, config.delete_value);
    }

    #[test]
    fn scenario_5_linear_interpolation_along_center_line() {
        let mesh = two_triangle_mesh();
        let interp = MeshInterpolator::new(mesh, InterpolationConfig::default()).unwrap();
        let values = [10.0, 20.0];
        let c0 = interp.mesh().element_center(0);
        let c1 = interp.mesh().element_center(1);
        for t in [0.0, 0.25, 0.5, 0.75, 1.0] {
            let x = c0[0] + t * (c1[0] - c0[0]);
            let y = c0[1] + t * (c1[1] - c0[1]);
            let expected = 10.0 + t * (20.0 - 10.0);
            let got = interp.interpolate(x, y, &values).unwrap();
            assert!((got - expected).abs() < 1e-6, "t={t}: expected {expected}, got {got}");
        }
    }

    #[test]
    fn quad_bilinear_node_path_matches_direct_quad_interpolator() {
        let mesh = unit_square_quad();
        let interp = MeshInterpolator::new(mesh, InterpolationConfig::default()).unwrap();
        let values = [100.0];
        // single element: node values equal the element-center value, so
        // every interior query should recover it under either path.
        let direct = interp.interpolate_bilinear_nodes(0.25, 0.75, &values).unwrap();
        assert_abs_diff_eq!(direct, 100.0, epsilon = 1e-9);
    }

    #[test]
    fn incompatible_element_values_length_is_rejected() {
        let mesh = single_triangle();
        let interp = MeshInterpolator::new(mesh, InterpolationConfig::default()).unwrap();
        let result = interp.interpolate(0.1, 0.1, &[1.0, 2.0]);
        assert!(matches!(result, Err(MeshError::IncompatibleInputs(_))));
    }
}
