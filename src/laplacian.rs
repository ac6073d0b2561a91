//! Pseudo-Laplacian node-value builder (component F): per-node weights over
//! adjacent element centers, computed once per mesh and reused across time
//! steps.

use nalgebra::{Matrix2, Vector2};

use crate::config::InterpolationConfig;
use crate::mesh::Mesh;
use crate::topology::Topology;

const COLINEAR_DET_EPSILON: f64 = 1e-12;

/// One node's weights over its adjacent elements. Weights sum to 1 and are
/// each in `[0, 1]` after clamping.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeWeights {
    pub entries: Vec<(usize, f64)>,
}

impl NodeWeights {
    /// Blends adjacent element-center values under this node's weights.
    ///
    /// A node-derived value is fed straight into the triangle combiner's
    /// `z1`/`z2` slots (spec.md §4.7), so it must honor the same
    /// delete-value contract those slots do: an adjacent element whose
    /// center value is delete contributes no weight here, mirroring the
    /// quadrangle smooth-mode policy (§4.5) rather than silently blending
    /// the sentinel magnitude into the sum. Remaining weights renormalize;
    /// if every adjacent element is delete, the node value is delete too.
    pub fn value(&self, element_values: &[f64], config: &InterpolationConfig) -> f64 {
        let mut numerator = 0.0;
        let mut denom = 0.0;
        for &(e, w) in &self.entries {
            let v = element_values[e];
            if !config.is_delete(v) {
                numerator += w * v;
                denom += w;
            }
        }
        if denom == 0.0 {
            config.delete_value
        } else {
            numerator / denom
        }
    }
}

/// The full per-node weight table, built once from a mesh and its topology.
#[derive(Debug, Clone)]
pub struct NodeWeightTable {
    weights: Vec<NodeWeights>,
}

impl NodeWeightTable {
    pub fn build(mesh: &Mesh, topology: &Topology) -> Self {
        let weights = (0..mesh.node_count())
            .map(|n| build_node(mesh, topology, n))
            .collect();
        Self { weights }
    }

    pub fn weights_for(&self, n: usize) -> &NodeWeights {
        &self.weights[n]
    }

    pub fn node_value(&self, n: usize, element_values: &[f64], config: &InterpolationConfig) -> f64 {
        self.weights[n].value(element_values, config)
    }
}

fn build_node(mesh: &Mesh, topology: &Topology, n: usize) -> NodeWeights {
    let adjacent = topology.elements_touching_node(n);
    let k = adjacent.len();

    if k == 0 {
        return NodeWeights { entries: Vec::new() };
    }
    if k == 1 {
        return NodeWeights { entries: vec![(adjacent[0], 1.0)] };
    }

    let [xn, yn] = mesh.node_xy(n);
    let deltas: Vec<(f64, f64)> = adjacent
        .iter()
        .map(|&e| {
            let [xe, ye] = mesh.element_center(e);
            (xe - xn, ye - yn)
        })
        .collect();

    let sx: f64 = deltas.iter().map(|&(dx, _)| dx).sum();
    let sy: f64 = deltas.iter().map(|&(_, dy)| dy).sum();
    let sxx: f64 = deltas.iter().map(|&(dx, _)| dx * dx).sum();
    let syy: f64 = deltas.iter().map(|&(_, dy)| dy * dy).sum();
    let sxy: f64 = deltas.iter().map(|&(dx, dy)| dx * dy).sum();

    let det = sxx * syy - sxy * sxy;
    let k_f = k as f64;

    let raw: Vec<f64> = if det.abs() < COLINEAR_DET_EPSILON {
        inverse_distance_fallback(&deltas)
    } else {
        // Solve a*Sxx + b*Sxy = -Sx/K, a*Sxy + b*Syy = -Sy/K for (ax, ay) via
        // LU decomposition, then w_e = 1/K + ax*dx_e + ay*dy_e.
        let normal_equations = Matrix2::new(sxx, sxy, sxy, syy);
        let rhs = Vector2::new(-sx / k_f, -sy / k_f);
        let coefficients = normal_equations
            .lu()
            .solve(&rhs)
            .unwrap_or_else(|| Vector2::new(0.0, 0.0));
        deltas
            .iter()
            .map(|&(dx, dy)| 1.0 / k_f + coefficients.x * dx + coefficients.y * dy)
            .collect()
    };

    let clamped: Vec<f64> = raw.iter().map(|&w| w.clamp(0.0, 1.0)).collect();
    let sum: f64 = clamped.iter().sum();
    let normalized: Vec<f64> = if sum == 0.0 {
        vec![1.0 / k_f; k]
    } else {
        clamped.iter().map(|&w| w / sum).collect()
    };

    NodeWeights {
        entries: adjacent.iter().copied().zip(normalized).collect(),
    }
}

/// Falls back to inverse-distance weighting when adjacent element centers
/// are colinear with the node (the 2x2 normal-equations system is
/// singular), per spec.md §4.6 step 4.
fn inverse_distance_fallback(deltas: &[(f64, f64)]) -> Vec<f64> {
    let distances: Vec<f64> = deltas.iter().map(|&(dx, dy)| (dx * dx + dy * dy).sqrt()).collect();
    if let Some(zero_idx) = distances.iter().position(|&d| d == 0.0) {
        return (0..deltas.len())
            .map(|i| if i == zero_idx { 1.0 } else { 0.0 })
            .collect();
    }
    let inv: Vec<f64> = distances.iter().map(|&d| 1.0 / d).collect();
    let total: f64 = inv.iter().sum();
    inv.iter().map(|&v| v / total).collect()
}
