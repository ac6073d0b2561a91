//! Triangle interpolator (component D): barycentric weights for a point in
//! the (element-center, node, node) triangle, with delete-value
//! propagation.

use crate::config::InterpolationConfig;
use crate::spatial::signed_area2;

/// Barycentric weights `(w0, w1, w2)` over `(p0, p1, p2)`, summing to 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangleWeights {
    pub w: [f64; 3],
}

/// Computes barycentric weights of `p` in triangle `(p0, p1, p2)`.
/// Returns `None` for a degenerate (zero-area) triangle, per spec.md §4.4.
pub fn compute_weights(
    p: [f64; 2],
    p0: [f64; 2],
    p1: [f64; 2],
    p2: [f64; 2],
) -> Option<TriangleWeights> {
    let area = signed_area2(p0, p1, p2);
    if area == 0.0 {
        return None;
    }
    let w0 = signed_area2(p, p1, p2) / area;
    let w1 = signed_area2(p, p2, p0) / area;
    let w2 = signed_area2(p, p0, p1) / area;
    Some(TriangleWeights { w: [w0, w1, w2] })
}

/// Combines three values `(z0, z1, z2)` under the triangle's delete-value
/// policy (spec.md §4.4's influence-zone table). `z0` is conventionally the
/// element-center value, `z1`/`z2` the two adjacent node values, but the
/// policy treats all three symmetrically.
pub fn combine(weights: &TriangleWeights, z: [f64; 3], config: &InterpolationConfig) -> f64 {
    let deletes: Vec<usize> = (0..3).filter(|&i| config.is_delete(z[i])).collect();

    match deletes.len() {
        0 => weights.w[0] * z[0] + weights.w[1] * z[1] + weights.w[2] * z[2],
        1 => {
            let k = deletes[0];
            if weights.w[k] <= config.epsilon_w {
                let remaining: Vec<usize> = (0..3).filter(|&i| i != k).collect();
                let denom: f64 = remaining.iter().map(|&i| weights.w[i]).sum();
                if denom == 0.0 {
                    config.delete_value
                } else {
                    remaining.iter().map(|&i| weights.w[i] * z[i]).sum::<f64>() / denom
                }
            } else {
                config.delete_value
            }
        }
        _ => config.delete_value,
    }
}
