//! Quadrangle interpolator (component E): bilinear-inverse local coordinates
//! for a point in a convex quadrangle, with two delete-value policies.

use crate::config::InterpolationConfig;
use crate::spatial::signed_area2;

const ROOT_TOLERANCE: f64 = 1e-9;

/// Local bilinear coordinates `(dx, dy)` of a point and the resulting
/// corner weights, summing to 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadWeights {
    pub dx: f64,
    pub dy: f64,
    pub w: [f64; 4],
}

fn is_convex(n0: [f64; 2], n1: [f64; 2], n2: [f64; 2], n3: [f64; 2]) -> bool {
    let turns = [
        signed_area2(n3, n0, n1),
        signed_area2(n0, n1, n2),
        signed_area2(n1, n2, n3),
        signed_area2(n2, n3, n0),
    ];
    turns.iter().all(|&t| t >= 0.0) || turns.iter().all(|&t| t <= 0.0)
}

fn corner_weights(dx: f64, dy: f64) -> [f64; 4] {
    [
        (1.0 - dx) * (1.0 - dy),
        dx * (1.0 - dy),
        dx * dy,
        (1.0 - dx) * dy,
    ]
}

fn in_unit_square(dx: f64, dy: f64) -> bool {
    (-ROOT_TOLERANCE..=1.0 + ROOT_TOLERANCE).contains(&dx)
        && (-ROOT_TOLERANCE..=1.0 + ROOT_TOLERANCE).contains(&dy)
}

/// Solves for `dx` given a candidate `dy`, preferring whichever of the two
/// scalar bilinear equations has the better-conditioned denominator.
fn solve_dx(a: f64, b: f64, e1: [f64; 2], e2: [f64; 2], e3: [f64; 2], dy: f64) -> Option<f64> {
    let denom_x = e1[0] + dy * e3[0];
    let denom_y = e1[1] + dy * e3[1];
    if denom_x.abs() >= denom_y.abs() {
        if denom_x == 0.0 {
            return None;
        }
        Some((a - dy * e2[0]) / denom_x)
    } else {
        if denom_y == 0.0 {
            return None;
        }
        Some((b - dy * e2[1]) / denom_y)
    }
}

/// Computes the bilinear-inverse local coordinates of `p` in the convex,
/// counter-clockwise quadrangle `(n0, n1, n2, n3)`.
///
/// Returns `None` for a non-convex quadrangle (per spec.md §9's resolved
/// open question) or when neither root of the underlying quadratic lands in
/// `[0, 1]^2`.
pub fn compute_weights(
    p: [f64; 2],
    n0: [f64; 2],
    n1: [f64; 2],
    n2: [f64; 2],
    n3: [f64; 2],
) -> Option<QuadWeights> {
    if !is_convex(n0, n1, n2, n3) {
        return None;
    }

    let e1 = [n1[0] - n0[0], n1[1] - n0[1]];
    let e2 = [n3[0] - n0[0], n3[1] - n0[1]];
    let e3 = [
        n0[0] - n1[0] + n2[0] - n3[0],
        n0[1] - n1[1] + n2[1] - n3[1],
    ];
    let a = p[0] - n0[0];
    let b = p[1] - n0[1];

    // P - n0 = dx*e1 + dy*e2 + dx*dy*e3, eliminating dx via cross products
    // yields a quadratic in dy: A*dy^2 + B*dy + C = 0.
    let coeff_a = e2[1] * e3[0] - e2[0] * e3[1];
    let coeff_b = b * e3[0] - a * e3[1] + e2[0] * e1[1] - e2[1] * e1[0];
    let coeff_c = b * e1[0] - a * e1[1];

    let dy_roots: Vec<f64> = if coeff_a.abs() < 1e-14 {
        if coeff_b == 0.0 {
            Vec::new()
        } else {
            vec![-coeff_c / coeff_b]
        }
    } else {
        let discriminant = coeff_b * coeff_b - 4.0 * coeff_a * coeff_c;
        if discriminant < 0.0 {
            Vec::new()
        } else {
            let sqrt_d = discriminant.sqrt();
            vec![
                (-coeff_b + sqrt_d) / (2.0 * coeff_a),
                (-coeff_b - sqrt_d) / (2.0 * coeff_a),
            ]
        }
    };

    let mut candidates: Vec<(f64, f64)> = Vec::new();
    for dy in dy_roots {
        if let Some(dx) = solve_dx(a, b, e1, e2, e3, dy) {
            if in_unit_square(dx, dy) {
                candidates.push((dx.clamp(0.0, 1.0), dy.clamp(0.0, 1.0)));
            }
        }
    }

    let (dx, dy) = match candidates.len() {
        0 => return None,
        1 => candidates[0],
        _ => *candidates
            .iter()
            .min_by(|a, b| {
                let da = (a.0 - 0.5).powi(2) + (a.1 - 0.5).powi(2);
                let db = (b.0 - 0.5).powi(2) + (b.1 - 0.5).powi(2);
                da.partial_cmp(&db).unwrap()
            })
            .unwrap(),
    };

    Some(QuadWeights { dx, dy, w: corner_weights(dx, dy) })
}

/// Smooth-mode combine: delete corners contribute zero weight, remaining
/// weights renormalize. If all four corners are delete (or the surviving
/// weights sum to zero), result is delete.
fn combine_smooth(weights: &QuadWeights, z: [f64; 4], config: &InterpolationConfig) -> f64 {
    let mut numerator = 0.0;
    let mut denom = 0.0;
    for i in 0..4 {
        if !config.is_delete(z[i]) {
            numerator += weights.w[i] * z[i];
            denom += weights.w[i];
        }
    }
    if denom == 0.0 {
        config.delete_value
    } else {
        numerator / denom
    }
}

/// Box-mode combine: any delete corner makes the whole element delete.
fn combine_box(weights: &QuadWeights, z: [f64; 4], config: &InterpolationConfig) -> f64 {
    if z.iter().any(|&v| config.is_delete(v)) {
        config.delete_value
    } else {
        (0..4).map(|i| weights.w[i] * z[i]).sum()
    }
}

/// Dispatches to the smooth or box delete-value policy per
/// `config.smooth_delete_chop`.
pub fn combine(weights: &QuadWeights, z: [f64; 4], config: &InterpolationConfig) -> f64 {
    if config.smooth_delete_chop {
        combine_smooth(weights, z, config)
    } else {
        combine_box(weights, z, config)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    const N0: [f64; 2] = [0.0, 0.0];
    const N1: [f64; 2] = [1.0, 0.0];
    const N2: [f64; 2] = [1.0, 1.0];
    const N3: [f64; 2] = [0.0, 1.0];

    #[test]
    fn scenario_3_unit_square_weights() {
        let w = compute_weights([0.25, 0.75], N0, N1, N2, N3).unwrap();
        assert_abs_diff_eq!(w.dx, 0.25, epsilon = 1e-9);
        assert_abs_diff_eq!(w.dy, 0.75, epsilon = 1e-9);
        let expected = [0.1875, 0.0625, 0.1875, 0.5625];
        for i in 0..4 {
            assert_abs_diff_eq!(w.w[i], expected[i], epsilon = 1e-9);
        }
        let config = InterpolationConfig::default();
        let result = combine(&w, [10.0, 20.0, 40.0, 30.0], &config);
        assert_abs_diff_eq!(result, 28.125, epsilon = 1e-9);
    }

    #[test]
    fn corners_recover_corner_values() {
        for (p, expected_idx) in [
            ([0.0, 0.0], 0),
            ([1.0, 0.0], 1),
            ([1.0, 1.0], 2),
            ([0.0, 1.0], 3),
        ] {
            let w = compute_weights(p, N0, N1, N2, N3).unwrap();
            let mut z = [0.0; 4];
            z[expected_idx] = 1.0;
            let config = InterpolationConfig::default();
            let result = combine(&w, z, &config);
            assert_abs_diff_eq!(result, 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn non_convex_quad_is_undefined() {
        // A dart shape: n2 pulled in towards the centroid, breaking convexity.
        let n2_dart = [0.5, 0.2];
        assert!(compute_weights([0.3, 0.3], N0, N1, n2_dart, N3).is_none());
    }

    #[test]
    fn scenario_4_smooth_mode_renormalizes_around_delete_corner() {
        let w = compute_weights([0.25, 0.75], N0, N1, N2, N3).unwrap();
        let config = InterpolationConfig::default();
        let delete = config.delete_value;
        let result = combine(&w, [delete, 20.0, 40.0, 30.0], &config);
        assert!(result.is_finite());
        assert_ne!(result, delete);
    }

    #[test]
    fn scenario_4_box_mode_propagates_delete_from_any_corner() {
        let w = compute_weights([0.25, 0.75], N0, N1, N2, N3).unwrap();
        let mut config = InterpolationConfig::default();
        config.smooth_delete_chop = false;
        let delete = config.delete_value;
        let result = combine(&w, [delete, 20.0, 40.0, 30.0], &config);
        assert_eq!(result, delete);
    }

    #[test]
    fn weights_sum_to_one() {
        let w = compute_weights([0.4, 0.6], N0, N1, N2, N3).unwrap();
        assert_abs_diff_eq!(w.w.iter().sum::<f64>(), 1.0, epsilon = 1e-9);
    }
}
