use serde::{Deserialize, Serialize};

/// Per-query configuration shared by the triangle and quadrangle
/// interpolators.
///
/// Built once and reused across a query batch: spec says interpolator
/// instances carry "a single mutable configuration field ... set at
/// construction and not changed during a query batch". Constructing a new
/// `InterpolationConfig` to change mode is O(1), so callers who want
/// different knobs build a new one rather than mutating this in place.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InterpolationConfig {
    /// Sentinel marking a missing value. Always compared by exact equality,
    /// never tolerance — see the module docs on delete-value arithmetic.
    pub delete_value: f64,
    /// Quadrangle delete-value policy. `true` selects the smooth fade-out
    /// mode; `false` selects the hard box-mode mask. Callers choose based
    /// on whether missing regions should fade or be sharply masked.
    pub smooth_delete_chop: bool,
    /// Influence-zone threshold for the triangle delete-value policy. The
    /// spec fixes this at 0.5; `Default` always reproduces that value.
    pub epsilon_w: f64,
}

impl InterpolationConfig {
    /// A typically-used sentinel magnitude, chosen far from any plausible
    /// real value.
    pub const DEFAULT_DELETE_VALUE: f64 = 1e-35;

    pub fn new(delete_value: f64, smooth_delete_chop: bool) -> Self {
        Self {
            delete_value,
            smooth_delete_chop,
            epsilon_w: 0.5,
        }
    }

    /// Exact-equality delete-value test. Never introduce a tolerance here:
    /// the sentinel is not robust against arithmetic, so any computed value
    /// that happens to collide with it must still be treated as data, not
    /// as delete.
    #[inline]
    pub fn is_delete(&self, value: f64) -> bool {
        value == self.delete_value
    }
}

impl Default for InterpolationConfig {
    fn default() -> Self {
        Self {
            delete_value: Self::DEFAULT_DELETE_VALUE,
            smooth_delete_chop: true,
            epsilon_w: 0.5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delete_test_is_exact_not_tolerant() {
        let cfg = InterpolationConfig::default();
        assert!(cfg.is_delete(1e-35));
        // A value merely close to the sentinel is data, not delete.
        assert!(!cfg.is_delete(1e-35 + 1e-40));
    }

    #[test]
    fn serde_json_roundtrip() {
        let cfg = InterpolationConfig::new(-9999.0, false);
        let json = serde_json::to_string(&cfg).unwrap();
        let back: InterpolationConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(cfg, back);
    }

    #[test]
    fn serde_yaml_roundtrip() {
        let cfg = InterpolationConfig::default();
        let yaml = serde_yaml::to_string(&cfg).unwrap();
        let back: InterpolationConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(cfg, back);
    }
}
