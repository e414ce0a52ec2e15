use std::f64::consts::PI;

use nalgebra::Vector3;

// ---------------------------------------------------------------------------
// Cone clipping: angle- and magnitude-preserving projection into the gimbal cone
// ---------------------------------------------------------------------------

/// Targets shorter than this have no usable direction.
pub const MIN_TARGET_NORM: f64 = 1e-6;

/// Angular tolerance (rad) for the parallel / anti-parallel tests.
pub const ANGLE_EPSILON: f64 = 1e-6;

const FACTOR_EPSILON: f64 = 1e-6;

/// Angle between two vectors in radians.
///
/// Uses `atan2(|a × b|, a · b)`, which stays accurate near 0 and pi where
/// `acos` of the normalized dot product loses precision. Returns 0 when
/// either vector is zero.
pub fn angle_between(a: &Vector3<f64>, b: &Vector3<f64>) -> f64 {
    a.cross(b).norm().atan2(a.dot(b))
}

/// Clip `target` into the cone of half-angle `range_deg` around `neutral`.
///
/// The result keeps the length of `target` and lies in the plane spanned by
/// `neutral` and `target`, at an angle of
/// `min(range, angle(neutral, target)) * |factor|` from `neutral`.
/// A negative `factor` requests the opposite rotation sense and is handled
/// by flipping both `factor` and `target`.
///
/// Degenerate inputs never produce NaN:
/// - `factor == 0`, a zero-length target, a non-positive range or a
///   zero-length `neutral` give the zero vector;
/// - a target parallel to `neutral` comes back unchanged;
/// - a target anti-parallel to `neutral` has no defined rotation plane and
///   comes back as `neutral` scaled to the target's length.
pub fn cone_clip(
    neutral: &Vector3<f64>,
    target: &Vector3<f64>,
    factor: f64,
    range_deg: f64,
) -> Vector3<f64> {
    if factor == 0.0 || range_deg <= 0.0 {
        return Vector3::zeros();
    }

    let r = target.norm();
    if r < MIN_TARGET_NORM {
        return Vector3::zeros();
    }
    let Some(n) = neutral.try_normalize(MIN_TARGET_NORM) else {
        return Vector3::zeros();
    };

    let (factor, target) = if factor < 0.0 {
        (-factor, -target)
    } else {
        (factor, *target)
    };

    let range = range_deg.to_radians();
    let ideal = angle_between(&n, &target);

    // Already aligned, or the whole request fits inside the cone at full
    // authority: the target itself is the exact answer.
    if ideal < ANGLE_EPSILON || (ideal < range && (factor - 1.0).abs() < FACTOR_EPSILON) {
        return target;
    }

    if PI - ideal < ANGLE_EPSILON {
        return n * r;
    }

    let Some(tangent) = (target - n * n.dot(&target)).try_normalize(f64::MIN_POSITIVE) else {
        return n * r;
    };

    let angle = range.min(ideal) * factor;
    n * (r * angle.cos()) + tangent * (r * angle.sin())
}

/// The mechanical deflection limit of one nozzle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GimbalCone {
    pub range_deg: f64,
}

impl GimbalCone {
    pub fn new(range_deg: f64) -> Self {
        Self { range_deg }
    }

    /// Clip `target` at a fraction `factor` of full authority.
    pub fn clip(&self, neutral: &Vector3<f64>, target: &Vector3<f64>, factor: f64) -> Vector3<f64> {
        cone_clip(neutral, target, factor, self.range_deg)
    }

    /// Deflection of `v` from `neutral`, degrees.
    pub fn deflection_deg(neutral: &Vector3<f64>, v: &Vector3<f64>) -> f64 {
        angle_between(neutral, v).to_degrees()
    }

    /// True if `v` points within the cone (with `tol_deg` slack).
    pub fn contains(&self, neutral: &Vector3<f64>, v: &Vector3<f64>, tol_deg: f64) -> bool {
        Self::deflection_deg(neutral, v) <= self.range_deg + tol_deg
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Unit vector at `deg` from +Z, tilted toward +X.
    fn tilted(deg: f64) -> Vector3<f64> {
        let a = deg.to_radians();
        Vector3::new(a.sin(), 0.0, a.cos())
    }

    #[test]
    fn zero_factor_gives_zero() {
        let v = cone_clip(&Vector3::z(), &Vector3::x(), 0.0, 5.0);
        assert_eq!(v, Vector3::zeros());
    }

    #[test]
    fn tiny_target_gives_zero() {
        let v = cone_clip(&Vector3::z(), &Vector3::new(1e-8, 0.0, 0.0), 1.0, 5.0);
        assert_eq!(v, Vector3::zeros());
    }

    #[test]
    fn zero_range_disables_deflection() {
        let v = cone_clip(&Vector3::z(), &tilted(30.0), 1.0, 0.0);
        assert_eq!(v, Vector3::zeros());
    }

    #[test]
    fn parallel_target_returned_unchanged() {
        let t = Vector3::new(0.0, 0.0, 3.0);
        assert_eq!(cone_clip(&Vector3::z(), &t, 0.4, 5.0), t);
    }

    #[test]
    fn inside_cone_at_full_authority_is_exact() {
        let t = tilted(3.0) * 2.0;
        assert_eq!(cone_clip(&Vector3::z(), &t, 1.0, 5.0), t);
    }

    #[test]
    fn saturates_at_cone_edge() {
        let t = tilted(30.0) * 2.5;
        let v = cone_clip(&Vector3::z(), &t, 1.0, 5.0);
        assert_relative_eq!(GimbalCone::deflection_deg(&Vector3::z(), &v), 5.0, epsilon = 1e-9);
        assert_relative_eq!(v.norm(), 2.5, epsilon = 1e-12);
        // stays in the neutral/target plane, on the target's side
        assert!(v.y.abs() < 1e-12);
        assert!(v.x > 0.0);
    }

    #[test]
    fn partial_authority_scales_angle() {
        let v = cone_clip(&Vector3::z(), &tilted(30.0), 0.5, 5.0);
        assert_relative_eq!(GimbalCone::deflection_deg(&Vector3::z(), &v), 2.5, epsilon = 1e-9);

        let w = cone_clip(&Vector3::z(), &tilted(3.0), 0.5, 5.0);
        assert_relative_eq!(GimbalCone::deflection_deg(&Vector3::z(), &w), 1.5, epsilon = 1e-9);
    }

    #[test]
    fn negative_factor_mirrors_about_neutral() {
        let n = Vector3::z();
        let t = Vector3::x() * 0.7;
        let pos = cone_clip(&n, &t, 0.8, 5.0);
        let neg = cone_clip(&n, &t, -0.8, 5.0);
        assert_relative_eq!(pos.z, neg.z, epsilon = 1e-12);
        assert_relative_eq!(pos.x, -neg.x, epsilon = 1e-12);
        assert_relative_eq!(pos.norm(), neg.norm(), epsilon = 1e-12);
    }

    #[test]
    fn anti_parallel_target_stays_neutral() {
        let v = cone_clip(&Vector3::z(), &Vector3::new(0.0, 0.0, -2.0), 1.0, 5.0);
        assert_relative_eq!(v, Vector3::new(0.0, 0.0, 2.0), epsilon = 1e-12);

        // negative factor on a parallel target flips it anti-parallel
        let w = cone_clip(&Vector3::z(), &Vector3::z(), -1.0, 5.0);
        assert!(w.iter().all(|c| c.is_finite()));
    }

    #[test]
    fn zero_neutral_gives_zero() {
        let v = cone_clip(&Vector3::zeros(), &Vector3::x(), 1.0, 5.0);
        assert_eq!(v, Vector3::zeros());
    }

    #[test]
    fn contains_respects_tolerance() {
        let cone = GimbalCone::new(5.0);
        assert!(cone.contains(&Vector3::z(), &tilted(5.0), 1e-9));
        assert!(!cone.contains(&Vector3::z(), &tilted(5.1), 1e-9));
    }
}
