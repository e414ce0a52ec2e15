use nalgebra::{UnitQuaternion, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Control demand from the pilot / autopilot
// ---------------------------------------------------------------------------

/// Normalized rotation request, nominally each axis in [-1, 1].
/// Positive values request clockwise rotation about the matching body axis.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ControlDemand {
    pub pitch: f64,
    pub yaw: f64,
    pub roll: f64,
}

impl ControlDemand {
    pub fn new(pitch: f64, yaw: f64, roll: f64) -> Self {
        Self { pitch, yaw, roll }
    }

    pub fn pitch(v: f64) -> Self { Self::new(v, 0.0, 0.0) }
    pub fn yaw(v: f64) -> Self { Self::new(0.0, v, 0.0) }
    pub fn roll(v: f64) -> Self { Self::new(0.0, 0.0, v) }

    /// Each axis clamped to [-1, 1].
    pub fn clamped(&self) -> Self {
        Self {
            pitch: self.pitch.clamp(-1.0, 1.0),
            yaw: self.yaw.clamp(-1.0, 1.0),
            roll: self.roll.clamp(-1.0, 1.0),
        }
    }

    pub fn is_zero(&self) -> bool {
        self.pitch == 0.0 && self.yaw == 0.0 && self.roll == 0.0
    }
}

// ---------------------------------------------------------------------------
// Vehicle body axes (world frame)
// ---------------------------------------------------------------------------

/// Vehicle reference axes in world space: right is the pitch axis, forward
/// the yaw axis and up (the long axis) the roll axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyAxes {
    pub right: Vector3<f64>,
    pub forward: Vector3<f64>,
    pub up: Vector3<f64>,
}

impl BodyAxes {
    /// Axes of a body whose attitude maps body→world; body +Z is the long axis.
    pub fn from_attitude(attitude: &UnitQuaternion<f64>) -> Self {
        Self {
            right: attitude * Vector3::x(),
            forward: attitude * Vector3::y(),
            up: attitude * Vector3::z(),
        }
    }
}

// ---------------------------------------------------------------------------
// Host abstraction
// ---------------------------------------------------------------------------

/// Read-only view of the host vehicle, queried once per tick.
///
/// Implement this to drive a [`GimbalController`](crate::gnc::GimbalController)
/// from any simulation. Every vector is in the same world frame.
pub trait VesselPose {
    /// Vehicle centre of mass.
    fn center_of_mass(&self) -> Vector3<f64>;

    /// Vehicle reference axes.
    fn body_axes(&self) -> BodyAxes;

    /// Current pitch/yaw/roll request.
    fn control_demand(&self) -> ControlDemand;

    /// World position of the nozzle pivot.
    fn nozzle_position(&self) -> Vector3<f64>;

    /// Local-to-world rotation of the part carrying the nozzle.
    fn parent_rotation(&self) -> UnitQuaternion<f64>;

    /// Nozzle rotation relative to its parent when centred. Read once when
    /// the controller starts.
    fn nozzle_rest_rotation(&self) -> UnitQuaternion<f64>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn clamp_limits_each_axis() {
        let d = ControlDemand::new(2.0, -3.0, 0.5).clamped();
        assert_eq!(d, ControlDemand::new(1.0, -1.0, 0.5));
    }

    #[test]
    fn zero_demand_detected() {
        assert!(ControlDemand::default().is_zero());
        assert!(ControlDemand::new(-0.0, 0.0, 0.0).is_zero());
        assert!(!ControlDemand::yaw(1e-9).is_zero());
    }

    #[test]
    fn axes_follow_attitude() {
        let q = UnitQuaternion::from_axis_angle(&Vector3::z_axis(), FRAC_PI_2);
        let axes = BodyAxes::from_attitude(&q);
        assert_relative_eq!(axes.right, Vector3::y(), epsilon = 1e-12);
        assert_relative_eq!(axes.forward, -Vector3::x(), epsilon = 1e-12);
        assert_relative_eq!(axes.up, Vector3::z(), epsilon = 1e-12);
    }
}
