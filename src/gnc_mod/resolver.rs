use nalgebra::Vector3;

use crate::math::GimbalCone;
use crate::vehicle::{BodyAxes, ControlDemand};

// ---------------------------------------------------------------------------
// Torque-demand resolver: one control axis → one nozzle displacement
// ---------------------------------------------------------------------------

const MIN_LENGTH: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlAxis {
    Pitch,
    Yaw,
    Roll,
}

impl ControlAxis {
    pub const ALL: [ControlAxis; 3] = [ControlAxis::Pitch, ControlAxis::Yaw, ControlAxis::Roll];

    /// World-space rotation axis: right for pitch, forward for yaw, up for roll.
    pub fn rotation_axis(self, axes: &BodyAxes) -> Vector3<f64> {
        match self {
            ControlAxis::Pitch => axes.right,
            ControlAxis::Yaw => axes.forward,
            ControlAxis::Roll => axes.up,
        }
    }

    pub fn demand(self, demand: &ControlDemand) -> f64 {
        match self {
            ControlAxis::Pitch => demand.pitch,
            ControlAxis::Yaw => demand.yaw,
            ControlAxis::Roll => demand.roll,
        }
    }
}

/// Displacement direction producing a counter-clockwise moment about `axis`.
///
/// Its length is the sine of the lever/axis angle, so axes nearly parallel
/// to the lever arm get little authority. A zero lever arm or axis yields
/// the zero vector.
pub fn torque_direction(lever_arm: &Vector3<f64>, axis: &Vector3<f64>) -> Vector3<f64> {
    match (lever_arm.try_normalize(MIN_LENGTH), axis.try_normalize(MIN_LENGTH)) {
        (Some(l), Some(a)) => l.cross(&a),
        _ => Vector3::zeros(),
    }
}

/// Nozzle displacement for a single axis, already clipped to this axis's
/// share of the cone. `control_input` is a clockwise request, hence the
/// negated clip factor.
pub fn resolve_axis(
    lever_arm: &Vector3<f64>,
    axis: &Vector3<f64>,
    neutral: &Vector3<f64>,
    control_input: f64,
    cone: &GimbalCone,
) -> Vector3<f64> {
    let direction = torque_direction(lever_arm, axis);
    cone.clip(neutral, &direction, -control_input)
}

/// Per-axis displacements for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisContributions {
    pub pitch: Vector3<f64>,
    pub yaw: Vector3<f64>,
    pub roll: Vector3<f64>,
}

impl AxisContributions {
    pub fn zero() -> Self {
        Self {
            pitch: Vector3::zeros(),
            yaw: Vector3::zeros(),
            roll: Vector3::zeros(),
        }
    }

    pub fn get(&self, axis: ControlAxis) -> Vector3<f64> {
        match axis {
            ControlAxis::Pitch => self.pitch,
            ControlAxis::Yaw => self.yaw,
            ControlAxis::Roll => self.roll,
        }
    }

    fn slot_mut(&mut self, axis: ControlAxis) -> &mut Vector3<f64> {
        match axis {
            ControlAxis::Pitch => &mut self.pitch,
            ControlAxis::Yaw => &mut self.yaw,
            ControlAxis::Roll => &mut self.roll,
        }
    }

    pub fn combined(&self) -> Vector3<f64> {
        self.pitch + self.yaw + self.roll
    }
}

/// Resolve all three axes of `demand`. A zero demand skips the geometry.
pub fn resolve_demand(
    lever_arm: &Vector3<f64>,
    axes: &BodyAxes,
    neutral: &Vector3<f64>,
    demand: &ControlDemand,
    cone: &GimbalCone,
) -> AxisContributions {
    let mut out = AxisContributions::zero();
    if demand.is_zero() {
        return out;
    }
    for axis in ControlAxis::ALL {
        let input = axis.demand(demand);
        if input != 0.0 {
            *out.slot_mut(axis) =
                resolve_axis(lever_arm, &axis.rotation_axis(axes), neutral, input, cone);
        }
    }
    out
}
