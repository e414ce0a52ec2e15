use std::f64::consts::PI;

use nalgebra::{Quaternion, UnitQuaternion, Vector3};

use crate::vehicle::{BodyAxes, ControlDemand, VesselPose};

// ---------------------------------------------------------------------------
// Rigid test vessel: scripted attitude, drifting centre of mass
// ---------------------------------------------------------------------------

/// Kinematic stand-in for a host vehicle.
///
/// Body frame: +Z is the long (roll) axis, +X right (pitch), +Y forward (yaw).
#[derive(Debug, Clone)]
pub struct RigidVessel {
    pub position: Vector3<f64>,           // m, world
    pub attitude: UnitQuaternion<f64>,    // body→world
    pub omega: Vector3<f64>,              // rad/s, body frame
    pub com_body: Vector3<f64>,           // m, centre of mass in body frame
    pub com_drift: Vector3<f64>,          // m/s, body frame (propellant burn)
    pub nozzle_body: Vector3<f64>,        // m, nozzle pivot in body frame
    pub nozzle_rest: UnitQuaternion<f64>, // nozzle rest rotation relative to body
    pub demand: ControlDemand,
}

impl RigidVessel {
    /// Upright vessel with the nozzle `nozzle_offset` metres below the centre
    /// of mass, exhaust pointing down the body axis.
    pub fn upright(nozzle_offset: f64) -> Self {
        Self {
            position: Vector3::zeros(),
            attitude: UnitQuaternion::identity(),
            omega: Vector3::zeros(),
            com_body: Vector3::zeros(),
            com_drift: Vector3::zeros(),
            nozzle_body: Vector3::new(0.0, 0.0, -nozzle_offset),
            nozzle_rest: UnitQuaternion::from_axis_angle(&Vector3::x_axis(), PI),
            demand: ControlDemand::default(),
        }
    }

    /// Advance attitude and centre of mass by `dt`.
    pub fn advance(&mut self, dt: f64) {
        // q_new = normalize(q + 0.5 * q * omega_quat * dt)
        let omega_quat = Quaternion::new(0.0, self.omega.x, self.omega.y, self.omega.z);
        let dq = self.attitude.quaternion() * omega_quat * 0.5;
        self.attitude = UnitQuaternion::new_normalize(self.attitude.quaternion() + dq * dt);
        self.com_body += self.com_drift * dt;
    }
}

impl VesselPose for RigidVessel {
    fn center_of_mass(&self) -> Vector3<f64> {
        self.position + self.attitude * self.com_body
    }

    fn body_axes(&self) -> BodyAxes {
        BodyAxes::from_attitude(&self.attitude)
    }

    fn control_demand(&self) -> ControlDemand {
        self.demand
    }

    fn nozzle_position(&self) -> Vector3<f64> {
        self.position + self.attitude * self.nozzle_body
    }

    fn parent_rotation(&self) -> UnitQuaternion<f64> {
        self.attitude
    }

    fn nozzle_rest_rotation(&self) -> UnitQuaternion<f64> {
        self.nozzle_rest
    }
}
