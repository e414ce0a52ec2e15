use nalgebra::{UnitQuaternion, Vector3};
use tracing::{debug, trace, warn};

use crate::error::{GimbalError, GimbalResult};
use crate::math::{angle_between, look_rotation, GimbalCone};
use crate::vehicle::{ControlDemand, GimbalConfig, VesselPose};
use super::resolver::{resolve_demand, AxisContributions};

// ---------------------------------------------------------------------------
// Gimbal controller: per-nozzle tick driver
// ---------------------------------------------------------------------------

/// Below this squared length the combined request has no direction.
const MIN_CLIPPED_NORM_SQ: f64 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GimbalState {
    Active,
    Locked,
}

/// Intermediate geometry of one active tick.
#[derive(Debug, Clone, Copy)]
pub struct Mix {
    pub neutral: Vector3<f64>,
    pub lever_arm: Vector3<f64>,
    pub demand: ControlDemand,
    pub contributions: AxisContributions,
    pub combined: Vector3<f64>,
    pub clipped: Vector3<f64>,
    pub deflection_deg: f64,   // final nozzle axis vs neutral
}

/// What one call to [`GimbalController::tick`] did.
#[derive(Debug, Clone, Copy)]
pub struct TickReport {
    pub state: GimbalState,
    pub orientation: UnitQuaternion<f64>,
    pub mix: Option<Mix>,   // None while locked
}

/// Owns the state of one gimbaled nozzle: the cached rest rotation, the
/// lock flag and the current world orientation.
///
/// The nozzle's thrust axis is its local +Z.
#[derive(Debug, Clone)]
pub struct GimbalController {
    config: GimbalConfig,
    cone: GimbalCone,
    rest_rotation: UnitQuaternion<f64>,   // nozzle relative to parent
    state: GimbalState,
    orientation: UnitQuaternion<f64>,     // world
    neutral: Vector3<f64>,                // world, as of the last active tick
}

impl GimbalController {
    /// Build a controller from a validated config and the nozzle's rest
    /// rotation relative to its parent. The parent is assumed at identity
    /// until the first tick.
    pub fn new(config: GimbalConfig, rest_rotation: UnitQuaternion<f64>) -> GimbalResult<Self> {
        config.validate()?;
        if !rest_rotation.coords.iter().all(|c| c.is_finite()) {
            return Err(GimbalError::NonFiniteRestRotation);
        }
        let state = if config.start_locked { GimbalState::Locked } else { GimbalState::Active };
        Ok(Self {
            cone: GimbalCone::new(config.gimbal_range),
            config,
            rest_rotation,
            state,
            orientation: rest_rotation,
            neutral: rest_rotation * Vector3::z(),
        })
    }

    /// Cache the host's rest rotation and centre the nozzle in the host's
    /// current attitude.
    pub fn start<P: VesselPose + ?Sized>(config: GimbalConfig, pose: &P) -> GimbalResult<Self> {
        let mut controller = Self::new(config, pose.nozzle_rest_rotation())?;
        let neutral_rotation = pose.parent_rotation() * controller.rest_rotation;
        controller.orientation = neutral_rotation;
        controller.neutral = neutral_rotation * Vector3::z();
        debug!(
            transform = %controller.config.transform_name,
            range_deg = controller.config.gimbal_range,
            locked = controller.is_locked(),
            "gimbal controller started"
        );
        Ok(controller)
    }

    pub fn config(&self) -> &GimbalConfig { &self.config }
    pub fn cone(&self) -> &GimbalCone { &self.cone }
    pub fn state(&self) -> GimbalState { self.state }
    pub fn is_locked(&self) -> bool { self.state == GimbalState::Locked }
    pub fn orientation(&self) -> UnitQuaternion<f64> { self.orientation }
    pub fn neutral(&self) -> Vector3<f64> { self.neutral }
    pub fn rest_rotation(&self) -> UnitQuaternion<f64> { self.rest_rotation }

    pub fn lock(&mut self) {
        self.set_state(GimbalState::Locked);
    }

    pub fn free(&mut self) {
        self.set_state(GimbalState::Active);
    }

    pub fn toggle(&mut self) {
        let next = match self.state {
            GimbalState::Active => GimbalState::Locked,
            GimbalState::Locked => GimbalState::Active,
        };
        self.set_state(next);
    }

    fn set_state(&mut self, next: GimbalState) {
        if self.state != next {
            debug!(transform = %self.config.transform_name, from = ?self.state, to = ?next, "gimbal state change");
            self.state = next;
        }
    }

    /// Run the mixer for one physics tick.
    pub fn tick<P: VesselPose + ?Sized>(&mut self, pose: &P) -> TickReport {
        if self.is_locked() {
            return TickReport {
                state: GimbalState::Locked,
                orientation: self.orientation,
                mix: None,
            };
        }

        // Centre relative to the vehicle, not to the world.
        let neutral_rotation = pose.parent_rotation() * self.rest_rotation;
        self.orientation = neutral_rotation;
        let neutral = neutral_rotation * Vector3::z();
        self.neutral = neutral;

        let lever_arm = pose.nozzle_position() - pose.center_of_mass();

        let raw = pose.control_demand();
        let demand = if self.config.clamp_inputs { raw.clamped() } else { raw };
        if demand != raw {
            debug!(?raw, ?demand, "control demand clamped");
        }

        let contributions = resolve_demand(&lever_arm, &pose.body_axes(), &neutral, &demand, &self.cone);
        let combined = contributions.combined();
        let clipped = self.cone.clip(&neutral, &combined, 1.0);

        if !clipped.iter().all(|c| c.is_finite()) {
            warn!(?lever_arm, ?demand, "non-finite gimbal request, holding neutral");
        } else if clipped.norm_squared() > MIN_CLIPPED_NORM_SQ {
            let up_hint = swung_up_hint(&neutral_rotation, &neutral, &clipped);
            if let Some(q) = look_rotation(&clipped, &up_hint) {
                self.orientation = q;
            }
        }

        let deflection_deg = angle_between(&neutral, &(self.orientation * Vector3::z())).to_degrees();
        trace!(deflection_deg, "gimbal tick");

        TickReport {
            state: GimbalState::Active,
            orientation: self.orientation,
            mix: Some(Mix {
                neutral,
                lever_arm,
                demand,
                contributions,
                combined,
                clipped,
                deflection_deg,
            }),
        }
    }
}

/// The neutral pose's +Y carried along the shortest arc from `neutral` to
/// `target`. It stays perpendicular to `target` at any deflection, so the
/// nozzle never rolls about its own axis as it swings.
fn swung_up_hint(
    neutral_rotation: &UnitQuaternion<f64>,
    neutral: &Vector3<f64>,
    target: &Vector3<f64>,
) -> Vector3<f64> {
    let up = neutral_rotation * Vector3::y();
    match UnitQuaternion::rotation_between(neutral, target) {
        Some(swing) => swing * up,
        None => up,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vehicle::{BodyAxes, GimbalConfigBuilder};
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    /// Upright vehicle, CoM at origin, nozzle 2 m below pointing down.
    struct Fixed {
        attitude: UnitQuaternion<f64>,
        demand: ControlDemand,
        nozzle: Vector3<f64>,
    }

    impl Fixed {
        fn new(demand: ControlDemand) -> Self {
            Self {
                attitude: UnitQuaternion::identity(),
                demand,
                nozzle: Vector3::new(0.0, 0.0, -2.0),
            }
        }
    }

    impl VesselPose for Fixed {
        fn center_of_mass(&self) -> Vector3<f64> { Vector3::zeros() }
        fn body_axes(&self) -> BodyAxes { BodyAxes::from_attitude(&self.attitude) }
        fn control_demand(&self) -> ControlDemand { self.demand }
        fn nozzle_position(&self) -> Vector3<f64> { self.attitude * self.nozzle }
        fn parent_rotation(&self) -> UnitQuaternion<f64> { self.attitude }
        fn nozzle_rest_rotation(&self) -> UnitQuaternion<f64> {
            UnitQuaternion::from_axis_angle(&Vector3::x_axis(), PI)
        }
    }

    fn config(range: f64) -> GimbalConfig {
        GimbalConfigBuilder::new("pivot").gimbal_range(range).build().unwrap()
    }

    fn thrust_axis(c: &GimbalController) -> Vector3<f64> {
        c.orientation() * Vector3::z()
    }

    #[test]
    fn starts_centred_and_active() {
        let pose = Fixed::new(ControlDemand::default());
        let c = GimbalController::start(config(5.0), &pose).unwrap();
        assert_eq!(c.state(), GimbalState::Active);
        assert_relative_eq!(thrust_axis(&c), -Vector3::z(), epsilon = 1e-12);
    }

    #[test]
    fn start_locked_from_config() {
        let pose = Fixed::new(ControlDemand::default());
        let cfg = GimbalConfigBuilder::new("pivot").start_locked(true).build().unwrap();
        let c = GimbalController::start(cfg, &pose).unwrap();
        assert!(c.is_locked());
    }

    #[test]
    fn rejects_invalid_config() {
        let cfg = GimbalConfig { gimbal_range: -2.0, ..GimbalConfig::default() };
        assert!(GimbalController::new(cfg, UnitQuaternion::identity()).is_err());
    }

    #[test]
    fn zero_demand_holds_neutral() {
        let pose = Fixed::new(ControlDemand::default());
        let mut c = GimbalController::start(config(5.0), &pose).unwrap();
        for _ in 0..5 {
            let report = c.tick(&pose);
            let mix = report.mix.unwrap();
            assert_eq!(mix.combined, Vector3::zeros());
            assert_eq!(report.orientation, pose.parent_rotation() * pose.nozzle_rest_rotation());
        }
    }

    #[test]
    fn full_pitch_deflects_to_range() {
        let pose = Fixed::new(ControlDemand::pitch(1.0));
        let mut c = GimbalController::start(config(5.0), &pose).unwrap();
        let mix = c.tick(&pose).mix.unwrap();
        assert_relative_eq!(mix.deflection_deg, 5.0, epsilon = 1e-9);
        assert_relative_eq!(thrust_axis(&c), mix.clipped.normalize(), epsilon = 1e-12);
    }

    #[test]
    fn combined_axes_sum_orthogonal_edges() {
        // pitch and yaw each reach the cone edge in orthogonal planes; their
        // equal-length sum sits inside the cone
        let pose = Fixed::new(ControlDemand::new(1.0, 1.0, 0.0));
        let mut c = GimbalController::start(config(5.0), &pose).unwrap();
        let mix = c.tick(&pose).mix.unwrap();
        let expected = (5f64.to_radians().tan() / 2f64.sqrt()).atan().to_degrees();
        assert_relative_eq!(mix.deflection_deg, expected, epsilon = 1e-9);
        assert_eq!(mix.clipped, mix.combined);
    }

    #[test]
    fn overdriven_axes_saturate_at_range() {
        let pose = Fixed::new(ControlDemand::new(2.0, 2.0, 0.0));
        let mut c = GimbalController::start(config(5.0), &pose).unwrap();
        let mix = c.tick(&pose).mix.unwrap();
        assert!(GimbalCone::deflection_deg(&mix.neutral, &mix.combined) > 5.0);
        assert_relative_eq!(mix.deflection_deg, 5.0, epsilon = 1e-9);
    }

    #[test]
    fn wide_cone_keeps_hinge_axis() {
        // 90 deg pitch swings the thrust axis onto the neutral pose's +Y
        let pose = Fixed::new(ControlDemand::pitch(1.0));
        let mut c = GimbalController::start(config(90.0), &pose).unwrap();
        let neutral_rotation = pose.parent_rotation() * pose.nozzle_rest_rotation();
        let mix = c.tick(&pose).mix.unwrap();
        assert_relative_eq!(mix.deflection_deg, 90.0, epsilon = 1e-9);
        assert_relative_eq!(thrust_axis(&c), Vector3::y(), epsilon = 1e-9);
        // pitch hinges about body +X; the nozzle must not roll about its axis
        assert_relative_eq!(
            c.orientation() * Vector3::x(),
            neutral_rotation * Vector3::x(),
            epsilon = 1e-9
        );

        // nearly full pitch gives a nearly identical pose
        let near = Fixed::new(ControlDemand::pitch(0.999));
        let mut c2 = GimbalController::start(config(90.0), &near).unwrap();
        c2.tick(&near);
        assert!(c2.orientation().angle_to(&c.orientation()) < 1e-2);
    }

    #[test]
    fn non_finite_host_input_holds_neutral() {
        let mut pose = Fixed::new(ControlDemand::pitch(1.0));
        let mut c = GimbalController::start(config(5.0), &pose).unwrap();
        pose.nozzle = Vector3::new(f64::NAN, 0.0, -2.0);
        let report = c.tick(&pose);
        let mix = report.mix.unwrap();
        assert!(!mix.clipped.iter().all(|v| v.is_finite()));
        assert_eq!(report.orientation, pose.parent_rotation() * pose.nozzle_rest_rotation());
        assert!(mix.deflection_deg.abs() < 1e-12);
    }

    #[test]
    fn lock_freezes_orientation() {
        let mut pose = Fixed::new(ControlDemand::new(0.7, -0.4, 0.0));
        let mut c = GimbalController::start(config(5.0), &pose).unwrap();
        c.tick(&pose);
        c.lock();
        let frozen = c.orientation();

        pose.demand = ControlDemand::new(-1.0, 1.0, 0.0);
        pose.attitude = UnitQuaternion::from_euler_angles(0.2, 0.1, 0.0);
        for _ in 0..10 {
            let report = c.tick(&pose);
            assert_eq!(report.state, GimbalState::Locked);
            assert!(report.mix.is_none());
            assert_eq!(report.orientation, frozen);
        }

        c.toggle();
        assert_eq!(c.state(), GimbalState::Active);
        c.tick(&pose);
        assert_ne!(c.orientation(), frozen);
    }

    #[test]
    fn lock_and_free_are_idempotent() {
        let pose = Fixed::new(ControlDemand::default());
        let mut c = GimbalController::start(config(5.0), &pose).unwrap();
        c.lock();
        c.lock();
        assert!(c.is_locked());
        c.free();
        c.free();
        assert!(!c.is_locked());
    }

    #[test]
    fn neutral_tracks_vehicle_attitude() {
        let mut pose = Fixed::new(ControlDemand::default());
        let mut c = GimbalController::start(config(5.0), &pose).unwrap();
        pose.attitude = UnitQuaternion::from_axis_angle(&Vector3::x_axis(), 0.5);
        c.tick(&pose);
        assert_relative_eq!(c.neutral(), pose.attitude * -Vector3::z(), epsilon = 1e-12);
        assert_relative_eq!(thrust_axis(&c), c.neutral(), epsilon = 1e-12);
    }

    #[test]
    fn nozzle_at_com_does_not_nan() {
        let mut pose = Fixed::new(ControlDemand::new(1.0, 1.0, 1.0));
        pose.nozzle = Vector3::zeros();
        let mut c = GimbalController::start(config(5.0), &pose).unwrap();
        let report = c.tick(&pose);
        assert!(report.orientation.coords.iter().all(|v| v.is_finite()));
        assert_relative_eq!(thrust_axis(&c), -Vector3::z(), epsilon = 1e-12);
    }

    #[test]
    fn clamp_inputs_limits_demand() {
        let pose = Fixed::new(ControlDemand::pitch(3.0));
        let cfg = GimbalConfigBuilder::new("pivot")
            .gimbal_range(5.0)
            .clamp_inputs(true)
            .build()
            .unwrap();
        let mut c = GimbalController::start(cfg, &pose).unwrap();
        let mix = c.tick(&pose).mix.unwrap();
        assert_eq!(mix.demand.pitch, 1.0);
        assert_relative_eq!(mix.deflection_deg, 5.0, epsilon = 1e-9);
    }
}
