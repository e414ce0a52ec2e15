use nalgebra::{UnitQuaternion, Vector3};
use tracing::debug;

use crate::error::{GimbalError, GimbalResult};
use crate::gnc::{GimbalController, GimbalState};
use crate::math::angle_between;
use crate::vehicle::{ControlDemand, GimbalConfig};
use super::event::{CommandKind, ScriptEvent};
use super::vessel::RigidVessel;

// ---------------------------------------------------------------------------
// Simulation config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct SimConfig {
    pub dt: f64,
    pub max_time: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            dt: 0.02,        // 50 Hz fixed physics step
            max_time: 10.0,
        }
    }
}

impl SimConfig {
    pub fn validate(&self) -> GimbalResult<()> {
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(GimbalError::InvalidTimeStep(self.dt));
        }
        if !(self.max_time.is_finite() && self.max_time >= 0.0) {
            return Err(GimbalError::InvalidDuration(self.max_time));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tick trace
// ---------------------------------------------------------------------------

/// Snapshot of one tick.
#[derive(Debug, Clone)]
pub struct TickRecord {
    pub time: f64,
    pub state: GimbalState,
    pub demand: ControlDemand,
    pub orientation: UnitQuaternion<f64>,  // world
    pub neutral: Vector3<f64>,             // world, last computed
    pub clipped: Vector3<f64>,             // zero while locked
    pub deflection_deg: f64,
}

fn apply(cmd: &CommandKind, controller: &mut GimbalController, vessel: &mut RigidVessel) {
    match cmd {
        CommandKind::SetDemand(d) => vessel.demand = *d,
        CommandKind::SetAngularRate(w) => vessel.omega = *w,
        CommandKind::Lock => controller.lock(),
        CommandKind::Free => controller.free(),
        CommandKind::Toggle => controller.toggle(),
    }
}

// ---------------------------------------------------------------------------
// Scripted run
// ---------------------------------------------------------------------------

/// Drive `controller` against `vessel` for `config.max_time`, applying
/// `script` commands once their time is reached. Returns one record per tick.
pub fn simulate_with(
    controller: &mut GimbalController,
    vessel: &mut RigidVessel,
    script: &[ScriptEvent],
    config: &SimConfig,
) -> GimbalResult<Vec<TickRecord>> {
    config.validate()?;

    let mut script: Vec<&ScriptEvent> = script.iter().collect();
    script.sort_by(|a, b| a.time.total_cmp(&b.time));

    let steps = (config.max_time / config.dt).round() as usize;
    let mut records = Vec::with_capacity(steps.min(200_000));
    let mut next = 0;

    for i in 0..steps {
        let time = i as f64 * config.dt;

        while next < script.len() && script[next].time <= time + config.dt * 1e-6 {
            apply(&script[next].kind, controller, vessel);
            next += 1;
        }

        let report = controller.tick(&*vessel);
        let (clipped, deflection_deg) = match report.mix {
            Some(mix) => (mix.clipped, mix.deflection_deg),
            None => (
                Vector3::zeros(),
                angle_between(&controller.neutral(), &(report.orientation * Vector3::z()))
                    .to_degrees(),
            ),
        };

        records.push(TickRecord {
            time,
            state: report.state,
            demand: vessel.demand,
            orientation: report.orientation,
            neutral: controller.neutral(),
            clipped,
            deflection_deg,
        });

        vessel.advance(config.dt);
    }

    debug!(ticks = records.len(), "scripted run finished");
    Ok(records)
}

/// Build a controller from `gimbal`, start it on `vessel` and run the script.
pub fn simulate(
    gimbal: GimbalConfig,
    mut vessel: RigidVessel,
    script: &[ScriptEvent],
    config: &SimConfig,
) -> GimbalResult<Vec<TickRecord>> {
    let mut controller = GimbalController::start(gimbal, &vessel)?;
    simulate_with(&mut controller, &mut vessel, script, config)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
