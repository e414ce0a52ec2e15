use nalgebra::{UnitQuaternion, Vector3};

use gimbal_mixer::gnc::GimbalController;
use gimbal_mixer::vehicle::{BodyAxes, ControlDemand, GimbalConfigBuilder, VesselPose};

/// A host that knows nothing about the crate's simulation harness: a lander
/// hanging under a side-mounted engine, fed by a sinusoidal pitch command.
struct SideMountHost {
    attitude: UnitQuaternion<f64>,
    com: Vector3<f64>,
    demand: ControlDemand,
}

impl VesselPose for SideMountHost {
    fn center_of_mass(&self) -> Vector3<f64> {
        self.com
    }

    fn body_axes(&self) -> BodyAxes {
        BodyAxes::from_attitude(&self.attitude)
    }

    fn control_demand(&self) -> ControlDemand {
        self.demand
    }

    fn nozzle_position(&self) -> Vector3<f64> {
        // engine pod 1.2 m right of and 0.8 m below the body origin
        self.attitude * Vector3::new(1.2, 0.0, -0.8)
    }

    fn parent_rotation(&self) -> UnitQuaternion<f64> {
        self.attitude
    }

    fn nozzle_rest_rotation(&self) -> UnitQuaternion<f64> {
        // exhaust straight down the body axis
        UnitQuaternion::from_axis_angle(&Vector3::x_axis(), std::f64::consts::PI)
    }
}

fn main() {
    let mut host = SideMountHost {
        attitude: UnitQuaternion::identity(),
        com: Vector3::new(0.1, 0.0, 0.0),
        demand: ControlDemand::default(),
    };

    let config = match GimbalConfigBuilder::new("pod_gimbal").gimbal_range(8.0).build() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("bad config: {e}");
            return;
        }
    };
    let mut controller = match GimbalController::start(config, &host) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("start failed: {e}");
            return;
        }
    };

    println!("Driving {} with a pitch sweep...", controller.config().transform_name);
    for i in 0..=20 {
        let t = i as f64 * 0.1;
        host.demand = ControlDemand::new((t * 3.0).sin(), 0.0, 0.3);
        let report = controller.tick(&host);
        if let Some(mix) = report.mix {
            println!(
                "t={:>4.1}s  pitch={:>6.2}  deflection={:>6.3} deg",
                t, mix.demand.pitch, mix.deflection_deg
            );
        }
    }
}
