use nalgebra::Vector3;

use gimbal_mixer::gnc::GimbalState;
use gimbal_mixer::io::{self, RunSummary};
use gimbal_mixer::sim::{self, CommandKind, RigidVessel, ScriptEvent, SimConfig};
use gimbal_mixer::vehicle::{presets, ControlDemand};

fn main() {
    // -----------------------------------------------------------------------
    // Vehicle: booster with a 5 deg gimbal, nozzle 2 m aft of the CoM
    // -----------------------------------------------------------------------
    let gimbal = presets::booster();
    let range = gimbal.gimbal_range;

    let mut vessel = RigidVessel::upright(2.0);
    vessel.nozzle_body.x = 0.3; // small radial offset gives roll authority
    vessel.com_drift = Vector3::new(0.0, 0.0, 0.02); // CoM creeps forward as propellant burns

    let script = [
        ScriptEvent::new(1.0, CommandKind::SetDemand(ControlDemand::pitch(0.5))),
        ScriptEvent::new(2.0, CommandKind::SetDemand(ControlDemand::pitch(1.0))),
        ScriptEvent::new(3.0, CommandKind::SetDemand(ControlDemand::new(1.0, 1.0, 0.0))),
        ScriptEvent::new(4.0, CommandKind::Lock),
        ScriptEvent::new(4.0, CommandKind::SetAngularRate(Vector3::new(0.2, 0.0, 0.0))),
        ScriptEvent::new(6.0, CommandKind::Free),
        ScriptEvent::new(6.0, CommandKind::SetAngularRate(Vector3::zeros())),
        ScriptEvent::new(7.0, CommandKind::SetDemand(ControlDemand::roll(-1.0))),
        ScriptEvent::new(8.0, CommandKind::SetDemand(ControlDemand::default())),
    ];

    let config = SimConfig { dt: 0.02, max_time: 9.0 };

    // -----------------------------------------------------------------------
    // Run
    // -----------------------------------------------------------------------
    let records = match sim::simulate(gimbal, vessel, &script, &config) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("gimbal setup failed: {e}");
            std::process::exit(1);
        }
    };
    let summary = RunSummary::from_records(&records, range);

    // -----------------------------------------------------------------------
    // Print results
    // -----------------------------------------------------------------------
    println!();
    println!("====================================================================");
    println!("  GIMBAL MIXER — scripted run, range {:.1} deg", range);
    println!("====================================================================");
    println!();
    println!("  {:>6}  {:>6}  {:>6}  {:>6}  {:>6}  {:>10}", "t (s)", "state", "pitch", "yaw", "roll", "defl (deg)");
    println!("  {}", "─".repeat(52));

    let sample_interval = (records.len() / 30).max(1);
    for (i, r) in records.iter().enumerate() {
        if i % sample_interval != 0 && i != records.len() - 1 {
            continue;
        }
        let state = match r.state {
            GimbalState::Active => "ACTIVE",
            GimbalState::Locked => "LOCKED",
        };
        println!(
            "  {:>6.2}  {:>6}  {:>6.2}  {:>6.2}  {:>6.2}  {:>10.3}",
            r.time, state, r.demand.pitch, r.demand.yaw, r.demand.roll, r.deflection_deg
        );
    }

    println!();
    println!("  Summary");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!("{summary}");
    println!("====================================================================");

    if let Some(path) = std::env::args().nth(1) {
        match io::write_trace_file(&path, &records) {
            Ok(()) => println!("  Trace written to {path}"),
            Err(e) => {
                eprintln!("could not write {path}: {e}");
                std::process::exit(1);
            }
        }
    }
    println!();
}
