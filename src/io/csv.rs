use std::io::{self, Write};

use crate::gnc::GimbalState;
use crate::sim::TickRecord;

/// Write a tick trace to CSV format.
///
/// Columns: time, locked, pitch, yaw, roll,
///          quat_w, quat_x, quat_y, quat_z,
///          neutral_x, neutral_y, neutral_z,
///          clipped_x, clipped_y, clipped_z, deflection_deg
pub fn write_trace<W: Write>(writer: &mut W, records: &[TickRecord]) -> io::Result<()> {
    writeln!(
        writer,
        "time,locked,pitch,yaw,roll,\
         quat_w,quat_x,quat_y,quat_z,\
         neutral_x,neutral_y,neutral_z,\
         clipped_x,clipped_y,clipped_z,deflection_deg"
    )?;

    for r in records {
        let q = r.orientation.quaternion();
        writeln!(
            writer,
            "{:.4},{},{:.4},{:.4},{:.4},\
             {:.6},{:.6},{:.6},{:.6},\
             {:.6},{:.6},{:.6},\
             {:.6},{:.6},{:.6},{:.4}",
            r.time,
            u8::from(r.state == GimbalState::Locked),
            r.demand.pitch, r.demand.yaw, r.demand.roll,
            q.w, q.i, q.j, q.k,
            r.neutral.x, r.neutral.y, r.neutral.z,
            r.clipped.x, r.clipped.y, r.clipped.z,
            r.deflection_deg,
        )?;
    }

    Ok(())
}

/// Write a tick trace to a CSV file at the given path.
pub fn write_trace_file(path: &str, records: &[TickRecord]) -> io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    write_trace(&mut file, records)
}
