use std::fmt;

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::gnc::GimbalState;
use crate::sim::TickRecord;

/// Summary statistics computed from a tick trace.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct RunSummary {
    pub ticks: usize,
    pub duration_s: f64,
    pub peak_deflection_deg: f64,
    pub mean_deflection_deg: f64,   // over active ticks
    pub saturated_ticks: usize,
    pub locked_ticks: usize,
}

impl RunSummary {
    /// Compute summary from trace data; ticks within `1e-6` deg of
    /// `range_deg` count as saturated.
    pub fn from_records(records: &[TickRecord], range_deg: f64) -> Self {
        let active: Vec<&TickRecord> = records
            .iter()
            .filter(|r| r.state == GimbalState::Active)
            .collect();

        let peak_deflection_deg = active
            .iter()
            .map(|r| r.deflection_deg)
            .fold(0.0_f64, f64::max);

        let mean_deflection_deg = if active.is_empty() {
            0.0
        } else {
            active.iter().map(|r| r.deflection_deg).sum::<f64>() / active.len() as f64
        };

        let saturated_ticks = active
            .iter()
            .filter(|r| range_deg > 0.0 && r.deflection_deg >= range_deg - 1e-6)
            .count();

        RunSummary {
            ticks: records.len(),
            duration_s: records.last().map_or(0.0, |r| r.time),
            peak_deflection_deg,
            mean_deflection_deg,
            saturated_ticks,
            locked_ticks: records.len() - active.len(),
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  Ticks:           {:>8}       Duration:   {:>8.2} s", self.ticks, self.duration_s)?;
        writeln!(
            f,
            "  Peak deflection: {:>8.3} deg   Mean:       {:>8.3} deg",
            self.peak_deflection_deg, self.mean_deflection_deg
        )?;
        write!(
            f,
            "  Saturated ticks: {:>8}       Locked:     {:>8}",
            self.saturated_ticks, self.locked_ticks
        )
    }
}

/// Write the summary as pretty-printed JSON.
#[cfg(feature = "serde")]
pub fn write_summary_json<W: std::io::Write>(writer: W, summary: &RunSummary) -> serde_json::Result<()> {
    serde_json::to_writer_pretty(writer, summary)
}
