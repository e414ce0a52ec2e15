use nalgebra::Vector3;

use crate::gnc::GimbalState;
use crate::vehicle::ControlDemand;
use super::runner::TickRecord;

// ---------------------------------------------------------------------------
// Scripted commands
// ---------------------------------------------------------------------------

/// External input applied to the vessel or controller at a given time.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandKind {
    SetDemand(ControlDemand),
    SetAngularRate(Vector3<f64>),
    Lock,
    Free,
    Toggle,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScriptEvent {
    pub time: f64,
    pub kind: CommandKind,
}

impl ScriptEvent {
    pub fn new(time: f64, kind: CommandKind) -> Self {
        Self { time, kind }
    }
}

// ---------------------------------------------------------------------------
// Detected events
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    Saturated,
    Unsaturated,
    Locked,
    Freed,
}

/// A discrete event observed in the tick trace.
#[derive(Debug, Clone)]
pub struct SimEvent {
    pub time: f64,
    pub kind: EventKind,
}

/// Trait for passive event detectors.
/// Implementations inspect consecutive tick records and report events.
pub trait EventDetector {
    fn check(&mut self, prev: &TickRecord, current: &TickRecord) -> Option<EventKind>;
}

/// Reports when the nozzle reaches or leaves the cone boundary.
pub struct SaturationDetector {
    pub range_deg: f64,
    pub tol_deg: f64,
}

impl SaturationDetector {
    pub fn new(range_deg: f64) -> Self {
        Self { range_deg, tol_deg: 1e-6 }
    }

    fn saturated(&self, r: &TickRecord) -> bool {
        r.deflection_deg >= self.range_deg - self.tol_deg
    }
}

impl EventDetector for SaturationDetector {
    fn check(&mut self, prev: &TickRecord, current: &TickRecord) -> Option<EventKind> {
        match (self.saturated(prev), self.saturated(current)) {
            (false, true) => Some(EventKind::Saturated),
            (true, false) => Some(EventKind::Unsaturated),
            _ => None,
        }
    }
}

/// Reports lock state transitions.
pub struct LockDetector;

impl EventDetector for LockDetector {
    fn check(&mut self, prev: &TickRecord, current: &TickRecord) -> Option<EventKind> {
        match (prev.state, current.state) {
            (GimbalState::Active, GimbalState::Locked) => Some(EventKind::Locked),
            (GimbalState::Locked, GimbalState::Active) => Some(EventKind::Freed),
            _ => None,
        }
    }
}

/// Run `detectors` over every consecutive pair of records.
pub fn detect_events(records: &[TickRecord], detectors: &mut [&mut dyn EventDetector]) -> Vec<SimEvent> {
    let mut events = Vec::new();
    for pair in records.windows(2) {
        for det in detectors.iter_mut() {
            if let Some(kind) = det.check(&pair[0], &pair[1]) {
                events.push(SimEvent { time: pair[1].time, kind });
            }
        }
    }
    events
}
