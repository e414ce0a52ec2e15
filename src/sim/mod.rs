pub mod vessel;
pub mod runner;
pub mod event;

pub use runner::{simulate, simulate_with, SimConfig, TickRecord};
pub use vessel::RigidVessel;
pub use event::{CommandKind, ScriptEvent};
