pub mod nozzle;
pub mod pose;

pub use nozzle::{GimbalConfig, GimbalConfigBuilder, presets};
pub use pose::{BodyAxes, ControlDemand, VesselPose};
