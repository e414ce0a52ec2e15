//! Attitude-control mixer for a gimbaled thrust nozzle.
//!
//! Each physics tick, [`gnc::GimbalController`] turns a pitch/yaw/roll
//! demand into a nozzle orientation that produces the requested torque
//! about the vehicle's centre of mass, without leaving the mechanical
//! gimbal cone. The host vehicle is reached through the read-only
//! [`vehicle::VesselPose`] trait.

pub mod error;
pub mod math;
pub mod vehicle;
mod gnc_mod;
pub mod sim;
pub mod io;

// The gnc module: expose gnc_mod as `gnc` publicly
pub mod gnc {
    pub use crate::gnc_mod::*;
}

pub use error::{GimbalError, GimbalResult};
pub use gnc::{GimbalController, GimbalState, TickReport};
pub use math::{cone_clip, GimbalCone};
pub use vehicle::{BodyAxes, ControlDemand, GimbalConfig, VesselPose};
