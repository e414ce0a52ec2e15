pub mod resolver;
pub mod gimbal;

pub use resolver::{resolve_axis, resolve_demand, torque_direction, AxisContributions, ControlAxis};
pub use gimbal::{GimbalController, GimbalState, Mix, TickReport};
