pub mod cone;
pub mod look;

pub use cone::{angle_between, cone_clip, GimbalCone};
pub use look::look_rotation;
