//! Error types for gimbal configuration and host input.
//!
//! The per-tick mixing path never fails; these errors only arise where
//! configuration or host-supplied rest poses enter the crate.

use thiserror::Error;

/// Errors raised when building or loading a gimbal controller.
#[derive(Debug, Error)]
pub enum GimbalError {
    /// Gimbal range is NaN or infinite.
    #[error("gimbal range must be finite, got {0}")]
    NonFiniteRange(f64),

    /// Gimbal range outside the meaningful [0, 180] degree interval.
    #[error("gimbal range {0} deg outside [0, 180]")]
    RangeOutOfBounds(f64),

    /// No pivot transform name configured.
    #[error("gimbal transform name is empty")]
    EmptyTransformName,

    /// The host reported a rest rotation with non-finite components.
    #[error("nozzle rest rotation is not finite")]
    NonFiniteRestRotation,

    /// Simulation step is zero, negative or not finite.
    #[error("simulation time step must be finite and positive, got {0}")]
    InvalidTimeStep(f64),

    /// Simulation duration is negative or not finite.
    #[error("simulation duration must be finite and non-negative, got {0}")]
    InvalidDuration(f64),

    /// Configuration document could not be parsed.
    #[cfg(feature = "serde")]
    #[error("invalid gimbal configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Result type for gimbal configuration operations.
pub type GimbalResult<T> = Result<T, GimbalError>;
