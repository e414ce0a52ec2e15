#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{GimbalError, GimbalResult};

/// Default pivot transform name.
pub const DEFAULT_TRANSFORM_NAME: &str = "nozzle_pivot";

// ---------------------------------------------------------------------------
// Gimbal configuration (load-time, immutable once a controller owns it)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GimbalConfig {
    pub gimbal_range: f64,         // deg, cone half-angle around neutral
    pub transform_name: String,    // pivot transform identifier on the host
    pub clamp_inputs: bool,        // clamp each demand axis to [-1, 1]
    pub start_locked: bool,
}

impl Default for GimbalConfig {
    fn default() -> Self {
        Self {
            gimbal_range: 1.0,
            transform_name: DEFAULT_TRANSFORM_NAME.into(),
            clamp_inputs: false,
            start_locked: false,
        }
    }
}

impl GimbalConfig {
    pub fn validate(&self) -> GimbalResult<()> {
        if !self.gimbal_range.is_finite() {
            return Err(GimbalError::NonFiniteRange(self.gimbal_range));
        }
        if !(0.0..=180.0).contains(&self.gimbal_range) {
            return Err(GimbalError::RangeOutOfBounds(self.gimbal_range));
        }
        if self.transform_name.trim().is_empty() {
            return Err(GimbalError::EmptyTransformName);
        }
        Ok(())
    }

    /// Parse and validate a JSON configuration document. Missing fields take
    /// their defaults.
    #[cfg(feature = "serde")]
    pub fn from_json(text: &str) -> GimbalResult<Self> {
        let config: GimbalConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }
}

// ---------------------------------------------------------------------------
// Config builder
// ---------------------------------------------------------------------------

pub struct GimbalConfigBuilder {
    gimbal_range: f64,
    transform_name: String,
    clamp_inputs: bool,
    start_locked: bool,
}

impl GimbalConfigBuilder {
    pub fn new(transform_name: impl Into<String>) -> Self {
        Self {
            transform_name: transform_name.into(),
            ..Self::from(GimbalConfig::default())
        }
    }

    pub fn gimbal_range(mut self, deg: f64) -> Self { self.gimbal_range = deg; self }
    pub fn clamp_inputs(mut self, v: bool) -> Self { self.clamp_inputs = v; self }
    pub fn start_locked(mut self, v: bool) -> Self { self.start_locked = v; self }

    pub fn build(self) -> GimbalResult<GimbalConfig> {
        let config = GimbalConfig {
            gimbal_range: self.gimbal_range,
            transform_name: self.transform_name,
            clamp_inputs: self.clamp_inputs,
            start_locked: self.start_locked,
        };
        config.validate()?;
        Ok(config)
    }
}

impl From<GimbalConfig> for GimbalConfigBuilder {
    fn from(c: GimbalConfig) -> Self {
        Self {
            gimbal_range: c.gimbal_range,
            transform_name: c.transform_name,
            clamp_inputs: c.clamp_inputs,
            start_locked: c.start_locked,
        }
    }
}

// ---------------------------------------------------------------------------
// Preset configurations
// ---------------------------------------------------------------------------

pub mod presets {
    use super::*;

    /// Small liquid engine with a narrow 1 deg gimbal.
    pub fn vernier() -> GimbalConfig {
        GimbalConfig::default()
    }

    /// Booster engine with a 5 deg gimbal.
    pub fn booster() -> GimbalConfig {
        GimbalConfig {
            gimbal_range: 5.0,
            ..GimbalConfig::default()
        }
    }
}
