//! Simulation configuration.

use nalgebra::Vector3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Fixed-timestep simulation configuration.
///
/// The actuator force law estimates velocity by finite differences, so its
/// accuracy degrades with larger timesteps; 240 Hz is a reasonable default
/// for stiff springs. Stiffer springs need smaller steps.
///
/// # Example
///
/// ```
/// use strut_types::SimulationConfig;
///
/// let config = SimulationConfig::default().with_timestep(1.0 / 1000.0);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.frequency(), 1000.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SimulationConfig {
    /// Simulation timestep in seconds.
    pub timestep: f64,
    /// Gravitational acceleration in m/s² (world frame, Z up).
    pub gravity: Vector3<f64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            timestep: 1.0 / 240.0,
            gravity: Vector3::new(0.0, 0.0, -9.81),
        }
    }
}

impl SimulationConfig {
    /// Create a configuration with the given timestep and default gravity.
    #[must_use]
    pub fn new(timestep: f64) -> Self {
        Self {
            timestep,
            ..Self::default()
        }
    }

    /// High-fidelity preset: 1 kHz stepping.
    #[must_use]
    pub fn high_fidelity() -> Self {
        Self::new(1.0 / 1000.0)
    }

    /// Fast preset: 60 Hz stepping, suitable only for soft springs.
    #[must_use]
    pub fn fast() -> Self {
        Self::new(1.0 / 60.0)
    }

    /// Preset with gravity disabled, for isolated actuator experiments.
    #[must_use]
    pub fn zero_gravity() -> Self {
        Self::default().with_gravity(Vector3::zeros())
    }

    /// Set the timestep.
    #[must_use]
    pub fn with_timestep(mut self, timestep: f64) -> Self {
        self.timestep = timestep;
        self
    }

    /// Set the gravity vector.
    #[must_use]
    pub fn with_gravity(mut self, gravity: Vector3<f64>) -> Self {
        self.gravity = gravity;
        self
    }

    /// Stepping frequency in Hz.
    #[must_use]
    pub fn frequency(&self) -> f64 {
        1.0 / self.timestep
    }

    /// Validate the configuration.
    ///
    /// Rejects non-finite or non-positive timesteps and non-finite gravity.
    pub fn validate(&self) -> crate::Result<()> {
        if !self.timestep.is_finite() || self.timestep <= 0.0 {
            return Err(crate::StrutError::InvalidTimestep(self.timestep));
        }

        if !self.gravity.iter().all(|x| x.is_finite()) {
            return Err(crate::StrutError::invalid_config(
                "gravity must be finite",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_config() {
        let config = SimulationConfig::default();
        assert_relative_eq!(config.frequency(), 240.0, epsilon = 1e-9);
        assert_relative_eq!(config.gravity.z, -9.81, epsilon = 1e-12);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_presets() {
        assert_relative_eq!(
            SimulationConfig::high_fidelity().frequency(),
            1000.0,
            epsilon = 1e-9
        );
        assert_relative_eq!(SimulationConfig::fast().frequency(), 60.0, epsilon = 1e-9);
        assert_eq!(SimulationConfig::zero_gravity().gravity.norm(), 0.0);
    }

    #[test]
    fn test_validate_rejects_bad_timesteps() {
        assert!(SimulationConfig::new(0.0).validate().is_err());
        assert!(SimulationConfig::new(-1.0 / 240.0).validate().is_err());
        assert!(SimulationConfig::new(f64::NAN).validate().is_err());
        assert!(SimulationConfig::new(f64::INFINITY).validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_gravity() {
        let config = SimulationConfig::default().with_gravity(Vector3::new(0.0, 0.0, f64::NAN));
        assert!(config.validate().is_err());
    }
}
