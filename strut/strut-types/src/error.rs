//! Error types for strut simulation.

use crate::BodyId;
use thiserror::Error;

/// Errors surfaced by actuator construction, stepping, and the substrate.
///
/// The variants separate three failure classes so hosts can react
/// differently to each:
///
/// - bad input (`InvalidTimestep`, `InvalidConfig`): rejected before any
///   state change, the caller can fix the argument and retry;
/// - broken wiring (`UnknownBody`): an anchor references a body the
///   substrate does not hold, a configuration fault;
/// - physically degenerate trajectory (`DegenerateLength`): the model left
///   its valid operating region and the run should stop.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StrutError {
    /// Timestep must be positive and finite.
    #[error("invalid timestep: {0} (must be positive and finite)")]
    InvalidTimestep(f64),

    /// An anchor referenced a body the substrate does not know.
    #[error("unknown body: {0}")]
    UnknownBody(BodyId),

    /// Configuration rejected at construction or validation time.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// Human-readable description of what was rejected.
        reason: String,
    },

    /// A directional spring was compressed to a non-positive length.
    ///
    /// This is a modeling-limits signal, not a transient fault: the
    /// stiffness/timestep combination allowed the spring to pass through
    /// itself. It is never clamped or retried.
    #[error("spring length {length} is not positive; increase stiffness or reduce the timestep")]
    DegenerateLength {
        /// The offending (zero or negative) spring length.
        length: f64,
    },
}

impl StrutError {
    /// Create an invalid-configuration error.
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }

    /// Create a degenerate-length error.
    #[must_use]
    pub fn degenerate_length(length: f64) -> Self {
        Self::DegenerateLength { length }
    }

    /// Whether this error should terminate the simulation run.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::DegenerateLength { .. })
    }

    /// Whether this error was caused by rejected configuration or arguments.
    #[must_use]
    pub fn is_config_error(&self) -> bool {
        matches!(self, Self::InvalidConfig { .. } | Self::InvalidTimestep(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StrutError::InvalidTimestep(-0.01);
        assert!(err.to_string().contains("-0.01"));
        assert!(err.to_string().contains("positive"));

        let err = StrutError::UnknownBody(BodyId::new(7));
        assert_eq!(err.to_string(), "unknown body: Body(7)");

        let err = StrutError::invalid_config("stiffness must be positive");
        assert!(err.to_string().contains("stiffness"));

        let err = StrutError::degenerate_length(-0.25);
        assert!(err.to_string().contains("-0.25"));
    }

    #[test]
    fn test_error_predicates() {
        assert!(StrutError::degenerate_length(0.0).is_fatal());
        assert!(!StrutError::degenerate_length(0.0).is_config_error());

        assert!(StrutError::InvalidTimestep(0.0).is_config_error());
        assert!(!StrutError::InvalidTimestep(0.0).is_fatal());

        assert!(StrutError::invalid_config("bad").is_config_error());
        assert!(!StrutError::UnknownBody(BodyId::new(0)).is_config_error());
    }
}
