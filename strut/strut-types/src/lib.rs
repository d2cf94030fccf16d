//! Core types for compression-strut actuator simulation.
//!
//! This crate provides the foundational types shared by the actuator force
//! law and the substrate that hosts it:
//!
//! - [`BodyId`] - Identity of a rigid body owned by the substrate
//! - [`Pose`], [`Twist`], [`RigidBodyState`] - Kinematic state
//! - [`MassProperties`] - Mass, center of mass, inertia tensor
//! - [`SimulationConfig`] - Timestep and gravity
//! - [`StrutError`] - Shared error taxonomy
//!
//! # Design Philosophy
//!
//! These types are **pure data**. They carry no physics, no integration, and
//! no force computation; that behavior lives in `strut-core`. Keeping them
//! separate means controllers, loggers, and analysis tools can speak the
//! same language as the simulation without depending on it.
//!
//! # Coordinate System
//!
//! - X: right
//! - Y: forward
//! - Z: up
//! - Right-handed
//!
//! # Example
//!
//! ```
//! use strut_types::{Pose, RigidBodyState, Twist};
//! use nalgebra::{Point3, Vector3};
//!
//! let state = RigidBodyState::new(
//!     Pose::from_position(Point3::new(0.0, 0.0, 1.0)),
//!     Twist::linear(Vector3::new(0.5, 0.0, 0.0)),
//! );
//!
//! assert_eq!(state.pose.position.z, 1.0);
//! assert!(state.is_finite());
//! ```

#![doc(html_root_url = "https://docs.rs/strut-types/0.1.0")]
#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
// Allow certain clippy lints that are overly pedantic for type definitions
#![allow(
    clippy::missing_const_for_fn,     // Many methods can't be const due to nalgebra
    clippy::suboptimal_flops,          // mul_add style changes aren't always clearer
    clippy::cast_precision_loss,       // usize to f64 is fine for counts
    clippy::missing_errors_doc,        // Error docs added where non-obvious
)]

mod body;
mod config;
mod error;

pub use body::{BodyId, MassProperties, Pose, RigidBodyState, Twist};
pub use config::SimulationConfig;
pub use error::StrutError;

// Re-export math types for convenience
pub use nalgebra::{Isometry3, Matrix3, Point3, Unit, UnitQuaternion, Vector3};

/// Result type for simulation operations.
pub type Result<T> = std::result::Result<T, StrutError>;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_state_construction() {
        let pose = Pose::from_position(Point3::new(1.0, 2.0, 3.0));
        let state = RigidBodyState::at_rest(pose);

        assert_eq!(state.pose.position.x, 1.0);
        assert_eq!(state.twist.linear.norm(), 0.0);
    }

    #[test]
    fn test_error_propagation_through_result() {
        fn needs_positive_timestep(dt: f64) -> Result<f64> {
            SimulationConfig::new(dt).validate()?;
            Ok(1.0 / dt)
        }

        assert!(needs_positive_timestep(1.0 / 240.0).is_ok());
        assert_eq!(
            needs_positive_timestep(0.0),
            Err(StrutError::InvalidTimestep(0.0))
        );
    }
}
