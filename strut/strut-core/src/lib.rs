//! Compression-spring actuator force model with a minimal rigid-body
//! substrate.
//!
//! This crate implements the force law for compression-only,
//! optionally-directional, optionally-free-ended spring actuators of the
//! kind used as telescoping struts in tensegrity robots, plus the small
//! amount of world machinery needed to host them.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         World                               │
//! │  Owns: bodies, springs, configuration, clock                │
//! │  Per tick: springs step in order, then integration          │
//! └─────────────────────────┬───────────────────────────────────┘
//!                           │ step(dt, bodies)
//!                           ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   CompressionSpring                         │
//! │  MeasurementAxis → effective length → force + damping       │
//! │  → equal-and-opposite impulses to the two end bodies        │
//! └─────────────────────────┬───────────────────────────────────┘
//!                           │ apply_impulse_at_point
//!                           ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                          Body                               │
//! │  Impulses land immediately on linear/angular velocity       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```
//! use strut_core::{Anchor, CompressionSpring, SpringProperties, World};
//! use strut_types::{MassProperties, Pose, RigidBodyState, SimulationConfig};
//! use nalgebra::Point3;
//!
//! let mut world = World::new(SimulationConfig::zero_gravity());
//!
//! // Two free bodies with a compressed spring between them.
//! let a = world.add_body(
//!     RigidBodyState::at_rest(Pose::from_position(Point3::origin())),
//!     MassProperties::sphere(1.0, 0.05),
//! );
//! let b = world.add_body(
//!     RigidBodyState::at_rest(Pose::from_position(Point3::new(0.7, 0.0, 0.0))),
//!     MassProperties::sphere(1.0, 0.05),
//! );
//!
//! let spring = CompressionSpring::new(
//!     vec![Anchor::at_origin(a), Anchor::at_origin(b)],
//!     SpringProperties::new(200.0, 1.0).with_damping(2.0),
//! )?;
//! let spring_id = world.add_spring(spring);
//!
//! world.run_for(0.05)?;
//!
//! // The spring pushed the bodies apart and is relaxing toward rest.
//! let length = world
//!     .spring(spring_id)
//!     .unwrap()
//!     .current_spring_length(world.bodies())?;
//! assert!(length > 0.7);
//! # Ok::<(), strut_types::StrutError>(())
//! ```
//!
//! # Failure Model
//!
//! Bad arguments (non-positive timestep, invalid configuration) are
//! rejected before any state changes. A directional spring compressed to a
//! non-positive length is a fatal, deliberately unclamped condition: the
//! step reports [`StrutError::DegenerateLength`](strut_types::StrutError)
//! and [`World::step`] halts the run. See `strut_types::StrutError` for the
//! full taxonomy.

#![doc(html_root_url = "https://docs.rs/strut-core/0.1.0")]
#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
#![allow(
    clippy::missing_const_for_fn,     // Many methods can't be const due to nalgebra
    clippy::suboptimal_flops,          // mul_add style changes aren't always clearer
    clippy::module_name_repetitions,   // SpringProperties lives in spring, etc.
    clippy::missing_errors_doc,        // Error docs added where non-obvious
    clippy::cast_precision_loss,       // usize to f64 is fine for counts
    clippy::cast_possible_truncation,  // tick counts fit comfortably
    clippy::cast_sign_loss,            // durations validated non-negative first
)]

pub mod actuator;
pub mod anchor;
pub mod spring;
pub mod world;

pub use actuator::{CompressionSpring, MeasurementAxis};
pub use anchor::Anchor;
pub use spring::SpringProperties;
pub use world::{Body, BodyMap, SpringId, World};

// Re-export key types from strut-types for convenience
pub use strut_types::{
    BodyId, MassProperties, Pose, Result, RigidBodyState, SimulationConfig, StrutError, Twist,
};
