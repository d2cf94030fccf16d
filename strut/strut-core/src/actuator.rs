//! The compression-spring actuator and its per-step force pipeline.
//!
//! Every tick the actuator measures the separation of its two end anchors,
//! turns it into an effective spring length, and pushes the resulting
//! impulse back into the bodies it connects:
//!
//! ```text
//! separation ──► effective length ──► elastic force
//!      │                │                  │
//!      │                └── finite-diff ───┤ damping
//!      │                    velocity       ▼
//!      └────── force direction ──────► impulse ±F·dt
//!                                      to both end bodies
//! ```
//!
//! The only difference between the two spring variants is how separation is
//! measured, captured by [`MeasurementAxis`]: the full 3D distance, or a
//! signed projection onto one fixed axis. Everything downstream (clamping,
//! force law, damping, impulse application) is shared.

use nalgebra::{Point3, Unit, Vector3};
use strut_types::{BodyId, Pose, Result, StrutError};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::anchor::Anchor;
use crate::spring::SpringProperties;
use crate::world::BodyMap;

/// How anchor separation is measured.
///
/// This is the single hook distinguishing an ordinary compression spring
/// from a directional one.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MeasurementAxis {
    /// Unsigned Euclidean distance between the two end anchors.
    Euclidean,
    /// Signed projection of the anchor separation onto a fixed unit axis.
    ///
    /// Lateral motion is invisible to the force law; only travel along the
    /// axis loads the spring. The projection goes negative when the second
    /// end passes behind the first.
    Directional(Unit<Vector3<f64>>),
}

impl MeasurementAxis {
    /// Create a directional axis from an arbitrary non-zero vector.
    ///
    /// The vector is normalized; a zero (or near-zero) vector is rejected.
    pub fn directional(direction: Vector3<f64>) -> Result<Self> {
        Unit::try_new(direction, 1e-10)
            .map(Self::Directional)
            .ok_or_else(|| StrutError::invalid_config("measurement direction must be non-zero"))
    }

    /// Whether this axis measures a signed projection.
    #[must_use]
    pub fn is_directional(&self) -> bool {
        matches!(self, Self::Directional(_))
    }

    /// Separation of `to` from `from` along this axis.
    #[must_use]
    pub fn measure(&self, from: &Point3<f64>, to: &Point3<f64>) -> f64 {
        let delta = to - from;
        match self {
            Self::Euclidean => delta.norm(),
            Self::Directional(axis) => axis.dot(&delta),
        }
    }

    /// Unit direction of force application, from the first end toward the
    /// second.
    ///
    /// Returns `None` when the ends coincide under the Euclidean axis and
    /// no direction exists. A directional axis is always defined.
    #[must_use]
    pub fn force_direction(
        &self,
        from: &Point3<f64>,
        to: &Point3<f64>,
    ) -> Option<Unit<Vector3<f64>>> {
        match self {
            Self::Euclidean => Unit::try_new(to - from, 1e-10),
            Self::Directional(axis) => Some(*axis),
        }
    }
}

/// A compression-only, optionally-directional, optionally-free-ended
/// spring actuator between anchors on rigid bodies.
///
/// The actuator owns its configuration and measurement axis plus one piece
/// of mutable state: the previous effective length, which seeds the
/// finite-difference velocity estimate used for damping. Bodies stay owned
/// by the substrate; [`step`](Self::step) borrows them for one tick.
///
/// With more than two anchors, the force law uses the first and last as
/// the two ends; intermediate anchors are routing metadata.
///
/// # Example
///
/// ```
/// use strut_core::{Anchor, CompressionSpring, SpringProperties};
/// use strut_types::BodyId;
/// use nalgebra::Point3;
///
/// let spring = CompressionSpring::new(
///     vec![
///         Anchor::at_origin(BodyId::new(0)),
///         Anchor::at_origin(BodyId::new(1)),
///     ],
///     SpringProperties::new(500.0, 0.75),
/// )
/// .unwrap();
///
/// assert_eq!(spring.rest_length(), 0.75);
/// assert_eq!(spring.last_velocity(), 0.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CompressionSpring {
    anchors: Vec<Anchor>,
    properties: SpringProperties,
    axis: MeasurementAxis,
    prev_length: f64,
    velocity: f64,
    damping_force: f64,
}

impl CompressionSpring {
    /// Create a spring measuring full 3D anchor distance.
    ///
    /// Validates the properties and requires at least two anchors. The
    /// previous length seeds at the rest length, so the first step's
    /// velocity estimate is relative to an unloaded spring.
    pub fn new(anchors: Vec<Anchor>, properties: SpringProperties) -> Result<Self> {
        Self::with_axis(anchors, properties, MeasurementAxis::Euclidean)
    }

    /// Create a spring measuring signed separation along a fixed axis.
    ///
    /// The direction is normalized; a zero vector is rejected.
    pub fn directional(
        anchors: Vec<Anchor>,
        properties: SpringProperties,
        direction: Vector3<f64>,
    ) -> Result<Self> {
        let axis = MeasurementAxis::directional(direction)?;
        Self::with_axis(anchors, properties, axis)
    }

    /// Create a spring with an explicit measurement axis.
    pub fn with_axis(
        anchors: Vec<Anchor>,
        properties: SpringProperties,
        axis: MeasurementAxis,
    ) -> Result<Self> {
        properties.validate()?;

        if anchors.len() < 2 {
            return Err(StrutError::invalid_config(format!(
                "a spring needs at least 2 anchors, got {}",
                anchors.len()
            )));
        }

        Ok(Self {
            anchors,
            properties,
            axis,
            prev_length: properties.rest_length,
            velocity: 0.0,
            damping_force: 0.0,
        })
    }

    /// Advance the actuator by one tick and apply impulses to the end
    /// bodies.
    ///
    /// The timestep is validated before any state is touched; a rejected
    /// `dt` leaves the actuator and the bodies exactly as they were. For a
    /// directional spring, a non-positive effective length is fatal and
    /// surfaces as [`StrutError::DegenerateLength`] before any impulse is
    /// applied.
    pub fn step(&mut self, dt: f64, bodies: &mut BodyMap) -> Result<()> {
        if !dt.is_finite() || dt <= 0.0 {
            return Err(StrutError::InvalidTimestep(dt));
        }

        let (first, last) = self.end_anchors();
        let (p1, p2) = self.end_positions(bodies)?;

        let separation = self.axis.measure(&p1, &p2);
        let spring_length = self.properties.effective_length(separation);

        // A directional spring at non-positive length has passed through
        // itself. The trajectory is unphysical and the run must stop; the
        // operator fixes stiffness or timestep, the model never clamps.
        if self.axis.is_directional() && spring_length <= 0.0 {
            return Err(StrutError::degenerate_length(spring_length));
        }

        let mut magnitude = self.properties.force(spring_length);
        debug_assert!(
            self.properties.free_end_attached || magnitude >= 0.0,
            "floating compression spring produced a pull"
        );

        // Backward finite difference: the only velocity estimate available.
        let velocity = (spring_length - self.prev_length) / dt;
        let damping_force = -self.properties.damping * velocity;
        magnitude += damping_force;

        if let Some(direction) = self.axis.force_direction(&p1, &p2) {
            let impulse = direction.into_inner() * (magnitude * dt);
            apply_impulse(bodies, last.body, impulse, p2)?;
            apply_impulse(bodies, first.body, -impulse, p1)?;
        }

        self.prev_length = spring_length;
        self.velocity = velocity;
        self.damping_force = damping_force;

        debug_assert!(self.invariant());
        Ok(())
    }

    /// Current anchor separation along the measurement axis.
    ///
    /// Unsigned distance for a Euclidean spring, signed projection for a
    /// directional one.
    pub fn current_anchor_distance(&self, bodies: &BodyMap) -> Result<f64> {
        let (p1, p2) = self.end_positions(bodies)?;
        Ok(self.axis.measure(&p1, &p2))
    }

    /// Current effective spring length.
    ///
    /// Equal to the anchor distance, except that a floating free end clamps
    /// at the rest length once contact is lost.
    pub fn current_spring_length(&self, bodies: &BodyMap) -> Result<f64> {
        Ok(self
            .properties
            .effective_length(self.current_anchor_distance(bodies)?))
    }

    /// Current elastic force (damping excluded): positive pushes the ends
    /// apart.
    pub fn spring_force(&self, bodies: &BodyMap) -> Result<f64> {
        Ok(self.properties.force(self.current_spring_length(bodies)?))
    }

    /// Current compressive strain of the spring.
    pub fn spring_strain(&self, bodies: &BodyMap) -> Result<f64> {
        Ok(self.properties.strain(self.current_spring_length(bodies)?))
    }

    /// Whether a floating free end has lost contact (zero-force region).
    pub fn is_unloaded(&self, bodies: &BodyMap) -> Result<bool> {
        Ok(self
            .properties
            .is_unloaded(self.current_anchor_distance(bodies)?))
    }

    /// The spring's mechanical properties.
    #[must_use]
    pub fn properties(&self) -> &SpringProperties {
        &self.properties
    }

    /// The measurement axis.
    #[must_use]
    pub fn axis(&self) -> &MeasurementAxis {
        &self.axis
    }

    /// All anchors, first and last being the force-law ends.
    #[must_use]
    pub fn anchors(&self) -> &[Anchor] {
        &self.anchors
    }

    /// Number of anchors.
    #[must_use]
    pub fn anchor_count(&self) -> usize {
        self.anchors.len()
    }

    /// Stiffness in N/m.
    #[must_use]
    pub fn stiffness(&self) -> f64 {
        self.properties.stiffness
    }

    /// Damping coefficient in N·s/m.
    #[must_use]
    pub fn damping(&self) -> f64 {
        self.properties.damping
    }

    /// Rest length in meters.
    #[must_use]
    pub fn rest_length(&self) -> f64 {
        self.properties.rest_length
    }

    /// Effective length recorded by the previous step.
    #[must_use]
    pub fn previous_length(&self) -> f64 {
        self.prev_length
    }

    /// Rate of length change estimated by the last step (m/s).
    ///
    /// Zero before the first step.
    #[must_use]
    pub fn last_velocity(&self) -> f64 {
        self.velocity
    }

    /// Damping force computed by the last step (N).
    ///
    /// Zero before the first step.
    #[must_use]
    pub fn last_damping_force(&self) -> f64 {
        self.damping_force
    }

    fn end_anchors(&self) -> (Anchor, Anchor) {
        (self.anchors[0], self.anchors[self.anchors.len() - 1])
    }

    fn end_positions(&self, bodies: &BodyMap) -> Result<(Point3<f64>, Point3<f64>)> {
        let (first, last) = self.end_anchors();
        let pose1 = body_pose(bodies, first.body)?;
        let pose2 = body_pose(bodies, last.body)?;
        Ok((first.world_position(&pose1), last.world_position(&pose2)))
    }

    fn invariant(&self) -> bool {
        self.properties.stiffness > 0.0
            && self.properties.damping >= 0.0
            && self.prev_length >= 0.0
            && self.properties.rest_length >= 0.0
            && self.anchors.len() >= 2
    }
}

fn body_pose(bodies: &BodyMap, id: BodyId) -> Result<Pose> {
    bodies
        .get(&id)
        .map(|body| body.state.pose)
        .ok_or(StrutError::UnknownBody(id))
}

fn apply_impulse(
    bodies: &mut BodyMap,
    id: BodyId,
    impulse: Vector3<f64>,
    point: Point3<f64>,
) -> Result<()> {
    let body = bodies.get_mut(&id).ok_or(StrutError::UnknownBody(id))?;
    body.apply_impulse_at_point(impulse, point);
    Ok(())
}
