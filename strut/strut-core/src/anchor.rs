//! Attachment points connecting actuators to rigid bodies.

use nalgebra::{Point3, Vector3};
use strut_types::{BodyId, Pose};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A point on a rigid body where an actuator attaches.
///
/// Anchors are non-owning: they carry the id of a substrate-owned body plus
/// an attachment point fixed in that body's local frame. The substrate stays
/// the single writer of body state; anchors only read poses handed to them.
///
/// # Example
///
/// ```
/// use strut_core::Anchor;
/// use strut_types::{BodyId, Pose};
/// use nalgebra::Point3;
///
/// let anchor = Anchor::new(BodyId::new(0), Point3::new(0.0, 0.0, 0.5));
/// let pose = Pose::from_position(Point3::new(1.0, 0.0, 0.0));
/// assert_eq!(anchor.world_position(&pose), Point3::new(1.0, 0.0, 0.5));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Anchor {
    /// The body this anchor is fixed to.
    pub body: BodyId,
    /// Attachment point in the body's local frame.
    pub attachment: Point3<f64>,
}

impl Anchor {
    /// Create an anchor on a body at a local attachment point.
    #[must_use]
    pub const fn new(body: BodyId, attachment: Point3<f64>) -> Self {
        Self { body, attachment }
    }

    /// Create an anchor at a body's origin.
    #[must_use]
    pub fn at_origin(body: BodyId) -> Self {
        Self {
            body,
            attachment: Point3::origin(),
        }
    }

    /// World-space position of the attachment point under the given pose.
    #[must_use]
    pub fn world_position(&self, pose: &Pose) -> Point3<f64> {
        pose.transform_point(&self.attachment)
    }

    /// World-frame offset of the attachment point from the body origin.
    ///
    /// This is the lever arm used when an impulse at the anchor is converted
    /// into a change of angular velocity.
    #[must_use]
    pub fn relative_position(&self, pose: &Pose) -> Vector3<f64> {
        pose.transform_vector(&self.attachment.coords)
    }
}
