//! Spring properties and the scalar compression force law.
//!
//! # Spring Model
//!
//! Compression springs are the push-side mirror of a cable: by default they
//! only push, never pull. With a floating free end the spring is loaded only
//! while compressed below its rest length:
//!
//! ```text
//! L_eff = {
//!     L            if free end attached (loaded in compression and tension)
//!     min(L, L₀)   if free end floating  (unloaded once contact is lost)
//! }
//!
//! F = -k · (L_eff - L₀)
//! ```
//!
//! Where:
//! - `k` is the stiffness (N/m)
//! - `L` is the measured anchor separation
//! - `L₀` is rest length
//!
//! A compressed spring (`L_eff < L₀`) gives `F > 0`, a push. With a floating
//! free end the clamp guarantees `F ≥ 0`; with an attached free end,
//! separations beyond `L₀` give `F < 0`, a pull back toward rest.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use strut_types::{Result, StrutError};

/// Mechanical properties of a compression spring actuator.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SpringProperties {
    /// Stiffness (spring constant) in N/m. Must be positive.
    ///
    /// Typical values:
    /// - Small steel coil spring: 500 - 5,000 N/m
    /// - Gas strut (linearized): 1,000 - 10,000 N/m
    /// - Stiff machine spring: 50,000+ N/m
    pub stiffness: f64,

    /// Damping coefficient in N·s/m. Must be non-negative.
    ///
    /// Acts on the finite-difference rate of length change.
    /// Typical: 1-10% of critical damping.
    pub damping: f64,

    /// Rest length (unloaded length) in meters. Must be non-negative.
    ///
    /// The length at which the spring produces zero force.
    pub rest_length: f64,

    /// Whether the free end is rigidly attached to its body.
    ///
    /// Attached springs are loaded in both compression and tension.
    /// Floating springs push only: once anchor separation exceeds the rest
    /// length, contact is lost and the spring goes unloaded.
    pub free_end_attached: bool,
}

impl Default for SpringProperties {
    fn default() -> Self {
        Self {
            stiffness: 1000.0, // 1 kN/m - moderate coil spring
            damping: 10.0,     // light damping
            rest_length: 0.5,  // 50cm default
            free_end_attached: false,
        }
    }
}

impl SpringProperties {
    /// Create spring properties with specified stiffness and rest length.
    ///
    /// Damping defaults to zero and the free end to floating.
    #[must_use]
    pub fn new(stiffness: f64, rest_length: f64) -> Self {
        Self {
            stiffness,
            damping: 0.0,
            rest_length,
            free_end_attached: false,
        }
    }

    /// Create properties for a helical steel coil spring.
    ///
    /// Stiffness from the standard coil formula:
    ///
    /// ```text
    /// k = G·d⁴ / (8·D³·n)
    /// ```
    ///
    /// with `G` = 79.3 GPa (steel shear modulus), `d` the wire diameter,
    /// `D` the mean coil diameter, and `n` the number of active coils.
    /// Damping is set to 1% of critical for a 1 kg reference load.
    ///
    /// # Arguments
    ///
    /// * `wire_diameter` - Wire diameter in meters
    /// * `coil_diameter` - Mean coil diameter in meters
    /// * `active_coils` - Number of active coils
    /// * `rest_length` - Free length of the spring in meters
    #[must_use]
    pub fn steel_coil(
        wire_diameter: f64,
        coil_diameter: f64,
        active_coils: f64,
        rest_length: f64,
    ) -> Self {
        let shear_modulus = 79.3e9; // music-wire steel
        let stiffness = shear_modulus * wire_diameter.powi(4)
            / (8.0 * coil_diameter.powi(3) * active_coils);

        Self {
            stiffness,
            damping: 0.01 * (2.0 * stiffness.sqrt()), // 1% critical for 1 kg
            rest_length,
            free_end_attached: false,
        }
    }

    /// Create properties for a gas strut, linearized about mid-stroke.
    ///
    /// A gas strut with nominal force `F` over stroke `S` behaves roughly
    /// like a preloaded spring with rate `k ≈ F / S`. Gas struts are pinned
    /// at both ends, so the free end is attached, and they are strongly
    /// damped (10% of critical for a 1 kg reference load).
    ///
    /// # Arguments
    ///
    /// * `extended_length` - Fully extended (rest) length in meters
    /// * `stroke` - Usable stroke in meters
    /// * `nominal_force` - Nameplate force in Newtons
    #[must_use]
    pub fn gas_strut(extended_length: f64, stroke: f64, nominal_force: f64) -> Self {
        let stiffness = nominal_force / stroke;

        Self {
            stiffness,
            damping: 0.1 * (2.0 * stiffness.sqrt()),
            rest_length: extended_length,
            free_end_attached: true,
        }
    }

    /// Set the damping coefficient (clamped to non-negative).
    #[must_use]
    pub fn with_damping(mut self, damping: f64) -> Self {
        self.damping = damping.max(0.0);
        self
    }

    /// Set whether the free end is attached.
    #[must_use]
    pub fn with_free_end_attached(mut self, attached: bool) -> Self {
        self.free_end_attached = attached;
        self
    }

    /// Set the rest length.
    #[must_use]
    pub fn with_rest_length(mut self, rest_length: f64) -> Self {
        self.rest_length = rest_length;
        self
    }

    /// Validate the properties.
    ///
    /// Stiffness must be finite and positive, damping finite and
    /// non-negative, rest length finite and non-negative.
    pub fn validate(&self) -> Result<()> {
        if !self.stiffness.is_finite() || self.stiffness <= 0.0 {
            return Err(StrutError::invalid_config(format!(
                "stiffness must be positive and finite, got {}",
                self.stiffness
            )));
        }

        if !self.damping.is_finite() || self.damping < 0.0 {
            return Err(StrutError::invalid_config(format!(
                "damping must be non-negative and finite, got {}",
                self.damping
            )));
        }

        if !self.rest_length.is_finite() || self.rest_length < 0.0 {
            return Err(StrutError::invalid_config(format!(
                "rest length must be non-negative and finite, got {}",
                self.rest_length
            )));
        }

        Ok(())
    }

    /// Effective spring length for a measured anchor separation.
    ///
    /// With an attached free end this is the separation itself. With a
    /// floating free end the length is clamped to the rest length: past
    /// that the free end has lost contact and the spring sits unloaded.
    #[must_use]
    pub fn effective_length(&self, separation: f64) -> f64 {
        if self.free_end_attached {
            separation
        } else {
            separation.min(self.rest_length)
        }
    }

    /// Elastic force for a given effective spring length.
    ///
    /// `F = -k · (L_eff - L₀)`; positive pushes the ends apart. Does not
    /// include damping, which depends on the rate of length change and is
    /// the actuator's business.
    #[must_use]
    pub fn force(&self, effective_length: f64) -> f64 {
        -self.stiffness * (effective_length - self.rest_length)
    }

    /// Whether a measured separation leaves the spring unloaded.
    ///
    /// Only a floating free end can be unloaded; an attached spring is
    /// always engaged.
    #[must_use]
    pub fn is_unloaded(&self, separation: f64) -> bool {
        !self.free_end_attached && separation >= self.rest_length
    }

    /// Compression of the spring at a given effective length, in meters.
    ///
    /// Positive when compressed below rest length.
    #[must_use]
    pub fn compression(&self, effective_length: f64) -> f64 {
        self.rest_length - effective_length
    }

    /// Compressive strain at a given effective length (dimensionless).
    ///
    /// Zero for a zero rest length.
    #[must_use]
    pub fn strain(&self, effective_length: f64) -> f64 {
        if self.rest_length > 0.0 {
            self.compression(effective_length) / self.rest_length
        } else {
            0.0
        }
    }
}
