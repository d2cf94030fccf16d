//! A minimal rigid-body substrate hosting bodies and spring actuators.
//!
//! The world owns the bodies, the springs, the configuration, and the
//! clock. Each tick it steps every spring once in insertion order, then
//! integrates awake dynamic bodies with semi-implicit Euler. There is no
//! collision detection and no constraint solver; this substrate exists so
//! actuators can be exercised against real impulse plumbing.
//!
//! Actuators never write body transforms. They apply impulses through
//! [`Body::apply_impulse_at_point`], leaving the world the single writer of
//! body state per tick.

use hashbrown::HashMap;
use nalgebra::{Point3, UnitQuaternion, Vector3};
use tracing::warn;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use strut_types::{
    BodyId, MassProperties, Pose, Result, RigidBodyState, SimulationConfig, StrutError,
};

use crate::actuator::CompressionSpring;

/// Storage for substrate-owned bodies, keyed by id.
pub type BodyMap = HashMap<BodyId, Body>;

/// Unique identifier for a spring registered with a [`World`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SpringId(pub usize);

impl std::fmt::Display for SpringId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Spring({})", self.0)
    }
}

/// A rigid body in the substrate.
///
/// Bodies with static mass properties never move: the integrator skips them
/// and impulses are ignored. Sleeping bodies are skipped by the integrator
/// too, but an incoming impulse wakes them.
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    /// Unique identifier.
    pub id: BodyId,
    /// Human-readable name for logs and debugging.
    pub name: String,
    /// Kinematic state.
    pub state: RigidBodyState,
    /// Mass, center of mass, and inertia.
    pub mass_props: MassProperties,
    /// Whether the body is currently asleep.
    pub is_sleeping: bool,
}

impl Body {
    /// Create a body with a default name derived from its id.
    #[must_use]
    pub fn new(id: BodyId, state: RigidBodyState, mass_props: MassProperties) -> Self {
        Self {
            id,
            name: format!("body_{}", id.raw()),
            state,
            mass_props,
            is_sleeping: false,
        }
    }

    /// Set the body name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Whether this body is immovable.
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.mass_props.is_static()
    }

    /// Wake the body up.
    pub fn wake_up(&mut self) {
        self.is_sleeping = false;
    }

    /// Put the body to sleep. The integrator skips it until something
    /// wakes it.
    pub fn put_to_sleep(&mut self) {
        self.is_sleeping = true;
    }

    /// Apply an impulse at the center of mass (linear velocity only).
    pub fn apply_impulse(&mut self, impulse: Vector3<f64>) {
        if self.is_static() {
            return;
        }

        self.wake_up();
        self.state.twist.linear += impulse * self.mass_props.inverse_mass();
    }

    /// Apply an impulse at a world-space point.
    ///
    /// The body is woken first, then the impulse lands immediately:
    /// linear velocity changes by `J/m`, angular velocity by
    /// `I⁻¹ · (r × J)` with `r` the arm from the world-space center of
    /// mass to the point. Static bodies ignore impulses entirely.
    pub fn apply_impulse_at_point(&mut self, impulse: Vector3<f64>, point: Point3<f64>) {
        if self.is_static() {
            return;
        }

        self.wake_up();

        self.state.twist.linear += impulse * self.mass_props.inverse_mass();

        if let Some(inv_inertia) = self.mass_props.inverse_inertia() {
            let rot = self.state.pose.rotation.to_rotation_matrix();
            let rot_m = rot.matrix();
            let inv_world = rot_m * inv_inertia * rot_m.transpose();

            let com_world = self
                .state
                .pose
                .transform_point(&Point3::from(self.mass_props.center_of_mass));
            let arm = point - com_world;
            self.state.twist.angular += inv_world * arm.cross(&impulse);
        }
    }

    /// Linear momentum of the body (zero for static bodies).
    #[must_use]
    pub fn linear_momentum(&self) -> Vector3<f64> {
        if self.is_static() {
            return Vector3::zeros();
        }
        self.state.twist.linear_momentum(self.mass_props.mass)
    }

    /// Kinetic energy of the body (zero for static bodies).
    #[must_use]
    pub fn kinetic_energy(&self) -> f64 {
        if self.is_static() {
            return 0.0;
        }

        let rot = self.state.pose.rotation.to_rotation_matrix();
        let rot_m = rot.matrix();
        let inertia_world = rot_m * self.mass_props.inertia * rot_m.transpose();
        self.state
            .twist
            .kinetic_energy(self.mass_props.mass, &inertia_world)
    }
}

/// The simulation world: bodies, springs, configuration, clock.
///
/// # Example
///
/// ```
/// use strut_core::{Anchor, CompressionSpring, SpringProperties, World};
/// use strut_types::{MassProperties, Pose, RigidBodyState, SimulationConfig};
/// use nalgebra::Point3;
///
/// let mut world = World::new(SimulationConfig::zero_gravity());
///
/// let a = world.add_body(
///     RigidBodyState::at_rest(Pose::from_position(Point3::new(0.0, 0.0, 0.0))),
///     MassProperties::sphere(1.0, 0.05),
/// );
/// let b = world.add_body(
///     RigidBodyState::at_rest(Pose::from_position(Point3::new(0.8, 0.0, 0.0))),
///     MassProperties::sphere(1.0, 0.05),
/// );
///
/// let spring = CompressionSpring::new(
///     vec![Anchor::at_origin(a), Anchor::at_origin(b)],
///     SpringProperties::new(100.0, 1.0),
/// )
/// .unwrap();
/// world.add_spring(spring);
///
/// world.run_for(0.1).unwrap();
///
/// // The compressed spring pushed the bodies apart.
/// let separation = world.body(b).unwrap().state.pose.position.x
///     - world.body(a).unwrap().state.pose.position.x;
/// assert!(separation > 0.8);
/// ```
#[derive(Debug, Clone)]
pub struct World {
    bodies: BodyMap,
    springs: Vec<CompressionSpring>,
    config: SimulationConfig,
    time: f64,
    next_body_id: u64,
}

impl Default for World {
    fn default() -> Self {
        Self::new(SimulationConfig::default())
    }
}

impl World {
    /// Create an empty world with the given configuration.
    ///
    /// The configuration is validated lazily at [`step`](Self::step) time,
    /// so an invalid timestep surfaces on the first tick rather than here.
    #[must_use]
    pub fn new(config: SimulationConfig) -> Self {
        Self {
            bodies: BodyMap::default(),
            springs: Vec::new(),
            config,
            time: 0.0,
            next_body_id: 0,
        }
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Elapsed simulation time in seconds.
    #[must_use]
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Add a body and return its id.
    ///
    /// Suspicious mass properties are logged but accepted; static bodies
    /// are a legitimate configuration.
    pub fn add_body(&mut self, state: RigidBodyState, mass_props: MassProperties) -> BodyId {
        let id = BodyId::new(self.next_body_id);
        self.next_body_id += 1;

        if let Err(error) = mass_props.validate() {
            warn!(body = id.raw(), %error, "adding body with invalid mass properties");
        }

        self.bodies.insert(id, Body::new(id, state, mass_props));
        id
    }

    /// Add a named body and return its id.
    pub fn add_named_body(
        &mut self,
        name: impl Into<String>,
        state: RigidBodyState,
        mass_props: MassProperties,
    ) -> BodyId {
        let id = self.add_body(state, mass_props);
        if let Some(body) = self.bodies.get_mut(&id) {
            body.name = name.into();
        }
        id
    }

    /// Add an immovable body at the given pose.
    ///
    /// Useful as a mounting point or as a kinematically driven rig whose
    /// pose the host mutates directly between ticks.
    pub fn add_fixed_body(&mut self, pose: Pose) -> BodyId {
        self.add_body(RigidBodyState::at_rest(pose), MassProperties::fixed())
    }

    /// Look up a body.
    #[must_use]
    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies.get(&id)
    }

    /// Look up a body mutably.
    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.bodies.get_mut(&id)
    }

    /// All bodies.
    #[must_use]
    pub fn bodies(&self) -> &BodyMap {
        &self.bodies
    }

    /// All bodies, mutable. Hosts driving kinematic rigs write poses here.
    pub fn bodies_mut(&mut self) -> &mut BodyMap {
        &mut self.bodies
    }

    /// Number of bodies.
    #[must_use]
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Register a spring actuator and return its id.
    ///
    /// Springs step in registration order. Registration never fails, but a
    /// spring that already measures a degenerate length (or whose anchors
    /// do not resolve) is logged, since its first step will error.
    pub fn add_spring(&mut self, spring: CompressionSpring) -> SpringId {
        let id = SpringId(self.springs.len());

        match spring.current_spring_length(&self.bodies) {
            Ok(length) if spring.axis().is_directional() && length <= 0.0 => {
                warn!(
                    spring = id.0,
                    length, "spring registered at non-positive length; its first step will fail"
                );
            }
            Err(error) => {
                warn!(spring = id.0, %error, "spring anchors do not resolve to live bodies");
            }
            Ok(_) => {}
        }

        self.springs.push(spring);
        id
    }

    /// Look up a spring.
    #[must_use]
    pub fn spring(&self, id: SpringId) -> Option<&CompressionSpring> {
        self.springs.get(id.0)
    }

    /// All springs, in step order.
    #[must_use]
    pub fn springs(&self) -> &[CompressionSpring] {
        &self.springs
    }

    /// Number of springs.
    #[must_use]
    pub fn spring_count(&self) -> usize {
        self.springs.len()
    }

    /// Advance the world by one tick.
    ///
    /// Order per tick: every spring steps once, in registration order;
    /// then gravity and semi-implicit Euler integration for awake dynamic
    /// bodies; then the clock advances. A spring error aborts the tick
    /// before integration and leaves the clock untouched, halting the run.
    pub fn step(&mut self) -> Result<()> {
        self.config.validate()?;
        let dt = self.config.timestep;

        for spring in &mut self.springs {
            spring.step(dt, &mut self.bodies)?;
        }

        for body in self.bodies.values_mut() {
            if body.is_static() || body.is_sleeping {
                continue;
            }

            // Semi-implicit Euler: velocity first, then position from the
            // new velocity. Symplectic, stable for oscillatory systems.
            body.state.twist.linear += self.config.gravity * dt;
            body.state.pose.position += body.state.twist.linear * dt;
            integrate_rotation(&mut body.state.pose.rotation, &body.state.twist.angular, dt);
        }

        self.time += dt;
        Ok(())
    }

    /// Run for a duration, in whole ticks. Returns the number of ticks
    /// taken.
    pub fn run_for(&mut self, duration: f64) -> Result<usize> {
        if !duration.is_finite() || duration < 0.0 {
            return Err(StrutError::invalid_config(format!(
                "duration must be non-negative and finite, got {duration}"
            )));
        }

        let steps = (duration / self.config.timestep).round() as usize;
        for _ in 0..steps {
            self.step()?;
        }
        Ok(steps)
    }

    /// Sum of linear momentum over all bodies.
    #[must_use]
    pub fn total_linear_momentum(&self) -> Vector3<f64> {
        self.bodies
            .values()
            .fold(Vector3::zeros(), |acc, body| acc + body.linear_momentum())
    }

    /// Sum of kinetic energy over all bodies.
    #[must_use]
    pub fn total_kinetic_energy(&self) -> f64 {
        self.bodies.values().map(Body::kinetic_energy).sum()
    }
}

/// Rotate a quaternion by an angular velocity over one timestep.
fn integrate_rotation(rotation: &mut UnitQuaternion<f64>, omega: &Vector3<f64>, dt: f64) {
    if omega.norm() < 1e-10 {
        return;
    }

    *rotation *= UnitQuaternion::from_scaled_axis(omega * dt);
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::anchor::Anchor;
    use crate::spring::SpringProperties;
    use approx::assert_relative_eq;

    const DT: f64 = 1.0 / 240.0;

    fn sphere_at(world: &mut World, x: f64) -> BodyId {
        world.add_body(
            RigidBodyState::at_rest(Pose::from_position(Point3::new(x, 0.0, 0.0))),
            MassProperties::sphere(1.0, 0.5),
        )
    }

    #[test]
    fn test_add_and_query_bodies() {
        let mut world = World::new(SimulationConfig::zero_gravity());
        let a = sphere_at(&mut world, 0.0);
        let b = world.add_named_body(
            "anvil",
            RigidBodyState::origin(),
            MassProperties::fixed(),
        );

        assert_eq!(world.body_count(), 2);
        assert_ne!(a, b);
        assert_eq!(world.body(b).unwrap().name, "anvil");
        assert!(world.body(b).unwrap().is_static());
        assert!(world.body(BodyId::new(99)).is_none());
    }

    #[test]
    fn test_central_impulse_changes_linear_velocity() {
        let mut world = World::new(SimulationConfig::zero_gravity());
        let id = sphere_at(&mut world, 0.0);

        let body = world.body_mut(id).unwrap();
        body.apply_impulse(Vector3::new(2.0, 0.0, 0.0));

        assert_relative_eq!(body.state.twist.linear.x, 2.0, epsilon = 1e-12);
        assert_eq!(body.state.twist.angular.norm(), 0.0);
    }

    #[test]
    fn test_offcenter_impulse_spins_body() {
        let mut world = World::new(SimulationConfig::zero_gravity());
        let id = sphere_at(&mut world, 0.0);

        let body = world.body_mut(id).unwrap();
        // Sphere inertia I = 0.4 * 1 * 0.5² = 0.1. Impulse 0.1 N·s along
        // +Y at a point 0.5 m out on +X: ΔL = (0.05) ẑ, Δω = 0.5 rad/s.
        body.apply_impulse_at_point(
            Vector3::new(0.0, 0.1, 0.0),
            Point3::new(0.5, 0.0, 0.0),
        );

        assert_relative_eq!(body.state.twist.angular.z, 0.5, epsilon = 1e-10);
        assert_relative_eq!(body.state.twist.linear.y, 0.1, epsilon = 1e-12);
    }

    #[test]
    fn test_static_body_ignores_impulses() {
        let mut world = World::new(SimulationConfig::zero_gravity());
        let id = world.add_fixed_body(Pose::identity());

        let body = world.body_mut(id).unwrap();
        body.apply_impulse_at_point(Vector3::new(10.0, 0.0, 0.0), Point3::origin());

        assert_eq!(body.state.twist.speed(), 0.0);
    }

    #[test]
    fn test_impulse_wakes_sleeping_body() {
        let mut world = World::new(SimulationConfig::zero_gravity());
        let id = sphere_at(&mut world, 0.0);

        let body = world.body_mut(id).unwrap();
        body.put_to_sleep();
        body.apply_impulse_at_point(Vector3::new(1.0, 0.0, 0.0), Point3::origin());

        assert!(!body.is_sleeping);
        assert_relative_eq!(body.state.twist.linear.x, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_sleeping_body_skips_integration() {
        let mut world = World::new(SimulationConfig::default());
        let id = sphere_at(&mut world, 0.0);
        world.body_mut(id).unwrap().put_to_sleep();

        world.step().unwrap();

        let body = world.body(id).unwrap();
        assert_eq!(body.state.pose.position.x, 0.0);
        assert_eq!(body.state.twist.speed(), 0.0);
    }

    #[test]
    fn test_free_fall_under_gravity() {
        let mut world = World::new(SimulationConfig::default());
        let id = sphere_at(&mut world, 0.0);

        let steps = world.run_for(1.0).unwrap();
        assert_eq!(steps, 240);

        let body = world.body(id).unwrap();
        assert_relative_eq!(body.state.twist.linear.z, -9.81, epsilon = 1e-9);

        // Semi-implicit Euler lands at g·t·(t + dt)/2 after n steps.
        let expected = -9.81 * (1.0 + DT) / 2.0;
        assert_relative_eq!(body.state.pose.position.z, expected, epsilon = 1e-9);
        assert_relative_eq!(world.time(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_rotation_integration() {
        let mut world = World::new(SimulationConfig::zero_gravity());
        let id = sphere_at(&mut world, 0.0);

        // One radian per second around Z.
        world.body_mut(id).unwrap().state.twist.angular = Vector3::new(0.0, 0.0, 1.0);
        world.run_for(1.0).unwrap();

        let rotation = world.body(id).unwrap().state.pose.rotation;
        assert_relative_eq!(rotation.angle(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_spring_error_halts_run_before_time_advances() {
        let mut world = World::new(SimulationConfig::zero_gravity());
        let a = world.add_fixed_body(Pose::identity());
        let b = world.add_fixed_body(Pose::from_position(Point3::new(-0.5, 0.0, 0.0)));

        let spring = CompressionSpring::directional(
            vec![Anchor::at_origin(a), Anchor::at_origin(b)],
            SpringProperties::new(100.0, 1.0),
            Vector3::x(),
        )
        .unwrap();
        world.add_spring(spring);

        let err = world.step().unwrap_err();
        assert!(err.is_fatal());
        assert_eq!(world.time(), 0.0);
    }

    #[test]
    fn test_momentum_accounting() {
        let mut world = World::new(SimulationConfig::zero_gravity());
        let a = sphere_at(&mut world, 0.0);
        sphere_at(&mut world, 1.0);

        world
            .body_mut(a)
            .unwrap()
            .apply_impulse(Vector3::new(3.0, 0.0, 0.0));

        world.run_for(0.25).unwrap();
        assert_relative_eq!(
            world.total_linear_momentum(),
            Vector3::new(3.0, 0.0, 0.0),
            epsilon = 1e-12
        );
        // KE = 0.5 · 1 · 3² = 4.5
        assert_relative_eq!(world.total_kinetic_energy(), 4.5, epsilon = 1e-12);
    }

    #[test]
    fn test_run_for_validates_duration() {
        let mut world = World::new(SimulationConfig::zero_gravity());
        assert!(world.run_for(-1.0).is_err());
        assert!(world.run_for(f64::NAN).is_err());
        assert_eq!(world.run_for(0.5).unwrap(), 120);
    }

    #[test]
    fn test_invalid_timestep_surfaces_on_step() {
        let mut world = World::new(SimulationConfig::new(0.0));
        assert_eq!(
            world.step().unwrap_err(),
            StrutError::InvalidTimestep(0.0)
        );
    }

    #[test]
    fn test_spring_registry() {
        let mut world = World::new(SimulationConfig::zero_gravity());
        let a = sphere_at(&mut world, 0.0);
        let b = sphere_at(&mut world, 0.8);

        let spring = CompressionSpring::new(
            vec![Anchor::at_origin(a), Anchor::at_origin(b)],
            SpringProperties::new(100.0, 1.0),
        )
        .unwrap();

        let id = world.add_spring(spring);
        assert_eq!(id, SpringId(0));
        assert_eq!(id.to_string(), "Spring(0)");
        assert_eq!(world.spring_count(), 1);
        assert_relative_eq!(world.spring(id).unwrap().rest_length(), 1.0);
    }
}
