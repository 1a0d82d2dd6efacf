//! Thin façade over `Rapier2D`
//!
//! Gameplay code talks to bodies through handles and `glam` vectors only;
//! the rapier pipeline is an implementation detail of this module.

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

use glam::Vec2;
use rapier2d::prelude::*;

/// Handle to a body in the world
pub type BodyHandle = RigidBodyHandle;

/// How a body participates in the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    /// Integrated every step, reacts to forces and contacts
    Dynamic,
    /// Never moves
    Static,
}

/// Collision geometry attached to a body
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Circle { radius: f32 },
    /// Axis-aligned box given by its half extents
    Box { half_width: f32, half_height: f32 },
}

/// A shape plus its material flags
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeDesc {
    pub shape: Shape,
    /// Offset of the shape from the body origin
    pub offset: Vec2,
    pub elasticity: f32,
    pub friction: f32,
    /// Sensors report overlap but never push back
    pub sensor: bool,
    /// Explicit mass; rapier derives it from density otherwise
    pub mass: Option<f32>,
}

impl ShapeDesc {
    pub fn circle(radius: f32) -> Self {
        Self::new(Shape::Circle { radius })
    }

    pub fn rect(width: f32, height: f32) -> Self {
        Self::new(Shape::Box {
            half_width: width / 2.0,
            half_height: height / 2.0,
        })
    }

    fn new(shape: Shape) -> Self {
        Self {
            shape,
            offset: Vec2::ZERO,
            elasticity: 0.0,
            friction: 0.0,
            sensor: false,
            mass: None,
        }
    }

    pub fn offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }

    pub fn elasticity(mut self, elasticity: f32) -> Self {
        self.elasticity = elasticity;
        self
    }

    pub fn friction(mut self, friction: f32) -> Self {
        self.friction = friction;
        self
    }

    pub fn sensor(mut self, sensor: bool) -> Self {
        self.sensor = sensor;
        self
    }

    pub fn mass(mut self, mass: f32) -> Self {
        self.mass = Some(mass);
        self
    }

    fn build(&self) -> Collider {
        let builder = match self.shape {
            Shape::Circle { radius } => ColliderBuilder::ball(radius),
            Shape::Box {
                half_width,
                half_height,
            } => ColliderBuilder::cuboid(half_width, half_height),
        };
        // Elasticity and friction multiply between touching shapes
        let builder = builder
            .translation(Vector::new(self.offset.x, self.offset.y))
            .restitution(self.elasticity)
            .restitution_combine_rule(CoefficientCombineRule::Multiply)
            .friction(self.friction)
            .friction_combine_rule(CoefficientCombineRule::Multiply)
            .sensor(self.sensor);
        match self.mass {
            Some(mass) => builder.mass(mass).build(),
            None => builder.build(),
        }
    }
}

/// Physics world holding every body and collider of one stage.
pub struct PhysicsWorld {
    rigid_body_set: RigidBodySet,
    collider_set: ColliderSet,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    impulse_joint_set: ImpulseJointSet,
    multibody_joint_set: MultibodyJointSet,
    ccd_solver: CCDSolver,
    gravity: Vector,
    steps: u64,
}

impl fmt::Debug for PhysicsWorld {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhysicsWorld")
            .field("steps", &self.steps)
            .field("rigid_body_count", &self.rigid_body_set.len())
            .field("collider_count", &self.collider_set.len())
            .finish_non_exhaustive()
    }
}

impl PhysicsWorld {
    /// Creates an empty world with the given gravity (y grows downward).
    pub fn new(gravity: Vec2) -> Self {
        Self {
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            gravity: Vector::new(gravity.x, gravity.y),
            steps: 0,
        }
    }

    /// Creates a body with no shapes at `position`.
    pub fn add_body(&mut self, kind: BodyKind, position: Vec2) -> BodyHandle {
        let builder = match kind {
            BodyKind::Dynamic => RigidBodyBuilder::dynamic(),
            BodyKind::Static => RigidBodyBuilder::fixed(),
        };
        let body = builder.translation(Vector::new(position.x, position.y)).build();
        self.rigid_body_set.insert(body)
    }

    /// Attaches a shape to an existing body.
    pub fn attach(&mut self, body: BodyHandle, shape: ShapeDesc) -> ColliderHandle {
        self.collider_set
            .insert_with_parent(shape.build(), body, &mut self.rigid_body_set)
    }

    /// Creates a body and attaches a single shape in one go.
    pub fn add_body_with_shape(&mut self, kind: BodyKind, position: Vec2, shape: ShapeDesc) -> BodyHandle {
        let handle = self.add_body(kind, position);
        self.attach(handle, shape);
        handle
    }

    /// Removes a body and every shape attached to it.
    pub fn remove_body(&mut self, handle: BodyHandle) {
        self.rigid_body_set.remove(
            handle,
            &mut self.island_manager,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            true,
        );
    }

    /// Accumulates a force on the body until the end of the next step.
    pub fn apply_force(&mut self, handle: BodyHandle, force: Vec2) {
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            body.add_force(Vector::new(force.x, force.y), true);
        }
    }

    /// Applies an instantaneous impulse.
    pub fn apply_impulse(&mut self, handle: BodyHandle, impulse: Vec2) {
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            body.apply_impulse(Vector::new(impulse.x, impulse.y), true);
        }
    }

    /// Advances the simulation by `dt`, then clears accumulated forces.
    pub fn step(&mut self, dt: f32) {
        self.integration_parameters.dt = dt;
        self.physics_pipeline.step(
            self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            &(),
            &(),
        );
        for (_, body) in self.rigid_body_set.iter_mut() {
            body.reset_forces(false);
        }
        self.steps += 1;
    }

    pub fn position(&self, handle: BodyHandle) -> Option<Vec2> {
        self.rigid_body_set.get(handle).map(|body| {
            let t = body.translation();
            Vec2::new(t.x, t.y)
        })
    }

    pub fn velocity(&self, handle: BodyHandle) -> Option<Vec2> {
        self.rigid_body_set.get(handle).map(|body| {
            let v = body.linvel();
            Vec2::new(v.x, v.y)
        })
    }

    /// Teleports the body (no contact resolution).
    pub fn set_position(&mut self, handle: BodyHandle, position: Vec2) {
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            body.set_translation(Vector::new(position.x, position.y), true);
        }
    }

    pub fn set_velocity(&mut self, handle: BodyHandle, velocity: Vec2) {
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            body.set_linvel(Vector::new(velocity.x, velocity.y), true);
        }
    }

    pub fn contains(&self, handle: BodyHandle) -> bool {
        self.rigid_body_set.contains(handle)
    }

    pub fn body_count(&self) -> usize {
        self.rigid_body_set.len()
    }

    pub fn collider_count(&self) -> usize {
        self.collider_set.len()
    }

    /// Number of integration steps taken so far.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Hash of every body's position and velocity, for determinism checks.
    pub fn compute_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.steps.hash(&mut hasher);

        for (handle, body) in self.rigid_body_set.iter() {
            let (index, generation) = handle.into_raw_parts();
            index.hash(&mut hasher);
            generation.hash(&mut hasher);

            let pos = body.translation();
            pos.x.to_bits().hash(&mut hasher);
            pos.y.to_bits().hash(&mut hasher);

            let vel = body.linvel();
            vel.x.to_bits().hash(&mut hasher);
            vel.y.to_bits().hash(&mut hasher);
        }

        hasher.finish()
    }
}
