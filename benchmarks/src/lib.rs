//! Scene builders shared by the physics benchmarks.

use glam::{Quat, Vec3};
use rigidkit::{
    BodyHandle, Collider, ContactManifold, PhysicsConfig, PhysicsWorld, RigidBody, RigidBodySet,
};

/// Deterministic pseudo-random sequence in `[0, 1)`.
struct Lcg(u32);

impl Lcg {
    fn next(&mut self) -> f32 {
        self.0 = self.0.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        (self.0 >> 8) as f32 / (1u32 << 24) as f32
    }
}

/// Ground plane plus `n` spheres stacked in a loose column grid.
pub fn setup_sphere_scene(n: usize) -> RigidBodySet {
    let mut bodies = RigidBodySet::new();
    bodies.insert(RigidBody::new_static().with_collider(Collider::plane(Vec3::Y, 0.0)));

    let side = (n as f32).sqrt().ceil() as usize;
    for i in 0..n {
        let x = (i % side) as f32 * 1.1;
        let z = (i / side) as f32 * 1.1;
        bodies.insert(
            RigidBody::new_dynamic(1.0)
                .with_position(Vec3::new(x, 0.45, z))
                .with_collider(Collider::sphere(0.5)),
        );
    }
    bodies
}

/// Ground plane plus `n` bodies cycling through spheres, boxes and capsules with random
/// orientations.
pub fn setup_mixed_scene(n: usize) -> RigidBodySet {
    let mut bodies = RigidBodySet::new();
    bodies.insert(RigidBody::new_static().with_collider(Collider::plane(Vec3::Y, 0.0)));

    let mut rng = Lcg(7);
    for i in 0..n {
        let collider = match i % 3 {
            0 => Collider::sphere(0.5),
            1 => Collider::cuboid(Vec3::splat(0.4)),
            _ => Collider::capsule(0.4, 0.25),
        };
        let position = Vec3::new(rng.next() * 20.0, rng.next() * 4.0, rng.next() * 20.0);
        let orientation = Quat::from_euler(
            glam::EulerRot::XYZ,
            rng.next() * 6.28,
            rng.next() * 6.28,
            rng.next() * 6.28,
        );
        bodies.insert(
            RigidBody::new_dynamic(1.0)
                .with_position(position)
                .with_orientation(orientation)
                .with_collider(collider),
        );
    }
    bodies
}

/// Plane-sphere manifolds for `n` resting spheres, with the bodies they reference.
pub fn setup_contacts(n: usize) -> (RigidBodySet, Vec<ContactManifold>) {
    let bodies = setup_sphere_scene(n);
    let handles: Vec<BodyHandle> = bodies.handles().collect();
    let ground = handles[0];

    let manifolds = handles[1..]
        .iter()
        .map(|&ball| {
            let position = bodies.get(ball).map(|b| b.position()).unwrap_or_default();
            let mut manifold = ContactManifold::new(ground, ball);
            manifold.push(rigidkit::Contact {
                point: position - Vec3::new(0.0, 0.5, 0.0),
                normal: Vec3::Y,
                depth: 0.05,
            });
            manifold
        })
        .collect();

    (bodies, manifolds)
}

/// A mixed scene with every body moving down, and a fresh physics world to step it.
pub fn setup_scene(n: usize) -> (RigidBodySet, PhysicsWorld) {
    let mut bodies = setup_mixed_scene(n);
    for (_, body) in bodies.iter_mut() {
        body.linear_velocity = Vec3::new(0.0, -1.0, 0.0);
    }
    let physics = PhysicsWorld::new(PhysicsConfig::default()).expect("default physics config");
    (bodies, physics)
}
