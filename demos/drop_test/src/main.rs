//! Headless drop test: a few shapes fall onto a ground plane while a spring swings a bob.
//!
//! Run with `RUST_LOG=rigidkit=debug` to see per-step broadphase and narrowphase counts.

use glam::{Quat, Vec3};
use rigidkit::{
    scene_gravity, Collider, ConstraintSet, GlobalTransform, Gravity, Material, PhysicsBody,
    PhysicsConfig, PhysicsWorld, RigidBody, RigidBodySet, SpringConstraint, Transform,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

const FRAMES_PER_SECOND: usize = 60;
const FRAME_TIME: f64 = 1.0 / FRAMES_PER_SECOND as f64;
const SECONDS: usize = 4;

fn spawn(
    world: &mut hecs::World,
    bodies: &mut RigidBodySet,
    name: &'static str,
    body: RigidBody,
) -> rigidkit::BodyHandle {
    let transform = *body.transform();
    let handle = bodies.insert(body);
    world.spawn((
        name,
        PhysicsBody(handle),
        transform,
        GlobalTransform::from(transform),
    ));
    handle
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = PhysicsConfig::default();
    let mut physics = PhysicsWorld::new(config)?;
    let mut bodies = RigidBodySet::new();
    let mut constraints = ConstraintSet::new();
    let mut world = hecs::World::new();

    world.spawn((Gravity::default(),));

    let rubber = Material::new(0.6, 0.8, 0.6)?;
    let ice = Material::new(0.1, 0.05, 0.02)?;

    spawn(
        &mut world,
        &mut bodies,
        "ground",
        RigidBody::new_static().with_collider(Collider::plane(Vec3::Y, 0.0)),
    );
    spawn(
        &mut world,
        &mut bodies,
        "ball",
        RigidBody::new_dynamic(1.0)
            .with_position(Vec3::new(0.0, 4.0, 0.0))
            .with_collider(Collider::sphere(0.5).with_material(rubber)),
    );
    spawn(
        &mut world,
        &mut bodies,
        "crate",
        RigidBody::new_dynamic(2.0)
            .with_position(Vec3::new(2.0, 3.0, 0.0))
            .with_orientation(Quat::from_rotation_z(0.4))
            .with_collider(Collider::cuboid(Vec3::splat(0.5))),
    );
    spawn(
        &mut world,
        &mut bodies,
        "pill",
        RigidBody::new_dynamic(1.0)
            .with_position(Vec3::new(-2.0, 2.0, 0.0))
            .with_orientation(Quat::from_rotation_x(1.2))
            .with_linear_velocity(Vec3::new(1.0, 0.0, 0.0))
            .with_collider(Collider::capsule(0.5, 0.25).with_material(ice)),
    );

    let anchor = spawn(
        &mut world,
        &mut bodies,
        "anchor",
        RigidBody::new_static().with_position(Vec3::new(0.0, 6.0, 3.0)),
    );
    let bob = spawn(
        &mut world,
        &mut bodies,
        "bob",
        RigidBody::new_dynamic(0.5)
            .with_position(Vec3::new(1.5, 6.0, 3.0))
            .with_collider(Collider::sphere(0.2)),
    );
    constraints.insert(
        SpringConstraint::new(1.0, 40.0, 0.5)
            .attach_a(anchor, Vec3::ZERO)
            .attach_b(bob, Vec3::ZERO),
    );

    for frame in 0..SECONDS * FRAMES_PER_SECOND {
        let gravity = scene_gravity(&world);
        physics.step(
            &mut bodies,
            &mut constraints,
            gravity,
            &mut world,
            FRAME_TIME,
        );

        if frame % FRAMES_PER_SECOND == FRAMES_PER_SECOND - 1 {
            info!("t = {:.2}s", physics.time());
            for (_, (name, transform)) in world.query::<(&&'static str, &Transform)>().iter() {
                info!("  {:<6} {:.3}", name, transform.position);
            }
        }
    }

    let contacts: usize = physics
        .manifolds()
        .iter()
        .map(|manifold| manifold.contact_count())
        .sum();
    info!(
        "Finished: {} bodies, {} manifolds, {} contacts",
        bodies.len(),
        physics.manifolds().len(),
        contacts
    );

    Ok(())
}
