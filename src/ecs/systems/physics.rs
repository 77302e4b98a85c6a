//! ECS side of the physics step: gravity lookup and pose write-back.

use glam::Vec3;

use crate::ecs::components::physics::{Gravity, PhysicsBody};
use crate::ecs::components::transform::{GlobalTransform, Transform};
use crate::physics::body_set::RigidBodySet;
use crate::physics::TransformStore;

/// The scene's gravity, taken from the first [`Gravity`] component found.
///
/// Returns `None` if no entity carries one, in which case no gravity force is applied.
pub fn scene_gravity(world: &hecs::World) -> Option<Vec3> {
    world
        .query::<&Gravity>()
        .iter()
        .next()
        .map(|(_, gravity)| gravity.0)
}

impl TransformStore for hecs::World {
    fn write_poses(&mut self, bodies: &RigidBodySet) {
        for (_, (body, transform, global)) in self.query_mut::<(
            &PhysicsBody,
            &mut Transform,
            Option<&mut GlobalTransform>,
        )>() {
            let Some(rigid_body) = bodies.get(body.0) else {
                continue;
            };

            // Entity scale is presentation only
            let pose = rigid_body.transform();
            transform.position = pose.position;
            transform.rotation = pose.rotation;
            if let Some(global) = global {
                *global = GlobalTransform::from(*transform);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::collider::Collider;
    use crate::physics::constraint::ConstraintSet;
    use crate::physics::rigid_body::RigidBody;
    use crate::physics::{PhysicsConfig, PhysicsWorld};
    use glam::{Mat4, Quat};

    #[test]
    fn test_scene_gravity() {
        let mut world = hecs::World::new();
        assert_eq!(scene_gravity(&world), None);

        world.spawn((Gravity(Vec3::new(0.0, -1.62, 0.0)),));
        assert_eq!(scene_gravity(&world), Some(Vec3::new(0.0, -1.62, 0.0)));
    }

    #[test]
    fn test_write_poses_updates_transforms() {
        let mut bodies = RigidBodySet::new();
        let handle = bodies.insert(
            RigidBody::new_dynamic(1.0)
                .with_position(Vec3::new(1.0, 2.0, 3.0))
                .with_orientation(Quat::from_rotation_y(0.5)),
        );

        let mut world = hecs::World::new();
        let with_global = world.spawn((
            PhysicsBody(handle),
            Transform::identity(),
            GlobalTransform::default(),
        ));
        let without_global = world.spawn((PhysicsBody(handle), Transform::identity()));
        let unrelated = world.spawn((Transform::from_position(Vec3::X),));

        world.write_poses(&bodies);

        let expected = *bodies.get(handle).unwrap().transform();
        assert_eq!(*world.get::<&Transform>(with_global).unwrap(), expected);
        assert_eq!(
            world.get::<&GlobalTransform>(with_global).unwrap().0,
            expected.to_matrix()
        );
        assert_eq!(*world.get::<&Transform>(without_global).unwrap(), expected);
        assert_eq!(
            world.get::<&Transform>(unrelated).unwrap().position,
            Vec3::X
        );
    }

    #[test]
    fn test_write_poses_keeps_entity_scale() {
        let mut bodies = RigidBodySet::new();
        let handle = bodies.insert(RigidBody::new_dynamic(1.0).with_position(Vec3::Y));

        let mut world = hecs::World::new();
        let scaled = Transform {
            scale: Vec3::splat(2.0),
            ..Transform::identity()
        };
        let entity = world.spawn((PhysicsBody(handle), scaled, GlobalTransform::default()));

        world.write_poses(&bodies);

        let transform = *world.get::<&Transform>(entity).unwrap();
        assert_eq!(transform.position, Vec3::Y);
        assert_eq!(transform.scale, Vec3::splat(2.0));
        assert_eq!(
            world.get::<&GlobalTransform>(entity).unwrap().0,
            transform.to_matrix()
        );
    }

    #[test]
    fn test_stale_body_leaves_transform_alone() {
        let mut bodies = RigidBodySet::new();
        let handle = bodies.insert(RigidBody::new_dynamic(1.0).with_position(Vec3::Y));
        bodies.remove(handle);

        let mut world = hecs::World::new();
        let entity = world.spawn((
            PhysicsBody(handle),
            Transform::from_position(Vec3::Z),
            GlobalTransform(Mat4::IDENTITY),
        ));

        world.write_poses(&bodies);

        assert_eq!(world.get::<&Transform>(entity).unwrap().position, Vec3::Z);
        assert_eq!(
            world.get::<&GlobalTransform>(entity).unwrap().0,
            Mat4::IDENTITY
        );
    }

    #[test]
    fn test_physics_world_drives_ecs() {
        let mut bodies = RigidBodySet::new();
        let mut constraints = ConstraintSet::new();
        let mut physics = PhysicsWorld::new(PhysicsConfig::default()).unwrap();

        let handle = bodies.insert(
            RigidBody::new_dynamic(1.0)
                .with_position(Vec3::new(0.0, 10.0, 0.0))
                .with_collider(Collider::sphere(0.5)),
        );

        let mut world = hecs::World::new();
        world.spawn((Gravity::default(),));
        let entity = world.spawn((
            PhysicsBody(handle),
            Transform::from_position(Vec3::new(0.0, 10.0, 0.0)),
            GlobalTransform::default(),
        ));

        for _ in 0..30 {
            let gravity = scene_gravity(&world);
            physics.step(&mut bodies, &mut constraints, gravity, &mut world, 1.0 / 60.0);
        }

        let transform = *world.get::<&Transform>(entity).unwrap();
        assert!(transform.position.y < 10.0);
        assert_eq!(
            world.get::<&GlobalTransform>(entity).unwrap().0,
            transform.to_matrix()
        );
    }
}
