use bevy_ecs::prelude::*;
use nalgebra::{Isometry3, Point3, Translation3, UnitQuaternion, Vector3, Vector4};

/// Anything that sits somewhere in world space.
/// Lights read their position through this instead of being spatial entities themselves.
pub trait WorldPosition {
    /// The world space origin of the entity, in homogeneous coordinates (w = 1).
    fn world_position(&self) -> Vector4<f32>;
}

#[derive(Component, Clone, Debug, PartialEq)]
pub struct Transform {
    pub position: Point3<f32>,
    pub rotation: UnitQuaternion<f32>,
    pub scale: Vector3<f32>,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Point3::origin(),
            rotation: UnitQuaternion::identity(),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    /// The rigid part of the transform. Scaling never moves the origin, so positions only need this.
    pub fn to_isometry(&self) -> Isometry3<f32> {
        Isometry3::from_parts(Translation3::from(self.position.coords), self.rotation)
    }
}

impl WorldPosition for Transform {
    fn world_position(&self) -> Vector4<f32> {
        self.to_isometry()
            .transform_point(&Point3::origin())
            .to_homogeneous()
    }
}

/// Starts out at the origin, unrotated and unscaled.
#[derive(Default)]
pub struct TransformBuilder {
    transform: Transform,
}

impl TransformBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(mut self, position: Point3<f32>) -> Self {
        self.transform.position = position;
        self
    }

    pub fn rotation(mut self, rotation: UnitQuaternion<f32>) -> Self {
        self.transform.rotation = rotation;
        self
    }

    pub fn scale(mut self, scale: Vector3<f32>) -> Self {
        self.transform.scale = scale;
        self
    }

    pub fn build(self) -> Transform {
        self.transform
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn world_position_is_homogeneous_point() {
        let transform = TransformBuilder::new()
            .position(Point3::new(3.0, -2.0, 5.0))
            .build();

        assert_eq!(transform.world_position(), Vector4::new(3.0, -2.0, 5.0, 1.0));
    }

    #[test]
    fn rotation_and_scale_do_not_move_the_origin() {
        let transform = TransformBuilder::new()
            .position(Point3::new(1.0, 2.0, 3.0))
            .rotation(UnitQuaternion::from_euler_angles(0.3, 1.2, -0.7))
            .scale(Vector3::new(4.0, 4.0, 4.0))
            .build();

        let position = transform.world_position();
        assert!((position - Vector4::new(1.0, 2.0, 3.0, 1.0)).norm() < 1e-5);
    }

    #[test]
    fn builder_keeps_every_part() {
        let rotation = UnitQuaternion::from_euler_angles(0.0, 0.5, 0.0);
        let transform = TransformBuilder::new()
            .position(Point3::new(1.0, 1.0, 1.0))
            .rotation(rotation)
            .scale(Vector3::new(2.0, 3.0, 4.0))
            .build();

        assert_eq!(transform.position, Point3::new(1.0, 1.0, 1.0));
        assert_eq!(transform.rotation, rotation);
        assert_eq!(transform.scale, Vector3::new(2.0, 3.0, 4.0));
        assert_eq!(TransformBuilder::new().build(), Transform::default());
    }

    #[test]
    fn default_transform_sits_at_origin() {
        assert_eq!(
            Transform::default().world_position(),
            Vector4::new(0.0, 0.0, 0.0, 1.0)
        );
    }
}
