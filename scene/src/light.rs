use std::sync::{Mutex, OnceLock};

use bevy_ecs::prelude::*;
use bevy_utils::tracing::debug;
use nalgebra::{Point3, Vector4};
use serde::{Deserialize, Serialize};

use crate::transform::{Transform, TransformBuilder, WorldPosition};

/// The range the attenuation factor is meant to lie in.
/// Nothing here enforces it, values outside of it are stored as they are.
pub const ATTENUATION_RANGE: (f32, f32) = (0.001, 1000.0);

/// Whether `attenuation` lies inside of [`ATTENUATION_RANGE`], bounds excluded.
pub fn attenuation_in_range(attenuation: f32) -> bool {
    let (min, max) = ATTENUATION_RANGE;
    attenuation > min && attenuation < max
}

/// Decides how a light emits. Shaders pick their lighting branch based on this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LightKind {
    /// Omnidirectional, from a location. Also known as an omni light.
    Point,
    /// A cone from a location.
    Spot,
    /// A distant skylight. The position is used as a direction.
    Sky,
}

impl LightKind {
    /// The number the shaders switch on.
    pub fn shader_code(&self) -> u32 {
        match self {
            LightKind::Point => 0,
            LightKind::Spot => 1,
            LightKind::Sky => 2,
        }
    }
}

/// The scalar values of a single light, the way the render layer reads them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightValues {
    pub kind: LightKind,
    /// World space position in homogeneous coordinates, w = 1.
    pub position: Vector4<f32>,
    /// RGBA
    pub color: Vector4<f32>,
    pub attenuation: f32,
}

impl Default for LightValues {
    fn default() -> Self {
        Self {
            kind: LightKind::Point,
            position: Vector4::new(0.0, 0.0, 0.0, 1.0),
            color: Vector4::new(1.0, 1.0, 1.0, 1.0),
            attenuation: 1.0,
        }
    }
}

static DEFAULT_LIGHT: OnceLock<Mutex<LightSource>> = OnceLock::new();

/// A light in the scene.
///
/// The attenuation factor is the distance over which the light loses around 5% of its power.
/// With an attenuation of 2.0, an object that is 20.0 units away receives 50% of the light.
///
/// Every setter writes straight through to the [`LightValues`], so [`LightSource::values`]
/// never lags behind.
#[derive(Component, Debug, Clone, PartialEq, Default)]
pub struct LightSource {
    values: LightValues,
}

impl LightSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// The light that gets used when a scene doesn't bring its own.
    ///
    /// It is a sky light at (0, 1, -1) and is created on first use. Concurrent first calls
    /// still construct it exactly once, and every call returns the same instance.
    /// Reading or changing it means locking it, so it is safe to share between threads.
    pub fn default_light() -> &'static Mutex<LightSource> {
        DEFAULT_LIGHT.get_or_init(|| Mutex::new(build_default_light()))
    }

    pub fn kind(&self) -> LightKind {
        self.values.kind
    }

    pub fn set_kind(&mut self, kind: LightKind) {
        self.values.kind = kind;
    }

    pub fn color(&self) -> Vector4<f32> {
        self.values.color
    }

    /// Not clamped.
    pub fn set_color(&mut self, color: Vector4<f32>) {
        self.values.color = color;
    }

    pub fn attenuation(&self) -> f32 {
        self.values.attenuation
    }

    /// Stored as is, even outside of [`ATTENUATION_RANGE`].
    /// What happens with such values is up to the shader.
    pub fn set_attenuation(&mut self, attenuation: f32) {
        self.values.attenuation = attenuation;
    }

    /// Moves the light to wherever `entity` is.
    pub fn follow(&mut self, entity: &impl WorldPosition) {
        self.values.position = entity.world_position();
    }

    pub fn values(&self) -> &LightValues {
        &self.values
    }
}

fn build_default_light() -> LightSource {
    let mut light = LightSource::new();
    light.set_kind(LightKind::Sky);
    light.follow(
        &TransformBuilder::new()
            .position(Point3::new(0.0, 1.0, -1.0))
            .build(),
    );
    debug!(?light, "created default light");

    light
}

/// Lights that just got added are moved too, their transform may have settled long ago.
pub fn sync_light_positions(
    mut lights: Query<
        (&Transform, &mut LightSource),
        Or<(Changed<Transform>, Added<LightSource>)>,
    >,
) {
    for (transform, mut light) in lights.iter_mut() {
        light.follow(transform);
    }
}
