use std::sync::PoisonError;

use bevy_ecs::prelude::*;
use bytemuck::{Pod, Zeroable};

use crate::light::{LightSource, LightValues};

/// One light, laid out the way the shaders expect it (std140 compatible).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct ShaderLight {
    pub position: [f32; 4],
    pub color: [f32; 4],
    pub kind: u32,
    pub attenuation: f32,
    _padding: [u32; 2],
}

impl From<&LightValues> for ShaderLight {
    fn from(values: &LightValues) -> Self {
        Self {
            position: values.position.into(),
            color: values.color.into(),
            kind: values.kind.shader_code(),
            attenuation: values.attenuation,
            _padding: [0; 2],
        }
    }
}

/// The lights of the current frame, ready to be copied into a uniform buffer.
#[derive(Resource, Debug, Default)]
pub struct LightUniforms {
    pub lights: Vec<ShaderLight>,
}

impl LightUniforms {
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.lights)
    }
}

pub fn upload_light_uniforms(lights: Query<&LightSource>, mut uniforms: ResMut<LightUniforms>) {
    uniforms.lights.clear();
    uniforms
        .lights
        .extend(lights.iter().map(|light| ShaderLight::from(light.values())));

    // scenes without lights of their own are lit by the default light
    if uniforms.lights.is_empty() {
        let default_light = LightSource::default_light()
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        uniforms.lights.push(ShaderLight::from(default_light.values()));
    }
}
