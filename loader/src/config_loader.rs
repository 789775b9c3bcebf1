use std::path::Path;
use std::sync::PoisonError;

use bevy_ecs::prelude::{Entity, World};
use bevy_utils::tracing::{info, warn};
use nalgebra::{Point3, Vector4};
use scene::light::{attenuation_in_range, LightKind, LightSource, ATTENUATION_RANGE};
use scene::transform::{Transform, TransformBuilder};
use serde::{Deserialize, Serialize};

/// The lights of a scene, loaded from a json file.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LightsConfig {
    /// Overrides for the default light.
    #[serde(default)]
    pub default_light: Option<DefaultLightConfig>,
    #[serde(default)]
    pub lights: Vec<LightConfig>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DefaultLightConfig {
    #[serde(default)]
    pub kind: Option<LightKind>,
    #[serde(default)]
    pub color: Option<[f32; 4]>,
    #[serde(default)]
    pub attenuation: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LightConfig {
    pub kind: LightKind,
    pub position: [f32; 3],
    #[serde(default = "white")]
    pub color: [f32; 4],
    #[serde(default = "unit_attenuation")]
    pub attenuation: f32,
}

fn white() -> [f32; 4] {
    [1.0, 1.0, 1.0, 1.0]
}

fn unit_attenuation() -> f32 {
    1.0
}

fn warn_if_out_of_range(attenuation: f32) {
    if !attenuation_in_range(attenuation) {
        let (min, max) = ATTENUATION_RANGE;
        warn!(
            attenuation,
            min, max, "attenuation is outside of the supported range, keeping it anyways"
        );
    }
}

impl LightConfig {
    pub fn build(&self) -> (LightSource, Transform) {
        let transform = TransformBuilder::new()
            .position(Point3::from(self.position))
            .build();

        warn_if_out_of_range(self.attenuation);
        let mut light = LightSource::new();
        light.set_kind(self.kind);
        light.set_color(Vector4::from(self.color));
        light.set_attenuation(self.attenuation);
        light.follow(&transform);

        (light, transform)
    }
}

impl LightsConfig {
    /// Loads the config from `path`.
    /// A missing file gets created with the default config, a broken one is ignored.
    pub fn load<P>(path: P) -> Self
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();

        match std::fs::File::open(path) {
            Ok(file) => match serde_json::from_reader(file) {
                Ok(config) => config,
                Err(err) => {
                    warn!("Failed to parse {:?}, using the default lights: {}", path, err);
                    Self::default()
                }
            },
            Err(err) => {
                let config = Self::default();
                if path.exists() {
                    warn!("Failed to open {:?}, using the default lights: {}", path, err);
                    return config;
                }

                info!("Creating {:?} with the default lights", path);
                let written = std::fs::File::create(path)
                    .map_err(serde_json::Error::io)
                    .and_then(|file| serde_json::to_writer_pretty(file, &config));
                if let Err(err) = written {
                    warn!("Failed to write to {:?}: {}", path, err);
                }
                config
            }
        }
    }

    pub fn spawn_lights(&self, world: &mut World) -> Vec<Entity> {
        self.lights
            .iter()
            .map(|light_config| world.spawn(light_config.build()).id())
            .collect()
    }

    pub fn apply_default_light(&self) {
        let Some(overrides) = &self.default_light else {
            return;
        };

        let mut light = LightSource::default_light()
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(kind) = overrides.kind {
            light.set_kind(kind);
        }
        if let Some(color) = overrides.color {
            light.set_color(Vector4::from(color));
        }
        if let Some(attenuation) = overrides.attenuation {
            warn_if_out_of_range(attenuation);
            light.set_attenuation(attenuation);
        }
    }
}

impl Default for LightsConfig {
    fn default() -> Self {
        Self {
            default_light: None,
            lights: vec![LightConfig {
                kind: LightKind::Point,
                position: [0.0, 3.0, 0.0],
                color: white(),
                attenuation: unit_attenuation(),
            }],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_in_color_and_attenuation() {
        let config: LightsConfig =
            serde_json::from_str(r#"{ "lights": [{ "kind": "Spot", "position": [1, 2, 3] }] }"#)
                .unwrap();

        assert_eq!(config.default_light, None);
        assert_eq!(
            config.lights,
            vec![LightConfig {
                kind: LightKind::Spot,
                position: [1.0, 2.0, 3.0],
                color: [1.0, 1.0, 1.0, 1.0],
                attenuation: 1.0,
            }]
        );
    }

    #[test]
    fn rejects_unknown_fields() {
        let result = serde_json::from_str::<LightsConfig>(
            r#"{ "lights": [{ "kind": "Point", "position": [0, 0, 0], "intensity": 3 }] }"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn builds_lights_at_their_position() {
        let light_config = LightConfig {
            kind: LightKind::Point,
            position: [4.0, 5.0, 6.0],
            color: [0.1, 0.2, 0.3, 1.0],
            attenuation: 5000.0,
        };

        let (light, transform) = light_config.build();
        assert_eq!(transform.position, Point3::new(4.0, 5.0, 6.0));
        assert_eq!(light.values().position, Vector4::new(4.0, 5.0, 6.0, 1.0));
        assert_eq!(light.color(), Vector4::new(0.1, 0.2, 0.3, 1.0));
        // out of range values are kept
        assert_eq!(light.attenuation(), 5000.0);
    }

    #[test]
    fn spawns_every_configured_light() {
        let config: LightsConfig = serde_json::from_str(
            r#"{ "lights": [
                { "kind": "Point", "position": [0, 0, 0] },
                { "kind": "Sky", "position": [0, 1, 0], "attenuation": 0.5 }
            ] }"#,
        )
        .unwrap();

        let mut world = World::new();
        let entities = config.spawn_lights(&mut world);
        assert_eq!(entities.len(), 2);

        let sky = world.get::<LightSource>(entities[1]).unwrap();
        assert_eq!(sky.kind(), LightKind::Sky);
        assert_eq!(sky.attenuation(), 0.5);
        assert!(world.get::<Transform>(entities[1]).is_some());
    }

    #[test]
    fn applies_default_light_overrides() {
        let config: LightsConfig = serde_json::from_str(
            r#"{ "default_light": { "color": [0.5, 0.5, 0.5, 1.0], "attenuation": 20.0 } }"#,
        )
        .unwrap();
        assert!(config.lights.is_empty());

        config.apply_default_light();

        let light = LightSource::default_light()
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        assert_eq!(light.kind(), LightKind::Sky);
        assert_eq!(light.color(), Vector4::new(0.5, 0.5, 0.5, 1.0));
        assert_eq!(light.attenuation(), 20.0);
    }

    #[test]
    fn missing_file_gets_created_with_defaults() {
        let path = std::env::temp_dir().join(format!("lights-missing-{}.json", std::process::id()));
        let _ = std::fs::remove_file(&path);

        let config = LightsConfig::load(&path);
        assert_eq!(config, LightsConfig::default());
        assert!(path.exists());
        assert_eq!(LightsConfig::load(&path), LightsConfig::default());

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn broken_file_falls_back_to_defaults() {
        let path = std::env::temp_dir().join(format!("lights-broken-{}.json", std::process::id()));
        std::fs::write(&path, "{ not json").unwrap();

        assert_eq!(LightsConfig::load(&path), LightsConfig::default());

        std::fs::remove_file(&path).unwrap();
    }
}
