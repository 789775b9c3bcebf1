use bevy_ecs::prelude::*;
use bevy_utils::tracing::info;
use loader::config_loader::LightsConfig;
use scene::{add_light_systems, light_schedule};
use scene::light::LightSource;
use scene::transform::Transform;
use scene::uniform::LightUniforms;

fn main() {
    let _guard = debug::setup_debugging();

    let config = LightsConfig::load("lights.json");
    config.apply_default_light();

    let mut world = World::new();
    let mut schedule = light_schedule();
    add_light_systems(&mut world, &mut schedule);

    let lights = config.spawn_lights(&mut world);
    info!("Spawned {} lights", lights.len());

    schedule.run(&mut world);
    log_uniforms(&world);

    // lift every light a bit, the next frame picks it up
    for entity in &lights {
        if let Some(mut transform) = world.get_mut::<Transform>(*entity) {
            transform.position.y += 1.0;
        }
    }
    schedule.run(&mut world);
    log_uniforms(&world);

    for entity in lights {
        if let Some(light) = world.get::<LightSource>(entity) {
            info!(?entity, values = ?light.values(), "light");
        }
    }
}

fn log_uniforms(world: &World) {
    let uniforms = world.resource::<LightUniforms>();
    info!(
        "Uploading {} lights ({} bytes)",
        uniforms.lights.len(),
        uniforms.as_bytes().len()
    );
    for light in &uniforms.lights {
        info!(?light);
    }
}
