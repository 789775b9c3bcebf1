use bevy_ecs::prelude::*;
use bevy_ecs::schedule::ExecutorKind;
use light::sync_light_positions;
use uniform::{upload_light_uniforms, LightUniforms};

pub mod light;
pub mod transform;
pub mod uniform;

/// A schedule that runs its systems on the calling thread, one after another.
pub fn light_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.set_executor_kind(ExecutorKind::SingleThreaded);
    schedule
}

/// Registers the per frame light systems. Positions get synced before the uniforms are packed.
pub fn add_light_systems(world: &mut World, schedule: &mut Schedule) {
    world.init_resource::<LightUniforms>();
    schedule
        .add_system(sync_light_positions)
        .add_system(upload_light_uniforms.after(sync_light_positions));
}
