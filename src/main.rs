use std::time::Duration;

use bevy::app::ScheduleRunnerPlugin;
use bevy::prelude::*;

use shooter_core::config::CombatConfig;
use shooter_core::hotreload::{HotReloadPlugin, DEFAULT_TUNING_PATH};
use shooter_core::logging::{init_tracing, CombatLogConfig};
use shooter_core::plugin::{CombatCorePlugin, CombatEventMessage, CombatWorldResource, TracerResource};
use shooter_core::rarity::ItemRarity;
use shooter_core::weapon::WeaponKind;

fn main() -> anyhow::Result<()> {
    init_tracing(&CombatLogConfig::default());

    let config = CombatConfig::load_or_default(DEFAULT_TUNING_PATH);

    App::new()
        .add_plugins(MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f64(
            1.0 / 60.0,
        ))))
        .add_plugins(CombatCorePlugin { config })
        .add_plugins(HotReloadPlugin::default())
        .add_systems(Startup, setup_arena)
        .add_systems(Update, (log_combat_events, player_fire))
        .run();

    Ok(())
}

#[derive(Resource)]
struct Arena {
    player: shooter_core::actors::ActorId,
}

/// One armed player facing a small group of enemies.
fn setup_arena(
    mut commands: Commands,
    world_res: Res<CombatWorldResource>,
    mut tracer: ResMut<TracerResource>,
) {
    let Ok(mut world) = world_res.0.write() else {
        return;
    };
    let player = world.spawn_player(Vec3::ZERO);
    world.give_weapon(player, WeaponKind::AssaultRifle, ItemRarity::Rare);
    for i in 0..3 {
        let position = Vec3::new(800.0, (i as f32 - 1.0) * 150.0, 0.0);
        let enemy = world.spawn_enemy(position);
        tracer.0.add(enemy, "spine", position, 45.0);
        tracer.0.add(enemy, "head", position + Vec3::Z * 60.0, 15.0);
        world.enter_agro_sphere(enemy, player);
    }
    commands.insert_resource(Arena { player });
    info!("Arena ready");
}

fn player_fire(world_res: Res<CombatWorldResource>, tracer: Res<TracerResource>, arena: Res<Arena>) {
    if let Ok(mut world) = world_res.0.write() {
        world.press_fire(arena.player, &tracer.0);
    }
}

fn log_combat_events(mut events: EventReader<CombatEventMessage>) {
    for CombatEventMessage(event) in events.read() {
        info!(event = event.name(), subject = ?event.subject(), "combat");
    }
}
