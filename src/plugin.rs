use bevy::prelude::*;
use std::sync::{Arc, RwLock};

use crate::capabilities::{RecordingPresentation, SphereTracer};
use crate::config::CombatConfig;
use crate::events::CombatEvent;
use crate::world::CombatWorld;

/// Runs a `CombatWorld` inside a Bevy app and republishes its notifications
/// as Bevy events.
pub struct CombatCorePlugin {
    pub config: CombatConfig,
}

impl Default for CombatCorePlugin {
    fn default() -> Self {
        Self {
            config: CombatConfig::default(),
        }
    }
}

impl Plugin for CombatCorePlugin {
    fn build(&self, app: &mut App) {
        let world = CombatWorld::new(self.config.clone());

        app.insert_resource(CombatWorldResource(Arc::new(RwLock::new(world))))
            .insert_resource(TracerResource::default())
            .insert_resource(LastPresentation::default())
            .add_event::<CombatEventMessage>()
            .add_systems(Update, combat_tick_system);
    }
}

#[derive(Resource)]
pub struct CombatWorldResource(pub Arc<RwLock<CombatWorld>>);

/// Collision stand-in used for shot traces.
#[derive(Resource, Default)]
pub struct TracerResource(pub SphereTracer);

/// Presentation calls made during the last frame.
#[derive(Resource, Default)]
pub struct LastPresentation(pub RecordingPresentation);

#[derive(Event, Debug, Clone)]
pub struct CombatEventMessage(pub CombatEvent);

fn combat_tick_system(
    time: Res<Time>,
    world_res: Res<CombatWorldResource>,
    tracer: Res<TracerResource>,
    mut last: ResMut<LastPresentation>,
    mut events: EventWriter<CombatEventMessage>,
) {
    if let Ok(mut world) = world_res.0.write() {
        world.tick(time.delta_secs(), &tracer.0);
        for event in world.drain_events() {
            events.send(CombatEventMessage(event));
        }
        last.0 = world.presentation_mut().drain();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::math::Vec3;

    #[derive(Resource, Default)]
    struct Seen(Vec<&'static str>);

    fn collect(mut reader: EventReader<CombatEventMessage>, mut seen: ResMut<Seen>) {
        for msg in reader.read() {
            seen.0.push(msg.0.name());
        }
    }

    fn app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .add_plugins(CombatCorePlugin::default())
            .init_resource::<Seen>()
            .add_systems(Update, collect.after(combat_tick_system));
        app
    }

    #[test]
    fn test_plugin_inserts_world() {
        let mut app = app();
        app.update();
        assert!(app.world().get_resource::<CombatWorldResource>().is_some());
        assert!(app.world().get_resource::<TracerResource>().is_some());
    }

    #[test]
    fn test_world_events_become_bevy_events() {
        let mut app = app();
        {
            let res = app.world().resource::<CombatWorldResource>();
            let mut world = res.0.write().unwrap();
            world.spawn_player(Vec3::ZERO);
            world.spawn_enemy(Vec3::new(500.0, 0.0, 0.0));
        }
        app.update();

        let seen = &app.world().resource::<Seen>().0;
        assert_eq!(seen.iter().filter(|n| **n == "spawned").count(), 2);
        let res = app.world().resource::<CombatWorldResource>();
        assert!(res.0.read().unwrap().events().is_empty());
    }

    #[test]
    fn test_presentation_drained_each_frame() {
        let mut app = app();
        {
            let res = app.world().resource::<CombatWorldResource>();
            let mut world = res.0.write().unwrap();
            let enemy = world.spawn_enemy(Vec3::ZERO);
            world.apply_damage(enemy, 1000.0, None);
        }
        app.update();
        let last = &app.world().resource::<LastPresentation>().0;
        assert!(last
            .animations
            .iter()
            .any(|(_, cue)| cue.section == "DeathA"));
        let res = app.world().resource::<CombatWorldResource>();
        assert!(res.0.read().unwrap().presentation().is_empty());
    }
}
