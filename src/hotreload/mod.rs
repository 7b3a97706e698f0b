//! Hot reload of combat tuning.
//!
//! Watches `config/combat.ron` with `notify`. A changed file is parsed and
//! validated before it replaces the running tuning; a bad file leaves the
//! previous tuning in place.

use bevy::prelude::*;
use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Mutex};

use crate::config::CombatConfig;
use crate::error::CombatResult;
use crate::plugin::CombatWorldResource;

pub const DEFAULT_TUNING_PATH: &str = "config/combat.ron";

pub struct HotReloadPlugin {
    pub path: PathBuf,
}

impl Default for HotReloadPlugin {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_TUNING_PATH),
        }
    }
}

impl Plugin for HotReloadPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(HotReloadState {
            watched_file: Some(self.path.clone()),
            ..Default::default()
        })
        .add_event::<TuningReloaded>()
        .add_systems(Startup, setup_tuning_watcher)
        .add_systems(Update, process_tuning_changes);
    }
}

#[derive(Resource, Default)]
pub struct HotReloadState {
    pub enabled: bool,
    pub watched_file: Option<PathBuf>,
    pub reload_count: u32,
    pub last_reload_success: bool,
    pub last_reload_time: f64,
    pub last_error: Option<String>,
}

#[derive(Event, Debug, Clone)]
pub struct TuningReloaded {
    pub path: PathBuf,
    pub success: bool,
    pub error: Option<String>,
}

#[derive(Resource)]
struct WatcherResource {
    _watcher: RecommendedWatcher,
    receiver: Arc<Mutex<Receiver<notify::Result<Event>>>>,
}

fn setup_tuning_watcher(mut commands: Commands, mut state: ResMut<HotReloadState>) {
    let Some(tuning_path) = state.watched_file.clone() else {
        return;
    };

    if !tuning_path.exists() {
        warn!("Tuning file not found: {:?}", tuning_path);
        state.enabled = false;
        return;
    }

    let (tx, rx): (
        Sender<notify::Result<Event>>,
        Receiver<notify::Result<Event>>,
    ) = channel();

    let mut watcher = match notify::recommended_watcher(tx) {
        Ok(w) => w,
        Err(e) => {
            error!("Failed to create file watcher: {}", e);
            state.enabled = false;
            return;
        }
    };

    let dir = match tuning_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    if let Err(e) = watcher.watch(&dir, RecursiveMode::NonRecursive) {
        error!("Failed to watch tuning directory: {}", e);
        state.enabled = false;
        return;
    }

    state.enabled = true;

    commands.insert_resource(WatcherResource {
        _watcher: watcher,
        receiver: Arc::new(Mutex::new(rx)),
    });

    info!("Hot-reload enabled for {:?}", tuning_path);
}

fn process_tuning_changes(
    watcher: Option<Res<WatcherResource>>,
    world: Option<Res<CombatWorldResource>>,
    mut state: ResMut<HotReloadState>,
    mut events: EventWriter<TuningReloaded>,
    time: Res<Time>,
) {
    let Some(watcher) = watcher else {
        return;
    };
    let Some(path) = state.watched_file.clone() else {
        return;
    };

    let mut changed = false;
    if let Ok(receiver) = watcher.receiver.lock() {
        while let Ok(result) = receiver.try_recv() {
            match result {
                Ok(event) => changed |= is_tuning_modify_event(&event, &path),
                Err(e) => warn!("File watcher error: {}", e),
            }
        }
    }
    if !changed {
        return;
    }

    info!("Tuning file modified, reloading...");
    let outcome = reload_tuning(&path);
    let reloaded = apply_reload(&mut state, outcome, time.elapsed_secs_f64(), |config| {
        if let Some(world) = &world {
            if let Ok(mut world) = world.0.write() {
                world.set_config(config);
            }
        }
    });
    events.send(reloaded);
}

/// Record a reload attempt and hand a valid tuning to `apply`.
fn apply_reload(
    state: &mut HotReloadState,
    outcome: CombatResult<CombatConfig>,
    now: f64,
    apply: impl FnOnce(CombatConfig),
) -> TuningReloaded {
    let path = state.watched_file.clone().unwrap_or_default();
    state.last_reload_time = now;
    match outcome {
        Ok(config) => {
            apply(config);
            state.reload_count += 1;
            state.last_reload_success = true;
            state.last_error = None;
            info!("Tuning reloaded (count: {})", state.reload_count);
            TuningReloaded {
                path,
                success: true,
                error: None,
            }
        }
        Err(e) => {
            let message = e.to_string();
            state.last_reload_success = false;
            state.last_error = Some(message.clone());
            error!("Tuning reload failed, keeping previous values: {}", message);
            TuningReloaded {
                path,
                success: false,
                error: Some(message),
            }
        }
    }
}

fn is_tuning_modify_event(event: &Event, watched: &Path) -> bool {
    let Some(name) = watched.file_name() else {
        return false;
    };
    (event.kind.is_modify() || matches!(event.kind, notify::EventKind::Create(_)))
        && event.paths.iter().any(|p| p.file_name() == Some(name))
}

pub fn reload_tuning(path: &Path) -> CombatResult<CombatConfig> {
    CombatConfig::load(path)
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HotReloadStatus {
    pub enabled: bool,
    pub watched_file: Option<String>,
    pub reload_count: u32,
    pub last_reload_success: bool,
    pub last_reload_time: f64,
    pub last_error: Option<String>,
}

impl HotReloadStatus {
    pub fn from_state(state: &HotReloadState) -> Self {
        Self {
            enabled: state.enabled,
            watched_file: state.watched_file.as_ref().map(|p| p.display().to_string()),
            reload_count: state.reload_count,
            last_reload_success: state.last_reload_success,
            last_reload_time: state.last_reload_time,
            last_error: state.last_error.clone(),
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    pub fn from_json(json: &str) -> Option<Self> {
        serde_json::from_str(json).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    fn modify_event(path: &str) -> Event {
        Event {
            kind: notify::EventKind::Modify(notify::event::ModifyKind::Data(
                notify::event::DataChange::Any,
            )),
            paths: vec![PathBuf::from(path)],
            attrs: Default::default(),
        }
    }

    fn watched_state() -> HotReloadState {
        HotReloadState {
            enabled: true,
            watched_file: Some(PathBuf::from(DEFAULT_TUNING_PATH)),
            ..Default::default()
        }
    }

    #[test]
    fn test_is_tuning_modify_event() {
        let watched = Path::new(DEFAULT_TUNING_PATH);
        assert!(is_tuning_modify_event(
            &modify_event("/abs/config/combat.ron"),
            watched
        ));
        assert!(!is_tuning_modify_event(
            &modify_event("config/other.ron"),
            watched
        ));

        let access = Event {
            kind: notify::EventKind::Access(notify::event::AccessKind::Any),
            paths: vec![PathBuf::from(DEFAULT_TUNING_PATH)],
            attrs: Default::default(),
        };
        assert!(!is_tuning_modify_event(&access, watched));
    }

    #[test]
    fn test_valid_reload_applies() {
        let mut temp = Builder::new().suffix(".ron").tempfile().unwrap();
        writeln!(temp, "(seed: 99, player: (max_health: 250.0))").unwrap();

        let mut state = watched_state();
        let mut applied = None;
        let event = apply_reload(&mut state, reload_tuning(temp.path()), 1.5, |c| {
            applied = Some(c)
        });

        assert!(event.success);
        assert_eq!(state.reload_count, 1);
        assert_eq!(state.last_reload_time, 1.5);
        let config = applied.unwrap();
        assert_eq!(config.seed, 99);
        assert_eq!(config.player.max_health, 250.0);
    }

    #[test]
    fn test_invalid_reload_keeps_previous() {
        let mut temp = Builder::new().suffix(".ron").tempfile().unwrap();
        writeln!(temp, "(player: (max_health: -5.0))").unwrap();

        let mut state = watched_state();
        let mut applied = false;
        let event = apply_reload(&mut state, reload_tuning(temp.path()), 2.0, |_| {
            applied = true
        });

        assert!(!event.success);
        assert!(!applied);
        assert_eq!(state.reload_count, 0);
        assert!(state.last_error.as_deref().unwrap().contains("max health"));
    }

    #[test]
    fn test_unparseable_reload_reports_error() {
        let mut temp = Builder::new().suffix(".ron").tempfile().unwrap();
        writeln!(temp, "(seed: ").unwrap();

        let mut state = watched_state();
        let event = apply_reload(&mut state, reload_tuning(temp.path()), 0.0, |_| {});
        assert!(!event.success);
        assert!(event.error.is_some());
        assert!(!state.last_reload_success);
    }

    #[test]
    fn test_hotreload_state_default() {
        let state = HotReloadState::default();
        assert!(!state.enabled);
        assert_eq!(state.reload_count, 0);
        assert!(state.watched_file.is_none());
    }

    #[test]
    fn test_hotreload_status_json() {
        let mut state = watched_state();
        state.reload_count = 5;
        state.last_reload_success = true;

        let json = HotReloadStatus::from_state(&state).to_json();
        assert!(json.contains("\"enabled\":true"));
        assert!(json.contains("\"reload_count\":5"));
        assert!(json.contains("combat.ron"));

        let restored = HotReloadStatus::from_json(&json).unwrap();
        assert_eq!(restored.reload_count, 5);
        assert!(restored.last_reload_success);
    }

    #[test]
    fn test_plugin_without_file_stays_disabled() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins).add_plugins(HotReloadPlugin {
            path: PathBuf::from("does/not/exist/combat.ron"),
        });
        app.update();
        assert!(!app.world().resource::<HotReloadState>().enabled);
    }
}
