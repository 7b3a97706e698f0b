//! C-ABI bridge for host engines.
//!
//! Worlds live in a process-wide registry and are addressed by `u64` handles;
//! actors cross as `ActorId::to_bits`. Structured data crosses as JSON.
//! All *_json functions return heap-allocated strings; the caller frees them
//! with `free_string`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use bevy::math::Vec3;
use tracing::{debug, warn};

use crate::actors::ActorId;
use crate::capabilities::{EmptyTracer, NullPresentation};
use crate::config::CombatConfig;
use crate::damage::{calculate_hit, HitCalculation, ShotProfile};
use crate::events::CombatEventMsg;
use crate::logging;
use crate::rarity::ItemRarity;
use crate::weapon::WeaponKind;
use crate::world::CombatWorld;

type BridgeWorld = CombatWorld<NullPresentation>;

static WORLDS: Mutex<BTreeMap<u64, BridgeWorld>> = Mutex::new(BTreeMap::new());
static NEXT_WORLD: AtomicU64 = AtomicU64::new(1);

/// 0 is never a valid world or actor handle.
pub const INVALID_HANDLE: u64 = 0;

// ========================
// Data transfer types
// ========================

/// Hit preview request
#[derive(Debug, Serialize, Deserialize)]
pub struct HitCalcRequest {
    pub damage: f32,
    pub weakspot_damage: f32,
    #[serde(default)]
    pub balance_damage: f32,
    pub bone: Option<String>,
    pub weakspot_bone: String,
}

/// Snapshot of one actor's vitals
#[derive(Debug, Serialize, Deserialize)]
pub struct ActorStatus {
    pub handle: u64,
    pub health: Option<f32>,
    pub max_health: Option<f32>,
    pub dead: bool,
    pub position: [f32; 3],
}

// ========================
// Helpers
// ========================

fn json_to_cstring<T: Serialize>(value: &T) -> *mut c_char {
    match serde_json::to_string(value) {
        Ok(json) => CString::new(json).unwrap_or_default().into_raw(),
        Err(_) => std::ptr::null_mut(),
    }
}

fn parse_cstr(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    unsafe { CStr::from_ptr(ptr).to_str().ok().map(|s| s.to_owned()) }
}

fn worlds() -> MutexGuard<'static, BTreeMap<u64, BridgeWorld>> {
    // poisoned: keep serving the surviving worlds
    WORLDS.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn with_world<R>(handle: u64, f: impl FnOnce(&mut BridgeWorld) -> R) -> Option<R> {
    let mut worlds = worlds();
    match worlds.get_mut(&handle) {
        Some(world) => Some(f(world)),
        None => {
            warn!(handle, "unknown world handle");
            None
        }
    }
}

fn actor(bits: u64) -> ActorId {
    ActorId::from_bits(bits)
}

fn rarity_from_id(id: u32) -> ItemRarity {
    ItemRarity::ALL
        .get(id as usize)
        .copied()
        .unwrap_or_default()
}

// ========================
// C-ABI: Core
// ========================

/// Version string
#[no_mangle]
pub extern "C" fn get_version() -> *mut c_char {
    CString::new(env!("CARGO_PKG_VERSION"))
        .unwrap_or_default()
        .into_raw()
}

/// Free a string allocated by Rust.
/// ptr must come from a prior call into this library, or be null.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        unsafe {
            drop(CString::from_raw(ptr));
        }
    }
}

/// Initialise logging at a level id (0=trace .. 4=error).
#[no_mangle]
pub extern "C" fn logging_init(level_id: u32) {
    logging::init_tracing(&logging::CombatLogConfig::uniform(logging::LogLevel::from_id(level_id)));
}

// ========================
// C-ABI: Tuning
// ========================

/// Default tuning as JSON
#[no_mangle]
pub extern "C" fn config_default_json() -> *mut c_char {
    json_to_cstring(&CombatConfig::default())
}

/// 1 if the JSON parses and validates, 0 otherwise.
#[no_mangle]
pub extern "C" fn config_validate_json(config_json: *const c_char) -> u32 {
    let Some(json) = parse_cstr(config_json) else {
        return 0;
    };
    match CombatConfig::from_json_str(&json).and_then(|c| c.validate().map(|_| c)) {
        Ok(_) => 1,
        Err(e) => {
            warn!("{}", e);
            0
        }
    }
}

// ========================
// C-ABI: Damage
// ========================

/// Preview the damage a bullet would deal for a bone hit.
#[no_mangle]
pub extern "C" fn calculate_hit_json(request_json: *const c_char) -> *mut c_char {
    let json_str = match parse_cstr(request_json) {
        Some(s) => s,
        None => return std::ptr::null_mut(),
    };

    let request: HitCalcRequest = match serde_json::from_str(&json_str) {
        Ok(r) => r,
        Err(_) => return std::ptr::null_mut(),
    };

    let profile = ShotProfile {
        damage: request.damage,
        weakspot_damage: request.weakspot_damage,
        balance_damage: request.balance_damage,
    };
    let result: HitCalculation =
        calculate_hit(&profile, request.bone.as_deref(), &request.weakspot_bone);
    json_to_cstring(&result)
}

// ========================
// C-ABI: Worlds
// ========================

/// Create a world with default tuning and the given RNG seed.
#[no_mangle]
pub extern "C" fn world_create(seed: u64) -> u64 {
    let config = CombatConfig {
        seed,
        ..Default::default()
    };
    let handle = NEXT_WORLD.fetch_add(1, Ordering::Relaxed);
    worlds().insert(handle, CombatWorld::with_presentation(config, NullPresentation));
    handle
}

/// Create a world from tuning JSON. Returns 0 if the tuning is rejected.
#[no_mangle]
pub extern "C" fn world_create_with_config(config_json: *const c_char) -> u64 {
    let Some(json) = parse_cstr(config_json) else {
        return INVALID_HANDLE;
    };
    let config = match CombatConfig::from_json_str(&json).and_then(|c| c.validate().map(|_| c)) {
        Ok(c) => c,
        Err(e) => {
            warn!("{}", e);
            return INVALID_HANDLE;
        }
    };
    let handle = NEXT_WORLD.fetch_add(1, Ordering::Relaxed);
    worlds().insert(handle, CombatWorld::with_presentation(config, NullPresentation));
    handle
}

/// 1 if a world was destroyed.
#[no_mangle]
pub extern "C" fn world_destroy(world: u64) -> u32 {
    worlds().remove(&world).is_some() as u32
}

#[no_mangle]
pub extern "C" fn world_tick(world: u64, dt: f32) -> u32 {
    if !dt.is_finite() || dt < 0.0 {
        return 0;
    }
    with_world(world, |w| w.tick(dt, &EmptyTracer)).is_some() as u32
}

#[no_mangle]
pub extern "C" fn world_spawn_player(world: u64, x: f32, y: f32, z: f32) -> u64 {
    with_world(world, |w| w.spawn_player(Vec3::new(x, y, z)).to_bits()).unwrap_or(INVALID_HANDLE)
}

#[no_mangle]
pub extern "C" fn world_spawn_enemy(world: u64, x: f32, y: f32, z: f32) -> u64 {
    with_world(world, |w| w.spawn_enemy(Vec3::new(x, y, z)).to_bits()).unwrap_or(INVALID_HANDLE)
}

#[no_mangle]
pub extern "C" fn world_spawn_explosive(world: u64, x: f32, y: f32, z: f32) -> u64 {
    with_world(world, |w| w.spawn_explosive(Vec3::new(x, y, z)).to_bits())
        .unwrap_or(INVALID_HANDLE)
}

/// Place a pickup; kind ids follow `WeaponKind::ALL`, rarity ids `ItemRarity::ALL`.
#[no_mangle]
pub extern "C" fn world_spawn_weapon(
    world: u64,
    kind_id: u32,
    rarity_id: u32,
    x: f32,
    y: f32,
    z: f32,
) -> u64 {
    let Some(kind) = WeaponKind::from_id(kind_id) else {
        return INVALID_HANDLE;
    };
    with_world(world, |w| {
        w.spawn_weapon_pickup(kind, rarity_from_id(rarity_id), Vec3::new(x, y, z))
            .map(ActorId::to_bits)
    })
    .flatten()
    .unwrap_or(INVALID_HANDLE)
}

#[no_mangle]
pub extern "C" fn world_despawn(world: u64, actor_bits: u64) -> u32 {
    with_world(world, |w| w.despawn(actor(actor_bits))).unwrap_or(false) as u32
}

#[no_mangle]
pub extern "C" fn world_give_weapon(world: u64, player: u64, kind_id: u32, rarity_id: u32) -> u32 {
    let Some(kind) = WeaponKind::from_id(kind_id) else {
        return 0;
    };
    with_world(world, |w| {
        w.give_weapon(actor(player), kind, rarity_from_id(rarity_id))
    })
    .unwrap_or(false) as u32
}

#[no_mangle]
pub extern "C" fn world_pickup_weapon(world: u64, player: u64, item: u64) -> u32 {
    with_world(world, |w| w.pickup_weapon(actor(player), actor(item))).unwrap_or(false) as u32
}

/// Damage actually applied; 0 for unknown handles or rejected damage.
#[no_mangle]
pub extern "C" fn world_apply_damage(world: u64, target: u64, amount: f32, instigator: u64) -> f32 {
    if !amount.is_finite() {
        return 0.0;
    }
    let instigator = (instigator != INVALID_HANDLE).then(|| actor(instigator));
    with_world(world, |w| w.apply_damage(actor(target), amount, instigator)).unwrap_or(0.0)
}

#[no_mangle]
pub extern "C" fn world_detonate(world: u64, explosive: u64) -> u32 {
    with_world(world, |w| w.detonate(actor(explosive), None)).unwrap_or(false) as u32
}

#[no_mangle]
pub extern "C" fn world_reload(world: u64, player: u64) -> u32 {
    with_world(world, |w| w.reload(actor(player))).unwrap_or(false) as u32
}

#[no_mangle]
pub extern "C" fn world_dodge(world: u64, player: u64) -> u32 {
    with_world(world, |w| w.dodge(actor(player))).unwrap_or(false) as u32
}

#[no_mangle]
pub extern "C" fn world_toggle_sprint(world: u64, player: u64) -> u32 {
    with_world(world, |w| w.toggle_sprint(actor(player))).unwrap_or(false) as u32
}

#[no_mangle]
pub extern "C" fn world_enemy_aggro(world: u64, enemy: u64, player: u64) -> u32 {
    with_world(world, |w| {
        if w.enemy(actor(enemy)).is_none() || w.player(actor(player)).is_none() {
            return false;
        }
        w.enter_agro_sphere(actor(enemy), actor(player));
        true
    })
    .unwrap_or(false) as u32
}

/// Vitals for one actor, or null for unknown handles.
#[no_mangle]
pub extern "C" fn world_actor_status_json(world: u64, actor_bits: u64) -> *mut c_char {
    let status = with_world(world, |w| match w.try_actor(actor(actor_bits)) {
        Ok(a) => Some(ActorStatus {
            handle: actor_bits,
            health: a.health().map(|h| h.current()),
            max_health: a.health().map(|h| h.max()),
            dead: a.health().is_some_and(|h| h.is_dead()),
            position: a.position().to_array(),
        }),
        Err(e) => {
            debug!("{}", e);
            None
        }
    })
    .flatten();
    match status {
        Some(s) => json_to_cstring(&s),
        None => std::ptr::null_mut(),
    }
}

/// Notifications since the last drain, oldest first.
#[no_mangle]
pub extern "C" fn world_drain_events_json(world: u64) -> *mut c_char {
    match with_world(world, |w| {
        w.drain_events()
            .iter()
            .map(CombatEventMsg::from)
            .collect::<Vec<_>>()
    }) {
        Some(events) => json_to_cstring(&events),
        None => std::ptr::null_mut(),
    }
}
