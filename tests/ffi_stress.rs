//! Fuzz-style stress tests for the C ABI.
//!
//! Rapid-fire calls, extreme inputs, malformed JSON, stale handles and
//! concurrent access must never crash or panic.

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

use shooter_core::bridge::*;

// ============================================================
// Helpers
// ============================================================

fn cstr(s: &str) -> CString {
    CString::new(s).unwrap()
}

fn is_valid_json(ptr: *mut c_char) -> bool {
    if ptr.is_null() {
        return false;
    }
    let s = unsafe { CStr::from_ptr(ptr) }.to_str().unwrap_or("");
    let valid = serde_json::from_str::<serde_json::Value>(s).is_ok();
    free_string(ptr);
    valid
}

fn ptr_to_string(ptr: *mut c_char) -> String {
    if ptr.is_null() {
        return String::new();
    }
    let s = unsafe { CStr::from_ptr(ptr) }
        .to_str()
        .unwrap_or("")
        .to_owned();
    free_string(ptr);
    s
}

// ============================================================
// Rapid-fire stress
// ============================================================

const RAPID_ITERS: usize = 200;

#[test]
fn stress_version_rapid() {
    for _ in 0..RAPID_ITERS {
        assert!(!ptr_to_string(get_version()).is_empty());
    }
}

#[test]
fn stress_calculate_hit_rapid() {
    for i in 0..RAPID_ITERS {
        let bone = if i % 2 == 0 { "head" } else { "spine" };
        let req = cstr(&format!(
            r#"{{"damage":{},"weakspot_damage":{},"bone":"{}","weakspot_bone":"head"}}"#,
            i,
            i * 2,
            bone
        ));
        let json = ptr_to_string(calculate_hit_json(req.as_ptr()));
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let expected = if i % 2 == 0 { i * 2 } else { i };
        assert_eq!(value["amount"].as_f64().unwrap() as usize, expected);
    }
}

#[test]
fn stress_world_create_destroy_rapid() {
    let mut handles = Vec::with_capacity(RAPID_ITERS);
    for i in 0..RAPID_ITERS {
        let world = world_create(i as u64);
        assert_ne!(world, INVALID_HANDLE);
        handles.push(world);
    }
    handles.sort_unstable();
    handles.dedup();
    assert_eq!(handles.len(), RAPID_ITERS, "world handles are unique");
    for world in handles {
        assert_eq!(world_destroy(world), 1);
    }
}

#[test]
fn stress_world_tick_and_drain() {
    let world = world_create(11);
    let player = world_spawn_player(world, 0.0, 0.0, 0.0);
    assert_eq!(world_give_weapon(world, player, 0, 1), 1);
    for i in 0..RAPID_ITERS {
        let enemy = world_spawn_enemy(world, i as f32, 500.0, 0.0);
        world_apply_damage(world, enemy, 150.0, player);
        assert_eq!(world_tick(world, 1.0 / 60.0), 1);
        assert!(is_valid_json(world_drain_events_json(world)));
    }
    // corpses expire
    for _ in 0..20 {
        world_tick(world, 1.0);
    }
    let json = ptr_to_string(world_drain_events_json(world));
    let events: Vec<serde_json::Value> = serde_json::from_str(&json).unwrap();
    let despawned = events.iter().filter(|e| e["kind"] == "despawned").count();
    assert_eq!(despawned, RAPID_ITERS);
    world_destroy(world);
}

// ============================================================
// Null and malformed inputs
// ============================================================

#[test]
fn null_inputs_return_null_or_zero() {
    assert!(calculate_hit_json(std::ptr::null()).is_null());
    assert_eq!(config_validate_json(std::ptr::null()), 0);
    assert_eq!(world_create_with_config(std::ptr::null()), INVALID_HANDLE);
    free_string(std::ptr::null_mut());
}

#[test]
fn malformed_json_is_rejected() {
    for input in ["", "{", "[]", "null", r#"{"damage":"x"}"#, "\u{1F4A5}"] {
        let c = cstr(input);
        assert!(calculate_hit_json(c.as_ptr()).is_null(), "input {:?}", input);
    }
    for input in ["", "{", "null", r#"{"seed":-1}"#, r#"{"weapons":[{"name":1}]}"#] {
        let c = cstr(input);
        assert_eq!(config_validate_json(c.as_ptr()), 0, "input {:?}", input);
    }
}

#[test]
fn config_roundtrips_through_ffi() {
    let json = ptr_to_string(config_default_json());
    let c = cstr(&json);
    assert_eq!(config_validate_json(c.as_ptr()), 1);
    let world = world_create_with_config(c.as_ptr());
    assert_ne!(world, INVALID_HANDLE);
    world_destroy(world);
}

// ============================================================
// Extreme values and stale handles
// ============================================================

#[test]
fn extreme_values_do_not_panic() {
    let world = world_create(u64::MAX);
    let enemy = world_spawn_enemy(world, f32::MAX, f32::MIN, 0.0);
    assert_eq!(world_apply_damage(world, enemy, f32::NAN, INVALID_HANDLE), 0.0);
    assert_eq!(world_apply_damage(world, enemy, f32::INFINITY, INVALID_HANDLE), 0.0);
    assert_eq!(world_apply_damage(world, enemy, -10.0, INVALID_HANDLE), 0.0);
    assert_eq!(world_tick(world, f32::NAN), 0);
    assert_eq!(world_tick(world, -1.0), 0);
    assert_eq!(world_tick(world, 0.0), 1);
    assert_eq!(world_give_weapon(world, enemy, u32::MAX, u32::MAX), 0);
    assert_eq!(world_spawn_weapon(world, u32::MAX, 0, 0.0, 0.0, 0.0), INVALID_HANDLE);
    world_destroy(world);
}

#[test]
fn unknown_handles_are_harmless() {
    for handle in [INVALID_HANDLE, u64::MAX, 0xDEAD_BEEF] {
        assert_eq!(world_tick(handle, 0.1), 0);
        assert_eq!(world_spawn_player(handle, 0.0, 0.0, 0.0), INVALID_HANDLE);
        assert_eq!(world_apply_damage(handle, 1, 10.0, 0), 0.0);
        assert!(world_drain_events_json(handle).is_null());
        assert_eq!(world_destroy(handle), 0);
    }

    let world = world_create(3);
    for actor in [INVALID_HANDLE, u64::MAX, 1 << 40] {
        assert_eq!(world_reload(world, actor), 0);
        assert_eq!(world_dodge(world, actor), 0);
        assert_eq!(world_detonate(world, actor), 0);
        assert!(world_actor_status_json(world, actor).is_null());
    }
    world_destroy(world);
}

#[test]
fn pickup_and_explosive_through_ffi() {
    let world = world_create(5);
    let player = world_spawn_player(world, 0.0, 0.0, 0.0);
    let item = world_spawn_weapon(world, 2, 4, 10.0, 0.0, 0.0);
    assert_ne!(item, INVALID_HANDLE);
    assert_eq!(world_pickup_weapon(world, player, item), 1);
    assert_eq!(world_pickup_weapon(world, player, item), 0, "item is gone");

    let enemy = world_spawn_enemy(world, 100.0, 0.0, 0.0);
    assert_eq!(world_enemy_aggro(world, enemy, player), 1);
    assert_eq!(world_enemy_aggro(world, player, enemy), 0);

    let barrel = world_spawn_explosive(world, 100.0, 50.0, 0.0);
    assert_eq!(world_detonate(world, barrel), 1);
    assert_eq!(world_detonate(world, barrel), 0);
    let status: serde_json::Value =
        serde_json::from_str(&ptr_to_string(world_actor_status_json(world, enemy))).unwrap();
    assert_eq!(status["dead"], true);
    world_destroy(world);
}

// ============================================================
// Concurrency
// ============================================================

#[test]
fn concurrent_worlds() {
    let threads: Vec<_> = (0..8)
        .map(|t| {
            std::thread::spawn(move || {
                let world = world_create(t);
                let player = world_spawn_player(world, 0.0, 0.0, 0.0);
                world_give_weapon(world, player, 1, 0);
                for _ in 0..50 {
                    let enemy = world_spawn_enemy(world, 0.0, 300.0, 0.0);
                    world_apply_damage(world, enemy, 30.0, player);
                    world_tick(world, 0.016);
                    assert!(is_valid_json(world_drain_events_json(world)));
                }
                world_destroy(world)
            })
        })
        .collect();
    for handle in threads {
        assert_eq!(handle.join().unwrap(), 1);
    }
}
