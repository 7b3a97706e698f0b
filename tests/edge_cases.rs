//! Edge case & boundary tests
//!
//! Gameplay rules at their boundaries:
//! - Weak-spot scaling with rarity
//! - Balance depletion and the stagger it causes, under both reset policies
//! - Reload bookkeeping against the carried-ammo pool
//! - Rejected actions leave state untouched
//! - Timers die with their actor
//! - Spawner and explosive behaviour

use bevy::math::Vec3;

use shooter_core::actors::ActorId;
use shooter_core::balance::BalanceResetPolicy;
use shooter_core::capabilities::{EmptyTracer, HitResult};
use shooter_core::config::CombatConfig;
use shooter_core::damage::ShotProfile;
use shooter_core::enemy::EnemyState;
use shooter_core::events::CombatEvent;
use shooter_core::player::CombatState;
use shooter_core::rarity::ItemRarity;
use shooter_core::timers::TimerPurpose;
use shooter_core::weapon::{AmmoType, WeaponKind};
use shooter_core::world::CombatWorld;

// ============================================================
// Helpers
// ============================================================

/// Enemies never hit-react, dodge or roar, so state checks are exact.
fn quiet_config() -> CombatConfig {
    let mut config = CombatConfig::default();
    config.enemy.hit_react_chance = 0.0;
    config.enemy.dodge_chance = 0.0;
    config.enemy.roar_chance = 0.0;
    config
}

fn quiet_world() -> CombatWorld {
    CombatWorld::new(quiet_config())
}

fn body_hit(world: &mut CombatWorld, enemy: ActorId, profile: ShotProfile) {
    world.route_bullet_hit(&HitResult::on_actor(enemy, "spine", Vec3::ZERO), profile, None);
}

fn armed_rifle(world: &mut CombatWorld) -> ActorId {
    let player = world.spawn_player(Vec3::ZERO);
    assert!(world.give_weapon(player, WeaponKind::AssaultRifle, ItemRarity::Damaged));
    player
}

/// Empty the magazine and set the carried rifle ammo to `carried`.
fn set_ammo(world: &mut CombatWorld, player: ActorId, magazine: u32, carried: u32) {
    let p = world.player_mut(player).unwrap();
    let weapon = p.equipped_weapon().unwrap().clone().with_ammo(magazine);
    *p.inventory.equipped_mut().unwrap() = weapon;
    p.ammo.take(AmmoType::AssaultRifle, u32::MAX);
    p.ammo.add(AmmoType::AssaultRifle, carried);
}

fn magazine(world: &CombatWorld, player: ActorId) -> u32 {
    world.player(player).unwrap().equipped_weapon().unwrap().ammo()
}

fn finish_reload(world: &mut CombatWorld) {
    let duration = world.config().player.reload_duration;
    world.tick(duration + 0.01, &EmptyTracer);
}

// ============================================================
// 1. Weak-spot scaling
// ============================================================

#[test]
fn test_weakspot_and_body_damage() {
    let mut world = quiet_world();
    let profile = ShotProfile {
        damage: 20.0,
        weakspot_damage: 50.0,
        balance_damage: 0.0,
    };
    let head = world.spawn_enemy(Vec3::ZERO);
    let body = world.spawn_enemy(Vec3::X * 200.0);

    world.route_bullet_hit(&HitResult::on_actor(head, "head", Vec3::ZERO), profile, None);
    body_hit(&mut world, body, profile);

    assert_eq!(world.enemy(head).unwrap().health.current(), 50.0);
    assert_eq!(world.enemy(body).unwrap().health.current(), 80.0);
}

#[test]
fn test_weakspot_damage_scaled_by_rarity() {
    let mut config = quiet_config();
    config.enemy.max_health = 1000.0;
    let mut world = CombatWorld::new(config);
    let rifle = world
        .config()
        .build_weapon(WeaponKind::AssaultRifle, ItemRarity::Rare)
        .unwrap();
    let scale = world.config().rarity_multiplier(ItemRarity::Rare);
    assert!(scale > 1.0);

    let enemy = world.spawn_enemy(Vec3::ZERO);
    world.route_bullet_hit(
        &HitResult::on_actor(enemy, "head", Vec3::ZERO),
        ShotProfile::from(&rifle),
        None,
    );
    let health = world.enemy(enemy).unwrap().health.current();
    assert!((1000.0 - health - 50.0 * scale).abs() < 1e-3);

    body_hit(&mut world, enemy, ShotProfile::from(&rifle));
    let after = world.enemy(enemy).unwrap().health.current();
    assert!((health - after - 20.0 * scale).abs() < 1e-3);
}

#[test]
fn test_empty_weakspot_bone_never_matches() {
    let mut config = quiet_config();
    config.enemy.weakspot_bone = String::new();
    let mut world = CombatWorld::new(config);
    let enemy = world.spawn_enemy(Vec3::ZERO);
    let profile = ShotProfile {
        damage: 20.0,
        weakspot_damage: 50.0,
        balance_damage: 0.0,
    };
    world.route_bullet_hit(&HitResult::on_actor(enemy, "", Vec3::ZERO), profile, None);
    assert_eq!(world.enemy(enemy).unwrap().health.current(), 80.0);
}

// ============================================================
// 2. Balance and stagger
// ============================================================

#[test]
fn test_third_forty_point_hit_staggers() {
    let mut world = quiet_world();
    let enemy = world.spawn_enemy(Vec3::ZERO);
    let heavy = ShotProfile {
        damage: 1.0,
        weakspot_damage: 1.0,
        balance_damage: 40.0,
    };

    body_hit(&mut world, enemy, heavy);
    body_hit(&mut world, enemy, heavy);
    assert_eq!(world.enemy(enemy).unwrap().state(), EnemyState::Unoccupied);
    assert_eq!(world.enemy(enemy).unwrap().balance.current(), 20.0);

    body_hit(&mut world, enemy, heavy);
    let e = world.enemy(enemy).unwrap();
    assert_eq!(e.state(), EnemyState::Staggered);
    assert_eq!(e.balance.current(), 100.0, "immediate policy refills");
    assert!(world
        .events()
        .iter()
        .any(|ev| matches!(ev, CombatEvent::Stagger { actor } if *actor == enemy)));
}

#[test]
fn test_balance_ignored_while_staggered() {
    let mut world = quiet_world();
    let enemy = world.spawn_enemy(Vec3::ZERO);
    let breaker = ShotProfile {
        damage: 1.0,
        weakspot_damage: 1.0,
        balance_damage: 100.0,
    };
    body_hit(&mut world, enemy, breaker);
    assert_eq!(world.enemy(enemy).unwrap().state(), EnemyState::Staggered);

    body_hit(&mut world, enemy, breaker);
    let e = world.enemy(enemy).unwrap();
    assert_eq!(e.balance.current(), 100.0);
    assert_eq!(e.health.current(), 98.0, "health still takes damage");

    let stagger = world.config().enemy.stagger_duration;
    world.tick(stagger + 0.01, &EmptyTracer);
    assert_eq!(world.enemy(enemy).unwrap().state(), EnemyState::Unoccupied);
}

#[test]
fn test_rushing_enemy_cannot_be_staggered() {
    let mut world = quiet_world();
    let enemy = world.spawn_enemy(Vec3::ZERO);
    assert!(world.rush_attack_start(enemy));
    body_hit(
        &mut world,
        enemy,
        ShotProfile {
            damage: 1.0,
            weakspot_damage: 1.0,
            balance_damage: 150.0,
        },
    );
    let e = world.enemy(enemy).unwrap();
    assert_eq!(e.state(), EnemyState::Rushing);
    assert_eq!(e.balance.current(), 100.0);
}

#[test]
fn test_five_hit_scenario_with_on_recover() {
    let mut config = quiet_config();
    config.balance_reset = BalanceResetPolicy::OnRecover;
    let mut world = CombatWorld::new(config);
    let enemy = world.spawn_enemy(Vec3::ZERO);
    let shot = ShotProfile {
        damage: 20.0,
        weakspot_damage: 50.0,
        balance_damage: 25.0,
    };

    let expected_balance = [75.0, 50.0, 25.0, 0.0, 0.0];
    let expected_health = [80.0, 60.0, 40.0, 20.0, 0.0];
    for hit in 0..5 {
        body_hit(&mut world, enemy, shot);
        let e = world.enemy(enemy).unwrap();
        assert_eq!(e.balance.current(), expected_balance[hit], "balance after hit {}", hit + 1);
        assert_eq!(e.health.current(), expected_health[hit], "health after hit {}", hit + 1);
        let state = e.state();
        match hit {
            0..=2 => assert_eq!(state, EnemyState::Unoccupied),
            3 => assert_eq!(state, EnemyState::Staggered),
            _ => assert_eq!(state, EnemyState::Dead),
        }
    }
    let deaths = world
        .events()
        .iter()
        .filter(|ev| matches!(ev, CombatEvent::Death { actor } if *actor == enemy))
        .count();
    assert_eq!(deaths, 1);
}

#[test]
fn test_five_hit_scenario_with_default_policy() {
    let config = quiet_config();
    assert_eq!(config.balance_reset, BalanceResetPolicy::Immediate);
    let mut world = CombatWorld::new(config);
    let enemy = world.spawn_enemy(Vec3::ZERO);
    let shot = ShotProfile {
        damage: 20.0,
        weakspot_damage: 50.0,
        balance_damage: 25.0,
    };

    // the meter refills as the 4th hit staggers; the 5th hit kills
    let expected_balance = [75.0, 50.0, 25.0, 100.0, 100.0];
    let expected_health = [80.0, 60.0, 40.0, 20.0, 0.0];
    for hit in 0..5 {
        body_hit(&mut world, enemy, shot);
        let e = world.enemy(enemy).unwrap();
        assert_eq!(e.balance.current(), expected_balance[hit], "balance after hit {}", hit + 1);
        assert_eq!(e.health.current(), expected_health[hit], "health after hit {}", hit + 1);
        let state = e.state();
        match hit {
            0..=2 => assert_eq!(state, EnemyState::Unoccupied),
            3 => assert_eq!(state, EnemyState::Staggered),
            _ => assert_eq!(state, EnemyState::Dead),
        }
    }
    let staggers = world
        .events()
        .iter()
        .filter(|ev| matches!(ev, CombatEvent::Stagger { .. }))
        .count();
    let deaths = world
        .events()
        .iter()
        .filter(|ev| matches!(ev, CombatEvent::Death { actor } if *actor == enemy))
        .count();
    assert_eq!((staggers, deaths), (1, 1));
}

#[test]
fn test_killing_blow_skips_balance() {
    let mut world = quiet_world();
    let enemy = world.spawn_enemy(Vec3::ZERO);
    body_hit(
        &mut world,
        enemy,
        ShotProfile {
            damage: 100.0,
            weakspot_damage: 100.0,
            balance_damage: 100.0,
        },
    );
    let e = world.enemy(enemy).unwrap();
    assert_eq!(e.state(), EnemyState::Dead);
    assert_eq!(e.balance.current(), 100.0);
    assert!(!world
        .events()
        .iter()
        .any(|ev| matches!(ev, CombatEvent::Stagger { .. })));
}

// ============================================================
// 3. Reload bookkeeping
// ============================================================

#[test]
fn test_reload_with_short_pool() {
    let mut world = quiet_world();
    let player = armed_rifle(&mut world);
    set_ammo(&mut world, player, 0, 10);

    assert!(world.reload(player));
    assert_eq!(world.player(player).unwrap().state(), CombatState::Reloading);
    finish_reload(&mut world);

    assert_eq!(magazine(&world, player), 10);
    assert_eq!(world.player(player).unwrap().carried_ammo(AmmoType::AssaultRifle), 0);
    assert_eq!(world.player(player).unwrap().state(), CombatState::Unoccupied);
}

#[test]
fn test_reload_with_deep_pool() {
    let mut world = quiet_world();
    let player = armed_rifle(&mut world);
    set_ammo(&mut world, player, 0, 50);

    assert!(world.reload(player));
    finish_reload(&mut world);

    assert_eq!(magazine(&world, player), 30);
    assert_eq!(world.player(player).unwrap().carried_ammo(AmmoType::AssaultRifle), 20);
}

#[test]
fn test_reload_rejected_when_full() {
    let mut world = quiet_world();
    let player = armed_rifle(&mut world);
    let carried = world.player(player).unwrap().carried_ammo(AmmoType::AssaultRifle);

    assert!(!world.reload(player));
    assert_eq!(world.player(player).unwrap().state(), CombatState::Unoccupied);
    assert_eq!(magazine(&world, player), 30);
    assert_eq!(world.player(player).unwrap().carried_ammo(AmmoType::AssaultRifle), carried);
    assert!(!world.timers().is_pending(player, TimerPurpose::Reload));
}

#[test]
fn test_reload_rejected_with_empty_pool() {
    let mut world = quiet_world();
    let player = armed_rifle(&mut world);
    set_ammo(&mut world, player, 5, 0);
    assert!(!world.reload(player));
    assert_eq!(magazine(&world, player), 5);
}

#[test]
fn test_ammo_pickup_reloads_empty_weapon() {
    let mut world = quiet_world();
    let player = armed_rifle(&mut world);
    set_ammo(&mut world, player, 0, 0);

    world.pickup_ammo(player, AmmoType::AssaultRifle, 12);
    assert_eq!(world.player(player).unwrap().state(), CombatState::Reloading);
    finish_reload(&mut world);
    assert_eq!(magazine(&world, player), 12);
}

#[test]
fn test_huge_ammo_pickup_saturates() {
    let mut world = quiet_world();
    let player = armed_rifle(&mut world);
    set_ammo(&mut world, player, 0, 0);

    world.pickup_ammo(player, AmmoType::AssaultRifle, u32::MAX);
    world.pickup_ammo(player, AmmoType::AssaultRifle, u32::MAX);
    assert_eq!(
        world.player(player).unwrap().carried_ammo(AmmoType::AssaultRifle),
        u32::MAX
    );
    finish_reload(&mut world);
    let capacity = world.player(player).unwrap().equipped_weapon().unwrap().magazine_capacity();
    assert_eq!(magazine(&world, player), capacity);
}

// ============================================================
// 4. Rejected actions
// ============================================================

#[test]
fn test_fire_rejected_while_reloading() {
    let mut world = quiet_world();
    let player = armed_rifle(&mut world);
    set_ammo(&mut world, player, 3, 40);
    assert!(world.reload(player));

    assert!(!world.fire(player, &EmptyTracer));
    assert_eq!(world.player(player).unwrap().state(), CombatState::Reloading);
    assert_eq!(magazine(&world, player), 3);
}

#[test]
fn test_dodge_discards_reload() {
    let mut world = quiet_world();
    let player = armed_rifle(&mut world);
    set_ammo(&mut world, player, 3, 40);
    assert!(world.reload(player));

    assert!(world.dodge(player));
    assert_eq!(world.player(player).unwrap().state(), CombatState::Dodging);
    assert!(!world.timers().is_pending(player, TimerPurpose::Reload));

    finish_reload(&mut world);
    assert_eq!(magazine(&world, player), 3, "discarded reload never completes");
    assert_eq!(world.player(player).unwrap().carried_ammo(AmmoType::AssaultRifle), 40);
}

#[test]
fn test_second_dodge_waits_for_cooldown() {
    let mut world = quiet_world();
    let player = world.spawn_player(Vec3::ZERO);
    assert!(world.dodge(player));
    let duration = world.config().player.dodge_duration;
    world.tick(duration + 0.01, &EmptyTracer);
    assert_eq!(world.player(player).unwrap().state(), CombatState::Unoccupied);
    assert!(!world.dodge(player), "cooldown still running");

    let cooldown = world.config().player.dodge_cooldown;
    world.tick(cooldown, &EmptyTracer);
    assert!(world.dodge(player));
}

#[test]
fn test_sprint_needs_stamina() {
    let mut world = quiet_world();
    let player = world.spawn_player(Vec3::ZERO);
    world
        .player_mut(player)
        .unwrap()
        .stamina
        .consume(90.0);
    assert!(!world.toggle_sprint(player));
    assert_eq!(world.player(player).unwrap().state(), CombatState::Unoccupied);
}

#[test]
fn test_weapon_switch_requires_second_weapon() {
    let mut world = quiet_world();
    let player = armed_rifle(&mut world);
    assert!(!world.next_weapon(player));
    assert!(!world.switch_to_slot(player, 3));
    assert_eq!(world.player(player).unwrap().state(), CombatState::Unoccupied);
}

// ============================================================
// 5. Timers and death
// ============================================================

#[test]
fn test_player_death_clears_timers() {
    let mut world = quiet_world();
    let player = armed_rifle(&mut world);
    set_ammo(&mut world, player, 0, 30);
    assert!(world.reload(player));
    assert!(world.timers().pending_for(player) > 0);

    let dealt = world.apply_damage(player, 500.0, None);
    assert_eq!(dealt, 100.0);
    assert_eq!(world.player(player).unwrap().state(), CombatState::Dead);
    assert_eq!(world.timers().pending_for(player), 0);

    finish_reload(&mut world);
    assert_eq!(magazine(&world, player), 0);
    assert_eq!(world.apply_damage(player, 10.0, None), 0.0);
    assert!(!world.reload(player));
}

#[test]
fn test_despawned_actor_is_stale() {
    let mut world = quiet_world();
    let enemy = world.spawn_enemy(Vec3::ZERO);
    assert!(world.despawn(enemy));
    assert!(!world.contains(enemy));
    assert_eq!(world.apply_damage(enemy, 10.0, None), 0.0);

    let replacement = world.spawn_enemy(Vec3::ZERO);
    assert_eq!(replacement.index, enemy.index);
    assert!(world.enemy(enemy).is_none());
    assert!(world.enemy(replacement).is_some());
}

// ============================================================
// 6. Spawner and explosive
// ============================================================

#[test]
fn test_spawner_full_wave() {
    let mut config = quiet_config();
    config.spawner.count = 4;
    let mut world = CombatWorld::new(config);
    let player = world.spawn_player(Vec3::ZERO);
    let spawner = world.spawn_spawner(Vec3::new(0.0, 2000.0, 0.0));

    assert!(world.player_enter_spawner(spawner, player));
    for _ in 0..20 {
        world.tick(0.25, &EmptyTracer);
    }
    assert_eq!(world.enemy_ids().len(), 4);
    assert!(world.timers().pending_for(spawner) == 0);
}

#[test]
fn test_shot_explosive_damages_everyone_in_radius() {
    let mut world = quiet_world();
    let player = world.spawn_player(Vec3::new(0.0, 0.0, 0.0));
    let near = world.spawn_enemy(Vec3::new(100.0, 0.0, 0.0));
    let outside = world.spawn_enemy(Vec3::new(5000.0, 0.0, 0.0));
    let barrel = world.spawn_explosive(Vec3::new(50.0, 0.0, 0.0));

    world.route_bullet_hit(
        &HitResult::on_actor(barrel, "body", Vec3::new(50.0, 0.0, 0.0)),
        ShotProfile {
            damage: 10.0,
            weakspot_damage: 10.0,
            balance_damage: 0.0,
        },
        Some(player),
    );

    assert!(!world.contains(barrel));
    assert!(world.player(player).unwrap().is_dead());
    assert!(world.enemy(near).unwrap().is_dead());
    assert_eq!(world.enemy(outside).unwrap().health.current(), 100.0);
    assert!(world
        .events()
        .iter()
        .any(|ev| matches!(ev, CombatEvent::Exploded { actor, .. } if *actor == barrel)));
}

#[test]
fn test_shipped_tuning_file_loads() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config/combat.ron");
    let config = CombatConfig::load(path).unwrap();
    assert!(config.validate().is_ok());
    assert_eq!(config.enemy.weakspot_bone, "head");
}
