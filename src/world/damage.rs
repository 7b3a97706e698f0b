//! Bullet-hit routing, direct damage, explosions and enemy melee.

use bevy::math::Vec3;
use tracing::{debug, info};

use crate::actors::ActorId;
use crate::balance::BalanceOutcome;
use crate::blackboard::BlackboardKey;
use crate::capabilities::{HitResult, ParticleKind, Presentation};
use crate::damage::{resolve_hit, BulletHitKind, Damageable, ResolvedHit, ShotProfile};
use crate::events::CombatEvent;

use super::{Actor, CombatWorld};

impl<P: Presentation> CombatWorld<P> {
    /// Dispatch one bullet impact on the struck actor's hit capability.
    pub fn route_bullet_hit(&mut self, hit: &HitResult, profile: ShotProfile, instigator: Option<ActorId>) {
        self.presentation
            .spawn_particles_at(hit.location, ParticleKind::Impact);
        let Some(target) = hit.actor else {
            return;
        };
        let Some(kind) = self.actors.get(target).map(Actor::bullet_hit_kind) else {
            return;
        };
        match kind {
            BulletHitKind::Enemy => {
                self.resolve_shot(target, &profile, hit.bone.as_deref(), hit.location, instigator);
            }
            BulletHitKind::Explosive => {
                self.detonate(target, instigator);
            }
            BulletHitKind::Generic => {}
        }
    }

    /// Weak spot, health, hit number, balance and the enemy's reaction, in that order.
    pub fn resolve_shot(
        &mut self,
        target: ActorId,
        profile: &ShotProfile,
        bone: Option<&str>,
        location: Vec3,
        instigator: Option<ActorId>,
    ) -> Option<ResolvedHit> {
        let (actors, mut ctx) = self.parts();
        let Some(Actor::Enemy(enemy)) = actors.get_mut(target) else {
            return None;
        };
        let hit = resolve_hit(&mut **enemy, profile, bone, location, instigator)?;
        ctx.emit(CombatEvent::HitNumber {
            target,
            amount: hit.amount,
            location,
            weakspot: hit.weakspot,
        });
        ctx.emit(CombatEvent::Damaged {
            target,
            amount: hit.amount,
            instigator,
            remaining: enemy.health.current(),
        });
        ctx.presentation
            .spawn_particles_at(location, ParticleKind::Blood);
        if hit.balance == Some(BalanceOutcome::Depleted) {
            enemy.stagger(target, &mut ctx);
        }
        enemy.on_damaged(target, hit.killed, &mut ctx);
        Some(hit)
    }

    /// Apply raw damage to a player or enemy. Returns the amount actually removed.
    pub fn apply_damage(&mut self, target: ActorId, amount: f32, instigator: Option<ActorId>) -> f32 {
        let (actors, mut ctx) = self.parts();
        let Some(actor) = actors.get_mut(target) else {
            return 0.0;
        };
        let (taken, remaining, player_killed) = match actor {
            Actor::Player(player) => {
                if !player.can_take_damage() {
                    return 0.0;
                }
                let taken = player.take_damage(amount, instigator);
                if taken.killed {
                    player.die(target, &mut ctx);
                }
                (taken, player.health.current(), taken.killed)
            }
            Actor::Enemy(enemy) => {
                if !enemy.can_take_damage() {
                    return 0.0;
                }
                let taken = enemy.take_damage(amount, instigator);
                enemy.on_damaged(target, taken.killed, &mut ctx);
                (taken, enemy.health.current(), false)
            }
            _ => return 0.0,
        };
        ctx.emit(CombatEvent::Damaged {
            target,
            amount: taken.applied,
            instigator,
            remaining,
        });
        if player_killed {
            if let Some(Actor::Enemy(killer)) = instigator.and_then(|id| actors.get_mut(id)) {
                killer.blackboard.set_bool(BlackboardKey::CharacterIsDead, true);
            }
        }
        taken.applied
    }

    /// Blow up an explosive: radial falloff damage to every character in range.
    pub fn detonate(&mut self, explosive: ActorId, instigator: Option<ActorId>) -> bool {
        let ex = match self.actors.get(explosive) {
            Some(Actor::Explosive(ex)) => *ex,
            _ => return false,
        };
        self.presentation
            .spawn_particles_at(ex.position, ParticleKind::Explosion);
        self.events.push(CombatEvent::Exploded {
            actor: explosive,
            location: ex.position,
            radius: ex.radius,
        });
        self.remove_actor(explosive);

        let victims: Vec<(ActorId, f32)> = self
            .actors
            .iter()
            .filter(|(_, actor)| matches!(actor, Actor::Player(_) | Actor::Enemy(_)))
            .map(|(id, actor)| (id, actor.position().distance(ex.position)))
            .filter(|(_, distance)| *distance <= ex.radius)
            .collect();
        info!(?explosive, victims = victims.len(), "explosion");
        for (id, distance) in victims {
            let amount = ex.damage_at(distance);
            debug!(?id, distance, amount, "explosion damage");
            self.apply_damage(id, amount, instigator);
        }
        true
    }

    // =========================================================================
    // Enemy actions
    // =========================================================================

    /// An enemy's swing connected with a player.
    pub fn melee_hit(&mut self, enemy: ActorId, player: ActorId) -> f32 {
        let Some(damage) = self.enemy(enemy).filter(|e| !e.is_dead()).map(|e| e.attack_damage) else {
            return 0.0;
        };
        if !self.player(player).is_some_and(|p| p.can_take_damage()) {
            return 0.0;
        }
        let applied = self.apply_damage(player, damage, Some(enemy));
        if self.player(player).is_some_and(|p| p.is_dead()) {
            self.with_enemy(enemy, |e, ctx| e.taunt(enemy, ctx));
        } else {
            self.with_player(player, |p, ctx| p.on_melee_hit(player, ctx));
        }
        applied
    }

    pub fn enter_agro_sphere(&mut self, enemy: ActorId, player: ActorId) {
        if self.player(player).is_none() {
            return;
        }
        self.with_enemy(enemy, |e, _| e.enter_agro_sphere(player));
    }

    pub fn enter_combat_range(&mut self, enemy: ActorId) {
        self.with_enemy(enemy, |e, _| e.enter_combat_range());
    }

    pub fn exit_combat_range(&mut self, enemy: ActorId) {
        self.with_enemy(enemy, |e, _| e.exit_combat_range());
    }

    pub fn attack_player(&mut self, enemy: ActorId, section: Option<&str>) -> bool {
        self.with_enemy(enemy, |e, ctx| e.attack_player(enemy, section, ctx))
            .unwrap_or(false)
    }

    pub fn rush_attack_start(&mut self, enemy: ActorId) -> bool {
        self.with_enemy(enemy, |e, ctx| e.rush_attack_start(enemy, ctx))
            .unwrap_or(false)
    }

    pub fn rush_attack_end(&mut self, enemy: ActorId) {
        self.with_enemy(enemy, |e, _| e.rush_attack_end());
    }

    /// Attack, roar, dodge or taunt montage ended.
    pub fn finish_enemy_action(&mut self, enemy: ActorId) {
        self.with_enemy(enemy, |e, ctx| e.finish_enemy_action(enemy, ctx));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capabilities::EmptyTracer;
    use crate::enemy::EnemyState;
    use crate::player::CombatState;

    const BODY: ShotProfile = ShotProfile {
        damage: 20.0,
        weakspot_damage: 50.0,
        balance_damage: 25.0,
    };

    fn quiet_world() -> CombatWorld {
        let mut config = crate::config::CombatConfig::default();
        config.enemy.hit_react_chance = 0.0;
        config.enemy.dodge_chance = 0.0;
        config.enemy.roar_chance = 0.0;
        CombatWorld::new(config)
    }

    fn hit_on(target: ActorId, bone: &str) -> HitResult {
        HitResult::on_actor(target, bone, Vec3::ZERO)
    }

    #[test]
    fn test_generic_hit_only_spawns_impact() {
        let mut world = quiet_world();
        let player = world.spawn_player(Vec3::ZERO);
        world.drain_events();
        world.route_bullet_hit(&hit_on(player, "spine"), BODY, None);
        assert!(world.events().is_empty());
        assert_eq!(world.player(player).unwrap().health.current(), 100.0);
        assert_eq!(world.presentation().particles, vec![(Vec3::ZERO, ParticleKind::Impact)]);

        world.route_bullet_hit(&HitResult::world(Vec3::ONE), BODY, None);
        assert_eq!(world.presentation().particles.len(), 2);
    }

    #[test]
    fn test_weakspot_hit_reports_bonus() {
        let mut world = quiet_world();
        let enemy = world.spawn_enemy(Vec3::ZERO);
        world.route_bullet_hit(&hit_on(enemy, "head"), BODY, None);
        assert_eq!(world.enemy(enemy).unwrap().health.current(), 50.0);
        assert!(world.events().iter().any(|e| matches!(
            e,
            CombatEvent::HitNumber { amount, weakspot: true, .. } if *amount == 50.0
        )));
    }

    #[test]
    fn test_balance_break_staggers_enemy() {
        let mut world = quiet_world();
        let enemy = world.spawn_enemy(Vec3::ZERO);
        let heavy = ShotProfile {
            damage: 1.0,
            weakspot_damage: 1.0,
            balance_damage: 40.0,
        };
        for _ in 0..2 {
            world.route_bullet_hit(&hit_on(enemy, "spine"), heavy, None);
        }
        assert_eq!(world.enemy(enemy).unwrap().state(), EnemyState::Unoccupied);
        world.route_bullet_hit(&hit_on(enemy, "spine"), heavy, None);
        assert_eq!(world.enemy(enemy).unwrap().state(), EnemyState::Staggered);
        assert_eq!(world.enemy(enemy).unwrap().balance.current(), 100.0);

        world.tick(world.config().enemy.stagger_duration + 0.01, &EmptyTracer);
        assert_eq!(world.enemy(enemy).unwrap().state(), EnemyState::Unoccupied);
    }

    #[test]
    fn test_shot_sets_target_to_shooter() {
        let mut world = quiet_world();
        let player = world.spawn_player(Vec3::ZERO);
        let enemy = world.spawn_enemy(Vec3::X * 500.0);
        world.route_bullet_hit(&hit_on(enemy, "spine"), BODY, Some(player));
        assert_eq!(world.enemy(enemy).unwrap().target(), Some(player));
    }

    #[test]
    fn test_explosive_falloff_and_self_destruct() {
        let mut world = quiet_world();
        let barrel = world.spawn_explosive(Vec3::ZERO);
        let near = world.spawn_enemy(Vec3::new(100.0, 0.0, 0.0));
        let mid = world.spawn_enemy(Vec3::new(325.0, 0.0, 0.0));
        let far = world.spawn_enemy(Vec3::new(900.0, 0.0, 0.0));

        world.route_bullet_hit(&hit_on(barrel, ""), BODY, None);
        assert!(world.actor(barrel).is_none());
        assert!(world.enemy(near).unwrap().is_dead());
        assert!((world.enemy(mid).unwrap().health.current() - 45.0).abs() < 1e-3);
        assert_eq!(world.enemy(far).unwrap().health.current(), 100.0);
        assert!(world
            .events()
            .iter()
            .any(|e| matches!(e, CombatEvent::Exploded { actor, .. } if *actor == barrel)));
        assert!(!world.detonate(barrel, None), "already gone");
    }

    #[test]
    fn test_melee_respects_iframes() {
        let mut world = quiet_world();
        let player = world.spawn_player(Vec3::ZERO);
        let enemy = world.spawn_enemy(Vec3::X);
        assert!(world.dodge(player));
        assert_eq!(world.melee_hit(enemy, player), 0.0);
        assert_eq!(world.player(player).unwrap().health.current(), 100.0);
    }

    #[test]
    fn test_melee_staggers_then_kill_taunts() {
        let mut world = quiet_world();
        let player = world.spawn_player(Vec3::ZERO);
        let enemy = world.spawn_enemy(Vec3::X);
        assert_eq!(world.melee_hit(enemy, player), 20.0);
        assert_eq!(world.player(player).unwrap().state(), CombatState::Staggered);

        for _ in 0..4 {
            world.melee_hit(enemy, player);
        }
        let p = world.player(player).unwrap();
        assert!(p.is_dead());
        assert_eq!(p.state(), CombatState::Dead);
        let e = world.enemy(enemy).unwrap();
        assert_eq!(e.state(), EnemyState::Taunting);
        assert!(e.blackboard.get_bool(BlackboardKey::CharacterIsDead));
        assert_eq!(world.apply_damage(player, 10.0, None), 0.0, "dead player takes nothing");
    }

    #[test]
    fn test_dead_enemy_expires() {
        let mut world = quiet_world();
        let enemy = world.spawn_enemy(Vec3::ZERO);
        world.apply_damage(enemy, 100.0, None);
        assert!(world.enemy(enemy).unwrap().is_dead());
        world.tick(crate::constants::ENEMY_CORPSE_LIFESPAN + 0.1, &EmptyTracer);
        assert!(world.actor(enemy).is_none());
    }
}
