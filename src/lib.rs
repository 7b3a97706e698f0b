//! Shooter Combat Core
//!
//! Deterministic combat and enemy-AI state for a third-person shooter:
//! - Health and balance pools, damage resolution with weak spots
//! - Player combat state machine (fire, reload, equip, dodge, sprint, stagger)
//! - Enemy state machine with blackboard publishing
//! - Weapons: fire cadence, spread, recoil, magazines, rarity scaling
//! - Inventory slots and carried ammo
//! - World arena with dropped weapons, explosives, projectiles and spawners
//! - Bevy plugin, tuning hot reload, and a C-ABI bridge for host engines

pub mod actors;
pub mod balance;
pub mod blackboard;
pub mod bridge;
pub mod capabilities;
pub mod config;
pub mod constants;
pub mod context;
pub mod damage;
pub mod enemy;
pub mod error;
pub mod events;
pub mod health;
pub mod hotreload;
pub mod logging;
pub mod player;
pub mod plugin;
pub mod rarity;
pub mod timers;
pub mod weapon;
pub mod world;
