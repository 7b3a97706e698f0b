//! Logging setup for the combat core.
//!
//! Each combat subsystem has its own verbosity. Player and enemy state
//! transitions log at `debug`, rejected player actions at `trace`, deaths
//! and staggers at `info`. Setting `RUST_LOG` replaces the whole filter.

use std::sync::Once;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }

    /// Level from a foreign integer id; unknown ids fall back to `Info`.
    pub fn from_id(id: u32) -> Self {
        match id {
            0 => LogLevel::Trace,
            1 => LogLevel::Debug,
            3 => LogLevel::Warn,
            4 => LogLevel::Error,
            _ => LogLevel::Info,
        }
    }
}

/// Verbosity per combat subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CombatLogConfig {
    /// Everything outside the combat core, Bevy included
    pub default: LogLevel,
    pub player: LogLevel,
    pub enemy: LogLevel,
    /// Damage routing, projectiles, explosives and spawners
    pub world: LogLevel,
    /// Stale handles and bad JSON from the host
    pub bridge: LogLevel,
    pub hotreload: LogLevel,
}

impl Default for CombatLogConfig {
    fn default() -> Self {
        Self {
            default: LogLevel::Info,
            player: LogLevel::Info,
            enemy: LogLevel::Info,
            world: LogLevel::Info,
            bridge: LogLevel::Warn,
            hotreload: LogLevel::Info,
        }
    }
}

impl CombatLogConfig {
    /// Same level everywhere; what a host picks through the C interface.
    pub fn uniform(level: LogLevel) -> Self {
        Self {
            default: level,
            player: level,
            enemy: level,
            world: level,
            bridge: level,
            hotreload: level,
        }
    }

    /// `EnvFilter` directives, one per subsystem module.
    pub fn directives(&self) -> String {
        let subsystems = [
            ("player", self.player),
            ("enemy", self.enemy),
            ("world", self.world),
            ("bridge", self.bridge),
            ("hotreload", self.hotreload),
        ];
        let mut parts = vec![self.default.as_str().to_string()];
        parts.extend(
            subsystems
                .iter()
                .map(|(module, level)| format!("shooter_core::{}={}", module, level.as_str())),
        );
        parts.join(",")
    }
}

static TRACING_INIT: Once = Once::new();

/// First call wins; later calls are no-ops.
pub fn init_tracing(config: &CombatLogConfig) {
    let directives = config.directives();
    TRACING_INIT.call_once(move || {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&directives));

        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .compact();

        // a host engine may already own the global subscriber
        let _ = subscriber.try_init();
    });
}
