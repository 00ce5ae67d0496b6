//! Battle resolution, progression, and derived stats for Thornhold.
//!
//! This crate contains the logic layer for battles -- everything that turns
//! two [`Combatant`](thornhold_types::Combatant) snapshots and a turn count
//! into a [`BattleResult`](thornhold_types::BattleResult), without touching
//! I/O. It sits between `thornhold-types` (which defines the data
//! structures) and whatever hosts the engine (the sim binary, a game
//! server) which handles persistence and orchestration.
//!
//! Resolution is a single synchronous pass with a fixed calculator order:
//! eligibility, damage, fort damage, casualties, outcome aggregation. Every
//! randomized formula takes an injected `rng: &mut impl Rng`, so tests pin
//! outcomes with a seeded generator while production callers pass
//! `rand::rng()`.
//!
//! # Modules
//!
//! - [`casualties`] -- Binomial casualty sampling per unit stack
//! - [`config`] -- Tunable battle parameters ([`BattleConfig`])
//! - [`damage`] -- Raw damage rolls, level multipliers, level mitigation
//! - [`eligibility`] -- Level-gap and readiness pre-checks
//! - [`error`] -- Error types for all battle operations ([`EngineError`])
//! - [`experience`] -- Battle XP and the player level curve
//! - [`fortification`] -- Fort resilience constant and fort damage
//! - [`outcome`] -- Winner, pillage, hitpoints, and result assembly
//! - [`quota`] -- Attack rate limiting ([`AttackQuota`])
//! - [`repository`] -- Persistence collaborator boundaries
//! - [`stats`] -- Derived player statistics and the unit catalog

pub mod casualties;
pub mod config;
pub mod damage;
pub mod eligibility;
pub mod error;
pub mod experience;
pub mod fortification;
mod numeric;
pub mod outcome;
pub mod quota;
pub mod repository;
pub mod stats;

// Re-export primary types at crate root for convenience.
pub use config::BattleConfig;
pub use eligibility::{EngagementCheck, can_engage, check_engagement};
pub use error::EngineError;
pub use experience::{level_for_experience, xp_to_next_level};
pub use outcome::{apply_battle_outcome, build_battle_record, resolve_battle};
pub use quota::{AttackQuota, WindowQuota};
pub use repository::{
    BattleLogRepository, MemoryBattleLog, MemoryPlayers, PlayerRepository, PlayerUpdate,
    player_update_for,
};
pub use stats::{EngagementPreview, UNIT_CATALOG, UnitSpec, preview_engagement};
