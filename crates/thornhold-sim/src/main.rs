//! Battle simulation binary for Thornhold.
//!
//! Seeds two players, resolves a configurable number of battles between
//! them, applies each outcome, and logs the running state. This is the
//! end-to-end exercise of the engine: eligibility, quota, resolution,
//! outcome application, and battle logging all run exactly as a game server
//! would drive them.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Load configuration from `thornhold-sim.yaml` if present
//! 3. Seed the RNG (fixed seed from config, or OS entropy)
//! 4. Spawn the two seed players
//! 5. Run the battle loop
//! 6. Log the summary

mod spawner;

use std::path::Path;

use anyhow::Context;
use chrono::Utc;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde::Deserialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use thornhold_engine::{
    AttackQuota, BattleConfig, BattleLogRepository, MemoryBattleLog, WindowQuota,
    apply_battle_outcome, build_battle_record, check_engagement, resolve_battle,
};
use thornhold_types::Side;

/// Simulation parameters loaded from `thornhold-sim.yaml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct SimConfig {
    /// How many battles to attempt.
    battles: u32,
    /// Attack turns spent per battle.
    turns: u32,
    /// Fixed RNG seed; omit for OS entropy.
    seed: Option<u64>,
    /// Battle formula tunables.
    battle: BattleConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            battles: 10,
            turns: 10,
            seed: None,
            battle: BattleConfig::default(),
        }
    }
}

/// Load the simulation config, falling back to defaults when no file exists.
fn load_config() -> anyhow::Result<SimConfig> {
    let path = Path::new("thornhold-sim.yaml");
    if !path.exists() {
        return Ok(SimConfig::default());
    }
    let raw = std::fs::read_to_string(path).context("reading thornhold-sim.yaml")?;
    serde_yml::from_str(&raw).context("parsing thornhold-sim.yaml")
}

/// Application entry point for the battle simulation.
fn main() -> anyhow::Result<()> {
    // 1. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("thornhold-sim starting");

    // 2. Load configuration.
    let config = load_config()?;
    info!(
        battles = config.battles,
        turns = config.turns,
        seed = ?config.seed,
        "Configuration loaded"
    );

    // 3. Seed the RNG.
    let mut rng = config
        .seed
        .map_or_else(SmallRng::from_os_rng, SmallRng::seed_from_u64);

    // 4. Spawn the two seed players.
    let mut attacker = spawner::spawn_player(150, 5000, &mut rng, &config.battle);
    let mut defender = spawner::spawn_player(300, 8000, &mut rng, &config.battle);
    info!(
        attacker = %attacker.player_id,
        attacker_offense = attacker.offense,
        defender = %defender.player_id,
        defender_defense = defender.defense,
        "Seed players spawned"
    );

    // 5. Run the battle loop.
    let mut quota = WindowQuota::default();
    let mut log = MemoryBattleLog::new();
    let mut attacker_wins: u32 = 0;

    for round in 1..=config.battles {
        let check = check_engagement(&attacker, &defender, &config.battle);
        if !check.eligible {
            warn!(round, denial = ?check.denial, "Engagement denied");
            break;
        }

        let now = Utc::now();
        if !quota.may_engage(attacker.player_id, defender.player_id, now) {
            warn!(round, "Attack quota exhausted for this window");
            break;
        }

        let result = resolve_battle(&attacker, &defender, config.turns, &mut rng, &config.battle)?;
        let record = build_battle_record(&attacker, &defender, &result, now);
        apply_battle_outcome(&mut attacker, &mut defender, &result);
        quota.record_attack(attacker.player_id, defender.player_id, now);

        if result.winner == Side::Attacker {
            attacker_wins = attacker_wins.saturating_add(1);
        }

        info!(
            round,
            winner = ?result.winner,
            attacker_damage = result.attacker_damage,
            defender_damage = result.defender_damage,
            fort_damage = result.fort_damage,
            xp = result.xp_earned,
            pillage = result.gold_pillaged,
            defender_fort_hp = result.defender_fort_hp,
            leveled_up = result.leveled_up,
            "Battle resolved"
        );

        log.record(record);
    }

    // 6. Log the summary.
    let fought = log.history_for(attacker.player_id).len();
    info!(
        battles_fought = fought,
        attacker_wins,
        attacker_gold = attacker.gold,
        defender_gold = defender.gold,
        attacker_xp = attacker.experience,
        defender_fort_hp = defender.fort_hitpoints.current,
        "Simulation complete"
    );

    Ok(())
}
