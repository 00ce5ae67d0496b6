//! Raw damage computation from offense scores, level gap, and turn count.
//!
//! Damage is computed symmetrically: each side rolls against its own offense
//! score with the multiplier taken from the level gap between the two
//! players. The level multiplier table is a fixed balancing curve and is
//! intentionally non-monotonic -- a one-level gap *reduces* damage while
//! larger gaps amplify it.

use rand::Rng;

use crate::config::BattleConfig;
use crate::numeric::{floor_to_u64, to_f64};

/// Damage multipliers indexed by the clamped level difference.
///
/// Index 0 is an equal-level fight. The dip at index 1 and the climb to 2.0
/// at index 5 are deliberate game balance; preserve the table exactly.
const LEVEL_MULTIPLIERS: [f64; 6] = [1.0, 0.5, 0.8, 1.2, 1.5, 2.0];

/// Look up the damage multiplier for a level pairing.
///
/// The absolute level difference is clamped to the table range, so gaps of
/// five or more all map to the final entry.
pub fn level_multiplier(attacker_level: u32, defender_level: u32) -> f64 {
    let diff = attacker_level.abs_diff(defender_level).min(5);
    let index = usize::try_from(diff).unwrap_or(5);
    LEVEL_MULTIPLIERS.get(index).copied().unwrap_or(1.0)
}

/// Roll the base damage uniformly from the window around the offense score.
///
/// The window is `[offense - spread, offense + spread]` inclusive, floored
/// at zero for low offense scores.
pub fn roll_base_damage(offense: u64, rng: &mut impl Rng, config: &BattleConfig) -> u64 {
    let low = offense.saturating_sub(config.damage_spread);
    let high = offense.saturating_add(config.damage_spread);
    rng.random_range(low..=high)
}

/// Compute one side's raw damage for this battle.
///
/// Formula:
/// - base damage uniform in `[offense - 1, offense + 1]`
/// - level multiplier from [`level_multiplier`]
/// - turn multiplier `turns / 10`
/// - result floored to whole damage
pub fn compute_damage(
    offense: u64,
    own_level: u32,
    opponent_level: u32,
    turns: u32,
    rng: &mut impl Rng,
    config: &BattleConfig,
) -> u64 {
    let base = roll_base_damage(offense, rng, config);
    let multiplier = level_multiplier(own_level, opponent_level);
    let turn_multiplier = f64::from(turns) / f64::from(config.turn_scale.max(1));
    floor_to_u64(to_f64(base) * multiplier * turn_multiplier)
}

/// Pillage mitigation for attackers far above the defender's level.
///
/// Attacks from more than `max_level_gap` levels above retain
/// `0.96^(gap - max_level_gap)` of the projected pillage; everyone else
/// retains the full amount.
pub fn level_mitigation(attacker_level: u32, defender_level: u32, config: &BattleConfig) -> f64 {
    let ceiling = defender_level.saturating_add(config.max_level_gap);
    if attacker_level <= ceiling {
        return 1.0;
    }
    let excess = attacker_level.saturating_sub(ceiling);
    let retention = f64::from(config.mitigation_retention_pct) / 100.0;
    let exponent = i32::try_from(excess).unwrap_or(i32::MAX);
    retention.powi(exponent)
}
