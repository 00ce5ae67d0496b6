//! Outcome aggregation: winner, pillage, fort hitpoints, and the final
//! battle result.
//!
//! [`resolve_battle`] is the single entry point for a resolution. It runs
//! the calculators in their fixed order -- damage, fort damage, casualties,
//! experience, pillage, hitpoints -- and assembles one immutable
//! [`BattleResult`]. Nothing here touches the caller's snapshots.
//!
//! The caller is responsible for:
//! - Running the eligibility check and the quota check before resolving
//! - Applying the result to persisted state (see [`apply_battle_outcome`])
//! - Recording the battle log entry (see [`build_battle_record`])
//! - Serializing resolutions per player: at most one in-flight resolution
//!   per player, or two results will race on the same persisted state

use chrono::{DateTime, Utc};
use rand::Rng;

use thornhold_types::{
    BattleId, BattleRecord, BattleResult, BattleStats, CasualtyLine, Combatant, ItemStack, Side,
    UnitStack, UnitType,
};

use crate::casualties::compute_casualties;
use crate::config::BattleConfig;
use crate::damage::compute_damage;
use crate::error::EngineError;
use crate::experience::{xp_earned, xp_to_next_level};
use crate::fortification::compute_fort_damage;
use crate::numeric::{floor_to_u32, floor_to_u64, round_to_u64, to_f64};
use crate::stats::{defensive_unit_count, offensive_unit_count};

/// Divisor converting an offense score into fort hitpoint attrition.
const HP_OFFENSE_DIVISOR: f64 = 10.0;

/// Determine the winner from the opposing scores.
///
/// The attacker must *strictly* beat the defender's defense; ties go to the
/// defender. This defender bias on equal scores is a hard invariant.
pub const fn determine_winner(attacker_offense: u64, defender_defense: u64) -> Side {
    if attacker_offense > defender_defense {
        Side::Attacker
    } else {
        Side::Defender
    }
}

/// Roll the gold pillaged from the defender.
///
/// Formula: `floor(random() * (defender_gold * 0.8 + 1))` scaled by
/// `turns / 100` and floored again, clamped to the defender's gold. Returns
/// zero when the defender holds nothing.
pub fn compute_pillage(
    defender_gold: u64,
    turns: u32,
    rng: &mut impl Rng,
    config: &BattleConfig,
) -> u64 {
    if defender_gold == 0 {
        return 0;
    }
    let stake = to_f64(defender_gold) * f64::from(config.pillage_cap_pct) / 100.0 + 1.0;
    let roll = floor_to_u64(rng.random::<f64>() * stake);
    let scaled = to_f64(roll) * f64::from(turns) / f64::from(config.pillage_turn_scale.max(1));
    floor_to_u64(scaled).min(defender_gold)
}

/// Fort hitpoint attrition from an offense score.
fn offense_hp_loss(offense: u64) -> u32 {
    floor_to_u32(to_f64(offense) / HP_OFFENSE_DIVISOR)
}

/// Compute both sides' fort hitpoints after the battle.
///
/// The winner's fort is spared the opposing attrition: an attacker that
/// wins keeps its current hitpoints, while a losing attacker takes
/// `defender_offense / 10`. The defender always takes `attacker_offense /
/// 10` plus the fort damage term. Both floor at zero.
pub fn compute_fort_hitpoints(
    attacker: &Combatant,
    defender: &Combatant,
    winner: Side,
    fort_damage: u32,
) -> (u32, u32) {
    let attacker_hp = match winner {
        Side::Attacker => attacker.fort_hitpoints.current,
        Side::Defender => attacker
            .fort_hitpoints
            .current
            .saturating_sub(offense_hp_loss(defender.offense)),
    };
    let defender_hp = defender
        .fort_hitpoints
        .current
        .saturating_sub(offense_hp_loss(attacker.offense))
        .saturating_sub(fort_damage);
    (attacker_hp, defender_hp)
}

/// Resolve a battle between two combatant snapshots.
///
/// Runs the full calculator pipeline and returns the immutable result. The
/// snapshots are only read; apply the result with
/// [`apply_battle_outcome`]. Defender damage is clamped to a minimum of 1
/// before it serves as a denominator, per the engine contract.
///
/// # Errors
///
/// Returns [`EngineError::InvalidTurns`] for a zero turn count, and
/// propagates calculator errors (which the clamping above makes
/// unreachable through this entry point).
pub fn resolve_battle(
    attacker: &Combatant,
    defender: &Combatant,
    turns: u32,
    rng: &mut impl Rng,
    config: &BattleConfig,
) -> Result<BattleResult, EngineError> {
    if turns == 0 {
        return Err(EngineError::InvalidTurns { turns });
    }

    let attacker_damage = compute_damage(
        attacker.offense,
        attacker.level,
        defender.level,
        turns,
        rng,
        config,
    );
    let defender_damage = compute_damage(
        defender.offense,
        defender.level,
        attacker.level,
        turns,
        rng,
        config,
    )
    .max(1);

    let fort_damage = compute_fort_damage(defender.fort_level, attacker_damage, defender_damage, rng)?;

    let attacker_units: Vec<UnitStack> = battle_units(attacker, UnitType::Offense);
    let attacker_items: Vec<ItemStack> = battle_items(attacker, UnitType::Offense);
    let defender_units: Vec<UnitStack> = battle_units(defender, UnitType::Defense);
    let defender_items: Vec<ItemStack> = battle_items(defender, UnitType::Defense);

    let attacker_casualties =
        compute_casualties(&attacker_units, &attacker_items, defender.level, rng, config)?;
    let defender_casualties =
        compute_casualties(&defender_units, &defender_items, attacker.level, rng, config)?;

    let winner = determine_winner(attacker.offense, defender.defense);

    let raw_xp = xp_earned(
        attacker_damage,
        defender_damage,
        turns,
        offensive_unit_count(attacker),
        defensive_unit_count(defender),
        rng,
    )?;
    let xp = round_to_u64(to_f64(raw_xp) * f64::from(turns) / f64::from(config.turn_scale.max(1)));

    let gold_pillaged = if winner == Side::Attacker {
        compute_pillage(defender.gold, turns, rng, config)
    } else {
        0
    };

    let (attacker_fort_hp, defender_fort_hp) =
        compute_fort_hitpoints(attacker, defender, winner, fort_damage);

    let leveled_up = xp > 0 && xp >= xp_to_next_level(attacker.experience);
    let next_level = if leveled_up {
        Some(attacker.level.saturating_add(1))
    } else {
        None
    };

    tracing::debug!(
        attacker = %attacker.player_id,
        defender = %defender.player_id,
        attacker_damage,
        defender_damage,
        fort_damage,
        xp,
        gold_pillaged,
        "battle resolved"
    );

    Ok(BattleResult {
        attacker_id: attacker.player_id,
        defender_id: defender.player_id,
        winner,
        attacker_damage,
        defender_damage,
        fort_damage,
        attacker_fort_hp,
        defender_fort_hp,
        attacker_casualties,
        defender_casualties,
        xp_earned: xp,
        gold_pillaged,
        leveled_up,
        next_level,
    })
}

/// Apply a battle result to the two combatant snapshots.
///
/// Casualties are clamped per stack, gold moves exactly once in each
/// direction (conserved across the transfer), fort hitpoints are clamped to
/// each fort's maximum, and a zero XP award is never applied. The player
/// level field is left untouched -- level-dependent stat recalculation
/// belongs to the progression collaborator.
pub fn apply_battle_outcome(
    attacker: &mut Combatant,
    defender: &mut Combatant,
    result: &BattleResult,
) {
    apply_casualties(&mut attacker.units, &result.attacker_casualties);
    apply_casualties(&mut defender.units, &result.defender_casualties);

    attacker.fort_hitpoints.current = result.attacker_fort_hp.min(attacker.fort_hitpoints.max);
    defender.fort_hitpoints.current = result.defender_fort_hp.min(defender.fort_hitpoints.max);

    let pillage = result.gold_pillaged.min(defender.gold);
    defender.gold = defender.gold.saturating_sub(pillage);
    attacker.gold = attacker.gold.saturating_add(pillage);

    if result.xp_earned > 0 {
        attacker.experience = attacker.experience.saturating_add(result.xp_earned);
    }
}

/// Assemble the durable log record for a resolved battle.
///
/// Takes the *pre-battle* snapshots so the stats block can carry the
/// starting experience and fielded unit counts.
pub fn build_battle_record(
    attacker: &Combatant,
    defender: &Combatant,
    result: &BattleResult,
    timestamp: DateTime<Utc>,
) -> BattleRecord {
    let winner_id = match result.winner {
        Side::Attacker => result.attacker_id,
        Side::Defender => result.defender_id,
    };

    BattleRecord {
        battle_id: BattleId::new(),
        attacker_id: result.attacker_id,
        defender_id: result.defender_id,
        winner_id,
        stats: BattleStats {
            offense_points: attacker.offense,
            defense_points: defender.defense,
            pillaged_gold: result.gold_pillaged,
            xp_earned: result.xp_earned,
            offense_xp_start: attacker.experience,
            hp_damage: result.defender_fort_hp,
            attacker_unit_count: u32::try_from(offensive_unit_count(attacker)).unwrap_or(u32::MAX),
            defender_unit_count: u32::try_from(defensive_unit_count(defender)).unwrap_or(u32::MAX),
            attacker_losses: result.attacker_casualties.clone(),
            defender_losses: result.defender_casualties.clone(),
        },
        timestamp,
    }
}

fn battle_units(combatant: &Combatant, unit_type: UnitType) -> Vec<UnitStack> {
    combatant
        .units
        .iter()
        .filter(|unit| unit.unit_type == unit_type)
        .copied()
        .collect()
}

fn battle_items(combatant: &Combatant, unit_type: UnitType) -> Vec<ItemStack> {
    combatant
        .items
        .iter()
        .filter(|item| item.unit_type == unit_type)
        .copied()
        .collect()
}

/// Subtract casualty lines from matching unit stacks.
///
/// Lines match stacks by category and tier; each stack clamps at zero, so a
/// line can never drive a quantity negative.
pub fn apply_casualties(units: &mut [UnitStack], lines: &[CasualtyLine]) {
    for line in lines {
        if let Some(stack) = units
            .iter_mut()
            .find(|unit| unit.unit_type == line.unit_type && unit.tier == line.tier)
        {
            stack.quantity = stack.quantity.saturating_sub(line.casualties);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use thornhold_types::{FortHealth, PlayerId};

    use super::*;

    fn attacker() -> Combatant {
        Combatant {
            player_id: PlayerId::new(),
            level: 10,
            offense: 100,
            defense: 60,
            fort_level: 1,
            fort_hitpoints: FortHealth::new(100, 100),
            gold: 500,
            experience: 150,
            units: vec![
                UnitStack::new(UnitType::Citizen, 1, 5),
                UnitStack::new(UnitType::Offense, 1, 25),
            ],
            items: vec![ItemStack::new(UnitType::Offense, 1, 10)],
        }
    }

    fn defender() -> Combatant {
        Combatant {
            player_id: PlayerId::new(),
            level: 10,
            offense: 70,
            defense: 80,
            fort_level: 1,
            fort_hitpoints: FortHealth::new(100, 100),
            gold: 2000,
            experience: 300,
            units: vec![
                UnitStack::new(UnitType::Worker, 1, 3),
                UnitStack::new(UnitType::Defense, 1, 30),
            ],
            items: vec![ItemStack::new(UnitType::Defense, 1, 30)],
        }
    }

    #[test]
    fn strict_comparison_picks_attacker() {
        assert_eq!(determine_winner(100, 80), Side::Attacker);
    }

    #[test]
    fn ties_favor_the_defender() {
        assert_eq!(determine_winner(80, 80), Side::Defender);
        assert_eq!(determine_winner(0, 0), Side::Defender);
    }

    #[test]
    fn zero_turns_is_rejected() {
        let cfg = BattleConfig::default();
        let mut rng = SmallRng::seed_from_u64(42);
        let result = resolve_battle(&attacker(), &defender(), 0, &mut rng, &cfg);
        assert!(matches!(result, Err(EngineError::InvalidTurns { turns: 0 })));
    }

    #[test]
    fn even_level_full_turn_battle() {
        // Attacker level 10 / offense 100 vs defender level 10 / defense 80,
        // fort level 1 at 100 HP, 10 turns: the attacker wins and the
        // defender's fort strictly decreases.
        let cfg = BattleConfig::default();
        let mut rng = SmallRng::seed_from_u64(42);
        let result = resolve_battle(&attacker(), &defender(), 10, &mut rng, &cfg).unwrap();

        assert_eq!(result.winner, Side::Attacker);
        assert!(result.defender_fort_hp < 100);
        // Equal levels: multiplier 1.0, so damage sits at the base window.
        assert!((99..=101).contains(&result.attacker_damage));
    }

    #[test]
    fn resolution_is_deterministic_per_seed() {
        let cfg = BattleConfig::default();
        let a = attacker();
        let d = defender();
        let mut first_rng = SmallRng::seed_from_u64(9);
        let mut second_rng = SmallRng::seed_from_u64(9);
        let first = resolve_battle(&a, &d, 10, &mut first_rng, &cfg).unwrap();
        let second = resolve_battle(&a, &d, 10, &mut second_rng, &cfg).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn resolution_does_not_mutate_snapshots() {
        let cfg = BattleConfig::default();
        let a = attacker();
        let d = defender();
        let a_before = a.clone();
        let d_before = d.clone();
        let mut rng = SmallRng::seed_from_u64(42);
        let _ = resolve_battle(&a, &d, 10, &mut rng, &cfg).unwrap();
        assert_eq!(a, a_before);
        assert_eq!(d, d_before);
    }

    #[test]
    fn pillage_skipped_when_defender_broke() {
        let cfg = BattleConfig::default();
        let mut broke = defender();
        broke.gold = 0;
        let mut rng = SmallRng::seed_from_u64(42);
        let result = resolve_battle(&attacker(), &broke, 10, &mut rng, &cfg).unwrap();
        assert_eq!(result.winner, Side::Attacker);
        assert_eq!(result.gold_pillaged, 0);
    }

    #[test]
    fn loser_never_pillages() {
        let cfg = BattleConfig::default();
        let mut weak = attacker();
        weak.offense = 10;
        let mut rng = SmallRng::seed_from_u64(42);
        let result = resolve_battle(&weak, &defender(), 10, &mut rng, &cfg).unwrap();
        assert_eq!(result.winner, Side::Defender);
        assert_eq!(result.gold_pillaged, 0);
    }

    #[test]
    fn pillage_stays_under_the_stake_bound() {
        let cfg = BattleConfig::default();
        let mut rng = SmallRng::seed_from_u64(42);
        for _ in 0..500 {
            let pillage = compute_pillage(2000, 10, &mut rng, &cfg);
            // floor((2000 * 0.8 + 1) * 10/100) = 160.
            assert!(pillage <= 160);
        }
    }

    #[test]
    fn gold_is_conserved_through_apply() {
        let cfg = BattleConfig::default();
        let mut a = attacker();
        let mut d = defender();
        let total_before = a.gold.saturating_add(d.gold);
        let mut rng = SmallRng::seed_from_u64(3);
        let result = resolve_battle(&a, &d, 10, &mut rng, &cfg).unwrap();
        let a_gold_before = a.gold;
        let d_gold_before = d.gold;

        apply_battle_outcome(&mut a, &mut d, &result);

        assert_eq!(a.gold.saturating_add(d.gold), total_before);
        assert_eq!(
            a.gold.saturating_sub(a_gold_before),
            d_gold_before.saturating_sub(d.gold)
        );
    }

    #[test]
    fn apply_clamps_casualties_and_fort_hp() {
        let cfg = BattleConfig::default();
        let mut a = attacker();
        let mut d = defender();
        let mut rng = SmallRng::seed_from_u64(5);
        let result = resolve_battle(&a, &d, 10, &mut rng, &cfg).unwrap();

        apply_battle_outcome(&mut a, &mut d, &result);

        for unit in a.units.iter().chain(d.units.iter()) {
            // quantity is unsigned; what matters is that nothing wrapped.
            assert!(unit.quantity <= 30);
        }
        assert!(a.fort_hitpoints.current <= a.fort_hitpoints.max);
        assert!(d.fort_hitpoints.current <= d.fort_hitpoints.max);
    }

    #[test]
    fn civilian_stacks_take_no_casualties() {
        let cfg = BattleConfig::default();
        let mut rng = SmallRng::seed_from_u64(42);
        let result = resolve_battle(&attacker(), &defender(), 10, &mut rng, &cfg).unwrap();
        for line in result
            .attacker_casualties
            .iter()
            .chain(result.defender_casualties.iter())
        {
            assert!(matches!(line.unit_type, UnitType::Offense | UnitType::Defense));
        }
    }

    #[test]
    fn no_defensive_units_still_resolves() {
        let cfg = BattleConfig::default();
        let mut hollow = defender();
        hollow.units.retain(|unit| unit.unit_type != UnitType::Defense);
        let mut rng = SmallRng::seed_from_u64(42);
        let result = resolve_battle(&attacker(), &hollow, 10, &mut rng, &cfg).unwrap();
        // The unit-ratio denominator is zero, so XP is skipped entirely.
        assert_eq!(result.xp_earned, 0);
        assert!(!result.leveled_up);
    }

    #[test]
    fn fort_hp_floors_at_zero() {
        let cfg = BattleConfig::default();
        let mut fragile = defender();
        fragile.fort_hitpoints = FortHealth::new(5, 100);
        let mut rng = SmallRng::seed_from_u64(42);
        let result = resolve_battle(&attacker(), &fragile, 10, &mut rng, &cfg).unwrap();
        assert_eq!(result.defender_fort_hp, 0);
    }

    #[test]
    fn level_up_flag_is_consistent() {
        let cfg = BattleConfig::default();
        let mut near_level = attacker();
        near_level.experience = 5999; // 1 XP short of level 2
        let mut rng = SmallRng::seed_from_u64(11);
        let result = resolve_battle(&near_level, &defender(), 10, &mut rng, &cfg).unwrap();
        assert_eq!(result.leveled_up, result.xp_earned > 0);
        if result.leveled_up {
            assert_eq!(result.next_level, Some(11));
        } else {
            assert_eq!(result.next_level, None);
        }
    }

    #[test]
    fn record_carries_starting_state() {
        let cfg = BattleConfig::default();
        let a = attacker();
        let d = defender();
        let mut rng = SmallRng::seed_from_u64(42);
        let result = resolve_battle(&a, &d, 10, &mut rng, &cfg).unwrap();
        let record = build_battle_record(&a, &d, &result, Utc::now());

        assert_eq!(record.attacker_id, a.player_id);
        assert_eq!(record.defender_id, d.player_id);
        assert_eq!(record.winner_id, a.player_id);
        assert_eq!(record.stats.offense_points, 100);
        assert_eq!(record.stats.defense_points, 80);
        assert_eq!(record.stats.offense_xp_start, 150);
        assert_eq!(record.stats.attacker_unit_count, 25);
        assert_eq!(record.stats.defender_unit_count, 30);
        assert_eq!(record.stats.hp_damage, result.defender_fort_hp);
    }
}
