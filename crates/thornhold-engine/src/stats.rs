//! Derived player statistics and the trainable unit catalog.
//!
//! Everything here is recomputable from a [`Combatant`] snapshot: head
//! counts, army size, per-turn gold income, and the offense/defense scores
//! that the battle formulas consume. The unit catalog is the single source
//! of truth for unit names, bonuses, and training costs.

use thornhold_types::{Combatant, Side, UnitType};

use crate::config::BattleConfig;
use crate::damage::level_mitigation;
use crate::numeric::{floor_to_u64, to_f64};
use crate::outcome::determine_winner;

// ---------------------------------------------------------------------------
// Unit catalog
// ---------------------------------------------------------------------------

/// One entry in the trainable unit catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitSpec {
    /// Display name on the recruitment screen.
    pub name: &'static str,
    /// Category the unit trains into.
    pub unit_type: UnitType,
    /// Tier within the category.
    pub tier: u32,
    /// Score bonus each unit contributes (gold per turn for workers).
    pub bonus: u64,
    /// Training cost in gold.
    pub cost: u64,
}

/// The trainable unit catalog, in recruitment-screen order.
pub const UNIT_CATALOG: &[UnitSpec] = &[
    UnitSpec {
        name: "Worker",
        unit_type: UnitType::Worker,
        tier: 1,
        bonus: 65,
        cost: 2000,
    },
    UnitSpec {
        name: "Soldier",
        unit_type: UnitType::Offense,
        tier: 1,
        bonus: 3,
        cost: 1500,
    },
    UnitSpec {
        name: "Knight",
        unit_type: UnitType::Offense,
        tier: 2,
        bonus: 20,
        cost: 10_000,
    },
    UnitSpec {
        name: "Guard",
        unit_type: UnitType::Defense,
        tier: 1,
        bonus: 3,
        cost: 1500,
    },
    UnitSpec {
        name: "Archer",
        unit_type: UnitType::Defense,
        tier: 2,
        bonus: 20,
        cost: 10_000,
    },
    UnitSpec {
        name: "Spy",
        unit_type: UnitType::Spy,
        tier: 1,
        bonus: 3,
        cost: 1500,
    },
    UnitSpec {
        name: "Infiltrator",
        unit_type: UnitType::Spy,
        tier: 2,
        bonus: 20,
        cost: 10_000,
    },
    UnitSpec {
        name: "Sentry",
        unit_type: UnitType::Sentry,
        tier: 1,
        bonus: 3,
        cost: 1500,
    },
    UnitSpec {
        name: "Sentinel",
        unit_type: UnitType::Sentry,
        tier: 2,
        bonus: 20,
        cost: 10_000,
    },
];

/// Base gold income every player receives each turn, before worker bonuses.
pub const BASE_GOLD_PER_TURN: u64 = 1000;

/// Look up the catalog entry for a category and tier.
pub fn unit_spec(unit_type: UnitType, tier: u32) -> Option<&'static UnitSpec> {
    UNIT_CATALOG
        .iter()
        .find(|spec| spec.unit_type == unit_type && spec.tier == tier)
}

/// The score bonus a single unit of a category and tier contributes.
///
/// Unknown pairings contribute nothing.
pub fn catalog_bonus(unit_type: UnitType, tier: u32) -> u64 {
    unit_spec(unit_type, tier).map_or(0, |spec| spec.bonus)
}

// ---------------------------------------------------------------------------
// Head counts
// ---------------------------------------------------------------------------

/// Total population: every unit of every category.
pub fn population(combatant: &Combatant) -> u64 {
    combatant
        .units
        .iter()
        .fold(0_u64, |acc, unit| acc.saturating_add(u64::from(unit.quantity)))
}

/// Untrained citizens.
pub fn citizens(combatant: &Combatant) -> u64 {
    count_of(combatant, UnitType::Citizen)
}

/// Army size: population minus citizens and workers.
pub fn army_size(combatant: &Combatant) -> u64 {
    population(combatant)
        .saturating_sub(count_of(combatant, UnitType::Citizen))
        .saturating_sub(count_of(combatant, UnitType::Worker))
}

/// Units fielded on the offensive side of a battle.
pub fn offensive_unit_count(combatant: &Combatant) -> u64 {
    count_of(combatant, UnitType::Offense)
}

/// Units fielded on the defensive side of a battle.
pub fn defensive_unit_count(combatant: &Combatant) -> u64 {
    count_of(combatant, UnitType::Defense)
}

fn count_of(combatant: &Combatant, unit_type: UnitType) -> u64 {
    combatant
        .units
        .iter()
        .filter(|unit| unit.unit_type == unit_type)
        .fold(0_u64, |acc, unit| acc.saturating_add(u64::from(unit.quantity)))
}

// ---------------------------------------------------------------------------
// Scores and income
// ---------------------------------------------------------------------------

/// Recompute the offense score from the army composition.
pub fn offense_score(combatant: &Combatant) -> u64 {
    score_of(combatant, UnitType::Offense)
}

/// Recompute the defense score from the army composition.
pub fn defense_score(combatant: &Combatant) -> u64 {
    score_of(combatant, UnitType::Defense)
}

fn score_of(combatant: &Combatant, unit_type: UnitType) -> u64 {
    combatant
        .units
        .iter()
        .filter(|unit| unit.unit_type == unit_type)
        .fold(0_u64, |acc, unit| {
            acc.saturating_add(
                u64::from(unit.quantity).saturating_mul(catalog_bonus(unit.unit_type, unit.tier)),
            )
        })
}

/// Gold income per attack turn: the base income plus worker bonuses.
pub fn gold_per_turn(combatant: &Combatant) -> u64 {
    let worker_income = combatant
        .units
        .iter()
        .filter(|unit| unit.unit_type == UnitType::Worker)
        .fold(0_u64, |acc, unit| {
            acc.saturating_add(
                u64::from(unit.quantity).saturating_mul(catalog_bonus(UnitType::Worker, unit.tier)),
            )
        });
    BASE_GOLD_PER_TURN.saturating_add(worker_income)
}

// ---------------------------------------------------------------------------
// Engagement preview
// ---------------------------------------------------------------------------

/// A dry-run projection of an engagement, with nothing resolved.
///
/// Deterministic: the pillage figure is the upper bound of the pillage
/// draw, not a sample, so previews never consume randomness.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngagementPreview {
    /// Which side the score comparison favors right now.
    pub projected_winner: Side,
    /// Upper bound on the gold a winning attacker could pillage.
    pub available_pillage: u64,
    /// Pillage retention factor for attackers far above the defender.
    pub level_mitigation: f64,
    /// Defender fort condition as a percentage.
    pub defender_fort_percentage: u32,
    /// Defender fort level.
    pub defender_fort_level: u32,
    /// Defender gold at stake.
    pub defender_gold: u64,
}

/// Project an engagement without resolving it.
pub fn preview_engagement(
    attacker: &Combatant,
    defender: &Combatant,
    turns: u32,
    config: &BattleConfig,
) -> EngagementPreview {
    let pillage_cap = to_f64(defender.gold) * f64::from(config.pillage_cap_pct) / 100.0;
    let turn_share = f64::from(turns) / f64::from(config.pillage_turn_scale.max(1));
    let available_pillage = floor_to_u64(pillage_cap * turn_share).min(defender.gold);

    EngagementPreview {
        projected_winner: determine_winner(attacker.offense, defender.defense),
        available_pillage,
        level_mitigation: level_mitigation(attacker.level, defender.level, config),
        defender_fort_percentage: defender.fort_hitpoints.percentage(),
        defender_fort_level: defender.fort_level,
        defender_gold: defender.gold,
    }
}
