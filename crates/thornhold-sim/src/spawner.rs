//! Seed player construction for the battle simulation.
//!
//! Builds combatant snapshots with randomized armies whose offense and
//! defense scores are derived from the unit catalog, so the seeded players
//! are internally consistent with the engine's own stat derivations.

use rand::Rng;

use thornhold_engine::stats::{defense_score, offense_score};
use thornhold_engine::{BattleConfig, level_for_experience};
use thornhold_types::{Combatant, FortHealth, ItemStack, PlayerId, UnitStack, UnitType};

/// Bounds for the randomized seed armies.
const MIN_STACK: u32 = 20;
const MAX_STACK: u32 = 80;

/// Build one seed player with a randomized army.
///
/// Unit counts are drawn per stack; the offense and defense scores are then
/// recomputed from the catalog so the snapshot is self-consistent. Roughly
/// half of each fighting stack is equipped.
pub fn spawn_player(experience: u64, gold: u64, rng: &mut impl Rng, config: &BattleConfig) -> Combatant {
    let units = vec![
        UnitStack::new(UnitType::Citizen, 1, rng.random_range(MIN_STACK..=MAX_STACK)),
        UnitStack::new(UnitType::Worker, 1, rng.random_range(MIN_STACK..=MAX_STACK)),
        UnitStack::new(UnitType::Offense, 1, rng.random_range(MIN_STACK..=MAX_STACK)),
        UnitStack::new(UnitType::Offense, 2, rng.random_range(0..=MIN_STACK)),
        UnitStack::new(UnitType::Defense, 1, rng.random_range(MIN_STACK..=MAX_STACK)),
        UnitStack::new(UnitType::Defense, 2, rng.random_range(0..=MIN_STACK)),
    ];

    let items = units
        .iter()
        .filter(|unit| {
            matches!(unit.unit_type, UnitType::Offense | UnitType::Defense) && unit.quantity > 0
        })
        .map(|unit| {
            ItemStack::new(
                unit.unit_type,
                unit.tier,
                unit.quantity.checked_div(2).unwrap_or(0),
            )
        })
        .collect();

    let fort_level = rng.random_range(1..=3_u32);
    let max_hp = fort_level.saturating_mul(config.fort_hp_per_level);

    let mut combatant = Combatant {
        player_id: PlayerId::new(),
        level: level_for_experience(experience),
        offense: 0,
        defense: 0,
        fort_level,
        fort_hitpoints: FortHealth::new(max_hp, max_hp),
        gold,
        experience,
        units,
        items,
    };
    combatant.offense = offense_score(&combatant);
    combatant.defense = defense_score(&combatant);
    combatant
}
