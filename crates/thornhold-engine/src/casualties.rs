//! Casualty sampling per unit stack.
//!
//! Each stack's losses come from a binomial draw whose probability is built
//! from two factors: how badly the stack is outclassed by the enemy's level,
//! and how well it is equipped. Full equipment halves the casualty rate but
//! never eliminates it; a stack whose tier exceeds the enemy's level takes
//! no base losses at all.

use rand::Rng;
use rand_distr::{Binomial, Distribution};

use thornhold_types::{CasualtyLine, ItemStack, UnitStack};

use crate::config::BattleConfig;
use crate::error::EngineError;

/// Find the equipment stack covering a unit stack, if any.
///
/// Equipment matches on both category and tier; at most one match is
/// expected per stack.
fn matching_item<'a>(items: &'a [ItemStack], unit: &UnitStack) -> Option<&'a ItemStack> {
    items
        .iter()
        .find(|item| item.unit_type == unit.unit_type && item.tier == unit.tier)
}

/// Fraction of a unit stack covered by its equipment.
///
/// 1.0 when the equipment count meets or exceeds the unit count, the
/// partial ratio otherwise, and 0.0 when no equipment matches or the stack
/// is empty.
pub fn equipped_ratio(unit_quantity: u32, item_quantity: Option<u32>) -> f64 {
    match item_quantity {
        Some(items) if items >= unit_quantity => 1.0,
        Some(items) if unit_quantity > 0 => f64::from(items) / f64::from(unit_quantity),
        _ => 0.0,
    }
}

/// Base per-unit loss probability before equipment mitigation.
///
/// `1 - tier / enemy_level` when the enemy level meets or exceeds the
/// stack's tier; higher-tier units facing a weaker enemy take no base
/// losses.
pub fn base_casualty_rate(unit_tier: u32, enemy_level: u32) -> f64 {
    if enemy_level >= unit_tier && enemy_level > 0 {
        1.0 - f64::from(unit_tier) / f64::from(enemy_level)
    } else {
        0.0
    }
}

/// Sample losses for one stack from a binomial distribution.
///
/// `n` is the stack quantity and `p` the final casualty rate. The sample is
/// clamped to the stack quantity, so losses can never exceed the pre-battle
/// count.
///
/// # Errors
///
/// Returns [`EngineError::CasualtyRate`] if the rate is rejected by the
/// distribution after clamping -- which would mean a non-finite rate
/// escaped the formula.
pub fn sample_stack_casualties(
    quantity: u32,
    rate: f64,
    rng: &mut impl Rng,
) -> Result<u32, EngineError> {
    if quantity == 0 || rate <= 0.0 {
        return Ok(0);
    }
    let p = rate.min(1.0);
    let binomial = match Binomial::new(u64::from(quantity), p) {
        Ok(distribution) => distribution,
        Err(_) => return Err(EngineError::CasualtyRate { rate: p }),
    };
    let losses = binomial.sample(rng);
    Ok(u32::try_from(losses).unwrap_or(quantity).min(quantity))
}

/// Compute casualties for one side's stacks.
///
/// Invoked once per side with the *opposing* side's level as `enemy_level`.
/// Output carries one line per input stack, in input order, so the caller
/// can apply losses positionally.
pub fn compute_casualties(
    units: &[UnitStack],
    items: &[ItemStack],
    enemy_level: u32,
    rng: &mut impl Rng,
    config: &BattleConfig,
) -> Result<Vec<CasualtyLine>, EngineError> {
    let mitigation = f64::from(config.equipment_mitigation_pct) / 100.0;
    let mut lines = Vec::with_capacity(units.len());

    for unit in units {
        let item_quantity = matching_item(items, unit).map(|item| item.quantity);
        let coverage = equipped_ratio(unit.quantity, item_quantity);
        let base_rate = base_casualty_rate(unit.tier, enemy_level);
        let final_rate = base_rate * (1.0 - mitigation * coverage);
        let casualties = sample_stack_casualties(unit.quantity, final_rate, rng)?;
        lines.push(CasualtyLine {
            unit_type: unit.unit_type,
            tier: unit.tier,
            quantity: unit.quantity,
            casualties,
        });
    }

    Ok(lines)
}
