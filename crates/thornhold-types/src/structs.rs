//! Core entity structs for the Thornhold battle engine.
//!
//! Covers the combatant snapshot handed into a resolution, the army and
//! equipment stack shapes, and the result/record shapes handed back out.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::{Side, UnitType};
use crate::ids::{BattleId, PlayerId};

// ---------------------------------------------------------------------------
// UnitStack / ItemStack
// ---------------------------------------------------------------------------

/// A grouped count of units of one category and tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitStack {
    /// The category this stack belongs to.
    pub unit_type: UnitType,
    /// Tier level, used for equipment matching and power scaling.
    pub tier: u32,
    /// How many units are in the stack. Never negative; casualties are
    /// clamped so the count cannot go below zero.
    pub quantity: u32,
}

impl UnitStack {
    /// Create a new unit stack.
    pub const fn new(unit_type: UnitType, tier: u32, quantity: u32) -> Self {
        Self {
            unit_type,
            tier,
            quantity,
        }
    }
}

/// A grouped count of equipment bound to one unit category and tier.
///
/// The quantity may be below, equal to, or above the matching unit stack's
/// quantity -- partial equipping is allowed and reduces the coverage ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    /// The unit category this equipment is issued to.
    pub unit_type: UnitType,
    /// Tier level; equipment only covers the unit stack of the same tier.
    pub tier: u32,
    /// How many pieces of equipment are held.
    pub quantity: u32,
}

impl ItemStack {
    /// Create a new item stack.
    pub const fn new(unit_type: UnitType, tier: u32, quantity: u32) -> Self {
        Self {
            unit_type,
            tier,
            quantity,
        }
    }
}

// ---------------------------------------------------------------------------
// FortHealth
// ---------------------------------------------------------------------------

/// Current and maximum hitpoints of a player's fortification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FortHealth {
    /// Current hitpoints, floored at zero.
    pub current: u32,
    /// Maximum hitpoints at the fort's current level.
    pub max: u32,
}

impl FortHealth {
    /// Create a fort health value.
    pub const fn new(current: u32, max: u32) -> Self {
        Self { current, max }
    }

    /// Current hitpoints as a whole-number percentage of the maximum.
    ///
    /// Returns 0 when the maximum is zero.
    pub const fn percentage(&self) -> u32 {
        match self.current.saturating_mul(100).checked_div(self.max) {
            Some(pct) => pct,
            None => 0,
        }
    }
}

// ---------------------------------------------------------------------------
// Combatant
// ---------------------------------------------------------------------------

/// A snapshot of one side's battle-relevant state.
///
/// Constructed fresh from persisted player state for each resolution
/// request. The engine only reads it; all changes come back as a
/// [`BattleResult`] that the caller applies transactionally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Combatant {
    /// The player this snapshot belongs to.
    pub player_id: PlayerId,
    /// Player level derived from accumulated experience.
    pub level: u32,
    /// Offense score (units, equipment, and bonuses already folded in).
    pub offense: u64,
    /// Defense score (units, equipment, and bonuses already folded in).
    pub defense: u64,
    /// Fortification level.
    pub fort_level: u32,
    /// Fortification hitpoints.
    pub fort_hitpoints: FortHealth,
    /// Gold on hand (banked gold is not at stake in a battle).
    pub gold: u64,
    /// Accumulated experience points.
    pub experience: u64,
    /// Army composition, one stack per category and tier.
    pub units: Vec<UnitStack>,
    /// Equipment holdings, one stack per category and tier.
    pub items: Vec<ItemStack>,
}

// ---------------------------------------------------------------------------
// CasualtyLine
// ---------------------------------------------------------------------------

/// Losses for a single unit stack in one battle.
///
/// Lines are reported in the same order as the input stacks so callers can
/// apply them positionally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CasualtyLine {
    /// The category of the stack that took losses.
    pub unit_type: UnitType,
    /// Tier level of the stack.
    pub tier: u32,
    /// Stack quantity before the battle.
    pub quantity: u32,
    /// Units lost; always within `0..=quantity`.
    pub casualties: u32,
}

// ---------------------------------------------------------------------------
// BattleResult
// ---------------------------------------------------------------------------

/// The immutable outcome of one battle resolution.
///
/// Everything a caller needs to apply the battle is here: raw damage on both
/// sides, the fort damage dealt, resulting fort hitpoints, per-stack
/// casualties, experience, and pillage. No component revises a result after
/// the outcome aggregator returns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleResult {
    /// The attacking player.
    pub attacker_id: PlayerId,
    /// The defending player.
    pub defender_id: PlayerId,
    /// Which side won. Ties in the score comparison go to the defender.
    pub winner: Side,
    /// Raw attacker damage after level and turn scaling.
    pub attacker_damage: u64,
    /// Raw defender damage after level and turn scaling, clamped to >= 1 so
    /// it can serve as the fort-damage and experience denominator.
    pub defender_damage: u64,
    /// Fortification damage dealt to the defender, floored at zero.
    pub fort_damage: u32,
    /// Attacker fort hitpoints after the battle, floored at zero.
    pub attacker_fort_hp: u32,
    /// Defender fort hitpoints after the battle, floored at zero.
    pub defender_fort_hp: u32,
    /// Attacker losses, one line per offensive stack in input order.
    pub attacker_casualties: Vec<CasualtyLine>,
    /// Defender losses, one line per defensive stack in input order.
    pub defender_casualties: Vec<CasualtyLine>,
    /// Experience awarded to the attacker, already turn-scaled. Zero means
    /// no award is applied.
    pub xp_earned: u64,
    /// Gold transferred from the defender to the attacker. Zero unless the
    /// attacker won and the defender had gold.
    pub gold_pillaged: u64,
    /// Whether the XP award pushes the attacker over the next level
    /// threshold. Stat recalculation is the progression collaborator's job.
    pub leveled_up: bool,
    /// The level the attacker advances to when [`Self::leveled_up`] is set.
    pub next_level: Option<u32>,
}

// ---------------------------------------------------------------------------
// BattleStats / BattleRecord
// ---------------------------------------------------------------------------

/// The per-battle statistics block stored in the battle log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleStats {
    /// Attacker offense score at resolution time.
    pub offense_points: u64,
    /// Defender defense score at resolution time.
    pub defense_points: u64,
    /// Gold pillaged by the attacker (zero on a defender win).
    pub pillaged_gold: u64,
    /// Experience the attacker earned.
    pub xp_earned: u64,
    /// Attacker experience before the award, for progression auditing.
    pub offense_xp_start: u64,
    /// Defender fort hitpoints remaining after the battle.
    pub hp_damage: u32,
    /// Attacker units fielded (offensive stacks only).
    pub attacker_unit_count: u32,
    /// Defender units fielded (defensive stacks only).
    pub defender_unit_count: u32,
    /// Attacker losses per stack.
    pub attacker_losses: Vec<CasualtyLine>,
    /// Defender losses per stack.
    pub defender_losses: Vec<CasualtyLine>,
}

/// A durable battle log entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleRecord {
    /// Identifier of this log entry.
    pub battle_id: BattleId,
    /// The attacking player.
    pub attacker_id: PlayerId,
    /// The defending player.
    pub defender_id: PlayerId,
    /// The winning player.
    pub winner_id: PlayerId,
    /// Statistics block for history rendering.
    pub stats: BattleStats,
    /// When the battle was resolved.
    pub timestamp: DateTime<Utc>,
}
