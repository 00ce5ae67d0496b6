//! Enumeration types for the Thornhold battle engine.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// UnitType
// ---------------------------------------------------------------------------

/// The category a unit stack belongs to.
///
/// Categories determine which battles a stack participates in and which
/// equipment can be issued to it. Only `Offense` stacks fight for the
/// attacker and only `Defense` stacks fight for the defender; the remaining
/// categories contribute to population and economy but take no battle
/// casualties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum UnitType {
    /// Untrained population with no battle role.
    Citizen,
    /// Economic units generating gold each turn.
    Worker,
    /// Units contributing to the offense score and attacker casualties.
    Offense,
    /// Units contributing to the defense score and defender casualties.
    Defense,
    /// Covert units for intelligence operations.
    Spy,
    /// Counter-intelligence units guarding against spies.
    Sentry,
}

// ---------------------------------------------------------------------------
// Side
// ---------------------------------------------------------------------------

/// One of the two sides in a battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// The player who initiated the attack.
    Attacker,
    /// The player being attacked.
    Defender,
}

// ---------------------------------------------------------------------------
// EngagementDenial
// ---------------------------------------------------------------------------

/// Why an engagement request was denied before any resolution ran.
///
/// A denial is a classified outcome, not an error: the caller presents the
/// reason to the attacker and no battle state changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EngagementDenial {
    /// The defender is more than the allowed gap below the attacker.
    DefenderTooLow,
    /// The defender is more than the allowed gap above the attacker.
    DefenderTooHigh,
    /// The attacker has no offense score and cannot deal damage.
    NoOffense,
}
