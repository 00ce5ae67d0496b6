//! Engagement eligibility: the level-gap and readiness pre-check.
//!
//! Eligibility runs before any damage or casualty computation. A failed
//! check is a classified outcome ([`EngagementDenial`]), never an error:
//! resolution simply does not proceed. The check is a pure function of the
//! two levels and the attacker's offense score, so repeated calls with the
//! same inputs always agree.

use thornhold_types::{Combatant, EngagementDenial};

use crate::config::BattleConfig;

/// The outcome of an engagement eligibility check.
///
/// Carries the inputs the classification was derived from so that callers
/// can present the denial reason without re-deriving combat state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngagementCheck {
    /// Whether the engagement may proceed.
    pub eligible: bool,
    /// The classified denial reason when `eligible` is false.
    pub denial: Option<EngagementDenial>,
    /// Attacker level at check time.
    pub attacker_level: u32,
    /// Defender level at check time.
    pub defender_level: u32,
    /// Attacker offense score at check time.
    pub attacker_offense: u64,
}

/// Whether the level gap between the two players permits an engagement.
///
/// Fails when the defender is more than `max_level_gap` levels above or
/// below the attacker. The offense-readiness check is separate -- see
/// [`check_engagement`].
pub fn can_engage(attacker_level: u32, defender_level: u32, config: &BattleConfig) -> bool {
    let gap = i64::from(config.max_level_gap);
    let diff = i64::from(defender_level).saturating_sub(i64::from(attacker_level));
    diff <= gap && diff >= gap.saturating_neg()
}

/// Run the full eligibility check for an attacker/defender pair.
///
/// Denials classify in this order: a defender below the gap is
/// [`EngagementDenial::DefenderTooLow`], above it
/// [`EngagementDenial::DefenderTooHigh`], and an attacker with a zero
/// offense score [`EngagementDenial::NoOffense`].
pub fn check_engagement(
    attacker: &Combatant,
    defender: &Combatant,
    config: &BattleConfig,
) -> EngagementCheck {
    let gap = i64::from(config.max_level_gap);
    let diff = i64::from(defender.level).saturating_sub(i64::from(attacker.level));

    let denial = if diff < gap.saturating_neg() {
        Some(EngagementDenial::DefenderTooLow)
    } else if diff > gap {
        Some(EngagementDenial::DefenderTooHigh)
    } else if attacker.offense == 0 {
        Some(EngagementDenial::NoOffense)
    } else {
        None
    };

    EngagementCheck {
        eligible: denial.is_none(),
        denial,
        attacker_level: attacker.level,
        defender_level: defender.level,
        attacker_offense: attacker.offense,
    }
}
