//! Configuration constants and defaults for battle resolution.
//!
//! The [`BattleConfig`] struct bundles every tunable so that callers (the
//! sim binary, tests) can override defaults. The defaults carry the
//! canonical balance values; the fixed balancing curves (level multiplier
//! table, fort polynomial, XP variance window) are deliberately *not*
//! configurable and live as constants next to their formulas.

use serde::{Deserialize, Serialize};

/// Configuration for battle resolution formulas.
///
/// Percentages are expressed as whole `u32` values out of 100. The sim
/// binary constructs this from an optional YAML file at startup and passes
/// it into every resolution call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleConfig {
    /// Maximum level gap in either direction for an eligible engagement
    /// (default: 5).
    pub max_level_gap: u32,

    /// Half-width of the uniform base damage window around the offense
    /// score (default: 1, i.e. `[offense-1, offense+1]`).
    pub damage_spread: u64,

    /// Turn divisor for damage and experience scaling (default: 10).
    ///
    /// A resolution over `turns` attack turns scales damage by
    /// `turns / turn_scale`.
    pub turn_scale: u32,

    /// Turn divisor for pillage scaling (default: 100).
    pub pillage_turn_scale: u32,

    /// Share of the defender's gold at stake in a pillage, as a percentage
    /// (default: 80).
    pub pillage_cap_pct: u32,

    /// How much of the base casualty rate full equipment removes, as a
    /// percentage (default: 50). Full coverage halves losses but never
    /// eliminates them.
    pub equipment_mitigation_pct: u32,

    /// Fort hitpoint maximum per fort level (default: 100).
    pub fort_hp_per_level: u32,

    /// Pillage retained per level the attacker stands above the allowed
    /// gap, as a percentage (default: 96, i.e. a 4% decay per level).
    pub mitigation_retention_pct: u32,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            max_level_gap: 5,
            damage_spread: 1,
            turn_scale: 10,
            pillage_turn_scale: 100,
            pillage_cap_pct: 80,
            equipment_mitigation_pct: 50,
            fort_hp_per_level: 100,
            mitigation_retention_pct: 96,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = BattleConfig::default();
        assert_eq!(cfg.max_level_gap, 5);
        assert_eq!(cfg.damage_spread, 1);
        assert_eq!(cfg.turn_scale, 10);
        assert_eq!(cfg.pillage_turn_scale, 100);
        assert_eq!(cfg.pillage_cap_pct, 80);
        assert_eq!(cfg.equipment_mitigation_pct, 50);
        assert_eq!(cfg.fort_hp_per_level, 100);
        assert_eq!(cfg.mitigation_retention_pct, 96);
    }

    #[test]
    fn config_roundtrip_serde() {
        let cfg = BattleConfig::default();
        let json = serde_json::to_string(&cfg).ok();
        assert!(json.is_some());
        let restored: Result<BattleConfig, _> =
            serde_json::from_str(json.as_deref().unwrap_or(""));
        assert_eq!(restored.ok(), Some(cfg));
    }
}
