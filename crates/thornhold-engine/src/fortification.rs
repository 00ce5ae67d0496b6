//! Fortification damage and hitpoint formulas.
//!
//! Fort damage converts the ratio of the two raw damage values into a hit
//! against the defender's fortification, scaled by the defender's fort level
//! and a fort-level-dependent resilience constant with bounded random
//! jitter.

use rand::Rng;

use crate::config::BattleConfig;
use crate::error::EngineError;
use crate::numeric::{floor_to_i64, floor_to_u32, i64_to_f64, to_f64};

/// The fort resilience constant for a fort level.
///
/// A fixed 6th-degree polynomial encoding diminishing fort resilience as the
/// level rises. This is the balancing curve of the whole fortification
/// system; the coefficients must not be altered.
pub fn fort_constant(fort_level: u32) -> f64 {
    let x = f64::from(fort_level);
    -2e-7 * x.powi(6) + 1e-5 * x.powi(5) - 0.0003 * x.powi(4) + 0.0016 * x.powi(3)
        + 0.0135 * x.powi(2)
        + 0.0521 * x
        + 0.1295
}

/// Maximum fort hitpoints at a fort level.
pub const fn max_fort_hitpoints(fort_level: u32, config: &BattleConfig) -> u32 {
    fort_level.saturating_mul(config.fort_hp_per_level)
}

/// The random jitter term of fort damage.
///
/// Uniform in `{-1, 0, 1}`, plus `floor(fort_constant * attacker_damage)`
/// when the resilience constant is non-negative. At the extreme fort levels
/// where the polynomial dips below zero only the bare jitter remains.
pub fn fort_jitter(fort_constant: f64, attacker_damage: u64, rng: &mut impl Rng) -> i64 {
    let jitter: i64 = rng.random_range(-1..=1);
    if fort_constant >= 0.0 {
        jitter.saturating_add(floor_to_i64(fort_constant * to_f64(attacker_damage)))
    } else {
        jitter
    }
}

/// Compute the fort damage dealt to the defender.
///
/// Formula: `(attacker_damage / defender_damage) * fort_level + jitter`,
/// where the division is real-valued and the jitter term comes from
/// [`fort_jitter`]. The result is floored to whole hitpoints and clamped at
/// zero (the jitter can pull a tiny hit negative).
///
/// # Errors
///
/// Returns [`EngineError::ZeroDefenderDamage`] when the defender damage
/// denominator is zero. The resolver clamps defender damage to >= 1 before
/// calling, so this only fires on direct misuse.
pub fn compute_fort_damage(
    fort_level: u32,
    attacker_damage: u64,
    defender_damage: u64,
    rng: &mut impl Rng,
) -> Result<u32, EngineError> {
    if defender_damage == 0 {
        return Err(EngineError::ZeroDefenderDamage { attacker_damage });
    }
    let constant = fort_constant(fort_level);
    let jitter = fort_jitter(constant, attacker_damage, rng);
    let ratio_term = to_f64(attacker_damage) / to_f64(defender_damage) * f64::from(fort_level);
    Ok(floor_to_u32(ratio_term + i64_to_f64(jitter)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    #[test]
    fn fort_constant_level_one() {
        // Sum of the coefficients: recomputable by hand from the curve.
        assert!((fort_constant(1) - 0.196_409_8).abs() < 1e-12);
    }

    #[test]
    fn fort_constant_level_zero_is_intercept() {
        assert!((fort_constant(0) - 0.1295).abs() < 1e-12);
    }

    #[test]
    fn fort_constant_matches_polynomial_at_samples() {
        for level in [2_u32, 5, 10, 15, 25] {
            let x = f64::from(level);
            let expected = -2e-7 * x.powi(6) + 1e-5 * x.powi(5) - 0.0003 * x.powi(4)
                + 0.0016 * x.powi(3)
                + 0.0135 * x.powi(2)
                + 0.0521 * x
                + 0.1295;
            assert!((fort_constant(level) - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn fort_constant_is_continuous_at_small_steps() {
        // Neighboring levels stay close; the curve has no jumps.
        for level in 0_u32..30 {
            let here = fort_constant(level);
            let next = fort_constant(level.saturating_add(1));
            assert!((next - here).abs() < 1.0);
        }
    }

    #[test]
    fn max_hitpoints_scale_with_level() {
        let cfg = BattleConfig::default();
        assert_eq!(max_fort_hitpoints(1, &cfg), 100);
        assert_eq!(max_fort_hitpoints(5, &cfg), 500);
        assert_eq!(max_fort_hitpoints(0, &cfg), 0);
    }

    #[test]
    fn jitter_with_negative_constant_is_bare() {
        let mut rng = SmallRng::seed_from_u64(42);
        for _ in 0..100 {
            let jitter = fort_jitter(-0.5, 1000, &mut rng);
            assert!((-1..=1).contains(&jitter));
        }
    }

    #[test]
    fn jitter_with_positive_constant_scales_with_damage() {
        let mut rng = SmallRng::seed_from_u64(42);
        let constant = fort_constant(1);
        for _ in 0..100 {
            let jitter = fort_jitter(constant, 100, &mut rng);
            // floor(0.1964098 * 100) = 19, plus or minus one.
            assert!((18..=20).contains(&jitter));
        }
    }

    #[test]
    fn zero_defender_damage_is_rejected() {
        let mut rng = SmallRng::seed_from_u64(42);
        let result = compute_fort_damage(1, 100, 0, &mut rng);
        assert!(matches!(
            result,
            Err(EngineError::ZeroDefenderDamage { attacker_damage: 100 })
        ));
    }

    #[test]
    fn fort_damage_is_positive_for_even_fight() {
        let mut rng = SmallRng::seed_from_u64(42);
        for _ in 0..50 {
            let damage = compute_fort_damage(1, 100, 100, &mut rng).unwrap();
            // Ratio term 1.0 plus jitter around 19.
            assert!((19..=21).contains(&damage));
        }
    }

    #[test]
    fn fort_damage_clamps_at_zero() {
        let mut rng = SmallRng::seed_from_u64(42);
        // Fort level 0: ratio term 0, constant is the intercept, and the
        // scaled term floors to 0 for tiny damage, leaving bare jitter.
        for _ in 0..100 {
            let damage = compute_fort_damage(0, 1, 100, &mut rng).unwrap();
            assert!(damage <= 1);
        }
    }
}
