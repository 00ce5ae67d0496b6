//! Error types for the thornhold-engine crate.
//!
//! All operations that can fail return typed errors rather than panicking.
//! Note that an ineligible engagement is *not* an error -- it is a
//! classified outcome of the eligibility check; the errors here are caller
//! contract violations and degenerate sampling inputs.

/// Errors that can occur during battle resolution.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The caller requested a resolution with zero turns.
    #[error("battle resolution requires at least one turn (got {turns})")]
    InvalidTurns {
        /// The turn count the caller passed.
        turns: u32,
    },

    /// A formula was handed a zero defender damage denominator.
    ///
    /// The resolver clamps defender damage to a minimum of 1 before any
    /// division, so this surfacing means a caller invoked a calculator
    /// directly without honoring that contract.
    #[error("defender damage must be >= 1 before fort or experience division (attacker damage: {attacker_damage})")]
    ZeroDefenderDamage {
        /// The attacker damage that would have been the numerator.
        attacker_damage: u64,
    },

    /// A casualty rate left the valid probability range.
    #[error("casualty rate {rate} is outside the binomial probability range")]
    CasualtyRate {
        /// The rejected per-unit loss probability.
        rate: f64,
    },

    /// An arithmetic overflow occurred during an outcome computation.
    #[error("arithmetic overflow in battle computation: {context}")]
    ArithmeticOverflow {
        /// Description of what was being computed.
        context: String,
    },
}
