//! Attack quota: rate limiting engagements against one defender.
//!
//! The engine itself assumes the quota check already passed; this module
//! defines the boundary the caller queries before resolution, plus an
//! in-memory sliding-window policy for tests and the sim binary. Durable
//! quota storage belongs to the persistence collaborator.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};

use thornhold_types::PlayerId;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Default number of attacks allowed against one defender per window.
pub const DEFAULT_ATTACKS_PER_WINDOW: u32 = 5;

/// Default quota window length in hours.
pub const DEFAULT_WINDOW_HOURS: i64 = 24;

// ---------------------------------------------------------------------------
// AttackQuota
// ---------------------------------------------------------------------------

/// Answers whether an attacker may engage a defender again right now.
///
/// Queried before resolution; a denial means the caller never invokes the
/// engine for this pair.
pub trait AttackQuota {
    /// Whether the attacker may engage this defender within the current
    /// window.
    fn may_engage(&self, attacker: PlayerId, defender: PlayerId, now: DateTime<Utc>) -> bool;

    /// Record a resolved attack against the quota.
    fn record_attack(&mut self, attacker: PlayerId, defender: PlayerId, at: DateTime<Utc>);
}

// ---------------------------------------------------------------------------
// WindowQuota
// ---------------------------------------------------------------------------

/// In-memory sliding-window quota.
///
/// Tracks attack timestamps per attacker/defender pair and allows up to
/// `max_attacks` within the trailing window. Entries older than the window
/// are pruned on record.
#[derive(Debug, Clone)]
pub struct WindowQuota {
    window: Duration,
    max_attacks: u32,
    history: BTreeMap<(PlayerId, PlayerId), Vec<DateTime<Utc>>>,
}

impl WindowQuota {
    /// Create a quota with an explicit window and attack allowance.
    pub const fn new(window: Duration, max_attacks: u32) -> Self {
        Self {
            window,
            max_attacks,
            history: BTreeMap::new(),
        }
    }

    /// Count attacks by this pair within the trailing window.
    pub fn attacks_in_window(
        &self,
        attacker: PlayerId,
        defender: PlayerId,
        now: DateTime<Utc>,
    ) -> u32 {
        let cutoff = now - self.window;
        self.history
            .get(&(attacker, defender))
            .map_or(0, |timestamps| {
                let recent = timestamps.iter().filter(|at| **at > cutoff).count();
                u32::try_from(recent).unwrap_or(u32::MAX)
            })
    }
}

impl Default for WindowQuota {
    fn default() -> Self {
        Self::new(Duration::hours(DEFAULT_WINDOW_HOURS), DEFAULT_ATTACKS_PER_WINDOW)
    }
}

impl AttackQuota for WindowQuota {
    fn may_engage(&self, attacker: PlayerId, defender: PlayerId, now: DateTime<Utc>) -> bool {
        self.attacks_in_window(attacker, defender, now) < self.max_attacks
    }

    fn record_attack(&mut self, attacker: PlayerId, defender: PlayerId, at: DateTime<Utc>) {
        let cutoff = at - self.window;
        let timestamps = self.history.entry((attacker, defender)).or_default();
        timestamps.retain(|stamp| *stamp > cutoff);
        timestamps.push(at);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn fresh_pair_may_engage() {
        let quota = WindowQuota::default();
        assert!(quota.may_engage(PlayerId::new(), PlayerId::new(), Utc::now()));
    }

    #[test]
    fn quota_exhausts_after_max_attacks() {
        let mut quota = WindowQuota::default();
        let attacker = PlayerId::new();
        let defender = PlayerId::new();
        let now = Utc::now();

        for _ in 0..DEFAULT_ATTACKS_PER_WINDOW {
            assert!(quota.may_engage(attacker, defender, now));
            quota.record_attack(attacker, defender, now);
        }
        assert!(!quota.may_engage(attacker, defender, now));
    }

    #[test]
    fn quota_is_per_pair() {
        let mut quota = WindowQuota::new(Duration::hours(24), 1);
        let attacker = PlayerId::new();
        let first = PlayerId::new();
        let second = PlayerId::new();
        let now = Utc::now();

        quota.record_attack(attacker, first, now);
        assert!(!quota.may_engage(attacker, first, now));
        assert!(quota.may_engage(attacker, second, now));
    }

    #[test]
    fn old_attacks_roll_out_of_the_window() {
        let mut quota = WindowQuota::new(Duration::hours(24), 1);
        let attacker = PlayerId::new();
        let defender = PlayerId::new();
        let yesterday = Utc::now() - Duration::hours(25);

        quota.record_attack(attacker, defender, yesterday);
        assert!(quota.may_engage(attacker, defender, Utc::now()));
        assert_eq!(quota.attacks_in_window(attacker, defender, Utc::now()), 0);
    }
}
