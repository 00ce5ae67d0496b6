//! Collaborator boundaries for persistence.
//!
//! The engine performs no I/O. These traits are the shapes it hands its
//! results to: a player repository that stores absolute post-battle state,
//! and a battle log that durably records each resolution. In-memory
//! implementations back the sim binary and tests; real storage lives with
//! the persistence collaborator.
//!
//! # Serialization contract
//!
//! Implementations must guarantee at most one in-flight resolution per
//! player: applying two battle outcomes to the same player concurrently is
//! a race the engine does not (and cannot) arbitrate.

use std::collections::BTreeMap;

use thornhold_types::{BattleId, BattleRecord, BattleResult, Combatant, PlayerId, Side, UnitStack};

// ---------------------------------------------------------------------------
// PlayerUpdate
// ---------------------------------------------------------------------------

/// Absolute post-battle state for one player.
///
/// Mirrors the persistence layer's column setters: every field is the new
/// value, not a delta, so applying an update twice is idempotent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerUpdate {
    /// Gold on hand after the battle.
    pub gold: u64,
    /// Fort hitpoints after the battle.
    pub fort_hitpoints: u32,
    /// Accumulated experience after the battle.
    pub experience: u64,
    /// Unit stacks after casualties.
    pub units: Vec<UnitStack>,
}

/// Build the absolute update for one side of a resolved battle.
///
/// Derives the post-battle values from the pre-battle snapshot and the
/// result, with the same clamping rules as
/// [`apply_battle_outcome`](crate::outcome::apply_battle_outcome): pillage
/// never exceeds the defender's gold, fort hitpoints clamp to the fort
/// maximum, and a zero XP award leaves experience untouched.
pub fn player_update_for(side: Side, snapshot: &Combatant, result: &BattleResult) -> PlayerUpdate {
    let mut units = snapshot.units.clone();
    match side {
        Side::Attacker => {
            crate::outcome::apply_casualties(&mut units, &result.attacker_casualties);
            let experience = if result.xp_earned > 0 {
                snapshot.experience.saturating_add(result.xp_earned)
            } else {
                snapshot.experience
            };
            PlayerUpdate {
                gold: snapshot.gold.saturating_add(result.gold_pillaged),
                fort_hitpoints: result.attacker_fort_hp.min(snapshot.fort_hitpoints.max),
                experience,
                units,
            }
        }
        Side::Defender => {
            crate::outcome::apply_casualties(&mut units, &result.defender_casualties);
            PlayerUpdate {
                gold: snapshot.gold.saturating_sub(result.gold_pillaged.min(snapshot.gold)),
                fort_hitpoints: result.defender_fort_hp.min(snapshot.fort_hitpoints.max),
                experience: snapshot.experience,
                units,
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from the in-memory repository implementations.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// The player is not present in the repository.
    #[error("player not found: {0}")]
    PlayerNotFound(PlayerId),

    /// The battle record is not present in the log.
    #[error("battle not found: {0}")]
    BattleNotFound(BattleId),
}

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

/// Stores player state and applies battle outcomes to it.
pub trait PlayerRepository {
    /// Apply an absolute post-battle update to a player.
    fn apply_battle_outcome(
        &mut self,
        player_id: PlayerId,
        update: &PlayerUpdate,
    ) -> Result<(), RepositoryError>;
}

/// Durably records resolved battles for later retrieval.
pub trait BattleLogRepository {
    /// Append a battle record, returning its identifier.
    fn record(&mut self, record: BattleRecord) -> BattleId;

    /// Fetch a battle record by identifier.
    fn fetch(&self, battle_id: BattleId) -> Result<&BattleRecord, RepositoryError>;

    /// All battles a player fought, most recent last.
    fn history_for(&self, player_id: PlayerId) -> Vec<&BattleRecord>;
}

// ---------------------------------------------------------------------------
// In-memory implementations
// ---------------------------------------------------------------------------

/// In-memory player store for tests and the sim binary.
#[derive(Debug, Clone, Default)]
pub struct MemoryPlayers {
    players: BTreeMap<PlayerId, Combatant>,
}

impl MemoryPlayers {
    /// Create an empty store.
    pub const fn new() -> Self {
        Self {
            players: BTreeMap::new(),
        }
    }

    /// Insert or replace a player snapshot.
    pub fn insert(&mut self, combatant: Combatant) {
        self.players.insert(combatant.player_id, combatant);
    }

    /// Read a player's current state.
    pub fn get(&self, player_id: PlayerId) -> Option<&Combatant> {
        self.players.get(&player_id)
    }
}

impl PlayerRepository for MemoryPlayers {
    fn apply_battle_outcome(
        &mut self,
        player_id: PlayerId,
        update: &PlayerUpdate,
    ) -> Result<(), RepositoryError> {
        let player = self
            .players
            .get_mut(&player_id)
            .ok_or(RepositoryError::PlayerNotFound(player_id))?;
        player.gold = update.gold;
        player.fort_hitpoints.current = update.fort_hitpoints.min(player.fort_hitpoints.max);
        player.experience = update.experience;
        player.units = update.units.clone();
        Ok(())
    }
}

/// In-memory battle log for tests and the sim binary.
#[derive(Debug, Clone, Default)]
pub struct MemoryBattleLog {
    records: Vec<BattleRecord>,
}

impl MemoryBattleLog {
    /// Create an empty log.
    pub const fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Number of recorded battles.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the log holds no battles.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl BattleLogRepository for MemoryBattleLog {
    fn record(&mut self, record: BattleRecord) -> BattleId {
        let battle_id = record.battle_id;
        self.records.push(record);
        battle_id
    }

    fn fetch(&self, battle_id: BattleId) -> Result<&BattleRecord, RepositoryError> {
        self.records
            .iter()
            .find(|record| record.battle_id == battle_id)
            .ok_or(RepositoryError::BattleNotFound(battle_id))
    }

    fn history_for(&self, player_id: PlayerId) -> Vec<&BattleRecord> {
        self.records
            .iter()
            .filter(|record| {
                record.attacker_id == player_id || record.defender_id == player_id
            })
            .collect()
    }
}
