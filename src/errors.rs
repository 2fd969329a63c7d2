use crate::player::Side;
use thiserror::Error;

/// Main error type for the Pokemon Duel battle engine
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BattleEngineError {
    /// Error related to species or move data resolution
    #[error("Data error: {0}")]
    Data(#[from] DataError),
    /// Operation attempted in a battle state that does not allow it
    #[error("Battle state error: {0}")]
    BattleState(#[from] BattleStateError),
    /// A submitted action failed validation
    #[error("Action error: {0}")]
    Action(#[from] ActionError),
}

/// Errors raised while resolving rosters into combatants.
/// These are fatal to battle creation; no partial battle is produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataError {
    /// The data provider has no entry for this name
    #[error("Species not found: {0}")]
    SpeciesNotFound(String),
    #[error("{species} is missing base stat '{stat}'")]
    MissingBaseStat { species: String, stat: &'static str },
    #[error("{0} has no moves")]
    MissingMoves(String),
    #[error("{species} has {count} types (expected 1 or 2)")]
    InvalidTypeCount { species: String, count: usize },
    #[error("Unknown type '{0}'")]
    UnknownType(String),
    #[error("Unknown damage class '{0}'")]
    UnknownDamageClass(String),
    #[error("{species} has invalid level {level}")]
    InvalidLevel { species: String, level: u8 },
    /// A side submitted no creatures at all
    #[error("Roster for {0} is empty")]
    EmptyRoster(Side),
    /// Catalog file could not be read or parsed
    #[error("Malformed data: {0}")]
    MalformedData(String),
}

/// Errors related to battle state validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BattleStateError {
    /// The battle already has a winner (or ended in a draw)
    #[error("The battle is already decided")]
    BattleDecided,
    /// Not every side that must act has submitted an action
    #[error("Turn is not ready: waiting for actions")]
    NotReady,
    /// The caller presented a token that does not belong to this session
    #[error("Unknown side token")]
    UnknownSideToken,
}

/// Errors related to player actions
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    /// Move index is out of bounds
    #[error("Invalid move index: {0}")]
    InvalidMoveIndex(usize),
    /// Pokemon index is out of bounds
    #[error("Invalid Pokemon index: {0}")]
    InvalidPokemonIndex(usize),
    #[error("{0} has no PP remaining")]
    NoPpRemaining(String),
    #[error("No active Pokemon")]
    NoActivePokemon,
    #[error("Active Pokemon has fainted")]
    ActivePokemonFainted,
    #[error("Cannot switch to fainted Pokemon at index {0}")]
    TargetFainted(usize),
    #[error("Pokemon at index {0} is already active")]
    AlreadyActive(usize),
    #[error("{0} already submitted an action this turn")]
    AlreadySubmitted(Side),
}

/// Errors raised while loading a configuration file
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Could not read config '{path}': {reason}")]
    Io { path: String, reason: String },
    #[error("Invalid config: {0}")]
    Parse(String),
}

/// Type alias for Results using BattleEngineError
pub type BattleResult<T> = Result<T, BattleEngineError>;

/// Type alias for Results using DataError
pub type DataResult<T> = Result<T, DataError>;
