//! Pokemon Duel Battle Engine
//!
//! A two-participant, simultaneous-turn creature battle engine. Each side
//! submits one action per turn; once every required side has acted the turn
//! resolves in speed order with typed damage, PP tracking, switching, fainting
//! and win/draw detection. Sessions are safe to drive from two concurrent
//! callers and expose per-viewer snapshots that never leak the opponent's moves.

// --- MODULE DECLARATIONS ---
pub mod battle;
pub mod config;
pub mod errors;
pub mod moves;
pub mod player;
pub mod pokemon;
pub mod session;
pub mod species;

// --- PUBLIC API RE-EXPORTS ---

// --- From the `schema` crate ---
pub use schema::{BaseStatsRecord, DamageClass, MoveRecord, PokemonType, SpeciesRecord};

// --- From this crate's modules (`src/`) ---

// Core battle engine functions and state.
pub use battle::engine::{ready_for_turn_resolution, resolve_turn, select_move, select_switch};
pub use battle::state::{BattleEvent, BattleState, EventBus, GameState, TurnRng, Winner};
pub use battle::view::{snapshot, StateView, SNAPSHOT_SCHEMA_VERSION};

// Core runtime types for a battle.
pub use moves::{MoveInstance, MoveShape};
pub use player::{BattlePlayer, PlayerAction, Side};
pub use pokemon::{PokemonInst, StatBlock, StatusCondition};

// Configuration, data access and orchestration.
pub use config::{BattleConfig, BattleRules};
pub use errors::{BattleEngineError, BattleResult, ConfigError, DataError};
pub use session::{BattleSession, SideToken};
pub use species::{roster_strength, QuickBattle, SpeciesCatalog, SpeciesProvider};
