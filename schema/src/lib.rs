// Pokemon Duel Schema - Shared type definitions
// This crate holds the elemental type chart and the raw species/move records
// that a data provider hands to the battle engine.

// Re-export the main types
pub use pokemon_types::*;
pub use species_data::*;

pub mod pokemon_types;
pub mod species_data;
