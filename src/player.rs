use crate::pokemon::PokemonInst;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies one of the two participants in a battle.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    A,
    B,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::A, Side::B];

    pub fn to_index(self) -> usize {
        match self {
            Side::A => 0,
            Side::B => 1,
        }
    }

    pub fn opponent(self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::A => write!(f, "side A"),
            Side::B => write!(f, "side B"),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerAction {
    // The index refers to the move's position in the active Pokémon's move list.
    UseMove { move_index: usize },

    // The index refers to the Pokémon's position in the player's team.
    SwitchPokemon { team_index: usize },
}

impl fmt::Display for PlayerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerAction::UseMove { move_index } => write!(f, "use move #{}", move_index),
            PlayerAction::SwitchPokemon { team_index } => write!(f, "switch to #{}", team_index),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct BattlePlayer {
    pub player_name: String,

    // Roster order is fixed for the whole battle.
    pub team: Vec<PokemonInst>,

    // `None` once every roster member has fainted and nobody can be sent out.
    pub active_pokemon_index: Option<usize>,
}

impl BattlePlayer {
    /// Create a new BattlePlayer with the first non-fainted member active.
    pub fn new(player_name: impl Into<String>, team: Vec<PokemonInst>) -> Self {
        let mut player = BattlePlayer {
            player_name: player_name.into(),
            team,
            active_pokemon_index: None,
        };
        player.active_pokemon_index = player.first_alive_index();
        player
    }

    /// Get the currently active Pokemon
    pub fn active_pokemon(&self) -> Option<&PokemonInst> {
        self.active_pokemon_index.and_then(|i| self.team.get(i))
    }

    /// Get the currently active Pokemon mutably
    pub fn active_pokemon_mut(&mut self) -> Option<&mut PokemonInst> {
        match self.active_pokemon_index {
            Some(i) => self.team.get_mut(i),
            None => None,
        }
    }

    /// The active Pokemon, only if it can still act or be targeted.
    pub fn active_alive(&self) -> Option<&PokemonInst> {
        self.active_pokemon().filter(|p| p.is_alive())
    }

    pub fn first_alive_index(&self) -> Option<usize> {
        self.team.iter().position(|p| p.is_alive())
    }

    /// A side has lost once every member of its roster has fainted.
    pub fn has_lost(&self) -> bool {
        self.team.iter().all(|p| p.is_fainted())
    }
}

impl fmt::Display for BattlePlayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.active_pokemon() {
            Some(pokemon) => write!(
                f,
                "{}: {} ({}% HP)",
                self.player_name,
                pokemon.name,
                pokemon.hp_percentage()
            ),
            None => write!(f, "{}: no active Pokémon", self.player_name),
        }
    }
}
