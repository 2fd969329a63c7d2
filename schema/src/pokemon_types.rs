use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum PokemonType {
    Normal,
    Fighting,
    Flying,
    Poison,
    Ground,
    Rock,
    Bug,
    Ghost,
    Steel,
    Fire,
    Water,
    Grass,
    Electric,
    Psychic,
    Ice,
    Dragon,
    Dark,
    Fairy,
    Typeless,
}

impl PokemonType {
    /// Calculate type effectiveness multiplier for attacking type vs defending type
    /// Returns: 2.0 = Super Effective, 1.0 = Normal, 0.5 = Not Very Effective, 0.0 = No Effect
    pub fn type_effectiveness(attacking: PokemonType, defending: PokemonType) -> f32 {
        use PokemonType::*;

        match (attacking, defending) {
            // Normal
            (Normal, Ghost) => 0.0,
            (Normal, Rock) | (Normal, Steel) => 0.5,

            // Fire
            (Fire, Fire) | (Fire, Water) | (Fire, Rock) | (Fire, Dragon) => 0.5,
            (Fire, Grass) | (Fire, Ice) | (Fire, Bug) | (Fire, Steel) => 2.0,

            // Water
            (Water, Water) | (Water, Grass) | (Water, Dragon) => 0.5,
            (Water, Fire) | (Water, Ground) | (Water, Rock) => 2.0,

            // Electric
            (Electric, Electric) | (Electric, Grass) | (Electric, Dragon) => 0.5,
            (Electric, Ground) => 0.0,
            (Electric, Water) | (Electric, Flying) => 2.0,

            // Grass
            (Grass, Fire)
            | (Grass, Grass)
            | (Grass, Poison)
            | (Grass, Flying)
            | (Grass, Bug)
            | (Grass, Dragon)
            | (Grass, Steel) => 0.5,
            (Grass, Water) | (Grass, Ground) | (Grass, Rock) => 2.0,

            // Ice
            (Ice, Fire) | (Ice, Water) | (Ice, Ice) | (Ice, Steel) => 0.5,
            (Ice, Grass) | (Ice, Ground) | (Ice, Flying) | (Ice, Dragon) => 2.0,

            // Fighting
            (Fighting, Poison)
            | (Fighting, Flying)
            | (Fighting, Psychic)
            | (Fighting, Bug)
            | (Fighting, Fairy) => 0.5,
            (Fighting, Ghost) => 0.0,
            (Fighting, Normal)
            | (Fighting, Ice)
            | (Fighting, Rock)
            | (Fighting, Dark)
            | (Fighting, Steel) => 2.0,

            // Poison
            (Poison, Poison) | (Poison, Ground) | (Poison, Rock) | (Poison, Ghost) => 0.5,
            (Poison, Steel) => 0.0,
            (Poison, Grass) | (Poison, Fairy) => 2.0,

            // Ground
            (Ground, Grass) | (Ground, Bug) => 0.5,
            (Ground, Flying) => 0.0,
            (Ground, Fire)
            | (Ground, Electric)
            | (Ground, Poison)
            | (Ground, Rock)
            | (Ground, Steel) => 2.0,

            // Flying
            (Flying, Electric) | (Flying, Rock) | (Flying, Steel) => 0.5,
            (Flying, Grass) | (Flying, Fighting) | (Flying, Bug) => 2.0,

            // Psychic
            (Psychic, Psychic) | (Psychic, Steel) => 0.5,
            (Psychic, Dark) => 0.0,
            (Psychic, Fighting) | (Psychic, Poison) => 2.0,

            // Bug
            (Bug, Fire)
            | (Bug, Fighting)
            | (Bug, Poison)
            | (Bug, Flying)
            | (Bug, Ghost)
            | (Bug, Steel)
            | (Bug, Fairy) => 0.5,
            (Bug, Grass) | (Bug, Psychic) | (Bug, Dark) => 2.0,

            // Rock
            (Rock, Fighting) | (Rock, Ground) | (Rock, Steel) => 0.5,
            (Rock, Fire) | (Rock, Ice) | (Rock, Flying) | (Rock, Bug) => 2.0,

            // Ghost
            (Ghost, Normal) => 0.0,
            (Ghost, Ghost) | (Ghost, Psychic) => 2.0,
            (Ghost, Dark) => 0.5,

            // Dragon
            (Dragon, Dragon) => 2.0,
            (Dragon, Steel) => 0.5,
            (Dragon, Fairy) => 0.0,

            // Dark
            (Dark, Psychic) | (Dark, Ghost) => 2.0,
            (Dark, Fighting) | (Dark, Dark) | (Dark, Fairy) => 0.5,

            // Steel
            (Steel, Ice) | (Steel, Rock) | (Steel, Fairy) => 2.0,
            (Steel, Fire) | (Steel, Water) | (Steel, Electric) | (Steel, Steel) => 0.5,

            // Fairy
            (Fairy, Fighting) | (Fairy, Dragon) | (Fairy, Dark) => 2.0,
            (Fairy, Fire) | (Fairy, Poison) | (Fairy, Steel) => 0.5,

            // Anything not listed is a neutral matchup.
            _ => 1.0,
        }
    }

    /// Multiplier against a defender with one or more types: the product of the
    /// single-type lookups.
    pub fn effectiveness_against(attacking: PokemonType, defending: &[PokemonType]) -> f32 {
        defending
            .iter()
            .map(|&defender| Self::type_effectiveness(attacking, defender))
            .product()
    }

    pub fn is_immune(attacking: PokemonType, defending: PokemonType) -> bool {
        Self::type_effectiveness(attacking, defending) == 0.0
    }
}
