use crate::battle::state::TurnRng;
use crate::moves::{MoveInstance, MoveShape};
use crate::pokemon::PokemonInst;

/// HP = floor(2 * Base * Level / 100) + Level + 10
pub fn calculate_hp(base_hp: u16, level: u8) -> u16 {
    let scaled = (2 * base_hp as u32 * level as u32) / 100;
    (scaled + level as u32 + 10).min(u16::MAX as u32) as u16
}

/// Other Stat = floor(2 * Base * Level / 100) + 5
pub fn calculate_stat(base_stat: u16, level: u8) -> u16 {
    let scaled = (2 * base_stat as u32 * level as u32) / 100;
    (scaled + 5).min(u16::MAX as u32) as u16
}

/// Attack stat used for a move: special attack for special moves, attack otherwise.
pub fn effective_attack(pokemon: &PokemonInst, move_instance: &MoveInstance) -> u16 {
    match move_instance.shape() {
        MoveShape::Special { .. } => pokemon.stats().special_attack,
        MoveShape::Physical { .. } => pokemon.stats().attack,
        MoveShape::NonDamaging => 0,
    }
}

/// Defense stat used against a move, mirroring `effective_attack`.
pub fn effective_defense(pokemon: &PokemonInst, move_instance: &MoveInstance) -> u16 {
    match move_instance.shape() {
        MoveShape::Special { .. } => pokemon.stats().special_defense,
        MoveShape::Physical { .. } => pokemon.stats().defense,
        MoveShape::NonDamaging => 0,
    }
}

pub fn effective_speed(pokemon: &PokemonInst) -> u16 {
    pokemon.stats().speed
}

/// Accuracy hook. With checks disabled every move connects; with checks enabled
/// a move carrying an accuracy value misses when a 1-100 roll exceeds it.
pub fn move_hits(move_instance: &MoveInstance, accuracy_checks: bool, rng: &mut TurnRng) -> bool {
    if !accuracy_checks {
        return true;
    }

    // If move has no accuracy value, it never misses (like Swift)
    let Some(accuracy) = move_instance.accuracy else {
        return true;
    };

    let roll = rng.next_outcome("Accuracy Check");
    roll <= accuracy.clamp(1, 100)
}
