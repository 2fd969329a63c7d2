use crate::battle::stats::{calculate_hp, calculate_stat};
use crate::errors::{DataError, DataResult};
use crate::moves::MoveInstance;
use schema::{BaseStatsRecord, PokemonType, SpeciesRecord};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reserved status slot. No status mechanics are applied by the engine yet;
/// the slot is carried so snapshots have a stable shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusCondition {
    Sleep,
    Poison,
    Burn,
    Freeze,
    Paralysis,
}

/// A six-stat block. Used both for base stats and derived stats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatBlock {
    pub hp: u16,
    pub attack: u16,
    pub defense: u16,
    pub special_attack: u16,
    pub special_defense: u16,
    pub speed: u16,
}

impl StatBlock {
    /// Validate a raw record, naming the first missing stat.
    pub fn from_record(species: &str, record: &BaseStatsRecord) -> DataResult<Self> {
        let require = |value: Option<u16>, stat: &'static str| {
            value.ok_or_else(|| DataError::MissingBaseStat {
                species: species.to_string(),
                stat,
            })
        };

        Ok(StatBlock {
            hp: require(record.hp, "hp")?,
            attack: require(record.attack, "attack")?,
            defense: require(record.defense, "defense")?,
            special_attack: require(record.special_attack, "special_attack")?,
            special_defense: require(record.special_defense, "special_defense")?,
            speed: require(record.speed, "speed")?,
        })
    }

    /// Derive effective stats from base stats at a level.
    pub fn derive(base: &StatBlock, level: u8) -> Self {
        StatBlock {
            hp: calculate_hp(base.hp, level),
            attack: calculate_stat(base.attack, level),
            defense: calculate_stat(base.defense, level),
            special_attack: calculate_stat(base.special_attack, level),
            special_defense: calculate_stat(base.special_defense, level),
            speed: calculate_stat(base.speed, level),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PokemonInst {
    pub name: String,
    pub level: u8,
    pub types: Vec<PokemonType>,
    pub base_stats: StatBlock,
    // Computed once at construction; nothing in battle modifies these.
    stats: StatBlock,
    curr_hp: u16,
    pub moves: Vec<MoveInstance>,
    pub status: Option<StatusCondition>,
    fainted: bool,
}

impl PokemonInst {
    /// Create a new Pokemon instance from base stats and a level, at full HP.
    pub fn new(
        name: impl Into<String>,
        level: u8,
        types: Vec<PokemonType>,
        base_stats: StatBlock,
        moves: Vec<MoveInstance>,
    ) -> Self {
        let stats = StatBlock::derive(&base_stats, level);
        PokemonInst {
            name: name.into(),
            level,
            types,
            base_stats,
            stats,
            curr_hp: stats.hp,
            moves,
            status: None,
            fainted: stats.hp == 0,
        }
    }

    /// Build a combatant from a species record, validating every required field.
    pub fn from_record(record: &SpeciesRecord) -> DataResult<Self> {
        if record.level == 0 || record.level > 100 {
            return Err(DataError::InvalidLevel {
                species: record.name.clone(),
                level: record.level,
            });
        }

        if record.types.is_empty() || record.types.len() > 2 {
            return Err(DataError::InvalidTypeCount {
                species: record.name.clone(),
                count: record.types.len(),
            });
        }
        let types = record
            .types
            .iter()
            .map(|t| {
                t.parse::<PokemonType>()
                    .map_err(|_| DataError::UnknownType(t.clone()))
            })
            .collect::<DataResult<Vec<_>>>()?;

        let base_stats = StatBlock::from_record(&record.name, &record.base_stats)?;

        if record.moves.is_empty() {
            return Err(DataError::MissingMoves(record.name.clone()));
        }
        let moves = record
            .moves
            .iter()
            .map(MoveInstance::from_record)
            .collect::<DataResult<Vec<_>>>()?;

        Ok(PokemonInst::new(
            record.name.clone(),
            record.level,
            types,
            base_stats,
            moves,
        ))
    }

    /// Build a combatant whose effective stats are exactly `stats`, at full HP.
    #[cfg(test)]
    pub(crate) fn new_for_test(
        name: impl Into<String>,
        level: u8,
        types: Vec<PokemonType>,
        stats: StatBlock,
        moves: Vec<MoveInstance>,
    ) -> Self {
        PokemonInst {
            name: name.into(),
            level,
            types,
            base_stats: stats,
            stats,
            curr_hp: stats.hp,
            moves,
            status: None,
            fainted: stats.hp == 0,
        }
    }

    pub fn stats(&self) -> &StatBlock {
        &self.stats
    }

    pub fn max_hp(&self) -> u16 {
        self.stats.hp
    }

    pub fn current_hp(&self) -> u16 {
        self.curr_hp
    }

    pub fn is_fainted(&self) -> bool {
        self.fainted
    }

    pub fn is_alive(&self) -> bool {
        !self.fainted
    }

    /// Current HP as a whole percentage of max HP (0-100).
    pub fn hp_percentage(&self) -> u8 {
        if self.stats.hp == 0 {
            return 0;
        }
        ((self.curr_hp as u32 * 100) / self.stats.hp as u32) as u8
    }

    /// Apply damage, clamping at zero. Returns true if this damage caused fainting.
    pub fn take_damage(&mut self, damage: u16) -> bool {
        let was_fainted = self.fainted;
        self.curr_hp = self.curr_hp.saturating_sub(damage);
        if self.curr_hp == 0 {
            self.fainted = true;
        }
        !was_fainted && self.fainted
    }

    /// Set HP directly, clamped to the valid range. Keeps the fainted flag in sync.
    pub fn set_hp(&mut self, hp: u16) {
        self.curr_hp = hp.min(self.stats.hp);
        self.fainted = self.curr_hp == 0;
    }

    pub fn has_type(&self, pokemon_type: PokemonType) -> bool {
        self.types.contains(&pokemon_type)
    }

    /// True if at least one move still has PP.
    pub fn has_usable_move(&self) -> bool {
        self.moves.iter().any(|m| m.pp > 0)
    }
}

impl fmt::Display for PokemonInst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let types: Vec<String> = self.types.iter().map(|t| t.to_string()).collect();
        write!(
            f,
            "{} Lv.{} [{}] HP: {}/{}",
            self.name,
            self.level,
            types.join("/"),
            self.curr_hp,
            self.stats.hp
        )?;
        if self.fainted {
            write!(f, " (Fainted)")?;
        }

        // Alternate form ({:#}) lists moves on following lines.
        if f.alternate() {
            for m in &self.moves {
                write!(f, "\n  - {}", m)?;
            }
        }
        Ok(())
    }
}
