use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Whether a move's power is resolved against the physical or the special
/// attack/defense pair. `Status` moves deal no direct damage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum DamageClass {
    Physical,
    Special,
    Status,
}

/// Base stats as they arrive from a data source. Every stat is optional so a
/// missing value is reported when a combatant is built, not when data is parsed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseStatsRecord {
    #[serde(default)]
    pub hp: Option<u16>,
    #[serde(default)]
    pub attack: Option<u16>,
    #[serde(default)]
    pub defense: Option<u16>,
    #[serde(default)]
    pub special_attack: Option<u16>,
    #[serde(default)]
    pub special_defense: Option<u16>,
    #[serde(default)]
    pub speed: Option<u16>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    pub name: String,
    #[serde(rename = "type", alias = "move_type")]
    pub move_type: String,
    #[serde(default)]
    pub power: Option<u16>,
    #[serde(default)]
    pub accuracy: Option<u8>,
    pub pp: u8,
    pub damage_class: String,
}

/// One species entry: everything the engine needs to build a combatant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeciesRecord {
    pub name: String,
    pub level: u8,
    #[serde(alias = "type")]
    pub types: Vec<String>,
    #[serde(default)]
    pub base_stats: BaseStatsRecord,
    #[serde(default)]
    pub moves: Vec<MoveRecord>,
}
