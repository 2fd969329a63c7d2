use crate::battle::state::Winner;
use crate::errors::{DataError, DataResult};
use rand::seq::IndexedRandom;
use rand::Rng;
use schema::{BaseStatsRecord, SpeciesRecord};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Resolves a creature name into the raw record needed to build a combatant.
pub trait SpeciesProvider {
    fn lookup(&self, name: &str) -> DataResult<SpeciesRecord>;
}

/// In-memory species catalog with case-insensitive lookup.
#[derive(Debug, Clone, Default)]
pub struct SpeciesCatalog {
    species: HashMap<String, SpeciesRecord>,
}

impl SpeciesCatalog {
    pub fn from_records(records: impl IntoIterator<Item = SpeciesRecord>) -> Self {
        let species = records
            .into_iter()
            .map(|record| (catalog_key(&record.name), record))
            .collect();
        Self { species }
    }

    /// Parse a RON list of species records.
    pub fn from_ron_str(content: &str) -> DataResult<Self> {
        let records: Vec<SpeciesRecord> =
            ron::from_str(content).map_err(|e| DataError::MalformedData(e.to_string()))?;
        Ok(Self::from_records(records))
    }

    /// Parse a JSON array of species records.
    pub fn from_json_str(content: &str) -> DataResult<Self> {
        let records: Vec<SpeciesRecord> =
            serde_json::from_str(content).map_err(|e| DataError::MalformedData(e.to_string()))?;
        Ok(Self::from_records(records))
    }

    /// Load a catalog file, picking the format by extension (`.json`, otherwise RON).
    pub fn load(path: &Path) -> DataResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            DataError::MalformedData(format!("{}: {}", path.display(), e))
        })?;

        let catalog = match path.extension().and_then(|s| s.to_str()) {
            Some("json") => Self::from_json_str(&content)?,
            _ => Self::from_ron_str(&content)?,
        };
        tracing::info!(path = %path.display(), species = catalog.len(), "species catalog loaded");
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.species.len()
    }

    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }

    /// Species names in alphabetical order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.species.values().map(|r| r.name.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Draw `size` species names at random. The same species may appear twice.
    pub fn random_roster<R: Rng + ?Sized>(&self, size: usize, rng: &mut R) -> Vec<String> {
        let names = self.names();
        (0..size)
            .filter_map(|_| names.choose(rng).map(|name| name.to_string()))
            .collect()
    }

    /// Draw two random rosters and rank them by total base stats without playing a turn.
    pub fn quick_battle<R: Rng + ?Sized>(&self, size: usize, rng: &mut R) -> DataResult<QuickBattle> {
        let roster_a = self.random_roster(size, rng);
        let roster_b = self.random_roster(size, rng);
        let score_a = roster_strength(self, &roster_a)?;
        let score_b = roster_strength(self, &roster_b)?;

        let winner = match score_a.cmp(&score_b) {
            Ordering::Greater => Winner::A,
            Ordering::Less => Winner::B,
            Ordering::Equal => Winner::Draw,
        };

        Ok(QuickBattle {
            roster_a,
            roster_b,
            score_a,
            score_b,
            winner,
        })
    }
}

/// Two random rosters ranked by their summed base stats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuickBattle {
    pub roster_a: Vec<String>,
    pub roster_b: Vec<String>,
    pub score_a: u32,
    pub score_b: u32,
    pub winner: Winner,
}

/// Sum of every base stat across a roster. A missing stat counts as zero.
pub fn roster_strength<P, S>(provider: &P, roster: &[S]) -> DataResult<u32>
where
    P: SpeciesProvider + ?Sized,
    S: AsRef<str>,
{
    roster.iter().try_fold(0u32, |total, name| {
        let record = provider.lookup(name.as_ref())?;
        Ok(total + base_stat_total(&record.base_stats))
    })
}

fn base_stat_total(stats: &BaseStatsRecord) -> u32 {
    [
        stats.hp,
        stats.attack,
        stats.defense,
        stats.special_attack,
        stats.special_defense,
        stats.speed,
    ]
    .into_iter()
    .flatten()
    .map(u32::from)
    .sum()
}

impl SpeciesProvider for SpeciesCatalog {
    fn lookup(&self, name: &str) -> DataResult<SpeciesRecord> {
        self.species
            .get(&catalog_key(name))
            .cloned()
            .ok_or_else(|| DataError::SpeciesNotFound(name.to_string()))
    }
}

// Keys are upper-cased so "pikachu", "Pikachu" and "PIKACHU" resolve alike.
fn catalog_key(name: &str) -> String {
    name.trim().to_uppercase()
}
