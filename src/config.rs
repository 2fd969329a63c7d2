use crate::battle::state::TurnRng;
use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_DATA_PATH: &str = "data/creatures.ron";

/// Rule toggles for mechanics that are optional in a duel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleRules {
    /// Send out the first healthy roster member when the active one faints.
    pub auto_replace_fainted: bool,
    /// Roll accuracy before a move connects. Off means every move hits.
    pub accuracy_checks: bool,
}

impl Default for BattleRules {
    fn default() -> Self {
        Self {
            auto_replace_fainted: true,
            accuracy_checks: false,
        }
    }
}

/// Top-level configuration, read from a RON file.
///
/// ```ron
/// (
///     data_path: "data/creatures.ron",
///     seed: Some(42),
///     auto_resolve: true,
///     rules: (auto_replace_fainted: true, accuracy_checks: false),
/// )
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleConfig {
    pub data_path: PathBuf,
    pub seed: Option<u64>,
    /// Resolve the turn as soon as the last required action arrives.
    pub auto_resolve: bool,
    pub rules: BattleRules,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            seed: None,
            auto_resolve: true,
            rules: BattleRules::default(),
        }
    }
}

impl BattleConfig {
    pub fn from_ron_str(content: &str) -> Result<Self, ConfigError> {
        ron::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let config = Self::from_ron_str(&content)?;
        tracing::debug!(path = %path.display(), ?config, "config loaded");
        Ok(config)
    }

    /// Deterministic when a seed is configured, OS entropy otherwise.
    pub fn make_rng(&self) -> TurnRng {
        match self.seed {
            Some(seed) => TurnRng::from_seed(seed),
            None => TurnRng::new_random(),
        }
    }
}
