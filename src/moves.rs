use crate::errors::{DataError, DataResult};
use schema::{DamageClass, MoveRecord, PokemonType};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a move resolves once it connects. Derived from the damage class and
/// power so the engine dispatches on a single closed enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveShape {
    Physical { power: u16 },
    Special { power: u16 },
    /// No power value: the move has no damaging effect.
    NonDamaging,
}

/// A move known by a combatant, with its remaining PP.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveInstance {
    pub name: String,
    pub move_type: PokemonType,
    pub power: Option<u16>,
    /// Parsed and exposed, but only consulted when accuracy checks are enabled.
    pub accuracy: Option<u8>,
    pub damage_class: DamageClass,
    pub max_pp: u8,
    pub pp: u8,
}

impl MoveInstance {
    /// Create a new move instance with max PP
    pub fn new(
        name: impl Into<String>,
        move_type: PokemonType,
        power: Option<u16>,
        accuracy: Option<u8>,
        damage_class: DamageClass,
        max_pp: u8,
    ) -> Self {
        MoveInstance {
            name: name.into(),
            move_type,
            power,
            accuracy,
            damage_class,
            max_pp,
            pp: max_pp,
        }
    }

    /// Build a move from a raw data record
    pub fn from_record(record: &MoveRecord) -> DataResult<Self> {
        let move_type = record
            .move_type
            .parse::<PokemonType>()
            .map_err(|_| DataError::UnknownType(record.move_type.clone()))?;
        let damage_class = record
            .damage_class
            .parse::<DamageClass>()
            .map_err(|_| DataError::UnknownDamageClass(record.damage_class.clone()))?;

        Ok(MoveInstance::new(
            record.name.clone(),
            move_type,
            record.power,
            record.accuracy,
            damage_class,
            record.pp,
        ))
    }

    pub fn shape(&self) -> MoveShape {
        match (self.power, self.damage_class) {
            (None, _) | (Some(0), _) => MoveShape::NonDamaging,
            (Some(power), DamageClass::Special) => MoveShape::Special { power },
            // Status-class moves that still carry power resolve on the physical pair.
            (Some(power), DamageClass::Physical | DamageClass::Status) => {
                MoveShape::Physical { power }
            }
        }
    }

    /// Use the move (decrease PP)
    pub fn use_move(&mut self) -> bool {
        if self.pp > 0 {
            self.pp -= 1;
            true
        } else {
            false
        }
    }
}

impl fmt::Display for MoveInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let power = self
            .power
            .map(|p| p.to_string())
            .unwrap_or_else(|| "--".to_string());
        write!(
            f,
            "{} ({}, {}) Pow: {} PP: {}/{}",
            self.name, self.move_type, self.damage_class, power, self.pp, self.max_pp
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(power: Option<u16>, class: &str) -> MoveRecord {
        MoveRecord {
            name: "Test Move".to_string(),
            move_type: "normal".to_string(),
            power,
            accuracy: Some(100),
            pp: 2,
            damage_class: class.to_string(),
        }
    }

    #[test]
    fn test_shape_follows_class_and_power() {
        let physical = MoveInstance::from_record(&record(Some(40), "physical")).unwrap();
        let special = MoveInstance::from_record(&record(Some(90), "special")).unwrap();
        let status = MoveInstance::from_record(&record(None, "status")).unwrap();
        let zero = MoveInstance::from_record(&record(Some(0), "physical")).unwrap();

        assert_eq!(physical.shape(), MoveShape::Physical { power: 40 });
        assert_eq!(special.shape(), MoveShape::Special { power: 90 });
        assert_eq!(status.shape(), MoveShape::NonDamaging);
        assert_eq!(zero.shape(), MoveShape::NonDamaging);
    }

    #[test]
    fn test_use_move_never_goes_below_zero() {
        let mut mv = MoveInstance::from_record(&record(Some(40), "physical")).unwrap();
        assert!(mv.use_move());
        assert!(mv.use_move());
        assert_eq!(mv.pp, 0);
        assert!(!mv.use_move());
        assert_eq!(mv.pp, 0);
    }

    #[test]
    fn test_bad_record_is_a_data_error() {
        let mut bad_type = record(Some(40), "physical");
        bad_type.move_type = "cosmic".to_string();
        assert_eq!(
            MoveInstance::from_record(&bad_type),
            Err(DataError::UnknownType("cosmic".to_string()))
        );

        let bad_class = record(Some(40), "magical");
        assert_eq!(
            MoveInstance::from_record(&bad_class),
            Err(DataError::UnknownDamageClass("magical".to_string()))
        );
    }
}
