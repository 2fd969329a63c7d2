use crate::battle::state::TurnRng;
use crate::battle::stats::{effective_attack, effective_defense};
use crate::moves::{MoveInstance, MoveShape};
use crate::pokemon::PokemonInst;
use schema::PokemonType;

/// Everything a modifier stage may look at.
#[derive(Debug, Clone, Copy)]
pub struct DamageContext<'a> {
    pub attacker: &'a PokemonInst,
    pub defender: &'a PokemonInst,
    pub move_used: &'a MoveInstance,
    pub effectiveness: f32,
}

/// One multiplicative stage of the damage modifier chain.
/// New mechanics are added as new variants, appended to `DAMAGE_MODIFIERS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageModifier {
    SameTypeAttackBonus,
    TypeEffectiveness,
    RandomVariance,
    CriticalHit,
}

pub const DAMAGE_MODIFIERS: [DamageModifier; 4] = [
    DamageModifier::SameTypeAttackBonus,
    DamageModifier::TypeEffectiveness,
    DamageModifier::RandomVariance,
    DamageModifier::CriticalHit,
];

impl DamageModifier {
    pub fn multiplier(self, ctx: &DamageContext<'_>, rng: &mut TurnRng) -> f64 {
        match self {
            DamageModifier::SameTypeAttackBonus => {
                if ctx.attacker.has_type(ctx.move_used.move_type) {
                    1.5
                } else {
                    1.0
                }
            }
            DamageModifier::TypeEffectiveness => ctx.effectiveness as f64,
            DamageModifier::RandomVariance => {
                rng.next_in_range(85, 100, "Damage Variance") as f64 / 100.0
            }
            // Critical hits are never rolled yet.
            DamageModifier::CriticalHit => 1.0,
        }
    }
}

/// Type effectiveness of a move against every type of the defender.
pub fn type_effectiveness_against(move_used: &MoveInstance, defender: &PokemonInst) -> f32 {
    PokemonType::effectiveness_against(move_used.move_type, &defender.types)
}

/// ((2 * Level / 5 + 2) * Power * Attack / Defense) / 50 + 2
pub fn base_damage(level: u8, power: u16, attack: u16, defense: u16) -> f64 {
    let level_factor = 2.0 * level as f64 / 5.0 + 2.0;
    let defense = defense.max(1) as f64;
    (level_factor * power as f64 * attack as f64 / defense) / 50.0 + 2.0
}

/// Final damage for a damaging move. Non-damaging moves deal nothing.
/// Damage is at least 1 unless the effectiveness multiplier is zero.
pub fn calculate_damage(ctx: &DamageContext<'_>, rng: &mut TurnRng) -> u16 {
    let power = match ctx.move_used.shape() {
        MoveShape::Physical { power } | MoveShape::Special { power } => power,
        MoveShape::NonDamaging => return 0,
    };

    if ctx.effectiveness == 0.0 {
        return 0;
    }

    let attack = effective_attack(ctx.attacker, ctx.move_used);
    let defense = effective_defense(ctx.defender, ctx.move_used);
    let base = base_damage(ctx.attacker.level, power, attack, defense);

    let modifier: f64 = DAMAGE_MODIFIERS
        .iter()
        .map(|stage| stage.multiplier(ctx, rng))
        .product();

    let damage = (base * modifier).floor().max(1.0);
    damage.min(u16::MAX as f64) as u16
}
