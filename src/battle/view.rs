use crate::battle::engine::{get_valid_actions, side_must_act};
use crate::battle::state::{BattleState, Winner};
use crate::moves::MoveInstance;
use crate::player::Side;
use crate::pokemon::{PokemonInst, StatBlock, StatusCondition};
use schema::{DamageClass, PokemonType};
use serde::{Deserialize, Serialize};

/// Bumped whenever a field of `StateView` changes meaning or shape.
pub const SNAPSHOT_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveView {
    pub name: String,
    pub move_type: PokemonType,
    pub power: Option<u16>,
    pub accuracy: Option<u8>,
    pub damage_class: DamageClass,
    pub current_pp: u8,
    pub max_pp: u8,
}

impl From<&MoveInstance> for MoveView {
    fn from(m: &MoveInstance) -> Self {
        Self {
            name: m.name.clone(),
            move_type: m.move_type,
            power: m.power,
            accuracy: m.accuracy,
            damage_class: m.damage_class,
            current_pp: m.pp,
            max_pp: m.max_pp,
        }
    }
}

/// What anyone may see about a combatant. Never carries moves or PP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatantPublicView {
    pub name: String,
    pub level: u8,
    pub current_hp: u16,
    pub max_hp: u16,
    pub hp_percentage: u8,
    pub status: Option<StatusCondition>,
    pub fainted: bool,
}

impl From<&PokemonInst> for CombatantPublicView {
    fn from(p: &PokemonInst) -> Self {
        Self {
            name: p.name.clone(),
            level: p.level,
            current_hp: p.current_hp(),
            max_hp: p.max_hp(),
            hp_percentage: p.hp_percentage(),
            status: p.status,
            fainted: p.is_fainted(),
        }
    }
}

/// The owner's view of their own active combatant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatantFullView {
    pub name: String,
    pub level: u8,
    pub types: Vec<PokemonType>,
    pub current_hp: u16,
    pub max_hp: u16,
    pub status: Option<StatusCondition>,
    pub fainted: bool,
    pub stats: StatBlock,
    pub moves: Vec<MoveView>,
}

impl From<&PokemonInst> for CombatantFullView {
    fn from(p: &PokemonInst) -> Self {
        Self {
            name: p.name.clone(),
            level: p.level,
            types: p.types.clone(),
            current_hp: p.current_hp(),
            max_hp: p.max_hp(),
            status: p.status,
            fainted: p.is_fainted(),
            stats: *p.stats(),
            moves: p.moves.iter().map(MoveView::from).collect(),
        }
    }
}

/// Snapshot of a battle as seen by one side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateView {
    pub version: u32,
    pub turn: u32,
    pub active: Option<CombatantFullView>,
    pub opponent_active: Option<CombatantPublicView>,
    pub roster: Vec<CombatantPublicView>,
    pub can_act: bool,
    pub waiting: bool,
    pub log: Vec<String>,
    pub decided: bool,
    pub winner: Option<Winner>,
}

pub fn snapshot(battle_state: &BattleState, side: Side) -> StateView {
    let player = battle_state.player(side);
    let opponent = battle_state.player(side.opponent());
    let decided = battle_state.is_decided();

    let can_act = !get_valid_actions(battle_state, side).is_empty();

    // Waiting only once this side has nothing left to submit.
    let opponent_outstanding = side_must_act(battle_state, side.opponent())
        && battle_state.pending_action(side.opponent()).is_none();
    let waiting = !decided && !can_act && opponent_outstanding;

    StateView {
        version: SNAPSHOT_SCHEMA_VERSION,
        turn: battle_state.turn_number,
        active: player.active_pokemon().map(CombatantFullView::from),
        opponent_active: opponent.active_pokemon().map(CombatantPublicView::from),
        roster: player.team.iter().map(CombatantPublicView::from).collect(),
        can_act,
        waiting,
        log: battle_state.log().to_vec(),
        decided,
        winner: battle_state.winner(),
    }
}
