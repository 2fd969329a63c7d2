use crate::battle::calculators::{calculate_damage, type_effectiveness_against, DamageContext};
use crate::battle::state::{BattleEvent, BattleState, EventBus, GameState, TurnRng, Winner};
use crate::battle::stats::{effective_speed, move_hits};
use crate::errors::{ActionError, BattleResult, BattleStateError};
use crate::moves::MoveShape;
use crate::player::{PlayerAction, Side};

/// A side is required to submit an action only while its active Pokemon can fight
/// and something is left for it to do.
pub fn side_must_act(battle_state: &BattleState, side: Side) -> bool {
    battle_state.player(side).active_alive().is_some() && side_has_options(battle_state, side)
}

/// Whether the side has any usable move or switch target, ignoring its action slot.
pub fn side_has_options(battle_state: &BattleState, side: Side) -> bool {
    let player = battle_state.player(side);
    let can_attack = player
        .active_alive()
        .is_some_and(|pokemon| pokemon.has_usable_move());
    let can_switch = player
        .team
        .iter()
        .enumerate()
        .any(|(index, pokemon)| !pokemon.is_fainted() && player.active_pokemon_index != Some(index));
    can_attack || can_switch
}

/// Validate an action for a side without touching the state.
pub fn validate_player_action(
    battle_state: &BattleState,
    side: Side,
    action: &PlayerAction,
) -> BattleResult<()> {
    if battle_state.is_decided() {
        return Err(BattleStateError::BattleDecided.into());
    }
    if battle_state.pending_action(side).is_some() {
        return Err(ActionError::AlreadySubmitted(side).into());
    }

    let player = battle_state.player(side);

    match action {
        PlayerAction::UseMove { move_index } => {
            let pokemon = player
                .active_pokemon()
                .ok_or(ActionError::NoActivePokemon)?;
            if pokemon.is_fainted() {
                return Err(ActionError::ActivePokemonFainted.into());
            }

            let move_instance = pokemon
                .moves
                .get(*move_index)
                .ok_or(ActionError::InvalidMoveIndex(*move_index))?;
            if move_instance.pp == 0 {
                return Err(ActionError::NoPpRemaining(move_instance.name.clone()).into());
            }
        }
        PlayerAction::SwitchPokemon { team_index } => {
            let target = player
                .team
                .get(*team_index)
                .ok_or(ActionError::InvalidPokemonIndex(*team_index))?;
            if target.is_fainted() {
                return Err(ActionError::TargetFainted(*team_index).into());
            }
            // Switching away from a fainted active Pokemon is allowed.
            if player.active_pokemon_index == Some(*team_index) {
                return Err(ActionError::AlreadyActive(*team_index).into());
            }
        }
    }

    Ok(())
}

/// Store a validated action in the side's slot. Rejections leave the state untouched.
pub fn set_player_action(
    battle_state: &mut BattleState,
    side: Side,
    action: PlayerAction,
) -> BattleResult<()> {
    if let Err(err) = validate_player_action(battle_state, side, &action) {
        tracing::debug!(battle_id = %battle_state.battle_id, %side, %action, %err, "action rejected");
        return Err(err);
    }

    battle_state.action_queue[side.to_index()] = Some(action);
    tracing::debug!(battle_id = %battle_state.battle_id, %side, %action, "action accepted");
    Ok(())
}

pub fn select_move(battle_state: &mut BattleState, side: Side, move_index: usize) -> BattleResult<()> {
    set_player_action(battle_state, side, PlayerAction::UseMove { move_index })
}

pub fn select_switch(battle_state: &mut BattleState, side: Side, team_index: usize) -> BattleResult<()> {
    set_player_action(battle_state, side, PlayerAction::SwitchPokemon { team_index })
}

/// Every action the side could legally submit right now.
pub fn get_valid_actions(battle_state: &BattleState, side: Side) -> Vec<PlayerAction> {
    let player = battle_state.player(side);
    let mut actions = Vec::new();

    if let Some(pokemon) = player.active_pokemon() {
        actions.extend(
            (0..pokemon.moves.len()).map(|move_index| PlayerAction::UseMove { move_index }),
        );
    }
    actions.extend(
        (0..player.team.len()).map(|team_index| PlayerAction::SwitchPokemon { team_index }),
    );

    actions.retain(|action| validate_player_action(battle_state, side, action).is_ok());
    actions
}

/// Ready once every required side has queued an action and at least one action is queued.
pub fn ready_for_turn_resolution(battle_state: &BattleState) -> bool {
    if battle_state.game_state != GameState::WaitingForActions {
        return false;
    }

    let required_filled = Side::BOTH
        .iter()
        .all(|&side| !side_must_act(battle_state, side) || battle_state.pending_action(side).is_some());
    let any_queued = battle_state.action_queue.iter().any(Option::is_some);

    required_filled && any_queued
}

/// Main entry point for turn resolution.
/// Executes the queued actions in speed order and returns the turn's events.
pub fn resolve_turn(battle_state: &mut BattleState, rng: &mut TurnRng) -> BattleResult<EventBus> {
    if battle_state.is_decided() {
        return Err(BattleStateError::BattleDecided.into());
    }
    if !ready_for_turn_resolution(battle_state) {
        return Err(BattleStateError::NotReady.into());
    }

    let mut bus = EventBus::new();

    // 1. Initialization
    battle_state.game_state = GameState::TurnInProgress;
    bus.push(BattleEvent::TurnStarted {
        turn_number: battle_state.turn_number,
    });
    let alive_at_start = Side::BOTH.map(|side| battle_state.player(side).active_alive().is_some());

    // 2. Ordered execution; stops as soon as the battle is decided
    for (side, action) in determine_action_order(battle_state, rng) {
        if battle_state.is_decided() {
            break;
        }
        if alive_at_start[side.to_index()] && battle_state.player(side).active_alive().is_none() {
            bus.push(BattleEvent::ActionSkipped { side });
            continue;
        }

        let fainted_before = active_fainted_flags(battle_state);
        execute_battle_action(side, action, battle_state, &mut bus, rng);
        announce_new_faints(battle_state, fainted_before, &mut bus);
        check_win_conditions(battle_state, &mut bus);
    }

    // 3. Cleanup & Finalization
    finalize_turn(battle_state, &mut bus);

    tracing::debug!(
        battle_id = %battle_state.battle_id,
        turn = battle_state.turn_number,
        events = bus.len(),
        state = ?battle_state.game_state,
        "turn resolved"
    );
    battle_state.append_log(&bus);
    Ok(bus)
}

/// Higher active speed acts first. A tie is settled by a coin flip from `rng`.
pub fn determine_action_order(
    battle_state: &BattleState,
    rng: &mut TurnRng,
) -> Vec<(Side, PlayerAction)> {
    let queued: Vec<(Side, PlayerAction)> = Side::BOTH
        .iter()
        .filter_map(|&side| battle_state.pending_action(side).map(|action| (side, action)))
        .collect();

    if queued.len() < 2 {
        return queued;
    }

    let speed = |side: Side| {
        battle_state
            .player(side)
            .active_pokemon()
            .map(effective_speed)
            .unwrap_or(0)
    };

    let a_first = match speed(Side::A).cmp(&speed(Side::B)) {
        std::cmp::Ordering::Greater => true,
        std::cmp::Ordering::Less => false,
        std::cmp::Ordering::Equal => rng.next_outcome("Speed Tie") <= 50,
    };

    if a_first {
        queued
    } else {
        queued.into_iter().rev().collect()
    }
}

pub fn execute_battle_action(
    side: Side,
    action: PlayerAction,
    battle_state: &mut BattleState,
    bus: &mut EventBus,
    rng: &mut TurnRng,
) {
    match action {
        PlayerAction::UseMove { move_index } => execute_move(side, move_index, battle_state, bus, rng),
        PlayerAction::SwitchPokemon { team_index } => execute_switch(side, team_index, battle_state, bus),
    }
}

fn execute_move(
    side: Side,
    move_index: usize,
    battle_state: &mut BattleState,
    bus: &mut EventBus,
    rng: &mut TurnRng,
) {
    // PP is spent before anything else, even if the move ends up doing nothing.
    let (attacker_name, move_used) = {
        let Some(attacker) = battle_state.player_mut(side).active_pokemon_mut() else {
            tracing::warn!(%side, "move queued without an active Pokemon");
            return;
        };
        let attacker_name = attacker.name.clone();
        let Some(move_instance) = attacker.moves.get_mut(move_index) else {
            tracing::warn!(%side, move_index, "queued move index out of range");
            return;
        };
        if !move_instance.use_move() {
            tracing::warn!(%side, move_name = %move_instance.name, "queued move has no PP");
            return;
        }
        (attacker_name, move_instance.clone())
    };

    bus.push(BattleEvent::MoveUsed {
        side,
        pokemon: attacker_name.clone(),
        move_used: move_used.name.clone(),
    });

    let defender_side = side.opponent();
    let Some(defender) = battle_state.player(defender_side).active_alive() else {
        bus.push(BattleEvent::NoTarget {
            side,
            move_used: move_used.name.clone(),
        });
        return;
    };
    let defender_name = defender.name.clone();

    let effectiveness = type_effectiveness_against(&move_used, defender);
    if effectiveness == 0.0 {
        bus.push(BattleEvent::TypeImmunity {
            target: defender_name,
        });
        return;
    }

    if !move_hits(&move_used, battle_state.rules.accuracy_checks, rng) {
        bus.push(BattleEvent::MoveMissed {
            pokemon: attacker_name,
        });
        return;
    }

    match move_used.shape() {
        MoveShape::NonDamaging => {
            // Status effects are not implemented; the move resolves as a no-op.
            bus.push(BattleEvent::MoveHadNoEffect);
        }
        MoveShape::Physical { .. } | MoveShape::Special { .. } => {
            let damage = {
                let (Some(attacker), Some(defender)) = (
                    battle_state.player(side).active_pokemon(),
                    battle_state.player(defender_side).active_pokemon(),
                ) else {
                    return;
                };
                let ctx = DamageContext {
                    attacker,
                    defender,
                    move_used: &move_used,
                    effectiveness,
                };
                calculate_damage(&ctx, rng)
            };

            let Some(defender) = battle_state.player_mut(defender_side).active_pokemon_mut() else {
                return;
            };
            defender.take_damage(damage);
            bus.push(BattleEvent::DamageDealt {
                target: defender_name,
                damage,
                remaining_hp: defender.current_hp(),
            });
            bus.push(BattleEvent::AttackTypeEffectiveness {
                multiplier: effectiveness,
            });
        }
    }
}

fn execute_switch(side: Side, team_index: usize, battle_state: &mut BattleState, bus: &mut EventBus) {
    let player = battle_state.player_mut(side);
    let Some(incoming) = player.team.get(team_index).map(|p| p.name.clone()) else {
        tracing::warn!(%side, team_index, "queued switch target out of range");
        return;
    };

    if let Some(outgoing) = player.active_alive() {
        bus.push(BattleEvent::PokemonWithdrawn {
            side,
            pokemon: outgoing.name.clone(),
        });
    }
    player.active_pokemon_index = Some(team_index);
    bus.push(BattleEvent::PokemonSentOut {
        side,
        pokemon: incoming,
    });
}

fn active_fainted_flags(battle_state: &BattleState) -> [bool; 2] {
    Side::BOTH.map(|side| {
        battle_state
            .player(side)
            .active_pokemon()
            .is_some_and(|p| p.is_fainted())
    })
}

fn announce_new_faints(battle_state: &BattleState, fainted_before: [bool; 2], bus: &mut EventBus) {
    let fainted_after = active_fainted_flags(battle_state);
    for side in Side::BOTH {
        let i = side.to_index();
        if fainted_after[i] && !fainted_before[i] {
            if let Some(pokemon) = battle_state.player(side).active_pokemon() {
                bus.push(BattleEvent::PokemonFainted {
                    side,
                    pokemon: pokemon.name.clone(),
                });
            }
        }
    }
}

/// Check win conditions and update battle state accordingly.
/// Once the battle is decided, further checks change nothing.
pub fn check_win_conditions(battle_state: &mut BattleState, bus: &mut EventBus) {
    if battle_state.is_decided() {
        return;
    }

    let a_lost = battle_state.player(Side::A).has_lost();
    let b_lost = battle_state.player(Side::B).has_lost();

    let (game_state, winner) = match (a_lost, b_lost) {
        (true, true) => (GameState::Draw, Winner::Draw),
        (true, false) => (GameState::SideBWin, Winner::B),
        (false, true) => (GameState::SideAWin, Winner::A),
        (false, false) => return,
    };

    battle_state.game_state = game_state;
    for side in Side::BOTH {
        if battle_state.player(side).has_lost() {
            bus.push(BattleEvent::PlayerDefeated { side });
        }
    }
    bus.push(BattleEvent::BattleEnded { winner });
    tracing::info!(battle_id = %battle_state.battle_id, ?winner, "battle decided");
}

fn finalize_turn(battle_state: &mut BattleState, bus: &mut EventBus) {
    // A decided battle keeps its slots as they were.
    if battle_state.is_decided() {
        return;
    }

    if battle_state.rules.auto_replace_fainted {
        send_out_replacements(battle_state, bus);
    }

    if Side::BOTH.iter().all(|&side| !side_has_options(battle_state, side)) {
        declare_stalemate(battle_state, bus);
        return;
    }

    bus.push(BattleEvent::TurnEnded {
        turn_number: battle_state.turn_number,
    });
    battle_state.action_queue = [None, None];
    battle_state.turn_number += 1;
    battle_state.game_state = GameState::WaitingForActions;
}

// Neither side can move or switch again, so no further turn could ever resolve.
fn declare_stalemate(battle_state: &mut BattleState, bus: &mut EventBus) {
    battle_state.game_state = GameState::Draw;
    bus.push(BattleEvent::Stalemate);
    bus.push(BattleEvent::BattleEnded { winner: Winner::Draw });
    tracing::info!(battle_id = %battle_state.battle_id, turn = battle_state.turn_number, "battle ended in stalemate");
}

/// Replace each fainted active Pokemon with the first healthy roster member.
fn send_out_replacements(battle_state: &mut BattleState, bus: &mut EventBus) {
    for side in Side::BOTH {
        let player = battle_state.player_mut(side);
        if player.active_alive().is_some() {
            continue;
        }
        let Some(index) = player.first_alive_index() else {
            continue;
        };
        player.active_pokemon_index = Some(index);
        bus.push(BattleEvent::PokemonSentOut {
            side,
            pokemon: player.team[index].name.clone(),
        });
    }
}
