use crate::config::BattleRules;
use crate::errors::{DataError, DataResult};
use crate::player::{BattlePlayer, PlayerAction, Side};
use crate::pokemon::PokemonInst;
use crate::species::SpeciesProvider;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Copy)]
pub enum GameState {
    WaitingForActions,
    TurnInProgress,
    SideAWin,
    SideBWin,
    Draw,
}

impl GameState {
    pub fn is_decided(self) -> bool {
        matches!(self, GameState::SideAWin | GameState::SideBWin | GameState::Draw)
    }
}

/// Final outcome of a decided battle.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Winner {
    #[serde(rename = "A")]
    A,
    #[serde(rename = "B")]
    B,
    #[serde(rename = "draw")]
    Draw,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum BattleEvent {
    // Turn Management
    TurnStarted {
        turn_number: u32,
    },
    TurnEnded {
        turn_number: u32,
    },

    // Pokemon Actions
    PokemonWithdrawn {
        side: Side,
        pokemon: String,
    },
    PokemonSentOut {
        side: Side,
        pokemon: String,
    },
    MoveUsed {
        side: Side,
        pokemon: String,
        move_used: String,
    },
    MoveMissed {
        pokemon: String,
    },
    /// PP was spent but the opposing side had nothing to hit.
    NoTarget {
        side: Side,
        move_used: String,
    },
    /// The action was dropped because the acting Pokemon fainted first.
    ActionSkipped {
        side: Side,
    },
    TypeImmunity {
        target: String,
    },
    AttackTypeEffectiveness {
        multiplier: f32,
    },
    DamageDealt {
        target: String,
        damage: u16,
        remaining_hp: u16,
    },
    /// A move with no implemented effect connected.
    MoveHadNoEffect,
    PokemonFainted {
        side: Side,
        pokemon: String,
    },

    // Battle End
    PlayerDefeated {
        side: Side,
    },
    /// Neither side has a usable move or switch left.
    Stalemate,
    BattleEnded {
        winner: Winner,
    },
}

impl BattleEvent {
    /// Formats the event into a human-readable string using battle context.
    /// Returns None for silent events that should not produce user-visible text.
    pub fn format(&self, battle_state: &BattleState) -> Option<String> {
        let player_name = |side: &Side| battle_state.player(*side).player_name.clone();

        match self {
            BattleEvent::TurnStarted { turn_number } => {
                Some(format!("--- Turn {} ---", turn_number))
            }
            BattleEvent::TurnEnded { turn_number } => {
                Some(format!("--- End of Turn {} ---", turn_number))
            }
            BattleEvent::PokemonWithdrawn { side, pokemon } => {
                Some(format!("{} withdrew {}!", player_name(side), pokemon))
            }
            BattleEvent::PokemonSentOut { side, pokemon } => {
                Some(format!("{} sent out {}!", player_name(side), pokemon))
            }
            BattleEvent::MoveUsed {
                pokemon, move_used, ..
            } => Some(format!("{} used {}!", pokemon, move_used)),
            BattleEvent::MoveMissed { pokemon } => {
                Some(format!("{}'s attack missed!", pokemon))
            }
            BattleEvent::NoTarget { .. } => Some("But there was no target...".to_string()),
            BattleEvent::ActionSkipped { .. } => None,
            BattleEvent::TypeImmunity { target } => {
                Some(format!("It doesn't affect {}...", target))
            }
            BattleEvent::AttackTypeEffectiveness { multiplier } => match *multiplier {
                m if m > 1.0 => Some("It's super effective!".to_string()),
                m if m < 1.0 && m > 0.0 => Some("It's not very effective...".to_string()),
                _ => None, // Normal effectiveness, no message
            },
            BattleEvent::DamageDealt { target, damage, .. } => {
                Some(format!("{} took {} damage.", target, damage))
            }
            BattleEvent::MoveHadNoEffect => Some("But nothing happened.".to_string()),
            BattleEvent::PokemonFainted { pokemon, .. } => Some(format!("{} fainted!", pokemon)),
            BattleEvent::PlayerDefeated { side } => {
                Some(format!("{} has no more Pokemon!", player_name(side)))
            }
            BattleEvent::Stalemate => Some("Neither side can continue!".to_string()),
            BattleEvent::BattleEnded { winner } => match winner {
                Winner::A => Some(format!("{} wins!", player_name(&Side::A))),
                Winner::B => Some(format!("{} wins!", player_name(&Side::B))),
                Winner::Draw => Some("The battle ended in a draw!".to_string()),
            },
        }
    }
}

/// Event bus for collecting the events of one turn.
#[derive(Debug, Clone, Default)]
pub struct EventBus {
    events: Vec<BattleEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, event: BattleEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[BattleEvent] {
        &self.events
    }

    /// Formatted text of every non-silent event, in order.
    pub fn formatted(&self, battle_state: &BattleState) -> Vec<String> {
        self.events
            .iter()
            .filter_map(|event| event.format(battle_state))
            .collect()
    }

    /// Return true if the event bus contains no events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Return the number of events in the bus.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[cfg(test)]
    pub fn print_debug_with_message(&self, message: &str) {
        println!("{}", message);
        print!("{}", self);
    }
}

impl std::fmt::Display for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for event in &self.events {
            writeln!(f, "  {:?}", event)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
enum RngSource {
    Scripted { outcomes: Vec<u8>, index: usize },
    Seeded(StdRng),
}

/// Random source for turn resolution (speed ties, damage variance, accuracy).
/// Either seeded, or scripted with a fixed list of outcomes for tests.
#[derive(Debug, Clone)]
pub struct TurnRng {
    source: RngSource,
}

impl TurnRng {
    /// Scripted outcomes, consumed in order. Once exhausted the last value repeats.
    pub fn new_for_test(outcomes: Vec<u8>) -> Self {
        Self {
            source: RngSource::Scripted { outcomes, index: 0 },
        }
    }

    pub fn from_seed(seed: u64) -> Self {
        Self {
            source: RngSource::Seeded(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn new_random() -> Self {
        Self {
            source: RngSource::Seeded(StdRng::from_os_rng()),
        }
    }

    /// A roll in 1..=100.
    pub fn next_outcome(&mut self, reason: &str) -> u8 {
        self.next_in_range(1, 100, reason)
    }

    /// A roll in `low..=high`. Scripted values are clamped into the range.
    pub fn next_in_range(&mut self, low: u8, high: u8, reason: &str) -> u8 {
        match &mut self.source {
            RngSource::Seeded(rng) => rng.random_range(low..=high),
            RngSource::Scripted { outcomes, index } => {
                let outcome = match outcomes.get(*index) {
                    Some(value) => {
                        *index += 1;
                        *value
                    }
                    None => {
                        tracing::warn!(reason, "scripted TurnRng exhausted, repeating last value");
                        outcomes.last().copied().unwrap_or(low)
                    }
                };

                #[cfg(test)]
                println!("[RNG] Consumed {} for: {}", outcome, reason);

                outcome.clamp(low, high)
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct BattleState {
    pub battle_id: String,
    pub players: [BattlePlayer; 2],
    pub turn_number: u32,
    pub game_state: GameState,
    pub action_queue: [Option<PlayerAction>; 2],
    pub rules: BattleRules,
    log: Vec<String>,
}

impl BattleState {
    pub fn new(
        id: impl Into<String>,
        player_a: BattlePlayer,
        player_b: BattlePlayer,
        rules: BattleRules,
    ) -> Self {
        Self {
            battle_id: id.into(),
            players: [player_a, player_b],
            turn_number: 1,
            game_state: GameState::WaitingForActions,
            action_queue: [None, None],
            rules,
            log: Vec::new(),
        }
    }

    /// Resolve both rosters through the provider and build a battle.
    /// Any lookup or validation failure aborts creation.
    pub fn from_rosters<P, S>(
        id: impl Into<String>,
        provider: &P,
        roster_a: &[S],
        roster_b: &[S],
        rules: BattleRules,
    ) -> DataResult<Self>
    where
        P: SpeciesProvider + ?Sized,
        S: AsRef<str>,
    {
        let team_a = build_team(provider, roster_a, Side::A)?;
        let team_b = build_team(provider, roster_b, Side::B)?;

        let state = Self::new(
            id,
            BattlePlayer::new("Player 1", team_a),
            BattlePlayer::new("Player 2", team_b),
            rules,
        );
        tracing::info!(
            battle_id = %state.battle_id,
            side_a = state.players[0].team.len(),
            side_b = state.players[1].team.len(),
            "battle created"
        );
        Ok(state)
    }

    pub fn player(&self, side: Side) -> &BattlePlayer {
        &self.players[side.to_index()]
    }

    pub fn player_mut(&mut self, side: Side) -> &mut BattlePlayer {
        &mut self.players[side.to_index()]
    }

    pub fn pending_action(&self, side: Side) -> Option<PlayerAction> {
        self.action_queue[side.to_index()]
    }

    pub fn is_decided(&self) -> bool {
        self.game_state.is_decided()
    }

    pub fn winner(&self) -> Option<Winner> {
        match self.game_state {
            GameState::SideAWin => Some(Winner::A),
            GameState::SideBWin => Some(Winner::B),
            GameState::Draw => Some(Winner::Draw),
            _ => None,
        }
    }

    /// The append-only battle log.
    pub fn log(&self) -> &[String] {
        &self.log
    }

    /// Append the formatted text of a turn's events to the log.
    pub(crate) fn append_log(&mut self, bus: &EventBus) {
        let lines = bus.formatted(self);
        self.log.extend(lines);
    }
}

fn build_team<P, S>(provider: &P, names: &[S], side: Side) -> DataResult<Vec<PokemonInst>>
where
    P: SpeciesProvider + ?Sized,
    S: AsRef<str>,
{
    if names.is_empty() {
        return Err(DataError::EmptyRoster(side));
    }

    names
        .iter()
        .map(|name| {
            let record = provider.lookup(name.as_ref())?;
            PokemonInst::from_record(&record)
        })
        .collect()
}

#[cfg(test)]
mod event_formatting_tests {
    use super::*;
    use crate::battle::tests::common::{create_test_battle, TestPokemonBuilder};

    fn create_test_battle_state() -> BattleState {
        create_test_battle(
            vec![TestPokemonBuilder::new("Pikachu", 25).build()],
            vec![TestPokemonBuilder::new("Charmander", 25).build()],
        )
    }

    #[test]
    fn test_silent_events_return_none() {
        let battle_state = create_test_battle_state();

        let silent_events = vec![
            BattleEvent::ActionSkipped { side: Side::A },
            BattleEvent::AttackTypeEffectiveness { multiplier: 1.0 },
        ];

        for event in silent_events {
            assert!(
                event.format(&battle_state).is_none(),
                "Event {:?} should be silent but returned text",
                event
            );
        }
    }

    #[test]
    fn test_event_text_samples() {
        let battle_state = create_test_battle_state();

        let turn_event = BattleEvent::TurnStarted { turn_number: 5 };
        assert_eq!(turn_event.format(&battle_state), Some("--- Turn 5 ---".to_string()));

        let effectiveness_event = BattleEvent::AttackTypeEffectiveness { multiplier: 0.5 };
        assert_eq!(
            effectiveness_event.format(&battle_state),
            Some("It's not very effective...".to_string())
        );

        let super_event = BattleEvent::AttackTypeEffectiveness { multiplier: 4.0 };
        assert_eq!(
            super_event.format(&battle_state),
            Some("It's super effective!".to_string())
        );

        let immune_event = BattleEvent::TypeImmunity {
            target: "Gastly".to_string(),
        };
        assert_eq!(
            immune_event.format(&battle_state),
            Some("It doesn't affect Gastly...".to_string())
        );

        let ended = BattleEvent::BattleEnded { winner: Winner::B };
        assert_eq!(ended.format(&battle_state), Some("Player 2 wins!".to_string()));

        let sent_out = BattleEvent::PokemonSentOut {
            side: Side::A,
            pokemon: "Pikachu".to_string(),
        };
        assert_eq!(
            sent_out.format(&battle_state),
            Some("Player 1 sent out Pikachu!".to_string())
        );
    }

    #[test]
    fn test_event_bus_collects_formatted_lines() {
        let battle_state = create_test_battle_state();
        let mut bus = EventBus::new();
        bus.push(BattleEvent::TurnStarted { turn_number: 1 });
        bus.push(BattleEvent::ActionSkipped { side: Side::B });
        bus.push(BattleEvent::MoveHadNoEffect);

        assert_eq!(bus.len(), 3);
        assert_eq!(
            bus.formatted(&battle_state),
            vec!["--- Turn 1 ---".to_string(), "But nothing happened.".to_string()]
        );
        assert!(format!("{}", bus).contains("ActionSkipped"));
    }

    #[test]
    fn test_scripted_rng_clamps_and_repeats() {
        let mut rng = TurnRng::new_for_test(vec![10, 120]);
        assert_eq!(rng.next_in_range(85, 100, "variance"), 85);
        assert_eq!(rng.next_in_range(85, 100, "variance"), 100);
        // Exhausted: last value repeats
        assert_eq!(rng.next_outcome("extra"), 100);
    }

    #[test]
    fn test_seeded_rng_is_deterministic() {
        let mut a = TurnRng::from_seed(42);
        let mut b = TurnRng::from_seed(42);
        for _ in 0..20 {
            let roll = a.next_in_range(85, 100, "variance");
            assert!((85..=100).contains(&roll));
            assert_eq!(roll, b.next_in_range(85, 100, "variance"));
        }
    }
}
