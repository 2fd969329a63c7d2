use crate::battle::state::{BattleState, TurnRng};
use crate::config::BattleRules;
use crate::errors::BattleResult;
use crate::moves::MoveInstance;
use crate::player::BattlePlayer;
use crate::pokemon::{PokemonInst, StatBlock};
use schema::{DamageClass, PokemonType};

/// A builder for creating test Pokemon instances with common defaults.
/// Stats given to the builder are used as the effective stats directly.
///
/// # Example
/// ```ignore
/// let pokemon = TestPokemonBuilder::new("Pikachu", 25)
///     .with_types(vec![PokemonType::Electric])
///     .with_moves(vec![tackle()])
///     .with_hp(10)
///     .build();
/// ```
pub struct TestPokemonBuilder {
    name: String,
    level: u8,
    types: Vec<PokemonType>,
    stats: StatBlock,
    moves: Option<Vec<MoveInstance>>,
    current_hp: Option<u16>,
}

impl TestPokemonBuilder {
    /// Creates a new builder for a given name and level.
    pub fn new(name: &str, level: u8) -> Self {
        Self {
            name: name.to_string(),
            level,
            types: vec![PokemonType::Normal],
            stats: StatBlock {
                hp: 100,
                attack: 80,
                defense: 80,
                special_attack: 80,
                special_defense: 80,
                speed: 80,
            },
            moves: None,
            current_hp: None,
        }
    }

    pub fn with_types(mut self, types: Vec<PokemonType>) -> Self {
        self.types = types;
        self
    }

    /// Sets the effective stats: hp, attack, defense, special attack, special defense, speed.
    pub fn with_stats(mut self, hp: u16, attack: u16, defense: u16, special_attack: u16, special_defense: u16, speed: u16) -> Self {
        self.stats = StatBlock {
            hp,
            attack,
            defense,
            special_attack,
            special_defense,
            speed,
        };
        self
    }

    pub fn with_speed(mut self, speed: u16) -> Self {
        self.stats.speed = speed;
        self
    }

    /// Sets the moves for the test Pokemon. Defaults to a single Tackle.
    pub fn with_moves(mut self, moves: Vec<MoveInstance>) -> Self {
        self.moves = Some(moves);
        self
    }

    /// Sets the current HP for the test Pokemon. If not set, HP will be max.
    pub fn with_hp(mut self, hp: u16) -> Self {
        self.current_hp = Some(hp);
        self
    }

    pub fn build(self) -> PokemonInst {
        let moves = self.moves.unwrap_or_else(|| vec![tackle()]);
        let mut pokemon = PokemonInst::new_for_test(self.name, self.level, self.types, self.stats, moves);
        if let Some(hp) = self.current_hp {
            pokemon.set_hp(hp);
        }
        pokemon
    }
}

pub fn move_with(
    name: &str,
    move_type: PokemonType,
    power: Option<u16>,
    damage_class: DamageClass,
    pp: u8,
) -> MoveInstance {
    MoveInstance::new(name, move_type, power, Some(100), damage_class, pp)
}

pub fn tackle() -> MoveInstance {
    move_with("Tackle", PokemonType::Normal, Some(40), DamageClass::Physical, 35)
}

pub fn ember() -> MoveInstance {
    move_with("Ember", PokemonType::Fire, Some(40), DamageClass::Special, 25)
}

pub fn shadow_ball() -> MoveInstance {
    move_with("Shadow Ball", PokemonType::Ghost, Some(80), DamageClass::Special, 15)
}

pub fn growl() -> MoveInstance {
    move_with("Growl", PokemonType::Normal, None, DamageClass::Status, 40)
}

/// Creates a default test player with a given name and team.
pub fn create_test_player(name: &str, team: Vec<PokemonInst>) -> BattlePlayer {
    BattlePlayer::new(name, team)
}

/// Creates a battle between two teams with default rules.
pub fn create_test_battle(team_a: Vec<PokemonInst>, team_b: Vec<PokemonInst>) -> BattleState {
    create_test_battle_with_rules(team_a, team_b, BattleRules::default())
}

pub fn create_test_battle_with_rules(
    team_a: Vec<PokemonInst>,
    team_b: Vec<PokemonInst>,
    rules: BattleRules,
) -> BattleState {
    BattleState::new(
        "test_battle",
        create_test_player("Player 1", team_a),
        create_test_player("Player 2", team_b),
        rules,
    )
}

/// Creates a `TurnRng` instance with a long list of default values (50).
/// Useful for tests where the specific RNG outcome is not important.
pub fn predictable_rng() -> TurnRng {
    TurnRng::new_for_test(vec![50; 100])
}

/// Asserts that a Result is Ok and returns the value.
pub fn assert_ok<T>(result: BattleResult<T>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => panic!("Expected Ok but got error: {}", err),
    }
}
