#[cfg(test)]
mod tests {
    use crate::battle::engine::resolve_turn;
    use crate::battle::state::BattleEvent;
    use crate::battle::tests::common::{
        create_test_battle, ember, growl, move_with, predictable_rng, tackle, TestPokemonBuilder,
    };
    use crate::moves::MoveInstance;
    use crate::player::PlayerAction;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use schema::{DamageClass, PokemonType};

    fn thunderbolt() -> MoveInstance {
        move_with("Thunderbolt", PokemonType::Electric, Some(90), DamageClass::Special, 15)
    }

    #[rstest]
    #[case("Normal move vs Ghost", tackle(), vec![PokemonType::Ghost], true)]
    #[case("Electric move vs Ground", thunderbolt(), vec![PokemonType::Ground], true)]
    #[case("Electric move vs Water/Ground", thunderbolt(), vec![PokemonType::Water, PokemonType::Ground], true)]
    #[case("Status move vs Ghost", growl(), vec![PokemonType::Ghost], true)]
    #[case("Fire move vs Ghost/Poison", ember(), vec![PokemonType::Ghost, PokemonType::Poison], false)]
    fn test_immunity_short_circuits_the_move(
        #[case] desc: &str,
        #[case] attacking_move: MoveInstance,
        #[case] defender_types: Vec<PokemonType>,
        #[case] expect_immune: bool,
    ) {
        // Arrange: attacker is faster, defender only uses a harmless status move.
        let attacker = TestPokemonBuilder::new("Attacker", 50)
            .with_speed(150)
            .with_moves(vec![attacking_move])
            .build();
        let defender = TestPokemonBuilder::new("Gastly", 50)
            .with_types(defender_types)
            .with_speed(10)
            .with_moves(vec![growl()])
            .build();
        let defender_hp = defender.current_hp();
        let mut battle_state = create_test_battle(vec![attacker], vec![defender]);
        battle_state.action_queue = [
            Some(PlayerAction::UseMove { move_index: 0 }),
            Some(PlayerAction::UseMove { move_index: 0 }),
        ];

        // Act
        let bus = resolve_turn(&mut battle_state, &mut predictable_rng()).unwrap();
        bus.print_debug_with_message(&format!("Events for test_immunity_short_circuits_the_move [{}]:", desc));

        // Assert
        let events = bus.events();
        let immune = events.contains(&BattleEvent::TypeImmunity {
            target: "Gastly".to_string(),
        });
        let damaged = events.iter().any(|e| {
            matches!(e, BattleEvent::DamageDealt { target, .. } if target == "Gastly")
        });
        let gastly_hp = battle_state.players[1].active_pokemon().unwrap().current_hp();

        assert_eq!(immune, expect_immune, "{}", desc);
        if expect_immune {
            assert!(!damaged, "{}: immune target must take no damage", desc);
            assert_eq!(gastly_hp, defender_hp, "{}: HP must be unchanged", desc);
            assert!(battle_state
                .log()
                .contains(&"It doesn't affect Gastly...".to_string()));
            assert!(!battle_state
                .log()
                .iter()
                .any(|line| line.contains("not very effective")));
        } else {
            assert!(damaged, "{}", desc);
            assert!(gastly_hp < defender_hp);
        }

        // PP is spent either way
        let used = &battle_state.players[0].active_pokemon().unwrap().moves[0];
        assert_eq!(used.pp, used.max_pp - 1);
    }

    #[test]
    fn test_effective_hits_report_effectiveness() {
        let attacker = TestPokemonBuilder::new("Squirtle", 50)
            .with_types(vec![PokemonType::Water])
            .with_speed(100)
            .with_moves(vec![move_with("Water Gun", PokemonType::Water, Some(40), DamageClass::Special, 25)])
            .build();
        let defender = TestPokemonBuilder::new("Geodude", 50)
            .with_types(vec![PokemonType::Rock, PokemonType::Ground])
            .with_speed(20)
            .with_moves(vec![growl()])
            .build();
        let mut battle_state = create_test_battle(vec![attacker], vec![defender]);
        battle_state.action_queue = [
            Some(PlayerAction::UseMove { move_index: 0 }),
            Some(PlayerAction::UseMove { move_index: 0 }),
        ];

        let bus = resolve_turn(&mut battle_state, &mut predictable_rng()).unwrap();

        assert!(bus
            .events()
            .contains(&BattleEvent::AttackTypeEffectiveness { multiplier: 4.0 }));
        assert!(battle_state
            .log()
            .contains(&"It's super effective!".to_string()));
        // Geodude's Growl connects but has no implemented effect
        assert!(battle_state
            .log()
            .contains(&"But nothing happened.".to_string()));
    }
}
