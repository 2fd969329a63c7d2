#[cfg(test)]
mod tests {
    use crate::battle::engine::{resolve_turn, select_move, select_switch};
    use crate::battle::state::BattleEvent;
    use crate::battle::tests::common::{
        create_test_battle, create_test_battle_with_rules, predictable_rng, TestPokemonBuilder,
    };
    use crate::config::BattleRules;
    use crate::player::Side;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_switch_withdraws_and_sends_out() {
        let a_lead = TestPokemonBuilder::new("Bulbasaur", 50).with_speed(45).build();
        let a_bench = TestPokemonBuilder::new("Ivysaur", 50).build();
        let b = TestPokemonBuilder::new("Charmander", 50).with_speed(65).build();
        let mut battle_state = create_test_battle(vec![a_lead, a_bench], vec![b]);

        select_switch(&mut battle_state, Side::A, 1).unwrap();
        select_move(&mut battle_state, Side::B, 0).unwrap();

        let bus = resolve_turn(&mut battle_state, &mut predictable_rng()).unwrap();
        bus.print_debug_with_message("Events for test_switch_withdraws_and_sends_out:");

        assert_eq!(battle_state.players[0].active_pokemon_index, Some(1));
        assert!(bus.events().contains(&BattleEvent::PokemonWithdrawn {
            side: Side::A,
            pokemon: "Bulbasaur".to_string()
        }));
        assert!(bus.events().contains(&BattleEvent::PokemonSentOut {
            side: Side::A,
            pokemon: "Ivysaur".to_string()
        }));
        assert!(battle_state.log().contains(&"Player 1 withdrew Bulbasaur!".to_string()));
        assert!(battle_state.log().contains(&"Player 1 sent out Ivysaur!".to_string()));
    }

    #[test]
    fn test_switch_has_no_priority_over_faster_move() {
        // B is faster, so its Tackle lands on A's lead before the switch happens.
        let a_lead = TestPokemonBuilder::new("Bulbasaur", 50).with_speed(45).build();
        let a_bench = TestPokemonBuilder::new("Ivysaur", 50).build();
        let b = TestPokemonBuilder::new("Charmander", 50).with_speed(65).build();
        let mut battle_state = create_test_battle(vec![a_lead, a_bench], vec![b]);

        select_switch(&mut battle_state, Side::A, 1).unwrap();
        select_move(&mut battle_state, Side::B, 0).unwrap();
        let bus = resolve_turn(&mut battle_state, &mut predictable_rng()).unwrap();

        let damage_target = bus.events().iter().find_map(|e| match e {
            BattleEvent::DamageDealt { target, .. } => Some(target.clone()),
            _ => None,
        });
        assert_eq!(damage_target.as_deref(), Some("Bulbasaur"));

        let team = &battle_state.players[0].team;
        assert!(team[0].current_hp() < team[0].max_hp());
        assert_eq!(team[1].current_hp(), team[1].max_hp());
    }

    #[test]
    fn test_slower_move_hits_the_incoming_pokemon() {
        let a_lead = TestPokemonBuilder::new("Bulbasaur", 50).with_speed(90).build();
        let a_bench = TestPokemonBuilder::new("Ivysaur", 50).build();
        let b = TestPokemonBuilder::new("Charmander", 50).with_speed(65).build();
        let mut battle_state = create_test_battle(vec![a_lead, a_bench], vec![b]);

        select_switch(&mut battle_state, Side::A, 1).unwrap();
        select_move(&mut battle_state, Side::B, 0).unwrap();
        resolve_turn(&mut battle_state, &mut predictable_rng()).unwrap();

        let team = &battle_state.players[0].team;
        assert_eq!(team[0].current_hp(), team[0].max_hp());
        assert!(team[1].current_hp() < team[1].max_hp());
    }

    #[test]
    fn test_switch_out_of_a_fainted_active() {
        let a_lead = TestPokemonBuilder::new("Magikarp", 50).build();
        let a_bench = TestPokemonBuilder::new("Gyarados", 50).build();
        let b = TestPokemonBuilder::new("Pikachu", 50).build();
        let rules = BattleRules {
            auto_replace_fainted: false,
            ..BattleRules::default()
        };
        let mut battle_state = create_test_battle_with_rules(vec![a_lead, a_bench], vec![b], rules);
        battle_state.players[0].team[0].set_hp(0);

        select_switch(&mut battle_state, Side::A, 1).unwrap();
        select_move(&mut battle_state, Side::B, 0).unwrap();
        let bus = resolve_turn(&mut battle_state, &mut predictable_rng()).unwrap();

        assert!(!bus
            .events()
            .iter()
            .any(|e| matches!(e, BattleEvent::ActionSkipped { .. })));
        assert_eq!(battle_state.players[0].active_pokemon_index, Some(1));
        assert!(battle_state.players[0].active_pokemon().unwrap().is_alive());

        // Only the send-out is announced for a fainted Pokemon
        assert!(!battle_state.log().contains(&"Player 1 withdrew Magikarp!".to_string()));
        assert!(battle_state.log().contains(&"Player 1 sent out Gyarados!".to_string()));
    }
}
