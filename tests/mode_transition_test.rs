//! Integration test: Mode transitions
//!
//! Exercises the game mode machine end to end: the transition
//! whitelist, listener delivery and isolation, and the full
//! field -> battle -> field cycle with reward application.

use std::cell::RefCell;
use std::rc::Rc;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use dragonfall::combat::monster::Monster;
use dragonfall::combat::types::{BattleResult, Combatant, Opponent};
use dragonfall::core::EngineError;
use dragonfall::encounter;
use dragonfall::mode::{GameMode, ModeMachine, TransitionCause};
use dragonfall::player::Player;

fn goblin() -> Opponent {
    Opponent::Monster(Monster::new("goblin").unwrap())
}

// =============================================================================
// Transition Whitelist Tests
// =============================================================================

#[test]
fn test_field_is_the_hub() {
    use GameMode::*;
    assert!(Field.can_transition_to(Battle));
    assert!(Field.can_transition_to(Menu));
    assert!(Field.can_transition_to(Dialog));
    assert!(Battle.can_transition_to(Field));
    assert!(Menu.can_transition_to(Field));
    assert!(Dialog.can_transition_to(Field));
}

#[test]
fn test_excursions_do_not_connect_to_each_other() {
    use GameMode::*;
    assert!(!Battle.can_transition_to(Menu));
    assert!(!Battle.can_transition_to(Dialog));
    assert!(!Menu.can_transition_to(Battle));
    assert!(!Menu.can_transition_to(Dialog));
    assert!(!Dialog.can_transition_to(Battle));
    assert!(!Dialog.can_transition_to(Menu));
    for mode in [Field, Battle, Menu, Dialog] {
        assert!(!mode.can_transition_to(mode), "{} -> itself", mode);
    }
}

#[test]
fn test_invalid_transition_error_is_descriptive() {
    let mut machine = ModeMachine::new(Player::new());
    machine.open_dialog().unwrap();

    let err = machine.handle_encounter(Some(goblin())).unwrap_err();
    assert_eq!(err.to_string(), "Invalid transition from dialog to battle");
}

// =============================================================================
// Listener Tests
// =============================================================================

#[test]
fn test_listeners_see_every_transition_in_order() {
    let mut machine = ModeMachine::new(Player::new());
    let seen: Rc<RefCell<Vec<String>>> = Rc::default();

    let sink = seen.clone();
    machine.on_mode_change(move |change| {
        sink.borrow_mut()
            .push(format!("{}->{}", change.from, change.to));
    });

    machine.handle_encounter(Some(goblin())).unwrap();
    machine.handle_battle_end(BattleResult::victory(3, 6)).unwrap();
    machine.open_menu().unwrap();
    machine.close_menu().unwrap();

    assert_eq!(
        *seen.borrow(),
        vec!["field->battle", "battle->field", "field->menu", "menu->field"]
    );
}

#[test]
fn test_listener_receives_the_cause() {
    let mut machine = ModeMachine::new(Player::new());
    let cause: Rc<RefCell<Option<String>>> = Rc::default();

    let sink = cause.clone();
    machine.on_mode_change(move |change| {
        if let TransitionCause::Encounter { opponent } = &change.cause {
            *sink.borrow_mut() = Some(opponent.clone());
        }
    });

    machine.handle_encounter(Some(goblin())).unwrap();
    assert_eq!(cause.borrow().as_deref(), Some("Goblin"));
}

#[test]
fn test_one_bad_listener_does_not_starve_the_rest() {
    let mut machine = ModeMachine::new(Player::new());
    let delivered = Rc::new(RefCell::new(0));

    let sink = delivered.clone();
    machine.on_mode_change(move |_| {
        *sink.borrow_mut() += 1;
    });
    machine.on_mode_change(|_| panic!("listener bug"));
    let sink = delivered.clone();
    machine.on_mode_change(move |_| {
        *sink.borrow_mut() += 1;
    });

    machine.open_menu().unwrap();

    // Listeners before and after the faulty one both ran
    assert_eq!(*delivered.borrow(), 2);
    assert_eq!(machine.mode(), GameMode::Menu);
}

#[test]
fn test_removed_listener_stays_removed() {
    let mut machine = ModeMachine::new(Player::new());
    let delivered = Rc::new(RefCell::new(0));

    let sink = delivered.clone();
    let id = machine.on_mode_change(move |_| {
        *sink.borrow_mut() += 1;
    });

    machine.open_menu().unwrap();
    machine.remove_listener(id);
    machine.remove_listener(id);
    machine.close_menu().unwrap();

    assert_eq!(*delivered.borrow(), 1);
}

// =============================================================================
// Full Cycle Tests
// =============================================================================

#[test]
fn test_victory_cycle_applies_rewards_on_the_field() {
    let mut machine = ModeMachine::new(Player::new());
    let starting_gold = machine.player().gold;

    machine.handle_encounter(Some(goblin())).unwrap();
    assert_eq!(machine.mode(), GameMode::Battle);

    // The front-end applies rewards after the machine hands the result back
    let result = machine
        .handle_battle_end(BattleResult::victory(3, 6))
        .unwrap()
        .unwrap();
    let player = machine.player_mut().unwrap();
    player.gain_experience(result.experience_gained as i32);
    player.add_gold(result.gold_gained as i32);

    assert_eq!(machine.mode(), GameMode::Field);
    assert_eq!(machine.player().experience, 3);
    assert_eq!(machine.player().gold, starting_gold + 6);
}

#[test]
fn test_defeat_cycle_returns_the_player_for_recovery() {
    let mut machine = ModeMachine::new(Player::new());
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    machine.handle_encounter(Some(goblin())).unwrap();

    // Let the goblin beat the hero down
    let session = machine.session_mut().unwrap();
    session.next_turn();
    let result = loop {
        session.execute_opponent_turn(&mut rng).unwrap();
        let result = session.check_battle_end();
        if result.is_over {
            break result;
        }
        session.next_turn();
        session.next_turn();
    };

    let handed_back = machine.handle_battle_end(result).unwrap();
    assert!(handed_back.unwrap().is_over);

    let player = machine.player_mut().unwrap();
    assert!(player.is_dead());
    player.heal_full();
    assert!(player.is_alive());
}

#[test]
fn test_encounter_driven_cycle_with_real_rolls() {
    let mut machine = ModeMachine::new(Player::new());
    let mut rng = ChaCha8Rng::seed_from_u64(9);

    // Walk until something shows up; rate 1.0 forces it immediately
    let result = encounter::process_encounter(
        1.0,
        &["slime", "drakee", "goblin"],
        &mut rng,
    )
    .unwrap();
    assert!(result.encountered);

    machine.handle_encounter(result.opponent).unwrap();
    assert_eq!(machine.mode(), GameMode::Battle);
    assert!(machine.session().is_some());

    // And a quiet roll changes nothing
    let quiet = encounter::process_encounter(0.0, &["slime"], &mut rng).unwrap();
    machine.handle_battle_end(BattleResult::fled_battle()).unwrap();
    machine.handle_encounter(quiet.opponent).unwrap();
    assert_eq!(machine.mode(), GameMode::Field);
}

#[test]
fn test_stale_battle_end_is_an_error_not_a_crash() {
    let mut machine = ModeMachine::new(Player::new());

    let err = machine
        .handle_battle_end(BattleResult::victory(1, 1))
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidTransition { .. }));
    assert_eq!(machine.mode(), GameMode::Field);
}

#[test]
fn test_stale_flee_event_is_silent() {
    let mut machine = ModeMachine::new(Player::new());
    machine.open_menu().unwrap();

    machine.handle_flee_result(true, 0.5, 1);
    assert_eq!(machine.mode(), GameMode::Menu);
}
