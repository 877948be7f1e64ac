//! Keyboard mapping from raw key events to game actions.
//!
//! The mapping depends on the active mode; the same key can mean
//! different things on the field and in battle. Unbound keys map to
//! `None` and are dropped before they reach the engine.

use crossterm::event::{KeyCode, KeyEvent};

use crate::mode::GameMode;

/// A discrete player action, already scoped to the mode it was pressed
/// in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Take a step on the field, rolling for an encounter.
    Step,
    /// Challenge the Dragon King.
    ChallengeBoss,
    OpenMenu,
    CloseMenu,
    OpenDialog,
    CloseDialog,
    /// Battle command token, fed to the session verbatim.
    BattleCommand(&'static str),
    Quit,
}

/// Maps a key event in the given mode. Returns `None` for unbound keys.
pub fn map_key(mode: GameMode, key: KeyEvent) -> Option<Action> {
    match mode {
        GameMode::Field => map_field_key(key.code),
        GameMode::Battle => map_battle_key(key.code),
        GameMode::Menu => match key.code {
            KeyCode::Esc | KeyCode::Char('m') => Some(Action::CloseMenu),
            KeyCode::Char('q') => Some(Action::Quit),
            _ => None,
        },
        GameMode::Dialog => match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char(' ') => Some(Action::CloseDialog),
            KeyCode::Char('q') => Some(Action::Quit),
            _ => None,
        },
    }
}

fn map_field_key(code: KeyCode) -> Option<Action> {
    match code {
        KeyCode::Char('s') | KeyCode::Up | KeyCode::Down | KeyCode::Left | KeyCode::Right => {
            Some(Action::Step)
        }
        KeyCode::Char('b') => Some(Action::ChallengeBoss),
        KeyCode::Char('m') => Some(Action::OpenMenu),
        KeyCode::Char('t') => Some(Action::OpenDialog),
        KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
        _ => None,
    }
}

fn map_battle_key(code: KeyCode) -> Option<Action> {
    match code {
        KeyCode::Char('a') => Some(Action::BattleCommand("attack")),
        KeyCode::Char('f') => Some(Action::BattleCommand("flee")),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_battle_keys_map_to_command_tokens() {
        assert_eq!(
            map_key(GameMode::Battle, key(KeyCode::Char('a'))),
            Some(Action::BattleCommand("attack"))
        );
        assert_eq!(
            map_key(GameMode::Battle, key(KeyCode::Char('f'))),
            Some(Action::BattleCommand("flee"))
        );
    }

    #[test]
    fn test_field_keys_do_not_leak_into_battle() {
        assert_eq!(map_key(GameMode::Battle, key(KeyCode::Char('s'))), None);
        assert_eq!(map_key(GameMode::Battle, key(KeyCode::Char('m'))), None);
        // No quitting mid-battle by accident
        assert_eq!(map_key(GameMode::Battle, key(KeyCode::Char('q'))), None);
    }

    #[test]
    fn test_field_step_and_overlays() {
        assert_eq!(map_key(GameMode::Field, key(KeyCode::Char('s'))), Some(Action::Step));
        assert_eq!(map_key(GameMode::Field, key(KeyCode::Up)), Some(Action::Step));
        assert_eq!(
            map_key(GameMode::Field, key(KeyCode::Char('m'))),
            Some(Action::OpenMenu)
        );
        assert_eq!(
            map_key(GameMode::Field, key(KeyCode::Char('t'))),
            Some(Action::OpenDialog)
        );
        assert_eq!(map_key(GameMode::Field, key(KeyCode::Char('q'))), Some(Action::Quit));
    }

    #[test]
    fn test_overlay_close_keys() {
        assert_eq!(map_key(GameMode::Menu, key(KeyCode::Esc)), Some(Action::CloseMenu));
        assert_eq!(
            map_key(GameMode::Dialog, key(KeyCode::Enter)),
            Some(Action::CloseDialog)
        );
    }

    #[test]
    fn test_unbound_keys_are_dropped() {
        assert_eq!(map_key(GameMode::Field, key(KeyCode::Char('z'))), None);
        assert_eq!(map_key(GameMode::Menu, key(KeyCode::Char('a'))), None);
    }
}
