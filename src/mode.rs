//! Top-level game mode state machine.
//!
//! Exactly one mode is active at a time and the legal transitions form a
//! small whitelist: field is the hub, battle, menu and dialog are
//! excursions that return to it. The machine owns the player while on
//! the field and hands them to the battle session for the duration of a
//! battle; this makes "which state owns the player" a compile-time
//! question rather than a runtime one.

use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};

use serde::{Deserialize, Serialize};

use crate::combat::session::BattleSession;
use crate::combat::types::{BattleResult, Combatant, Opponent};
use crate::core::EngineError;
use crate::player::Player;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameMode {
    Field,
    Battle,
    Menu,
    Dialog,
}

impl GameMode {
    /// The transition whitelist. Everything not listed is rejected.
    pub fn can_transition_to(self, target: GameMode) -> bool {
        matches!(
            (self, target),
            (GameMode::Field, GameMode::Battle)
                | (GameMode::Field, GameMode::Menu)
                | (GameMode::Field, GameMode::Dialog)
                | (GameMode::Battle, GameMode::Field)
                | (GameMode::Menu, GameMode::Field)
                | (GameMode::Dialog, GameMode::Field)
        )
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GameMode::Field => "field",
            GameMode::Battle => "battle",
            GameMode::Menu => "menu",
            GameMode::Dialog => "dialog",
        };
        f.write_str(name)
    }
}

/// Why a mode change happened. Carried alongside the change so
/// listeners can react to the trigger, not just the endpoints.
#[derive(Debug, Clone)]
pub enum TransitionCause {
    Encounter { opponent: String },
    BattleEnd(BattleResult),
    Fled { flee_chance: f64, attempts: u32 },
    MenuOpened,
    MenuClosed,
    DialogStarted,
    DialogEnded,
}

#[derive(Debug, Clone)]
pub struct ModeChange {
    pub from: GameMode,
    pub to: GameMode,
    pub cause: TransitionCause,
}

/// Handle for removing a registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(&ModeChange)>;

/// The machine itself. Owns the player outside of battle and the battle
/// session inside it; exactly one of the two holds the player at any
/// moment.
pub struct ModeMachine {
    mode: GameMode,
    player: Option<Player>,
    session: Option<BattleSession>,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener_id: u64,
}

impl fmt::Debug for ModeMachine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModeMachine")
            .field("mode", &self.mode)
            .field("in_battle", &self.session.is_some())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl ModeMachine {
    pub fn new(player: Player) -> Self {
        Self {
            mode: GameMode::Field,
            player: Some(player),
            session: None,
            listeners: Vec::new(),
            next_listener_id: 1,
        }
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    /// The player, wherever they currently live.
    pub fn player(&self) -> &Player {
        match &self.session {
            Some(session) => session.player(),
            None => self.player.as_ref().expect("player missing outside battle"),
        }
    }

    /// Mutable player access outside of battle, for reward application
    /// and recovery. During a battle the session owns the player.
    pub fn player_mut(&mut self) -> Option<&mut Player> {
        self.player.as_mut()
    }

    pub fn session(&self) -> Option<&BattleSession> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut BattleSession> {
        self.session.as_mut()
    }

    /// Registers a mode-change listener. The returned id removes it.
    pub fn on_mode_change(&mut self, listener: impl FnMut(&ModeChange) + 'static) -> ListenerId {
        let id = ListenerId(self.next_listener_id);
        self.next_listener_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Removes a listener. Removing one that is already gone is a no-op.
    pub fn remove_listener(&mut self, id: ListenerId) {
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
    }

    /// Reacts to an encounter check. A non-encounter is silently
    /// ignored; an encounter validates the transition before any battle
    /// state is built, so a rejected transition leaves no half-started
    /// battle behind.
    pub fn handle_encounter(
        &mut self,
        opponent: Option<Opponent>,
    ) -> Result<Option<&BattleSession>, EngineError> {
        let Some(opponent) = opponent else {
            return Ok(None);
        };

        self.ensure_transition(GameMode::Battle)?;

        let cause = TransitionCause::Encounter {
            opponent: opponent.name().to_string(),
        };
        let player = self
            .player
            .take()
            .expect("player must be on the field to start a battle");
        self.session = Some(BattleSession::new(player, opponent));
        self.switch(GameMode::Battle, cause);

        Ok(self.session.as_ref())
    }

    /// Reacts to a battle-end check. A non-terminal result is ignored; a
    /// terminal one dissolves the session and returns to the field. The
    /// result is handed back so the caller can apply rewards or recovery.
    pub fn handle_battle_end(&mut self, result: BattleResult) -> Result<Option<BattleResult>, EngineError> {
        if self.mode != GameMode::Battle {
            return Err(EngineError::InvalidTransition {
                from: self.mode,
                to: GameMode::Field,
            });
        }
        if !result.is_over {
            return Ok(None);
        }

        self.leave_battle();
        self.switch(GameMode::Field, TransitionCause::BattleEnd(result));
        Ok(Some(result))
    }

    /// Reacts to a flee attempt. Outside battle this is a silent no-op
    /// rather than an error; a stale flee event must not corrupt the
    /// field state. Only a successful attempt transitions.
    pub fn handle_flee_result(&mut self, success: bool, flee_chance: f64, attempts: u32) {
        if self.mode != GameMode::Battle || !success {
            return;
        }

        self.leave_battle();
        self.switch(
            GameMode::Field,
            TransitionCause::Fled {
                flee_chance,
                attempts,
            },
        );
    }

    pub fn open_menu(&mut self) -> Result<(), EngineError> {
        self.ensure_transition(GameMode::Menu)?;
        self.switch(GameMode::Menu, TransitionCause::MenuOpened);
        Ok(())
    }

    pub fn close_menu(&mut self) -> Result<(), EngineError> {
        self.ensure_transition_from(GameMode::Menu, GameMode::Field)?;
        self.switch(GameMode::Field, TransitionCause::MenuClosed);
        Ok(())
    }

    pub fn open_dialog(&mut self) -> Result<(), EngineError> {
        self.ensure_transition(GameMode::Dialog)?;
        self.switch(GameMode::Dialog, TransitionCause::DialogStarted);
        Ok(())
    }

    pub fn close_dialog(&mut self) -> Result<(), EngineError> {
        self.ensure_transition_from(GameMode::Dialog, GameMode::Field)?;
        self.switch(GameMode::Field, TransitionCause::DialogEnded);
        Ok(())
    }

    fn ensure_transition(&self, to: GameMode) -> Result<(), EngineError> {
        if self.mode.can_transition_to(to) {
            Ok(())
        } else {
            Err(EngineError::InvalidTransition {
                from: self.mode,
                to,
            })
        }
    }

    fn ensure_transition_from(&self, from: GameMode, to: GameMode) -> Result<(), EngineError> {
        if self.mode == from && from.can_transition_to(to) {
            Ok(())
        } else {
            Err(EngineError::InvalidTransition {
                from: self.mode,
                to,
            })
        }
    }

    fn leave_battle(&mut self) {
        let session = self
            .session
            .take()
            .expect("battle mode requires a session");
        let (player, _) = session.into_parts();
        self.player = Some(player);
    }

    fn switch(&mut self, to: GameMode, cause: TransitionCause) {
        let change = ModeChange {
            from: self.mode,
            to,
            cause,
        };
        self.mode = to;
        self.notify(&change);
    }

    /// Calls every listener once. A panicking listener is logged and
    /// skipped; the rest still run.
    fn notify(&mut self, change: &ModeChange) {
        for (id, listener) in &mut self.listeners {
            let outcome = catch_unwind(AssertUnwindSafe(|| listener(change)));
            if outcome.is_err() {
                tracing::warn!(listener = id.0, from = %change.from, to = %change.to,
                    "mode-change listener panicked");
            }
        }
    }
}
