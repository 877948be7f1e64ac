//! One active battle: turn order, command legality, flee math and
//! termination.
//!
//! The session owns both combatants for the battle's duration. When the
//! mode machine leaves battle it takes the player back via
//! [`BattleSession::into_parts`]. Rejections of player commands are
//! plain values, never panics; the UI is expected to show them and move
//! on.

use std::sync::atomic::{AtomicU64, Ordering};

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::combat::resolver;
use crate::combat::types::{AttackKind, BattleResult, Combatant, Opponent};
use crate::core::constants::*;
use crate::player::Player;

static NEXT_SESSION_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of one battle session. Deferred opponent turns are keyed by
/// this so a stale turn can never land on a newer battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(u64);

impl SessionId {
    fn next() -> Self {
        Self(NEXT_SESSION_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Whose turn it is to act.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Turn {
    Player,
    Opponent,
}

/// Expected-flow rejection of a battle command. Displayed to the player,
/// never fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CommandRejection {
    #[error("Battle is not active")]
    BattleNotActive,
    #[error("Not player turn")]
    NotPlayerTurn,
    #[error("Not opponent turn")]
    NotOpponentTurn,
    #[error("Cannot escape this battle")]
    CannotEscape,
    #[error("Invalid command")]
    InvalidCommand,
}

/// One flee attempt's outcome. A failed roll is a valid outcome, not a
/// rejection; it costs the turn and the attempt.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FleeOutcome {
    pub success: bool,
    pub flee_chance: f64,
    pub attempts: u32,
}

/// Successful result of a player battle command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CommandOutcome {
    Attack { damage: u32, target_hp: u32 },
    Flee(FleeOutcome),
}

/// A resolved opponent action, normal or special.
#[derive(Debug, Clone)]
pub struct OpponentAction {
    pub kind: AttackKind,
    pub damage: u32,
    pub message: String,
    pub target_hp: u32,
}

/// Read-only view of the battle, enough for a renderer to draw from
/// without reaching back into the core.
#[derive(Debug, Clone, Serialize)]
pub struct BattleSnapshot {
    pub player_name: String,
    pub player_hp: u32,
    pub player_max_hp: u32,
    pub opponent_name: String,
    pub opponent_hp: u32,
    pub opponent_max_hp: u32,
    pub current_turn: Turn,
    pub is_over: bool,
}

/// Computes the flee chance for one attempt.
///
/// Base 50%, plus 2 points per player level above 1, minus 1 point per
/// opponent attack point above 2, minus a flat 10 points per repeated
/// attempt in the same battle. Clamped to [0.1, 0.9].
pub fn calculate_flee_chance(player_level: u32, opponent_attack: i32, attempts: u32) -> f64 {
    let level_bonus = (player_level.saturating_sub(1)) as f64 * FLEE_LEVEL_BONUS_PER_LEVEL;
    let attack_penalty = (opponent_attack - 2) as f64 * FLEE_ATTACK_PENALTY_PER_POINT;
    let attempt_penalty = (attempts.saturating_sub(1)) as f64 * FLEE_REPEAT_ATTEMPT_PENALTY;

    let chance = FLEE_BASE_CHANCE + level_bonus - attack_penalty - attempt_penalty;
    chance.clamp(FLEE_MIN_CHANCE, FLEE_MAX_CHANCE)
}

#[derive(Debug)]
pub struct BattleSession {
    id: SessionId,
    player: Player,
    opponent: Opponent,
    is_active: bool,
    is_over: bool,
    current_turn: Turn,
    flee_attempts: u32,
    result: Option<BattleResult>,
}

impl BattleSession {
    pub fn new(player: Player, opponent: Opponent) -> Self {
        Self {
            id: SessionId::next(),
            player,
            opponent,
            is_active: true,
            is_over: false,
            current_turn: Turn::Player,
            flee_attempts: 0,
            result: None,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn opponent(&self) -> &Opponent {
        &self.opponent
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn is_over(&self) -> bool {
        self.is_over
    }

    pub fn current_turn(&self) -> Turn {
        self.current_turn
    }

    pub fn flee_attempts(&self) -> u32 {
        self.flee_attempts
    }

    pub fn result(&self) -> Option<BattleResult> {
        self.result
    }

    /// Executes a player-issued command token. Unknown tokens are an
    /// expected-flow rejection.
    pub fn execute_command(
        &mut self,
        command: &str,
        rng: &mut impl Rng,
    ) -> Result<CommandOutcome, CommandRejection> {
        if self.is_over || !self.is_active {
            return Err(CommandRejection::BattleNotActive);
        }

        match command {
            "attack" => self.execute_attack(rng),
            "flee" => self.execute_flee(rng),
            _ => Err(CommandRejection::InvalidCommand),
        }
    }

    fn execute_attack(&mut self, rng: &mut impl Rng) -> Result<CommandOutcome, CommandRejection> {
        if self.current_turn != Turn::Player {
            return Err(CommandRejection::NotPlayerTurn);
        }

        let outcome = resolver::player_attack(&self.player, &mut self.opponent, rng);
        Ok(CommandOutcome::Attack {
            damage: outcome.damage,
            target_hp: outcome.target_hp,
        })
    }

    fn execute_flee(&mut self, rng: &mut impl Rng) -> Result<CommandOutcome, CommandRejection> {
        if self.current_turn != Turn::Player {
            return Err(CommandRejection::NotPlayerTurn);
        }

        // Rejected before any attempt is counted; fleeing a boss must
        // not cost the turn.
        if !self.opponent.can_escape() {
            return Err(CommandRejection::CannotEscape);
        }

        self.flee_attempts += 1;
        let flee_chance = self.flee_chance();
        let success = rng.gen::<f64>() < flee_chance;

        if success {
            self.end_battle();
            self.result = Some(BattleResult::fled_battle());
        }

        Ok(CommandOutcome::Flee(FleeOutcome {
            success,
            flee_chance,
            attempts: self.flee_attempts,
        }))
    }

    /// Flee chance for the current attempt count. The counter never
    /// resets within a battle.
    pub fn flee_chance(&self) -> f64 {
        calculate_flee_chance(
            self.player.level,
            self.opponent.attack_power(),
            self.flee_attempts,
        )
    }

    /// Resolves the opponent's retaliation. Ordinary monsters use the
    /// core damage formula; the boss selects between its normal and
    /// special attack.
    pub fn execute_opponent_turn(
        &mut self,
        rng: &mut impl Rng,
    ) -> Result<OpponentAction, CommandRejection> {
        if self.is_over || !self.is_active {
            return Err(CommandRejection::BattleNotActive);
        }
        if self.current_turn != Turn::Opponent {
            return Err(CommandRejection::NotOpponentTurn);
        }

        let action = match &self.opponent {
            Opponent::Monster(monster) => {
                let message = format!("The {} attacks!", monster.name());
                let outcome = resolver::opponent_attack(&self.opponent, &mut self.player, rng);
                OpponentAction {
                    kind: AttackKind::Normal,
                    damage: outcome.damage,
                    message,
                    target_hp: outcome.target_hp,
                }
            }
            Opponent::Boss(boss) => {
                let outcome = boss.perform_attack(&mut self.player, rng);
                OpponentAction {
                    kind: outcome.kind,
                    damage: outcome.damage,
                    message: outcome.message,
                    target_hp: outcome.target_hp,
                }
            }
        };

        Ok(action)
    }

    /// Strictly alternates the acting side. Callers invoke this after
    /// each resolved action; the session does not auto-advance.
    pub fn next_turn(&mut self) {
        self.current_turn = match self.current_turn {
            Turn::Player => Turn::Opponent,
            Turn::Opponent => Turn::Player,
        };
    }

    /// Checks for termination. The first terminal result is cached and
    /// returned unchanged by every later call.
    pub fn check_battle_end(&mut self) -> BattleResult {
        if let Some(result) = self.result {
            return result;
        }

        let result = resolver::check_battle_result(&self.player, &self.opponent);
        if result.is_over {
            self.result = Some(result);
            self.is_over = true;
        }

        result
    }

    fn end_battle(&mut self) {
        self.is_active = false;
        self.is_over = true;
    }

    pub fn snapshot(&self) -> BattleSnapshot {
        BattleSnapshot {
            player_name: self.player.name.clone(),
            player_hp: self.player.hp,
            player_max_hp: self.player.max_hp,
            opponent_name: self.opponent.name().to_string(),
            opponent_hp: self.opponent.hp(),
            opponent_max_hp: self.opponent.max_hp(),
            current_turn: self.current_turn,
            is_over: self.is_over,
        }
    }

    /// Dissolves the session, handing the player back to the caller
    /// along with the terminal result, if any.
    pub fn into_parts(self) -> (Player, Option<BattleResult>) {
        (self.player, self.result)
    }
}
