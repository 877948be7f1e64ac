//! The Dragon King, a scripted final-boss opponent.
//!
//! Action selection depends on the boss's own remaining HP: the lower it
//! drops, the more often it breathes fire. The chance is a step function,
//! not interpolated. Boss battles cannot be fled.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::combat::types::{AttackKind, Combatant};
use crate::core::constants::*;

/// One selected boss action, before defender mitigation.
#[derive(Debug, Clone)]
pub struct AttackAction {
    pub kind: AttackKind,
    pub damage: i32,
    pub message: String,
}

/// Result of a resolved boss attack against a defender.
#[derive(Debug, Clone, Serialize)]
pub struct BossAttackOutcome {
    pub kind: AttackKind,
    pub damage: u32,
    pub message: String,
    pub target_hp: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BossMonster {
    name: String,
    hp: u32,
    max_hp: u32,
    attack: i32,
    defense: i32,
    special_attack_name: String,
    special_attack_multiplier: f64,
}

impl BossMonster {
    pub fn dragon_king() -> Self {
        Self {
            name: "Dragon King".to_string(),
            hp: DRAGON_KING_HP,
            max_hp: DRAGON_KING_HP,
            attack: DRAGON_KING_ATTACK,
            defense: DRAGON_KING_DEFENSE,
            special_attack_name: "Inferno Breath".to_string(),
            special_attack_multiplier: BOSS_SPECIAL_MULTIPLIER,
        }
    }

    pub fn special_attack_name(&self) -> &str {
        &self.special_attack_name
    }

    /// Special attack damage before mitigation: `floor(attack * 1.5)`.
    pub fn special_attack_power(&self) -> i32 {
        (self.attack as f64 * self.special_attack_multiplier).floor() as i32
    }

    pub fn hp_percentage(&self) -> f64 {
        self.hp as f64 / self.max_hp as f64
    }

    /// Chance of choosing the special attack, gated by remaining HP:
    /// at or below 25% -> 0.70, at or below 50% -> 0.50, else 0.30.
    pub fn special_attack_chance(&self) -> f64 {
        let hp_percentage = self.hp_percentage();

        if hp_percentage <= BOSS_CRITICAL_HP_THRESHOLD {
            BOSS_SPECIAL_CRITICAL_HP_CHANCE
        } else if hp_percentage <= BOSS_LOW_HP_THRESHOLD {
            BOSS_SPECIAL_LOW_HP_CHANCE
        } else {
            BOSS_SPECIAL_BASE_CHANCE
        }
    }

    /// One uniform draw against the HP-gated chance.
    pub fn should_use_special_attack(&self, rng: &mut impl Rng) -> bool {
        rng.gen::<f64>() < self.special_attack_chance()
    }

    /// Selects the next action, normal or special.
    pub fn attack_action(&self, rng: &mut impl Rng) -> AttackAction {
        if self.should_use_special_attack(rng) {
            AttackAction {
                kind: AttackKind::Special,
                damage: self.special_attack_power(),
                message: format!("The {} breathes a searing inferno!", self.name),
            }
        } else {
            AttackAction {
                kind: AttackKind::Normal,
                damage: self.attack,
                message: format!("The {} attacks!", self.name),
            }
        }
    }

    /// Applies a chosen action to the defender with defense mitigation
    /// and a damage floor of 1. Boss attacks carry no random factor; the
    /// randomness is entirely in the action selection.
    pub fn perform_attack(
        &self,
        defender: &mut impl Combatant,
        rng: &mut impl Rng,
    ) -> BossAttackOutcome {
        let action = self.attack_action(rng);
        let actual_damage = (action.damage - defender.defense_power()).max(MIN_DAMAGE as i32);

        defender.take_damage(actual_damage);

        BossAttackOutcome {
            kind: action.kind,
            damage: actual_damage as u32,
            message: action.message,
            target_hp: defender.hp(),
        }
    }

    /// Boss battles cannot be escaped. Consulted by the battle session
    /// before a flee command is allowed to cost an attempt.
    pub fn can_escape(&self) -> bool {
        false
    }

    pub fn battle_start_message(&self) -> String {
        format!("The {} blocks your path!", self.name)
    }

    pub fn defeat_message(&self) -> String {
        format!("The {} falls! The princess is saved!", self.name)
    }
}

impl Combatant for BossMonster {
    fn name(&self) -> &str {
        &self.name
    }

    fn hp(&self) -> u32 {
        self.hp
    }

    fn max_hp(&self) -> u32 {
        self.max_hp
    }

    fn attack_power(&self) -> i32 {
        self.attack
    }

    fn defense_power(&self) -> i32 {
        self.defense
    }

    fn take_damage(&mut self, amount: i32) {
        if amount <= 0 {
            return;
        }
        self.hp = self.hp.saturating_sub(amount as u32);
    }
}
