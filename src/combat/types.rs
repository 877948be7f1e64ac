//! Shared combat data contracts.
//!
//! Everything that can fight implements [`Combatant`], so the resolver
//! and the battle session never special-case "is this the player or a
//! monster". Opponent variance (ordinary monster vs. scripted boss) is a
//! tagged variant, not concrete inheritance.

use serde::{Deserialize, Serialize};

use crate::combat::boss::BossMonster;
use crate::combat::monster::Monster;

/// Capability set shared by every fightable entity.
pub trait Combatant {
    fn name(&self) -> &str;
    fn hp(&self) -> u32;
    fn max_hp(&self) -> u32;

    /// Accessor indirection so variants can override without changing
    /// call sites.
    fn attack_power(&self) -> i32;
    fn defense_power(&self) -> i32;

    /// Applies damage, clamping HP at 0. Non-positive amounts are a
    /// defensive no-op, not an error.
    fn take_damage(&mut self, amount: i32);

    fn is_alive(&self) -> bool {
        self.hp() > 0
    }

    fn is_dead(&self) -> bool {
        !self.is_alive()
    }

    /// Experience granted to the victor. Zero for the player and for
    /// reward-less bosses.
    fn experience_reward(&self) -> u32 {
        0
    }

    fn gold_reward(&self) -> u32 {
        0
    }
}

/// Which side won a finished battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Winner {
    Player,
    Opponent,
}

/// Terminal outcome of a battle. Produced once per session and cached.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BattleResult {
    pub is_over: bool,
    pub winner: Option<Winner>,
    pub experience_gained: u32,
    pub gold_gained: u32,
    pub fled: bool,
}

impl BattleResult {
    pub fn ongoing() -> Self {
        Self {
            is_over: false,
            winner: None,
            experience_gained: 0,
            gold_gained: 0,
            fled: false,
        }
    }

    pub fn victory(experience_gained: u32, gold_gained: u32) -> Self {
        Self {
            is_over: true,
            winner: Some(Winner::Player),
            experience_gained,
            gold_gained,
            fled: false,
        }
    }

    pub fn defeat() -> Self {
        Self {
            is_over: true,
            winner: Some(Winner::Opponent),
            experience_gained: 0,
            gold_gained: 0,
            fled: false,
        }
    }

    /// Mutual survival at the simulation turn cap.
    pub fn draw() -> Self {
        Self {
            is_over: true,
            winner: None,
            experience_gained: 0,
            gold_gained: 0,
            fled: false,
        }
    }

    pub fn fled_battle() -> Self {
        Self {
            is_over: true,
            winner: None,
            experience_gained: 0,
            gold_gained: 0,
            fled: true,
        }
    }
}

/// Whether an opponent action was a plain strike or a special attack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttackKind {
    Normal,
    Special,
}

/// The hostile side of a battle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Opponent {
    Monster(Monster),
    Boss(BossMonster),
}

impl Opponent {
    /// Whether the player may attempt to flee from this opponent.
    /// Boss battles cannot be escaped.
    pub fn can_escape(&self) -> bool {
        match self {
            Opponent::Monster(_) => true,
            Opponent::Boss(boss) => boss.can_escape(),
        }
    }

    pub fn is_boss(&self) -> bool {
        matches!(self, Opponent::Boss(_))
    }

    pub fn battle_start_message(&self) -> String {
        match self {
            Opponent::Monster(monster) => format!("A {} draws near!", monster.name()),
            Opponent::Boss(boss) => boss.battle_start_message(),
        }
    }

    pub fn defeat_message(&self) -> String {
        match self {
            Opponent::Monster(monster) => format!("The {} is defeated!", monster.name()),
            Opponent::Boss(boss) => boss.defeat_message(),
        }
    }
}

impl Combatant for Opponent {
    fn name(&self) -> &str {
        match self {
            Opponent::Monster(monster) => monster.name(),
            Opponent::Boss(boss) => boss.name(),
        }
    }

    fn hp(&self) -> u32 {
        match self {
            Opponent::Monster(monster) => monster.hp(),
            Opponent::Boss(boss) => boss.hp(),
        }
    }

    fn max_hp(&self) -> u32 {
        match self {
            Opponent::Monster(monster) => monster.max_hp(),
            Opponent::Boss(boss) => boss.max_hp(),
        }
    }

    fn attack_power(&self) -> i32 {
        match self {
            Opponent::Monster(monster) => monster.attack_power(),
            Opponent::Boss(boss) => boss.attack_power(),
        }
    }

    fn defense_power(&self) -> i32 {
        match self {
            Opponent::Monster(monster) => monster.defense_power(),
            Opponent::Boss(boss) => boss.defense_power(),
        }
    }

    fn take_damage(&mut self, amount: i32) {
        match self {
            Opponent::Monster(monster) => monster.take_damage(amount),
            Opponent::Boss(boss) => boss.take_damage(amount),
        }
    }

    fn experience_reward(&self) -> u32 {
        match self {
            Opponent::Monster(monster) => monster.experience_reward(),
            Opponent::Boss(boss) => boss.experience_reward(),
        }
    }

    fn gold_reward(&self) -> u32 {
        match self {
            Opponent::Monster(monster) => monster.gold_reward(),
            Opponent::Boss(boss) => boss.gold_reward(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_battle_result_victory_carries_rewards() {
        let result = BattleResult::victory(6, 12);
        assert!(result.is_over);
        assert_eq!(result.winner, Some(Winner::Player));
        assert_eq!(result.experience_gained, 6);
        assert_eq!(result.gold_gained, 12);
        assert!(!result.fled);
    }

    #[test]
    fn test_battle_result_fled_has_no_winner() {
        let result = BattleResult::fled_battle();
        assert!(result.is_over);
        assert_eq!(result.winner, None);
        assert!(result.fled);
        assert_eq!(result.experience_gained, 0);
    }

    #[test]
    fn test_opponent_escape_rules() {
        let monster = Monster::new("slime").unwrap();
        assert!(Opponent::Monster(monster).can_escape());

        let boss = BossMonster::dragon_king();
        assert!(!Opponent::Boss(boss).can_escape());
    }
}
