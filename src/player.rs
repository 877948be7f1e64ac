//! The player character: combat stats, gold, and level progression.
//!
//! Position on the field belongs to the front-end, not to the combat
//! core; the engine only ever sees the fighting surface of the player.

use serde::{Deserialize, Serialize};

use crate::combat::types::Combatant;
use crate::core::constants::*;

/// Outcome of an experience gain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelUpReport {
    pub leveled_up: bool,
    pub new_level: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub level: u32,
    pub hp: u32,
    pub max_hp: u32,
    pub attack: i32,
    pub defense: i32,
    pub experience: u32,
    pub gold: u32,
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

impl Player {
    pub fn new() -> Self {
        Self {
            name: "Hero".to_string(),
            level: 1,
            hp: PLAYER_BASE_HP,
            max_hp: PLAYER_BASE_HP,
            attack: PLAYER_BASE_ATTACK,
            defense: PLAYER_BASE_DEFENSE,
            experience: 0,
            gold: PLAYER_STARTING_GOLD,
        }
    }

    /// Sets HP clamped to [0, max_hp].
    pub fn set_hp(&mut self, value: u32) {
        self.hp = value.min(self.max_hp);
    }

    pub fn heal_full(&mut self) {
        self.hp = self.max_hp;
    }

    /// Adds gold. Negative amounts are ignored rather than raising, to
    /// keep a live battle resilient to malformed upstream data.
    pub fn add_gold(&mut self, amount: i32) {
        if amount <= 0 {
            return;
        }
        self.gold = self.gold.saturating_add(amount as u32);
    }

    /// Spends gold if the player can afford it.
    pub fn spend_gold(&mut self, amount: u32) -> bool {
        if self.gold >= amount {
            self.gold -= amount;
            true
        } else {
            false
        }
    }

    /// Cumulative experience required to reach `level`.
    pub fn experience_for_level(level: u32) -> u32 {
        let index = level.clamp(1, PLAYER_MAX_LEVEL) as usize - 1;
        EXPERIENCE_TABLE[index]
    }

    /// Experience still missing for the next level, 0 at the cap.
    pub fn experience_to_next_level(&self) -> u32 {
        if self.level >= PLAYER_MAX_LEVEL {
            return 0;
        }
        Self::experience_for_level(self.level + 1).saturating_sub(self.experience)
    }

    /// Deterministic stat block for a given level.
    pub fn stats_for_level(level: u32) -> (u32, i32, i32) {
        let steps = level.saturating_sub(1);
        let max_hp = PLAYER_BASE_HP + steps * HP_GROWTH_PER_LEVEL;
        let attack = PLAYER_BASE_ATTACK + steps as i32 * ATTACK_GROWTH_PER_LEVEL;
        let defense = PLAYER_BASE_DEFENSE + (steps as f64 * DEFENSE_GROWTH_PER_LEVEL).floor() as i32;
        (max_hp, attack, defense)
    }

    /// Gains experience and applies any level-ups, fully healing on each.
    /// Negative amounts are ignored.
    pub fn gain_experience(&mut self, amount: i32) -> LevelUpReport {
        let old_level = self.level;

        if amount > 0 {
            self.experience = self.experience.saturating_add(amount as u32);
        }

        while self.level < PLAYER_MAX_LEVEL
            && self.experience >= Self::experience_for_level(self.level + 1)
        {
            self.level += 1;
            let (max_hp, attack, defense) = Self::stats_for_level(self.level);
            self.max_hp = max_hp;
            self.attack = attack;
            self.defense = defense;
            self.heal_full();
        }

        LevelUpReport {
            leveled_up: self.level > old_level,
            new_level: self.level,
        }
    }
}

impl Combatant for Player {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_player_stat_block() {
        let player = Player::new();
        assert_eq!(player.level, 1);
        assert_eq!(player.hp, 15);
        assert_eq!(player.max_hp, 15);
        assert_eq!(player.attack, 4);
        assert_eq!(player.defense, 2);
        assert_eq!(player.gold, 120);
        assert_eq!(player.experience, 0);
    }

    #[test]
    fn test_take_damage_clamps_and_validates() {
        let mut player = Player::new();
        player.take_damage(-5);
        assert_eq!(player.hp, 15);

        player.take_damage(10);
        assert_eq!(player.hp, 5);

        player.take_damage(100);
        assert_eq!(player.hp, 0);
        assert!(player.is_dead());
    }

    #[test]
    fn test_set_hp_respects_max() {
        let mut player = Player::new();
        player.set_hp(9999);
        assert_eq!(player.hp, player.max_hp);
        player.set_hp(3);
        assert_eq!(player.hp, 3);
    }

    #[test]
    fn test_gold_handling() {
        let mut player = Player::new();
        player.add_gold(30);
        assert_eq!(player.gold, 150);

        player.add_gold(-50);
        assert_eq!(player.gold, 150);

        assert!(player.spend_gold(100));
        assert_eq!(player.gold, 50);

        assert!(!player.spend_gold(51));
        assert_eq!(player.gold, 50);
    }

    #[test]
    fn test_experience_table_is_monotonic() {
        for level in 2..=PLAYER_MAX_LEVEL {
            assert!(Player::experience_for_level(level) > Player::experience_for_level(level - 1));
        }
    }

    #[test]
    fn test_level_up_applies_growth_and_full_heal() {
        let mut player = Player::new();
        player.take_damage(10);
        assert_eq!(player.hp, 5);

        // 7 XP reaches level 2
        let report = player.gain_experience(7);
        assert!(report.leveled_up);
        assert_eq!(report.new_level, 2);
        assert_eq!(player.max_hp, 20);
        assert_eq!(player.attack, 6);
        assert_eq!(player.defense, 3);
        assert_eq!(player.hp, player.max_hp);
    }

    #[test]
    fn test_multi_level_jump() {
        let mut player = Player::new();
        // 110 XP is exactly level 5
        let report = player.gain_experience(110);
        assert!(report.leveled_up);
        assert_eq!(report.new_level, 5);
        assert_eq!(player.max_hp, 35);
        assert_eq!(player.attack, 12);
        assert_eq!(player.defense, 8);
    }

    #[test]
    fn test_negative_experience_ignored() {
        let mut player = Player::new();
        let report = player.gain_experience(-100);
        assert!(!report.leveled_up);
        assert_eq!(player.experience, 0);
        assert_eq!(player.level, 1);
    }

    #[test]
    fn test_level_cap() {
        let mut player = Player::new();
        let report = player.gain_experience(1_000_000);
        assert_eq!(report.new_level, PLAYER_MAX_LEVEL);
        assert_eq!(player.experience_to_next_level(), 0);

        let again = player.gain_experience(1_000_000);
        assert!(!again.leveled_up);
    }
}
