//! Ordinary monsters and the static bestiary they are built from.
//!
//! The bestiary is fixed configuration data. Looking up an unknown kind
//! is a construction-time fatal error, not something a running battle
//! can recover from.

use serde::{Deserialize, Serialize};

use crate::combat::types::Combatant;
use crate::core::EngineError;

/// Fixed stat block for one monster kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonsterStats {
    pub name: &'static str,
    pub hp: u32,
    pub attack: i32,
    pub defense: i32,
    pub experience: u32,
    pub gold: u32,
}

const BESTIARY: &[(&str, MonsterStats)] = &[
    (
        "slime",
        MonsterStats {
            name: "Slime",
            hp: 3,
            attack: 2,
            defense: 1,
            experience: 1,
            gold: 2,
        },
    ),
    (
        "drakee",
        MonsterStats {
            name: "Drakee",
            hp: 5,
            attack: 3,
            defense: 2,
            experience: 2,
            gold: 4,
        },
    ),
    (
        "goblin",
        MonsterStats {
            name: "Goblin",
            hp: 8,
            attack: 5,
            defense: 3,
            experience: 3,
            gold: 6,
        },
    ),
    (
        "skeleton",
        MonsterStats {
            name: "Skeleton",
            hp: 18,
            attack: 11,
            defense: 6,
            experience: 11,
            gold: 20,
        },
    ),
    (
        "orc",
        MonsterStats {
            name: "Orc",
            hp: 20,
            attack: 14,
            defense: 8,
            experience: 6,
            gold: 12,
        },
    ),
];

/// Looks up the stat block for a monster kind.
pub fn monster_stats(kind: &str) -> Option<&'static MonsterStats> {
    BESTIARY
        .iter()
        .find(|(key, _)| *key == kind)
        .map(|(_, stats)| stats)
}

/// All monster kinds known to the bestiary.
pub fn available_kinds() -> Vec<&'static str> {
    BESTIARY.iter().map(|(key, _)| *key).collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Monster {
    pub kind: String,
    name: String,
    hp: u32,
    max_hp: u32,
    attack: i32,
    defense: i32,
    experience: u32,
    gold: u32,
}

impl Monster {
    /// Builds a monster from its bestiary kind. Fails fast on unknown
    /// kinds so configuration bugs surface at spawn time.
    pub fn new(kind: &str) -> Result<Self, EngineError> {
        let stats =
            monster_stats(kind).ok_or_else(|| EngineError::UnknownMonsterType(kind.to_string()))?;

        Ok(Self {
            kind: kind.to_string(),
            name: stats.name.to_string(),
            hp: stats.hp,
            max_hp: stats.hp,
            attack: stats.attack,
            defense: stats.defense,
            experience: stats.experience,
            gold: stats.gold,
        })
    }
}

impl Combatant for Monster {
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

    fn experience_reward(&self) -> u32 {
        self.experience
    }

    fn gold_reward(&self) -> u32 {
        self.gold
    }
}
