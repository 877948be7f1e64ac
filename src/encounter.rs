//! Random field encounters.
//!
//! Each field step rolls once against the encounter rate; on a hit a
//! monster kind is picked uniformly from the zone's table. A rate at or
//! below zero never triggers and a rate at or above one always does,
//! so tests and scripted sequences can force either outcome.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::combat::monster::Monster;
use crate::combat::types::Opponent;
use crate::core::constants::{DEFAULT_ENCOUNTER_RATE, FIELD_MONSTERS};
use crate::core::EngineError;

/// Outcome of one encounter check.
#[derive(Debug, Clone)]
pub struct EncounterResult {
    pub encountered: bool,
    pub opponent: Option<Opponent>,
}

impl EncounterResult {
    fn none() -> Self {
        Self {
            encountered: false,
            opponent: None,
        }
    }
}

/// One roll against the encounter rate.
pub fn check_encounter(rate: f64, rng: &mut impl Rng) -> bool {
    if rate <= 0.0 {
        return false;
    }
    if rate >= 1.0 {
        return true;
    }
    rng.gen::<f64>() < rate
}

/// Rolls for an encounter and, on a hit, spawns a random monster from
/// `kinds`. An empty table counts as no encounter. An unknown kind in
/// the table is a configuration error.
pub fn process_encounter(
    rate: f64,
    kinds: &[&str],
    rng: &mut impl Rng,
) -> Result<EncounterResult, EngineError> {
    if !check_encounter(rate, rng) || kinds.is_empty() {
        return Ok(EncounterResult::none());
    }

    let kind = kinds.choose(rng).copied().unwrap_or(kinds[0]);
    let monster = Monster::new(kind)?;

    Ok(EncounterResult {
        encountered: true,
        opponent: Some(Opponent::Monster(monster)),
    })
}

/// Encounter check for the overworld with the default rate and table.
pub fn field_step(rng: &mut impl Rng) -> Result<EncounterResult, EngineError> {
    process_encounter(DEFAULT_ENCOUNTER_RATE, FIELD_MONSTERS, rng)
}
