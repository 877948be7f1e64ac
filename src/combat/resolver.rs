//! Pure damage and outcome math.
//!
//! These functions are side-effect free apart from mutating the named
//! target's HP, and are reused for both attack directions so neither
//! side gets special-cased damage rules.

use rand::Rng;

use crate::combat::types::{BattleResult, Combatant, Opponent};
use crate::core::constants::*;
use crate::player::Player;

/// Result of one resolved attack.
#[derive(Debug, Clone, Copy)]
pub struct AttackOutcome {
    pub damage: u32,
    pub target_hp: u32,
}

/// Core damage formula.
///
/// `attack` is clamped to zero from below. A negative `defense` is kept
/// as-is so it amplifies damage instead of being clamped away. The base
/// is scaled by a uniform random factor in [0.65, 1.15) and floored,
/// with a guaranteed minimum of 1 so combat always progresses.
pub fn calculate_damage(attack: i32, defense: i32, rng: &mut impl Rng) -> u32 {
    let attack = attack.max(0);
    let base = (attack - defense) as f64;
    let random_factor = rng.gen_range(DAMAGE_RANDOM_MIN..DAMAGE_RANDOM_MAX);

    let damage = (base * random_factor).floor() as i64;
    damage.max(MIN_DAMAGE as i64) as u32
}

fn resolve_attack(
    attacker: &impl Combatant,
    defender: &mut impl Combatant,
    rng: &mut impl Rng,
) -> AttackOutcome {
    let damage = calculate_damage(attacker.attack_power(), defender.defense_power(), rng);
    defender.take_damage(damage as i32);

    AttackOutcome {
        damage,
        target_hp: defender.hp(),
    }
}

/// Player strikes the opponent with the core formula.
pub fn player_attack(player: &Player, opponent: &mut Opponent, rng: &mut impl Rng) -> AttackOutcome {
    resolve_attack(player, opponent, rng)
}

/// An ordinary opponent strikes the player with the core formula. Boss
/// retaliation goes through `BossMonster::perform_attack` instead, which
/// has its own mitigation rule.
pub fn opponent_attack(
    opponent: &Opponent,
    player: &mut Player,
    rng: &mut impl Rng,
) -> AttackOutcome {
    resolve_attack(opponent, player, rng)
}

/// Determines whether the battle has ended and extracts rewards.
///
/// The opponent's death is checked first, so a simultaneous death
/// resolves in the player's favor. This ordering is deliberate.
pub fn check_battle_result(player: &Player, opponent: &Opponent) -> BattleResult {
    if opponent.is_dead() {
        return BattleResult::victory(opponent.experience_reward(), opponent.gold_reward());
    }

    if !player.is_alive() {
        return BattleResult::defeat();
    }

    BattleResult::ongoing()
}

/// Full-battle simulation report, used by the balance tests.
#[derive(Debug, Clone)]
pub struct SimulationReport {
    pub result: BattleResult,
    pub turns: u32,
    pub log: Vec<String>,
}

/// Runs alternating full rounds until someone dies or the turn cap is
/// reached. Hitting the cap counts as a draw.
pub fn simulate_battle(
    player: &mut Player,
    opponent: &mut Opponent,
    rng: &mut impl Rng,
) -> SimulationReport {
    let mut log = Vec::new();
    let mut turns = 0;

    while turns < MAX_SIMULATED_TURNS {
        turns += 1;

        let player_hit = player_attack(player, opponent, rng);
        log.push(format!(
            "Turn {}: Player attacks for {} damage. {} HP: {}",
            turns,
            player_hit.damage,
            opponent.name(),
            player_hit.target_hp
        ));

        let result = check_battle_result(player, opponent);
        if result.is_over {
            return SimulationReport { result, turns, log };
        }

        let opponent_hit = match opponent {
            Opponent::Monster(_) => opponent_attack(opponent, player, rng),
            Opponent::Boss(boss) => {
                let outcome = boss.perform_attack(player, rng);
                AttackOutcome {
                    damage: outcome.damage,
                    target_hp: outcome.target_hp,
                }
            }
        };
        log.push(format!(
            "Turn {}: {} attacks for {} damage. Player HP: {}",
            turns,
            opponent.name(),
            opponent_hit.damage,
            opponent_hit.target_hp
        ));

        let result = check_battle_result(player, opponent);
        if result.is_over {
            return SimulationReport { result, turns, log };
        }
    }

    SimulationReport {
        result: BattleResult::draw(),
        turns,
        log,
    }
}
