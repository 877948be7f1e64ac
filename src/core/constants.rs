// Damage formula
pub const MIN_DAMAGE: u32 = 1;
pub const DAMAGE_RANDOM_MIN: f64 = 0.65;
pub const DAMAGE_RANDOM_MAX: f64 = 1.15;

// Flee chance formula: base rate adjusted by player level, opponent attack
// and repeated attempts, clamped to [FLEE_MIN_CHANCE, FLEE_MAX_CHANCE]
pub const FLEE_BASE_CHANCE: f64 = 0.5;
pub const FLEE_LEVEL_BONUS_PER_LEVEL: f64 = 0.02;
pub const FLEE_ATTACK_PENALTY_PER_POINT: f64 = 0.01;
pub const FLEE_REPEAT_ATTEMPT_PENALTY: f64 = 0.1;
pub const FLEE_MIN_CHANCE: f64 = 0.1;
pub const FLEE_MAX_CHANCE: f64 = 0.9;

// Boss special attack: chance steps up as the boss loses HP
pub const BOSS_SPECIAL_BASE_CHANCE: f64 = 0.3;
pub const BOSS_SPECIAL_LOW_HP_CHANCE: f64 = 0.5;
pub const BOSS_SPECIAL_CRITICAL_HP_CHANCE: f64 = 0.7;
pub const BOSS_LOW_HP_THRESHOLD: f64 = 0.5;
pub const BOSS_CRITICAL_HP_THRESHOLD: f64 = 0.25;
pub const BOSS_SPECIAL_MULTIPLIER: f64 = 1.5;

// Dragon King stat block
pub const DRAGON_KING_HP: u32 = 100;
pub const DRAGON_KING_ATTACK: i32 = 90;
pub const DRAGON_KING_DEFENSE: i32 = 50;

// Player base stats and growth per level
pub const PLAYER_BASE_HP: u32 = 15;
pub const PLAYER_BASE_ATTACK: i32 = 4;
pub const PLAYER_BASE_DEFENSE: i32 = 2;
pub const PLAYER_STARTING_GOLD: u32 = 120;
pub const PLAYER_MAX_LEVEL: u32 = 30;
pub const HP_GROWTH_PER_LEVEL: u32 = 5;
pub const ATTACK_GROWTH_PER_LEVEL: i32 = 2;
pub const DEFENSE_GROWTH_PER_LEVEL: f64 = 1.5;

// Cumulative experience required for each level, index 0 = level 1
pub const EXPERIENCE_TABLE: [u32; PLAYER_MAX_LEVEL as usize] = [
    0, 7, 23, 47, 110, 220, 450, 800, 1300, 2000, 2900, 4000, 5500, 7500, 10000, 13000, 16500,
    20000, 24000, 28500, 33500, 39000, 45000, 51500, 58500, 66000, 74000, 82500, 91500, 101000,
];

// Field encounters
pub const DEFAULT_ENCOUNTER_RATE: f64 = 0.1;
pub const FIELD_MONSTERS: &[&str] = &["slime", "drakee", "goblin"];

// Battle pacing: the opponent's retaliation is deferred by one timer so
// the player's action renders first
pub const OPPONENT_TURN_DELAY_MS: u64 = 600;
pub const MAX_SIMULATED_TURNS: u32 = 100;

// Battle log shown in the battle scene
pub const BATTLE_LOG_CAPACITY: usize = 8;
