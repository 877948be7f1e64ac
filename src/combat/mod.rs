//! Battle resolution: combatants, the damage model, the per-battle
//! session state machine, and the deferred-turn scheduler.

pub mod boss;
pub mod monster;
pub mod resolver;
pub mod scheduler;
pub mod session;
pub mod types;

pub use boss::BossMonster;
pub use monster::Monster;
pub use scheduler::TurnScheduler;
pub use session::{BattleSession, CommandOutcome, CommandRejection, SessionId, Turn};
pub use types::{BattleResult, Combatant, Opponent, Winner};
