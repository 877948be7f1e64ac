use std::collections::VecDeque;
use std::error::Error;
use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing_subscriber::EnvFilter;

use dragonfall::combat::session::CommandOutcome;
use dragonfall::combat::types::{BattleResult, Combatant, Opponent, Winner};
use dragonfall::combat::{BossMonster, TurnScheduler};
use dragonfall::core::constants::{BATTLE_LOG_CAPACITY, OPPONENT_TURN_DELAY_MS};
use dragonfall::core::EngineError;
use dragonfall::encounter;
use dragonfall::input::{self, Action};
use dragonfall::mode::ModeMachine;
use dragonfall::player::Player;
use dragonfall::ui;

struct App {
    machine: ModeMachine,
    scheduler: TurnScheduler,
    rng: rand::rngs::ThreadRng,
    log: VecDeque<String>,
    running: bool,
}

impl App {
    fn new() -> Self {
        let mut app = Self {
            machine: ModeMachine::new(Player::new()),
            scheduler: TurnScheduler::new(),
            rng: rand::thread_rng(),
            log: VecDeque::new(),
            running: true,
        };
        app.push_log("You set out from the castle. The Dragon King awaits.");
        app
    }

    fn push_log(&mut self, entry: impl Into<String>) {
        if self.log.len() == BATTLE_LOG_CAPACITY {
            self.log.pop_front();
        }
        self.log.push_back(entry.into());
    }

    fn handle_action(&mut self, action: Action) -> Result<(), EngineError> {
        match action {
            Action::Step => self.take_step()?,
            Action::ChallengeBoss => {
                self.start_battle(Opponent::Boss(BossMonster::dragon_king()))?;
            }
            Action::BattleCommand(token) => self.run_battle_command(token)?,
            Action::OpenMenu => self.machine.open_menu()?,
            Action::CloseMenu => self.machine.close_menu()?,
            Action::OpenDialog => self.machine.open_dialog()?,
            Action::CloseDialog => self.machine.close_dialog()?,
            Action::Quit => self.running = false,
        }
        Ok(())
    }

    fn take_step(&mut self) -> Result<(), EngineError> {
        let result = encounter::field_step(&mut self.rng)?;
        match result.opponent {
            Some(opponent) => self.start_battle(opponent)?,
            None => self.push_log("You walk on. The fields are quiet."),
        }
        Ok(())
    }

    fn start_battle(&mut self, opponent: Opponent) -> Result<(), EngineError> {
        let greeting = opponent.battle_start_message();
        self.machine.handle_encounter(Some(opponent))?;
        self.log.clear();
        self.push_log(greeting);
        Ok(())
    }

    fn run_battle_command(&mut self, token: &str) -> Result<(), EngineError> {
        let outcome = match self.machine.session_mut() {
            Some(session) => session.execute_command(token, &mut self.rng),
            None => return Ok(()),
        };

        match outcome {
            Ok(CommandOutcome::Attack { damage, .. }) => {
                let target = self
                    .machine
                    .session()
                    .map(|session| session.opponent().name().to_string())
                    .unwrap_or_default();
                self.push_log(format!("You strike the {} for {} damage!", target, damage));
                self.after_player_action();
            }
            Ok(CommandOutcome::Flee(flee)) => {
                if flee.success {
                    self.push_log("You escaped!");
                    self.scheduler.cancel();
                    self.machine
                        .handle_flee_result(true, flee.flee_chance, flee.attempts);
                } else {
                    self.push_log("You couldn't escape!");
                    self.after_player_action();
                }
            }
            Err(rejection) => {
                let message = rejection.to_string();
                self.push_log(message);
            }
        }
        Ok(())
    }

    /// Checks for battle end after a player action; if the battle goes
    /// on, hands the turn over and schedules the retaliation.
    fn after_player_action(&mut self) {
        let (result, id) = match self.machine.session_mut() {
            Some(session) => (session.check_battle_end(), session.id()),
            None => return,
        };

        if result.is_over {
            self.scheduler.cancel();
            self.finish_battle(result);
            return;
        }

        if let Some(session) = self.machine.session_mut() {
            session.next_turn();
        }
        self.scheduler
            .schedule(id, Duration::from_millis(OPPONENT_TURN_DELAY_MS));
    }

    fn run_opponent_turn(&mut self) {
        let outcome = match self.machine.session_mut() {
            Some(session) => session.execute_opponent_turn(&mut self.rng),
            None => return,
        };

        match outcome {
            Ok(action) => {
                self.push_log(format!("{} You take {} damage!", action.message, action.damage));

                let result = match self.machine.session_mut() {
                    Some(session) => session.check_battle_end(),
                    None => return,
                };
                if result.is_over {
                    self.finish_battle(result);
                } else if let Some(session) = self.machine.session_mut() {
                    session.next_turn();
                }
            }
            Err(rejection) => {
                tracing::warn!(%rejection, "opponent turn rejected");
            }
        }
    }

    fn finish_battle(&mut self, result: BattleResult) {
        let farewell = self
            .machine
            .session()
            .map(|session| session.opponent().defeat_message());

        if self.machine.handle_battle_end(result).is_err() {
            return;
        }

        match result.winner {
            Some(Winner::Player) => {
                if let Some(farewell) = farewell {
                    self.push_log(farewell);
                }
                self.push_log(format!(
                    "You gain {} experience and {} gold.",
                    result.experience_gained, result.gold_gained
                ));
                if let Some(player) = self.machine.player_mut() {
                    let report = player.gain_experience(result.experience_gained as i32);
                    player.add_gold(result.gold_gained as i32);
                    if report.leveled_up {
                        self.push_log(format!(
                            "You reached level {}! You feel fully restored.",
                            report.new_level
                        ));
                    }
                }
            }
            Some(Winner::Opponent) => {
                self.push_log("You have been defeated...");
                // A fallen hero wakes back at the castle, healed
                if let Some(player) = self.machine.player_mut() {
                    player.heal_full();
                }
                self.push_log("You awaken at the castle, restored.");
            }
            None => {}
        }
    }

    fn tick(&mut self) {
        let active = self.machine.session().map(|session| session.id());
        if self.scheduler.poll(Instant::now(), active) {
            self.run_opponent_turn();
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal);

    disable_raw_mode()?;
    terminal.backend_mut().execute(LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<(), Box<dyn Error>> {
    let mut app = App::new();

    while app.running {
        let snapshot = app.machine.session().map(|session| session.snapshot());
        let log: Vec<String> = app.log.iter().cloned().collect();
        terminal.draw(|frame| {
            ui::draw(
                frame,
                app.machine.mode(),
                app.machine.player(),
                snapshot.as_ref(),
                &log,
            );
        })?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key_event) = event::read()? {
                if let Some(action) = input::map_key(app.machine.mode(), key_event) {
                    app.handle_action(action)?;
                }
            }
        }

        app.tick();
    }

    Ok(())
}
