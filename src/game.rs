use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use log::{debug, info};
use rand::Rng;

use crate::food::Food;
use crate::position::Position;
use crate::scheduler::{Scheduler, TimerHandle};
use crate::scoreboard::Scoreboard;
use crate::snake::Snake;
use crate::surface::Surface;
use crate::term::TermManager;
use GameState::*;

const TICK_INTERVAL_MS: u64 = 100;
const BLINK_INTERVAL_MS: u64 = 500;
// Slightly longer than one blink
const RESTART_DELAY_MS: u64 = 600;
// Longest input wait when nothing is scheduled
const IDLE_POLL_MS: u64 = 100;

const FOOD_REACH: f64 = 15.0;
const TAIL_REACH: f64 = 10.0;
const WALL_LIMIT: f64 = 280.0;

const GAME_OVER_TEXT: &str = "GAME OVER.";
const GAME_OVER_ORIGIN: Position = Position::new(0.0, 0.0);
const RESTART_PROMPT: &str = "RESTART GAME? (Y/N)";
const BLINKER_ORIGIN: Position = Position::new(0.0, -60.0);

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GameState {
    Running,
    GameOverPrompt,
    Restarting,
}

/// What a key press asks the game to do.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Up,
    Down,
    Left,
    Right,
    AcceptRestart,
    Quit,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Collision {
    Wall,
    Tail,
}

#[derive(Debug)]
enum Task {
    Tick,
    Blink,
    CompleteRestart,
}

/// Owns every game component and the surface they are drawn on. Time is
/// passed in by the caller as the offset since the game was started.
pub struct SnakeGame<S, R> {
    surface: S,
    rng: R,
    state: GameState,
    snake: Snake,
    food: Food,
    scoreboard: Scoreboard,
    scheduler: Scheduler<Task>,
    blinker_visible: bool,
    blinker: Option<TimerHandle>,
}

impl<S: Surface, R: Rng> SnakeGame<S, R> {
    pub fn new(surface: S, mut rng: R) -> Self {
        let food = Food::new(&mut rng);

        SnakeGame {
            surface,
            rng,
            state: Running,
            snake: Snake::new(),
            food,
            scoreboard: Scoreboard::new(0),
            scheduler: Scheduler::new(),
            blinker_visible: false,
            blinker: None,
        }
    }

    pub fn start(&mut self, now: Duration) -> Result<()> {
        info!("Game started");
        self.redraw()?;
        self.schedule_tick(now);
        Ok(())
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    pub fn next_deadline(&mut self) -> Option<Duration> {
        self.scheduler.next_deadline()
    }

    pub fn handle_command(&mut self, cmd: Command, now: Duration) -> Flow {
        match (cmd, self.state) {
            (Command::Quit, _) => {
                info!("Quit requested, final score {}", self.scoreboard.score());
                return Flow::Quit;
            }
            (Command::Up, Running) => self.snake.up(),
            (Command::Down, Running) => self.snake.down(),
            (Command::Left, Running) => self.snake.left(),
            (Command::Right, Running) => self.snake.right(),
            (Command::AcceptRestart, GameOverPrompt) => self.accept_restart(now),
            _ => {}
        }

        Flow::Continue
    }

    /// Runs every task due at or before `now`.
    pub fn advance(&mut self, now: Duration) -> Result<()> {
        while let Some(task) = self.scheduler.pop_due(now) {
            match task {
                Task::Tick => self.tick(now)?,
                Task::Blink => self.prompt_restart(now)?,
                Task::CompleteRestart => self.complete_restart(now)?,
            }
        }

        Ok(())
    }

    ///////////////////////////////////////////////////////////////////////////

    fn tick(&mut self, now: Duration) -> Result<()> {
        self.snake.move_step();

        if self.snake.head().distance(self.food.position()) < FOOD_REACH {
            self.food.refresh(&mut self.rng);
            self.snake.extend();
            self.scoreboard.increase_score();
            debug!("Food eaten, score {}", self.scoreboard.score());
        }

        if let Some(collision) = self.collision() {
            info!("Snake hit the {:?} at {:?}", collision, self.snake.head());
            return self.game_over(now);
        }

        self.redraw()?;
        self.schedule_tick(now);
        Ok(())
    }

    // Walls are checked before the tail
    fn collision(&self) -> Option<Collision> {
        let head = self.snake.head();

        if head.x.abs() > WALL_LIMIT || head.y.abs() > WALL_LIMIT {
            Some(Collision::Wall)
        } else if self.snake.tail().iter().any(|seg| head.distance(*seg) < TAIL_REACH) {
            Some(Collision::Tail)
        } else {
            None
        }
    }

    fn game_over(&mut self, now: Duration) -> Result<()> {
        self.state = GameOverPrompt;

        if self.scoreboard.score() > self.scoreboard.high_score() {
            self.scoreboard.new_high_score();
            info!("New high score: {}", self.scoreboard.high_score());
        }

        info!("Game over, score {}, length {}", self.scoreboard.score(), self.snake.len());
        self.prompt_restart(now)
    }

    fn prompt_restart(&mut self, now: Duration) -> Result<()> {
        self.blinker_visible = !self.blinker_visible;
        self.redraw()?;

        let at = now + Duration::from_millis(BLINK_INTERVAL_MS);
        self.blinker = Some(self.scheduler.schedule(at, Task::Blink));
        Ok(())
    }

    fn accept_restart(&mut self, now: Duration) {
        if let Some(handle) = self.blinker.take() {
            self.scheduler.cancel(handle);
        }

        info!("Restarting");
        self.state = Restarting;
        self.scheduler.schedule(now + Duration::from_millis(RESTART_DELAY_MS), Task::CompleteRestart);
    }

    fn complete_restart(&mut self, now: Duration) -> Result<()> {
        self.surface.clear();

        self.snake = Snake::new();
        self.food = Food::new(&mut self.rng);
        self.scoreboard.reset_score();
        self.blinker_visible = false;
        self.state = Running;

        self.redraw()?;
        self.schedule_tick(now);
        Ok(())
    }

    fn schedule_tick(&mut self, now: Duration) {
        self.scheduler.schedule(now + Duration::from_millis(TICK_INTERVAL_MS), Task::Tick);
    }

    fn redraw(&mut self) -> Result<()> {
        self.surface.clear();

        self.food.draw(&mut self.surface);
        self.snake.draw(&mut self.surface);
        self.scoreboard.draw(&mut self.surface);

        if self.state != Running {
            self.surface.write(GAME_OVER_ORIGIN, GAME_OVER_TEXT);
        }

        if self.state == GameOverPrompt && self.blinker_visible {
            self.surface.write(BLINKER_ORIGIN, RESTART_PROMPT);
        }

        self.surface.update()
    }
}

impl<R: Rng> SnakeGame<TermManager, R> {
    /// Main loop: waits for keys until the next task is due, then runs it.
    /// Returns once the player quits.
    pub fn play(&mut self) -> Result<()> {
        let started = Instant::now();
        self.start(started.elapsed())?;

        loop {
            let now = started.elapsed();
            let wait = self
                .next_deadline()
                .map_or(Duration::from_millis(IDLE_POLL_MS), |at| at.saturating_sub(now));

            for key_ev in self.surface.read_key_events_queue(wait)? {
                if let Some(cmd) = command_for(&key_ev) {
                    if self.handle_command(cmd, started.elapsed()) == Flow::Quit {
                        return Ok(());
                    }
                }
            }

            self.advance(started.elapsed())?;
        }
    }
}

fn command_for(ev: &KeyEvent) -> Option<Command> {
    if is_ctrl_c(ev) {
        return Some(Command::Quit);
    }

    match ev.code {
        KeyCode::Char('w') | KeyCode::Up => Some(Command::Up),
        KeyCode::Char('a') | KeyCode::Left => Some(Command::Left),
        KeyCode::Char('s') | KeyCode::Down => Some(Command::Down),
        KeyCode::Char('d') | KeyCode::Right => Some(Command::Right),
        KeyCode::Char('y') | KeyCode::Char('Y') => Some(Command::AcceptRestart),
        KeyCode::Char('n') | KeyCode::Char('N') => Some(Command::Quit),
        _ => None,
    }
}

fn is_ctrl_c(ev: &KeyEvent) -> bool {
    matches!(ev, KeyEvent { code: KeyCode::Char('c'), modifiers: KeyModifiers::CONTROL })
}
