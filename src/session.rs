//! A running minigame session and the process-wide scoreboard.

use rand::Rng;
use tracing::{debug, info};

use crate::compute::{init_state, tick};
use crate::entities::{FrameEvent, GameState, GameStatus, Input};

/// Score at or below which the game-over screen teases the player.
pub const ROOKIE_SCORE: u32 = 2;

/// Owns one game's state, its RNG and the callback to run on game over.
///
/// The callback receives the final score and fires at most once per game;
/// after it fires `tick` is a no-op until `restart`.
pub struct Session<R: Rng> {
    state: GameState,
    rng: R,
    on_game_over: Box<dyn FnMut(u32)>,
    reported: bool,
}

impl<R: Rng> Session<R> {
    pub fn new(rng: R, on_game_over: impl FnMut(u32) + 'static) -> Self {
        Self::from_state(init_state(), rng, on_game_over)
    }

    /// Start from an arbitrary state (scripted scenarios, tests).
    pub fn from_state(state: GameState, rng: R, on_game_over: impl FnMut(u32) + 'static) -> Self {
        Self {
            state,
            rng,
            on_game_over: Box::new(on_game_over),
            reported: false,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }

    pub fn is_over(&self) -> bool {
        self.state.status == GameStatus::GameOver
    }

    pub fn tick(&mut self, input: &Input) -> &GameState {
        if self.is_over() {
            return &self.state;
        }
        self.state = tick(&self.state, input, &mut self.rng);

        for event in &self.state.events {
            match event {
                FrameEvent::BossSpawned => debug!(frame = self.state.frame, "boss spawned"),
                FrameEvent::BossPhase2 => debug!(frame = self.state.frame, "boss entered phase 2"),
                FrameEvent::BossDefeated { bonus } => {
                    debug!(frame = self.state.frame, bonus, "boss defeated")
                }
                _ => {}
            }
        }

        if self.is_over() && !self.reported {
            self.reported = true;
            info!(score = self.state.score, frame = self.state.frame, "game over");
            (self.on_game_over)(self.state.score);
        }
        &self.state
    }

    /// Throw the current game away and begin a fresh one.
    pub fn restart(&mut self) {
        self.state = init_state();
        self.reported = false;
    }
}

// ── Scoreboard ───────────────────────────────────────────────────────────────

/// What the game-over screen shows for a finished game.
#[derive(Clone, Debug, PartialEq)]
pub struct Verdict {
    pub score: u32,
    pub high_score: u32,
    pub new_best: bool,
    pub rookie: bool,
}

/// Best score seen during this process.
#[derive(Clone, Debug, Default)]
pub struct Scoreboard {
    high_score: u32,
}

impl Scoreboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn record(&mut self, score: u32) -> Verdict {
        let new_best = score > self.high_score;
        if new_best {
            self.high_score = score;
        }
        Verdict {
            score,
            high_score: self.high_score,
            new_best,
            rookie: score <= ROOKIE_SCORE,
        }
    }
}
