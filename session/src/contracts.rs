//! Collaborator contracts implemented outside the session.

use snake_arcade_core::{Direction, EndReason, ModeId, RoundSnapshot};
use thiserror::Error;

/// Discrete input delivered by an input source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InputIntent {
    /// Requests a new heading for the player snake.
    Direction(Direction),
    /// Moves the menu selection to the previous mode.
    MenuUp,
    /// Moves the menu selection to the next mode.
    MenuDown,
    /// Starts the selected mode.
    MenuSelect,
    /// Replays the mode of the finished round.
    Restart,
    /// Abandons the round and shows the menu.
    ReturnToMenu,
}

/// Panels the UI surface can show or hide.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Overlay {
    /// Mode selection menu.
    Menu,
    /// Game-over panel.
    GameOver,
    /// Victory panel.
    Victory,
    /// Countdown display of timed modes.
    Timer,
}

/// One-way update pushed to the UI surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UiUpdate {
    /// Makes a panel visible.
    Show(Overlay),
    /// Hides a panel.
    Hide(Overlay),
    /// Highlights a mode in the menu.
    MenuSelection(ModeId),
    /// Score text of the current round.
    Score(u32),
    /// Countdown text in seconds.
    TimeRemaining(u32),
    /// Persisted high score text.
    HighScore(u32),
    /// Cause shown on the game-over panel.
    EndReason(EndReason),
}

/// Receives frames and UI updates from the session. Never reads state back.
pub trait Presenter {
    /// Draws one frame after a completed, non-terminal tick.
    fn frame(&mut self, snapshot: &RoundSnapshot);

    /// Applies a UI surface update.
    fn ui(&mut self, update: UiUpdate);
}

/// Errors reported by high score persistence.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing storage could not be read or written.
    #[error("high score storage is unavailable")]
    Io(#[from] std::io::Error),
    /// The stored record could not be encoded or decoded.
    #[error("high score record is malformed: {0}")]
    Malformed(String),
}

/// Persistence of the single high score value.
pub trait HighScoreStore {
    /// Reads the stored high score, returning zero when none exists.
    fn load(&mut self) -> u32;

    /// Persists a new high score.
    fn save(&mut self, score: u32) -> Result<(), StoreError>;
}

/// Store keeping the high score in memory for the lifetime of the process.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MemoryStore {
    high_score: u32,
}

impl MemoryStore {
    /// Creates a store that already holds `high_score`.
    #[must_use]
    pub const fn new(high_score: u32) -> Self {
        Self { high_score }
    }

    /// Value stored so far.
    #[must_use]
    pub const fn high_score(&self) -> u32 {
        self.high_score
    }
}

impl HighScoreStore for MemoryStore {
    fn load(&mut self) -> u32 {
        self.high_score
    }

    fn save(&mut self, score: u32) -> Result<(), StoreError> {
        self.high_score = score;
        Ok(())
    }
}
