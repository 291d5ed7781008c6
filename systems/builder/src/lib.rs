#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system translating player input into placement and reset commands.

use path_defence_core::{Command, GameStatus, WorldPoint};

/// Input snapshot distilled from adapter-provided frame input data.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BuilderInput {
    /// Point the player clicked on this frame, in world units.
    pub place_at: Option<WorldPoint>,
    /// Indicates whether the player pressed the restart key on this frame.
    pub reset: bool,
}

impl BuilderInput {
    /// Creates input describing a click on the provided point.
    #[must_use]
    pub const fn click(at: WorldPoint) -> Self {
        Self {
            place_at: Some(at),
            reset: false,
        }
    }

    /// Creates input describing a restart request.
    #[must_use]
    pub const fn restart() -> Self {
        Self {
            place_at: None,
            reset: true,
        }
    }
}

/// Builder system that gates player input on the game status.
///
/// Clicks become placement requests only while the game runs; restart
/// requests are forwarded only once the game is over.
#[derive(Debug, Clone, Default)]
pub struct Builder;

impl Builder {
    /// Creates a new builder system instance.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Consumes adapter-derived input to emit builder commands.
    pub fn handle(&self, status: GameStatus, input: BuilderInput, out: &mut Vec<Command>) {
        match status {
            GameStatus::Running => {
                if let Some(at) = input.place_at {
                    out.push(Command::PlaceTower { at });
                }
            }
            GameStatus::GameOver => {
                if input.reset {
                    out.push(Command::ResetGame);
                }
            }
        }
    }
}
