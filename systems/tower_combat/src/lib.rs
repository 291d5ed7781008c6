#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that turns targeting data into attack or cooldown commands.

use path_defence_core::{Command, GameStatus, TowerSnapshot, TowerTarget};

/// Tower combat system that decides whether a tower attacks this frame.
#[derive(Debug, Default)]
pub struct TowerCombat;

impl TowerCombat {
    /// Creates a new tower combat system.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Emits exactly one command for the tower while the game runs.
    ///
    /// A ready tower with a target fires. Every other tower spends the frame
    /// cooling down while remembering what it currently tracks.
    pub fn handle(
        &self,
        status: GameStatus,
        tower: &TowerSnapshot,
        target: Option<TowerTarget>,
        out: &mut Vec<Command>,
    ) {
        if status != GameStatus::Running {
            return;
        }

        match target {
            Some(target) if tower.is_ready() => out.push(Command::FireTower {
                tower: tower.id,
                target: target.enemy,
            }),
            _ => out.push(Command::CoolTower {
                tower: tower.id,
                target: target.map(|target| target.enemy),
            }),
        }
    }
}
