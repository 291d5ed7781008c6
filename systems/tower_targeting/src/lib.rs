#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that selects tower targets from world snapshots.
//!
//! A tower picks the first enemy, in collection order, whose position lies
//! within its range. Distance is Euclidean and the range bound is inclusive.
//! There is no preference for the nearest enemy or the one furthest along
//! the path.

use path_defence_core::{EnemyView, GameStatus, TowerSnapshot, TowerTarget};

/// Tower targeting system performing first-match acquisition.
#[derive(Debug, Default)]
pub struct TowerTargeting;

impl TowerTargeting {
    /// Creates a new tower targeting system.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Selects the target of a single tower against the provided enemy view.
    ///
    /// The view must be taken after every previously resolved tower of the
    /// frame has been applied so enemies killed earlier are not selected.
    #[must_use]
    pub fn acquire(
        &self,
        status: GameStatus,
        tower: &TowerSnapshot,
        enemies: &EnemyView,
    ) -> Option<TowerTarget> {
        if status != GameStatus::Running {
            return None;
        }

        let range = tower.kind.range();
        enemies
            .iter()
            .find(|enemy| tower.position.distance(enemy.position) <= range)
            .map(|enemy| TowerTarget {
                tower: tower.id,
                enemy: enemy.id,
                tower_position: tower.position,
                enemy_position: enemy.position,
            })
    }
}
