//! Enemies walking the path.

use path_defence_core::{EnemyId, EnemyKind, EnemySnapshot, WorldPoint};

use crate::path::Path;

/// Live enemy owned by the world.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Enemy {
    id: EnemyId,
    kind: EnemyKind,
    position: WorldPoint,
    path_index: usize,
    health: i32,
    max_health: i32,
    speed: f32,
    reward: u32,
    dead: bool,
}

impl Enemy {
    /// Creates an enemy of the provided kind standing on the first waypoint.
    pub(crate) fn spawn(id: EnemyId, kind: EnemyKind, path: &Path) -> Self {
        let stats = kind.stats();
        Self {
            id,
            kind,
            position: path.start(),
            path_index: 0,
            health: stats.health,
            max_health: stats.health,
            speed: stats.speed,
            reward: stats.reward,
            dead: false,
        }
    }

    pub(crate) fn id(&self) -> EnemyId {
        self.id
    }

    pub(crate) fn kind(&self) -> EnemyKind {
        self.kind
    }

    pub(crate) fn position(&self) -> WorldPoint {
        self.position
    }

    pub(crate) fn reward(&self) -> u32 {
        self.reward
    }

    pub(crate) fn is_dead(&self) -> bool {
        self.dead
    }

    /// Advances one frame along the path.
    ///
    /// When the next waypoint is within one step the enemy lands on it and
    /// any leftover distance is dropped.
    pub(crate) fn advance(&mut self, path: &Path) {
        let Some(next) = path.waypoint(self.path_index + 1) else {
            return;
        };

        let dx = next.x - self.position.x;
        let dy = next.y - self.position.y;
        let distance = dx.hypot(dy);

        if distance <= self.speed {
            self.path_index += 1;
            self.position = next;
        } else {
            let ratio = self.speed / distance;
            self.position.x += dx * ratio;
            self.position.y += dy * ratio;
        }
    }

    /// Reports whether the enemy stands on the final waypoint.
    pub(crate) fn reached_end(&self, path: &Path) -> bool {
        self.path_index >= path.last_index()
    }

    /// Applies damage and reports whether this hit killed the enemy.
    ///
    /// Only the first lethal hit returns `true`; an enemy that is already dead
    /// ignores further damage.
    pub(crate) fn take_damage(&mut self, amount: i32) -> bool {
        if self.dead {
            return false;
        }

        self.health -= amount;
        if self.health <= 0 {
            self.dead = true;
            return true;
        }
        false
    }

    pub(crate) fn snapshot(&self) -> EnemySnapshot {
        EnemySnapshot {
            id: self.id,
            kind: self.kind,
            position: self.position,
            path_index: self.path_index,
            health: self.health,
            max_health: self.max_health,
        }
    }
}
