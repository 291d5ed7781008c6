//! Spawn cadence bookkeeping shared by the world and the spawning system.

use serde::{Deserialize, Serialize};

use crate::{
    EnemyKind, ACCELERATION_INTERVAL, ACCELERATION_RATE, ENEMIES_PER_GROUP, MAX_SPAWN_DELAY,
    MIN_SPAWN_DELAY,
};

/// Counters and bounds that pace enemy spawns.
///
/// The world records every spawn here. The spawning system reads the bounds
/// to draw its threshold and the rotation index to pick the next kind.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpawnPacing {
    min_spawn_delay: u32,
    initial_max_spawn_delay: u32,
    max_spawn_delay: u32,
    acceleration_rate: f64,
    accelerations: u32,
    enemies_spawned: u32,
    current_enemy_type_index: usize,
    enemies_in_current_group: u32,
}

impl Default for SpawnPacing {
    fn default() -> Self {
        Self::new(MIN_SPAWN_DELAY, MAX_SPAWN_DELAY, ACCELERATION_RATE)
    }
}

impl SpawnPacing {
    /// Creates pacing state with explicit bounds and acceleration rate.
    #[must_use]
    pub const fn new(min_spawn_delay: u32, max_spawn_delay: u32, acceleration_rate: f64) -> Self {
        Self {
            min_spawn_delay,
            initial_max_spawn_delay: max_spawn_delay,
            max_spawn_delay,
            acceleration_rate,
            accelerations: 0,
            enemies_spawned: 0,
            current_enemy_type_index: 0,
            enemies_in_current_group: 0,
        }
    }

    /// Lower bound of the spawn threshold draw, in frames.
    #[must_use]
    pub const fn min_spawn_delay(&self) -> u32 {
        self.min_spawn_delay
    }

    /// Current upper bound of the spawn threshold draw, in frames.
    #[must_use]
    pub const fn max_spawn_delay(&self) -> u32 {
        self.max_spawn_delay
    }

    /// Factor applied to the upper bound on every acceleration.
    #[must_use]
    pub const fn acceleration_rate(&self) -> f64 {
        self.acceleration_rate
    }

    /// Number of enemies spawned since the last reset.
    #[must_use]
    pub const fn enemies_spawned(&self) -> u32 {
        self.enemies_spawned
    }

    /// Position of the current kind within the spawn rotation.
    #[must_use]
    pub const fn current_enemy_type_index(&self) -> usize {
        self.current_enemy_type_index
    }

    /// Spawns already emitted within the current group.
    #[must_use]
    pub const fn enemies_in_current_group(&self) -> u32 {
        self.enemies_in_current_group
    }

    /// Number of times the upper bound has been tightened.
    #[must_use]
    pub const fn accelerations(&self) -> u32 {
        self.accelerations
    }

    /// Kind of the next enemy to spawn.
    #[must_use]
    pub const fn current_kind(&self) -> EnemyKind {
        EnemyKind::from_rotation(self.current_enemy_type_index)
    }

    /// Upper bound reached after the provided number of accelerations.
    ///
    /// Never drops below the lower bound.
    #[must_use]
    pub fn max_delay_after(&self, accelerations: u32) -> u32 {
        let exponent = i32::try_from(accelerations).unwrap_or(i32::MAX);
        let scaled = f64::from(self.initial_max_spawn_delay) * self.acceleration_rate.powi(exponent);
        let rounded = scaled.round().max(0.0);
        let bounded = if rounded >= f64::from(u32::MAX) {
            u32::MAX
        } else {
            rounded as u32
        };
        bounded.max(self.min_spawn_delay)
    }

    /// Records a spawn, advancing the kind rotation and the cadence.
    ///
    /// Returns the new upper bound when this spawn tightened the cadence.
    pub fn record_spawn(&mut self) -> Option<u32> {
        self.enemies_spawned = self.enemies_spawned.saturating_add(1);
        self.enemies_in_current_group += 1;

        if self.enemies_in_current_group == ENEMIES_PER_GROUP {
            self.current_enemy_type_index =
                (self.current_enemy_type_index + 1) % EnemyKind::ALL.len();
            self.enemies_in_current_group = 0;
        }

        if self.enemies_spawned % ACCELERATION_INTERVAL != 0 {
            return None;
        }

        self.accelerations = self.accelerations.saturating_add(1);
        let previous = self.max_spawn_delay;
        self.max_spawn_delay = self.max_delay_after(self.accelerations).min(previous);
        Some(self.max_spawn_delay)
    }
}
