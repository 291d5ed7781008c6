//! Economy, hit points and spawn pacing of a single game.

use path_defence_core::{GameStatus, SpawnPacing, INITIAL_HIT_POINTS, INITIAL_RESOURCES};

/// Mutable record threaded through every update of a game.
#[derive(Clone, Debug, PartialEq)]
pub struct GameState {
    resources: u32,
    hit_points: i32,
    game_over: bool,
    pacing: SpawnPacing,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// Creates the state every game starts from.
    #[must_use]
    pub fn new() -> Self {
        Self {
            resources: INITIAL_RESOURCES,
            hit_points: INITIAL_HIT_POINTS,
            game_over: false,
            pacing: SpawnPacing::default(),
        }
    }

    /// Returns the state with a different hit point balance.
    #[must_use]
    pub fn with_hit_points(mut self, hit_points: i32) -> Self {
        self.hit_points = hit_points;
        self
    }

    /// Returns the state with a different resource balance.
    #[must_use]
    pub fn with_resources(mut self, resources: u32) -> Self {
        self.resources = resources;
        self
    }

    /// Resources available for construction.
    #[must_use]
    pub const fn resources(&self) -> u32 {
        self.resources
    }

    /// Remaining hit points.
    #[must_use]
    pub const fn hit_points(&self) -> i32 {
        self.hit_points
    }

    /// Whether the game has ended.
    #[must_use]
    pub const fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Status derived from the game-over flag.
    #[must_use]
    pub const fn status(&self) -> GameStatus {
        if self.game_over {
            GameStatus::GameOver
        } else {
            GameStatus::Running
        }
    }

    /// Spawn cadence bookkeeping.
    #[must_use]
    pub const fn pacing(&self) -> &SpawnPacing {
        &self.pacing
    }

    pub(crate) fn pacing_mut(&mut self) -> &mut SpawnPacing {
        &mut self.pacing
    }

    pub(crate) fn can_afford(&self, cost: u32) -> bool {
        self.resources >= cost
    }

    pub(crate) fn charge(&mut self, cost: u32) {
        self.resources = self.resources.saturating_sub(cost);
    }

    pub(crate) fn credit(&mut self, reward: u32) {
        self.resources = self.resources.saturating_add(reward);
    }

    /// Deducts a hit point, returning `true` when this leak ended the game.
    pub(crate) fn lose_hit_point(&mut self) -> bool {
        self.hit_points -= 1;
        if self.hit_points <= 0 && !self.game_over {
            self.game_over = true;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_fixed_balances() {
        let state = GameState::new();
        assert_eq!(state.resources(), 500);
        assert_eq!(state.hit_points(), 20);
        assert!(!state.is_game_over());
        assert_eq!(state.pacing().min_spawn_delay(), 50);
        assert_eq!(state.pacing().max_spawn_delay(), 180);
        assert!((state.pacing().acceleration_rate() - 0.95).abs() < f64::EPSILON);
    }

    #[test]
    fn game_over_triggers_once() {
        let mut state = GameState::new().with_hit_points(2);
        assert!(!state.lose_hit_point());
        assert!(state.lose_hit_point());
        assert_eq!(state.status(), GameStatus::GameOver);
        assert!(!state.lose_hit_point());
        assert_eq!(state.hit_points(), -1);
    }
}
