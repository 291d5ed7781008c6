#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Spawning system responsible for emitting enemy spawn commands.
//!
//! Every frame the director advances a spawn timer and compares it against a
//! threshold drawn uniformly from the current spawn delay window. When the
//! timer reaches the threshold a single enemy of the kind selected by the
//! rotation is requested and the timer restarts.

use path_defence_core::{Command, Event, GameStatus, SpawnPacing};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Pure system that emits spawn commands while the game runs.
#[derive(Debug)]
pub struct SpawnDirector<R = ChaCha8Rng> {
    spawn_timer: u32,
    rng: R,
}

impl SpawnDirector<ChaCha8Rng> {
    /// Creates a director whose threshold draws replay for a given seed.
    #[must_use]
    pub fn new_seeded(seed: u64) -> Self {
        Self::with_rng(ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> SpawnDirector<R> {
    /// Creates a director that draws thresholds from the provided generator.
    #[must_use]
    pub fn with_rng(rng: R) -> Self {
        Self {
            spawn_timer: 0,
            rng,
        }
    }

    /// Frames elapsed since the most recent spawn.
    #[must_use]
    pub fn spawn_timer(&self) -> u32 {
        self.spawn_timer
    }

    /// Consumes world events and the spawn cadence to emit spawn commands.
    ///
    /// Nothing advances while the game is over. A reset restarts the timer.
    pub fn handle(
        &mut self,
        events: &[Event],
        status: GameStatus,
        pacing: &SpawnPacing,
        out: &mut Vec<Command>,
    ) {
        for event in events {
            match event {
                Event::GameReset => self.spawn_timer = 0,
                Event::FrameAdvanced { .. } if status == GameStatus::Running => {
                    self.advance(pacing, out);
                }
                _ => {}
            }
        }
    }

    fn advance(&mut self, pacing: &SpawnPacing, out: &mut Vec<Command>) {
        self.spawn_timer = self.spawn_timer.saturating_add(1);
        let threshold = self.draw_threshold(pacing);
        if self.spawn_timer < threshold {
            return;
        }

        self.spawn_timer = 0;
        out.push(Command::SpawnEnemy {
            kind: pacing.current_kind(),
        });
    }

    fn draw_threshold(&mut self, pacing: &SpawnPacing) -> u32 {
        let min = pacing.min_spawn_delay();
        let max = pacing.max_spawn_delay().max(min);
        self.rng.gen_range(min..=max)
    }
}
