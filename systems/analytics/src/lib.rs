#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Analytics system that folds world events into session statistics.

use path_defence_core::{Event, StatsReport};

/// Pure analytics system accumulating a [`StatsReport`] across games.
///
/// Statistics survive resets so a headless session can summarise every game
/// it played.
#[derive(Debug, Default)]
pub struct Analytics {
    report: StatsReport,
}

impl Analytics {
    /// Creates a new analytics system with an empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the statistics gathered so far.
    #[must_use]
    pub fn report(&self) -> &StatsReport {
        &self.report
    }

    /// Consumes the system, yielding the final report.
    #[must_use]
    pub fn into_report(self) -> StatsReport {
        self.report
    }

    /// Folds the provided world events into the running report.
    pub fn handle(&mut self, events: &[Event]) {
        let report = &mut self.report;
        for event in events {
            match event {
                Event::FrameAdvanced { .. } => report.frames += 1,
                Event::TowerPlaced { cost, .. } => {
                    report.towers_built += 1;
                    report.resources_spent += u64::from(*cost);
                }
                Event::TowerPlacementRejected { .. } => report.placements_rejected += 1,
                Event::EnemySpawned { kind, .. } => report.spawned[kind.index()] += 1,
                Event::EnemyLeaked { .. } => report.leaked += 1,
                Event::EnemyKilled { kind, reward, .. } => {
                    report.killed[kind.index()] += 1;
                    report.resources_earned += u64::from(*reward);
                }
                Event::TowerFired { .. } => report.shots_fired += 1,
                Event::GameOver { .. } => report.games_lost += 1,
                Event::ResourcesChanged { .. }
                | Event::HitPointsChanged { .. }
                | Event::SpawnPacingAccelerated { .. }
                | Event::GameReset => {}
            }
        }
    }
}
