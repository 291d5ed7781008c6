//! Scenario files describing a scripted headless run.

use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use path_defence_core::{WorldPoint, FRAME_RATE_HZ};
use serde::Deserialize;

/// Frames simulated when neither the scenario nor the command line sets a budget.
pub(crate) const DEFAULT_FRAMES: u64 = 10 * 60 * FRAME_RATE_HZ as u64;

/// Tower placement scheduled on a specific frame.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ScriptedPlacement {
    pub(crate) frame: u64,
    pub(crate) x: f32,
    pub(crate) y: f32,
}

impl ScriptedPlacement {
    pub(crate) fn point(&self) -> WorldPoint {
        WorldPoint::new(self.x, self.y)
    }
}

/// Scripted run loaded from TOML.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Scenario {
    pub(crate) seed: Option<u64>,
    pub(crate) frames: Option<u64>,
    pub(crate) auto_restart: bool,
    pub(crate) placements: Vec<ScriptedPlacement>,
    pub(crate) resets: Vec<u64>,
}

impl Scenario {
    /// Reads and validates a scenario file.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario at {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("invalid scenario at {}", path.display()))
    }

    fn parse(contents: &str) -> Result<Self> {
        let mut scenario: Scenario =
            toml::from_str(contents).context("failed to parse scenario toml contents")?;

        if scenario.frames == Some(0) {
            bail!("scenario frame budget must be positive");
        }
        if let Some(placement) = scenario
            .placements
            .iter()
            .find(|placement| !placement.x.is_finite() || !placement.y.is_finite())
        {
            bail!(
                "placement on frame {} has a non-finite coordinate",
                placement.frame
            );
        }
        if scenario.placements.iter().any(|placement| placement.frame == 0)
            || scenario.resets.contains(&0)
        {
            bail!("scripted inputs start on frame 1");
        }

        scenario.placements.sort_by_key(|placement| placement.frame);
        scenario.resets.sort_unstable();
        scenario.resets.dedup();
        Ok(scenario)
    }

    /// Placements scheduled for the provided frame, in file order.
    pub(crate) fn placements_on(&self, frame: u64) -> impl Iterator<Item = &ScriptedPlacement> {
        self.placements
            .iter()
            .filter(move |placement| placement.frame == frame)
    }

    /// Whether a restart is scripted for the provided frame.
    pub(crate) fn resets_on(&self, frame: u64) -> bool {
        self.resets.binary_search(&frame).is_ok()
    }
}
