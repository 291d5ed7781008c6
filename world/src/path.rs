//! Immutable polyline walked by every enemy.

use path_defence_core::{WorldPoint, DEFAULT_WAYPOINTS};
use thiserror::Error;

/// Reasons a sequence of waypoints cannot form a path.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum PathError {
    /// Fewer than two waypoints were supplied.
    #[error("a path needs at least two waypoints, found {found}")]
    TooShort {
        /// Number of waypoints supplied.
        found: usize,
    },
    /// A waypoint contained a NaN or infinite coordinate.
    #[error("waypoint {index} has a non-finite coordinate")]
    NonFinite {
        /// Index of the offending waypoint.
        index: usize,
    },
    /// Two consecutive waypoints share the same position.
    #[error("waypoints {index} and {next} coincide")]
    Coincident {
        /// Index of the first waypoint of the degenerate segment.
        index: usize,
        /// Index of the second waypoint of the degenerate segment.
        next: usize,
    },
}

/// Ordered sequence of at least two waypoints.
#[derive(Clone, Debug, PartialEq)]
pub struct Path {
    waypoints: Vec<WorldPoint>,
}

impl Path {
    /// Builds a path, rejecting degenerate waypoint sequences.
    pub fn new(waypoints: Vec<WorldPoint>) -> Result<Self, PathError> {
        if waypoints.len() < 2 {
            return Err(PathError::TooShort {
                found: waypoints.len(),
            });
        }

        for (index, point) in waypoints.iter().enumerate() {
            if !point.x.is_finite() || !point.y.is_finite() {
                return Err(PathError::NonFinite { index });
            }
        }

        for (index, pair) in waypoints.windows(2).enumerate() {
            if pair[0] == pair[1] {
                return Err(PathError::Coincident {
                    index,
                    next: index + 1,
                });
            }
        }

        Ok(Self { waypoints })
    }

    /// The fixed route used by the game.
    #[must_use]
    pub fn default_route() -> Self {
        Self {
            waypoints: DEFAULT_WAYPOINTS.to_vec(),
        }
    }

    /// Waypoints in traversal order.
    #[must_use]
    pub fn waypoints(&self) -> &[WorldPoint] {
        &self.waypoints
    }

    /// Number of waypoints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Reports whether the path has no waypoints.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Index of the final waypoint.
    #[must_use]
    pub fn last_index(&self) -> usize {
        self.waypoints.len() - 1
    }

    /// Point at which enemies enter the path.
    #[must_use]
    pub fn start(&self) -> WorldPoint {
        self.waypoints[0]
    }

    /// Waypoint at the provided index, if any.
    #[must_use]
    pub fn waypoint(&self, index: usize) -> Option<WorldPoint> {
        self.waypoints.get(index).copied()
    }

    /// Consecutive waypoint pairs forming the path segments.
    pub fn segments(&self) -> impl Iterator<Item = (WorldPoint, WorldPoint)> + '_ {
        self.waypoints.windows(2).map(|pair| (pair[0], pair[1]))
    }

    /// Total length of the path in world units.
    #[must_use]
    pub fn length(&self) -> f32 {
        self.segments().map(|(from, to)| from.distance(to)).sum()
    }
}

impl Default for Path {
    fn default() -> Self {
        Self::default_route()
    }
}
