#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Path Defence engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters and systems submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! for systems and presentation hooks to react to deterministically.
//!
//! Every tuning constant the simulation depends on lives here so that the
//! behaviour of a run is fully described by the command stream plus the seed
//! of the spawn director's random source.

use serde::{Deserialize, Serialize};

mod pacing;

pub use pacing::SpawnPacing;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Path Defence.";

/// Side length of a single placement cell measured in world units.
pub const GRID_SIZE: i32 = 40;
/// Width of the logical canvas measured in world units.
pub const CANVAS_WIDTH: i32 = 800;
/// Height of the logical canvas, including the reserved UI strip.
pub const CANVAS_HEIGHT: i32 = 660;
/// Height of the UI strip reserved at the bottom of the canvas.
pub const UI_STRIP_HEIGHT: i32 = 60;
/// Height of the playable area above the UI strip.
pub const PLAY_AREA_HEIGHT: i32 = CANVAS_HEIGHT - UI_STRIP_HEIGHT;
/// Number of placement columns available on the grid.
pub const GRID_COLUMNS: i32 = CANVAS_WIDTH / GRID_SIZE;
/// Number of placement rows available above the UI strip.
pub const GRID_ROWS: i32 = PLAY_AREA_HEIGHT / GRID_SIZE;

/// Resources charged for constructing a tower.
pub const TOWER_COST: u32 = 100;
/// Resources available at the start of every game.
pub const INITIAL_RESOURCES: u32 = 500;
/// Hit points available at the start of every game.
pub const INITIAL_HIT_POINTS: i32 = 20;
/// Number of frames the attack line stays visible after a tower fires.
pub const ATTACK_EFFECT_FRAMES: u32 = 5;
/// Target rate of the logical simulation clock.
pub const FRAME_RATE_HZ: u32 = 60;

/// Lower bound of the spawn threshold draw, in frames.
pub const MIN_SPAWN_DELAY: u32 = 50;
/// Initial upper bound of the spawn threshold draw, in frames.
pub const MAX_SPAWN_DELAY: u32 = 180;
/// Factor applied to the upper spawn bound on every acceleration.
pub const ACCELERATION_RATE: f64 = 0.95;
/// Number of consecutive spawns sharing one enemy kind.
pub const ENEMIES_PER_GROUP: u32 = 5;
/// Number of spawns between two accelerations of the spawn cadence.
pub const ACCELERATION_INTERVAL: u32 = 10;

/// Waypoints of the fixed route walked by every enemy.
pub const DEFAULT_WAYPOINTS: [WorldPoint; 6] = [
    WorldPoint::new(50.0, 50.0),
    WorldPoint::new(750.0, 50.0),
    WorldPoint::new(750.0, 550.0),
    WorldPoint::new(50.0, 550.0),
    WorldPoint::new(50.0, 300.0),
    WorldPoint::new(400.0, 300.0),
];

/// Describes whether the simulation is still accepting gameplay commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    /// Enemies advance, towers fire and placements are honoured.
    Running,
    /// Hit points ran out; only a reset request is honoured.
    GameOver,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the logical frame clock by one frame.
    Tick,
    /// Requests placement of a tower on the cell containing the provided point.
    PlaceTower {
        /// Point in world units that was selected by the player.
        at: WorldPoint,
    },
    /// Requests that a new enemy of the provided kind enters at the path start.
    SpawnEnemy {
        /// Kind of enemy to introduce.
        kind: EnemyKind,
    },
    /// Moves every live enemy one step along the path and settles leaks.
    AdvanceEnemies,
    /// Requests that a ready tower attacks the provided enemy.
    FireTower {
        /// Identifier of the tower that fires.
        tower: TowerId,
        /// Identifier of the enemy the tower acquired this frame.
        target: EnemyId,
    },
    /// Lets a tower that is not firing this frame progress its cooldown.
    CoolTower {
        /// Identifier of the tower that idles.
        tower: TowerId,
        /// Enemy the tower is tracking while it cools down, if any.
        target: Option<EnemyId>,
    },
    /// Requests that a finished game is reinitialised to its starting state.
    ResetGame,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the frame clock advanced.
    FrameAdvanced {
        /// Index of the frame that just started.
        frame: u64,
    },
    /// Confirms that a tower was placed into the world.
    TowerPlaced {
        /// Identifier assigned to the tower by the world.
        tower: TowerId,
        /// Cell occupied by the tower.
        cell: CellCoord,
        /// Resources charged for the construction.
        cost: u32,
    },
    /// Reports that a tower placement request was rejected.
    TowerPlacementRejected {
        /// Cell derived from the requested point.
        cell: CellCoord,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Confirms that an enemy entered the path.
    EnemySpawned {
        /// Identifier assigned to the enemy.
        enemy: EnemyId,
        /// Kind of the enemy.
        kind: EnemyKind,
        /// Position at which the enemy appeared.
        position: WorldPoint,
    },
    /// Reports that an enemy reached the end of the path.
    EnemyLeaked {
        /// Identifier of the enemy that escaped.
        enemy: EnemyId,
        /// Kind of the enemy.
        kind: EnemyKind,
    },
    /// Reports that a tower attack destroyed an enemy.
    EnemyKilled {
        /// Identifier of the destroyed enemy.
        enemy: EnemyId,
        /// Kind of the destroyed enemy.
        kind: EnemyKind,
        /// Tower that delivered the final blow.
        tower: TowerId,
        /// Resources credited for the kill.
        reward: u32,
        /// Position at which the enemy was destroyed.
        position: WorldPoint,
    },
    /// Reports that a tower attacked an enemy.
    TowerFired {
        /// Identifier of the attacking tower.
        tower: TowerId,
        /// Identifier of the enemy that was hit.
        target: EnemyId,
        /// Centre of the attacking tower.
        from: WorldPoint,
        /// Position of the enemy when it was hit.
        to: WorldPoint,
        /// Damage applied by the attack.
        damage: i32,
    },
    /// Reports the resource balance after a change.
    ResourcesChanged {
        /// Balance after the change.
        resources: u32,
    },
    /// Reports the hit point balance after a change.
    HitPointsChanged {
        /// Balance after the change.
        hit_points: i32,
    },
    /// Reports that the spawn cadence tightened.
    SpawnPacingAccelerated {
        /// Upper bound of the spawn threshold after the change.
        max_spawn_delay: u32,
    },
    /// Announces that the game ended because hit points ran out.
    GameOver {
        /// Frame on which the final leak happened.
        frame: u64,
    },
    /// Announces that the world was reinitialised.
    GameReset,
}

/// Visual appearance applied to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnemyColor {
    red: u8,
    green: u8,
    blue: u8,
}

impl EnemyColor {
    /// Creates a new enemy color from byte RGB components.
    #[must_use]
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Red component of the color.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green component of the color.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue component of the color.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }
}

/// Silhouette used when presenting an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyShape {
    /// Axis-aligned square centred on the enemy.
    Square,
    /// Upward-pointing triangle centred on the enemy.
    Triangle,
    /// Circle centred on the enemy.
    Circle,
}

/// Kinds of enemies introduced by the spawn director.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Baseline enemy.
    Square,
    /// Fast, fragile enemy.
    Triangle,
    /// Slow, durable enemy.
    Circle,
}

impl EnemyKind {
    /// Every enemy kind in spawn rotation order.
    pub const ALL: [EnemyKind; 3] = [Self::Square, Self::Triangle, Self::Circle];

    /// Returns the kind at the provided rotation index, wrapping around.
    #[must_use]
    pub const fn from_rotation(index: usize) -> Self {
        Self::ALL[index % Self::ALL.len()]
    }

    /// Position of the kind inside [`EnemyKind::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns the constant configuration shared by every enemy of this kind.
    #[must_use]
    pub const fn stats(self) -> EnemyStats {
        match self {
            Self::Square => EnemyStats {
                health: 100,
                speed: 2.0,
                reward: 10,
                color: EnemyColor::from_rgb(255, 0, 0),
                shape: EnemyShape::Square,
                size: 20.0,
            },
            Self::Triangle => EnemyStats {
                health: 75,
                speed: 3.0,
                reward: 10,
                color: EnemyColor::from_rgb(0, 255, 0),
                shape: EnemyShape::Triangle,
                size: 20.0,
            },
            Self::Circle => EnemyStats {
                health: 150,
                speed: 1.5,
                reward: 15,
                color: EnemyColor::from_rgb(0, 0, 255),
                shape: EnemyShape::Circle,
                size: 20.0,
            },
        }
    }
}

/// Per-kind constants describing an enemy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemyStats {
    /// Health the enemy spawns with.
    pub health: i32,
    /// Distance covered per frame, in world units.
    pub speed: f32,
    /// Resources credited when the enemy is killed.
    pub reward: u32,
    /// Color used when presenting the enemy.
    pub color: EnemyColor,
    /// Silhouette used when presenting the enemy.
    pub shape: EnemyShape,
    /// Edge length of the enemy body, in world units.
    pub size: f32,
}

/// Types of towers that can be constructed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TowerKind {
    /// Basic tower with default attack parameters.
    Basic,
}

impl TowerKind {
    /// Targeting radius measured in world units from the tower centre.
    #[must_use]
    pub const fn range(self) -> f32 {
        match self {
            Self::Basic => 150.0,
        }
    }

    /// Damage applied by a single attack.
    #[must_use]
    pub const fn damage(self) -> i32 {
        match self {
            Self::Basic => 20,
        }
    }

    /// Frames the tower waits after an attack before it can fire again.
    #[must_use]
    pub const fn cooldown_frames(self) -> u32 {
        match self {
            Self::Basic => 45,
        }
    }

    /// Resources charged for constructing the tower.
    #[must_use]
    pub const fn cost(self) -> u32 {
        match self {
            Self::Basic => TOWER_COST,
        }
    }
}

/// Unique identifier assigned to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TowerId(u32);

impl TowerId {
    /// Creates a new tower identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the tower identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Continuous position expressed in world units.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct WorldPoint {
    /// Horizontal coordinate, growing to the right.
    pub x: f32,
    /// Vertical coordinate, growing downwards.
    pub y: f32,
}

impl WorldPoint {
    /// Creates a new point from its coordinates.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance between two points.
    #[must_use]
    pub fn distance(self, other: WorldPoint) -> f32 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// Location of a single placement cell expressed as column and row coordinates.
///
/// Coordinates are signed so that points left of or above the canvas map to
/// cells that placement validation can reject instead of wrapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: i32,
    row: i32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: i32, row: i32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> i32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> i32 {
        self.row
    }

    /// Upper-left corner of the cell in world units.
    #[must_use]
    pub fn origin(&self) -> WorldPoint {
        WorldPoint::new((self.column * GRID_SIZE) as f32, (self.row * GRID_SIZE) as f32)
    }

    /// Centre of the cell in world units.
    #[must_use]
    pub fn center(&self) -> WorldPoint {
        let half = GRID_SIZE / 2;
        WorldPoint::new(
            (self.column * GRID_SIZE + half) as f32,
            (self.row * GRID_SIZE + half) as f32,
        )
    }
}

/// Reasons a tower placement request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementError {
    /// The game has ended, so placement is disabled until a reset.
    GameOver,
    /// The requested cell lies outside the playable grid.
    OutOfBounds,
    /// The requested cell overlaps a segment of the enemy path.
    OnPath,
    /// Another tower already occupies the requested cell.
    Occupied,
    /// The player cannot afford the tower.
    InsufficientResources,
}

/// Immutable representation of a single enemy's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Unique identifier assigned to the enemy.
    pub id: EnemyId,
    /// Kind of the enemy.
    pub kind: EnemyKind,
    /// Current position in world units.
    pub position: WorldPoint,
    /// Index of the waypoint most recently reached.
    pub path_index: usize,
    /// Remaining health.
    pub health: i32,
    /// Health the enemy spawned with.
    pub max_health: i32,
}

impl EnemySnapshot {
    /// Fraction of health remaining, clamped to `0.0..=1.0`.
    #[must_use]
    pub fn health_ratio(&self) -> f32 {
        if self.max_health <= 0 {
            return 0.0;
        }
        (self.health as f32 / self.max_health as f32).clamp(0.0, 1.0)
    }
}

/// Read-only snapshot describing all live enemies.
///
/// Snapshots keep the order of the authoritative collection, which is the
/// order towers scan when acquiring targets.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from snapshots listed in collection order.
    #[must_use]
    pub fn from_snapshots(snapshots: Vec<EnemySnapshot>) -> Self {
        Self { snapshots }
    }

    /// Iterator over the captured enemy snapshots in collection order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Number of captured enemies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether no enemy was captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single tower's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerSnapshot {
    /// Identifier allocated to the tower by the world.
    pub id: TowerId,
    /// Kind of tower that was constructed.
    pub kind: TowerKind,
    /// Cell occupied by the tower.
    pub cell: CellCoord,
    /// Centre of the tower in world units.
    pub position: WorldPoint,
    /// Frames remaining before the tower may fire again.
    pub attack_timer: u32,
    /// Whether the attack line should currently be presented.
    pub attack_effect_active: bool,
    /// Enemy hit by the most recent attack, if any.
    pub target: Option<EnemyId>,
}

impl TowerSnapshot {
    /// Reports whether the tower is idle and may fire this frame.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        self.attack_timer == 0
    }
}

/// Read-only snapshot describing all towers in placement order.
#[derive(Clone, Debug, Default)]
pub struct TowerView {
    snapshots: Vec<TowerSnapshot>,
}

impl TowerView {
    /// Creates a new tower view from snapshots listed in placement order.
    #[must_use]
    pub fn from_snapshots(snapshots: Vec<TowerSnapshot>) -> Self {
        Self { snapshots }
    }

    /// Iterator over the captured tower snapshots in placement order.
    pub fn iter(&self) -> impl Iterator<Item = &TowerSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<TowerSnapshot> {
        self.snapshots
    }
}

/// Enemy a tower acquired during the current frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerTarget {
    /// Tower that acquired the target.
    pub tower: TowerId,
    /// Enemy selected by the tower.
    pub enemy: EnemyId,
    /// Centre of the tower in world units.
    pub tower_position: WorldPoint,
    /// Position of the enemy when it was acquired.
    pub enemy_position: WorldPoint,
}

/// Summary of a session folded from the event stream.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsReport {
    /// Frames simulated while the game was running.
    pub frames: u64,
    /// Games that ended because hit points ran out.
    pub games_lost: u32,
    /// Enemies spawned, indexed by [`EnemyKind::ALL`] order.
    pub spawned: [u32; 3],
    /// Enemies killed, indexed by [`EnemyKind::ALL`] order.
    pub killed: [u32; 3],
    /// Enemies that reached the end of the path.
    pub leaked: u32,
    /// Towers constructed.
    pub towers_built: u32,
    /// Placement requests that were rejected.
    pub placements_rejected: u32,
    /// Resources credited for kills.
    pub resources_earned: u64,
    /// Resources charged for towers.
    pub resources_spent: u64,
    /// Attacks delivered by towers.
    pub shots_fired: u64,
}

impl StatsReport {
    /// Total number of enemies spawned across every kind.
    #[must_use]
    pub fn total_spawned(&self) -> u32 {
        self.spawned.iter().sum()
    }

    /// Total number of enemies killed across every kind.
    #[must_use]
    pub fn total_killed(&self) -> u32 {
        self.killed.iter().sum()
    }
}
