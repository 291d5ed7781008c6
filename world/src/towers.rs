//! Authoritative tower state management utilities.

use path_defence_core::{
    CellCoord, EnemyId, TowerId, TowerKind, TowerSnapshot, WorldPoint, ATTACK_EFFECT_FRAMES,
};

/// Tower stored inside the world.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Tower {
    id: TowerId,
    kind: TowerKind,
    cell: CellCoord,
    position: WorldPoint,
    attack_timer: u32,
    effect_frames: u32,
    target: Option<EnemyId>,
}

impl Tower {
    fn new(id: TowerId, kind: TowerKind, cell: CellCoord) -> Self {
        Self {
            id,
            kind,
            cell,
            position: cell.center(),
            attack_timer: 0,
            effect_frames: 0,
            target: None,
        }
    }

    pub(crate) fn id(&self) -> TowerId {
        self.id
    }

    pub(crate) fn kind(&self) -> TowerKind {
        self.kind
    }

    pub(crate) fn position(&self) -> WorldPoint {
        self.position
    }

    pub(crate) fn is_ready(&self) -> bool {
        self.attack_timer == 0
    }

    /// Starts the cooldown after an attack on `target`.
    pub(crate) fn arm(&mut self, target: EnemyId) {
        self.target = Some(target);
        self.attack_timer = self.kind.cooldown_frames();
        self.effect_frames = ATTACK_EFFECT_FRAMES;
    }

    /// Spends a frame without attacking.
    ///
    /// The cooldown only runs down on frames where the tower does not fire,
    /// whatever it currently targets.
    pub(crate) fn idle(&mut self, target: Option<EnemyId>) {
        self.target = target;
        self.attack_timer = self.attack_timer.saturating_sub(1);
        self.effect_frames = self.effect_frames.saturating_sub(1);
    }

    pub(crate) fn snapshot(&self) -> TowerSnapshot {
        TowerSnapshot {
            id: self.id,
            kind: self.kind,
            cell: self.cell,
            position: self.position,
            attack_timer: self.attack_timer,
            attack_effect_active: self.effect_frames > 0,
            target: self.target,
        }
    }
}

/// Registry that stores towers in placement order and allocates identifiers.
#[derive(Debug)]
pub(crate) struct TowerRegistry {
    entries: Vec<Tower>,
    next_tower_id: TowerId,
}

impl TowerRegistry {
    /// Creates an empty tower registry with a reset identifier counter.
    pub(crate) fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_tower_id: TowerId::new(0),
        }
    }

    /// Constructs a tower on the cell and returns its identifier.
    pub(crate) fn insert(&mut self, kind: TowerKind, cell: CellCoord) -> TowerId {
        let id = self.next_tower_id;
        self.next_tower_id = TowerId::new(id.get().saturating_add(1));
        self.entries.push(Tower::new(id, kind, cell));
        id
    }

    pub(crate) fn get_mut(&mut self, id: TowerId) -> Option<&mut Tower> {
        self.entries.iter_mut().find(|tower| tower.id() == id)
    }

    pub(crate) fn occupied_cells(&self) -> impl Iterator<Item = CellCoord> + '_ {
        self.entries.iter().map(|tower| tower.cell)
    }

    pub(crate) fn tower_at(&self, cell: CellCoord) -> Option<&Tower> {
        self.entries.iter().find(|tower| tower.cell == cell)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Tower> {
        self.entries.iter()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Removes every tower. Identifiers keep counting so stale ids never alias.
    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}
