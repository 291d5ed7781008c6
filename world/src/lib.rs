#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Path Defence.
//!
//! The world owns the path, the live enemy and tower collections and the
//! [`GameState`] record. It mutates them only through [`apply`], which
//! executes one [`Command`] and reports what happened as [`Event`] values.

mod enemies;
pub mod grid;
mod path;
mod state;
mod towers;

use path_defence_core::{
    Command, EnemyId, EnemyKind, Event, PlacementError, TowerId, TowerKind, WorldPoint,
    WELCOME_BANNER,
};
use tracing::{debug, info, trace};

use enemies::Enemy;
use towers::TowerRegistry;

pub use path::{Path, PathError};
pub use state::GameState;

/// Represents the authoritative Path Defence world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    path: Path,
    state: GameState,
    enemies: Vec<Enemy>,
    towers: TowerRegistry,
    next_enemy_id: EnemyId,
    frame: u64,
}

impl World {
    /// Creates a new world on the default route with the starting state.
    #[must_use]
    pub fn new() -> Self {
        Self::from_parts(Path::default_route(), GameState::new())
    }

    /// Creates a world from an explicit path and starting state.
    ///
    /// A reset always restores [`GameState::new`], whatever state the world
    /// was created with.
    #[must_use]
    pub fn from_parts(path: Path, state: GameState) -> Self {
        Self {
            banner: WELCOME_BANNER,
            path,
            state,
            enemies: Vec::new(),
            towers: TowerRegistry::new(),
            next_enemy_id: EnemyId::new(0),
            frame: 0,
        }
    }

    fn allocate_enemy_id(&mut self) -> EnemyId {
        let id = self.next_enemy_id;
        self.next_enemy_id = EnemyId::new(id.get().saturating_add(1));
        id
    }

    fn enemy_index(&self, enemy: EnemyId) -> Option<usize> {
        self.enemies
            .iter()
            .position(|candidate| candidate.id() == enemy && !candidate.is_dead())
    }

    fn place_tower(&mut self, at: WorldPoint, out_events: &mut Vec<Event>) {
        let kind = TowerKind::Basic;
        let cell = grid::to_grid_cell(at.x, at.y);

        let verdict = grid::validate_placement(cell, &self.path, self.towers.occupied_cells())
            .and_then(|()| {
                if self.state.can_afford(kind.cost()) {
                    Ok(())
                } else {
                    Err(PlacementError::InsufficientResources)
                }
            });

        if let Err(reason) = verdict {
            debug!(?cell, ?reason, "tower placement rejected");
            out_events.push(Event::TowerPlacementRejected { cell, reason });
            return;
        }

        let tower = self.towers.insert(kind, cell);
        self.state.charge(kind.cost());
        info!(
            tower = tower.get(),
            column = cell.column(),
            row = cell.row(),
            resources = self.state.resources(),
            "tower placed"
        );
        out_events.push(Event::TowerPlaced {
            tower,
            cell,
            cost: kind.cost(),
        });
        out_events.push(Event::ResourcesChanged {
            resources: self.state.resources(),
        });
    }

    fn spawn_enemy(&mut self, kind: EnemyKind, out_events: &mut Vec<Event>) {
        let id = self.allocate_enemy_id();
        let enemy = Enemy::spawn(id, kind, &self.path);
        let position = enemy.position();
        self.enemies.push(enemy);
        trace!(enemy = id.get(), ?kind, "enemy spawned");
        out_events.push(Event::EnemySpawned {
            enemy: id,
            kind,
            position,
        });

        if let Some(max_spawn_delay) = self.state.pacing_mut().record_spawn() {
            debug!(max_spawn_delay, "spawn cadence accelerated");
            out_events.push(Event::SpawnPacingAccelerated { max_spawn_delay });
        }
    }

    fn advance_enemies(&mut self, out_events: &mut Vec<Event>) {
        let mut index = 0;
        while index < self.enemies.len() {
            self.enemies[index].advance(&self.path);
            if !self.enemies[index].reached_end(&self.path) {
                index += 1;
                continue;
            }

            let enemy = self.enemies.remove(index);
            out_events.push(Event::EnemyLeaked {
                enemy: enemy.id(),
                kind: enemy.kind(),
            });

            let ended = self.state.lose_hit_point();
            out_events.push(Event::HitPointsChanged {
                hit_points: self.state.hit_points(),
            });
            if ended {
                info!(frame = self.frame, "hit points exhausted, game over");
                out_events.push(Event::GameOver { frame: self.frame });
            }
        }
    }

    fn fire_tower(&mut self, tower: TowerId, target: EnemyId, out_events: &mut Vec<Event>) {
        let target_index = self.enemy_index(target);
        let Some(tower_state) = self.towers.get_mut(tower) else {
            return;
        };

        let Some(index) = target_index.filter(|_| tower_state.is_ready()) else {
            tower_state.idle(target_index.map(|_| target));
            return;
        };

        let damage = tower_state.kind().damage();
        let from = tower_state.position();
        tower_state.arm(target);

        let enemy = &mut self.enemies[index];
        let to = enemy.position();
        let killed = enemy.take_damage(damage);
        out_events.push(Event::TowerFired {
            tower,
            target,
            from,
            to,
            damage,
        });

        if !killed {
            return;
        }

        let enemy = self.enemies.remove(index);
        let reward = enemy.reward();
        self.state.credit(reward);
        trace!(enemy = target.get(), tower = tower.get(), reward, "enemy killed");
        out_events.push(Event::EnemyKilled {
            enemy: target,
            kind: enemy.kind(),
            tower,
            reward,
            position: to,
        });
        out_events.push(Event::ResourcesChanged {
            resources: self.state.resources(),
        });
    }

    fn cool_tower(&mut self, tower: TowerId, target: Option<EnemyId>) {
        let target = target.filter(|enemy| self.enemy_index(*enemy).is_some());
        if let Some(tower_state) = self.towers.get_mut(tower) {
            tower_state.idle(target);
        }
    }

    fn reset(&mut self, out_events: &mut Vec<Event>) {
        self.state = GameState::new();
        self.enemies.clear();
        self.towers.clear();
        info!(frame = self.frame, "game reset");
        out_events.push(Event::GameReset);
        out_events.push(Event::ResourcesChanged {
            resources: self.state.resources(),
        });
        out_events.push(Event::HitPointsChanged {
            hit_points: self.state.hit_points(),
        });
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Once the game is over the frame clock, spawning, movement and placement
/// are frozen until [`Command::ResetGame`]; placement requests are answered
/// with a rejection event so the presentation layer can still signal them.
/// Tower commands still resolve so the towers can finish the frame in which
/// the final leak happened. `ResetGame` is ignored while the game is running.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    if world.state.is_game_over() {
        match command {
            Command::ResetGame => world.reset(out_events),
            Command::FireTower { tower, target } => world.fire_tower(tower, target, out_events),
            Command::CoolTower { tower, target } => world.cool_tower(tower, target),
            Command::PlaceTower { at } => {
                let cell = grid::to_grid_cell(at.x, at.y);
                out_events.push(Event::TowerPlacementRejected {
                    cell,
                    reason: PlacementError::GameOver,
                });
            }
            _ => {}
        }
        return;
    }

    match command {
        Command::Tick => {
            world.frame = world.frame.saturating_add(1);
            out_events.push(Event::FrameAdvanced { frame: world.frame });
        }
        Command::PlaceTower { at } => world.place_tower(at, out_events),
        Command::SpawnEnemy { kind } => world.spawn_enemy(kind, out_events),
        Command::AdvanceEnemies => world.advance_enemies(out_events),
        Command::FireTower { tower, target } => world.fire_tower(tower, target, out_events),
        Command::CoolTower { tower, target } => world.cool_tower(tower, target),
        Command::ResetGame => {}
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use path_defence_core::{
        CellCoord, EnemyView, GameStatus, SpawnPacing, TowerSnapshot, TowerView, WorldPoint,
    };

    use super::{grid, GameState, Path, World};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Provides read-only access to the route enemies walk.
    #[must_use]
    pub fn path(world: &World) -> &Path {
        &world.path
    }

    /// Provides read-only access to the current game state.
    #[must_use]
    pub fn game_state(world: &World) -> &GameState {
        &world.state
    }

    /// Reports whether the world still accepts gameplay commands.
    #[must_use]
    pub fn status(world: &World) -> GameStatus {
        world.state.status()
    }

    /// Captures the spawn cadence, including the debug counters.
    #[must_use]
    pub fn spawn_pacing(world: &World) -> SpawnPacing {
        *world.state.pacing()
    }

    /// Index of the current frame.
    #[must_use]
    pub fn frame(world: &World) -> u64 {
        world.frame
    }

    /// Captures a read-only view of the live enemies in collection order.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        EnemyView::from_snapshots(
            world
                .enemies
                .iter()
                .filter(|enemy| !enemy.is_dead())
                .map(|enemy| enemy.snapshot())
                .collect(),
        )
    }

    /// Captures a read-only view of the towers in placement order.
    #[must_use]
    pub fn tower_view(world: &World) -> TowerView {
        TowerView::from_snapshots(world.towers.iter().map(|tower| tower.snapshot()).collect())
    }

    /// Number of towers standing in the world.
    #[must_use]
    pub fn tower_count(world: &World) -> usize {
        world.towers.len()
    }

    /// Returns the tower occupying the provided cell, if any.
    #[must_use]
    pub fn tower_at(world: &World, cell: CellCoord) -> Option<TowerSnapshot> {
        world.towers.tower_at(cell).map(|tower| tower.snapshot())
    }

    /// Lines from towers whose attack effect is active to their live targets.
    #[must_use]
    pub fn attack_lines(world: &World) -> Vec<(WorldPoint, WorldPoint)> {
        world
            .towers
            .iter()
            .map(|tower| tower.snapshot())
            .filter(|snapshot| snapshot.attack_effect_active)
            .filter_map(|snapshot| {
                let target = snapshot.target?;
                let index = world.enemy_index(target)?;
                Some((snapshot.position, world.enemies[index].position()))
            })
            .collect()
    }

    /// Describes the cell under a cursor and whether a tower could go there.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct PlacementPreview {
        /// Cell under the cursor.
        pub cell: CellCoord,
        /// Whether a placement on the cell would currently succeed.
        pub placeable: bool,
    }

    /// Previews a placement at the provided point.
    ///
    /// Returns `None` when the point lies over the UI strip or outside the
    /// canvas rows, where no preview is presented.
    #[must_use]
    pub fn placement_preview(world: &World, at: WorldPoint) -> Option<PlacementPreview> {
        let cell = grid::to_grid_cell(at.x, at.y);
        if !(0..path_defence_core::GRID_ROWS).contains(&cell.row()) {
            return None;
        }

        let kind = path_defence_core::TowerKind::Basic;
        let placeable = !world.state.is_game_over()
            && world.state.can_afford(kind.cost())
            && grid::is_valid_placement(cell, &world.path, world.towers.occupied_cells());
        Some(PlacementPreview { cell, placeable })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use path_defence_core::{CellCoord, GameStatus, ATTACK_EFFECT_FRAMES};

    fn short_path() -> Path {
        Path::new(vec![WorldPoint::new(0.0, 500.0), WorldPoint::new(4.0, 500.0)])
            .expect("valid path")
    }

    fn run(world: &mut World, command: Command) -> Vec<Event> {
        let mut events = Vec::new();
        apply(world, command, &mut events);
        events
    }

    #[test]
    fn placement_charges_exactly_the_tower_cost() {
        let mut world = World::new();
        let events = run(
            &mut world,
            Command::PlaceTower {
                at: WorldPoint::new(705.0, 150.0),
            },
        );

        assert_eq!(
            events,
            vec![
                Event::TowerPlaced {
                    tower: TowerId::new(0),
                    cell: CellCoord::new(17, 3),
                    cost: 100,
                },
                Event::ResourcesChanged { resources: 400 },
            ]
        );
        assert_eq!(query::game_state(&world).resources(), 400);
        assert!(query::tower_at(&world, CellCoord::new(17, 3)).is_some());
    }

    #[test]
    fn rejected_placements_leave_resources_untouched() {
        let mut world = World::new();
        let rejections = [
            (WorldPoint::new(60.0, 60.0), PlacementError::OnPath),
            (WorldPoint::new(100.0, 620.0), PlacementError::OutOfBounds),
            (WorldPoint::new(-5.0, 100.0), PlacementError::OutOfBounds),
        ];

        for (at, expected) in rejections {
            let events = run(&mut world, Command::PlaceTower { at });
            match events.as_slice() {
                [Event::TowerPlacementRejected { reason, .. }] => assert_eq!(*reason, expected),
                other => panic!("unexpected events {other:?}"),
            }
            assert_eq!(query::game_state(&world).resources(), 500);
        }

        let _ = run(
            &mut world,
            Command::PlaceTower {
                at: WorldPoint::new(220.0, 100.0),
            },
        );
        let events = run(
            &mut world,
            Command::PlaceTower {
                at: WorldPoint::new(210.0, 90.0),
            },
        );
        assert!(matches!(
            events.as_slice(),
            [Event::TowerPlacementRejected {
                reason: PlacementError::Occupied,
                ..
            }]
        ));
        assert_eq!(query::game_state(&world).resources(), 400);
    }

    #[test]
    fn placement_requires_funds() {
        let mut world = World::from_parts(Path::default_route(), GameState::new().with_resources(99));
        let events = run(
            &mut world,
            Command::PlaceTower {
                at: WorldPoint::new(220.0, 100.0),
            },
        );
        assert!(matches!(
            events.as_slice(),
            [Event::TowerPlacementRejected {
                reason: PlacementError::InsufficientResources,
                ..
            }]
        ));
        assert_eq!(query::tower_count(&world), 0);
        assert_eq!(query::game_state(&world).resources(), 99);
    }

    #[test]
    fn spawn_records_pacing_and_rotation() {
        let mut world = World::new();
        for _ in 0..10 {
            let kind = query::spawn_pacing(&world).current_kind();
            let _ = run(&mut world, Command::SpawnEnemy { kind });
        }

        let kinds: Vec<EnemyKind> = query::enemy_view(&world).iter().map(|e| e.kind).collect();
        assert_eq!(&kinds[..5], &[EnemyKind::Square; 5]);
        assert_eq!(&kinds[5..], &[EnemyKind::Triangle; 5]);

        let pacing = query::spawn_pacing(&world);
        assert_eq!(pacing.enemies_spawned(), 10);
        assert_eq!(pacing.max_spawn_delay(), 171);
    }

    #[test]
    fn leaks_cost_a_hit_point_and_never_credit() {
        let mut world = World::from_parts(short_path(), GameState::new());
        let _ = run(
            &mut world,
            Command::SpawnEnemy {
                kind: EnemyKind::Square,
            },
        );

        let first = run(&mut world, Command::AdvanceEnemies);
        assert!(first.is_empty(), "enemy still walking: {first:?}");

        let second = run(&mut world, Command::AdvanceEnemies);
        assert_eq!(
            second,
            vec![
                Event::EnemyLeaked {
                    enemy: EnemyId::new(0),
                    kind: EnemyKind::Square,
                },
                Event::HitPointsChanged { hit_points: 19 },
            ]
        );
        assert!(query::enemy_view(&world).is_empty());
        assert_eq!(query::game_state(&world).resources(), 500);
    }

    #[test]
    fn final_leak_ends_the_game_and_freezes_commands() {
        let mut world = World::from_parts(short_path(), GameState::new().with_hit_points(1));
        let _ = run(
            &mut world,
            Command::SpawnEnemy {
                kind: EnemyKind::Triangle,
            },
        );
        let _ = run(&mut world, Command::Tick);
        let mut events = Vec::new();
        for _ in 0..2 {
            apply(&mut world, Command::AdvanceEnemies, &mut events);
        }
        assert!(events.contains(&Event::GameOver { frame: 1 }));
        assert_eq!(query::status(&world), GameStatus::GameOver);

        assert!(run(&mut world, Command::Tick).is_empty());
        assert!(run(
            &mut world,
            Command::SpawnEnemy {
                kind: EnemyKind::Square
            }
        )
        .is_empty());
        assert!(query::enemy_view(&world).is_empty());

        let rejected = run(
            &mut world,
            Command::PlaceTower {
                at: WorldPoint::new(220.0, 100.0),
            },
        );
        assert!(matches!(
            rejected.as_slice(),
            [Event::TowerPlacementRejected {
                reason: PlacementError::GameOver,
                ..
            }]
        ));
        assert_eq!(query::tower_count(&world), 0);
        assert_eq!(query::frame(&world), 1);
    }

    #[test]
    fn towers_finish_the_frame_of_the_final_leak() {
        let mut world = World::from_parts(short_path(), GameState::new().with_hit_points(1));
        let _ = run(
            &mut world,
            Command::PlaceTower {
                at: WorldPoint::new(20.0, 440.0),
            },
        );
        let square = Command::SpawnEnemy {
            kind: EnemyKind::Square,
        };
        let _ = run(&mut world, square.clone());
        let _ = run(&mut world, Command::AdvanceEnemies);
        let _ = run(&mut world, square);

        let leak = run(&mut world, Command::AdvanceEnemies);
        assert!(leak.iter().any(|event| matches!(event, Event::GameOver { .. })));
        let survivor = EnemyId::new(1);
        assert_eq!(
            query::enemy_view(&world).iter().map(|e| e.id).collect::<Vec<_>>(),
            vec![survivor]
        );

        let fired = run(
            &mut world,
            Command::FireTower {
                tower: TowerId::new(0),
                target: survivor,
            },
        );
        assert!(matches!(
            fired.as_slice(),
            [Event::TowerFired { damage: 20, .. }]
        ));
        let tower = query::tower_at(&world, CellCoord::new(0, 11)).expect("tower");
        assert!(!tower.is_ready());
        assert_eq!(query::status(&world), GameStatus::GameOver);
    }

    #[test]
    fn reset_restores_defaults_only_after_game_over() {
        let mut world = World::from_parts(Path::default_route(), GameState::new().with_hit_points(1));
        let _ = run(
            &mut world,
            Command::PlaceTower {
                at: WorldPoint::new(220.0, 100.0),
            },
        );
        assert!(run(&mut world, Command::ResetGame).is_empty(), "reset ignored while running");
        assert_eq!(query::tower_count(&world), 1);

        let _ = run(
            &mut world,
            Command::SpawnEnemy {
                kind: EnemyKind::Triangle,
            },
        );
        while query::status(&world) == GameStatus::Running {
            let _ = run(&mut world, Command::AdvanceEnemies);
        }

        let events = run(&mut world, Command::ResetGame);
        assert_eq!(events[0], Event::GameReset);
        let state = query::game_state(&world);
        assert_eq!(state.resources(), 500);
        assert_eq!(state.hit_points(), 20);
        assert!(!state.is_game_over());
        assert_eq!(query::spawn_pacing(&world).enemies_spawned(), 0);
        assert_eq!(query::tower_count(&world), 0);
        assert!(query::enemy_view(&world).is_empty());
    }

    #[test]
    fn fire_resolves_stale_targets_as_no_target() {
        let mut world = World::new();
        let _ = run(
            &mut world,
            Command::PlaceTower {
                at: WorldPoint::new(100.0, 100.0),
            },
        );
        let events = run(
            &mut world,
            Command::FireTower {
                tower: TowerId::new(0),
                target: EnemyId::new(42),
            },
        );
        assert!(events.is_empty());
        let tower = query::tower_at(&world, CellCoord::new(2, 2)).expect("tower");
        assert!(tower.is_ready());
        assert_eq!(tower.target, None);
    }

    #[test]
    fn lethal_hit_credits_reward_once() {
        let mut world = World::new();
        let _ = run(
            &mut world,
            Command::PlaceTower {
                at: WorldPoint::new(100.0, 100.0),
            },
        );
        let _ = run(
            &mut world,
            Command::PlaceTower {
                at: WorldPoint::new(140.0, 100.0),
            },
        );
        let _ = run(
            &mut world,
            Command::SpawnEnemy {
                kind: EnemyKind::Triangle,
            },
        );
        let target = EnemyId::new(0);
        let _ = world.enemies[0].take_damage(55);

        let first = run(
            &mut world,
            Command::FireTower {
                tower: TowerId::new(0),
                target,
            },
        );
        assert!(first.iter().any(|event| matches!(
            event,
            Event::EnemyKilled { reward: 10, .. }
        )));
        assert_eq!(query::game_state(&world).resources(), 310);

        let second = run(
            &mut world,
            Command::FireTower {
                tower: TowerId::new(1),
                target,
            },
        );
        assert!(second.is_empty(), "second tower must find nothing to hit");
        assert_eq!(query::game_state(&world).resources(), 310);
        assert!(query::tower_at(&world, CellCoord::new(3, 2))
            .expect("second tower")
            .is_ready());
    }

    #[test]
    fn attack_line_lasts_for_the_effect_frames() {
        let mut world = World::new();
        let _ = run(
            &mut world,
            Command::PlaceTower {
                at: WorldPoint::new(100.0, 100.0),
            },
        );
        let _ = run(
            &mut world,
            Command::SpawnEnemy {
                kind: EnemyKind::Circle,
            },
        );
        let tower = TowerId::new(0);
        let target = EnemyId::new(0);
        let from = CellCoord::new(2, 2).center();
        let to = query::enemy_view(&world).iter().next().expect("enemy").position;

        let fired = run(&mut world, Command::FireTower { tower, target });
        assert!(matches!(fired.as_slice(), [Event::TowerFired { .. }]));

        let mut lit_frames = 0;
        while !query::attack_lines(&world).is_empty() {
            assert_eq!(query::attack_lines(&world), vec![(from, to)]);
            lit_frames += 1;
            assert!(lit_frames <= ATTACK_EFFECT_FRAMES, "attack line never faded");
            let _ = run(
                &mut world,
                Command::CoolTower {
                    tower,
                    target: Some(target),
                },
            );
        }
        assert_eq!(lit_frames, ATTACK_EFFECT_FRAMES);

        let wounded = query::enemy_view(&world).into_vec()[0];
        assert!((wounded.health_ratio() - 130.0 / 150.0).abs() < f32::EPSILON);
    }

    #[test]
    fn attack_line_needs_a_live_target() {
        let mut world = World::new();
        let _ = run(
            &mut world,
            Command::PlaceTower {
                at: WorldPoint::new(100.0, 100.0),
            },
        );
        let _ = run(
            &mut world,
            Command::SpawnEnemy {
                kind: EnemyKind::Triangle,
            },
        );
        let _ = world.enemies[0].take_damage(70);

        let events = run(
            &mut world,
            Command::FireTower {
                tower: TowerId::new(0),
                target: EnemyId::new(0),
            },
        );
        assert!(events
            .iter()
            .any(|event| matches!(event, Event::EnemyKilled { .. })));

        let tower = query::tower_at(&world, CellCoord::new(2, 2)).expect("tower");
        assert!(tower.attack_effect_active);
        assert!(query::attack_lines(&world).is_empty());
    }

    #[test]
    fn overkilled_enemy_reports_an_empty_health_bar() {
        let mut world = World::new();
        let _ = run(
            &mut world,
            Command::SpawnEnemy {
                kind: EnemyKind::Square,
            },
        );
        let _ = world.enemies[0].take_damage(30);
        assert!((query::enemy_view(&world).into_vec()[0].health_ratio() - 0.7).abs() < 1e-6);

        let killed = world.enemies[0].take_damage(90);
        assert!(killed);
        let snapshot = world.enemies[0].snapshot();
        assert!(snapshot.health < 0);
        assert_eq!(snapshot.health_ratio(), 0.0);
    }

    #[test]
    fn preview_mirrors_placement_rules() {
        let world = World::new();
        let valid = query::placement_preview(&world, WorldPoint::new(220.0, 100.0))
            .expect("preview inside play area");
        assert!(valid.placeable);
        let on_path = query::placement_preview(&world, WorldPoint::new(60.0, 60.0))
            .expect("preview inside play area");
        assert!(!on_path.placeable);
        assert_eq!(query::placement_preview(&world, WorldPoint::new(100.0, 630.0)), None);
    }
}
