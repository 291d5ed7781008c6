#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Frame-stepped orchestration of the Path Defence systems.
//!
//! A [`Simulation`] owns the world and every pure system. Each call to
//! [`Simulation::step`] resolves one frame in a fixed order:
//!
//! 1. player input (placement while running, restart once the game is over);
//! 2. the frame tick and the spawn phase;
//! 3. enemy movement and leak accounting;
//! 4. every tower, in placement order, acquires a target against the
//!    enemies left by the towers before it and then attacks or cools down.
//!
//! Commands are applied one at a time, so later towers observe the kills of
//! earlier ones within the same frame. A frame that starts running runs to
//! completion: towers still act after a leak ends the game mid-frame.

mod hooks;

use path_defence_core::{Command, Event, GameStatus, StatsReport};
use path_defence_system_analytics::Analytics;
use path_defence_system_builder::{Builder, BuilderInput};
use path_defence_system_spawning::SpawnDirector;
use path_defence_system_tower_combat::TowerCombat;
use path_defence_system_tower_targeting::TowerTargeting;
use path_defence_world::{self as world, query, World};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::trace;

pub use hooks::{EffectHooks, NoHooks};

/// Single owner of the world and the systems that drive it.
#[derive(Debug)]
pub struct Simulation<R = ChaCha8Rng> {
    world: World,
    spawning: SpawnDirector<R>,
    targeting: TowerTargeting,
    combat: TowerCombat,
    builder: Builder,
    analytics: Analytics,
    scratch: Vec<Command>,
}

impl Simulation<ChaCha8Rng> {
    /// Creates a simulation on the default route with a seeded spawn director.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self::from_parts(World::new(), SpawnDirector::new_seeded(seed))
    }
}

impl<R: Rng> Simulation<R> {
    /// Creates a simulation from a prepared world and spawn director.
    #[must_use]
    pub fn from_parts(world: World, spawning: SpawnDirector<R>) -> Self {
        Self {
            world,
            spawning,
            targeting: TowerTargeting::new(),
            combat: TowerCombat::new(),
            builder: Builder::new(),
            analytics: Analytics::new(),
            scratch: Vec::new(),
        }
    }

    /// Provides read-only access to the world for queries.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Statistics gathered across every frame stepped so far.
    #[must_use]
    pub fn report(&self) -> &StatsReport {
        self.analytics.report()
    }

    /// Consumes the simulation, yielding the final statistics.
    #[must_use]
    pub fn into_report(self) -> StatsReport {
        self.analytics.into_report()
    }

    /// Resolves one frame, appending every world event to `out_events`.
    ///
    /// Once the game is over only a restart request in `input` has any
    /// effect; the rest of the frame is skipped until the world is reset.
    pub fn step<H>(&mut self, input: BuilderInput, hooks: &mut H, out_events: &mut Vec<Event>)
    where
        H: EffectHooks + ?Sized,
    {
        let first_event = out_events.len();
        self.handle_input(input, hooks, out_events);
        let status = query::status(&self.world);
        if status == GameStatus::GameOver {
            return;
        }

        let mut commands = std::mem::take(&mut self.scratch);

        self.apply(Command::Tick, hooks, out_events);

        self.spawning.handle(
            &out_events[first_event..],
            status,
            &query::spawn_pacing(&self.world),
            &mut commands,
        );
        self.apply_all(&mut commands, hooks, out_events);

        self.apply(Command::AdvanceEnemies, hooks, out_events);

        self.resolve_towers(status, &mut commands, hooks, out_events);
        self.scratch = commands;

        trace!(
            frame = query::frame(&self.world),
            enemies = query::enemy_view(&self.world).len(),
            towers = query::tower_count(&self.world),
            "frame resolved"
        );
    }

    /// Applies player input without advancing the frame.
    ///
    /// [`Simulation::step`] already does this at the start of every frame;
    /// calling it directly lets an adapter deliver several clicks within one
    /// frame.
    pub fn handle_input<H>(&mut self, input: BuilderInput, hooks: &mut H, out_events: &mut Vec<Event>)
    where
        H: EffectHooks + ?Sized,
    {
        let mut commands = std::mem::take(&mut self.scratch);
        self.builder
            .handle(query::status(&self.world), input, &mut commands);
        self.apply_all(&mut commands, hooks, out_events);
        self.scratch = commands;
    }

    fn resolve_towers<H>(
        &mut self,
        status: GameStatus,
        commands: &mut Vec<Command>,
        hooks: &mut H,
        out: &mut Vec<Event>,
    ) where
        H: EffectHooks + ?Sized,
    {
        for tower in query::tower_view(&self.world).into_vec() {
            let enemies = query::enemy_view(&self.world);
            let target = self.targeting.acquire(status, &tower, &enemies);
            self.combat.handle(status, &tower, target, commands);
            self.apply_all(commands, hooks, out);
        }
    }

    fn apply_all<H>(&mut self, commands: &mut Vec<Command>, hooks: &mut H, out: &mut Vec<Event>)
    where
        H: EffectHooks + ?Sized,
    {
        for command in commands.drain(..) {
            self.apply(command, hooks, out);
        }
    }

    fn apply<H>(&mut self, command: Command, hooks: &mut H, out: &mut Vec<Event>)
    where
        H: EffectHooks + ?Sized,
    {
        let first = out.len();
        world::apply(&mut self.world, command, out);

        let events = &out[first..];
        self.analytics.handle(events);
        hooks::dispatch(hooks, events);
    }
}
