//! Narrow signals the simulation raises for audio and visual effects.

use path_defence_core::{EnemyId, EnemyKind, Event, WorldPoint};

/// Receiver of presentation signals raised while a frame resolves.
///
/// Every method defaults to doing nothing so implementors only override the
/// signals they care about.
pub trait EffectHooks {
    /// An enemy took lethal damage at `position`.
    fn on_enemy_killed(&mut self, _enemy: EnemyId, _kind: EnemyKind, _position: WorldPoint) {}

    /// An enemy reached the end of the path.
    fn on_enemy_leaked(&mut self, _enemy: EnemyId, _kind: EnemyKind) {}

    /// A tower attacked; the attack line runs from `from` to `to`.
    fn on_tower_fired(&mut self, _from: WorldPoint, _to: WorldPoint) {}

    /// Hit points ran out on the provided frame.
    fn on_game_over(&mut self, _frame: u64) {}
}

/// Hooks that ignore every signal.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoHooks;

impl EffectHooks for NoHooks {}

pub(crate) fn dispatch<H>(hooks: &mut H, events: &[Event])
where
    H: EffectHooks + ?Sized,
{
    for event in events {
        match event {
            Event::EnemyKilled {
                enemy,
                kind,
                position,
                ..
            } => hooks.on_enemy_killed(*enemy, *kind, *position),
            Event::EnemyLeaked { enemy, kind } => hooks.on_enemy_leaked(*enemy, *kind),
            Event::TowerFired { from, to, .. } => hooks.on_tower_fired(*from, *to),
            Event::GameOver { frame } => hooks.on_game_over(*frame),
            _ => {}
        }
    }
}
