//! Enemy Arena
//!
//! Dense storage for live enemies. Enemies are visited by index during a
//! frame; the kill path only clears `active`, and `compact` removes dead
//! entries once the frame is over. Indices are stable for the whole frame.

use bevy::math::Vec2;
use smallvec::SmallVec;

use super::components::{Enemy, EnemyId};

/// Playable rectangle, origin at the bottom-left corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArenaBounds {
    pub width: f32,
    pub height: f32,
}

impl ArenaBounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn clamp(&self, point: Vec2) -> Vec2 {
        Vec2::new(point.x.clamp(0.0, self.width), point.y.clamp(0.0, self.height))
    }
}

#[derive(Clone, Debug, Default)]
pub struct EnemyArena {
    enemies: Vec<Enemy>,
}

impl EnemyArena {
    pub fn push(&mut self, enemy: Enemy) -> usize {
        self.enemies.push(enemy);
        self.enemies.len() - 1
    }

    pub fn len(&self) -> usize {
        self.enemies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.enemies.is_empty()
    }

    pub fn active_count(&self) -> usize {
        self.enemies.iter().filter(|e| e.active).count()
    }

    pub fn get(&self, index: usize) -> Option<&Enemy> {
        self.enemies.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Enemy> {
        self.enemies.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Enemy> {
        self.enemies.iter()
    }

    pub fn iter_active(&self) -> impl Iterator<Item = &Enemy> {
        self.enemies.iter().filter(|e| e.active)
    }

    pub fn as_mut_slice(&mut self) -> &mut [Enemy] {
        &mut self.enemies
    }

    pub fn index_of(&self, id: EnemyId) -> Option<usize> {
        self.enemies.iter().position(|e| e.id == id)
    }

    /// Nearest active enemy within `radius` of `point`, ignoring `exclude`.
    pub fn nearest_active(
        &self,
        point: Vec2,
        radius: f32,
        exclude: Option<usize>,
    ) -> Option<usize> {
        nearest_in(&self.enemies, point, radius, exclude)
    }

    /// Indices of active enemies within `radius` of `point`.
    pub fn active_within(&self, point: Vec2, radius: f32) -> SmallVec<[usize; 8]> {
        within_in(&self.enemies, point, radius)
    }

    /// Drop inactive enemies. Returns how many were removed.
    pub fn compact(&mut self) -> usize {
        let before = self.enemies.len();
        self.enemies.retain(|e| e.active);
        before - self.enemies.len()
    }

    pub fn clear(&mut self) {
        self.enemies.clear();
    }
}

/// Slice form of `nearest_active`, for callers already holding the slice.
pub fn nearest_in(
    enemies: &[Enemy],
    point: Vec2,
    radius: f32,
    exclude: Option<usize>,
) -> Option<usize> {
    enemies
        .iter()
        .enumerate()
        .filter(|(i, e)| e.active && Some(*i) != exclude)
        .map(|(i, e)| (i, e.position.distance(point)))
        .filter(|(_, d)| *d <= radius)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(i, _)| i)
}

/// Slice form of `active_within`.
pub fn within_in(enemies: &[Enemy], point: Vec2, radius: f32) -> SmallVec<[usize; 8]> {
    enemies
        .iter()
        .enumerate()
        .filter(|(_, e)| e.active && e.position.distance(point) <= radius)
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::states::play_run::components::EnemyKind;
    use crate::states::play_run::spawner::build_enemy;

    fn arena_with(positions: &[Vec2]) -> EnemyArena {
        let mut arena = EnemyArena::default();
        for (i, pos) in positions.iter().enumerate() {
            arena.push(build_enemy(EnemyId(i as u32), EnemyKind::Basic, 1, *pos, 0.0));
        }
        arena
    }

    #[test]
    fn test_compaction_removes_only_inactive() {
        let mut arena = arena_with(&[Vec2::ZERO, Vec2::X, Vec2::Y]);
        arena.get_mut(1).unwrap().active = false;
        assert_eq!(arena.compact(), 1);
        assert_eq!(arena.len(), 2);
        assert_eq!(arena.index_of(EnemyId(2)), Some(1));
    }

    #[test]
    fn test_nearest_skips_excluded_and_inactive() {
        let mut arena = arena_with(&[Vec2::ZERO, Vec2::new(10.0, 0.0), Vec2::new(20.0, 0.0)]);
        arena.get_mut(1).unwrap().active = false;
        assert_eq!(arena.nearest_active(Vec2::ZERO, 100.0, Some(0)), Some(2));
        assert_eq!(arena.nearest_active(Vec2::ZERO, 15.0, Some(0)), None);
    }

    #[test]
    fn test_bounds_clamp() {
        let bounds = ArenaBounds::new(100.0, 50.0);
        assert_eq!(bounds.clamp(Vec2::new(-5.0, 80.0)), Vec2::new(0.0, 50.0));
    }
}
