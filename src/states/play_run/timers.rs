//! Timed Events
//!
//! Deferred actions keyed on game time: wave spawns, the next wave start,
//! and boss laser fire. Game time only advances while the run is unpaused,
//! so a pause holds every pending event in place.
//!
//! Every event records the run generation it was scheduled in.
//! `cancel_all` bumps the generation, so anything scheduled before a game
//! over or reset can never fire into the next run.

use bevy::math::Vec2;

use super::components::EnemyId;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TimedEventKind {
    /// One regular spawn for `wave`.
    SpawnEnemy { wave: u32 },
    /// Begin the next wave.
    StartWave,
    /// Fire the boss laser from the boss toward `target`.
    BossLaser { boss: EnemyId, target: Vec2 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimedEvent {
    pub at: f64,
    pub kind: TimedEventKind,
    generation: u64,
    sequence: u64,
}

#[derive(Clone, Debug, Default)]
pub struct TimedEvents {
    events: Vec<TimedEvent>,
    generation: u64,
    next_sequence: u64,
}

impl TimedEvents {
    pub fn schedule(&mut self, at: f64, kind: TimedEventKind) {
        self.events.push(TimedEvent {
            at,
            kind,
            generation: self.generation,
            sequence: self.next_sequence,
        });
        self.next_sequence += 1;
    }

    /// Remove and return every event due at `now`, in schedule order.
    pub fn pop_due(&mut self, now: f64) -> Vec<TimedEventKind> {
        let generation = self.generation;
        let mut due: Vec<TimedEvent> = Vec::new();
        self.events.retain(|event| {
            if event.generation != generation {
                return false;
            }
            if event.at <= now {
                due.push(*event);
                return false;
            }
            true
        });
        due.sort_by(|a, b| a.at.total_cmp(&b.at).then(a.sequence.cmp(&b.sequence)));
        due.into_iter().map(|event| event.kind).collect()
    }

    /// Drop every pending event and invalidate the current generation.
    pub fn cancel_all(&mut self) {
        self.events.clear();
        self.generation += 1;
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn pending(&self) -> impl Iterator<Item = &TimedEvent> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Earliest pending event matching `pred`.
    pub fn next_matching(&self, pred: impl Fn(&TimedEventKind) -> bool) -> Option<&TimedEvent> {
        self.events
            .iter()
            .filter(|event| pred(&event.kind))
            .min_by(|a, b| a.at.total_cmp(&b.at))
    }
}
