//! Presentation Queue
//!
//! The simulation never talks to audio or graphics directly. It queues
//! fire-and-forget cues here; a host drains them each frame into whatever
//! renders them. Floating damage numbers are capped, recycling the oldest,
//! and a failing sink is logged and skipped so the frame always completes.

use bevy::math::Vec2;
use bevy::prelude::*;
use std::collections::VecDeque;

use super::constants::MAX_DAMAGE_NUMBERS;
use super::status_effects::StatusKind;

/// Color hint for a floating damage number.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DamageColor {
    Normal,
    Critical,
    Burn,
    Poison,
    Paralyze,
    Chain,
    Pulse,
    Reflect,
    PlayerHurt,
    Heal,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SoundCue {
    Hit,
    CriticalHit,
    EnemyDeath,
    PlayerHurt,
    Pickup,
    LevelUp,
    WaveComplete,
    BossSpawn,
    BossLaser,
    Explosion,
    Lightning,
    Quake,
    GameOver,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParticleKind {
    Status(StatusKind),
    Death,
    Explosion,
    Lightning,
    Quake,
    SeedPlanted,
    Knockback,
    LaserTelegraph,
    LaserBeam,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DamageNumber {
    pub value: f32,
    pub color: DamageColor,
    pub position: Vec2,
}

/// One cue for the rendering/audio host.
#[derive(Event, Clone, Copy, Debug, PartialEq)]
pub enum PresentationEvent {
    Sound(SoundCue),
    DamageNumber(DamageNumber),
    Particle { kind: ParticleKind, position: Vec2 },
}

/// Receiver of presentation cues. Errors are reported back but never stop
/// the simulation.
pub trait PresentationSink {
    fn present(&mut self, event: &PresentationEvent) -> Result<(), String>;
}

/// Cues produced since the last flush.
#[derive(Clone, Debug, Default)]
pub struct PresentationQueue {
    cues: Vec<PresentationEvent>,
    damage_numbers: VecDeque<DamageNumber>,
    /// Damage numbers dropped to honor the cap.
    pub recycled: u64,
    /// Sink failures swallowed so far.
    pub failures: u64,
}

impl PresentationQueue {
    pub fn play_sound(&mut self, cue: SoundCue) {
        self.cues.push(PresentationEvent::Sound(cue));
    }

    pub fn spawn_particle(&mut self, kind: ParticleKind, position: Vec2) {
        self.cues.push(PresentationEvent::Particle { kind, position });
    }

    pub fn show_number(&mut self, value: f32, color: DamageColor, position: Vec2) {
        if self.damage_numbers.len() >= MAX_DAMAGE_NUMBERS {
            self.damage_numbers.pop_front();
            self.recycled += 1;
        }
        self.damage_numbers.push_back(DamageNumber {
            value,
            color,
            position,
        });
    }

    pub fn damage_numbers(&self) -> impl Iterator<Item = &DamageNumber> {
        self.damage_numbers.iter()
    }

    pub fn len(&self) -> usize {
        self.cues.len() + self.damage_numbers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.cues.clear();
        self.damage_numbers.clear();
    }

    /// Take every pending cue (sounds and particles first, then numbers).
    pub fn drain(&mut self) -> Vec<PresentationEvent> {
        let mut out: Vec<PresentationEvent> = self.cues.drain(..).collect();
        out.extend(
            self.damage_numbers
                .drain(..)
                .map(PresentationEvent::DamageNumber),
        );
        out
    }

    /// Deliver every pending cue to `sink`. Returns how many were delivered.
    pub fn flush_to(&mut self, sink: &mut dyn PresentationSink) -> usize {
        let mut delivered = 0;
        for event in self.drain() {
            match sink.present(&event) {
                Ok(()) => delivered += 1,
                Err(e) => {
                    self.failures += 1;
                    warn!("Presentation sink failed on {:?}: {}", event, e);
                }
            }
        }
        delivered
    }
}
