//! Status Effects
//!
//! Ten independent timed conditions carried by every enemy, plus the
//! per-frame tick that counts them down and applies damage-over-time.
//!
//! Conditions never stack duration: re-applying an active condition
//! overwrites its remaining duration. Poison keeps its stack counter across
//! re-applications; the counter only grows on a tick and resets to zero when
//! the poison expires.

use smallvec::SmallVec;

use super::components::Enemy;
use super::constants::*;

/// The ten status conditions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StatusKind {
    Burn,
    Freeze,
    Paralyze,
    Poison,
    Sleep,
    Charm,
    Confusion,
    Fear,
    Blind,
    Slow,
}

impl StatusKind {
    pub const ALL: [StatusKind; 10] = [
        StatusKind::Burn,
        StatusKind::Freeze,
        StatusKind::Paralyze,
        StatusKind::Poison,
        StatusKind::Sleep,
        StatusKind::Charm,
        StatusKind::Confusion,
        StatusKind::Fear,
        StatusKind::Blind,
        StatusKind::Slow,
    ];

    pub fn name(self) -> &'static str {
        match self {
            StatusKind::Burn => "Burn",
            StatusKind::Freeze => "Freeze",
            StatusKind::Paralyze => "Paralyze",
            StatusKind::Poison => "Poison",
            StatusKind::Sleep => "Sleep",
            StatusKind::Charm => "Charm",
            StatusKind::Confusion => "Confusion",
            StatusKind::Fear => "Fear",
            StatusKind::Blind => "Blind",
            StatusKind::Slow => "Slow",
        }
    }
}

/// Timing state shared by every condition.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TimedCondition {
    pub active: bool,
    /// Milliseconds remaining.
    pub duration: f64,
    /// Game time of the last damage tick (tick-based conditions only).
    pub last_tick: f64,
    /// Milliseconds between ticks; zero for conditions that never tick.
    pub tick_rate: f64,
    /// Game time of the latest (re)application. The countdown skips that frame.
    pub applied_at: f64,
}

/// Slack for comparing accumulated frame times against tick boundaries.
const TICK_EPSILON_MS: f64 = 1e-6;

impl TimedCondition {
    /// Activate or refresh. A fresh activation starts the tick clock; a
    /// refresh only overwrites the remaining duration.
    fn trigger(&mut self, duration: f64, tick_rate: f64, now: f64) {
        if !self.active {
            self.last_tick = now;
        }
        self.active = true;
        self.duration = duration;
        self.tick_rate = tick_rate;
        self.applied_at = now;
    }

    fn tick_due(&self, now: f64) -> bool {
        self.active
            && self.tick_rate > 0.0
            && now - self.last_tick >= self.tick_rate - TICK_EPSILON_MS
    }

    /// Consume one due tick. The tick clock advances by whole periods so
    /// ticks stay on their schedule regardless of frame length.
    fn advance_tick(&mut self) {
        self.last_tick += self.tick_rate;
    }

    /// Count down. Returns true if the condition expired this call.
    fn count_down(&mut self, now: f64, delta: f64) -> bool {
        if !self.active || self.applied_at == now {
            return false;
        }
        self.duration -= delta;
        if self.duration <= TICK_EPSILON_MS {
            self.active = false;
            self.duration = 0.0;
            return true;
        }
        false
    }
}

/// All ten conditions for one enemy.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StatusEffects {
    pub burn: TimedCondition,
    pub burn_damage: f32,
    pub freeze: TimedCondition,
    pub paralyze: TimedCondition,
    /// Damage per paralysis tick (0 unless the static field upgrade applies).
    pub paralyze_damage: f32,
    pub poison: TimedCondition,
    /// Damage of the first poison tick; each later tick doubles it.
    pub poison_damage: f32,
    pub poison_stacks: u32,
    pub sleep: TimedCondition,
    pub charm: TimedCondition,
    pub confusion: TimedCondition,
    pub fear: TimedCondition,
    pub blind: TimedCondition,
    pub slow: TimedCondition,
    pub slow_amount: f32,
}

impl StatusEffects {
    pub fn apply_burn(&mut self, damage: f32, duration: f64, now: f64) {
        self.burn.trigger(duration, BURN_TICK_MS, now);
        self.burn_damage = damage;
    }

    pub fn apply_freeze(&mut self, duration: f64, now: f64) {
        self.freeze.trigger(duration, 0.0, now);
    }

    pub fn apply_paralyze(&mut self, duration: f64, tick_damage: f32, now: f64) {
        let tick_rate = if tick_damage > 0.0 { PARALYZE_TICK_MS } else { 0.0 };
        self.paralyze.trigger(duration, tick_rate, now);
        self.paralyze_damage = tick_damage;
    }

    pub fn apply_poison(&mut self, base_damage: f32, now: f64) {
        self.poison.trigger(POISON_DURATION_MS, POISON_TICK_MS, now);
        self.poison_damage = base_damage;
    }

    pub fn apply_sleep(&mut self, duration: f64, now: f64) {
        self.sleep.trigger(duration, 0.0, now);
    }

    pub fn apply_charm(&mut self, duration: f64, now: f64) {
        self.charm.trigger(duration, 0.0, now);
    }

    pub fn apply_confusion(&mut self, duration: f64, now: f64) {
        self.confusion.trigger(duration, CONFUSION_TICK_MS, now);
    }

    pub fn apply_fear(&mut self, duration: f64, now: f64) {
        self.fear.trigger(duration, 0.0, now);
    }

    pub fn apply_blind(&mut self, duration: f64, now: f64) {
        self.blind.trigger(duration, 0.0, now);
    }

    pub fn apply_slow(&mut self, amount: f32, duration: f64, now: f64) {
        self.slow.trigger(duration, 0.0, now);
        self.slow_amount = amount.clamp(0.0, SLOW_MAX_AMOUNT);
    }

    pub fn condition(&self, kind: StatusKind) -> &TimedCondition {
        match kind {
            StatusKind::Burn => &self.burn,
            StatusKind::Freeze => &self.freeze,
            StatusKind::Paralyze => &self.paralyze,
            StatusKind::Poison => &self.poison,
            StatusKind::Sleep => &self.sleep,
            StatusKind::Charm => &self.charm,
            StatusKind::Confusion => &self.confusion,
            StatusKind::Fear => &self.fear,
            StatusKind::Blind => &self.blind,
            StatusKind::Slow => &self.slow,
        }
    }

    fn condition_mut(&mut self, kind: StatusKind) -> &mut TimedCondition {
        match kind {
            StatusKind::Burn => &mut self.burn,
            StatusKind::Freeze => &mut self.freeze,
            StatusKind::Paralyze => &mut self.paralyze,
            StatusKind::Poison => &mut self.poison,
            StatusKind::Sleep => &mut self.sleep,
            StatusKind::Charm => &mut self.charm,
            StatusKind::Confusion => &mut self.confusion,
            StatusKind::Fear => &mut self.fear,
            StatusKind::Blind => &mut self.blind,
            StatusKind::Slow => &mut self.slow,
        }
    }

    pub fn is_active(&self, kind: StatusKind) -> bool {
        self.condition(kind).active
    }

    /// Frozen, paralyzed or asleep: no movement and no special attacks.
    pub fn is_movement_locked(&self) -> bool {
        self.freeze.active || self.paralyze.active || self.sleep.active
    }

    pub fn active_kinds(&self) -> SmallVec<[StatusKind; 4]> {
        StatusKind::ALL
            .into_iter()
            .filter(|kind| self.is_active(*kind))
            .collect()
    }
}

/// Upgrade-driven behaviour the tick needs to know about.
#[derive(Clone, Copy, Debug, Default)]
pub struct TickRules {
    /// Burn ticks request spread to nearby enemies.
    pub burn_spread: bool,
    /// Poison ticks request spread to nearby enemies.
    pub poison_spread: bool,
    /// Confusion ticks pulse damage into nearby enemies.
    pub confusion_pulse: bool,
}

/// Damage-over-time dealt during one tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StatusDamage {
    pub kind: StatusKind,
    pub amount: f32,
}

/// Spread of a damage-over-time condition to enemies around the ticking one.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SpreadRequest {
    Burn { damage: f32 },
    Poison { base_damage: f32 },
}

/// Everything a tick produced, for the caller to act on.
#[derive(Clone, Debug, Default)]
pub struct TickReport {
    pub damage: SmallVec<[StatusDamage; 4]>,
    pub spread: SmallVec<[SpreadRequest; 2]>,
    pub confusion_pulse: bool,
    pub expired: SmallVec<[StatusKind; 4]>,
    /// Health reached zero during this tick.
    pub died: bool,
}

impl TickReport {
    pub fn total_damage(&self) -> f32 {
        self.damage.iter().map(|d| d.amount).sum()
    }
}

/// Advance every condition on `enemy` by one frame.
///
/// Damage ticks fire before durations count down so a condition whose
/// final tick coincides with its expiry still deals that tick. A condition
/// applied at `now` is not counted down until the next frame. Speed is
/// recomputed from `original_speed` every call.
pub fn tick(enemy: &mut Enemy, now: f64, delta: f64, rules: TickRules) -> TickReport {
    let mut report = TickReport::default();
    if !enemy.active {
        return report;
    }

    let status = &mut enemy.status;

    if status.burn.tick_due(now) {
        status.burn.advance_tick();
        report.damage.push(StatusDamage {
            kind: StatusKind::Burn,
            amount: status.burn_damage,
        });
        if rules.burn_spread {
            report.spread.push(SpreadRequest::Burn {
                damage: status.burn_damage,
            });
        }
    }

    if status.poison.tick_due(now) {
        status.poison.advance_tick();
        let amount = status.poison_damage * 2f32.powi(status.poison_stacks as i32);
        status.poison_stacks += 1;
        report.damage.push(StatusDamage {
            kind: StatusKind::Poison,
            amount,
        });
        if rules.poison_spread {
            report.spread.push(SpreadRequest::Poison {
                base_damage: status.poison_damage,
            });
        }
    }

    if status.paralyze.tick_due(now) && status.paralyze_damage > 0.0 {
        status.paralyze.advance_tick();
        report.damage.push(StatusDamage {
            kind: StatusKind::Paralyze,
            amount: status.paralyze_damage,
        });
    }

    if status.confusion.tick_due(now) {
        status.confusion.advance_tick();
        report.confusion_pulse = rules.confusion_pulse;
    }

    for kind in StatusKind::ALL {
        if status.condition_mut(kind).count_down(now, delta) {
            report.expired.push(kind);
            if kind == StatusKind::Poison {
                status.poison_stacks = 0;
            }
        }
    }

    enemy.speed = if status.slow.active {
        enemy.original_speed * (1.0 - status.slow_amount)
    } else {
        enemy.original_speed
    };

    let total = report.total_damage();
    if total > 0.0 {
        enemy.health -= total;
    }
    report.died = enemy.health <= 0.0;
    report
}
