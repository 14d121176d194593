//! Combat Loop
//!
//! The per-frame orchestrator. Owns every piece of run state (player,
//! enemies, waves, timers, upgrades, RNG, session) and advances it in a
//! fixed order each unpaused frame:
//!
//! 1. game clock and frame counter
//! 2. player movement from the input vector
//! 3. due timed events (spawns, next wave, boss laser)
//! 4. attack timers, each strike resolved through the damage and elemental
//!    resolvers
//! 5. per enemy: status tick, death check, AI steering, movement, boss laser
//!    telegraph, bomber trigger
//! 6. wave completion check
//! 7. contact damage and XP pickup
//! 8. game over on player death
//! 9. compaction of dead enemies
//! 10. status visuals every fifth frame
//!
//! While paused (user pause or a pending level-up choice) `update` returns
//! immediately and the game clock does not move, so nothing scheduled can
//! fire until play resumes.

use bevy::math::Vec2;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::combat::events::{HitSource, PlayerHurtSource, RunEvent};
use crate::states::run_config::RunConfig;
use crate::states::session::SessionContext;

use super::arena::{ArenaBounds, EnemyArena};
use super::attacks::{AttackState, Strike};
use super::components::{Enemy, EnemyId, EnemyKind, GameRng, Player, RunStats, XpOrb};
use super::constants::*;
use super::damage::{self, DamageResult, DamageSource, Hit};
use super::elemental_effects::{apply_elemental_effect, AttackVia};
use super::elements::Element;
use super::enemy_ai;
use super::presentation::{DamageColor, ParticleKind, PresentationQueue, PresentationSink, SoundCue};
use super::spawner::EnemySpawner;
use super::status_effects::{self, SpreadRequest, StatusKind, TickRules};
use super::timers::{TimedEventKind, TimedEvents};
use super::upgrade_config::UpgradeCatalog;
use super::upgrades::{LevelUpChoice, UpgradeEngine};
use super::waves::{WaveCompletion, WaveScheduler};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunStatus {
    Playing,
    GameOver,
}

/// Per-frame input from the host.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameInput {
    /// Movement intent, already normalized for diagonals.
    pub movement: Vec2,
}

/// Reported to the persistence host when a run ends.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub enemies_killed: u32,
    pub damage_taken: f32,
    pub wave_reached: u32,
    pub element: Option<Element>,
    pub survival_time_ms: f64,
    pub level_reached: u32,
    pub score: u32,
}

fn hit_source(via: AttackVia) -> HitSource {
    match via {
        AttackVia::Orb => HitSource::Orb,
        AttackVia::Lightning => HitSource::Lightning,
        AttackVia::Seed => HitSource::Seed,
        AttackVia::Quake => HitSource::Quake,
        AttackVia::Boomerang => HitSource::Boomerang,
        AttackVia::Clone => HitSource::Clone,
        AttackVia::Chain => HitSource::Chain,
    }
}

fn tick_presentation(kind: StatusKind) -> (DamageColor, HitSource) {
    match kind {
        StatusKind::Burn => (DamageColor::Burn, HitSource::Burn),
        StatusKind::Poison => (DamageColor::Poison, HitSource::Poison),
        _ => (DamageColor::Paralyze, HitSource::Paralyze),
    }
}

fn fresh_waves(config: &RunConfig) -> WaveScheduler {
    let mut waves = WaveScheduler::new(config.reduced_capability);
    waves.wave_number = config.starting_wave;
    waves.enemies_this_wave = config.starting_enemies;
    waves
}

/// The simulation core for one run at a time.
#[derive(Resource)]
pub struct CombatLoop {
    config: RunConfig,
    session: SessionContext,
    bounds: ArenaBounds,
    player: Player,
    enemies: EnemyArena,
    xp_orbs: Vec<XpOrb>,
    waves: WaveScheduler,
    spawner: EnemySpawner,
    upgrades: UpgradeEngine,
    timers: TimedEvents,
    attacks: AttackState,
    presentation: PresentationQueue,
    events: Vec<RunEvent>,
    rng: GameRng,
    stats: RunStats,
    clock: f64,
    frame: u64,
    user_paused: bool,
    pending_choice: Option<LevelUpChoice>,
    queued_level_ups: u32,
    status: RunStatus,
    summary: Option<RunSummary>,
}

impl CombatLoop {
    /// Build a run and start its first wave.
    pub fn new(
        config: RunConfig,
        session: SessionContext,
        catalog: UpgradeCatalog,
        rng: GameRng,
    ) -> Result<Self, String> {
        config.validate()?;
        let bounds = ArenaBounds::new(config.arena_width, config.arena_height);
        let mut run = Self {
            player: Player::new(bounds.center()),
            waves: fresh_waves(&config),
            config,
            session,
            bounds,
            enemies: EnemyArena::default(),
            xp_orbs: Vec::new(),
            spawner: EnemySpawner::default(),
            upgrades: UpgradeEngine::new(catalog),
            timers: TimedEvents::default(),
            attacks: AttackState::default(),
            presentation: PresentationQueue::default(),
            events: Vec::new(),
            rng,
            stats: RunStats::default(),
            clock: 0.0,
            frame: 0,
            user_paused: false,
            pending_choice: None,
            queued_level_ups: 0,
            status: RunStatus::Playing,
            summary: None,
        };
        run.start_wave();
        Ok(run)
    }

    /// Discard the current run and start a new one with the same config and
    /// session. Pending timed events from the old run are cancelled.
    pub fn reset(&mut self) {
        self.timers.cancel_all();
        self.player = Player::new(self.bounds.center());
        self.enemies.clear();
        self.xp_orbs.clear();
        self.waves = fresh_waves(&self.config);
        self.attacks = AttackState::default();
        self.presentation.clear();
        self.events.clear();
        self.stats = RunStats::default();
        self.clock = 0.0;
        self.frame = 0;
        self.user_paused = false;
        self.pending_choice = None;
        self.queued_level_ups = 0;
        self.status = RunStatus::Playing;
        self.summary = None;
        info!("Run reset");
        self.start_wave();
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    pub fn enemies(&self) -> &EnemyArena {
        &self.enemies
    }

    pub fn enemies_mut(&mut self) -> &mut EnemyArena {
        &mut self.enemies
    }

    pub fn xp_orbs(&self) -> &[XpOrb] {
        &self.xp_orbs
    }

    pub fn waves(&self) -> &WaveScheduler {
        &self.waves
    }

    pub fn waves_mut(&mut self) -> &mut WaveScheduler {
        &mut self.waves
    }

    pub fn timers(&self) -> &TimedEvents {
        &self.timers
    }

    pub fn timers_mut(&mut self) -> &mut TimedEvents {
        &mut self.timers
    }

    pub fn upgrades(&self) -> &UpgradeEngine {
        &self.upgrades
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    pub fn bounds(&self) -> ArenaBounds {
        self.bounds
    }

    pub fn clock(&self) -> f64 {
        self.clock
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn status(&self) -> RunStatus {
        self.status
    }

    pub fn attacks(&self) -> &AttackState {
        &self.attacks
    }

    pub fn pending_choice(&self) -> Option<&LevelUpChoice> {
        self.pending_choice.as_ref()
    }

    pub fn queued_level_ups(&self) -> u32 {
        self.queued_level_ups
    }

    /// Summary recorded at game over.
    pub fn summary(&self) -> Option<&RunSummary> {
        self.summary.as_ref()
    }

    pub fn presentation_mut(&mut self) -> &mut PresentationQueue {
        &mut self.presentation
    }

    pub fn flush_presentation(&mut self, sink: &mut dyn PresentationSink) -> usize {
        self.presentation.flush_to(sink)
    }

    pub fn drain_events(&mut self) -> Vec<RunEvent> {
        std::mem::take(&mut self.events)
    }

    // ------------------------------------------------------------------
    // Pause
    // ------------------------------------------------------------------

    pub fn is_paused(&self) -> bool {
        self.user_paused || self.pending_choice.is_some()
    }

    pub fn toggle_pause(&mut self) {
        self.user_paused = !self.user_paused;
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.user_paused = paused;
    }

    // ------------------------------------------------------------------
    // Frame
    // ------------------------------------------------------------------

    /// Advance one frame. Returns false when the body was skipped (paused or
    /// not playing).
    pub fn update(&mut self, delta_ms: f64, input: FrameInput) -> bool {
        if self.status != RunStatus::Playing || self.is_paused() {
            return false;
        }

        self.clock += delta_ms;
        self.frame += 1;
        let now = self.clock;

        self.move_player(delta_ms, input.movement);
        self.process_timed_events(now);
        self.run_attacks(now, delta_ms);
        self.update_enemies(now, delta_ms);
        self.check_wave_completion();
        self.process_contacts();
        self.collect_xp();

        if !self.player.is_alive() {
            self.game_over();
        }

        self.enemies.compact();

        if self.frame % STATUS_VISUAL_FRAMES == 0 {
            self.emit_status_visuals();
        }
        true
    }

    fn move_player(&mut self, delta_ms: f64, movement: Vec2) {
        let dt = (delta_ms / 1000.0) as f32;
        let step = movement.clamp_length_max(1.0) * self.player.speed * dt;
        self.player.position = self.bounds.clamp(self.player.position + step);
    }

    fn process_timed_events(&mut self, now: f64) {
        for kind in self.timers.pop_due(now) {
            if self.status != RunStatus::Playing {
                break;
            }
            match kind {
                TimedEventKind::SpawnEnemy { wave } => self.spawn_timed_enemy(wave, now),
                TimedEventKind::StartWave => self.start_wave(),
                TimedEventKind::BossLaser { boss, target } => self.fire_boss_laser(boss, target),
            }
        }
    }

    fn run_attacks(&mut self, now: f64, delta_ms: f64) {
        let strikes = self.attacks.update(
            &self.player,
            &mut self.enemies,
            now,
            delta_ms,
            &mut self.presentation,
        );
        for strike in strikes {
            self.strike(strike);
        }
    }

    fn update_enemies(&mut self, now: f64, delta_ms: f64) {
        let rules = TickRules {
            burn_spread: self.player.flags.has_wildfire,
            poison_spread: self.player.flags.has_toxic_spread,
            confusion_pulse: self.player.flags.has_mind_fracture,
        };
        let player_position = self.player.position;

        for index in 0..self.enemies.len() {
            let Some(enemy) = self.enemies.get_mut(index) else {
                continue;
            };
            if !enemy.active {
                continue;
            }

            let report = status_effects::tick(enemy, now, delta_ms, rules);
            let (position, kind) = (enemy.position, enemy.kind);
            for tick in &report.damage {
                let (color, source) = tick_presentation(tick.kind);
                self.presentation.show_number(tick.amount, color, position);
                self.stats.damage_dealt += tick.amount;
                self.events.push(RunEvent::EnemyDamaged {
                    kind,
                    source,
                    amount: tick.amount,
                    critical: false,
                });
            }
            for spread in &report.spread {
                self.spread_from(index, *spread, now);
            }
            if report.confusion_pulse {
                self.confusion_pulse(index);
            }
            if report.died {
                self.kill_enemy(index, true);
                continue;
            }

            let Some(enemy) = self.enemies.get_mut(index) else {
                continue;
            };
            if !enemy.active {
                continue;
            }
            enemy_ai::steer(enemy, player_position, self.frame, now, &mut self.rng);
            enemy_ai::integrate(enemy, player_position, delta_ms, &self.bounds);

            let is_boss = enemy.is_boss;
            let bomber_in_range = enemy.is_bomber
                && !enemy.status.charm.active
                && enemy.position.distance(player_position) <= BOMBER_TRIGGER_RADIUS;

            if is_boss {
                self.maybe_telegraph_laser(index, now);
            } else if bomber_in_range {
                self.detonate_bomber(index);
            }
        }
    }

    fn emit_status_visuals(&mut self) {
        for enemy in self.enemies.iter_active() {
            for kind in enemy.status.active_kinds() {
                self.presentation
                    .spawn_particle(ParticleKind::Status(kind), enemy.position);
            }
        }
    }

    // ------------------------------------------------------------------
    // Waves and spawning
    // ------------------------------------------------------------------

    fn start_wave(&mut self) {
        let plan = self.waves.start_wave();
        let now = self.clock;
        self.events.push(RunEvent::WaveStarted {
            wave: plan.wave,
            boss_wave: plan.spawn_boss,
        });

        if plan.spawn_boss {
            let boss = self.spawner.spawn_boss(
                plan.wave,
                self.player.position,
                &self.bounds,
                now,
                &mut self.rng,
            );
            self.enemies.push(boss);
            self.waves.on_boss_spawned();
            self.presentation.play_sound(SoundCue::BossSpawn);
            self.events.push(RunEvent::BossSpawned { wave: plan.wave });
            info!("Boss spawned for wave {}", plan.wave);
        }

        for i in 0..plan.timed_spawns {
            self.timers.schedule(
                now + SPAWN_INTERVAL_MS * (i + 1) as f64,
                TimedEventKind::SpawnEnemy { wave: plan.wave },
            );
        }
    }

    fn spawn_timed_enemy(&mut self, wave: u32, now: f64) {
        if wave != self.waves.wave_number || !self.waves.wants_spawn() {
            return;
        }
        let enemy = self.spawner.spawn_enemy(
            wave,
            self.waves.enemies_spawned,
            self.player.position,
            &self.bounds,
            now,
            &mut self.rng,
        );
        self.enemies.push(enemy);
        self.waves.on_enemy_spawned();
    }

    /// Add an enemy outside the wave schedule. It counts as alive for the
    /// current wave. Returns its arena index.
    pub fn spawn_enemy_at(&mut self, kind: EnemyKind, position: Vec2) -> usize {
        let enemy = self
            .spawner
            .spawn_kind(kind, self.waves.wave_number, position, self.clock);
        self.waves.on_extra_enemy_spawned();
        self.enemies.push(enemy)
    }

    /// Run the completion check and, if the wave just completed, its side
    /// effects. Safe to call any number of times per frame.
    pub fn check_wave_completion(&mut self) -> Option<WaveCompletion> {
        if self.status != RunStatus::Playing || !self.waves.completion_check() {
            return None;
        }
        let completion = self.waves.complete_wave(&mut self.player);
        self.timers.schedule(
            self.clock + completion.next_start_delay_ms,
            TimedEventKind::StartWave,
        );
        self.presentation.play_sound(SoundCue::WaveComplete);
        if completion.healed > 0.0 {
            self.presentation
                .show_number(completion.healed, DamageColor::Heal, self.player.position);
        }
        self.events.push(RunEvent::WaveCompleted {
            wave: completion.completed_wave,
            healed: completion.healed,
        });
        Some(completion)
    }

    // ------------------------------------------------------------------
    // Hits and kills
    // ------------------------------------------------------------------

    /// Resolve one attack hit: damage first, then elemental effects, then
    /// any chain follow-up.
    pub fn strike(&mut self, strike: Strike) {
        let source = if strike.via == AttackVia::Chain {
            DamageSource::Chain
        } else {
            DamageSource::Attack
        };
        if self
            .hit_enemy(strike.target, Hit::new(strike.base, source), hit_source(strike.via))
            .is_none()
        {
            return;
        }
        let Some(element) = self.player.element else {
            return;
        };

        let outcome = apply_elemental_effect(
            element,
            &self.player,
            strike.target,
            self.enemies.as_mut_slice(),
            strike.via,
            self.clock,
            &mut self.rng,
        );
        if outcome.knocked_back {
            if let Some(enemy) = self.enemies.get(strike.target) {
                self.presentation
                    .spawn_particle(ParticleKind::Knockback, enemy.position);
            }
        }
        if let Some(chain) = outcome.chain {
            self.strike(Strike {
                target: chain.target,
                base: chain.damage,
                via: AttackVia::Chain,
            });
        }
    }

    fn hit_enemy(&mut self, index: usize, hit: Hit, label: HitSource) -> Option<DamageResult> {
        let enemy = self.enemies.get_mut(index)?;
        if !enemy.active {
            return None;
        }
        let result = damage::apply_damage(
            &mut self.player,
            enemy,
            hit,
            &mut self.rng,
            &mut self.presentation,
        );
        let kind = enemy.kind;
        self.stats.damage_dealt += result.dealt;
        self.events.push(RunEvent::EnemyDamaged {
            kind,
            source: label,
            amount: result.dealt,
            critical: result.critical,
        });
        if result.lethal {
            self.kill_enemy(index, true);
        }
        Some(result)
    }

    /// The kill path. Runs at most once per enemy; later calls return false.
    /// `rewarded` drops an XP orb and awards score.
    pub fn kill_enemy(&mut self, index: usize, rewarded: bool) -> bool {
        let Some(enemy) = self.enemies.get_mut(index) else {
            return false;
        };
        if !enemy.active {
            return false;
        }
        enemy.active = false;
        enemy.velocity = Vec2::ZERO;
        let (kind, position, xp, score) =
            (enemy.kind, enemy.position, enemy.xp_value, enemy.score_value);

        self.waves.on_enemy_killed();
        if rewarded {
            self.xp_orbs.push(XpOrb { position, value: xp });
            self.stats.enemies_killed += 1;
            self.stats.score += score;
        }
        self.presentation.spawn_particle(ParticleKind::Death, position);
        self.presentation.play_sound(SoundCue::EnemyDeath);
        self.events.push(RunEvent::EnemyKilled {
            kind,
            xp: if rewarded { xp } else { 0 },
            score: if rewarded { score } else { 0 },
            rewarded,
        });
        true
    }

    fn spread_from(&mut self, index: usize, spread: SpreadRequest, now: f64) {
        let Some(origin) = self.enemies.get(index).map(|e| e.position) else {
            return;
        };
        let burn_duration = BURN_BASE_DURATION_MS + self.player.bonuses.burn_duration_ms as f64;
        for other in self.enemies.active_within(origin, SPREAD_RADIUS) {
            if other == index {
                continue;
            }
            let Some(enemy) = self.enemies.get_mut(other) else {
                continue;
            };
            match spread {
                SpreadRequest::Burn { damage } => {
                    if !enemy.status.burn.active {
                        enemy.status.apply_burn(damage, burn_duration, now);
                    }
                }
                SpreadRequest::Poison { base_damage } => {
                    if !enemy.status.poison.active {
                        enemy.status.apply_poison(base_damage, now);
                    }
                }
            }
        }
    }

    fn confusion_pulse(&mut self, index: usize) {
        let Some(origin) = self.enemies.get(index).map(|e| e.position) else {
            return;
        };
        let base = self.player.damage * CONFUSION_PULSE_FACTOR;
        for other in self.enemies.active_within(origin, CONFUSION_PULSE_RADIUS) {
            if other != index {
                self.hit_enemy(other, Hit::new(base, DamageSource::Pulse), HitSource::Pulse);
            }
        }
    }

    // ------------------------------------------------------------------
    // Hazards
    // ------------------------------------------------------------------

    fn maybe_telegraph_laser(&mut self, index: usize, now: f64) {
        let Some(boss) = self.enemies.get_mut(index) else {
            return;
        };
        if now < boss.special_ready_at || boss.status.is_movement_locked() {
            return;
        }
        boss.special_ready_at = now + BOSS_LASER_COOLDOWN_MS;
        let (id, position) = (boss.id, boss.position);
        self.timers.schedule(
            now + BOSS_LASER_TELEGRAPH_MS,
            TimedEventKind::BossLaser {
                boss: id,
                target: self.player.position,
            },
        );
        self.presentation
            .spawn_particle(ParticleKind::LaserTelegraph, position);
    }

    fn fire_boss_laser(&mut self, boss: EnemyId, target: Vec2) {
        if self.status != RunStatus::Playing || self.is_paused() {
            return;
        }
        let Some(enemy) = self.enemies.index_of(boss).and_then(|i| self.enemies.get(i)) else {
            return;
        };
        if !enemy.active || enemy.status.charm.active {
            return;
        }
        let start = enemy.position;
        let direction = (target - start).try_normalize().unwrap_or(Vec2::X);
        let end = start + direction * BOSS_LASER_LENGTH;
        let damage = enemy.damage * BOSS_LASER_DAMAGE_FACTOR;

        self.presentation.spawn_particle(ParticleKind::LaserBeam, start);
        self.presentation.play_sound(SoundCue::BossLaser);
        let reach = BOSS_LASER_HALF_WIDTH + CONTACT_RADIUS / 2.0;
        if damage::distance_to_segment(self.player.position, start, end) <= reach {
            self.hurt_player(damage, PlayerHurtSource::BossLaser, None);
        }
    }

    fn detonate_bomber(&mut self, index: usize) {
        let Some(bomber) = self.enemies.get(index) else {
            return;
        };
        if !bomber.active {
            return;
        }
        let (position, damage) = (bomber.position, bomber.damage);
        self.presentation.spawn_particle(ParticleKind::Explosion, position);
        self.presentation.play_sound(SoundCue::Explosion);
        if position.distance(self.player.position) <= BOMBER_BLAST_RADIUS {
            self.hurt_player(damage, PlayerHurtSource::BomberBlast, None);
        }
        self.kill_enemy(index, false);
    }

    fn process_contacts(&mut self) {
        let player_position = self.player.position;
        for index in 0..self.enemies.len() {
            let Some(enemy) = self.enemies.get(index) else {
                continue;
            };
            if !enemy.active || enemy.is_bomber || enemy.status.charm.active {
                continue;
            }
            if enemy.position.distance(player_position) > CONTACT_RADIUS {
                continue;
            }
            let (damage, kind) = (enemy.damage, enemy.kind);
            self.hurt_player(damage, PlayerHurtSource::Contact(kind), Some(index));
        }
    }

    /// Damage the player. Ignored during the invulnerability window; thorns
    /// reflect onto `attacker` as a separate hit.
    pub fn hurt_player(
        &mut self,
        raw: f32,
        source: PlayerHurtSource,
        attacker: Option<usize>,
    ) -> f32 {
        let now = self.clock;
        if !self.player.is_alive() || self.player.is_invulnerable(now) {
            return 0.0;
        }
        let taken = damage::player_damage_taken(raw, self.player.defense);
        self.player.health = (self.player.health - taken).max(0.0);
        self.player.invulnerable_until = now + INVULNERABILITY_MS;
        self.stats.damage_taken += taken;

        self.presentation
            .show_number(taken, DamageColor::PlayerHurt, self.player.position);
        self.presentation.play_sound(SoundCue::PlayerHurt);
        self.events.push(RunEvent::PlayerDamaged {
            source,
            amount: taken,
        });

        if let Some(index) = attacker {
            if let Some(hit) = damage::reflect_hit(&self.player, raw) {
                self.hit_enemy(index, hit, HitSource::Reflect);
            }
        }
        taken
    }

    // ------------------------------------------------------------------
    // Experience and level-ups
    // ------------------------------------------------------------------

    fn collect_xp(&mut self) {
        let position = self.player.position;
        let radius = self.player.pickup_radius;
        let mut gained = 0;
        self.xp_orbs.retain(|orb| {
            if orb.position.distance(position) <= radius {
                gained += orb.value;
                false
            } else {
                true
            }
        });
        if gained == 0 {
            return;
        }
        self.presentation.play_sound(SoundCue::Pickup);
        self.grant_xp(gained);
    }

    /// Add experience; each level gained queues a level-up choice.
    pub fn grant_xp(&mut self, amount: u32) -> u32 {
        let start_level = self.player.level;
        let levels = self.player.gain_xp(amount);
        if levels == 0 {
            return 0;
        }
        for level in (start_level + 1)..=self.player.level {
            self.events.push(RunEvent::LevelUp { level });
        }
        self.presentation.play_sound(SoundCue::LevelUp);
        self.queued_level_ups += levels;
        if self.pending_choice.is_none() {
            self.open_next_choice();
        }
        levels
    }

    fn open_next_choice(&mut self) {
        while self.queued_level_ups > 0 {
            self.queued_level_ups -= 1;
            let choice = self.upgrades.next_choice(&self.player, &mut self.rng);
            if !choice.is_empty() {
                self.pending_choice = Some(choice);
                return;
            }
            warn!("No level-up options left; skipping choice");
        }
        self.pending_choice = None;
    }

    /// Resolve the pending level-up choice. On error nothing changes and the
    /// choice stays pending.
    pub fn select_choice(&mut self, index: usize) -> Result<(), String> {
        self.resolve_choice(index).inspect_err(|e| error!("Level-up choice rejected: {}", e))
    }

    fn resolve_choice(&mut self, index: usize) -> Result<(), String> {
        let choice = self
            .pending_choice
            .as_ref()
            .ok_or_else(|| "No level-up choice is pending".to_string())?;
        if index >= choice.len() {
            return Err(format!(
                "Choice index {} out of range ({} options)",
                index,
                choice.len()
            ));
        }

        match choice {
            LevelUpChoice::Elements(options) => {
                let element = options[index];
                self.upgrades.select_element(&mut self.player, element)?;
                self.events.push(RunEvent::ElementChosen { element });
            }
            LevelUpChoice::Upgrades(options) => {
                let id = options[index];
                self.upgrades.apply_upgrade(&mut self.player, id)?;
                self.events.push(RunEvent::UpgradeChosen {
                    upgrade: id,
                    stacks: self.player.stacks(id),
                });
            }
        }

        self.pending_choice = None;
        self.open_next_choice();
        Ok(())
    }

    // ------------------------------------------------------------------
    // End of run
    // ------------------------------------------------------------------

    /// Snapshot of the run so far.
    pub fn run_summary(&self) -> RunSummary {
        RunSummary {
            enemies_killed: self.stats.enemies_killed,
            damage_taken: self.stats.damage_taken,
            wave_reached: self.waves.wave_number,
            element: self.player.element,
            survival_time_ms: self.clock,
            level_reached: self.player.level,
            score: self.stats.score,
        }
    }

    fn game_over(&mut self) {
        if self.status == RunStatus::GameOver {
            return;
        }
        self.status = RunStatus::GameOver;
        self.timers.cancel_all();
        self.pending_choice = None;
        self.queued_level_ups = 0;

        let summary = self.run_summary();
        let high_score = self.session.record_run(&summary);
        self.presentation.play_sound(SoundCue::GameOver);
        info!(
            "Game over on wave {} after {:.1}s: {} kills, score {}{}",
            summary.wave_reached,
            summary.survival_time_ms / 1000.0,
            summary.enemies_killed,
            summary.score,
            if high_score { " (new high score)" } else { "" }
        );
        self.events.push(RunEvent::GameOver {
            summary: summary.clone(),
        });
        self.summary = Some(summary);
    }

    /// Look up an enemy by arena index.
    pub fn enemy(&self, index: usize) -> Option<&Enemy> {
        self.enemies.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run() -> CombatLoop {
        CombatLoop::new(
            RunConfig::default(),
            SessionContext::default(),
            UpgradeCatalog::default(),
            GameRng::from_seed(11),
        )
        .unwrap()
    }

    #[test]
    fn test_new_run_schedules_first_wave() {
        let run = run();
        assert_eq!(run.waves().wave_number, 1);
        assert_eq!(run.timers().len(), INITIAL_ENEMIES_PER_WAVE as usize);
        let first = run.timers().pending().map(|e| e.at).fold(f64::INFINITY, f64::min);
        assert_eq!(first, SPAWN_INTERVAL_MS);
    }

    #[test]
    fn test_paused_update_does_not_advance_clock() {
        let mut run = run();
        run.set_paused(true);
        assert!(!run.update(16.0, FrameInput::default()));
        assert_eq!(run.clock(), 0.0);
        run.set_paused(false);
        assert!(run.update(16.0, FrameInput::default()));
        assert_eq!(run.clock(), 16.0);
    }

    #[test]
    fn test_first_level_up_offers_elements() {
        let mut run = run();
        run.grant_xp(INITIAL_XP_TO_NEXT);
        assert!(matches!(run.pending_choice(), Some(LevelUpChoice::Elements(v)) if v.len() == 3));
        assert!(run.is_paused());
        run.select_choice(0).unwrap();
        assert!(run.player().element.is_some());
        assert!(!run.is_paused());
    }

    #[test]
    fn test_bad_choice_index_keeps_choice_pending() {
        let mut run = run();
        run.grant_xp(INITIAL_XP_TO_NEXT);
        assert!(run.select_choice(7).is_err());
        assert!(run.pending_choice().is_some());
    }
}
