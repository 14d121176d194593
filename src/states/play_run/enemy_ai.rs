//! Enemy AI
//!
//! Per-frame movement intent for one enemy.
//!
//! - movement-locked (frozen, paralyzed, asleep): velocity is zero
//! - knocked back: the impulse velocity is kept until the window closes
//! - confused: a random heading held for 500ms, then re-rolled
//! - otherwise: toward the player, reversed while feared
//!
//! The heading toward the player is only recomputed every third frame and
//! cached between refreshes, so unconfused enemies react to player movement
//! up to two frames late.
//!
//! Bodies do not overlap the player: `integrate` holds every enemy at
//! `ENEMY_STANDOFF_DISTANCE` from the player's center.

use bevy::math::Vec2;
use std::f32::consts::PI;

use super::arena::ArenaBounds;
use super::components::{Enemy, GameRng};
use super::constants::*;

fn heading_toward(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}

/// Update `enemy.velocity` for this frame.
pub fn steer(enemy: &mut Enemy, player: Vec2, frame: u64, now: f64, rng: &mut GameRng) {
    if !enemy.active {
        return;
    }
    if enemy.status.is_movement_locked() {
        enemy.velocity = Vec2::ZERO;
        return;
    }
    if now < enemy.knockback_until {
        return;
    }

    let angle = if enemy.status.confusion.active {
        if now >= enemy.confused_heading_until {
            enemy.confused_heading = rng.random_angle();
            enemy.confused_heading_until = now + CONFUSION_HEADING_HOLD_MS;
        }
        enemy.confused_heading
    } else {
        let cached = match enemy.heading {
            Some(h) if frame % AI_HEADING_REFRESH_FRAMES != 0 => h,
            _ => {
                let h = heading_toward(enemy.position, player);
                enemy.heading = Some(h);
                h
            }
        };
        if enemy.status.fear.active {
            cached + PI
        } else {
            cached
        }
    };

    enemy.velocity = Vec2::from_angle(angle) * enemy.speed;
}

/// Move `enemy` by its velocity for `delta_ms`, staying inside the arena and
/// outside the player's body.
pub fn integrate(enemy: &mut Enemy, player: Vec2, delta_ms: f64, bounds: &ArenaBounds) {
    if !enemy.active {
        return;
    }
    let dt = (delta_ms / 1000.0) as f32;
    let moved = enemy.position + enemy.velocity * dt;
    let offset = moved - player;
    let separated = if offset.length() < ENEMY_STANDOFF_DISTANCE {
        let away = offset
            .try_normalize()
            .or_else(|| (enemy.position - player).try_normalize())
            .unwrap_or(Vec2::X);
        player + away * ENEMY_STANDOFF_DISTANCE
    } else {
        moved
    };
    enemy.position = bounds.clamp(separated);
}

/// Push `enemy` directly away from `origin` with `power` px/s for the
/// knockback window.
pub fn knock_back(enemy: &mut Enemy, origin: Vec2, power: f32, now: f64) {
    if !enemy.active || enemy.is_boss {
        return;
    }
    let away = (enemy.position - origin).try_normalize().unwrap_or(Vec2::X);
    enemy.velocity = away * power;
    enemy.knockback_until = now + KNOCKBACK_WINDOW_MS;
}
