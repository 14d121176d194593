//! Session context
//!
//! Data that outlives a single run (high score, last element, run count).
//! Owned by whoever hosts the runs and handed to each `CombatLoop`; there
//! is no global copy.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::play_run::combat_loop::RunSummary;
use super::play_run::elements::Element;

#[derive(Resource, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionContext {
    pub high_score: u32,
    pub best_wave: u32,
    pub runs_played: u32,
    pub last_element: Option<Element>,
}

impl SessionContext {
    /// Fold a finished run in. Returns true on a new high score.
    pub fn record_run(&mut self, summary: &RunSummary) -> bool {
        self.runs_played += 1;
        self.best_wave = self.best_wave.max(summary.wave_reached);
        if summary.element.is_some() {
            self.last_element = summary.element;
        }
        if summary.score > self.high_score {
            self.high_score = summary.score;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(score: u32, wave: u32) -> RunSummary {
        RunSummary {
            enemies_killed: 3,
            damage_taken: 40.0,
            wave_reached: wave,
            element: Some(Element::Gravity),
            survival_time_ms: 60_000.0,
            level_reached: 4,
            score,
        }
    }

    #[test]
    fn test_high_score_only_rises() {
        let mut session = SessionContext::default();
        assert!(session.record_run(&summary(100, 3)));
        assert!(!session.record_run(&summary(50, 6)));
        assert_eq!(session.high_score, 100);
        assert_eq!(session.best_wave, 6);
        assert_eq!(session.runs_played, 2);
        assert_eq!(session.last_element, Some(Element::Gravity));
    }
}
