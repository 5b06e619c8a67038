//! Time Trial campaign
//!
//! Walks the level catalog in order: clearing a level pays a reward and moves
//! on, anything else replays the same level.

use crate::consts::LEVEL_CLEAR_REWARD;
use crate::progress::PlayerProgress;
use crate::sim::{GameMode, GameOutcome, GameSession, Level, SessionConfig, catalog};

/// What happens after a level ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CampaignStep {
    /// Cleared; play continues at this level ID
    Advanced { next_level: u32 },
    /// Not cleared; play the same level again
    Replay,
    /// Cleared the last level
    Completed,
}

/// Position in the Time Trial level list
#[derive(Debug, Clone)]
pub struct TimeTrialCampaign {
    levels: Vec<Level>,
    current: usize,
}

impl Default for TimeTrialCampaign {
    fn default() -> Self {
        Self::new(catalog())
    }
}

impl TimeTrialCampaign {
    pub fn new(levels: Vec<Level>) -> Self {
        Self { levels, current: 0 }
    }

    /// Resume at a 0-based level index (clamped to the list)
    pub fn starting_at(levels: Vec<Level>, index: usize) -> Self {
        let current = index.min(levels.len().saturating_sub(1));
        Self { levels, current }
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_level(&self) -> Option<&Level> {
        self.levels.get(self.current)
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// A fresh session on the current level
    pub fn start_session(&self, skin: u32, seed: u64) -> Option<GameSession> {
        let level = self.current_level()?.clone();
        log::info!("Starting {} ({})", level.name, level.blurb);
        let config = SessionConfig::time_trial(level).with_skin(skin);
        Some(GameSession::new(config, seed))
    }

    /// Settle a finished level: reward and advance on a clear, replay otherwise
    pub fn record_result(&mut self, outcome: GameOutcome, progress: &mut PlayerProgress) -> CampaignStep {
        if !outcome.is_win() {
            return CampaignStep::Replay;
        }

        progress.add_currency(LEVEL_CLEAR_REWARD);
        if self.current + 1 >= self.levels.len() {
            log::info!("Time Trial campaign complete");
            return CampaignStep::Completed;
        }

        self.current += 1;
        let next_level = self.levels[self.current].id;
        log::info!("Advanced to level {next_level}");
        CampaignStep::Advanced { next_level }
    }

    /// Convenience: settle straight from a finished session (and record its score)
    pub fn finish_session(&mut self, session: &GameSession, progress: &mut PlayerProgress) -> Option<CampaignStep> {
        let outcome = session.outcome()?;
        progress.record_high_score(GameMode::TimeTrial, session.score());
        Some(self.record_result(outcome, progress))
    }
}
