//! Game session state
//!
//! `GameSession` is the aggregate every other sim component mutates: score,
//! lives, clock, the active balls and the terminal outcome. It remembers the
//! configuration it was created with so a restart returns to the same start.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::area::PlayArea;
use super::ball::{Ball, BallKind, KindTag};
use super::level::Level;
use super::spawn::{SpawnRequest, attempt_spawn};
use crate::consts::*;
use crate::tuning::Tuning;

/// Which rule set a session plays by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GameMode {
    /// Normal balls and the odd Red
    #[default]
    Normal,
    /// Adds Blue, Gold and Green specials
    RiskPlus,
    /// Level-driven: tap a target count before the clock or lives run out
    TimeTrial,
}

impl GameMode {
    pub const ALL: [GameMode; 3] = [GameMode::Normal, GameMode::RiskPlus, GameMode::TimeTrial];

    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Normal => "Normal",
            GameMode::RiskPlus => "Risk+",
            GameMode::TimeTrial => "Time Trial",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "normal" => Some(GameMode::Normal),
            "risk+" | "risk" | "riskplus" => Some(GameMode::RiskPlus),
            "time trial" | "timetrial" | "time_trial" => Some(GameMode::TimeTrial),
            _ => None,
        }
    }
}

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOutcome {
    /// Time Trial target reached
    Cleared,
    /// Last life lost to a Red ball
    OutOfLives,
    /// Clock ran out
    TimeUp,
}

impl GameOutcome {
    pub fn is_win(&self) -> bool {
        matches!(self, GameOutcome::Cleared)
    }
}

/// Something the presentation layer should react to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Session reached its terminal state
    GameOver { outcome: GameOutcome, score: u32 },
    /// Tap pacing earned soft currency
    CurrencyAwarded { amount: u32 },
}

/// How to set up (and later restart) a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub mode: GameMode,
    /// Starting time when there is no level (or the level has no limit)
    pub default_time: f32,
    /// Starting lives when there is no level
    pub default_lives: u8,
    pub level: Option<Level>,
    /// Skin of the Normal ball, from the player's preferences
    pub skin: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::normal()
    }
}

impl SessionConfig {
    pub fn normal() -> Self {
        Self::for_mode(GameMode::Normal)
    }

    pub fn risk_plus() -> Self {
        Self::for_mode(GameMode::RiskPlus)
    }

    /// Time Trial on a level; defaults follow the level
    pub fn time_trial(level: Level) -> Self {
        Self {
            default_time: level.time_limit.map_or(DEFAULT_TIME, |t| t as f32),
            default_lives: level.lives,
            level: Some(level),
            ..Self::for_mode(GameMode::TimeTrial)
        }
    }

    pub fn for_mode(mode: GameMode) -> Self {
        Self {
            mode,
            default_time: DEFAULT_TIME,
            default_lives: DEFAULT_LIVES,
            level: None,
            skin: 0,
        }
    }

    /// Starting time; non-finite values keep `DEFAULT_TIME`, negatives become 0
    pub fn with_time(mut self, seconds: f32) -> Self {
        self.default_time = sanitize_time(seconds);
        self
    }

    pub fn with_lives(mut self, lives: u8) -> Self {
        self.default_lives = lives;
        self
    }

    pub fn with_skin(mut self, skin: u32) -> Self {
        self.skin = skin;
        self
    }
}

/// A countdown that can actually reach zero
fn sanitize_time(seconds: f32) -> f32 {
    if seconds.is_finite() {
        seconds.max(0.0)
    } else {
        DEFAULT_TIME
    }
}

/// Complete mutable state of one play-through
#[derive(Debug, Clone)]
pub struct GameSession {
    pub(crate) config: SessionConfig,
    pub(crate) tuning: Tuning,
    pub(crate) score: u32,
    pub(crate) lives: u8,
    /// Seconds left; only ever negative inside a tick, clamped on time-up
    pub(crate) time_remaining: f32,
    /// Normal taps still needed to clear a Time Trial level
    pub(crate) target_remaining: Option<u32>,
    pub(crate) paused: bool,
    pub(crate) outcome: Option<GameOutcome>,
    pub(crate) balls: Vec<Ball>,
    pub(crate) area: PlayArea,
    /// Normal taps since the last currency award
    pub(crate) currency_taps: u32,
    /// Seconds of unpaused play; ball expiry is measured against this.
    /// `f64` so `SIM_DT` steps still register after days of untimed play.
    pub(crate) clock: f64,
    pub(crate) rng: Pcg32,
    /// Next ball ID; never reset so stale IDs cannot hit new balls
    next_id: u32,
}

impl GameSession {
    /// Create and start a session with the shipped balance
    pub fn new(config: SessionConfig, seed: u64) -> Self {
        Self::with_tuning(config, Tuning::default(), seed)
    }

    /// Create and start a session with custom balance
    pub fn with_tuning(config: SessionConfig, tuning: Tuning, seed: u64) -> Self {
        let mut session = Self {
            config,
            tuning,
            score: 0,
            lives: 0,
            time_remaining: 0.0,
            target_remaining: None,
            paused: false,
            outcome: None,
            balls: Vec::new(),
            area: PlayArea::EMPTY,
            currency_taps: 0,
            clock: 0.0,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        };
        session.start();
        session
    }

    /// Reset to the configured start: score 0, no balls, lives/time from the level or defaults
    pub fn start(&mut self) {
        self.outcome = None;
        self.paused = false;
        self.score = 0;
        self.balls.clear();
        self.currency_taps = 0;
        self.clock = 0.0;

        match &self.config.level {
            Some(level) => {
                self.lives = level.lives.min(MAX_LIVES);
                self.time_remaining = level
                    .time_limit
                    .map_or(sanitize_time(self.config.default_time), |t| t as f32);
                self.target_remaining = level.target_taps;
            }
            None => {
                self.lives = self.config.default_lives.min(MAX_LIVES);
                self.time_remaining = sanitize_time(self.config.default_time);
                self.target_remaining = None;
            }
        }

        log::info!(
            "{} session started: lives={}, time={:.1}s, target={:?}",
            self.config.mode.as_str(),
            self.lives,
            self.time_remaining,
            self.target_remaining
        );
    }

    /// Same as `start`; kept as the name the UI's restart button calls
    pub fn restart(&mut self) {
        self.start();
    }

    pub fn pause_toggle(&mut self) {
        self.paused = !self.paused;
        log::debug!("Paused: {}", self.paused);
    }

    /// Set by the layout layer before the first tick (and on resize)
    pub fn set_play_area(&mut self, area: PlayArea) {
        self.area = area;
    }

    /// Skin for Normal balls spawned from now on
    pub fn set_normal_skin(&mut self, skin: u32) {
        self.config.skin = skin;
    }

    // === Accessors ===

    pub fn mode(&self) -> GameMode {
        self.config.mode
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn level(&self) -> Option<&Level> {
        self.config.level.as_ref()
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lives(&self) -> u8 {
        self.lives
    }

    pub fn time_remaining(&self) -> f32 {
        self.time_remaining
    }

    /// Whole seconds for the HUD, never negative
    pub fn display_seconds(&self) -> u32 {
        self.time_remaining.max(0.0) as u32
    }

    pub fn target_taps_remaining(&self) -> Option<u32> {
        self.target_remaining
    }

    pub fn balls(&self) -> &[Ball] {
        &self.balls
    }

    pub fn ball(&self, id: u32) -> Option<&Ball> {
        self.balls.iter().find(|b| b.id == id)
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn outcome(&self) -> Option<GameOutcome> {
        self.outcome
    }

    pub fn play_area(&self) -> PlayArea {
        self.area
    }

    /// Seconds of unpaused play since the last start
    pub fn clock(&self) -> f64 {
        self.clock
    }

    /// Whether the countdown runs (everything except untimed Time Trial levels)
    pub fn is_timed(&self) -> bool {
        match (&self.config.mode, &self.config.level) {
            (GameMode::TimeTrial, Some(level)) => level.time_limit.is_some(),
            _ => true,
        }
    }

    pub fn has_kind(&self, tag: KindTag) -> bool {
        self.balls.iter().any(|b| b.kind.tag() == tag)
    }

    /// Place a ball directly (scripted setups, tutorials, tests).
    /// Refused when a ball of the same kind is already active.
    pub fn insert_ball(&mut self, kind: BallKind, pos: Vec2, life: Option<f32>) -> Option<u32> {
        if self.has_kind(kind.tag()) {
            return None;
        }
        let id = self.next_entity_id();
        let ball = match life {
            Some(life) => Ball::ephemeral(id, kind, pos, self.clock, life),
            None => Ball::persistent(id, kind, pos),
        };
        self.balls.push(ball);
        Some(id)
    }

    // === Internals used by tick/tap ===

    pub(crate) fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Spawn via the planner; returns the new ball's ID
    pub(crate) fn try_spawn(&mut self, request: SpawnRequest) -> Option<u32> {
        if self.has_kind(request.kind.tag()) {
            return None;
        }
        let placement = attempt_spawn(&request, &self.balls, &self.area, &mut self.rng, &self.tuning)?;
        let id = self.next_entity_id();
        self.balls.push(placement.into_ball(id, &request, self.clock));
        log::trace!("Spawned {:?} #{} at {:?}", request.kind, id, placement.pos);
        Some(id)
    }

    /// Keep exactly one Normal ball on screen
    pub(crate) fn ensure_normal(&mut self) {
        if !self.has_kind(KindTag::Normal) {
            self.try_spawn(SpawnRequest::normal(self.config.skin));
        }
    }

    pub(crate) fn remove_ball(&mut self, id: u32) -> Option<Ball> {
        let idx = self.balls.iter().position(|b| b.id == id)?;
        Some(self.balls.remove(idx))
    }

    /// One-way transition into the terminal state
    pub(crate) fn end(&mut self, outcome: GameOutcome) -> GameEvent {
        if outcome == GameOutcome::TimeUp {
            self.time_remaining = self.time_remaining.max(0.0);
        }
        self.outcome = Some(outcome);
        log::info!(
            "{} session over: {:?} (score {})",
            self.config.mode.as_str(),
            outcome,
            self.score
        );
        GameEvent::GameOver {
            outcome,
            score: self.score,
        }
    }
}
