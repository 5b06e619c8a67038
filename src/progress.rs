//! Player progress: currency, unlocks and high scores
//!
//! This is the sink for session events. The storage medium (key-value store,
//! file, LocalStorage) belongs to the platform; this module only produces and
//! accepts a flat JSON snapshot.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::sim::{GameEvent, GameMode};

/// Number of ball skins and backgrounds that start unlocked
pub const FREE_ITEMS: u32 = 5;

/// Shop price for the item at catalog `index`
pub fn shop_price(index: u32) -> u32 {
    match index {
        0..10 => 100,
        10..20 => 250,
        _ => 500,
    }
}

/// What a shop item unlocks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShopCategory {
    Ball,
    Background,
}

/// Everything the player keeps between sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerProgress {
    pub currency: u32,
    pub selected_ball: u32,
    pub selected_background: u32,
    unlocked_balls: BTreeSet<u32>,
    unlocked_backgrounds: BTreeSet<u32>,
    /// Best score per mode, keyed by `GameMode::as_str`
    high_scores: BTreeMap<String, u32>,
}

impl Default for PlayerProgress {
    fn default() -> Self {
        Self {
            currency: 0,
            selected_ball: 0,
            selected_background: 0,
            unlocked_balls: (0..FREE_ITEMS).collect(),
            unlocked_backgrounds: (0..FREE_ITEMS).collect(),
            high_scores: BTreeMap::new(),
        }
    }
}

impl PlayerProgress {
    pub fn new() -> Self {
        Self::default()
    }

    // === Currency ===

    pub fn add_currency(&mut self, amount: u32) {
        self.currency = self.currency.saturating_add(amount);
    }

    /// Spend if affordable; returns whether the spend happened
    pub fn spend_currency(&mut self, cost: u32) -> bool {
        if self.currency < cost {
            return false;
        }
        self.currency -= cost;
        true
    }

    // === Unlocks ===

    pub fn is_unlocked(&self, category: ShopCategory, id: u32) -> bool {
        match category {
            ShopCategory::Ball => self.unlocked_balls.contains(&id),
            ShopCategory::Background => self.unlocked_backgrounds.contains(&id),
        }
    }

    pub fn unlock(&mut self, category: ShopCategory, id: u32) {
        match category {
            ShopCategory::Ball => self.unlocked_balls.insert(id),
            ShopCategory::Background => self.unlocked_backgrounds.insert(id),
        };
    }

    /// Buy item `id` at its shop price. Already-owned items cost nothing.
    pub fn purchase(&mut self, category: ShopCategory, id: u32) -> bool {
        if self.is_unlocked(category, id) {
            return true;
        }
        if !self.spend_currency(shop_price(id)) {
            return false;
        }
        self.unlock(category, id);
        log::info!("Unlocked {:?} #{} ({} left)", category, id, self.currency);
        true
    }

    /// Select a ball skin; only unlocked skins can be chosen
    pub fn select_ball(&mut self, id: u32) -> bool {
        if !self.is_unlocked(ShopCategory::Ball, id) {
            return false;
        }
        self.selected_ball = id;
        true
    }

    pub fn select_background(&mut self, id: u32) -> bool {
        if !self.is_unlocked(ShopCategory::Background, id) {
            return false;
        }
        self.selected_background = id;
        true
    }

    // === High scores ===

    /// Record a score; returns true if it is a new best for the mode
    pub fn record_high_score(&mut self, mode: GameMode, score: u32) -> bool {
        let best = self.high_scores.entry(mode.as_str().to_string()).or_insert(0);
        if score > *best {
            *best = score;
            return true;
        }
        false
    }

    pub fn high_score(&self, mode: GameMode) -> u32 {
        self.high_scores.get(mode.as_str()).copied().unwrap_or(0)
    }

    /// The headline high score (Normal mode)
    pub fn primary_high_score(&self) -> u32 {
        self.high_score(GameMode::Normal)
    }

    /// Fold a session's events into progress
    pub fn apply_events(&mut self, mode: GameMode, events: &[GameEvent]) {
        for event in events {
            match *event {
                GameEvent::CurrencyAwarded { amount } => self.add_currency(amount),
                GameEvent::GameOver { score, .. } => {
                    if self.record_high_score(mode, score) {
                        log::info!("New {} high score: {}", mode.as_str(), score);
                    }
                }
            }
        }
    }

    // === Snapshot ===

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Restore from a stored snapshot, starting fresh if there is none or it is unreadable
    pub fn load_or_default(json: Option<&str>) -> Self {
        match json.map(Self::from_json) {
            Some(Ok(progress)) => {
                log::info!("Loaded progress ({} currency)", progress.currency);
                progress
            }
            Some(Err(err)) => {
                log::warn!("Progress snapshot unreadable ({err}), starting fresh");
                Self::default()
            }
            None => {
                log::info!("No progress found, starting fresh");
                Self::default()
            }
        }
    }
}
