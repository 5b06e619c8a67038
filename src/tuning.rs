//! Data-driven game balance
//!
//! Every number the simulation rolls against lives here. `Tuning::default()`
//! is the shipped balance; a JSON document may override any subset of fields.

use serde::{Deserialize, Serialize};

/// Per-tick chance and lifespan range for one ball kind
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnRule {
    /// Chance per reference tick (`consts::SIM_DT`)
    pub chance: f32,
    /// Shortest lifespan (seconds)
    pub life_min: f32,
    /// Longest lifespan (seconds)
    pub life_max: f32,
}

impl SpawnRule {
    pub const fn new(chance: f32, life_min: f32, life_max: f32) -> Self {
        Self {
            chance,
            life_min,
            life_max,
        }
    }
}

/// Red-ball policy for Time Trial levels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrialRedRule {
    /// Level red chance is multiplied by this
    pub scale: f32,
    /// Scaled chance never drops below this
    pub floor: f32,
    /// Base chance when the session has no level
    pub fallback_base: f32,
    pub life_min: f32,
    pub life_max: f32,
}

impl Default for TrialRedRule {
    fn default() -> Self {
        Self {
            scale: 0.25,
            floor: 0.003,
            fallback_base: 0.08,
            life_min: 0.65,
            life_max: 0.85,
        }
    }
}

impl TrialRedRule {
    /// `max(floor, base * scale)` with the session level's base chance
    pub fn rule_for(&self, level_red_chance: Option<f32>) -> SpawnRule {
        let base = level_red_chance.unwrap_or(self.fallback_base);
        SpawnRule::new((base * self.scale).max(self.floor), self.life_min, self.life_max)
    }
}

/// Complete balance sheet
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Geometry ===
    /// Drawn ball radius
    pub ball_radius: f32,
    /// Keep ball centers this far from the play-area edges
    pub inner_margin: f32,
    /// Minimum distance between two ball centers
    pub min_separation: f32,
    /// Keep specials this far from the play-area center (HUD overlay)
    pub center_exclusion_radius: f32,

    // === Placement / lifetime ===
    /// Sample budget per spawn attempt
    pub spawn_attempts: u32,
    /// Extra seconds an expired ball stays tappable
    pub despawn_grace: f32,

    // === Spawn rules ===
    pub normal_red: SpawnRule,
    pub risk_red: SpawnRule,
    pub gold: SpawnRule,
    pub blue: SpawnRule,
    pub green: SpawnRule,
    pub trial_red: TrialRedRule,

    // === Tap effects ===
    /// Normal-ball taps per currency award in Normal mode
    pub taps_per_currency_normal: u32,
    /// Normal-ball taps per currency award in Risk+ mode
    pub taps_per_currency_risk: u32,
    /// Currency granted per award
    pub currency_per_award: u32,
    /// Score for a Blue ball
    pub blue_bonus: u32,
    /// Seconds for a Green ball
    pub green_bonus_secs: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        let ball_radius = 42.0;
        Self {
            ball_radius,
            inner_margin: 52.0,
            min_separation: ball_radius * 2.0 + 6.0,
            center_exclusion_radius: 90.0,

            spawn_attempts: 28,
            despawn_grace: 0.20,

            normal_red: SpawnRule::new(0.006, 0.80, 1.05),
            risk_red: SpawnRule::new(0.007, 0.80, 1.10),
            gold: SpawnRule::new(0.005, 0.55, 0.75),
            blue: SpawnRule::new(0.010, 0.45, 0.65),
            green: SpawnRule::new(0.010, 0.60, 0.90),
            trial_red: TrialRedRule::default(),

            taps_per_currency_normal: 4,
            taps_per_currency_risk: 10,
            currency_per_award: 1,
            blue_bonus: 5,
            green_bonus_secs: 3.0,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON balance sheet
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Parse a balance sheet, falling back to defaults if it is missing or malformed
    pub fn load_or_default(json: Option<&str>) -> Self {
        match json.map(Self::from_json) {
            Some(Ok(tuning)) => {
                log::info!("Loaded tuning overrides");
                tuning
            }
            Some(Err(err)) => {
                log::warn!("Ignoring malformed tuning ({err}), using defaults");
                Self::default()
            }
            None => Self::default(),
        }
    }
}
