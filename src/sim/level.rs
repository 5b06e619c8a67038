//! Time Trial level catalog
//!
//! Levels come in ten tiers of ten. Each tier has its own flavor (time attack,
//! accuracy, survival, no powerups, ...) and a formula of the level's position
//! inside the tier, so difficulty climbs within a tier and from tier to tier.

use serde::{Deserialize, Serialize};

use crate::consts::LEVEL_COUNT;

/// Immutable configuration of one Time Trial level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    /// 1-based level number
    pub id: u32,
    pub name: String,
    /// Normal-ball taps needed to clear; `None` = no tap-count goal
    pub target_taps: Option<u32>,
    /// Seconds available; `None` = untimed (survival)
    pub time_limit: Option<u32>,
    /// Lives at start (1..=3)
    pub lives: u8,
    /// Per-tick red chance before the engine scales it down
    pub red_chance: f32,
    /// Whether Blue/Gold/Green balls appear
    pub specials: bool,
    /// One-line description shown under the timer
    pub blurb: String,
}

/// The full 100-level catalog
pub fn catalog() -> Vec<Level> {
    generate(LEVEL_COUNT)
}

/// Generate `count` levels. Pure function of the level index.
pub fn generate(count: usize) -> Vec<Level> {
    (0..count).map(level_at).collect()
}

fn life_word(lives: u8) -> &'static str {
    if lives == 1 { "life" } else { "lives" }
}

/// Build the level at 0-based `index`. Indices past 100 stay in the final tier.
fn level_at(index: usize) -> Level {
    let tier = (index / 10).min(9);
    let pos = (index % 10) as u32;
    let p = pos as f32;

    let mut lives: u8 = 3;
    let mut specials = true;

    let (target, time_limit, red_chance, blurb) = match tier {
        // Gentle intro, time attack
        0 => {
            let target = 10 + pos * 3;
            let time = 25 + pos * 2;
            (target, Some(time), 0.03 + p * 0.004, format!("Time-Attack: Tap {target} bubbles in {time}s."))
        }
        // Faster reds
        1 => {
            let target = 18 + pos * 3;
            let time = 24 + pos * 2;
            (target, Some(time), 0.05 + p * 0.006, format!("Speed: Faster reds. Get {target} taps in {time}s!"))
        }
        // Accuracy: two lives, one on the last level
        2 => {
            let target = 20 + pos * 4;
            let time = 22 + pos * 2;
            lives = if pos == 9 { 1 } else { 2 };
            (
                target,
                Some(time),
                0.06 + p * 0.007,
                format!("Accuracy: {lives} {}. Hit {target} in {time}s.", life_word(lives)),
            )
        }
        // Survival: last level has no timer
        3 => {
            let target = 25 + pos * 3;
            let time = if pos == 9 { None } else { Some(20 + pos * 2) };
            lives = if pos >= 6 { 1 } else { 2 };
            let blurb = match time {
                Some(t) => format!("Survive: {lives} {}. Score {target} before {t}s.", life_word(lives)),
                None => format!("Survive: {lives} {}. Score {target} with no timer!", life_word(lives)),
            };
            (target, time, 0.07 + p * 0.007, blurb)
        }
        // Focus: no powerups
        4 => {
            let target = 28 + pos * 3;
            let time = 22 + pos * 2;
            specials = false;
            (target, Some(time), 0.08 + p * 0.006, format!("Focus: No powerups. {target} taps in {time}s."))
        }
        // Chaos: lots of reds, full lives
        5 => {
            let target = 30 + pos * 4;
            let time = 24 + pos * 2;
            (target, Some(time), 0.10 + p * 0.008, format!("Chaos: Reds abound! {target} in {time}s."))
        }
        // Endurance
        6 => {
            let target = 45 + pos * 4;
            let time = 35 + pos * 2;
            (target, Some(time), 0.09 + p * 0.005, format!("Endurance: {target} taps in {time}s."))
        }
        // One life, short clock
        7 => {
            let target = 40 + pos * 3;
            let time = 20 + pos * 2;
            lives = 1;
            (target, Some(time), 0.11 + p * 0.007, format!("One-Life: {target} in {time}s. Don't miss!"))
        }
        // Survival with specials, every third level untimed
        8 => {
            let target = 45 + pos * 3;
            let time = if pos % 3 == 0 { None } else { Some(22 + pos * 2) };
            lives = if pos >= 5 { 1 } else { 2 };
            let blurb = match time {
                Some(t) => format!("Survival+: {lives} {}. {target} before {t}s.", life_word(lives)),
                None => format!("Survival+: {lives} {}. {target} with no timer!", life_word(lives)),
            };
            (target, time, 0.12 + p * 0.007, blurb)
        }
        // Final exam
        _ => {
            let target = 60 + pos * 4;
            let time = 28 + pos * 2;
            lives = if pos >= 5 { 1 } else { 2 };
            (
                target,
                Some(time),
                0.14 + p * 0.008,
                format!("Final: {lives} {}. {target} taps in {time}s.", life_word(lives)),
            )
        }
    };

    let id = index as u32 + 1;
    Level {
        id,
        name: format!("Level {id}"),
        target_taps: Some(target),
        time_limit,
        lives,
        red_chance,
        specials,
        blurb,
    }
}
