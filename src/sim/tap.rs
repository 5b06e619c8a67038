//! Tap resolution
//!
//! A tap names a ball by ID. The ball is removed and its effect applied;
//! taps on balls that already expired or were tapped are ignored.

use super::ball::BallKind;
use super::state::{GameEvent, GameMode, GameOutcome, GameSession};
use crate::consts::MAX_LIVES;

/// Apply the player's tap on ball `id`
pub fn handle_tap(session: &mut GameSession, id: u32) -> Vec<GameEvent> {
    let mut events = Vec::new();

    // The UI hides balls while paused; ignore anything that slips through
    if session.outcome.is_some() || session.paused {
        return events;
    }

    let Some(ball) = session.remove_ball(id) else {
        return events;
    };

    match ball.kind {
        BallKind::Normal { .. } => {
            session.score += 1;
            match session.mode() {
                GameMode::Normal => {
                    let threshold = session.tuning.taps_per_currency_normal;
                    events.extend(count_currency_tap(session, threshold));
                }
                GameMode::RiskPlus => {
                    let threshold = session.tuning.taps_per_currency_risk;
                    events.extend(count_currency_tap(session, threshold));
                }
                GameMode::TimeTrial => {
                    if let Some(remaining) = session.target_remaining {
                        let remaining = remaining.saturating_sub(1);
                        session.target_remaining = Some(remaining);
                        if remaining == 0 {
                            events.push(session.end(GameOutcome::Cleared));
                        }
                    }
                }
            }
        }
        BallKind::Red => {
            session.lives = session.lives.saturating_sub(1);
            if session.lives == 0 {
                events.push(session.end(GameOutcome::OutOfLives));
            }
        }
        BallKind::Blue => {
            session.score += session.tuning.blue_bonus;
        }
        BallKind::Gold => {
            if session.lives < MAX_LIVES {
                session.lives += 1;
            }
        }
        BallKind::Green => {
            session.time_remaining += session.tuning.green_bonus_secs;
        }
    }

    events
}

/// Count a Normal tap toward the currency pace; award and reset at the threshold
fn count_currency_tap(session: &mut GameSession, threshold: u32) -> Option<GameEvent> {
    session.currency_taps += 1;
    if session.currency_taps < threshold.max(1) {
        return None;
    }
    session.currency_taps = 0;
    let amount = session.tuning.currency_per_award;
    log::debug!("Currency awarded: {amount}");
    Some(GameEvent::CurrencyAwarded { amount })
}
