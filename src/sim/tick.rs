//! Simulation tick
//!
//! Advances the session clock, runs the countdown, sweeps expired balls and
//! rolls the per-mode spawn chances. Chances are per reference step
//! (`SIM_DT`) and are rescaled for other step sizes.

use rand::Rng;

use super::ball::{BallKind, KindTag};
use super::spawn::SpawnRequest;
use super::state::{GameEvent, GameMode, GameOutcome, GameSession};
use crate::consts::*;
use crate::tuning::SpawnRule;

/// Advance the session by `dt` seconds
pub fn tick(session: &mut GameSession, dt: f32) -> Vec<GameEvent> {
    let mut events = Vec::new();

    // Don't tick if paused or game over
    if session.paused || session.outcome.is_some() {
        return events;
    }
    if !(dt.is_finite() && dt > 0.0) {
        return events;
    }

    session.clock += f64::from(dt);

    // Countdown (untimed Time Trial levels skip it)
    if session.is_timed() {
        session.time_remaining -= dt;
        if session.time_remaining <= 0.0 {
            events.push(session.end(GameOutcome::TimeUp));
            return events;
        }
    }

    sweep_expired(session);
    spawn_for_mode(session, dt);

    events
}

/// Drop despawning balls whose expiry plus grace has passed
fn sweep_expired(session: &mut GameSession) {
    let now = session.clock;
    let grace = session.tuning.despawn_grace;
    session.balls.retain(|b| !b.is_expired(now, grace));
}

fn spawn_for_mode(session: &mut GameSession, dt: f32) {
    session.ensure_normal();

    let tuning = session.tuning;
    match session.mode() {
        GameMode::Normal => {
            roll_special(session, BallKind::Red, tuning.normal_red, dt);
        }
        GameMode::RiskPlus => {
            roll_special(session, BallKind::Red, tuning.risk_red, dt);
            if session.lives < MAX_LIVES {
                roll_special(session, BallKind::Gold, tuning.gold, dt);
            }
            roll_special(session, BallKind::Blue, tuning.blue, dt);
            roll_special(session, BallKind::Green, tuning.green, dt);
        }
        GameMode::TimeTrial => {
            let level = session.level();
            let red = tuning.trial_red.rule_for(level.map(|l| l.red_chance));
            let specials = level.is_some_and(|l| l.specials);

            roll_special(session, BallKind::Red, red, dt);
            if specials {
                roll_special(session, BallKind::Blue, tuning.blue, dt);
                roll_special(session, BallKind::Green, tuning.green, dt);
                if session.lives < MAX_LIVES {
                    roll_special(session, BallKind::Gold, tuning.gold, dt);
                }
            }
        }
    }
}

/// Roll one kind's chance and, on success, try to place it. One of each kind at a time.
fn roll_special(session: &mut GameSession, kind: BallKind, rule: SpawnRule, dt: f32) {
    debug_assert!(kind.tag() != KindTag::Normal);
    if session.has_kind(kind.tag()) {
        return;
    }
    let p = step_chance(rule.chance, dt);
    if session.rng.random::<f32>() >= p {
        return;
    }
    let lo = rule.life_min.min(rule.life_max);
    let hi = rule.life_min.max(rule.life_max);
    let life = session.rng.random_range(lo..=hi);
    session.try_spawn(SpawnRequest::special(kind, life));
}

/// Chance over a step of `dt`, given chance `p` per `SIM_DT` step
pub fn step_chance(p: f32, dt: f32) -> f32 {
    if p <= 0.0 {
        return 0.0;
    }
    if p >= 1.0 {
        return 1.0;
    }
    if dt == SIM_DT {
        return p;
    }
    1.0 - (1.0 - p).powf(dt / SIM_DT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::area::PlayArea;
    use crate::sim::level::{Level, catalog};
    use crate::sim::state::SessionConfig;
    use crate::tuning::Tuning;
    use glam::Vec2;
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn phone_area() -> PlayArea {
        PlayArea::from_origin_size(Vec2::ZERO, Vec2::new(390.0, 700.0))
    }

    fn session_in(config: SessionConfig, seed: u64) -> GameSession {
        let mut session = GameSession::new(config, seed);
        session.set_play_area(phone_area());
        session
    }

    /// Kind and lifespan of every ball that appears over `steps` ticks
    fn spawned_lifespans(session: &mut GameSession, steps: usize) -> Vec<(KindTag, Option<f64>)> {
        let mut seen = HashSet::new();
        let mut spawned = Vec::new();
        for _ in 0..steps {
            tick(session, SIM_DT);
            let now = session.clock();
            for ball in session.balls() {
                if seen.insert(ball.id) {
                    spawned.push((ball.kind.tag(), ball.expires_at.map(|at| at - now)));
                }
            }
        }
        spawned
    }

    /// Every special spawn is a listed kind with a lifespan in its range, and every listed kind shows up
    fn assert_lifespans(spawned: &[(KindTag, Option<f64>)], ranges: &[(KindTag, f32, f32)]) {
        for &(tag, life) in spawned {
            if tag == KindTag::Normal {
                assert_eq!(life, None);
                continue;
            }
            let &(_, lo, hi) = ranges
                .iter()
                .find(|(t, ..)| *t == tag)
                .unwrap_or_else(|| panic!("unexpected {tag:?} spawn"));
            let life = life.expect("specials expire");
            assert!(
                life >= f64::from(lo) - 1e-6 && life <= f64::from(hi) + 1e-6,
                "{tag:?} lifespan {life} outside {lo}..={hi}"
            );
        }
        for &(tag, ..) in ranges {
            assert!(spawned.iter().any(|(t, _)| *t == tag), "no {tag:?} spawned");
        }
    }

    /// Untimed Time Trial level with the given red chance and specials switch
    fn endless_level(red_chance: f32, specials: bool) -> Level {
        Level {
            target_taps: None,
            time_limit: None,
            lives: 2,
            red_chance,
            specials,
            ..catalog()[0].clone()
        }
    }

    #[test]
    fn test_normal_mode_spawns_only_red() {
        let mut session = session_in(SessionConfig::normal().with_time(10_000.0), 606);
        let spawned = spawned_lifespans(&mut session, 600 * 60);
        assert_lifespans(&spawned, &[(KindTag::Red, 0.80, 1.05)]);
    }

    #[test]
    fn test_risk_plus_lifespans() {
        let mut session = session_in(SessionConfig::risk_plus().with_time(10_000.0).with_lives(2), 707);
        let spawned = spawned_lifespans(&mut session, 600 * 60);
        assert_lifespans(
            &spawned,
            &[
                (KindTag::Red, 0.80, 1.10),
                (KindTag::Gold, 0.55, 0.75),
                (KindTag::Blue, 0.45, 0.65),
                (KindTag::Green, 0.60, 0.90),
            ],
        );
    }

    #[test]
    fn test_time_trial_lifespans() {
        let mut session = session_in(SessionConfig::time_trial(endless_level(0.2, true)), 808);
        let spawned = spawned_lifespans(&mut session, 600 * 60);
        assert_lifespans(
            &spawned,
            &[
                (KindTag::Red, 0.65, 0.85),
                (KindTag::Gold, 0.55, 0.75),
                (KindTag::Blue, 0.45, 0.65),
                (KindTag::Green, 0.60, 0.90),
            ],
        );

        let mut session = session_in(SessionConfig::time_trial(endless_level(0.2, false)), 808);
        let spawned = spawned_lifespans(&mut session, 600 * 60);
        assert_lifespans(&spawned, &[(KindTag::Red, 0.65, 0.85)]);
    }

    #[test]
    fn test_time_trial_red_chance_from_level() {
        // 4.0 * 0.25 is a certain roll: red on the first tick
        let mut session = session_in(SessionConfig::time_trial(endless_level(4.0, false)), 3);
        tick(&mut session, SIM_DT);
        assert!(session.has_kind(KindTag::Red));

        // Zero level chance still rolls at the floor
        let mut session = session_in(SessionConfig::time_trial(endless_level(0.0, false)), 3);
        let spawned = spawned_lifespans(&mut session, 100 * 60);
        assert!(spawned.iter().any(|(t, _)| *t == KindTag::Red));

        // Without the floor, nothing
        let mut tuning = Tuning::default();
        tuning.trial_red.floor = 0.0;
        let mut session = GameSession::with_tuning(SessionConfig::time_trial(endless_level(0.0, false)), tuning, 3);
        session.set_play_area(phone_area());
        for _ in 0..600 {
            tick(&mut session, SIM_DT);
            assert!(!session.has_kind(KindTag::Red));
        }
    }

    #[test]
    fn test_clock_advances_in_long_untimed_runs() {
        let mut session = session_in(SessionConfig::time_trial(endless_level(0.0, false)), 4);
        // About a week of play, past where an f32 clock stalls
        session.clock = 600_000.0;
        let red = session
            .insert_ball(BallKind::Red, Vec2::new(60.0, 60.0), Some(0.5))
            .expect("inserted");

        tick(&mut session, SIM_DT);
        assert!(session.clock() > 600_000.0);
        for _ in 0..60 {
            tick(&mut session, SIM_DT);
        }
        assert!(session.clock() > 600_000.99);
        assert!(session.ball(red).is_none());
    }

    #[test]
    fn test_first_tick_spawns_normal() {
        let mut session = session_in(SessionConfig::normal(), 12345);
        let events = tick(&mut session, SIM_DT);
        assert!(events.is_empty());
        assert!(session.has_kind(KindTag::Normal));
        assert!((session.time_remaining() - (60.0 - SIM_DT)).abs() < 1e-4);
    }

    #[test]
    fn test_normal_ball_skin_follows_config() {
        let mut session = session_in(SessionConfig::normal().with_skin(4), 1);
        tick(&mut session, SIM_DT);
        let normal = session.balls().iter().find(|b| b.kind.is_normal()).expect("spawned");
        assert_eq!(normal.kind, BallKind::Normal { skin: 4 });
        assert!(!normal.despawns);
        assert_eq!(normal.expires_at, None);
    }

    #[test]
    fn test_no_spawn_without_play_area() {
        let mut session = GameSession::new(SessionConfig::risk_plus(), 5);
        for _ in 0..600 {
            tick(&mut session, SIM_DT);
        }
        assert!(session.balls().is_empty());
        assert!(!session.is_over());
    }

    #[test]
    fn test_tick_pause() {
        let mut session = session_in(SessionConfig::risk_plus(), 12345);
        for _ in 0..30 {
            tick(&mut session, SIM_DT);
        }
        session.pause_toggle();
        let balls = session.balls().to_vec();
        let time = session.time_remaining();
        let clock = session.clock();

        for _ in 0..600 {
            assert!(tick(&mut session, SIM_DT).is_empty());
        }
        assert_eq!(session.balls(), balls.as_slice());
        assert_eq!(session.time_remaining(), time);
        assert_eq!(session.clock(), clock);

        // Unpause
        session.pause_toggle();
        tick(&mut session, SIM_DT);
        assert!(session.time_remaining() < time);
    }

    #[test]
    fn test_time_up() {
        let mut session = session_in(SessionConfig::normal(), 1);
        let events = tick(&mut session, 60.0);
        assert_eq!(
            events,
            vec![GameEvent::GameOver {
                outcome: GameOutcome::TimeUp,
                score: 0
            }]
        );
        assert!(session.is_over());
        assert_eq!(session.time_remaining(), 0.0);
        assert!(!session.outcome().is_some_and(|o| o.is_win()));

        // Terminal: further ticks do nothing
        assert!(tick(&mut session, SIM_DT).is_empty());
    }

    #[test]
    fn test_time_up_clamps_overshoot() {
        let mut session = session_in(SessionConfig::normal().with_time(1.0), 1);
        let events = tick(&mut session, 1.5);
        assert_eq!(events.len(), 1);
        assert_eq!(session.time_remaining(), 0.0);
    }

    #[test]
    fn test_untimed_level_never_times_out() {
        let level = catalog()[39].clone();
        let mut session = session_in(SessionConfig::time_trial(level), 9);
        for _ in 0..(120 * 60) {
            tick(&mut session, SIM_DT);
        }
        // Reds are never tapped, so nothing else can end the session
        assert!(!session.is_over());
        assert_eq!(session.time_remaining(), DEFAULT_TIME);
    }

    #[test]
    fn test_invalid_dt_ignored() {
        let mut session = session_in(SessionConfig::normal(), 1);
        tick(&mut session, 0.0);
        tick(&mut session, -1.0);
        tick(&mut session, f32::NAN);
        assert_eq!(session.time_remaining(), 60.0);
        assert!(session.balls().is_empty());
    }

    #[test]
    fn test_expiry_sweep_with_grace() {
        let mut session = session_in(SessionConfig::normal(), 1);
        let red = session
            .insert_ball(BallKind::Red, Vec2::new(60.0, 60.0), Some(0.5))
            .expect("inserted");
        // Past expiry but inside the grace window
        tick(&mut session, 0.6);
        assert!(session.ball(red).is_some());
        tick(&mut session, 0.2);
        assert!(session.ball(red).is_none());
    }

    #[test]
    fn test_expiry_never_removes_persistent() {
        let mut tuning = Tuning::default();
        tuning.normal_red.chance = 0.0;
        let mut session = GameSession::with_tuning(SessionConfig::normal().with_time(10_000.0), tuning, 3);
        session.set_play_area(phone_area());
        let pinned = session
            .insert_ball(BallKind::Red, Vec2::new(60.0, 60.0), None)
            .expect("inserted");
        for _ in 0..100 {
            tick(&mut session, 50.0);
        }
        assert!(session.ball(pinned).is_some());
    }

    #[test]
    fn test_focus_level_has_no_specials() {
        let level = catalog()[45].clone();
        assert!(!level.specials);
        let mut session = session_in(SessionConfig::time_trial(level), 77);
        for _ in 0..3000 {
            tick(&mut session, SIM_DT);
            assert!(!session.has_kind(KindTag::Blue));
            assert!(!session.has_kind(KindTag::Green));
            assert!(!session.has_kind(KindTag::Gold));
            if session.is_over() {
                break;
            }
        }
    }

    #[test]
    fn test_gold_needs_missing_life() {
        let mut tuning = Tuning::default();
        tuning.gold.chance = 1.0;
        let mut session = GameSession::with_tuning(SessionConfig::risk_plus(), tuning, 21);
        session.set_play_area(phone_area());
        for _ in 0..300 {
            tick(&mut session, SIM_DT);
            assert!(!session.has_kind(KindTag::Gold));
        }

        // Drop to two lives: gold now appears on the next free slot
        session.lives = 2;
        let mut seen = false;
        for _ in 0..60 {
            tick(&mut session, SIM_DT);
            seen |= session.has_kind(KindTag::Gold);
        }
        assert!(seen);
    }

    #[test]
    fn test_risk_plus_spawns_all_specials() {
        let mut session = session_in(SessionConfig::risk_plus().with_time(1_000.0), 4242);
        session.lives = 2;
        let mut seen = std::collections::HashSet::new();
        for _ in 0..(600 * 60) {
            tick(&mut session, SIM_DT);
            for ball in session.balls() {
                seen.insert(ball.kind.tag());
            }
            if seen.len() == KindTag::ALL.len() {
                break;
            }
        }
        assert_eq!(seen.len(), KindTag::ALL.len());
    }

    #[test]
    fn test_step_chance() {
        assert_eq!(step_chance(0.01, SIM_DT), 0.01);
        assert_eq!(step_chance(0.0, 1.0), 0.0);
        assert_eq!(step_chance(1.0, 0.001), 1.0);
        // Two reference steps at once ~= two independent rolls
        let two = step_chance(0.01, 2.0 * SIM_DT);
        assert!((two - (1.0 - 0.99_f32 * 0.99)).abs() < 1e-5);
        assert!(step_chance(0.01, SIM_DT / 2.0) < 0.01);
    }

    #[test]
    fn test_determinism() {
        // Two sessions with the same seed produce identical results
        let mut a = session_in(SessionConfig::risk_plus(), 99999);
        let mut b = session_in(SessionConfig::risk_plus(), 99999);
        for _ in 0..1000 {
            tick(&mut a, SIM_DT);
            tick(&mut b, SIM_DT);
        }
        assert_eq!(a.balls(), b.balls());
        assert_eq!(a.time_remaining(), b.time_remaining());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_at_most_one_per_kind(seed in any::<u64>(), mode_idx in 0usize..3, steps in 1usize..2000) {
            let config = match mode_idx {
                0 => SessionConfig::normal(),
                1 => SessionConfig::risk_plus().with_lives(2),
                _ => SessionConfig::time_trial(catalog()[55].clone()),
            };
            let mut session = session_in(config, seed);
            for _ in 0..steps {
                tick(&mut session, SIM_DT);
                for tag in KindTag::ALL {
                    let count = session.balls().iter().filter(|b| b.kind.tag() == tag).count();
                    prop_assert!(count <= 1, "{:?} x{}", tag, count);
                }
            }
        }

        #[test]
        fn prop_over_session_is_frozen(seed in any::<u64>(), steps in 1usize..200) {
            let mut session = session_in(SessionConfig::risk_plus().with_time(0.5), seed);
            for _ in 0..60 {
                tick(&mut session, SIM_DT);
            }
            prop_assert!(session.is_over());
            let balls = session.balls().to_vec();
            let (score, lives, time) = (session.score(), session.lives(), session.time_remaining());
            for _ in 0..steps {
                prop_assert!(tick(&mut session, SIM_DT).is_empty());
            }
            prop_assert_eq!(session.balls(), balls.as_slice());
            prop_assert_eq!((session.score(), session.lives(), session.time_remaining()), (score, lives, time));
        }
    }
}
