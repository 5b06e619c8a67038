//! Bubble Pop headless runner
//!
//! Plays a Normal session and the Time Trial campaign opening with a simple
//! bot, logging what happens. Useful for balance checks: `RUST_LOG=debug`.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Bubble Pop (headless) starting...");

    let seed: u64 = rand::random();
    log::info!("Seed: {seed}");

    autoplay::run(seed);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The wasm build is driven by the embedding page, not a binary entry point
}

#[cfg(not(target_arch = "wasm32"))]
mod autoplay {
    use bubble_pop::consts::SIM_DT;
    use bubble_pop::sim::{BallKind, GameSession, PlayArea, SessionConfig};
    use bubble_pop::{CampaignStep, FixedStepDriver, PlayerProgress, TimeTrialCampaign};
    use glam::Vec2;

    /// Frames between bot taps (~0.3s reaction time)
    const REACTION_FRAMES: u32 = 18;
    /// Give up on a level after this many attempts
    const MAX_ATTEMPTS: u32 = 5;
    /// Levels to try before stopping
    const LEVELS_TO_PLAY: usize = 3;

    fn screen() -> PlayArea {
        // Phone-sized view minus the HUD bars
        PlayArea::from_origin_size(Vec2::ZERO, Vec2::new(390.0, 844.0)).inset_vertical(120.0)
    }

    /// Pick the ball the bot wants: anything but Red, specials first
    fn choose_target(session: &GameSession) -> Option<u32> {
        session
            .balls()
            .iter()
            .filter(|b| b.kind != BallKind::Red)
            .min_by_key(|b| b.kind.is_normal())
            .map(|b| b.id)
    }

    /// Drive a session to its end at 60 fps, feeding its events into progress
    fn play(session: &mut GameSession, progress: &mut PlayerProgress) {
        let mut driver = FixedStepDriver::new();
        let mut frame = 0u32;
        while !session.is_over() {
            frame += 1;
            if frame % REACTION_FRAMES == 0 {
                if let Some(id) = choose_target(session) {
                    driver.queue_tap(id);
                }
            }
            let events = driver.frame(session, SIM_DT);
            progress.apply_events(session.mode(), &events);
        }
        log::info!(
            "{} finished: {:?}, score={}, lives={}",
            session.mode().as_str(),
            session.outcome(),
            session.score(),
            session.lives()
        );
    }

    pub fn run(seed: u64) {
        let mut progress = PlayerProgress::load_or_default(None);

        let mut session = GameSession::new(SessionConfig::normal().with_skin(progress.selected_ball), seed);
        session.set_play_area(screen());
        play(&mut session, &mut progress);

        let mut campaign = TimeTrialCampaign::default();
        let mut attempts = 0;
        let mut played = 0;
        while played < LEVELS_TO_PLAY && attempts < MAX_ATTEMPTS {
            let run_seed = seed.wrapping_add((played as u64 + 1) * 1000 + u64::from(attempts));
            let Some(mut session) = campaign.start_session(progress.selected_ball, run_seed) else {
                break;
            };
            session.set_play_area(screen());
            play(&mut session, &mut progress);
            attempts += 1;

            match campaign.finish_session(&session, &mut progress) {
                Some(CampaignStep::Advanced { next_level }) => {
                    log::info!("Cleared; next up is level {next_level}");
                    played += 1;
                    attempts = 0;
                }
                Some(CampaignStep::Completed) => break,
                Some(CampaignStep::Replay) | None => {}
            }
        }

        match progress.to_json() {
            Ok(json) => log::info!("Progress snapshot: {json}"),
            Err(err) => log::warn!("Could not serialize progress: {err}"),
        }
    }
}
