//! Fixed-step driver
//!
//! Input arrives whenever the platform delivers it; the simulation wants
//! whole steps. Taps are queued between frames and applied at the start of
//! the next frame, then the accumulated frame time is spent in `SIM_DT` steps.
//! Everything runs on the caller's thread, so taps and ticks never interleave.

use crate::consts::{MAX_SUBSTEPS, SIM_DT};
use crate::sim::{GameEvent, GameSession, handle_tap, tick};

/// Pending ball taps, in arrival order
#[derive(Debug, Clone, Default)]
pub struct TapQueue {
    taps: Vec<u32>,
}

impl TapQueue {
    pub fn new() -> Self {
        Self {
            taps: Vec::with_capacity(8),
        }
    }

    /// Queue a tap on ball `id`
    pub fn push(&mut self, id: u32) {
        self.taps.push(id);
    }

    /// Take every pending tap, leaving the queue empty
    pub fn drain(&mut self) -> Vec<u32> {
        std::mem::take(&mut self.taps)
    }

    pub fn is_empty(&self) -> bool {
        self.taps.is_empty()
    }

    pub fn len(&self) -> usize {
        self.taps.len()
    }
}

/// Runs a session at a fixed rate from variable frame times
#[derive(Debug, Clone, Default)]
pub struct FixedStepDriver {
    accumulator: f32,
    taps: TapQueue,
}

impl FixedStepDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a tap for the next frame
    pub fn queue_tap(&mut self, id: u32) {
        self.taps.push(id);
    }

    pub fn pending_taps(&self) -> usize {
        self.taps.len()
    }

    /// Apply queued taps, then run as many fixed steps as `frame_dt` covers
    pub fn frame(&mut self, session: &mut GameSession, frame_dt: f32) -> Vec<GameEvent> {
        let mut events = Vec::new();

        for id in self.taps.drain() {
            events.extend(handle_tap(session, id));
        }

        // Paused sessions don't bank time for later
        if session.is_paused() || session.is_over() {
            self.accumulator = 0.0;
            return events;
        }

        let frame_dt = if frame_dt.is_finite() { frame_dt.max(0.0) } else { 0.0 };
        self.accumulator = (self.accumulator + frame_dt).min(SIM_DT * MAX_SUBSTEPS as f32);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            events.extend(tick(session, SIM_DT));
            self.accumulator -= SIM_DT;
            substeps += 1;
            if session.is_over() {
                self.accumulator = 0.0;
                break;
            }
        }

        events
    }

    /// Forget banked time and pending taps (after a restart)
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
        self.taps.drain();
    }
}
