//! Bubble Pop - gameplay core for a casual tap/pop game
//!
//! Core modules:
//! - `sim`: Tick-driven simulation (spawning, expiry, taps, session state)
//! - `tuning`: Data-driven game balance
//! - `driver`: Fixed-step driver with a serialized tap queue
//! - `campaign`: Time Trial level progression
//! - `progress`: Currency, unlocks and high scores fed by session events

pub mod campaign;
pub mod driver;
pub mod progress;
pub mod sim;
pub mod tuning;

pub use campaign::{CampaignStep, TimeTrialCampaign};
pub use driver::{FixedStepDriver, TapQueue};
pub use progress::{PlayerProgress, ShopCategory};
pub use sim::{
    Ball, BallKind, GameEvent, GameMode, GameOutcome, GameSession, Level, PlayArea,
    SessionConfig, handle_tap, tick,
};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Reference simulation timestep (60 Hz). Spawn chances are per step of this size.
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Lives are never above this
    pub const MAX_LIVES: u8 = 3;
    /// Starting lives for Normal / Risk+ sessions
    pub const DEFAULT_LIVES: u8 = 3;
    /// Starting time for Normal / Risk+ sessions (seconds)
    pub const DEFAULT_TIME: f32 = 60.0;

    /// Number of levels in the Time Trial catalog
    pub const LEVEL_COUNT: usize = 100;
    /// Currency granted for clearing a Time Trial level
    pub const LEVEL_CLEAR_REWARD: u32 = 2;
}
