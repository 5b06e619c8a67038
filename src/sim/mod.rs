//! Gameplay simulation module
//!
//! All gameplay logic lives here. This module must stay free of rendering,
//! audio and storage concerns:
//! - Time only advances through `tick(dt)`
//! - Randomness only from the session's seeded RNG
//! - State changes are reported as returned `GameEvent`s

pub mod area;
pub mod ball;
pub mod level;
pub mod spawn;
pub mod state;
pub mod tap;
pub mod tick;

pub use area::PlayArea;
pub use ball::{Ball, BallKind, KindTag};
pub use level::{Level, catalog, generate};
pub use spawn::{Placement, SpawnRequest, attempt_spawn};
pub use state::{GameEvent, GameMode, GameOutcome, GameSession, SessionConfig};
pub use tap::handle_tap;
pub use tick::tick;
