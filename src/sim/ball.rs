//! Ball entities
//!
//! A ball is a tappable target. Its kind decides what a tap does; Normal balls
//! persist until tapped, every other kind despawns shortly after appearing.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// What a ball is, and so what tapping it does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BallKind {
    /// +1 score; drawn with the player's selected skin
    Normal { skin: u32 },
    /// -1 life
    Red,
    /// +5 score
    Blue,
    /// +1 life (only below the cap)
    Gold,
    /// +3 seconds
    Green,
}

/// Kind without payload, for "is one of these already on screen" checks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KindTag {
    Normal,
    Red,
    Blue,
    Gold,
    Green,
}

impl KindTag {
    pub const ALL: [KindTag; 5] = [
        KindTag::Normal,
        KindTag::Red,
        KindTag::Blue,
        KindTag::Gold,
        KindTag::Green,
    ];
}

impl BallKind {
    pub fn tag(&self) -> KindTag {
        match self {
            BallKind::Normal { .. } => KindTag::Normal,
            BallKind::Red => KindTag::Red,
            BallKind::Blue => KindTag::Blue,
            BallKind::Gold => KindTag::Gold,
            BallKind::Green => KindTag::Green,
        }
    }

    /// Short effect badge drawn on special balls
    pub fn label(&self) -> Option<&'static str> {
        match self {
            BallKind::Normal { .. } => None,
            BallKind::Red => Some("-1"),
            BallKind::Blue => Some("+5"),
            BallKind::Gold => Some("+1"),
            BallKind::Green => Some("+3"),
        }
    }

    #[inline]
    pub fn is_normal(&self) -> bool {
        matches!(self, BallKind::Normal { .. })
    }
}

/// An active on-screen ball
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub id: u32,
    pub kind: BallKind,
    pub pos: Vec2,
    /// Session-clock time (seconds) after which the ball may be swept; `None` = persistent
    pub expires_at: Option<f64>,
    /// Whether the expiry sweep may remove this ball
    pub despawns: bool,
}

impl Ball {
    /// A ball that stays until tapped
    pub fn persistent(id: u32, kind: BallKind, pos: Vec2) -> Self {
        Self {
            id,
            kind,
            pos,
            expires_at: None,
            despawns: false,
        }
    }

    /// A ball that expires `life` seconds after `now`
    pub fn ephemeral(id: u32, kind: BallKind, pos: Vec2, now: f64, life: f32) -> Self {
        Self {
            id,
            kind,
            pos,
            expires_at: Some(now + f64::from(life)),
            despawns: true,
        }
    }

    /// Expired once the clock is past expiry plus the tap-forgiveness grace
    pub fn is_expired(&self, now: f64, grace: f32) -> bool {
        match (self.despawns, self.expires_at) {
            (true, Some(expiry)) => expiry + f64::from(grace) < now,
            _ => false,
        }
    }
}
