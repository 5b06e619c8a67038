//! Spawn placement
//!
//! Picks a spot for a new ball by rejection sampling: draw a uniform point in
//! the inset play area, throw it away if it violates a requested constraint,
//! give up silently after a fixed budget. Crowded screens simply skip a spawn.

use glam::Vec2;
use rand::Rng;

use super::area::PlayArea;
use super::ball::{Ball, BallKind};
use crate::tuning::Tuning;

/// What to spawn and which constraints apply
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnRequest {
    pub kind: BallKind,
    /// Seconds until expiry (ignored when `despawns` is false)
    pub life: f32,
    pub despawns: bool,
    /// Stay `min_separation` away from the Normal ball
    pub avoid_normal: bool,
    /// Stay out of the HUD circle at the area center
    pub avoid_center: bool,
    /// Stay `min_separation` away from every ball
    pub avoid_others: bool,
}

impl SpawnRequest {
    /// The persistent Normal ball: only general collision avoidance
    pub fn normal(skin: u32) -> Self {
        Self {
            kind: BallKind::Normal { skin },
            life: 0.0,
            despawns: false,
            avoid_normal: false,
            avoid_center: false,
            avoid_others: true,
        }
    }

    /// A short-lived special that avoids everything
    pub fn special(kind: BallKind, life: f32) -> Self {
        Self {
            kind,
            life,
            despawns: true,
            avoid_normal: true,
            avoid_center: true,
            avoid_others: true,
        }
    }
}

/// An accepted spawn position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub pos: Vec2,
}

impl Placement {
    /// Turn the placement into a ball born at `now`
    pub fn into_ball(self, id: u32, request: &SpawnRequest, now: f64) -> Ball {
        if request.despawns {
            Ball::ephemeral(id, request.kind, self.pos, now, request.life)
        } else {
            Ball::persistent(id, request.kind, self.pos)
        }
    }
}

/// Whether `point` satisfies every constraint in `request`
pub fn is_clear(point: Vec2, request: &SpawnRequest, balls: &[Ball], area: &PlayArea, tuning: &Tuning) -> bool {
    if request.avoid_center && point.distance(area.center()) < tuning.center_exclusion_radius {
        return false;
    }
    if request.avoid_normal {
        let normal = balls.iter().find(|b| b.kind.is_normal());
        if let Some(normal) = normal {
            if point.distance(normal.pos) < tuning.min_separation {
                return false;
            }
        }
    }
    if request.avoid_others && balls.iter().any(|b| point.distance(b.pos) < tuning.min_separation) {
        return false;
    }
    true
}

/// Try to place a ball. `None` when the area is unset/too small or the budget runs out.
pub fn attempt_spawn<R: Rng>(
    request: &SpawnRequest,
    balls: &[Ball],
    area: &PlayArea,
    rng: &mut R,
    tuning: &Tuning,
) -> Option<Placement> {
    let field = area.inset(tuning.inner_margin)?;

    for _ in 0..tuning.spawn_attempts {
        let point = Vec2::new(
            rng.random_range(field.min.x..=field.max.x),
            rng.random_range(field.min.y..=field.max.y),
        );
        if is_clear(point, request, balls, area, tuning) {
            return Some(Placement { pos: point });
        }
    }

    log::trace!("No room for {:?} after {} attempts", request.kind, tuning.spawn_attempts);
    None
}
