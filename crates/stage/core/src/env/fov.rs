//! Field-of-view oracle.

use crate::config::StageConfig;
use crate::state::Position;

use super::MapView;

/// Computes which cells are visible from an origin.
pub trait FovOracle: Send + Sync {
    /// Returns every position visible from `origin`, including the origin.
    fn compute_visible(&self, map: &MapView<'_>, origin: Position) -> Vec<Position>;
}

/// Straight-line ray casting within a circular radius.
///
/// A target is visible when every cell strictly between it and the origin is
/// transparent; the target itself may be opaque, so walls bounding a room
/// are seen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RaycastFov {
    radius: u32,
}

impl RaycastFov {
    pub const fn new(radius: u32) -> Self {
        Self { radius }
    }

    pub fn from_config(config: &StageConfig) -> Self {
        Self::new(config.fov_radius)
    }

    pub fn radius(&self) -> u32 {
        self.radius
    }

    fn line_is_clear(map: &MapView<'_>, from: Position, to: Position) -> bool {
        let (dx, dy) = ((to.x - from.x).abs(), -(to.y - from.y).abs());
        let (sx, sy) = (
            if from.x < to.x { 1 } else { -1 },
            if from.y < to.y { 1 } else { -1 },
        );
        let mut error = dx + dy;
        let mut current = from;

        loop {
            if current == to {
                return true;
            }
            if current != from && !map.is_transparent(current) {
                return false;
            }
            let doubled = 2 * error;
            if doubled >= dy {
                error += dy;
                current.x += sx;
            }
            if doubled <= dx {
                error += dx;
                current.y += sy;
            }
        }
    }
}

impl Default for RaycastFov {
    fn default() -> Self {
        Self::new(StageConfig::DEFAULT_FOV_RADIUS)
    }
}

impl FovOracle for RaycastFov {
    fn compute_visible(&self, map: &MapView<'_>, origin: Position) -> Vec<Position> {
        if !map.contains(origin) {
            return Vec::new();
        }

        let radius = self.radius as i32;
        let radius_sq = radius * radius;
        let mut visible = Vec::new();

        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dx * dx + dy * dy > radius_sq {
                    continue;
                }
                let target = Position::new(origin.x + dx, origin.y + dy);
                if map.contains(target) && Self::line_is_clear(map, origin, target) {
                    visible.push(target);
                }
            }
        }
        visible
    }
}
