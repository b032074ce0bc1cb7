// Copyright 2025 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pan-drag velocity tracking.
//!
//! ## Usage
//!
//! 1) Call [`PanDrag::start`] on pointer-down with the event timestamp.
//! 2) On each pointer-move, call [`PanDrag::update`] with the movement
//!    delta; the smoothed velocity accumulates internally.
//! 3) On pointer-up, call [`PanDrag::finish`] to obtain the release
//!    velocity for inertia, with the idle rules applied.
//! 4) [`PanDrag::cancel`] abandons the drag with no release velocity.
//!
//! ## Minimal example
//!
//! ```
//! use kurbo::Vec2;
//! use easel_view2d::drag::PanDrag;
//!
//! let mut drag = PanDrag::default();
//! drag.start(0.0);
//! drag.update(Vec2::new(8.0, 0.0), 16.0);
//! drag.update(Vec2::new(8.0, 0.0), 32.0);
//!
//! // Released promptly: the smoothed velocity survives, decayed by the
//! // idle time.
//! let v = drag.finish(48.0);
//! assert!(v.x > 0.0);
//! assert!(!drag.is_active());
//! ```

use kurbo::Vec2;

/// Exponential-moving-average velocity tracker for pan drags.
///
/// Velocities are in CSS pixels per millisecond. The tracker only smooths
/// and releases velocity; applying movement to a camera is the caller's
/// job.
#[derive(Clone, Copy, Debug)]
pub struct PanDrag {
    active: bool,
    velocity: Vec2,
    last_move_ms: f64,
    /// Blend factor for new movement samples.
    pub ema_alpha: f64,
    /// Hold time (ms) after which release carries no inertia.
    pub idle_no_inertia_ms: f64,
    /// Velocity decay per 16 ms of idle time at release.
    pub friction: f64,
    /// Speed below which the release velocity snaps to zero.
    pub stop_speed: f64,
}

impl Default for PanDrag {
    fn default() -> Self {
        Self {
            active: false,
            velocity: Vec2::ZERO,
            last_move_ms: 0.0,
            ema_alpha: 0.25,
            idle_no_inertia_ms: 120.0,
            friction: 0.92,
            stop_speed: 0.02,
        }
    }
}

impl PanDrag {
    /// Create a tracker with explicit tuning parameters.
    #[must_use]
    pub fn with_params(
        ema_alpha: f64,
        idle_no_inertia_ms: f64,
        friction: f64,
        stop_speed: f64,
    ) -> Self {
        Self {
            ema_alpha,
            idle_no_inertia_ms,
            friction,
            stop_speed,
            ..Self::default()
        }
    }

    /// Begin tracking a drag at `now_ms`.
    pub fn start(&mut self, now_ms: f64) {
        self.active = true;
        self.velocity = Vec2::ZERO;
        self.last_move_ms = now_ms;
    }

    /// Record a movement sample, updating the smoothed velocity.
    ///
    /// Returns the movement unchanged so callers can forward it to the
    /// camera in the same expression. No-op while inactive.
    pub fn update(&mut self, movement: Vec2, now_ms: f64) -> Vec2 {
        if !self.active {
            return Vec2::ZERO;
        }
        let dt = (now_ms - self.last_move_ms).max(1.0);
        self.last_move_ms = now_ms;
        let sample = movement / dt;
        self.velocity = self.velocity * (1.0 - self.ema_alpha) + sample * self.ema_alpha;
        movement
    }

    /// End the drag and return the release velocity.
    ///
    /// A pointer held still for at least `idle_no_inertia_ms` releases
    /// dead; shorter pauses decay the velocity by `friction` per 16 ms of
    /// idle time. Speeds below `stop_speed` snap to zero.
    pub fn finish(&mut self, now_ms: f64) -> Vec2 {
        if !self.active {
            return Vec2::ZERO;
        }
        self.active = false;
        let idle = (now_ms - self.last_move_ms).max(0.0);
        let mut v = if idle >= self.idle_no_inertia_ms {
            Vec2::ZERO
        } else {
            self.velocity * self.friction.powf(idle / 16.0)
        };
        if v.hypot() < self.stop_speed {
            v = Vec2::ZERO;
        }
        self.velocity = Vec2::ZERO;
        v
    }

    /// Abandon the drag without producing a release velocity.
    pub fn cancel(&mut self) {
        self.active = false;
        self.velocity = Vec2::ZERO;
    }

    /// Returns `true` while a drag is being tracked.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// The current smoothed velocity (CSS px/ms).
    #[must_use]
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }
}
