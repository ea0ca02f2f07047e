//! Time-driven decorations: fades, the loading gate, the cursor, magnetic
//! hover offsets and staggered reveals.
//!
//! All of these take "now" as a [`Duration`] since the page started, so they
//! can be driven by the frame clock or stepped by hand in tests.

use std::time::Duration;

use glam::Vec2;

use crate::input::Rect;
use crate::surface::Color;

/// CSS `cubic-bezier(x1, y1, x2, y2)` timing function.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CubicBezier {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl CubicBezier {
    /// Used for the magnetic hover transition.
    pub const ELASTIC: CubicBezier = CubicBezier::new(0.25, 1.0, 0.5, 1.0);
    /// Used for reveal transitions.
    pub const REVEAL: CubicBezier = CubicBezier::new(0.16, 1.0, 0.3, 1.0);
    pub const LINEAR: CubicBezier = CubicBezier::new(0.0, 0.0, 1.0, 1.0);

    pub const fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    fn sample(a1: f32, a2: f32, s: f32) -> f32 {
        let inv = 1.0 - s;
        3.0 * inv * inv * s * a1 + 3.0 * inv * s * s * a2 + s * s * s
    }

    fn slope(a1: f32, a2: f32, s: f32) -> f32 {
        let inv = 1.0 - s;
        3.0 * inv * inv * a1 + 6.0 * inv * s * (a2 - a1) + 3.0 * s * s * (1.0 - a2)
    }

    /// Eased progress for linear progress `t` (clamped to 0..=1).
    pub fn ease(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        if t == 0.0 || t == 1.0 {
            return t;
        }

        // Newton first, bisection if the slope flattens out.
        let mut s = t;
        for _ in 0..8 {
            let err = Self::sample(self.x1, self.x2, s) - t;
            if err.abs() < 1e-6 {
                return Self::sample(self.y1, self.y2, s);
            }
            let d = Self::slope(self.x1, self.x2, s);
            if d.abs() < 1e-6 {
                break;
            }
            s -= err / d;
        }

        let (mut lo, mut hi) = (0.0_f32, 1.0_f32);
        s = t;
        for _ in 0..32 {
            let x = Self::sample(self.x1, self.x2, s);
            if (x - t).abs() < 1e-6 {
                break;
            }
            if x < t {
                lo = s;
            } else {
                hi = s;
            }
            s = (lo + hi) * 0.5;
        }
        Self::sample(self.y1, self.y2, s)
    }
}

fn progress(now: Duration, start: Duration, duration: Duration) -> f32 {
    if duration.is_zero() {
        return 1.0;
    }
    let elapsed = now.saturating_sub(start);
    (elapsed.as_secs_f32() / duration.as_secs_f32()).clamp(0.0, 1.0)
}

/// Static text shown until the particle field is ready, then faded out.
#[derive(Clone, Debug)]
pub struct FallbackText {
    fade: Duration,
    ready_at: Option<Duration>,
}

impl FallbackText {
    pub fn new(fade: Duration) -> Self {
        Self { fade, ready_at: None }
    }

    /// Record readiness. Only the first call starts the fade.
    pub fn mark_ready(&mut self, now: Duration) {
        self.ready_at.get_or_insert(now);
    }

    pub fn is_ready(&self) -> bool {
        self.ready_at.is_some()
    }

    pub fn opacity(&self, now: Duration) -> f32 {
        match self.ready_at {
            None => 1.0,
            Some(at) => 1.0 - progress(now, at, self.fade),
        }
    }
}

/// Full-screen loading overlay.
///
/// Stays up for at least `min_display` and until the particles are ready,
/// then fades out over `fade`.
#[derive(Clone, Debug)]
pub struct LoadingGate {
    min_display: Duration,
    fade: Duration,
    released_at: Option<Duration>,
}

impl LoadingGate {
    pub fn new(min_display: Duration, fade: Duration) -> Self {
        Self {
            min_display,
            fade,
            released_at: None,
        }
    }

    /// Advance the gate. Once released it stays released.
    pub fn update(&mut self, now: Duration, particles_ready: bool) {
        if self.released_at.is_none() && particles_ready && now >= self.min_display {
            self.released_at = Some(now);
        }
    }

    pub fn is_loading(&self) -> bool {
        self.released_at.is_none()
    }

    /// The page behind the overlay becomes visible once the minimum display
    /// time has passed.
    pub fn content_visible(&self, now: Duration) -> bool {
        now >= self.min_display
    }

    pub fn overlay_opacity(&self, now: Duration) -> f32 {
        match self.released_at {
            None => 1.0,
            Some(at) => 1.0 - progress(now, at, self.fade),
        }
    }
}

/// Cursor decoration shape.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CursorStyle {
    pub diameter: f32,
    /// `Some` for the filled dot, `None` for the ring.
    pub fill: Option<Color>,
    pub stroke: Color,
    pub stroke_width: f32,
}

impl CursorStyle {
    /// 16 px black dot with a white rim, or a 48 px black ring over
    /// interactive targets.
    pub fn for_hover(hovering: bool) -> Self {
        if hovering {
            Self {
                diameter: 48.0,
                fill: None,
                stroke: Color::BLACK,
                stroke_width: 2.0,
            }
        } else {
            Self {
                diameter: 16.0,
                fill: Some(Color::BLACK),
                stroke: Color::WHITE,
                stroke_width: 1.0,
            }
        }
    }
}

/// Element offset that follows the pointer while hovered.
#[derive(Clone, Debug)]
pub struct Magnetic {
    sensitivity: f32,
    duration: Duration,
    easing: CubicBezier,
    from: Vec2,
    to: Vec2,
    started: Duration,
}

impl Magnetic {
    pub fn new(sensitivity: f32, duration: Duration) -> Self {
        Self {
            sensitivity,
            duration,
            easing: CubicBezier::ELASTIC,
            from: Vec2::ZERO,
            to: Vec2::ZERO,
            started: Duration::ZERO,
        }
    }

    /// Resting offset for a pointer over `rect`.
    pub fn target_for(&self, pointer: Vec2, rect: Rect) -> Vec2 {
        (pointer - rect.center()) * self.sensitivity
    }

    fn retarget(&mut self, to: Vec2, now: Duration) {
        self.from = self.offset(now);
        self.to = to;
        self.started = now;
    }

    pub fn pointer_moved(&mut self, pointer: Vec2, rect: Rect, now: Duration) {
        let to = self.target_for(pointer, rect);
        self.retarget(to, now);
    }

    pub fn pointer_left(&mut self, now: Duration) {
        self.retarget(Vec2::ZERO, now);
    }

    /// Current eased offset.
    pub fn offset(&self, now: Duration) -> Vec2 {
        let t = self.easing.ease(progress(now, self.started, self.duration));
        self.from.lerp(self.to, t)
    }
}

impl Default for Magnetic {
    fn default() -> Self {
        Self::new(0.15, Duration::from_millis(300))
    }
}

/// Visual state of one revealed child.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Reveal {
    pub opacity: f32,
    /// Downward offset in pixels.
    pub offset_y: f32,
}

/// Scroll-triggered reveal of a group of children, one after another.
#[derive(Clone, Debug)]
pub struct RevealStagger {
    delay: Duration,
    duration: Duration,
    threshold: f32,
    distance: f32,
    visible_at: Option<Duration>,
}

impl RevealStagger {
    pub fn new(delay: Duration, duration: Duration) -> Self {
        Self {
            delay,
            duration,
            threshold: 0.15,
            distance: 40.0,
            visible_at: None,
        }
    }

    /// Feed the group's current intersection ratio. Becomes visible once and
    /// stays visible.
    pub fn observe(&mut self, intersection_ratio: f32, now: Duration) {
        if self.visible_at.is_none() && intersection_ratio >= self.threshold {
            self.visible_at = Some(now);
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible_at.is_some()
    }

    pub fn child(&self, index: usize, now: Duration) -> Reveal {
        let Some(at) = self.visible_at else {
            return Reveal {
                opacity: 0.0,
                offset_y: self.distance,
            };
        };
        let start = at + self.delay * index as u32;
        let t = CubicBezier::REVEAL.ease(progress(now, start, self.duration));
        Reveal {
            opacity: t,
            offset_y: self.distance * (1.0 - t),
        }
    }
}

impl Default for RevealStagger {
    fn default() -> Self {
        Self::new(Duration::from_millis(150), Duration::from_millis(1200))
    }
}
