//! Pointer tracking for the cursor decoration and particle repulsion.
//!
//! [`PointerTracker`] keeps only the latest pointer sample: every move
//! overwrites the previous one, and the animation loop reads whatever is
//! there when a frame starts. The hover flag is decided at move time by hit
//! testing the pointer against the interactive regions of the page.
//!
//! # Usage
//!
//! ```ignore
//! let mut pointer = PointerTracker::new(true);
//! let regions = HitRegions::new().with(Rect::new(Vec2::ZERO, size), Target::ParticleSurface);
//!
//! // In the window event handler:
//! pointer.handle_window_event(&event, &regions);
//!
//! // At frame start:
//! field.step(pointer.repulsion_center(), &mut canvas);
//! ```

use glam::Vec2;
use winit::event::WindowEvent;

/// Axis-aligned rectangle in surface pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(origin: Vec2, size: Vec2) -> Self {
        Self { origin, size }
    }

    pub fn center(&self) -> Vec2 {
        self.origin + self.size * 0.5
    }

    /// Half-open containment: the right and bottom edges are outside.
    pub fn contains(&self, point: Vec2) -> bool {
        let max = self.origin + self.size;
        point.x >= self.origin.x && point.y >= self.origin.y && point.x < max.x && point.y < max.y
    }
}

/// What a hit region represents.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Target {
    /// A button or link.
    Interactive,
    /// The particle canvas itself.
    ParticleSurface,
    /// Decorative or plain content; does not trigger the hover cursor.
    Inert,
}

/// Answers "what is under this point".
pub trait HitTest {
    fn target_at(&self, point: Vec2) -> Option<Target>;

    /// Whether the point is over something that should enlarge the cursor.
    fn is_interactive(&self, point: Vec2) -> bool {
        matches!(
            self.target_at(point),
            Some(Target::Interactive | Target::ParticleSurface)
        )
    }
}

/// Ordered list of regions; later entries sit on top of earlier ones.
#[derive(Clone, Debug, Default)]
pub struct HitRegions {
    regions: Vec<(Rect, Target)>,
}

impl HitRegions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, rect: Rect, target: Target) -> Self {
        self.push(rect, target);
        self
    }

    pub fn push(&mut self, rect: Rect, target: Target) {
        self.regions.push((rect, target));
    }

    pub fn clear(&mut self) {
        self.regions.clear();
    }
}

impl HitTest for HitRegions {
    fn target_at(&self, point: Vec2) -> Option<Target> {
        self.regions
            .iter()
            .rev()
            .find(|(rect, _)| rect.contains(point))
            .map(|(_, target)| *target)
    }
}

/// Latest pointer sample.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerState {
    /// Last known position in surface pixels.
    pub position: Vec2,
    /// Over an interactive element or the particle surface.
    pub hovering: bool,
    /// Inside the surface. Cleared on pointer leave.
    pub inside: bool,
}

/// Last-write-wins pointer state.
#[derive(Clone, Debug)]
pub struct PointerTracker {
    state: PointerState,
    hover_capable: bool,
    attached: bool,
}

impl PointerTracker {
    /// `hover_capable` is false on touch-only devices; such trackers never
    /// attach and always report the default state.
    pub fn new(hover_capable: bool) -> Self {
        Self {
            state: PointerState::default(),
            hover_capable,
            attached: false,
        }
    }

    /// Start accepting pointer events.
    pub fn attach(&mut self) {
        self.attached = self.hover_capable;
    }

    /// Stop accepting pointer events and forget the last sample.
    pub fn detach(&mut self) {
        self.attached = false;
        self.state = PointerState::default();
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    #[inline]
    pub fn state(&self) -> PointerState {
        self.state
    }

    /// Repulsion center for the particle field, `None` while the pointer is
    /// outside the surface.
    #[inline]
    pub fn repulsion_center(&self) -> Option<Vec2> {
        self.state.inside.then_some(self.state.position)
    }

    /// Record a pointer move.
    pub fn pointer_moved<H: HitTest + ?Sized>(&mut self, position: Vec2, hits: &H) {
        if !self.attached {
            return;
        }
        self.state = PointerState {
            position,
            hovering: hits.is_interactive(position),
            inside: true,
        };
    }

    /// Record the pointer leaving the surface. Position is kept for the cursor.
    pub fn pointer_left(&mut self) {
        if !self.attached {
            return;
        }
        self.state.inside = false;
        self.state.hovering = false;
    }

    /// Feed a winit window event. Returns true if the pointer state changed.
    pub fn handle_window_event<H: HitTest + ?Sized>(&mut self, event: &WindowEvent, hits: &H) -> bool {
        if !self.attached {
            return false;
        }
        let before = self.state;
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.pointer_moved(Vec2::new(position.x as f32, position.y as f32), hits);
            }
            WindowEvent::CursorLeft { .. } => self.pointer_left(),
            _ => {}
        }
        self.state != before
    }
}
