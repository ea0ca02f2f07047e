//! Frame loop that drives the particle field.
//!
//! The loop does not own a timer. It asks a [`FrameScheduler`] for the next
//! display refresh and holds exactly one [`FrameHandle`] for it; when the host
//! delivers that refresh, [`AnimationLoop::frame`] steps the field and asks
//! for the next one. Stopping cancels the pending handle, so a refresh that
//! was already in flight draws nothing.
//!
//! ```text
//!   Idle ──start──▶ Running ──stop──▶ Idle
//!                    │  ▲
//!                    └──┘ frame: step field, schedule next
//! ```
//!
//! Resizes rebuild the field in place while the loop keeps running. Resizes
//! are not debounced; each one rasterizes and rebuilds in full.

use glam::Vec2;
use tracing::{debug, info};

use crate::field::ParticleField;
use crate::raster::TextRasterizer;
use crate::surface::Surface;

/// Identifies one scheduled frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

/// Host-side frame scheduling.
pub trait FrameScheduler {
    /// Request one callback at the next display refresh.
    fn schedule(&mut self) -> FrameHandle;

    /// Revoke a request. Revoking an already delivered frame is a no-op.
    fn cancel(&mut self, handle: FrameHandle);
}

/// Loop lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Running,
}

/// Owns the particle field and the rasterizer, and steps them per frame.
pub struct AnimationLoop<S: FrameScheduler> {
    scheduler: S,
    state: LoopState,
    pending: Option<FrameHandle>,
    field: ParticleField,
    rasterizer: TextRasterizer,
    lines: Vec<String>,
    ready: bool,
    rebuilds: u64,
    frames: u64,
    on_ready: Option<Box<dyn FnMut(bool)>>,
}

impl<S: FrameScheduler> AnimationLoop<S> {
    pub fn new(scheduler: S, field: ParticleField, rasterizer: TextRasterizer, lines: Vec<String>) -> Self {
        Self {
            scheduler,
            state: LoopState::Idle,
            pending: None,
            field,
            rasterizer,
            lines,
            ready: false,
            rebuilds: 0,
            frames: 0,
            on_ready: None,
        }
    }

    /// Called with `true` after every rasterization that populated the field.
    pub fn with_ready_callback<F>(mut self, callback: F) -> Self
    where
        F: FnMut(bool) + 'static,
    {
        self.on_ready = Some(Box::new(callback));
        self
    }

    #[inline]
    pub fn state(&self) -> LoopState {
        self.state
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    /// True once a rasterization pass has completed.
    #[inline]
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    pub fn rasterizer(&self) -> &TextRasterizer {
        &self.rasterizer
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Number of field rebuilds so far.
    pub fn rebuild_count(&self) -> u64 {
        self.rebuilds
    }

    /// Number of frames stepped so far.
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    /// Size the surface, populate the field and schedule the first frame.
    ///
    /// Starting a running loop does nothing.
    pub fn start<Su: Surface + ?Sized>(&mut self, surface: &mut Su, width: u32, height: u32) {
        if self.is_running() {
            return;
        }
        self.state = LoopState::Running;
        info!(width, height, "animation loop started");
        self.apply_resize(surface, width, height);
        self.pending = Some(self.scheduler.schedule());
    }

    /// Deliver a display refresh.
    ///
    /// Returns true if a frame was drawn. Nothing is drawn unless the loop is
    /// running and a frame is pending.
    pub fn frame<Su: Surface + ?Sized>(&mut self, surface: &mut Su, repulsor: Option<Vec2>) -> bool {
        if !self.is_running() {
            return false;
        }
        let Some(_handle) = self.pending.take() else {
            return false;
        };
        self.field.step(repulsor, surface);
        self.frames += 1;
        self.pending = Some(self.scheduler.schedule());
        true
    }

    /// React to a surface-size change. Ignored while idle.
    pub fn resize<Su: Surface + ?Sized>(&mut self, surface: &mut Su, width: u32, height: u32) {
        if !self.is_running() {
            debug!(width, height, "ignoring resize while idle");
            return;
        }
        self.apply_resize(surface, width, height);
    }

    /// Replace the display lines and rebuild against the current surface size.
    pub fn set_lines<Su: Surface + ?Sized>(&mut self, surface: &mut Su, lines: Vec<String>) {
        self.lines = lines;
        if self.is_running() {
            let (width, height) = (surface.width(), surface.height());
            self.apply_resize(surface, width, height);
        }
    }

    /// Cancel the pending frame and go idle. The field is kept so a later
    /// `start` can rebuild it.
    pub fn stop(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel(handle);
        }
        if self.is_running() {
            info!(frames = self.frames, rebuilds = self.rebuilds, "animation loop stopped");
        }
        self.state = LoopState::Idle;
    }

    /// Stop and release the particles.
    pub fn dispose(&mut self) {
        self.stop();
        self.field.dispose();
        self.ready = false;
    }

    fn apply_resize<Su: Surface + ?Sized>(&mut self, surface: &mut Su, width: u32, height: u32) {
        surface.resize(width, height);
        let Some(raster) = self.rasterizer.rasterize(surface, &self.lines) else {
            return;
        };
        self.field.rebuild(&raster.samples);
        self.rebuilds += 1;
        self.ready = true;
        if let Some(callback) = self.on_ready.as_mut() {
            callback(true);
        }
    }
}

impl<S: FrameScheduler> Drop for AnimationLoop<S> {
    fn drop(&mut self) {
        self.stop();
    }
}
