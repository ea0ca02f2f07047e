//! Windowless rendering.
//!
//! Runs the same loop as the desktop runner against a [`ManualScheduler`],
//! so frames are delivered by the caller instead of a display. Used for PNG
//! snapshots and for driving the loop in tests.

use std::path::Path;
use std::time::Duration;

use tracing::info;

use crate::animation::{AnimationLoop, FrameHandle, FrameScheduler};
use crate::config::SiteConfig;
use crate::content::Portfolio;
use crate::error::Result;
use crate::input::PointerState;
use crate::presentation::HomeScene;
use crate::surface::Canvas;
use crate::text::TextEngine;

/// Hands out handles and remembers the outstanding one.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next: u64,
    pending: Option<FrameHandle>,
    cancelled: u64,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> Option<FrameHandle> {
        self.pending
    }

    /// Number of handles revoked so far.
    pub fn cancelled(&self) -> u64 {
        self.cancelled
    }
}

impl FrameScheduler for ManualScheduler {
    fn schedule(&mut self) -> FrameHandle {
        self.next += 1;
        let handle = FrameHandle(self.next);
        self.pending = Some(handle);
        handle
    }

    fn cancel(&mut self, handle: FrameHandle) {
        if self.pending == Some(handle) {
            self.pending = None;
            self.cancelled += 1;
        }
    }
}

/// Render `frames` frames at the configured window size and write the result
/// to `path` as a PNG.
///
/// Frames are spaced 16 ms apart for the decorations, so 120 frames is enough
/// for the loading overlay to clear.
pub fn render_snapshot(
    config: &SiteConfig,
    portfolio: &Portfolio,
    frames: u32,
    path: impl AsRef<Path>,
) -> Result<()> {
    let path = path.as_ref();
    let engine = TextEngine::new(config.font_path.as_deref())?;
    let mut canvas = Canvas::new(1, 1).with_text_engine(engine);

    let mut animation = AnimationLoop::new(
        ManualScheduler::new(),
        config.particle_field(),
        config.rasterizer(),
        portfolio.name_lines(),
    );
    let mut scene = HomeScene::new(config.presentation.clone(), portfolio);
    animation.start(&mut canvas, config.window.width, config.window.height);

    let pointer = PointerState::default();
    for i in 0..frames {
        animation.frame(&mut canvas, None);
        let now = Duration::from_millis(16 * u64::from(i + 1));
        scene.update(now, animation.is_ready());
        scene.compose(&mut canvas, now, &pointer, animation.rasterizer());
    }

    info!(
        path = %path.display(),
        frames,
        particles = animation.field().len(),
        "writing snapshot"
    );
    animation.stop();
    canvas.save_png(path)
}
