//! # inkfield
//!
//! Text rendered as a cloud of spring-driven particles.
//!
//! A line of text is painted onto an off-screen surface, sampled on a grid for
//! ink pixels, and each sample becomes a particle that springs back to its
//! sample point. The pointer pushes particles away inside a radius; when it
//! leaves, they settle back into the letters.
//!
//! ## Quick Start
//!
//! ```ignore
//! use inkfield::prelude::*;
//!
//! fn main() -> inkfield::Result<()> {
//!     let config = SiteConfig::default();
//!     inkfield::run(config, Portfolio::default())
//! }
//! ```
//!
//! ## Pieces
//!
//! - [`particle`]: one point-mass, its spring and repulsion forces
//! - [`raster`]: text to sample coordinates
//! - [`field`]: every particle, rebuilt from samples and stepped per frame
//! - [`animation`]: the frame loop and its scheduler seam
//! - [`input`]: pointer tracking and hit testing
//! - [`presentation`]: fades, cursor, loading overlay, navigation
//! - [`surface`]: the drawing trait and the CPU [`Canvas`]
//!
//! The core never fails: a zero-sized surface yields no particles, a missing
//! pointer yields no repulsion. Only loading files, fonts and the GPU return
//! [`Error`].
//!
//! ## Driving the loop by hand
//!
//! ```ignore
//! use inkfield::prelude::*;
//!
//! let config = SiteConfig::default();
//! let mut canvas = Canvas::new(1, 1);
//! let mut animation = AnimationLoop::new(
//!     ManualScheduler::new(),
//!     config.particle_field(),
//!     config.rasterizer(),
//!     vec!["hello".into()],
//! );
//! animation.start(&mut canvas, 1200, 800);
//! animation.frame(&mut canvas, Some(Vec2::new(600.0, 400.0)));
//! ```

pub mod animation;
pub mod config;
pub mod content;
pub mod error;
pub mod field;
mod gpu;
pub mod headless;
pub mod input;
pub mod particle;
pub mod presentation;
pub mod raster;
pub mod surface;
pub mod text;
pub mod time;
mod window;

pub use glam::Vec2;

pub use animation::{AnimationLoop, FrameHandle, FrameScheduler, LoopState};
pub use config::{SiteConfig, WindowConfig};
pub use content::{Portfolio, Project};
pub use error::{Error, Result};
pub use field::{FieldConfig, ParticleField};
pub use headless::{render_snapshot, ManualScheduler};
pub use input::{HitRegions, HitTest, PointerState, PointerTracker, Rect, Target};
pub use particle::{Particle, ParticleTuning};
pub use raster::{FontTiers, RasterConfig, Rasterization, SamplingPolicy, TextRasterizer};
pub use surface::{Canvas, Color, FontSpec, InkThreshold, SampleBuffer, Surface};
pub use text::TextEngine;
pub use time::FrameClock;
pub use window::{run, RedrawScheduler};

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use inkfield::prelude::*;
/// ```
pub mod prelude {
    pub use crate::animation::{AnimationLoop, FrameHandle, FrameScheduler, LoopState};
    pub use crate::config::SiteConfig;
    pub use crate::content::Portfolio;
    pub use crate::field::{FieldConfig, ParticleField};
    pub use crate::headless::ManualScheduler;
    pub use crate::input::{HitRegions, PointerTracker, Rect, Target};
    pub use crate::particle::ParticleTuning;
    pub use crate::presentation::{HomeScene, Navigator, Section};
    pub use crate::raster::{RasterConfig, TextRasterizer};
    pub use crate::surface::{Canvas, Color, FontSpec, Surface};
    pub use crate::Vec2;
}
