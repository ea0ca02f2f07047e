//! Text to point cloud.
//!
//! The rasterizer paints the display lines onto the surface (background
//! fill, then each line centred and stacked), reads the pixels back once, and
//! scans them on a fixed stride for ink pixels. Each ink pixel becomes one
//! sample coordinate.
//!
//! # Scan order
//!
//! The scan is **column-major**: `x` runs in the outer loop from 0 by the
//! stride, `y` in the inner loop from 0 by the stride. When the capacity bound
//! is hit the scan stops, so truncation keeps the left-most columns of the
//! text at full density and drops everything to their right.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::surface::{Color, FontSpec, InkThreshold, SampleBuffer, Surface};

/// Font size breakpoint tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FontTier {
    Large,
    Medium,
    Small,
}

/// Font sizes keyed to surface width. A tier applies when the width is
/// strictly greater than its breakpoint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontTiers {
    pub large_above: u32,
    pub large: f32,
    pub medium_above: u32,
    pub medium: f32,
    pub small: f32,
}

impl Default for FontTiers {
    fn default() -> Self {
        Self {
            large_above: 1024,
            large: 155.0,
            medium_above: 768,
            medium: 107.0,
            small: 53.0,
        }
    }
}

impl FontTiers {
    pub fn tier_for(&self, width: u32) -> FontTier {
        if width > self.large_above {
            FontTier::Large
        } else if width > self.medium_above {
            FontTier::Medium
        } else {
            FontTier::Small
        }
    }

    pub fn size_for(&self, width: u32) -> f32 {
        match self.tier_for(width) {
            FontTier::Large => self.large,
            FontTier::Medium => self.medium,
            FontTier::Small => self.small,
        }
    }
}

/// Sampling stride keyed to surface width: narrow surfaces sample denser.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingPolicy {
    pub coarse_above: u32,
    pub coarse_stride: u32,
    pub fine_stride: u32,
}

impl Default for SamplingPolicy {
    fn default() -> Self {
        Self {
            coarse_above: 768,
            coarse_stride: 4,
            fine_stride: 3,
        }
    }
}

impl SamplingPolicy {
    pub fn stride_for(&self, width: u32) -> u32 {
        let stride = if width > self.coarse_above {
            self.coarse_stride
        } else {
            self.fine_stride
        };
        stride.max(1)
    }
}

/// Everything the rasterizer needs besides the lines themselves.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RasterConfig {
    pub tiers: FontTiers,
    pub sampling: SamplingPolicy,
    pub ink: InkThreshold,
    pub font_family: String,
    pub font_weight: u16,
    /// Distance between line centres, in multiples of the font size.
    pub line_spacing: f32,
    pub uppercase: bool,
    pub ink_color: Color,
    pub background: Color,
}

impl Default for RasterConfig {
    fn default() -> Self {
        Self {
            tiers: FontTiers::default(),
            sampling: SamplingPolicy::default(),
            ink: InkThreshold::default(),
            font_family: "Inter".into(),
            font_weight: 900,
            line_spacing: 0.9,
            uppercase: true,
            ink_color: Color::BLACK,
            background: Color::WHITE,
        }
    }
}

/// Result of one rasterization pass.
#[derive(Clone, Debug, PartialEq)]
pub struct Rasterization {
    /// Sample coordinates in scan order, at most `capacity` long.
    pub samples: Vec<Vec2>,
    pub font_size: f32,
    pub stride: u32,
    /// More ink existed past the capacity bound.
    pub truncated: bool,
}

/// Scan `buffer` column-major on `stride` and collect ink coordinates.
///
/// Stops at `capacity`; the returned flag is set when at least one more ink
/// pixel was found after the cap was reached.
pub fn scan_ink(
    buffer: SampleBuffer,
    stride: u32,
    threshold: InkThreshold,
    capacity: usize,
) -> (Vec<Vec2>, bool) {
    let stride = stride.max(1) as usize;
    let mut samples = Vec::with_capacity(capacity.min(4096));
    let mut truncated = false;

    'scan: for x in (0..buffer.width()).step_by(stride) {
        for y in (0..buffer.height()).step_by(stride) {
            if !buffer.is_ink(x, y, threshold) {
                continue;
            }
            if samples.len() >= capacity {
                truncated = true;
                break 'scan;
            }
            samples.push(Vec2::new(x as f32, y as f32));
        }
    }
    (samples, truncated)
}

/// Renders display lines and samples them into coordinates.
#[derive(Clone, Debug)]
pub struct TextRasterizer {
    config: RasterConfig,
    capacity: usize,
}

impl TextRasterizer {
    pub fn new(config: RasterConfig, capacity: usize) -> Self {
        Self { config, capacity }
    }

    pub fn config(&self) -> &RasterConfig {
        &self.config
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Font used for a surface of the given width.
    pub fn font_for(&self, width: u32) -> FontSpec {
        FontSpec::new(
            self.config.font_family.clone(),
            self.config.font_weight,
            self.config.tiers.size_for(width),
        )
    }

    /// Centre point for each line: horizontally centred, stacked around the
    /// vertical middle.
    pub fn layout(&self, width: u32, height: u32, lines: &[String]) -> Vec<(String, Vec2)> {
        let font_size = self.config.tiers.size_for(width);
        let advance = font_size * self.config.line_spacing;
        let count = lines.len().saturating_sub(1) as f32;
        let mut y = height as f32 * 0.5 - count * advance * 0.5;
        let x = width as f32 * 0.5;

        lines
            .iter()
            .map(|line| {
                let text = if self.config.uppercase {
                    line.to_uppercase()
                } else {
                    line.clone()
                };
                let placed = (text, Vec2::new(x, y));
                y += advance;
                placed
            })
            .collect()
    }

    /// Paint `lines` onto `surface` and sample the ink.
    ///
    /// Returns `None` without touching the surface when either dimension is
    /// zero.
    pub fn rasterize<S: Surface + ?Sized>(&self, surface: &mut S, lines: &[String]) -> Option<Rasterization> {
        let (width, height) = (surface.width(), surface.height());
        if width == 0 || height == 0 {
            debug!(width, height, "skipping rasterization of degenerate surface");
            return None;
        }

        let font = self.font_for(width);
        surface.clear(self.config.background);
        for (text, center) in self.layout(width, height, lines) {
            surface.fill_text_centered(&text, center, &font, self.config.ink_color);
        }

        let stride = self.config.sampling.stride_for(width);
        let (samples, truncated) = scan_ink(surface.snapshot(), stride, self.config.ink, self.capacity);
        debug!(
            width,
            height,
            font_size = font.size,
            stride,
            samples = samples.len(),
            truncated,
            "rasterized text"
        );

        Some(Rasterization {
            samples,
            font_size: font.size,
            stride,
            truncated,
        })
    }
}
