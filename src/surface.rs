//! Render surface abstraction and the CPU canvas that implements it.
//!
//! Everything the particle core draws goes through [`Surface`]: clearing,
//! filled circles, centred text, and reading the pixels back as a
//! [`SampleBuffer`]. [`Canvas`] is the production implementation, an RGBA8
//! buffer with source-over blending that the window presenter uploads to the
//! GPU once per frame.

use std::fmt;
use std::path::Path;

use glam::Vec2;
use image::{Rgba, RgbaImage};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::text::TextEngine;

/// 8-bit RGBA color. Serialized as `#RRGGBB` or `#RRGGBBAA`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Same color with alpha scaled by `opacity` (clamped to 0..=1).
    pub fn with_opacity(self, opacity: f32) -> Self {
        let a = (self.a as f32 * opacity.clamp(0.0, 1.0)).round() as u8;
        Self { a, ..self }
    }

    /// Parse `#RGB`, `#RRGGBB` or `#RRGGBBAA`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        let byte = |i: usize| u8::from_str_radix(digits.get(i..i + 2)?, 16).ok();
        match digits.len() {
            3 => {
                let nibble = |i: usize| {
                    u8::from_str_radix(digits.get(i..i + 1)?, 16)
                        .ok()
                        .map(|n| n * 17)
                };
                Some(Self::rgb(nibble(0)?, nibble(1)?, nibble(2)?))
            }
            6 => Some(Self::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Some(Self::rgba(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => None,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        Color::from_hex(&value).ok_or_else(|| format!("invalid color '{value}'"))
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

/// Font selection for [`Surface::fill_text_centered`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FontSpec {
    /// Family name; unknown families fall back to the system sans-serif.
    pub family: String,
    /// CSS-style weight (100..=900).
    pub weight: u16,
    /// Em size in surface pixels.
    pub size: f32,
}

impl FontSpec {
    pub fn new(family: impl Into<String>, weight: u16, size: f32) -> Self {
        Self {
            family: family.into(),
            weight,
            size,
        }
    }
}

/// Thresholds that decide whether a pixel counts as ink.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InkThreshold {
    /// Every color channel must be strictly below this.
    pub max_channel: u8,
    /// Alpha must be strictly above this.
    pub min_alpha: u8,
}

impl Default for InkThreshold {
    fn default() -> Self {
        Self {
            max_channel: 128,
            min_alpha: 128,
        }
    }
}

/// Pixels read back from a surface, row-major RGBA8.
///
/// Captured once per rasterization and consumed by value, so nothing can
/// keep sampling a stale buffer after a resize.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SampleBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl SampleBuffer {
    /// Wrap raw RGBA data. Returns `None` if the length does not match.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        (data.len() == width as usize * height as usize * 4).then_some(Self {
            width,
            height,
            data,
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// RGBA at `(x, y)`, or `None` outside the buffer.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let pixels: &[[u8; 4]] = bytemuck::cast_slice(&self.data);
        pixels.get(y as usize * self.width as usize + x as usize).copied()
    }

    /// Dark, opaque pixel test.
    pub fn is_ink(&self, x: u32, y: u32, threshold: InkThreshold) -> bool {
        match self.pixel(x, y) {
            Some([r, g, b, a]) => {
                r < threshold.max_channel
                    && g < threshold.max_channel
                    && b < threshold.max_channel
                    && a > threshold.min_alpha
            }
            None => false,
        }
    }
}

/// 2-D drawing context sized in device pixels.
pub trait Surface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Resize the backing store. Contents are discarded.
    fn resize(&mut self, width: u32, height: u32);

    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Color);

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color);

    fn stroke_circle(&mut self, center: Vec2, radius: f32, thickness: f32, color: Color);

    /// Draw a single line of text centred on `center` (middle baseline).
    fn fill_text_centered(&mut self, text: &str, center: Vec2, font: &FontSpec, color: Color);

    /// Copy the current pixels out.
    fn snapshot(&self) -> SampleBuffer;

    /// Fill the whole surface.
    fn clear(&mut self, color: Color) {
        let size = Vec2::new(self.width() as f32, self.height() as f32);
        self.fill_rect(Vec2::ZERO, size, color);
    }
}

/// CPU RGBA8 canvas.
pub struct Canvas {
    image: RgbaImage,
    text: Option<TextEngine>,
}

impl Canvas {
    /// Create a transparent canvas with no text support.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
            text: None,
        }
    }

    /// Attach a text engine so `fill_text_centered` renders glyphs.
    pub fn with_text_engine(mut self, engine: TextEngine) -> Self {
        self.text = Some(engine);
        self
    }

    /// Raw RGBA8 bytes, row-major.
    pub fn pixels(&self) -> &[u8] {
        self.image.as_raw()
    }

    /// RGBA at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.image.width() || y >= self.image.height() {
            return None;
        }
        let Rgba([r, g, b, a]) = *self.image.get_pixel(x, y);
        Some(Color::rgba(r, g, b, a))
    }

    /// Write the canvas as a PNG.
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        self.image.save(path).map_err(|source| Error::Snapshot {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Blend `color` into `(x, y)` with extra `coverage` (0..=1).
    fn blend(&mut self, x: i32, y: i32, color: Color, coverage: f32) {
        blend_pixel(&mut self.image, x, y, color, coverage);
    }
}

fn blend_pixel(image: &mut RgbaImage, x: i32, y: i32, color: Color, coverage: f32) {
    if x < 0 || y < 0 || x as u32 >= image.width() || y as u32 >= image.height() {
        return;
    }
    let alpha = color.a as f32 / 255.0 * coverage.clamp(0.0, 1.0);
    if alpha <= 0.0 {
        return;
    }
    let dst = image.get_pixel_mut(x as u32, y as u32);
    if alpha >= 1.0 {
        *dst = Rgba([color.r, color.g, color.b, 255]);
        return;
    }
    let Rgba([dr, dg, db, da]) = *dst;
    let mix = |s: u8, d: u8| (s as f32 * alpha + d as f32 * (1.0 - alpha)).round() as u8;
    let out_a = alpha + da as f32 / 255.0 * (1.0 - alpha);
    *dst = Rgba([
        mix(color.r, dr),
        mix(color.g, dg),
        mix(color.b, db),
        (out_a * 255.0).round() as u8,
    ]);
}

/// Pixel-center bounding box of a circle, clipped to the image.
fn circle_bounds(image: &RgbaImage, center: Vec2, reach: f32) -> Option<(i32, i32, i32, i32)> {
    let x0 = ((center.x - reach).floor() as i32).max(0);
    let y0 = ((center.y - reach).floor() as i32).max(0);
    let x1 = ((center.x + reach).ceil() as i32).min(image.width() as i32 - 1);
    let y1 = ((center.y + reach).ceil() as i32).min(image.height() as i32 - 1);
    (x0 <= x1 && y0 <= y1).then_some((x0, y0, x1, y1))
}

impl Surface for Canvas {
    fn width(&self) -> u32 {
        self.image.width()
    }

    fn height(&self) -> u32 {
        self.image.height()
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.image = RgbaImage::new(width, height);
    }

    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Color) {
        let x0 = origin.x.max(0.0).round() as u32;
        let y0 = origin.y.max(0.0).round() as u32;
        let x1 = ((origin.x + size.x).round().max(0.0) as u32).min(self.image.width());
        let y1 = ((origin.y + size.y).round().max(0.0) as u32).min(self.image.height());
        if color.a == 255 {
            let px = Rgba([color.r, color.g, color.b, 255]);
            for y in y0..y1 {
                for x in x0..x1 {
                    self.image.put_pixel(x, y, px);
                }
            }
        } else {
            for y in y0..y1 {
                for x in x0..x1 {
                    self.blend(x as i32, y as i32, color, 1.0);
                }
            }
        }
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        let Some((x0, y0, x1, y1)) = circle_bounds(&self.image, center, radius + 1.0) else {
            return;
        };
        for y in y0..=y1 {
            for x in x0..=x1 {
                let d = Vec2::new(x as f32 + 0.5, y as f32 + 0.5).distance(center);
                let coverage = radius + 0.5 - d;
                if coverage > 0.0 {
                    self.blend(x, y, color, coverage);
                }
            }
        }
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, thickness: f32, color: Color) {
        let half = thickness * 0.5;
        let Some((x0, y0, x1, y1)) = circle_bounds(&self.image, center, radius + half + 1.0) else {
            return;
        };
        for y in y0..=y1 {
            for x in x0..=x1 {
                let d = Vec2::new(x as f32 + 0.5, y as f32 + 0.5).distance(center);
                let coverage = half + 0.5 - (d - radius).abs();
                if coverage > 0.0 {
                    self.blend(x, y, color, coverage);
                }
            }
        }
    }

    fn fill_text_centered(&mut self, text: &str, center: Vec2, font: &FontSpec, color: Color) {
        let Some(engine) = self.text.as_mut() else {
            tracing::trace!("canvas has no text engine; skipping '{text}'");
            return;
        };
        let image = &mut self.image;
        engine.draw_line(text, center, font, color, |x, y, coverage| {
            blend_pixel(image, x, y, color, coverage);
        });
    }

    fn snapshot(&self) -> SampleBuffer {
        SampleBuffer {
            width: self.image.width(),
            height: self.image.height(),
            data: self.image.as_raw().clone(),
        }
    }
}
