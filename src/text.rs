//! Glyph rasterization for [`Canvas`](crate::surface::Canvas).
//!
//! Wraps a cosmic-text `FontSystem` (system fonts plus an optional extra font
//! file) and a `SwashCache`, and exposes one operation: shape a single line,
//! centre it on a point, and emit coverage-weighted pixels.

use std::path::Path;

use cosmic_text::{Attrs, Buffer, Color as GlyphColor, Family, FontSystem, Metrics, Shaping, SwashCache, Weight};
use glam::Vec2;
use tracing::info;

use crate::error::{Error, Result};
use crate::surface::{Color, FontSpec};

/// Font database and glyph cache.
pub struct TextEngine {
    font_system: FontSystem,
    swash_cache: SwashCache,
}

impl TextEngine {
    /// Load system fonts, plus `font_path` if given.
    pub fn new(font_path: Option<&Path>) -> Result<Self> {
        let mut font_system = FontSystem::new();
        if let Some(path) = font_path {
            font_system
                .db_mut()
                .load_font_file(path)
                .map_err(|source| Error::Font {
                    path: path.to_path_buf(),
                    source,
                })?;
        }
        info!(faces = font_system.db().len(), "text engine ready");
        Ok(Self {
            font_system,
            swash_cache: SwashCache::new(),
        })
    }

    fn shape(&mut self, text: &str, font: &FontSpec) -> Buffer {
        let metrics = Metrics::new(font.size, font.size);
        let mut buffer = Buffer::new(&mut self.font_system, metrics);
        buffer.set_size(&mut self.font_system, None, None);
        let attrs = Attrs::new()
            .family(Family::Name(&font.family))
            .weight(Weight(font.weight));
        buffer.set_text(&mut self.font_system, text, &attrs, Shaping::Advanced);
        buffer.shape_until_scroll(&mut self.font_system, false);
        buffer
    }

    /// Rasterize one line centred on `center`.
    ///
    /// `put` receives `(x, y, coverage)` for every touched pixel; coverage is
    /// the glyph alpha in 0..=1 and does not include `color`'s own alpha.
    pub fn draw_line<F>(&mut self, text: &str, center: Vec2, font: &FontSpec, color: Color, mut put: F)
    where
        F: FnMut(i32, i32, f32),
    {
        let buffer = self.shape(text, font);
        let width = line_width(&buffer);
        // Line box is one em tall, so its middle is the "middle" baseline.
        let origin_x = (center.x - width * 0.5).round() as i32;
        let origin_y = (center.y - font.size * 0.5).round() as i32;

        let ink = GlyphColor::rgba(color.r, color.g, color.b, 255);
        buffer.draw(&mut self.font_system, &mut self.swash_cache, ink, |x, y, w, h, c| {
            let coverage = c.a() as f32 / 255.0;
            if coverage <= 0.0 {
                return;
            }
            for dy in 0..h as i32 {
                for dx in 0..w as i32 {
                    put(origin_x + x + dx, origin_y + y + dy, coverage);
                }
            }
        });
    }
}

fn line_width(buffer: &Buffer) -> f32 {
    buffer
        .layout_runs()
        .map(|run| run.line_w)
        .fold(0.0_f32, f32::max)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ink_columns(engine: &mut TextEngine, text: &str, center: Vec2) -> Option<(i32, i32)> {
        let font = FontSpec::new("sans-serif", 700, 80.0);
        let mut span: Option<(i32, i32)> = None;
        engine.draw_line(text, center, &font, Color::BLACK, |x, _, coverage| {
            if coverage > 0.5 {
                span = Some(match span {
                    Some((lo, hi)) => (lo.min(x), hi.max(x)),
                    None => (x, x),
                });
            }
        });
        span
    }

    #[test]
    fn test_draw_line_centres_horizontally() {
        let mut engine = TextEngine::new(None).unwrap();
        if engine.font_system.db().is_empty() {
            // No system fonts: nothing to measure.
            return;
        }
        let Some((lo, hi)) = ink_columns(&mut engine, "HH", Vec2::new(200.0, 100.0)) else {
            return;
        };
        let middle = (lo + hi) as f32 * 0.5;
        assert!((middle - 200.0).abs() <= 10.0, "ink spans {lo}..={hi}");
    }

    #[test]
    fn test_draw_line_follows_center() {
        let mut engine = TextEngine::new(None).unwrap();
        let left = ink_columns(&mut engine, "HH", Vec2::new(150.0, 100.0));
        let right = ink_columns(&mut engine, "HH", Vec2::new(250.0, 100.0));
        if let (Some(a), Some(b)) = (left, right) {
            assert_eq!(b.0 - a.0, 100);
            assert_eq!(b.1 - a.1, 100);
        }
    }

    #[test]
    fn test_missing_font_file_is_an_error() {
        let result = TextEngine::new(Some(Path::new("/nonexistent/font.ttf")));
        assert!(matches!(result, Err(Error::Font { .. })));
    }
}
