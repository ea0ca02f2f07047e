//! Everything drawn around the particle field.
//!
//! The particle frame is the bottom layer. [`HomeScene::compose`] paints, in
//! order:
//!
//! 1. the static fallback text, fading out once the field is ready
//! 2. the discipline line with its divider rule, pulled toward the pointer
//!    while hovered
//! 3. the cursor decoration (hover-capable devices only)
//! 4. the loading overlay, fading out once the gate releases

mod effects;
mod navigation;

pub use effects::{CubicBezier, CursorStyle, FallbackText, LoadingGate, Magnetic, Reveal, RevealStagger};
pub use navigation::{Navigator, ScrollRequest, Section, View, SCROLL_LOOKAHEAD};

use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::content::Portfolio;
use crate::input::{PointerState, Rect};
use crate::raster::TextRasterizer;
use crate::surface::{Color, FontSpec, Surface};

/// Timings and styling for the decorations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PresentationConfig {
    /// Minimum time the loading overlay stays up.
    pub loading_min_ms: u64,
    /// Fade-out time for the overlay and the fallback text.
    pub fade_ms: u64,
    /// Whether the device has a hovering pointer. Touch-only devices get no
    /// cursor decoration and no repulsion.
    pub hover_capable: bool,
    pub discipline_size: f32,
    pub brand_size: f32,
    pub status_size: f32,
    pub ink: Color,
    pub overlay: Color,
    pub overlay_ink: Color,
    /// Fraction of the pointer's distance from the discipline line's centre
    /// that the line moves by.
    pub magnetic_sensitivity: f32,
    pub magnetic_ms: u64,
    /// Gap between successive intro children.
    pub reveal_delay_ms: u64,
    pub reveal_ms: u64,
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self {
            loading_min_ms: 1500,
            fade_ms: 1000,
            hover_capable: true,
            discipline_size: 24.0,
            brand_size: 48.0,
            status_size: 16.0,
            ink: Color::BLACK,
            overlay: Color::BLACK,
            overlay_ink: Color::WHITE,
            magnetic_sensitivity: 0.15,
            magnetic_ms: 300,
            reveal_delay_ms: 150,
            reveal_ms: 1200,
        }
    }
}

impl PresentationConfig {
    pub fn loading_min(&self) -> Duration {
        Duration::from_millis(self.loading_min_ms)
    }

    pub fn fade(&self) -> Duration {
        Duration::from_millis(self.fade_ms)
    }

    pub fn magnetic(&self) -> Magnetic {
        Magnetic::new(self.magnetic_sensitivity, Duration::from_millis(self.magnetic_ms))
    }

    pub fn reveal(&self) -> RevealStagger {
        RevealStagger::new(
            Duration::from_millis(self.reveal_delay_ms),
            Duration::from_millis(self.reveal_ms),
        )
    }
}

/// The home section: decorations layered over the particle frame.
#[derive(Clone, Debug)]
pub struct HomeScene {
    config: PresentationConfig,
    fallback: FallbackText,
    loading: LoadingGate,
    intro: RevealStagger,
    magnetic: Magnetic,
    /// Last pointer position seen over the discipline line.
    magnet_pointer: Option<Vec2>,
    name_lines: Vec<String>,
    discipline: String,
    brand: String,
}

impl HomeScene {
    pub fn new(config: PresentationConfig, portfolio: &Portfolio) -> Self {
        Self {
            fallback: FallbackText::new(config.fade()),
            loading: LoadingGate::new(config.loading_min(), config.fade()),
            intro: config.reveal(),
            magnetic: config.magnetic(),
            magnet_pointer: None,
            name_lines: portfolio.name_lines(),
            discipline: portfolio.discipline.clone(),
            brand: portfolio.brand.clone(),
            config,
        }
    }

    pub fn config(&self) -> &PresentationConfig {
        &self.config
    }

    pub fn name_lines(&self) -> &[String] {
        &self.name_lines
    }

    /// Advance the fades. Call once per frame before [`HomeScene::compose`].
    pub fn update(&mut self, now: Duration, particles_ready: bool) {
        self.intro.observe(1.0, now);
        if particles_ready {
            self.fallback.mark_ready(now);
        }
        let was_loading = self.loading.is_loading();
        self.loading.update(now, particles_ready);
        if was_loading && !self.loading.is_loading() {
            info!(elapsed_ms = now.as_millis() as u64, "loading overlay released");
        }
    }

    /// Feed the pointer to the magnetic discipline line.
    ///
    /// The line retargets only when the pointer moves over it, and eases back
    /// to rest once the pointer leaves.
    pub fn track_pointer(&mut self, pointer: &PointerState, width: u32, height: u32, now: Duration) {
        let rect = self.discipline_rect(width as f32, height as f32);
        let over = self.config.hover_capable
            && pointer.inside
            && rect.is_some_and(|r| r.contains(pointer.position));
        match (over, rect) {
            (true, Some(rect)) => {
                if self.magnet_pointer != Some(pointer.position) {
                    self.magnetic.pointer_moved(pointer.position, rect, now);
                    self.magnet_pointer = Some(pointer.position);
                }
            }
            _ => {
                if self.magnet_pointer.take().is_some() {
                    self.magnetic.pointer_left(now);
                }
            }
        }
    }

    /// Current magnetic offset of the discipline line.
    pub fn discipline_offset(&self, now: Duration) -> Vec2 {
        self.magnetic.offset(now)
    }

    /// Staggered intro state of the overlay's `index`th line.
    pub fn intro(&self, index: usize, now: Duration) -> Reveal {
        self.intro.child(index, now)
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_loading()
    }

    pub fn fallback_opacity(&self, now: Duration) -> f32 {
        self.fallback.opacity(now)
    }

    pub fn overlay_opacity(&self, now: Duration) -> f32 {
        self.loading.overlay_opacity(now)
    }

    /// Cursor decoration to draw, if any.
    pub fn cursor(&self, now: Duration, pointer: &PointerState) -> Option<CursorStyle> {
        let visible = self.config.hover_capable && pointer.inside && self.loading.content_visible(now);
        visible.then(|| CursorStyle::for_hover(pointer.hovering))
    }

    /// Paint the decorations over whatever the surface already holds.
    pub fn compose<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        now: Duration,
        pointer: &PointerState,
        rasterizer: &TextRasterizer,
    ) {
        let (width, height) = (surface.width(), surface.height());
        if width == 0 || height == 0 {
            return;
        }
        let (w, h) = (width as f32, height as f32);

        let fallback = self.fallback.opacity(now);
        if fallback > 0.0 {
            let font = rasterizer.font_for(width);
            let color = rasterizer.config().ink_color.with_opacity(fallback);
            for (text, center) in rasterizer.layout(width, height, &self.name_lines) {
                surface.fill_text_centered(&text, center, &font, color);
            }
        }

        self.draw_discipline(surface, w, h, now);

        if let Some(style) = self.cursor(now, pointer) {
            let radius = style.diameter * 0.5;
            if let Some(fill) = style.fill {
                surface.fill_circle(pointer.position, radius, fill);
            }
            surface.stroke_circle(pointer.position, radius, style.stroke_width, style.stroke);
        }

        let overlay = self.loading.overlay_opacity(now);
        if overlay > 0.0 {
            surface.fill_rect(Vec2::ZERO, Vec2::new(w, h), self.config.overlay.with_opacity(overlay));
            let brand = self.intro(0, now);
            let status = self.intro(1, now);
            let brand_font = FontSpec::new("Inter", 900, self.config.brand_size);
            let status_font = FontSpec::new("Roboto Mono", 500, self.config.status_size);
            let center = Vec2::new(w * 0.5, h * 0.5);

            surface.fill_text_centered(
                &self.brand,
                center + Vec2::new(0.0, -self.config.brand_size * 0.5 + brand.offset_y),
                &brand_font,
                self.config.overlay_ink.with_opacity(overlay * brand.opacity),
            );
            surface.fill_text_centered(
                "Loading Interface...",
                center + Vec2::new(0.0, self.config.status_size * 1.5 + status.offset_y),
                &status_font,
                self.config.overlay_ink.with_opacity(overlay * status.opacity),
            );
        }
    }

    /// Box of the discipline line: rule-wide, one line tall. `None` when
    /// there is no discipline text.
    fn discipline_rect(&self, w: f32, h: f32) -> Option<Rect> {
        if self.discipline.is_empty() {
            return None;
        }
        let margin = if w > 768.0 { 64.0 } else { 32.0 };
        let size = self.config.discipline_size;
        let rule_width = (w - 32.0).clamp(0.0, 768.0);
        Some(Rect::new(
            Vec2::new((w - rule_width) * 0.5, h - margin - size),
            Vec2::new(rule_width, size),
        ))
    }

    fn draw_discipline<S: Surface + ?Sized>(&self, surface: &mut S, w: f32, h: f32, now: Duration) {
        let Some(rect) = self.discipline_rect(w, h) else {
            return;
        };
        let rule_y = rect.origin.y - 16.0;
        surface.fill_rect(
            Vec2::new(rect.origin.x, rule_y),
            Vec2::new(rect.size.x, 1.0),
            self.config.ink,
        );
        surface.fill_text_centered(
            &self.discipline,
            rect.center() + self.magnetic.offset(now),
            &FontSpec::new("Inter", 500, self.config.discipline_size),
            self.config.ink,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::RasterConfig;
    use crate::surface::Canvas;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn scene() -> HomeScene {
        HomeScene::new(PresentationConfig::default(), &Portfolio::default())
    }

    fn pointer_at(x: f32, y: f32, hovering: bool) -> PointerState {
        PointerState {
            position: Vec2::new(x, y),
            hovering,
            inside: true,
        }
    }

    #[test]
    fn test_overlay_covers_until_released() {
        let mut scene = scene();
        let rasterizer = TextRasterizer::new(RasterConfig::default(), 100);
        let mut canvas = Canvas::new(200, 200);
        canvas.clear(Color::WHITE);

        scene.update(ms(500), true);
        scene.compose(&mut canvas, ms(500), &PointerState::default(), &rasterizer);
        assert_eq!(canvas.pixel(5, 5), Some(Color::BLACK));
        assert!(scene.is_loading());

        scene.update(ms(1500), true);
        assert!(!scene.is_loading());
        canvas.clear(Color::WHITE);
        scene.compose(&mut canvas, ms(2600), &PointerState::default(), &rasterizer);
        assert_eq!(canvas.pixel(5, 5), Some(Color::WHITE));
    }

    #[test]
    fn test_cursor_hidden_during_loading_and_without_hover() {
        let scene = scene();
        let p = pointer_at(10.0, 10.0, false);
        assert!(scene.cursor(ms(100), &p).is_none());
        assert_eq!(scene.cursor(ms(1600), &p), Some(CursorStyle::for_hover(false)));

        let touch = HomeScene::new(
            PresentationConfig {
                hover_capable: false,
                ..PresentationConfig::default()
            },
            &Portfolio::default(),
        );
        assert!(touch.cursor(ms(1600), &p).is_none());

        let outside = PointerState {
            inside: false,
            ..p
        };
        assert!(scene.cursor(ms(1600), &outside).is_none());
    }

    #[test]
    fn test_cursor_ring_is_hollow() {
        let mut scene = scene();
        let rasterizer = TextRasterizer::new(RasterConfig::default(), 100);
        let mut canvas = Canvas::new(200, 200);
        scene.update(ms(1500), true);
        canvas.clear(Color::WHITE);
        scene.compose(&mut canvas, ms(5000), &pointer_at(100.0, 60.0, true), &rasterizer);
        assert_eq!(canvas.pixel(100, 60), Some(Color::WHITE));
        assert!(canvas.pixel(123, 60).unwrap().r < 128);
    }

    #[test]
    fn test_fallback_fades_once_ready() {
        let mut scene = scene();
        scene.update(ms(200), false);
        assert_eq!(scene.fallback_opacity(ms(200)), 1.0);
        scene.update(ms(300), true);
        assert_eq!(scene.fallback_opacity(ms(1300)), 0.0);
    }

    #[test]
    fn test_discipline_line_follows_hovering_pointer() {
        let mut scene = scene();
        let (width, height) = (400, 300);
        // Discipline box spans x 16..384, y 244..268; centre (200, 256).
        let over = pointer_at(300.0, 260.0, false);

        for frame in 0..30 {
            scene.track_pointer(&over, width, height, ms(frame * 16));
        }
        let settled = scene.discipline_offset(ms(29 * 16 + 300));
        assert!((settled - Vec2::new(15.0, 0.6)).length() < 1e-3, "{settled}");

        scene.track_pointer(&pointer_at(10.0, 10.0, false), width, height, ms(1000));
        assert!(scene.discipline_offset(ms(1300)).length() < 1e-3);
    }

    #[test]
    fn test_discipline_line_ignores_touch_and_outside_pointer() {
        let mut touch = HomeScene::new(
            PresentationConfig {
                hover_capable: false,
                ..PresentationConfig::default()
            },
            &Portfolio::default(),
        );
        touch.track_pointer(&pointer_at(300.0, 260.0, false), 400, 300, ms(0));
        assert_eq!(touch.discipline_offset(ms(500)), Vec2::ZERO);

        let mut scene = scene();
        let outside = PointerState {
            inside: false,
            ..pointer_at(300.0, 260.0, false)
        };
        scene.track_pointer(&outside, 400, 300, ms(0));
        assert_eq!(scene.discipline_offset(ms(500)), Vec2::ZERO);
    }

    #[test]
    fn test_intro_stagger_uses_configured_delay() {
        let mut scene = scene();
        scene.update(ms(0), false);
        assert_eq!(scene.intro(1, ms(150)).opacity, 0.0);
        assert!(scene.intro(1, ms(300)).opacity > 0.0);
        assert_eq!(scene.intro(1, ms(1350)).opacity, 1.0);

        let mut slow = HomeScene::new(
            PresentationConfig {
                reveal_delay_ms: 400,
                ..PresentationConfig::default()
            },
            &Portfolio::default(),
        );
        slow.update(ms(0), false);
        assert_eq!(slow.intro(1, ms(300)).opacity, 0.0);
        assert!(slow.intro(0, ms(300)).opacity > 0.0);
    }

    #[test]
    fn test_discipline_rule_is_drawn() {
        let mut scene = scene();
        let rasterizer = TextRasterizer::new(RasterConfig::default(), 100);
        let mut canvas = Canvas::new(400, 300);
        scene.update(ms(1500), true);
        canvas.clear(Color::WHITE);
        scene.compose(&mut canvas, ms(5000), &PointerState::default(), &rasterizer);
        // 300 - 32 - 12 - 12 - 16
        assert_eq!(canvas.pixel(200, 228), Some(Color::BLACK));
    }
}
