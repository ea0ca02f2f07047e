//! End-to-end tests for the text → samples → particles pipeline.
//!
//! Glyph shapes depend on installed fonts, so these tests draw text with a
//! block surface: every non-space character is a solid rectangle 0.6 em wide
//! and 1 em tall, with 0.1 em between characters.

use std::cell::Cell;
use std::collections::HashSet;
use std::rc::Rc;

use rand::rngs::SmallRng;
use rand::SeedableRng;

use inkfield::prelude::*;
use inkfield::{PointerTracker, SampleBuffer};

// ============================================================================
// Block-glyph test surface
// ============================================================================

struct BlockSurface {
    width: u32,
    height: u32,
    data: Vec<u8>,
    circles: usize,
}

impl BlockSurface {
    fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; (width * height * 4) as usize],
            circles: 0,
        }
    }

    fn put(&mut self, x: i64, y: i64, color: Color) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        let i = ((y as u32 * self.width + x as u32) * 4) as usize;
        self.data[i..i + 4].copy_from_slice(&[color.r, color.g, color.b, color.a]);
    }
}

impl Surface for BlockSurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn resize(&mut self, width: u32, height: u32) {
        *self = Self::new(width, height);
    }

    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Color) {
        let (x0, y0) = (origin.x.round() as i64, origin.y.round() as i64);
        let (x1, y1) = ((origin.x + size.x).round() as i64, (origin.y + size.y).round() as i64);
        for y in y0.max(0)..y1.min(self.height as i64) {
            for x in x0.max(0)..x1.min(self.width as i64) {
                self.put(x, y, color);
            }
        }
    }

    fn fill_circle(&mut self, center: Vec2, _radius: f32, color: Color) {
        self.circles += 1;
        self.put(center.x as i64, center.y as i64, color);
    }

    fn stroke_circle(&mut self, _center: Vec2, _radius: f32, _thickness: f32, _color: Color) {}

    fn fill_text_centered(&mut self, text: &str, center: Vec2, font: &FontSpec, color: Color) {
        let advance = font.size * 0.7;
        let glyph = Vec2::new(font.size * 0.6, font.size);
        let total = advance * text.chars().count() as f32 - font.size * 0.1;
        let left = center.x - total * 0.5;
        for (i, ch) in text.chars().enumerate() {
            if ch.is_whitespace() {
                continue;
            }
            let origin = Vec2::new(left + i as f32 * advance, center.y - font.size * 0.5);
            self.fill_rect(origin, glyph, color);
        }
    }

    fn snapshot(&self) -> SampleBuffer {
        SampleBuffer::new(self.width, self.height, self.data.clone()).expect("buffer length matches")
    }
}

fn lines(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

fn seeded_field(config: FieldConfig) -> ParticleField {
    ParticleField::with_rng(config, SmallRng::seed_from_u64(1234))
}

// ============================================================================
// Rasterization
// ============================================================================

#[test]
fn test_wide_surface_uses_large_tier_and_coarse_stride() {
    let rasterizer = TextRasterizer::new(RasterConfig::default(), 10_000);
    let mut surface = BlockSurface::new(1200, 800);
    let raster = rasterizer
        .rasterize(&mut surface, &lines(&["AB", "CD"]))
        .expect("non-degenerate surface");

    assert_eq!(raster.font_size, 155.0);
    assert_eq!(raster.stride, 4);
    assert!(!raster.truncated);
    assert!(!raster.samples.is_empty());
    for s in &raster.samples {
        assert!(s.x >= 0.0 && s.x < 1200.0 && s.y >= 0.0 && s.y < 800.0);
        assert_eq!(s.x as u32 % 4, 0);
        assert_eq!(s.y as u32 % 4, 0);
    }
}

#[test]
fn test_samples_cover_both_lines() {
    let rasterizer = TextRasterizer::new(RasterConfig::default(), 10_000);
    let mut surface = BlockSurface::new(1200, 800);
    let raster = rasterizer
        .rasterize(&mut surface, &lines(&["AB", "CD"]))
        .unwrap();

    // Line centres at 400 ∓ 69.75; the two blocks overlap in y only near 400.
    assert!(raster.samples.iter().any(|s| s.y < 340.0));
    assert!(raster.samples.iter().any(|s| s.y > 460.0));
}

#[test]
fn test_narrow_surface_uses_small_tier() {
    let rasterizer = TextRasterizer::new(RasterConfig::default(), 10_000);
    let mut surface = BlockSurface::new(600, 400);
    let raster = rasterizer.rasterize(&mut surface, &lines(&["hi"])).unwrap();
    assert_eq!(raster.font_size, 53.0);
    assert_eq!(raster.stride, 3);
}

#[test]
fn test_capacity_truncates_to_exactly_the_cap() {
    let rasterizer = TextRasterizer::new(RasterConfig::default(), 50);
    let mut surface = BlockSurface::new(1200, 800);
    let raster = rasterizer
        .rasterize(&mut surface, &lines(&["WIDE TEXT"]))
        .unwrap();
    assert_eq!(raster.samples.len(), 50);
    assert!(raster.truncated);

    // Column-major: the kept samples are the left-most ink columns.
    let max_x = raster.samples.iter().map(|s| s.x).fold(f32::MIN, f32::max);
    assert!(max_x < 600.0);
}

#[test]
fn test_degenerate_surface_yields_nothing() {
    let rasterizer = TextRasterizer::new(RasterConfig::default(), 10_000);
    let mut surface = BlockSurface::new(0, 600);
    assert!(rasterizer.rasterize(&mut surface, &lines(&["AB"])).is_none());

    let mut flat = BlockSurface::new(800, 0);
    assert!(rasterizer.rasterize(&mut flat, &lines(&["AB"])).is_none());
}

#[test]
fn test_blank_lines_yield_no_samples() {
    let rasterizer = TextRasterizer::new(RasterConfig::default(), 10_000);
    let mut surface = BlockSurface::new(800, 600);
    let raster = rasterizer.rasterize(&mut surface, &lines(&["   "])).unwrap();
    assert!(raster.samples.is_empty());
}

// ============================================================================
// Field behaviour
// ============================================================================

#[test]
fn test_first_step_stays_within_jitter_plus_one_velocity() {
    let rasterizer = TextRasterizer::new(RasterConfig::default(), 10_000);
    let mut surface = BlockSurface::new(1200, 800);
    let raster = rasterizer
        .rasterize(&mut surface, &lines(&["AB", "CD"]))
        .unwrap();

    let mut field = seeded_field(FieldConfig::default());
    field.rebuild(&raster.samples);
    assert_eq!(field.len(), raster.samples.len());

    field.step(None, &mut surface);
    let bound = 75.0 + 0.5 * 0.93 + 1e-3;
    for p in field.particles() {
        let offset = p.position() - p.target();
        assert!(offset.x.abs() <= bound && offset.y.abs() <= bound);
        assert!(p.velocity().length() <= 0.5 * 0.93 + 1e-4);
    }
    assert_eq!(surface.circles, field.len());
}

#[test]
fn test_rebuild_replaces_every_particle() {
    let mut field = seeded_field(FieldConfig::default());
    let first: Vec<Vec2> = (0..100).map(|i| Vec2::new(i as f32, 0.0)).collect();
    let second: Vec<Vec2> = (0..30).map(|i| Vec2::new(i as f32, 500.0)).collect();

    field.rebuild(&first);
    field.rebuild(&second);
    assert_eq!(field.len(), 30);
    assert!(field.particles().iter().all(|p| p.target().y == 500.0));
}

#[test]
fn test_particles_settle_on_targets_without_pointer() {
    let mut field = seeded_field(FieldConfig::default());
    let targets: Vec<Vec2> = (0..20).map(|i| Vec2::new(100.0 + i as f32 * 4.0, 200.0)).collect();
    field.rebuild(&targets);

    let mut surface = BlockSurface::new(400, 400);
    for _ in 0..600 {
        field.step(None, &mut surface);
    }
    for p in field.particles() {
        assert!(p.position().distance(p.target()) < 0.05);
        assert!(p.velocity().length() < 0.05);
    }
}

#[test]
fn test_pointer_pushes_particles_away() {
    let config = FieldConfig {
        jitter: 0.0,
        ..FieldConfig::default()
    };
    let mut field = seeded_field(config);
    field.rebuild(&[Vec2::new(200.0, 200.0), Vec2::new(600.0, 200.0)]);

    let mut surface = BlockSurface::new(800, 400);
    field.step(Some(Vec2::new(180.0, 200.0)), &mut surface);

    let near = &field.particles()[0];
    let far = &field.particles()[1];
    assert!(near.position().x > 200.0, "pushed away from the pointer");
    assert_eq!(far.position(), far.target(), "outside the repulsion radius");
}

#[test]
fn test_pointer_leave_stops_repulsion() {
    let regions = HitRegions::new().with(
        Rect::new(Vec2::ZERO, Vec2::new(800.0, 400.0)),
        Target::ParticleSurface,
    );
    let mut tracker = PointerTracker::new(true);
    tracker.attach();
    tracker.pointer_moved(Vec2::new(190.0, 200.0), &regions);
    tracker.pointer_left();

    let mut field = seeded_field(FieldConfig {
        jitter: 0.0,
        ..FieldConfig::default()
    });
    field.rebuild(&[Vec2::new(200.0, 200.0)]);
    let mut surface = BlockSurface::new(800, 400);
    field.step(tracker.repulsion_center(), &mut surface);
    assert_eq!(field.particles()[0].position(), Vec2::new(200.0, 200.0));
}

// ============================================================================
// Animation loop
// ============================================================================

fn block_loop(capacity: usize) -> AnimationLoop<ManualScheduler> {
    let field = seeded_field(FieldConfig {
        capacity,
        ..FieldConfig::default()
    });
    let rasterizer = TextRasterizer::new(RasterConfig::default(), capacity);
    AnimationLoop::new(ManualScheduler::new(), field, rasterizer, lines(&["AB", "CD"]))
}

#[test]
fn test_loop_populates_and_signals_ready() {
    let signals = Rc::new(Cell::new(0));
    let seen = Rc::clone(&signals);
    let mut animation = block_loop(10_000).with_ready_callback(move |ready| {
        assert!(ready);
        seen.set(seen.get() + 1);
    });
    let mut surface = BlockSurface::new(1, 1);

    animation.start(&mut surface, 1200, 800);
    assert!(animation.is_ready());
    assert!(!animation.field().is_empty());
    assert_eq!(signals.get(), 1);

    animation.resize(&mut surface, 700, 500);
    assert_eq!(signals.get(), 2);
    assert_eq!(animation.rasterizer().font_for(700).size, 53.0);
}

#[test]
fn test_loop_resize_to_zero_keeps_previous_field() {
    let mut animation = block_loop(10_000);
    let mut surface = BlockSurface::new(1, 1);
    animation.start(&mut surface, 1200, 800);
    let before = animation.field().len();

    animation.resize(&mut surface, 0, 800);
    assert_eq!(animation.field().len(), before);
    assert_eq!(animation.rebuild_count(), 1);
}

#[test]
fn test_loop_capacity_bound_holds() {
    let mut animation = block_loop(64);
    let mut surface = BlockSurface::new(1, 1);
    animation.start(&mut surface, 1200, 800);
    assert_eq!(animation.field().len(), 64);
}

#[test]
fn test_stopped_loop_ignores_late_frame_and_resize() {
    let mut animation = block_loop(10_000);
    let mut surface = BlockSurface::new(1, 1);
    animation.start(&mut surface, 1200, 800);
    assert!(animation.frame(&mut surface, None));

    animation.stop();
    assert_eq!(animation.scheduler().pending(), None);
    assert_eq!(animation.scheduler().cancelled(), 1);

    let circles = surface.circles;
    assert!(!animation.frame(&mut surface, None));
    assert_eq!(surface.circles, circles);

    animation.resize(&mut surface, 500, 500);
    assert_eq!(surface.width(), 1200);
    assert_eq!(animation.rebuild_count(), 1);
}

#[test]
fn test_restart_after_stop_rebuilds() {
    let mut animation = block_loop(10_000);
    let mut surface = BlockSurface::new(1, 1);
    animation.start(&mut surface, 1200, 800);
    animation.stop();
    animation.start(&mut surface, 900, 600);
    assert!(animation.is_running());
    assert_eq!(animation.rebuild_count(), 2);
    assert!(animation.frame(&mut surface, None));
}

fn target_keys(points: impl IntoIterator<Item = Vec2>) -> HashSet<(i32, i32)> {
    points.into_iter().map(|p| (p.x as i32, p.y as i32)).collect()
}

fn samples_for(text: &[&str], width: u32, height: u32) -> HashSet<(i32, i32)> {
    let rasterizer = TextRasterizer::new(RasterConfig::default(), 10_000);
    let mut surface = BlockSurface::new(width, height);
    let raster = rasterizer
        .rasterize(&mut surface, &lines(text))
        .expect("surface is not degenerate");
    target_keys(raster.samples)
}

#[test]
fn test_text_change_rebuilds_from_new_text_only() {
    let mut animation = AnimationLoop::new(
        ManualScheduler::new(),
        seeded_field(FieldConfig::default()),
        TextRasterizer::new(RasterConfig::default(), 10_000),
        lines(&["AB"]),
    );
    let mut surface = BlockSurface::new(1, 1);
    animation.start(&mut surface, 300, 200);
    assert_eq!(animation.rebuild_count(), 1);

    let old = samples_for(&["AB"], 300, 200);
    let new = samples_for(&["ABCD"], 300, 200);
    let old_only: HashSet<_> = old.difference(&new).copied().collect();
    assert!(!old_only.is_empty());

    animation.set_lines(&mut surface, lines(&["ABCD"]));
    assert_eq!(animation.rebuild_count(), 2);
    assert_eq!((surface.width(), surface.height()), (300, 200));

    let targets = target_keys(animation.field().particles().iter().map(|p| p.target()));
    assert_eq!(targets, new);
    assert!(targets.is_disjoint(&old_only));
}

#[test]
fn test_text_change_while_idle_is_deferred() {
    let mut animation = block_loop(10_000);
    let mut surface = BlockSurface::new(1, 1);

    animation.set_lines(&mut surface, lines(&["AB"]));
    assert_eq!(animation.rebuild_count(), 0);
    assert_eq!(surface.width(), 1);
    assert!(animation.field().is_empty());

    animation.start(&mut surface, 300, 200);
    animation.stop();
    animation.set_lines(&mut surface, lines(&["ABCD"]));
    assert_eq!(animation.rebuild_count(), 1);
    let targets = target_keys(animation.field().particles().iter().map(|p| p.target()));
    assert_eq!(targets, samples_for(&["AB"], 300, 200));

    // The stored text is used on the next start.
    animation.start(&mut surface, 300, 200);
    let targets = target_keys(animation.field().particles().iter().map(|p| p.target()));
    assert_eq!(targets, samples_for(&["ABCD"], 300, 200));
}
