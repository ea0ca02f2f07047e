//! The particle collection and its per-frame step.
//!
//! A [`ParticleField`] is rebuilt wholesale from sample coordinates whenever
//! the text or the surface size changes, and stepped once per frame. Particles
//! never interact with each other, so the iteration order only matters for
//! draw overlap.
//!
//! `rebuild` and `step` both take `&mut self`: a field shared across threads
//! has to sit behind a lock, which serializes the two.

use glam::Vec2;
use rand::rngs::SmallRng;
use rand::{Rng, RngCore, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::particle::{Particle, ParticleTuning};
use crate::surface::{Color, Surface};

/// Field-level limits and visuals.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Hard cap on the number of particles.
    pub capacity: usize,
    /// Initial positions are offset by up to this much per axis.
    pub jitter: f32,
    /// Clear color for each frame.
    pub background: Color,
    pub particle: ParticleTuning,
}

impl FieldConfig {
    /// Largest jitter whose full range `2 * jitter` is still finite.
    pub const MAX_JITTER: f32 = f32::MAX / 2.0;

    /// The jitter magnitude actually applied. Non-finite or out-of-range
    /// values disable the scatter.
    pub fn effective_jitter(&self) -> f32 {
        let jitter = self.jitter.abs();
        if jitter.is_finite() && jitter <= Self::MAX_JITTER {
            jitter
        } else {
            0.0
        }
    }
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            capacity: 10_000,
            jitter: 75.0,
            background: Color::WHITE,
            particle: ParticleTuning::default(),
        }
    }
}

/// Owns every particle and drives the simulation step.
pub struct ParticleField {
    config: FieldConfig,
    particles: Vec<Particle>,
    rng: Box<dyn RngCore>,
}

impl ParticleField {
    /// Create an empty field with an entropy-seeded jitter source.
    pub fn new(config: FieldConfig) -> Self {
        Self::with_rng(config, SmallRng::from_entropy())
    }

    /// Create an empty field with a caller-provided jitter source.
    ///
    /// Pass a seeded RNG to get reproducible initial positions.
    pub fn with_rng<R: RngCore + 'static>(config: FieldConfig, rng: R) -> Self {
        Self {
            config,
            particles: Vec::new(),
            rng: Box::new(rng),
        }
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.config.capacity
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Replace every particle with one per sample, up to the capacity.
    ///
    /// Each new particle targets its sample exactly and starts at a random
    /// offset within the jitter square, so the shape flies in.
    pub fn rebuild(&mut self, samples: &[Vec2]) {
        let jitter = self.config.effective_jitter();
        if jitter == 0.0 && self.config.jitter != 0.0 {
            warn!(jitter = self.config.jitter, "jitter out of range, starting particles on target");
        }
        let count = samples.len().min(self.config.capacity);

        self.particles.clear();
        self.particles.reserve(count);
        for &target in &samples[..count] {
            let offset = if jitter > 0.0 {
                Vec2::new(
                    self.rng.gen_range(-jitter..jitter),
                    self.rng.gen_range(-jitter..jitter),
                )
            } else {
                Vec2::ZERO
            };
            self.particles.push(Particle::new(target + offset, target));
        }
        debug!(
            particles = self.particles.len(),
            dropped = samples.len() - count,
            "rebuilt particle field"
        );
    }

    /// Clear the surface, then update and draw every particle.
    pub fn step<S: Surface + ?Sized>(&mut self, repulsor: Option<Vec2>, surface: &mut S) {
        surface.clear(self.config.background);
        let tuning = &self.config.particle;
        for particle in &mut self.particles {
            particle.update(repulsor, tuning);
            particle.draw(surface, tuning);
        }
    }

    /// Drop all particles.
    pub fn dispose(&mut self) {
        self.particles.clear();
        self.particles.shrink_to_fit();
    }
}

impl std::fmt::Debug for ParticleField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParticleField")
            .field("config", &self.config)
            .field("particles", &self.particles.len())
            .finish_non_exhaustive()
    }
}
