//! A single point-mass that springs back to a fixed resting position.
//!
//! Each frame a particle accumulates two forces straight into its velocity
//! (semi-implicit Euler, no mass term):
//!
//! 1. a **spring** toward its target, proportional to the distance but capped
//!    at [`ParticleTuning::max_force`];
//! 2. a **repulsion** away from the pointer, only inside
//!    [`ParticleTuning::repulsion_radius`], with a squared falloff that reaches
//!    zero at the boundary.
//!
//! Friction is applied once, after both forces and before integration, so with
//! no forces acting the speed decays geometrically by the friction factor.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::surface::{Color, Surface};

/// Coefficients shared by every particle in a field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleTuning {
    /// Draw radius in surface pixels.
    pub radius: f32,
    /// Spring force per unit of distance to the target.
    pub stiffness: f32,
    /// Velocity multiplier applied once per update (< 1).
    pub friction: f32,
    /// Upper bound on the spring force magnitude.
    pub max_force: f32,
    /// Pointer influence radius.
    pub repulsion_radius: f32,
    /// Repulsion magnitude at zero distance (before falloff).
    pub repulsion_strength: f32,
    /// Fill color for every particle.
    pub color: Color,
}

impl Default for ParticleTuning {
    fn default() -> Self {
        Self {
            radius: 1.5,
            stiffness: 0.08,
            friction: 0.93,
            max_force: 0.5,
            repulsion_radius: 150.0,
            repulsion_strength: 8.0,
            color: Color::BLACK,
        }
    }
}

/// A point-mass with a resting target.
///
/// The target is fixed at creation; a field that needs different targets
/// discards its particles and creates new ones.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    position: Vec2,
    velocity: Vec2,
    target: Vec2,
}

impl Particle {
    /// Create a particle at rest at `position`, springing toward `target`.
    pub fn new(position: Vec2, target: Vec2) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            target,
        }
    }

    /// Create a particle with an initial velocity.
    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    #[inline]
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    #[inline]
    pub fn target(&self) -> Vec2 {
        self.target
    }

    /// Spring contribution toward the target for the current position.
    ///
    /// Magnitude is `min(distance * stiffness, max_force)`; zero when the
    /// particle already sits on its target.
    pub fn spring_force(&self, tuning: &ParticleTuning) -> Vec2 {
        let to_target = self.target - self.position;
        let distance = to_target.length();
        if distance == 0.0 {
            return Vec2::ZERO;
        }
        let magnitude = (distance * tuning.stiffness).min(tuning.max_force);
        to_target / distance * magnitude
    }

    /// Repulsion contribution away from `center`.
    ///
    /// Zero at or beyond the repulsion radius, and when the particle sits
    /// exactly on the center (no defined direction).
    pub fn repulsion_force(&self, center: Vec2, tuning: &ParticleTuning) -> Vec2 {
        let away = self.position - center;
        let distance = away.length();
        if distance <= 0.0 || distance >= tuning.repulsion_radius {
            return Vec2::ZERO;
        }
        let falloff = (1.0 - distance / tuning.repulsion_radius).powi(2);
        away / distance * tuning.repulsion_strength * falloff
    }

    /// Advance one step: spring, repulsion, friction, then integrate.
    ///
    /// `repulsor` is `None` while the pointer is outside the surface.
    pub fn update(&mut self, repulsor: Option<Vec2>, tuning: &ParticleTuning) {
        self.velocity += self.spring_force(tuning);
        if let Some(center) = repulsor {
            self.velocity += self.repulsion_force(center, tuning);
        }
        self.velocity *= tuning.friction;
        self.position += self.velocity;
    }

    /// Draw as a filled circle. Does not touch particle state.
    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S, tuning: &ParticleTuning) {
        surface.fill_circle(self.position, tuning.radius, tuning.color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn far_away() -> Option<Vec2> {
        Some(Vec2::splat(1.0e6))
    }

    #[test]
    fn test_spring_force_is_capped() {
        let tuning = ParticleTuning::default();
        let mut p = Particle::new(Vec2::new(10_000.0, 0.0), Vec2::ZERO);
        p.update(far_away(), &tuning);

        // First step starts from rest: velocity is the capped spring force after friction.
        assert!(p.velocity().length() <= tuning.max_force + 1e-6);
        assert!((p.velocity().length() - tuning.max_force * tuning.friction).abs() < 1e-4);
        assert!(p.velocity().x < 0.0);
    }

    #[test]
    fn test_spring_force_proportional_when_close() {
        let tuning = ParticleTuning::default();
        let p = Particle::new(Vec2::new(2.0, 0.0), Vec2::ZERO);
        let force = p.spring_force(&tuning);
        assert!((force.x + 2.0 * tuning.stiffness).abs() < 1e-6);
        assert_eq!(force.y, 0.0);
    }

    #[test]
    fn test_friction_decays_geometrically() {
        let tuning = ParticleTuning::default();
        let mut p = Particle::new(Vec2::ZERO, Vec2::ZERO).with_velocity(Vec2::new(10.0, 0.0));

        // Keep the particle on its target so the spring term stays zero.
        let mut expected = 10.0_f32;
        for _ in 0..5 {
            p = Particle::new(p.target(), p.target()).with_velocity(p.velocity());
            p.update(far_away(), &tuning);
            expected *= tuning.friction;
            assert!((p.velocity().x - expected).abs() < 1e-4);
        }
        assert!((p.velocity().x - 10.0 * tuning.friction.powi(5)).abs() < 1e-4);
    }

    #[test]
    fn test_repulsion_zero_at_boundary() {
        let tuning = ParticleTuning::default();
        let p = Particle::new(Vec2::new(tuning.repulsion_radius, 0.0), Vec2::ZERO);
        assert_eq!(p.repulsion_force(Vec2::ZERO, &tuning), Vec2::ZERO);
    }

    #[test]
    fn test_repulsion_quarter_at_half_radius() {
        let tuning = ParticleTuning::default();
        let p = Particle::new(Vec2::new(0.5 * tuning.repulsion_radius, 0.0), Vec2::ZERO);
        let force = p.repulsion_force(Vec2::ZERO, &tuning);
        assert!((force.length() - 0.25 * tuning.repulsion_strength).abs() < 1e-5);
        assert!(force.x > 0.0, "repulsion must point away from the center");
    }

    #[test]
    fn test_repulsion_skipped_at_zero_distance() {
        let tuning = ParticleTuning::default();
        let p = Particle::new(Vec2::new(5.0, 5.0), Vec2::new(5.0, 5.0));
        assert_eq!(p.repulsion_force(Vec2::new(5.0, 5.0), &tuning), Vec2::ZERO);

        let mut q = p.clone();
        q.update(Some(Vec2::new(5.0, 5.0)), &tuning);
        assert_eq!(q.position(), p.position());
        assert!(q.velocity().is_finite());
    }

    #[test]
    fn test_no_repulsor_means_spring_only() {
        let tuning = ParticleTuning::default();
        let mut a = Particle::new(Vec2::new(20.0, 0.0), Vec2::ZERO);
        let mut b = a.clone();
        a.update(None, &tuning);
        b.update(far_away(), &tuning);
        assert_eq!(a, b);
    }

    #[test]
    fn test_target_never_changes() {
        let tuning = ParticleTuning::default();
        let mut p = Particle::new(Vec2::new(40.0, -30.0), Vec2::new(1.0, 2.0));
        for _ in 0..50 {
            p.update(Some(Vec2::new(10.0, 10.0)), &tuning);
        }
        assert_eq!(p.target(), Vec2::new(1.0, 2.0));
    }

    #[test]
    fn test_settles_on_target() {
        let tuning = ParticleTuning::default();
        let mut p = Particle::new(Vec2::new(60.0, -45.0), Vec2::new(100.0, 100.0));
        for _ in 0..600 {
            p.update(None, &tuning);
        }
        assert!(p.position().distance(p.target()) < 0.5);
    }
}
