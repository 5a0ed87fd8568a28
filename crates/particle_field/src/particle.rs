//! A single glowing dot

use glam::Vec2;
use rand::Rng;

use crate::config::Config;
use crate::viewport::Viewport;

/// A particle
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct Particle {
    /// Position in viewport pixels
    pub position: Vec2,
    /// Velocity in pixels per frame
    pub velocity: Vec2,
    /// Radius of the solid dot
    pub radius: f32,
    /// Opacity of the solid dot
    pub opacity: f32,
}

impl Particle {
    /// Instantiate
    #[must_use]
    pub const fn new(position: Vec2, velocity: Vec2, radius: f32, opacity: f32) -> Self {
        Self {
            position,
            velocity,
            radius,
            opacity,
        }
    }

    /// A particle somewhere random in the viewport, drifting in a random direction.
    pub fn random<R: Rng>(rng: &mut R, viewport: Viewport, config: &Config) -> Self {
        let max = viewport.max();
        let speed = config.max_initial_speed;
        let position = Vec2::new(rng.gen::<f32>() * max.x, rng.gen::<f32>() * max.y);
        let velocity = Vec2::new(
            between(rng, -speed, speed),
            between(rng, -speed, speed),
        );

        Self {
            position,
            velocity,
            radius: between(rng, config.radius_range.0, config.radius_range.1),
            opacity: between(rng, config.opacity_range.0, config.opacity_range.1),
        }
    }

    /// Is the particle inside, or on the edge of, the viewport?
    #[must_use]
    pub fn is_within(&self, viewport: Viewport) -> bool {
        let max = viewport.max();
        (0.0..=max.x).contains(&self.position.x) && (0.0..=max.y).contains(&self.position.y)
    }
}

/// A uniformly random float in `[min, max)`. Unlike `gen_range()` an empty range is fine, it just
/// returns `min`.
fn between<R: Rng>(rng: &mut R, min: f32, max: f32) -> f32 {
    rng.gen::<f32>().mul_add(max - min, min)
}

#[cfg(test)]
mod test {
    use rand::SeedableRng as _;

    use super::*;

    #[test]
    fn random_particles_respect_config_ranges() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        let config = Config::default();
        let viewport = Viewport::new(800, 600);

        for _ in 0..1000 {
            let particle = Particle::random(&mut rng, viewport, &config);
            assert!(particle.is_within(viewport));
            assert!((-0.25..=0.25).contains(&particle.velocity.x));
            assert!((-0.25..=0.25).contains(&particle.velocity.y));
            assert!((1.0..=3.0).contains(&particle.radius));
            assert!((0.2..=0.7).contains(&particle.opacity));
        }
    }

    #[test]
    fn empty_viewport_puts_particles_at_origin() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        let particle = Particle::random(&mut rng, Viewport::default(), &Config::default());
        assert_eq!(particle.position, Vec2::ZERO);
    }
}
