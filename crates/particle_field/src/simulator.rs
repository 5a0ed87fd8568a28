//! The particle physics and how each frame is drawn.

use glam::Vec2;
use rand::SeedableRng as _;

use crate::config::Config;
use crate::particle::Particle;
use crate::surface::{RadialGradient, RenderSurface};
use crate::viewport::{Pointer, Viewport};

/// A field of particles confined to a viewport.
pub struct ParticleField {
    /// All the tunable constants
    config: Config,
    /// The area that the particles are confined to
    viewport: Viewport,
    /// All the particles, in the order that they are drawn.
    particles: Vec<Particle>,
    /// Where the pointer was last seen
    pointer: Pointer,
    /// Source of randomness for (re)initialising particles
    rng: rand::rngs::StdRng,
}

impl ParticleField {
    /// Instantiate with an empty viewport and no particles. Call `resize()` and `init()` to get
    /// going.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self::with_rng(config, rand::rngs::StdRng::from_entropy())
    }

    /// Instantiate with reproducible randomness.
    #[must_use]
    pub fn with_seed(config: Config, seed: u64) -> Self {
        Self::with_rng(config, rand::rngs::StdRng::seed_from_u64(seed))
    }

    /// Instantiate with the given random number generator.
    fn with_rng(config: Config, rng: rand::rngs::StdRng) -> Self {
        let pointer = Pointer::new(config.influence_radius);
        Self {
            config,
            viewport: Viewport::default(),
            particles: Vec::new(),
            pointer,
            rng,
        }
    }

    /// The current config
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// The current viewport
    #[must_use]
    pub const fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// The current pointer
    #[must_use]
    pub const fn pointer(&self) -> Pointer {
        self.pointer
    }

    /// All the particles in drawing order.
    #[must_use]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Mutable access to the particles. The number of particles can't be changed this way.
    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    /// Change the bounds of the field. Existing particles are left where they are, the next
    /// update clamps any that are now out of bounds.
    pub fn resize(&mut self, viewport: Viewport) {
        tracing::debug!("Resizing particle field to {}x{}", viewport.width, viewport.height);
        self.viewport = viewport;
    }

    /// Replace every particle with a freshly randomised one. The new set is built in full
    /// before it replaces the old one.
    pub fn init(&mut self) {
        let viewport = self.viewport;
        let particles = (0..self.config.particle_count)
            .map(|_| Particle::random(&mut self.rng, viewport, &self.config))
            .collect();
        self.particles = particles;
        tracing::debug!("Initialised {} particles", self.particles.len());
    }

    /// Record the latest pointer position.
    pub fn set_pointer(&mut self, x: f32, y: f32) {
        self.pointer.move_to(x, y);
    }

    /// The opacity of a line connecting two particles at the given distance. Closer particles
    /// get more opaque lines, particles at the threshold get invisible ones.
    #[must_use]
    pub fn connection_opacity(&self, distance: f32) -> f32 {
        self.config.connection_max_opacity * (1.0 - distance / self.config.connection_threshold)
    }

    /// Draw a line between every pair of particles that are near each other.
    pub fn connect_particles<S: RenderSurface>(&self, surface: &mut S) {
        for (index, first) in self.particles.iter().enumerate() {
            for second in self.particles.iter().skip(index + 1) {
                let distance = first.position.distance(second.position);
                if distance < self.config.connection_threshold {
                    let colour = self
                        .config
                        .colour_with_opacity(self.connection_opacity(distance));
                    surface.draw_line(
                        first.position,
                        second.position,
                        self.config.line_width,
                        colour,
                    );
                }
            }
        }
    }

    /// Advance the physics of every particle by one frame.
    pub fn update_particles(&mut self) {
        let bounds = self.viewport.max();
        for particle in &mut self.particles {
            Self::update_particle(particle, self.pointer, &self.config, bounds);
        }
    }

    /// Advance the physics of a single particle by one frame. The order of the steps matters:
    /// the bounce and clamp act on the position that was just moved to.
    fn update_particle(particle: &mut Particle, pointer: Pointer, config: &Config, bounds: Vec2) {
        particle.position += particle.velocity;

        if let Some(pointer_position) = pointer.position {
            let delta = pointer_position - particle.position;
            let distance = delta.length();
            if distance < pointer.radius {
                let force = (pointer.radius - distance) / pointer.radius;
                let angle = delta.y.atan2(delta.x);
                particle.velocity -= Vec2::from_angle(angle) * force * config.repulsion_strength;
            }
        }

        particle.velocity *= config.damping;

        if particle.position.x < 0.0 || particle.position.x > bounds.x {
            particle.velocity.x = -particle.velocity.x;
        }
        if particle.position.y < 0.0 || particle.position.y > bounds.y {
            particle.velocity.y = -particle.velocity.y;
        }

        particle.position = particle.position.clamp(Vec2::ZERO, bounds);
    }

    /// Draw a single particle as a solid dot with a soft glow over it.
    pub fn draw_particle<S: RenderSurface>(&self, particle: &Particle, surface: &mut S) {
        surface.draw_circle(
            particle.position,
            particle.radius,
            self.config.colour_with_opacity(particle.opacity),
        );

        let gradient = RadialGradient {
            radius: particle.radius * self.config.glow_radius_factor,
            inner: self
                .config
                .colour_with_opacity(particle.opacity * self.config.glow_opacity_factor),
            outer: self.config.colour_with_opacity(0.0),
        };
        surface.draw_gradient_circle(particle.position, particle.radius, gradient);
    }

    /// Everything that happens in one frame, apart from presenting it. Particles are drawn after
    /// the connections so that they sit on top of the lines.
    pub fn frame<S: RenderSurface>(&mut self, surface: &mut S) {
        surface.clear();
        self.connect_particles(surface);
        for particle in &self.particles {
            self.draw_particle(particle, surface);
        }
        self.update_particles();
    }
}

#[cfg(test)]
#[expect(
    clippy::indexing_slicing,
    clippy::float_cmp,
    reason = "Tests aren't so strict"
)]
mod test {
    use super::*;
    use crate::tests::helpers::{DrawCommand, RecordingSurface};

    fn field_with(particles: Vec<Particle>, width: u32, height: u32) -> ParticleField {
        let mut field = ParticleField::with_seed(Config::default(), 1);
        field.resize(Viewport::new(width, height));
        field.particles = particles;
        field
    }

    fn still(x: f32, y: f32) -> Particle {
        Particle::new(Vec2::new(x, y), Vec2::ZERO, 2.0, 0.5)
    }

    #[test]
    fn init_makes_exactly_the_configured_number_of_particles() {
        let mut field = ParticleField::with_seed(Config::default(), 42);
        field.resize(Viewport::new(800, 600));
        field.init();
        assert_eq!(field.particles().len(), 150);
        field.init();
        assert_eq!(field.particles().len(), 150);
        assert!(field
            .particles()
            .iter()
            .all(|particle| particle.is_within(Viewport::new(800, 600))));
    }

    #[test]
    fn resize_does_not_reinitialise() {
        let mut field = ParticleField::with_seed(Config::default(), 42);
        field.resize(Viewport::new(800, 600));
        field.init();
        let before = field.particles().to_vec();
        field.resize(Viewport::new(100, 100));
        assert_eq!(field.particles(), before.as_slice());
    }

    #[test]
    fn connection_opacity_fades_with_distance() {
        let field = ParticleField::with_seed(Config::default(), 1);
        assert!(field.connection_opacity(120.0).abs() < 0.000_001);
        assert!((field.connection_opacity(60.0) - 0.075).abs() < 0.000_001);
        assert!((field.connection_opacity(0.0) - 0.15).abs() < 0.000_001);
    }

    #[test]
    fn only_near_pairs_are_connected() {
        let field = field_with(
            vec![still(0.0, 0.0), still(60.0, 0.0), still(180.0, 0.0)],
            800,
            600,
        );
        let mut surface = RecordingSurface::default();
        field.connect_particles(&mut surface);

        // 0 -> 180 is too far apart and 60 -> 180 is exactly at the threshold, so neither is
        // drawn.
        assert_eq!(surface.commands.len(), 1);
        let DrawCommand::Line { from, to, width, colour } = surface.commands[0] else {
            panic!("Expected a line");
        };
        assert_eq!(from, Vec2::new(0.0, 0.0));
        assert_eq!(to, Vec2::new(60.0, 0.0));
        assert_eq!(width, 0.5);
        assert!((colour.alpha - 0.075).abs() < 0.000_001);
    }

    #[test]
    fn free_motion_without_pointer() {
        let mut particle = still(100.0, 100.0);
        particle.velocity = Vec2::new(0.2, -0.1);
        let mut field = field_with(vec![particle], 800, 600);
        field.update_particles();

        let updated = &field.particles()[0];
        assert!((updated.position.x - 100.2).abs() < 0.0001);
        assert!((updated.position.y - 99.9).abs() < 0.0001);
        assert!((updated.velocity.x - 0.198).abs() < 0.0001);
        assert!((updated.velocity.y + 0.099).abs() < 0.0001);
    }

    #[test]
    fn distant_pointer_has_no_effect() {
        let mut particle = still(100.0, 100.0);
        particle.velocity = Vec2::new(0.2, -0.1);
        let mut with_pointer = field_with(vec![particle.clone()], 800, 600);
        with_pointer.set_pointer(400.0, 400.0);
        let mut without_pointer = field_with(vec![particle], 800, 600);

        for _ in 0..10 {
            with_pointer.update_particles();
            without_pointer.update_particles();
        }
        assert_eq!(with_pointer.particles(), without_pointer.particles());
    }

    #[test]
    fn nearby_pointer_pushes_particle_away() {
        let mut field = field_with(vec![still(100.0, 100.0)], 800, 600);
        // Pointer is 75px to the right, so half strength.
        field.set_pointer(175.0, 100.0);
        field.update_particles();

        let velocity = field.particles()[0].velocity;
        assert!((velocity.x + 0.05 * 0.99).abs() < 0.0001);
        assert!(velocity.y.abs() < 0.0001);
    }

    #[test]
    fn pointer_on_top_of_particle_still_pushes() {
        let mut field = field_with(vec![still(100.0, 100.0)], 800, 600);
        field.set_pointer(100.0, 100.0);
        field.update_particles();

        let velocity = field.particles()[0].velocity;
        assert!((velocity.x + 0.1 * 0.99).abs() < 0.0001);
    }

    #[test]
    fn particles_bounce_off_edges_and_are_clamped() {
        let mut particle = still(799.9, 0.05);
        particle.velocity = Vec2::new(0.5, -0.1);
        let mut field = field_with(vec![particle], 800, 600);
        field.update_particles();

        let updated = &field.particles()[0];
        assert_eq!(updated.position, Vec2::new(800.0, 0.0));
        assert!(updated.velocity.x < 0.0);
        assert!(updated.velocity.y > 0.0);
    }

    #[test]
    fn very_fast_particles_are_clamped_to_the_boundary() {
        let mut particle = still(10.0, 10.0);
        particle.velocity = Vec2::new(-5000.0, 5000.0);
        let mut field = field_with(vec![particle], 800, 600);
        field.update_particles();

        let updated = &field.particles()[0];
        assert_eq!(updated.position, Vec2::new(0.0, 600.0));
    }

    #[test]
    fn shrinking_the_viewport_pulls_particles_in_on_next_update() {
        let mut field = field_with(vec![still(700.0, 500.0)], 800, 600);
        field.resize(Viewport::new(400, 300));
        assert_eq!(field.particles()[0].position, Vec2::new(700.0, 500.0));
        field.update_particles();
        assert_eq!(field.particles()[0].position, Vec2::new(400.0, 300.0));
    }

    #[test]
    fn particle_is_a_dot_with_a_glow() {
        let field = field_with(vec![], 800, 600);
        let mut surface = RecordingSurface::default();
        field.draw_particle(&still(10.0, 20.0), &mut surface);

        assert_eq!(surface.commands.len(), 2);
        let DrawCommand::Circle { centre, radius, colour } = surface.commands[0] else {
            panic!("Expected a circle");
        };
        assert_eq!(centre, Vec2::new(10.0, 20.0));
        assert_eq!(radius, 2.0);
        assert!((colour.alpha - 0.5).abs() < 0.0001);

        let DrawCommand::GradientCircle { radius, gradient, .. } = surface.commands[1] else {
            panic!("Expected a gradient circle");
        };
        assert_eq!(radius, 2.0);
        assert_eq!(gradient.radius, 6.0);
        assert!((gradient.inner.alpha - 0.15).abs() < 0.0001);
        assert!(gradient.outer.alpha.abs() < 0.0001);
    }

    #[test]
    fn frame_clears_then_draws_lines_then_particles_in_order() {
        let mut field = field_with(vec![still(0.0, 0.0), still(10.0, 0.0)], 800, 600);
        let mut surface = RecordingSurface::default();
        field.frame(&mut surface);

        let kinds: Vec<&str> = surface.commands.iter().map(DrawCommand::kind).collect();
        assert_eq!(
            kinds,
            vec!["clear", "line", "circle", "gradient", "circle", "gradient"]
        );
        let DrawCommand::Circle { centre, .. } = surface.commands[4] else {
            panic!("Expected a circle");
        };
        assert_eq!(centre, Vec2::new(10.0, 0.0));
    }
}
