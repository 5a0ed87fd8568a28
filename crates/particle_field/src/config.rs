//! All the variables that can be configured for the particle field

/// All the config for the particle field.
#[derive(serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
#[non_exhaustive]
pub struct Config {
    /// The number of particles. Fixed for the lifetime of the simulation.
    pub particle_count: usize,
    /// The largest speed, in pixels per frame, that a particle can start with on either axis.
    pub max_initial_speed: f32,
    /// The smallest and largest radius of a particle.
    pub radius_range: (f32, f32),
    /// The faintest and strongest opacity of a particle.
    pub opacity_range: (f32, f32),
    /// Particles closer than this are joined by a line.
    pub connection_threshold: f32,
    /// The opacity of a connecting line between two particles at the same position.
    pub connection_max_opacity: f32,
    /// The width of connecting lines.
    pub line_width: f32,
    /// The distance from the pointer within which particles are pushed away.
    pub influence_radius: f32,
    /// How hard the pointer pushes.
    pub repulsion_strength: f32,
    /// Per-frame multiplier applied to every velocity.
    pub damping: f32,
    /// The RGB colour of the particles and their connections.
    pub colour: (u8, u8, u8),
    /// The size of a particle's glow relative to its radius.
    pub glow_radius_factor: f32,
    /// The opacity at the centre of the glow relative to the particle's opacity.
    pub glow_opacity_factor: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            particle_count: 150,
            max_initial_speed: 0.25,
            radius_range: (1.0, 3.0),
            opacity_range: (0.2, 0.7),
            connection_threshold: 120.0,
            connection_max_opacity: 0.15,
            line_width: 0.5,
            influence_radius: 150.0,
            repulsion_strength: 0.1,
            damping: 0.99,
            colour: (0, 102, 255),
            glow_radius_factor: 3.0,
            glow_opacity_factor: 0.3,
        }
    }
}

impl Config {
    /// The particle colour at the given opacity.
    #[must_use]
    pub fn colour_with_opacity(&self, opacity: f32) -> crate::surface::Colour {
        crate::surface::rgba(self.colour, opacity)
    }
}
