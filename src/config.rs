// Tunable constants for the particle field. Defaults match the values the
// background has always shipped with.

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FieldConfig {
    // Surface area (px²) per spawned particle
    pub density: f64,
    // Per-axis velocity bound, units/frame
    pub max_speed: f64,
    pub radius_range: (f64, f64),
    pub opacity_range: (f64, f64),
    // Pairs closer than this are connected
    pub connection_threshold: f64,
    // Edge alpha as the distance goes to zero
    pub edge_alpha: f64,
    pub line_width: f64,
    // CSS opacity of the overlay canvas element
    pub overlay_opacity: f64,
    // Above this many particles pair search goes through the grid
    pub spatial_index_min_particles: usize,
    pub profile_frames: bool,
}

impl FieldConfig {
    pub const DENSITY: f64 = 15000.0;
    pub const CONNECTION_THRESHOLD: f64 = 150.0;

    pub fn with_density(mut self, density: f64) -> Self {
        self.density = density;
        self
    }

    pub fn with_connection_threshold(mut self, threshold: f64) -> Self {
        self.connection_threshold = threshold;
        self
    }

    pub fn with_spatial_index_min_particles(mut self, min_particles: usize) -> Self {
        self.spatial_index_min_particles = min_particles;
        self
    }

    pub fn with_profile_frames(mut self, enabled: bool) -> Self {
        self.profile_frames = enabled;
        self
    }
}

impl Default for FieldConfig {
    fn default() -> Self {
        FieldConfig {
            density: FieldConfig::DENSITY,
            max_speed: 0.15,
            radius_range: (0.5, 2.5),
            opacity_range: (0.1, 0.6),
            connection_threshold: FieldConfig::CONNECTION_THRESHOLD,
            edge_alpha: 0.15,
            line_width: 0.5,
            overlay_opacity: 0.6,
            spatial_index_min_particles: 512,
            profile_frames: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::population::population_size;

    #[test]
    fn defaults_match_shipped_values() {
        let config = FieldConfig::default();
        assert_eq!(config.density, 15000.0);
        assert_eq!(config.connection_threshold, 150.0);
        assert_eq!(config.edge_alpha, 0.15);
        assert_eq!(config.line_width, 0.5);
        assert_eq!(config.overlay_opacity, 0.6);
        assert!(!config.profile_frames);
    }

    #[test]
    fn builders_override_single_fields() {
        let config = FieldConfig::default()
            .with_density(5000.0)
            .with_connection_threshold(80.0)
            .with_profile_frames(true);
        assert_eq!(population_size(300.0, 300.0, config.density), 18);
        assert_eq!(config.connection_threshold, 80.0);
        assert!(config.profile_frames);
        assert_eq!(config.max_speed, FieldConfig::default().max_speed);
    }
}
