// Builds a fresh set of particles for a surface of the given size.
// The count scales with the area; nothing is carried over between calls.

use crate::color::Palette;
use crate::config::FieldConfig;
use crate::particle::Particle;
use rand::Rng;

pub fn population_size(width: f64, height: f64, density: f64) -> usize {
    // Also rejects NaN dimensions
    if !(width > 0.0 && height > 0.0 && density > 0.0) {
        return 0;
    }
    let count = (width * height / density).floor();
    if count.is_finite() {
        count as usize
    } else {
        0
    }
}

pub fn seed_population<R: Rng + ?Sized>(
    rng: &mut R,
    width: f64,
    height: f64,
    palette: Palette,
    config: &FieldConfig,
) -> Vec<Particle> {
    let count = population_size(width, height, config.density);
    let (min_radius, max_radius) = config.radius_range;
    let (min_opacity, max_opacity) = config.opacity_range;
    let speed = config.max_speed;

    let mut particles = Vec::with_capacity(count);
    for _ in 0..count {
        let pos_x = rng.gen_range(0.0, width);
        let pos_y = rng.gen_range(0.0, height);
        let vel_x = sample(rng, -speed, speed);
        let vel_y = sample(rng, -speed, speed);
        let radius = sample(rng, min_radius, max_radius);
        let opacity = sample(rng, min_opacity, max_opacity);
        let color = palette.pick(rng);
        particles.push(Particle::new(
            pos_x, pos_y, vel_x, vel_y, radius, opacity, color,
        ));
    }
    particles
}

// Uniform in [low, high); an empty range gives `low`
fn sample<R: Rng + ?Sized>(rng: &mut R, low: f64, high: f64) -> f64 {
    if low < high {
        rng.gen::<f64>() * (high - low) + low
    } else {
        low
    }
}
