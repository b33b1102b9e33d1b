// Advances the field by one tick: every particle drifts by its velocity and
// particles leaving the surface reappear on the opposite edge.

use crate::particle::Particle;
use vecmath::vec2_add;

pub fn step(particles: &mut [Particle], width: f64, height: f64) {
    for particle in particles.iter_mut() {
        let [x, y] = vec2_add(particle.pos, particle.vel());
        particle.pos = [wrap(x, width), wrap(y, height)];
    }
}

// Clamp to the opposite edge rather than wrapping by the overshoot. The far
// edge is exclusive, so "width" lands on the last value below it.
fn wrap(coord: f64, extent: f64) -> f64 {
    if coord < 0.0 {
        far_edge(extent)
    } else if coord >= extent {
        0.0
    } else {
        coord
    }
}

fn far_edge(extent: f64) -> f64 {
    if extent > 0.0 && extent.is_finite() {
        f64::from_bits(extent.to_bits() - 1)
    } else {
        0.0
    }
}
