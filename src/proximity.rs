// Finds the pairs of particles close enough to be connected. Small fields are
// searched pair by pair; large ones go through a uniform grid whose cells are
// as wide as the connection threshold, so only the 3x3 neighbourhood of a
// particle can hold a partner. Both searches return the same edges in the
// same order (sorted by `from`, then `to`).

use crate::particle::Particle;
use vecmath::{vec2_len, vec2_sub};

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Edge {
    pub from: usize,
    pub to: usize,
    pub distance: f64,
}

pub fn distance(a: [f64; 2], b: [f64; 2]) -> f64 {
    vec2_len(vec2_sub(b, a))
}

// Linear falloff: `ceiling` as the distance goes to zero, 0 at the threshold
pub fn edge_alpha(distance: f64, threshold: f64, ceiling: f64) -> f64 {
    if threshold <= 0.0 || distance >= threshold {
        return 0.0;
    }
    (1.0 - distance.max(0.0) / threshold) * ceiling
}

pub fn find_edges(particles: &[Particle], threshold: f64, grid_min_particles: usize) -> Vec<Edge> {
    if particles.len() > grid_min_particles {
        find_edges_grid(particles, threshold)
    } else {
        find_edges_brute_force(particles, threshold)
    }
}

pub fn find_edges_brute_force(particles: &[Particle], threshold: f64) -> Vec<Edge> {
    let mut edges = Vec::new();
    for i in 0..particles.len() {
        for j in (i + 1)..particles.len() {
            let d = distance(particles[i].pos, particles[j].pos);
            if d < threshold {
                edges.push(Edge {
                    from: i,
                    to: j,
                    distance: d,
                });
            }
        }
    }
    edges
}

pub fn find_edges_grid(particles: &[Particle], threshold: f64) -> Vec<Edge> {
    if particles.is_empty() || !(threshold > 0.0) {
        return Vec::new();
    }
    let grid = Grid::build(particles, threshold);
    let mut edges = Vec::new();
    for (i, p) in particles.iter().enumerate() {
        let (cx, cy) = grid.cell_of(p.pos);
        for ny in cy.saturating_sub(1)..=(cy + 1).min(grid.rows - 1) {
            for nx in cx.saturating_sub(1)..=(cx + 1).min(grid.cols - 1) {
                for &j in &grid.cells[ny * grid.cols + nx] {
                    if j <= i {
                        continue;
                    }
                    let d = distance(p.pos, particles[j].pos);
                    if d < threshold {
                        edges.push(Edge {
                            from: i,
                            to: j,
                            distance: d,
                        });
                    }
                }
            }
        }
    }
    edges.sort_by(|a, b| (a.from, a.to).cmp(&(b.from, b.to)));
    edges
}

struct Grid {
    origin: [f64; 2],
    cell_size: f64,
    cols: usize,
    rows: usize,
    cells: Vec<Vec<usize>>,
}

impl Grid {
    fn build(particles: &[Particle], cell_size: f64) -> Grid {
        // Bounds come from the particles themselves so the grid works for any
        // coordinates, not just positions inside the surface
        let mut min = [std::f64::INFINITY; 2];
        let mut max = [std::f64::NEG_INFINITY; 2];
        for p in particles {
            for axis in 0..2 {
                min[axis] = min[axis].min(p.pos[axis]);
                max[axis] = max[axis].max(p.pos[axis]);
            }
        }
        let cols = ((max[0] - min[0]) / cell_size).floor() as usize + 1;
        let rows = ((max[1] - min[1]) / cell_size).floor() as usize + 1;
        let mut grid = Grid {
            origin: min,
            cell_size,
            cols,
            rows,
            cells: vec![Vec::new(); cols * rows],
        };
        for (i, p) in particles.iter().enumerate() {
            let (cx, cy) = grid.cell_of(p.pos);
            grid.cells[cy * cols + cx].push(i);
        }
        grid
    }

    fn cell_of(&self, pos: [f64; 2]) -> (usize, usize) {
        let cx = ((pos[0] - self.origin[0]) / self.cell_size).floor() as usize;
        let cy = ((pos[1] - self.origin[1]) / self.cell_size).floor() as usize;
        (cx.min(self.cols - 1), cy.min(self.rows - 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{Color, Theme};
    use crate::config::FieldConfig;
    use crate::population::seed_population;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn at(x: f64, y: f64) -> Particle {
        Particle::new(x, y, 0.0, 0.0, 1.0, 0.5, Color::from_u32(0xffffffff))
    }

    #[test]
    fn pair_at_one_hundred_units_is_connected() {
        let particles = vec![at(0.0, 0.0), at(100.0, 0.0)];
        let edges = find_edges_brute_force(&particles, 150.0);
        assert_eq!(
            edges,
            vec![Edge {
                from: 0,
                to: 1,
                distance: 100.0
            }]
        );
        let alpha = edge_alpha(edges[0].distance, 150.0, 0.15);
        assert!((alpha - 0.05).abs() < 1e-12);
    }

    #[test]
    fn threshold_is_exclusive() {
        let particles = vec![at(0.0, 0.0), at(150.0, 0.0), at(0.0, 149.9)];
        let edges = find_edges_brute_force(&particles, 150.0);
        assert_eq!(edges.len(), 1);
        assert_eq!((edges[0].from, edges[0].to), (0, 2));
    }

    #[test]
    fn no_self_edges_and_each_pair_once() {
        let particles = vec![at(10.0, 10.0), at(10.0, 10.0), at(20.0, 10.0)];
        let edges = find_edges_brute_force(&particles, 150.0);
        let pairs: Vec<(usize, usize)> = edges.iter().map(|e| (e.from, e.to)).collect();
        assert_eq!(pairs, vec![(0, 1), (0, 2), (1, 2)]);
    }

    #[test]
    fn alpha_falls_off_linearly() {
        assert_eq!(edge_alpha(150.0, 150.0, 0.15), 0.0);
        assert_eq!(edge_alpha(200.0, 150.0, 0.15), 0.0);
        assert!((edge_alpha(75.0, 150.0, 0.15) - 0.075).abs() < 1e-12);
        assert!(edge_alpha(1e-9, 150.0, 0.15) < 0.15);
        let mut previous = edge_alpha(0.0, 150.0, 0.15);
        assert!(previous <= 0.15);
        for step in 1..=150 {
            let alpha = edge_alpha(step as f64, 150.0, 0.15);
            assert!(alpha < previous);
            previous = alpha;
        }
    }

    #[test]
    fn grid_matches_brute_force() {
        let config = FieldConfig::default();
        for seed in 0..8 {
            let mut rng = StdRng::seed_from_u64(seed);
            let particles =
                seed_population(&mut rng, 1920.0, 1080.0, Theme::Dark.palette(), &config);
            let brute = find_edges_brute_force(&particles, 150.0);
            let grid = find_edges_grid(&particles, 150.0);
            assert!(!brute.is_empty());
            assert_eq!(brute, grid);
        }
    }

    #[test]
    fn grid_handles_cell_boundaries() {
        // Partners straddling cell borders, including the far corner
        let particles = vec![
            at(149.9, 149.9),
            at(150.1, 150.1),
            at(0.0, 0.0),
            at(299.0, 0.0),
            at(300.0, 10.0),
        ];
        assert_eq!(
            find_edges_brute_force(&particles, 150.0),
            find_edges_grid(&particles, 150.0)
        );
    }

    #[test]
    fn find_edges_switches_strategy_by_size() {
        let mut rng = StdRng::seed_from_u64(77);
        let particles = seed_population(
            &mut rng,
            1000.0,
            1000.0,
            Theme::Light.palette(),
            &FieldConfig::default(),
        );
        assert_eq!(
            find_edges(&particles, 150.0, 0),
            find_edges(&particles, 150.0, usize::max_value())
        );
        assert!(find_edges(&[], 150.0, 0).is_empty());
    }
}
