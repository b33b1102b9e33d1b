// Renderer that draws one frame of the field: every particle as a filled
// disc, every close pair as a faint line. Drawing goes through the `Surface`
// trait; `CanvasSurface` implements it on top of a 2D canvas context.

use crate::color::Color;
use crate::config::FieldConfig;
use crate::error::{describe_js, EngineError};
use crate::particle::Particle;
use crate::proximity::{edge_alpha, find_edges, Edge};
use crate::utils::Timer;
use std::f64::consts::PI;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

pub trait Surface {
    // Resize the backing buffer so drawing uses the new coordinate space
    fn resize(&mut self, width: u32, height: u32);
    fn clear(&mut self, width: f64, height: f64);
    fn fill_disc(
        &mut self,
        center: [f64; 2],
        radius: f64,
        color: Color,
        alpha: f64,
    ) -> Result<(), EngineError>;
    fn stroke_segment(
        &mut self,
        from: [f64; 2],
        to: [f64; 2],
        color: Color,
        alpha: f64,
        line_width: f64,
    ) -> Result<(), EngineError>;
    // Restore any per-frame drawing state
    fn finish_frame(&mut self) {}
}

pub struct Renderer {
    config: FieldConfig,
}

impl Renderer {
    pub fn new(config: FieldConfig) -> Self {
        Renderer { config }
    }

    pub fn render_frame<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        particles: &[Particle],
        width: f64,
        height: f64,
    ) -> Result<(), EngineError> {
        let _timer = Timer::new("Renderer::render_frame", self.config.profile_frames);
        surface.clear(width, height);

        let threshold = self.config.connection_threshold;
        let edges = {
            let _timer = Timer::new("find edges", self.config.profile_frames);
            find_edges(
                particles,
                threshold,
                self.config.spatial_index_min_particles,
            )
        };

        let drawn = self.draw_graph(&mut *surface, particles, &edges);
        // Reset even when a draw failed so the next frame starts clean
        surface.finish_frame();
        drawn
    }

    // Edges come sorted by `from`, so each particle's disc is followed by
    // the lines it starts
    fn draw_graph<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        particles: &[Particle],
        edges: &[Edge],
    ) -> Result<(), EngineError> {
        let threshold = self.config.connection_threshold;
        let mut edges = edges.iter().peekable();
        for (i, p) in particles.iter().enumerate() {
            surface.fill_disc(p.pos, p.radius(), p.color(), p.opacity())?;
            while let Some(edge) = edges.peek() {
                if edge.from != i {
                    break;
                }
                let other = &particles[edge.to];
                surface.stroke_segment(
                    p.pos,
                    other.pos,
                    p.color(),
                    edge_alpha(edge.distance, threshold, self.config.edge_alpha),
                    self.config.line_width,
                )?;
                edges.next();
            }
        }
        Ok(())
    }
}

pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
}

impl CanvasSurface {
    // Grabs the 2D context from the canvas
    pub fn acquire(canvas: HtmlCanvasElement) -> Result<Self, EngineError> {
        let context = canvas
            .get_context("2d")
            .map_err(|e| EngineError::SurfaceUnavailable(describe_js(&e)))?
            .ok_or_else(|| {
                EngineError::SurfaceUnavailable("canvas has no 2d context".to_owned())
            })?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| {
                EngineError::SurfaceUnavailable("context is not a 2d context".to_owned())
            })?;
        Ok(CanvasSurface { canvas, context })
    }
}

#[allow(deprecated)]
impl Surface for CanvasSurface {
    fn resize(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }

    fn clear(&mut self, width: f64, height: f64) {
        self.context.clear_rect(0.0, 0.0, width, height);
    }

    fn fill_disc(
        &mut self,
        center: [f64; 2],
        radius: f64,
        color: Color,
        alpha: f64,
    ) -> Result<(), EngineError> {
        self.context.begin_path();
        self.context
            .arc(center[0], center[1], radius, 0.0, PI * 2.0)
            .map_err(|e| EngineError::Render(describe_js(&e)))?;
        self.context
            .set_fill_style(&JsValue::from_str(&color.to_css()));
        self.context.set_global_alpha(alpha);
        self.context.fill();
        Ok(())
    }

    fn stroke_segment(
        &mut self,
        from: [f64; 2],
        to: [f64; 2],
        color: Color,
        alpha: f64,
        line_width: f64,
    ) -> Result<(), EngineError> {
        self.context.begin_path();
        self.context.move_to(from[0], from[1]);
        self.context.line_to(to[0], to[1]);
        self.context
            .set_stroke_style(&JsValue::from_str(&color.to_css()));
        self.context.set_global_alpha(alpha);
        self.context.set_line_width(line_width);
        self.context.stroke();
        Ok(())
    }

    fn finish_frame(&mut self) {
        self.context.set_global_alpha(1.0);
    }
}


#[cfg(test)]
mod tests {
    use super::recording::{DrawCall, RecordingSurface};
    use super::*;
    use crate::color::Theme;
    use crate::population::seed_population;
    use crate::proximity::{distance, find_edges_brute_force};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    const RED: Color = Color::from_u32(0xff0000ff);
    const BLUE: Color = Color::from_u32(0x0000ffff);

    fn render(particles: &[Particle], width: f64, height: f64) -> RecordingSurface {
        let mut surface = RecordingSurface::default();
        Renderer::new(FieldConfig::default())
            .render_frame(&mut surface, particles, width, height)
            .unwrap();
        surface
    }

    #[test]
    fn clears_before_drawing_and_resets_at_end() {
        let particles = vec![Particle::new(5.0, 5.0, 0.0, 0.0, 1.0, 0.3, RED)];
        let surface = render(&particles, 300.0, 200.0);
        assert_eq!(surface.calls.first(), Some(&DrawCall::Clear(300.0, 200.0)));
        assert_eq!(surface.calls.last(), Some(&DrawCall::FinishFrame));
    }

    #[test]
    fn disc_uses_particle_attributes() {
        let particles = vec![Particle::new(5.0, 6.0, 0.1, 0.1, 2.25, 0.3, RED)];
        let surface = render(&particles, 300.0, 200.0);
        assert_eq!(
            surface.discs(),
            vec![&DrawCall::Disc {
                center: [5.0, 6.0],
                radius: 2.25,
                color: RED,
                alpha: 0.3,
            }]
        );
        assert!(surface.segments().is_empty());
    }

    #[test]
    fn close_pair_gets_one_faint_edge_in_first_color() {
        let particles = vec![
            Particle::new(0.0, 0.0, 0.0, 0.0, 1.0, 0.5, RED),
            Particle::new(100.0, 0.0, 0.0, 0.0, 1.0, 0.5, BLUE),
        ];
        let surface = render(&particles, 300.0, 300.0);
        let segments = surface.segments();
        assert_eq!(segments.len(), 1);
        match segments[0] {
            DrawCall::Segment {
                from,
                to,
                color,
                alpha,
                line_width,
            } => {
                assert_eq!(*from, [0.0, 0.0]);
                assert_eq!(*to, [100.0, 0.0]);
                assert_eq!(*color, RED);
                assert!((alpha - 0.05).abs() < 1e-12);
                assert_eq!(*line_width, 0.5);
            }
            other => panic!("unexpected call {:?}", other),
        }
        // disc 0, its edge, then disc 1
        assert!(matches!(surface.calls[2], DrawCall::Segment { .. }));
    }

    #[test]
    fn draws_every_disc_and_exactly_the_close_pairs() {
        let mut rng = StdRng::seed_from_u64(21);
        let particles = seed_population(
            &mut rng,
            1920.0,
            1080.0,
            Theme::Dark.palette(),
            &FieldConfig::default(),
        );
        assert_eq!(particles.len(), 138);
        let surface = render(&particles, 1920.0, 1080.0);
        assert_eq!(surface.discs().len(), particles.len());

        let mut drawn = HashSet::new();
        for call in surface.segments() {
            if let DrawCall::Segment { from, to, .. } = call {
                let i = particles.iter().position(|p| p.pos == *from).unwrap();
                let j = particles.iter().position(|p| p.pos == *to).unwrap();
                assert!(i < j);
                assert!(distance(*from, *to) < 150.0);
                assert!(drawn.insert((i, j)), "edge drawn twice");
            }
        }
        let expected: HashSet<(usize, usize)> = find_edges_brute_force(&particles, 150.0)
            .iter()
            .map(|e| (e.from, e.to))
            .collect();
        assert_eq!(drawn, expected);
    }

    #[test]
    fn grid_search_draws_the_same_frame() {
        let mut rng = StdRng::seed_from_u64(4);
        let particles = seed_population(
            &mut rng,
            1600.0,
            900.0,
            Theme::Light.palette(),
            &FieldConfig::default(),
        );
        let mut brute = RecordingSurface::default();
        Renderer::new(FieldConfig::default().with_spatial_index_min_particles(usize::max_value()))
            .render_frame(&mut brute, &particles, 1600.0, 900.0)
            .unwrap();
        let mut grid = RecordingSurface::default();
        Renderer::new(FieldConfig::default().with_spatial_index_min_particles(0))
            .render_frame(&mut grid, &particles, 1600.0, 900.0)
            .unwrap();
        assert_eq!(brute.calls, grid.calls);
    }

    #[test]
    fn empty_field_only_clears() {
        let surface = render(&[], 0.0, 0.0);
        assert_eq!(
            surface.calls,
            vec![DrawCall::Clear(0.0, 0.0), DrawCall::FinishFrame]
        );
    }

    #[test]
    fn surface_failure_propagates_after_resetting_state() {
        let particles = vec![
            Particle::new(0.0, 0.0, 0.0, 0.0, 1.0, 0.5, RED),
            Particle::new(10.0, 0.0, 0.0, 0.0, 1.0, 0.5, RED),
        ];
        let mut surface = RecordingSurface {
            fail_after: Some(1),
            ..Default::default()
        };
        let result =
            Renderer::new(FieldConfig::default()).render_frame(&mut surface, &particles, 50.0, 50.0);
        assert!(matches!(result, Err(EngineError::Render(_))));
        assert_eq!(surface.segments().len(), 0);
        assert_eq!(surface.calls.last(), Some(&DrawCall::FinishFrame));
        assert_eq!(surface.count(|c| matches!(c, DrawCall::FinishFrame)), 1);
    }
}
