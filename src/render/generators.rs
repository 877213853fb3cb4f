//! Générateurs pas à pas : chaque appel à `step` dessine un pixel, un point
//! ou un segment sur le canevas.
//!
//! Le même générateur sert au rendu complet (épuisé d'une traite) et au rendu
//! progressif (suspendu à chaque point de contrôle), ce qui garantit des
//! images identiques dans les deux modes.

use image::{Rgb, RgbImage};
use log::debug;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::color::{escape_color, BLACK, LINE_WHITE, PLOT_GREEN};
use crate::fractal::chaos_game::{random_start, sierpinski_vertices, ChaosGame};
use crate::fractal::ifs::{FernProjection, Ifs, IfsSampler};
use crate::fractal::vectorial::{draw_line, koch_snowflake, Point, Subdivision};
use crate::fractal::{evaluate, EscapeRule, FractalKind, FractalParams, Viewport};

/// Cadence des instantanés escape-time : pixels dont x et y sont multiples de 10.
pub const ESCAPE_TIME_CADENCE: u32 = 10;
/// Cadence des instantanés pour le chaos game et la fougère (en points).
pub const POINT_CADENCE: u64 = 100;
/// Cadence des instantanés pour Koch (en segments).
pub const SEGMENT_CADENCE: u64 = 10;

/// Résultat d'un pas de génération.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// Pas effectué, pas de point de contrôle.
    Continue,
    /// Pas effectué ; le canevas peut être présenté et l'annulation vérifiée.
    Checkpoint,
    /// Plus rien à générer.
    Exhausted,
}

pub trait Generator {
    fn step(&mut self, canvas: &mut RgbImage) -> Step;
}

/// Mandelbrot / Julia, colonne par colonne (x externe, y interne).
///
/// Les pixels intérieurs (noirs) ne sont pas écrits : un canevas initialisé
/// avec une image de fond la laisse apparaître.
pub struct EscapeTimeGenerator {
    viewport: Viewport,
    rule: EscapeRule,
    max_iter: u32,
    x: u32,
    y: u32,
}

impl EscapeTimeGenerator {
    pub fn new(viewport: Viewport, rule: EscapeRule, max_iter: u32) -> Self {
        Self { viewport, rule, max_iter, x: 0, y: 0 }
    }
}

impl Generator for EscapeTimeGenerator {
    fn step(&mut self, canvas: &mut RgbImage) -> Step {
        let (w, h) = (self.viewport.width_px(), self.viewport.height_px());
        if self.x >= w {
            return Step::Exhausted;
        }
        let (x, y) = (self.x, self.y);

        let result = evaluate(self.viewport.map(x, y), self.rule, self.max_iter);
        let color = escape_color(result, self.max_iter);
        if color != BLACK && x < canvas.width() && y < canvas.height() {
            canvas.put_pixel(x, y, color);
        }

        self.y += 1;
        if self.y >= h {
            self.y = 0;
            self.x += 1;
        }

        if x % ESCAPE_TIME_CADENCE == 0 && y % ESCAPE_TIME_CADENCE == 0 {
            Step::Checkpoint
        } else {
            Step::Continue
        }
    }
}

/// Dessine un disque plein de rayon 1 (le pixel et ses 4 voisins).
fn plot_dot(canvas: &mut RgbImage, p: Point, color: Rgb<u8>) {
    let cx = p.x as i64;
    let cy = p.y as i64;
    for (dx, dy) in [(0, 0), (-1, 0), (1, 0), (0, -1), (0, 1)] {
        let (x, y) = (cx + dx, cy + dy);
        if x >= 0 && y >= 0 && (x as u32) < canvas.width() && (y as u32) < canvas.height() {
            canvas.put_pixel(x as u32, y as u32, color);
        }
    }
}

pub struct ChaosGameGenerator {
    game: ChaosGame<StdRng>,
    index: u64,
}

impl Generator for ChaosGameGenerator {
    fn step(&mut self, canvas: &mut RgbImage) -> Step {
        let Some(point) = self.game.next() else {
            return Step::Exhausted;
        };
        plot_dot(canvas, point, PLOT_GREEN);
        let index = self.index;
        self.index += 1;
        if index % POINT_CADENCE == 0 {
            Step::Checkpoint
        } else {
            Step::Continue
        }
    }
}

pub struct KochGenerator {
    leaves: Subdivision,
    index: u64,
}

impl Generator for KochGenerator {
    fn step(&mut self, canvas: &mut RgbImage) -> Step {
        let Some((start, end)) = self.leaves.next() else {
            return Step::Exhausted;
        };
        draw_line(canvas, start, end, LINE_WHITE);
        let index = self.index;
        self.index += 1;
        if index % SEGMENT_CADENCE == 0 {
            Step::Checkpoint
        } else {
            Step::Continue
        }
    }
}

pub struct FernGenerator {
    sampler: IfsSampler<StdRng>,
    projection: FernProjection,
    index: u64,
}

impl Generator for FernGenerator {
    fn step(&mut self, canvas: &mut RgbImage) -> Step {
        let Some(sample) = self.sampler.next() else {
            return Step::Exhausted;
        };
        let index = self.index;
        self.index += 1;
        // Les points hors raster sont ignorés silencieusement.
        match self.projection.project(sample.x, sample.y) {
            Some((px, py)) => {
                canvas.put_pixel(px, py, PLOT_GREEN);
                if index % POINT_CADENCE == 0 {
                    Step::Checkpoint
                } else {
                    Step::Continue
                }
            }
            None => Step::Continue,
        }
    }
}

/// Générateur aléatoire : reproductible si une graine est fournie.
pub fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Construit le générateur correspondant au type de fractale.
pub fn generator_for(params: &FractalParams) -> Box<dyn Generator + Send> {
    if let Some(rule) = EscapeRule::for_params(params) {
        return Box::new(EscapeTimeGenerator::new(params.viewport, rule, params.max_iter));
    }
    let mut rng = make_rng(params.rng_seed);
    match params.kind {
        FractalKind::Sierpinski => {
            let vertices = sierpinski_vertices(params.width, params.height);
            let start = random_start(&mut rng, params.width, params.height);
            Box::new(ChaosGameGenerator {
                game: ChaosGame::new(vertices, params.point_count, start, rng),
                index: 0,
            })
        }
        FractalKind::Koch => {
            let roots = koch_snowflake(params.width, params.height, params.koch_depth);
            Box::new(KochGenerator { leaves: Subdivision::from_roots(&roots), index: 0 })
        }
        FractalKind::BarnsleyFern => Box::new(FernGenerator {
            sampler: IfsSampler::new(Ifs::barnsley_fern(), params.point_count, rng),
            projection: FernProjection::new(params.width, params.height),
            index: 0,
        }),
        FractalKind::Mandelbrot | FractalKind::Julia => {
            unreachable!("{} a une règle escape-time", params.kind.name())
        }
    }
}

/// Canevas noir aux dimensions du rendu.
pub fn blank_canvas(params: &FractalParams) -> RgbImage {
    RgbImage::new(params.width, params.height)
}

/// Épuise le générateur sur `canvas`.
pub fn run_to_completion(generator: &mut dyn Generator, canvas: &mut RgbImage) -> u64 {
    let mut steps = 0u64;
    while generator.step(canvas) != Step::Exhausted {
        steps += 1;
    }
    steps
}

/// Rendu complet (non animé) d'une fractale.
pub fn render_still(params: &FractalParams) -> RgbImage {
    let mut canvas = blank_canvas(params);
    render_onto(params, &mut canvas);
    canvas
}

/// Rendu complet sur un canevas existant (fond éventuel).
pub fn render_onto(params: &FractalParams, canvas: &mut RgbImage) {
    let mut generator = generator_for(params);
    let steps = run_to_completion(generator.as_mut(), canvas);
    debug!(
        "{} rendu en {} pas ({}x{}, max_iter={})",
        params.kind.name(),
        steps,
        params.width,
        params.height,
        params.max_iter
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fractal::default_params_for_kind;

    fn small(kind: FractalKind) -> FractalParams {
        let mut p = default_params_for_kind(kind, 64, 64).unwrap();
        p.rng_seed = Some(17);
        p
    }

    #[test]
    fn test_escape_time_visits_every_pixel_column_major() {
        let p = small(FractalKind::Mandelbrot);
        let mut gen = EscapeTimeGenerator::new(p.viewport, EscapeRule::Mandelbrot, p.max_iter);
        let mut canvas = blank_canvas(&p);
        let mut checkpoints = 0;
        let mut steps = 0;
        loop {
            match gen.step(&mut canvas) {
                Step::Exhausted => break,
                Step::Checkpoint => checkpoints += 1,
                Step::Continue => {}
            }
            steps += 1;
        }
        assert_eq!(steps, 64 * 64);
        // x et y dans {0, 10, ..., 60}.
        assert_eq!(checkpoints, 7 * 7);
        assert_eq!(gen.step(&mut canvas), Step::Exhausted);
    }

    #[test]
    fn test_mandelbrot_still_has_black_interior_and_colored_exterior() {
        let p = small(FractalKind::Mandelbrot);
        let img = render_still(&p);
        // c = 0 -> pixel (42.67, 32) : intérieur.
        let view = p.viewport;
        let interior = (0..64).find(|&x| view.map(x, 32).re.abs() < 0.05).unwrap();
        assert_eq!(*img.get_pixel(interior, 32), BLACK);
        // Coin (-2, -1.5) : s'échappe.
        assert_ne!(*img.get_pixel(0, 0), BLACK);
    }

    #[test]
    fn test_julia_render_uses_julia_constant() {
        let p = small(FractalKind::Julia);
        let img = render_still(&p);
        let rule = EscapeRule::Julia { k: p.julia_constant };
        for (x, y) in [(0, 0), (32, 32), (20, 40), (63, 10)] {
            let expected = escape_color(evaluate(p.viewport.map(x, y), rule, p.max_iter), p.max_iter);
            assert_eq!(*img.get_pixel(x, y), expected);
        }
    }

    #[test]
    fn test_escape_time_render_is_deterministic() {
        let p = small(FractalKind::Julia);
        assert_eq!(render_still(&p), render_still(&p));
    }

    #[test]
    fn test_background_shows_through_interior() {
        let p = small(FractalKind::Julia);
        let bg = Rgb([10, 20, 30]);
        let mut canvas = RgbImage::from_pixel(64, 64, bg);
        render_onto(&p, &mut canvas);
        let plain = render_still(&p);
        for (a, b) in canvas.pixels().zip(plain.pixels()) {
            if *b == BLACK {
                assert_eq!(*a, bg);
            } else {
                assert_eq!(a, b);
            }
        }
    }

    #[test]
    fn test_seeded_samplers_are_reproducible() {
        for kind in [FractalKind::Sierpinski, FractalKind::BarnsleyFern] {
            let p = small(kind);
            let img = render_still(&p);
            assert_eq!(img, render_still(&p));
            assert!(img.pixels().any(|px| *px == PLOT_GREEN));
        }
    }

    #[test]
    fn test_koch_draws_white_outline() {
        let mut p = small(FractalKind::Koch);
        p.koch_depth = 2;
        let mut gen = generator_for(&p);
        let mut canvas = blank_canvas(&p);
        assert_eq!(run_to_completion(gen.as_mut(), &mut canvas), 3 * 16);
        assert!(canvas.pixels().any(|px| *px == LINE_WHITE));
    }

    #[test]
    fn test_sierpinski_checkpoint_cadence() {
        let mut p = small(FractalKind::Sierpinski);
        p.point_count = 1000;
        let mut gen = generator_for(&p);
        let mut canvas = blank_canvas(&p);
        let mut checkpoints = 0;
        loop {
            match gen.step(&mut canvas) {
                Step::Exhausted => break,
                Step::Checkpoint => checkpoints += 1,
                Step::Continue => {}
            }
        }
        assert_eq!(checkpoints, 10);
    }
}
