use num_complex::Complex64;

use crate::error::FractalError;
use crate::fractal::{FractalKind, FractalParams, Viewport};

/// Taille de raster par défaut.
pub const DEFAULT_WIDTH: u32 = 800;
pub const DEFAULT_HEIGHT: u32 = 800;

/// Plafond d'itérations par défaut pour Mandelbrot et Julia.
pub const MAX_ITER: u32 = 100;

pub const MANDELBROT_BOUNDS: (f64, f64, f64, f64) = (-2.0, 1.0, -1.5, 1.5);
pub const JULIA_BOUNDS: (f64, f64, f64, f64) = (-1.5, 1.5, -1.5, 1.5);
pub const JULIA_CONSTANT: Complex64 = Complex64::new(-0.7, 0.27);

/// Points tracés par le chaos game.
pub const SIERPINSKI_POINTS: u32 = 50_000;
/// Marge (pixels) entre les sommets du triangle et le bord du raster.
pub const SIERPINSKI_MARGIN: u32 = 50;

pub const KOCH_DEPTH: u32 = 4;
/// Demi-taille du triangle initial rapportée au plus petit côté (300 px pour 800 px).
pub const KOCH_SIZE_RATIO: f64 = 300.0 / 800.0;

pub const FERN_POINTS: u32 = 100_000;

/// Construit les paramètres par défaut d'un type de fractale.
///
/// Seules les dimensions du raster varient d'une invocation à l'autre ;
/// bornes, nombres de points et profondeur sont des constantes nommées.
pub fn default_params_for_kind(
    kind: FractalKind,
    width: u32,
    height: u32,
) -> Result<FractalParams, FractalError> {
    let (x_min, x_max, y_min, y_max) = match kind {
        FractalKind::Julia => JULIA_BOUNDS,
        // Les fractales géométriques travaillent en pixels ; le viewport
        // ne sert qu'à valider la résolution.
        _ => MANDELBROT_BOUNDS,
    };
    let viewport = Viewport::new(x_min, x_max, y_min, y_max, width, height)?;

    let point_count = match kind {
        FractalKind::Sierpinski => SIERPINSKI_POINTS,
        FractalKind::BarnsleyFern => FERN_POINTS,
        _ => 0,
    };

    Ok(FractalParams {
        kind,
        width,
        height,
        viewport,
        max_iter: MAX_ITER,
        julia_constant: JULIA_CONSTANT,
        point_count,
        koch_depth: KOCH_DEPTH,
        rng_seed: None,
    })
}
