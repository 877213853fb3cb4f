//! Correspondance pixel -> plan complexe.

use num_complex::Complex64;

use crate::error::FractalError;

/// Rectangle du plan réel projeté sur une grille de pixels.
///
/// Invariants vérifiés à la construction : `x_min < x_max`, `y_min < y_max`,
/// dimensions non nulles.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
    width_px: u32,
    height_px: u32,
}

impl Viewport {
    pub fn new(
        x_min: f64,
        x_max: f64,
        y_min: f64,
        y_max: f64,
        width_px: u32,
        height_px: u32,
    ) -> Result<Self, FractalError> {
        if ![x_min, x_max, y_min, y_max].iter().all(|v| v.is_finite()) {
            return Err(FractalError::Configuration(format!(
                "bornes non finies: x=[{x_min}, {x_max}] y=[{y_min}, {y_max}]"
            )));
        }
        if x_min >= x_max {
            return Err(FractalError::Configuration(format!(
                "x_min ({x_min}) doit être strictement inférieur à x_max ({x_max})"
            )));
        }
        if y_min >= y_max {
            return Err(FractalError::Configuration(format!(
                "y_min ({y_min}) doit être strictement inférieur à y_max ({y_max})"
            )));
        }
        if width_px == 0 || height_px == 0 {
            return Err(FractalError::Configuration(format!(
                "résolution nulle: {width_px}x{height_px}"
            )));
        }
        Ok(Self { x_min, x_max, y_min, y_max, width_px, height_px })
    }

    pub fn x_min(&self) -> f64 {
        self.x_min
    }

    pub fn x_max(&self) -> f64 {
        self.x_max
    }

    pub fn y_min(&self) -> f64 {
        self.y_min
    }

    pub fn y_max(&self) -> f64 {
        self.y_max
    }

    pub fn width_px(&self) -> u32 {
        self.width_px
    }

    pub fn height_px(&self) -> u32 {
        self.height_px
    }

    /// x = x_min + (x_max - x_min) * px / width, idem pour y.
    ///
    /// Même ordre d'opérations à chaque appel : le résultat est reproductible
    /// au bit près, ce dont dépend la reprise d'un export de frames.
    #[inline]
    pub fn map(&self, px: u32, py: u32) -> Complex64 {
        let x = self.x_min + (self.x_max - self.x_min) * px as f64 / self.width_px as f64;
        let y = self.y_min + (self.y_max - self.y_min) * py as f64 / self.height_px as f64;
        Complex64::new(x, y)
    }
}
