//! Fougère de Barnsley : système de fonctions itérées (IFS) affine pondéré.

use rand::Rng;

/// Transformation affine (x, y) -> (a·x + b·y + e, c·x + d·y + f), tirée avec
/// la probabilité `weight`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AffineTransform {
    pub weight: f64,
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl AffineTransform {
    #[inline]
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.a * x + self.b * y + self.e,
            self.c * x + self.d * y + self.f,
        )
    }
}

/// Coefficients de Barnsley : tige, foliole principale, folioles gauche et droite.
pub const BARNSLEY_FERN: [AffineTransform; 4] = [
    AffineTransform { weight: 0.01, a: 0.0, b: 0.0, c: 0.0, d: 0.16, e: 0.0, f: 0.0 },
    AffineTransform { weight: 0.85, a: 0.85, b: 0.04, c: -0.04, d: 0.85, e: 0.0, f: 1.6 },
    AffineTransform { weight: 0.07, a: 0.2, b: -0.26, c: 0.23, d: 0.22, e: 0.0, f: 1.6 },
    AffineTransform { weight: 0.07, a: -0.15, b: 0.28, c: 0.26, d: 0.24, e: 0.0, f: 0.44 },
];

/// Ensemble de transformations dont les poids partitionnent [0, 1).
#[derive(Clone, Debug)]
pub struct Ifs {
    transforms: Vec<AffineTransform>,
    /// Bornes supérieures cumulées des intervalles de sélection.
    breakpoints: Vec<f64>,
}

impl Ifs {
    /// Bornes cumulées exactes : 0.01, 0.86, 0.93, 1.0.
    pub fn barnsley_fern() -> Self {
        Self {
            transforms: BARNSLEY_FERN.to_vec(),
            breakpoints: vec![0.01, 0.86, 0.93, 1.0],
        }
    }

    pub fn transforms(&self) -> &[AffineTransform] {
        &self.transforms
    }

    /// Indice de la transformation dont l'intervalle contient `r` ∈ [0, 1).
    pub fn select(&self, r: f64) -> usize {
        self.breakpoints
            .iter()
            .position(|&bound| r < bound)
            .unwrap_or(self.breakpoints.len() - 1)
    }
}

/// Un pas de l'IFS : transformation tirée et nouvel état.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IfsSample {
    pub transform: usize,
    pub x: f64,
    pub y: f64,
}

/// Suite finie et non redémarrable des états visités, partant de (0, 0).
pub struct IfsSampler<R> {
    ifs: Ifs,
    x: f64,
    y: f64,
    remaining: u32,
    rng: R,
}

impl<R: Rng> IfsSampler<R> {
    pub fn new(ifs: Ifs, point_count: u32, rng: R) -> Self {
        Self { ifs, x: 0.0, y: 0.0, remaining: point_count, rng }
    }
}

impl<R: Rng> Iterator for IfsSampler<R> {
    type Item = IfsSample;

    fn next(&mut self) -> Option<IfsSample> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let r: f64 = self.rng.gen();
        let transform = self.ifs.select(r);
        let (x, y) = self.ifs.transforms[transform].apply(self.x, self.y);
        self.x = x;
        self.y = y;
        Some(IfsSample { transform, x, y })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining as usize;
        (n, Some(n))
    }
}

/// Projection du plan de la fougère ([-3, 3] × [-2, 8]) sur le raster, axe y
/// retourné.
#[derive(Clone, Copy, Debug)]
pub struct FernProjection {
    width: u32,
    height: u32,
}

impl FernProjection {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Pixel du point, `None` s'il tombe hors du raster.
    pub fn project(&self, x: f64, y: f64) -> Option<(u32, u32)> {
        let w = self.width as f64;
        let h = self.height as f64;
        // Troncature vers zéro, comme une conversion entière.
        let px = (w * (x + 3.0) / 6.0) as i64;
        let py = (h - h * (y + 2.0) / 10.0) as i64;
        if px >= 0 && px < self.width as i64 && py >= 0 && py < self.height as i64 {
            Some((px as u32, py as u32))
        } else {
            None
        }
    }
}
