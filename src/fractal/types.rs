use num_complex::Complex64;

use super::plane::Viewport;

/// Types de fractales pris en charge.
///
/// Deux familles : escape-time (Mandelbrot, Julia) et construction
/// géométrique récursive ou stochastique (Sierpinski, Koch, fougère).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FractalKind {
    Mandelbrot,
    Julia,
    Sierpinski,
    Koch,
    BarnsleyFern,
}

impl FractalKind {
    pub fn all() -> &'static [FractalKind] {
        &[
            FractalKind::Mandelbrot,
            FractalKind::Julia,
            FractalKind::Sierpinski,
            FractalKind::Koch,
            FractalKind::BarnsleyFern,
        ]
    }

    /// Identifiant numérique (ordre du menu d'origine, 1 à 5).
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(FractalKind::Mandelbrot),
            2 => Some(FractalKind::Julia),
            3 => Some(FractalKind::Sierpinski),
            4 => Some(FractalKind::Koch),
            5 => Some(FractalKind::BarnsleyFern),
            _ => None,
        }
    }

    pub fn id(self) -> u8 {
        match self {
            FractalKind::Mandelbrot => 1,
            FractalKind::Julia => 2,
            FractalKind::Sierpinski => 3,
            FractalKind::Koch => 4,
            FractalKind::BarnsleyFern => 5,
        }
    }

    /// Titre de fenêtre.
    pub fn name(self) -> &'static str {
        match self {
            FractalKind::Mandelbrot => "Mandelbrot Set",
            FractalKind::Julia => "Julia Set",
            FractalKind::Sierpinski => "Sierpinski Triangle",
            FractalKind::Koch => "Koch Snowflake",
            FractalKind::BarnsleyFern => "Barnsley Fern",
        }
    }

    /// Nom court utilisé en ligne de commande et pour les répertoires de frames.
    pub fn cli_name(self) -> &'static str {
        match self {
            FractalKind::Mandelbrot => "mandelbrot",
            FractalKind::Julia => "julia",
            FractalKind::Sierpinski => "sierpinski",
            FractalKind::Koch => "koch",
            FractalKind::BarnsleyFern => "fern",
        }
    }

    /// Accepte le nom court, quelques alias, ou l'identifiant numérique.
    pub fn from_cli_name(value: &str) -> Option<Self> {
        let value = value.trim().to_lowercase();
        if let Ok(id) = value.parse::<u8>() {
            return Self::from_id(id);
        }
        match value.as_str() {
            "mandelbrot" => Some(FractalKind::Mandelbrot),
            "julia" => Some(FractalKind::Julia),
            "sierpinski" | "chaos-game" => Some(FractalKind::Sierpinski),
            "koch" | "snowflake" | "von-koch" => Some(FractalKind::Koch),
            "fern" | "barnsley" | "barnsley-fern" => Some(FractalKind::BarnsleyFern),
            _ => None,
        }
    }

    /// Vrai pour les fractales dont l'image dépend d'un plafond d'itérations.
    pub fn is_escape_time(self) -> bool {
        matches!(self, FractalKind::Mandelbrot | FractalKind::Julia)
    }
}

/// Paramètres d'un rendu, construits une fois par invocation et passés
/// explicitement à chaque fonction de rendu.
#[derive(Clone, Debug)]
pub struct FractalParams {
    pub kind: FractalKind,
    pub width: u32,
    pub height: u32,
    /// Région du plan complexe (escape-time uniquement).
    pub viewport: Viewport,
    /// Plafond d'itérations (escape-time).
    pub max_iter: u32,
    /// Constante k de Julia : z_{n+1} = z_n² + k.
    pub julia_constant: Complex64,
    /// Nombre de points tracés (Sierpinski, fougère).
    pub point_count: u32,
    /// Profondeur de récursion (Koch).
    pub koch_depth: u32,
    /// Graine du générateur aléatoire ; `None` = entropie du système.
    pub rng_seed: Option<u64>,
}

impl FractalParams {
    /// Copie des paramètres avec un autre plafond d'itérations.
    pub fn with_max_iter(&self, max_iter: u32) -> Self {
        Self { max_iter, ..self.clone() }
    }
}

/// Résultat de l'évaluation escape-time d'un point.
///
/// Invariant : `escaped == false` implique `iteration_count == max_iter`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EscapeResult {
    pub iteration_count: u32,
    pub escaped: bool,
}
