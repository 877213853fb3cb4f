//! Évaluation escape-time partagée par Mandelbrot et Julia.

use num_complex::Complex64;

use crate::fractal::{EscapeResult, FractalKind, FractalParams};

/// Rayon d'échappement |z| > 2, comparé au carré pour éviter la racine.
const BAILOUT_SQR: f64 = 4.0;

/// Règle d'itération z_{n+1} = z_n² + c.
///
/// Les deux variantes ne diffèrent que par la valeur fixée : le point du
/// pixel sert de `c` (Mandelbrot, z₀ = 0) ou de z₀ (Julia, c = k constant).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EscapeRule {
    Mandelbrot,
    Julia { k: Complex64 },
}

impl EscapeRule {
    /// Règle correspondant aux paramètres, `None` pour les fractales non escape-time.
    pub fn for_params(params: &FractalParams) -> Option<Self> {
        match params.kind {
            FractalKind::Mandelbrot => Some(EscapeRule::Mandelbrot),
            FractalKind::Julia => Some(EscapeRule::Julia { k: params.julia_constant }),
            _ => None,
        }
    }

    /// (z₀, c) pour le point du pixel.
    #[inline]
    fn orbit_start(self, point: Complex64) -> (Complex64, Complex64) {
        match self {
            EscapeRule::Mandelbrot => (Complex64::new(0.0, 0.0), point),
            EscapeRule::Julia { k } => (point, k),
        }
    }
}

/// Itère l'orbite du point jusqu'à |z| > 2 ou `max_iter` pas.
///
/// Renvoie le numéro du pas où la borne a été franchie pour la première fois,
/// ou `max_iter` (non échappé) si elle ne l'a jamais été.
pub fn evaluate(point: Complex64, rule: EscapeRule, max_iter: u32) -> EscapeResult {
    let (mut z, c) = rule.orbit_start(point);
    for n in 1..=max_iter {
        z = z * z + c;
        // NaN ou infini : l'orbite a nécessairement quitté le disque.
        if !(z.norm_sqr() <= BAILOUT_SQR) {
            return EscapeResult { iteration_count: n, escaped: true };
        }
    }
    EscapeResult { iteration_count: max_iter, escaped: false }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_mandelbrot_origin_never_escapes() {
        for max_iter in [0, 1, 2, 10, 100, 5000] {
            let r = evaluate(Complex64::new(0.0, 0.0), EscapeRule::Mandelbrot, max_iter);
            assert!(!r.escaped);
            assert_eq!(r.iteration_count, max_iter);
        }
    }

    #[test]
    fn test_mandelbrot_escape_steps() {
        // z1 = 2 reste sur la borne, z2 = 6 la franchit.
        let r = evaluate(Complex64::new(2.0, 0.0), EscapeRule::Mandelbrot, 100);
        assert_eq!(r, EscapeResult { iteration_count: 2, escaped: true });

        let r = evaluate(Complex64::new(2.5, 0.0), EscapeRule::Mandelbrot, 100);
        assert_eq!(r, EscapeResult { iteration_count: 1, escaped: true });
    }

    #[test]
    fn test_escape_on_last_step_counts_as_escaped() {
        let r = evaluate(Complex64::new(2.0, 0.0), EscapeRule::Mandelbrot, 2);
        assert_eq!(r, EscapeResult { iteration_count: 2, escaped: true });
        let r = evaluate(Complex64::new(2.0, 0.0), EscapeRule::Mandelbrot, 1);
        assert_eq!(r, EscapeResult { iteration_count: 1, escaped: false });
    }

    #[test]
    fn test_mandelbrot_boundary_point_minus_two() {
        // -2 -> 2 -> 2 -> ... reste exactement sur la borne.
        let r = evaluate(Complex64::new(-2.0, 0.0), EscapeRule::Mandelbrot, 50);
        assert!(!r.escaped);
    }

    #[test]
    fn test_julia_uses_pixel_as_seed() {
        let rule = EscapeRule::Julia { k: Complex64::new(0.0, 0.0) };
        // z -> z² : |z0| < 1 reste borné, |z0| = 3 s'échappe immédiatement.
        assert!(!evaluate(Complex64::new(0.5, 0.0), rule, 64).escaped);
        assert_eq!(
            evaluate(Complex64::new(3.0, 0.0), rule, 64),
            EscapeResult { iteration_count: 1, escaped: true }
        );
    }

    #[test]
    fn test_julia_constant_matters() {
        let point = Complex64::new(0.0, 0.0);
        let bounded = EscapeRule::Julia { k: Complex64::new(-0.7, 0.27) };
        let unbounded = EscapeRule::Julia { k: Complex64::new(1.0, 1.0) };
        assert!(!evaluate(point, bounded, 100).escaped);
        assert!(evaluate(point, unbounded, 100).escaped);
    }

    #[test]
    fn test_huge_point_escapes_without_nan_issue() {
        let r = evaluate(Complex64::new(1e300, 1e300), EscapeRule::Mandelbrot, 10);
        assert_eq!(r, EscapeResult { iteration_count: 1, escaped: true });
    }

    #[test]
    fn test_rule_for_params() {
        use crate::fractal::default_params_for_kind;
        let julia = default_params_for_kind(FractalKind::Julia, 8, 8).unwrap();
        assert_eq!(
            EscapeRule::for_params(&julia),
            Some(EscapeRule::Julia { k: julia.julia_constant })
        );
        let mandelbrot = default_params_for_kind(FractalKind::Mandelbrot, 8, 8).unwrap();
        assert_eq!(EscapeRule::for_params(&mandelbrot), Some(EscapeRule::Mandelbrot));
        for kind in [FractalKind::Sierpinski, FractalKind::Koch, FractalKind::BarnsleyFern] {
            let params = default_params_for_kind(kind, 8, 8).unwrap();
            assert_eq!(EscapeRule::for_params(&params), None);
        }
    }

    proptest! {
        #[test]
        fn escape_result_invariants(
            re in -3.0f64..3.0,
            im in -3.0f64..3.0,
            julia in any::<bool>(),
            max_iter in 0u32..300,
        ) {
            let rule = if julia {
                EscapeRule::Julia { k: Complex64::new(-0.7, 0.27) }
            } else {
                EscapeRule::Mandelbrot
            };
            let r = evaluate(Complex64::new(re, im), rule, max_iter);
            prop_assert!(r.iteration_count <= max_iter);
            if !r.escaped {
                prop_assert_eq!(r.iteration_count, max_iter);
            } else {
                prop_assert!(r.iteration_count >= 1);
            }
        }
    }
}
