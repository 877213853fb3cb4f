use image::Rgb;

use crate::color::color_models::{hsb_to_rgb, Hsb, HUE_MAX};
use crate::fractal::EscapeResult;

pub const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
/// Points du chaos game et de la fougère.
pub const PLOT_GREEN: Rgb<u8> = Rgb([0, 255, 0]);
/// Segments du flocon de Koch.
pub const LINE_WHITE: Rgb<u8> = Rgb([255, 255, 255]);

/// Couleur d'un pixel escape-time : intérieur noir, extérieur en dégradé de teinte.
///
/// teinte = HUE_MAX * n / max_iter, saturation maximale, valeur maximale si le
/// point s'est échappé et nulle sinon.
pub fn escape_color(result: EscapeResult, max_iter: u32) -> Rgb<u8> {
    let hue = if max_iter == 0 {
        0.0
    } else {
        HUE_MAX * result.iteration_count as f64 / max_iter as f64
    };
    let value = if result.escaped { 1.0 } else { 0.0 };
    let (r, g, b) = hsb_to_rgb(Hsb::new(hue, 1.0, value));
    Rgb([r, g, b])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_escaped_is_black() {
        for (n, max) in [(100, 100), (0, 100), (37, 100), (5, 5)] {
            let r = EscapeResult { iteration_count: n, escaped: false };
            assert_eq!(escape_color(r, max), BLACK);
        }
    }

    #[test]
    fn test_escape_on_last_step_gets_max_hue() {
        let r = EscapeResult { iteration_count: 100, escaped: true };
        let expected = hsb_to_rgb(Hsb::new(HUE_MAX, 1.0, 1.0));
        assert_eq!(escape_color(r, 100), Rgb([expected.0, expected.1, expected.2]));
        assert_eq!(escape_color(r, 100), Rgb([255, 0, 0]));
    }

    #[test]
    fn test_gradient_follows_iteration_ratio() {
        let third = EscapeResult { iteration_count: 1, escaped: true };
        assert_eq!(escape_color(third, 3), Rgb([0, 255, 0]));
        let two_thirds = EscapeResult { iteration_count: 2, escaped: true };
        assert_eq!(escape_color(two_thirds, 3), Rgb([0, 0, 255]));
    }

    #[test]
    fn test_escaped_colors_are_never_black() {
        for n in 1..=50 {
            let r = EscapeResult { iteration_count: n, escaped: true };
            assert_ne!(escape_color(r, 50), BLACK);
        }
    }

    #[test]
    fn test_zero_cap_does_not_divide_by_zero() {
        let r = EscapeResult { iteration_count: 0, escaped: false };
        assert_eq!(escape_color(r, 0), BLACK);
    }
}
