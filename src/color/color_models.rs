/// Modèle colorimétrique HSB/HSV (Teinte, Saturation, Brillance/Valeur).

/// Amplitude de la teinte ; 360° est équivalent à 0°.
pub const HUE_MAX: f64 = 360.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hsb {
    pub h: f64, // Teinte [0, 360]
    pub s: f64, // Saturation [0, 1]
    pub b: f64, // Brillance/Valeur [0, 1]
}

impl Hsb {
    pub fn new(h: f64, s: f64, b: f64) -> Self {
        Self { h, s, b }
    }
}

/// Convertit HSB/HSV vers RGB (conversion cylindrique standard).
///
/// La teinte est ramenée dans [0, 360) ; une brillance nulle donne le noir
/// quelle que soit la teinte.
pub fn hsb_to_rgb(hsb: Hsb) -> (u8, u8, u8) {
    let h = hsb.h.rem_euclid(HUE_MAX);
    let s = hsb.s.clamp(0.0, 1.0);
    let v = hsb.b.clamp(0.0, 1.0);

    let c = v * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = v - c;

    let (r, g, b) = if h < 60.0 {
        (c, x, 0.0)
    } else if h < 120.0 {
        (x, c, 0.0)
    } else if h < 180.0 {
        (0.0, c, x)
    } else if h < 240.0 {
        (0.0, x, c)
    } else if h < 300.0 {
        (x, 0.0, c)
    } else {
        (c, 0.0, x)
    };

    (
        ((r + m) * 255.0).round().clamp(0.0, 255.0) as u8,
        ((g + m) * 255.0).round().clamp(0.0, 255.0) as u8,
        ((b + m) * 255.0).round().clamp(0.0, 255.0) as u8,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_hues() {
        assert_eq!(hsb_to_rgb(Hsb::new(0.0, 1.0, 1.0)), (255, 0, 0));
        assert_eq!(hsb_to_rgb(Hsb::new(120.0, 1.0, 1.0)), (0, 255, 0));
        assert_eq!(hsb_to_rgb(Hsb::new(240.0, 1.0, 1.0)), (0, 0, 255));
        assert_eq!(hsb_to_rgb(Hsb::new(60.0, 1.0, 1.0)), (255, 255, 0));
    }

    #[test]
    fn test_hue_wraps_at_max() {
        assert_eq!(hsb_to_rgb(Hsb::new(HUE_MAX, 1.0, 1.0)), hsb_to_rgb(Hsb::new(0.0, 1.0, 1.0)));
        assert_eq!(hsb_to_rgb(Hsb::new(480.0, 1.0, 1.0)), hsb_to_rgb(Hsb::new(120.0, 1.0, 1.0)));
    }

    #[test]
    fn test_zero_value_is_black() {
        for h in [0.0, 45.0, 200.0, 359.9, 360.0] {
            assert_eq!(hsb_to_rgb(Hsb::new(h, 1.0, 0.0)), (0, 0, 0));
        }
    }
}
