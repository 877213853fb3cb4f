//! Flocon de Koch par subdivision récursive de segments.
//!
//! Contrairement aux fractales escape-time, le rendu se fait par tracé de
//! lignes : seuls les segments de profondeur 0 sont dessinés.

use std::f64::consts::FRAC_PI_3;

use image::{Rgb, RgbImage};

use crate::fractal::definitions::KOCH_SIZE_RATIO;

/// Point 2D en coordonnées pixel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Point à la fraction `t` du chemin vers `other`.
    fn lerp(self, other: Point, t: f64) -> Self {
        Point::new(self.x + (other.x - self.x) * t, self.y + (other.y - self.y) * t)
    }
}

/// Segment à subdiviser `depth` fois.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
    pub depth: u32,
}

impl Segment {
    pub fn new(start: Point, end: Point, depth: u32) -> Self {
        Self { start, end, depth }
    }

    /// Les quatre enfants (start,A) (A,B) (B,C) (C,end), à depth - 1.
    ///
    /// A et C sont les points de trisection ; B est obtenu en partant du
    /// milieu du segment le long de la normale tournée de -60°, longueur 1/3.
    pub fn children(&self) -> [Segment; 4] {
        let dx = self.end.x - self.start.x;
        let dy = self.end.y - self.start.y;
        let a = self.start.lerp(self.end, 1.0 / 3.0);
        let c = self.start.lerp(self.end, 2.0 / 3.0);

        let angle = dy.atan2(dx);
        let length = (dx * dx + dy * dy).sqrt() / 3.0;
        let b = Point::new(
            self.start.x + dx / 2.0 - length * (angle - FRAC_PI_3).sin(),
            self.start.y + dy / 2.0 + length * (angle - FRAC_PI_3).cos(),
        );

        let depth = self.depth.saturating_sub(1);
        [
            Segment::new(self.start, a, depth),
            Segment::new(a, b, depth),
            Segment::new(b, c, depth),
            Segment::new(c, self.end, depth),
        ]
    }
}

/// Parcours paresseux des feuilles d'une subdivision, dans l'ordre du tracé.
///
/// Pile explicite plutôt que récursion : le parcours peut être suspendu entre
/// deux feuilles (rendu progressif).
pub struct Subdivision {
    stack: Vec<Segment>,
}

impl Subdivision {
    pub fn new(root: Segment) -> Self {
        Self::from_roots(&[root])
    }

    /// Plusieurs racines parcourues dans l'ordre donné.
    pub fn from_roots(roots: &[Segment]) -> Self {
        Self { stack: roots.iter().rev().copied().collect() }
    }
}

impl Iterator for Subdivision {
    type Item = (Point, Point);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(segment) = self.stack.pop() {
            if segment.depth == 0 {
                return Some((segment.start, segment.end));
            }
            self.stack.extend(segment.children().iter().rev());
        }
        None
    }
}

/// Subdivise `segment` et appelle `on_leaf(start, end)` pour chaque feuille.
pub fn subdivide<F>(segment: Segment, mut on_leaf: F)
where
    F: FnMut(Point, Point),
{
    for (start, end) in Subdivision::new(segment) {
        on_leaf(start, end);
    }
}

/// Les trois côtés du triangle initial, centré dans le raster.
///
/// Profondeur 0 : le triangle nu.
pub fn koch_snowflake(width: u32, height: u32, depth: u32) -> [Segment; 3] {
    let center_x = (width / 2) as f64;
    let center_y = (height / 2) as f64;
    let size = (width.min(height) as f64 * KOCH_SIZE_RATIO).floor();
    let half_base = (size * 3f64.sqrt() / 2.0).floor();

    let p1 = Point::new(center_x, center_y - size);
    let p2 = Point::new(center_x - half_base, center_y + (size / 2.0).floor());
    let p3 = Point::new(center_x + half_base, center_y + (size / 2.0).floor());

    [
        Segment::new(p1, p2, depth),
        Segment::new(p2, p3, depth),
        Segment::new(p3, p1, depth),
    ]
}

/// Trace une ligne de 1 px (Bresenham), en ignorant les pixels hors raster.
pub fn draw_line(canvas: &mut RgbImage, start: Point, end: Point, color: Rgb<u8>) {
    let w = canvas.width() as i64;
    let h = canvas.height() as i64;

    let mut x0 = start.x as i64;
    let mut y0 = start.y as i64;
    let x1 = end.x as i64;
    let y1 = end.y as i64;

    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if x0 >= 0 && x0 < w && y0 >= 0 && y0 < h {
            canvas.put_pixel(x0 as u32, y0 as u32, color);
        }

        if x0 == x1 && y0 == y1 {
            break;
        }

        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}
