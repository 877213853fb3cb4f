//! Triangle de Sierpinski par chaos game.

use rand::Rng;

use crate::fractal::definitions::SIERPINSKI_MARGIN;
use crate::fractal::vectorial::Point;

/// Sommets du triangle : haut centre, bas gauche, bas droite, à `SIERPINSKI_MARGIN` du bord.
pub fn sierpinski_vertices(width: u32, height: u32) -> [Point; 3] {
    let m = SIERPINSKI_MARGIN as f64;
    let w = width as f64;
    let h = height as f64;
    [
        Point::new((width / 2) as f64, m),
        Point::new(m, h - m),
        Point::new(w - m, h - m),
    ]
}

/// Point de départ tiré uniformément sur le raster (bords inclus).
pub fn random_start<R: Rng>(rng: &mut R, width: u32, height: u32) -> Point {
    Point::new(
        rng.gen_range(0..=width) as f64,
        rng.gen_range(0..=height) as f64,
    )
}

/// Suite finie et non redémarrable des points visités.
///
/// À chaque pas, un sommet est choisi uniformément et le point courant est
/// remplacé par le milieu entre lui et ce sommet.
pub struct ChaosGame<R> {
    vertices: [Point; 3],
    current: Point,
    remaining: u32,
    rng: R,
}

impl<R: Rng> ChaosGame<R> {
    pub fn new(vertices: [Point; 3], point_count: u32, start: Point, rng: R) -> Self {
        Self { vertices, current: start, remaining: point_count, rng }
    }
}

impl<R: Rng> Iterator for ChaosGame<R> {
    type Item = Point;

    fn next(&mut self) -> Option<Point> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let vertex = self.vertices[self.rng.gen_range(0..3)];
        self.current = Point::new(
            (self.current.x + vertex.x) / 2.0,
            (self.current.y + vertex.y) / 2.0,
        );
        Some(self.current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining as usize;
        (n, Some(n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Coordonnées barycentriques, toutes >= -eps si le point est dans le triangle.
    fn inside_triangle(p: Point, t: &[Point; 3], eps: f64) -> bool {
        let [a, b, c] = *t;
        let det = (b.y - c.y) * (a.x - c.x) + (c.x - b.x) * (a.y - c.y);
        let l1 = ((b.y - c.y) * (p.x - c.x) + (c.x - b.x) * (p.y - c.y)) / det;
        let l2 = ((c.y - a.y) * (p.x - c.x) + (a.x - c.x) * (p.y - c.y)) / det;
        let l3 = 1.0 - l1 - l2;
        l1 >= -eps && l2 >= -eps && l3 >= -eps
    }

    #[test]
    fn test_emits_exactly_point_count() {
        let vertices = sierpinski_vertices(800, 800);
        let game = ChaosGame::new(vertices, 1234, Point::new(0.0, 0.0), StdRng::seed_from_u64(1));
        assert_eq!(game.size_hint(), (1234, Some(1234)));
        assert_eq!(game.count(), 1234);
    }

    #[test]
    fn test_start_inside_hull_stays_inside() {
        let vertices = sierpinski_vertices(800, 800);
        let start = Point::new(400.0, 400.0);
        let game = ChaosGame::new(vertices, 5000, start, StdRng::seed_from_u64(7));
        for p in game {
            assert!(inside_triangle(p, &vertices, 1e-9), "{p:?} hors du triangle");
        }
    }

    #[test]
    fn test_any_start_converges_into_hull() {
        // La distance au triangle est divisée par deux à chaque pas.
        let vertices = sierpinski_vertices(800, 800);
        for (seed, start) in [(1, Point::new(0.0, 0.0)), (2, Point::new(800.0, 0.0)), (3, Point::new(-1e4, 1e4))] {
            let game = ChaosGame::new(vertices, 2000, start, StdRng::seed_from_u64(seed));
            for p in game.skip(40) {
                assert!(inside_triangle(p, &vertices, 1e-6));
            }
        }
    }

    #[test]
    fn test_each_point_is_midpoint_toward_a_vertex() {
        let vertices = sierpinski_vertices(800, 800);
        let mut previous = Point::new(123.0, 456.0);
        let game = ChaosGame::new(vertices, 500, previous, StdRng::seed_from_u64(11));
        let mut hits = [0u32; 3];
        for p in game {
            let idx = vertices
                .iter()
                .position(|v| (2.0 * p.x - previous.x - v.x).abs() < 1e-9 && (2.0 * p.y - previous.y - v.y).abs() < 1e-9)
                .expect("le point doit être le milieu vers un sommet");
            hits[idx] += 1;
            previous = p;
        }
        assert!(hits.iter().all(|&h| h > 100));
    }

    #[test]
    fn test_random_start_within_raster() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..200 {
            let p = random_start(&mut rng, 20, 10);
            assert!((0.0..=20.0).contains(&p.x));
            assert!((0.0..=10.0).contains(&p.y));
        }
    }
}
