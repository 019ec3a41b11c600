use std::ops::Range;

use rand::Rng;

use crate::point::Point;

pub fn random_sites(count: usize, bounds: (Range<f64>, Range<f64>), rng: &mut impl Rng) -> Vec<Point> {
    let mut acc = Vec::with_capacity(count);
    for _ in 0..count {
        acc.push(Point::new(
            rng.random_range(bounds.0.clone()),
            rng.random_range(bounds.1.clone()),
        ));
    }
    acc
}

/// Lower-left and upper-right corners of `points`.
pub fn bounding_box(points: &[Point]) -> Option<(Point, Point)> {
    let first = *points.first()?;
    Some(points.iter().fold((first, first), |(lo, hi), p| {
        (
            Point::new(lo.x().min(p.x()), lo.y().min(p.y())),
            Point::new(hi.x().max(p.x()), hi.y().max(p.y())),
        )
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn sites_stay_in_bounds() {
        let mut rng = StdRng::seed_from_u64(1);
        let sites = random_sites(500, (-2.0..3.0, 10.0..11.0), &mut rng);
        assert_eq!(sites.len(), 500);
        let (lo, hi) = bounding_box(&sites).unwrap();
        assert!(lo.x() >= -2.0 && hi.x() < 3.0);
        assert!(lo.y() >= 10.0 && hi.y() < 11.0);
        assert_eq!(bounding_box(&[]), None);
    }

    #[test]
    fn same_seed_same_sites() {
        let a = random_sites(20, (0.0..1.0, 0.0..1.0), &mut StdRng::seed_from_u64(5));
        let b = random_sites(20, (0.0..1.0, 0.0..1.0), &mut StdRng::seed_from_u64(5));
        assert_eq!(a, b);
    }
}
