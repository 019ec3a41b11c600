use std::ops::{Sub, Mul, Add};
use std::fmt;
use ordered_float::OrderedFloat;
use std::cmp::Ordering;

/// A point in two dimensions.
///
/// Coordinates are wrapped in `OrderedFloat` so points can be hashed and
/// totally ordered. The ordering is the sweep order: higher `y` comes first,
/// ties go to the smaller `x`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Point(euclid::default::Vector2D<OrderedFloat<f64>>);

impl Point {
    /// Constructs a new `Point`.
    pub fn new(x: f64, y: f64) -> Self {
        Point(euclid::Vector2D::new(OrderedFloat::<f64>(x), OrderedFloat::<f64>(y)))
    }

    /// Getter for the x coordinate.
    pub fn x(&self) -> f64 {
        self.0.x.into_inner()
    }

    /// Getter for the y coordinate.
    pub fn y(&self) -> f64 {
        self.0.y.into_inner()
    }

    pub fn is_finite(&self) -> bool {
        self.x().is_finite() && self.y().is_finite()
    }

    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x() + other.x()) / 2., (self.y() + other.y()) / 2.)
    }

    pub fn distance_squared(self, other: Point) -> f64 {
        let d = self - other;
        d.dot(d)
    }

    pub fn distance(self, other: Point) -> f64 {
        self.distance_squared(other).sqrt()
    }
}

impl fmt::Debug for Point {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({0:.3}, {1:.3})", self.x(), self.y())
    }
}

impl Mul<f64> for Point {
    type Output = Point;

    fn mul(self, _rhs: f64) -> Point {
        Point::new(self.x() * _rhs, self.y() * _rhs)
    }
}

impl Sub<Point> for Point {
    type Output = Point;

    fn sub(self, _rhs: Point) -> Point {
        Point::new(self.x() - _rhs.x(), self.y() - _rhs.y())
    }
}

impl Add<Point> for Point {
    type Output = Point;

    fn add(self, _rhs: Point) -> Point {
        Point::new(self.x() + _rhs.x(), self.y() + _rhs.y())
    }
}

impl Point {
    /// Computes the cross product of two points, viewed as vectors from the origin.
    pub fn cross(self, rhs: Point) -> f64 {
        self.x() * rhs.y() - self.y() * rhs.x()
    }

    /// Computes the dot product of two points, viewed as vectors from the origin.
    pub fn dot(self, rhs: Point) -> f64 {
        self.x() * rhs.x() + self.y() * rhs.y()
    }
}

impl PartialOrd for Point {
    fn partial_cmp(&self, other: &Point) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Point {
    fn cmp(&self, other: &Point) -> Ordering {
        self.0.y.cmp(&other.0.y)
            .then_with(|| other.0.x.cmp(&self.0.x))
    }
}
