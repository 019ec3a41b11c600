use log::warn;

use crate::point::Point;

pub type TripleSite = (Point, Point, Point);
pub type Segment = [Point; 2];

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Circle {
    pub center: Point,
    pub radius: f64,
}

impl Circle {
    /// Lowest point of the circle, which is where a top-down sweep meets it last.
    pub fn bottom(&self) -> f64 {
        self.center.y() - self.radius
    }
}

/// The x-coordinates where two parabolas meet. `low == high` when they touch once.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Roots {
    pub low: f64,
    pub high: f64,
}

impl Roots {
    fn single(x: f64) -> Self {
        Roots { low: x, high: x }
    }

    fn pair(a: f64, b: f64) -> Self {
        Roots { low: a.min(b), high: a.max(b) }
    }
}

/// y-coordinate at `x` of the parabola with the given focus and horizontal directrix.
///
/// A focus sitting on the directrix has no finite trace except the vertical
/// ray at its own x, so this returns `f64::INFINITY` for it.
pub fn parabola(focus: Point, directrix: f64, x: f64) -> f64 {
    let p = focus.y() - directrix;
    if p == 0.0 {
        return f64::INFINITY;
    }
    let dx = x - focus.x();
    dx * dx / (2. * p) + (focus.y() + directrix) / 2.
}

/// Where the parabolas with foci `f1` and `f2` cross for a common directrix.
///
/// Returns `None` when there is no crossing to speak of: both foci on the
/// directrix, or the foci coincide.
pub fn intersect_parabolas(f1: Point, f2: Point, directrix: f64) -> Option<Roots> {
    let p1 = f1.y() - directrix;
    let p2 = f2.y() - directrix;
    match (p1 == 0.0, p2 == 0.0) {
        (true, true) => return None,
        (true, false) => return Some(Roots::single(f1.x())),
        (false, true) => return Some(Roots::single(f2.x())),
        (false, false) => {}
    }

    // shift frames so f1 sits at the origin; the quadratic in u = x - f1.x is
    // (p2 - p1) u^2 + 2 p1 w u - p1 (w^2 + p2 (p2 - p1)) = 0
    let w = f2.x() - f1.x();
    let a = p2 - p1;
    let discrim = p1 * p2 * (w * w + a * a);
    if discrim <= 0.0 {
        return None;
    }
    let q = -(p1 * w + discrim.sqrt().copysign(w));
    let c = -p1 * (w * w + p2 * a);
    let near = c / q;

    if a == 0.0 {
        // equal heights: the second root runs off to infinity
        return Some(Roots::single(f1.x() + near));
    }
    let far = q / a;
    Some(Roots::pair(f1.x() + near, f1.x() + far))
}

/// x-coordinate of the breakpoint between a `left` arc and a `right` arc.
pub fn breakpoint_x(left: Point, right: Point, directrix: f64) -> f64 {
    let p1 = left.y() - directrix;
    let p2 = right.y() - directrix;
    if p1 <= 0.0 && p2 <= 0.0 {
        return (left.x() + right.x()) / 2.;
    }
    if p1 <= 0.0 {
        return left.x();
    }
    if p2 <= 0.0 {
        return right.x();
    }

    match intersect_parabolas(left, right, directrix) {
        // the lower focus draws the narrower parabola, which wins between the roots
        Some(roots) if p1 < p2 => roots.high,
        Some(roots) => roots.low,
        None => {
            warn!("parabolas of {:?} and {:?} do not cross at y={}, using the midpoint", left, right, directrix);
            (left.x() + right.x()) / 2.
        }
    }
}

// see http://www.kmschaal.de/Diplomarbeit_KevinSchaal.pdf, pg 27
/// Whether the breakpoints around the middle site move toward each other
/// under a top-down sweep, i.e. the triple turns clockwise.
pub fn breakpoints_converge(triple_site: TripleSite) -> bool {
    let (a, b, c) = triple_site;
    (b - a).cross(c - b) < 0.0
}

/// Circle through three points, or `None` when they are (nearly) collinear.
///
/// `epsilon` is relative to the squared size of the triangle.
pub fn circumcircle(p1: Point, p2: Point, p3: Point, epsilon: f64) -> Option<Circle> {
    let ab = p2 - p1;
    let ac = p3 - p1;
    let ab2 = ab.dot(ab);
    let ac2 = ac.dot(ac);

    let denom = 2. * ab.cross(ac);
    if denom.abs() <= epsilon * ab2.max(ac2) || denom == 0.0 {
        return None;
    }

    let ux = (ac.y() * ab2 - ab.y() * ac2) / denom;
    let uy = (ab.x() * ac2 - ac.x() * ab2) / denom;

    Some(Circle {
        center: Point::new(p1.x() + ux, p1.y() + uy),
        radius: ux.hypot(uy),
    })
}
