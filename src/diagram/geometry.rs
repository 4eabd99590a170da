//! Plane geometry used by the overlap layout: points, circles and bounds.

use std::f64::consts::PI;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    x: f64,
    y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub const fn x(self) -> f64 {
        self.x
    }

    pub const fn y(self) -> f64 {
        self.y
    }

    pub fn add_point(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }

    pub fn sub_point(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }

    pub fn scale(self, factor: f64) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }

    /// Euclidean distance to `other`
    pub fn distance(self, other: Self) -> f64 {
        self.sub_point(other).hypot()
    }

    pub fn hypot(self) -> f64 {
        self.x.hypot(self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    center: Point,
    radius: f64,
}

impl Circle {
    pub const fn new(center: Point, radius: f64) -> Self {
        Self { center, radius }
    }

    pub const fn center(&self) -> Point {
        self.center
    }

    pub const fn radius(&self) -> f64 {
        self.radius
    }

    pub fn area(&self) -> f64 {
        PI * self.radius * self.radius
    }

    pub fn contains(&self, p: Point) -> bool {
        self.center.distance(p) <= self.radius
    }

    /// Signed distance from `p` to the boundary, positive inside.
    pub fn depth(&self, p: Point) -> f64 {
        self.radius - self.center.distance(p)
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(
            self.center.x - self.radius,
            self.center.y - self.radius,
            self.center.x + self.radius,
            self.center.y + self.radius,
        )
    }

    /// Same circle after `p -> p * factor + offset`.
    pub fn transform(&self, factor: f64, offset: Point) -> Self {
        Self::new(self.center.scale(factor).add_point(offset), self.radius * factor)
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    min_x: f64,
    min_y: f64,
    max_x: f64,
    max_y: f64,
}

impl Bounds {
    pub const fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    pub const fn min_x(&self) -> f64 {
        self.min_x
    }

    pub const fn min_y(&self) -> f64 {
        self.min_y
    }

    pub const fn max_x(&self) -> f64 {
        self.max_x
    }

    pub const fn max_y(&self) -> f64 {
        self.max_y
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    pub fn merge(&self, other: &Self) -> Self {
        Self::new(
            self.min_x.min(other.min_x),
            self.min_y.min(other.min_y),
            self.max_x.max(other.max_x),
            self.max_y.max(other.max_y),
        )
    }

    pub fn expand(&self, margin: f64) -> Self {
        Self::new(
            self.min_x - margin,
            self.min_y - margin,
            self.max_x + margin,
            self.max_y + margin,
        )
    }
}

/// Area of the lens shared by two circles of radii `r1`, `r2` whose centers are `d` apart.
pub fn circle_intersection_area(r1: f64, r2: f64, d: f64) -> f64 {
    if d >= r1 + r2 {
        return 0.0;
    }
    let small = r1.min(r2);
    if d <= (r1 - r2).abs() {
        return PI * small * small;
    }

    let (r1_sq, r2_sq, d_sq) = (r1 * r1, r2 * r2, d * d);
    let alpha = ((d_sq + r1_sq - r2_sq) / (2.0 * d * r1)).clamp(-1.0, 1.0).acos();
    let beta = ((d_sq + r2_sq - r1_sq) / (2.0 * d * r2)).clamp(-1.0, 1.0).acos();
    let kite = ((-d + r1 + r2) * (d + r1 - r2) * (d - r1 + r2) * (d + r1 + r2))
        .max(0.0)
        .sqrt();

    r1_sq.mul_add(alpha, r2_sq * beta) - 0.5 * kite
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disjoint_circles_share_nothing() {
        assert_eq!(circle_intersection_area(1.0, 1.0, 2.5), 0.0);
        assert_eq!(circle_intersection_area(1.0, 1.0, 2.0), 0.0);
    }

    #[test]
    fn test_nested_circle_is_fully_shared() {
        let area = circle_intersection_area(2.0, 0.5, 0.3);
        assert!((area - PI * 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_half_overlap_of_unit_circles() {
        // Two unit circles one radius apart share 2π/3 - √3/2.
        let expected = 2.0 * PI / 3.0 - 3f64.sqrt() / 2.0;
        let area = circle_intersection_area(1.0, 1.0, 1.0);
        assert!((area - expected).abs() < 1e-9, "got {area}");
    }

    #[test]
    fn test_intersection_shrinks_with_distance() {
        let mut previous = f64::INFINITY;
        for step in 0..20 {
            let d = f64::from(step) * 0.1;
            let area = circle_intersection_area(1.0, 0.8, d);
            assert!(area <= previous + 1e-12);
            previous = area;
        }
    }

    #[test]
    fn test_circle_depth_and_bounds() {
        let circle = Circle::new(Point::new(1.0, 1.0), 2.0);
        assert!(circle.contains(Point::new(2.0, 2.0)));
        assert!(!circle.contains(Point::new(4.0, 1.0)));
        assert!((circle.depth(Point::new(1.0, 1.0)) - 2.0).abs() < 1e-12);
        assert!(circle.depth(Point::new(4.0, 1.0)) < 0.0);

        let bounds = circle.bounds().merge(&Circle::new(Point::new(5.0, 0.0), 1.0).bounds());
        assert_eq!(bounds, Bounds::new(-1.0, -1.0, 6.0, 3.0));
        assert_eq!(bounds.center(), Point::new(2.5, 1.0));
    }
}
