//! Area-proportional layout for three overlapping circles.
//!
//! Circle radii follow the set areas and pairwise center distances follow the
//! pairwise overlaps. The triple overlap is not fitted exactly and falls out of
//! the pairwise geometry.

use std::f64::consts::PI;

use super::geometry::{circle_intersection_area, Bounds, Circle, Point};
use super::region::Region;

/// Smallest share of the total area any region is given before normalization.
/// Keeps all seven regions drawable, so every region label has room.
pub const MIN_REGION_SHARE: f64 = 0.03;

const DISTANCE_ITERATIONS: usize = 64;
const LABEL_GRID_STEPS: u32 = 160;

/// Subset sizes in positional order: A, B, C, A∩B, A∩C, B∩C, A∩B∩C.
pub type Subsets = [usize; 7];

#[derive(Debug, Clone, PartialEq)]
pub struct Venn3Layout {
    circles: [Circle; 3],
}

impl Venn3Layout {
    pub const fn circles(&self) -> &[Circle; 3] {
        &self.circles
    }

    pub fn bounds(&self) -> Bounds {
        let [a, b, c] = &self.circles;
        a.bounds().merge(&b.bounds()).merge(&c.bounds())
    }

    /// Region containing `p`, or `None` outside all three circles.
    pub fn classify(&self, p: Point) -> Option<Region> {
        let [a, b, c] = &self.circles;
        Region::from_membership([a.contains(p), b.contains(p), c.contains(p)])
    }

    /// How far `p` sits inside `region`: distance to the nearest boundary that
    /// separates it from neighbouring regions, negative when `p` lies outside.
    pub fn region_depth(&self, region: Region, p: Point) -> f64 {
        self.circles
            .iter()
            .zip(region.membership())
            .map(|(circle, inside)| {
                let depth = circle.depth(p);
                if inside {
                    depth
                } else {
                    -depth
                }
            })
            .fold(f64::INFINITY, f64::min)
    }

    /// A point deep inside `region`, used to anchor its label.
    ///
    /// Samples a grid over the layout bounds and keeps the sample farthest from
    /// the region boundary. For a degenerate region this is the point that comes
    /// closest to it.
    pub fn label_position(&self, region: Region) -> Point {
        let bounds = self.bounds();
        let steps = f64::from(LABEL_GRID_STEPS);
        let mut best = (f64::NEG_INFINITY, bounds.center());

        for i in 0..=LABEL_GRID_STEPS {
            for j in 0..=LABEL_GRID_STEPS {
                let p = Point::new(
                    bounds.min_x() + bounds.width() * f64::from(i) / steps,
                    bounds.min_y() + bounds.height() * f64::from(j) / steps,
                );
                let depth = self.region_depth(region, p);
                if depth > best.0 {
                    best = (depth, p);
                }
            }
        }

        best.1
    }
}

/// Lay out three circles for the given subset sizes.
///
/// The result uses y-up coordinates: A top left, B top right, C below. It is
/// centered on the origin and scaled so its larger extent spans `[-1, 1]`.
pub fn solve_venn3(subsets: &Subsets) -> Venn3Layout {
    let [a, b, c, ab, ac, bc, abc] = region_areas(subsets);

    let set_areas = [a + ab + ac + abc, b + ab + bc + abc, c + ac + bc + abc];
    let radii = set_areas.map(|area| (area / PI).sqrt());

    let d_ab = find_distance(radii[0], radii[1], ab + abc);
    let d_ac = find_distance(radii[0], radii[2], ac + abc);
    let d_bc = find_distance(radii[1], radii[2], bc + abc);

    let centers = place_centers(d_ab, d_ac, d_bc);
    let raw = [
        Circle::new(centers[0], radii[0]),
        Circle::new(centers[1], radii[1]),
        Circle::new(centers[2], radii[2]),
    ];

    normalize(raw)
}

/// Region areas as shares of a unit total, with the `MIN_REGION_SHARE` floor applied.
pub fn region_areas(subsets: &Subsets) -> [f64; 7] {
    #[allow(clippy::cast_precision_loss)]
    let sizes = subsets.map(|size| size as f64);
    let total: f64 = sizes.iter().sum();

    let shares = if total > 0.0 {
        sizes.map(|size| (size / total).max(MIN_REGION_SHARE))
    } else {
        [1.0 / 7.0; 7]
    };

    let floored_total: f64 = shares.iter().sum();
    shares.map(|share| share / floored_total)
}

/// Center distance at which two circles share exactly `overlap` area.
fn find_distance(r1: f64, r2: f64, overlap: f64) -> f64 {
    let max_overlap = PI * r1.min(r2).powi(2);
    let (mut near, mut far) = ((r1 - r2).abs(), r1 + r2);

    if overlap <= 0.0 {
        return far;
    }
    if overlap >= max_overlap {
        return near;
    }

    // Lens area decreases monotonically from `near` to `far`.
    for _ in 0..DISTANCE_ITERATIONS {
        let mid = (near + far) / 2.0;
        if circle_intersection_area(r1, r2, mid) > overlap {
            near = mid;
        } else {
            far = mid;
        }
    }

    (near + far) / 2.0
}

/// Place A at the origin, B to its right and C below, honoring the three distances.
fn place_centers(d_ab: f64, d_ac: f64, d_bc: f64) -> [Point; 3] {
    let a = Point::new(0.0, 0.0);
    let b = Point::new(d_ab, 0.0);

    let cx = if d_ab > f64::EPSILON {
        (d_ab.mul_add(d_ab, d_ac * d_ac) - d_bc * d_bc) / (2.0 * d_ab)
    } else {
        0.0
    };
    // Triangle inequality violations collapse C onto the A-B line.
    let cy = d_ac.mul_add(d_ac, -(cx * cx)).max(0.0).sqrt();

    [a, b, Point::new(cx, -cy)]
}

fn normalize(circles: [Circle; 3]) -> Venn3Layout {
    let raw = Venn3Layout { circles };
    let bounds = raw.bounds();
    let extent = bounds.width().max(bounds.height());
    let factor = if extent > 0.0 { 2.0 / extent } else { 1.0 };
    let offset = bounds.center().scale(-factor);

    Venn3Layout {
        circles: circles.map(|circle| circle.transform(factor, offset)),
    }
}
