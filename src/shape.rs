// Copyright 2025 Lars Brubaker
// License: MIT
//
// Boundary ingestion: polygons, boxes, and wires become Regions.
//
// The polygon path slices the boundary horizontally at every vertex y
// coordinate; inside each band the spanning edges pair up even-odd in x
// order and every pair closes one trapezoid. Input validation happens here
// and nowhere deeper: a boundary that cannot form a valid trapezoid is
// rejected with InvalidInput before any sweep starts.

pub mod join;

use crate::boolop::{combine, BoolOp};
use crate::engine::{GeomError, GeomResult};
use crate::geom::{
    edge_45_clean, is_valid_coord, round_div, Area2, Coord, Point, Rect, INV_SQRT2_DEN,
    INV_SQRT2_NUM,
};
use crate::region::{Region, Tag, Zoid};
use crate::scan::SweepCtl;
use smallvec::SmallVec;

/// An ordered-vertex polygon on the design grid: the boundary
/// representation exchanged with callers outside the kernel. Orientation
/// does not matter for decomposition; reconstruction emits
/// counter-clockwise boundaries.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Poly {
    pub points: Vec<Point>,
}

impl Poly {
    pub fn new(points: Vec<Point>) -> Self {
        Poly { points }
    }

    pub fn from_coords(xy: &[(Coord, Coord)]) -> Self {
        Poly {
            points: xy.iter().map(|&(x, y)| Point::new(x, y)).collect(),
        }
    }

    /// Doubled signed area by the shoelace sum; positive for
    /// counter-clockwise boundaries in y-up coordinates.
    pub fn area2(&self) -> Area2 {
        let n = self.points.len();
        let mut sum: i64 = 0;
        for i in 0..n {
            let a = self.points[i];
            let b = self.points[(i + 1) % n];
            sum += a.x as i64 * b.y as i64 - b.x as i64 * a.y as i64;
        }
        sum
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// How a wire terminates at its two open ends.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EndStyle {
    /// The end face sits exactly on the endpoint.
    Flush,
    /// The end face extends half the wire width past the endpoint.
    Extended,
}

/// A centerline-plus-width wire. Segment directions must be 45-clean and
/// the width even, so the half-width offsets stay on grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Wire {
    pub points: Vec<Point>,
    pub width: Coord,
    pub end: EndStyle,
}

/// A drawable object the decomposer accepts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Shape {
    Box(Rect),
    Poly(Poly),
    Wire(Wire),
}

pub(crate) fn decompose(shape: &Shape, tag: Tag, ctl: &SweepCtl<'_>) -> GeomResult<Region> {
    let zoids = match shape {
        Shape::Box(r) => {
            if r.is_empty() {
                return Err(GeomError::InvalidInput("box has no area"));
            }
            for c in [r.l, r.b, r.r, r.t] {
                if !is_valid_coord(c) {
                    return Err(GeomError::InvalidInput("coordinate beyond engine range"));
                }
            }
            return Ok(Region::from_zoids(vec![
                Zoid::rect(r.l, r.b, r.r, r.t).with_tag(tag)
            ]));
        }
        Shape::Poly(p) => trapezoidalize(&p.points, tag, false)?,
        Shape::Wire(w) => render_wire(w, tag)?,
    };
    combine(zoids, Vec::new(), BoolOp::Or, true, ctl)
}

/// Horizontal slicing of one closed boundary into band trapezoids.
///
/// Strict mode demands 45-clean edges and is exact. Lenient mode accepts
/// slightly off-grid boundaries (snapped rotations, rescaled working
/// copies): x values interpolate with rounding and each side edge is
/// coerced to the nearest legal slope, dropping any sliver a snap inverts.
pub(crate) fn trapezoidalize(
    points: &[Point],
    tag: Tag,
    lenient: bool,
) -> GeomResult<Vec<Zoid>> {
    let mut pts: SmallVec<[Point; 16]> = SmallVec::new();
    for &p in points {
        if pts.last() != Some(&p) {
            pts.push(p);
        }
    }
    while pts.len() > 1 && pts.first() == pts.last() {
        pts.pop();
    }
    if pts.len() < 3 {
        return Err(GeomError::InvalidInput("polygon needs at least three vertices"));
    }
    for p in &pts {
        if !is_valid_coord(p.x) || !is_valid_coord(p.y) {
            return Err(GeomError::InvalidInput("coordinate beyond engine range"));
        }
    }
    let n = pts.len();
    if !lenient {
        for i in 0..n {
            let (a, b) = (pts[i], pts[(i + 1) % n]);
            if !edge_45_clean(a.x, a.y, b.x, b.y) {
                return Err(GeomError::InvalidInput("polygon edge is not 45-clean"));
            }
        }
    }
    let mut area: i64 = 0;
    for i in 0..n {
        let (a, b) = (pts[i], pts[(i + 1) % n]);
        area += a.x as i64 * b.y as i64 - b.x as i64 * a.y as i64;
    }
    if area == 0 {
        return Err(GeomError::InvalidInput("zero-area boundary"));
    }

    let mut cuts: SmallVec<[Coord; 16]> = pts.iter().map(|p| p.y).collect();
    cuts.sort_unstable();
    cuts.dedup();

    let mut out: Vec<Zoid> = Vec::new();
    let mut spans: SmallVec<[(Coord, Coord); 16]> = SmallVec::new();
    for w in cuts.windows(2) {
        let (y0, y1) = (w[0], w[1]);
        spans.clear();
        for i in 0..n {
            let (a, b) = (pts[i], pts[(i + 1) % n]);
            if a.y == b.y {
                continue;
            }
            let (lo, hi) = if a.y < b.y { (a, b) } else { (b, a) };
            if lo.y <= y0 && hi.y >= y1 {
                spans.push((x_on_edge(lo, hi, y0, lenient), x_on_edge(lo, hi, y1, lenient)));
            }
        }
        if spans.len() % 2 != 0 {
            return Err(GeomError::InvalidInput("open or self-intersecting boundary"));
        }
        spans.sort_unstable();
        for pair in spans.chunks_exact(2) {
            let (l, r) = (pair[0], pair[1]);
            let mut z = Zoid::new(y0, y1, l.0, r.0, l.1, r.1).with_tag(tag);
            if lenient {
                let h = y1 - y0;
                z.x_tl = snap_top(z.x_bl, z.x_tl, h);
                z.x_tr = snap_top(z.x_br, z.x_tr, h);
                // A snap can invert a near-degenerate top; drop the sliver.
                if z.x_tl > z.x_tr {
                    continue;
                }
            }
            if !z.is_bad() {
                out.push(z);
            }
        }
    }
    Ok(out)
}

fn x_on_edge(lo: Point, hi: Point, y: Coord, lenient: bool) -> Coord {
    let dy = hi.y - lo.y;
    let dx = hi.x - lo.x;
    if lenient {
        (lo.x as i64 + round_div(dx as i64 * (y - lo.y) as i64, dy as i64)) as Coord
    } else {
        // 45-clean edges have dx of 0 or +-dy, so this is exact.
        lo.x + dx / dy * (y - lo.y)
    }
}

/// Nearest legal top x for a side edge from `xb` over height `h`.
fn snap_top(xb: Coord, xt: Coord, h: Coord) -> Coord {
    let mut best = xb;
    for cand in [xb - h, xb, xb + h] {
        if (cand - xt).abs() < (best - xt).abs() {
            best = cand;
        }
    }
    best
}

/// Render a wire to the trapezoids of its segment quads. Orthogonal
/// segments expand by the exact half-width; diagonal segments use the
/// 29/41 snapped perpendicular offset.
fn render_wire(w: &Wire, tag: Tag) -> GeomResult<Vec<Zoid>> {
    if w.width <= 0 {
        return Err(GeomError::InvalidInput("wire width must be positive"));
    }
    if w.width % 2 != 0 {
        return Err(GeomError::InvalidInput("wire width must be even to stay on grid"));
    }
    let hw = w.width / 2;
    let hd = round_div(w.width as i64 * INV_SQRT2_NUM, 2 * INV_SQRT2_DEN) as Coord;

    let mut pts: SmallVec<[Point; 8]> = SmallVec::new();
    for &p in &w.points {
        if !is_valid_coord(p.x) || !is_valid_coord(p.y) {
            return Err(GeomError::InvalidInput("coordinate beyond engine range"));
        }
        if pts.last() != Some(&p) {
            pts.push(p);
        }
    }
    if pts.len() < 2 {
        return Err(GeomError::InvalidInput("wire needs two distinct points"));
    }

    let mut zoids = Vec::new();
    let last_seg = pts.len() - 2;
    for (i, seg) in pts.windows(2).enumerate() {
        let (a, b) = (seg[0], seg[1]);
        let dx = b.x - a.x;
        let dy = b.y - a.y;
        if !(dx == 0 || dy == 0 || dx.abs() == dy.abs()) {
            return Err(GeomError::InvalidInput("wire segment is not 45-clean"));
        }
        let (sx, sy) = (dx.signum(), dy.signum());
        let diag = dx != 0 && dy != 0;
        let reach = if diag { hd } else { hw };
        let ext_a = if i == 0 && w.end == EndStyle::Extended { reach } else { 0 };
        let ext_b = if i == last_seg && w.end == EndStyle::Extended { reach } else { 0 };
        let a2 = Point::new(a.x - sx * ext_a, a.y - sy * ext_a);
        let b2 = Point::new(b.x + sx * ext_b, b.y + sy * ext_b);
        if diag {
            let perp = Point::new(sy * hd, -sx * hd);
            let quad = [
                Point::new(a2.x + perp.x, a2.y + perp.y),
                Point::new(b2.x + perp.x, b2.y + perp.y),
                Point::new(b2.x - perp.x, b2.y - perp.y),
                Point::new(a2.x - perp.x, a2.y - perp.y),
            ];
            zoids.extend(trapezoidalize(&quad, tag, false)?);
        } else if dy == 0 {
            let (l, r) = (a2.x.min(b2.x), a2.x.max(b2.x));
            zoids.push(Zoid::rect(l, a.y - hw, r, a.y + hw).with_tag(tag));
        } else {
            let (b0, t0) = (a2.y.min(b2.y), a2.y.max(b2.y));
            zoids.push(Zoid::rect(a.x - hw, b0, a.x + hw, t0).with_tag(tag));
        }
    }
    Ok(zoids)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(side: Coord) -> Vec<Point> {
        vec![
            Point::new(0, 0),
            Point::new(side, 0),
            Point::new(side, side),
            Point::new(0, side),
        ]
    }

    #[test]
    fn square_slices_to_one_rect() {
        let zoids = trapezoidalize(&sq(10), 0, false).unwrap();
        assert_eq!(zoids, vec![Zoid::rect(0, 0, 10, 10).with_tag(0)]);
    }

    #[test]
    fn l_shape_slices_to_two_bands() {
        let pts = Poly::from_coords(&[(0, 0), (20, 0), (20, 5), (10, 5), (10, 10), (0, 10)]);
        let zoids = trapezoidalize(&pts.points, 0, false).unwrap();
        assert_eq!(zoids.len(), 2);
        let total: i64 = zoids.iter().map(|z| z.area2()).sum();
        assert_eq!(total, 300); // area 150
    }

    #[test]
    fn octagon_is_45_clean() {
        let pts = Poly::from_coords(&[
            (2, 0), (8, 0), (10, 2), (10, 8), (8, 10), (2, 10), (0, 8), (0, 2),
        ]);
        let zoids = trapezoidalize(&pts.points, 0, false).unwrap();
        assert!(zoids.iter().all(Zoid::is_valid));
        let total: i64 = zoids.iter().map(|z| z.area2()).sum();
        assert_eq!(total, 184); // 100 minus four corner triangles of area 2
    }

    #[test]
    fn orientation_does_not_matter() {
        let mut pts = sq(10);
        pts.reverse();
        let zoids = trapezoidalize(&pts, 0, false).unwrap();
        assert_eq!(zoids[0].area2(), 200);
    }

    #[test]
    fn rejects_bad_boundaries() {
        let two = vec![Point::new(0, 0), Point::new(5, 5)];
        assert_eq!(
            trapezoidalize(&two, 0, false),
            Err(GeomError::InvalidInput("polygon needs at least three vertices"))
        );
        let knight = vec![Point::new(0, 0), Point::new(2, 5), Point::new(0, 5)];
        assert_eq!(
            trapezoidalize(&knight, 0, false),
            Err(GeomError::InvalidInput("polygon edge is not 45-clean"))
        );
        let flat = vec![Point::new(0, 0), Point::new(5, 5), Point::new(10, 10)];
        assert_eq!(
            trapezoidalize(&flat, 0, false),
            Err(GeomError::InvalidInput("zero-area boundary"))
        );
    }

    #[test]
    fn lenient_mode_snaps_slopes() {
        // Left edge rises 3 over height 4: off grid, snapped to the nearest
        // legal slope instead of rejected.
        let pts = vec![
            Point::new(0, 0),
            Point::new(10, 0),
            Point::new(10, 4),
            Point::new(3, 4),
        ];
        assert!(trapezoidalize(&pts, 0, false).is_err());
        let zoids = trapezoidalize(&pts, 0, true).unwrap();
        assert!(zoids.iter().all(Zoid::is_valid));
    }

    #[test]
    fn horizontal_wire_renders_flush_and_extended() {
        let mut w = Wire {
            points: vec![Point::new(0, 0), Point::new(10, 0)],
            width: 4,
            end: EndStyle::Flush,
        };
        let z = render_wire(&w, 0).unwrap();
        assert_eq!(z, vec![Zoid::rect(0, -2, 10, 2).with_tag(0)]);
        w.end = EndStyle::Extended;
        let z = render_wire(&w, 0).unwrap();
        assert_eq!(z, vec![Zoid::rect(-2, -2, 12, 2).with_tag(0)]);
    }

    #[test]
    fn diagonal_wire_is_exact_quad() {
        let w = Wire {
            points: vec![Point::new(0, 0), Point::new(10, 10)],
            width: 4,
            end: EndStyle::Flush,
        };
        let zoids = render_wire(&w, 0).unwrap();
        let total: i64 = zoids.iter().map(|z| z.area2()).sum();
        assert_eq!(total, 80); // rotated rect, doubled area exact
        assert!(zoids.iter().all(Zoid::is_valid));
    }

    #[test]
    fn wire_validation() {
        let base = Wire {
            points: vec![Point::new(0, 0), Point::new(10, 0)],
            width: 4,
            end: EndStyle::Flush,
        };
        let w = Wire { width: 0, ..base.clone() };
        assert!(render_wire(&w, 0).is_err());
        let w = Wire { width: 3, ..base.clone() };
        assert!(render_wire(&w, 0).is_err());
        let w = Wire { points: vec![Point::new(5, 5)], ..base.clone() };
        assert!(render_wire(&w, 0).is_err());
        let w = Wire { points: vec![Point::new(0, 0), Point::new(3, 7)], ..base };
        assert_eq!(
            render_wire(&w, 0),
            Err(GeomError::InvalidInput("wire segment is not 45-clean"))
        );
    }
}
