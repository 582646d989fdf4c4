// Copyright 2025 Lars Brubaker
// License: MIT
//
// Placement transforms: translation, rotation in 45-degree steps, mirror,
// and uniform magnification, composed through a stack that mirrors
// hierarchical instance nesting.
//
// The linear part is an element of the dihedral group of the square plus a
// positive integer magnification, so every transform at a multiple of 90
// degrees is exact on the grid. Odd multiples of 45 degrees cannot be: they
// are snapped through the 29/41 rational approximation of 1/sqrt(2), and
// regions mapped through them are re-trapezoidalized leniently with each
// side edge coerced to the nearest legal slope.

use crate::boolop::{combine, BoolOp};
use crate::engine::{GeomError, GeomResult};
use crate::geom::{round_div, Coord, Point, INV_SQRT2_DEN, INV_SQRT2_NUM};
use crate::region::Region;
use crate::scan::SweepCtl;
use crate::shape::trapezoidalize;

/// An affine placement transform: mirror, then rotation in 45-degree
/// steps, then magnification, then translation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Transform {
    /// Counter-clockwise rotation in 45-degree steps, 0..8.
    rot: u8,
    /// Mirror across the x axis, applied before the rotation.
    flip: bool,
    mag: Coord,
    dx: Coord,
    dy: Coord,
}

impl Default for Transform {
    fn default() -> Self {
        Transform::identity()
    }
}

impl Transform {
    pub fn identity() -> Self {
        Transform {
            rot: 0,
            flip: false,
            mag: 1,
            dx: 0,
            dy: 0,
        }
    }

    pub fn translation(dx: Coord, dy: Coord) -> Self {
        Transform { dx, dy, ..Transform::identity() }
    }

    /// Counter-clockwise rotation. Angles that are not a multiple of 45
    /// degrees are rejected.
    pub fn rotation(degrees: i32) -> GeomResult<Self> {
        if degrees % 45 != 0 {
            return Err(GeomError::UnsupportedAngle(degrees));
        }
        let rot = ((degrees / 45) % 8 + 8) % 8;
        Ok(Transform { rot: rot as u8, ..Transform::identity() })
    }

    /// Mirror across the x axis (y negated).
    pub fn mirror_x() -> Self {
        Transform { flip: true, ..Transform::identity() }
    }

    /// Mirror across the y axis (x negated).
    pub fn mirror_y() -> Self {
        Transform { flip: true, rot: 4, ..Transform::identity() }
    }

    /// Uniform magnification; must be at least 1.
    pub fn magnification(mag: Coord) -> GeomResult<Self> {
        if mag < 1 {
            return Err(GeomError::InvalidInput("magnification must be at least 1"));
        }
        Ok(Transform { mag, ..Transform::identity() })
    }

    /// True when the transform maps the grid onto itself exactly; false for
    /// odd multiples of 45 degrees, which snap.
    pub fn is_exact(&self) -> bool {
        self.rot % 2 == 0
    }

    /// The composition applying `self` first, then `next`.
    pub fn then(&self, next: &Transform) -> Transform {
        let rot = if next.flip {
            (next.rot + 8 - self.rot) % 8
        } else {
            (next.rot + self.rot) % 8
        };
        let t = next.apply_point(Point::new(self.dx, self.dy));
        Transform {
            rot,
            flip: next.flip ^ self.flip,
            mag: next.mag * self.mag,
            dx: t.x,
            dy: t.y,
        }
    }

    pub fn apply_point(&self, p: Point) -> Point {
        let mut x = p.x as i64 * self.mag as i64;
        let mut y = p.y as i64 * self.mag as i64;
        if self.flip {
            y = -y;
        }
        for _ in 0..self.rot / 2 {
            let t = x;
            x = -y;
            y = t;
        }
        if self.rot % 2 == 1 {
            let (nx, ny) = (
                round_div((x - y) * INV_SQRT2_NUM, INV_SQRT2_DEN),
                round_div((x + y) * INV_SQRT2_NUM, INV_SQRT2_DEN),
            );
            x = nx;
            y = ny;
        }
        Point::new(x as Coord + self.dx, y as Coord + self.dy)
    }
}

/// A stack of placement transforms. Pushing composes onto the current top,
/// so nested instance scopes bracket naturally with push/pop: pushing T1
/// then T2 leaves the composition T2 after T1 on top.
#[derive(Clone, Debug, Default)]
pub struct TransformStack {
    frames: Vec<Transform>,
}

impl TransformStack {
    pub fn new() -> Self {
        TransformStack { frames: Vec::new() }
    }

    /// The current composed transform; identity when the stack is empty.
    pub fn top(&self) -> Transform {
        self.frames.last().copied().unwrap_or_default()
    }

    pub fn push(&mut self, t: Transform) {
        let composed = self.top().then(&t);
        self.frames.push(composed);
    }

    pub fn pop(&mut self) -> Option<Transform> {
        self.frames.pop()
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn apply_point(&self, p: Point) -> Point {
        self.top().apply_point(p)
    }
}

/// Map every trapezoid through the transform and rebuild a clean Region.
/// Each trapezoid goes through its corner quad and is re-trapezoidalized;
/// odd 45-degree rotations take the lenient path that coerces snapped side
/// edges back to legal slopes.
pub(crate) fn apply_region(
    t: &Transform,
    region: Region,
    ctl: &SweepCtl<'_>,
) -> GeomResult<Region> {
    let lenient = !t.is_exact();
    if lenient {
        log::warn!("rotation by odd multiple of 45 degrees: vertices snapped to grid");
    }
    let mut pieces = Vec::new();
    for z in region {
        ctl.check()?;
        let quad = [
            t.apply_point(Point::new(z.x_bl, z.y_bot)),
            t.apply_point(Point::new(z.x_br, z.y_bot)),
            t.apply_point(Point::new(z.x_tr, z.y_top)),
            t.apply_point(Point::new(z.x_tl, z.y_top)),
        ];
        pieces.extend(trapezoidalize(&quad, z.tag, lenient)?);
    }
    combine(pieces, Vec::new(), BoolOp::Or, true, ctl)
}
