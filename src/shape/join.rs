// Copyright 2025 Lars Brubaker
// License: MIT
//
// Reconstruction: joining a Region's trapezoids back into ordinary
// vertex-list polygons.
//
// Trapezoids accumulate bottom-up into chains of vertically adjacent,
// strictly overlapping pieces; each closed chain traces one simple
// counter-clockwise polygon. Where a region branches or rejoins, the extra
// arms become chains of their own, so holes never appear: a
// multiply-connected region reconstructs as several hole-free polygons
// covering the same area.

use super::{Poly, Shape};
use crate::boolop::{combine, BoolOp};
use crate::engine::GeomResult;
use crate::geom::{Coord, Point};
use crate::region::{Region, Zoid, NO_TAG};
use crate::scan::SweepCtl;

/// Output caps for reconstruction. The three size caps default to 0,
/// meaning unlimited; setting them bounds pathological output at the cost
/// of extra polygons.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct JoinLimits {
    /// Maximum vertices per output polygon.
    pub max_verts: usize,
    /// Maximum trapezoids combined into one polygon before a forced split.
    pub max_group: usize,
    /// Maximum trapezoids held across open chains at once.
    pub max_queue: usize,
    /// Defer a forced split to a flush seam so the cut leaves no notch.
    pub clean_break: bool,
    /// Render wires to their polygon equivalent when joining object lists.
    pub include_wires: bool,
}

impl Default for JoinLimits {
    fn default() -> Self {
        JoinLimits {
            max_verts: 0,
            max_group: 0,
            max_queue: 0,
            clean_break: false,
            include_wires: true,
        }
    }
}

/// How many trapezoids a chain may overshoot its cap while a clean break
/// waits for a flush seam.
const BREAK_SLACK: usize = 2;

struct Chain {
    zoids: Vec<Zoid>,
    verts: usize,
    slack: usize,
}

impl Chain {
    fn new(z: Zoid) -> Self {
        let mut verts = 4;
        if z.x_bl == z.x_br {
            verts -= 1;
        }
        if z.x_tl == z.x_tr {
            verts -= 1;
        }
        Chain {
            zoids: vec![z],
            verts,
            slack: 0,
        }
    }

    fn top(&self) -> &Zoid {
        &self.zoids[self.zoids.len() - 1]
    }

    fn push(&mut self, z: Zoid, seam_cost: usize) {
        self.verts += seam_cost;
        self.zoids.push(z);
    }
}

/// Extra boundary vertices a seam between two stacked trapezoids costs on
/// each side: none where the edge continues straight, one where only the
/// slope changes, two where the x jogs.
fn seam_cost(lower: &Zoid, upper: &Zoid) -> usize {
    let side = |xl: Coord, xu: Coord, sl: i32, su: i32| -> usize {
        if xl != xu {
            2
        } else if sl != su {
            1
        } else {
            0
        }
    };
    side(lower.x_tr, upper.x_br, lower.right_slope(), upper.right_slope())
        + side(lower.x_tl, upper.x_bl, lower.left_slope(), upper.left_slope())
}

fn flush_seam(lower: &Zoid, upper: &Zoid) -> bool {
    lower.x_tl == upper.x_bl && lower.x_tr == upper.x_br
}

fn can_extend(lower: &Zoid, upper: &Zoid) -> bool {
    lower.y_top == upper.y_bot && lower.x_tl.max(upper.x_bl) < lower.x_tr.min(upper.x_br)
}

pub(crate) fn reconstruct(
    region: Region,
    limits: &JoinLimits,
    ctl: &SweepCtl<'_>,
) -> GeomResult<Vec<Poly>> {
    fn close(c: Chain, queued: &mut usize, polys: &mut Vec<Poly>) {
        *queued -= c.zoids.len();
        polys.push(trace(&c.zoids));
    }

    let mut polys: Vec<Poly> = Vec::new();
    let mut chains: Vec<Chain> = Vec::new();
    let mut queued = 0usize;

    for z in region {
        ctl.check()?;

        // Chains that stopped below this trapezoid can never extend again.
        let mut i = 0;
        while i < chains.len() {
            if chains[i].top().y_top < z.y_bot {
                let done = chains.remove(i);
                close(done, &mut queued, &mut polys);
            } else {
                i += 1;
            }
        }

        match chains.iter().position(|c| can_extend(c.top(), &z)) {
            Some(i) => {
                let cost = seam_cost(chains[i].top(), &z);
                let over = (limits.max_group > 0
                    && chains[i].zoids.len() + 1 > limits.max_group)
                    || (limits.max_verts > 0 && chains[i].verts + cost > limits.max_verts);
                if !over {
                    chains[i].push(z, cost);
                    queued += 1;
                } else if limits.clean_break
                    && !flush_seam(chains[i].top(), &z)
                    && chains[i].slack < BREAK_SLACK
                {
                    chains[i].slack += 1;
                    chains[i].push(z, cost);
                    queued += 1;
                } else {
                    let done = chains.remove(i);
                    close(done, &mut queued, &mut polys);
                    chains.push(Chain::new(z));
                    queued += 1;
                }
            }
            None => {
                chains.push(Chain::new(z));
                queued += 1;
            }
        }

        while limits.max_queue > 0 && queued > limits.max_queue && !chains.is_empty() {
            let done = chains.remove(0);
            close(done, &mut queued, &mut polys);
        }
    }
    for c in chains {
        close(c, &mut queued, &mut polys);
    }
    Ok(polys)
}

/// Walk a chain's boundary counter-clockwise: bottom edge, right side with
/// seam jogs, top edge, left side back down.
fn trace(zoids: &[Zoid]) -> Poly {
    let first = &zoids[0];
    let last = &zoids[zoids.len() - 1];
    let mut pts: Vec<Point> = Vec::with_capacity(zoids.len() * 4 + 2);
    pts.push(Point::new(first.x_bl, first.y_bot));
    pts.push(Point::new(first.x_br, first.y_bot));
    for w in zoids.windows(2) {
        let (lo, hi) = (&w[0], &w[1]);
        pts.push(Point::new(lo.x_tr, lo.y_top));
        pts.push(Point::new(hi.x_br, hi.y_bot));
    }
    pts.push(Point::new(last.x_tr, last.y_top));
    pts.push(Point::new(last.x_tl, last.y_top));
    for w in zoids.windows(2).rev() {
        let (lo, hi) = (&w[0], &w[1]);
        pts.push(Point::new(hi.x_bl, hi.y_bot));
        pts.push(Point::new(lo.x_tl, lo.y_top));
    }
    Poly::new(simplify(pts))
}

/// Drop repeated and collinear vertices, cyclically.
fn simplify(pts: Vec<Point>) -> Vec<Point> {
    let mut out: Vec<Point> = Vec::with_capacity(pts.len());
    for p in pts {
        if out.last() != Some(&p) {
            out.push(p);
        }
    }
    while out.len() > 1 && out.first() == out.last() {
        out.pop();
    }
    let collinear = |a: Point, b: Point, c: Point| -> bool {
        (b.x as i64 - a.x as i64) * (c.y as i64 - a.y as i64)
            == (b.y as i64 - a.y as i64) * (c.x as i64 - a.x as i64)
    };
    loop {
        let n = out.len();
        if n < 4 {
            break;
        }
        let mut removed = false;
        let mut i = 0;
        while i < out.len() && out.len() >= 4 {
            let n = out.len();
            let (a, b, c) = (out[(i + n - 1) % n], out[i], out[(i + 1) % n]);
            if collinear(a, b, c) {
                out.remove(i);
                removed = true;
            } else {
                i += 1;
            }
        }
        if !removed {
            break;
        }
    }
    out
}

/// Decompose a list of drawn objects, union them, and reconstruct the
/// merged outlines. Wires are skipped unless the limits include them.
pub(crate) fn join_objects(
    shapes: &[Shape],
    limits: &JoinLimits,
    ctl: &SweepCtl<'_>,
) -> GeomResult<Vec<Poly>> {
    let mut zoids = Vec::new();
    for shape in shapes {
        if matches!(shape, Shape::Wire(_)) && !limits.include_wires {
            continue;
        }
        zoids.extend(super::decompose(shape, NO_TAG, ctl)?.into_zoids());
    }
    let merged = combine(zoids, Vec::new(), BoolOp::Or, true, ctl)?;
    reconstruct(merged, limits, ctl)
}
