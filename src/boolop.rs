// Copyright 2025 Lars Brubaker
// License: MIT
//
// The Boolean set engine.
//
// All set operators run the same single sweep: the y cut lines of both
// operands define horizontal bands; inside a band every active trapezoid
// contributes an enter edge and an exit edge; walking the edges in x order
// with one coverage counter per operand classifies every column, and the
// requested operator decides which columns become output. Output
// trapezoids are merged on the fly, horizontally by not closing while the
// predicate holds and vertically by joining across band seams, so results
// stay near minimal without a separate compaction pass.
//
// Bands that contain a 45° edge crossing are subdivided at the crossing.
// A crossing between slopes differing by two can sit on a half-grid line;
// such a crossing is bracketed by the two nearest integer cuts and the
// sub-grid lens left in between is resolved by clamping when the output
// edge pair would invert. On-grid geometry is never perturbed.

use crate::engine::GeomResult;
use crate::geom::{edge_cross_dy, x_at, Coord};
use crate::region::{Region, Tag, Zoid, NO_TAG};
use crate::scan::{merge_cuts, ScanIndex, SweepCtl};
use smallvec::SmallVec;

/// Set operator selector for the combine sweep.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BoolOp {
    /// Union of both operands.
    Or,
    /// Intersection.
    And,
    /// First operand minus second.
    AndNot,
    /// Symmetric difference.
    Xor,
}

#[inline]
fn covered(op: BoolOp, ca: i32, cb: i32) -> bool {
    let a = ca > 0;
    let b = cb > 0;
    match op {
        BoolOp::Or => a || b,
        BoolOp::And => a && b,
        BoolOp::AndNot => a && !b,
        BoolOp::Xor => a != b,
    }
}

/// Tag of the slices covering a scan column: the common tag when every
/// active operand agrees, NO_TAG for mixed or absent coverage.
#[inline]
fn cover_tag(ca: i32, ta: Tag, cb: i32, tb: Tag) -> Tag {
    match (ca > 0, cb > 0) {
        (true, true) => {
            if ta == tb {
                ta
            } else {
                NO_TAG
            }
        }
        (true, false) => ta,
        (false, true) => tb,
        (false, false) => NO_TAG,
    }
}

/// One trapezoid's cross section over the current band: left and right
/// edges as (x at band bottom, x at band top).
#[derive(Copy, Clone, Debug)]
struct Slice {
    xbl: Coord,
    xtl: Coord,
    xbr: Coord,
    xtr: Coord,
    tag: Tag,
    from_b: bool,
}

#[derive(Copy, Clone, Debug)]
struct Ev {
    xb: Coord,
    xt: Coord,
    /// 0 = enter, 1 = exit; part of the sort key so seams do not flicker.
    exit: u8,
    from_b: bool,
    tag: Tag,
}

/// Combine two trapezoid lists. Lists need not be clean or sorted; the
/// coverage counters absorb self-overlap, which is what makes this the
/// self-clean / repartition sweep as well.
pub(crate) fn combine(
    a: Vec<Zoid>,
    b: Vec<Zoid>,
    op: BoolOp,
    merge: bool,
    ctl: &SweepCtl<'_>,
) -> GeomResult<Region> {
    let ia = ScanIndex::build(a);
    let ib = ScanIndex::build(b);
    let cuts = merge_cuts(&ia.cuts, &ib.cuts);
    let mut ca = ia.cursor();
    let mut cb = ib.cursor();

    let mut out: Vec<Zoid> = Vec::new();
    // Indices into `out` of the zoids topping out at the last seam.
    let mut prev: Vec<usize> = Vec::new();
    let mut prev_top: Coord = Coord::MIN;

    let mut slices: SmallVec<[Slice; 16]> = SmallVec::new();
    let mut subcuts: SmallVec<[Coord; 8]> = SmallVec::new();

    for w in cuts.windows(2) {
        let (y0, y1) = (w[0], w[1]);
        ctl.check()?;

        slices.clear();
        for &i in ca.advance(y0) {
            let z = &ia.zoids[i];
            if z.y_top >= y1 {
                slices.push(band_slice(z, y0, y1, false));
            }
        }
        for &i in cb.advance(y0) {
            let z = &ib.zoids[i];
            if z.y_top >= y1 {
                slices.push(band_slice(z, y0, y1, true));
            }
        }
        if slices.is_empty() {
            continue;
        }

        subcuts.clear();
        subcuts.push(y0);
        subcuts.push(y1);
        collect_crossings(&slices, y0, y1, &mut subcuts);

        for s in subcuts.windows(2) {
            let (t0, t1) = (s[0], s[1]);
            if prev_top != t0 {
                prev.clear();
            }
            scan_columns(op, merge, &slices, y0, y1, t0, t1, &mut out, &mut prev);
            prev_top = t1;
        }
    }

    Ok(Region::from_zoids(out))
}

fn band_slice(z: &Zoid, y0: Coord, y1: Coord, from_b: bool) -> Slice {
    Slice {
        xbl: z.left_x_at(y0),
        xtl: z.left_x_at(y1),
        xbr: z.right_x_at(y0),
        xtr: z.right_x_at(y1),
        tag: z.tag,
        from_b,
    }
}

/// Push the integer cuts bracketing every strict edge crossing inside the
/// band, then sort/dedup the cut list. Vertical-only bands cannot cross
/// and skip the pair scan.
fn collect_crossings(slices: &[Slice], y0: Coord, y1: Coord, subcuts: &mut SmallVec<[Coord; 8]>) {
    let any_slant = slices
        .iter()
        .any(|s| s.xbl != s.xtl || s.xbr != s.xtr);
    if !any_slant {
        return;
    }
    let h = y1 - y0;
    let mut edges: SmallVec<[(Coord, Coord); 32]> = SmallVec::new();
    for s in slices {
        edges.push((s.xbl, s.xtl));
        edges.push((s.xbr, s.xtr));
    }
    for i in 0..edges.len() {
        for j in i + 1..edges.len() {
            if let Some((dy, exact)) = edge_cross_dy(edges[i].0, edges[i].1, edges[j].0, edges[j].1, h)
            {
                for c in [y0 + dy, y0 + dy + 1] {
                    if c > y0 && c < y1 && (c == y0 + dy || !exact) {
                        subcuts.push(c);
                    }
                }
            }
        }
    }
    subcuts.sort_unstable();
    subcuts.dedup();
}

/// Walk one sub-band's edges in x order and emit the covered columns.
#[allow(clippy::too_many_arguments)]
fn scan_columns(
    op: BoolOp,
    merge: bool,
    slices: &[Slice],
    y0: Coord,
    y1: Coord,
    t0: Coord,
    t1: Coord,
    out: &mut Vec<Zoid>,
    prev: &mut Vec<usize>,
) {
    let mut evs: SmallVec<[Ev; 32]> = SmallVec::new();
    for s in slices {
        let lb = x_at(s.xbl, y0, s.xtl, y1, t0);
        let lt = x_at(s.xbl, y0, s.xtl, y1, t1);
        let rb = x_at(s.xbr, y0, s.xtr, y1, t0);
        let rt = x_at(s.xbr, y0, s.xtr, y1, t1);
        // A slice can pinch to nothing at a sub-cut; drop it there.
        if lb >= rb && lt >= rt {
            continue;
        }
        evs.push(Ev { xb: lb, xt: lt, exit: 0, from_b: s.from_b, tag: s.tag });
        evs.push(Ev { xb: rb, xt: rt, exit: 1, from_b: s.from_b, tag: s.tag });
    }
    if evs.is_empty() {
        return;
    }
    evs.sort_unstable_by_key(|e| (e.xb, e.xt, e.exit));

    let mut count_a = 0i32;
    let mut count_b = 0i32;
    // Tag currently carried by each operand's active slices; NO_TAG while
    // inactive or when overlapping slices of one operand disagree.
    let mut tag_a = NO_TAG;
    let mut tag_b = NO_TAG;
    let mut open: Option<(Coord, Coord, Tag)> = None;
    let mut buf: SmallVec<[Zoid; 16]> = SmallVec::new();

    let mut i = 0;
    while i < evs.len() {
        let key = (evs[i].xb, evs[i].xt);
        let mut j = i;
        while j < evs.len() && (evs[j].xb, evs[j].xt) == key {
            let e = &evs[j];
            let (c, t) = if e.from_b {
                (&mut count_b, &mut tag_b)
            } else {
                (&mut count_a, &mut tag_a)
            };
            if e.exit == 0 {
                *c += 1;
                if *c == 1 {
                    *t = e.tag;
                } else if *t != e.tag {
                    *t = NO_TAG;
                }
            } else {
                *c -= 1;
                if *c == 0 {
                    *t = NO_TAG;
                }
            }
            j += 1;
        }
        let ins = covered(op, count_a, count_b);
        match (ins, open) {
            (true, None) => {
                open = Some((key.0, key.1, cover_tag(count_a, tag_a, count_b, tag_b)));
            }
            (true, Some((xb, xt, tag))) => {
                // The span stays open across a coverage change; its tag is
                // meaningful only if the new cover agrees.
                if tag != cover_tag(count_a, tag_a, count_b, tag_b) {
                    open = Some((xb, xt, NO_TAG));
                }
            }
            (false, Some((xb, xt, tag))) => {
                let z = Zoid {
                    y_bot: t0,
                    y_top: t1,
                    x_bl: xb,
                    x_br: key.0,
                    x_tl: xt,
                    // A half-grid lens can invert the top; clamp it shut.
                    x_tr: key.1.max(xt),
                    tag,
                };
                if !z.is_bad() {
                    buf.push(z);
                }
                open = None;
            }
            _ => {}
        }
        i = j;
    }

    // Vertical merge against the zoids that topped out at t0.
    let mut new_prev: Vec<usize> = Vec::with_capacity(buf.len());
    let mut p = 0usize;
    for z in buf.drain(..) {
        let mut merged = false;
        if merge {
            while p < prev.len() && out[prev[p]].x_tl < z.x_bl {
                p += 1;
            }
            if p < prev.len() && out[prev[p]].join_above(&z) {
                new_prev.push(prev[p]);
                p += 1;
                merged = true;
            }
        }
        if !merged {
            out.push(z);
            new_prev.push(out.len() - 1);
        }
    }
    *prev = new_prev;
}
