// Copyright 2025 Lars Brubaker
// License: MIT
//
// Signed uniform growth and shrink of a Region boundary.
//
// Growth is per-trapezoid Minkowski expansion: every trapezoid is convex,
// so its grown image is the convex hull of the corner points offset by the
// corner mode's structuring element, and the hulls union in one sweep.
// All element edge directions are axis-aligned or 45 degrees, so the
// output stays 45-clean and exact on the grid. Shrink is erosion through
// the complement inside a padded working window.

use crate::boolop::{combine, BoolOp};
use crate::engine::GeomResult;
use crate::geom::{convex_hull, Coord, Point};
use crate::region::{Region, Zoid};
use crate::scan::SweepCtl;
use crate::shape::trapezoidalize;

/// What fills the ambiguous diagonal left at a grown right-angle corner.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CornerMode {
    /// Chamfer the corner at 45 degrees, cutting a triangle of half the
    /// squared distance from the full square fill.
    Clip,
    /// Leave the corner notch unfilled.
    Flat,
    /// Fill the full corner square with one extra trapezoid.
    Extend1,
    /// Fill the full corner square with two extra trapezoids.
    Extend2,
}

/// Named growth options; resolved once per call.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BloatStyle {
    pub corner: CornerMode,
    /// Return only the swept boundary band, not the filled area.
    pub edge_only: bool,
    /// Skip cleaning the input; the caller guarantees it is already clean.
    pub skip_premerge: bool,
    /// Skip compacting the output trapezoids.
    pub skip_postmerge: bool,
    /// Rescale internally when the distance exceeds the exact-corner
    /// budget; conservative, never drops area.
    pub scale_fix: bool,
    /// Grow slant-sided trapezoids by their padded bounding box instead of
    /// the exact hull. Over-covers, never drops area.
    pub no_projection_fix: bool,
    /// Old algorithm: plain square-element growth with full pre and post
    /// merge, ignoring every other field.
    pub legacy: bool,
}

impl Default for BloatStyle {
    fn default() -> Self {
        BloatStyle {
            corner: CornerMode::Extend1,
            edge_only: false,
            skip_premerge: false,
            skip_postmerge: false,
            scale_fix: false,
            no_projection_fix: false,
            legacy: false,
        }
    }
}

/// Distances beyond this engage the scale-fix rescale when enabled.
const SCALE_FIX_LIMIT: Coord = 1 << 20;

pub(crate) fn bloat_region(
    region: Region,
    d: Coord,
    style: &BloatStyle,
    ctl: &SweepCtl<'_>,
) -> GeomResult<Region> {
    if style.legacy {
        let plain = BloatStyle::default();
        let cleaned = combine(region.into_zoids(), Vec::new(), BoolOp::Or, true, ctl)?;
        return if d >= 0 {
            grow(cleaned, d, &plain, ctl)
        } else {
            shrink(cleaned, -d, &plain, ctl)
        };
    }

    let region = if style.skip_premerge {
        region
    } else {
        combine(region.into_zoids(), Vec::new(), BoolOp::Or, true, ctl)?
    };
    if d == 0 {
        return Ok(region);
    }

    let keep = if style.edge_only { Some(region.clone()) } else { None };
    let result = if d > 0 {
        if style.scale_fix && d > SCALE_FIX_LIMIT {
            grow_rescaled(region, d, style, ctl)?
        } else {
            grow(region, d, style, ctl)?
        }
    } else {
        shrink(region, -d, style, ctl)?
    };

    match keep {
        // The boundary band only: grown minus original, or original minus
        // shrunk.
        Some(orig) if d > 0 => combine(
            result.into_zoids(),
            orig.into_zoids(),
            BoolOp::AndNot,
            true,
            ctl,
        ),
        Some(orig) => combine(
            orig.into_zoids(),
            result.into_zoids(),
            BoolOp::AndNot,
            true,
            ctl,
        ),
        None => Ok(result),
    }
}

fn grow(region: Region, d: Coord, style: &BloatStyle, ctl: &SweepCtl<'_>) -> GeomResult<Region> {
    let mut pieces: Vec<Zoid> = Vec::new();
    for z in region.iter() {
        grow_zoid(z, d, style, &mut pieces)?;
    }
    combine(pieces, Vec::new(), BoolOp::Or, !style.skip_postmerge, ctl)
}

fn grow_zoid(z: &Zoid, d: Coord, style: &BloatStyle, out: &mut Vec<Zoid>) -> GeomResult<()> {
    if style.no_projection_fix && !z.is_rect() {
        let b = z.bbox().expanded(d);
        out.push(Zoid::rect(b.l, b.b, b.r, b.t).with_tag(z.tag));
        return Ok(());
    }
    let corners = [
        Point::new(z.x_bl, z.y_bot),
        Point::new(z.x_br, z.y_bot),
        Point::new(z.x_tr, z.y_top),
        Point::new(z.x_tl, z.y_top),
    ];
    let hull_of = |offsets: &[(Coord, Coord)]| -> Vec<Point> {
        let mut pts: Vec<Point> = Vec::with_capacity(corners.len() * offsets.len());
        for c in &corners {
            for &(ox, oy) in offsets {
                pts.push(Point::new(c.x + ox, c.y + oy));
            }
        }
        convex_hull(&mut pts)
    };
    match style.corner {
        // Both extend modes fill the full corner square; the historical
        // difference is only in output tiling, which the merge normalizes.
        CornerMode::Extend1 | CornerMode::Extend2 => {
            let hull = hull_of(&[(-d, -d), (d, -d), (d, d), (-d, d)]);
            out.extend(trapezoidalize(&hull, z.tag, false)?);
        }
        CornerMode::Clip => {
            let hull = hull_of(&[(-d, 0), (d, 0), (0, -d), (0, d)]);
            out.extend(trapezoidalize(&hull, z.tag, false)?);
        }
        CornerMode::Flat => {
            let h = hull_of(&[(-d, 0), (d, 0)]);
            out.extend(trapezoidalize(&h, z.tag, false)?);
            let v = hull_of(&[(0, -d), (0, d)]);
            out.extend(trapezoidalize(&v, z.tag, false)?);
        }
    }
    Ok(())
}

/// Erosion by the structuring element: the region minus the dilated
/// complement, taken inside a window padded far enough that the window
/// boundary cannot reach back into the result.
fn shrink(region: Region, d: Coord, style: &BloatStyle, ctl: &SweepCtl<'_>) -> GeomResult<Region> {
    let Some(b) = region.bbox() else {
        return Ok(region);
    };
    let pad = (d as i64 + 2).min(i32::MAX as i64 / 4) as Coord;
    let window = Region::from_rect(b.expanded(pad));
    let inner = region.clone();
    let compl = combine(
        window.into_zoids(),
        region.into_zoids(),
        BoolOp::AndNot,
        true,
        ctl,
    )?;
    // Over-covering the dilated complement would eat real area here, so the
    // bounding-box shortcut stays off on the shrink side.
    let exact = BloatStyle {
        no_projection_fix: false,
        ..*style
    };
    let mut pieces: Vec<Zoid> = Vec::new();
    for z in compl.iter() {
        grow_zoid(z, d, &exact, &mut pieces)?;
    }
    combine(
        inner.into_zoids(),
        pieces,
        BoolOp::AndNot,
        !style.skip_postmerge,
        ctl,
    )
}

/// Growth at reduced precision for oversized distances: coordinates are
/// right-shifted with outward rounding, grown by a distance rounded up
/// past the quantization loss, and shifted back. Covers at least the
/// exact result.
fn grow_rescaled(
    region: Region,
    d: Coord,
    style: &BloatStyle,
    ctl: &SweepCtl<'_>,
) -> GeomResult<Region> {
    let mut k = 0u32;
    while (d >> k) > SCALE_FIX_LIMIT {
        k += 1;
    }
    log::warn!(
        "bloat distance {} exceeds exact corner budget, rescaling by 2^{}",
        d,
        k
    );
    let down = |c: Coord, up: bool| -> Coord {
        if up {
            (c + (1 << k) - 1) >> k
        } else {
            c >> k
        }
    };
    let mut scaled: Vec<Zoid> = Vec::new();
    for z in region.iter() {
        let quad = [
            Point::new(down(z.x_bl, false), down(z.y_bot, false)),
            Point::new(down(z.x_br, true), down(z.y_bot, false)),
            Point::new(down(z.x_tr, true), down(z.y_top, true)),
            Point::new(down(z.x_tl, false), down(z.y_top, true)),
        ];
        scaled.extend(trapezoidalize(&quad, z.tag, true)?);
    }
    let coarse = combine(scaled, Vec::new(), BoolOp::Or, true, ctl)?;
    let grown = grow(coarse, (d >> k) + 2, style, ctl)?;
    let up: Vec<Zoid> = grown
        .into_zoids()
        .into_iter()
        .map(|z| Zoid {
            y_bot: z.y_bot << k,
            y_top: z.y_top << k,
            x_bl: z.x_bl << k,
            x_br: z.x_br << k,
            x_tl: z.x_tl << k,
            x_tr: z.x_tr << k,
            tag: z.tag,
        })
        .collect();
    Ok(Region::from_zoids(up))
}
