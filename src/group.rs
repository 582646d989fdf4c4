// Copyright 2025 Lars Brubaker
// License: MIT
//
// Connectivity grouping: splitting a Region into maximal
// touching-connected subsets.
//
// One band sweep finds every adjacency: lateral contact between
// x-neighbors inside a band, and seam contact between trapezoids ending
// and starting at the same cut line. Union-find collects the components;
// an optional size limit seals a component so later contacts start a new
// group, bounding the cost of downstream Boolean work on pathologically
// large connected regions.

use crate::engine::GeomResult;
use crate::geom::Coord;
use crate::region::{Region, Tag, Zoid, NO_TAG};
use crate::scan::{ScanIndex, SweepCtl};
use std::collections::HashMap;

/// What counts as connected.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TouchMode {
    /// Shared boundary of positive length (or interior overlap) only.
    Overlap,
    /// Corner-point contact also connects.
    Touch,
}

/// A maximal connected subset of a Region, carrying the provenance tags of
/// its trapezoids back to the caller's originating objects.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Group {
    region: Region,
}

impl Group {
    pub fn region(&self) -> &Region {
        &self.region
    }

    pub fn into_region(self) -> Region {
        self.region
    }

    pub fn area2(&self) -> i64 {
        self.region.area2()
    }

    /// Distinct provenance tags present in this group, ascending. The
    /// engine never interprets them.
    pub fn tags(&self) -> Vec<Tag> {
        let mut tags: Vec<Tag> = self
            .region
            .iter()
            .map(|z| z.tag)
            .filter(|&t| t != NO_TAG)
            .collect();
        tags.sort_unstable();
        tags.dedup();
        tags
    }
}

struct UnionFind {
    parent: Vec<usize>,
    size: Vec<usize>,
    limit: usize,
}

impl UnionFind {
    fn new(n: usize, limit: usize) -> Self {
        UnionFind {
            parent: (0..n).collect(),
            size: vec![1; n],
            limit,
        }
    }

    fn find(&mut self, mut i: usize) -> usize {
        while self.parent[i] != i {
            self.parent[i] = self.parent[self.parent[i]];
            i = self.parent[i];
        }
        i
    }

    /// Join two components unless the merged size would pass the seal
    /// limit; a sealed component simply stops growing.
    fn union(&mut self, a: usize, b: usize) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return;
        }
        if self.limit > 0 && self.size[ra] + self.size[rb] > self.limit {
            return;
        }
        let (big, small) = if self.size[ra] >= self.size[rb] {
            (ra, rb)
        } else {
            (rb, ra)
        };
        self.parent[small] = big;
        self.size[big] += self.size[small];
    }
}

/// Lateral contact between the right edge of `a` and the left edge of `b`
/// over one band. Straight edges coincide over the whole band or not at
/// all, so testing both cut lines decides it.
fn lateral_touch(a: &Zoid, b: &Zoid, y0: Coord, y1: Coord, mode: TouchMode) -> bool {
    let (ra0, ra1) = (a.right_x_at(y0), a.right_x_at(y1));
    let (lb0, lb1) = (b.left_x_at(y0), b.left_x_at(y1));
    if ra0 > lb0 || ra1 > lb1 {
        // Interior overlap; cannot happen in a clean region.
        return true;
    }
    match mode {
        TouchMode::Overlap => ra0 == lb0 && ra1 == lb1,
        TouchMode::Touch => ra0 == lb0 || ra1 == lb1,
    }
}

/// Seam contact at a cut line between a trapezoid topping out there and
/// one starting there.
fn seam_touch(lower: &Zoid, upper: &Zoid, mode: TouchMode) -> bool {
    let lo = lower.x_tl.max(upper.x_bl);
    let hi = lower.x_tr.min(upper.x_br);
    match mode {
        TouchMode::Overlap => lo < hi,
        TouchMode::Touch => lo <= hi,
    }
}

pub(crate) fn group_region(
    region: Region,
    mode: TouchMode,
    limit: usize,
    ctl: &SweepCtl<'_>,
) -> GeomResult<Vec<Group>> {
    let idx = ScanIndex::build(region.into_zoids());
    let n = idx.zoids.len();
    if n == 0 {
        return Ok(Vec::new());
    }
    let mut uf = UnionFind::new(n, limit);

    let mut ends_at: HashMap<Coord, Vec<usize>> = HashMap::new();
    let mut starts_at: HashMap<Coord, Vec<usize>> = HashMap::new();
    for (i, z) in idx.zoids.iter().enumerate() {
        ends_at.entry(z.y_top).or_default().push(i);
        starts_at.entry(z.y_bot).or_default().push(i);
    }

    let mut cursor = idx.cursor();
    let mut active: Vec<usize> = Vec::new();
    for w in idx.cuts.windows(2) {
        let (y0, y1) = (w[0], w[1]);
        ctl.check()?;

        active.clear();
        active.extend_from_slice(cursor.advance(y0));
        active.sort_by_key(|&i| (idx.zoids[i].left_x_at(y0), idx.zoids[i].left_x_at(y1)));
        for pair in active.windows(2) {
            if lateral_touch(&idx.zoids[pair[0]], &idx.zoids[pair[1]], y0, y1, mode) {
                uf.union(pair[0], pair[1]);
            }
        }
    }
    for y in &idx.cuts {
        let (Some(lower), Some(upper)) = (ends_at.get(y), starts_at.get(y)) else {
            continue;
        };
        for &i in lower {
            for &j in upper {
                if seam_touch(&idx.zoids[i], &idx.zoids[j], mode) {
                    uf.union(i, j);
                }
            }
        }
    }

    // Emit groups in order of first appearance in the scan.
    let mut by_root: HashMap<usize, usize> = HashMap::new();
    let mut buckets: Vec<Vec<Zoid>> = Vec::new();
    for (i, z) in idx.zoids.iter().enumerate() {
        let root = uf.find(i);
        let slot = *by_root.entry(root).or_insert_with(|| {
            buckets.push(Vec::new());
            buckets.len() - 1
        });
        buckets[slot].push(*z);
    }
    Ok(buckets
        .into_iter()
        .map(|zoids| Group {
            region: Region::from_zoids(zoids),
        })
        .collect())
}
