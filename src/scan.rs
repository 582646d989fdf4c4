// Copyright 2025 Lars Brubaker
// License: MIT
//
// Sweep infrastructure.
//
// Every long-running operator in the engine is a single bottom-to-top sweep
// over horizontal bands. The ScanIndex is the transient view that drives
// it: the trapezoids in canonical order plus the deduplicated list of y
// coordinates where anything starts or stops. It is rebuilt per call and
// never escapes the crate.
//
// Because every trapezoid endpoint contributes a cut up front, the sweep
// needs no dynamic event queue: a cursor over the sorted list replaces it.

use crate::engine::{GeomError, GeomResult};
use crate::geom::Coord;
use crate::region::Zoid;
use smallvec::SmallVec;
use std::cell::Cell;

/// Sorted trapezoids plus the y cut lines of their extents.
pub(crate) struct ScanIndex {
    pub zoids: Vec<Zoid>,
    pub cuts: Vec<Coord>,
}

impl ScanIndex {
    pub fn build(mut zoids: Vec<Zoid>) -> Self {
        zoids.retain(|z| !z.is_bad());
        zoids.sort_unstable_by(Zoid::scan_cmp);
        let mut cuts: Vec<Coord> = Vec::with_capacity(zoids.len() * 2);
        for z in &zoids {
            cuts.push(z.y_bot);
            cuts.push(z.y_top);
        }
        cuts.sort_unstable();
        cuts.dedup();
        ScanIndex { zoids, cuts }
    }

    pub fn cursor(&self) -> BandCursor<'_> {
        BandCursor {
            index: self,
            next: 0,
            active: SmallVec::new(),
        }
    }
}

/// Merge two ascending cut lists into one, deduplicated.
pub(crate) fn merge_cuts(a: &[Coord], b: &[Coord]) -> Vec<Coord> {
    let mut out = Vec::with_capacity(a.len() + b.len());
    out.extend_from_slice(a);
    out.extend_from_slice(b);
    out.sort_unstable();
    out.dedup();
    out
}

/// Walks the active trapezoid set band by band. Bands must be visited in
/// ascending order and every trapezoid endpoint must be a cut, so each
/// active trapezoid fully spans the band it is reported for.
pub(crate) struct BandCursor<'a> {
    index: &'a ScanIndex,
    next: usize,
    active: SmallVec<[usize; 16]>,
}

impl<'a> BandCursor<'a> {
    /// Advance to the band starting at `y0`; returns indices into the
    /// ScanIndex zoid list, ordered by canonical position.
    pub fn advance(&mut self, y0: Coord) -> &[usize] {
        let zoids = &self.index.zoids;
        self.active.retain(|&mut i| zoids[i].y_top > y0);
        while self.next < self.index.zoids.len() && self.index.zoids[self.next].y_bot <= y0 {
            if self.index.zoids[self.next].y_top > y0 {
                self.active.push(self.next);
            }
            self.next += 1;
        }
        &self.active
    }
}

/// Cooperative cancellation for a sweep in progress. The caller's callback
/// is polled every `stride` bands; once it reports true the whole call
/// fails with Interrupted and its partial output is discarded.
pub(crate) struct SweepCtl<'a> {
    interrupt: Option<&'a (dyn Fn() -> bool)>,
    stride: u32,
    countdown: Cell<u32>,
}

impl<'a> SweepCtl<'a> {
    pub fn new(interrupt: Option<&'a (dyn Fn() -> bool)>, stride: u32) -> Self {
        let stride = stride.max(1);
        SweepCtl {
            interrupt,
            stride,
            countdown: Cell::new(stride),
        }
    }

    /// Interrupt-free control for internal helpers.
    pub fn none() -> SweepCtl<'static> {
        SweepCtl {
            interrupt: None,
            stride: u32::MAX,
            countdown: Cell::new(u32::MAX),
        }
    }

    #[inline]
    pub fn check(&self) -> GeomResult<()> {
        let Some(cb) = self.interrupt else {
            return Ok(());
        };
        let left = self.countdown.get();
        if left > 1 {
            self.countdown.set(left - 1);
            return Ok(());
        }
        self.countdown.set(self.stride);
        if cb() {
            log::debug!("sweep interrupted by caller");
            Err(GeomError::Interrupted)
        } else {
            Ok(())
        }
    }
}
