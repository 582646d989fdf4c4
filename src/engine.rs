// Copyright 2025 Lars Brubaker
// License: MIT
//
// The engine facade: error taxonomy, configuration, and the public
// operation set.
//
// An Engine instance owns the per-call policy that the algorithms consume:
// join limits for reconstruction, the default sliver tolerance, the default
// bloat style, and the cooperative interrupt callback. There is no global
// state; two engines with different configurations coexist freely.

use crate::bloat::{bloat_region, BloatStyle};
use crate::boolop::{combine, BoolOp};
use crate::geom::Coord;
use crate::group::{group_region, Group, TouchMode};
use crate::region::{Region, Tag, NO_TAG};
use crate::scan::SweepCtl;
use crate::shape::join::{self, JoinLimits};
use crate::shape::{self, Poly, Shape};
use crate::transform::{apply_region, Transform, TransformStack};
use thiserror::Error;

/// Failure taxonomy of the whole engine.
///
/// Degenerate geometry produced inside a sweep is never an error; it is
/// filtered as numerical noise. The only recoverable failures are the three
/// below, and each is raised at exactly one boundary.
#[derive(Error, Copy, Clone, Debug, PartialEq, Eq)]
pub enum GeomError {
    /// The caller's interrupt callback fired mid-sweep. Partial output has
    /// been discarded; operands passed by value are gone and the whole call
    /// must be treated as failed.
    #[error("sweep interrupted by caller")]
    Interrupted,
    /// The supplied boundary cannot form any valid trapezoid.
    #[error("invalid input geometry: {0}")]
    InvalidInput(&'static str),
    /// Rotation by an angle that is not a multiple of 45 degrees.
    #[error("unsupported rotation angle {0} degrees")]
    UnsupportedAngle(i32),
}

pub type GeomResult<T> = Result<T, GeomError>;

/// Per-engine policy, resolved once at construction.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    /// Output caps for reconstruction.
    pub join_limits: JoinLimits,
    /// Default sliver tolerance in grid units; 0 selects the engine minimum
    /// of one grid unit.
    pub sliver_tol: Coord,
    /// Default growth style for `bloat` and `halo`.
    pub bloat_style: BloatStyle,
    /// How many sweep bands pass between interrupt polls.
    pub interrupt_stride: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            join_limits: JoinLimits::default(),
            sliver_tol: 0,
            bloat_style: BloatStyle::default(),
            interrupt_stride: 64,
        }
    }
}

/// The geometry engine. All sweep-capable operations poll the installed
/// interrupt callback and fail with `GeomError::Interrupted` when it
/// reports true.
///
/// Combining operators (`union`, `subtract`, `bloat`, ...) take their
/// Region operands by value and return a new Region; probes borrow.
#[derive(Default)]
pub struct Engine {
    config: EngineConfig,
    interrupt: Option<Box<dyn Fn() -> bool>>,
}

impl Engine {
    pub fn new() -> Self {
        Engine::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Engine {
            config,
            interrupt: None,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Install the cooperative cancellation callback. It is polled every
    /// `interrupt_stride` bands of any long sweep.
    pub fn set_interrupt<F: Fn() -> bool + 'static>(&mut self, callback: F) {
        self.interrupt = Some(Box::new(callback));
    }

    pub fn clear_interrupt(&mut self) {
        self.interrupt = None;
    }

    fn ctl(&self) -> SweepCtl<'_> {
        SweepCtl::new(self.interrupt.as_deref(), self.config.interrupt_stride)
    }

    // ---- Decomposition ----

    /// Convert a boundary description into a clean, canonically ordered
    /// Region.
    pub fn decompose(&self, shape: &Shape) -> GeomResult<Region> {
        self.decompose_tagged(shape, NO_TAG)
    }

    /// As `decompose`, stamping every produced trapezoid with an opaque
    /// provenance tag the engine carries but never interprets.
    pub fn decompose_tagged(&self, shape: &Shape, tag: Tag) -> GeomResult<Region> {
        let out = shape::decompose(shape, tag, &self.ctl())?;
        log::debug!("decompose: {} zoids", out.len());
        Ok(out)
    }

    // ---- Boolean set operations ----

    pub fn union(&self, a: Region, b: Region) -> GeomResult<Region> {
        self.boolean("union", a, b, BoolOp::Or)
    }

    pub fn intersect(&self, a: Region, b: Region) -> GeomResult<Region> {
        self.boolean("intersect", a, b, BoolOp::And)
    }

    /// A minus B.
    pub fn subtract(&self, a: Region, b: Region) -> GeomResult<Region> {
        self.boolean("subtract", a, b, BoolOp::AndNot)
    }

    pub fn symmetric_difference(&self, a: Region, b: Region) -> GeomResult<Region> {
        self.boolean("symmetric_difference", a, b, BoolOp::Xor)
    }

    /// Merge-and-deoverlap a single Region, e.g. after ad hoc construction.
    pub fn self_clean(&self, region: Region) -> GeomResult<Region> {
        self.boolean("self_clean", region, Region::new(), BoolOp::Or)
    }

    /// Rebuild canonical scan order and interior-disjointness from
    /// arbitrarily ordered, possibly overlapping input. Required before any
    /// other operator when a Region was assembled by naive concatenation.
    pub fn repartition(&self, region: Region) -> GeomResult<Region> {
        self.boolean("repartition", region, Region::new(), BoolOp::Or)
    }

    fn boolean(&self, name: &str, a: Region, b: Region, op: BoolOp) -> GeomResult<Region> {
        log::debug!("{}: {} x {} zoids in", name, a.len(), b.len());
        let out = combine(a.into_zoids(), b.into_zoids(), op, true, &self.ctl())?;
        log::debug!("{}: {} zoids out", name, out.len());
        Ok(out)
    }

    // ---- Growth ----

    /// Grow (distance > 0) or shrink (distance < 0) the region boundary
    /// uniformly, using the engine's default style.
    pub fn bloat(&self, region: Region, distance: Coord) -> GeomResult<Region> {
        let style = self.config.bloat_style;
        self.bloat_with(region, distance, &style)
    }

    pub fn bloat_with(
        &self,
        region: Region,
        distance: Coord,
        style: &BloatStyle,
    ) -> GeomResult<Region> {
        log::debug!("bloat: {} zoids by {}", region.len(), distance);
        let out = bloat_region(region, distance, style, &self.ctl())?;
        log::debug!("bloat: {} zoids out", out.len());
        Ok(out)
    }

    /// The purely new area of a growth: `bloat(region, d)` minus the
    /// original region. Empty for non-positive distances.
    pub fn halo(&self, region: Region, distance: Coord) -> GeomResult<Region> {
        let grown = bloat_region(
            region.clone(),
            distance,
            &self.config.bloat_style,
            &self.ctl(),
        )?;
        self.boolean("halo", grown, region, BoolOp::AndNot)
    }

    // ---- Grouping ----

    /// Split a Region into maximal touching-connected subsets. A non-zero
    /// `limit` seals a group at that many trapezoids, trading completeness
    /// of pathologically large components for bounded downstream cost.
    pub fn group(
        &self,
        region: Region,
        mode: TouchMode,
        limit: usize,
    ) -> GeomResult<Vec<Group>> {
        let groups = group_region(region, mode, limit, &self.ctl())?;
        log::debug!("group: {} groups", groups.len());
        Ok(groups)
    }

    // ---- Reconstruction ----

    /// Join adjacent trapezoids back into ordinary vertex-list polygons,
    /// bounded by the engine's join limits.
    pub fn reconstruct(&self, region: Region) -> GeomResult<Vec<Poly>> {
        let limits = self.config.join_limits;
        self.reconstruct_with(region, &limits)
    }

    pub fn reconstruct_with(&self, region: Region, limits: &JoinLimits) -> GeomResult<Vec<Poly>> {
        log::debug!("reconstruct: {} zoids in", region.len());
        let polys = join::reconstruct(region, limits, &self.ctl())?;
        log::debug!("reconstruct: {} polygons out", polys.len());
        Ok(polys)
    }

    /// Decompose a list of drawn objects, union them, and reconstruct the
    /// merged outline polygons. Wires are rendered to their polygon
    /// equivalent only when the join limits say so.
    pub fn join_objects(&self, shapes: &[Shape]) -> GeomResult<Vec<Poly>> {
        join::join_objects(shapes, &self.config.join_limits, &self.ctl())
    }

    // ---- Transforms ----

    /// Map a Region through a placement transform, re-validating the
    /// 45-clean invariant of every produced trapezoid.
    pub fn apply(&self, transform: &Transform, region: Region) -> GeomResult<Region> {
        apply_region(transform, region, &self.ctl())
    }

    /// Map through the composed top of a transform stack.
    pub fn apply_stack(&self, stack: &TransformStack, region: Region) -> GeomResult<Region> {
        self.apply(&stack.top(), region)
    }

    // ---- Cleanup ----

    /// Drop sliver trapezoids below the engine's default tolerance.
    pub fn filter_slivers(&self, region: Region) -> Region {
        region.filter_slivers(self.config.sliver_tol)
    }

    /// The stricter pre-DRC sliver pass at the engine's default tolerance.
    pub fn filter_drc_slivers(&self, region: Region) -> Region {
        region.filter_drc_slivers(self.config.sliver_tol)
    }
}
