// Copyright 2025 Lars Brubaker
// Shared test utilities for trapregion tests.

#![allow(dead_code)]

use trapregion::{Coord, Engine, Point, Poly, Rect, Region};

/// Install the test logger once; safe to call from every test.
pub fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn rect_region(l: Coord, b: Coord, r: Coord, t: Coord) -> Region {
    Region::from_rect(Rect::new(l, b, r, t))
}

pub fn poly(xy: &[(Coord, Coord)]) -> Poly {
    Poly::new(xy.iter().map(|&(x, y)| Point::new(x, y)).collect())
}

/// Total unsigned doubled area of a polygon list. Reconstruction emits
/// disjoint hole-free polygons, so the sum is the covered doubled area.
pub fn polys_area2(polys: &[Poly]) -> i64 {
    polys.iter().map(|p| p.area2().abs()).sum()
}

/// Exact coverage equality: the symmetric difference is empty.
pub fn same_geometry(a: &Region, b: &Region) -> bool {
    Engine::new()
        .symmetric_difference(a.clone(), b.clone())
        .map(|d| d.is_empty())
        .unwrap_or(false)
}
