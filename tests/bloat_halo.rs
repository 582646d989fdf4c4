// Copyright 2025 Lars Brubaker
// Growth, shrink, corner modes, and the halo construction.

mod helpers;

use helpers::*;
use trapregion::{BloatStyle, CornerMode, Engine, Region, Zoid};

fn style(corner: CornerMode) -> BloatStyle {
    BloatStyle {
        corner,
        ..BloatStyle::default()
    }
}

#[test]
fn extend_corner_fills_full_square() {
    init_logs();
    let eng = Engine::new();
    let out = eng
        .bloat_with(rect_region(0, 0, 10, 10), 2, &style(CornerMode::Extend1))
        .unwrap();
    assert!(same_geometry(&out, &rect_region(-2, -2, 12, 12)));
    assert_eq!(out.area2(), 392); // area 196

    let out2 = eng
        .bloat_with(rect_region(0, 0, 10, 10), 2, &style(CornerMode::Extend2))
        .unwrap();
    assert_eq!(out2.area2(), 392);
}

#[test]
fn clip_corner_chamfers_at_45() {
    let eng = Engine::new();
    let out = eng
        .bloat_with(rect_region(0, 0, 10, 10), 2, &style(CornerMode::Clip))
        .unwrap();
    // Full square fill minus the four corner triangles of area 2 each.
    assert_eq!(out.area2(), 376); // area 188
    assert!(out.is_45_clean());
    assert!(!out.is_manhattan());
    assert!(out.contains_point(-2, 5));
    assert!(!out.contains_point(-2, -2));
}

#[test]
fn flat_corner_leaves_notches() {
    let eng = Engine::new();
    let out = eng
        .bloat_with(rect_region(0, 0, 10, 10), 2, &style(CornerMode::Flat))
        .unwrap();
    assert_eq!(out.area2(), 360); // area 180
    assert!(!out.contains_point(-1, -1));
    assert!(out.contains_point(-1, 5));
    assert!(out.contains_point(5, -1));
}

#[test]
fn zero_distance_is_identity() {
    let eng = Engine::new();
    let a = rect_region(3, 4, 17, 9);
    for corner in [
        CornerMode::Clip,
        CornerMode::Flat,
        CornerMode::Extend1,
        CornerMode::Extend2,
    ] {
        let out = eng.bloat_with(a.clone(), 0, &style(corner)).unwrap();
        assert_eq!(out.area2(), a.area2());
        assert!(same_geometry(&out, &a));
    }
}

#[test]
fn shrink_erodes_uniformly() {
    let eng = Engine::new();
    let out = eng.bloat(rect_region(0, 0, 10, 10), -2).unwrap();
    assert!(same_geometry(&out, &rect_region(2, 2, 8, 8)));
}

#[test]
fn shrink_past_extent_is_empty() {
    let eng = Engine::new();
    let out = eng.bloat(rect_region(0, 0, 10, 10), -6).unwrap();
    assert!(out.is_empty());
}

#[test]
fn shrink_splits_a_dumbbell() {
    let eng = Engine::new();
    // Two fat pads joined by a thin bar; the bar vanishes under erosion.
    let pads = eng
        .union(rect_region(0, 0, 10, 10), rect_region(30, 0, 40, 10))
        .unwrap();
    let shape = eng.union(pads, rect_region(10, 4, 30, 6)).unwrap();
    let out = eng.bloat(shape, -2).unwrap();
    assert_eq!(out.area2(), 2 * 2 * 36);
    assert!(out.contains_point(5, 5));
    assert!(out.contains_point(35, 5));
    assert!(!out.contains_point(20, 5));
}

#[test]
fn halo_is_the_new_area_only() {
    let eng = Engine::new();
    let ring = eng.halo(rect_region(0, 0, 10, 10), 2).unwrap();
    assert_eq!(ring.area2(), 392 - 200); // grown minus original
    assert!(!ring.contains_point(5, 5));
    assert!(ring.contains_point(11, 5));
}

#[test]
fn halo_of_shrink_is_empty() {
    let eng = Engine::new();
    let out = eng.halo(rect_region(0, 0, 10, 10), -2).unwrap();
    assert!(out.is_empty());
}

#[test]
fn edge_only_growth_matches_halo() {
    let eng = Engine::new();
    let st = BloatStyle {
        edge_only: true,
        ..BloatStyle::default()
    };
    let band = eng.bloat_with(rect_region(0, 0, 10, 10), 2, &st).unwrap();
    let ring = eng.halo(rect_region(0, 0, 10, 10), 2).unwrap();
    assert!(same_geometry(&band, &ring));
}

#[test]
fn edge_only_shrink_is_the_eaten_band() {
    let eng = Engine::new();
    let st = BloatStyle {
        edge_only: true,
        ..BloatStyle::default()
    };
    let band = eng.bloat_with(rect_region(0, 0, 10, 10), -2, &st).unwrap();
    assert_eq!(band.area2(), 200 - 72); // original minus the 6x6 core
    assert!(band.contains_point(1, 5));
    assert!(!band.contains_point(5, 5));
}

#[test]
fn growth_merges_close_neighbors() {
    let eng = Engine::new();
    let two = eng
        .union(rect_region(0, 0, 4, 4), rect_region(6, 0, 10, 4))
        .unwrap();
    let out = eng.bloat(two, 1).unwrap();
    assert_eq!(out.zoids().len(), 1);
    assert!(same_geometry(&out, &rect_region(-1, -1, 11, 5)));
}

#[test]
fn legacy_matches_extend_for_rectangles() {
    let eng = Engine::new();
    let st = BloatStyle {
        legacy: true,
        // Ignored alongside every other field.
        corner: CornerMode::Clip,
        edge_only: true,
        ..BloatStyle::default()
    };
    let out = eng.bloat_with(rect_region(0, 0, 10, 10), 2, &st).unwrap();
    assert!(same_geometry(&out, &rect_region(-2, -2, 12, 12)));
}

#[test]
fn no_projection_fix_never_drops_area() {
    let eng = Engine::new();
    let tri = Region::from_zoids(vec![Zoid::new(0, 10, 0, 10, 0, 0)]);
    let exact = eng
        .bloat_with(tri.clone(), 2, &style(CornerMode::Extend1))
        .unwrap();
    let st = BloatStyle {
        no_projection_fix: true,
        ..BloatStyle::default()
    };
    let coarse = eng.bloat_with(tri, 2, &st).unwrap();
    // The bounding-box shortcut over-covers the exact hull.
    assert!(eng
        .subtract(exact.clone(), coarse.clone())
        .unwrap()
        .is_empty());
    assert!(coarse.area2() >= exact.area2());
}

#[test]
fn grown_diagonal_stays_clean() {
    let eng = Engine::new();
    let tri = Region::from_zoids(vec![Zoid::new(0, 10, 0, 10, 0, 0)]);
    let out = eng.bloat_with(tri, 3, &style(CornerMode::Clip)).unwrap();
    assert!(out.is_45_clean());
    assert!(out.contains_point(-3, 5));
}
