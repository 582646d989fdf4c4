// Copyright 2025 Lars Brubaker
// Cooperative interruption of long sweeps.

mod helpers;

use std::cell::Cell;
use std::rc::Rc;

use helpers::*;
use trapregion::{Engine, EngineConfig, GeomError, Region, TouchMode, Zoid};

/// A synthetic input with many scan bands, enough to guarantee several
/// interrupt polls during one sweep.
fn big_grid(cols: i32, rows: i32) -> Region {
    let mut zoids = Vec::with_capacity((cols * rows) as usize);
    for i in 0..cols {
        for j in 0..rows {
            zoids.push(Zoid::rect(i * 4, j * 4, i * 4 + 2, j * 4 + 2));
        }
    }
    Region::from_zoids(zoids)
}

fn strict_engine() -> Engine {
    Engine::with_config(EngineConfig {
        interrupt_stride: 1,
        ..EngineConfig::default()
    })
}

#[test]
fn union_aborts_mid_sweep() {
    init_logs();
    let mut eng = strict_engine();
    let polls = Rc::new(Cell::new(0u32));
    let seen = polls.clone();
    eng.set_interrupt(move || {
        seen.set(seen.get() + 1);
        seen.get() > 8
    });
    let out = eng.union(big_grid(10, 40), big_grid(10, 40));
    assert_eq!(out.unwrap_err(), GeomError::Interrupted);
    assert!(polls.get() > 8, "callback was polled {} times", polls.get());
}

#[test]
fn engine_recovers_after_an_interrupt() {
    let mut eng = strict_engine();
    eng.set_interrupt(|| true);
    assert_eq!(
        eng.union(big_grid(4, 4), big_grid(4, 4)).unwrap_err(),
        GeomError::Interrupted
    );
    // A subsequent call on fresh Regions succeeds normally.
    eng.clear_interrupt();
    let out = eng
        .union(rect_region(0, 0, 10, 10), rect_region(5, 5, 15, 15))
        .unwrap();
    assert_eq!(out.area2(), 350);
}

#[test]
fn every_sweep_operation_honors_the_interrupt() {
    let mut eng = strict_engine();
    eng.set_interrupt(|| true);
    let g = big_grid(4, 4);
    assert_eq!(eng.bloat(g.clone(), 2).unwrap_err(), GeomError::Interrupted);
    assert_eq!(
        eng.group(g.clone(), TouchMode::Touch, 0).unwrap_err(),
        GeomError::Interrupted
    );
    assert_eq!(eng.reconstruct(g.clone()).unwrap_err(), GeomError::Interrupted);
    assert_eq!(eng.halo(g, 1).unwrap_err(), GeomError::Interrupted);
}

#[test]
fn short_sweeps_between_polls_complete() {
    // The callback is sampled every `interrupt_stride` bands; a sweep
    // shorter than one stride never observes it.
    let mut eng = Engine::new();
    eng.set_interrupt(|| true);
    let out = eng
        .union(rect_region(0, 0, 10, 10), rect_region(20, 0, 30, 10))
        .unwrap();
    assert_eq!(out.area2(), 400);
}
