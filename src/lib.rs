// trapregion: trapezoid-decomposition region algebra for IC layout geometry
// Copyright 2025 Lars Brubaker
// License: MIT

pub mod bloat;
mod boolop;
pub mod engine;
pub mod geom;
pub mod group;
pub mod region;
mod scan;
pub mod shape;
pub mod transform;

pub use bloat::{BloatStyle, CornerMode};
pub use engine::{Engine, EngineConfig, GeomError, GeomResult};
pub use geom::{Area2, Coord, Point, Rect};
pub use group::{Group, TouchMode};
pub use region::{Region, Tag, Zoid, NO_TAG};
pub use shape::join::JoinLimits;
pub use shape::{EndStyle, Poly, Shape, Wire};
pub use transform::{Transform, TransformStack};
