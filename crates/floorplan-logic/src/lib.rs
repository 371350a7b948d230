//! Floor-plan layout generation.
//!
//! Given a rectangular floor, a set of room types and some fixed blocked
//! areas, this crate searches for non-overlapping room placements and
//! returns a small ranked set of distinct layouts. Functions take plain data
//! and return results; nothing here does I/O.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`canonical`] | Layout signatures and duplicate removal |
//! | [`config`] | Generator settings, plan document, plan validation |
//! | [`expand`] | Room types + quantities → individual room instances |
//! | [`export`] | DXF and JSON serialization of a chosen layout |
//! | [`generator`] | The full expand → trials → dedupe → rank pipeline |
//! | [`geometry`] | Grid rectangles, collision, layout validation |
//! | [`placement`] | Deterministic and randomized grid search for one room |
//! | [`ranking`] | Multi-criteria layout ordering |
//! | [`render`] | Plain-text drawing of a layout |
//! | [`rooms`] | Room types, instances, placed rooms, layouts |
//! | [`trials`] | Greedy and randomized trials, deadlines |

pub mod canonical;
pub mod config;
pub mod expand;
pub mod export;
pub mod generator;
pub mod geometry;
pub mod placement;
pub mod ranking;
pub mod render;
pub mod rooms;
pub mod trials;

pub use config::{FloorPlan, GeneratorConfig, RequiredPolicy};
pub use generator::{generate_layouts, generate_layouts_with_rng, generate_plan, GenerateError};
pub use geometry::Dimension;
pub use rooms::{BlockedArea, Layout, PlacedRoom, RoomInstance, RoomType, RoomTypeId, Unit};
