//! Room instance expansion.
//!
//! Turns room type definitions plus quantities into the flat list of
//! instances the trials try to place.

use crate::geometry::Dimension;
use crate::rooms::{RoomInstance, RoomType};

/// How many instances of `room_type` to attempt on a floor of `floor_area`.
///
/// An explicit positive quantity wins. Otherwise the count is the number of
/// copies whose combined area could fit, an upper bound on attempts rather
/// than a promise that they all get placed. Types with no area get zero.
pub fn instance_count(room_type: &RoomType, floor_area: i64) -> u32 {
    let area = room_type.area();
    if area <= 0 || !room_type.dimensions.is_positive() {
        return 0;
    }
    match room_type.explicit_quantity() {
        Some(q) => q,
        None => (floor_area.max(0) / area).min(u32::MAX as i64) as u32,
    }
}

/// Expand room types into individually addressable instances.
///
/// Instances appear grouped by type, in caller order, with ordinals
/// counting from zero within each type.
pub fn expand_instances(floor: Dimension, room_types: &[RoomType]) -> Vec<RoomInstance> {
    let floor_area = floor.area();
    let mut instances = Vec::new();
    for room_type in room_types {
        let count = instance_count(room_type, floor_area);
        instances.extend((0..count).map(|ordinal| RoomInstance::from_type(room_type, ordinal)));
    }
    instances
}
