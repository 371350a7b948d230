//! Room and layout data model.
//!
//! `RoomType` is what the caller defines, `RoomInstance` is one concrete unit
//! of a type, `PlacedRoom` is an instance pinned to the grid, and `Layout` is
//! the ordered result of one trial.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::{Dimension, Rect};

/// Identifier of a caller-supplied room type.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomTypeId(pub String);

impl From<&str> for RoomTypeId {
    fn from(s: &str) -> Self {
        RoomTypeId(s.to_string())
    }
}

impl fmt::Display for RoomTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Display unit for dimensions. Never affects placement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    #[default]
    M,
    Cm,
    Mm,
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Unit::M => "m",
            Unit::Cm => "cm",
            Unit::Mm => "mm",
        })
    }
}

/// A reusable room template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomType {
    pub id: RoomTypeId,
    pub name: String,
    pub dimensions: Dimension,
    pub color: String,
    /// Explicit instance quota. `None` (or zero) means fit as many as the floor allows.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
}

impl RoomType {
    pub fn area(&self) -> i64 {
        self.dimensions.area()
    }

    /// Quota if the caller gave a positive one.
    pub fn explicit_quantity(&self) -> Option<u32> {
        self.quantity.filter(|&q| q > 0)
    }
}

/// One concrete, individually addressable unit of a room type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomInstance {
    /// Back-reference to the originating `RoomType`.
    pub type_id: RoomTypeId,
    /// Position of this instance within its type, starting at 0.
    pub ordinal: u32,
    pub name: String,
    pub dimensions: Dimension,
    pub color: String,
}

impl RoomInstance {
    pub fn from_type(room_type: &RoomType, ordinal: u32) -> Self {
        Self {
            type_id: room_type.id.clone(),
            ordinal,
            name: room_type.name.clone(),
            dimensions: room_type.dimensions,
            color: room_type.color.clone(),
        }
    }

    pub fn area(&self) -> i64 {
        self.dimensions.area()
    }
}

/// Fixed rectangular obstacle on the floor. Never moves or rotates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockedArea {
    pub id: String,
    pub name: String,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl BlockedArea {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

/// A room instance pinned at `(x, y)`, optionally turned by 90°.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedRoom {
    #[serde(flatten)]
    pub room: RoomInstance,
    pub x: i32,
    pub y: i32,
    pub rotated: bool,
}

impl PlacedRoom {
    pub fn type_id(&self) -> &RoomTypeId {
        &self.room.type_id
    }

    /// Footprint after rotation: width and height swap when `rotated`.
    pub fn effective_dimensions(&self) -> Dimension {
        if self.rotated {
            self.room.dimensions.swapped()
        } else {
            self.room.dimensions
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::at(self.x, self.y, self.effective_dimensions())
    }

    pub fn area(&self) -> i64 {
        self.room.area()
    }

    /// Short human label, e.g. `bedroom#2`.
    pub fn label(&self) -> String {
        format!("{}#{}", self.room.type_id, self.room.ordinal)
    }
}

/// One candidate floor plan: placed rooms in placement order plus its scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub placed_rooms: Vec<PlacedRoom>,
    /// Sum of placed room areas.
    pub score: i64,
    /// Number of distinct room types represented.
    pub diversity: usize,
}

impl Layout {
    /// Materialize a layout from a finished trial, computing score and diversity.
    pub fn from_placements(placed_rooms: Vec<PlacedRoom>) -> Self {
        let score = placed_rooms.iter().map(PlacedRoom::area).sum();
        let diversity = placed_rooms
            .iter()
            .map(PlacedRoom::type_id)
            .collect::<BTreeSet<_>>()
            .len();
        Self {
            placed_rooms,
            score,
            diversity,
        }
    }

    pub fn room_count(&self) -> usize {
        self.placed_rooms.len()
    }

    pub fn type_ids(&self) -> BTreeSet<&RoomTypeId> {
        self.placed_rooms.iter().map(PlacedRoom::type_id).collect()
    }

    /// Whether at least one instance of every id in `required` is placed.
    pub fn covers<'a, I>(&self, required: I) -> bool
    where
        I: IntoIterator<Item = &'a RoomTypeId>,
    {
        let present = self.type_ids();
        required.into_iter().all(|id| present.contains(id))
    }
}
