//! Structured JSON export of a single layout.

use serde::{Deserialize, Serialize};

use super::{ExportError, ExportRequest};
use crate::geometry::Dimension;
use crate::rooms::{BlockedArea, PlacedRoom, RoomType, RoomTypeId, Unit};

pub const APP_NAME: &str = "Floor Plan Generator";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub app_name: String,
    pub exported_at_unix: u64,
    /// 1-based, as shown to users.
    pub layout_index: usize,
}

/// One placed room with its footprint already resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportedRoom {
    pub type_id: RoomTypeId,
    pub ordinal: u32,
    pub name: String,
    pub x: i32,
    pub y: i32,
    /// Effective width (after rotation).
    pub width: i32,
    /// Effective height (after rotation).
    pub height: i32,
    pub rotated: bool,
    pub color: String,
}

impl From<&PlacedRoom> for ExportedRoom {
    fn from(r: &PlacedRoom) -> Self {
        let size = r.effective_dimensions();
        Self {
            type_id: r.room.type_id.clone(),
            ordinal: r.room.ordinal,
            name: r.room.name.clone(),
            x: r.x,
            y: r.y,
            width: size.width,
            height: size.height,
            rotated: r.rotated,
            color: r.room.color.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportedLayout {
    pub placed_rooms: Vec<ExportedRoom>,
    pub score: i64,
    pub diversity: usize,
}

/// Top-level JSON document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonExport {
    pub metadata: ExportMetadata,
    pub floor: Dimension,
    pub unit: Unit,
    pub rooms: Vec<RoomType>,
    pub blocked_areas: Vec<BlockedArea>,
    pub layout: ExportedLayout,
}

impl JsonExport {
    pub fn from_request(req: &ExportRequest<'_>) -> Self {
        Self {
            metadata: ExportMetadata {
                app_name: APP_NAME.to_string(),
                exported_at_unix: req.exported_at_unix,
                layout_index: req.layout_index + 1,
            },
            floor: req.floor,
            unit: req.unit,
            rooms: req.rooms.to_vec(),
            blocked_areas: req.blocked.to_vec(),
            layout: ExportedLayout {
                placed_rooms: req.layout.placed_rooms.iter().map(ExportedRoom::from).collect(),
                score: req.layout.score,
                diversity: req.layout.diversity,
            },
        }
    }
}

/// Pretty-printed JSON (2-space indent) describing the chosen layout.
pub fn to_json(req: &ExportRequest<'_>) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(&JsonExport::from_request(req))?)
}
