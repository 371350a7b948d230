//! Serialization of a chosen layout for other tools.
//!
//! | Format | Entry point |
//! |--------|-------------|
//! | DXF R12 (CAD exchange) | [`dxf::to_dxf`] |
//! | JSON (structured data) | [`json::to_json`] |
//!
//! Both are pure: they build a `String` and leave writing it to the caller.

pub mod dxf;
pub mod json;

use std::fmt;

use crate::geometry::Dimension;
use crate::rooms::{BlockedArea, Layout, RoomType, Unit};

/// Everything an exporter needs about one chosen layout.
#[derive(Debug, Clone, Copy)]
pub struct ExportRequest<'a> {
    pub floor: Dimension,
    pub unit: Unit,
    pub rooms: &'a [RoomType],
    pub blocked: &'a [BlockedArea],
    pub layout: &'a Layout,
    /// 0-based rank of `layout` among the generated results.
    pub layout_index: usize,
    /// Export time, seconds since the Unix epoch.
    pub exported_at_unix: u64,
}

/// Errors that can occur during export.
#[derive(Debug)]
pub enum ExportError {
    Json(serde_json::Error),
}

impl From<serde_json::Error> for ExportError {
    fn from(e: serde_json::Error) -> Self {
        ExportError::Json(e)
    }
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::Json(e) => write!(f, "JSON serialization error: {}", e),
        }
    }
}

impl std::error::Error for ExportError {}
