//! Minimal DXF R12 (AC1009) writer for a single layout.
//!
//! Output is ASCII group-code/value pairs with a header, a line type and
//! layer table, and an entity section holding the floor outline, dimension
//! lines, room and blocked-area rectangles, and a legend to the right of the
//! floor. Every room type that appears in the layout gets three layers
//! (geometry, dimensions, legend) sharing one ACI color.

use std::collections::{HashMap, HashSet};
use std::fmt::{Display, Write};

use super::ExportRequest;
use crate::rooms::{RoomType, RoomTypeId, Unit};

/// Distinct ACI colors for room layers. 5 (blue) is reserved for the floor.
const ROOM_COLORS: [u8; 13] = [1, 3, 2, 4, 6, 30, 142, 211, 40, 150, 52, 94, 20];

const FLOOR_COLOR: u8 = 5;
const BLOCKED_COLOR: u8 = 8;
const LEGEND_TITLE_COLOR: u8 = 4;

/// (layer name, ACI color) for the fixed layers.
const STATIC_LAYERS: [(&str, u8); 7] = [
    ("0", 7),
    ("FLOOR_OUTLINE", FLOOR_COLOR),
    ("BLOCKED", BLOCKED_COLOR),
    ("DIMENSIONS_FLOOR", FLOOR_COLOR),
    ("DIMENSIONS_BLOCKED", BLOCKED_COLOR),
    ("LEGEND_TITLE", LEGEND_TITLE_COLOR),
    ("LEGEND_BLOCKED", BLOCKED_COLOR),
];

#[derive(Debug, Clone, Copy, PartialEq)]
struct Point {
    x: f64,
    y: f64,
}

fn pt(x: f64, y: f64) -> Point {
    Point { x, y }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Arrow {
    Left,
    Right,
    Up,
    Down,
}

#[derive(Debug, Clone, Copy)]
struct DimStyle {
    text_size: f64,
    arrow_size: f64,
}

/// Layers and color assigned to one room type.
#[derive(Debug, Clone)]
struct RoomLayers {
    geometry: String,
    dimension: String,
    legend: String,
    color: u8,
}

/// Restrict a name to `[A-Za-z0-9_]` so it is a legal layer name.
pub fn sanitize_layer_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

#[derive(Default)]
struct DxfWriter {
    out: String,
}

impl DxfWriter {
    fn pair(&mut self, code: u16, value: impl Display) {
        // Writing to a String cannot fail.
        let _ = write!(self.out, "{}\n{}\n", code, value);
    }

    fn entity(&mut self, kind: &str, layer: &str, color: Option<u8>) {
        self.pair(0, kind);
        self.pair(8, layer);
        if let Some(c) = color {
            self.pair(62, c);
        }
    }

    fn layer(&mut self, name: &str, color: u8) {
        self.pair(0, "LAYER");
        self.pair(2, name);
        self.pair(70, 0);
        self.pair(62, color);
        self.pair(6, "CONTINUOUS");
    }

    fn line(&mut self, a: Point, b: Point, layer: &str, color: Option<u8>) {
        self.entity("LINE", layer, color);
        self.pair(10, a.x);
        self.pair(20, a.y);
        self.pair(11, b.x);
        self.pair(21, b.y);
    }

    fn rectangle(&mut self, x: f64, y: f64, w: f64, h: f64, layer: &str, color: Option<u8>) {
        let corners = [pt(x, y), pt(x + w, y), pt(x + w, y + h), pt(x, y + h)];
        for i in 0..4 {
            self.line(corners[i], corners[(i + 1) % 4], layer, color);
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn text(
        &mut self,
        text: &str,
        at: Point,
        height: f64,
        layer: &str,
        rotation: f64,
        align: Align,
        color: Option<u8>,
    ) {
        self.entity("TEXT", layer, color);
        self.pair(10, at.x);
        self.pair(20, at.y);
        if align == Align::Center {
            self.pair(11, at.x);
            self.pair(21, at.y);
            self.pair(40, height);
            self.pair(72, 4);
            self.pair(73, 2);
        } else {
            self.pair(40, height);
        }
        if rotation != 0.0 {
            self.pair(50, rotation);
        }
        self.pair(1, text);
    }

    fn solid_triangle(&mut self, p: [Point; 3], layer: &str, color: Option<u8>) {
        self.entity("SOLID", layer, color);
        self.pair(10, p[0].x);
        self.pair(20, p[0].y);
        self.pair(11, p[1].x);
        self.pair(21, p[1].y);
        self.pair(12, p[2].x);
        self.pair(22, p[2].y);
        // R12 solids have four corners; repeat the last for a triangle.
        self.pair(13, p[2].x);
        self.pair(23, p[2].y);
    }

    fn arrow_head(&mut self, tip: Point, dir: Arrow, size: f64, layer: &str, color: Option<u8>) {
        let (h, w) = (size, size / 2.0);
        let corners = match dir {
            Arrow::Left => [tip, pt(tip.x + h, tip.y - w), pt(tip.x + h, tip.y + w)],
            Arrow::Right => [tip, pt(tip.x - h, tip.y - w), pt(tip.x - h, tip.y + w)],
            Arrow::Down => [tip, pt(tip.x - w, tip.y + h), pt(tip.x + w, tip.y + h)],
            Arrow::Up => [tip, pt(tip.x - w, tip.y - h), pt(tip.x + w, tip.y - h)],
        };
        self.solid_triangle(corners, layer, color);
    }

    /// Dimension line with extension lines, arrowheads and a centered label.
    #[allow(clippy::too_many_arguments)]
    fn dimension(
        &mut self,
        a: Point,
        b: Point,
        value: i32,
        unit: Unit,
        vertical: bool,
        offset: f64,
        layer: &str,
        style: DimStyle,
        color: Option<u8>,
    ) {
        let DimStyle {
            text_size,
            arrow_size,
        } = style;
        let label = value.to_string();
        let gap = label.len() as f64 * text_size * 0.7 + text_size;
        let text = format!("{}{}", label, unit);

        if !vertical {
            let (x1, x2) = (a.x.min(b.x), a.x.max(b.x));
            let y = a.y;
            let dim_y = y - offset;
            let mid = (x1 + x2) / 2.0;
            self.line(pt(x1, y), pt(x1, dim_y - arrow_size), layer, color);
            self.line(pt(x2, y), pt(x2, dim_y - arrow_size), layer, color);
            self.line(pt(x1, dim_y), pt(mid - gap / 2.0, dim_y), layer, color);
            self.line(pt(mid + gap / 2.0, dim_y), pt(x2, dim_y), layer, color);
            self.arrow_head(pt(x1, dim_y), Arrow::Right, arrow_size, layer, color);
            self.arrow_head(pt(x2, dim_y), Arrow::Left, arrow_size, layer, color);
            self.text(&text, pt(mid, dim_y), text_size, layer, 0.0, Align::Center, color);
        } else {
            let (y1, y2) = (a.y.min(b.y), a.y.max(b.y));
            let x = a.x;
            let dim_x = x - offset;
            let mid = (y1 + y2) / 2.0;
            self.line(pt(x, y1), pt(dim_x - arrow_size, y1), layer, color);
            self.line(pt(x, y2), pt(dim_x - arrow_size, y2), layer, color);
            self.line(pt(dim_x, y1), pt(dim_x, mid - gap / 2.0), layer, color);
            self.line(pt(dim_x, mid + gap / 2.0), pt(dim_x, y2), layer, color);
            self.arrow_head(pt(dim_x, y1), Arrow::Up, arrow_size, layer, color);
            self.arrow_head(pt(dim_x, y2), Arrow::Down, arrow_size, layer, color);
            self.text(&text, pt(dim_x, mid), text_size, layer, 90.0, Align::Center, color);
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn dimension_pair(
        &mut self,
        x: f64,
        y: f64,
        w: i32,
        h: i32,
        unit: Unit,
        offset: f64,
        layer: &str,
        style: DimStyle,
        color: Option<u8>,
    ) {
        let (wf, hf) = (w as f64, h as f64);
        self.dimension(pt(x, y), pt(x + wf, y), w, unit, false, offset, layer, style, color);
        self.dimension(pt(x, y), pt(x, y + hf), h, unit, true, offset, layer, style, color);
    }
}

/// Room types with at least one placed instance, first definition per id,
/// in caller order.
fn placed_room_types<'a>(req: &ExportRequest<'a>) -> Vec<&'a RoomType> {
    let present = req.layout.type_ids();
    let mut seen = HashSet::new();
    req.rooms
        .iter()
        .filter(|rt| present.contains(&rt.id))
        .filter(|&rt| seen.insert(&rt.id))
        .collect()
}

/// Geometry layer name for a room type, suffixed with the type's position
/// when another type already sanitized to the same name.
fn unique_layer_base(name: &str, index: usize, taken: &mut HashSet<String>) -> String {
    let base = format!("ROOM_{}", sanitize_layer_name(name));
    let mut candidate = base.clone();
    let mut n = index + 1;
    while !taken.insert(candidate.clone()) {
        candidate = format!("{}_{}", base, n);
        n += 1;
    }
    candidate
}

/// Render the layout as DXF text.
pub fn to_dxf(req: &ExportRequest<'_>) -> String {
    let mut w = DxfWriter::default();
    let room_types = placed_room_types(req);

    // Header
    w.pair(0, "SECTION");
    w.pair(2, "HEADER");
    w.pair(9, "$ACADVER");
    w.pair(1, "AC1009");
    w.pair(0, "ENDSEC");

    // Tables
    w.pair(0, "SECTION");
    w.pair(2, "TABLES");

    w.pair(0, "TABLE");
    w.pair(2, "LTYPE");
    w.pair(70, 1);
    w.pair(0, "LTYPE");
    w.pair(2, "CONTINUOUS");
    w.pair(70, 0);
    w.pair(3, "Solid line");
    w.pair(72, 65);
    w.pair(73, 0);
    w.pair(40, 0.0);
    w.pair(0, "ENDTAB");

    w.pair(0, "TABLE");
    w.pair(2, "LAYER");
    w.pair(70, STATIC_LAYERS.len() + room_types.len() * 3);
    for (name, color) in STATIC_LAYERS {
        w.layer(name, color);
    }

    let mut layers_by_type: HashMap<&RoomTypeId, RoomLayers> = HashMap::new();
    let mut taken = HashSet::new();
    for (i, rt) in room_types.iter().enumerate() {
        let base = unique_layer_base(&rt.name, i, &mut taken);
        let layers = RoomLayers {
            dimension: format!("DIM_{}", base),
            legend: format!("LEGEND_{}", base),
            geometry: base,
            color: ROOM_COLORS[i % ROOM_COLORS.len()],
        };
        w.layer(&layers.geometry, layers.color);
        w.layer(&layers.dimension, layers.color);
        w.layer(&layers.legend, layers.color);
        layers_by_type.insert(&rt.id, layers);
    }

    w.pair(0, "ENDTAB");
    w.pair(0, "ENDSEC");

    // Entities
    w.pair(0, "SECTION");
    w.pair(2, "ENTITIES");

    let (width, height) = (req.floor.width as f64, req.floor.height as f64);
    let basis = width.max(height).max(10.0);
    let outer_offset = basis * 0.15;
    let inner_offset = basis * 0.05;
    let dim_style = DimStyle {
        text_size: basis * 0.025,
        arrow_size: basis * 0.015,
    };
    let small_style = DimStyle {
        text_size: basis * 0.02,
        arrow_size: basis * 0.012,
    };
    let unit = req.unit;

    w.rectangle(0.0, 0.0, width, height, "FLOOR_OUTLINE", Some(FLOOR_COLOR));
    w.dimension(
        pt(0.0, 0.0),
        pt(width, 0.0),
        req.floor.width,
        unit,
        false,
        outer_offset,
        "DIMENSIONS_FLOOR",
        dim_style,
        Some(FLOOR_COLOR),
    );
    w.dimension(
        pt(0.0, 0.0),
        pt(0.0, height),
        req.floor.height,
        unit,
        true,
        outer_offset,
        "DIMENSIONS_FLOOR",
        dim_style,
        Some(FLOOR_COLOR),
    );

    // Only the first instance of each room type gets dimensioned.
    let mut dimensioned = HashSet::new();
    for room in &req.layout.placed_rooms {
        if !dimensioned.insert(room.type_id()) {
            continue;
        }
        let size = room.effective_dimensions();
        let (layer, color) = match layers_by_type.get(room.type_id()) {
            Some(l) => (l.dimension.as_str(), l.color),
            None => ("DIMENSIONS_BLOCKED", 2),
        };
        w.dimension_pair(
            room.x as f64,
            room.y as f64,
            size.width,
            size.height,
            unit,
            inner_offset,
            layer,
            small_style,
            Some(color),
        );
    }

    for area in req.blocked {
        w.dimension_pair(
            area.x as f64,
            area.y as f64,
            area.width,
            area.height,
            unit,
            inner_offset,
            "DIMENSIONS_BLOCKED",
            small_style,
            Some(BLOCKED_COLOR),
        );
    }

    for room in &req.layout.placed_rooms {
        let rect = room.rect();
        let (layer, color) = match layers_by_type.get(room.type_id()) {
            Some(l) => (l.geometry.as_str(), l.color),
            None => ("0", 7),
        };
        w.rectangle(
            rect.x as f64,
            rect.y as f64,
            rect.width as f64,
            rect.height as f64,
            layer,
            Some(color),
        );
    }

    for area in req.blocked {
        w.rectangle(
            area.x as f64,
            area.y as f64,
            area.width as f64,
            area.height as f64,
            "BLOCKED",
            Some(BLOCKED_COLOR),
        );
    }

    // Legend
    let text_size = basis * 0.03;
    let line_height = text_size * 1.5;
    let legend_x = width + outer_offset * 0.75;
    let indent = legend_x + text_size;
    let mut legend_y = height;
    let title = Some(LEGEND_TITLE_COLOR);

    w.text(
        "Legend",
        pt(legend_x, legend_y),
        text_size * 1.2,
        "LEGEND_TITLE",
        0.0,
        Align::Left,
        title,
    );
    legend_y -= line_height * 1.5;

    if !room_types.is_empty() {
        w.text(
            "Rooms",
            pt(legend_x, legend_y),
            text_size * 1.1,
            "LEGEND_TITLE",
            0.0,
            Align::Left,
            title,
        );
        legend_y -= line_height;
        for rt in &room_types {
            let entry = format!(
                "{} ({}{} x {}{})",
                rt.name, rt.dimensions.width, unit, rt.dimensions.height, unit
            );
            let (layer, color) = match layers_by_type.get(&rt.id) {
                Some(l) => (l.legend.as_str(), l.color),
                None => ("LEGEND_BLOCKED", 1),
            };
            w.text(
                &entry,
                pt(indent, legend_y),
                text_size,
                layer,
                0.0,
                Align::Left,
                Some(color),
            );
            legend_y -= line_height;
        }
    }

    if !room_types.is_empty() && !req.blocked.is_empty() {
        legend_y -= line_height * 0.5;
    }

    let mut blocked_names = HashSet::new();
    let unique_blocked: Vec<_> = req
        .blocked
        .iter()
        .filter(|&a| blocked_names.insert(a.name.as_str()))
        .collect();
    if !unique_blocked.is_empty() {
        w.text(
            "Blocked Areas",
            pt(legend_x, legend_y),
            text_size * 1.1,
            "LEGEND_TITLE",
            0.0,
            Align::Left,
            title,
        );
        legend_y -= line_height;
        for area in unique_blocked {
            let entry = format!(
                "{} ({}{} x {}{})",
                area.name, area.width, unit, area.height, unit
            );
            w.text(
                &entry,
                pt(indent, legend_y),
                text_size,
                "LEGEND_BLOCKED",
                0.0,
                Align::Left,
                Some(BLOCKED_COLOR),
            );
            legend_y -= line_height;
        }
    }

    w.pair(0, "ENDSEC");
    w.pair(0, "EOF");
    w.out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Dimension;
    use crate::rooms::{BlockedArea, Layout, PlacedRoom, RoomInstance, RoomTypeId};

    fn room_type(id: &str, name: &str, w: i32, h: i32) -> RoomType {
        RoomType {
            id: RoomTypeId::from(id),
            name: name.into(),
            dimensions: Dimension::new(w, h),
            color: "#abcdef".into(),
            quantity: None,
        }
    }

    fn placed(rt: &RoomType, ordinal: u32, x: i32, y: i32, rotated: bool) -> PlacedRoom {
        PlacedRoom {
            room: RoomInstance::from_type(rt, ordinal),
            x,
            y,
            rotated,
        }
    }

    fn sample() -> (Vec<RoomType>, Vec<BlockedArea>, Layout) {
        let rooms = vec![
            room_type("bed", "Master Bed", 4, 5),
            room_type("bath", "Bath", 2, 3),
            room_type("gym", "Gym", 3, 3),
        ];
        let layout = Layout::from_placements(vec![
            placed(&rooms[0], 0, 0, 0, false),
            placed(&rooms[0], 1, 4, 0, true),
            placed(&rooms[1], 0, 0, 7, false),
        ]);
        let blocked = vec![BlockedArea {
            id: "s".into(),
            name: "Stairs".into(),
            x: 8,
            y: 8,
            width: 2,
            height: 2,
        }];
        (rooms, blocked, layout)
    }

    fn export(rooms: &[RoomType], blocked: &[BlockedArea], layout: &Layout) -> String {
        to_dxf(&ExportRequest {
            floor: Dimension::new(10, 10),
            unit: Unit::M,
            rooms,
            blocked,
            layout,
            layout_index: 0,
            exported_at_unix: 0,
        })
    }

    fn count(haystack: &str, needle: &str) -> usize {
        haystack.matches(needle).count()
    }

    #[test]
    fn test_sanitize_layer_name() {
        assert_eq!(sanitize_layer_name("Master Bed #2"), "Master_Bed__2");
        assert_eq!(sanitize_layer_name("ok_1"), "ok_1");
    }

    #[test]
    fn test_structure() {
        let (rooms, blocked, layout) = sample();
        let dxf = export(&rooms, &blocked, &layout);
        assert!(dxf.starts_with("0\nSECTION\n2\nHEADER\n9\n$ACADVER\n1\nAC1009\n"));
        assert!(dxf.ends_with("0\nENDSEC\n0\nEOF\n"));
        assert_eq!(count(&dxf, "0\nSECTION\n"), 3);
    }

    #[test]
    fn test_layers_only_for_placed_types() {
        let (rooms, blocked, layout) = sample();
        let dxf = export(&rooms, &blocked, &layout);
        // 7 static + 2 placed types × 3
        assert!(dxf.contains("2\nLAYER\n70\n13\n"));
        assert!(dxf.contains("2\nROOM_Master_Bed\n"));
        assert!(dxf.contains("2\nDIM_ROOM_Bath\n"));
        assert!(dxf.contains("2\nLEGEND_ROOM_Bath\n"));
        assert!(!dxf.contains("ROOM_Gym"));
    }

    #[test]
    fn test_room_rectangles_drawn() {
        let (rooms, blocked, layout) = sample();
        let dxf = export(&rooms, &blocked, &layout);
        // 4 lines per rectangle: two bedrooms, one bath
        assert_eq!(count(&dxf, "0\nLINE\n8\nROOM_Master_Bed\n"), 8);
        assert_eq!(count(&dxf, "0\nLINE\n8\nROOM_Bath\n"), 4);
        assert_eq!(count(&dxf, "0\nLINE\n8\nBLOCKED\n"), 4);
        assert_eq!(count(&dxf, "0\nLINE\n8\nFLOOR_OUTLINE\n"), 4);
    }

    #[test]
    fn test_legend_entries() {
        let (rooms, blocked, layout) = sample();
        let dxf = export(&rooms, &blocked, &layout);
        assert!(dxf.contains("1\nLegend\n"));
        assert!(dxf.contains("1\nMaster Bed (4m x 5m)\n"));
        assert!(dxf.contains("1\nStairs (2m x 2m)\n"));
        assert!(dxf.contains("1\nBlocked Areas\n"));
    }

    #[test]
    fn test_floor_dimension_labels() {
        let (rooms, blocked, layout) = sample();
        let dxf = export(&rooms, &blocked, &layout);
        assert!(dxf.contains("8\nDIMENSIONS_FLOOR\n62\n5\n"));
        assert!(dxf.contains("1\n10m\n"));
    }

    #[test]
    fn test_first_instance_dimensioned_once() {
        let (rooms, blocked, layout) = sample();
        let dxf = export(&rooms, &blocked, &layout);
        // Each dimension draws two arrowheads; one pair (2 dims) per dimensioned type.
        assert_eq!(count(&dxf, "0\nSOLID\n8\nDIM_ROOM_Master_Bed\n"), 4);
    }

    #[test]
    fn test_types_sharing_a_name_stay_distinct() {
        let rooms = vec![
            room_type("a", "Office", 2, 2),
            room_type("b", "Office", 5, 3),
            room_type("c", "Bed 1", 1, 1),
            room_type("d", "Bed-1", 1, 2),
        ];
        let layout = Layout::from_placements(vec![
            placed(&rooms[0], 0, 0, 0, false),
            placed(&rooms[1], 0, 2, 0, false),
            placed(&rooms[2], 0, 0, 5, false),
            placed(&rooms[3], 0, 1, 5, false),
        ]);
        let dxf = export(&rooms, &[], &layout);

        // 7 static + 4 types × 3, each defined once
        assert!(dxf.contains("2\nLAYER\n70\n19\n"));
        assert_eq!(count(&dxf, "0\nLAYER\n2\nROOM_Office\n"), 1);
        assert_eq!(count(&dxf, "0\nLAYER\n2\nROOM_Office_2\n"), 1);
        assert_eq!(count(&dxf, "0\nLAYER\n2\nROOM_Bed_1\n"), 1);
        assert_eq!(count(&dxf, "0\nLAYER\n2\nROOM_Bed_1_4\n"), 1);

        assert!(dxf.contains("1\nOffice (2m x 2m)\n"));
        assert!(dxf.contains("1\nOffice (5m x 3m)\n"));
        assert!(dxf.contains("1\n5m\n"));
        assert_eq!(count(&dxf, "0\nLINE\n8\nROOM_Office_2\n"), 4);
        assert_eq!(count(&dxf, "0\nSOLID\n8\nDIM_ROOM_Office_2\n"), 4);
    }
}
