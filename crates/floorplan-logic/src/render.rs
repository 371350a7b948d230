//! Plain-text rendering of a layout, one character per grid cell.
//!
//! `#` blocked, `.` free, and a letter per room type (A, B, ... in caller
//! order, cycling after Z). The top printed row is the highest y.

use std::collections::HashMap;
use std::fmt::Write;

use crate::geometry::{Dimension, Rect};
use crate::rooms::{BlockedArea, Layout, RoomType, RoomTypeId};

const FREE: char = '.';
const BLOCKED: char = '#';

fn letter(index: usize) -> char {
    (b'A' + (index % 26) as u8) as char
}

/// Draw `layout` on a `floor`-sized character grid followed by a legend.
pub fn render_ascii(
    floor: Dimension,
    room_types: &[RoomType],
    blocked: &[BlockedArea],
    layout: &Layout,
) -> String {
    let (w, h) = (floor.width.max(0) as usize, floor.height.max(0) as usize);
    let mut grid = vec![vec![FREE; w]; h];

    let mut letters: HashMap<&RoomTypeId, char> = HashMap::new();
    for rt in room_types {
        let next = letter(letters.len());
        letters.entry(&rt.id).or_insert(next);
    }

    let mut paint = |rect: Rect, c: char| {
        for y in (rect.y.max(0) as i64)..rect.top().min(h as i64) {
            for x in (rect.x.max(0) as i64)..rect.right().min(w as i64) {
                grid[y as usize][x as usize] = c;
            }
        }
    };

    for area in blocked {
        paint(area.rect(), BLOCKED);
    }
    for room in &layout.placed_rooms {
        let c = letters.get(room.type_id()).copied().unwrap_or('?');
        paint(room.rect(), c);
    }

    let mut out = String::with_capacity((w + 1) * h + 64);
    for row in grid.iter().rev() {
        out.extend(row.iter());
        out.push('\n');
    }

    for rt in room_types {
        if let Some(c) = letters.get(&rt.id) {
            let placed = layout
                .placed_rooms
                .iter()
                .filter(|r| r.type_id() == &rt.id)
                .count();
            let _ = writeln!(out, "{} = {} ×{}", c, rt.name, placed);
        }
    }
    if !blocked.is_empty() {
        let _ = writeln!(out, "{} = blocked", BLOCKED);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rooms::{PlacedRoom, RoomInstance};

    #[test]
    fn test_render_small_floor() {
        let bed = RoomType {
            id: RoomTypeId::from("bed"),
            name: "Bed".into(),
            dimensions: Dimension::new(2, 1),
            color: "#fff".into(),
            quantity: Some(1),
        };
        let layout = Layout::from_placements(vec![PlacedRoom {
            room: RoomInstance::from_type(&bed, 0),
            x: 0,
            y: 0,
            rotated: true,
        }]);
        let blocked = [BlockedArea {
            id: "b".into(),
            name: "Pillar".into(),
            x: 3,
            y: 2,
            width: 1,
            height: 1,
        }];
        let text = render_ascii(Dimension::new(4, 3), &[bed], &blocked, &layout);
        let rows: Vec<&str> = text.lines().collect();
        assert_eq!(rows[0], "...#");
        assert_eq!(rows[1], "A...");
        assert_eq!(rows[2], "A...");
        assert_eq!(rows[3], "A = Bed ×1");
        assert_eq!(rows[4], "# = blocked");
    }

    #[test]
    fn test_letters_cycle() {
        assert_eq!(letter(0), 'A');
        assert_eq!(letter(25), 'Z');
        assert_eq!(letter(26), 'A');
    }
}
