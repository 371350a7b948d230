//! Grid geometry and layout validation.
//!
//! All coordinates and sizes live on an integer grid. Two rectangles collide
//! only when they overlap strictly on both axes, so rooms may share walls.
//! Validation functions are pure and return every problem found.

use serde::{Deserialize, Serialize};

use crate::rooms::{BlockedArea, Layout};

/// Width/height pair in floor units. The unit itself is a display concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimension {
    pub width: i32,
    pub height: i32,
}

impl Dimension {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Area as i64 so large floors can't overflow.
    pub fn area(&self) -> i64 {
        self.width as i64 * self.height as i64
    }

    /// Both sides strictly positive.
    pub fn is_positive(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    pub fn is_square(&self) -> bool {
        self.width == self.height
    }

    /// The same footprint turned by 90°.
    pub fn swapped(&self) -> Self {
        Self::new(self.height, self.width)
    }

    /// Whether a rectangle of this size fits inside `outer` without turning.
    pub fn fits_within(&self, outer: Dimension) -> bool {
        self.width <= outer.width && self.height <= outer.height
    }
}

/// Axis-aligned rectangle on the floor grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn at(x: i32, y: i32, size: Dimension) -> Self {
        Self::new(x, y, size.width, size.height)
    }

    /// Exclusive right edge. Widened so extreme input cannot overflow.
    pub fn right(&self) -> i64 {
        self.x as i64 + self.width as i64
    }

    /// Exclusive top edge.
    pub fn top(&self) -> i64 {
        self.y as i64 + self.height as i64
    }

    pub fn area(&self) -> i64 {
        self.width as i64 * self.height as i64
    }

    /// Strict overlap on both axes. Touching edges is not a collision.
    pub fn collides(&self, other: &Rect) -> bool {
        (self.x as i64) < other.right()
            && self.right() > other.x as i64
            && (self.y as i64) < other.top()
            && self.top() > other.y as i64
    }

    /// Whether the rectangle lies inside `[0, floor.width] × [0, floor.height]`.
    pub fn within(&self, floor: Dimension) -> bool {
        self.x >= 0
            && self.y >= 0
            && self.right() <= floor.width as i64
            && self.top() <= floor.height as i64
    }

    /// Whether grid cell `(cx, cy)` (the unit square at that corner) lies inside.
    pub fn contains_cell(&self, cx: i32, cy: i32) -> bool {
        cx >= self.x && (cx as i64) < self.right() && cy >= self.y && (cy as i64) < self.top()
    }
}

/// A layout validation error.
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub category: &'static str,
    pub severity: Severity,
    pub message: String,
}

/// Error severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

// ── A. Per-room geometry ────────────────────────────────────────────────

/// Check that no placed room has zero or negative dimensions.
pub fn check_room_dimensions(layout: &Layout) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for r in &layout.placed_rooms {
        let size = r.effective_dimensions();
        if !size.is_positive() {
            errors.push(ValidationError {
                category: "room_geometry",
                severity: Severity::Error,
                message: format!(
                    "Room {} has non-positive dimensions: {}×{}",
                    r.label(),
                    size.width,
                    size.height
                ),
            });
        }
    }
    errors
}

/// Check that every placed room (after rotation) lies inside the floor.
pub fn check_rooms_within_floor(layout: &Layout, floor: Dimension) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for r in &layout.placed_rooms {
        let rect = r.rect();
        if !rect.within(floor) {
            errors.push(ValidationError {
                category: "room_geometry",
                severity: Severity::Error,
                message: format!(
                    "Room {} extends outside floor: ({},{})→({},{}) vs floor {}×{}",
                    r.label(),
                    rect.x,
                    rect.y,
                    rect.right(),
                    rect.top(),
                    floor.width,
                    floor.height
                ),
            });
        }
    }
    errors
}

// ── B. Pairwise ─────────────────────────────────────────────────────────

/// Check no two placed rooms overlap. Touching edges are allowed.
pub fn check_room_overlaps(layout: &Layout) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let rooms = &layout.placed_rooms;
    for i in 0..rooms.len() {
        for j in (i + 1)..rooms.len() {
            if rooms[i].rect().collides(&rooms[j].rect()) {
                errors.push(ValidationError {
                    category: "room_overlap",
                    severity: Severity::Error,
                    message: format!(
                        "Rooms {} and {} overlap",
                        rooms[i].label(),
                        rooms[j].label()
                    ),
                });
            }
        }
    }
    errors
}

/// Check no placed room covers any part of a blocked area.
pub fn check_blocked_overlaps(layout: &Layout, blocked: &[BlockedArea]) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for r in &layout.placed_rooms {
        let rect = r.rect();
        for area in blocked {
            if rect.collides(&area.rect()) {
                errors.push(ValidationError {
                    category: "blocked_overlap",
                    severity: Severity::Error,
                    message: format!(
                        "Room {} overlaps blocked area '{}'",
                        r.label(),
                        area.name
                    ),
                });
            }
        }
    }
    errors
}

// ── Master validation ───────────────────────────────────────────────────

/// Run all layout validations and return combined results.
pub fn validate_layout(
    floor: Dimension,
    blocked: &[BlockedArea],
    layout: &Layout,
) -> Vec<ValidationError> {
    let mut all = Vec::new();
    all.extend(check_room_dimensions(layout));
    all.extend(check_rooms_within_floor(layout, floor));
    all.extend(check_room_overlaps(layout));
    all.extend(check_blocked_overlaps(layout, blocked));
    all
}
