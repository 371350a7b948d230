//! Grid placement search for a single room instance.
//!
//! Candidates are every integer `(x, y)` where the room fits on the floor, in
//! its declared orientation and, for non-square rooms, turned by 90°. The
//! deterministic search walks them row by row (y, then x), unrotated first.
//! The randomized search visits them in a uniformly shuffled order. Both
//! return the first candidate that collides with nothing already occupied.

use rand::Rng;

use crate::geometry::{Dimension, Rect};
use crate::rooms::{BlockedArea, PlacedRoom, RoomInstance};

/// How candidate positions are ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    /// Row-major, unrotated before rotated. Fully reproducible.
    Deterministic,
    /// Uniform random permutation of all candidates.
    Randomized,
}

/// A chosen position for one instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Placement {
    pub x: i32,
    pub y: i32,
    pub rotated: bool,
}

impl Placement {
    pub fn place(self, room: RoomInstance) -> PlacedRoom {
        PlacedRoom {
            room,
            x: self.x,
            y: self.y,
            rotated: self.rotated,
        }
    }
}

/// Rectangles already taken within one trial: blocked areas plus placed rooms.
#[derive(Debug, Clone, Default)]
pub struct Occupancy {
    rects: Vec<Rect>,
}

impl Occupancy {
    /// Fresh occupancy seeded with the blocked areas only.
    pub fn with_blocked(blocked: &[BlockedArea]) -> Self {
        Self {
            rects: blocked.iter().map(BlockedArea::rect).collect(),
        }
    }

    pub fn insert(&mut self, rect: Rect) {
        self.rects.push(rect);
    }

    pub fn is_free(&self, rect: &Rect) -> bool {
        !self.rects.iter().any(|r| r.collides(rect))
    }

    pub fn len(&self) -> usize {
        self.rects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }
}

/// Orientations worth trying: unrotated if it fits, rotated if the room is
/// not square and the swapped footprint fits.
pub fn viable_orientations(size: Dimension, floor: Dimension) -> Vec<bool> {
    let mut out = Vec::with_capacity(2);
    if !size.is_positive() {
        return out;
    }
    if size.fits_within(floor) {
        out.push(false);
    }
    if !size.is_square() && size.swapped().fits_within(floor) {
        out.push(true);
    }
    out
}

/// All candidate placements in deterministic order.
pub fn candidates(size: Dimension, floor: Dimension) -> Vec<Placement> {
    let mut out = Vec::new();
    for rotated in viable_orientations(size, floor) {
        let eff = if rotated { size.swapped() } else { size };
        for y in 0..=(floor.height - eff.height) {
            for x in 0..=(floor.width - eff.width) {
                out.push(Placement { x, y, rotated });
            }
        }
    }
    out
}

fn footprint(size: Dimension, p: &Placement) -> Rect {
    Rect::at(p.x, p.y, if p.rotated { size.swapped() } else { size })
}

/// First free candidate in row-major order.
pub fn find_first_fit(
    instance: &RoomInstance,
    floor: Dimension,
    occupied: &Occupancy,
) -> Option<Placement> {
    let size = instance.dimensions;
    for rotated in viable_orientations(size, floor) {
        let eff = if rotated { size.swapped() } else { size };
        for y in 0..=(floor.height - eff.height) {
            for x in 0..=(floor.width - eff.width) {
                if occupied.is_free(&Rect::at(x, y, eff)) {
                    return Some(Placement { x, y, rotated });
                }
            }
        }
    }
    None
}

/// First free candidate in a uniformly random order.
///
/// The shuffle is a Fisher–Yates pass evaluated lazily: each step picks a
/// random not-yet-visited candidate, so stopping at the first fit samples
/// exactly as if the whole list had been shuffled up front.
pub fn find_random_fit<R: Rng + ?Sized>(
    instance: &RoomInstance,
    floor: Dimension,
    occupied: &Occupancy,
    rng: &mut R,
) -> Option<Placement> {
    let size = instance.dimensions;
    let mut pool = candidates(size, floor);
    let n = pool.len();
    for i in 0..n {
        let j = rng.gen_range(i..n);
        pool.swap(i, j);
        let p = pool[i];
        if occupied.is_free(&footprint(size, &p)) {
            return Some(p);
        }
    }
    None
}

/// Find a spot for `instance`, or `None` when it cannot fit right now.
pub fn find_placement<R: Rng + ?Sized>(
    instance: &RoomInstance,
    floor: Dimension,
    occupied: &Occupancy,
    mode: SearchMode,
    rng: &mut R,
) -> Option<Placement> {
    match mode {
        SearchMode::Deterministic => find_first_fit(instance, floor, occupied),
        SearchMode::Randomized => find_random_fit(instance, floor, occupied, rng),
    }
}
