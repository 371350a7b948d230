//! Duplicate-layout detection.
//!
//! Two trials describe the same plan when, for every room type, the same set
//! of `(x, y, rotated)` slots is occupied, regardless of which instance of
//! the type landed in which slot or in what order rooms were placed.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use crate::rooms::{Layout, PlacedRoom, RoomTypeId};
use crate::trials::Trial;

/// Position and orientation of one room, without its identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Slot {
    pub x: i32,
    pub y: i32,
    pub rotated: bool,
}

/// Canonical form of a layout: per room type, its sorted slots.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct LayoutSignature(BTreeMap<RoomTypeId, Vec<Slot>>);

impl LayoutSignature {
    pub fn of(rooms: &[PlacedRoom]) -> Self {
        let mut groups: BTreeMap<RoomTypeId, Vec<Slot>> = BTreeMap::new();
        for r in rooms {
            groups.entry(r.type_id().clone()).or_default().push(Slot {
                x: r.x,
                y: r.y,
                rotated: r.rotated,
            });
        }
        for slots in groups.values_mut() {
            slots.sort_unstable();
        }
        LayoutSignature(groups)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for LayoutSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (id, slots)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("|")?;
            }
            write!(f, "{}:", id)?;
            for (j, s) in slots.iter().enumerate() {
                if j > 0 {
                    f.write_str(";")?;
                }
                write!(f, "({}, {}, {})", s.x, s.y, s.rotated)?;
            }
        }
        Ok(())
    }
}

/// Collapse trials to unique layouts, keeping the first of each signature.
pub fn unique_layouts(trials: Vec<Trial>) -> Vec<Layout> {
    let mut seen: HashSet<LayoutSignature> = HashSet::new();
    let mut unique = Vec::new();
    let mut duplicates = 0usize;

    for trial in trials {
        if trial.placed.is_empty() {
            continue;
        }
        if seen.insert(LayoutSignature::of(&trial.placed)) {
            unique.push(Layout::from_placements(trial.placed));
        } else {
            duplicates += 1;
        }
    }

    log::debug!("discarded {} duplicate layouts", duplicates);
    unique
}
