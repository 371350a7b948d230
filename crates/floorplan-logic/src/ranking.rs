//! Layout ranking.
//!
//! Layouts are ordered by, in strict priority: covering every required room
//! type, number of rooms placed, number of distinct types, then covered
//! area. The sort is stable, so full ties keep discovery order.

use std::cmp::Ordering;

use crate::rooms::{Layout, RoomTypeId};

/// Sort key for one layout. Greater is better.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RankKey {
    pub covers_required: bool,
    pub room_count: usize,
    pub diversity: usize,
    pub score: i64,
}

impl RankKey {
    pub fn of(layout: &Layout, required: &[RoomTypeId]) -> Self {
        Self {
            covers_required: layout.covers(required),
            room_count: layout.room_count(),
            diversity: layout.diversity,
            score: layout.score,
        }
    }
}

/// Compare two layouts, best first.
pub fn compare(a: &RankKey, b: &RankKey) -> Ordering {
    b.cmp(a)
}

/// Sort `layouts` best first and keep at most `top_n`.
pub fn rank_layouts(layouts: Vec<Layout>, required: &[RoomTypeId], top_n: usize) -> Vec<Layout> {
    let mut keyed: Vec<(RankKey, Layout)> = layouts
        .into_iter()
        .map(|l| (RankKey::of(&l, required), l))
        .collect();
    keyed.sort_by(|(a, _), (b, _)| compare(a, b));
    keyed.into_iter().take(top_n).map(|(_, l)| l).collect()
}
