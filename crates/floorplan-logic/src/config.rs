//! Generator settings and the floor-plan input document.
//!
//! `FloorPlan` is the serde shape the CLI reads from disk. `GeneratorConfig`
//! tunes the search; every field has a default so a plan may omit it.
//! `validate_plan` reports suspicious input without rejecting it, since the
//! engine itself skips degenerate rooms silently.

use std::collections::HashSet;
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::geometry::{Dimension, Severity};
use crate::rooms::{BlockedArea, RoomType, RoomTypeId, Unit};

/// Default total number of trials (one deterministic, the rest randomized).
pub const DEFAULT_TRIALS: usize = 200;

/// Default number of ranked layouts returned.
pub const DEFAULT_TOP_N: usize = 10;

/// Which room types a layout must include to count as covering the brief.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequiredPolicy {
    /// Every caller-supplied room type is required.
    #[default]
    AllTypes,
    /// Only types with an explicit positive quantity are required.
    ExplicitQuantity,
}

impl RequiredPolicy {
    /// Ids of the required types, in caller order, without duplicates.
    pub fn required_ids(&self, room_types: &[RoomType]) -> Vec<RoomTypeId> {
        let mut seen = HashSet::new();
        room_types
            .iter()
            .filter(|rt| match self {
                RequiredPolicy::AllTypes => true,
                RequiredPolicy::ExplicitQuantity => rt.explicit_quantity().is_some(),
            })
            .filter(|rt| seen.insert(rt.id.clone()))
            .map(|rt| rt.id.clone())
            .collect()
    }
}

/// Search tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Total trials, including the deterministic first one.
    pub trials: usize,
    /// Maximum number of layouts returned.
    pub top_n: usize,
    /// Seed for the randomized trials. `None` draws from OS entropy.
    pub seed: Option<u64>,
    /// Wall-clock budget for one generation call, in milliseconds.
    pub time_budget_ms: Option<u64>,
    pub required: RequiredPolicy,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            trials: DEFAULT_TRIALS,
            top_n: DEFAULT_TOP_N,
            seed: None,
            time_budget_ms: None,
            required: RequiredPolicy::default(),
        }
    }
}

impl GeneratorConfig {
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    pub fn time_budget(&self) -> Option<Duration> {
        self.time_budget_ms.map(Duration::from_millis)
    }
}

/// Everything needed to generate layouts for one floor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloorPlan {
    pub floor: Dimension,
    #[serde(default)]
    pub unit: Unit,
    pub rooms: Vec<RoomType>,
    #[serde(default)]
    pub blocked_areas: Vec<BlockedArea>,
    #[serde(default)]
    pub generator: GeneratorConfig,
}

/// A problem spotted in a floor plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanIssue {
    /// Floor width or height is not positive.
    InvalidFloor(Dimension),
    /// No room types at all.
    NoRoomTypes,
    /// Room type with a non-positive side; it will never be placed.
    DegenerateRoom(RoomTypeId),
    /// Room type that fits the floor in neither orientation.
    RoomTooLarge(RoomTypeId),
    /// Two room types share an id; their instances merge.
    DuplicateRoomId(RoomTypeId),
    /// Blocked area with a non-positive side.
    DegenerateBlockedArea(String),
    /// Blocked area reaching outside the floor.
    BlockedAreaOutsideFloor(String),
    /// Generator configured to run no trials.
    NoTrials,
    /// `top_n` is 0, so no layout is ever returned.
    NoResultsRequested,
}

impl PlanIssue {
    pub fn severity(&self) -> Severity {
        match self {
            PlanIssue::InvalidFloor(_) | PlanIssue::NoRoomTypes | PlanIssue::NoTrials => {
                Severity::Error
            }
            _ => Severity::Warning,
        }
    }
}

impl fmt::Display for PlanIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanIssue::InvalidFloor(d) => {
                write!(f, "floor has non-positive size {}×{}", d.width, d.height)
            }
            PlanIssue::NoRoomTypes => write!(f, "no room types defined"),
            PlanIssue::DegenerateRoom(id) => {
                write!(f, "room type '{}' has a non-positive side and will be skipped", id)
            }
            PlanIssue::RoomTooLarge(id) => {
                write!(f, "room type '{}' does not fit the floor in either orientation", id)
            }
            PlanIssue::DuplicateRoomId(id) => {
                write!(f, "room type id '{}' is used more than once", id)
            }
            PlanIssue::DegenerateBlockedArea(name) => {
                write!(f, "blocked area '{}' has a non-positive side", name)
            }
            PlanIssue::BlockedAreaOutsideFloor(name) => {
                write!(f, "blocked area '{}' extends outside the floor", name)
            }
            PlanIssue::NoTrials => write!(f, "generator.trials is 0"),
            PlanIssue::NoResultsRequested => write!(f, "generator.top_n is 0"),
        }
    }
}

/// Validate a floor plan, returning all issues found.
pub fn validate_plan(plan: &FloorPlan) -> Vec<PlanIssue> {
    let mut issues = Vec::new();

    if !plan.floor.is_positive() {
        issues.push(PlanIssue::InvalidFloor(plan.floor));
    }
    if plan.rooms.is_empty() {
        issues.push(PlanIssue::NoRoomTypes);
    }
    if plan.generator.trials == 0 {
        issues.push(PlanIssue::NoTrials);
    }
    if plan.generator.top_n == 0 {
        issues.push(PlanIssue::NoResultsRequested);
    }

    let mut ids = HashSet::new();
    for rt in &plan.rooms {
        if !ids.insert(&rt.id) {
            issues.push(PlanIssue::DuplicateRoomId(rt.id.clone()));
        }
        if !rt.dimensions.is_positive() {
            issues.push(PlanIssue::DegenerateRoom(rt.id.clone()));
        } else if plan.floor.is_positive()
            && !rt.dimensions.fits_within(plan.floor)
            && !rt.dimensions.swapped().fits_within(plan.floor)
        {
            issues.push(PlanIssue::RoomTooLarge(rt.id.clone()));
        }
    }

    for area in &plan.blocked_areas {
        let rect = area.rect();
        if rect.width <= 0 || rect.height <= 0 {
            issues.push(PlanIssue::DegenerateBlockedArea(area.name.clone()));
        } else if !rect.within(plan.floor) {
            issues.push(PlanIssue::BlockedAreaOutsideFloor(area.name.clone()));
        }
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room(id: &str, w: i32, h: i32, quantity: Option<u32>) -> RoomType {
        RoomType {
            id: RoomTypeId::from(id),
            name: id.into(),
            dimensions: Dimension::new(w, h),
            color: "#aaaaaa".into(),
            quantity,
        }
    }

    fn plan(rooms: Vec<RoomType>) -> FloorPlan {
        FloorPlan {
            floor: Dimension::new(10, 10),
            unit: Unit::M,
            rooms,
            blocked_areas: Vec::new(),
            generator: GeneratorConfig::default(),
        }
    }

    #[test]
    fn test_defaults() {
        let cfg = GeneratorConfig::default();
        assert_eq!(cfg.trials, 200);
        assert_eq!(cfg.top_n, 10);
        assert_eq!(cfg.seed, None);
        assert_eq!(cfg.required, RequiredPolicy::AllTypes);
    }

    #[test]
    fn test_plan_json_with_omitted_sections() {
        let json = r##"{
            "floor": {"width": 12, "height": 8},
            "rooms": [{"id": "k", "name": "Kitchen", "dimensions": {"width": 3, "height": 4}, "color": "#00ff00"}]
        }"##;
        let plan: FloorPlan = serde_json::from_str(json).unwrap();
        assert_eq!(plan.unit, Unit::M);
        assert!(plan.blocked_areas.is_empty());
        assert_eq!(plan.generator, GeneratorConfig::default());
    }

    #[test]
    fn test_partial_generator_section() {
        let cfg: GeneratorConfig =
            serde_json::from_str(r#"{"seed": 9, "required": "explicit_quantity"}"#).unwrap();
        assert_eq!(cfg.seed, Some(9));
        assert_eq!(cfg.trials, 200);
        assert_eq!(cfg.required, RequiredPolicy::ExplicitQuantity);
    }

    #[test]
    fn test_required_policy() {
        let rooms = vec![
            room("a", 2, 2, Some(1)),
            room("b", 2, 2, None),
            room("a", 1, 1, Some(2)),
        ];
        let all = RequiredPolicy::AllTypes.required_ids(&rooms);
        assert_eq!(all, vec![RoomTypeId::from("a"), RoomTypeId::from("b")]);
        let explicit = RequiredPolicy::ExplicitQuantity.required_ids(&rooms);
        assert_eq!(explicit, vec![RoomTypeId::from("a")]);
    }

    #[test]
    fn test_valid_plan_no_issues() {
        let issues = validate_plan(&plan(vec![room("a", 4, 5, Some(1))]));
        assert!(issues.is_empty(), "{:?}", issues);
    }

    #[test]
    fn test_plan_issues_reported() {
        let mut p = plan(vec![
            room("big", 11, 12, Some(1)),
            room("flat", 0, 3, None),
            room("big", 2, 2, None),
        ]);
        p.blocked_areas.push(BlockedArea {
            id: "x".into(),
            name: "Shaft".into(),
            x: 8,
            y: 8,
            width: 4,
            height: 4,
        });
        let issues = validate_plan(&p);
        assert!(issues.contains(&PlanIssue::RoomTooLarge(RoomTypeId::from("big"))));
        assert!(issues.contains(&PlanIssue::DegenerateRoom(RoomTypeId::from("flat"))));
        assert!(issues.contains(&PlanIssue::DuplicateRoomId(RoomTypeId::from("big"))));
        assert!(issues.contains(&PlanIssue::BlockedAreaOutsideFloor("Shaft".into())));
        assert!(issues.iter().all(|i| i.severity() == Severity::Warning));
    }

    #[test]
    fn test_invalid_floor_is_error() {
        let mut p = plan(vec![]);
        p.floor = Dimension::new(0, 10);
        let issues = validate_plan(&p);
        assert!(issues.contains(&PlanIssue::InvalidFloor(Dimension::new(0, 10))));
        assert!(issues.contains(&PlanIssue::NoRoomTypes));
        assert!(issues.iter().all(|i| i.severity() == Severity::Error));
    }

    #[test]
    fn test_zero_top_n_warned() {
        let mut p = plan(vec![room("a", 2, 2, Some(1))]);
        p.generator.top_n = 0;
        let issues = validate_plan(&p);
        assert_eq!(issues, vec![PlanIssue::NoResultsRequested]);
        assert_eq!(issues[0].severity(), Severity::Warning);
    }

    #[test]
    fn test_far_blocked_area_reported_not_panicking() {
        let mut p = plan(vec![room("a", 2, 2, Some(1))]);
        p.blocked_areas.push(BlockedArea {
            id: "far".into(),
            name: "Far".into(),
            x: i32::MAX,
            y: 0,
            width: i32::MAX,
            height: 1,
        });
        assert_eq!(
            validate_plan(&p),
            vec![PlanIssue::BlockedAreaOutsideFloor("Far".into())]
        );
    }
}
