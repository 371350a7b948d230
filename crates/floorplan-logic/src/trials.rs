//! Trial orchestration.
//!
//! A trial places instances one after another onto a fresh floor that only
//! holds the blocked areas; each success occupies space for the next
//! attempt. Trial 1 is a greedy, deterministic pass over a largest-first
//! order. Every later trial shuffles the instances and searches positions at
//! random. Trials share no placement state.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use rand::seq::SliceRandom;
use rand::Rng;

use crate::geometry::Dimension;
use crate::placement::{find_placement, Occupancy, SearchMode};
use crate::rooms::{BlockedArea, PlacedRoom, RoomInstance, RoomTypeId};

/// Decides when trials must stop. Polled before each trial and before each
/// placement attempt.
pub trait Cutoff {
    fn expired(&self) -> bool;
}

/// Optional wall-clock cutoff for a generation call.
#[derive(Debug, Clone, Copy, Default)]
pub struct Deadline(Option<Instant>);

impl Deadline {
    pub fn none() -> Self {
        Deadline(None)
    }

    pub fn at(instant: Instant) -> Self {
        Deadline(Some(instant))
    }

    pub fn after(budget: Option<Duration>) -> Self {
        Deadline(budget.map(|b| Instant::now() + b))
    }
}

impl Cutoff for Deadline {
    fn expired(&self) -> bool {
        self.0.is_some_and(|at| Instant::now() >= at)
    }
}

/// One finished trial.
#[derive(Debug, Clone)]
pub struct Trial {
    /// 1-based trial number.
    pub number: usize,
    pub mode: SearchMode,
    /// Rooms in the order they were placed.
    pub placed: Vec<PlacedRoom>,
    /// Stopped early because the deadline passed.
    pub interrupted: bool,
}

/// Result of running all trials.
#[derive(Debug, Clone, Default)]
pub struct TrialRun {
    /// Trials that placed at least one room, in run order.
    pub trials: Vec<Trial>,
    /// How many trials were started.
    pub trials_run: usize,
    pub deadline_hit: bool,
}

/// Instance order for the greedy trial.
///
/// The first instance of each required type comes first, then everything
/// else. Each segment is sorted by descending area; the sort is stable, so
/// equal areas keep their expansion order.
pub fn greedy_order(instances: &[RoomInstance], required: &[RoomTypeId]) -> Vec<RoomInstance> {
    let required: HashSet<&RoomTypeId> = required.iter().collect();
    let mut taken: HashSet<&RoomTypeId> = HashSet::new();
    let mut front = Vec::new();
    let mut rest = Vec::new();

    for inst in instances {
        if required.contains(&inst.type_id) && taken.insert(&inst.type_id) {
            front.push(inst.clone());
        } else {
            rest.push(inst.clone());
        }
    }

    front.sort_by_key(|i| std::cmp::Reverse(i.area()));
    rest.sort_by_key(|i| std::cmp::Reverse(i.area()));
    front.extend(rest);
    front
}

/// Place `order` sequentially. Instances that don't fit are skipped.
pub fn run_trial<R: Rng + ?Sized, C: Cutoff + ?Sized>(
    number: usize,
    order: Vec<RoomInstance>,
    floor: Dimension,
    blocked: &[BlockedArea],
    mode: SearchMode,
    rng: &mut R,
    deadline: &C,
) -> Trial {
    let mut occupied = Occupancy::with_blocked(blocked);
    let mut placed = Vec::new();
    let mut interrupted = false;

    for inst in order {
        if deadline.expired() {
            interrupted = true;
            break;
        }
        if let Some(p) = find_placement(&inst, floor, &occupied, mode, rng) {
            let room = p.place(inst);
            occupied.insert(room.rect());
            placed.push(room);
        }
    }

    Trial {
        number,
        mode,
        placed,
        interrupted,
    }
}

/// Run the greedy trial followed by `trials - 1` randomized ones.
///
/// Trials with no placed rooms are dropped. Once the deadline passes no new
/// trial starts; the one in flight keeps whatever it placed.
pub fn run_trials<R: Rng + ?Sized, C: Cutoff + ?Sized>(
    instances: &[RoomInstance],
    required: &[RoomTypeId],
    floor: Dimension,
    blocked: &[BlockedArea],
    trials: usize,
    rng: &mut R,
    deadline: &C,
) -> TrialRun {
    let mut run = TrialRun::default();

    for number in 1..=trials {
        if deadline.expired() {
            run.deadline_hit = true;
            break;
        }

        let (order, mode) = if number == 1 {
            (greedy_order(instances, required), SearchMode::Deterministic)
        } else {
            let mut order = instances.to_vec();
            order.shuffle(rng);
            (order, SearchMode::Randomized)
        };

        let trial = run_trial(number, order, floor, blocked, mode, rng, deadline);
        run.trials_run += 1;
        run.deadline_hit |= trial.interrupted;
        log::debug!(
            "trial {} ({:?}): placed {} of {}",
            number,
            mode,
            trial.placed.len(),
            instances.len()
        );

        if !trial.placed.is_empty() {
            run.trials.push(trial);
        }
    }

    run
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expand::expand_instances;
    use crate::geometry::validate_layout;
    use crate::rooms::{Layout, RoomType};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::cell::Cell;

    /// Expires once it has been polled more than `limit` times.
    struct AfterPolls {
        limit: usize,
        polls: Cell<usize>,
    }

    impl AfterPolls {
        fn new(limit: usize) -> Self {
            AfterPolls {
                limit,
                polls: Cell::new(0),
            }
        }
    }

    impl Cutoff for AfterPolls {
        fn expired(&self) -> bool {
            self.polls.set(self.polls.get() + 1);
            self.polls.get() > self.limit
        }
    }

    fn room(id: &str, w: i32, h: i32, quantity: Option<u32>) -> RoomType {
        RoomType {
            id: RoomTypeId::from(id),
            name: id.into(),
            dimensions: Dimension::new(w, h),
            color: "#111111".into(),
            quantity,
        }
    }

    fn ids(types: &[RoomType]) -> Vec<RoomTypeId> {
        types.iter().map(|t| t.id.clone()).collect()
    }

    #[test]
    fn test_greedy_order_required_first() {
        let types = vec![room("small", 1, 1, Some(3)), room("big", 3, 3, Some(2))];
        let instances = expand_instances(Dimension::new(10, 10), &types);
        let order = greedy_order(&instances, &ids(&types));
        let labels: Vec<(String, u32)> =
            order.iter().map(|i| (i.type_id.to_string(), i.ordinal)).collect();
        assert_eq!(
            labels,
            vec![
                ("big".into(), 0),
                ("small".into(), 0),
                ("big".into(), 1),
                ("small".into(), 1),
                ("small".into(), 2),
            ]
        );
    }

    #[test]
    fn test_greedy_order_without_required() {
        let types = vec![room("small", 1, 1, Some(2)), room("big", 3, 3, Some(1))];
        let instances = expand_instances(Dimension::new(10, 10), &types);
        let order = greedy_order(&instances, &[]);
        assert_eq!(order[0].type_id, RoomTypeId::from("big"));
        assert_eq!(order.len(), 3);
    }

    #[test]
    fn test_greedy_trial_is_reproducible() {
        let types = vec![room("a", 4, 5, Some(2)), room("b", 3, 2, None)];
        let floor = Dimension::new(12, 9);
        let instances = expand_instances(floor, &types);
        let mut rng1 = StdRng::seed_from_u64(1);
        let mut rng2 = StdRng::seed_from_u64(999);
        let order = greedy_order(&instances, &ids(&types));
        let t1 = run_trial(
            1,
            order.clone(),
            floor,
            &[],
            SearchMode::Deterministic,
            &mut rng1,
            &Deadline::none(),
        );
        let t2 = run_trial(
            1,
            order,
            floor,
            &[],
            SearchMode::Deterministic,
            &mut rng2,
            &Deadline::none(),
        );
        assert_eq!(t1.placed, t2.placed);
    }

    #[test]
    fn test_unplaceable_rooms_skipped() {
        let types = vec![room("huge", 20, 20, Some(1)), room("ok", 2, 2, Some(1))];
        let floor = Dimension::new(10, 10);
        let instances = expand_instances(floor, &types);
        let mut rng = StdRng::seed_from_u64(5);
        let trial = run_trial(
            1,
            instances,
            floor,
            &[],
            SearchMode::Deterministic,
            &mut rng,
            &Deadline::none(),
        );
        assert_eq!(trial.placed.len(), 1);
        assert_eq!(trial.placed[0].type_id(), &RoomTypeId::from("ok"));
    }

    #[test]
    fn test_empty_trials_dropped() {
        let types = vec![room("huge", 20, 20, Some(1))];
        let floor = Dimension::new(10, 10);
        let instances = expand_instances(floor, &types);
        let mut rng = StdRng::seed_from_u64(5);
        let run = run_trials(
            &instances,
            &ids(&types),
            floor,
            &[],
            20,
            &mut rng,
            &Deadline::none(),
        );
        assert_eq!(run.trials_run, 20);
        assert!(run.trials.is_empty());
    }

    #[test]
    fn test_trial_count_and_modes() {
        let types = vec![room("a", 2, 3, Some(3))];
        let floor = Dimension::new(10, 10);
        let instances = expand_instances(floor, &types);
        let mut rng = StdRng::seed_from_u64(5);
        let run = run_trials(
            &instances,
            &ids(&types),
            floor,
            &[],
            15,
            &mut rng,
            &Deadline::none(),
        );
        assert_eq!(run.trials.len(), 15);
        assert_eq!(run.trials[0].mode, SearchMode::Deterministic);
        assert!(run.trials[1..].iter().all(|t| t.mode == SearchMode::Randomized));
        assert!(!run.deadline_hit);
    }

    #[test]
    fn test_expired_deadline_runs_nothing() {
        let types = vec![room("a", 2, 3, Some(3))];
        let floor = Dimension::new(10, 10);
        let instances = expand_instances(floor, &types);
        let mut rng = StdRng::seed_from_u64(5);
        let deadline = Deadline::after(Some(Duration::ZERO));
        let run = run_trials(&instances, &ids(&types), floor, &[], 50, &mut rng, &deadline);
        assert!(run.deadline_hit);
        assert_eq!(run.trials_run, 0);
    }

    #[test]
    fn test_past_instant_has_expired() {
        assert!(Deadline::at(Instant::now()).expired());
        assert!(!Deadline::none().expired());
    }

    #[test]
    fn test_interrupted_trial_keeps_partial_placements() {
        let types = vec![room("a", 2, 3, Some(3))];
        let floor = Dimension::new(10, 10);
        let instances = expand_instances(floor, &types);
        let mut rng = StdRng::seed_from_u64(5);
        // Poll 1 starts trial 1, polls 2 and 3 allow two placements, poll 4
        // interrupts the third.
        let cutoff = AfterPolls::new(3);
        let run = run_trials(&instances, &ids(&types), floor, &[], 50, &mut rng, &cutoff);

        assert!(run.deadline_hit);
        assert_eq!(run.trials_run, 1);
        assert_eq!(run.trials.len(), 1);
        let trial = &run.trials[0];
        assert!(trial.interrupted);
        assert_eq!(trial.placed.len(), 2);
        let layout = Layout::from_placements(trial.placed.clone());
        assert!(validate_layout(floor, &[], &layout).is_empty());
    }
}
