//! Layout generation pipeline.
//!
//! expand → trials → dedupe → rank. Everything runs synchronously in one
//! call. With `GeneratorConfig::seed` set the whole output is reproducible;
//! without it only the greedy first trial is.

use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::canonical::unique_layouts;
use crate::config::{FloorPlan, GeneratorConfig};
use crate::expand::expand_instances;
use crate::geometry::Dimension;
use crate::ranking::rank_layouts;
use crate::rooms::{BlockedArea, Layout, RoomType};
use crate::trials::{run_trials, Cutoff, Deadline};

/// Failure of a generation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerateError {
    /// Every trial placed zero rooms.
    NoValidLayouts { trials_run: usize },
}

impl fmt::Display for GenerateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerateError::NoValidLayouts { trials_run } => write!(
                f,
                "No valid layouts could be generated after {} trials. \
                 Try a larger floor, smaller rooms, or fewer blocked areas.",
                trials_run
            ),
        }
    }
}

impl std::error::Error for GenerateError {}

/// Generate ranked layouts, seeding the random source from `config`.
pub fn generate_layouts(
    floor: Dimension,
    room_types: &[RoomType],
    blocked: &[BlockedArea],
    config: &GeneratorConfig,
) -> Result<Vec<Layout>, GenerateError> {
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    generate_layouts_with_rng(floor, room_types, blocked, config, &mut rng)
}

/// Generate ranked layouts drawing randomness from `rng`. `config.seed` is ignored.
pub fn generate_layouts_with_rng<R: Rng + ?Sized>(
    floor: Dimension,
    room_types: &[RoomType],
    blocked: &[BlockedArea],
    config: &GeneratorConfig,
    rng: &mut R,
) -> Result<Vec<Layout>, GenerateError> {
    let deadline = Deadline::after(config.time_budget());
    generate_until(floor, room_types, blocked, config, rng, &deadline)
}

fn generate_until<R: Rng + ?Sized, C: Cutoff + ?Sized>(
    floor: Dimension,
    room_types: &[RoomType],
    blocked: &[BlockedArea],
    config: &GeneratorConfig,
    rng: &mut R,
    deadline: &C,
) -> Result<Vec<Layout>, GenerateError> {
    let required = config.required.required_ids(room_types);
    let instances = expand_instances(floor, room_types);

    let run = run_trials(
        &instances,
        &required,
        floor,
        blocked,
        config.trials,
        rng,
        deadline,
    );
    if run.deadline_hit {
        log::warn!(
            "time budget exhausted after {} of {} trials",
            run.trials_run,
            config.trials
        );
    }

    let kept = run.trials.len();
    let unique = unique_layouts(run.trials);
    if unique.is_empty() {
        return Err(GenerateError::NoValidLayouts {
            trials_run: run.trials_run,
        });
    }
    let unique_count = unique.len();
    let ranked = rank_layouts(unique, &required, config.top_n);

    log::info!(
        "generated {} instances, {} trials ({} non-empty), {} unique layouts, returning {}",
        instances.len(),
        run.trials_run,
        kept,
        unique_count,
        ranked.len()
    );
    Ok(ranked)
}

/// Convenience wrapper over a whole `FloorPlan` document.
pub fn generate_plan(plan: &FloorPlan) -> Result<Vec<Layout>, GenerateError> {
    generate_layouts(plan.floor, &plan.rooms, &plan.blocked_areas, &plan.generator)
}
