//! Floor Plan Generator — headless CLI
//!
//! Reads a floor plan document, generates ranked layouts, prints them, and
//! optionally writes the chosen layout as DXF and/or JSON.
//!
//! Usage:
//!   cargo run -p floorplan-cli
//!   cargo run -p floorplan-cli -- plan.json --seed 42 --dxf out.dxf --json out.json
//!   cargo run -p floorplan-cli -- plan.json --layout 2 --verbose
//!
//! Logging goes through `env_logger`; set `RUST_LOG=debug` for per-trial detail.

use std::fmt;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use floorplan_logic::config::{validate_plan, FloorPlan, PlanIssue};
use floorplan_logic::export::{dxf, json, ExportRequest};
use floorplan_logic::geometry::{validate_layout, Severity};
use floorplan_logic::ranking::RankKey;
use floorplan_logic::render::render_ascii;
use floorplan_logic::{generate_plan, Dimension, Layout};

// ── Bundled sample plan (used when no path is given) ────────────────────
const SAMPLE_PLAN_JSON: &str = include_str!("../../../data/sample_plan.json");

/// Floors larger than this are listed instead of drawn.
const MAX_RENDER_WIDTH: i32 = 160;
const MAX_RENDER_HEIGHT: i32 = 120;

// ── Arguments ───────────────────────────────────────────────────────────

#[derive(Debug, Default, PartialEq)]
struct Args {
    plan: Option<PathBuf>,
    seed: Option<u64>,
    trials: Option<usize>,
    /// 1-based.
    layout: usize,
    dxf: Option<PathBuf>,
    json: Option<PathBuf>,
    verbose: bool,
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<Args, String> {
    let mut parsed = Args {
        layout: 1,
        ..Args::default()
    };
    let mut it = args.into_iter();
    while let Some(arg) = it.next() {
        let mut value = |flag: &str| it.next().ok_or_else(|| format!("{} needs a value", flag));
        match arg.as_str() {
            "--seed" => parsed.seed = Some(parse_num(&value("--seed")?, "--seed")?),
            "--trials" => parsed.trials = Some(parse_num(&value("--trials")?, "--trials")?),
            "--layout" => {
                parsed.layout = parse_num(&value("--layout")?, "--layout")?;
                if parsed.layout == 0 {
                    return Err("--layout is 1-based".into());
                }
            }
            "--dxf" => parsed.dxf = Some(PathBuf::from(value("--dxf")?)),
            "--json" => parsed.json = Some(PathBuf::from(value("--json")?)),
            "--verbose" | "-v" => parsed.verbose = true,
            s if s.starts_with('-') => return Err(format!("unknown flag {}", s)),
            s => {
                if parsed.plan.is_some() {
                    return Err(format!("unexpected argument {}", s));
                }
                parsed.plan = Some(PathBuf::from(s));
            }
        }
    }
    Ok(parsed)
}

fn parse_num<T: std::str::FromStr>(s: &str, flag: &str) -> Result<T, String> {
    s.parse()
        .map_err(|_| format!("{} expects a number, got '{}'", flag, s))
}

// ── Plan loading ────────────────────────────────────────────────────────

/// Errors that can occur while loading a plan.
#[derive(Debug)]
enum PlanError {
    Io(PathBuf, std::io::Error),
    Json(serde_json::Error),
}

impl From<serde_json::Error> for PlanError {
    fn from(e: serde_json::Error) -> Self {
        PlanError::Json(e)
    }
}

impl fmt::Display for PlanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanError::Io(path, e) => write!(f, "cannot read {}: {}", path.display(), e),
            PlanError::Json(e) => write!(f, "plan JSON parse error: {}", e),
        }
    }
}

impl std::error::Error for PlanError {}

fn load_plan(args: &Args) -> Result<FloorPlan, PlanError> {
    let mut plan: FloorPlan = match &args.plan {
        Some(path) => {
            let text =
                std::fs::read_to_string(path).map_err(|e| PlanError::Io(path.clone(), e))?;
            serde_json::from_str(&text)?
        }
        None => serde_json::from_str(SAMPLE_PLAN_JSON)?,
    };
    if let Some(seed) = args.seed {
        plan.generator.seed = Some(seed);
    }
    if let Some(trials) = args.trials {
        plan.generator.trials = trials;
    }
    Ok(plan)
}

/// Log plan issues. They are advisory; generation runs regardless.
fn report_issues(issues: &[PlanIssue]) {
    for issue in issues {
        match issue.severity() {
            Severity::Error => log::error!("plan: {}", issue),
            Severity::Warning => log::warn!("plan: {}", issue),
        }
    }
}

// ── Output ──────────────────────────────────────────────────────────────

fn print_summary(plan: &FloorPlan, layouts: &[Layout]) {
    let required = plan.generator.required.required_ids(&plan.rooms);
    println!(
        "{:>4}  {:>6}  {:>9}  {:>8}  {}",
        "rank", "rooms", "diversity", "score", "covers"
    );
    for (i, layout) in layouts.iter().enumerate() {
        let key = RankKey::of(layout, &required);
        println!(
            "{:>4}  {:>6}  {:>9}  {:>8}  {}",
            i + 1,
            key.room_count,
            key.diversity,
            key.score,
            if key.covers_required { "yes" } else { "no" }
        );
    }
}

fn drawable(floor: Dimension) -> bool {
    floor.width <= MAX_RENDER_WIDTH && floor.height <= MAX_RENDER_HEIGHT
}

fn print_layout(plan: &FloorPlan, layout: &Layout, rank: usize) {
    let floor_area = plan.floor.area().max(1);
    println!(
        "\n--- Layout {} — {} rooms, {}/{} {}² covered ({:.0}%) ---",
        rank,
        layout.room_count(),
        layout.score,
        floor_area,
        plan.unit,
        layout.score as f64 * 100.0 / floor_area as f64
    );
    if drawable(plan.floor) {
        print!(
            "{}",
            render_ascii(plan.floor, &plan.rooms, &plan.blocked_areas, layout)
        );
    }
    for r in &layout.placed_rooms {
        let size = r.effective_dimensions();
        println!(
            "  {:<20} at ({:>3},{:>3})  {}×{}{}",
            r.label(),
            r.x,
            r.y,
            size.width,
            size.height,
            if r.rotated { "  rotated" } else { "" }
        );
    }
}

fn write_exports(args: &Args, plan: &FloorPlan, layout: &Layout) -> Result<(), String> {
    if args.dxf.is_none() && args.json.is_none() {
        return Ok(());
    }
    let exported_at_unix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let req = ExportRequest {
        floor: plan.floor,
        unit: plan.unit,
        rooms: &plan.rooms,
        blocked: &plan.blocked_areas,
        layout,
        layout_index: args.layout - 1,
        exported_at_unix,
    };

    if let Some(path) = &args.dxf {
        std::fs::write(path, dxf::to_dxf(&req))
            .map_err(|e| format!("cannot write {}: {}", path.display(), e))?;
        log::info!("wrote DXF to {}", path.display());
    }
    if let Some(path) = &args.json {
        let text = json::to_json(&req).map_err(|e| e.to_string())?;
        std::fs::write(path, text)
            .map_err(|e| format!("cannot write {}: {}", path.display(), e))?;
        log::info!("wrote JSON to {}", path.display());
    }
    Ok(())
}

/// Run one invocation and return the process exit code.
///
/// 1 means the plan could not be read or an export could not be written.
/// A plan that admits no layout is reported and still exits 0.
fn run(args: Args) -> i32 {
    println!("=== Floor Plan Generator ===\n");

    let plan = match load_plan(&args) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {}", e);
            return 1;
        }
    };
    println!(
        "Floor {}×{} {}, {} room types, {} blocked areas, {} trials",
        plan.floor.width,
        plan.floor.height,
        plan.unit,
        plan.rooms.len(),
        plan.blocked_areas.len(),
        plan.generator.trials
    );

    report_issues(&validate_plan(&plan));

    let layouts = match generate_plan(&plan) {
        Ok(l) => l,
        Err(e) => {
            // Not a crash: the inputs simply admit no placement.
            println!("\n{}", e);
            return 0;
        }
    };
    if layouts.is_empty() {
        println!("\nLayouts were generated but generator.top_n is 0; nothing to show.");
        return 0;
    }

    println!();
    print_summary(&plan, &layouts);

    let chosen = args.layout.min(layouts.len());
    if chosen != args.layout {
        log::warn!(
            "only {} layouts generated; showing layout {}",
            layouts.len(),
            chosen
        );
    }

    if args.verbose {
        for (i, layout) in layouts.iter().enumerate() {
            print_layout(&plan, layout, i + 1);
        }
    } else {
        print_layout(&plan, &layouts[chosen - 1], chosen);
    }

    let layout = &layouts[chosen - 1];
    let errors = validate_layout(plan.floor, &plan.blocked_areas, layout);
    let icon = if errors.is_empty() { "✓" } else { "✗" };
    println!("\n  {} layout validation: {} problems", icon, errors.len());
    for e in &errors {
        println!("    [{}] {}", e.category, e.message);
    }

    let export_args = Args {
        layout: chosen,
        ..args
    };
    if let Err(e) = write_exports(&export_args, &plan, layout) {
        eprintln!("error: {}", e);
        return 1;
    }
    0
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = match parse_args(std::env::args().skip(1)) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(2);
        }
    };
    std::process::exit(run(args));
}
