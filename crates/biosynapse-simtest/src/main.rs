//! Bio-Synapse Headless Simulation Harness
//!
//! Runs the dashboard engine on its virtual clock and validates telemetry,
//! mission progression, command handling, and the static data tables.
//! Runs entirely in-process, no dashboard, no real timers.
//!
//! Usage:
//!   cargo run -p biosynapse-simtest
//!   cargo run -p biosynapse-simtest -- --verbose
//!   cargo run -p biosynapse-simtest -- --config dashboard.json --seed 7 --seconds 120 --json
//!
//! Set `RUST_LOG=info` (or `debug`) to see engine logs.

use std::time::Duration;

use biosynapse_core::prelude::*;
use biosynapse_logic::assessment::{self, Destination, MissionParameters, Shielding};
use biosynapse_logic::catalog::{self, DatasetFilter};
use biosynapse_logic::mission::MissionProfile;

// ── Command line ────────────────────────────────────────────────────────

struct Options {
    verbose: bool,
    json: bool,
    config_path: Option<String>,
    seed: Option<u64>,
    seconds: u64,
}

fn parse_args() -> Result<Options, String> {
    let mut opts = Options {
        verbose: false,
        json: false,
        config_path: None,
        seed: None,
        seconds: 300,
    };
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--verbose" => opts.verbose = true,
            "--json" => opts.json = true,
            "--config" => {
                opts.config_path = Some(args.next().ok_or("--config needs a path")?);
            }
            "--seed" => {
                let raw = args.next().ok_or("--seed needs a number")?;
                opts.seed = Some(raw.parse().map_err(|e| format!("bad --seed {}: {}", raw, e))?);
            }
            "--seconds" => {
                let raw = args.next().ok_or("--seconds needs a number")?;
                opts.seconds = raw
                    .parse()
                    .map_err(|e| format!("bad --seconds {}: {}", raw, e))?;
            }
            other => return Err(format!("unknown argument: {}", other)),
        }
    }
    Ok(opts)
}

fn load_config(opts: &Options) -> Result<DashboardConfig, ConfigError> {
    let mut config = match &opts.config_path {
        Some(path) => DashboardConfig::load(path)?,
        None => DashboardConfig::default(),
    };
    if let Some(seed) = opts.seed {
        config.seed = seed;
    }
    Ok(config)
}

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn main() {
    env_logger::init();

    let opts = match parse_args() {
        Ok(o) => o,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(2);
        }
    };
    let config = match load_config(&opts) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(2);
        }
    };

    // Progress goes to stderr when stdout carries JSON
    let out = Reporter { quiet: opts.json };
    out.line("=== Bio-Synapse Simulation Harness ===\n");

    let mut results = Vec::new();

    // 1. Telemetry stream
    results.extend(validate_telemetry(&out, &config, &opts));

    // 2. Mission milestones
    results.extend(validate_mission_run(&out, &config));

    // 3. Commands and cancellation
    results.extend(validate_commands(&out, &config));

    // 4. Risk assessment
    results.extend(validate_assessment(&out, opts.verbose));

    // 5. Sample data
    results.extend(validate_catalog(&out, opts.verbose));

    // ── Summary ──
    out.line("");
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || opts.verbose {
            out.line(&format!("  {} {}: {}", icon, r.name, r.detail));
        }
    }

    out.line(&format!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    ));

    if opts.json {
        match demo_snapshot(&config, opts.seconds) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("snapshot failed: {}", e);
                std::process::exit(2);
            }
        }
    }

    if failed > 0 {
        std::process::exit(1);
    }
}

struct Reporter {
    quiet: bool,
}

impl Reporter {
    fn line(&self, text: &str) {
        if self.quiet {
            eprintln!("{}", text);
        } else {
            println!("{}", text);
        }
    }
}

/// Build an engine from the harness config, with or without the telemetry stream.
fn build_engine(config: &DashboardConfig, telemetry: bool) -> Result<DashboardEngine, ConfigError> {
    let mut config = config.clone();
    config.telemetry.autostart = telemetry;
    DashboardEngine::new(config)
}

fn engine_failure(name: &str, e: ConfigError) -> Vec<TestResult> {
    vec![TestResult {
        name: name.into(),
        passed: false,
        detail: format!("engine rejected config: {}", e),
    }]
}

// ── 1. Telemetry ────────────────────────────────────────────────────────

fn validate_telemetry(out: &Reporter, config: &DashboardConfig, opts: &Options) -> Vec<TestResult> {
    out.line("--- Telemetry Stream ---");
    let mut results = Vec::new();

    let mut engine = match build_engine(config, true) {
        Ok(e) => e,
        Err(e) => return engine_failure("telemetry_engine", e),
    };

    let refresh = config.telemetry.refresh_ms;
    let capacity = config.telemetry.capacity;
    let mut bound_ok = true;
    let mut head_ok = true;
    let mut last_head = None;
    let steps = opts.seconds * 1000 / refresh;
    for _ in 0..steps {
        engine.advance(Duration::from_millis(refresh));
        let snap = engine.feed().snapshot();
        bound_ok &= snap.len() <= capacity;
        let head = snap.first().map(|r| r.timestamp_ms);
        head_ok &= head == Some(engine.now_ms()) && head != last_head;
        last_head = head;
    }

    results.push(TestResult {
        name: "telemetry_bounded".into(),
        passed: bound_ok && engine.feed().len() == capacity.min(steps as usize),
        detail: format!(
            "{} refreshes, feed holds {}/{}",
            steps,
            engine.feed().len(),
            capacity
        ),
    });

    results.push(TestResult {
        name: "telemetry_newest_first".into(),
        passed: head_ok,
        detail: "head of feed is always the reading just generated".into(),
    });

    let ranges = &config.telemetry.ranges;
    let out_of_range: Vec<_> = engine
        .feed()
        .iter()
        .filter(|r| !ranges.get(r.kind).contains(r.value))
        .collect();
    results.push(TestResult {
        name: "telemetry_values_in_range".into(),
        passed: out_of_range.is_empty(),
        detail: format!("{} readings outside configured range", out_of_range.len()),
    });

    if opts.verbose {
        out.line("  Live feed:");
        for r in engine.feed().iter() {
            out.line(&format!(
                "    {:>8}ms  {:<20} {:>6.1} {:<4} {:?}",
                r.timestamp_ms,
                r.kind.label(),
                r.value,
                r.unit,
                r.status()
            ));
        }
    }

    results
}

// ── 2. Mission Milestones ───────────────────────────────────────────────

fn validate_mission_run(out: &Reporter, config: &DashboardConfig) -> Vec<TestResult> {
    out.line("--- Mission Milestones ---");
    let mut results = Vec::new();

    let profile: &MissionProfile = &config.mission;
    let mut engine = match build_engine(config, false) {
        Ok(e) => e,
        Err(e) => return engine_failure("mission_engine", e),
    };
    engine.start_mission();

    let tick = Duration::from_millis(profile.tick_ms);
    let mut ticks = 0u64;
    let mut risks_at = None;
    let mut countermeasures_at = None;
    while engine.mission_status() == MissionStatus::Running && ticks < 100_000 {
        engine.advance(tick);
        ticks += 1;
        let m = engine.mission();
        if risks_at.is_none() && !m.risks.is_empty() {
            risks_at = Some(m.progress_percent);
        }
        if countermeasures_at.is_none() && !m.countermeasures.is_empty() {
            countermeasures_at = Some(m.progress_percent);
        }
    }

    let expected_risk_at = first_step_at_or_above(profile, profile.risk_threshold);
    results.push(TestResult {
        name: "mission_risks_at_threshold".into(),
        passed: risks_at == expected_risk_at && engine.mission().risks.len() == 3,
        detail: format!(
            "risks appeared at {:?}% (threshold {}%)",
            risks_at, profile.risk_threshold
        ),
    });

    let expected_cm_at = first_step_at_or_above(profile, profile.countermeasure_threshold);
    results.push(TestResult {
        name: "mission_countermeasures_at_threshold".into(),
        passed: countermeasures_at == expected_cm_at
            && engine.mission().countermeasures.len() == 3,
        detail: format!(
            "countermeasures appeared at {:?}% (threshold {}%)",
            countermeasures_at, profile.countermeasure_threshold
        ),
    });

    results.push(TestResult {
        name: "mission_completes_clamped".into(),
        passed: engine.mission_status() == MissionStatus::Completed
            && engine.mission().progress_percent == 100.0
            && ticks == profile.ticks_to_complete(),
        detail: format!(
            "{} ticks, {:.1}%, {} simulated seconds",
            ticks,
            engine.mission().progress_percent,
            engine.mission().elapsed_seconds
        ),
    });

    let frozen = engine.mission().clone();
    engine.advance(tick * 50);
    results.push(TestResult {
        name: "mission_frozen_after_completion".into(),
        passed: engine.mission() == &frozen && !engine.mission_ticking(),
        detail: "no state change after completion".into(),
    });

    results
}

/// Progress value of the first tick that reaches `threshold`, if the run gets there.
fn first_step_at_or_above(profile: &MissionProfile, threshold: f64) -> Option<f64> {
    (1..=profile.ticks_to_complete())
        .map(|tick| profile.progress_after(tick))
        .find(|progress| *progress >= threshold)
}

// ── 3. Commands ─────────────────────────────────────────────────────────

fn validate_commands(out: &Reporter, config: &DashboardConfig) -> Vec<TestResult> {
    out.line("--- Commands & Cancellation ---");
    let mut results = Vec::new();

    let mut engine = match build_engine(config, false) {
        Ok(e) => e,
        Err(e) => return engine_failure("commands_engine", e),
    };
    let tick = Duration::from_millis(config.mission.tick_ms);

    // Pause keeps accumulators, resume continues from them
    engine.start_mission();
    engine.advance(tick * 10);
    let before = engine.mission().clone();
    engine.pause_mission();
    engine.advance(tick * 10);
    let held = engine.mission() == &{
        let mut paused = before.clone();
        paused.status = MissionStatus::Paused;
        paused
    };
    let resumed = engine.start_mission() == Transition::Resumed;
    engine.advance(tick);
    let continued = engine.mission().elapsed_seconds
        == before.elapsed_seconds + config.mission.seconds_per_tick;
    results.push(TestResult {
        name: "command_pause_resume".into(),
        passed: held && resumed && continued,
        detail: format!(
            "held={} resumed={} continued={}",
            held, resumed, continued
        ),
    });

    // Reset from running clears everything
    engine.reset_mission();
    engine.advance(tick * 5);
    results.push(TestResult {
        name: "command_reset".into(),
        passed: engine.mission() == &MissionState::new() && !engine.mission_ticking(),
        detail: format!("status after reset: {}", engine.mission_status().name()),
    });

    // A tick captured before reset must not land afterwards
    engine.start_mission();
    let stale = engine.take_due_tick(tick);
    engine.reset_mission();
    let dropped = stale.map(|t| !engine.deliver(t)).unwrap_or(false);
    results.push(TestResult {
        name: "command_stale_tick_dropped".into(),
        passed: dropped && engine.mission() == &MissionState::new(),
        detail: format!("stale ticks dropped: {}", engine.stale_ticks()),
    });

    // Invalid transitions are no-ops
    let ignored = engine.pause_mission() == Transition::Ignored;
    engine.start_mission();
    let double_start = engine.start_mission() == Transition::Ignored;
    results.push(TestResult {
        name: "command_invalid_ignored".into(),
        passed: ignored && double_start,
        detail: "pause while idle and start while running are no-ops".into(),
    });

    results
}

// ── 4. Assessment ───────────────────────────────────────────────────────

fn validate_assessment(out: &Reporter, verbose: bool) -> Vec<TestResult> {
    out.line("--- Risk Assessment ---");
    let mut results = Vec::new();

    let capped = Destination::ALL.iter().all(|dest| {
        let a = assessment::assess(&MissionParameters {
            duration_days: 1000,
            destination: *dest,
            ..MissionParameters::default()
        });
        a.scores
            .as_array()
            .iter()
            .all(|s| (0.0..=assessment::assess_constants::RISK_CAP).contains(s))
    });
    results.push(TestResult {
        name: "assessment_scores_capped".into(),
        passed: capped,
        detail: "all scores within [0, 0.95] for long missions".into(),
    });

    let standard = assessment::assess(&MissionParameters::default());
    let shielded = assessment::assess(&MissionParameters {
        shielding: Shielding::Enhanced,
        ..MissionParameters::default()
    });
    results.push(TestResult {
        name: "assessment_shielding_helps".into(),
        passed: shielded.scores.radiation_exposure < standard.scores.radiation_exposure
            && shielded.total_risk_score < standard.total_risk_score,
        detail: format!(
            "radiation {:.2} → {:.2}",
            standard.scores.radiation_exposure, shielded.scores.radiation_exposure
        ),
    });

    if verbose {
        for dest in Destination::ALL {
            let info = dest.info();
            let a = assessment::assess(&MissionParameters {
                destination: dest,
                ..MissionParameters::default()
            });
            out.line(&format!(
                "  {:20} transit {:>3}d  total risk {:.2}  {} countermeasures  {} related concepts",
                info.name,
                info.transit_days,
                a.total_risk_score,
                a.recommended_countermeasures.len(),
                a.relevant_studies.len()
            ));
        }
    }

    results
}

// ── 5. Sample Data ──────────────────────────────────────────────────────

fn validate_catalog(out: &Reporter, verbose: bool) -> Vec<TestResult> {
    out.line("--- Sample Data ---");
    let mut results = Vec::new();

    let dangling: Vec<_> = catalog::LINKS
        .iter()
        .filter(|l| catalog::find_concept(l.source).is_none() || catalog::find_concept(l.target).is_none())
        .collect();
    results.push(TestResult {
        name: "catalog_links_resolve".into(),
        passed: dangling.is_empty(),
        detail: format!("{} links, {} dangling", catalog::LINKS.len(), dangling.len()),
    });

    let stats = catalog::dataset_stats();
    let all = catalog::filter_datasets(&DatasetFilter::default());
    results.push(TestResult {
        name: "catalog_dataset_stats".into(),
        passed: stats.total_datasets == all.len()
            && stats.total_records == all.iter().map(|d| d.records as u64).sum::<u64>(),
        detail: format!(
            "{} datasets, {} records, avg reliability {}%",
            stats.total_datasets, stats.total_records, stats.avg_reliability
        ),
    });

    let graph = catalog::concept_stats();
    let reachable = catalog::connected_concepts("microgravity", catalog::CONCEPTS.len())
        .map(|hood| hood.concepts.len())
        .unwrap_or(0);
    results.push(TestResult {
        name: "catalog_graph_stats".into(),
        passed: graph.total_nodes() == catalog::CONCEPTS.len() && reachable > 0,
        detail: format!(
            "{} nodes, {} links, {} reachable from microgravity",
            graph.total_nodes(),
            graph.links,
            reachable
        ),
    });

    let chronological = catalog::TIMELINE.windows(2).all(|w| w[0].year <= w[1].year);
    results.push(TestResult {
        name: "catalog_timeline_ordered".into(),
        passed: chronological,
        detail: format!("{} events", catalog::TIMELINE.len()),
    });

    if verbose {
        for concept in catalog::search_concepts("") {
            out.line(&format!(
                "  {:18} {:?} weight {}",
                concept.name, concept.kind, concept.weight
            ));
        }
    }

    results
}

// ── JSON snapshot ───────────────────────────────────────────────────────

/// Run a started mission alongside the telemetry stream and render the
/// final dashboard state.
fn demo_snapshot(config: &DashboardConfig, seconds: u64) -> Result<String, String> {
    let mut engine = build_engine(config, true).map_err(|e| e.to_string())?;
    engine.start_mission();
    engine.advance(Duration::from_secs(seconds));
    log::info!(
        "Demo run finished at {}ms with mission {}",
        engine.now_ms(),
        engine.mission_status().name()
    );
    serde_json::to_string_pretty(&engine.snapshot()).map_err(|e| e.to_string())
}
