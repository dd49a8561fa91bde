//! Integration tests across the logic modules.
//!
//! Exercises: MetricGenerator → TelemetryFeed, MissionState over full runs,
//! and the assessment/catalog lookups the dashboard pairs with a run.
//!
//! All tests are pure logic, no clock, no engine.

use biosynapse_logic::assessment::{assess, Destination, MissionParameters};
use biosynapse_logic::catalog::{self, DatasetFilter};
use biosynapse_logic::mission::{
    MissionProfile, MissionState, MissionStatus, Severity, Transition,
};
use biosynapse_logic::telemetry::{MetricGenerator, MetricRanges, TelemetryFeed};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// ── Helpers ────────────────────────────────────────────────────────────

fn tick_n(state: &mut MissionState, profile: &MissionProfile, n: usize) {
    for _ in 0..n {
        state.tick(profile);
    }
}

// ── Feed properties ────────────────────────────────────────────────────

#[test]
fn feed_bound_holds_for_random_push_runs() {
    let mut rng = StdRng::seed_from_u64(99);
    for capacity in 1..=12 {
        let mut generator =
            MetricGenerator::new(StdRng::seed_from_u64(capacity as u64), MetricRanges::default());
        let mut feed = TelemetryFeed::new(capacity);
        let pushes = rng.gen_range(0..60);
        for t in 0..pushes {
            let reading = generator.generate(t);
            feed.push(reading.clone());
            let snap = feed.snapshot();
            assert!(snap.len() <= capacity);
            assert_eq!(snap[0], reading);
        }
        assert_eq!(feed.len(), (pushes as usize).min(capacity));
    }
}

#[test]
fn generator_feed_values_stay_in_range() {
    let ranges = MetricRanges::default();
    let mut generator = MetricGenerator::new(StdRng::seed_from_u64(5), ranges.clone());
    let mut feed = TelemetryFeed::default();
    for t in 0..500 {
        feed.push(generator.generate(t * 1500));
    }
    for reading in feed.iter() {
        assert!(ranges.get(reading.kind).contains(reading.value));
    }
}

// ── Mission runs ───────────────────────────────────────────────────────

#[test]
fn full_run_milestones() {
    let profile = MissionProfile::default();
    let mut state = MissionState::new();
    assert_eq!(state.start(), Transition::Started);

    tick_n(&mut state, &profile, 40);
    assert_eq!(state.progress_percent, 20.0);
    assert_eq!(state.risks.len(), 3);
    assert_eq!(
        state.risks.iter().map(|r| r.severity).collect::<Vec<_>>(),
        vec![Severity::High, Severity::Medium, Severity::Medium]
    );
    assert!(state.countermeasures.is_empty());

    tick_n(&mut state, &profile, 40);
    assert_eq!(state.progress_percent, 40.0);
    assert_eq!(state.countermeasures.len(), 3);

    tick_n(&mut state, &profile, 120);
    assert_eq!(state.progress_percent, 100.0);
    assert_eq!(state.elapsed_seconds, 200);
    assert_eq!(state.status, MissionStatus::Completed);

    tick_n(&mut state, &profile, 50);
    assert_eq!(state.progress_percent, 100.0);
    assert_eq!(state.elapsed_seconds, 200);
}

#[test]
fn interrupted_run_matches_uninterrupted_run() {
    let profile = MissionProfile::default();

    let mut straight = MissionState::new();
    straight.start();
    tick_n(&mut straight, &profile, 120);

    let mut interrupted = MissionState::new();
    interrupted.start();
    for chunk in [10, 30, 25, 55] {
        tick_n(&mut interrupted, &profile, chunk);
        assert_eq!(interrupted.pause(), Transition::Paused);
        tick_n(&mut interrupted, &profile, 7); // ignored while paused
        assert_eq!(interrupted.start(), Transition::Resumed);
    }

    assert_eq!(interrupted, straight);
}

#[test]
fn custom_profile_thresholds() {
    let profile = MissionProfile {
        progress_step: 2.0,
        seconds_per_tick: 60,
        risk_threshold: 10.0,
        countermeasure_threshold: 90.0,
        ..MissionProfile::default()
    };
    let mut state = MissionState::new();
    state.start();
    tick_n(&mut state, &profile, 5);
    assert_eq!(state.risks.len(), 3);
    assert_eq!(state.elapsed_seconds, 300);
    tick_n(&mut state, &profile, 39);
    assert!(state.countermeasures.is_empty());
    tick_n(&mut state, &profile, 1);
    assert_eq!(state.countermeasures.len(), 3);
    assert_eq!(profile.ticks_to_complete(), 50);
}

// ── Supporting data ────────────────────────────────────────────────────

#[test]
fn emitted_risks_have_supporting_datasets() {
    let mut state = MissionState::new();
    state.start();
    tick_n(&mut state, &MissionProfile::default(), 40);

    for (risk, query) in state.risks.iter().zip(["bone", "radiation", "muscle"]) {
        let filter = DatasetFilter {
            text: Some(query.into()),
            ..DatasetFilter::default()
        };
        assert!(
            !catalog::filter_datasets(&filter).is_empty(),
            "no dataset backs {}",
            risk.name
        );
    }
}

#[test]
fn deep_space_assessment_outranks_moon() {
    let moon = assess(&MissionParameters {
        destination: Destination::Moon,
        ..MissionParameters::default()
    });
    let deep = assess(&MissionParameters {
        destination: Destination::DeepSpace,
        ..MissionParameters::default()
    });
    assert!(deep.total_risk_score > moon.total_risk_score);
    assert!(Destination::DeepSpace.info().transit_days > Destination::Moon.info().transit_days);
}
