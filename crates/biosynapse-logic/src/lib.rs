//! Pure simulation logic for Bio-Synapse.
//!
//! This crate contains the dashboard's data and state transitions,
//! independent of any clock, scheduler, or renderer. Functions take plain
//! data and return results, so everything here is unit-testable and the
//! engine crate only decides *when* things happen.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`assessment`] | What-if risk scoring for a planned mission |
//! | [`catalog`] | Static concepts, datasets, timeline events and their queries |
//! | [`mission`] | Mission progress state machine, risk/countermeasure emission |
//! | [`telemetry`] | Metric kinds, reading generation, bounded live feed |

pub mod assessment;
pub mod catalog;
pub mod mission;
pub mod telemetry;
