//! Mission risk assessment: what-if scoring for a planned mission.
//!
//! Scores six biological risk areas from the destination's gravity and
//! radiation environment, the mission duration, and the chosen mitigations,
//! then recommends countermeasures for the areas that score high.

use serde::{Deserialize, Serialize};

use crate::catalog;
use crate::mission::Countermeasure;

// ============================================================================
// DESTINATIONS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Destination {
    /// Lunar surface base.
    Moon = 0,
    /// Mars surface colony.
    #[default]
    Mars = 1,
    /// Free flight beyond any gravity well.
    DeepSpace = 2,
}

/// Destination metadata.
#[derive(Debug, Clone)]
pub struct DestinationInfo {
    pub name: &'static str,
    pub transit_days: u32,
    /// Surface gravity as a fraction of Earth's.
    pub gravity: f64,
    /// Relative radiation environment, 0 (shielded) to 1 (deep space).
    pub radiation: f64,
}

impl Destination {
    pub const ALL: [Destination; 3] = [Self::Moon, Self::Mars, Self::DeepSpace];

    pub fn info(&self) -> DestinationInfo {
        match self {
            Self::Moon => DestinationInfo {
                name: "Lunar Base",
                transit_days: 3,
                gravity: 0.16,
                radiation: 0.4,
            },
            Self::Mars => DestinationInfo {
                name: "Mars Colony",
                transit_days: 210,
                gravity: 0.38,
                radiation: 0.7,
            },
            Self::DeepSpace => DestinationInfo {
                name: "Deep Space Mission",
                transit_days: 365,
                gravity: 0.0,
                radiation: 1.0,
            },
        }
    }

    pub fn from_u8(val: u8) -> Option<Self> {
        match val {
            0 => Some(Self::Moon),
            1 => Some(Self::Mars),
            2 => Some(Self::DeepSpace),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shielding {
    #[default]
    Standard,
    /// Halves radiation exposure.
    Enhanced,
}

// ============================================================================
// PARAMETERS & RESULT
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MissionParameters {
    pub duration_days: u32,
    pub destination: Destination,
    pub artificial_gravity: bool,
    pub shielding: Shielding,
}

impl Default for MissionParameters {
    fn default() -> Self {
        Self {
            duration_days: 365,
            destination: Destination::Mars,
            artificial_gravity: false,
            shielding: Shielding::Standard,
        }
    }
}

/// Per-area risk scores, each in `[0, RISK_CAP]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RiskScores {
    pub bone_health: f64,
    pub muscle_health: f64,
    pub cardiovascular_health: f64,
    pub radiation_exposure: f64,
    pub psychological_health: f64,
    pub immune_function: f64,
}

impl RiskScores {
    pub fn as_array(&self) -> [f64; 6] {
        [
            self.bone_health,
            self.muscle_health,
            self.cardiovascular_health,
            self.radiation_exposure,
            self.psychological_health,
            self.immune_function,
        ]
    }

    /// Scores keyed by area name, in field order.
    pub fn areas(&self) -> [(&'static str, f64); 6] {
        [
            ("bone_health", self.bone_health),
            ("muscle_health", self.muscle_health),
            ("cardiovascular_health", self.cardiovascular_health),
            ("radiation_exposure", self.radiation_exposure),
            ("psychological_health", self.psychological_health),
            ("immune_function", self.immune_function),
        ]
    }

    pub fn mean(&self) -> f64 {
        let all = self.as_array();
        all.iter().sum::<f64>() / all.len() as f64
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub destination: Destination,
    pub duration_days: u32,
    pub scores: RiskScores,
    pub total_risk_score: f64,
    pub relevant_studies: Vec<RelevantStudy>,
    pub recommended_countermeasures: Vec<Countermeasure>,
}

/// Knowledge-graph concept backing one high-risk area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelevantStudy {
    pub risk_area: String,
    pub concept_id: String,
    /// Concepts one link away from `concept_id`.
    pub studies_count: usize,
}

pub mod assess_constants {
    /// No single score exceeds this.
    pub const RISK_CAP: f64 = 0.95;
    /// Duration factor stops growing at twice the reference duration.
    pub const MAX_DURATION_FACTOR: f64 = 2.0;
    pub const REFERENCE_DURATION_DAYS: f64 = 365.0;

    pub const BONE_WEIGHT: f64 = 0.8;
    pub const MUSCLE_WEIGHT: f64 = 0.7;
    pub const CARDIO_WEIGHT: f64 = 0.6;
    pub const PSYCH_WEIGHT: f64 = 0.5;
    pub const IMMUNE_WEIGHT: f64 = 0.4;
    pub const ENHANCED_SHIELDING_FACTOR: f64 = 0.5;

    pub const BONE_COUNTERMEASURE_AT: f64 = 0.6;
    pub const RADIATION_COUNTERMEASURE_AT: f64 = 0.5;
    pub const PSYCH_COUNTERMEASURE_AT: f64 = 0.4;

    /// Areas scoring above this are looked up in the knowledge graph.
    pub const HIGH_RISK_AT: f64 = 0.5;
    /// Most high-risk areas considered for study lookup.
    pub const MAX_STUDY_AREAS: usize = 2;
}

// ============================================================================
// SCORING
// ============================================================================

/// Duration multiplier relative to a one-year mission.
pub fn duration_factor(duration_days: u32) -> f64 {
    use assess_constants::*;
    (duration_days as f64 / REFERENCE_DURATION_DAYS).min(MAX_DURATION_FACTOR)
}

/// Score the six risk areas.
pub fn score_risks(params: &MissionParameters) -> RiskScores {
    use assess_constants::*;

    let dest = params.destination.info();
    let factor = duration_factor(params.duration_days);

    // Bone and muscle loss scale with the destination's gravity term unless
    // the vehicle spins for artificial gravity
    let (bone, muscle) = if params.artificial_gravity {
        (0.0, 0.0)
    } else {
        (
            BONE_WEIGHT * dest.gravity * factor,
            MUSCLE_WEIGHT * dest.gravity * factor,
        )
    };

    let mut radiation = dest.radiation * factor;
    if params.shielding == Shielding::Enhanced {
        radiation *= ENHANCED_SHIELDING_FACTOR;
    }

    RiskScores {
        bone_health: bone.min(RISK_CAP),
        muscle_health: muscle.min(RISK_CAP),
        cardiovascular_health: (CARDIO_WEIGHT * (1.0 - dest.gravity) * factor).min(RISK_CAP),
        radiation_exposure: radiation.min(RISK_CAP),
        psychological_health: (PSYCH_WEIGHT * factor).min(RISK_CAP),
        immune_function: (IMMUNE_WEIGHT * factor).min(RISK_CAP),
    }
}

/// Countermeasures for the areas scoring above their trigger.
pub fn recommend_countermeasures(scores: &RiskScores) -> Vec<Countermeasure> {
    use assess_constants::*;

    let mut out = Vec::new();
    if scores.bone_health > BONE_COUNTERMEASURE_AT {
        out.push(Countermeasure {
            name: "Advanced Resistive Exercise Device (ARED)".into(),
            effectiveness_percent: 70.0,
        });
    }
    if scores.radiation_exposure > RADIATION_COUNTERMEASURE_AT {
        out.push(Countermeasure {
            name: "Radioprotective compounds".into(),
            effectiveness_percent: 60.0,
        });
    }
    if scores.psychological_health > PSYCH_COUNTERMEASURE_AT {
        out.push(Countermeasure {
            name: "Virtual reality therapy".into(),
            effectiveness_percent: 50.0,
        });
    }
    out
}

/// Graph concept for a risk area, if the graph has one.
pub fn concept_for_area(area: &str) -> Option<&'static str> {
    match area {
        "bone_health" => Some("bone-loss"),
        "muscle_health" => Some("muscle-atrophy"),
        "radiation_exposure" => Some("radiation"),
        "immune_function" => Some("immune-system"),
        _ => None,
    }
}

/// Related concepts for the highest-scoring areas above [`assess_constants::HIGH_RISK_AT`].
///
/// Areas are ranked by score (ties keep field order); the top
/// [`assess_constants::MAX_STUDY_AREAS`] are taken, and those without a graph
/// concept are dropped.
pub fn relevant_studies(scores: &RiskScores) -> Vec<RelevantStudy> {
    use assess_constants::*;

    let mut high: Vec<(&'static str, f64)> = scores
        .areas()
        .into_iter()
        .filter(|(_, score)| *score > HIGH_RISK_AT)
        .collect();
    high.sort_by(|a, b| b.1.total_cmp(&a.1));

    high.into_iter()
        .take(MAX_STUDY_AREAS)
        .filter_map(|(area, _)| {
            let concept_id = concept_for_area(area)?;
            let hood = catalog::connected_concepts(concept_id, 1)?;
            Some(RelevantStudy {
                risk_area: area.to_string(),
                concept_id: concept_id.to_string(),
                studies_count: hood.concepts.len(),
            })
        })
        .collect()
}

pub fn assess(params: &MissionParameters) -> RiskAssessment {
    let scores = score_risks(params);
    RiskAssessment {
        destination: params.destination,
        duration_days: params.duration_days,
        total_risk_score: scores.mean(),
        relevant_studies: relevant_studies(&scores),
        recommended_countermeasures: recommend_countermeasures(&scores),
        scores,
    }
}
