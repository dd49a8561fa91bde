//! Static sample records: knowledge-graph concepts, studies, timeline.
//!
//! Nothing here mutates. Records are `&'static` tables; queries return
//! borrowed slices or filtered `Vec`s of references.

use serde::Serialize;

// ============================================================================
// RECORD TYPES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConceptKind {
    Concept,
    Mission,
    Study,
    Organism,
}

/// Node in the research knowledge graph.
#[derive(Debug, Clone, Serialize)]
pub struct Concept {
    pub id: &'static str,
    pub name: &'static str,
    pub kind: ConceptKind,
    /// Relative prominence, drives node size in the graph view.
    pub weight: u8,
    pub description: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkKind {
    Impacts,
    Hosts,
    Studies,
    Correlates,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConceptLink {
    pub source: &'static str,
    pub target: &'static str,
    pub kind: LinkKind,
}

/// Research dataset summary.
#[derive(Debug, Clone, Serialize)]
pub struct Dataset {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub category: &'static str,
    pub organism: &'static str,
    pub records: u32,
    pub last_updated: &'static str,
    pub active: bool,
    pub completeness: u8,
    pub reliability: u8,
    pub citations: u32,
    pub tags: &'static [&'static str],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventCategory {
    Mission,
    Discovery,
    Experiment,
}

#[derive(Debug, Clone, Serialize)]
pub struct TimelineEvent {
    pub year: u16,
    pub title: &'static str,
    pub significance: &'static str,
    pub category: EventCategory,
}

// ============================================================================
// TABLES
// ============================================================================

pub const CONCEPTS: &[Concept] = &[
    Concept { id: "microgravity", name: "Microgravity", kind: ConceptKind::Concept, weight: 12, description: "Weightlessness effects on human physiology" },
    Concept { id: "radiation", name: "Cosmic Radiation", kind: ConceptKind::Concept, weight: 10, description: "Space radiation impacts on biology" },
    Concept { id: "bone-loss", name: "Bone Density", kind: ConceptKind::Concept, weight: 9, description: "Bone mass reduction in space" },
    Concept { id: "muscle-atrophy", name: "Muscle Atrophy", kind: ConceptKind::Concept, weight: 8, description: "Muscle deterioration in microgravity" },
    Concept { id: "vision-impairment", name: "Vision", kind: ConceptKind::Concept, weight: 7, description: "Ocular changes in space" },
    Concept { id: "immune-system", name: "Immune System", kind: ConceptKind::Concept, weight: 6, description: "Immune function in space" },
    Concept { id: "iss", name: "ISS", kind: ConceptKind::Mission, weight: 10, description: "International Space Station research" },
    Concept { id: "artemis", name: "Artemis", kind: ConceptKind::Mission, weight: 9, description: "Lunar exploration program" },
    Concept { id: "mars-2020", name: "Mars 2020", kind: ConceptKind::Mission, weight: 8, description: "Mars mission preparations" },
    Concept { id: "twin-study", name: "Twin Study", kind: ConceptKind::Study, weight: 9, description: "NASA astronaut twin research" },
    Concept { id: "bed-rest", name: "Bed Rest", kind: ConceptKind::Study, weight: 6, description: "Earth-based space analog" },
    Concept { id: "mouse", name: "Mouse Studies", kind: ConceptKind::Organism, weight: 5, description: "Rodent research in space" },
    Concept { id: "plant", name: "Space Plants", kind: ConceptKind::Organism, weight: 4, description: "Botany in microgravity" },
];

pub const LINKS: &[ConceptLink] = &[
    ConceptLink { source: "microgravity", target: "bone-loss", kind: LinkKind::Impacts },
    ConceptLink { source: "microgravity", target: "muscle-atrophy", kind: LinkKind::Impacts },
    ConceptLink { source: "microgravity", target: "vision-impairment", kind: LinkKind::Impacts },
    ConceptLink { source: "radiation", target: "immune-system", kind: LinkKind::Impacts },
    ConceptLink { source: "iss", target: "twin-study", kind: LinkKind::Hosts },
    ConceptLink { source: "iss", target: "mouse", kind: LinkKind::Hosts },
    ConceptLink { source: "artemis", target: "radiation", kind: LinkKind::Studies },
    ConceptLink { source: "twin-study", target: "immune-system", kind: LinkKind::Studies },
    ConceptLink { source: "bone-loss", target: "muscle-atrophy", kind: LinkKind::Correlates },
];

pub const DATASETS: &[Dataset] = &[
    Dataset {
        id: "nasa-twins",
        title: "NASA Twin Study",
        description: "Comprehensive study of astronaut twins Scott and Mark Kelly",
        category: "genomics",
        organism: "human",
        records: 12500,
        last_updated: "2024-01-15",
        active: true,
        completeness: 98,
        reliability: 95,
        citations: 247,
        tags: &["microgravity", "genomics", "longitudinal"],
    },
    Dataset {
        id: "iss-bone-density",
        title: "ISS Bone Density Study",
        description: "Long-term bone density changes in microgravity",
        category: "physiology",
        organism: "human",
        records: 8400,
        last_updated: "2024-02-01",
        active: true,
        completeness: 92,
        reliability: 88,
        citations: 156,
        tags: &["bone_loss", "microgravity", "exercise"],
    },
    Dataset {
        id: "mars-radiation",
        title: "Mars Radiation Exposure",
        description: "Radiation effects on biological systems for Mars missions",
        category: "radiation",
        organism: "multi",
        records: 5200,
        last_updated: "2024-01-28",
        active: true,
        completeness: 85,
        reliability: 90,
        citations: 89,
        tags: &["radiation", "mars", "shielding"],
    },
    Dataset {
        id: "mouse-microgravity",
        title: "Rodent Research Microgravity",
        description: "Mouse physiological adaptations to space environment",
        category: "physiology",
        organism: "mouse",
        records: 3200,
        last_updated: "2024-01-20",
        active: true,
        completeness: 78,
        reliability: 82,
        citations: 67,
        tags: &["rodent", "muscle_atrophy", "neuroscience"],
    },
    Dataset {
        id: "vision-impairment",
        title: "Spaceflight Visual Impairment",
        description: "Ocular structural changes in long-duration spaceflight",
        category: "ophthalmology",
        organism: "human",
        records: 2800,
        last_updated: "2024-02-10",
        active: true,
        completeness: 88,
        reliability: 85,
        citations: 134,
        tags: &["vision", "fluid_shift", "intracranial"],
    },
    Dataset {
        id: "immune-space",
        title: "Immune System in Space",
        description: "Immune function alterations during space missions",
        category: "immunology",
        organism: "human",
        records: 4100,
        last_updated: "2024-01-25",
        active: true,
        completeness: 82,
        reliability: 79,
        citations: 98,
        tags: &["immune", "microbiology", "stress"],
    },
];

pub const TIMELINE: &[TimelineEvent] = &[
    TimelineEvent { year: 1961, title: "First Human in Space", significance: "Yuri Gagarin", category: EventCategory::Mission },
    TimelineEvent { year: 1969, title: "Apollo 11 Moon Landing", significance: "First humans on Moon", category: EventCategory::Mission },
    TimelineEvent { year: 1973, title: "Skylab Launch", significance: "First US space station", category: EventCategory::Mission },
    TimelineEvent { year: 1986, title: "Mir Space Station", significance: "First modular space station", category: EventCategory::Mission },
    TimelineEvent { year: 1998, title: "ISS Construction Begins", significance: "International collaboration", category: EventCategory::Mission },
    TimelineEvent { year: 2011, title: "Mars Science Laboratory", significance: "Curiosity Rover", category: EventCategory::Mission },
    TimelineEvent { year: 2015, title: "NASA Twin Study", significance: "Long-term space effects", category: EventCategory::Experiment },
    TimelineEvent { year: 2020, title: "SpaceX Crew Dragon", significance: "Commercial spaceflight", category: EventCategory::Mission },
];

// ============================================================================
// QUERIES
// ============================================================================

fn contains_ci(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

/// Concepts whose name or description contains `query` (case-insensitive).
/// An empty query matches everything.
pub fn search_concepts(query: &str) -> Vec<&'static Concept> {
    let q = query.trim().to_lowercase();
    CONCEPTS
        .iter()
        .filter(|c| q.is_empty() || contains_ci(c.name, &q) || contains_ci(c.description, &q))
        .collect()
}

pub fn find_concept(id: &str) -> Option<&'static Concept> {
    CONCEPTS.iter().find(|c| c.id == id)
}

/// Links whose both endpoints are among `concepts`.
pub fn links_among(concepts: &[&Concept]) -> Vec<&'static ConceptLink> {
    let present = |id: &str| concepts.iter().any(|c| c.id == id);
    LINKS
        .iter()
        .filter(|l| present(l.source) && present(l.target))
        .collect()
}

/// Concepts reachable from one start concept, and the links walked to reach them.
#[derive(Debug, Clone, Serialize)]
pub struct Neighbourhood {
    pub start: &'static Concept,
    /// Reached concepts in discovery order, excluding `start`.
    pub concepts: Vec<&'static Concept>,
    pub links: Vec<&'static ConceptLink>,
}

/// Concepts within `depth` links of `id`, following links in either direction.
/// `None` when `id` is unknown.
pub fn connected_concepts(id: &str, depth: usize) -> Option<Neighbourhood> {
    let start = find_concept(id)?;
    let mut reached: Vec<&'static str> = vec![start.id];
    let mut frontier: Vec<&'static str> = vec![start.id];
    let mut links: Vec<&'static ConceptLink> = Vec::new();

    for _ in 0..depth {
        let mut next = Vec::new();
        for link in LINKS {
            let other = if frontier.contains(&link.source) {
                link.target
            } else if frontier.contains(&link.target) {
                link.source
            } else {
                continue;
            };
            if !links.iter().any(|l| std::ptr::eq(*l, link)) {
                links.push(link);
            }
            if !reached.contains(&other) {
                reached.push(other);
                next.push(other);
            }
        }
        if next.is_empty() {
            break;
        }
        frontier = next;
    }

    Some(Neighbourhood {
        start,
        concepts: reached[1..].iter().filter_map(|id| find_concept(id)).collect(),
        links,
    })
}

/// Node counts per kind and total link count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ConceptStats {
    pub concepts: usize,
    pub missions: usize,
    pub studies: usize,
    pub organisms: usize,
    pub links: usize,
}

impl ConceptStats {
    pub fn total_nodes(&self) -> usize {
        self.concepts + self.missions + self.studies + self.organisms
    }
}

pub fn concept_stats() -> ConceptStats {
    let mut stats = ConceptStats {
        links: LINKS.len(),
        ..ConceptStats::default()
    };
    for concept in CONCEPTS {
        match concept.kind {
            ConceptKind::Concept => stats.concepts += 1,
            ConceptKind::Mission => stats.missions += 1,
            ConceptKind::Study => stats.studies += 1,
            ConceptKind::Organism => stats.organisms += 1,
        }
    }
    stats
}

/// Keywords recognised by [`extract_concepts`], in priority order.
pub const KEYWORDS: &[&str] = &[
    "microgravity",
    "radiation",
    "bone loss",
    "muscle atrophy",
    "cardiovascular",
    "immune system",
    "cognitive",
    "sleep",
    "nutrition",
    "exercise",
    "mars",
    "moon",
    "iss",
];

/// Most keywords [`extract_concepts`] returns.
pub const MAX_EXTRACTED: usize = 5;

/// Known keywords appearing in `text` (case-insensitive), at most [`MAX_EXTRACTED`].
pub fn extract_concepts(text: &str) -> Vec<&'static str> {
    let lowered = text.to_lowercase();
    KEYWORDS
        .iter()
        .copied()
        .filter(|k| lowered.contains(k))
        .take(MAX_EXTRACTED)
        .collect()
}

/// Dataset filter. `None` fields match everything.
#[derive(Debug, Clone, Default)]
pub struct DatasetFilter {
    pub text: Option<String>,
    pub organism: Option<String>,
    pub category: Option<String>,
}

impl DatasetFilter {
    pub fn matches(&self, d: &Dataset) -> bool {
        let text_ok = match self.text.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(t) => {
                let q = t.to_lowercase();
                contains_ci(d.title, &q)
                    || contains_ci(d.description, &q)
                    || d.tags.iter().any(|tag| contains_ci(tag, &q))
            }
        };
        let organism_ok = self.organism.as_deref().map_or(true, |o| d.organism == o);
        let category_ok = self.category.as_deref().map_or(true, |c| d.category == c);
        text_ok && organism_ok && category_ok
    }
}

pub fn filter_datasets(filter: &DatasetFilter) -> Vec<&'static Dataset> {
    DATASETS.iter().filter(|d| filter.matches(d)).collect()
}

pub fn find_dataset(id: &str) -> Option<&'static Dataset> {
    DATASETS.iter().find(|d| d.id == id)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DatasetStats {
    pub total_datasets: usize,
    pub total_records: u64,
    pub active_studies: usize,
    /// Mean reliability, rounded to the nearest percent.
    pub avg_reliability: u8,
}

pub fn dataset_stats() -> DatasetStats {
    let total = DATASETS.len();
    let reliability_sum: u32 = DATASETS.iter().map(|d| d.reliability as u32).sum();
    DatasetStats {
        total_datasets: total,
        total_records: DATASETS.iter().map(|d| d.records as u64).sum(),
        active_studies: DATASETS.iter().filter(|d| d.active).count(),
        avg_reliability: if total == 0 {
            0
        } else {
            (reliability_sum as f64 / total as f64).round() as u8
        },
    }
}

/// Timeline events in `[from, to]`, in table order.
pub fn events_between(from: u16, to: u16) -> Vec<&'static TimelineEvent> {
    TIMELINE
        .iter()
        .filter(|e| e.year >= from && e.year <= to)
        .collect()
}
