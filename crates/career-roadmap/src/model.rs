use std::fmt;

use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One career profile from the catalog. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CareerRecord {
    /// Display name, unique within the catalog.
    pub career: String,
    pub required_skills: Vec<String>,
    pub interest_tags: Vec<String>,
    pub roadmap: Roadmap,
    /// URLs or short descriptions of learning material.
    pub resources: Vec<String>,
}

/// Staged task lists. All three tiers are required, though any may be empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Roadmap {
    #[serde(rename = "Beginner")]
    pub beginner: Vec<String>,
    #[serde(rename = "Intermediate")]
    pub intermediate: Vec<String>,
    #[serde(rename = "Advanced")]
    pub advanced: Vec<String>,
}

impl Roadmap {
    pub fn tasks(&self, level: Level) -> &[String] {
        match level {
            Level::Beginner => &self.beginner,
            Level::Intermediate => &self.intermediate,
            Level::Advanced => &self.advanced,
        }
    }
}

/// Self-reported proficiency, which decides where a roadmap starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
pub enum Level {
    Beginner,
    Intermediate,
    Advanced,
}

impl Level {
    pub const ALL: [Level; 3] = [Level::Beginner, Level::Intermediate, Level::Advanced];

    pub fn as_str(self) -> &'static str {
        match self {
            Level::Beginner => "Beginner",
            Level::Intermediate => "Intermediate",
            Level::Advanced => "Advanced",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Completion state of a single roadmap task. Any state may move to any other.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
pub enum TaskStatus {
    #[default]
    #[serde(rename = "Not Started", alias = "NotStarted")]
    NotStarted,
    #[serde(rename = "In Progress", alias = "InProgress")]
    InProgress,
    Completed,
}

/// Task text to status, scoped to the roadmap of one career. Keeps roadmap order.
pub type ProgressMap = IndexMap<String, TaskStatus>;

/// On-disk progress: career name to that career's progress map.
pub type PersistedProgress = IndexMap<String, ProgressMap>;

/// Normalized user input for a ranking request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RankingQuery {
    pub skills: Vec<String>,
    pub interests: Vec<String>,
}

impl RankingQuery {
    /// Build a query from raw comma-separated input.
    ///
    /// Entries are trimmed and lowercased; blank entries are dropped. Order and
    /// duplicates are kept.
    pub fn parse(skills: &str, interests: &str) -> Self {
        Self {
            skills: split_terms(skills),
            interests: split_terms(interests),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty() && self.interests.is_empty()
    }

    /// Skills then interests, space-joined. Empty for an empty query.
    pub fn embedding_text(&self) -> String {
        self.skills
            .iter()
            .chain(&self.interests)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn split_terms(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|term| term.trim().to_lowercase())
        .filter(|term| !term.is_empty())
        .collect()
}

/// A catalog entry paired with its similarity to the query.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedCareer {
    pub record: CareerRecord,
    /// Cosine similarity in [-1, 1].
    pub score: f32,
}

/// One entry of a flattened roadmap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoadmapStep {
    pub level: Level,
    pub task: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ProgressStats {
    pub total: usize,
    pub completed: usize,
    pub in_progress: usize,
    pub pending: usize,
    /// Share of completed tasks, 0.0..=100.0.
    pub percent: f64,
    pub all_completed: bool,
}
