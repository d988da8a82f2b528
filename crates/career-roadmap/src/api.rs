use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::model::{Level, ProgressStats, RankedCareer, TaskStatus};
use crate::session::{SessionState, Tracker};

const KEY_SKILLS_SHOWN: usize = 5;
const FOCUS_AREAS_SHOWN: usize = 3;

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct RankCareersParams {
    /// Comma-separated skills, e.g. "python, sql, statistics".
    #[serde(default)]
    pub skills: String,
    /// Comma-separated interests, e.g. "data, research".
    #[serde(default)]
    pub interests: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GenerateRoadmapParams {
    /// Career name exactly as returned by rank_careers.
    pub career: String,
    /// Current proficiency: "Beginner", "Intermediate" or "Advanced".
    pub level: Level,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SetTaskStatusParams {
    /// Task text exactly as listed in the roadmap.
    pub task: String,
    /// "Not Started", "In Progress" or "Completed".
    pub status: TaskStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CareerMatch {
    pub career: String,
    /// Cosine similarity between the query and the career profile.
    pub score: f32,
    pub key_skills: Vec<String>,
    pub focus_areas: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RankCareersResponse {
    pub matches: Vec<CareerMatch>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RoadmapStepView {
    /// 1-based position within its level.
    pub step: usize,
    pub task: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RoadmapSection {
    pub level: Level,
    pub steps: Vec<RoadmapStepView>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RoadmapResponse {
    pub career: String,
    pub level: Level,
    pub sections: Vec<RoadmapSection>,
    pub resources: Vec<String>,
    pub dashboard: DashboardResponse,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TaskView {
    /// 1-based position in the flattened roadmap.
    pub index: usize,
    pub level: Level,
    pub task: String,
    pub status: TaskStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DashboardResponse {
    pub career: String,
    pub level: Level,
    pub stats: ProgressStats,
    pub tasks: Vec<TaskView>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SaveProgressResponse {
    pub career: String,
    pub path: String,
    pub tasks: usize,
}

impl From<&RankedCareer> for CareerMatch {
    fn from(ranked: &RankedCareer) -> Self {
        let record = &ranked.record;
        Self {
            career: record.career.clone(),
            score: ranked.score,
            key_skills: record
                .required_skills
                .iter()
                .take(KEY_SKILLS_SHOWN)
                .cloned()
                .collect(),
            focus_areas: record
                .interest_tags
                .iter()
                .take(FOCUS_AREAS_SHOWN)
                .cloned()
                .collect(),
        }
    }
}

impl From<&SessionState> for RankCareersResponse {
    fn from(state: &SessionState) -> Self {
        Self {
            matches: state.recommendations.iter().map(CareerMatch::from).collect(),
        }
    }
}

impl From<&Tracker> for DashboardResponse {
    fn from(tracker: &Tracker) -> Self {
        Self {
            career: tracker.career.clone(),
            level: tracker.level,
            stats: tracker.stats,
            tasks: tracker
                .steps
                .iter()
                .enumerate()
                .map(|(i, step)| TaskView {
                    index: i + 1,
                    level: step.level,
                    task: step.task.clone(),
                    status: tracker.status_of(&step.task),
                })
                .collect(),
        }
    }
}

impl From<&Tracker> for RoadmapResponse {
    fn from(tracker: &Tracker) -> Self {
        let sections = Level::ALL
            .into_iter()
            .filter_map(|level| {
                let steps: Vec<RoadmapStepView> = tracker
                    .steps
                    .iter()
                    .filter(|s| s.level == level)
                    .enumerate()
                    .map(|(i, s)| RoadmapStepView {
                        step: i + 1,
                        task: s.task.clone(),
                    })
                    .collect();
                (!steps.is_empty()).then_some(RoadmapSection { level, steps })
            })
            .collect();

        Self {
            career: tracker.career.clone(),
            level: tracker.level,
            sections,
            resources: tracker.resources.clone(),
            dashboard: DashboardResponse::from(tracker),
        }
    }
}
