/// Session state for one user, advanced only through [`Session::dispatch`].
///
/// Created at startup with the loaded catalog and discarded on shutdown. Progress
/// reaches disk only on `SaveRequested`.
use std::path::PathBuf;

use tracing::info;

use crate::error::AppError;
use crate::model::{
    CareerRecord, Level, ProgressMap, ProgressStats, RankedCareer, RankingQuery, RoadmapStep,
    TaskStatus,
};
use crate::progress;
use crate::ranker::Ranker;
use crate::roadmap::{build_roadmap, task_texts};
use mcp_common::embedding::Embed;

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    RankRequested(RankingQuery),
    RoadmapRequested { career: String, level: Level },
    StatusChanged { task: String, status: TaskStatus },
    SaveRequested,
    RefreshRequested,
}

#[derive(Debug, Clone, Default)]
pub struct SessionState {
    /// Latest ranking result, best match first.
    pub recommendations: Vec<RankedCareer>,
    /// Progress tracking for the selected roadmap, if one was generated.
    pub tracker: Option<Tracker>,
}

#[derive(Debug, Clone)]
pub struct Tracker {
    pub career: String,
    pub level: Level,
    pub steps: Vec<RoadmapStep>,
    pub resources: Vec<String>,
    pub progress: ProgressMap,
    pub stats: ProgressStats,
}

impl Tracker {
    pub fn status_of(&self, task: &str) -> TaskStatus {
        self.progress.get(task).copied().unwrap_or_default()
    }
}

pub struct Session<E> {
    catalog: Vec<CareerRecord>,
    ranker: Ranker<E>,
    progress_path: PathBuf,
    top_k: usize,
    state: SessionState,
}

impl<E: Embed> Session<E> {
    pub fn new(
        catalog: Vec<CareerRecord>,
        ranker: Ranker<E>,
        progress_path: PathBuf,
        top_k: usize,
    ) -> Self {
        Self {
            catalog,
            ranker,
            progress_path,
            top_k,
            state: SessionState::default(),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn progress_path(&self) -> &std::path::Path {
        &self.progress_path
    }

    /// Apply one user action and return the state to render.
    ///
    /// On error the previous state is left untouched, so a failed save can be retried.
    pub async fn dispatch(&mut self, action: Action) -> Result<&SessionState, AppError> {
        match action {
            Action::RankRequested(query) => {
                let recommendations = self.ranker.rank(&query, &self.catalog, self.top_k).await?;
                self.state.recommendations = recommendations;
            }
            Action::RoadmapRequested { career, level } => {
                let tracker = self.start_tracker(&career, level)?;
                info!(
                    career = %tracker.career,
                    level = %level,
                    tasks = tracker.steps.len(),
                    completed = tracker.stats.completed,
                    "roadmap generated"
                );
                self.state.tracker = Some(tracker);
            }
            Action::StatusChanged { task, status } => {
                let tracker = self
                    .state
                    .tracker
                    .as_mut()
                    .ok_or(AppError::NoActiveRoadmap)?;
                progress::set_status(&mut tracker.progress, &task, status)?;
                tracker.stats = progress::compute_stats(&tracker.progress);
            }
            Action::SaveRequested => {
                let tracker = self.state.tracker.as_ref().ok_or(AppError::NoActiveRoadmap)?;
                progress::save(&tracker.career, &tracker.progress, &self.progress_path)?;
            }
            Action::RefreshRequested => {
                let tracker = self
                    .state
                    .tracker
                    .as_mut()
                    .ok_or(AppError::NoActiveRoadmap)?;
                tracker.stats = progress::compute_stats(&tracker.progress);
            }
        }
        Ok(&self.state)
    }

    fn start_tracker(&self, career: &str, level: Level) -> Result<Tracker, AppError> {
        if self.state.recommendations.is_empty() {
            return Err(AppError::NoRecommendations);
        }
        let record = self
            .state
            .recommendations
            .iter()
            .map(|r| &r.record)
            .find(|r| r.career == career)
            .ok_or_else(|| AppError::NotRecommended(career.to_string()))?;

        let steps = build_roadmap(record, level);
        let saved = progress::load(&self.progress_path)
            .shift_remove(&record.career)
            .unwrap_or_default();
        let seed = match &self.state.tracker {
            Some(current) if current.career == record.career => {
                progress::merge(&current.progress, &saved)
            }
            _ => saved,
        };
        let progress = progress::initialize(&task_texts(&steps), &seed);
        let stats = progress::compute_stats(&progress);

        Ok(Tracker {
            career: record.career.clone(),
            level,
            steps,
            resources: record.resources.clone(),
            progress,
            stats,
        })
    }
}
