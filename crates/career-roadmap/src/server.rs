/// MCP server for the career roadmap session.
///
/// Exposes five tools, one per user action:
/// - `rank_careers`: Match free-text skills and interests against the catalog
/// - `generate_roadmap`: Build the roadmap for a matched career and start tracking it
/// - `set_task_status`: Update one task's status
/// - `save_progress`: Persist the tracked career's progress to disk
/// - `progress_dashboard`: Recompute and show progress without changing anything
use std::sync::Arc;

use rmcp::{
    Json, ServerHandler,
    handler::server::router::tool::ToolRouter,
    handler::server::wrapper::Parameters,
    model::*,
    tool, tool_handler, tool_router,
};
use tokio::sync::Mutex;
use tracing::info;

use crate::api::{
    DashboardResponse, GenerateRoadmapParams, RankCareersParams, RankCareersResponse,
    RoadmapResponse, SaveProgressResponse, SetTaskStatusParams,
};
use crate::model::RankingQuery;
use crate::session::{Action, Session, SessionState, Tracker};
use mcp_common::embedding::Embedder;

/// Every connection drives the same session; actions are applied one at a time.
#[derive(Clone)]
pub struct CareerRoadmapServer {
    session: Arc<Mutex<Session<Embedder>>>,
    tool_router: ToolRouter<CareerRoadmapServer>,
}

impl CareerRoadmapServer {
    pub fn new(session: Session<Embedder>) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
            tool_router: Self::tool_router(),
        }
    }
}

#[tool_router]
impl CareerRoadmapServer {
    #[tool(description = "Rank careers by semantic similarity to comma-separated skills and interests. Returns the top matches, best first.")]
    async fn rank_careers(
        &self,
        Parameters(params): Parameters<RankCareersParams>,
    ) -> Result<Json<RankCareersResponse>, String> {
        let query = RankingQuery::parse(&params.skills, &params.interests);
        let mut session = self.session.lock().await;
        let state = session
            .dispatch(Action::RankRequested(query))
            .await
            .map_err(|e| format!("ranking failed: {e}"))?;
        Ok(Json(RankCareersResponse::from(state)))
    }

    #[tool(description = "Generate the learning roadmap for one of the current matches at a starting level (Beginner, Intermediate or Advanced), and start tracking its progress.")]
    async fn generate_roadmap(
        &self,
        Parameters(params): Parameters<GenerateRoadmapParams>,
    ) -> Result<Json<RoadmapResponse>, String> {
        let career = params.career.trim().to_string();
        if career.is_empty() {
            return Err("career must not be empty".to_string());
        }

        let mut session = self.session.lock().await;
        let state = session
            .dispatch(Action::RoadmapRequested {
                career,
                level: params.level,
            })
            .await
            .map_err(|e| format!("roadmap generation failed: {e}"))?;
        Ok(Json(RoadmapResponse::from(active_tracker(state)?)))
    }

    #[tool(description = "Set the status of one roadmap task to \"Not Started\", \"In Progress\" or \"Completed\". Any status can change to any other.")]
    async fn set_task_status(
        &self,
        Parameters(params): Parameters<SetTaskStatusParams>,
    ) -> Result<Json<DashboardResponse>, String> {
        let mut session = self.session.lock().await;
        let state = session
            .dispatch(Action::StatusChanged {
                task: params.task,
                status: params.status,
            })
            .await
            .map_err(|e| format!("status update failed: {e}"))?;
        Ok(Json(DashboardResponse::from(active_tracker(state)?)))
    }

    #[tool(description = "Save the tracked career's task statuses to the progress file. Other careers' saved progress is kept.")]
    async fn save_progress(&self) -> Result<Json<SaveProgressResponse>, String> {
        info!("save_progress tool invoked");
        let mut session = self.session.lock().await;
        let path = session.progress_path().display().to_string();
        let state = session
            .dispatch(Action::SaveRequested)
            .await
            .map_err(|e| format!("save failed: {e}"))?;
        let tracker = active_tracker(state)?;
        Ok(Json(SaveProgressResponse {
            career: tracker.career.clone(),
            path,
            tasks: tracker.progress.len(),
        }))
    }

    #[tool(description = "Show progress for the tracked roadmap: totals, completion percentage and every task with its status.")]
    async fn progress_dashboard(&self) -> Result<Json<DashboardResponse>, String> {
        let mut session = self.session.lock().await;
        let state = session
            .dispatch(Action::RefreshRequested)
            .await
            .map_err(|e| format!("refresh failed: {e}"))?;
        Ok(Json(DashboardResponse::from(active_tracker(state)?)))
    }
}

fn active_tracker(state: &SessionState) -> Result<&Tracker, String> {
    state
        .tracker
        .as_ref()
        .ok_or_else(|| "no roadmap selected; generate a roadmap first".to_string())
}

#[tool_handler]
impl ServerHandler for CareerRoadmapServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_06_18,
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .build(),
            server_info: Implementation {
                name: "career-roadmap".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: None,
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Career roadmap MCP server. Use rank_careers with the user's skills and \
                 interests, then generate_roadmap for the chosen match and level. Track \
                 work with set_task_status, check it with progress_dashboard, and persist \
                 it with save_progress (nothing is written to disk until then)."
                    .to_string(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::CareerRoadmapServer;

    #[test]
    fn tools_publish_output_schemas() {
        let tools = CareerRoadmapServer::tool_router().list_all();
        for name in [
            "rank_careers",
            "generate_roadmap",
            "set_task_status",
            "save_progress",
            "progress_dashboard",
        ] {
            let tool = tools
                .iter()
                .find(|t| t.name == name)
                .unwrap_or_else(|| panic!("missing tool: {name}"));
            assert!(
                tool.output_schema.is_some(),
                "tool {name} should publish output_schema"
            );
        }
    }
}
