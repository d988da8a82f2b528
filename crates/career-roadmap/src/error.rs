use std::path::PathBuf;

use mcp_common::error::CommonError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Common(#[from] CommonError),

    #[error("config error: {0}")]
    Config(String),

    #[error("failed to load catalog from {}: {message}", .path.display())]
    CatalogLoad { path: PathBuf, message: String },

    #[error("unknown task: {0}")]
    UnknownTask(String),

    #[error("failed to save progress to {}: {source}", .path.display())]
    PersistenceWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no career matches yet; rank careers first")]
    NoRecommendations,

    #[error("career is not among the current matches: {0}")]
    NotRecommended(String),

    #[error("no roadmap selected; generate a roadmap first")]
    NoActiveRoadmap,
}
