/// Embedding wrapper around fastembed.
///
/// `TextEmbedding` from fastembed is synchronous and CPU-bound. All embed calls go through
/// `tokio::task::spawn_blocking`, with the model shared through an `Arc`.
///
/// The all-MiniLM-L6-v2 model takes raw sentences, with no task prefixes. Callers that
/// compare vectors should still L2-normalize them; the trait makes no promise about
/// the norm of returned vectors.
use std::future::Future;
use std::sync::Arc;

use crate::error::CommonError;

const MODEL_ID: &str = "all-MiniLM-L6-v2";
const MODEL_DIMENSIONS: usize = 384;

/// Anything that can turn a batch of texts into fixed-length vectors.
///
/// Implementations must return exactly one vector per input text, in input order.
pub trait Embed: Send + Sync {
    /// Stable identifier of the underlying model, used to namespace cached vectors.
    fn model_id(&self) -> &str;

    fn embed(
        &self,
        texts: Vec<String>,
    ) -> impl Future<Output = Result<Vec<Vec<f32>>, CommonError>> + Send;
}

/// Wraps fastembed's `TextEmbedding` model for generating sentence embeddings.
pub struct Embedder {
    model: Arc<fastembed::TextEmbedding>,
}

impl Embedder {
    /// Initialize the embedding model (all-MiniLM-L6-v2).
    ///
    /// This downloads the model on first run (~90MB). The download happens synchronously
    /// inside a blocking task.
    pub async fn new() -> Result<Self, CommonError> {
        let model = tokio::task::spawn_blocking(|| {
            let options = fastembed::InitOptions::new(fastembed::EmbeddingModel::AllMiniLML6V2)
                .with_show_download_progress(true);
            fastembed::TextEmbedding::try_new(options)
        })
        .await
        .map_err(|e| CommonError::Embedding(format!("spawn_blocking join error: {e}")))?
        .map_err(|e| CommonError::Embedding(format!("model initialization failed: {e}")))?;

        Ok(Self {
            model: Arc::new(model),
        })
    }

    /// Returns the dimensionality of the embedding vectors (384 for all-MiniLM-L6-v2).
    pub fn dimensions(&self) -> usize {
        MODEL_DIMENSIONS
    }
}

impl Embed for Embedder {
    fn model_id(&self) -> &str {
        MODEL_ID
    }

    async fn embed(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>, CommonError> {
        let expected = texts.len();
        let model = Arc::clone(&self.model);
        let vectors = tokio::task::spawn_blocking(move || model.embed(texts, None))
            .await
            .map_err(|e| CommonError::Embedding(format!("spawn_blocking join error: {e}")))?
            .map_err(|e| CommonError::Embedding(format!("embedding failed: {e}")))?;

        if vectors.len() != expected {
            return Err(CommonError::Embedding(format!(
                "model returned {} vectors for {expected} inputs",
                vectors.len()
            )));
        }
        Ok(vectors)
    }
}
