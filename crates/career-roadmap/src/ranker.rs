/// Ranks catalog careers against a user's skills and interests.
///
/// Every catalog entry and the query are embedded, L2-normalized, and compared by dot
/// product (cosine similarity). Catalog vectors may come from the Redis cache; the query
/// vector is always computed fresh.
use std::cmp::Ordering;
use std::sync::Arc;

use tracing::{debug, info};

use crate::cache::VectorCache;
use crate::catalog::compose_embedding_text;
use crate::error::AppError;
use crate::model::{CareerRecord, RankedCareer, RankingQuery};
use mcp_common::embedding::Embed;
use mcp_common::error::CommonError;

pub struct Ranker<E> {
    embedder: Arc<E>,
    cache: Arc<VectorCache>,
}

impl<E: Embed> Ranker<E> {
    pub fn new(embedder: Arc<E>, cache: Arc<VectorCache>) -> Self {
        Self { embedder, cache }
    }

    /// Return up to `k` careers, most similar first. Equal scores keep catalog order.
    pub async fn rank(
        &self,
        query: &RankingQuery,
        catalog: &[CareerRecord],
        k: usize,
    ) -> Result<Vec<RankedCareer>, AppError> {
        if catalog.is_empty() || k == 0 {
            return Ok(Vec::new());
        }

        if query.is_empty() {
            debug!("empty query, ranking against a blank description");
        }

        let query_vector = self
            .embedder
            .embed(vec![query.embedding_text()])
            .await?
            .pop()
            .ok_or_else(|| CommonError::Embedding("empty embedding result".to_string()))?;
        let query_vector = l2_normalize(query_vector);

        let texts: Vec<String> = catalog.iter().map(compose_embedding_text).collect();
        let career_vectors = self.catalog_vectors(&texts, query_vector.len()).await?;

        let scores = career_vectors
            .iter()
            .map(|vector| cosine_similarity(&query_vector, vector))
            .collect::<Result<Vec<f32>, CommonError>>()?;

        let ranked: Vec<RankedCareer> = top_k_stable(&scores, k)
            .into_iter()
            .map(|index| RankedCareer {
                record: catalog[index].clone(),
                score: scores[index],
            })
            .collect();

        info!(
            skills = query.skills.len(),
            interests = query.interests.len(),
            catalog = catalog.len(),
            returned = ranked.len(),
            "ranked careers"
        );
        Ok(ranked)
    }

    /// Normalized vectors for every catalog text, reusing cached ones.
    ///
    /// A cached vector whose length is not `dimensions` counts as a miss.
    async fn catalog_vectors(
        &self,
        texts: &[String],
        dimensions: usize,
    ) -> Result<Vec<Vec<f32>>, AppError> {
        let model_id = self.embedder.model_id();
        let mut slots: Vec<Option<Vec<f32>>> = self
            .cache
            .get_vectors(model_id, texts)
            .await
            .into_iter()
            .map(|slot| slot.filter(|vector| vector.len() == dimensions))
            .collect();

        let missing: Vec<usize> = slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.is_none().then_some(i))
            .collect();
        debug!(
            cached = texts.len() - missing.len(),
            missing = missing.len(),
            "catalog vector lookup"
        );

        if !missing.is_empty() {
            let batch: Vec<String> = missing.iter().map(|&i| texts[i].clone()).collect();
            let computed = self.embedder.embed(batch).await?;
            if computed.len() != missing.len() {
                return Err(CommonError::Embedding(format!(
                    "expected {} vectors, got {}",
                    missing.len(),
                    computed.len()
                ))
                .into());
            }
            let computed: Vec<Vec<f32>> = computed.into_iter().map(l2_normalize).collect();
            let entries: Vec<(&String, &Vec<f32>)> =
                missing.iter().map(|&i| &texts[i]).zip(&computed).collect();
            self.cache.set_vectors(model_id, &entries).await;

            for (index, vector) in missing.into_iter().zip(computed) {
                slots[index] = Some(vector);
            }
        }

        Ok(slots.into_iter().flatten().map(l2_normalize).collect())
    }
}

/// Scale a vector to unit length. A zero vector is returned unchanged.
pub fn l2_normalize(mut vector: Vec<f32>) -> Vec<f32> {
    let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        vector.iter_mut().for_each(|x| *x /= norm);
    }
    vector
}

/// Dot product of two unit vectors. Errors when the model changed shape under us.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32, CommonError> {
    if a.len() != b.len() {
        return Err(CommonError::Embedding(format!(
            "dimension mismatch: query has {}, catalog entry has {}",
            a.len(),
            b.len()
        )));
    }
    Ok(a.iter().zip(b).map(|(x, y)| x * y).sum())
}

/// Indices of the `k` highest scores, descending. `sort_by` is stable, so equal scores
/// stay in their original order.
pub fn top_k_stable(scores: &[f32], k: usize) -> Vec<usize> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| {
        scores[b]
            .partial_cmp(&scores[a])
            .unwrap_or(Ordering::Equal)
    });
    order.truncate(k);
    order
}
