//! Deterministic stand-ins for the embedding model.

use mcp_common::embedding::Embed;
use mcp_common::error::CommonError;

const DIMENSIONS: usize = 256;

/// Bag-of-words embedder: each lowercase token bumps one FNV-1a hashed dimension.
/// Texts sharing tokens get a positive cosine; an empty text maps to the zero vector.
#[derive(Default)]
pub struct HashEmbedder;

impl HashEmbedder {
    fn vector(text: &str) -> Vec<f32> {
        let mut vector = vec![0.0; DIMENSIONS];
        for token in text.split_whitespace() {
            vector[fnv1a(&token.to_lowercase()) as usize % DIMENSIONS] += 1.0;
        }
        vector
    }
}

impl Embed for HashEmbedder {
    fn model_id(&self) -> &str {
        "hash-bag-of-words"
    }

    async fn embed(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>, CommonError> {
        Ok(texts.iter().map(|t| Self::vector(t)).collect())
    }
}

/// Embedder whose model is permanently broken.
pub struct FailingEmbedder;

impl Embed for FailingEmbedder {
    fn model_id(&self) -> &str {
        "failing"
    }

    async fn embed(&self, _texts: Vec<String>) -> Result<Vec<Vec<f32>>, CommonError> {
        Err(CommonError::Embedding("model unavailable".to_string()))
    }
}

fn fnv1a(token: &str) -> u64 {
    token.bytes().fold(0xcbf2_9ce4_8422_2325, |hash, byte| {
        (hash ^ u64::from(byte)).wrapping_mul(0x0000_0100_0000_01b3)
    })
}
