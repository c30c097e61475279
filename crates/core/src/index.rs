use crate::embeddings::{normalize, Embedder};
use crate::error::IndexError;
use crate::models::Chunk;
use std::cmp::Ordering;

/// A chunk and its unit-length embedding. Keeping them in one entry means
/// row `i` of the index is always chunk `i`.
#[derive(Debug, Clone)]
pub struct IndexedChunk {
    pub chunk: Chunk,
    pub vector: Vec<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub position: usize,
    pub score: f32,
}

/// Exact inner-product index over normalized vectors, so scores are cosine
/// similarities.
#[derive(Debug, Clone)]
pub struct EmbeddingIndex {
    entries: Vec<IndexedChunk>,
    dimension: usize,
}

impl EmbeddingIndex {
    pub fn build<E>(chunks: Vec<Chunk>, embedder: &E) -> Result<Self, IndexError>
    where
        E: Embedder + ?Sized,
    {
        if chunks.is_empty() {
            return Err(IndexError::EmptyCorpus);
        }

        let texts = chunks.iter().map(|chunk| chunk.text.as_str()).collect::<Vec<_>>();
        let vectors = embedder.embed_batch(&texts);
        if vectors.len() != chunks.len() {
            return Err(IndexError::InvalidArgument(format!(
                "embedding count {} doesn't match chunk count {}",
                vectors.len(),
                chunks.len()
            )));
        }

        let dimension = vectors[0].len();
        if dimension == 0 {
            return Err(IndexError::DimensionMismatch {
                expected: embedder.dimensions(),
                actual: 0,
            });
        }

        let entries = chunks
            .into_iter()
            .zip(vectors)
            .map(|(chunk, mut vector)| {
                if vector.len() != dimension {
                    return Err(IndexError::DimensionMismatch {
                        expected: dimension,
                        actual: vector.len(),
                    });
                }
                normalize(&mut vector);
                Ok(IndexedChunk { chunk, vector })
            })
            .collect::<Result<Vec<_>, IndexError>>()?;

        Ok(Self { entries, dimension })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn chunk(&self, position: usize) -> Option<&Chunk> {
        self.entries.get(position).map(|entry| &entry.chunk)
    }

    pub fn chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.entries.iter().map(|entry| &entry.chunk)
    }

    pub fn entries(&self) -> &[IndexedChunk] {
        &self.entries
    }

    pub fn search<E>(&self, query: &str, embedder: &E, k: usize) -> Result<Vec<Neighbor>, IndexError>
    where
        E: Embedder + ?Sized,
    {
        self.search_vector(embedder.embed(query), k)
    }

    /// Returns at most `k` neighbors, best first. Equal scores keep row order.
    pub fn search_vector(&self, mut query: Vec<f32>, k: usize) -> Result<Vec<Neighbor>, IndexError> {
        if k == 0 {
            return Err(IndexError::InvalidArgument(
                "k must be at least 1".to_string(),
            ));
        }
        if query.len() != self.dimension {
            return Err(IndexError::DimensionMismatch {
                expected: self.dimension,
                actual: query.len(),
            });
        }

        normalize(&mut query);

        let mut neighbors = self
            .entries
            .iter()
            .enumerate()
            .map(|(position, entry)| Neighbor {
                position,
                score: dot(&entry.vector, &query),
            })
            .collect::<Vec<_>>();

        neighbors.sort_by(|left, right| {
            right
                .score
                .partial_cmp(&left.score)
                .unwrap_or(Ordering::Equal)
                .then(left.position.cmp(&right.position))
        });
        neighbors.truncate(k);

        Ok(neighbors)
    }
}

fn dot(left: &[f32], right: &[f32]) -> f32 {
    left.iter().zip(right).map(|(a, b)| a * b).sum()
}
