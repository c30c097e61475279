use crate::answer::assemble;
use crate::chunking::build_chunks;
use crate::corpus::{read_corpus_file, CorpusSource};
use crate::embeddings::Embedder;
use crate::generation::{generate_with_retry, RetryPolicy};
use crate::index::EmbeddingIndex;
use crate::intent::classify;
use crate::prompt::compose_prompt;
use crate::retrieval::{plan_retrieval, resolve_candidates, CANDIDATE_OVERFETCH};
use crate::traits::TextGenerator;
use crate::{AssistantStatus, CorpusError, IndexError, QueryError, QueryResponse};
use chrono::{DateTime, Utc};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, info};
use uuid::Uuid;

/// One loaded corpus generation. Never mutated; a reload builds a new one.
#[derive(Debug)]
pub struct CorpusSnapshot {
    pub id: Uuid,
    pub source: String,
    pub checksum: String,
    pub law_count: usize,
    pub loaded_at: DateTime<Utc>,
    pub index: EmbeddingIndex,
}

impl CorpusSnapshot {
    /// Parses, chunks and indexes `source`. Needs only an embedder, so a
    /// corpus can be inspected without a generation client.
    pub fn build<E>(source: CorpusSource, embedder: &E) -> Result<Self, CorpusError>
    where
        E: Embedder + ?Sized,
    {
        let corpus = source.parse()?;
        let index = EmbeddingIndex::build(build_chunks(&corpus), embedder)?;

        Ok(Self {
            id: Uuid::new_v4(),
            checksum: source.checksum(),
            source: source.label,
            law_count: corpus.laws.len(),
            loaded_at: Utc::now(),
            index,
        })
    }
}

impl AssistantStatus {
    pub fn from_snapshot(snapshot: Option<&CorpusSnapshot>, generation_model: &str) -> Self {
        Self {
            corpus_loaded: snapshot.is_some(),
            chunk_count: snapshot.map_or(0, |s| s.index.len()),
            law_count: snapshot.map_or(0, |s| s.law_count),
            source: snapshot.map(|s| s.source.clone()),
            checksum: snapshot.map(|s| s.checksum.clone()),
            snapshot_id: snapshot.map(|s| s.id.to_string()),
            loaded_at: snapshot.map(|s| s.loaded_at),
            generation_model: generation_model.to_string(),
        }
    }
}

/// Owns the shared embedder and generator and the active corpus snapshot.
pub struct LegalAssistant<E, G>
where
    E: Embedder,
    G: TextGenerator,
{
    embedder: E,
    generator: G,
    retry: RetryPolicy,
    active: RwLock<Option<Arc<CorpusSnapshot>>>,
}

impl<E, G> LegalAssistant<E, G>
where
    E: Embedder + Send + Sync,
    G: TextGenerator + Send + Sync,
{
    pub fn new(embedder: E, generator: G) -> Self {
        Self::with_retry_policy(embedder, generator, RetryPolicy::default())
    }

    pub fn with_retry_policy(embedder: E, generator: G, retry: RetryPolicy) -> Self {
        Self {
            embedder,
            generator,
            retry,
            active: RwLock::new(None),
        }
    }

    pub async fn load_corpus_file(&self, path: &Path) -> Result<Arc<CorpusSnapshot>, CorpusError> {
        let source = read_corpus_file(path).await?;
        self.load_corpus(source).await
    }

    pub async fn load_corpus_bytes(
        &self,
        label: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Result<Arc<CorpusSnapshot>, CorpusError> {
        self.load_corpus(CorpusSource::new(label, bytes)).await
    }

    /// Builds a fresh snapshot and swaps it in. In-flight queries keep the
    /// snapshot they started with.
    pub async fn load_corpus(&self, source: CorpusSource) -> Result<Arc<CorpusSnapshot>, CorpusError> {
        let snapshot = Arc::new(CorpusSnapshot::build(source, &self.embedder)?);
        *self.active.write().await = Some(Arc::clone(&snapshot));

        info!(
            snapshot_id = %snapshot.id,
            source = %snapshot.source,
            laws = snapshot.law_count,
            chunks = snapshot.index.len(),
            "legal corpus loaded"
        );

        Ok(snapshot)
    }

    pub async fn snapshot(&self) -> Option<Arc<CorpusSnapshot>> {
        self.active.read().await.clone()
    }

    pub async fn query(&self, question: &str, k: usize) -> Result<QueryResponse, QueryError> {
        if k == 0 {
            return Err(QueryError::InvalidArgument("k must be at least 1".to_string()));
        }
        let snapshot = self.snapshot().await.ok_or(QueryError::NotLoaded)?;

        let intent = classify(question);
        let neighbors = snapshot
            .index
            .search(question, &self.embedder, k.saturating_mul(CANDIDATE_OVERFETCH))
            .map_err(|err| processing_failure(err, question, &snapshot))?;

        let plan = plan_retrieval(resolve_candidates(&snapshot.index, &neighbors), &intent, k);
        debug!(
            snapshot_id = %snapshot.id,
            candidates = plan.candidate_count,
            first_pass = plan.first_pass_selected,
            relaxed = plan.relaxed,
            "retrieval planned"
        );

        let prompt = compose_prompt(plan.chunk_refs(), &intent, question);
        let outcome = generate_with_retry(&self.generator, &prompt, self.retry).await;

        Ok(assemble(&outcome, &plan, &intent))
    }

    pub async fn status(&self) -> AssistantStatus {
        let snapshot = self.snapshot().await;
        AssistantStatus::from_snapshot(snapshot.as_deref(), self.generator.model_name())
    }
}

fn processing_failure(err: IndexError, question: &str, snapshot: &CorpusSnapshot) -> QueryError {
    error!(
        error = %err,
        question,
        snapshot_id = %snapshot.id,
        "query processing failed"
    );
    QueryError::Processing(err)
}
