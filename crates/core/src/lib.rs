pub mod answer;
pub mod chunking;
pub mod corpus;
pub mod embeddings;
pub mod error;
pub mod generation;
pub mod index;
pub mod intent;
pub mod models;
pub mod orchestrator;
pub mod prompt;
pub mod retrieval;
pub mod samples;
pub mod traits;

pub use answer::{append_sources, assemble};
pub use chunking::{build_chunks, expected_chunk_count};
pub use corpus::{corpus_checksum, load_corpus_file, parse_corpus, read_corpus_file, CorpusSource};
pub use embeddings::{CharacterNgramEmbedder, Embedder, DEFAULT_EMBEDDING_DIMENSIONS};
pub use error::{CorpusError, GenerationError, IndexError, QueryError};
pub use generation::{
    generate_with_retry, is_sentinel_answer, GeminiConfig, GeminiGenerator, GenerationOutcome,
    RetryPolicy, RATE_LIMIT_MESSAGE,
};
pub use index::{EmbeddingIndex, IndexedChunk, Neighbor};
pub use intent::{classify, IntentSignal, INTENT_KEYWORDS};
pub use models::{
    AssistantStatus, CaseStudy, Chunk, ChunkKind, Corpus, Law, Penalty, Procedure, QueryIntent,
    QueryResponse, QueryType, Section,
};
pub use orchestrator::{CorpusSnapshot, LegalAssistant};
pub use prompt::{compose_prompt, render_context, PromptTemplate};
pub use retrieval::{plan_retrieval, resolve_candidates, RetrievalCandidate, RetrievalPlan, CANDIDATE_OVERFETCH};
pub use samples::{sample_queries, SampleCategory, SAMPLE_QUERIES};
pub use traits::TextGenerator;
