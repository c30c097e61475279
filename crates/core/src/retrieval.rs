use crate::index::{EmbeddingIndex, Neighbor};
use crate::models::{Chunk, ChunkKind, QueryIntent};
use std::collections::{BTreeSet, HashSet};

/// Neighbors fetched per requested chunk, leaving room for type filtering.
pub const CANDIDATE_OVERFETCH: usize = 2;

#[derive(Debug, Clone, PartialEq)]
pub struct RetrievalCandidate {
    pub position: usize,
    pub score: f32,
    pub chunk: Chunk,
}

#[derive(Debug, Clone)]
pub struct RetrievalPlan {
    pub chunks: Vec<RetrievalCandidate>,
    pub sources: Vec<String>,
    pub filter: Option<ChunkKind>,
    pub candidate_count: usize,
    pub first_pass_selected: usize,
    pub relaxed: bool,
}

impl RetrievalPlan {
    pub fn chunk_refs(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.iter().map(|candidate| &candidate.chunk)
    }
}

/// Resolves neighbor rows against the index they came from.
pub fn resolve_candidates(index: &EmbeddingIndex, neighbors: &[Neighbor]) -> Vec<RetrievalCandidate> {
    neighbors
        .iter()
        .filter_map(|neighbor| {
            index.chunk(neighbor.position).map(|chunk| RetrievalCandidate {
                position: neighbor.position,
                score: neighbor.score,
                chunk: chunk.clone(),
            })
        })
        .collect()
}

/// Picks up to `k` chunks from best-first candidates.
///
/// The first pass keeps only the intent's chunk type. When that leaves the
/// plan short, a second pass walks the same list again and fills the gap
/// with anything not yet selected, ignoring type.
pub fn plan_retrieval(
    candidates: Vec<RetrievalCandidate>,
    intent: &QueryIntent,
    k: usize,
) -> RetrievalPlan {
    let filter = intent.retrieval_filter();
    let candidate_count = candidates.len();
    let mut selected_positions = HashSet::new();
    let mut chosen = Vec::new();

    for (slot, candidate) in candidates.iter().enumerate() {
        if chosen.len() >= k {
            break;
        }
        if filter.is_some_and(|kind| candidate.chunk.kind != kind) {
            continue;
        }
        selected_positions.insert(candidate.position);
        chosen.push(slot);
    }

    let first_pass_selected = chosen.len();
    let relaxed = first_pass_selected < k;

    if relaxed {
        for (slot, candidate) in candidates.iter().enumerate() {
            if chosen.len() >= k {
                break;
            }
            if selected_positions.insert(candidate.position) {
                chosen.push(slot);
            }
        }
    }

    let mut slots = candidates.into_iter().map(Some).collect::<Vec<_>>();
    let chunks = chosen
        .into_iter()
        .filter_map(|slot| slots[slot].take())
        .collect::<Vec<_>>();

    let sources = chunks
        .iter()
        .map(|candidate| candidate.chunk.law.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    RetrievalPlan {
        chunks,
        sources,
        filter,
        candidate_count,
        first_pass_selected,
        relaxed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embeddings::CharacterNgramEmbedder;
    use std::collections::BTreeMap;

    fn candidate(position: usize, law: &str, kind: ChunkKind) -> RetrievalCandidate {
        RetrievalCandidate {
            position,
            score: 1.0 - position as f32 * 0.05,
            chunk: Chunk {
                text: format!("{law} {} {position}", kind.as_str()),
                law: law.to_string(),
                kind,
                metadata: BTreeMap::new(),
            },
        }
    }

    fn positions(plan: &RetrievalPlan) -> Vec<usize> {
        plan.chunks.iter().map(|c| c.position).collect()
    }

    #[test]
    fn no_intent_takes_top_k_in_order() {
        let candidates = vec![
            candidate(0, "POSH Act", ChunkKind::Overview),
            candidate(1, "POCSO Act", ChunkKind::Section),
            candidate(2, "POSH Act", ChunkKind::Penalty),
            candidate(3, "IPC", ChunkKind::Section),
        ];

        let plan = plan_retrieval(candidates, &QueryIntent::default(), 2);

        assert_eq!(positions(&plan), vec![0, 1]);
        assert_eq!(plan.sources, vec!["POCSO Act".to_string(), "POSH Act".to_string()]);
        assert!(!plan.relaxed);
        assert_eq!(plan.candidate_count, 4);
    }

    #[test]
    fn procedure_filter_alone_satisfies_when_enough_procedures() {
        let candidates = vec![
            candidate(0, "POSH Act", ChunkKind::Overview),
            candidate(1, "POSH Act", ChunkKind::Procedure),
            candidate(2, "POSH Act", ChunkKind::Section),
            candidate(3, "POSH Act", ChunkKind::Procedure),
        ];
        let intent = QueryIntent {
            needs_procedure: true,
            ..QueryIntent::default()
        };

        let plan = plan_retrieval(candidates, &intent, 2);

        assert_eq!(positions(&plan), vec![1, 3]);
        assert_eq!(plan.first_pass_selected, 2);
        assert!(!plan.relaxed);
        assert!(plan.chunks.iter().all(|c| c.chunk.kind == ChunkKind::Procedure));
    }

    #[test]
    fn relaxed_pass_fills_with_unfiltered_candidates_in_order() {
        let candidates = vec![
            candidate(0, "DV Act", ChunkKind::Overview),
            candidate(1, "POCSO Act", ChunkKind::Section),
            candidate(2, "POCSO Act", ChunkKind::Penalty),
            candidate(3, "IPC", ChunkKind::CaseStudy),
        ];
        let intent = QueryIntent {
            needs_penalties: true,
            ..QueryIntent::default()
        };

        let plan = plan_retrieval(candidates, &intent, 3);

        assert_eq!(positions(&plan), vec![2, 0, 1]);
        assert_eq!(plan.first_pass_selected, 1);
        assert!(plan.relaxed);
        assert_eq!(plan.sources, vec!["DV Act".to_string(), "POCSO Act".to_string()]);
    }

    #[test]
    fn returns_exactly_k_when_candidates_suffice() {
        let candidates = (0..6)
            .map(|position| candidate(position, "POSH Act", ChunkKind::Section))
            .collect::<Vec<_>>();
        let intent = QueryIntent {
            needs_cases: true,
            ..QueryIntent::default()
        };

        let plan = plan_retrieval(candidates, &intent, 3);

        assert_eq!(plan.chunks.len(), 3);
        assert_eq!(plan.first_pass_selected, 0);
        assert!(plan.relaxed);
    }

    #[test]
    fn never_exceeds_available_candidates() {
        let candidates = vec![
            candidate(0, "POSH Act", ChunkKind::Section),
            candidate(1, "POSH Act", ChunkKind::Procedure),
        ];

        let plan = plan_retrieval(candidates, &QueryIntent::default(), 5);

        assert_eq!(plan.chunks.len(), 2);
        assert!(plan.relaxed);
    }

    #[test]
    fn procedure_filter_outranks_cases_and_penalties() {
        let candidates = vec![
            candidate(0, "POSH Act", ChunkKind::CaseStudy),
            candidate(1, "POSH Act", ChunkKind::Penalty),
            candidate(2, "POSH Act", ChunkKind::Procedure),
        ];
        let intent = QueryIntent {
            needs_procedure: true,
            needs_cases: true,
            needs_penalties: true,
            ..QueryIntent::default()
        };

        let plan = plan_retrieval(candidates, &intent, 1);

        assert_eq!(plan.filter, Some(ChunkKind::Procedure));
        assert_eq!(positions(&plan), vec![2]);
    }

    #[test]
    fn duplicate_content_at_distinct_rows_is_kept() {
        let mut twin = candidate(1, "POSH Act", ChunkKind::Section);
        twin.chunk = candidate(0, "POSH Act", ChunkKind::Section).chunk;
        let candidates = vec![candidate(0, "POSH Act", ChunkKind::Section), twin];
        let intent = QueryIntent {
            needs_penalties: true,
            ..QueryIntent::default()
        };

        let plan = plan_retrieval(candidates, &intent, 2);

        assert_eq!(positions(&plan), vec![0, 1]);
    }

    #[test]
    fn empty_candidates_give_empty_plan() {
        let plan = plan_retrieval(Vec::new(), &QueryIntent::default(), 3);
        assert!(plan.chunks.is_empty());
        assert!(plan.sources.is_empty());
    }

    #[test]
    fn resolve_candidates_follows_index_rows() -> Result<(), crate::IndexError> {
        let chunks = vec![
            candidate(0, "POSH Act", ChunkKind::Overview).chunk,
            candidate(1, "POSH Act", ChunkKind::Penalty).chunk,
        ];
        let index = EmbeddingIndex::build(chunks.clone(), &CharacterNgramEmbedder::default())?;
        let neighbors = vec![
            Neighbor { position: 1, score: 0.9 },
            Neighbor { position: 7, score: 0.5 },
        ];

        let resolved = resolve_candidates(&index, &neighbors);

        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].chunk, chunks[1]);
        Ok(())
    }
}
