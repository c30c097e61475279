use crate::generation::{is_sentinel_answer, GenerationOutcome};
use crate::models::{QueryIntent, QueryResponse};
use crate::retrieval::RetrievalPlan;

const FOOTER_RULE_WIDTH: usize = 60;

/// Adds the sources footer unless the answer is a failure sentinel or there
/// is nothing to cite.
pub fn append_sources(answer: &str, sources: &[String]) -> String {
    if is_sentinel_answer(answer) {
        return answer.to_string();
    }
    with_footer(answer, sources)
}

fn with_footer(answer: &str, sources: &[String]) -> String {
    if sources.is_empty() {
        return answer.to_string();
    }

    format!(
        "{answer}\n\n{}\n📚 **Sources**: {}",
        "─".repeat(FOOTER_RULE_WIDTH),
        sources.join(", ")
    )
}

/// Footer decisions follow the outcome tag, so a real answer that happens to
/// start with a sentinel prefix still cites its sources.
pub fn assemble(outcome: &GenerationOutcome, plan: &RetrievalPlan, intent: &QueryIntent) -> QueryResponse {
    let answer = match outcome {
        GenerationOutcome::Answered(text) => with_footer(text, &plan.sources),
        failed => failed.render(),
    };

    QueryResponse {
        answer,
        sources: plan.sources.clone(),
        query_type: intent.query_type(),
        chunks_retrieved: plan.chunks.len(),
    }
}
