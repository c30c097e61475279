use crate::models::{CaseStudy, Chunk, ChunkKind, Corpus, Law, Penalty, Procedure, Section};
use std::collections::BTreeMap;

/// Flattens a corpus into chunks, law-major. Within a law the order is
/// overview, sections, case studies, penalties, procedures.
pub fn build_chunks(corpus: &Corpus) -> Vec<Chunk> {
    let mut chunks = Vec::with_capacity(expected_chunk_count(corpus));

    for law in &corpus.laws {
        chunks.push(overview_chunk(law));
        chunks.extend(law.sections.iter().map(|section| section_chunk(law, section)));
        chunks.extend(law.case_studies.iter().map(|case| case_study_chunk(law, case)));
        chunks.extend(law.penalties.iter().map(|penalty| penalty_chunk(law, penalty)));
        chunks.extend(law.procedures.iter().map(|step| procedure_chunk(law, step)));
    }

    chunks
}

pub fn expected_chunk_count(corpus: &Corpus) -> usize {
    corpus
        .laws
        .iter()
        .map(|law| {
            1 + law.sections.len()
                + law.case_studies.len()
                + law.penalties.len()
                + law.procedures.len()
        })
        .sum()
}

fn overview_chunk(law: &Law) -> Chunk {
    make_chunk(
        law,
        ChunkKind::Overview,
        format!("Law: {}\n\nDescription: {}", law.name, law.description),
        [],
    )
}

fn section_chunk(law: &Law, section: &Section) -> Chunk {
    make_chunk(
        law,
        ChunkKind::Section,
        format!(
            "Law: {}\nSection {}: {}\n\n{}",
            law.name, section.section_number, section.title, section.description
        ),
        [
            ("section_number", section.section_number.as_str()),
            ("section_title", section.title.as_str()),
        ],
    )
}

fn case_study_chunk(law: &Law, case: &CaseStudy) -> Chunk {
    make_chunk(
        law,
        ChunkKind::CaseStudy,
        format!(
            "Law: {}\nCase Study: {}\n\nFacts: {}\n\nOutcome: {}\n\nSignificance: {}",
            law.name, case.case_name, case.facts, case.outcome, case.significance
        ),
        [("case_name", case.case_name.as_str())],
    )
}

fn penalty_chunk(law: &Law, penalty: &Penalty) -> Chunk {
    make_chunk(
        law,
        ChunkKind::Penalty,
        format!(
            "Law: {}\nOffense: {}\nPenalty: {}",
            law.name, penalty.offense, penalty.penalty
        ),
        [("offense", penalty.offense.as_str())],
    )
}

fn procedure_chunk(law: &Law, procedure: &Procedure) -> Chunk {
    make_chunk(
        law,
        ChunkKind::Procedure,
        format!(
            "Law: {}\nProcedure Step {}: {}",
            law.name, procedure.step, procedure.action
        ),
        [("step", procedure.step.as_str())],
    )
}

fn make_chunk<const N: usize>(
    law: &Law,
    kind: ChunkKind,
    text: String,
    metadata: [(&str, &str); N],
) -> Chunk {
    Chunk {
        text,
        law: law.name.clone(),
        kind,
        metadata: metadata
            .into_iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect::<BTreeMap<_, _>>(),
    }
}
