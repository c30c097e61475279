use crate::models::{ChunkKind, QueryIntent, QueryType};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntentSignal {
    Comparison,
    Procedure,
    Cases,
    Penalties,
    Situational,
}

pub const INTENT_KEYWORDS: [(IntentSignal, &[&str]); 5] = [
    (
        IntentSignal::Comparison,
        &["difference", "compare", "vs", "versus", "between"],
    ),
    (
        IntentSignal::Procedure,
        &["how to", "procedure", "process", "file", "steps", "complaint"],
    ),
    (
        IntentSignal::Cases,
        &["example", "case", "instance", "story", "happened"],
    ),
    (
        IntentSignal::Penalties,
        &["penalty", "punishment", "sentence", "fine", "imprisonment"],
    ),
    (
        IntentSignal::Situational,
        &["if i", "what should i", "can i", "my situation", "help me"],
    ),
];

/// Case-insensitive substring match of the question against each keyword set.
pub fn classify(question: &str) -> QueryIntent {
    let lowered = question.to_lowercase();
    let mut intent = QueryIntent::default();

    for (signal, keywords) in INTENT_KEYWORDS {
        if keywords.iter().any(|keyword| lowered.contains(keyword)) {
            intent.set(signal);
        }
    }

    intent
}

impl QueryIntent {
    pub fn set(&mut self, signal: IntentSignal) {
        match signal {
            IntentSignal::Comparison => self.needs_comparison = true,
            IntentSignal::Procedure => self.needs_procedure = true,
            IntentSignal::Cases => self.needs_cases = true,
            IntentSignal::Penalties => self.needs_penalties = true,
            IntentSignal::Situational => self.is_situational = true,
        }
    }

    /// The single chunk type retrieval keeps on its first pass.
    /// Priority: procedure, then case study, then penalty.
    pub fn retrieval_filter(&self) -> Option<ChunkKind> {
        if self.needs_procedure {
            Some(ChunkKind::Procedure)
        } else if self.needs_cases {
            Some(ChunkKind::CaseStudy)
        } else if self.needs_penalties {
            Some(ChunkKind::Penalty)
        } else {
            None
        }
    }

    /// Reported label. Situational phrasing only shows up here; penalties
    /// have no label of their own and fall through to `General`.
    pub fn query_type(&self) -> QueryType {
        if self.is_situational {
            QueryType::Situational
        } else if self.needs_comparison {
            QueryType::Comparison
        } else if self.needs_procedure {
            QueryType::Procedure
        } else if self.needs_cases {
            QueryType::CaseBased
        } else {
            QueryType::General
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_question_has_no_signals() {
        let intent = classify("What is the POSH Act?");
        assert_eq!(intent, QueryIntent::default());
        assert_eq!(intent.retrieval_filter(), None);
        assert_eq!(intent.query_type(), QueryType::General);
    }

    #[test]
    fn matching_is_case_insensitive() {
        let intent = classify("WHAT IS THE PUNISHMENT?");
        assert!(intent.needs_penalties);
    }

    #[test]
    fn signals_can_overlap() {
        let intent = classify("compare the procedure for filing POSH vs POCSO complaints");

        assert!(intent.needs_comparison);
        assert!(intent.needs_procedure);
        assert!(!intent.needs_cases);
        assert!(!intent.is_situational);
        assert_eq!(intent.query_type(), QueryType::Comparison);
        assert_eq!(intent.retrieval_filter(), Some(ChunkKind::Procedure));
    }

    #[test]
    fn penalty_only_intent_is_labelled_general() {
        let intent = classify("What is the penalty for child abuse under POCSO?");

        assert!(intent.needs_penalties);
        assert!(!intent.needs_comparison);
        assert!(!intent.needs_procedure);
        assert!(!intent.needs_cases);
        assert!(!intent.is_situational);
        assert_eq!(intent.retrieval_filter(), Some(ChunkKind::Penalty));
        assert_eq!(intent.query_type(), QueryType::General);
    }

    #[test]
    fn situational_wins_the_label_but_not_the_filter() {
        let intent = classify("What should I do to file a complaint?");

        assert!(intent.is_situational);
        assert!(intent.needs_procedure);
        assert_eq!(intent.query_type(), QueryType::Situational);
        assert_eq!(intent.retrieval_filter(), Some(ChunkKind::Procedure));
    }

    #[test]
    fn retrieval_filter_prefers_procedure_then_cases() {
        let intent = QueryIntent {
            needs_cases: true,
            needs_penalties: true,
            ..QueryIntent::default()
        };
        assert_eq!(intent.retrieval_filter(), Some(ChunkKind::CaseStudy));
        assert_eq!(intent.query_type(), QueryType::CaseBased);
    }
}
