use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct SampleCategory {
    pub category: &'static str,
    pub questions: &'static [&'static str],
}

/// Example questions that exercise each retrieval path.
pub const SAMPLE_QUERIES: &[SampleCategory] = &[
    SampleCategory {
        category: "General Information",
        questions: &[
            "What is POSH Act?",
            "What is POCSO Act?",
            "Tell me about Section 498A IPC",
        ],
    },
    SampleCategory {
        category: "Penalties",
        questions: &[
            "What are the penalties under POCSO?",
            "What is the punishment for domestic violence?",
        ],
    },
    SampleCategory {
        category: "Procedures",
        questions: &[
            "How do I file a complaint for domestic violence?",
            "What is the procedure to file a POSH complaint?",
        ],
    },
    SampleCategory {
        category: "Comparisons",
        questions: &[
            "What is the difference between POSH and POCSO?",
            "Compare IPC 498A and Domestic Violence Act",
        ],
    },
];

pub fn sample_queries() -> &'static [SampleCategory] {
    SAMPLE_QUERIES
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intent::classify;
    use crate::models::QueryType;

    #[test]
    fn comparison_samples_classify_as_comparison() {
        let comparisons = SAMPLE_QUERIES
            .iter()
            .find(|category| category.category == "Comparisons")
            .map(|category| category.questions)
            .unwrap_or_default();

        assert!(!comparisons.is_empty());
        for question in comparisons {
            assert_eq!(classify(question).query_type(), QueryType::Comparison);
        }
    }

    #[test]
    fn procedure_samples_request_procedures() {
        for question in SAMPLE_QUERIES[2].questions {
            assert!(classify(question).needs_procedure, "{question}");
        }
    }
}
