use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

pub const UNKNOWN_LAW: &str = "Unknown Law";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Corpus {
    #[serde(default)]
    pub laws: Vec<Law>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Law {
    #[serde(default = "unknown_law", deserialize_with = "law_name")]
    pub name: String,
    #[serde(default, deserialize_with = "text_field")]
    pub description: String,
    #[serde(default, deserialize_with = "items")]
    pub sections: Vec<Section>,
    #[serde(default, deserialize_with = "items")]
    pub case_studies: Vec<CaseStudy>,
    #[serde(default, deserialize_with = "items")]
    pub penalties: Vec<Penalty>,
    #[serde(default, deserialize_with = "items")]
    pub procedures: Vec<Procedure>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Section {
    #[serde(default, deserialize_with = "text_field")]
    pub section_number: String,
    #[serde(default, deserialize_with = "text_field")]
    pub title: String,
    #[serde(default, deserialize_with = "text_field")]
    pub description: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CaseStudy {
    #[serde(default, deserialize_with = "text_field")]
    pub case_name: String,
    #[serde(default, deserialize_with = "text_field")]
    pub facts: String,
    #[serde(default, deserialize_with = "text_field")]
    pub outcome: String,
    #[serde(default, deserialize_with = "text_field")]
    pub significance: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Penalty {
    #[serde(default, deserialize_with = "text_field")]
    pub offense: String,
    #[serde(default, deserialize_with = "text_field")]
    pub penalty: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Procedure {
    #[serde(default, deserialize_with = "text_field")]
    pub step: String,
    #[serde(default, deserialize_with = "text_field")]
    pub action: String,
}

fn unknown_law() -> String {
    UNKNOWN_LAW.to_string()
}

fn scalar_text(value: Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text,
        other => other.to_string(),
    }
}

// Corpus files in the wild use numbers for steps and section numbers.
fn text_field<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(scalar_text(Value::deserialize(deserializer)?))
}

fn law_name<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(unknown_law()),
        other => Ok(scalar_text(other)),
    }
}

fn items<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum ChunkKind {
    Overview,
    Section,
    CaseStudy,
    Penalty,
    Procedure,
}

impl ChunkKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChunkKind::Overview => "overview",
            ChunkKind::Section => "section",
            ChunkKind::CaseStudy => "case_study",
            ChunkKind::Penalty => "penalty",
            ChunkKind::Procedure => "procedure",
        }
    }

    /// Upper-cased tag used to label context blocks in prompts.
    pub fn label(&self) -> String {
        self.as_str().to_uppercase()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Chunk {
    pub text: String,
    pub law: String,
    #[serde(rename = "type")]
    pub kind: ChunkKind,
    pub metadata: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct QueryIntent {
    pub needs_comparison: bool,
    pub needs_procedure: bool,
    pub needs_cases: bool,
    pub needs_penalties: bool,
    pub is_situational: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum QueryType {
    Situational,
    Comparison,
    Procedure,
    CaseBased,
    General,
}

impl QueryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryType::Situational => "situational",
            QueryType::Comparison => "comparison",
            QueryType::Procedure => "procedure",
            QueryType::CaseBased => "case_based",
            QueryType::General => "general",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QueryResponse {
    pub answer: String,
    pub sources: Vec<String>,
    pub query_type: QueryType,
    pub chunks_retrieved: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantStatus {
    pub corpus_loaded: bool,
    pub chunk_count: usize,
    pub law_count: usize,
    pub source: Option<String>,
    pub checksum: Option<String>,
    pub snapshot_id: Option<String>,
    pub loaded_at: Option<DateTime<Utc>>,
    pub generation_model: String,
}
