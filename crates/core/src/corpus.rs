use crate::error::CorpusError;
use crate::models::Corpus;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Raw corpus bytes plus where they came from.
#[derive(Debug, Clone)]
pub struct CorpusSource {
    pub label: String,
    pub bytes: Vec<u8>,
}

impl CorpusSource {
    pub fn new(label: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            label: label.into(),
            bytes,
        }
    }

    pub fn checksum(&self) -> String {
        corpus_checksum(&self.bytes)
    }

    pub fn parse(&self) -> Result<Corpus, CorpusError> {
        parse_corpus(&self.bytes)
    }
}

pub async fn read_corpus_file(path: &Path) -> Result<CorpusSource, CorpusError> {
    if !tokio::fs::try_exists(path).await? {
        return Err(CorpusError::SourceNotFound(path.to_path_buf()));
    }

    let bytes = tokio::fs::read(path).await?;
    Ok(CorpusSource::new(path.display().to_string(), bytes))
}

pub async fn load_corpus_file(path: &Path) -> Result<Corpus, CorpusError> {
    read_corpus_file(path).await?.parse()
}

pub fn parse_corpus(bytes: &[u8]) -> Result<Corpus, CorpusError> {
    Ok(serde_json::from_slice(bytes)?)
}

pub fn corpus_checksum(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const CORPUS: &str = r#"{
        "laws": [
            {
                "name": "POCSO Act",
                "description": "Protection of children from sexual offences.",
                "sections": [{"section_number": "4", "title": "Punishment", "description": "Punishment for assault."}],
                "penalties": [{"offense": "child abuse", "penalty": "3 years imprisonment"}]
            }
        ]
    }"#;

    #[tokio::test]
    async fn loads_corpus_from_file() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("laws.json");
        fs::write(&path, CORPUS)?;

        let corpus = load_corpus_file(&path).await?;

        assert_eq!(corpus.laws.len(), 1);
        assert_eq!(corpus.laws[0].penalties[0].offense, "child abuse");
        Ok(())
    }

    #[tokio::test]
    async fn missing_file_is_source_not_found() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let result = load_corpus_file(&dir.path().join("absent.json")).await;

        assert!(matches!(result, Err(CorpusError::SourceNotFound(_))));
        Ok(())
    }

    #[test]
    fn malformed_bytes_are_rejected() {
        assert!(matches!(
            parse_corpus(b"{\"laws\": 7}"),
            Err(CorpusError::Malformed(_))
        ));
        assert!(matches!(parse_corpus(b"not json"), Err(CorpusError::Malformed(_))));
    }

    #[test]
    fn checksum_is_reproducible() {
        let source = CorpusSource::new("upload", CORPUS.as_bytes().to_vec());
        assert_eq!(source.checksum(), corpus_checksum(CORPUS.as_bytes()));
        assert_ne!(source.checksum(), corpus_checksum(b"{}"));
    }
}
