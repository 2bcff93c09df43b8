//! In-memory policy index
//!
//! Stores chunked policy sections and answers [`PolicyRetriever`] queries by
//! lexical term overlap. It stands in for a vector store when none is
//! configured and backs the test suites.

use std::collections::{BTreeSet, HashSet};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tokio::sync::RwLock;
use tracing::{debug, info};

use core_kernel::{DomainPort, PortError};

use crate::chunking::{chunk_text, ChunkingConfig};
use crate::error::PolicyError;
use crate::passage::{PolicyPassage, SECTION_TITLE_KEY};
use crate::ports::PolicyRetriever;
use crate::segmentation::{segment_policy, PolicyPage, SectionType};

/// Outcome of indexing one policy document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexingSummary {
    pub policy_id: String,
    pub policy_name: String,
    pub total_pages: usize,
    pub total_sections: usize,
    pub total_chunks: usize,
    /// Distinct section types found, sorted
    pub section_types: Vec<SectionType>,
}

#[derive(Debug, Clone)]
struct IndexedChunk {
    policy_id: String,
    text: String,
    terms: HashSet<String>,
    metadata: Map<String, Value>,
}

/// In-memory, lexically scored policy index
#[derive(Debug, Default)]
pub struct PolicyIndex {
    chunking: ChunkingConfig,
    chunks: RwLock<Vec<IndexedChunk>>,
}

impl PolicyIndex {
    /// Creates an index with custom chunking
    pub fn with_chunking(chunking: ChunkingConfig) -> Result<Self, PolicyError> {
        chunking.validate()?;
        Ok(Self {
            chunking,
            chunks: RwLock::new(Vec::new()),
        })
    }

    /// Segments, chunks and stores a policy document
    ///
    /// Re-indexing a policy replaces its previous chunks.
    pub async fn index_document(
        &self,
        policy_id: &str,
        policy_name: &str,
        pages: &[PolicyPage],
    ) -> Result<IndexingSummary, PolicyError> {
        if policy_id.trim().is_empty() {
            return Err(PolicyError::MissingRequiredField("policy_id".to_string()));
        }

        info!(policy_id, policy_name, pages = pages.len(), "Indexing policy document");

        let sections = segment_policy(pages, policy_id);
        let mut new_chunks = Vec::new();

        for section in &sections {
            let texts = chunk_text(&section.text, self.chunking)?;
            let total = texts.len();
            let page_numbers = section
                .page_numbers
                .iter()
                .map(u32::to_string)
                .collect::<Vec<_>>()
                .join(",");

            for (chunk_index, text) in texts.into_iter().enumerate() {
                let mut metadata = Map::new();
                metadata.insert("policy_id".into(), json!(policy_id));
                metadata.insert("policy_name".into(), json!(policy_name));
                metadata.insert("section_id".into(), json!(section.section_id));
                metadata.insert("section_type".into(), json!(section.section_type.as_str()));
                metadata.insert(SECTION_TITLE_KEY.into(), json!(section.title));
                metadata.insert("page_numbers".into(), json!(page_numbers));
                metadata.insert("chunk_index".into(), json!(chunk_index));
                metadata.insert("total_chunks".into(), json!(total));

                new_chunks.push(IndexedChunk {
                    policy_id: policy_id.to_string(),
                    terms: tokenize(&text),
                    text,
                    metadata,
                });
            }
        }

        let section_types: BTreeSet<SectionType> =
            sections.iter().map(|s| s.section_type).collect();
        let summary = IndexingSummary {
            policy_id: policy_id.to_string(),
            policy_name: policy_name.to_string(),
            total_pages: pages.len(),
            total_sections: sections.len(),
            total_chunks: new_chunks.len(),
            section_types: section_types.into_iter().collect(),
        };

        let mut chunks = self.chunks.write().await;
        chunks.retain(|c| c.policy_id != policy_id);
        chunks.extend(new_chunks);

        info!(
            policy_id,
            sections = summary.total_sections,
            chunks = summary.total_chunks,
            "Policy document indexed"
        );
        Ok(summary)
    }

    /// Number of chunks stored for a policy
    pub async fn chunk_count(&self, policy_id: &str) -> usize {
        self.chunks
            .read()
            .await
            .iter()
            .filter(|c| c.policy_id == policy_id)
            .count()
    }
}

impl DomainPort for PolicyIndex {}

#[async_trait]
impl PolicyRetriever for PolicyIndex {
    async fn search_policy(
        &self,
        query: &str,
        policy_id: &str,
        top_k: usize,
    ) -> Result<Vec<PolicyPassage>, PortError> {
        let query_terms = tokenize(query);
        if query_terms.is_empty() || top_k == 0 {
            return Ok(Vec::new());
        }

        let chunks = self.chunks.read().await;
        let mut scored: Vec<(f64, &IndexedChunk)> = chunks
            .iter()
            .filter(|c| c.policy_id == policy_id)
            .filter_map(|c| {
                let shared = query_terms.intersection(&c.terms).count();
                (shared > 0).then(|| (shared as f64 / query_terms.len() as f64, c))
            })
            .collect();

        // stable sort keeps indexing order among equal scores
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));
        scored.truncate(top_k);

        debug!(policy_id, hits = scored.len(), "Policy index search");

        Ok(scored
            .into_iter()
            .map(|(score, chunk)| PolicyPassage {
                text: chunk.text.clone(),
                metadata: chunk.metadata.clone(),
                distance: 1.0 - score,
            })
            .collect())
    }
}

/// Lowercased alphanumeric terms of at least two characters
fn tokenize(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|term| term.chars().count() >= 2)
        .map(str::to_lowercase)
        .collect()
}
