//! Policy Text Domain
//!
//! This crate turns policy wordings into passages that can be searched when a
//! claim item needs its coverage terms.
//!
//! # Pipeline
//!
//! ```text
//! pages -> segment_policy -> sections -> chunk_text -> PolicyIndex
//!                                                         │
//!                    PolicyRetriever::search_policy  <────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_policy::{PolicyIndex, PolicyPage, PolicyRetriever};
//!
//! let index = PolicyIndex::default();
//! index.index_document("NK_SELECT_S", "NK.select S", &pages).await?;
//! let passages = index.search_policy("blood test coverage", "NK_SELECT_S", 3).await?;
//! ```

pub mod passage;
pub mod ports;
pub mod segmentation;
pub mod chunking;
pub mod index;
pub mod error;

pub use passage::{PolicyPassage, SECTION_TITLE_KEY};
pub use ports::PolicyRetriever;
pub use segmentation::{segment_policy, identify_section_type, PolicyPage, PolicySection, SectionType};
pub use chunking::{chunk_text, ChunkingConfig};
pub use index::{PolicyIndex, IndexingSummary};
pub use error::PolicyError;
