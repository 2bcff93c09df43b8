//! Claims Domain
//!
//! This crate turns the extracted content of a medical invoice or
//! prescription into an auditable reimbursement decision.
//!
//! # Pipeline
//!
//! ```text
//! extracted_data ─> extraction ─> ClaimItem[]
//!                                    │
//!         PolicyRetriever ─┐         ▼
//!                          ├─> CoverageResolver ─> PolicyCoverage
//!     CoverageInterpreter ─┘         │
//!                                    ▼
//!         CustomerLedger ───> ReimbursementCalculator ─> ReimbursementCalculation
//!                                    │
//!                                    ▼
//!                             ClaimAggregator ─> ClaimAnalysisResult
//! ```
//!
//! Only coverage resolution touches the outside world. The calculation is
//! pure and deterministic so that every approved cent can be traced back
//! through the calculation notes.

pub mod claim_item;
pub mod coercion;
pub mod extraction;
pub mod coverage;
pub mod interpretation;
pub mod resolver;
pub mod ledger;
pub mod calculator;
pub mod justification;
pub mod aggregation;
pub mod analyzer;
pub mod error;

pub use claim_item::ClaimItem;
pub use extraction::{extract_claim_items, ExtractedDocument, ExtractedShape};
pub use coverage::{CoverageSource, DefaultCoverage, FallbackReason, PolicyCoverage};
pub use interpretation::{
    build_interpretation_prompt, parse_interpretation, CoverageInterpreter, InterpretedCoverage,
    ParseFailure, SYSTEM_PROMPT,
};
pub use resolver::{build_retrieval_query, CoverageResolver, ResolverConfig};
pub use ledger::CustomerLedger;
pub use calculator::{ReimbursementCalculation, ReimbursementCalculator};
pub use justification::render_justification;
pub use aggregation::{ClaimAggregator, ClaimAnalysisResult, WarningThresholds};
pub use analyzer::{AnalyzerConfig, ClaimAnalyzer};
pub use error::ClaimError;
