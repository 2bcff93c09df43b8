//! Policy coverage terms for a single claim item
//!
//! A [`PolicyCoverage`] is either interpreted from policy passages or the
//! configured default terms. The [`CoverageSource`] records which, so a
//! reviewer can tell an interpreted 80% from a defaulted one.

use std::fmt;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

pub const DEFAULT_POLICY_REFERENCE: &str = "Standard policy terms applied";
pub const DEFAULT_POLICY_SECTION: &str = "Default";
pub const DEFAULT_CONDITION: &str = "Unable to find specific policy terms - using standard coverage";
pub const DEFAULT_REASON: &str = "Default coverage applied";

/// Why default coverage was used instead of interpreted terms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackReason {
    NoPassages,
    RetrievalFailed,
    RetrievalTimedOut,
    InterpretationFailed,
    InterpretationTimedOut,
    Unparsable,
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            FallbackReason::NoPassages => "no matching policy passages",
            FallbackReason::RetrievalFailed => "policy retrieval failed",
            FallbackReason::RetrievalTimedOut => "policy retrieval timed out",
            FallbackReason::InterpretationFailed => "coverage interpretation failed",
            FallbackReason::InterpretationTimedOut => "coverage interpretation timed out",
            FallbackReason::Unparsable => "interpreter response could not be parsed",
        };
        f.write_str(text)
    }
}

/// Provenance of coverage terms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CoverageSource {
    Interpreted,
    Default { reason: FallbackReason },
}

impl CoverageSource {
    pub fn is_default(&self) -> bool {
        matches!(self, CoverageSource::Default { .. })
    }
}

/// Configurable default coverage terms
///
/// The shipped values (80%, €50 deductible, no limit) are a product
/// placeholder until the insurer confirms the standard tariff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultCoverage {
    pub coverage_percentage: Decimal,
    pub deductible: Option<Decimal>,
    pub annual_limit: Option<Decimal>,
    pub condition: String,
}

impl Default for DefaultCoverage {
    fn default() -> Self {
        Self {
            coverage_percentage: dec!(80),
            deductible: Some(dec!(50)),
            annual_limit: None,
            condition: DEFAULT_CONDITION.to_string(),
        }
    }
}

/// Coverage terms that apply to one claim item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyCoverage {
    /// Share of the claimed amount the policy pays, 0..=100
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub coverage_percentage: Decimal,
    /// Annual deductible, `None` when the policy states none
    #[serde(serialize_with = "rust_decimal::serde::float_option::serialize")]
    pub deductible: Option<Decimal>,
    /// Annual reimbursement cap, `None` when the policy states none
    #[serde(serialize_with = "rust_decimal::serde::float_option::serialize")]
    pub annual_limit: Option<Decimal>,
    pub conditions: Vec<String>,
    pub exclusions: Vec<String>,
    pub covered: bool,
    pub reason: String,
    /// Excerpt of the passage the terms were read from
    pub policy_reference: String,
    pub policy_section: String,
    pub source: CoverageSource,
}

impl PolicyCoverage {
    /// Builds the default terms for a degraded lookup
    pub fn fallback(defaults: &DefaultCoverage, reason: FallbackReason) -> Self {
        Self {
            coverage_percentage: defaults.coverage_percentage,
            deductible: defaults.deductible,
            annual_limit: defaults.annual_limit,
            conditions: vec![defaults.condition.clone()],
            exclusions: Vec::new(),
            covered: true,
            reason: DEFAULT_REASON.to_string(),
            policy_reference: DEFAULT_POLICY_REFERENCE.to_string(),
            policy_section: DEFAULT_POLICY_SECTION.to_string(),
            source: CoverageSource::Default { reason },
        }
    }

    /// Reason shown when the item is not covered
    pub fn exclusion_reason(&self) -> &str {
        if self.reason.trim().is_empty() {
            "Excluded by policy"
        } else {
            &self.reason
        }
    }
}
