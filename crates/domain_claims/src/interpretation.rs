//! Coverage interpretation
//!
//! Builds the prompt sent to a [`CoverageInterpreter`] and reads its reply.
//! Replies are free text expected to contain one JSON object; the first
//! balanced `{...}` span is decoded and every field is coerced leniently.

use std::fmt;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde_json::{Map, Value};

use core_kernel::{Currency, DomainPort, Money, PortError};
use domain_policy::PolicyPassage;

use crate::claim_item::ClaimItem;
use crate::coercion::{coerce_flag, coerce_policy_amount, decimal_from_value, string_list, text_of};

/// System instruction sent with every interpretation prompt
pub const SYSTEM_PROMPT: &str = "You are an insurance policy expert. Return JSON only.";

/// Port for turning a prompt into a coverage answer
///
/// Implementations return the raw reply text; parsing stays in the domain.
#[async_trait]
pub trait CoverageInterpreter: DomainPort {
    async fn interpret(&self, prompt: &str) -> Result<String, PortError>;
}

/// Why an interpreter reply could not be used
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseFailure {
    /// No balanced `{...}` span in the reply
    NoJsonObject,
    /// The span is not valid JSON
    InvalidJson(String),
    /// A field holds a value that cannot be coerced
    UnexpectedShape(String),
}

impl fmt::Display for ParseFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseFailure::NoJsonObject => f.write_str("no JSON object in response"),
            ParseFailure::InvalidJson(e) => write!(f, "invalid JSON: {e}"),
            ParseFailure::UnexpectedShape(field) => write!(f, "unexpected value for {field}"),
        }
    }
}

impl std::error::Error for ParseFailure {}

/// Coverage terms as read from an interpreter reply
///
/// Fields the reply leaves out stay `None` and are filled from the
/// default coverage by the resolver.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InterpretedCoverage {
    pub coverage_percentage: Option<Decimal>,
    pub deductible: Option<Decimal>,
    pub annual_limit: Option<Decimal>,
    pub conditions: Vec<String>,
    pub exclusions: Vec<String>,
    pub covered: Option<bool>,
    pub reason: Option<String>,
}

/// Builds the interpretation prompt for one claim item
pub fn build_interpretation_prompt(
    item: &ClaimItem,
    passages: &[PolicyPassage],
    currency: Currency,
) -> String {
    let policy_text = passages
        .iter()
        .enumerate()
        .map(|(i, p)| format!("Section {}:\n{}", i + 1, p.text))
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "Based on the following policy terms, determine coverage for this medical service:\n\
         \n\
         Service: {description}\n\
         Code: {code}\n\
         Amount: {amount}\n\
         \n\
         Policy Terms:\n\
         {policy_text}\n\
         \n\
         Return JSON with:\n\
         - coverage_percentage: number (0-100)\n\
         - deductible: number or null\n\
         - annual_limit: number or null\n\
         - conditions: list of strings\n\
         - exclusions: list of strings\n\
         - covered: boolean\n\
         - reason: string explaining the decision\n\
         \n\
         Respond with the JSON object only.",
        description = item.description,
        code = item.code_or_unspecified(),
        amount = Money::new(item.amount, currency),
    )
}

/// Returns the first balanced `{...}` span of `text`
///
/// Braces inside JSON strings, including escaped quotes, do not count.
pub fn first_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in text[start..].char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }

    None
}

/// Parses an interpreter reply into coverage terms
pub fn parse_interpretation(response: &str) -> Result<InterpretedCoverage, ParseFailure> {
    let span = first_json_object(response).ok_or(ParseFailure::NoJsonObject)?;
    let fields: Map<String, Value> =
        serde_json::from_str(span).map_err(|e| ParseFailure::InvalidJson(e.to_string()))?;

    let coverage_percentage = match fields.get("coverage_percentage") {
        None | Some(Value::Null) => None,
        Some(value) => Some(
            decimal_from_value(value)
                .ok_or_else(|| ParseFailure::UnexpectedShape("coverage_percentage".into()))?,
        ),
    };

    Ok(InterpretedCoverage {
        coverage_percentage,
        deductible: coerce_policy_amount(fields.get("deductible")),
        annual_limit: coerce_policy_amount(fields.get("annual_limit")),
        conditions: string_list(fields.get("conditions")),
        exclusions: string_list(fields.get("exclusions")),
        covered: coerce_flag(fields.get("covered")),
        reason: text_of(fields.get("reason")),
    })
}
