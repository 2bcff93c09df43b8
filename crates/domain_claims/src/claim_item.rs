//! Claim items
//!
//! A claim item is one billable line of a submitted claim: a service from a
//! medical invoice, a medication from a prescription, or the single fallback
//! line built from a document that has neither.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::ClaimError;

/// One billable line of a claim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ClaimItem {
    /// Service or medication name
    pub description: String,
    /// Procedure or medication code, format not validated
    pub code: Option<String>,
    /// Claimed amount
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub amount: Decimal,
    /// Date of service, ISO-8601 when known, otherwise empty
    #[serde(default)]
    pub date: String,
    pub provider: Option<String>,
    #[validate(range(min = 1, message = "quantity must be at least 1"))]
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

impl ClaimItem {
    /// Creates an item with no code, date or provider and quantity 1
    pub fn new(description: impl Into<String>, amount: Decimal) -> Self {
        Self {
            description: description.into(),
            code: None,
            amount,
            date: String::new(),
            provider: None,
            quantity: 1,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = date.into();
        self
    }

    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    /// Checks structural validity
    ///
    /// # Errors
    ///
    /// Returns `ClaimError::Validation` when the quantity is below 1
    pub fn validated(self) -> Result<Self, ClaimError> {
        self.validate()?;
        Ok(self)
    }

    /// Code for prompts and queries, `"not specified"` when absent
    pub fn code_or_unspecified(&self) -> &str {
        match self.code.as_deref() {
            Some(code) if !code.trim().is_empty() => code,
            _ => "not specified",
        }
    }
}
