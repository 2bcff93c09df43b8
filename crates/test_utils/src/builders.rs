//! Test Data Builders
//!
//! Builder patterns for claim items and coverage terms. Tests set only the
//! fields they care about; everything else gets a sensible default.

use domain_claims::{ClaimItem, CoverageSource, PolicyCoverage};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Builder for claim items
pub struct ClaimItemBuilder {
    item: ClaimItem,
}

impl Default for ClaimItemBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ClaimItemBuilder {
    /// A €85.00 general consultation
    pub fn new() -> Self {
        Self {
            item: ClaimItem::new("General consultation", dec!(85.00))
                .with_code("1")
                .with_date("2024-03-15"),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.item.description = description.into();
        self
    }

    pub fn amount(mut self, amount: Decimal) -> Self {
        self.item.amount = amount;
        self
    }

    pub fn code(mut self, code: Option<&str>) -> Self {
        self.item.code = code.map(str::to_string);
        self
    }

    pub fn provider(mut self, provider: impl Into<String>) -> Self {
        self.item.provider = Some(provider.into());
        self
    }

    pub fn quantity(mut self, quantity: u32) -> Self {
        self.item.quantity = quantity;
        self
    }

    pub fn build(self) -> ClaimItem {
        self.item
    }
}

/// Builder for interpreted coverage terms
pub struct CoverageBuilder {
    coverage: PolicyCoverage,
}

impl Default for CoverageBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CoverageBuilder {
    /// 80% with a €50 deductible and no annual limit
    pub fn new() -> Self {
        Self {
            coverage: PolicyCoverage {
                coverage_percentage: dec!(80),
                deductible: Some(dec!(50)),
                annual_limit: None,
                conditions: Vec::new(),
                exclusions: Vec::new(),
                covered: true,
                reason: "Outpatient treatment is covered".to_string(),
                policy_reference: "Ambulante Heilbehandlung wird zu 80 % ersetzt.".to_string(),
                policy_section: "1. Leistungen".to_string(),
                source: CoverageSource::Interpreted,
            },
        }
    }

    pub fn percentage(mut self, percentage: Decimal) -> Self {
        self.coverage.coverage_percentage = percentage;
        self
    }

    pub fn deductible(mut self, deductible: Option<Decimal>) -> Self {
        self.coverage.deductible = deductible;
        self
    }

    pub fn annual_limit(mut self, limit: Option<Decimal>) -> Self {
        self.coverage.annual_limit = limit;
        self
    }

    pub fn condition(mut self, condition: impl Into<String>) -> Self {
        self.coverage.conditions.push(condition.into());
        self
    }

    /// Marks the service as not covered
    pub fn not_covered(mut self, reason: impl Into<String>) -> Self {
        self.coverage.covered = false;
        self.coverage.reason = reason.into();
        self
    }

    pub fn build(self) -> PolicyCoverage {
        self.coverage
    }
}
