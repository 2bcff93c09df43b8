//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating claim items, coverage terms
//! and ledgers that keep to domain invariants: amounts in whole cents,
//! percentages within 0..=100, non-negative ledger figures.

use domain_claims::{ClaimItem, CoverageSource, CustomerLedger, PolicyCoverage};
use fake::faker::company::en::CompanyName;
use fake::Fake;
use proptest::prelude::*;
use rust_decimal::Decimal;

/// Strategy for amounts in whole cents up to `max_minor / 100`
pub fn cents_strategy(max_minor: i64) -> impl Strategy<Value = Decimal> {
    (0i64..=max_minor).prop_map(|minor| Decimal::new(minor, 2))
}

/// Strategy for claimed amounts between €0.00 and €10,000.00
pub fn claim_amount_strategy() -> impl Strategy<Value = Decimal> {
    cents_strategy(1_000_000)
}

/// Strategy for whole coverage percentages
pub fn percentage_strategy() -> impl Strategy<Value = Decimal> {
    (0u32..=100u32).prop_map(Decimal::from)
}

/// Strategy for optional policy amounts such as deductibles
pub fn optional_amount_strategy(max_minor: i64) -> impl Strategy<Value = Option<Decimal>> {
    prop::option::of(cents_strategy(max_minor))
}

/// Strategy for claim items with realistic amounts
pub fn claim_item_strategy() -> impl Strategy<Value = ClaimItem> {
    ("[A-Z][a-z]{3,12}( [a-z]{3,8})?", claim_amount_strategy(), 1u32..4u32)
        .prop_map(|(description, amount, quantity)| {
            ClaimItem::new(description, amount).with_quantity(quantity)
        })
}

/// Strategy for interpreted coverage terms
pub fn coverage_strategy() -> impl Strategy<Value = PolicyCoverage> {
    (
        percentage_strategy(),
        optional_amount_strategy(50_000),
        optional_amount_strategy(1_000_000),
        any::<bool>(),
    )
        .prop_map(|(coverage_percentage, deductible, annual_limit, covered)| PolicyCoverage {
            coverage_percentage,
            deductible,
            annual_limit,
            conditions: Vec::new(),
            exclusions: Vec::new(),
            covered,
            reason: String::new(),
            policy_reference: String::new(),
            policy_section: String::new(),
            source: CoverageSource::Interpreted,
        })
}

/// Strategy for customer ledgers
pub fn ledger_strategy() -> impl Strategy<Value = CustomerLedger> {
    (cents_strategy(50_000), cents_strategy(1_000_000))
        .prop_map(|(deductible_used, claims_paid)| CustomerLedger::new(deductible_used, claims_paid))
}

/// A random provider name
pub fn fake_provider_name() -> String {
    CompanyName().fake()
}
