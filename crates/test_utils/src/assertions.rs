//! Custom Test Assertions
//!
//! Assertion helpers for calculations and analysis results that give more
//! meaningful failure messages than bare `assert_eq!`.

use domain_claims::{ClaimAnalysisResult, FallbackReason, PolicyCoverage, ReimbursementCalculation};
use rust_decimal::Decimal;

/// Asserts the money fields of a calculation
///
/// # Panics
///
/// Panics naming the first field that differs
pub fn assert_calculation_amounts(
    calc: &ReimbursementCalculation,
    covered: Decimal,
    deductible_applied: Decimal,
    final_amount: Decimal,
) {
    let item = &calc.claim_item.description;
    assert_eq!(calc.covered_amount, covered, "covered_amount of '{item}'");
    assert_eq!(calc.deductible_applied, deductible_applied, "deductible_applied of '{item}'");
    assert_eq!(calc.final_amount, final_amount, "final_amount of '{item}'");
}

/// Asserts that a calculation carries a note
pub fn assert_has_note(calc: &ReimbursementCalculation, note: &str) {
    assert!(
        calc.calculation_notes.iter().any(|n| n == note),
        "Expected note {note:?} for '{}', got {:?}",
        calc.claim_item.description,
        calc.calculation_notes
    );
}

/// Asserts that every money field is in whole cents
pub fn assert_rounded_to_cents(calc: &ReimbursementCalculation) {
    for (field, value) in [
        ("covered_amount", calc.covered_amount),
        ("deductible_applied", calc.deductible_applied),
        ("final_amount", calc.final_amount),
    ] {
        assert_eq!(
            value.round_dp(2),
            value,
            "{field} of '{}' is not rounded to cents: {value}",
            calc.claim_item.description
        );
    }
}

/// Asserts that coverage fell back to defaults for the given reason
pub fn assert_default_coverage(coverage: &PolicyCoverage, reason: FallbackReason) {
    assert_eq!(
        coverage.source,
        domain_claims::CoverageSource::Default { reason },
        "Expected default coverage ({reason}), got {:?}",
        coverage.source
    );
    assert_eq!(coverage.policy_reference, "Standard policy terms applied");
}

/// Asserts that a result carries a warning
pub fn assert_has_warning(result: &ClaimAnalysisResult, warning: &str) {
    assert!(
        result.warnings.iter().any(|w| w == warning),
        "Expected warning {warning:?}, got {:?}",
        result.warnings
    );
}

/// Asserts result totals equal the sums over its calculations
pub fn assert_totals_consistent(result: &ClaimAnalysisResult) {
    let claimed: Decimal = result.claim_items.iter().map(|i| i.amount).sum();
    let approved: Decimal = result.calculations.iter().map(|c| c.final_amount).sum();
    assert_eq!(result.total_claimed, claimed.round_dp(2), "total_claimed");
    assert_eq!(result.total_approved, approved.round_dp(2), "total_approved");
    assert_eq!(result.claim_items.len(), result.calculations.len());
}
