//! Justification report
//!
//! The plain-text audit artifact a reviewer reads: totals, then one block
//! per item with its calculation notes and policy citation, then the
//! customer's year-to-date status.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use core_kernel::{Currency, Money};

use crate::calculator::ReimbursementCalculation;
use crate::ledger::CustomerLedger;
use crate::resolver::truncate_reference;

/// Characters of the policy reference quoted per item
const QUOTE_MAX_CHARS: usize = 200;

/// Renders the justification report
pub fn render_justification(
    calculations: &[ReimbursementCalculation],
    total_claimed: Decimal,
    total_approved: Decimal,
    approval_rate: Decimal,
    ledger: &CustomerLedger,
    currency: Currency,
) -> String {
    let money = |amount: Decimal| Money::new(amount, currency);

    let mut lines = vec![
        "Claim Analysis Summary".to_string(),
        "=".repeat(50),
        String::new(),
        format!("Total Claimed: {}", money(total_claimed)),
        format!("Total Approved: {}", money(total_approved)),
        format!("Approval Rate: {approval_rate:.1}%"),
        String::new(),
        "Detailed Breakdown:".to_string(),
        "-".repeat(30),
    ];

    for (number, calc) in calculations.iter().enumerate() {
        let rate = (calc.coverage_rate * dec!(100))
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);

        lines.push(String::new());
        lines.push(format!("{}. {}", number + 1, calc.claim_item.description));
        lines.push(format!("   Amount Claimed: {}", money(calc.claim_item.amount)));
        lines.push(format!("   Coverage Rate: {rate}%"));
        lines.push(format!("   Deductible Applied: {}", money(calc.deductible_applied)));
        lines.push(format!("   Amount Approved: {}", money(calc.final_amount)));
        lines.push(String::new());
        lines.push("   Calculation Details:".to_string());
        lines.extend(calc.calculation_notes.iter().map(|note| format!("   • {note}")));

        if !calc.policy_reference.is_empty() {
            lines.push(String::new());
            lines.push("   Policy Reference:".to_string());
            lines.push(format!(
                "   \"{}\"",
                truncate_reference(&calc.policy_reference, QUOTE_MAX_CHARS)
            ));
        }
    }

    lines.push(String::new());
    lines.push("Customer Status:".to_string());
    lines.push(format!(
        "- Annual Deductible Used: {}",
        money(ledger.deductible_used_this_year)
    ));
    lines.push(format!(
        "- Claims Paid This Year: {}",
        money(ledger.claims_paid_this_year)
    ));

    lines.join("\n")
}
