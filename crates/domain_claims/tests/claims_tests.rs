//! Tests for claim analysis: reference scenarios, degraded coverage lookups
//! and calculator properties

use std::sync::Arc;
use std::time::Duration;

use domain_claims::{
    AnalyzerConfig, ClaimAggregator, ClaimAnalyzer, CoverageInterpreter, CoverageResolver,
    CustomerLedger, FallbackReason, ReimbursementCalculator, ResolverConfig,
};
use domain_policy::PolicyRetriever;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::json;
use test_utils::*;

fn analyzer(
    retriever: impl PolicyRetriever + 'static,
    interpreter: impl CoverageInterpreter + 'static,
) -> ClaimAnalyzer {
    ClaimAnalyzer::new(Arc::new(retriever), Arc::new(interpreter), AnalyzerConfig::default())
}

fn resolver(
    retriever: impl PolicyRetriever + 'static,
    interpreter: impl CoverageInterpreter + 'static,
    config: ResolverConfig,
) -> CoverageResolver {
    CoverageResolver::new(Arc::new(retriever), Arc::new(interpreter), config)
}

mod scenarios {
    use super::*;

    #[tokio::test]
    async fn test_partially_used_deductible() {
        let analyzer = analyzer(
            ScriptedRetriever::returning(vec![PolicyFixtures::outpatient_passage()]),
            ScriptedInterpreter::always(ReplyFixtures::outpatient_80()),
        );

        let result = analyzer
            .analyze_claim(
                &ExtractionFixtures::consultation_invoice(),
                POLICY_ID,
                &LedgerFixtures::deductible_half_used(),
            )
            .await
            .unwrap();

        let calc = &result.calculations[0];
        assert_calculation_amounts(calc, dec!(68.00), dec!(25.00), dec!(43.00));
        assert_has_note(calc, "Covered amount: €85.00 × 80% = €68.00");
        assert_has_note(calc, "Remaining annual deductible: €0.00");
        assert_eq!(result.total_approved, dec!(43.00));
        assert_eq!(result.approval_rate, dec!(50.6));
        assert!(result.warnings.is_empty());
    }

    #[tokio::test]
    async fn test_excluded_service() {
        let analyzer = analyzer(
            ScriptedRetriever::returning(vec![PolicyFixtures::outpatient_passage()]),
            ScriptedInterpreter::always(ReplyFixtures::excluded("Laboratory tests not insured")),
        );
        let extracted = json!({
            "servicesRendered": [{"serviceDescription": "Blood test", "totalPrice": 45.50}]
        });

        let result = analyzer
            .analyze_claim(&extracted, POLICY_ID, &LedgerFixtures::fresh())
            .await
            .unwrap();

        let calc = &result.calculations[0];
        assert_eq!(calc.final_amount, Decimal::ZERO);
        assert_has_note(calc, "Service not covered: Laboratory tests not insured");
        assert_has_warning(&result, "Excluded items: Blood test");
    }

    #[tokio::test]
    async fn test_high_value_claim() {
        let analyzer = analyzer(
            ScriptedRetriever::returning(vec![PolicyFixtures::outpatient_passage()]),
            ScriptedInterpreter::always(ReplyFixtures::outpatient_80()),
        );
        let extracted = json!({
            "servicesRendered": [
                {"serviceDescription": "Knee arthroscopy", "totalPrice": 4000.00},
                {"serviceDescription": "Anaesthesia", "totalPrice": 1200.00}
            ]
        });

        let result = analyzer
            .analyze_claim(&extracted, POLICY_ID, &LedgerFixtures::fresh())
            .await
            .unwrap();

        assert_eq!(result.total_claimed, dec!(5200.00));
        // the ledger is read-only, so each item meets the full deductible
        assert_eq!(result.total_approved, dec!(4060.00));
        assert_eq!(result.approval_rate, dec!(78.1));
        assert_has_warning(&result, "High-value claim - may require additional review");
        assert_totals_consistent(&result);
    }

    #[tokio::test]
    async fn test_annual_limit_clamps_payout() {
        let analyzer = analyzer(
            ScriptedRetriever::returning(vec![PolicyFixtures::outpatient_passage()]),
            ScriptedInterpreter::always(ReplyFixtures::capped_100()),
        );
        let extracted = json!({
            "servicesRendered": [{"serviceDescription": "MRI scan", "totalPrice": 200.00}]
        });

        let result = analyzer
            .analyze_claim(&extracted, POLICY_ID, &LedgerFixtures::near_annual_limit())
            .await
            .unwrap();

        let calc = &result.calculations[0];
        assert_calculation_amounts(calc, dec!(200.00), dec!(0), dec!(100.00));
        assert_has_note(calc, "Annual limit applied: €100.00 remaining of €5000.00");
        assert_has_note(calc, "Condition: Referral required");
    }

    #[tokio::test]
    async fn test_no_passages_applies_default_coverage() {
        let interpreter = Arc::new(ScriptedInterpreter::always(ReplyFixtures::outpatient_80()));
        let analyzer = ClaimAnalyzer::new(
            Arc::new(ScriptedRetriever::empty()),
            interpreter.clone(),
            AnalyzerConfig::default(),
        );

        let result = analyzer
            .analyze_claim(
                &ExtractionFixtures::consultation_invoice(),
                POLICY_ID,
                &LedgerFixtures::fresh(),
            )
            .await
            .unwrap();

        let calc = &result.calculations[0];
        assert_eq!(calc.coverage_rate, dec!(0.8));
        assert_calculation_amounts(calc, dec!(68.00), dec!(50.00), dec!(18.00));
        assert_eq!(calc.policy_reference, "Standard policy terms applied");
        assert_has_note(
            calc,
            "Condition: Unable to find specific policy terms - using standard coverage",
        );
        assert_eq!(interpreter.call_count(), 0);
    }
}

mod analysis {
    use super::*;

    #[tokio::test]
    async fn test_result_envelope() {
        let analyzer = analyzer(
            ScriptedRetriever::returning(vec![PolicyFixtures::outpatient_passage()]),
            ScriptedInterpreter::always(ReplyFixtures::outpatient_80()),
        );

        let result = analyzer
            .analyze_claim(&ExtractionFixtures::medical_invoice(), POLICY_ID, &LedgerFixtures::fresh())
            .await
            .unwrap();

        assert_eq!(result.policy_id, POLICY_ID);
        assert_eq!(result.claim_items.len(), 2);
        assert_eq!(result.claim_items[1].description, "Blood test");
        assert!(result.justification.starts_with("Claim Analysis Summary"));
        assert!(result.justification.contains("2. Blood test"));
        assert!(result.justification.contains("- Annual Deductible Used: €0.00"));

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["currency"], "EUR");
        assert_eq!(json["total_claimed"], json!(130.5));
        assert!(json["processed_at"].is_string());
        assert!(json["calculations"][0]["final_amount"].is_number());
    }

    #[tokio::test]
    async fn test_items_resolve_independently() {
        let analyzer = analyzer(
            ScriptedRetriever::returning(vec![PolicyFixtures::outpatient_passage()]),
            ScriptedInterpreter::sequence(vec![
                "not json at all".to_string(),
                ReplyFixtures::outpatient_80(),
            ]),
        );

        let result = analyzer
            .analyze_claim(&ExtractionFixtures::medical_invoice(), POLICY_ID, &LedgerFixtures::fresh())
            .await
            .unwrap();

        assert_eq!(result.calculations[0].policy_reference, "Standard policy terms applied");
        assert_ne!(result.calculations[1].policy_reference, "Standard policy terms applied");
    }

    #[tokio::test]
    async fn test_amounts_at_decimal_range_still_analyse() {
        let analyzer = analyzer(ScriptedRetriever::empty(), ScriptedInterpreter::always("{}"));
        let extracted = json!({
            "servicesRendered": [
                {"serviceDescription": "Inpatient stay", "totalPrice": "79228162514264337593543950335"},
                {"serviceDescription": "Surgery", "totalPrice": "79228162514264337593543950335"}
            ]
        });

        let result = analyzer
            .analyze_claim(&extracted, POLICY_ID, &LedgerFixtures::fresh())
            .await
            .unwrap();

        assert_eq!(result.calculations.len(), 2);
        assert_eq!(result.total_claimed, Decimal::MAX);
        assert_eq!(result.total_approved, Decimal::MAX);
        assert_eq!(result.approval_rate, dec!(100));
        assert_has_warning(&result, "High-value claim - may require additional review");
    }

    #[tokio::test]
    async fn test_german_grouped_amount() {
        let analyzer = analyzer(ScriptedRetriever::empty(), ScriptedInterpreter::always("{}"));
        let extracted = json!({
            "servicesRendered": [
                {"serviceDescription": "Knee arthroscopy", "totalPrice": "1.250,00 €"}
            ]
        });

        let result = analyzer
            .analyze_claim(&extracted, POLICY_ID, &LedgerFixtures::fresh())
            .await
            .unwrap();

        assert_eq!(result.total_claimed, dec!(1250.00));
        assert_calculation_amounts(&result.calculations[0], dec!(1000.00), dec!(50.00), dec!(950.00));
    }

    #[tokio::test]
    async fn test_missing_fields_warning() {
        let analyzer = analyzer(ScriptedRetriever::empty(), ScriptedInterpreter::always("{}"));
        let mut extracted = ExtractionFixtures::prescription();
        extracted["missing_fields"] = json!(["doctor_signature", "diagnosis"]);

        let result = analyzer
            .analyze_claim(&extracted, POLICY_ID, &LedgerFixtures::fresh())
            .await
            .unwrap();

        assert_has_warning(&result, "Missing information: doctor_signature, diagnosis");
        assert_eq!(result.claim_items[0].provider.as_deref(), Some("Stadt-Apotheke"));
    }

    #[test]
    fn test_many_providers_warning() {
        let ledger = LedgerFixtures::fresh();
        let calculator = ReimbursementCalculator::default();
        let calculations = (0..4)
            .map(|i| {
                let item = ClaimItemBuilder::new()
                    .provider(format!("{} {i}", fake_provider_name()))
                    .build();
                calculator.calculate(&item, &CoverageBuilder::new().build(), &ledger)
            })
            .collect();

        let result = ClaimAggregator::default().aggregate(
            POLICY_ID,
            calculations,
            &ledger,
            &[],
            chrono::Utc::now(),
        );
        assert_has_warning(&result, "Multiple providers (4) - verify all services related");
    }

    #[tokio::test]
    async fn test_negative_ledger_is_rejected() {
        let analyzer = analyzer(ScriptedRetriever::empty(), ScriptedInterpreter::always("{}"));
        let ledger = CustomerLedger::new(dec!(-5), dec!(0));

        let err = analyzer
            .analyze_claim(&ExtractionFixtures::medical_invoice(), POLICY_ID, &ledger)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("deductible_used_this_year"));
    }

    #[tokio::test]
    async fn test_zero_quantity_is_rejected() {
        let analyzer = analyzer(ScriptedRetriever::empty(), ScriptedInterpreter::always("{}"));
        let extracted = json!({
            "servicesRendered": [{"serviceDescription": "Visit", "totalPrice": 10, "quantity": 0}]
        });

        assert!(analyzer
            .analyze_claim(&extracted, POLICY_ID, &LedgerFixtures::fresh())
            .await
            .is_err());
    }
}

mod resolution {
    use super::*;

    #[tokio::test]
    async fn test_interpreted_terms_carry_citation() {
        let retriever = Arc::new(ScriptedRetriever::returning(vec![
            PolicyFixtures::outpatient_passage(),
            PolicyFixtures::passage("Selbstbehalt 50 EUR.", "2. Selbstbehalt"),
        ]));
        let interpreter = Arc::new(ScriptedInterpreter::always(ReplyFixtures::chatty(
            &ReplyFixtures::outpatient_80(),
        )));
        let resolver = CoverageResolver::new(retriever.clone(), interpreter.clone(), ResolverConfig::default());

        let item = ClaimItemBuilder::new().build();
        let coverage = resolver.resolve_coverage(&item, POLICY_ID).await;

        assert_eq!(coverage.coverage_percentage, dec!(80));
        assert_eq!(coverage.deductible, Some(dec!(50)));
        assert_eq!(coverage.policy_section, "1. Leistungen");
        assert_eq!(coverage.policy_reference, PolicyFixtures::outpatient_passage().text);
        assert!(!coverage.source.is_default());

        let queries = retriever.queries().await;
        assert_eq!(
            queries,
            vec!["Coverage for: General consultation\nMedical code: 1\nService type: outpatient medical service"]
        );
        let prompts = interpreter.prompts().await;
        assert!(prompts[0].contains("Section 2:\nSelbstbehalt 50 EUR."));
    }

    #[tokio::test]
    async fn test_long_passage_reference_is_truncated() {
        let text = "Leistungen ".repeat(100);
        let resolver = resolver(
            ScriptedRetriever::returning(vec![PolicyFixtures::passage(&text, "1. Leistungen")]),
            ScriptedInterpreter::always(ReplyFixtures::outpatient_80()),
            ResolverConfig::default(),
        );

        let coverage = resolver.resolve_coverage(&ClaimItemBuilder::new().build(), POLICY_ID).await;
        assert_eq!(coverage.policy_reference.chars().count(), 503);
        assert!(coverage.policy_reference.ends_with("..."));
    }

    #[tokio::test]
    async fn test_untitled_passage_has_unknown_section() {
        let resolver = resolver(
            ScriptedRetriever::returning(vec![domain_policy::PolicyPassage::new("80 % erstattet", 0.2)]),
            ScriptedInterpreter::always(ReplyFixtures::outpatient_80()),
            ResolverConfig::default(),
        );

        let coverage = resolver.resolve_coverage(&ClaimItemBuilder::new().build(), POLICY_ID).await;
        assert_eq!(coverage.policy_section, "Unknown section");
    }

    #[tokio::test]
    async fn test_retrieval_failure_degrades() {
        let resolver = resolver(
            FailingRetriever,
            ScriptedInterpreter::always(ReplyFixtures::outpatient_80()),
            ResolverConfig::default(),
        );
        let coverage = resolver.resolve_coverage(&ClaimItemBuilder::new().build(), POLICY_ID).await;
        assert_default_coverage(&coverage, FallbackReason::RetrievalFailed);
    }

    #[tokio::test]
    async fn test_interpreter_errors_degrade() {
        let cases = [
            (FailingInterpreter::unauthorized(), FallbackReason::InterpretationFailed),
            (FailingInterpreter::rate_limited(), FallbackReason::InterpretationFailed),
            (FailingInterpreter::timed_out(), FallbackReason::InterpretationTimedOut),
        ];

        for (interpreter, reason) in cases {
            let resolver = resolver(
                ScriptedRetriever::returning(vec![PolicyFixtures::outpatient_passage()]),
                interpreter,
                ResolverConfig::default(),
            );
            let coverage = resolver.resolve_coverage(&ClaimItemBuilder::new().build(), POLICY_ID).await;
            assert_default_coverage(&coverage, reason);
        }
    }

    #[tokio::test]
    async fn test_slow_interpreter_times_out() {
        let config = ResolverConfig {
            interpretation_timeout_ms: 20,
            ..ResolverConfig::default()
        };
        let resolver = resolver(
            ScriptedRetriever::returning(vec![PolicyFixtures::outpatient_passage()]),
            SlowInterpreter::new(Duration::from_secs(5), ReplyFixtures::outpatient_80()),
            config,
        );

        let coverage = resolver.resolve_coverage(&ClaimItemBuilder::new().build(), POLICY_ID).await;
        assert_default_coverage(&coverage, FallbackReason::InterpretationTimedOut);
    }

    #[tokio::test]
    async fn test_unparsable_reply_degrades() {
        let resolver = resolver(
            ScriptedRetriever::returning(vec![PolicyFixtures::outpatient_passage()]),
            ScriptedInterpreter::always("I am unable to determine coverage."),
            ResolverConfig::default(),
        );
        let coverage = resolver.resolve_coverage(&ClaimItemBuilder::new().build(), POLICY_ID).await;
        assert_default_coverage(&coverage, FallbackReason::Unparsable);
    }

    #[tokio::test]
    async fn test_configured_default_coverage() {
        let mut config = ResolverConfig::default();
        config.default_coverage.coverage_percentage = dec!(70);
        config.default_coverage.deductible = None;

        let resolver = resolver(ScriptedRetriever::empty(), ScriptedInterpreter::always("{}"), config);
        let coverage = resolver.resolve_coverage(&ClaimItemBuilder::new().build(), POLICY_ID).await;
        assert_eq!(coverage.coverage_percentage, dec!(70));
        assert_eq!(coverage.deductible, None);
        assert_default_coverage(&coverage, FallbackReason::NoPassages);
    }
}

proptest! {
    #[test]
    fn not_covered_pays_nothing(
        item in claim_item_strategy(),
        coverage in coverage_strategy(),
        ledger in ledger_strategy()
    ) {
        let coverage = domain_claims::PolicyCoverage { covered: false, ..coverage };
        let calc = ReimbursementCalculator::default().calculate(&item, &coverage, &ledger);
        prop_assert_eq!(calc.final_amount, Decimal::ZERO);
        prop_assert_eq!(calc.coverage_rate, Decimal::ZERO);
    }

    #[test]
    fn more_deductible_used_never_pays_less(
        item in claim_item_strategy(),
        coverage in coverage_strategy(),
        used_a in cents_strategy(50_000),
        used_b in cents_strategy(50_000),
        paid in cents_strategy(1_000_000)
    ) {
        let (low, high) = if used_a <= used_b { (used_a, used_b) } else { (used_b, used_a) };
        let calculator = ReimbursementCalculator::default();
        let before = calculator.calculate(&item, &coverage, &CustomerLedger::new(low, paid));
        let after = calculator.calculate(&item, &coverage, &CustomerLedger::new(high, paid));

        prop_assert!(after.deductible_applied <= before.deductible_applied);
        prop_assert!(after.final_amount >= before.final_amount);
    }

    #[test]
    fn annual_limit_clamps_to_remaining(
        item in claim_item_strategy(),
        coverage in coverage_strategy(),
        ledger in ledger_strategy(),
        limit in cents_strategy(1_000_000)
    ) {
        prop_assume!(!limit.is_zero());
        let coverage = domain_claims::PolicyCoverage { covered: true, annual_limit: Some(limit), ..coverage };

        let rate = coverage.coverage_percentage / dec!(100);
        let covered = item.amount * rate;
        let remaining_deductible = (coverage.deductible.unwrap_or_default() - ledger.deductible_used_this_year)
            .max(Decimal::ZERO);
        let after_deductible = covered - remaining_deductible.min(covered);
        let remaining_limit = limit - ledger.claims_paid_this_year;

        let calc = ReimbursementCalculator::default().calculate(&item, &coverage, &ledger);
        if remaining_limit < after_deductible {
            prop_assert_eq!(calc.final_amount, remaining_limit.max(Decimal::ZERO));
        }
        prop_assert!(calc.final_amount <= remaining_limit.max(Decimal::ZERO));
    }

    #[test]
    fn calculations_are_rounded_and_stable(
        item in claim_item_strategy(),
        coverage in coverage_strategy(),
        ledger in ledger_strategy()
    ) {
        let calc = ReimbursementCalculator::default().calculate(&item, &coverage, &ledger);
        assert_rounded_to_cents(&calc);
        prop_assert_eq!(calc.rounded(), calc.clone());
        prop_assert_eq!(ReimbursementCalculator::default().calculate(&item, &coverage, &ledger), calc);
    }

    #[test]
    fn totals_are_exact_sums(
        pairs in prop::collection::vec((claim_item_strategy(), coverage_strategy()), 0..8),
        ledger in ledger_strategy()
    ) {
        let calculator = ReimbursementCalculator::default();
        let calculations: Vec<_> = pairs
            .iter()
            .map(|(item, coverage)| calculator.calculate(item, coverage, &ledger))
            .collect();
        let claimed: Decimal = pairs.iter().map(|(item, _)| item.amount).sum();
        let approved: Decimal = calculations.iter().map(|c| c.final_amount).sum();

        let result = ClaimAggregator::default().aggregate(
            POLICY_ID,
            calculations,
            &ledger,
            &[],
            chrono::Utc::now(),
        );
        prop_assert_eq!(result.total_claimed, claimed);
        prop_assert_eq!(result.total_approved, approved);
    }
}
