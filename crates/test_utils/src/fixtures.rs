//! Pre-built Test Fixtures
//!
//! Ready-to-use extraction outputs, ledgers, policy pages and interpreter
//! replies. Amounts follow the reference claim used across the suite: a
//! €85.00 consultation and a €45.50 blood test under an 80% tariff with a
//! €50 annual deductible.

use domain_claims::CustomerLedger;
use domain_policy::{PolicyPage, PolicyPassage, SECTION_TITLE_KEY};
use rust_decimal_macros::dec;
use serde_json::{json, Value};

/// Policy id used by fixtures
pub const POLICY_ID: &str = "NK_SELECT_S";

/// Fixture for document extraction output
pub struct ExtractionFixtures;

impl ExtractionFixtures {
    /// Medical invoice with a consultation and a blood test
    pub fn medical_invoice() -> Value {
        json!({
            "providerInformation": {"name": "Dr. med. Anna Müller"},
            "servicesRendered": [
                {
                    "serviceDescription": "General consultation",
                    "procedureCode": "1",
                    "totalPrice": 85.00,
                    "dateOfService": "2024-03-15",
                    "quantity": 1
                },
                {
                    "serviceDescription": "Blood test",
                    "procedureCode": "250",
                    "totalPrice": 45.50,
                    "dateOfService": "2024-03-15",
                    "quantity": 1
                }
            ]
        })
    }

    /// Single consultation invoice
    pub fn consultation_invoice() -> Value {
        json!({
            "providerInformation": {"name": "Dr. med. Anna Müller"},
            "servicesRendered": [
                {"serviceDescription": "General consultation", "procedureCode": "1", "totalPrice": 85.00}
            ]
        })
    }

    /// Legacy invoice shape with a document level service date
    pub fn legacy_invoice() -> Value {
        json!({
            "provider": {"name": "Praxis am Markt"},
            "service_date": "2024-02-01",
            "services": [
                {"description": "Physiotherapy", "code": "X1", "total_price": 60.00},
                {"description": "Massage", "code": "X2", "total_price": 30.00}
            ]
        })
    }

    /// Prescription with one medication
    pub fn prescription() -> Value {
        json!({
            "pharmacy": {"name": "Stadt-Apotheke"},
            "prescription_date": "2024-04-02",
            "medications": [
                {"name": "Ibuprofen 400", "pzn": "01234567", "price": 12.40}
            ]
        })
    }

    /// Document with none of the recognised item lists
    pub fn unstructured_document() -> Value {
        json!({"description": "Dental cleaning", "date": "2024-05-10"})
    }
}

/// Fixture for customer ledgers
pub struct LedgerFixtures;

impl LedgerFixtures {
    /// Nothing used this year
    pub fn fresh() -> CustomerLedger {
        CustomerLedger::default()
    }

    /// Half of a €50 deductible already used
    pub fn deductible_half_used() -> CustomerLedger {
        CustomerLedger::new(dec!(25), dec!(0))
    }

    /// €4,900 already paid this year
    pub fn near_annual_limit() -> CustomerLedger {
        CustomerLedger::new(dec!(0), dec!(4900))
    }
}

/// Fixture for policy documents and passages
pub struct PolicyFixtures;

impl PolicyFixtures {
    /// Three pages of an outpatient tariff
    pub fn tariff_pages() -> Vec<PolicyPage> {
        vec![
            PolicyPage::new(
                1,
                "Allgemeine Versicherungsbedingungen\n\
                 1. Leistungen\n\
                 Ambulante Heilbehandlung (consultation) wird zu 80 % ersetzt.\n\
                 Laboruntersuchungen (blood test) werden zu 80 % ersetzt.",
            ),
            PolicyPage::new(
                2,
                "2. Selbstbehalt\n\
                 Pro Kalenderjahr traegt der Versicherte 50 EUR selbst.\n\
                 3. Ausschlüsse\n\
                 Kosmetische Behandlungen sind ausgeschlossen.",
            ),
            PolicyPage::new(3, "4 Beitragszahlung\nMonatlich im Voraus."),
        ]
    }

    /// A passage with a section title
    pub fn passage(text: &str, section_title: &str) -> PolicyPassage {
        PolicyPassage::new(text, 0.1).with_metadata(SECTION_TITLE_KEY, section_title)
    }

    /// The outpatient coverage passage
    pub fn outpatient_passage() -> PolicyPassage {
        Self::passage(
            "Ambulante Heilbehandlung wird zu 80 % ersetzt. Selbstbehalt 50 EUR pro Kalenderjahr.",
            "1. Leistungen",
        )
    }
}

/// Fixture for interpreter replies
pub struct ReplyFixtures;

impl ReplyFixtures {
    /// 80% with a €50 deductible and no limit
    pub fn outpatient_80() -> String {
        json!({
            "coverage_percentage": 80,
            "deductible": 50,
            "annual_limit": null,
            "conditions": [],
            "exclusions": [],
            "covered": true,
            "reason": "Outpatient treatment is covered"
        })
        .to_string()
    }

    /// Full coverage capped at €5,000 a year
    pub fn capped_100() -> String {
        json!({
            "coverage_percentage": 100,
            "deductible": 0,
            "annual_limit": {"amount": 5000},
            "conditions": ["Referral required"],
            "covered": true,
            "reason": "Covered up to the annual maximum"
        })
        .to_string()
    }

    /// Explicit exclusion
    pub fn excluded(reason: &str) -> String {
        json!({"covered": false, "coverage_percentage": 0, "reason": reason}).to_string()
    }

    /// The reply wrapped in prose and a code fence
    pub fn chatty(reply: &str) -> String {
        format!("Sure! Here is the assessment:\n```json\n{reply}\n```\nLet me know if you need more.")
    }
}
