//! Claim item extraction
//!
//! Turns the loosely typed output of document extraction into claim items.
//! The document shape is decided once, by key presence in this order:
//!
//! 1. `servicesRendered` - medical invoice with camelCase fields
//! 2. `services` - legacy invoice with snake_case fields
//! 3. `medications` - prescription
//! 4. anything else - one item built from document level fields

use rust_decimal::Decimal;
use serde_json::{Map, Value};
use tracing::debug;

use crate::claim_item::ClaimItem;
use crate::coercion::{coerce_amount, coerce_integer, string_list, text_of};
use crate::error::ClaimError;

const UNKNOWN_SERVICE: &str = "Unknown service";
const UNKNOWN_MEDICATION: &str = "Unknown medication";
const FALLBACK_DESCRIPTION: &str = "Medical service";
const UNKNOWN_PROVIDER: &str = "Unknown";

/// One line of an invoice, camelCase or snake_case
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceLine {
    pub description: Option<String>,
    pub code: Option<String>,
    pub amount: Decimal,
    pub date: Option<String>,
    pub quantity: Option<i64>,
}

/// One line of a prescription
#[derive(Debug, Clone, PartialEq)]
pub struct MedicationLine {
    pub name: Option<String>,
    pub pzn: Option<String>,
    pub price: Decimal,
    pub quantity: Option<i64>,
}

/// The recognised shape of an extracted document
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractedShape {
    ServicesRendered {
        provider: Option<String>,
        services: Vec<ServiceLine>,
    },
    LegacyServices {
        provider: Option<String>,
        service_date: Option<String>,
        services: Vec<ServiceLine>,
    },
    Medications {
        pharmacy: Option<String>,
        prescription_date: Option<String>,
        medications: Vec<MedicationLine>,
    },
    Fallback {
        description: Option<String>,
        total_amount: Decimal,
        date: Option<String>,
        provider: Option<String>,
    },
}

/// Extraction output resolved into a typed shape
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedDocument {
    pub shape: ExtractedShape,
    /// Fields the extraction step could not find
    pub missing_fields: Vec<String>,
}

impl ExtractedDocument {
    /// Resolves the shape of an extracted document
    ///
    /// Never fails: a non-object value is treated as an empty document and
    /// yields the fallback shape.
    pub fn from_value(data: &Value) -> Self {
        let empty = Map::new();
        let fields = data.as_object().unwrap_or(&empty);

        let shape = if fields.contains_key("servicesRendered") {
            ExtractedShape::ServicesRendered {
                provider: nested_name(fields.get("providerInformation")),
                services: entries(fields.get("servicesRendered"))
                    .map(|entry| ServiceLine {
                        description: text_of(entry.get("serviceDescription")),
                        code: text_of(entry.get("procedureCode")),
                        amount: coerce_amount(entry.get("totalPrice")),
                        date: text_of(entry.get("dateOfService")),
                        quantity: coerce_integer(entry.get("quantity")),
                    })
                    .collect(),
            }
        } else if fields.contains_key("services") {
            ExtractedShape::LegacyServices {
                provider: provider_name(fields.get("provider")),
                service_date: text_of(fields.get("service_date")),
                services: entries(fields.get("services"))
                    .map(|entry| ServiceLine {
                        description: text_of(entry.get("description")),
                        code: text_of(entry.get("code")),
                        amount: coerce_amount(entry.get("total_price")),
                        date: text_of(entry.get("date")),
                        quantity: coerce_integer(entry.get("quantity")),
                    })
                    .collect(),
            }
        } else if fields.contains_key("medications") {
            ExtractedShape::Medications {
                pharmacy: nested_name(fields.get("pharmacy")),
                prescription_date: text_of(fields.get("prescription_date")),
                medications: entries(fields.get("medications"))
                    .map(|entry| MedicationLine {
                        name: text_of(entry.get("name")),
                        pzn: text_of(entry.get("pzn")),
                        price: coerce_amount(entry.get("price")),
                        quantity: coerce_integer(entry.get("quantity")),
                    })
                    .collect(),
            }
        } else {
            ExtractedShape::Fallback {
                description: text_of(fields.get("description")),
                total_amount: coerce_amount(fields.get("total_amount")),
                date: text_of(fields.get("date")),
                provider: provider_name(fields.get("provider")),
            }
        };

        Self {
            shape,
            missing_fields: string_list(fields.get("missing_fields")),
        }
    }

    /// Builds the claim items of this document, in document order
    ///
    /// # Errors
    ///
    /// Returns `ClaimError::Validation` when a line states a quantity
    /// below 1. Absent or unparsable quantities count as 1.
    pub fn claim_items(&self) -> Result<Vec<ClaimItem>, ClaimError> {
        match &self.shape {
            ExtractedShape::ServicesRendered { provider, services } => services
                .iter()
                .map(|line| service_item(line, None, provider.clone()))
                .collect(),
            ExtractedShape::LegacyServices {
                provider,
                service_date,
                services,
            } => services
                .iter()
                .map(|line| service_item(line, service_date.as_deref(), provider.clone()))
                .collect(),
            ExtractedShape::Medications {
                pharmacy,
                prescription_date,
                medications,
            } => medications
                .iter()
                .map(|line| {
                    let name = line.name.clone().unwrap_or_else(|| UNKNOWN_MEDICATION.to_string());
                    ClaimItem {
                        quantity: quantity(line.quantity, &name)?,
                        description: name,
                        code: line.pzn.clone(),
                        amount: line.price,
                        date: prescription_date.clone().unwrap_or_default(),
                        provider: pharmacy.clone(),
                    }
                    .validated()
                })
                .collect(),
            ExtractedShape::Fallback {
                description,
                total_amount,
                date,
                provider,
            } => Ok(vec![ClaimItem {
                description: description
                    .clone()
                    .unwrap_or_else(|| FALLBACK_DESCRIPTION.to_string()),
                code: None,
                amount: *total_amount,
                date: date.clone().unwrap_or_default(),
                provider: Some(provider.clone().unwrap_or_else(|| UNKNOWN_PROVIDER.to_string())),
                quantity: 1,
            }]),
        }
    }
}

/// Extracts claim items from raw extraction output
///
/// Shorthand for [`ExtractedDocument::from_value`] followed by
/// [`ExtractedDocument::claim_items`].
pub fn extract_claim_items(data: &Value) -> Result<Vec<ClaimItem>, ClaimError> {
    ExtractedDocument::from_value(data).claim_items()
}

fn service_item(
    line: &ServiceLine,
    default_date: Option<&str>,
    provider: Option<String>,
) -> Result<ClaimItem, ClaimError> {
    let description = line
        .description
        .clone()
        .unwrap_or_else(|| UNKNOWN_SERVICE.to_string());
    ClaimItem {
        quantity: quantity(line.quantity, &description)?,
        description,
        code: line.code.clone(),
        amount: line.amount,
        date: line
            .date
            .clone()
            .or_else(|| default_date.map(str::to_string))
            .unwrap_or_default(),
        provider,
    }
    .validated()
}

fn quantity(raw: Option<i64>, description: &str) -> Result<u32, ClaimError> {
    match raw {
        None => {
            debug!(item = description, "Quantity absent, assuming 1");
            Ok(1)
        }
        Some(q) => u32::try_from(q).map_err(|_| {
            ClaimError::validation(format!(
                "{description}: quantity must be at least 1, got {q}"
            ))
        }),
    }
}

/// Array entries; `Value::get` on a non-object entry yields nothing
fn entries(value: Option<&Value>) -> impl Iterator<Item = &Value> {
    value.and_then(Value::as_array).into_iter().flatten()
}

fn nested_name(value: Option<&Value>) -> Option<String> {
    text_of(value?.get("name"))
}

/// Provider given either as a `{"name": ..}` block or as plain text
fn provider_name(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::Object(_)) => nested_name(value),
        other => text_of(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_services_rendered_shape() {
        let data = json!({
            "providerInformation": {"name": "Dr. Müller"},
            "servicesRendered": [
                {"serviceDescription": "General consultation", "procedureCode": "1", "totalPrice": 85.0, "dateOfService": "2024-03-15"},
                {"serviceDescription": "Blood test", "procedureCode": 250, "totalPrice": "45.50", "quantity": 2}
            ]
        });

        let items = extract_claim_items(&data).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].description, "General consultation");
        assert_eq!(items[0].amount, dec!(85));
        assert_eq!(items[0].date, "2024-03-15");
        assert_eq!(items[0].provider.as_deref(), Some("Dr. Müller"));
        assert_eq!(items[1].code.as_deref(), Some("250"));
        assert_eq!(items[1].amount, dec!(45.50));
        assert_eq!(items[1].quantity, 2);
        assert_eq!(items[1].date, "");
    }

    #[test]
    fn test_services_rendered_wins_over_medications() {
        let data = json!({
            "servicesRendered": [{"serviceDescription": "X-ray", "totalPrice": 60}],
            "medications": [{"name": "Ibuprofen", "price": 5}]
        });
        let items = extract_claim_items(&data).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].description, "X-ray");
    }

    #[test]
    fn test_legacy_services_use_document_date() {
        let data = json!({
            "provider": {"name": "Praxis Nord"},
            "service_date": "2024-02-01",
            "services": [
                {"description": "Consultation", "code": "03000", "total_price": 40},
                {"code": "03001", "total_price": 10, "date": "2024-02-03"}
            ]
        });
        let items = extract_claim_items(&data).unwrap();
        assert_eq!(items[0].date, "2024-02-01");
        assert_eq!(items[0].provider.as_deref(), Some("Praxis Nord"));
        assert_eq!(items[1].description, "Unknown service");
        assert_eq!(items[1].date, "2024-02-03");
    }

    #[test]
    fn test_medications_shape() {
        let data = json!({
            "pharmacy": {"name": "Stadt-Apotheke"},
            "prescription_date": "2024-04-02",
            "medications": [{"pzn": 1234567, "price": "12,40"}]
        });
        let items = extract_claim_items(&data).unwrap();
        assert_eq!(items[0].description, "Unknown medication");
        assert_eq!(items[0].code.as_deref(), Some("1234567"));
        assert_eq!(items[0].amount, dec!(12.40));
        assert_eq!(items[0].provider.as_deref(), Some("Stadt-Apotheke"));
        assert_eq!(items[0].date, "2024-04-02");
    }

    #[test]
    fn test_fallback_shape() {
        let items = extract_claim_items(&json!({})).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].description, "Medical service");
        assert_eq!(items[0].amount, Decimal::ZERO);
        assert_eq!(items[0].provider.as_deref(), Some("Unknown"));

        let items = extract_claim_items(&json!({"description": "Physio", "total_amount": 120})).unwrap();
        assert_eq!(items[0].description, "Physio");
        assert_eq!(items[0].amount, dec!(120));
    }

    #[test]
    fn test_non_object_entries_read_as_empty() {
        let data = json!({"servicesRendered": ["garbage", 42]});
        let items = extract_claim_items(&data).unwrap();
        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|i| i.description == "Unknown service" && i.amount.is_zero()));
    }

    #[test]
    fn test_unparsable_amount_is_zero() {
        let data = json!({"servicesRendered": [{"serviceDescription": "Visit", "totalPrice": "see attachment"}]});
        assert_eq!(extract_claim_items(&data).unwrap()[0].amount, Decimal::ZERO);
    }

    #[test]
    fn test_quantity_below_one_is_rejected() {
        let zero = json!({"servicesRendered": [{"serviceDescription": "Visit", "totalPrice": 10, "quantity": 0}]});
        assert!(matches!(extract_claim_items(&zero), Err(ClaimError::Validation(_))));

        let negative = json!({"medications": [{"name": "Aspirin", "price": 3, "quantity": -1}]});
        assert!(matches!(extract_claim_items(&negative), Err(ClaimError::Validation(_))));
    }

    #[test]
    fn test_missing_fields_are_carried() {
        let doc = ExtractedDocument::from_value(&json!({"missing_fields": ["patient_name", "diagnosis"]}));
        assert_eq!(doc.missing_fields, vec!["patient_name", "diagnosis"]);
    }
}
