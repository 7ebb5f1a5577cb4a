//! Ingestion boundary: raw data-store records → validated [`Person`]s.
//!
//! The external store hands back loosely typed JSON: numbers sometimes arrive
//! as strings, the blood type key has two spellings, and the disease flag is
//! a mix of booleans and "yes"/"no" text. All of that is resolved here, once,
//! so nothing downstream re-interprets a raw field.

use serde::{Deserialize, Serialize};

use crate::{
    error::{AllograftError, AllograftResult},
    person::{BloodType, HealthStatus, Organ, Person, PersonId},
};

/// Largest age accepted at ingestion, in years.
pub const MAX_AGE_YEARS: i64 = 150;

/// Which collection a record was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Donor,
    Recipient,
}

/// Knobs for ingestion strictness.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestOptions {
    /// Accept a non-numeric age string as "unknown age" instead of rejecting
    /// the record. Unknown ages contribute nothing to compatibility.
    pub lenient_age: bool,
}

/// A JSON scalar that should hold a number but may arrive as text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawScalar {
    Number(f64),
    Text(String),
}

impl RawScalar {
    fn display(&self) -> String {
        match self {
            RawScalar::Number(n) => n.to_string(),
            RawScalar::Text(s) => s.clone(),
        }
    }
}

/// The record shape produced by the external data store.
///
/// Every field is optional at this layer; [`RawPerson::into_person`] decides
/// which ones are required for the record's role. A stored `urgency` key is
/// ignored: urgency always starts at 0.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPerson {
    pub id: Option<PersonId>,
    pub name: Option<String>,
    pub phone: Option<RawScalar>,
    #[serde(alias = "blood_type")]
    pub blood_type: Option<String>,
    pub age: Option<RawScalar>,
    pub disease: Option<serde_json::Value>,
    pub weight: Option<RawScalar>,
    pub height: Option<RawScalar>,
    pub organ: Option<String>,
}

impl RawPerson {
    /// Validate and convert a single record.
    pub fn into_person(self, role: Role, options: &IngestOptions) -> AllograftResult<Person> {
        let label = match &self.id {
            Some(id) => id.to_string(),
            None => "<missing id>".to_string(),
        };
        self.convert(&label, role, options)
    }

    fn convert(self, label: &str, role: Role, options: &IngestOptions) -> AllograftResult<Person> {
        let id = self
            .id
            .ok_or_else(|| AllograftError::invalid(label, "missing field 'id'"))?;

        let blood_type = required_token(self.blood_type, "bloodType", label)?;
        let organ = required_token(self.organ, "organ", label)?;

        let raw_age = self
            .age
            .ok_or_else(|| AllograftError::invalid(label, "missing field 'age'"))?;
        let age = match parse_age(&raw_age) {
            Some(years) if (0..=MAX_AGE_YEARS).contains(&years) => Some(years),
            Some(years) => {
                return Err(AllograftError::invalid(
                    label,
                    format!("field 'age' must be within 0..={}, got {}", MAX_AGE_YEARS, years),
                ))
            }
            None if options.lenient_age => None,
            None => {
                return Err(AllograftError::invalid(
                    label,
                    format!("field 'age' is not numeric: '{}'", raw_age.display()),
                ))
            }
        };

        let health = match self.disease {
            Some(value) => health_status(&value, label)?,
            None => return Err(AllograftError::invalid(label, "missing field 'disease'")),
        };

        let weight = optional_measure(self.weight, "weight", label)?;
        let height = optional_measure(self.height, "height", label)?;
        if role == Role::Recipient {
            if weight.is_none() {
                return Err(AllograftError::invalid(label, "recipient is missing field 'weight'"));
            }
            if height.is_none() {
                return Err(AllograftError::invalid(label, "recipient is missing field 'height'"));
            }
        }

        Ok(Person {
            id,
            name: self.name.unwrap_or_default(),
            phone: self.phone.map(|p| p.display()).unwrap_or_default(),
            blood_type: BloodType(blood_type),
            age,
            urgency: 0,
            health,
            weight,
            height,
            organ: Organ(organ),
        })
    }
}

/// Convert a whole collection, failing on the first malformed record.
///
/// The error names the record's position in the collection as well as its id.
pub fn ingest_all(
    records: Vec<RawPerson>,
    role: Role,
    options: &IngestOptions,
) -> AllograftResult<Vec<Person>> {
    records
        .into_iter()
        .enumerate()
        .map(|(index, raw)| {
            let label = match &raw.id {
                Some(id) => format!("#{} (id {})", index, id),
                None => format!("#{}", index),
            };
            raw.convert(&label, role, options)
        })
        .collect()
}

/// Parse a JSON array of raw records and ingest it.
pub fn parse_collection(
    json: &str,
    role: Role,
    options: &IngestOptions,
) -> AllograftResult<Vec<Person>> {
    let records: Vec<RawPerson> =
        serde_json::from_str(json).map_err(|e| AllograftError::InvalidInput {
            record: format!("<{:?} collection>", role).to_lowercase(),
            reason: format!("not a JSON array of person records: {}", e),
        })?;
    ingest_all(records, role, options)
}

// ── Field helpers ─────────────────────────────────────────────────────────────

fn required_token(value: Option<String>, field: &str, label: &str) -> AllograftResult<String> {
    match value {
        Some(token) if !token.trim().is_empty() => Ok(token),
        Some(_) => Err(AllograftError::invalid(label, format!("field '{}' is empty", field))),
        None => Err(AllograftError::invalid(label, format!("missing field '{}'", field))),
    }
}

/// Integer-prefix parsing: numbers truncate toward zero; text accepts leading
/// whitespace, an optional sign, then a run of digits ("32 years" → 32).
fn parse_age(raw: &RawScalar) -> Option<i64> {
    match raw {
        RawScalar::Number(n) if n.is_finite() => Some(n.trunc() as i64),
        RawScalar::Number(_) => None,
        RawScalar::Text(text) => parse_leading_int(text),
    }
}

fn parse_leading_int(text: &str) -> Option<i64> {
    let trimmed = text.trim_start();
    let (sign, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (-1, &trimmed[1..]),
        Some(b'+') => (1, &trimmed[1..]),
        _ => (1, trimmed),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    digits[..end].parse::<i64>().ok().map(|n| sign * n)
}

fn optional_measure(
    value: Option<RawScalar>,
    field: &str,
    label: &str,
) -> AllograftResult<Option<f64>> {
    let parsed = match value {
        None => return Ok(None),
        Some(RawScalar::Number(n)) => Some(n),
        Some(RawScalar::Text(text)) => text.trim().parse::<f64>().ok(),
    };
    match parsed {
        Some(n) if n.is_finite() => Ok(Some(n)),
        _ => Err(AllograftError::invalid(
            label,
            format!("field '{}' is not a finite number", field),
        )),
    }
}

const NEGATIVE_TOKENS: [&str; 6] = ["", "no", "none", "false", "0", "n"];

fn health_status(value: &serde_json::Value, label: &str) -> AllograftResult<HealthStatus> {
    match value {
        serde_json::Value::Bool(true) => Ok(HealthStatus::Diseased),
        serde_json::Value::Bool(false) => Ok(HealthStatus::Healthy),
        serde_json::Value::String(s) => {
            let token = s.trim().to_lowercase();
            if NEGATIVE_TOKENS.contains(&token.as_str()) {
                Ok(HealthStatus::Healthy)
            } else {
                Ok(HealthStatus::Diseased)
            }
        }
        other => Err(AllograftError::invalid(
            label,
            format!("field 'disease' must be a boolean or text, got {}", other),
        )),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn raw(value: serde_json::Value) -> RawPerson {
        serde_json::from_value(value).unwrap()
    }

    fn recipient_json() -> serde_json::Value {
        json!({
            "id": 10,
            "name": "R. Okafor",
            "phone": 5550101,
            "bloodType": "A",
            "age": "32",
            "disease": "no",
            "weight": "70",
            "height": 1.75,
            "organ": "Kidney"
        })
    }

    #[test]
    fn recipient_with_string_numbers_is_ingested() {
        let person = raw(recipient_json())
            .into_person(Role::Recipient, &IngestOptions::default())
            .unwrap();

        assert_eq!(person.id, PersonId::Number(10));
        assert_eq!(person.age, Some(32));
        assert_eq!(person.weight, Some(70.0));
        assert_eq!(person.height, Some(1.75));
        assert_eq!(person.phone, "5550101");
        assert_eq!(person.health, HealthStatus::Healthy);
        assert_eq!(person.urgency, 0);
    }

    #[test]
    fn snake_case_blood_type_key_is_accepted() {
        let person = raw(json!({
            "id": "d-1", "blood_type": "O", "age": 30, "disease": "no", "organ": "Kidney"
        }))
        .into_person(Role::Donor, &IngestOptions::default())
        .unwrap();
        assert_eq!(person.blood_type.as_str(), "O");
        assert_eq!(person.id, PersonId::Text("d-1".to_string()));
    }

    #[test]
    fn stored_urgency_is_reset_to_zero() {
        let mut value = recipient_json();
        value["urgency"] = json!(42);
        let person = raw(value)
            .into_person(Role::Recipient, &IngestOptions::default())
            .unwrap();
        assert_eq!(person.urgency, 0);
    }

    #[test]
    fn age_uses_integer_prefix() {
        assert_eq!(parse_leading_int("32 years"), Some(32));
        assert_eq!(parse_leading_int("  -4"), Some(-4));
        assert_eq!(parse_leading_int("32.9"), Some(32));
        assert_eq!(parse_leading_int("abc"), None);
        assert_eq!(parse_leading_int(""), None);
        assert_eq!(parse_age(&RawScalar::Number(45.8)), Some(45));
    }

    #[test]
    fn out_of_range_age_is_rejected() {
        for age in [json!("  -4"), json!("9223372036854775807"), json!(1e300), json!(151)] {
            let mut value = recipient_json();
            value["age"] = age.clone();
            let lenient = IngestOptions { lenient_age: true };
            match raw(value).into_person(Role::Recipient, &lenient) {
                Err(AllograftError::InvalidInput { reason, .. }) => {
                    assert!(reason.contains("0..=150"), "age {age}: {reason}");
                }
                other => panic!("age {age}: expected InvalidInput, got {:?}", other),
            }
        }

        let mut value = recipient_json();
        value["age"] = json!(150);
        let person = raw(value)
            .into_person(Role::Recipient, &IngestOptions::default())
            .unwrap();
        assert_eq!(person.age, Some(150));
    }

    #[test]
    fn non_numeric_age_is_rejected_by_default() {
        let mut value = recipient_json();
        value["age"] = json!("unknown");
        let err = raw(value)
            .into_person(Role::Recipient, &IngestOptions::default())
            .unwrap_err();
        match err {
            AllograftError::InvalidInput { record, reason } => {
                assert_eq!(record, "10");
                assert!(reason.contains("age"), "unexpected reason: {reason}");
            }
            other => panic!("expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn non_numeric_age_is_unknown_when_lenient() {
        let mut value = recipient_json();
        value["age"] = json!("unknown");
        let options = IngestOptions { lenient_age: true };
        let person = raw(value).into_person(Role::Recipient, &options).unwrap();
        assert_eq!(person.age, None);
    }

    #[test]
    fn recipient_requires_body_measurements() {
        let mut value = recipient_json();
        value.as_object_mut().unwrap().remove("height");
        let err = raw(value)
            .into_person(Role::Recipient, &IngestOptions::default())
            .unwrap_err();
        assert!(err.to_string().contains("height"));
    }

    #[test]
    fn donor_may_omit_body_measurements() {
        let person = raw(json!({
            "id": 1, "bloodType": "O", "age": 30, "disease": "no", "organ": "Kidney"
        }))
        .into_person(Role::Donor, &IngestOptions::default())
        .unwrap();
        assert_eq!(person.weight, None);
        assert_eq!(person.height, None);
    }

    #[test]
    fn unparseable_weight_is_rejected() {
        let mut value = recipient_json();
        value["weight"] = json!("heavy");
        let err = raw(value)
            .into_person(Role::Recipient, &IngestOptions::default())
            .unwrap_err();
        assert!(matches!(err, AllograftError::InvalidInput { .. }));
    }

    #[test]
    fn disease_flag_is_normalised_once() {
        let cases = [
            (json!("no"), HealthStatus::Healthy),
            (json!("No"), HealthStatus::Healthy),
            (json!(""), HealthStatus::Healthy),
            (json!(false), HealthStatus::Healthy),
            (json!("yes"), HealthStatus::Diseased),
            (json!("diabetes"), HealthStatus::Diseased),
            (json!(true), HealthStatus::Diseased),
        ];
        for (flag, expected) in cases {
            assert_eq!(health_status(&flag, "t").unwrap(), expected, "flag {flag}");
        }
        assert!(health_status(&json!(1), "t").is_err());
    }

    #[test]
    fn missing_disease_flag_is_rejected() {
        let mut value = recipient_json();
        value.as_object_mut().unwrap().remove("disease");
        assert!(raw(value)
            .into_person(Role::Recipient, &IngestOptions::default())
            .is_err());
    }

    #[test]
    fn ingest_all_names_the_failing_position() {
        let records = vec![
            raw(recipient_json()),
            raw(json!({ "id": 11, "bloodType": "B", "age": 40, "disease": "no", "organ": "Liver" })),
        ];
        let err = ingest_all(records, Role::Recipient, &IngestOptions::default()).unwrap_err();
        match err {
            AllograftError::InvalidInput { record, .. } => assert_eq!(record, "#1 (id 11)"),
            other => panic!("expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn parse_collection_rejects_non_array() {
        let err = parse_collection("{\"id\": 1}", Role::Donor, &IngestOptions::default())
            .unwrap_err();
        assert!(err.to_string().contains("donor collection"));
    }
}
