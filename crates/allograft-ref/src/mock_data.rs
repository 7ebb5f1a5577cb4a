//! Simulated registry data for the allograft reference runtime.
//!
//! All data in this module is hardcoded and fictional. The JSON mirrors what
//! the external data store hands back: ages and weights sometimes arrive as
//! strings, the disease flag mixes text and booleans, and one donor uses the
//! legacy `blood_type` key.

use serde_json::{json, Value};
use tracing::debug;

use allograft_contracts::{
    error::{AllograftError, AllograftResult},
    ingest::{ingest_all, IngestOptions, RawPerson, Role},
    person::{HealthStatus, Person, PersonId},
};

// ── Registry (mock) ───────────────────────────────────────────────────────────

/// Six registered donors. Donor 3 carries a chronic illness and is ineligible.
pub fn donor_registry() -> Value {
    json!([
        { "id": 1, "name": "D. Lindqvist", "phone": "555-0101", "bloodType": "O",
          "age": "30", "disease": "no", "organ": "Kidney" },
        { "id": 2, "name": "M. Haddad", "phone": "555-0102", "bloodType": "A",
          "age": 52, "disease": "no", "organ": "Kidney" },
        { "id": 3, "name": "S. Park", "phone": "555-0103", "bloodType": "B",
          "age": 41, "disease": "yes", "organ": "Liver" },
        { "id": 4, "name": "T. Mensah", "phone": "555-0104", "bloodType": "AB",
          "age": 35, "disease": false, "organ": "Heart" },
        { "id": 5, "name": "E. Rossi", "phone": "555-0105", "blood_type": "O",
          "age": 60, "disease": "no", "organ": "Liver" },
        { "id": 6, "name": "H. Varga", "phone": "555-0106", "bloodType": "A",
          "age": 44, "disease": "no", "organ": "Heart" }
    ])
}

/// Six waiting recipients. Heights are in meters, weights in kilograms.
pub fn recipient_waitlist() -> Value {
    json!([
        { "id": 10, "name": "R. Okafor", "phone": "555-0110", "bloodType": "A",
          "age": 32, "disease": "no", "weight": "70", "height": 1.75, "organ": "Kidney" },
        { "id": 11, "name": "J. Novak", "phone": "555-0111", "bloodType": "A",
          "age": 55, "disease": "no", "weight": 95, "height": 1.80, "organ": "Kidney" },
        { "id": 12, "name": "L. Chen", "phone": "555-0112", "bloodType": "B",
          "age": 47, "disease": "yes", "weight": 58, "height": 1.62, "organ": "Heart" },
        { "id": 13, "name": "P. Alvarez", "phone": "555-0113", "bloodType": "B",
          "age": 38, "disease": "no", "weight": 110, "height": "1.70", "organ": "Liver" },
        { "id": 14, "name": "K. Ito", "phone": "555-0114", "bloodType": "AB",
          "age": 29, "disease": "no", "weight": 50, "height": 1.72, "organ": "Heart" },
        { "id": 15, "name": "F. Moreau", "phone": "555-0115", "bloodType": "O",
          "age": 61, "disease": "no", "weight": 80, "height": 1.78, "organ": "Lung" }
    ])
}

/// Ingest a JSON array of raw records for `role`.
pub fn load(value: Value, role: Role, options: &IngestOptions) -> AllograftResult<Vec<Person>> {
    let records: Vec<RawPerson> =
        serde_json::from_value(value).map_err(|e| AllograftError::InvalidInput {
            record: "<mock registry>".to_string(),
            reason: format!("mock data does not match the record shape: {}", e),
        })?;
    let people = ingest_all(records, role, options)?;
    debug!(role = ?role, count = people.len(), "mock records ingested");
    Ok(people)
}

// ── Synthetic cohort ──────────────────────────────────────────────────────────

const BLOOD_TYPES: [&str; 4] = ["O", "A", "B", "AB"];
const ORGANS: [&str; 4] = ["Kidney", "Liver", "Heart", "Lung"];

/// Deterministic donor and recipient collections of the requested sizes.
///
/// Donor ids start at 1000, recipient ids at 5000. Roughly one donor in nine
/// and one recipient in six is disease-flagged.
pub fn synthetic_cohort(donors: usize, recipients: usize) -> (Vec<Person>, Vec<Person>) {
    let donor_list = (0..donors)
        .map(|i| {
            let health = if i % 9 == 4 {
                HealthStatus::Diseased
            } else {
                HealthStatus::Healthy
            };
            Person::new(
                PersonId::Number(1000 + i as i64),
                BLOOD_TYPES[(i * 7) % 4],
                ORGANS[(i * 3) % 4],
                18 + ((i * 13) % 60) as i64,
                health,
            )
        })
        .collect();

    let recipient_list = (0..recipients)
        .map(|j| {
            let health = if j % 6 == 1 {
                HealthStatus::Diseased
            } else {
                HealthStatus::Healthy
            };
            let weight = 45.0 + ((j * 17) % 70) as f64;
            let height = 1.50 + ((j * 7) % 45) as f64 / 100.0;
            Person::new(
                PersonId::Number(5000 + j as i64),
                BLOOD_TYPES[(j * 5 + 1) % 4],
                ORGANS[(j * 11) % 4],
                10 + ((j * 19) % 65) as i64,
                health,
            )
            .with_body(weight, height)
        })
        .collect();

    (donor_list, recipient_list)
}
