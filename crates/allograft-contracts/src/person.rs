//! Validated donor and recipient records.
//!
//! Donors and recipients share one shape; the role is determined by which
//! collection a record arrives in. Values here have already passed ingestion
//! (see [`crate::ingest`]), so scoring code never re-interprets raw fields.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque record identifier, unique within its role's collection.
///
/// The external data store hands out either integers or strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PersonId {
    Number(i64),
    Text(String),
}

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersonId::Number(n) => write!(f, "{}", n),
            PersonId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for PersonId {
    fn from(n: i64) -> Self {
        PersonId::Number(n)
    }
}

impl From<i32> for PersonId {
    fn from(n: i32) -> Self {
        PersonId::Number(n.into())
    }
}

impl From<&str> for PersonId {
    fn from(s: &str) -> Self {
        PersonId::Text(s.to_string())
    }
}

/// Blood type token. Compared case-sensitively and exactly ("O", "A", "AB").
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BloodType(pub String);

impl BloodType {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BloodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Organ type token, needed by a recipient or offered by a donor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Organ(pub String);

impl Organ {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Organ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Chronic-illness status, translated once from the raw `disease` field.
///
/// For donors `Diseased` means ineligible; for recipients it lowers urgency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Diseased,
}

impl HealthStatus {
    pub fn is_diseased(self) -> bool {
        matches!(self, HealthStatus::Diseased)
    }
}

/// A validated donor or recipient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub id: PersonId,
    /// Display only.
    #[serde(default)]
    pub name: String,
    /// Display only.
    #[serde(default)]
    pub phone: String,
    pub blood_type: BloodType,
    /// Whole years. `None` only when ingested leniently from non-numeric text.
    pub age: Option<i64>,
    /// Recipient priority. Starts at the ingested value (normally 0) and is
    /// only ever raised on scored copies, never on caller-owned records.
    #[serde(default)]
    pub urgency: i32,
    pub health: HealthStatus,
    /// Kilograms. Required for recipients.
    pub weight: Option<f64>,
    /// Meters. Required for recipients.
    pub height: Option<f64>,
    pub organ: Organ,
}

impl Person {
    /// Minimal constructor used by fixtures and mock data; display fields
    /// are left empty and urgency starts at 0.
    pub fn new(
        id: impl Into<PersonId>,
        blood_type: &str,
        organ: &str,
        age: i64,
        health: HealthStatus,
    ) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            phone: String::new(),
            blood_type: BloodType::new(blood_type),
            age: Some(age),
            urgency: 0,
            health,
            weight: None,
            height: None,
            organ: Organ::new(organ),
        }
    }

    /// Attach body measurements (kilograms, meters).
    pub fn with_body(mut self, weight: f64, height: f64) -> Self {
        self.weight = Some(weight);
        self.height = Some(height);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}
