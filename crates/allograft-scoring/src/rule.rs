//! Scoring rule types and configuration schema.
//!
//! A `ScoringConfig` is deserialized from TOML. Every field has a default, so
//! an empty document yields the stock rules:
//!
//! - BMI bands `[18.5, 24.9] → 8`, `[25.0, 29.9] → 7`, `≤ 18.5 → 5`, else `2`
//! - disease penalty `5`
//! - age impact `max(0, 5 − |Δage| / 10)`
//! - blood type: same `4`, universal donor `2`, otherwise `0`
//! - final compatibility clamped to `[0, 10]`

use serde::{Deserialize, Serialize};

use allograft_contracts::{
    error::{AllograftError, AllograftResult},
    ingest::IngestOptions,
    person::BloodType,
};

/// One BMI scoring band. Bounds are inclusive; an omitted bound is open.
///
/// Example in TOML:
/// ```toml
/// [[urgency.bmi_bands]]
/// min = 18.5
/// max = 24.9
/// score = 8
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BmiBand {
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
    pub score: i32,
}

impl BmiBand {
    pub fn contains(&self, bmi: f64) -> bool {
        let above_min = self.min.map_or(true, |min| bmi >= min);
        let below_max = self.max.map_or(true, |max| bmi <= max);
        above_min && below_max
    }
}

/// Recipient urgency rules.
///
/// Bands are tested in declaration order; the first band containing the BMI
/// wins. A BMI no band contains scores `fallback_score`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UrgencyRules {
    pub bmi_bands: Vec<BmiBand>,
    pub fallback_score: i32,
    /// Subtracted when the recipient carries a chronic illness.
    pub disease_penalty: i32,
}

impl Default for UrgencyRules {
    fn default() -> Self {
        Self {
            bmi_bands: vec![
                BmiBand { min: Some(18.5), max: Some(24.9), score: 8 },
                BmiBand { min: Some(25.0), max: Some(29.9), score: 7 },
                BmiBand { min: None, max: Some(18.5), score: 5 },
            ],
            fallback_score: 2,
            disease_penalty: 5,
        }
    }
}

/// Donor/recipient compatibility rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompatibilityRules {
    /// Age impact for identical ages.
    pub age_max_impact: f64,
    /// Years of age difference that cost one point of age impact.
    pub age_decade: f64,
    pub same_blood_type: f64,
    /// Awarded when the donor is the universal type but not the recipient's.
    pub universal_donor: f64,
    pub universal_blood_type: BloodType,
    pub min_score: f64,
    pub max_score: f64,
}

impl Default for CompatibilityRules {
    fn default() -> Self {
        Self {
            age_max_impact: 5.0,
            age_decade: 10.0,
            same_blood_type: 4.0,
            universal_donor: 2.0,
            universal_blood_type: BloodType::new("O"),
            min_score: 0.0,
            max_score: 10.0,
        }
    }
}

/// The top-level structure deserialized from a scoring TOML file.
///
/// Example:
/// ```toml
/// [urgency]
/// disease_penalty = 5
///
/// [compatibility]
/// universal_blood_type = "O"
///
/// [ingest]
/// lenient_age = false
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub urgency: UrgencyRules,
    pub compatibility: CompatibilityRules,
    pub ingest: IngestOptions,
}

impl ScoringConfig {
    /// Reject configurations that would make scores undefined or unbounded.
    pub fn validate(&self) -> AllograftResult<()> {
        for (idx, band) in self.urgency.bmi_bands.iter().enumerate() {
            if let (Some(min), Some(max)) = (band.min, band.max) {
                if min > max {
                    return Err(config_error(format!(
                        "urgency.bmi_bands[{}] has min {} above max {}",
                        idx, min, max
                    )));
                }
            }
            let bounds_finite = band.min.map_or(true, f64::is_finite)
                && band.max.map_or(true, f64::is_finite);
            if !bounds_finite {
                return Err(config_error(format!(
                    "urgency.bmi_bands[{}] has a non-finite bound",
                    idx
                )));
            }
        }

        if self.urgency.disease_penalty < 0 {
            return Err(config_error(format!(
                "urgency.disease_penalty must not be negative, got {}",
                self.urgency.disease_penalty
            )));
        }

        let c = &self.compatibility;
        let weights = [
            ("age_max_impact", c.age_max_impact),
            ("age_decade", c.age_decade),
            ("same_blood_type", c.same_blood_type),
            ("universal_donor", c.universal_donor),
            ("min_score", c.min_score),
            ("max_score", c.max_score),
        ];
        if let Some((name, _)) = weights.iter().find(|(_, v)| !v.is_finite()) {
            return Err(config_error(format!("compatibility.{} must be finite", name)));
        }
        if c.age_decade <= 0.0 {
            return Err(config_error("compatibility.age_decade must be positive"));
        }
        if c.max_score < c.min_score {
            return Err(config_error(format!(
                "compatibility.max_score {} is below min_score {}",
                c.max_score, c.min_score
            )));
        }
        if c.universal_blood_type.as_str().trim().is_empty() {
            return Err(config_error("compatibility.universal_blood_type is empty"));
        }

        Ok(())
    }
}

fn config_error(reason: impl Into<String>) -> AllograftError {
    AllograftError::ConfigError {
        reason: reason.into(),
    }
}
