//! TOML-configured scoring policy.
//!
//! `ScoringPolicy` loads a `ScoringConfig` from a TOML string or file and
//! implements both scorer traits from allograft-core.
//!
//! Urgency:
//!
//! 1. BMI = weight / height². Missing measurements → `InvalidInput`;
//!    height ≤ 0 (or a non-finite BMI) → `DegenerateInput`.
//! 2. The first BMI band containing the value supplies the score; otherwise
//!    the fallback score applies.
//! 3. Diseased recipients lose `disease_penalty`.
//!
//! Compatibility:
//!
//! 1. Age impact = max(0, age_max_impact − |Δage| / age_decade); 0 when
//!    either age is unknown.
//! 2. Blood type impact: same type, else universal donor, else 0.
//! 3. Sum clamped to [min_score, max_score].

use std::path::Path;

use tracing::debug;

use allograft_contracts::{
    error::{AllograftError, AllograftResult},
    ingest::IngestOptions,
    person::{BloodType, Person},
};
use allograft_core::{
    traits::{CompatibilityScorer, UrgencyScorer},
    MatchEngine,
};

use crate::rule::ScoringConfig;

/// Scores recipients and donor/recipient pairs from a loaded rule set.
///
/// ```rust,ignore
/// use allograft_scoring::ScoringPolicy;
///
/// let engine = ScoringPolicy::from_file(Path::new("scoring.toml"))?.into_engine();
/// ```
///
/// `ScoringPolicy::default()` carries the stock rules; see [`crate::rule`].
#[derive(Debug, Clone, Default)]
pub struct ScoringPolicy {
    config: ScoringConfig,
}

impl ScoringPolicy {
    /// Build a policy from an already-parsed config, validating it first.
    pub fn new(config: ScoringConfig) -> AllograftResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Parse `s` as TOML and build a `ScoringPolicy`.
    ///
    /// Returns `AllograftError::ConfigError` if the TOML is malformed, does
    /// not match `ScoringConfig`, or fails validation.
    pub fn from_toml_str(s: &str) -> AllograftResult<Self> {
        let config: ScoringConfig = toml::from_str(s).map_err(|e| AllograftError::ConfigError {
            reason: format!("failed to parse scoring TOML: {}", e),
        })?;
        Self::new(config)
    }

    /// Read the file at `path` and parse it as scoring configuration.
    pub fn from_file(path: &Path) -> AllograftResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| AllograftError::ConfigError {
            reason: format!("failed to read scoring file '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn ingest_options(&self) -> &IngestOptions {
        &self.config.ingest
    }

    /// Wire this policy into a `MatchEngine` as both urgency and
    /// compatibility scorer.
    pub fn into_engine(self) -> MatchEngine {
        MatchEngine::new(Box::new(self.clone()), Box::new(self))
    }

    /// Body-mass index of `person`, with height in meters.
    pub fn bmi(&self, person: &Person) -> AllograftResult<f64> {
        let weight = person
            .weight
            .ok_or_else(|| AllograftError::invalid(&person.id, "missing weight"))?;
        let height = person
            .height
            .ok_or_else(|| AllograftError::invalid(&person.id, "missing height"))?;

        if !weight.is_finite() {
            return Err(AllograftError::invalid(&person.id, "weight is not finite"));
        }
        if !height.is_finite() {
            return Err(AllograftError::invalid(&person.id, "height is not finite"));
        }
        if height <= 0.0 {
            return Err(AllograftError::degenerate(
                &person.id,
                format!("height must be positive for BMI, got {}", height),
            ));
        }

        let bmi = weight / (height * height);
        if !bmi.is_finite() {
            return Err(AllograftError::degenerate(
                &person.id,
                format!("BMI is not finite for weight {} and height {}", weight, height),
            ));
        }
        Ok(bmi)
    }

    /// Score a BMI value against the configured bands.
    pub fn bmi_score(&self, bmi: f64) -> i32 {
        let rules = &self.config.urgency;
        rules
            .bmi_bands
            .iter()
            .find(|band| band.contains(bmi))
            .map_or(rules.fallback_score, |band| band.score)
    }

    pub fn age_impact(&self, donor: &Person, recipient: &Person) -> f64 {
        let rules = &self.config.compatibility;
        match (donor.age, recipient.age) {
            (Some(d), Some(r)) => {
                let gap = d.abs_diff(r) as f64;
                (rules.age_max_impact - gap / rules.age_decade).max(0.0)
            }
            _ => 0.0,
        }
    }

    pub fn blood_type_impact(&self, donor: &Person, recipient: &Person) -> f64 {
        let rules = &self.config.compatibility;
        if donor.blood_type == recipient.blood_type {
            rules.same_blood_type
        } else if donor.blood_type == rules.universal_blood_type {
            rules.universal_donor
        } else {
            0.0
        }
    }
}

impl UrgencyScorer for ScoringPolicy {
    fn score_urgency(&self, recipient: &Person) -> AllograftResult<i32> {
        let bmi = self.bmi(recipient)?;
        let mut score = self.bmi_score(bmi);
        if recipient.health.is_diseased() {
            score = score.saturating_sub(self.config.urgency.disease_penalty);
        }

        debug!(
            recipient_id = %recipient.id,
            bmi,
            score,
            "urgency scored"
        );
        Ok(score)
    }
}

impl CompatibilityScorer for ScoringPolicy {
    fn score_compatibility(&self, donor: &Person, recipient: &Person) -> f64 {
        let rules = &self.config.compatibility;
        let raw = self.age_impact(donor, recipient) + self.blood_type_impact(donor, recipient);
        raw.clamp(rules.min_score, rules.max_score)
    }

    fn universal_blood_type(&self) -> &BloodType {
        &self.config.compatibility.universal_blood_type
    }
}
