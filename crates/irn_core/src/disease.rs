use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

/// Disease parameters. Immutable once validated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Disease {
    /// An agent recovers the step after it has been infectious for more than
    /// this many days.
    pub days_infectious: u32,
    /// Per-contact, per-step probability of transmission along an edge.
    pub transmission_probability: f64,
}

impl Disease {
    pub fn new(days_infectious: u32, transmission_probability: f64) -> SimResult<Self> {
        let disease = Self {
            days_infectious,
            transmission_probability,
        };
        disease.validate()?;
        Ok(disease)
    }

    pub fn validate(&self) -> SimResult<()> {
        if self.days_infectious == 0 {
            return Err(SimError::InvalidConfig(
                "days_infectious must be at least 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.transmission_probability) {
            return Err(SimError::InvalidConfig(format!(
                "transmission_probability must be in [0, 1], got {}",
                self.transmission_probability
            )));
        }
        Ok(())
    }
}

impl Default for Disease {
    fn default() -> Self {
        Self {
            days_infectious: 4,
            transmission_probability: 0.2,
        }
    }
}
