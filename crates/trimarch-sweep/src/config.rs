//! Sweep configuration.

use crate::error::{Result, SweepError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// What to do with a trial whose triangulation ran out of budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Measure the partial mesh and emit its record like any other.
    #[default]
    Measure,
    /// Drop the record; the report then has fewer lines than steps.
    Skip,
    /// Emit every record with a trailing `complete`/`partial` column.
    Flag,
}

impl FailurePolicy {
    /// True when records carry a status column.
    pub fn flags_status(self) -> bool {
        self == Self::Flag
    }
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Measure => "measure",
            Self::Skip => "skip",
            Self::Flag => "flag",
        })
    }
}

impl FromStr for FailurePolicy {
    type Err = SweepError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "measure" => Ok(Self::Measure),
            "skip" => Ok(Self::Skip),
            "flag" => Ok(Self::Flag),
            other => Err(SweepError::InvalidConfig(format!(
                "unknown failure policy `{other}` (expected measure, skip or flag)"
            ))),
        }
    }
}

/// Sweep parameters.
///
/// Missing fields in a config file fall back to [`SweepConfig::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SweepConfig {
    /// Sphere radius.
    pub radius: f64,
    /// Resolution of the first trial.
    pub delta0: f64,
    /// Resolution the sweep decays towards.
    pub delta1: f64,
    /// Number of trials.
    pub steps: usize,
    /// Triangle budget per trial.
    pub max_triangles: usize,
    /// Handling of trials that exceed the budget.
    pub policy: FailurePolicy,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            radius: 1.0,
            delta0: 0.25,
            delta1: 0.01,
            steps: 100,
            max_triangles: 10_000_000,
            policy: FailurePolicy::Measure,
        }
    }
}

impl SweepConfig {
    /// Validate settings.
    pub fn validate(&self) -> Result<()> {
        if !(self.radius.is_finite() && self.radius > 0.0) {
            return Err(SweepError::InvalidConfig(format!(
                "radius must be positive, got {}",
                self.radius
            )));
        }
        if !(self.delta1.is_finite() && self.delta1 > 0.0) {
            return Err(SweepError::InvalidConfig(format!(
                "delta1 must be positive, got {}",
                self.delta1
            )));
        }
        if !(self.delta0.is_finite() && self.delta0 >= self.delta1) {
            return Err(SweepError::InvalidConfig(format!(
                "delta0 must be at least delta1 ({}), got {}",
                self.delta1, self.delta0
            )));
        }
        if self.steps == 0 {
            return Err(SweepError::InvalidConfig("steps must be at least 1".into()));
        }
        if self.max_triangles == 0 {
            return Err(SweepError::InvalidConfig(
                "max_triangles must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SweepConfig::default();
        assert_eq!(config.radius, 1.0);
        assert_eq!(config.delta0, 0.25);
        assert_eq!(config.delta1, 0.01);
        assert_eq!(config.steps, 100);
        assert_eq!(config.max_triangles, 10_000_000);
        assert_eq!(config.policy, FailurePolicy::Measure);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = SweepConfig::from_toml_str("radius = 2.5\nsteps = 7\npolicy = \"flag\"\n")
            .unwrap();
        assert_eq!(config.radius, 2.5);
        assert_eq!(config.steps, 7);
        assert_eq!(config.policy, FailurePolicy::Flag);
        assert_eq!(config.delta0, 0.25);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = SweepConfig::from_toml_str("radiuss = 2.0").unwrap_err();
        assert!(matches!(err, SweepError::Toml(_)));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let bad = [
            SweepConfig {
                radius: 0.0,
                ..SweepConfig::default()
            },
            SweepConfig {
                delta1: -0.1,
                ..SweepConfig::default()
            },
            SweepConfig {
                delta0: 0.001,
                ..SweepConfig::default()
            },
            SweepConfig {
                steps: 0,
                ..SweepConfig::default()
            },
            SweepConfig {
                max_triangles: 0,
                ..SweepConfig::default()
            },
            SweepConfig {
                delta0: f64::INFINITY,
                ..SweepConfig::default()
            },
        ];
        for config in bad {
            assert!(
                matches!(config.validate(), Err(SweepError::InvalidConfig(_))),
                "accepted {config:?}"
            );
        }
    }

    #[test]
    fn test_equal_deltas_allowed() {
        let config = SweepConfig {
            delta0: 0.1,
            delta1: 0.1,
            ..SweepConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_policy_parse() {
        assert_eq!("skip".parse::<FailurePolicy>().unwrap(), FailurePolicy::Skip);
        assert_eq!("FLAG".parse::<FailurePolicy>().unwrap(), FailurePolicy::Flag);
        assert!("abort".parse::<FailurePolicy>().is_err());
        assert_eq!(FailurePolicy::Measure.to_string(), "measure");
    }

    #[test]
    fn test_bundled_configs() {
        let dir = concat!(env!("CARGO_MANIFEST_DIR"), "/../../configs");
        let reference = SweepConfig::load(format!("{dir}/reference.toml")).unwrap();
        assert_eq!(reference, SweepConfig::default());
        let tiny = SweepConfig::load(format!("{dir}/tiny-budget.toml")).unwrap();
        assert_eq!(tiny.max_triangles, 10);
        assert_eq!(tiny.policy, FailurePolicy::Flag);
    }

    #[test]
    fn test_load_missing_file() {
        let err = SweepConfig::load("/nonexistent/trimarch.toml").unwrap_err();
        assert!(matches!(err, SweepError::Io(_)));
    }
}
