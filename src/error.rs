//! Error Types Module
//!
//! Every pipeline stage reports failures through [`EstimateError`], tagged by
//! the stage that raised them.

use std::path::PathBuf;

/// Result alias used throughout the estimator.
pub type Result<T> = std::result::Result<T, EstimateError>;

/// Errors raised while estimating energy yield.
#[derive(Debug, thiserror::Error)]
pub enum EstimateError {
    /// A caller-supplied value is outside its valid range
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A date string could not be understood
    #[error("invalid date '{input}': {message}")]
    InvalidDate { input: String, message: String },

    /// A time zone name could not be resolved
    #[error("unknown time zone '{0}'")]
    Timezone(String),

    /// The solar position stage failed
    #[error("solar position calculation failed: {0}")]
    SolarPosition(#[from] solar_positioning::Error),

    /// The configuration file could not be loaded
    #[error("could not load configuration from {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: ConfigSource,
    },
}

/// Underlying cause of a configuration load failure.
#[derive(Debug, thiserror::Error)]
pub enum ConfigSource {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl EstimateError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// True when the failure comes from bad caller input rather than from
    /// a computation stage.
    pub fn is_invalid_input(&self) -> bool {
        match self {
            Self::InvalidInput(_) | Self::InvalidDate { .. } | Self::Timezone(_) => true,
            Self::Config { .. } => true,
            Self::SolarPosition(e) => matches!(
                e,
                solar_positioning::Error::InvalidLatitude { .. }
                    | solar_positioning::Error::InvalidLongitude { .. }
                    | solar_positioning::Error::InvalidPressure { .. }
                    | solar_positioning::Error::InvalidTemperature { .. }
            ),
        }
    }
}

// ===================== TESTS =====================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_classification() {
        assert!(EstimateError::invalid_input("latitude").is_invalid_input());
        assert!(EstimateError::Timezone("Mars/Olympus".into()).is_invalid_input());

        let lat = EstimateError::from(solar_positioning::Error::invalid_latitude(95.0));
        assert!(lat.is_invalid_input());

        let computation = EstimateError::from(solar_positioning::Error::ComputationError {
            message: "no convergence",
        });
        assert!(!computation.is_invalid_input());
    }

    #[test]
    fn test_display_names_stage() {
        let err = EstimateError::InvalidDate {
            input: "someday".into(),
            message: "not a date".into(),
        };
        assert_eq!(err.to_string(), "invalid date 'someday': not a date");
    }
}
