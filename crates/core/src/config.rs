use std::env::{self, VarError};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SessionError};

/// Maximum gap between adjacent events of one session, in `ts` units (seconds).
pub const SESSION_GAP_THRESHOLD: i64 = 600;

/// Environment variable overriding [`SESSION_GAP_THRESHOLD`].
pub const GAP_THRESHOLD_ENV: &str = "SESSIONIZE_GAP_THRESHOLD";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Adjacent events further apart than this start a new session.
    pub gap_threshold: i64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            gap_threshold: SESSION_GAP_THRESHOLD,
        }
    }
}

impl SessionConfig {
    pub fn new(gap_threshold: i64) -> Result<Self> {
        let config = Self { gap_threshold };
        config.validate()?;
        Ok(config)
    }

    /// Load the threshold from `SESSIONIZE_GAP_THRESHOLD`, falling back to the default
    pub fn from_env() -> Result<Self> {
        match env::var(GAP_THRESHOLD_ENV) {
            Ok(raw) => Self::parse_gap_threshold(&raw),
            Err(VarError::NotPresent) => Ok(Self::default()),
            Err(VarError::NotUnicode(_)) => Err(SessionError::InvalidConfig {
                field: GAP_THRESHOLD_ENV.to_string(),
                reason: "value is not valid unicode".to_string(),
            }),
        }
    }

    pub fn parse_gap_threshold(raw: &str) -> Result<Self> {
        let gap_threshold = raw
            .trim()
            .parse::<i64>()
            .map_err(|e| SessionError::InvalidConfig {
                field: "gap_threshold".to_string(),
                reason: format!("'{}' is not an integer: {}", raw.trim(), e),
            })?;
        Self::new(gap_threshold)
    }

    pub fn validate(&self) -> Result<()> {
        if self.gap_threshold < 0 {
            return Err(SessionError::InvalidConfig {
                field: "gap_threshold".to_string(),
                reason: format!("must be non-negative, got {}", self.gap_threshold),
            });
        }
        Ok(())
    }
}
