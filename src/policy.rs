//! Redundancy Policy
//!
//! The redundancy level and factor under which failures are counted, plus
//! the predicted health outcome of a redundancy-protected container. Wire
//! codes and status literals follow the management plane's container
//! property conventions (`rf_lvl:1` = engine granularity, `rf_lvl:2` =
//! node granularity; status `HEALTHY` / `UNCLEAN`).

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

// =============================================================================
// Redundancy Level
// =============================================================================

/// Granularity at which simultaneous failures are counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RedundancyLevel {
    /// Each rank counts as one fault-domain unit
    Engine,
    /// All ranks sharing a node count as one fault-domain unit
    Node,
}

impl RedundancyLevel {
    /// Parse a level from its `rf_lvl` property value. Accepts the
    /// numeric wire codes (`1`, `2`) and the names the management plane
    /// prints (`engine`, `node`).
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim() {
            "1" | "engine" => Ok(RedundancyLevel::Engine),
            "2" | "node" => Ok(RedundancyLevel::Node),
            other => Err(Error::InvalidPolicy(format!(
                "unrecognized rf_lvl value {other:?}"
            ))),
        }
    }
}

impl std::fmt::Display for RedundancyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RedundancyLevel::Engine => write!(f, "engine"),
            RedundancyLevel::Node => write!(f, "node"),
        }
    }
}

// =============================================================================
// Redundancy Policy
// =============================================================================

/// Redundancy policy: level plus the maximum number of fault-domain units
/// that may be down before an object becomes unhealthy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedundancyPolicy {
    /// Failure-counting granularity
    pub level: RedundancyLevel,
    /// Maximum tolerated down fault-domain units
    pub factor: u32,
}

impl RedundancyPolicy {
    /// Create a policy directly.
    pub fn new(level: RedundancyLevel, factor: u32) -> Self {
        Self { level, factor }
    }

    /// Parse a policy from a container property string such as
    /// `"rf_lvl:2,rf:1"`. Key order is irrelevant and unknown keys are
    /// ignored. `rf` is required; `rf_lvl` defaults to engine granularity
    /// when absent, matching the management plane's default.
    pub fn from_properties(properties: &str) -> Result<Self> {
        let mut level = RedundancyLevel::Engine;
        let mut factor: Option<u32> = None;

        for entry in properties.split(',') {
            let entry = entry.trim();
            if entry.is_empty() {
                continue;
            }
            let (key, value) = entry.split_once(':').ok_or_else(|| {
                Error::InvalidPolicy(format!("malformed property entry {entry:?}"))
            })?;
            match key.trim() {
                "rf_lvl" => level = RedundancyLevel::parse(value)?,
                "rf" => {
                    let raw: i64 = value.trim().parse().map_err(|_| {
                        Error::InvalidPolicy(format!("rf value {value:?} is not an integer"))
                    })?;
                    if raw < 0 {
                        return Err(Error::InvalidPolicy(format!(
                            "rf must be non-negative, got {raw}"
                        )));
                    }
                    factor = Some(raw as u32);
                }
                _ => {}
            }
        }

        let factor =
            factor.ok_or_else(|| Error::InvalidPolicy("missing rf property".to_string()))?;
        Ok(Self { level, factor })
    }
}

impl std::fmt::Display for RedundancyPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "rf_lvl:{},rf:{}", self.level, self.factor)
    }
}

// =============================================================================
// Health Outcome
// =============================================================================

/// Predicted (and externally observed) availability state of a
/// redundancy-protected container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthOutcome {
    /// Down fault-domain units within the redundancy factor
    Healthy,
    /// Down fault-domain units exceed the redundancy factor
    Unclean,
}

impl HealthOutcome {
    /// Whether the outcome is healthy.
    pub fn is_healthy(&self) -> bool {
        *self == HealthOutcome::Healthy
    }
}

impl std::fmt::Display for HealthOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HealthOutcome::Healthy => write!(f, "HEALTHY"),
            HealthOutcome::Unclean => write!(f, "UNCLEAN"),
        }
    }
}

impl FromStr for HealthOutcome {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "HEALTHY" => Ok(HealthOutcome::Healthy),
            "UNCLEAN" => Ok(HealthOutcome::Unclean),
            other => Err(Error::UnknownHealthStatus(other.to_string())),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
