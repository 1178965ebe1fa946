//! Engine configuration

use lob_types::ids::InstrumentId;
use serde::{Deserialize, Serialize};

/// What an amendment does when its new price crosses the opposite side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmendPolicy {
    /// Re-queue at the new price without matching, even if it crosses
    #[default]
    Reprice,
    /// Treat the amended order as a new aggressive limit order: it matches
    /// against the opposite side first and only the remainder rests
    Reenter,
}

/// Matching engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Instrument traded by this book
    pub instrument: InstrumentId,
    /// Amendment behavior
    pub amend_policy: AmendPolicy,
    /// Sequence number of the first trade
    pub starting_trade_sequence: u64,
    /// Depth used by `MatchingEngine::default_snapshot`
    pub default_depth: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            instrument: InstrumentId::default(),
            amend_policy: AmendPolicy::Reprice,
            starting_trade_sequence: 1,
            default_depth: 10,
        }
    }
}

impl EngineConfig {
    pub fn for_instrument(symbol: impl Into<String>) -> Self {
        Self {
            instrument: InstrumentId::new(symbol),
            ..Self::default()
        }
    }

    pub fn with_amend_policy(mut self, amend_policy: AmendPolicy) -> Self {
        self.amend_policy = amend_policy;
        self
    }

    /// Parse a JSON config; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
