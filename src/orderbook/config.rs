//! Book configuration

use super::error::OrderBookError;
use serde::{Deserialize, Serialize};

/// Default number of messages a bounded feed buffers before dropping
pub const DEFAULT_FEED_CAPACITY: usize = 1024;

/// Settings used to build an [`OrderBook`](super::OrderBook).
///
/// Missing fields take their defaults, so `{}` is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookConfig {
    /// Symbol or identifier of the book
    pub symbol: String,

    /// Buffer size of each feed; `None` makes the feeds unbounded
    pub feed_capacity: Option<usize>,

    /// Number of nodes each side pre-allocates room for
    pub initial_capacity: usize,
}

impl BookConfig {
    /// Defaults for `symbol`
    pub fn new(symbol: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            ..Self::default()
        }
    }

    /// Parse and validate a JSON configuration
    pub fn from_json(json: &str) -> Result<Self, OrderBookError> {
        let config: BookConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the feeds cannot honour
    pub fn validate(&self) -> Result<(), OrderBookError> {
        if self.feed_capacity == Some(0) {
            return Err(OrderBookError::InvalidConfig {
                message: "feed_capacity must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for BookConfig {
    fn default() -> Self {
        Self {
            symbol: String::new(),
            feed_capacity: Some(DEFAULT_FEED_CAPACITY),
            initial_capacity: 0,
        }
    }
}
