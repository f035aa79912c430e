//! Order book error types

use std::fmt;

/// Errors raised by the book's feeds and configuration.
///
/// Empty sides and unknown keys are not errors: they surface as `None`,
/// `false` or a `0.0` sentinel.
#[derive(Debug)]
pub enum OrderBookError {
    /// A bounded feed was full and the message was dropped
    FeedFull {
        /// Name of the feed
        feed: &'static str,
    },

    /// Every receiver of a feed is gone
    FeedDisconnected {
        /// Name of the feed
        feed: &'static str,
    },

    /// Configuration rejected by validation
    InvalidConfig {
        /// Description of the error
        message: String,
    },

    /// JSON encoding or decoding failed
    Serialization(serde_json::Error),
}

impl fmt::Display for OrderBookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderBookError::FeedFull { feed } => write!(f, "Feed full, message dropped: {}", feed),
            OrderBookError::FeedDisconnected { feed } => {
                write!(f, "Feed disconnected: {}", feed)
            }
            OrderBookError::InvalidConfig { message } => {
                write!(f, "Invalid configuration: {}", message)
            }
            OrderBookError::Serialization(err) => write!(f, "Serialization error: {}", err),
        }
    }
}

impl std::error::Error for OrderBookError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OrderBookError::Serialization(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for OrderBookError {
    fn from(err: serde_json::Error) -> Self {
        OrderBookError::Serialization(err)
    }
}
