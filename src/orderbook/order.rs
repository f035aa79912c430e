//! Leaf quotes and the record shapes exchanged with external producers and consumers

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Shared, in-place mutable handle to a resting order.
///
/// A side book stores the handle, so a holder can adjust price or quantity
/// without re-inserting the order. After a price change the holder must call
/// `fix` on the side book so the entry is re-sifted.
pub type OrderRef = Arc<RwLock<Order>>;

/// A concrete quote: the leaf of every quote source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Limit price, in whatever unit the producer uses
    pub price: f64,

    /// Resting quantity
    pub quantity: f64,

    /// Unique identifier assigned by the producer
    pub order_id: String,

    /// Optional tag naming where the order came from (venue, region...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
}

impl Order {
    /// Create a new order without an origin tag
    pub fn new(price: f64, quantity: f64, order_id: impl Into<String>) -> Self {
        Self {
            price,
            quantity,
            order_id: order_id.into(),
            origin: None,
        }
    }

    /// Attach an origin tag
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    /// Wrap this order in a shared handle
    pub fn into_ref(self) -> OrderRef {
        Arc::new(RwLock::new(self))
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}@{}", self.order_id, self.quantity, self.price)
    }
}

/// Paired best ask and best bid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Best ask, omitted when the ask side has no quote
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ask: Option<Order>,

    /// Best bid, omitted when the bid side has no quote
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bid: Option<Order>,
}

impl Quote {
    /// True when both sides carry a quote
    pub fn is_two_sided(&self) -> bool {
        self.ask.is_some() && self.bid.is_some()
    }
}

/// An executed trade, reported on the buy or sell feed of a book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeEvent {
    /// Identifier stamped by the book that published the event
    pub trade_id: Uuid,

    /// Execution price
    pub price: f64,

    /// Executed quantity
    pub quantity: f64,

    /// Milliseconds since epoch
    pub timestamp: u64,
}
