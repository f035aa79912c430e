//! Order book snapshot for market data

use super::node::Node;
use super::order::Order;
use super::source::Peek;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// One node as seen at snapshot time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntrySnapshot {
    /// Key of the node in its side book
    pub key: String,

    /// Price multiplier of the node
    pub weight: f64,

    /// Best quote of the node's source, if it had one
    pub order: Option<Order>,
}

impl From<&Node> for EntrySnapshot {
    fn from(node: &Node) -> Self {
        Self {
            key: node.key().to_string(),
            weight: node.weight(),
            order: node.peek(),
        }
    }
}

/// A snapshot of the order book state at a specific point in time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderBookSnapshot {
    /// The symbol or identifier for this order book
    pub symbol: String,

    /// Timestamp when the snapshot was created (milliseconds since epoch)
    pub timestamp: u64,

    /// Ask entries, best first
    pub asks: Vec<EntrySnapshot>,

    /// Bid entries, best first
    pub bids: Vec<EntrySnapshot>,
}

impl OrderBookSnapshot {
    /// Get the best bid price and quantity
    pub fn best_bid(&self) -> Option<(f64, f64)> {
        let bid = Self::best(&self.bids);
        trace!("best_bid: {:?}", bid);
        bid
    }

    /// Get the best ask price and quantity
    pub fn best_ask(&self) -> Option<(f64, f64)> {
        let ask = Self::best(&self.asks);
        trace!("best_ask: {:?}", ask);
        ask
    }

    fn best(entries: &[EntrySnapshot]) -> Option<(f64, f64)> {
        entries
            .first()
            .and_then(|entry| entry.order.as_ref())
            .map(|order| (order.price, order.quantity))
    }

    /// Get the mid price (average of best bid and best ask)
    pub fn mid_price(&self) -> Option<f64> {
        let mid_price = match (self.best_bid(), self.best_ask()) {
            (Some((bid_price, _)), Some((ask_price, _))) => Some((bid_price + ask_price) / 2.0),
            _ => None,
        };
        trace!("mid_price: {:?}", mid_price);
        mid_price
    }

    /// Get the spread (best ask - best bid)
    pub fn spread(&self) -> Option<f64> {
        let spread = match (self.best_bid(), self.best_ask()) {
            (Some((bid_price, _)), Some((ask_price, _))) => Some(ask_price - bid_price),
            _ => None,
        };
        trace!("spread: {:?}", spread);
        spread
    }

    /// Calculate the total quoted quantity on the bid side
    pub fn total_bid_volume(&self) -> f64 {
        Self::volume(&self.bids)
    }

    /// Calculate the total quoted quantity on the ask side
    pub fn total_ask_volume(&self) -> f64 {
        Self::volume(&self.asks)
    }

    fn volume(entries: &[EntrySnapshot]) -> f64 {
        entries
            .iter()
            .filter_map(|entry| entry.order.as_ref())
            .map(|order| order.quantity)
            .sum()
    }
}
