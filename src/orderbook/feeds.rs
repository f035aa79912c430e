//! Outbound feeds: quote snapshots and trade events.
//!
//! The book only owns the channels. Deciding when a quote is published or a
//! trade happened belongs to whoever drives the book.

use super::error::OrderBookError;
use super::order::{Quote, TradeEvent};
use crossbeam::channel::{self, Receiver, Sender, TrySendError};
use tracing::warn;

/// Name of the quote snapshot feed
pub const QUOTE_FEED: &str = "quotes";

/// Name of the buy trade feed
pub const BUY_TRADE_FEED: &str = "buy_trades";

/// Name of the sell trade feed
pub const SELL_TRADE_FEED: &str = "sell_trades";

/// Receiving ends of a book's feeds.
///
/// Receivers are multi-consumer: every clone competes for the same messages.
#[derive(Debug, Clone)]
pub struct BookFeeds {
    /// Paired best ask / best bid snapshots
    pub quotes: Receiver<Quote>,

    /// Trades on the buy side
    pub buy_trades: Receiver<TradeEvent>,

    /// Trades on the sell side
    pub sell_trades: Receiver<TradeEvent>,
}

pub(crate) struct Feed<T> {
    name: &'static str,
    tx: Sender<T>,
    rx: Receiver<T>,
}

impl<T> Feed<T> {
    pub(crate) fn new(name: &'static str, capacity: Option<usize>) -> Self {
        let (tx, rx) = match capacity {
            Some(capacity) => channel::bounded(capacity),
            None => channel::unbounded(),
        };
        Self { name, tx, rx }
    }

    pub(crate) fn sender(&self) -> Sender<T> {
        self.tx.clone()
    }

    pub(crate) fn receiver(&self) -> Receiver<T> {
        self.rx.clone()
    }

    /// Never blocks: a full feed drops `message`
    pub(crate) fn send(&self, message: T) -> Result<(), OrderBookError> {
        match self.tx.try_send(message) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => {
                warn!("Feed {} is full, dropping message", self.name);
                Err(OrderBookError::FeedFull { feed: self.name })
            }
            Err(TrySendError::Disconnected(_)) => {
                Err(OrderBookError::FeedDisconnected { feed: self.name })
            }
        }
    }

    pub(crate) fn pending(&self) -> usize {
        self.tx.len()
    }
}
