//! Core OrderBook implementation pairing an ask side and a bid side

use super::config::BookConfig;
use super::error::OrderBookError;
use super::feeds::{BUY_TRADE_FEED, BookFeeds, Feed, QUOTE_FEED, SELL_TRADE_FEED};
use super::order::{Order, Quote, TradeEvent};
use super::side::{AskBook, BidBook};
use super::snapshot::{EntrySnapshot, OrderBookSnapshot};
use super::source::Peek;
use crate::utils::current_time_millis;
use crossbeam::channel::Sender;
use pricelevel::{Side, UuidGenerator};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};
use uuid::Uuid;

/// The OrderBook tracks resting liquidity on both sides of one market.
///
/// Each side has its own lock. Book-level reads (`midpoint`, `spread`,
/// `volume`, `has_both`, `quote`) lock one side at a time, so under
/// concurrent mutation of both sides they may combine states that never
/// coexisted. Callers needing a joint view must serialize writers themselves.
pub struct OrderBook {
    /// The symbol or identifier for this order book
    pub(super) symbol: String,

    /// Settings the book was built with
    config: BookConfig,

    /// Sell side, shared so it can be nested in another book
    pub(super) asks: Arc<AskBook>,

    /// Buy side, shared so it can be nested in another book
    pub(super) bids: Arc<BidBook>,

    quotes: Feed<Quote>,
    buy_trades: Feed<TradeEvent>,
    sell_trades: Feed<TradeEvent>,

    /// Generator for unique trade IDs
    trade_id_generator: UuidGenerator,
}

impl OrderBook {
    /// Create a new order book for the given symbol with default settings
    pub fn new(symbol: &str) -> Self {
        Self::build(BookConfig::new(symbol))
    }

    /// Create a new order book from a validated configuration
    pub fn with_config(config: BookConfig) -> Result<Self, OrderBookError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    pub(super) fn build(config: BookConfig) -> Self {
        // Create a unique namespace for this order book's trade IDs
        let namespace = Uuid::new_v4();
        let capacity = config.initial_capacity;
        debug!(
            "Order book {}: created (feed capacity {:?})",
            config.symbol, config.feed_capacity
        );

        Self {
            symbol: config.symbol.clone(),
            asks: Arc::new(AskBook::with_capacity(capacity)),
            bids: Arc::new(BidBook::with_capacity(capacity)),
            quotes: Feed::new(QUOTE_FEED, config.feed_capacity),
            buy_trades: Feed::new(BUY_TRADE_FEED, config.feed_capacity),
            sell_trades: Feed::new(SELL_TRADE_FEED, config.feed_capacity),
            trade_id_generator: UuidGenerator::new(namespace),
            config,
        }
    }

    /// Get the symbol of this order book
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Settings the book was built with
    pub fn config(&self) -> &BookConfig {
        &self.config
    }

    /// The sell side
    pub fn asks(&self) -> &Arc<AskBook> {
        &self.asks
    }

    /// The buy side
    pub fn bids(&self) -> &Arc<BidBook> {
        &self.bids
    }

    /// Best ask, if any
    pub fn best_ask(&self) -> Option<Order> {
        self.asks.peek()
    }

    /// Best bid, if any
    pub fn best_bid(&self) -> Option<Order> {
        self.bids.peek()
    }

    /// Best order on `side`
    pub fn peek(&self, side: Side) -> Option<Order> {
        match side {
            Side::Buy => self.bids.peek(),
            Side::Sell => self.asks.peek(),
        }
    }

    /// Both sides hold at least one node (quoted or not)
    pub fn has_both(&self) -> bool {
        !self.asks.is_empty() && !self.bids.is_empty()
    }

    /// Average of best ask and best bid, or `0.0` without a two-sided market.
    ///
    /// `0.0` is a sentinel: use [`OrderBook::has_both`] to tell "no market"
    /// apart from a genuine zero midpoint.
    pub fn midpoint(&self) -> f64 {
        self.best_prices()
            .map(|(ask, bid)| (ask + bid) / 2.0)
            .unwrap_or(0.0)
    }

    /// Best ask minus best bid, or `0.0` without a two-sided market
    pub fn spread(&self) -> f64 {
        self.best_prices().map(|(ask, bid)| ask - bid).unwrap_or(0.0)
    }

    /// Total quoted quantity on both sides
    pub fn volume(&self) -> f64 {
        self.asks.volume() + self.bids.volume()
    }

    /// Current best ask and best bid
    pub fn quote(&self) -> Quote {
        Quote {
            ask: self.asks.peek(),
            bid: self.bids.peek(),
        }
    }

    /// Number of nodes on both sides
    pub fn len(&self) -> usize {
        self.asks.len() + self.bids.len()
    }

    /// True when neither side holds a node
    pub fn is_empty(&self) -> bool {
        self.asks.is_empty() && self.bids.is_empty()
    }

    /// Drop every node on both sides
    pub fn clear(&self) {
        self.asks.clear();
        self.bids.clear();
        trace!("Order book {}: cleared", self.symbol);
    }

    fn best_prices(&self) -> Option<(f64, f64)> {
        if !self.has_both() {
            return None;
        }
        Some((self.asks.best_price()?, self.bids.best_price()?))
    }

    /// Receiving ends of the quote and trade feeds
    pub fn feeds(&self) -> BookFeeds {
        BookFeeds {
            quotes: self.quotes.receiver(),
            buy_trades: self.buy_trades.receiver(),
            sell_trades: self.sell_trades.receiver(),
        }
    }

    /// Send-only endpoint of the quote feed
    pub fn quote_sender(&self) -> Sender<Quote> {
        self.quotes.sender()
    }

    /// Send-only endpoint of the trade feed for `side`
    pub fn trade_sender(&self, side: Side) -> Sender<TradeEvent> {
        match side {
            Side::Buy => self.buy_trades.sender(),
            Side::Sell => self.sell_trades.sender(),
        }
    }

    /// Messages waiting on the quote feed
    pub fn pending_quotes(&self) -> usize {
        self.quotes.pending()
    }

    /// Publish the current best ask/best bid on the quote feed.
    ///
    /// Never blocks; a full feed drops the quote and reports
    /// [`OrderBookError::FeedFull`].
    pub fn publish_quote(&self) -> Result<Quote, OrderBookError> {
        let quote = self.quote();
        trace!("Order book {}: publishing quote {:?}", self.symbol, quote);
        self.quotes.send(quote.clone())?;
        Ok(quote)
    }

    /// Stamp a trade with a fresh ID and publish it on the feed for `side`
    pub fn publish_trade(
        &self,
        side: Side,
        price: f64,
        quantity: f64,
    ) -> Result<TradeEvent, OrderBookError> {
        let event = TradeEvent {
            trade_id: self.trade_id_generator.next(),
            price,
            quantity,
            timestamp: current_time_millis(),
        };
        trace!(
            "Order book {}: publishing {} trade {} {}@{}",
            self.symbol, side, event.trade_id, quantity, price
        );
        let feed = match side {
            Side::Buy => &self.buy_trades,
            Side::Sell => &self.sell_trades,
        };
        feed.send(event.clone())?;
        Ok(event)
    }

    /// Create a snapshot of the best `depth` entries of each side
    pub fn create_snapshot(&self, depth: usize) -> OrderBookSnapshot {
        let asks = self
            .asks
            .nodes()
            .into_iter()
            .take(depth)
            .map(|node| EntrySnapshot::from(&node))
            .collect();
        let bids = self
            .bids
            .nodes()
            .into_iter()
            .take(depth)
            .map(|node| EntrySnapshot::from(&node))
            .collect();

        OrderBookSnapshot {
            symbol: self.symbol.clone(),
            timestamp: current_time_millis(),
            asks,
            bids,
        }
    }
}

impl fmt::Debug for OrderBook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrderBook")
            .field("symbol", &self.symbol)
            .field("asks", &self.asks)
            .field("bids", &self.bids)
            .finish()
    }
}
