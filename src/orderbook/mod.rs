//! OrderBook implementation: keyed, self-indexing sides composed into one book.

pub mod book;
mod config;
pub mod copy;
mod error;
mod feeds;
pub mod heap;
mod node;
mod order;
pub mod side;
mod snapshot;
mod source;

pub use book::OrderBook;
pub use config::{BookConfig, DEFAULT_FEED_CAPACITY};
pub use copy::copy;
pub use error::OrderBookError;
pub use feeds::{BUY_TRADE_FEED, BookFeeds, QUOTE_FEED, SELL_TRADE_FEED};
pub use heap::{HeapEntry, HeapOrder, IndexedHeap};
pub use node::Node;
pub use order::{Order, OrderRef, Quote, TradeEvent};
pub use side::{Ask, AskBook, Bid, BidBook, SideBook, SideOrder};
pub use snapshot::{EntrySnapshot, OrderBookSnapshot};
pub use source::{Peek, QuoteSource};
