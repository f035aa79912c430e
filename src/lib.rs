//! # Composite Order Book
//!
//! A thread-safe, two-sided order book that keeps the best-priced entry of
//! each side one `O(log n)` step away, while every entry stays addressable by
//! its key for cancellation and in-place updates.
//!
//! ## Key Features
//!
//! - **Self-indexing heap**: entries record their own heap position, so
//!   removal and re-sifting by key never scan the heap.
//!
//! - **Composable quote sources**: an entry is either a concrete [`Order`] or
//!   a nested side book. A nested book is queried live, so a composite book
//!   always reflects the current best price of each sub-book.
//!
//! - **Weighted ordering**: every entry carries a weight that scales its price
//!   for ordering only. Quotes in different currencies, lot conventions or
//!   venues become comparable inside one heap; reported quantities are never
//!   scaled.
//!
//! - **Per-side locking**: each side serializes its own mutations, and
//!   replace-by-key pushes are atomic. The two sides never contend with each
//!   other.
//!
//! - **Derived metrics**: midpoint, spread and total volume are computed on
//!   demand from both sides.
//!
//! - **Deep copies**: [`copy`] builds an independent snapshot whose orders
//!   share no mutable state with the live book.
//!
//! ## Consistency
//!
//! Book-level reads lock one side at a time. Under concurrent writes to both
//! sides, [`OrderBook::midpoint`] and [`OrderBook::spread`] may pair a best
//! ask and a best bid that never coexisted. Serialize writers externally when
//! a joint view matters.
//!
//! ## Example
//!
//! ```
//! use composite_orderbook::{Node, Order, OrderBook, QuoteSource};
//! use std::sync::Arc;
//!
//! let venue = OrderBook::new("BTC/EUR");
//! venue.asks().push(Node::from_order(Order::new(50_000.0, 1.0, "v-1")));
//!
//! // Nest the venue's asks in a USD book, converting EUR prices at 1.1
//! let composite = OrderBook::new("BTC/USD");
//! composite
//!     .asks()
//!     .push(Node::new("venue", QuoteSource::book(Arc::clone(venue.asks())), 1.1));
//! composite.asks().push(Node::from_order(Order::new(54_000.0, 2.0, "local-1")));
//!
//! // 50_000 * 1.1 = 55_000 ranks behind the local 54_000 ask
//! assert_eq!(composite.best_ask().map(|o| o.order_id), Some("local-1".to_string()));
//! ```

pub mod orderbook;

mod utils;

pub use orderbook::{
    Ask, AskBook, Bid, BidBook, BookConfig, BookFeeds, EntrySnapshot, HeapEntry, HeapOrder,
    IndexedHeap, Node, Order, OrderBook, OrderBookError, OrderBookSnapshot, OrderRef, Peek,
    Quote, QuoteSource, SideBook, SideOrder, TradeEvent, copy,
};
pub use utils::current_time_millis;
