//! Keyed, weighted entries stored in a side book's heap.
//!
//! ## Design
//!
//! A `Node` wraps a [`QuoteSource`] with the caller's key and a weight. The
//! weight multiplies the quoted price for ordering only; the quantity a node
//! reports is never scaled. That is what lets quotes in different currencies
//! or lot conventions share one heap.
//!
//! The node also carries its current heap position. The position is plain
//! data (not a pointer) and is rewritten by the heap on every swap, which
//! gives O(log n) removal and re-sift by key.
//!
//! The heap orders nodes by `rank`, the weighted price captured when the
//! owning side last placed the node. Comparisons never re-query a source, so
//! a sift always sees one consistent set of values even while a nested book
//! changes underneath.

use super::heap::HeapEntry;
use super::order::{Order, OrderRef};
use super::source::{Peek, QuoteSource};

/// Heap entry: a quote source plus key, weight and heap position.
#[derive(Debug, Clone)]
pub struct Node {
    source: QuoteSource,
    key: String,

    /// Price multiplier used for ordering
    pub(crate) weight: f64,

    /// Current position in the owning heap's array
    pub(crate) position: usize,

    /// Weighted price the heap currently orders this node by
    pub(crate) rank: Option<f64>,
}

impl Node {
    /// Create a node, not yet placed in any heap
    pub fn new(key: impl Into<String>, source: impl Into<QuoteSource>, weight: f64) -> Self {
        Self {
            source: source.into(),
            key: key.into(),
            weight,
            position: 0,
            rank: None,
        }
    }

    /// Node holding a single order, keyed by the order's identifier, weight 1
    pub fn from_order(order: Order) -> Self {
        let key = order.order_id.clone();
        Self::new(key, order, 1.0)
    }

    /// The node's key
    #[inline]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The node's weight
    #[inline]
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Change the weight of a node that is not in a book yet.
    ///
    /// Nodes already in a book must go through `SideBook::set_weight`.
    pub fn set_weight(&mut self, weight: f64) {
        self.weight = weight;
    }

    /// The wrapped quote source
    #[inline]
    pub fn source(&self) -> &QuoteSource {
        &self.source
    }

    /// Price times weight, or `None` when the source has no quote
    #[inline]
    pub fn weighted_price(&self) -> Option<f64> {
        self.source.best_price().map(|price| price * self.weight)
    }
}

impl Node {
    /// Recapture the ranking value from the live source.
    ///
    /// Returns true when the rank changed; the caller must then re-sift.
    pub(crate) fn rerank(&mut self) -> bool {
        let rank = self.weighted_price();
        let changed = rank.map(f64::to_bits) != self.rank.map(f64::to_bits);
        self.rank = rank;
        changed
    }
}

impl Peek for Node {
    fn peek(&self) -> Option<Order> {
        self.source.peek()
    }

    fn peek_ref(&self) -> Option<OrderRef> {
        self.source.peek_ref()
    }

    fn best_price(&self) -> Option<f64> {
        self.source.best_price()
    }
}

impl HeapEntry for Node {
    #[inline]
    fn position(&self) -> usize {
        self.position
    }

    #[inline]
    fn set_position(&mut self, position: usize) {
        self.position = position;
    }
}
