//! Deep copies that share no mutable order state with their source

use super::book::OrderBook;
use super::node::Node;
use super::side::{SideBook, SideOrder};
use super::source::{Peek, QuoteSource};
use std::sync::Arc;
use tracing::debug;

/// Populate `destination` with an independent node for every node of
/// `source`, on both sides.
///
/// Each copy gets a freshly allocated order holding the source node's current
/// best quote, wrapped in a new leaf source, with the same key and weight.
/// Nested books are flattened to their best quote. A node without a quote is
/// copied as a node over a fresh empty side book, so it keeps counting toward
/// `len` and `has_both` without sharing anything with the source. Existing
/// destination nodes with the same keys are replaced.
///
/// The source side is read under its lock and released before the
/// destination side is written, so copying a book onto itself is safe.
pub fn copy(source: &OrderBook, destination: &OrderBook) {
    let asks = copy_side(source.asks(), destination.asks());
    let bids = copy_side(source.bids(), destination.bids());
    debug!(
        "Order book {}: copied {} asks and {} bids into {}",
        source.symbol(),
        asks,
        bids,
        destination.symbol()
    );
}

fn copy_side<S: SideOrder>(source: &SideBook<S>, destination: &SideBook<S>) -> usize {
    let detached: Vec<Node> = source.nodes().iter().map(detach::<S>).collect();
    let copied = detached.len();
    destination.extend(detached);
    copied
}

fn detach<S: SideOrder>(node: &Node) -> Node {
    let source = match node.peek() {
        Some(order) => QuoteSource::order(order),
        None => QuoteSource::book(Arc::new(SideBook::<S>::new())),
    };
    Node::new(node.key(), source, node.weight())
}

impl OrderBook {
    /// A new book with the same symbol and settings, holding an independent
    /// copy of every node
    pub fn deep_copy(&self) -> OrderBook {
        let destination = OrderBook::build(self.config().clone());
        copy(self, &destination);
        destination
    }
}
