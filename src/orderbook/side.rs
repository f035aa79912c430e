//! One side of the book: a keyed, self-indexing heap behind a single lock.

use super::heap::{HeapOrder, IndexedHeap};
use super::node::Node;
use super::order::{Order, OrderRef};
use super::source::Peek;
use parking_lot::Mutex;
use pricelevel::Side;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::marker::PhantomData;
use tracing::trace;

/// Price ordering of one side of the market.
pub trait SideOrder: Send + Sync + 'static {
    /// Market side this ordering belongs to
    const SIDE: Side;

    /// Short name used in logs
    const NAME: &'static str;

    /// True when weighted price `a` is better than `b`
    fn better_price(a: f64, b: f64) -> bool;

    /// Total order over weighted prices, best first
    fn cmp_price(a: f64, b: f64) -> Ordering;
}

/// Sell side: lowest weighted price first
#[derive(Debug, Clone, Copy, Default)]
pub struct Ask;

/// Buy side: highest weighted price first
#[derive(Debug, Clone, Copy, Default)]
pub struct Bid;

impl SideOrder for Ask {
    const SIDE: Side = Side::Sell;
    const NAME: &'static str = "ask";

    #[inline]
    fn better_price(a: f64, b: f64) -> bool {
        a < b
    }

    fn cmp_price(a: f64, b: f64) -> Ordering {
        a.total_cmp(&b)
    }
}

impl SideOrder for Bid {
    const SIDE: Side = Side::Buy;
    const NAME: &'static str = "bid";

    #[inline]
    fn better_price(a: f64, b: f64) -> bool {
        a > b
    }

    fn cmp_price(a: f64, b: f64) -> Ordering {
        b.total_cmp(&a)
    }
}

// A node without a quote ranks below every node with one; two of them tie.
impl<S: SideOrder> HeapOrder<Node> for S {
    #[inline]
    fn better(a: &Node, b: &Node) -> bool {
        match (a.rank, b.rank) {
            (Some(a), Some(b)) => S::better_price(a, b),
            (Some(_), None) => true,
            (None, _) => false,
        }
    }
}

/// Ask side of a book
pub type AskBook = SideBook<Ask>;

/// Bid side of a book
pub type BidBook = SideBook<Bid>;

struct SideState<S> {
    heap: IndexedHeap<Node, S>,
    keys: HashMap<String, usize>,

    /// Handles of nodes whose source is a nested book
    nested: HashSet<usize>,
}

impl<S: SideOrder> SideState<S> {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: IndexedHeap::with_capacity(capacity),
            keys: HashMap::with_capacity(capacity),
            nested: HashSet::new(),
        }
    }

    fn remove_key(&mut self, key: &str) -> Option<Node> {
        let handle = self.keys.remove(key)?;
        self.nested.remove(&handle);
        let node = self.heap.remove(handle);
        debug_assert!(node.is_some(), "key map points at a missing heap slot");
        node
    }

    fn insert(&mut self, mut node: Node) -> Option<Node> {
        let replaced = self.remove_key(node.key());
        let key = node.key().to_string();
        let nested = node.source().is_nested();
        node.rerank();
        let handle = self.heap.push(node);
        if nested {
            self.nested.insert(handle);
        }
        self.keys.insert(key, handle);
        debug_assert_eq!(self.keys.len(), self.heap.len());
        replaced
    }

    fn pop_root(&mut self) -> Option<Node> {
        let node = self.heap.pop_root()?;
        if let Some(handle) = self.keys.remove(node.key()) {
            self.nested.remove(&handle);
        }
        debug_assert_eq!(self.keys.len(), self.heap.len());
        Some(node)
    }

    /// Re-rank one node from its live source and re-sift it
    fn rerank(&mut self, handle: usize) -> bool {
        match self.heap.get_mut(handle) {
            Some(node) => {
                node.rerank();
                self.heap.fix(handle)
            }
            None => false,
        }
    }

    /// Bring every nested node's rank up to date with its book.
    ///
    /// One node is re-ranked and re-sifted at a time, so every sift runs on an
    /// otherwise ordered heap. O(k log n) for k nested nodes.
    fn refresh(&mut self) {
        for &handle in &self.nested {
            let changed = self.heap.get_mut(handle).is_some_and(Node::rerank);
            if changed {
                self.heap.fix(handle);
            }
        }
    }
}

/// Keyed priority queue of [`Node`]s for one side of the market.
///
/// All structural edits and reads run under one exclusive lock, so the heap
/// and the key map are never observed out of step. Nodes that nest another
/// side book are re-ranked from that book on every `peek`, `pop` and
/// consistency check, so changes inside a nested book show through without
/// any call on this side. The nested book is queried while this side's lock
/// is held: nesting must form a tree, a side book must never be reachable
/// from its own nodes.
///
/// Leaf orders mutated in place through an [`OrderRef`] are re-ranked only
/// by [`SideBook::fix`].
pub struct SideBook<S> {
    state: Mutex<SideState<S>>,
    _side: PhantomData<S>,
}

impl<S: SideOrder> SideBook<S> {
    /// Create an empty side
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create an empty side with room for `capacity` nodes
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            state: Mutex::new(SideState::with_capacity(capacity)),
            _side: PhantomData,
        }
    }

    /// Market side of this book
    pub fn side(&self) -> Side {
        S::SIDE
    }

    /// Number of nodes, including nodes whose source has no quote
    pub fn len(&self) -> usize {
        self.state.lock().heap.len()
    }

    /// True when the side holds no nodes
    pub fn is_empty(&self) -> bool {
        self.state.lock().heap.is_empty()
    }

    /// Insert `node`, replacing any node with the same key.
    ///
    /// The removal of the old node and the insertion of the new one happen in
    /// one critical section. Returns the replaced node, if any.
    pub fn push(&self, node: Node) -> Option<Node> {
        trace!(
            "{} book: push {} (weight {})",
            S::NAME,
            node.key(),
            node.weight()
        );
        self.state.lock().insert(node)
    }

    /// Insert every node under a single lock acquisition
    pub fn extend<I>(&self, nodes: I)
    where
        I: IntoIterator<Item = Node>,
    {
        let mut state = self.state.lock();
        for node in nodes {
            trace!("{} book: push {} (weight {})", S::NAME, node.key(), node.weight());
            state.insert(node);
        }
    }

    /// Remove and return the best node
    pub fn pop(&self) -> Option<Node> {
        let mut state = self.state.lock();
        state.refresh();
        let node = state.pop_root()?;
        trace!("{} book: pop {}", S::NAME, node.key());
        Some(node)
    }

    /// Remove the node stored under `key`; absent keys are ignored
    pub fn remove(&self, key: &str) -> Option<Node> {
        let removed = self.state.lock().remove_key(key);
        if removed.is_some() {
            trace!("{} book: remove {}", S::NAME, key);
        }
        removed
    }

    /// Re-sift the node stored under `key` after its price or weight changed.
    ///
    /// Returns `false` when the key is absent.
    pub fn fix(&self, key: &str) -> bool {
        let mut state = self.state.lock();
        let Some(&handle) = state.keys.get(key) else {
            return false;
        };
        trace!("{} book: fix {}", S::NAME, key);
        state.rerank(handle)
    }

    /// Change the weight of the node stored under `key` and re-sift it
    pub fn set_weight(&self, key: &str, weight: f64) -> bool {
        let mut state = self.state.lock();
        let Some(&handle) = state.keys.get(key) else {
            return false;
        };
        if let Some(node) = state.heap.get_mut(handle) {
            node.weight = weight;
        }
        trace!("{} book: weight of {} set to {}", S::NAME, key, weight);
        state.rerank(handle)
    }

    /// A view of the node stored under `key`; its quote source is shared
    pub fn get(&self, key: &str) -> Option<Node> {
        let state = self.state.lock();
        let handle = *state.keys.get(key)?;
        state.heap.get(handle).cloned()
    }

    /// True when a node is stored under `key`
    pub fn contains(&self, key: &str) -> bool {
        self.state.lock().keys.contains_key(key)
    }

    /// Every key on this side, in no particular order
    pub fn keys(&self) -> Vec<String> {
        self.state.lock().keys.keys().cloned().collect()
    }

    /// Views of every node, best first
    pub fn nodes(&self) -> Vec<Node> {
        let mut ranked: Vec<(Option<f64>, Node)> = self
            .state
            .lock()
            .heap
            .iter()
            .map(|node| (node.weighted_price(), node.clone()))
            .collect();
        ranked.sort_by(|(a, _), (b, _)| match (a, b) {
            (Some(a), Some(b)) => S::cmp_price(*a, *b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });
        ranked.into_iter().map(|(_, node)| node).collect()
    }

    /// Total quantity across nodes that currently have a quote
    pub fn volume(&self) -> f64 {
        self.state
            .lock()
            .heap
            .iter()
            .filter_map(|node| node.peek())
            .map(|order| order.quantity)
            .sum()
    }

    /// Drop every node
    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.heap.clear();
        state.keys.clear();
        state.nested.clear();
        trace!("{} book: cleared", S::NAME);
    }

    /// Full consistency scan of the heap, the key map and the nested set.
    ///
    /// Nested nodes are re-ranked first, so a `true` result also means every
    /// nested node sits where its book's current best quote puts it.
    pub fn is_consistent(&self) -> bool {
        let mut state = self.state.lock();
        state.refresh();
        let keyed = state.keys.iter().all(|(key, &handle)| {
            state
                .heap
                .get(handle)
                .is_some_and(|node| node.key() == key.as_str())
        });
        let nested = state.heap.iter().filter(|node| node.source().is_nested()).count()
            == state.nested.len()
            && state.nested.iter().all(|&handle| {
                state
                    .heap
                    .get(handle)
                    .is_some_and(|node| node.source().is_nested())
            });
        state.keys.len() == state.heap.len() && state.heap.is_consistent() && keyed && nested
    }
}

// Reads re-rank nested nodes first, so the root is the live best.
impl<S: SideOrder> Peek for SideBook<S> {
    fn peek(&self) -> Option<Order> {
        let mut state = self.state.lock();
        state.refresh();
        state.heap.peek().and_then(|node| node.peek())
    }

    fn peek_ref(&self) -> Option<OrderRef> {
        let mut state = self.state.lock();
        state.refresh();
        state.heap.peek().and_then(|node| node.peek_ref())
    }

    fn best_price(&self) -> Option<f64> {
        let mut state = self.state.lock();
        state.refresh();
        state.heap.peek().and_then(|node| node.best_price())
    }
}

impl<S: SideOrder> Default for SideBook<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: SideOrder> fmt::Debug for SideBook<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("SideBook")
            .field("side", &S::NAME)
            .field("len", &state.heap.len())
            .field("best", &state.heap.peek().and_then(|node| node.peek()))
            .finish()
    }
}
