//! Quote sources: anything that can name its current best concrete order

use super::order::{Order, OrderRef};
use std::fmt;
use std::sync::Arc;

/// Capability shared by leaf orders and side books.
///
/// Implementors must be cheap to query repeatedly: a side book calls
/// [`Peek::best_price`] on every comparison while it sifts.
pub trait Peek: Send + Sync {
    /// Current best concrete order, or `None` when there is no quote
    fn peek(&self) -> Option<Order>;

    /// Live handle to the leaf order behind the current best quote
    fn peek_ref(&self) -> Option<OrderRef>;

    /// Price of the current best quote
    fn best_price(&self) -> Option<f64> {
        self.peek().map(|order| order.price)
    }
}

/// Where a node gets its quote from.
#[derive(Clone)]
pub enum QuoteSource {
    /// A single resting order
    Order(OrderRef),

    /// A nested side book, queried live on every peek
    Book(Arc<dyn Peek>),
}

impl QuoteSource {
    /// Leaf source owning a fresh handle to `order`
    pub fn order(order: Order) -> Self {
        QuoteSource::Order(order.into_ref())
    }

    /// Nested source delegating to `book`
    pub fn book<B: Peek + 'static>(book: Arc<B>) -> Self {
        QuoteSource::Book(book)
    }

    /// True for the nested variant
    pub fn is_nested(&self) -> bool {
        matches!(self, QuoteSource::Book(_))
    }
}

impl Peek for QuoteSource {
    fn peek(&self) -> Option<Order> {
        match self {
            QuoteSource::Order(order) => Some(order.read().clone()),
            QuoteSource::Book(book) => book.peek(),
        }
    }

    fn peek_ref(&self) -> Option<OrderRef> {
        match self {
            QuoteSource::Order(order) => Some(Arc::clone(order)),
            QuoteSource::Book(book) => book.peek_ref(),
        }
    }

    fn best_price(&self) -> Option<f64> {
        match self {
            QuoteSource::Order(order) => Some(order.read().price),
            QuoteSource::Book(book) => book.best_price(),
        }
    }
}

impl From<Order> for QuoteSource {
    fn from(order: Order) -> Self {
        QuoteSource::order(order)
    }
}

impl From<OrderRef> for QuoteSource {
    fn from(order: OrderRef) -> Self {
        QuoteSource::Order(order)
    }
}

impl fmt::Debug for QuoteSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuoteSource::Order(order) => f.debug_tuple("Order").field(&*order.read()).finish(),
            QuoteSource::Book(book) => f.debug_tuple("Book").field(&book.peek()).finish(),
        }
    }
}
