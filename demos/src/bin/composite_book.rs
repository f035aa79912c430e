// demos/src/bin/composite_book.rs

use composite_orderbook::{BookConfig, Node, Order, OrderBook, QuoteSource, copy};
use pricelevel::{Side, setup_logger};
use std::sync::Arc;
use tracing::{error, info};

const EUR_USD: f64 = 1.08;

fn venue(symbol: &str, asks: &[(f64, f64)], bids: &[(f64, f64)]) -> OrderBook {
    let book = OrderBook::new(symbol);
    for (i, &(price, quantity)) in asks.iter().enumerate() {
        let key = format!("{symbol}-a{i}");
        let order = Order::new(price, quantity, key.as_str()).with_origin(symbol);
        book.asks().push(Node::new(key, order, 1.0));
    }
    for (i, &(price, quantity)) in bids.iter().enumerate() {
        let key = format!("{symbol}-b{i}");
        let order = Order::new(price, quantity, key.as_str()).with_origin(symbol);
        book.bids().push(Node::new(key, order, 1.0));
    }
    book
}

fn main() {
    setup_logger();
    info!("Composite OrderBook Example");

    let usd = venue("NY", &[(64_100.0, 0.4), (64_150.0, 1.0)], &[(63_900.0, 0.8)]);
    let eur = venue("FRA", &[(59_200.0, 0.3)], &[(59_100.0, 1.2), (58_800.0, 2.0)]);

    let config = BookConfig::from_json(r#"{"symbol": "BTC/USD composite", "feed_capacity": 16}"#);
    let composite = match config.and_then(OrderBook::with_config) {
        Ok(book) => book,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return;
        }
    };

    // EUR prices are converted into USD through the node weight
    composite
        .asks()
        .push(Node::new("NY", QuoteSource::book(Arc::clone(usd.asks())), 1.0));
    composite
        .asks()
        .push(Node::new("FRA", QuoteSource::book(Arc::clone(eur.asks())), EUR_USD));
    composite
        .bids()
        .push(Node::new("NY", QuoteSource::book(Arc::clone(usd.bids())), 1.0));
    composite
        .bids()
        .push(Node::new("FRA", QuoteSource::book(Arc::clone(eur.bids())), EUR_USD));

    info!("Best ask: {:?}", composite.best_ask());
    info!("Best bid: {:?}", composite.best_bid());
    info!("Composite midpoint (USD): {}", composite.midpoint());

    let feeds = composite.feeds();
    if let Err(e) = composite.publish_quote() {
        error!("Could not publish quote: {}", e);
    }
    while let Ok(quote) = feeds.quotes.try_recv() {
        match serde_json::to_string(&quote) {
            Ok(json) => info!("Quote feed: {}", json),
            Err(e) => error!("Could not encode quote: {}", e),
        }
    }

    // The Frankfurt venue pulls its best bid; the composite follows on its own
    eur.bids().remove("FRA-b0");
    info!("After FRA update, best bid: {:?}", composite.best_bid());

    match composite.publish_trade(Side::Buy, 64_000.0, 0.25) {
        Ok(trade) => info!("Trade {} published", trade.trade_id),
        Err(e) => error!("Could not publish trade: {}", e),
    }

    // Freeze the composite into a flat book of plain orders
    let frozen = OrderBook::new("frozen");
    copy(&composite, &frozen);
    usd.clear();
    info!("Live composite best ask after NY clears: {:?}", composite.best_ask());
    info!("Frozen copy best ask: {:?}", frozen.best_ask());
}
