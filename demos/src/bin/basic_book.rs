// demos/src/bin/basic_book.rs

use composite_orderbook::{Node, Order, OrderBook, Peek};
use pricelevel::{Side, setup_logger};
use tracing::{info, warn};

fn main() {
    // Set up logging
    setup_logger();
    info!("Basic OrderBook Example");

    let book = OrderBook::new("BTC/USD");

    demo_adding_orders(&book);
    display_orderbook_state(&book);

    demo_replace_and_update(&book);
    display_orderbook_state(&book);

    demo_removal(&book);

    info!("\nFinal OrderBook State:");
    display_orderbook_state(&book);
}

fn demo_adding_orders(book: &OrderBook) {
    info!("\n--- Adding orders ---");
    for (i, price) in [10_050.0, 10_020.0, 10_100.0].into_iter().enumerate() {
        let key = format!("ask-{i}");
        book.asks()
            .push(Node::new(key.as_str(), Order::new(price, 0.5 + i as f64, key.as_str()), 1.0));
        info!("Added ask {} at {}", key, price);
    }
    for (i, price) in [9_950.0, 9_990.0, 9_900.0].into_iter().enumerate() {
        let key = format!("bid-{i}");
        book.bids()
            .push(Node::new(key.as_str(), Order::new(price, 1.0 + i as f64, key.as_str()), 1.0));
        info!("Added bid {} at {}", key, price);
    }
}

fn demo_replace_and_update(book: &OrderBook) {
    info!("\n--- Replacing and updating ---");

    // Pushing an existing key replaces the node
    if let Some(old) = book.asks().push(Node::new("ask-2", Order::new(10_010.0, 2.0, "ask-2"), 1.0)) {
        info!("Replaced {:?}", old.peek());
    }

    // Adjust the best bid in place, then re-sift it
    if let Some(handle) = book.bids().peek_ref() {
        let key = {
            let mut order = handle.write();
            order.price -= 100.0;
            order.order_id.clone()
        };
        if book.bids().fix(&key) {
            info!("Moved {} down by 100", key);
        }
    }

    // A weight scales the price a node is ranked by
    book.asks().set_weight("ask-0", 0.999);
    info!("ask-0 now ranks at {:?}", book.asks().get("ask-0").and_then(|n| n.weighted_price()));
}

fn demo_removal(book: &OrderBook) {
    info!("\n--- Removing orders ---");
    match book.asks().remove("ask-1") {
        Some(node) => info!("Removed {}", node.key()),
        None => warn!("ask-1 was not on the book"),
    }
    if book.asks().remove("missing").is_none() {
        info!("Removing an unknown key is a no-op");
    }
    if let Some(best) = book.bids().pop() {
        info!("Popped best bid {:?}", best.peek());
    }
    info!("Best {} is now {:?}", Side::Buy, book.peek(Side::Buy));
}

fn display_orderbook_state(book: &OrderBook) {
    info!("OrderBook: {}", book.symbol());
    info!("  best ask: {:?}", book.best_ask());
    info!("  best bid: {:?}", book.best_bid());
    info!("  midpoint: {}", book.midpoint());
    info!("  spread:   {}", book.spread());
    info!("  volume:   {}", book.volume());

    let snapshot = book.create_snapshot(3);
    for entry in &snapshot.asks {
        info!("  ask {:>8} {:?}", entry.key, entry.order);
    }
    for entry in &snapshot.bids {
        info!("  bid {:>8} {:?}", entry.key, entry.order);
    }
}
