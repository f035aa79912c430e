// demos/src/bin/multi_threaded_book.rs

use composite_orderbook::{Node, Order, OrderBook};
use pricelevel::{Side, setup_logger};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Instant;
use tracing::info;

const THREADS: usize = 8;
const OPS_PER_THREAD: usize = 10_000;

fn main() {
    setup_logger();
    info!("Multi-threaded OrderBook Example");

    let book = Arc::new(OrderBook::new("ETH/USD"));
    let barrier = Arc::new(Barrier::new(THREADS));
    let feeds = book.feeds();

    let start = Instant::now();
    let handles: Vec<_> = (0..THREADS)
        .map(|thread_id| {
            let book = Arc::clone(&book);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                let side = if thread_id % 2 == 0 { Side::Sell } else { Side::Buy };
                for i in 0..OPS_PER_THREAD {
                    // Each thread cycles through 100 keys, so most pushes replace
                    let key = format!("t{thread_id}-{}", i % 100);
                    let offset = ((i * 7) % 50) as f64;
                    match side {
                        Side::Sell => {
                            let order = Order::new(3_000.0 + offset, 1.0, key.as_str());
                            book.asks().push(Node::new(key, order, 1.0));
                        }
                        Side::Buy => {
                            let order = Order::new(2_990.0 - offset, 1.0, key.as_str());
                            book.bids().push(Node::new(key, order, 1.0));
                        }
                    }
                    if i % 1_000 == 0 {
                        let _ = book.publish_trade(side, 2_995.0, 0.1);
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        let _ = handle.join();
    }
    let elapsed = start.elapsed();

    let total = THREADS * OPS_PER_THREAD;
    info!(
        "{} pushes in {:?} ({:.0} ops/s)",
        total,
        elapsed,
        total as f64 / elapsed.as_secs_f64()
    );
    info!(
        "asks: {} nodes, bids: {} nodes, consistent: {}",
        book.asks().len(),
        book.bids().len(),
        book.asks().is_consistent() && book.bids().is_consistent()
    );
    info!("midpoint {} spread {}", book.midpoint(), book.spread());
    info!(
        "trades published: {} buys, {} sells",
        feeds.buy_trades.try_iter().count(),
        feeds.sell_trades.try_iter().count()
    );
}
