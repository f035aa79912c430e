//! Multi-threaded tests: per-side locking, atomic replace-by-key and nested reads

#[cfg(test)]
mod concurrency_tests {
    use composite_orderbook::{AskBook, BidBook, Node, Order, OrderBook, Peek, QuoteSource};
    use std::sync::{Arc, Barrier};
    use std::thread;

    const NUM_THREADS: usize = 8;
    const OPS_PER_THREAD: usize = 500;

    #[test]
    fn test_concurrent_pushes_of_same_key_leave_one_node() {
        let asks = Arc::new(AskBook::new());
        let barrier = Arc::new(Barrier::new(NUM_THREADS));

        let handles: Vec<_> = (0..NUM_THREADS)
            .map(|t| {
                let asks = Arc::clone(&asks);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    for i in 0..OPS_PER_THREAD {
                        let price = 100.0 + (t * OPS_PER_THREAD + i) as f64;
                        asks.push(Node::new("shared", Order::new(price, 1.0, "shared"), 1.0));
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(asks.len(), 1, "Replacing by key must never duplicate a node");
        assert!(asks.contains("shared"));
        assert!(asks.is_consistent());
    }

    #[test]
    fn test_concurrent_distinct_keys() {
        let book = Arc::new(OrderBook::new("CONC"));
        let barrier = Arc::new(Barrier::new(NUM_THREADS));

        let handles: Vec<_> = (0..NUM_THREADS)
            .map(|t| {
                let book = Arc::clone(&book);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    for i in 0..OPS_PER_THREAD {
                        let key = format!("t{t}-{i}");
                        let price = ((i * 7919 + t * 31) % 1000) as f64;
                        let order = Order::new(price, 1.0, key.as_str());
                        if t % 2 == 0 {
                            book.asks().push(Node::new(key.as_str(), order, 1.0));
                        } else {
                            book.bids().push(Node::new(key.as_str(), order, 1.0));
                        }
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let per_side = NUM_THREADS / 2 * OPS_PER_THREAD;
        assert_eq!(book.asks().len(), per_side);
        assert_eq!(book.bids().len(), per_side);
        assert!(book.asks().is_consistent());
        assert!(book.bids().is_consistent());
        assert_eq!(book.volume(), (2 * per_side) as f64);

        let min_ask = book
            .asks()
            .nodes()
            .iter()
            .filter_map(|n| n.best_price())
            .fold(f64::INFINITY, f64::min);
        assert_eq!(book.best_ask().map(|o| o.price), Some(min_ask));
    }

    #[test]
    fn test_mixed_operations_keep_heap_consistent() {
        let bids = Arc::new(BidBook::new());
        let barrier = Arc::new(Barrier::new(NUM_THREADS));

        let handles: Vec<_> = (0..NUM_THREADS)
            .map(|t| {
                let bids = Arc::clone(&bids);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    for i in 0..OPS_PER_THREAD {
                        let key = format!("k{}", (t * 13 + i) % 64);
                        match i % 5 {
                            0 | 1 => {
                                let price = (i % 97) as f64;
                                bids.push(Node::new(key.as_str(), Order::new(price, 1.0, key.as_str()), 1.0));
                            }
                            2 => {
                                bids.remove(&key);
                            }
                            3 => {
                                bids.set_weight(&key, 1.0 + (i % 3) as f64);
                            }
                            _ => {
                                bids.pop();
                            }
                        }
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert!(bids.is_consistent());
        assert!(bids.len() <= 64);
        let mut previous = f64::INFINITY;
        while let Some(node) = bids.pop() {
            let price = node.weighted_price().expect("leaf nodes always quote");
            assert!(price <= previous, "Bids must pop in non-increasing order");
            previous = price;
        }
    }

    #[test]
    fn test_readers_of_nested_book_during_writes() {
        let venue = Arc::new(OrderBook::new("VENUE"));
        let root = Arc::new(OrderBook::new("ROOT"));
        root.asks()
            .push(Node::new("venue", QuoteSource::book(Arc::clone(venue.asks())), 2.0));
        let barrier = Arc::new(Barrier::new(2));

        let writer = {
            let venue = Arc::clone(&venue);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for i in 0..OPS_PER_THREAD {
                    let key = format!("a{}", i % 16);
                    venue
                        .asks()
                        .push(Node::new(key.as_str(), Order::new(50.0 + i as f64, 1.0, key.as_str()), 1.0));
                }
            })
        };

        let reader = {
            let root = Arc::clone(&root);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for _ in 0..OPS_PER_THREAD {
                    if let Some(order) = root.best_ask() {
                        assert!(order.price >= 50.0);
                    }
                    let _ = root.midpoint();
                }
            })
        };

        writer.join().unwrap();
        reader.join().unwrap();

        assert_eq!(venue.asks().len(), 16);
        let best = venue.best_ask().expect("venue quotes");
        assert_eq!(root.best_ask(), Some(best.clone()));
        assert_eq!(root.asks().get("venue").and_then(|n| n.weighted_price()), Some(best.price * 2.0));
    }

    #[test]
    fn test_concurrent_copies_and_writes() {
        let source = Arc::new(OrderBook::new("SRC"));
        for i in 0..32 {
            let key = format!("a{i}");
            source
                .asks()
                .push(Node::new(key.as_str(), Order::new(100.0 + i as f64, 1.0, key.as_str()), 1.0));
        }
        let barrier = Arc::new(Barrier::new(2));

        let copier = {
            let source = Arc::clone(&source);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                (0..50).map(|_| source.deep_copy()).collect::<Vec<_>>()
            })
        };
        let writer = {
            let source = Arc::clone(&source);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for i in 0..OPS_PER_THREAD {
                    source.bids().push(Node::new(
                        format!("b{}", i % 8),
                        Order::new(90.0 - (i % 8) as f64, 1.0, "bid"),
                        1.0,
                    ));
                }
            })
        };

        let copies = copier.join().unwrap();
        writer.join().unwrap();

        for copy in &copies {
            assert_eq!(copy.asks().len(), 32);
            assert!(copy.bids().len() <= 8);
            assert!(copy.asks().is_consistent());
            assert_eq!(copy.best_ask().map(|o| o.price), Some(100.0));
        }
    }
}
