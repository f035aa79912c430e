use composite_orderbook::{Node, Order, OrderBook};
use criterion::{BenchmarkId, Criterion};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::{Duration, Instant};

/// Register benchmarks that test different contention patterns
pub fn register_contention_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("OrderBook - Contention Patterns");

    // Test with different read/write ratios
    for read_ratio in [0, 25, 50, 75, 95].iter() {
        // Fixed at 8 threads which is a common server core count
        let thread_count = 8;

        group.bench_with_input(
            BenchmarkId::new("read_write_ratio", read_ratio),
            read_ratio,
            |b, &read_ratio| {
                b.iter_custom(|iters| {
                    measure_read_write_contention(thread_count, iters, read_ratio)
                });
            },
        );
    }

    // Hot keys: share of pushes that replace one shared key on the ask side
    for hot_key_percentage in [0, 50, 100].iter() {
        let thread_count = 8;

        group.bench_with_input(
            BenchmarkId::new("hot_key_contention", hot_key_percentage),
            hot_key_percentage,
            |b, &hot_key_percentage| {
                b.iter_custom(|iters| {
                    measure_hot_key_contention(thread_count, iters, hot_key_percentage)
                });
            },
        );
    }

    // Writers split across both sides versus piled onto one side
    for split_sides in [false, true].iter() {
        group.bench_with_input(
            BenchmarkId::new("side_split", split_sides),
            split_sides,
            |b, &split_sides| {
                b.iter_custom(|iters| measure_side_split(8, iters, split_sides));
            },
        );
    }

    group.finish();
}

fn populated_book() -> Arc<OrderBook> {
    let order_book = Arc::new(OrderBook::new("TEST-SYMBOL"));
    for i in 0..500 {
        let key = format!("seed-{i}");
        let offset = (i % 50) as f64;
        order_book
            .asks()
            .push(Node::new(key.as_str(), Order::new(1010.0 + offset, 10.0, key.as_str()), 1.0));
        order_book
            .bids()
            .push(Node::new(key.as_str(), Order::new(990.0 - offset, 10.0, key.as_str()), 1.0));
    }
    order_book
}

/// Spawn `thread_count` workers behind a start/stop barrier and time the work
fn run_timed<F>(thread_count: usize, order_book: Arc<OrderBook>, work: F) -> Duration
where
    F: Fn(&OrderBook, usize) + Send + Sync + 'static,
{
    let barrier = Arc::new(Barrier::new(thread_count + 1)); // +1 for main thread
    let work = Arc::new(work);
    let mut handles = Vec::with_capacity(thread_count);

    for thread_id in 0..thread_count {
        let thread_order_book = Arc::clone(&order_book);
        let thread_barrier = Arc::clone(&barrier);
        let thread_work = Arc::clone(&work);

        handles.push(thread::spawn(move || {
            thread_barrier.wait();
            thread_work(&thread_order_book, thread_id);
            // Signal completion
            thread_barrier.wait();
        }));
    }

    // Start timing
    barrier.wait();
    let start = Instant::now();

    // Wait for all threads to complete
    barrier.wait();
    let duration = start.elapsed();

    for handle in handles {
        let _ = handle.join();
    }

    duration
}

/// Measures time for operations with different read/write ratios
/// read_ratio = percentage of read operations (0-100)
fn measure_read_write_contention(thread_count: usize, iterations: u64, read_ratio: usize) -> Duration {
    run_timed(thread_count, populated_book(), move |book, thread_id| {
        for i in 0..iterations {
            let is_read = (i as usize % 100) < read_ratio;

            if is_read {
                if i % 2 == 0 {
                    let _ = book.create_snapshot(5);
                } else {
                    let _ = book.midpoint();
                    let _ = book.spread();
                    let _ = book.best_bid();
                }
            } else {
                let key = format!("t{thread_id}-{}", i % 64);
                let offset = (i % 20) as f64;
                match i % 3 {
                    0 => {
                        book.asks()
                            .push(Node::new(key.as_str(), Order::new(1005.0 + offset, 1.0, key.as_str()), 1.0));
                    }
                    1 => {
                        book.bids()
                            .push(Node::new(key.as_str(), Order::new(995.0 - offset, 1.0, key.as_str()), 1.0));
                    }
                    _ => {
                        book.asks().remove(&key);
                    }
                }
            }
        }
    })
}

/// Measures replace-by-key pressure on one shared key
/// hot_key_percentage = percentage of pushes targeting the shared key (0-100)
fn measure_hot_key_contention(thread_count: usize, iterations: u64, hot_key_percentage: usize) -> Duration {
    run_timed(thread_count, populated_book(), move |book, thread_id| {
        for i in 0..iterations {
            let key = if (i as usize % 100) < hot_key_percentage {
                "hot".to_string()
            } else {
                format!("t{thread_id}-{}", i % 64)
            };
            let price = 1000.0 + (i % 10) as f64;
            book.asks()
                .push(Node::new(key.as_str(), Order::new(price, 1.0, key.as_str()), 1.0));
        }
    })
}

/// Measures writers that either share one side lock or spread over both
fn measure_side_split(thread_count: usize, iterations: u64, split_sides: bool) -> Duration {
    run_timed(thread_count, populated_book(), move |book, thread_id| {
        for i in 0..iterations {
            let key = format!("t{thread_id}-{}", i % 64);
            let price = 1000.0 + (i % 10) as f64;
            let node = Node::new(key.as_str(), Order::new(price, 1.0, key.as_str()), 1.0);
            if split_sides && thread_id % 2 == 1 {
                book.bids().push(node);
            } else {
                book.asks().push(node);
            }
        }
    })
}
