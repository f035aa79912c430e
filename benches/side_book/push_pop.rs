use composite_orderbook::{AskBook, BidBook, Node, Order};
use criterion::{BenchmarkId, Criterion};
use std::hint::black_box;

fn node(i: usize) -> Node {
    let key = format!("order-{i}");
    // Scatter prices so pushes do not arrive already sorted
    let price = 1000.0 + ((i * 7919) % 1000) as f64;
    Node::new(key.as_str(), Order::new(price, 10.0, key.as_str()), 1.0)
}

/// Register benchmarks for filling and draining one side
pub fn register_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("SideBook - Push/Pop");

    for count in [100, 1_000, 10_000].iter() {
        let nodes: Vec<Node> = (0..*count).map(node).collect();

        group.bench_with_input(BenchmarkId::new("push", count), &nodes, |b, nodes| {
            b.iter(|| {
                let asks = AskBook::with_capacity(nodes.len());
                for n in nodes {
                    black_box(asks.push(n.clone()));
                }
            })
        });

        group.bench_with_input(BenchmarkId::new("extend", count), &nodes, |b, nodes| {
            b.iter(|| {
                let asks = AskBook::with_capacity(nodes.len());
                asks.extend(nodes.iter().cloned());
                black_box(asks.len())
            })
        });

        group.bench_with_input(BenchmarkId::new("push_then_drain", count), &nodes, |b, nodes| {
            b.iter(|| {
                let bids = BidBook::with_capacity(nodes.len());
                bids.extend(nodes.iter().cloned());
                while let Some(n) = bids.pop() {
                    black_box(n);
                }
            })
        });
    }

    group.finish();
}
