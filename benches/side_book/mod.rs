pub mod push_pop;

pub fn register_benchmarks(c: &mut criterion::Criterion) {
    push_pop::register_benchmarks(c);
    update::register_benchmarks(c);
}
