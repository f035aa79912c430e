
pub use nested::register_benchmarks;
