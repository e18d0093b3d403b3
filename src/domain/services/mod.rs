pub mod range_resolver;

pub use range_resolver::RangeResolver;
