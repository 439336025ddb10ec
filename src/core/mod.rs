//! Core rate acquisition and conversion logic

pub mod cache;
pub mod config;
pub mod conversion;
pub mod fallback;
pub mod log;
pub mod rates;
pub mod resolution;

// Re-export main types for cleaner imports
pub use cache::RateCache;
pub use conversion::{ConversionError, ConversionRequest, ConversionResult, convert};
pub use rates::{RateError, RateProvider, RateTable};
pub use resolution::{RateResolution, RateSource, resolve_rates};
