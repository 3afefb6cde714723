// Library module for testable functions

pub mod api;
pub mod config;
pub mod estimation;
pub mod pricing;

pub use estimation::{
    estimate, estimate_for_city, estimate_request, EstimationError, EstimationPolicy,
    EstimationResult, ProjectInputs, ProjectRequest,
};
pub use pricing::{builtin_price_book, MaterialPrice, PriceBook};
