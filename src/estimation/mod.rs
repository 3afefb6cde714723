//! Cost estimation engine - linear pipeline from project inputs to a priced report
//!
//! normalize -> covered area -> quantities -> cost -> report
//!
//! Every stage is a pure function of its arguments. Nothing is cached between
//! calls and neither the inputs nor the price table are mutated.

pub mod area;
pub mod cost;
pub mod error;
pub mod normalize;
pub mod policy;
pub mod quantities;
pub mod report;
pub mod types;

pub use error::{EstimationError, Result};
pub use policy::{BreakdownBasis, EstimationPolicy, FixtureAllowances, FoundationWorkRates};
pub use types::*;

use crate::pricing::{MaterialPrice, PriceBook};
use tracing::{debug, info};

/// Run the full pipeline against one price table
pub fn estimate(
    inputs: &ProjectInputs,
    prices: &[MaterialPrice],
    policy: &EstimationPolicy,
) -> Result<EstimationResult> {
    inputs.validate()?;

    // Step 1: plot area to sqft per floor
    let sqft_per_floor = normalize::normalize(inputs.area, inputs.unit_type)?;

    // Step 2: covered area across floors
    let total_area = area::total_covered_area(sqft_per_floor, inputs.floors);
    debug!(
        "Covered area: {} sqft over {} floor(s)",
        total_area,
        inputs.floors.count()
    );

    // Step 3: material quantities
    let quantities = quantities::estimate_quantities(total_area, inputs, policy)?;

    // Step 4: price and sum
    let unit_prices = cost::resolve_unit_prices(prices);
    let costs = cost::aggregate_cost(&quantities, total_area, inputs, &unit_prices, policy)?;

    // Step 5: breakdown and feasibility
    let result = report::build_report(
        inputs,
        policy,
        sqft_per_floor,
        total_area,
        quantities,
        costs,
        unit_prices.fallbacks,
    );

    info!(
        "Estimated {} {} {} ({}): {} sqft, total {:.0}",
        inputs.area,
        inputs.unit_type,
        inputs.floors,
        inputs.quality,
        result.total_covered_area_sqft,
        result.total_project_cost
    );

    Ok(result)
}

/// Resolve the city's table from a price book, then estimate
pub fn estimate_for_city(
    inputs: &ProjectInputs,
    book: &PriceBook,
    policy: &EstimationPolicy,
) -> Result<EstimationResult> {
    let table = book.table_for(&inputs.city);
    if table.is_fallback {
        info!(
            "No price table for city '{}', using default prices",
            inputs.city
        );
    }
    estimate(inputs, table.prices, policy)
}

/// Convert a loosely-typed request and estimate in one go
pub fn estimate_request(
    request: ProjectRequest,
    book: &PriceBook,
    policy: &EstimationPolicy,
) -> Result<EstimationResult> {
    let inputs = ProjectInputs::try_from(request)?;
    estimate_for_city(&inputs, book, policy)
}
