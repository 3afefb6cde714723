//! Unit normalization - plot area to square feet per floor

use crate::estimation::error::{EstimationError, Result};
use crate::estimation::types::UnitType;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::debug;

/// Largest per-floor footprint accepted, in sq ft
pub const MAX_SQFT_PER_FLOOR: Decimal = dec!(10000000);

/// Square feet in one unit of plot area
pub fn sqft_per_unit(unit: UnitType) -> Decimal {
    match unit {
        UnitType::Marla => dec!(225),
        UnitType::Kanal => dec!(4500), // 20 Marla
        UnitType::SqFt => dec!(1),
    }
}

/// Convert plot area into square feet per floor. No rounding.
pub fn normalize(area: Decimal, unit: UnitType) -> Result<Decimal> {
    if area <= Decimal::ZERO {
        return Err(EstimationError::InvalidInput {
            field: "area",
            reason: format!("must be greater than zero, got {}", area),
        });
    }

    let sqft = area
        .checked_mul(sqft_per_unit(unit))
        .filter(|sqft| *sqft <= MAX_SQFT_PER_FLOOR)
        .ok_or(EstimationError::OutOfRange("plot area"))?
        .normalize();

    debug!("Normalized {} {} to {} sqft per floor", area, unit, sqft);
    Ok(sqft)
}
