//! Covered area - total built-up square footage across floors

use crate::estimation::types::Floors;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Share of the ground floor footprint each upper floor adds
/// (stairwells and voids are not covered twice)
pub const UPPER_FLOOR_SHARE: Decimal = dec!(0.85);

/// Total covered area: sqft_per_floor * (1 + (floors - 1) * 0.85)
///
/// An approximation, not floors * footprint.
pub fn total_covered_area(sqft_per_floor: Decimal, floors: Floors) -> Decimal {
    let upper_floors = Decimal::from(floors.count() - 1);
    (sqft_per_floor * (Decimal::ONE + upper_floors * UPPER_FLOOR_SHARE)).normalize()
}
