//! Quantity estimation - steel, cement and bricks from covered area
//!
//! Coefficients are empirical per-sqft rates for Pakistani RCC frame houses
//! with brick infill. They are tunable policy, not physical constants.
//!
//! | Input              | Steel kg/sqft           | Cement bags/sqft |
//! |--------------------|-------------------------|------------------|
//! | base               | 3.8 / 4.6 / 5.4 by floor| 0.42             |
//! | Heavy beams        | x1.18                   |                  |
//! | Raft foundation    | x1.30                   | +0.08            |
//! | Pile foundation    | x1.45                   |                  |
//! | Grade 40 / 75      | x1.22 / x0.88           |                  |
//! | Marble, Granite    |                         | +0.07            |
//! | Tiles              |                         | +0.04            |
//!
//! Cement and bricks are scaled by the wall partition factor `1 + rooms * 0.03`.

use crate::estimation::error::{EstimationError, Result};
use crate::estimation::policy::EstimationPolicy;
use crate::estimation::types::{
    BeamReinforcement, FloorFinish, Floors, FoundationType, MaterialQuantities, ProjectInputs,
    SteelGrade,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use tracing::debug;

pub const BRICKS_PER_SQFT: Decimal = dec!(28);
pub const BASE_CEMENT_BAGS_PER_SQFT: Decimal = dec!(0.42);

pub fn steel_kg_per_sqft(floors: Floors) -> Decimal {
    match floors {
        Floors::GroundOnly => dec!(3.8),
        Floors::GroundPlus1 => dec!(4.6),
        Floors::GroundPlus2 => dec!(5.4),
    }
}

fn reinforcement_multiplier(beams: BeamReinforcement) -> Decimal {
    match beams {
        BeamReinforcement::Standard => dec!(1.0),
        BeamReinforcement::Heavy => dec!(1.18),
    }
}

fn foundation_steel_multiplier(foundation: FoundationType) -> Decimal {
    match foundation {
        FoundationType::ShallowStrip => dec!(1.0),
        FoundationType::Raft => dec!(1.30),
        FoundationType::Piles => dec!(1.45),
    }
}

/// Lower grades need more cross-section for the same strength
fn grade_mass_multiplier(grade: SteelGrade) -> Decimal {
    match grade {
        SteelGrade::Grade40 => dec!(1.22),
        SteelGrade::Grade60 => dec!(1.0),
        SteelGrade::Grade75 => dec!(0.88),
    }
}

fn finish_cement_surcharge(finish: FloorFinish) -> Decimal {
    match finish {
        FloorFinish::Marble | FloorFinish::Granite => dec!(0.07), // leveling bed
        FloorFinish::Tiles => dec!(0.04),
        FloorFinish::Concrete | FloorFinish::Wooden => dec!(0),
    }
}

fn foundation_cement_surcharge(foundation: FoundationType) -> Decimal {
    match foundation {
        FoundationType::Raft => dec!(0.08),
        FoundationType::ShallowStrip | FoundationType::Piles => dec!(0),
    }
}

/// Extra interior partition work per room: 1 + rooms * 0.03
pub fn wall_partition_factor(rooms: u32) -> Decimal {
    Decimal::ONE + Decimal::from(rooms) * dec!(0.03)
}

/// Round half away from zero, like a hand calculation would
pub(crate) fn round_half_up(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

fn to_count(value: Decimal, what: &'static str) -> Result<u64> {
    round_half_up(value, 0)
        .to_u64()
        .ok_or(EstimationError::OutOfRange(what))
}

/// Steel in tons, rounded to 2 decimals
pub fn estimate_steel_tons(total_area: Decimal, inputs: &ProjectInputs) -> Decimal {
    let kg_per_sqft = steel_kg_per_sqft(inputs.floors)
        * reinforcement_multiplier(inputs.beam_reinforcement)
        * foundation_steel_multiplier(inputs.foundation_type)
        * grade_mass_multiplier(inputs.steel_grade);

    round_half_up(total_area * kg_per_sqft / dec!(1000), 2)
}

/// Cement bags per sqft before the partition factor
pub fn cement_factor(inputs: &ProjectInputs) -> Decimal {
    BASE_CEMENT_BAGS_PER_SQFT
        + finish_cement_surcharge(inputs.floor_finish)
        + foundation_cement_surcharge(inputs.foundation_type)
}

pub fn estimate_cement_bags(
    total_area: Decimal,
    inputs: &ProjectInputs,
    policy: &EstimationPolicy,
) -> Result<u64> {
    let bags = to_count(
        total_area * cement_factor(inputs) * wall_partition_factor(inputs.rooms),
        "cement bags",
    )?;

    let fixtures = match &policy.fixture_allowances {
        Some(allowance) => {
            u64::from(inputs.bathrooms) * allowance.cement_bags_per_bathroom
                + u64::from(inputs.kitchens) * allowance.cement_bags_per_kitchen
        }
        None => 0,
    };

    Ok(bags + fixtures)
}

pub fn estimate_brick_count(
    total_area: Decimal,
    inputs: &ProjectInputs,
    policy: &EstimationPolicy,
) -> Result<u64> {
    let bricks = to_count(
        total_area * BRICKS_PER_SQFT * wall_partition_factor(inputs.rooms),
        "brick count",
    )?;

    let fixtures = match &policy.fixture_allowances {
        Some(allowance) => {
            u64::from(inputs.rooms) * allowance.bricks_per_room
                + u64::from(inputs.bathrooms) * allowance.bricks_per_bathroom
        }
        None => 0,
    };

    Ok(bricks + fixtures)
}

/// Derive all material quantities for a covered area
pub fn estimate_quantities(
    total_area: Decimal,
    inputs: &ProjectInputs,
    policy: &EstimationPolicy,
) -> Result<MaterialQuantities> {
    let quantities = MaterialQuantities {
        steel_tons: estimate_steel_tons(total_area, inputs),
        cement_bags: estimate_cement_bags(total_area, inputs, policy)?,
        brick_count: estimate_brick_count(total_area, inputs, policy)?,
    };

    debug!(
        "Quantities for {} sqft: {} tons steel, {} bags cement, {} bricks",
        total_area, quantities.steel_tons, quantities.cement_bags, quantities.brick_count
    );

    Ok(quantities)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimation::policy::FixtureAllowances;
    use crate::estimation::types::{Quality, UnitType};

    fn mock_inputs() -> ProjectInputs {
        ProjectInputs {
            area: dec!(5),
            unit_type: UnitType::Marla,
            floors: Floors::GroundOnly,
            quality: Quality::Standard,
            city: "Lahore".to_string(),
            labor_rate: dec!(450),
            rooms: 3,
            bathrooms: 3,
            kitchens: 1,
            steel_grade: SteelGrade::Grade60,
            floor_finish: FloorFinish::Tiles,
            foundation_type: FoundationType::ShallowStrip,
            beam_reinforcement: BeamReinforcement::Standard,
        }
    }

    #[test]
    fn test_steel_for_five_marla() {
        // 1125 * 3.8 / 1000 = 4.275
        assert_eq!(estimate_steel_tons(dec!(1125), &mock_inputs()), dec!(4.28));
    }

    #[test]
    fn test_steel_for_one_marla() {
        // 225 * 3.8 / 1000 = 0.855
        assert_eq!(estimate_steel_tons(dec!(225), &mock_inputs()), dec!(0.86));
    }

    #[test]
    fn test_steel_multipliers_compound() {
        let mut inputs = mock_inputs();
        inputs.floors = Floors::GroundPlus1;
        inputs.beam_reinforcement = BeamReinforcement::Heavy;
        inputs.foundation_type = FoundationType::Raft;
        inputs.steel_grade = SteelGrade::Grade40;

        // 1850 * 4.6 * 1.18 * 1.30 * 1.22 / 1000 = 15.9262948
        assert_eq!(estimate_steel_tons(dec!(1850), &inputs), dec!(15.93));
    }

    #[test]
    fn test_grade40_needs_more_steel() {
        let mut inputs = mock_inputs();
        let grade60 = estimate_steel_tons(dec!(1125), &inputs);
        inputs.steel_grade = SteelGrade::Grade40;
        let grade40 = estimate_steel_tons(dec!(1125), &inputs);
        inputs.steel_grade = SteelGrade::Grade75;
        let grade75 = estimate_steel_tons(dec!(1125), &inputs);

        // 4.275 * 1.22 = 5.2155
        assert_eq!(grade40, dec!(5.22));
        assert!(grade40 > grade60);
        assert!(grade75 < grade60);
    }

    #[test]
    fn test_steel_monotonic_in_structure() {
        let area = dec!(2000);
        let mut inputs = mock_inputs();

        let mut by_floors = Vec::new();
        for floors in [Floors::GroundOnly, Floors::GroundPlus1, Floors::GroundPlus2] {
            inputs.floors = floors;
            by_floors.push(estimate_steel_tons(area, &inputs));
        }
        assert!(by_floors.windows(2).all(|w| w[0] <= w[1]));

        let mut by_foundation = Vec::new();
        for foundation in [
            FoundationType::ShallowStrip,
            FoundationType::Raft,
            FoundationType::Piles,
        ] {
            inputs.foundation_type = foundation;
            by_foundation.push(estimate_steel_tons(area, &inputs));
        }
        assert!(by_foundation.windows(2).all(|w| w[0] <= w[1]));

        inputs.beam_reinforcement = BeamReinforcement::Standard;
        let standard = estimate_steel_tons(area, &inputs);
        inputs.beam_reinforcement = BeamReinforcement::Heavy;
        assert!(estimate_steel_tons(area, &inputs) >= standard);
    }

    #[test]
    fn test_cement_factor_table() {
        let mut inputs = mock_inputs();
        assert_eq!(cement_factor(&inputs), dec!(0.46));

        inputs.floor_finish = FloorFinish::Granite;
        inputs.foundation_type = FoundationType::Raft;
        assert_eq!(cement_factor(&inputs), dec!(0.57));

        inputs.floor_finish = FloorFinish::Wooden;
        inputs.foundation_type = FoundationType::Piles;
        assert_eq!(cement_factor(&inputs), dec!(0.42));
    }

    #[test]
    fn test_cement_and_bricks_for_five_marla() {
        let inputs = mock_inputs();
        let policy = EstimationPolicy::default();

        // 1125 * 0.46 * 1.09 = 564.075
        assert_eq!(estimate_cement_bags(dec!(1125), &inputs, &policy).unwrap(), 564);
        // 1125 * 28 * 1.09 = 34335
        assert_eq!(estimate_brick_count(dec!(1125), &inputs, &policy).unwrap(), 34335);
    }

    #[test]
    fn test_fixture_allowances() {
        let inputs = mock_inputs();
        let policy = EstimationPolicy::default().with_fixture_allowances(FixtureAllowances::default());

        // 564 + 3 * 12 + 1 * 15
        assert_eq!(estimate_cement_bags(dec!(1125), &inputs, &policy).unwrap(), 615);
        // 34335 + 3 * 400 + 3 * 250
        assert_eq!(estimate_brick_count(dec!(1125), &inputs, &policy).unwrap(), 36285);
    }

    #[test]
    fn test_zero_rooms_partition_factor_is_one() {
        assert_eq!(wall_partition_factor(0), Decimal::ONE);

        let mut inputs = mock_inputs();
        inputs.rooms = 0;
        let bricks = estimate_brick_count(dec!(100), &inputs, &EstimationPolicy::default()).unwrap();
        assert_eq!(bricks, 2800);
    }

    #[test]
    fn test_counts_round_half_up() {
        let mut inputs = mock_inputs();
        inputs.rooms = 0;
        inputs.floor_finish = FloorFinish::Concrete;

        // 25 * 0.42 = 10.5
        let bags = estimate_cement_bags(dec!(25), &inputs, &EstimationPolicy::default()).unwrap();
        assert_eq!(bags, 11);
    }
}
