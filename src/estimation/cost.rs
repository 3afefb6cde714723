//! Cost aggregation - price quantities and sum the project cost

use crate::estimation::error::{EstimationError, Result};
use crate::estimation::policy::EstimationPolicy;
use crate::estimation::types::{
    CostBreakdown, FloorFinish, MaterialQuantities, ProjectInputs, Quality, SteelGrade, UnitPrices,
};
use crate::pricing::builtin::{
    DEFAULT_BRICKS_PER_THOUSAND, DEFAULT_CEMENT_PER_BAG, DEFAULT_STEEL_PER_TON,
};
use crate::pricing::{MaterialPrice, MaterialType};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::{debug, warn};

/// Grey structure rate per covered sqft at Standard quality
pub const GREY_STRUCTURE_PER_SQFT: Decimal = dec!(1800);
pub const FINISHING_PER_BATHROOM: Decimal = dec!(60000);
pub const FINISHING_PER_KITCHEN: Decimal = dec!(90000);

pub fn quality_multiplier(quality: Quality) -> Decimal {
    match quality {
        Quality::Economy => dec!(0.88),
        Quality::Standard => dec!(1.0),
        Quality::Premium => dec!(1.45),
    }
}

/// Grade 40 bar trades cheaper per ton
fn steel_price_adjustment(grade: SteelGrade) -> Decimal {
    match grade {
        SteelGrade::Grade40 => dec!(0.93),
        SteelGrade::Grade60 | SteelGrade::Grade75 => dec!(1.0),
    }
}

pub fn finishing_rate(finish: FloorFinish) -> Decimal {
    match finish {
        FloorFinish::Concrete => dec!(1400),
        FloorFinish::Tiles => dec!(2200),
        FloorFinish::Marble => dec!(3100),
        FloorFinish::Granite => dec!(4200),
        FloorFinish::Wooden => dec!(3600),
    }
}

/// Labor surcharge per sqft for finishes that need specialist crews
fn labor_surcharge(finish: FloorFinish) -> Decimal {
    match finish {
        FloorFinish::Marble => dec!(80),
        FloorFinish::Granite => dec!(120),
        FloorFinish::Wooden => dec!(60),
        FloorFinish::Concrete => dec!(-40),
        FloorFinish::Tiles => dec!(0),
    }
}

/// Caller's labor rate plus the finish surcharge, never below zero
pub fn adjusted_labor_rate(inputs: &ProjectInputs) -> Result<Decimal> {
    inputs
        .labor_rate
        .checked_add(labor_surcharge(inputs.floor_finish))
        .map(|rate| rate.max(Decimal::ZERO))
        .ok_or(EstimationError::OutOfRange("labor rate"))
}

fn lookup_price(prices: &[MaterialPrice], material: MaterialType) -> Option<Decimal> {
    prices
        .iter()
        .find(|p| p.material == material && p.price > Decimal::ZERO)
        .map(|p| p.price)
}

/// Resolve unit prices for the priced materials
///
/// Missing or non-positive entries fall back to the reference constants
/// and are listed in `fallbacks`; they never fail the estimate.
pub fn resolve_unit_prices(prices: &[MaterialPrice]) -> UnitPrices {
    let mut fallbacks = Vec::new();
    let mut resolve = |material: MaterialType, default: Decimal| {
        lookup_price(prices, material).unwrap_or_else(|| {
            warn!(
                "No price data for {}, using default {}",
                material, default
            );
            fallbacks.push(material);
            default
        })
    };

    let cement_per_bag = resolve(MaterialType::Cement, DEFAULT_CEMENT_PER_BAG);
    let steel_per_ton = resolve(MaterialType::Steel, DEFAULT_STEEL_PER_TON);
    let bricks_per_thousand = resolve(MaterialType::Bricks, DEFAULT_BRICKS_PER_THOUSAND);

    UnitPrices {
        cement_per_bag,
        steel_per_ton,
        bricks_per_thousand,
        fallbacks,
    }
}

/// Multiply the factors, or fail with `OutOfRange(what)` on overflow
fn checked_product(what: &'static str, factors: &[Decimal]) -> Result<Decimal> {
    factors
        .iter()
        .try_fold(Decimal::ONE, |acc, f| acc.checked_mul(*f))
        .ok_or(EstimationError::OutOfRange(what))
}

fn checked_sum(what: &'static str, terms: &[Decimal]) -> Result<Decimal> {
    terms
        .iter()
        .try_fold(Decimal::ZERO, |acc, t| acc.checked_add(*t))
        .ok_or(EstimationError::OutOfRange(what))
}

/// Price each quantity and add area-based components
///
/// Fails with `OutOfRange` when a component or the project total does not
/// fit in a `Decimal` (absurd labor rates or price table entries).
pub fn aggregate_cost(
    quantities: &MaterialQuantities,
    total_area: Decimal,
    inputs: &ProjectInputs,
    prices: &UnitPrices,
    policy: &EstimationPolicy,
) -> Result<CostBreakdown> {
    let quality = quality_multiplier(inputs.quality);

    let grey_structure =
        checked_product("grey structure cost", &[total_area, GREY_STRUCTURE_PER_SQFT, quality])?;
    let steel = checked_product(
        "steel cost",
        &[
            quantities.steel_tons,
            prices.steel_per_ton,
            steel_price_adjustment(inputs.steel_grade),
        ],
    )?;
    let cement = checked_product(
        "cement cost",
        &[Decimal::from(quantities.cement_bags), prices.cement_per_bag],
    )?;
    let bricks = checked_product(
        "brick cost",
        &[
            Decimal::from(quantities.brick_count) / dec!(1000),
            prices.bricks_per_thousand,
        ],
    )?;

    let finishing = checked_sum(
        "finishing cost",
        &[
            checked_product(
                "finishing cost",
                &[total_area, finishing_rate(inputs.floor_finish), quality],
            )?,
            Decimal::from(inputs.bathrooms) * FINISHING_PER_BATHROOM,
            Decimal::from(inputs.kitchens) * FINISHING_PER_KITCHEN,
        ],
    )?;

    let labor = checked_product("labor cost", &[total_area, adjusted_labor_rate(inputs)?])?;

    let foundation_works = match policy.foundation_works {
        Some(rates) => checked_product(
            "foundation works cost",
            &[total_area, rates.rate(inputs.foundation_type)],
        )?,
        None => Decimal::ZERO,
    };

    let costs = CostBreakdown {
        grey_structure,
        steel,
        cement,
        bricks,
        finishing,
        labor,
        foundation_works,
    };

    // Components are non-negative, so a total that fits bounds every partial sum
    checked_sum(
        "total project cost",
        &[
            costs.grey_structure,
            costs.steel,
            costs.cement,
            costs.bricks,
            costs.finishing,
            costs.labor,
            costs.foundation_works,
        ],
    )?;

    debug!(
        "Costs: grey {}, steel {}, cement {}, bricks {}, finishing {}, labor {}, foundation {}",
        costs.grey_structure,
        costs.steel,
        costs.cement,
        costs.bricks,
        costs.finishing,
        costs.labor,
        costs.foundation_works
    );

    Ok(costs)
}
