//! Breakdown and feasibility reporting

use crate::estimation::policy::{BreakdownBasis, EstimationPolicy};
use crate::estimation::quantities::round_half_up;
use crate::estimation::types::{
    BreakdownCategory, BreakdownEntry, CostBreakdown, EstimationResult, MaterialQuantities,
    ProjectInputs,
};
use crate::pricing::MaterialType;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

/// Minimum average covered area per room
pub const MIN_SQFT_PER_ROOM: Decimal = dec!(150);

/// A layout is plausible when the covered area exceeds 150 sqft per room
pub fn is_feasible(total_area: Decimal, rooms: u32) -> bool {
    total_area > Decimal::from(rooms) * MIN_SQFT_PER_ROOM
}

/// Share of the reference total, truncated to 2 decimals so the parts
/// never add up to more than 100. A zero reference yields 0.
pub fn percent_of(cost: Decimal, reference: Decimal) -> Decimal {
    if reference <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    (cost * dec!(100))
        .checked_div(reference)
        .map(|p| p.round_dp_with_strategy(2, RoundingStrategy::ToZero))
        .unwrap_or(Decimal::ZERO)
}

/// 1234567 -> "1,234,567"
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    grouped
}

/// Ordered breakdown: Cement, Steel, Bricks, then Labor for the project-total basis
pub fn build_breakdown(
    quantities: &MaterialQuantities,
    costs: &CostBreakdown,
    total_area: Decimal,
    basis: BreakdownBasis,
) -> Vec<BreakdownEntry> {
    let reference = match basis {
        BreakdownBasis::CoreMaterials => costs.core_materials(),
        BreakdownBasis::ProjectTotal => costs.total(),
    };

    let entry = |category, quantity_label: String, cost| BreakdownEntry {
        category,
        quantity_label,
        cost,
        percent_of_reference: percent_of(cost, reference),
    };

    let mut breakdown = vec![
        entry(
            BreakdownCategory::Cement,
            format!("{} Bags", group_thousands(quantities.cement_bags)),
            costs.cement,
        ),
        entry(
            BreakdownCategory::Steel,
            format!("{} Tons", quantities.steel_tons.normalize()),
            costs.steel,
        ),
        entry(
            BreakdownCategory::Bricks,
            format!("{} Nos", group_thousands(quantities.brick_count)),
            costs.bricks,
        ),
    ];

    if basis == BreakdownBasis::ProjectTotal {
        breakdown.push(entry(
            BreakdownCategory::Labor,
            format!("{} sqft", round_half_up(total_area, 2).normalize()),
            costs.labor,
        ));
    }

    breakdown
}

/// Assemble the final result from the pipeline stages
pub fn build_report(
    inputs: &ProjectInputs,
    policy: &EstimationPolicy,
    sqft_per_floor: Decimal,
    total_area: Decimal,
    quantities: MaterialQuantities,
    costs: CostBreakdown,
    price_fallbacks: Vec<MaterialType>,
) -> EstimationResult {
    let material_breakdown =
        build_breakdown(&quantities, &costs, total_area, policy.breakdown_basis);

    EstimationResult {
        sqft_per_floor,
        floor_count: inputs.floors.count(),
        total_covered_area_sqft: total_area,
        total_project_cost: costs.total(),
        steel_tons: quantities.steel_tons,
        cement_bags: quantities.cement_bags,
        brick_count: quantities.brick_count,
        costs,
        material_breakdown,
        is_feasible: is_feasible(total_area, inputs.rooms),
        price_fallbacks,
    }
}

fn millions(amount: Decimal) -> Decimal {
    round_half_up(amount / dec!(1000000), 2)
}

impl std::fmt::Display for EstimationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Construction Estimate ===")?;
        writeln!(
            f,
            "Covered area: {} sqft ({} floor(s), {} sqft per floor)",
            round_half_up(self.total_covered_area_sqft, 2).normalize(),
            self.floor_count,
            round_half_up(self.sqft_per_floor, 2).normalize()
        )?;
        writeln!(f, "Total project cost: Rs. {:.2}M", millions(self.total_project_cost))?;
        writeln!(f)?;

        writeln!(f, "Material breakdown:")?;
        for entry in &self.material_breakdown {
            writeln!(
                f,
                "  {:<8} {:>16}  Rs. {:>8.2}M  {:>6.2}%",
                entry.category.to_string(),
                entry.quantity_label,
                millions(entry.cost),
                entry.percent_of_reference
            )?;
        }
        writeln!(f)?;

        writeln!(f, "Cost components:")?;
        writeln!(f, "  Grey structure:   Rs. {:.2}M", millions(self.costs.grey_structure))?;
        writeln!(f, "  Steel:            Rs. {:.2}M", millions(self.costs.steel))?;
        writeln!(f, "  Cement:           Rs. {:.2}M", millions(self.costs.cement))?;
        writeln!(f, "  Bricks:           Rs. {:.2}M", millions(self.costs.bricks))?;
        writeln!(f, "  Finishing:        Rs. {:.2}M", millions(self.costs.finishing))?;
        writeln!(f, "  Labor:            Rs. {:.2}M", millions(self.costs.labor))?;
        if !self.costs.foundation_works.is_zero() {
            writeln!(f, "  Foundation works: Rs. {:.2}M", millions(self.costs.foundation_works))?;
        }
        writeln!(f)?;

        if self.is_feasible {
            writeln!(f, "Layout: feasible")?;
        } else {
            writeln!(f, "Layout: NOT feasible (less than 150 sqft per room)")?;
        }

        if !self.price_fallbacks.is_empty() {
            let names: Vec<String> = self.price_fallbacks.iter().map(|m| m.to_string()).collect();
            writeln!(f, "Default prices used for: {}", names.join(", "))?;
        }

        Ok(())
    }
}
