//! Tunable refinement tiers for the estimator
//!
//! The base rule set is fixed. These switches turn on optional refinements
//! (fixture allowances, a foundation works line) and pick the reference total
//! used for breakdown percentages. A policy is immutable for the duration of
//! an estimate.

use crate::estimation::types::FoundationType;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use std::str::FromStr;

/// Reference total that breakdown percentages are computed against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum BreakdownBasis {
    /// Cement, steel and bricks against their combined cost
    #[default]
    CoreMaterials,
    /// Cement, steel, bricks and labor against the total project cost
    ProjectTotal,
}

impl FromStr for BreakdownBasis {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "core" | "core_materials" | "materials" => Ok(BreakdownBasis::CoreMaterials),
            "total" | "project_total" | "project" => Ok(BreakdownBasis::ProjectTotal),
            other => Err(anyhow::anyhow!(
                "Unknown breakdown basis '{}' (expected 'core' or 'total')",
                other
            )),
        }
    }
}

/// Per-fixture material additions on top of the area-based quantities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FixtureAllowances {
    pub cement_bags_per_bathroom: u64,
    pub cement_bags_per_kitchen: u64,
    pub bricks_per_room: u64,
    pub bricks_per_bathroom: u64,
}

impl Default for FixtureAllowances {
    fn default() -> Self {
        FixtureAllowances {
            cement_bags_per_bathroom: 12,
            cement_bags_per_kitchen: 15,
            bricks_per_room: 400,
            bricks_per_bathroom: 250,
        }
    }
}

/// Earthwork and machinery cost per covered sqft, by foundation type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FoundationWorkRates {
    pub shallow_strip: Decimal,
    pub raft: Decimal,
    pub piles: Decimal,
}

impl FoundationWorkRates {
    pub fn rate(&self, foundation: FoundationType) -> Decimal {
        match foundation {
            FoundationType::ShallowStrip => self.shallow_strip,
            FoundationType::Raft => self.raft,
            FoundationType::Piles => self.piles,
        }
    }
}

impl Default for FoundationWorkRates {
    fn default() -> Self {
        FoundationWorkRates {
            shallow_strip: dec!(0),
            raft: dec!(350),
            piles: dec!(900),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct EstimationPolicy {
    pub breakdown_basis: BreakdownBasis,
    pub fixture_allowances: Option<FixtureAllowances>,
    pub foundation_works: Option<FoundationWorkRates>,
}

impl EstimationPolicy {
    pub fn with_breakdown_basis(self, breakdown_basis: BreakdownBasis) -> Self {
        EstimationPolicy {
            breakdown_basis,
            ..self
        }
    }

    pub fn with_fixture_allowances(self, allowances: FixtureAllowances) -> Self {
        EstimationPolicy {
            fixture_allowances: Some(allowances),
            ..self
        }
    }

    pub fn with_foundation_works(self, rates: FoundationWorkRates) -> Self {
        EstimationPolicy {
            foundation_works: Some(rates),
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_is_base_rule_set() {
        let policy = EstimationPolicy::default();

        assert_eq!(policy.breakdown_basis, BreakdownBasis::CoreMaterials);
        assert!(policy.fixture_allowances.is_none());
        assert!(policy.foundation_works.is_none());
    }

    #[test]
    fn test_builders_enable_tiers() {
        let policy = EstimationPolicy::default()
            .with_breakdown_basis(BreakdownBasis::ProjectTotal)
            .with_fixture_allowances(FixtureAllowances::default())
            .with_foundation_works(FoundationWorkRates::default());

        assert_eq!(policy.breakdown_basis, BreakdownBasis::ProjectTotal);
        assert_eq!(policy.fixture_allowances.unwrap().cement_bags_per_kitchen, 15);
        assert_eq!(
            policy.foundation_works.unwrap().rate(FoundationType::Piles),
            dec!(900)
        );
    }

    #[test]
    fn test_parse_breakdown_basis() {
        assert_eq!("core".parse::<BreakdownBasis>().unwrap(), BreakdownBasis::CoreMaterials);
        assert_eq!(" Total ".parse::<BreakdownBasis>().unwrap(), BreakdownBasis::ProjectTotal);
        assert!("everything".parse::<BreakdownBasis>().is_err());
    }
}
