//! Core data types for the estimation pipeline
//! Inputs and outputs are plain values, constructed fresh per estimate

use crate::estimation::error::{EstimationError, Result};
use crate::pricing::MaterialType;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Lowercases and drops everything that is not a letter or digit,
/// so "Ground + 1", "ground+1" and "GroundPlus1" compare sensibly.
fn lookup_key(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Land area units used for plot sizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum UnitType {
    Marla,
    Kanal,
    SqFt,
}

impl FromStr for UnitType {
    type Err = EstimationError;

    fn from_str(s: &str) -> Result<Self> {
        match lookup_key(s).as_str() {
            "marla" | "marlas" => Ok(UnitType::Marla),
            "kanal" | "kanals" => Ok(UnitType::Kanal),
            "sqft" | "sqfeet" | "squarefeet" | "squarefoot" | "ft2" => Ok(UnitType::SqFt),
            _ => Err(EstimationError::InvalidUnit(s.to_string())),
        }
    }
}

impl std::fmt::Display for UnitType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnitType::Marla => write!(f, "Marla"),
            UnitType::Kanal => write!(f, "Kanal"),
            UnitType::SqFt => write!(f, "SqFt"),
        }
    }
}

/// Storey configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Floors {
    #[serde(rename = "Ground Only")]
    GroundOnly,
    #[serde(rename = "Ground + 1")]
    GroundPlus1,
    #[serde(rename = "Ground + 2")]
    GroundPlus2,
}

impl Floors {
    pub fn count(&self) -> u32 {
        match self {
            Floors::GroundOnly => 1,
            Floors::GroundPlus1 => 2,
            Floors::GroundPlus2 => 3,
        }
    }
}

impl FromStr for Floors {
    type Err = EstimationError;

    fn from_str(s: &str) -> Result<Self> {
        match lookup_key(s).as_str() {
            "groundonly" | "ground" | "g" | "1" => Ok(Floors::GroundOnly),
            "groundplus1" | "ground1" | "g1" | "2" => Ok(Floors::GroundPlus1),
            "groundplus2" | "ground2" | "g2" | "3" => Ok(Floors::GroundPlus2),
            _ => Err(EstimationError::InvalidEnumValue {
                field: "floors",
                value: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for Floors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Floors::GroundOnly => write!(f, "Ground Only"),
            Floors::GroundPlus1 => write!(f, "Ground + 1"),
            Floors::GroundPlus2 => write!(f, "Ground + 2"),
        }
    }
}

/// Construction quality tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Quality {
    Economy,
    Standard,
    Premium,
}

impl FromStr for Quality {
    type Err = EstimationError;

    fn from_str(s: &str) -> Result<Self> {
        match lookup_key(s).as_str() {
            "economy" | "basic" => Ok(Quality::Economy),
            "standard" => Ok(Quality::Standard),
            "premium" | "luxury" => Ok(Quality::Premium),
            _ => Err(EstimationError::InvalidEnumValue {
                field: "quality",
                value: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for Quality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Quality::Economy => write!(f, "Economy"),
            Quality::Standard => write!(f, "Standard"),
            Quality::Premium => write!(f, "Premium"),
        }
    }
}

/// Rebar yield-strength class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SteelGrade {
    #[serde(rename = "Grade 40")]
    Grade40,
    #[serde(rename = "Grade 60")]
    Grade60,
    #[serde(rename = "Grade 75")]
    Grade75,
}

impl FromStr for SteelGrade {
    type Err = EstimationError;

    fn from_str(s: &str) -> Result<Self> {
        match lookup_key(s).as_str() {
            "grade40" | "g40" | "40" => Ok(SteelGrade::Grade40),
            "grade60" | "g60" | "60" => Ok(SteelGrade::Grade60),
            "grade75" | "g75" | "75" => Ok(SteelGrade::Grade75),
            _ => Err(EstimationError::InvalidEnumValue {
                field: "steelGrade",
                value: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for SteelGrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SteelGrade::Grade40 => write!(f, "Grade 40"),
            SteelGrade::Grade60 => write!(f, "Grade 60"),
            SteelGrade::Grade75 => write!(f, "Grade 75"),
        }
    }
}

/// Floor finish material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FloorFinish {
    Concrete,
    Tiles,
    Marble,
    Granite,
    Wooden,
}

impl FromStr for FloorFinish {
    type Err = EstimationError;

    fn from_str(s: &str) -> Result<Self> {
        match lookup_key(s).as_str() {
            "concrete" => Ok(FloorFinish::Concrete),
            "tiles" | "tile" => Ok(FloorFinish::Tiles),
            "marble" => Ok(FloorFinish::Marble),
            "granite" => Ok(FloorFinish::Granite),
            "wooden" | "wood" => Ok(FloorFinish::Wooden),
            _ => Err(EstimationError::InvalidEnumValue {
                field: "floorFinish",
                value: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for FloorFinish {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FloorFinish::Concrete => write!(f, "Concrete"),
            FloorFinish::Tiles => write!(f, "Tiles"),
            FloorFinish::Marble => write!(f, "Marble"),
            FloorFinish::Granite => write!(f, "Granite"),
            FloorFinish::Wooden => write!(f, "Wooden"),
        }
    }
}

/// Foundation system, ordered shallowest to deepest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum FoundationType {
    #[serde(rename = "Shallow/Strip")]
    ShallowStrip,
    Raft,
    Piles,
}

impl FromStr for FoundationType {
    type Err = EstimationError;

    fn from_str(s: &str) -> Result<Self> {
        match lookup_key(s).as_str() {
            "shallowstrip" | "shallow" | "strip" => Ok(FoundationType::ShallowStrip),
            "raft" | "mat" => Ok(FoundationType::Raft),
            "piles" | "pile" => Ok(FoundationType::Piles),
            _ => Err(EstimationError::InvalidEnumValue {
                field: "foundationType",
                value: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for FoundationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FoundationType::ShallowStrip => write!(f, "Shallow/Strip"),
            FoundationType::Raft => write!(f, "Raft"),
            FoundationType::Piles => write!(f, "Piles"),
        }
    }
}

/// Beam reinforcement density
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BeamReinforcement {
    Standard,
    Heavy,
}

impl FromStr for BeamReinforcement {
    type Err = EstimationError;

    fn from_str(s: &str) -> Result<Self> {
        match lookup_key(s).as_str() {
            "standard" => Ok(BeamReinforcement::Standard),
            "heavy" => Ok(BeamReinforcement::Heavy),
            _ => Err(EstimationError::InvalidEnumValue {
                field: "beamReinforcement",
                value: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for BeamReinforcement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BeamReinforcement::Standard => write!(f, "Standard"),
            BeamReinforcement::Heavy => write!(f, "Heavy"),
        }
    }
}

/// Fully-typed project parameters - the engine's only input besides prices
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInputs {
    pub area: Decimal,
    pub unit_type: UnitType,
    pub floors: Floors,
    pub quality: Quality,
    pub city: String,
    pub labor_rate: Decimal, // currency per sqft
    pub rooms: u32,
    pub bathrooms: u32,
    pub kitchens: u32,
    pub steel_grade: SteelGrade,
    pub floor_finish: FloorFinish,
    pub foundation_type: FoundationType,
    pub beam_reinforcement: BeamReinforcement,
}

impl ProjectInputs {
    /// Range checks the type system cannot express
    pub fn validate(&self) -> Result<()> {
        if self.area <= Decimal::ZERO {
            return Err(EstimationError::InvalidInput {
                field: "area",
                reason: format!("must be greater than zero, got {}", self.area),
            });
        }
        if self.labor_rate < Decimal::ZERO {
            return Err(EstimationError::InvalidInput {
                field: "laborRate",
                reason: format!("must not be negative, got {}", self.labor_rate),
            });
        }
        Ok(())
    }
}

/// Loosely-typed project parameters as they arrive from JSON or the command line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRequest {
    pub area: f64,
    pub unit_type: String,
    pub floors: String,
    pub quality: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub labor_rate: f64,
    #[serde(default)]
    pub rooms: u32,
    #[serde(default)]
    pub bathrooms: u32,
    #[serde(default)]
    pub kitchens: u32,
    pub steel_grade: String,
    pub floor_finish: String,
    pub foundation_type: String,
    pub beam_reinforcement: String,
}

impl Default for ProjectRequest {
    /// A 5 Marla single-storey house in Lahore
    fn default() -> Self {
        ProjectRequest {
            area: 5.0,
            unit_type: "Marla".to_string(),
            floors: "Ground Only".to_string(),
            quality: "Standard".to_string(),
            city: "Lahore".to_string(),
            labor_rate: 450.0,
            rooms: 3,
            bathrooms: 3,
            kitchens: 1,
            steel_grade: "Grade 60".to_string(),
            floor_finish: "Tiles".to_string(),
            foundation_type: "Shallow/Strip".to_string(),
            beam_reinforcement: "Standard".to_string(),
        }
    }
}

fn decimal_field(field: &'static str, value: f64) -> Result<Decimal> {
    Decimal::try_from(value).map_err(|_| EstimationError::InvalidInput {
        field,
        reason: format!("{} is not a representable number", value),
    })
}

impl TryFrom<ProjectRequest> for ProjectInputs {
    type Error = EstimationError;

    fn try_from(req: ProjectRequest) -> Result<Self> {
        let inputs = ProjectInputs {
            area: decimal_field("area", req.area)?,
            unit_type: req.unit_type.parse()?,
            floors: req.floors.parse()?,
            quality: req.quality.parse()?,
            city: req.city.trim().to_string(),
            labor_rate: decimal_field("laborRate", req.labor_rate)?,
            rooms: req.rooms,
            bathrooms: req.bathrooms,
            kitchens: req.kitchens,
            steel_grade: req.steel_grade.parse()?,
            floor_finish: req.floor_finish.parse()?,
            foundation_type: req.foundation_type.parse()?,
            beam_reinforcement: req.beam_reinforcement.parse()?,
        };
        inputs.validate()?;
        Ok(inputs)
    }
}

/// Derived material quantities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialQuantities {
    pub steel_tons: Decimal,
    pub cement_bags: u64,
    pub brick_count: u64,
}

/// Resolved unit prices, with the materials that fell back to defaults
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitPrices {
    pub cement_per_bag: Decimal,
    pub steel_per_ton: Decimal,
    pub bricks_per_thousand: Decimal,
    pub fallbacks: Vec<MaterialType>,
}

/// Priced cost components, all non-negative
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CostBreakdown {
    pub grey_structure: Decimal,
    pub steel: Decimal,
    pub cement: Decimal,
    pub bricks: Decimal,
    pub finishing: Decimal,
    pub labor: Decimal,
    pub foundation_works: Decimal,
}

impl CostBreakdown {
    /// Cement + steel + bricks
    pub fn core_materials(&self) -> Decimal {
        self.cement + self.steel + self.bricks
    }

    pub fn total(&self) -> Decimal {
        self.grey_structure
            + self.steel
            + self.cement
            + self.bricks
            + self.finishing
            + self.labor
            + self.foundation_works
    }
}

/// Category shown in the material breakdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BreakdownCategory {
    Cement,
    Steel,
    Bricks,
    Labor,
}

impl std::fmt::Display for BreakdownCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BreakdownCategory::Cement => write!(f, "Cement"),
            BreakdownCategory::Steel => write!(f, "Steel"),
            BreakdownCategory::Bricks => write!(f, "Bricks"),
            BreakdownCategory::Labor => write!(f, "Labor"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakdownEntry {
    pub category: BreakdownCategory,
    pub quantity_label: String,
    pub cost: Decimal,
    pub percent_of_reference: Decimal,
}

/// Engine output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimationResult {
    pub sqft_per_floor: Decimal,
    pub floor_count: u32,
    pub total_covered_area_sqft: Decimal,
    pub total_project_cost: Decimal,
    pub steel_tons: Decimal,
    pub cement_bags: u64,
    pub brick_count: u64,
    pub costs: CostBreakdown,
    pub material_breakdown: Vec<BreakdownEntry>,
    pub is_feasible: bool,
    pub price_fallbacks: Vec<MaterialType>,
}
