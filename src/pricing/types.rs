//! Market price reference data
//! Read-only input to the estimator

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;
use tracing::debug;

/// Material categories tracked in price tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MaterialType {
    Cement,
    Steel,
    Bricks,
    Sand,
    #[serde(rename = "Crush (Bajri)")]
    Crush,
    Paint,
    Tiles,
}

impl FromStr for MaterialType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        let lower = s.trim().to_lowercase();

        if lower.starts_with("cement") {
            Ok(MaterialType::Cement)
        } else if lower.starts_with("steel") || lower.starts_with("rebar") {
            Ok(MaterialType::Steel)
        } else if lower.starts_with("brick") {
            Ok(MaterialType::Bricks)
        } else if lower.starts_with("sand") {
            Ok(MaterialType::Sand)
        } else if lower.starts_with("crush") || lower.contains("bajri") {
            Ok(MaterialType::Crush)
        } else if lower.starts_with("paint") {
            Ok(MaterialType::Paint)
        } else if lower.starts_with("tile") {
            Ok(MaterialType::Tiles)
        } else {
            Err(anyhow::anyhow!("Unknown material type: {}", s))
        }
    }
}

impl std::fmt::Display for MaterialType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MaterialType::Cement => write!(f, "Cement"),
            MaterialType::Steel => write!(f, "Steel"),
            MaterialType::Bricks => write!(f, "Bricks"),
            MaterialType::Sand => write!(f, "Sand"),
            MaterialType::Crush => write!(f, "Crush (Bajri)"),
            MaterialType::Paint => write!(f, "Paint"),
            MaterialType::Tiles => write!(f, "Tiles"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Availability {
    #[serde(rename = "In Stock")]
    InStock,
    #[serde(rename = "Low Stock")]
    LowStock,
    #[serde(rename = "Out of Stock")]
    OutOfStock,
}

impl FromStr for Availability {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_lowercase().replace(['_', '-'], " ").as_str() {
            "in stock" | "" => Ok(Availability::InStock),
            "low stock" | "low" => Ok(Availability::LowStock),
            "out of stock" | "out" => Ok(Availability::OutOfStock),
            other => Err(anyhow::anyhow!("Unknown availability: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Stable,
}

impl FromStr for Trend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "up" => Ok(Trend::Up),
            "down" => Ok(Trend::Down),
            "stable" | "" => Ok(Trend::Stable),
            other => Err(anyhow::anyhow!("Unknown trend: {}", other)),
        }
    }
}

/// One row of a price table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialPrice {
    pub material: MaterialType,
    pub unit: String,
    pub price: Decimal,
    pub availability: Availability,
    pub trend: Trend,
    pub change_24h: Decimal, // percent
    pub last_updated: Option<NaiveDate>,
}

/// Price table for one market
pub type PriceTable = Vec<MaterialPrice>;

/// Price table picked for a city, and whether the default had to be used
#[derive(Debug, Clone, Copy)]
pub struct ResolvedTable<'a> {
    pub city: &'a str,
    pub prices: &'a [MaterialPrice],
    pub is_fallback: bool,
}

/// Default price table plus city-specific tables
#[derive(Debug, Clone, Default)]
pub struct PriceBook {
    default: PriceTable,
    // keyed by lowercased city name; value keeps the display name
    cities: BTreeMap<String, (String, PriceTable)>,
}

impl PriceBook {
    pub fn new(default: PriceTable) -> Self {
        PriceBook {
            default,
            cities: BTreeMap::new(),
        }
    }

    pub fn default_table(&self) -> &[MaterialPrice] {
        &self.default
    }

    pub fn set_default_table(&mut self, table: PriceTable) {
        self.default = table;
    }

    /// Add or replace the table for a city
    pub fn insert_city(&mut self, city: &str, table: PriceTable) {
        let name = city.trim();
        self.cities
            .insert(name.to_lowercase(), (name.to_string(), table));
    }

    /// Append one row to a city's table, creating it when needed
    pub fn push_price(&mut self, city: &str, price: MaterialPrice) {
        let name = city.trim();
        self.cities
            .entry(name.to_lowercase())
            .or_insert_with(|| (name.to_string(), Vec::new()))
            .1
            .push(price);
    }

    /// City names with their own table, sorted
    pub fn cities(&self) -> Vec<&str> {
        self.cities.values().map(|(name, _)| name.as_str()).collect()
    }

    /// Look up a city's table, falling back to the default table
    pub fn table_for<'a>(&'a self, city: &'a str) -> ResolvedTable<'a> {
        match self.cities.get(&city.trim().to_lowercase()) {
            Some((name, table)) => ResolvedTable {
                city: name,
                prices: table,
                is_fallback: false,
            },
            None => {
                debug!("No price table for '{}', using default table", city);
                ResolvedTable {
                    city,
                    prices: &self.default,
                    is_fallback: true,
                }
            }
        }
    }
}
