//! Configuration loaded from environment variables

use crate::estimation::{
    BreakdownBasis, EstimationPolicy, FixtureAllowances, FoundationWorkRates,
};
use crate::pricing::{builtin_price_book, load_price_book, PriceBook};
use anyhow::{Context, Result};
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Clone)]
pub struct Config {
    pub price_table_path: Option<PathBuf>, // None = built-in prices
    pub bind_addr: SocketAddr,
    pub policy: EstimationPolicy,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let price_table_path = get("PRICE_TABLE_PATH")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        let bind_addr = get("API_BIND_ADDR")
            .unwrap_or_else(|| "127.0.0.1:3001".to_string())
            .parse::<SocketAddr>()
            .context("API_BIND_ADDR must be a socket address like 127.0.0.1:3001")?;

        let breakdown_basis = match get("ESTIMATOR_BREAKDOWN_BASIS") {
            Some(raw) => raw.parse::<BreakdownBasis>().context("Invalid ESTIMATOR_BREAKDOWN_BASIS")?,
            None => BreakdownBasis::default(),
        };

        let mut policy = EstimationPolicy::default().with_breakdown_basis(breakdown_basis);

        if parse_flag(get("ESTIMATOR_FIXTURE_ALLOWANCES"))
            .context("Invalid ESTIMATOR_FIXTURE_ALLOWANCES")?
        {
            policy = policy.with_fixture_allowances(FixtureAllowances::default());
        }

        if parse_flag(get("ESTIMATOR_FOUNDATION_WORKS"))
            .context("Invalid ESTIMATOR_FOUNDATION_WORKS")?
        {
            policy = policy.with_foundation_works(FoundationWorkRates::default());
        }

        Ok(Config {
            price_table_path,
            bind_addr,
            policy,
        })
    }

    /// Price book from PRICE_TABLE_PATH, or the built-in tables
    pub fn price_book(&self) -> Result<PriceBook> {
        match &self.price_table_path {
            Some(path) => {
                let (book, stats) = load_price_book(path)?;
                info!("Price tables loaded from {:?}: {}", path, stats);
                Ok(book)
            }
            None => {
                info!("Using built-in price tables");
                Ok(builtin_price_book())
            }
        }
    }
}

fn parse_flag(raw: Option<String>) -> Result<bool> {
    match raw.as_deref().map(|s| s.trim().to_lowercase()) {
        None => Ok(false),
        Some(v) => match v.as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" | "" => Ok(false),
            other => Err(anyhow::anyhow!("expected a boolean, got '{}'", other)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();

        assert!(config.price_table_path.is_none());
        assert_eq!(config.bind_addr, "127.0.0.1:3001".parse::<SocketAddr>().unwrap());
        assert_eq!(config.policy, EstimationPolicy::default());
    }

    #[test]
    fn test_policy_switches() {
        let config = config_from(&[
            ("ESTIMATOR_BREAKDOWN_BASIS", "total"),
            ("ESTIMATOR_FIXTURE_ALLOWANCES", "true"),
            ("ESTIMATOR_FOUNDATION_WORKS", "1"),
            ("PRICE_TABLE_PATH", "/srv/prices.csv"),
        ])
        .unwrap();

        assert_eq!(config.policy.breakdown_basis, BreakdownBasis::ProjectTotal);
        assert!(config.policy.fixture_allowances.is_some());
        assert!(config.policy.foundation_works.is_some());
        assert_eq!(config.price_table_path, Some(PathBuf::from("/srv/prices.csv")));
    }

    #[test]
    fn test_invalid_values_are_errors() {
        assert!(config_from(&[("API_BIND_ADDR", "localhost")]).is_err());
        assert!(config_from(&[("ESTIMATOR_BREAKDOWN_BASIS", "half")]).is_err());
        assert!(config_from(&[("ESTIMATOR_FIXTURE_ALLOWANCES", "maybe")]).is_err());
    }

    #[test]
    fn test_builtin_price_book_without_path() {
        let book = config_from(&[]).unwrap().price_book().unwrap();
        assert!(!book.table_for("Karachi").is_fallback);
    }
}
