//! Parse functions - load price tables from CSV

use crate::pricing::builtin::default_prices;
use crate::pricing::types::{MaterialPrice, PriceBook};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

/// Price table CSV row structure
#[derive(Debug, Deserialize)]
struct PriceRow {
    #[serde(default)]
    city: String,
    material: String,
    #[serde(default)]
    unit: String,
    price: String, // may carry "Rs." and thousands separators
    #[serde(default)]
    availability: String,
    #[serde(default)]
    trend: String,
    #[serde(default)]
    change_24h: String,
    #[serde(default)]
    last_updated: String,
}

/// Rows loaded and rows skipped while reading a price file
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LoadStats {
    pub loaded: usize,
    pub skipped: usize,
}

impl std::fmt::Display for LoadStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "loaded: {}, skipped: {}", self.loaded, self.skipped)
    }
}

/// Load a price book from a CSV file on disk
pub fn load_price_book(path: &Path) -> Result<(PriceBook, LoadStats)> {
    info!("Loading price tables from {:?}", path);
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open price table {}", path.display()))?;
    parse_price_csv(file)
}

/// Parse CSV price rows into a price book
///
/// Rows with a blank city or `default` fill the default table. When the
/// file has no default rows the built-in reference prices are kept.
pub fn parse_price_csv<R: Read>(reader: R) -> Result<(PriceBook, LoadStats)> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut book = PriceBook::default();
    let mut defaults = Vec::new();
    let mut stats = LoadStats::default();

    for (idx, result) in reader.deserialize::<PriceRow>().enumerate() {
        let row = match result {
            Ok(row) => row,
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                stats.skipped += 1;
                if stats.skipped <= 10 {
                    warn!("Failed to deserialize price row {}: {}", idx, e);
                }
                continue;
            }
        };

        match parse_price_row(&row) {
            Ok(price) => {
                stats.loaded += 1;
                if row.city.is_empty() || row.city.eq_ignore_ascii_case("default") {
                    defaults.push(price);
                } else {
                    book.push_price(&row.city, price);
                }
            }
            Err(e) => {
                stats.skipped += 1;
                if stats.skipped <= 10 {
                    // Only log first 10 errors
                    warn!("Failed to parse price row {}: {}", idx, e);
                }
            }
        }
    }

    if defaults.is_empty() {
        book.set_default_table(default_prices());
    } else {
        book.set_default_table(defaults);
    }

    info!(
        "Parsed price tables for {} cities ({})",
        book.cities().len(),
        stats
    );

    Ok((book, stats))
}

fn parse_price_row(row: &PriceRow) -> Result<MaterialPrice> {
    let price = parse_amount(&row.price)
        .with_context(|| format!("Invalid price '{}'", row.price))?;

    let change_24h = if row.change_24h.is_empty() {
        Decimal::ZERO
    } else {
        parse_amount(&row.change_24h)
            .with_context(|| format!("Invalid change_24h '{}'", row.change_24h))?
    };

    let last_updated = if row.last_updated.is_empty() {
        None
    } else {
        Some(
            NaiveDate::parse_from_str(&row.last_updated, "%Y-%m-%d")
                .with_context(|| format!("Invalid last_updated '{}'", row.last_updated))?,
        )
    };

    Ok(MaterialPrice {
        material: row.material.parse()?,
        unit: row.unit.clone(),
        price,
        availability: row.availability.parse()?,
        trend: row.trend.parse()?,
        change_24h,
        last_updated,
    })
}

/// Parse "Rs. 265,000", "1250" or "-1.2%" into a decimal
fn parse_amount(raw: &str) -> Result<Decimal> {
    let cleaned: String = raw
        .trim()
        .trim_start_matches("Rs.")
        .trim_start_matches("PKR")
        .chars()
        .filter(|c| !matches!(c, ',' | '%' | ' '))
        .collect();

    Ok(cleaned.parse::<Decimal>()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::types::{Availability, MaterialType, Trend};
    use rust_decimal_macros::dec;
    use std::io::Write;

    const SAMPLE: &str = "\
city,material,unit,price,availability,trend,change_24h,last_updated
,Cement,Bag (50kg),1300,In Stock,up,0.5,2024-01-10
Lahore,Cement,Bag (50kg),\"1,250\",In Stock,up,0.8,2024-01-10
Lahore,Steel,Ton (Grade 60),Rs. 265000,Low Stock,down,-1.2%,
Karachi,Bricks,1000 Units,16500,,stable,,
Karachi,Glass,Sheet,900,In Stock,up,,
Quetta,Cement,Bag,not-a-number,In Stock,up,,
";

    #[test]
    fn test_parse_sample_table() {
        let (book, stats) = parse_price_csv(SAMPLE.as_bytes()).unwrap();

        assert_eq!(stats, LoadStats { loaded: 4, skipped: 2 });
        assert_eq!(book.cities(), vec!["Karachi", "Lahore"]);
        assert_eq!(book.default_table().len(), 1);
        assert_eq!(book.default_table()[0].price, dec!(1300));

        let lahore = book.table_for("Lahore").prices;
        assert_eq!(lahore.len(), 2);
        assert_eq!(lahore[0].price, dec!(1250));
        assert_eq!(lahore[1].material, MaterialType::Steel);
        assert_eq!(lahore[1].price, dec!(265000));
        assert_eq!(lahore[1].availability, Availability::LowStock);
        assert_eq!(lahore[1].change_24h, dec!(-1.2));
        assert_eq!(lahore[1].last_updated, None);

        let karachi = book.table_for("Karachi").prices;
        assert_eq!(karachi[0].trend, Trend::Stable);
        assert_eq!(karachi[0].availability, Availability::InStock);
    }

    #[test]
    fn test_missing_default_rows_keep_builtin_defaults() {
        let csv = "city,material,unit,price\nLahore,Cement,Bag,1250\n";
        let (book, _) = parse_price_csv(csv.as_bytes()).unwrap();

        assert_eq!(book.default_table(), default_prices().as_slice());
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("Rs. 265,000").unwrap(), dec!(265000));
        assert_eq!(parse_amount(" 18500 ").unwrap(), dec!(18500));
        assert_eq!(parse_amount("-1.2%").unwrap(), dec!(-1.2));
        assert!(parse_amount("abc").is_err());
    }

    #[test]
    fn test_load_price_book_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let (book, stats) = load_price_book(file.path()).unwrap();
        assert_eq!(stats.loaded, 4);
        assert!(!book.table_for("karachi").is_fallback);
    }

    #[test]
    fn test_load_missing_file_fails() {
        let result = load_price_book(Path::new("/nonexistent/prices.csv"));
        assert!(result.is_err());
    }
}
