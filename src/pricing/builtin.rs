//! Built-in reference prices for Pakistani markets (PKR)
//! Used when no price table file is configured

use crate::pricing::types::{Availability, MaterialPrice, MaterialType, PriceBook, PriceTable, Trend};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Fallback unit prices when a table has no usable row for a material
pub const DEFAULT_CEMENT_PER_BAG: Decimal = dec!(1250);
pub const DEFAULT_STEEL_PER_TON: Decimal = dec!(265000);
pub const DEFAULT_BRICKS_PER_THOUSAND: Decimal = dec!(18500);

fn price(
    material: MaterialType,
    unit: &str,
    price: Decimal,
    availability: Availability,
    trend: Trend,
    change_24h: Decimal,
) -> MaterialPrice {
    MaterialPrice {
        material,
        unit: unit.to_string(),
        price,
        availability,
        trend,
        change_24h,
        last_updated: NaiveDate::from_ymd_opt(2023, 10, 25),
    }
}

/// Per-city unit prices for the tracked materials
struct CityRates {
    cement: Decimal,
    steel: Decimal,
    bricks: Decimal,
    sand: Decimal,
    crush: Decimal,
}

fn table(rates: CityRates) -> PriceTable {
    use Availability::*;
    use MaterialType::*;

    vec![
        price(Cement, "Bag (50kg)", rates.cement, InStock, Trend::Up, dec!(0.8)),
        price(Steel, "Ton (Grade 60)", rates.steel, InStock, Trend::Down, dec!(-1.2)),
        price(Bricks, "1000 Units (A-Class)", rates.bricks, LowStock, Trend::Stable, dec!(0)),
        price(Sand, "Trolley", rates.sand, InStock, Trend::Up, dec!(1.5)),
        price(Crush, "Trolley", rates.crush, InStock, Trend::Stable, dec!(0)),
    ]
}

/// Reference market prices, also used for Lahore
pub fn default_prices() -> PriceTable {
    table(CityRates {
        cement: DEFAULT_CEMENT_PER_BAG,
        steel: DEFAULT_STEEL_PER_TON,
        bricks: DEFAULT_BRICKS_PER_THOUSAND,
        sand: dec!(9500),
        crush: dec!(14000),
    })
}

/// Price book with the default table and sample tables for major cities
pub fn builtin_price_book() -> PriceBook {
    let mut book = PriceBook::new(default_prices());

    book.insert_city("Lahore", default_prices());
    book.insert_city(
        "Karachi",
        table(CityRates {
            cement: dec!(1280),
            steel: dec!(262000),
            bricks: dec!(16500),
            sand: dec!(8000),
            crush: dec!(12500),
        }),
    );
    book.insert_city(
        "Islamabad",
        table(CityRates {
            cement: dec!(1270),
            steel: dec!(268000),
            bricks: dec!(19500),
            sand: dec!(10500),
            crush: dec!(13500),
        }),
    );
    book.insert_city(
        "Rawalpindi",
        table(CityRates {
            cement: dec!(1265),
            steel: dec!(267000),
            bricks: dec!(19000),
            sand: dec!(10000),
            crush: dec!(13500),
        }),
    );
    book.insert_city(
        "Faisalabad",
        table(CityRates {
            cement: dec!(1240),
            steel: dec!(266000),
            bricks: dec!(17500),
            sand: dec!(9000),
            crush: dec!(14500),
        }),
    );
    book.insert_city(
        "Multan",
        table(CityRates {
            cement: dec!(1235),
            steel: dec!(266500),
            bricks: dec!(17000),
            sand: dec!(8500),
            crush: dec!(15000),
        }),
    );
    book.insert_city(
        "Peshawar",
        table(CityRates {
            cement: dec!(1260),
            steel: dec!(270000),
            bricks: dec!(18000),
            sand: dec!(9000),
            crush: dec!(12000),
        }),
    );

    book
}

#[cfg(test)]
mod tests {
    use super::*;

    fn price_of(table: &[MaterialPrice], material: MaterialType) -> Option<Decimal> {
        table.iter().find(|p| p.material == material).map(|p| p.price)
    }

    #[test]
    fn test_lahore_matches_reference_prices() {
        let book = builtin_price_book();
        let lahore = book.table_for("Lahore");

        assert!(!lahore.is_fallback);
        assert_eq!(price_of(lahore.prices, MaterialType::Cement), Some(dec!(1250)));
        assert_eq!(price_of(lahore.prices, MaterialType::Steel), Some(dec!(265000)));
        assert_eq!(price_of(lahore.prices, MaterialType::Bricks), Some(dec!(18500)));
    }

    #[test]
    fn test_every_city_prices_core_materials() {
        let book = builtin_price_book();

        for city in book.cities() {
            let table = book.table_for(city).prices;
            for material in [MaterialType::Cement, MaterialType::Steel, MaterialType::Bricks] {
                let p = price_of(table, material);
                assert!(p.is_some_and(|p| p > Decimal::ZERO), "{} {}", city, material);
            }
        }
    }
}
