//! Command-line estimator - prints a cost estimate for one project

use anyhow::{Context, Result};
use clap::Parser;
use construction_estimator::config::Config;
use construction_estimator::estimation::{estimate_request, ProjectRequest};
use construction_estimator::pricing::load_price_book;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "estimate")]
#[command(about = "Construction cost estimator for residential projects in Pakistan")]
struct Cli {
    /// Plot area in the chosen unit
    #[arg(short, long, default_value = "5")]
    area: f64,

    /// Marla, Kanal or SqFt
    #[arg(short, long, default_value = "Marla")]
    unit: String,

    /// "Ground Only", "Ground + 1" or "Ground + 2"
    #[arg(short, long, default_value = "Ground Only")]
    floors: String,

    /// Economy, Standard or Premium
    #[arg(short, long, default_value = "Standard")]
    quality: String,

    /// City whose price table is used
    #[arg(short, long, default_value = "Lahore")]
    city: String,

    /// Labor rate per sqft
    #[arg(long, default_value = "450")]
    labor_rate: f64,

    #[arg(long, default_value = "3")]
    rooms: u32,

    #[arg(long, default_value = "3")]
    bathrooms: u32,

    #[arg(long, default_value = "1")]
    kitchens: u32,

    /// "Grade 40", "Grade 60" or "Grade 75"
    #[arg(long, default_value = "Grade 60")]
    steel_grade: String,

    /// Concrete, Tiles, Marble, Granite or Wooden
    #[arg(long, default_value = "Tiles")]
    floor_finish: String,

    /// "Shallow/Strip", Raft or Piles
    #[arg(long, default_value = "Shallow/Strip")]
    foundation: String,

    /// Standard or Heavy
    #[arg(long, default_value = "Standard")]
    beams: String,

    /// CSV price table (overrides PRICE_TABLE_PATH)
    #[arg(long)]
    prices: Option<PathBuf>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// List cities with their own price table and exit
    #[arg(long)]
    list_cities: bool,
}

impl Cli {
    fn to_request(&self) -> ProjectRequest {
        ProjectRequest {
            area: self.area,
            unit_type: self.unit.clone(),
            floors: self.floors.clone(),
            quality: self.quality.clone(),
            city: self.city.clone(),
            labor_rate: self.labor_rate,
            rooms: self.rooms,
            bathrooms: self.bathrooms,
            kitchens: self.kitchens,
            steel_grade: self.steel_grade.clone(),
            floor_finish: self.floor_finish.clone(),
            foundation_type: self.foundation.clone(),
            beam_reinforcement: self.beams.clone(),
        }
    }
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Logs go to stderr so --json output stays clean
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    let prices = match &cli.prices {
        Some(path) => {
            let (book, stats) = load_price_book(path)?;
            info!("Loaded {:?}: {}", path, stats);
            book
        }
        None => config.price_book()?,
    };

    if cli.list_cities {
        for city in prices.cities() {
            println!("{}", city);
        }
        return Ok(());
    }

    let result = estimate_request(cli.to_request(), &prices, &config.policy)
        .context("Estimate failed")?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", result);
    }

    Ok(())
}
