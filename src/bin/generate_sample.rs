//! Generate a synthetic housing CSV for trying the dashboard locally:
//!
//! ```sh
//! cargo run --bin generate_sample
//! cargo run
//! ```

use anyhow::{Context, Result};
use polars::prelude::*;
use rand::Rng;
use std::fs::File;

const OUTPUT: &str = "USA Housing Dataset.csv";
const ROWS: usize = 4000;

const CITIES: [(&str, &str, f64); 8] = [
    ("Seattle", "WA 98103", 620000.0),
    ("Bellevue", "WA 98004", 860000.0),
    ("Renton", "WA 98055", 420000.0),
    ("Kent", "WA 98030", 360000.0),
    ("Redmond", "WA 98052", 740000.0),
    ("Kirkland", "WA 98033", 690000.0),
    ("Auburn", "WA 98002", 330000.0),
    ("Issaquah", "WA 98027", 640000.0),
];

fn main() -> Result<()> {
    env_logger::init();
    let mut rng = rand::rng();

    let mut dates = Vec::with_capacity(ROWS);
    let mut prices = Vec::with_capacity(ROWS);
    let mut bedrooms = Vec::with_capacity(ROWS);
    let mut bathrooms = Vec::with_capacity(ROWS);
    let mut sqft = Vec::with_capacity(ROWS);
    let mut cities = Vec::with_capacity(ROWS);
    let mut statezips = Vec::with_capacity(ROWS);

    for _ in 0..ROWS {
        let (city, statezip, base_price) = CITIES[rng.random_range(0..CITIES.len())];
        let beds = rng.random_range(1..=6i64);
        let baths = rng.random_range(2..=8) as f64 / 2.0;
        let area = 500.0 + beds as f64 * 400.0 + rng.random_range(0.0..900.0);

        // Price loosely tracks area around the city's base level.
        let price = (base_price * (0.5 + area / 2500.0) * rng.random_range(0.8..1.2)).round();

        let month = rng.random_range(1..=12u32);
        let day = rng.random_range(1..=28u32);
        dates.push(format!("2014-{month:02}-{day:02} 00:00:00"));
        prices.push(price);
        bedrooms.push(beds);
        bathrooms.push(baths);
        sqft.push(area.round());
        cities.push(city);
        statezips.push(statezip);
    }

    let mut df = df!(
        "date" => dates,
        "price" => prices,
        "bedrooms" => bedrooms,
        "bathrooms" => bathrooms,
        "sqft_living" => sqft,
        "city" => cities,
        "statezip" => statezips,
    )?;

    let mut file = File::create(OUTPUT).with_context(|| format!("creating '{OUTPUT}'"))?;
    CsvWriter::new(&mut file).finish(&mut df)?;

    println!("wrote {} rows to '{}'", df.height(), OUTPUT);
    Ok(())
}
