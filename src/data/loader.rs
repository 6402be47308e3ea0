//! Housing Dataset Loader
//! Reads the housing-sale CSV once per process, validates the schema and
//! derives year/month columns from the sale date.

use once_cell::sync::OnceCell;
use polars::prelude::*;
use thiserror::Error;

/// Columns every usable dataset must carry.
pub const REQUIRED_COLUMNS: [&str; 6] = [
    "price",
    "bedrooms",
    "bathrooms",
    "sqft_living",
    "city",
    "statezip",
];

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to read '{path}': {source}")]
    Csv { path: String, source: PolarsError },
    #[error("missing required column '{0}'")]
    MissingColumn(String),
    #[error("malformed dataset: {0}")]
    Malformed(#[from] PolarsError),
}

static DATASET: OnceCell<DataFrame> = OnceCell::new();

/// Load the dataset once and cache it for the process lifetime.
///
/// Concurrent first callers are serialized by the cell; afterwards everyone
/// shares the same immutable frame. A failed load is not cached.
pub fn load_cached(path: &str) -> Result<&'static DataFrame, LoadError> {
    DATASET.get_or_try_init(|| load(path))
}

/// Read, validate and derive. Fatal on a missing/unreadable file or a
/// broken schema; unparseable dates are per-record warnings, not errors.
pub fn load(path: &str) -> Result<DataFrame, LoadError> {
    let df = read_csv(path)?;
    let df = prepare(df)?;
    log::info!(
        "loaded {} rows, {} columns from '{}'",
        df.height(),
        df.width(),
        path
    );
    Ok(df)
}

fn read_csv(path: &str) -> Result<DataFrame, LoadError> {
    LazyCsvReader::new(path)
        .with_infer_schema_length(Some(10000))
        .with_ignore_errors(true)
        .finish()
        .and_then(|lazy| lazy.collect())
        .map_err(|source| LoadError::Csv {
            path: path.to_string(),
            source,
        })
}

/// Validate the schema, pin column types and derive `year`/`month`.
pub fn prepare(df: DataFrame) -> Result<DataFrame, LoadError> {
    for required in REQUIRED_COLUMNS {
        if df.column(required).is_err() {
            return Err(LoadError::MissingColumn(required.to_string()));
        }
    }

    let mut df = df
        .lazy()
        .with_columns([
            col("price").strict_cast(DataType::Float64),
            col("bathrooms").strict_cast(DataType::Float64),
            col("sqft_living").strict_cast(DataType::Float64),
            col("bedrooms").strict_cast(DataType::Int64),
        ])
        .collect()?;

    let date_is_string = df
        .column("date")
        .map(|c| c.dtype() == &DataType::String)
        .unwrap_or(false);
    if date_is_string {
        let raw_nulls = df.column("date")?.null_count();
        df = derive_date_fields(df)?;
        let parsed_nulls = df.column("date")?.null_count();
        if parsed_nulls > raw_nulls {
            log::warn!(
                "{} records had unparseable dates; excluded from year/month fields",
                parsed_nulls - raw_nulls
            );
        }
    }

    Ok(df)
}

/// Parse the string `date` column (nulls where parsing fails) and derive
/// `year` and the first-of-month `month` date.
fn derive_date_fields(df: DataFrame) -> Result<DataFrame, LoadError> {
    let options = StrptimeOptions {
        strict: false,
        ..Default::default()
    };

    let df = df
        .lazy()
        .with_column(
            col("date")
                .str()
                .to_datetime(None, None, options, lit("raise"))
                .cast(DataType::Date),
        )
        .with_columns([
            col("date").dt().year().alias("year"),
            col("date")
                .dt()
                .truncate(lit("1mo"))
                .cast(DataType::Date)
                .alias("month"),
        ])
        .collect()?;

    Ok(df)
}

/// Names of numeric columns, in frame order.
pub fn numeric_column_names(df: &DataFrame) -> Vec<String> {
    df.get_columns()
        .iter()
        .filter(|col| {
            matches!(
                col.dtype(),
                DataType::Float32
                    | DataType::Float64
                    | DataType::Int8
                    | DataType::Int16
                    | DataType::Int32
                    | DataType::Int64
                    | DataType::UInt8
                    | DataType::UInt16
                    | DataType::UInt32
                    | DataType::UInt64
            )
        })
        .map(|col| col.name().to_string())
        .collect()
}

/// Extract a column as non-null f64 values (casts numerics as needed).
pub fn column_f64(df: &DataFrame, column: &str) -> Vec<f64> {
    df.column(column)
        .ok()
        .and_then(|col| col.cast(&DataType::Float64).ok())
        .and_then(|col| {
            col.f64()
                .ok()
                .map(|ca| ca.into_iter().flatten().filter(|v| !v.is_nan()).collect())
        })
        .unwrap_or_default()
}

/// Sorted distinct non-null values of a string column.
pub fn unique_strings(df: &DataFrame, column: &str) -> Vec<String> {
    df.column(column)
        .ok()
        .and_then(|col| col.unique().ok())
        .map(|unique| {
            let series = unique.as_materialized_series();
            let mut values: Vec<String> = series
                .iter()
                .filter_map(|v| {
                    if v.is_null() {
                        None
                    } else {
                        Some(v.to_string().trim_matches('"').to_string())
                    }
                })
                .collect();
            values.sort();
            values
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn housing_df() -> DataFrame {
        df!(
            "date" => &["2014-05-02 00:00:00", "2014-06-10 00:00:00", "not a date"],
            "price" => &[300000.0, 450000.0, 525000.0],
            "bedrooms" => &[3i64, 4, 2],
            "bathrooms" => &[2.0, 2.5, 1.0],
            "sqft_living" => &[1800.0, 2400.0, 1200.0],
            "city" => &["Seattle", "Renton", "Seattle"],
            "statezip" => &["WA 98103", "WA 98055", "WA 98117"],
        )
        .unwrap()
    }

    #[test]
    fn prepare_derives_year_and_month() {
        let df = prepare(housing_df()).unwrap();
        assert!(df.column("year").is_ok());
        assert!(df.column("month").is_ok());

        let years: Vec<Option<i32>> = df
            .column("year")
            .unwrap()
            .i32()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(years, vec![Some(2014), Some(2014), None]);
    }

    #[test]
    fn prepare_rejects_missing_required_column() {
        let df = housing_df().drop("price").unwrap();
        let err = prepare(df).unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn(c) if c == "price"));
    }

    #[test]
    fn prepare_rejects_non_numeric_price() {
        let df = housing_df()
            .drop("price")
            .unwrap()
            .hstack(&[Column::new("price".into(), &["cheap", "mid", "high"])])
            .unwrap();
        let err = prepare(df).unwrap_err();
        assert!(matches!(err, LoadError::Malformed(_)));
    }

    #[test]
    fn prepare_without_date_column_skips_derived_fields() {
        let df = housing_df().drop("date").unwrap();
        let df = prepare(df).unwrap();
        assert!(df.column("year").is_err());
        assert!(df.column("month").is_err());
    }

    #[test]
    fn load_fails_for_missing_file() {
        let err = load("definitely_not_here.csv").unwrap_err();
        assert!(matches!(err, LoadError::Csv { .. }));
    }

    #[test]
    fn numeric_columns_include_derived_year() {
        let df = prepare(housing_df()).unwrap();
        let numeric = numeric_column_names(&df);
        assert!(numeric.contains(&"price".to_string()));
        assert!(numeric.contains(&"year".to_string()));
        assert!(!numeric.contains(&"city".to_string()));
    }

    #[test]
    fn unique_strings_are_sorted_and_deduped() {
        let df = housing_df();
        assert_eq!(unique_strings(&df, "city"), vec!["Renton", "Seattle"]);
    }
}
