//! Filter Model
//! The user's current constraint selection and the pure filtering pass that
//! maps (dataset, constraints) to a filtered frame.

use polars::prelude::*;
use std::collections::BTreeSet;

use super::loader::{column_f64, unique_strings};

/// Widget-population data: observed ranges and distinct values per column.
#[derive(Debug, Clone)]
pub struct FilterOptions {
    pub price_min: f64,
    pub price_max: f64,
    pub bedrooms: Vec<i64>,
    pub bathrooms: Vec<i64>,
    pub cities: Vec<String>,
    pub statezips: Vec<String>,
    /// Observed year span; `None` when no record has a usable year.
    pub year_span: Option<(i32, i32)>,
}

impl FilterOptions {
    pub fn from_dataframe(df: &DataFrame) -> Self {
        let prices = column_f64(df, "price");
        let price_min = prices.iter().copied().fold(f64::INFINITY, f64::min);
        let price_max = prices.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        let bedrooms: Vec<i64> = column_f64(df, "bedrooms")
            .into_iter()
            .map(|v| v as i64)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        // Fractional bathroom counts are truncated for the option list,
        // matching the source dashboard's integer multiselect.
        let bathrooms: Vec<i64> = column_f64(df, "bathrooms")
            .into_iter()
            .map(|v| v as i64)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let years: BTreeSet<i64> = column_f64(df, "year")
            .into_iter()
            .map(|v| v as i64)
            .collect();
        let year_span = match (years.first(), years.last()) {
            (Some(&lo), Some(&hi)) => Some((lo as i32, hi as i32)),
            _ => None,
        };

        Self {
            price_min: if price_min.is_finite() { price_min } else { 0.0 },
            price_max: if price_max.is_finite() { price_max } else { 0.0 },
            bedrooms,
            bathrooms,
            cities: unique_strings(df, "city"),
            statezips: unique_strings(df, "statezip"),
            year_span,
        }
    }
}

/// The current filter selection. Empty membership sets mean "accept all".
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintSet {
    /// Inclusive price bounds; defaults to the observed min/max.
    pub price_range: (f64, f64),
    pub bedrooms_in: BTreeSet<i64>,
    pub bathrooms_in: BTreeSet<i64>,
    pub city_in: BTreeSet<String>,
    pub statezip_in: BTreeSet<String>,
    /// Inclusive year bounds; `None` disables year filtering.
    pub year_range: Option<(i32, i32)>,
}

impl ConstraintSet {
    /// The full-range identity: passes every record through unchanged.
    pub fn unrestricted(options: &FilterOptions) -> Self {
        Self {
            price_range: (options.price_min, options.price_max),
            bedrooms_in: BTreeSet::new(),
            bathrooms_in: BTreeSet::new(),
            city_in: BTreeSet::new(),
            statezip_in: BTreeSet::new(),
            // No year predicate by default: records without a parsed year
            // must stay included until the user narrows the span.
            year_range: None,
        }
    }
}

/// Apply every active constraint as a single conjunctive filter pass.
pub fn apply(df: &DataFrame, constraints: &ConstraintSet) -> PolarsResult<DataFrame> {
    let (price_lo, price_hi) = constraints.price_range;
    let mut predicate = col("price")
        .gt_eq(lit(price_lo))
        .and(col("price").lt_eq(lit(price_hi)));

    if let Some(member) = any_of(
        constraints
            .bedrooms_in
            .iter()
            .map(|&v| col("bedrooms").eq(lit(v))),
    ) {
        predicate = predicate.and(member);
    }

    // Bathroom selections are whole numbers compared against the raw
    // (possibly fractional) column, so "2" matches 2.0 but not 2.5.
    if let Some(member) = any_of(
        constraints
            .bathrooms_in
            .iter()
            .map(|&v| col("bathrooms").eq(lit(v as f64))),
    ) {
        predicate = predicate.and(member);
    }

    if let Some(member) = any_of(
        constraints
            .city_in
            .iter()
            .map(|v| col("city").eq(lit(v.clone()))),
    ) {
        predicate = predicate.and(member);
    }

    if let Some(member) = any_of(
        constraints
            .statezip_in
            .iter()
            .map(|v| col("statezip").eq(lit(v.clone()))),
    ) {
        predicate = predicate.and(member);
    }

    if let Some((year_lo, year_hi)) = constraints.year_range {
        if df.column("year").is_ok() {
            predicate = predicate
                .and(col("year").gt_eq(lit(year_lo)))
                .and(col("year").lt_eq(lit(year_hi)));
        }
    }

    df.clone().lazy().filter(predicate).collect()
}

/// OR-fold of membership expressions; `None` for the empty set.
fn any_of(exprs: impl Iterator<Item = Expr>) -> Option<Expr> {
    exprs.reduce(|acc, e| acc.or(e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::prepare;

    fn housing_df() -> DataFrame {
        let df = df!(
            "date" => &[
                "2014-05-02 00:00:00",
                "2014-06-10 00:00:00",
                "2015-01-20 00:00:00",
                "2015-03-05 00:00:00",
            ],
            "price" => &[300000.0, 450000.0, 525000.0, 610000.0],
            "bedrooms" => &[3i64, 4, 2, 4],
            "bathrooms" => &[2.0, 2.5, 1.0, 3.0],
            "sqft_living" => &[1800.0, 2400.0, 1200.0, 2900.0],
            "city" => &["Seattle", "Renton", "Seattle", "Bellevue"],
            "statezip" => &["WA 98103", "WA 98055", "WA 98117", "WA 98004"],
        )
        .unwrap();
        prepare(df).unwrap()
    }

    fn options(df: &DataFrame) -> FilterOptions {
        FilterOptions::from_dataframe(df)
    }

    #[test]
    fn full_range_identity_keeps_every_record() {
        let df = housing_df();
        let constraints = ConstraintSet::unrestricted(&options(&df));
        let filtered = apply(&df, &constraints).unwrap();
        assert_eq!(filtered.height(), df.height());
    }

    #[test]
    fn apply_is_idempotent() {
        let df = housing_df();
        let mut constraints = ConstraintSet::unrestricted(&options(&df));
        constraints.city_in.insert("Seattle".to_string());

        let first = apply(&df, &constraints).unwrap();
        let second = apply(&df, &constraints).unwrap();
        assert_eq!(first.height(), second.height());
        assert!(first.equals(&second));
    }

    #[test]
    fn narrowing_a_constraint_never_grows_the_result() {
        let df = housing_df();
        let mut constraints = ConstraintSet::unrestricted(&options(&df));
        let full = apply(&df, &constraints).unwrap().height();

        constraints.price_range = (400000.0, constraints.price_range.1);
        let narrowed = apply(&df, &constraints).unwrap().height();
        assert!(narrowed <= full);

        constraints.price_range = (400000.0, 500000.0);
        let narrower = apply(&df, &constraints).unwrap().height();
        assert!(narrower <= narrowed);
    }

    #[test]
    fn membership_filters_are_conjunctive() {
        let df = housing_df();
        let mut constraints = ConstraintSet::unrestricted(&options(&df));
        constraints.bedrooms_in.insert(4);
        constraints.city_in.insert("Renton".to_string());

        let filtered = apply(&df, &constraints).unwrap();
        assert_eq!(filtered.height(), 1);
        let cities = unique_strings(&filtered, "city");
        assert_eq!(cities, vec!["Renton"]);
    }

    #[test]
    fn bathroom_filter_matches_whole_values_only() {
        let df = housing_df();
        let mut constraints = ConstraintSet::unrestricted(&options(&df));
        constraints.bathrooms_in.insert(2);

        // 2.5 bathrooms does not match the integer selection.
        let filtered = apply(&df, &constraints).unwrap();
        assert_eq!(filtered.height(), 1);
    }

    #[test]
    fn year_range_limits_records() {
        let df = housing_df();
        let mut constraints = ConstraintSet::unrestricted(&options(&df));
        constraints.year_range = Some((2015, 2015));

        let filtered = apply(&df, &constraints).unwrap();
        assert_eq!(filtered.height(), 2);
    }

    #[test]
    fn year_range_is_ignored_without_year_column() {
        let df = housing_df().drop("year").unwrap();
        let mut constraints = ConstraintSet::unrestricted(&options(&df));
        constraints.year_range = Some((2015, 2015));

        let filtered = apply(&df, &constraints).unwrap();
        assert_eq!(filtered.height(), df.height());
    }

    #[test]
    fn empty_result_is_well_formed() {
        let df = housing_df();
        let mut constraints = ConstraintSet::unrestricted(&options(&df));
        constraints.price_range = (1.0, 2.0);

        let filtered = apply(&df, &constraints).unwrap();
        assert_eq!(filtered.height(), 0);
        assert_eq!(filtered.width(), df.width());
    }

    #[test]
    fn records_with_unparseable_dates_survive_full_range() {
        let df = prepare(
            df!(
                "date" => &["2014-05-02 00:00:00", "not a date"],
                "price" => &[300000.0, 450000.0],
                "bedrooms" => &[3i64, 4],
                "bathrooms" => &[2.0, 2.5],
                "sqft_living" => &[1800.0, 2400.0],
                "city" => &["Seattle", "Renton"],
                "statezip" => &["WA 98103", "WA 98055"],
            )
            .unwrap(),
        )
        .unwrap();

        let opts = options(&df);
        let constraints = ConstraintSet::unrestricted(&opts);
        assert_eq!(constraints.year_range, None);

        // Full-range identity holds even though one year is null.
        let filtered = apply(&df, &constraints).unwrap();
        assert_eq!(filtered.height(), df.height());

        // An active year filter does exclude the record without a year.
        let mut narrowed = constraints;
        narrowed.year_range = opts.year_span;
        assert_eq!(apply(&df, &narrowed).unwrap().height(), 1);
    }

    #[test]
    fn options_report_observed_ranges() {
        let df = housing_df();
        let opts = options(&df);
        assert_eq!(opts.price_min, 300000.0);
        assert_eq!(opts.price_max, 610000.0);
        assert_eq!(opts.bedrooms, vec![2, 3, 4]);
        assert_eq!(opts.bathrooms, vec![1, 2, 3]);
        assert_eq!(opts.year_span, Some((2014, 2015)));
    }
}
