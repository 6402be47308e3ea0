//! View Pipeline
//! One pure pass from (dataset, constraints) to everything the dashboard
//! renders. The GUI re-runs this on each filter change; nothing in here
//! touches UI state.

use polars::prelude::*;

use crate::data::filter::{apply, ConstraintSet};
use crate::data::loader::column_f64;
use crate::stats::summary::{
    correlation_matrix, group_mean, mean, median, rounded_mean_int, sample_rows,
    top_n_by_group_mean, CorrelationMatrix,
};

/// Upper bound on points fed to the scatter chart.
pub const SCATTER_SAMPLE_LIMIT: usize = 2000;
/// Number of cities in the "top cities by price" chart.
pub const TOP_CITY_COUNT: usize = 20;
/// Rows shown in the raw-data preview table.
pub const PREVIEW_ROW_LIMIT: usize = 200;

/// The four headline metrics. `None` renders as "N/A".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Kpis {
    /// Mean price truncated to whole dollars.
    pub avg_price: Option<i64>,
    pub median_sqft: Option<f64>,
    pub avg_bedrooms: Option<i64>,
    pub avg_bathrooms: Option<i64>,
}

/// One sampled observation for the price-vs-area scatter.
#[derive(Debug, Clone)]
pub struct ScatterPoint {
    pub sqft: f64,
    pub price: f64,
    pub bedrooms: i64,
    pub bathrooms: f64,
    pub city: String,
    pub statezip: String,
}

/// One bar of a grouped-mean chart.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupBar {
    pub label: String,
    pub value: f64,
}

/// Stringified head of the filtered frame for the preview table.
#[derive(Debug, Clone, Default)]
pub struct PreviewTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Everything the dashboard draws for one constraint selection.
#[derive(Debug, Clone, Default)]
pub struct DashboardView {
    pub row_count: usize,
    pub kpis: Kpis,
    pub scatter: Vec<ScatterPoint>,
    pub price_by_bedrooms: Vec<GroupBar>,
    pub price_by_city: Vec<GroupBar>,
    pub correlation: Option<CorrelationMatrix>,
    pub preview: PreviewTable,
}

/// Filter the dataset and compute every derived view.
///
/// Total over an empty result: KPIs become `None`, charts become empty,
/// the correlation matrix is absent.
pub fn build_view(df: &DataFrame, constraints: &ConstraintSet) -> PolarsResult<DashboardView> {
    let filtered = apply(df, constraints)?;

    let prices = column_f64(&filtered, "price");
    let sqft = column_f64(&filtered, "sqft_living");
    let bedrooms = column_f64(&filtered, "bedrooms");
    let bathrooms = column_f64(&filtered, "bathrooms");

    let kpis = Kpis {
        // int(mean) in the source dashboard: truncation, not rounding.
        avg_price: mean(&prices).map(|m| m as i64),
        median_sqft: median(&sqft),
        avg_bedrooms: rounded_mean_int(&bedrooms),
        avg_bathrooms: rounded_mean_int(&bathrooms),
    };

    let mut price_by_bedrooms: Vec<GroupBar> = group_mean(&filtered, "bedrooms", "price")?
        .into_iter()
        .map(|(label, value)| GroupBar { label, value })
        .collect();
    price_by_bedrooms.sort_by(|a, b| {
        let ka = a.label.parse::<f64>().unwrap_or(f64::MAX);
        let kb = b.label.parse::<f64>().unwrap_or(f64::MAX);
        ka.partial_cmp(&kb).unwrap_or(std::cmp::Ordering::Equal)
    });

    let price_by_city = top_n_by_group_mean(&filtered, "city", "price", TOP_CITY_COUNT)?
        .into_iter()
        .map(|(label, value)| GroupBar { label, value })
        .collect();

    Ok(DashboardView {
        row_count: filtered.height(),
        kpis,
        scatter: scatter_points(&filtered)?,
        price_by_bedrooms,
        price_by_city,
        correlation: correlation_matrix(&filtered),
        preview: preview_table(&filtered, PREVIEW_ROW_LIMIT),
    })
}

fn scatter_points(filtered: &DataFrame) -> PolarsResult<Vec<ScatterPoint>> {
    let sampled = sample_rows(filtered, SCATTER_SAMPLE_LIMIT)?;

    let sqft = sampled.column("sqft_living")?.f64()?.clone();
    let price = sampled.column("price")?.f64()?.clone();
    let bedrooms = sampled.column("bedrooms")?.i64()?.clone();
    let bathrooms = sampled.column("bathrooms")?.f64()?.clone();
    let city = sampled.column("city")?.str()?.clone();
    let statezip = sampled.column("statezip")?.str()?.clone();

    let mut points = Vec::with_capacity(sampled.height());
    for i in 0..sampled.height() {
        let (Some(sqft), Some(price), Some(bedrooms), Some(bathrooms)) =
            (sqft.get(i), price.get(i), bedrooms.get(i), bathrooms.get(i))
        else {
            continue;
        };

        points.push(ScatterPoint {
            sqft,
            price,
            bedrooms,
            bathrooms,
            city: city.get(i).unwrap_or_default().to_string(),
            statezip: statezip.get(i).unwrap_or_default().to_string(),
        });
    }

    Ok(points)
}

fn preview_table(filtered: &DataFrame, limit: usize) -> PreviewTable {
    let head = filtered.head(Some(limit));
    let columns: Vec<String> = head
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();

    let rows = (0..head.height())
        .map(|i| {
            head.get_columns()
                .iter()
                .map(|col| match col.get(i) {
                    Ok(v) if !v.is_null() => v.to_string().trim_matches('"').to_string(),
                    _ => String::new(),
                })
                .collect()
        })
        .collect();

    PreviewTable { columns, rows }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::FilterOptions;
    use crate::data::loader::prepare;

    fn housing_df() -> DataFrame {
        let df = df!(
            "date" => &[
                "2014-05-02 00:00:00",
                "2014-06-10 00:00:00",
                "2015-01-20 00:00:00",
            ],
            "price" => &[300000.0, 450000.0, 525000.0],
            "bedrooms" => &[3i64, 4, 2],
            "bathrooms" => &[2.0, 2.5, 1.0],
            "sqft_living" => &[1800.0, 2400.0, 1200.0],
            "city" => &["Seattle", "Renton", "Seattle"],
            "statezip" => &["WA 98103", "WA 98055", "WA 98117"],
        )
        .unwrap();
        prepare(df).unwrap()
    }

    #[test]
    fn view_covers_the_full_dataset_when_unrestricted() {
        let df = housing_df();
        let constraints = ConstraintSet::unrestricted(&FilterOptions::from_dataframe(&df));
        let view = build_view(&df, &constraints).unwrap();

        assert_eq!(view.row_count, 3);
        assert_eq!(view.kpis.avg_price, Some(425000));
        assert_eq!(view.kpis.median_sqft, Some(1800.0));
        assert_eq!(view.kpis.avg_bedrooms, Some(3));
        assert_eq!(view.scatter.len(), 3);
        // One bar per distinct bedroom count, ascending.
        let labels: Vec<&str> = view
            .price_by_bedrooms
            .iter()
            .map(|b| b.label.as_str())
            .collect();
        assert_eq!(labels, vec!["2", "3", "4"]);
        assert!(view.correlation.is_some());
        assert_eq!(view.preview.rows.len(), 3);
    }

    #[test]
    fn empty_selection_degrades_gracefully() {
        let df = housing_df();
        let mut constraints = ConstraintSet::unrestricted(&FilterOptions::from_dataframe(&df));
        constraints.price_range = (1.0, 2.0);

        let view = build_view(&df, &constraints).unwrap();
        assert_eq!(view.row_count, 0);
        assert_eq!(view.kpis, Kpis::default());
        assert!(view.scatter.is_empty());
        assert!(view.price_by_bedrooms.is_empty());
        assert!(view.price_by_city.is_empty());
        assert!(view.correlation.is_none());
        assert!(view.preview.rows.is_empty());
    }

    #[test]
    fn city_chart_is_sorted_descending_by_mean_price() {
        let df = housing_df();
        let constraints = ConstraintSet::unrestricted(&FilterOptions::from_dataframe(&df));
        let view = build_view(&df, &constraints).unwrap();

        let values: Vec<f64> = view.price_by_city.iter().map(|b| b.value).collect();
        let mut sorted = values.clone();
        sorted.sort_by(|a, b| b.partial_cmp(a).unwrap());
        assert_eq!(values, sorted);
        assert!(view.price_by_city.len() <= TOP_CITY_COUNT);
    }
}
