use polars::prelude::*;

use crate::aggregate::epoch_date;
use crate::error::ProfileError;
use crate::mapping::ColumnMapping;
use crate::schema::{canonical, profile};

/// Whole-dataset headline figures, computed from the raw table rather than
/// from either bucketed summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatasetStats {
    /// Unique order count.
    pub n_orders: i64,
    /// Total orderline count (unique order-SKU pairs).
    pub n_orderlines: i64,
    /// Unique SKU count.
    pub n_skus: i64,
}

pub fn dataset_stats(df: &DataFrame, mapping: &ColumnMapping) -> Result<DatasetStats, ProfileError> {
    mapping.validate(df)?;

    let n_orders = df
        .column(mapping.order())?
        .as_materialized_series()
        .n_unique()? as i64;
    let n_skus = df
        .column(mapping.sku())?
        .as_materialized_series()
        .n_unique()? as i64;

    let (existing, new): (Vec<&str>, Vec<&str>) = mapping.renaming().into_iter().unzip();
    let per_order = df
        .clone()
        .lazy()
        .rename(existing, new, true)
        .group_by_stable([col(canonical::ORDER_ID)])
        .agg([col(canonical::SKU_ID)
            .n_unique()
            .cast(DataType::Int64)
            .alias(canonical::N_OLS)])
        .collect()?;
    let n_orderlines = per_order
        .column(canonical::N_OLS)?
        .as_materialized_series()
        .i64()?
        .into_iter()
        .flatten()
        .sum();

    Ok(DatasetStats {
        n_orders,
        n_orderlines,
        n_skus,
    })
}

/// Annotate a time-bucket summary with weekday names and month abbreviations.
pub fn add_dt_info(summary: &DataFrame) -> Result<DataFrame, ProfileError> {
    let days = summary.column(profile::BUCKET)?.cast(&DataType::Int32)?;
    let mut weekday_names = Vec::with_capacity(summary.height());
    let mut month_abbrs = Vec::with_capacity(summary.height());
    for d in days.as_materialized_series().i32()? {
        match d {
            Some(d) => {
                let date = epoch_date(d);
                weekday_names.push(Some(date.format("%A").to_string()));
                month_abbrs.push(Some(date.format("%b").to_string()));
            }
            None => {
                weekday_names.push(None);
                month_abbrs.push(None);
            }
        }
    }

    let mut annotated = summary.clone();
    annotated.with_column(Series::new(profile::DAYS.into(), weekday_names))?;
    annotated.with_column(Series::new(profile::MONTHS.into(), month_abbrs))?;
    Ok(annotated)
}

/// Per-integer-percentile lookup of a statistic across a bucketed summary.
///
/// Percentiles 0 through 100 with linear interpolation between observations;
/// null values are excluded. An empty summary yields an empty table.
pub fn percentile_table(summary: &DataFrame, column: &str) -> Result<DataFrame, ProfileError> {
    let values = summary.column(column)?.cast(&DataType::Float64)?;
    let mut values: Vec<f64> = values
        .as_materialized_series()
        .f64()?
        .into_iter()
        .flatten()
        .filter(|v| !v.is_nan())
        .collect();
    values.sort_by(|a, b| a.total_cmp(b));

    let mut percentiles: Vec<i64> = Vec::new();
    let mut stats: Vec<f64> = Vec::new();
    if !values.is_empty() {
        let n = values.len();
        for q in 0..=100i64 {
            let pos = q as f64 / 100.0 * (n - 1) as f64;
            let lo = pos.floor() as usize;
            let hi = pos.ceil() as usize;
            let frac = pos - lo as f64;
            percentiles.push(q);
            stats.push(values[lo] + (values[hi] - values[lo]) * frac);
        }
    }

    let table = DataFrame::new(vec![
        Series::new(profile::PERCENTILE.into(), &percentiles).into(),
        Series::new(column.into(), &stats).into(),
    ])?;
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{time_pivot, Granularity};
    use chrono::NaiveDate;
    use polars::df;

    fn micros(y: i32, m: u32, d: u32) -> i64 {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
            .and_utc()
            .timestamp_micros()
    }

    fn timed_transactions() -> DataFrame {
        let ts = Series::new(
            "ts".into(),
            &[
                micros(2024, 6, 3),
                micros(2024, 6, 3),
                micros(2024, 6, 4),
            ],
        )
        .cast(&DataType::Datetime(TimeUnit::Microseconds, None))
        .unwrap();
        let mut df = df!(
            "order" => ["O1", "O1", "O2"],
            "sku" => ["S1", "S2", "S1"],
            "qty" => [4i64, 6, 5],
        )
        .unwrap();
        df.with_column(ts).unwrap();
        df
    }

    fn mapping() -> ColumnMapping {
        ColumnMapping::new("order", "sku", "qty").with_timestamp("ts")
    }

    #[test]
    fn stats_come_from_the_raw_table() {
        let stats = dataset_stats(&timed_transactions(), &mapping()).unwrap();
        assert_eq!(stats.n_orders, 2);
        assert_eq!(stats.n_orderlines, 3);
        assert_eq!(stats.n_skus, 2);
    }

    #[test]
    fn dt_info_adds_weekday_and_month() {
        let summary = time_pivot(&timed_transactions(), &mapping(), Granularity::Day).unwrap();
        let annotated = add_dt_info(&summary).unwrap();

        let days: Vec<&str> = annotated
            .column(profile::DAYS)
            .unwrap()
            .as_materialized_series()
            .str()
            .unwrap()
            .into_iter()
            .flatten()
            .collect();
        assert_eq!(days, ["Monday", "Tuesday"]);

        let months: Vec<&str> = annotated
            .column(profile::MONTHS)
            .unwrap()
            .as_materialized_series()
            .str()
            .unwrap()
            .into_iter()
            .flatten()
            .collect();
        assert_eq!(months, ["Jun", "Jun"]);
    }

    #[test]
    fn percentile_table_interpolates_linearly() {
        let summary = df!(canonical::N_OLS => [1i64, 2, 3, 4, 5]).unwrap();
        let table = percentile_table(&summary, canonical::N_OLS).unwrap();
        assert_eq!(table.height(), 101);

        let stats: Vec<f64> = table
            .column(canonical::N_OLS)
            .unwrap()
            .as_materialized_series()
            .f64()
            .unwrap()
            .into_iter()
            .flatten()
            .collect();
        assert_eq!(stats[0], 1.0);
        assert_eq!(stats[50], 3.0);
        assert_eq!(stats[100], 5.0);
        assert!((stats[25] - 2.0).abs() < 1e-9);
        // Between observations: 10th percentile of [1..5] is 1.4.
        assert!((stats[10] - 1.4).abs() < 1e-9);
    }

    #[test]
    fn percentile_table_of_empty_summary_is_empty() {
        let summary = df!(canonical::N_OLS => Vec::<i64>::new()).unwrap();
        let table = percentile_table(&summary, canonical::N_OLS).unwrap();
        assert_eq!(table.height(), 0);
    }
}
