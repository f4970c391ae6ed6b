use chrono::{Datelike, Duration, NaiveDate, Weekday};
use polars::prelude::*;

use crate::error::ProfileError;
use crate::mapping::ColumnMapping;
use crate::schema::{abc, canonical, profile};

/// Width of one time bucket for the profile reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    /// Every calendar day with at least one transaction.
    Day,
    /// Monday through Friday; weekend transactions are dropped.
    BusinessDay,
}

/// Group transactions by order: total quantity plus unique-SKU count per order.
///
/// Output columns: `ORDER_ID`, `QTY` (integer), `N_OLS`, sorted by order id.
pub fn order_pivot(df: &DataFrame, mapping: &ColumnMapping) -> Result<DataFrame, ProfileError> {
    mapping.validate(df)?;
    ensure_numeric(df, mapping.qty())?;

    let (existing, new): (Vec<&str>, Vec<&str>) = mapping.renaming().into_iter().unzip();
    let pt = df
        .clone()
        .lazy()
        .rename(existing, new, true)
        .group_by_stable([col(canonical::ORDER_ID)])
        .agg([
            col(canonical::QTY).sum().cast(DataType::Int64),
            col(canonical::SKU_ID)
                .n_unique()
                .cast(DataType::Int64)
                .alias(canonical::N_OLS),
        ])
        .sort([canonical::ORDER_ID], SortMultipleOptions::default())
        .collect()?;
    Ok(pt)
}

/// Group transactions by SKU, collapsing duplicate order lines first.
///
/// Stage one groups by (order, SKU) so the same SKU appearing twice in one
/// order counts as a single orderline with its quantities summed. Stage two
/// re-aggregates by SKU alone: unique order count, orderline count, total
/// quantity cast to integer.
///
/// Output columns: `SKU_ID`, `N_ORDERS`, `OLs`, `QTY_PICKED`, sorted by SKU.
pub fn sku_pivot(df: &DataFrame, mapping: &ColumnMapping) -> Result<DataFrame, ProfileError> {
    mapping.validate(df)?;
    ensure_numeric(df, mapping.qty())?;

    let (existing, new): (Vec<&str>, Vec<&str>) = mapping.renaming().into_iter().unzip();
    let pt = df
        .clone()
        .lazy()
        .rename(existing, new, true)
        .group_by_stable([col(canonical::ORDER_ID), col(canonical::SKU_ID)])
        .agg([col(canonical::QTY).sum()])
        .with_column(lit(1i64).alias(abc::ORDERLINES))
        .group_by_stable([col(canonical::SKU_ID)])
        .agg([
            col(canonical::ORDER_ID)
                .n_unique()
                .cast(DataType::Int64)
                .alias(canonical::N_ORDERS),
            col(abc::ORDERLINES).sum().cast(DataType::Int64),
            col(canonical::QTY)
                .sum()
                .cast(DataType::Int64)
                .alias(abc::QTY_PICKED),
        ])
        .sort([canonical::SKU_ID], SortMultipleOptions::default())
        .collect()?;
    Ok(pt)
}

/// Group transactions into day-wide time buckets.
///
/// Stage one groups by (bucket, order) for per-order quantity and unique-SKU
/// counts, stage two re-aggregates by bucket alone. Days without transactions
/// are simply absent; there is no zero filling.
///
/// Output columns: `DATE`, `N_ORDERS`, `N_OLS`, `QTY` (integer), sorted by
/// bucket.
pub fn time_pivot(
    df: &DataFrame,
    mapping: &ColumnMapping,
    granularity: Granularity,
) -> Result<DataFrame, ProfileError> {
    mapping.validate(df)?;
    ensure_numeric(df, mapping.qty())?;

    let ts = mapping
        .timestamp()
        .ok_or_else(|| ProfileError::TemporalIndex("<no timestamp mapped>".to_string()))?;
    match df.column(ts)?.dtype() {
        DataType::Datetime(_, _) | DataType::Date => {}
        _ => return Err(ProfileError::TemporalIndex(ts.to_string())),
    }

    let (existing, new): (Vec<&str>, Vec<&str>) = mapping.renaming().into_iter().unzip();
    let bucketed = df
        .clone()
        .lazy()
        .rename(existing, new, true)
        .with_column(col(ts).cast(DataType::Date).alias(profile::BUCKET))
        .select([
            col(profile::BUCKET),
            col(canonical::ORDER_ID),
            col(canonical::SKU_ID),
            col(canonical::QTY),
        ])
        .collect()?;

    let bucketed = match granularity {
        Granularity::Day => bucketed,
        Granularity::BusinessDay => filter_business_days(&bucketed)?,
    };

    let pt = bucketed
        .lazy()
        .group_by_stable([col(profile::BUCKET), col(canonical::ORDER_ID)])
        .agg([
            col(canonical::QTY).sum(),
            col(canonical::SKU_ID)
                .n_unique()
                .cast(DataType::Int64)
                .alias(canonical::N_OLS),
        ])
        .group_by_stable([col(profile::BUCKET)])
        .agg([
            col(canonical::ORDER_ID)
                .n_unique()
                .cast(DataType::Int64)
                .alias(canonical::N_ORDERS),
            col(canonical::N_OLS).sum(),
            col(canonical::QTY).sum().cast(DataType::Int64),
        ])
        .sort([profile::BUCKET], SortMultipleOptions::default())
        .collect()?;
    Ok(pt)
}

/// Distribution of single-orderline orders over quantity.
///
/// Takes the order-level pivot, keeps only orders with exactly one orderline
/// and counts unique orders per quantity value, ascending.
pub fn one_orderline_pivot(order_pt: &DataFrame) -> Result<DataFrame, ProfileError> {
    let pt = order_pt
        .clone()
        .lazy()
        .filter(col(canonical::N_OLS).eq(lit(1i64)))
        .group_by_stable([col(canonical::QTY)])
        .agg([col(canonical::ORDER_ID)
            .n_unique()
            .cast(DataType::Int64)
            .alias(canonical::N_ORDERS)])
        .sort([canonical::QTY], SortMultipleOptions::default())
        .collect()?;
    Ok(pt)
}

/// Convert a Date physical value (days since the Unix epoch) to a NaiveDate.
pub(crate) fn epoch_date(days: i32) -> NaiveDate {
    // NaiveDate::default() is the Unix epoch, 1970-01-01.
    NaiveDate::default() + Duration::days(days as i64)
}

fn filter_business_days(bucketed: &DataFrame) -> Result<DataFrame, ProfileError> {
    let days = bucketed.column(profile::BUCKET)?.cast(&DataType::Int32)?;
    let mask: BooleanChunked = days
        .as_materialized_series()
        .i32()?
        .into_iter()
        .map(|d| {
            Some(d.is_some_and(|d| {
                let weekday = epoch_date(d).weekday();
                !matches!(weekday, Weekday::Sat | Weekday::Sun)
            }))
        })
        .collect();
    Ok(bucketed.filter(&mask)?)
}

fn ensure_numeric(df: &DataFrame, name: &str) -> Result<(), ProfileError> {
    let dtype = df.column(name)?.dtype();
    let numeric = matches!(
        dtype,
        DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::Float32
            | DataType::Float64
    );
    if numeric {
        Ok(())
    } else {
        Err(ProfileError::TypeCoercion(name.to_string()))
    }
}
