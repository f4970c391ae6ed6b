use polars::prelude::*;

use crate::error::ProfileError;
use crate::schema::{abc, canonical, metrics_key, report_key, report_tag, suffix};

/// Which measure an ABC report ranks SKUs by. The other measure is always the
/// secondary sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Orderlines,
    Quantity,
}

impl ReportKind {
    pub fn measure(&self) -> &'static str {
        match self {
            ReportKind::Orderlines => abc::ORDERLINES,
            ReportKind::Quantity => abc::QTY_PICKED,
        }
    }

    pub fn secondary(&self) -> &'static str {
        match self {
            ReportKind::Orderlines => abc::QTY_PICKED,
            ReportKind::Quantity => abc::ORDERLINES,
        }
    }

    /// Percentage column carrying this measure in a merged full report.
    pub fn percent_col(&self) -> &'static str {
        match self {
            ReportKind::Orderlines => abc::ORDERLINES_PER,
            ReportKind::Quantity => abc::QTY_PER,
        }
    }

    pub fn report_key(&self) -> &'static str {
        match self {
            ReportKind::Orderlines => report_key::FULL_REPORT_ORDERLINES,
            ReportKind::Quantity => report_key::FULL_REPORT_QTY,
        }
    }

    pub fn metrics_key(&self) -> &'static str {
        match self {
            ReportKind::Orderlines => metrics_key::ORDERLINE_METRICS,
            ReportKind::Quantity => metrics_key::QTY_METRICS,
        }
    }

    pub fn from_tag(tag: &str) -> Result<Self, ProfileError> {
        match tag {
            report_tag::ORDERLINES => Ok(ReportKind::Orderlines),
            report_tag::QTY => Ok(ReportKind::Quantity),
            other => Err(ProfileError::UnknownReportType(other.to_string())),
        }
    }

    pub fn from_report_key(key: &str) -> Result<Self, ProfileError> {
        match key {
            report_key::FULL_REPORT_ORDERLINES => Ok(ReportKind::Orderlines),
            report_key::FULL_REPORT_QTY => Ok(ReportKind::Quantity),
            other => Err(ProfileError::UnknownReportType(other.to_string())),
        }
    }
}

/// Round to two decimals, half away from zero. Applied to every percentage
/// column in the crate.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Build the ranked cumulative-distribution report from a SKU summary.
///
/// Rows are sorted descending by (measure, secondary measure) with a stable
/// sort, so exact ties keep their original relative order. Each row gets a
/// `SKU_%` of `rank * 100 / total` and the measure column is replaced by its
/// cumulative share of the measure total, both rounded to two decimals.
///
/// An empty summary yields an empty report; no division takes place.
pub fn rank_report(summary: &DataFrame, kind: ReportKind) -> Result<DataFrame, ProfileError> {
    let measure = kind.measure();
    if summary.height() == 0 {
        return Ok(DataFrame::new(vec![
            Series::new_empty(canonical::SKU_ID.into(), &DataType::String).into(),
            Series::new_empty(abc::SKU_PER.into(), &DataType::Float64).into(),
            Series::new_empty(measure.into(), &DataType::Float64).into(),
        ])?);
    }

    let sorted = summary.sort(
        [measure, kind.secondary()],
        SortMultipleOptions::default()
            .with_order_descending(true)
            .with_maintain_order(true),
    )?;

    let measure_col = sorted.column(measure)?.cast(&DataType::Float64)?;
    let values = measure_col.as_materialized_series().f64()?;
    let total: f64 = values.into_iter().flatten().sum();
    let n = sorted.height();

    let mut sku_per = Vec::with_capacity(n);
    let mut measure_per = Vec::with_capacity(n);
    let mut running = 0.0;
    for (i, v) in values.into_iter().enumerate() {
        running += v.unwrap_or(0.0);
        sku_per.push(round2((i + 1) as f64 * 100.0 / n as f64));
        let share = if total > 0.0 { running / total * 100.0 } else { 0.0 };
        measure_per.push(round2(share));
    }

    let report = DataFrame::new(vec![
        sorted.column(canonical::SKU_ID)?.clone(),
        Series::new(abc::SKU_PER.into(), sku_per).into(),
        Series::new(measure.into(), measure_per).into(),
    ])?;
    Ok(report)
}

/// Orderline-pattern grouping axis for [`general_report`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternGroupBy {
    /// Group orders by their total quantity; sums orderlines per group.
    Quantity,
    /// Group orders by their orderline count; sums quantity per group.
    Orderline,
}

impl PatternGroupBy {
    fn key(&self) -> &'static str {
        match self {
            PatternGroupBy::Quantity => canonical::QTY,
            PatternGroupBy::Orderline => canonical::N_OLS,
        }
    }

    fn summed(&self) -> &'static str {
        match self {
            PatternGroupBy::Quantity => canonical::N_OLS,
            PatternGroupBy::Orderline => canonical::QTY,
        }
    }
}

/// Build the orderline-pattern distribution report from an order summary.
///
/// Groups the order-level pivot by the chosen key (ascending), counting unique
/// orders and summing the other measure. The grouped table is then extended
/// with `_CS` cumulative-sum columns and `_%` / `_CS_%` percentage columns,
/// each value column divided by its own table-wide total.
pub fn general_report(
    order_pt: &DataFrame,
    group_by: PatternGroupBy,
) -> Result<DataFrame, ProfileError> {
    let key = group_by.key();
    let summed = group_by.summed();

    let grouped = order_pt
        .clone()
        .lazy()
        .group_by_stable([col(key)])
        .agg([
            col(canonical::ORDER_ID)
                .n_unique()
                .cast(DataType::Int64)
                .alias(canonical::N_ORDERS),
            col(summed).sum(),
        ])
        .sort([key], SortMultipleOptions::default())
        .collect()?;

    let mut raw: Vec<(&'static str, Vec<f64>, Vec<f64>)> = Vec::new();
    for name in [canonical::N_ORDERS, summed] {
        let values = grouped.column(name)?.cast(&DataType::Float64)?;
        let values: Vec<f64> = values
            .as_materialized_series()
            .f64()?
            .into_iter()
            .flatten()
            .collect();
        let cumsum = running_sum(&values);
        raw.push((name, values, cumsum));
    }

    // Layout mirrors the report build-up: values, cumulative sums, then the
    // percentage view of both.
    let mut columns: Vec<Column> = vec![grouped.column(key)?.clone()];
    for (name, values, _) in &raw {
        columns.push(Series::new((*name).into(), values).into());
    }
    for (name, _, cumsum) in &raw {
        columns.push(Series::new(format!("{name}{}", suffix::CUMSUM).into(), cumsum).into());
    }
    for (name, values, _) in &raw {
        columns.push(percent_column(name, values, values));
    }
    for (name, values, cumsum) in &raw {
        let cs_name = format!("{name}{}", suffix::CUMSUM);
        columns.push(percent_column(&cs_name, cumsum, values));
    }
    Ok(DataFrame::new(columns)?)
}

fn running_sum(values: &[f64]) -> Vec<f64> {
    let mut running = 0.0;
    values
        .iter()
        .map(|v| {
            running += v;
            running
        })
        .collect()
}

fn percent_column(name: &str, values: &[f64], base: &[f64]) -> Column {
    let total: f64 = base.iter().sum();
    let percent: Vec<f64> = values
        .iter()
        .map(|v| {
            if total > 0.0 {
                round2(v / total * 100.0)
            } else {
                0.0
            }
        })
        .collect();
    Series::new(format!("{name}{}", suffix::PERCENT).into(), &percent).into()
}
