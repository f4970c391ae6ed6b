//! Report-generation entry points, one per report family.
//!
//! Each generator validates its inputs eagerly, computes every table of the
//! family, and only then writes to the session store. A failure anywhere in
//! the pipeline therefore leaves previously stored reports untouched.
//! Re-invoking a generator with identical inputs overwrites the stored
//! tables with identical results; nothing here depends on wall-clock time or
//! randomness.

use polars::prelude::*;
use tracing::info;

use crate::aggregate::{one_orderline_pivot, order_pivot, sku_pivot, time_pivot, Granularity};
use crate::error::ProfileError;
use crate::mapping::ColumnMapping;
use crate::merge;
use crate::profile::{add_dt_info, dataset_stats, percentile_table, DatasetStats};
use crate::ranking::{general_report, rank_report, PatternGroupBy, ReportKind};
use crate::schema::{canonical, report_key, report_tag};
use crate::store::SessionContext;

/// Generate the ABC report family: SKU summary, the two ranked reports and
/// the two merged full reports.
pub fn generate_abc_reports(
    ctx: &mut SessionContext,
    df: &DataFrame,
    mapping: &ColumnMapping,
) -> Result<(), ProfileError> {
    mapping.validate(df)?;

    let pt = sku_pivot(df, mapping)?;
    let ol_report = rank_report(&pt, ReportKind::Orderlines)?;
    let qty_report = rank_report(&pt, ReportKind::Quantity)?;
    let full_ol = merge::full_report(&pt, &ol_report, report_tag::ORDERLINES)?;
    let full_qty = merge::full_report(&pt, &qty_report, report_tag::QTY)?;

    info!(session = %ctx.id(), skus = pt.height(), "generated ABC reports");
    ctx.save_report(report_key::FIRST_PIVOT, pt);
    ctx.save_report(report_key::ORDERLINE_REPORT, ol_report);
    ctx.save_report(report_key::QTY_REPORT, qty_report);
    ctx.save_report(report_key::FULL_REPORT_ORDERLINES, full_ol);
    ctx.save_report(report_key::FULL_REPORT_QTY, full_qty);
    Ok(())
}

/// Generate the orderline-pattern report family: order summary, the two
/// grouped distribution reports and the one-orderline report.
pub fn generate_pattern_reports(
    ctx: &mut SessionContext,
    df: &DataFrame,
    mapping: &ColumnMapping,
) -> Result<(), ProfileError> {
    mapping.validate(df)?;

    let order_pt = order_pivot(df, mapping)?;
    let qty_report = general_report(&order_pt, PatternGroupBy::Quantity)?;
    let ol_report = general_report(&order_pt, PatternGroupBy::Orderline)?;
    let one_ol = one_orderline_pivot(&order_pt)?;

    info!(session = %ctx.id(), orders = order_pt.height(), "generated pattern reports");
    ctx.save_report(report_key::ORDER_PIVOT, order_pt);
    ctx.save_report(report_key::PATTERN_QTY_REPORT, qty_report);
    ctx.save_report(report_key::PATTERN_OL_REPORT, ol_report);
    ctx.save_report(report_key::ONE_ORDERLINE, one_ol);
    Ok(())
}

/// Generate the time-profile report family: business-day and calendar-day
/// bucket summaries, their percentile tables, and the overall dataset stats.
///
/// A missing or non-datetime timestamp column surfaces as
/// [`ProfileError::TemporalIndex`] with nothing written to the store.
pub fn generate_profile_reports(
    ctx: &mut SessionContext,
    df: &DataFrame,
    mapping: &ColumnMapping,
) -> Result<DatasetStats, ProfileError> {
    mapping.validate(df)?;

    let stats = dataset_stats(df, mapping)?;

    let business = time_pivot(df, mapping, Granularity::BusinessDay)?;
    let daily = time_pivot(df, mapping, Granularity::Day)?;
    let business_percentile = percentile_table(&business, canonical::N_OLS)?;
    let daily_percentile = percentile_table(&daily, canonical::N_OLS)?;
    let business = add_dt_info(&business)?;
    let daily = add_dt_info(&daily)?;

    info!(
        session = %ctx.id(),
        orders = stats.n_orders,
        orderlines = stats.n_orderlines,
        "generated profile reports"
    );
    ctx.save_stats(stats);
    ctx.save_report(report_key::BUSINESS_PERCENTILE, business_percentile);
    ctx.save_report(report_key::BUSINESS_DAILY_REPORT, business);
    ctx.save_report(report_key::DAILY_PERCENTILE, daily_percentile);
    ctx.save_report(report_key::DAILY_REPORT, daily);
    Ok(stats)
}
