use polars::prelude::*;

use crate::error::ProfileError;
use crate::ranking::ReportKind;
use crate::schema::{canonical, suffix};

/// Merge a SKU summary with its ranked report into the full ABC report.
///
/// Left join on the SKU key; where the ranked report reuses a summary column
/// name (the measure column, which carries percentages after ranking) the
/// right-hand column gets the `_%` suffix. Joins do not guarantee row order,
/// so the merged table is re-sorted by the report kind's ordering afterwards.
///
/// `tag` is the report-type tag (`ORDERLINES` or `QTY`); anything else fails
/// with [`ProfileError::UnknownReportType`] before any work is done.
pub fn full_report(
    summary: &DataFrame,
    ranked: &DataFrame,
    tag: &str,
) -> Result<DataFrame, ProfileError> {
    let kind = ReportKind::from_tag(tag)?;

    let mut args = JoinArgs::new(JoinType::Left);
    args.suffix = Some(suffix::PERCENT.into());
    let merged = summary
        .clone()
        .lazy()
        .join(
            ranked.clone().lazy(),
            [col(canonical::SKU_ID)],
            [col(canonical::SKU_ID)],
            args,
        )
        .collect()?;

    let sorted = merged.sort(
        [kind.measure(), kind.secondary()],
        SortMultipleOptions::default()
            .with_order_descending(true)
            .with_maintain_order(true),
    )?;
    Ok(sorted)
}
