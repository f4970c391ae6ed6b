use polars::prelude::*;

use crate::error::ProfileError;
use crate::ranking::{round2, ReportKind};
use crate::schema::abc;
use crate::store::SessionContext;

/// A/B boundary and B/C boundary on the cumulative SKU-percentage axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AbcThresholds {
    t1: f64,
    t2: f64,
}

impl AbcThresholds {
    pub fn new(t1: f64, t2: f64) -> Result<Self, ProfileError> {
        if !(0.0..=100.0).contains(&t1) || !(0.0..=100.0).contains(&t2) || t1 > t2 {
            return Err(ProfileError::Validation(format!(
                "thresholds must satisfy 0 <= t1 <= t2 <= 100, got ({t1}, {t2})"
            )));
        }
        Ok(Self { t1, t2 })
    }

    pub fn a_boundary(&self) -> f64 {
        self.t1
    }

    pub fn b_boundary(&self) -> f64 {
        self.t2
    }
}

/// Per-class SKU and volume shares for one classified report.
///
/// The three SKU shares come straight from the thresholds and sum to 100;
/// the three volume shares are read off the cumulative measure column and
/// sum to 100 within rounding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AbcMetrics {
    pub a_sku: f64,
    pub a_uom: f64,
    pub b_sku: f64,
    pub b_uom: f64,
    pub c_sku: f64,
    pub c_uom: f64,
}

/// Assign A/B/C class labels and derive per-class volume shares.
///
/// Every row starts as `C`; rows with `SKU_% <= t2` are relabeled `B`, then
/// rows with `SKU_% <= t1` are relabeled `A`. The two masked passes run in
/// exactly that order so the tightest threshold wins on boundary rows.
///
/// Fails with [`ProfileError::EmptyClass`] when no row satisfies the A
/// threshold (t1 below the first row's SKU share selects zero rows).
pub fn classify(
    full_report: &DataFrame,
    kind: ReportKind,
    thresholds: &AbcThresholds,
) -> Result<(DataFrame, AbcMetrics), ProfileError> {
    let sku_per = full_report.column(abc::SKU_PER)?.as_materialized_series().f64()?;
    let measure_per = full_report
        .column(kind.percent_col())?
        .as_materialized_series()
        .f64()?;

    let mut labels = vec!["C"; full_report.height()];
    let mut last_b: Option<usize> = None;
    for (i, v) in sku_per.into_iter().enumerate() {
        if v.is_some_and(|v| v <= thresholds.b_boundary()) {
            labels[i] = "B";
            last_b = Some(i);
        }
    }
    let mut last_a: Option<usize> = None;
    for (i, v) in sku_per.into_iter().enumerate() {
        if v.is_some_and(|v| v <= thresholds.a_boundary()) {
            labels[i] = "A";
            last_a = Some(i);
        }
    }

    let last_a = last_a.ok_or(ProfileError::EmptyClass)?;
    // t1 <= t2, so the B mask covers at least every A row.
    let last_b = last_b.unwrap_or(last_a);

    let a_uom = measure_per.get(last_a).unwrap_or(0.0);
    let b_uom = measure_per.get(last_b).unwrap_or(0.0) - a_uom;
    let c_uom = 100.0 - (a_uom + b_uom);

    let metrics = AbcMetrics {
        a_sku: thresholds.a_boundary(),
        a_uom: round2(a_uom),
        b_sku: thresholds.b_boundary() - thresholds.a_boundary(),
        b_uom: round2(b_uom),
        c_sku: 100.0 - thresholds.b_boundary(),
        c_uom: round2(c_uom),
    };

    let mut classified = full_report.clone();
    classified.with_column(Series::new(abc::ABC_COL.into(), labels))?;
    Ok((classified, metrics))
}

/// Classify a stored full report in place and record its metrics.
///
/// `report_key` must name one of the two full-report tables; anything else
/// fails with [`ProfileError::UnknownReportType`]. On success the classified
/// table replaces the stored one and the metrics overwrite the prior pair for
/// that report family.
pub fn abc_class_on_report(
    ctx: &mut SessionContext,
    report_key: &str,
    thresholds: &AbcThresholds,
) -> Result<AbcMetrics, ProfileError> {
    let kind = ReportKind::from_report_key(report_key)?;
    let report = ctx
        .report(report_key)
        .ok_or_else(|| ProfileError::Validation(format!("report '{report_key}' not generated yet")))?;

    let (classified, metrics) = classify(report, kind, thresholds)?;

    tracing::debug!(
        session = %ctx.id(),
        report = report_key,
        a_uom = metrics.a_uom,
        b_uom = metrics.b_uom,
        c_uom = metrics.c_uom,
        "classified report"
    );
    ctx.save_report(report_key, classified);
    ctx.save_metrics(kind.metrics_key(), metrics);
    Ok(metrics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::df;

    fn full_report() -> DataFrame {
        df!(
            "SKU_ID" => ["S1", "S2", "S3", "S4", "S5"],
            abc::SKU_PER => [20.0, 40.0, 60.0, 80.0, 100.0],
            abc::ORDERLINES_PER => [50.0, 70.0, 85.0, 95.0, 100.0],
        )
        .unwrap()
    }

    fn labels(df: &DataFrame) -> Vec<String> {
        df.column(abc::ABC_COL)
            .unwrap()
            .as_materialized_series()
            .str()
            .unwrap()
            .into_iter()
            .map(|v| v.unwrap().to_string())
            .collect()
    }

    #[test]
    fn thresholds_are_validated() {
        assert!(AbcThresholds::new(20.0, 55.0).is_ok());
        assert!(AbcThresholds::new(55.0, 20.0).is_err());
        assert!(AbcThresholds::new(-1.0, 50.0).is_err());
        assert!(AbcThresholds::new(20.0, 101.0).is_err());
    }

    #[test]
    fn boundary_rows_take_the_tightest_class() {
        let thresholds = AbcThresholds::new(40.0, 80.0).unwrap();
        let (classified, metrics) =
            classify(&full_report(), ReportKind::Orderlines, &thresholds).unwrap();

        assert_eq!(labels(&classified), ["A", "A", "B", "B", "C"]);
        assert_eq!(metrics.a_uom, 70.0);
        assert_eq!(metrics.b_uom, 25.0);
        assert_eq!(metrics.c_uom, 5.0);
        assert_eq!(metrics.a_sku + metrics.b_sku + metrics.c_sku, 100.0);
    }

    #[test]
    fn everything_is_a_class_when_both_thresholds_are_one_hundred() {
        let thresholds = AbcThresholds::new(100.0, 100.0).unwrap();
        let (classified, metrics) =
            classify(&full_report(), ReportKind::Orderlines, &thresholds).unwrap();

        assert!(labels(&classified).iter().all(|l| l == "A"));
        assert_eq!(metrics.a_uom, 100.0);
        assert_eq!(metrics.b_uom, 0.0);
        assert_eq!(metrics.c_uom, 0.0);
    }

    #[test]
    fn zero_a_threshold_raises_empty_class() {
        let thresholds = AbcThresholds::new(0.0, 50.0).unwrap();
        assert!(matches!(
            classify(&full_report(), ReportKind::Orderlines, &thresholds),
            Err(ProfileError::EmptyClass)
        ));
    }

    #[test]
    fn volume_shares_sum_to_one_hundred() {
        let thresholds = AbcThresholds::new(20.0, 60.0).unwrap();
        let (_, metrics) =
            classify(&full_report(), ReportKind::Orderlines, &thresholds).unwrap();
        assert!((metrics.a_uom + metrics.b_uom + metrics.c_uom - 100.0).abs() < 0.01);
    }

    #[test]
    fn classifying_a_stored_report_overwrites_it() {
        let mut ctx = SessionContext::new();
        ctx.save_report(crate::schema::report_key::FULL_REPORT_ORDERLINES, full_report());

        let thresholds = AbcThresholds::new(40.0, 80.0).unwrap();
        let metrics = abc_class_on_report(
            &mut ctx,
            crate::schema::report_key::FULL_REPORT_ORDERLINES,
            &thresholds,
        )
        .unwrap();
        assert_eq!(metrics.a_uom, 70.0);

        let stored = ctx
            .report(crate::schema::report_key::FULL_REPORT_ORDERLINES)
            .unwrap();
        assert!(stored.column(abc::ABC_COL).is_ok());
        assert_eq!(
            ctx.metrics(crate::schema::metrics_key::ORDERLINE_METRICS),
            Some(&metrics)
        );
    }

    #[test]
    fn unknown_report_key_is_rejected() {
        let mut ctx = SessionContext::new();
        let thresholds = AbcThresholds::new(20.0, 55.0).unwrap();
        assert!(matches!(
            abc_class_on_report(&mut ctx, "weird_report", &thresholds),
            Err(ProfileError::UnknownReportType(_))
        ));
    }
}
