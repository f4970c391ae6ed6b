//! Column-name and report-key constants for outbound-profiler.
//! Single source of truth - every pivot, join and lookup goes through these.

// ── Canonical columns ───────────────────────────────────────────────────────
pub mod canonical {
    pub const ORDER_ID: &str = "ORDER_ID";
    pub const SKU_ID: &str = "SKU_ID";
    pub const QTY: &str = "QTY";
    pub const N_OLS: &str = "N_OLS";
    pub const N_ORDERS: &str = "N_ORDERS";
}

// ── ABC report columns ──────────────────────────────────────────────────────
pub mod abc {
    pub const QTY_PICKED: &str = "QTY_PICKED";
    pub const ORDERLINES: &str = "OLs";
    pub const SKU_PER: &str = "SKU_%";
    pub const ORDERLINES_PER: &str = "OLs_%";
    pub const QTY_PER: &str = "QTY_PICKED_%";
    pub const ABC_COL: &str = "ABC_CLASS";
}

// ── Column-name suffixes ────────────────────────────────────────────────────
pub mod suffix {
    pub const CUMSUM: &str = "_CS";
    pub const PERCENT: &str = "_%";
}

// ── Time profile columns ────────────────────────────────────────────────────
pub mod profile {
    pub const BUCKET: &str = "DATE";
    pub const DAYS: &str = "DAYS";
    pub const MONTHS: &str = "MONTHS";
    pub const PERCENTILE: &str = "PERCENTILE";
}

// ── Report keys (session store) ─────────────────────────────────────────────
pub mod report_key {
    pub const FIRST_PIVOT: &str = "first_pt";
    pub const ORDERLINE_REPORT: &str = "orderline_report";
    pub const QTY_REPORT: &str = "qty_report";
    pub const FULL_REPORT_ORDERLINES: &str = "full_report_orderlines";
    pub const FULL_REPORT_QTY: &str = "full_report_qty";

    pub const ORDER_PIVOT: &str = "order_pt";
    pub const PATTERN_QTY_REPORT: &str = "pattern_qty_report";
    pub const PATTERN_OL_REPORT: &str = "pattern_ol_report";
    pub const ONE_ORDERLINE: &str = "one_orderline";

    pub const DAILY_REPORT: &str = "daily_report";
    pub const BUSINESS_DAILY_REPORT: &str = "business_report";
    pub const DAILY_PERCENTILE: &str = "daily_percentile";
    pub const BUSINESS_PERCENTILE: &str = "business_days_percentile";
}

// ── Metrics keys (session store) ────────────────────────────────────────────
pub mod metrics_key {
    pub const ORDERLINE_METRICS: &str = "orderline_metrics";
    pub const QTY_METRICS: &str = "qty_metrics";
}

// ── Report-type tags ────────────────────────────────────────────────────────
pub mod report_tag {
    pub const ORDERLINES: &str = "ORDERLINES";
    pub const QTY: &str = "QTY";
}
