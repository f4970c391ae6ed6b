//! Core report-generation pipeline for outbound warehouse analytics.
//!
//! Takes one in-memory table of order/shipment transactions and turns it into
//! the descriptive reports a logistics dashboard renders: ABC classification
//! of SKUs by pick-line or quantity contribution, orderline-pattern
//! distributions, and daily/business-day volume profiles.
//!
//! The crate is a library invoked by a presentation layer; file parsing,
//! charting and page navigation live elsewhere. All tables are polars
//! [`DataFrame`](polars::prelude::DataFrame)s, all results land in an
//! explicit per-session [`SessionContext`].

mod aggregate;
mod classify;
mod error;
mod export;
mod mapping;
mod merge;
mod profile;
mod ranking;
mod report;
pub mod schema;
mod store;

pub use aggregate::{one_orderline_pivot, order_pivot, sku_pivot, time_pivot, Granularity};
pub use classify::{abc_class_on_report, classify, AbcMetrics, AbcThresholds};
pub use error::ProfileError;
pub use export::to_delimited;
pub use mapping::ColumnMapping;
pub use merge::full_report;
pub use profile::{add_dt_info, dataset_stats, percentile_table, DatasetStats};
pub use ranking::{general_report, rank_report, PatternGroupBy, ReportKind};
pub use report::{generate_abc_reports, generate_pattern_reports, generate_profile_reports};
pub use store::SessionContext;
