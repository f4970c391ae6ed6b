use polars::prelude::*;

use crate::error::ProfileError;
use crate::schema::canonical;

/// Maps the three canonical column roles onto the actual column names of the
/// uploaded table. Built once per report run from the user's selection and
/// threaded through every pivot.
///
/// The timestamp role is optional; it is only required by the time-bucketed
/// profile reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMapping {
    order: String,
    sku: String,
    qty: String,
    timestamp: Option<String>,
}

impl ColumnMapping {
    pub fn new(
        order: impl Into<String>,
        sku: impl Into<String>,
        qty: impl Into<String>,
    ) -> Self {
        Self {
            order: order.into(),
            sku: sku.into(),
            qty: qty.into(),
            timestamp: None,
        }
    }

    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    pub fn order(&self) -> &str {
        &self.order
    }

    pub fn sku(&self) -> &str {
        &self.sku
    }

    pub fn qty(&self) -> &str {
        &self.qty
    }

    pub fn timestamp(&self) -> Option<&str> {
        self.timestamp.as_deref()
    }

    /// Check that every mapped column exists in the source table.
    ///
    /// Runs eagerly before any aggregation so a misconfigured mapping aborts
    /// the whole pipeline invocation with no partial state written.
    pub fn validate(&self, df: &DataFrame) -> Result<(), ProfileError> {
        let mut required = vec![self.order.as_str(), self.sku.as_str(), self.qty.as_str()];
        if let Some(ts) = self.timestamp.as_deref() {
            required.push(ts);
        }
        for name in required {
            if df.column(name).is_err() {
                return Err(ProfileError::MissingColumn(name.to_string()));
            }
        }
        Ok(())
    }

    /// Inverted mapping: actual column name -> canonical role name.
    /// Used to rename pivot output to the canonical schema.
    pub fn renaming(&self) -> Vec<(&str, &'static str)> {
        vec![
            (self.order.as_str(), canonical::ORDER_ID),
            (self.sku.as_str(), canonical::SKU_ID),
            (self.qty.as_str(), canonical::QTY),
        ]
    }
}
