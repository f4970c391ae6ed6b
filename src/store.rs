use std::collections::HashMap;

use polars::prelude::*;
use uuid::Uuid;

use crate::classify::AbcMetrics;
use crate::error::ProfileError;
use crate::export;
use crate::profile::DatasetStats;

struct StoredReport {
    table: DataFrame,
    generation: u64,
}

struct CachedExport {
    generation: u64,
    text: String,
}

/// Session-scoped store for generated report tables and metrics.
///
/// One context per user session, passed explicitly into every pipeline call;
/// nothing in the crate reaches for ambient state. Tables are replaced
/// wholesale on re-generation and live for the duration of the session.
pub struct SessionContext {
    id: Uuid,
    counter: u64,
    reports: HashMap<String, StoredReport>,
    metrics: HashMap<String, AbcMetrics>,
    stats: Option<DatasetStats>,
    export_cache: HashMap<String, CachedExport>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            counter: 0,
            reports: HashMap::new(),
            metrics: HashMap::new(),
            stats: None,
            export_cache: HashMap::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Store a report table under its symbolic name, replacing any prior one.
    pub fn save_report(&mut self, key: &str, table: DataFrame) {
        self.counter += 1;
        self.reports.insert(
            key.to_string(),
            StoredReport {
                table,
                generation: self.counter,
            },
        );
    }

    pub fn report(&self, key: &str) -> Option<&DataFrame> {
        self.reports.get(key).map(|r| &r.table)
    }

    pub fn save_metrics(&mut self, key: &str, metrics: AbcMetrics) {
        self.metrics.insert(key.to_string(), metrics);
    }

    pub fn metrics(&self, key: &str) -> Option<&AbcMetrics> {
        self.metrics.get(key)
    }

    pub fn save_stats(&mut self, stats: DatasetStats) {
        self.stats = Some(stats);
    }

    pub fn stats(&self) -> Option<&DatasetStats> {
        self.stats.as_ref()
    }

    /// Delimited-text export of a stored report, memoized per report
    /// generation so re-saving a table invalidates the cached text.
    pub fn export_delimited(&mut self, key: &str) -> Result<String, ProfileError> {
        let stored = self
            .reports
            .get(key)
            .ok_or_else(|| ProfileError::Validation(format!("report '{key}' not generated yet")))?;
        let generation = stored.generation;

        if let Some(cached) = self.export_cache.get(key) {
            if cached.generation == generation {
                return Ok(cached.text.clone());
            }
        }

        let text = export::to_delimited(&stored.table)?;
        self.export_cache.insert(
            key.to_string(),
            CachedExport {
                generation,
                text: text.clone(),
            },
        );
        Ok(text)
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::df;

    #[test]
    fn saving_replaces_prior_report() {
        let mut ctx = SessionContext::new();
        ctx.save_report("r", df!("a" => [1i64]).unwrap());
        ctx.save_report("r", df!("a" => [2i64]).unwrap());
        let stored = ctx.report("r").unwrap();
        assert_eq!(stored.column("a").unwrap().as_materialized_series().i64().unwrap().get(0), Some(2));
    }

    #[test]
    fn export_cache_does_not_serve_stale_content() {
        let mut ctx = SessionContext::new();
        ctx.save_report("r", df!("a" => [1i64]).unwrap());
        let first = ctx.export_delimited("r").unwrap();
        let again = ctx.export_delimited("r").unwrap();
        assert_eq!(first, again);

        ctx.save_report("r", df!("a" => [2i64]).unwrap());
        let refreshed = ctx.export_delimited("r").unwrap();
        assert_ne!(first, refreshed);
    }

    #[test]
    fn exporting_a_missing_report_fails() {
        let mut ctx = SessionContext::new();
        assert!(matches!(
            ctx.export_delimited("nope"),
            Err(ProfileError::Validation(_))
        ));
    }
}
