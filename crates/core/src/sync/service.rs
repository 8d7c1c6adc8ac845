use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use log::{debug, error, info, warn};

use fundsync_bitable::{BitableRecord, BitableSource};

use super::report::{SyncLogEntry, SyncLogStore, SyncReport};
use crate::errors::Result;
use crate::funds::{convert_record, FundStore, Reconciler, UpsertOutcome};
use crate::history::{build_history, NavHistoryStore};
use crate::mapping::{SyncConfig, TableConfig, TableKind};
use crate::metrics::{calculate_risk_metrics, RiskConfig};
use crate::options::OptionResolver;

/// Orchestrates one full sync run across the configured tables.
pub struct SyncService {
    source: Arc<dyn BitableSource>,
    funds: Arc<dyn FundStore>,
    history: Arc<dyn NavHistoryStore>,
    sync_logs: Option<Arc<dyn SyncLogStore>>,
    risk_config: RiskConfig,
}

impl SyncService {
    pub fn new(
        source: Arc<dyn BitableSource>,
        funds: Arc<dyn FundStore>,
        history: Arc<dyn NavHistoryStore>,
    ) -> Self {
        Self {
            source,
            funds,
            history,
            sync_logs: None,
            risk_config: RiskConfig::default(),
        }
    }

    /// Enables the persisted audit trail.
    pub fn with_sync_logs(mut self, sync_logs: Arc<dyn SyncLogStore>) -> Self {
        self.sync_logs = Some(sync_logs);
        self
    }

    pub fn with_risk_config(mut self, risk_config: RiskConfig) -> Self {
        self.risk_config = risk_config;
        self
    }

    /// Runs one sync. Returns `Err` only for an invalid configuration;
    /// every operational failure is collected in the report instead,
    /// so one broken table or record never hides the work that did
    /// succeed.
    pub async fn sync_all(&self, config: &SyncConfig) -> Result<SyncReport> {
        config.validate()?;

        let started = Instant::now();
        let ran_at = Utc::now();
        let mut report = SyncReport::default();

        info!("Starting sync of {} tables", config.tables.len());

        if let Err(e) = self.source.ensure_credential().await {
            error!("Credential check failed, aborting sync: {}", e);
            report.error(format!("authentication failed: {}", e));
            self.write_log(&report, ran_at, started.elapsed().as_millis() as i64)
                .await;
            return Ok(report);
        }

        for table in &config.tables {
            self.sync_table(config, table, &mut report).await;
        }

        report.success = report.errors.is_empty();
        info!(
            "Sync finished: {} processed, {} inserted, {} updated, {} errors, {} warnings",
            report.records_processed,
            report.records_inserted,
            report.records_updated,
            report.errors.len(),
            report.warnings.len()
        );

        self.write_log(&report, ran_at, started.elapsed().as_millis() as i64)
            .await;
        Ok(report)
    }

    async fn sync_table(&self, config: &SyncConfig, table: &TableConfig, report: &mut SyncReport) {
        debug!("Syncing table {} ({:?})", table.table_id, table.kind);

        let records = match self.source.list_records(&config.app_token, &table.table_id).await {
            Ok(records) => records,
            Err(e) => {
                error!("Failed to fetch table {}: {}", table.table_id, e);
                report.error(format!("table {}: fetch failed: {}", table.table_id, e));
                return;
            }
        };

        if records.is_empty() {
            warn!("Table {} returned no records", table.table_id);
            report.warning(format!("table {} is empty", table.table_id));
            return;
        }

        // The field schema feeds option-code resolution. Losing it is
        // survivable: the static fallback table still applies.
        let resolver = match self.source.list_fields(&config.app_token, &table.table_id).await {
            Ok(fields) => OptionResolver::from_fields(&fields),
            Err(e) => {
                warn!("Failed to fetch field schema for {}: {}", table.table_id, e);
                report.warning(format!(
                    "table {}: field schema unavailable, using static option labels",
                    table.table_id
                ));
                OptionResolver::default()
            }
        };

        // The primary table doubles as the NAV history extract; the
        // stored series is replaced before the registry pass so the
        // metric recompute below sees fresh data.
        if table.kind == TableKind::Primary {
            self.refresh_history(&records, report).await;
        }

        let reconciler = Reconciler::new(self.funds.as_ref());
        for record in &records {
            report.records_processed += 1;

            let draft = match convert_record(record, table, &resolver) {
                Ok(draft) => draft,
                Err(e) => {
                    warn!("Skipping record {} in {}: {}", record.record_id, table.table_id, e);
                    report.warning(format!(
                        "table {}: record {} skipped: {}",
                        table.table_id, record.record_id, e
                    ));
                    continue;
                }
            };

            match reconciler.upsert(draft).await {
                Ok(UpsertOutcome::Inserted) => report.records_inserted += 1,
                Ok(UpsertOutcome::Updated) => report.records_updated += 1,
                Err(e) => {
                    error!("Upsert failed for record {}: {}", record.record_id, e);
                    report.error(format!(
                        "table {}: record {}: {}",
                        table.table_id, record.record_id, e
                    ));
                }
            }
        }

        if table.kind == TableKind::Primary {
            self.recompute_metrics(report).await;
        }
    }

    async fn refresh_history(&self, records: &[BitableRecord], report: &mut SyncReport) {
        let points = build_history(records);
        if points.is_empty() {
            report.warning("primary table produced no history points".to_string());
            return;
        }
        match self.history.replace_all(&points).await {
            Ok(written) => debug!("Replaced NAV history with {} rows", written),
            Err(e) => {
                error!("NAV history replace failed: {}", e);
                report.error(format!("history replace failed: {}", e));
            }
        }
    }

    /// Recomputes risk metrics for every fund with stored history and
    /// writes them back onto the registry rows.
    async fn recompute_metrics(&self, report: &mut SyncReport) {
        let names = match self.history.distinct_fund_names() {
            Ok(names) => names,
            Err(e) => {
                report.error(format!("metrics: listing funds failed: {}", e));
                return;
            }
        };

        for name in names {
            let series = match self.history.series_for(&name) {
                Ok(series) => series,
                Err(e) => {
                    report.error(format!("metrics: loading series for '{}' failed: {}", name, e));
                    continue;
                }
            };

            let metrics = calculate_risk_metrics(&series, &self.risk_config);
            match self.funds.update_metrics(&name, &metrics).await {
                Ok(0) => debug!("No registry entry for '{}', metrics not written", name),
                Ok(_) => {}
                Err(e) => {
                    report.error(format!("metrics: writing '{}' failed: {}", name, e));
                }
            }
        }
    }

    async fn write_log(&self, report: &SyncReport, ran_at: chrono::DateTime<Utc>, duration_ms: i64) {
        let Some(sync_logs) = &self.sync_logs else {
            return;
        };
        let entry = SyncLogEntry::from_report(report, ran_at, duration_ms);
        if let Err(e) = sync_logs.append(&entry).await {
            warn!("Failed to persist sync log entry: {}", e);
        }
    }
}
