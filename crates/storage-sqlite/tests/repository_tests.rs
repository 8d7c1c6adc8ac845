//! Repository tests over a real SQLite file: partial-update merge
//! semantics, transactional history replace, metric write-back, and
//! the sync audit trail.

use chrono::NaiveDate;
use tempfile::TempDir;

use fundsync_core::funds::{Fund, FundDraft, FundStatus, FundStore};
use fundsync_core::history::{NavHistoryPoint, NavHistoryStore};
use fundsync_core::metrics::RiskMetrics;
use fundsync_core::sync::{SyncLogEntry, SyncLogStore, SyncReport};
use fundsync_storage_sqlite::funds::FundRepository;
use fundsync_storage_sqlite::history::NavHistoryRepository;
use fundsync_storage_sqlite::sync_logs::SyncLogRepository;
use fundsync_storage_sqlite::{init, DbPool};

fn test_pool() -> (TempDir, DbPool) {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("fundsync.db");
    let pool = init(db_path.to_str().unwrap()).unwrap();
    (dir, pool)
}

fn draft(name: &str) -> FundDraft {
    FundDraft {
        record_id: "rec001".to_string(),
        name: name.to_string(),
        strategy: Some("中性".to_string()),
        manager: Some("张鹏".to_string()),
        status: Some(FundStatus::Normal),
        latest_nav_date: NaiveDate::from_ymd_opt(2025, 11, 14),
        weekly_return: Some(0.5),
        cost: Some(1_000_000.0),
        source_table: "main".to_string(),
        ..Default::default()
    }
}

fn point(name: &str, date: (i32, u32, u32), nav: f64) -> NavHistoryPoint {
    NavHistoryPoint {
        fund_name: name.to_string(),
        nav_date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
        unit_nav: nav,
        cumulative_nav: nav,
        daily_return: 0.0,
        total_assets: 0.0,
        market_value: 0.0,
        cost: 0.0,
        position_change: 0.0,
        daily_pnl: 0.0,
    }
}

// ================================================================
// Fund repository
// ================================================================

#[tokio::test]
async fn insert_then_find_round_trips() {
    let (_dir, pool) = test_pool();
    let repo = FundRepository::new(pool);

    let fund = draft("示例基金一号").into_new_fund();
    repo.insert(&fund).await.unwrap();

    let found = repo.find_by_name("示例基金一号").unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, fund.id);
    assert_eq!(found[0].strategy.as_deref(), Some("中性"));
    assert_eq!(found[0].latest_nav_date, fund.latest_nav_date);
    assert_eq!(found[0].weekly_return, 0.5);
    assert_eq!(found[0].status, FundStatus::Normal);

    assert!(repo.find_by_name("不存在").unwrap().is_empty());
}

#[tokio::test]
async fn partial_update_leaves_unset_fields_alone() {
    let (_dir, pool) = test_pool();
    let repo = FundRepository::new(pool);

    let fund = draft("示例基金一号").into_new_fund();
    repo.insert(&fund).await.unwrap();

    // Update carries only a new weekly return; everything else unset.
    let update = FundDraft {
        record_id: "rec001".to_string(),
        name: "示例基金一号".to_string(),
        weekly_return: Some(2.5),
        source_table: "main".to_string(),
        ..Default::default()
    };
    repo.update(&fund.id, &update).await.unwrap();

    let stored = &repo.find_by_name("示例基金一号").unwrap()[0];
    assert_eq!(stored.weekly_return, 2.5);
    // Previously written values survive the partial update.
    assert_eq!(stored.strategy.as_deref(), Some("中性"));
    assert_eq!(stored.manager.as_deref(), Some("张鹏"));
    assert_eq!(stored.cost, 1_000_000.0);
    assert_eq!(stored.id, fund.id);
    assert!(stored.updated_at >= fund.updated_at);
}

#[tokio::test]
async fn metrics_write_back_touches_every_row_with_the_name() {
    let (_dir, pool) = test_pool();
    let repo = FundRepository::new(pool);

    repo.insert(&draft("示例基金一号").into_new_fund()).await.unwrap();
    repo.insert(&draft("示例基金二号").into_new_fund()).await.unwrap();

    let metrics = RiskMetrics {
        max_drawdown: 0.12,
        volatility: 0.08,
        sharpe_ratio: 1.1,
        annualized_return: 0.108,
    };
    let touched = repo.update_metrics("示例基金一号", &metrics).await.unwrap();
    assert_eq!(touched, 1);

    let updated = &repo.find_by_name("示例基金一号").unwrap()[0];
    assert_eq!(updated.max_drawdown, 0.12);
    assert_eq!(updated.sharpe_ratio, 1.1);

    // The other fund keeps its zeros.
    let other = &repo.find_by_name("示例基金二号").unwrap()[0];
    assert_eq!(other.max_drawdown, 0.0);

    assert_eq!(repo.update_metrics("不存在", &metrics).await.unwrap(), 0);
}

#[tokio::test]
async fn list_all_returns_every_entry() {
    let (_dir, pool) = test_pool();
    let repo = FundRepository::new(pool);

    repo.insert(&draft("甲").into_new_fund()).await.unwrap();
    repo.insert(&draft("乙").into_new_fund()).await.unwrap();

    assert_eq!(repo.list_all().unwrap().len(), 2);
}

// ================================================================
// NAV history repository
// ================================================================

#[tokio::test]
async fn replace_all_swaps_the_whole_series() {
    let (_dir, pool) = test_pool();
    let repo = NavHistoryRepository::new(pool);

    let first = vec![
        point("甲基金", (2025, 11, 7), 1.00),
        point("甲基金", (2025, 11, 14), 1.02),
        point("乙基金", (2025, 11, 14), 0.98),
    ];
    assert_eq!(repo.replace_all(&first).await.unwrap(), 3);
    assert_eq!(
        repo.distinct_fund_names().unwrap(),
        vec!["乙基金", "甲基金"]
    );

    // Second extract drops one fund entirely.
    let second = vec![point("甲基金", (2025, 11, 21), 1.05)];
    assert_eq!(repo.replace_all(&second).await.unwrap(), 1);
    assert_eq!(repo.distinct_fund_names().unwrap(), vec!["甲基金"]);
    assert!(repo.series_for("乙基金").unwrap().is_empty());
}

#[tokio::test]
async fn series_is_date_ordered() {
    let (_dir, pool) = test_pool();
    let repo = NavHistoryRepository::new(pool);

    let points = vec![
        point("甲基金", (2025, 11, 21), 1.05),
        point("甲基金", (2025, 11, 7), 1.00),
        point("甲基金", (2025, 11, 14), 1.02),
    ];
    repo.replace_all(&points).await.unwrap();

    let series = repo.series_for("甲基金").unwrap();
    assert_eq!(
        series,
        vec![
            (NaiveDate::from_ymd_opt(2025, 11, 7).unwrap(), 1.00),
            (NaiveDate::from_ymd_opt(2025, 11, 14).unwrap(), 1.02),
            (NaiveDate::from_ymd_opt(2025, 11, 21).unwrap(), 1.05),
        ]
    );
}

#[tokio::test]
async fn duplicate_observations_keep_the_last_row() {
    let (_dir, pool) = test_pool();
    let repo = NavHistoryRepository::new(pool);

    let mut duplicated = point("甲基金", (2025, 11, 14), 1.02);
    duplicated.cumulative_nav = 1.02;
    let mut corrected = point("甲基金", (2025, 11, 14), 1.03);
    corrected.cumulative_nav = 1.03;

    repo.replace_all(&[duplicated, corrected]).await.unwrap();

    let series = repo.series_for("甲基金").unwrap();
    assert_eq!(series.len(), 1);
    assert_eq!(series[0].1, 1.03);
}

#[tokio::test]
async fn points_for_round_trips_all_columns() {
    let (_dir, pool) = test_pool();
    let repo = NavHistoryRepository::new(pool);

    let mut observation = point("甲基金", (2025, 11, 14), 1.02);
    observation.total_assets = 12_000_000.0;
    observation.daily_pnl = 30_000.0;
    repo.replace_all(std::slice::from_ref(&observation)).await.unwrap();

    let stored = repo.points_for("甲基金").unwrap();
    assert_eq!(stored, vec![observation]);
}

// ================================================================
// Sync log repository
// ================================================================

#[tokio::test]
async fn sync_log_appends_and_lists_newest_first() {
    let (_dir, pool) = test_pool();
    let repo = SyncLogRepository::new(pool);

    let mut report = SyncReport {
        success: true,
        records_processed: 10,
        records_inserted: 3,
        records_updated: 7,
        ..Default::default()
    };
    let earlier = SyncLogEntry::from_report(
        &report,
        chrono::Utc::now() - chrono::Duration::minutes(10),
        1200,
    );
    report.success = false;
    report.errors.push("table tblPnl: fetch failed".to_string());
    let later = SyncLogEntry::from_report(&report, chrono::Utc::now(), 900);

    repo.append(&earlier).await.unwrap();
    repo.append(&later).await.unwrap();

    let recent = repo.recent(10).unwrap();
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].id, later.id);
    assert!(!recent[0].success);
    assert_eq!(
        recent[0].error_message.as_deref(),
        Some("table tblPnl: fetch failed")
    );
    assert!(recent[1].success);
    assert_eq!(recent[1].records_inserted, 3);

    assert_eq!(repo.recent(1).unwrap().len(), 1);
}
