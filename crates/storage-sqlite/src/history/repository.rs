use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::prelude::*;

use super::model::{parse_date, NavHistoryDB};
use crate::db::{get_connection, DbPool};
use crate::errors::IntoCore;
use crate::schema::nav_history::dsl as nav_history_dsl;
use fundsync_core::history::{NavHistoryPoint, NavHistoryStore};
use fundsync_core::Result;

pub struct NavHistoryRepository {
    pool: DbPool,
}

impl NavHistoryRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Full stored series for one fund, date-ordered. Serves the read
    /// API; the sync path only needs the (date, cumulative NAV) pairs.
    pub fn points_for(&self, fund_name: &str) -> Result<Vec<NavHistoryPoint>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = nav_history_dsl::nav_history
            .filter(nav_history_dsl::fund_name.eq(fund_name))
            .order(nav_history_dsl::nav_date.asc())
            .load::<NavHistoryDB>(&mut conn)
            .into_core()?;
        rows.into_iter().map(NavHistoryPoint::try_from).collect()
    }
}

#[async_trait]
impl NavHistoryStore for NavHistoryRepository {
    async fn replace_all(&self, points: &[NavHistoryPoint]) -> Result<usize> {
        let rows: Vec<NavHistoryDB> = points.iter().map(NavHistoryDB::from).collect();

        let mut conn = get_connection(&self.pool)?;
        // Immediate transaction takes the write lock up front so
        // readers never observe the window between delete and insert.
        conn.immediate_transaction(|conn| -> QueryResult<usize> {
            diesel::delete(nav_history_dsl::nav_history).execute(conn)?;

            let mut written = 0;
            for chunk in rows.chunks(500) {
                // replace_into tolerates duplicate (fund_name, nav_date)
                // pairs inside one extract; last row wins.
                written += diesel::replace_into(nav_history_dsl::nav_history)
                    .values(chunk)
                    .execute(conn)?;
            }
            Ok(written)
        })
        .into_core()
    }

    fn distinct_fund_names(&self) -> Result<Vec<String>> {
        let mut conn = get_connection(&self.pool)?;
        nav_history_dsl::nav_history
            .select(nav_history_dsl::fund_name)
            .distinct()
            .order(nav_history_dsl::fund_name.asc())
            .load::<String>(&mut conn)
            .into_core()
    }

    fn series_for(&self, fund_name: &str) -> Result<Vec<(NaiveDate, f64)>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = nav_history_dsl::nav_history
            .filter(nav_history_dsl::fund_name.eq(fund_name))
            .select((nav_history_dsl::nav_date, nav_history_dsl::cumulative_nav))
            .order(nav_history_dsl::nav_date.asc())
            .load::<(String, f64)>(&mut conn)
            .into_core()?;

        rows.into_iter()
            .map(|(date, nav)| Ok((parse_date(&date)?, nav)))
            .collect()
    }
}
