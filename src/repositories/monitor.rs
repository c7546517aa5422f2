use crate::entities::{Monitor, MonitorChanges, MonitorRun, NewMonitor, NewMonitorRun};
use crate::repositories::error::{PersistenceError, Result};
use async_trait::async_trait;
use sqlx::{Pool, Postgres};

const MONITOR_COLUMNS: &str =
    "id, user_id, name, data_source_url, analysis_type, creation_date, last_run, is_active";

/// Persistence for monitor configurations and their run history.
///
/// Everything except `get_by_id` and `record_run` is scoped to an owner: a
/// monitor that exists but belongs to somebody else is indistinguishable from
/// one that does not exist.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MonitorRepositoryTrait: Send + Sync {
    async fn create(&self, owner_id: i64, monitor: &NewMonitor) -> Result<Monitor>;

    /// Unscoped lookup, used only by the trigger endpoint.
    async fn get_by_id(&self, id: i64) -> Result<Option<Monitor>>;

    async fn get_owned(&self, id: i64, owner_id: i64) -> Result<Option<Monitor>>;

    async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<Monitor>>;

    async fn update(
        &self,
        id: i64,
        owner_id: i64,
        changes: &MonitorChanges,
    ) -> Result<Option<Monitor>>;

    async fn delete(&self, id: i64, owner_id: i64) -> Result<bool>;

    /// Store a successful run and stamp the monitor's `last_run`.
    async fn record_run(&self, monitor_id: i64, run: &NewMonitorRun) -> Result<MonitorRun>;

    /// Newest first. `None` when the monitor is absent or not owned.
    async fn list_runs(
        &self,
        monitor_id: i64,
        owner_id: i64,
        limit: i64,
    ) -> Result<Option<Vec<MonitorRun>>>;
}

#[derive(Clone)]
pub struct MonitorRepository {
    pool: Pool<Postgres>,
}

impl MonitorRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MonitorRepositoryTrait for MonitorRepository {
    async fn create(&self, owner_id: i64, monitor: &NewMonitor) -> Result<Monitor> {
        let mut tx = self.pool.begin().await?;

        let created = sqlx::query_as::<_, Monitor>(&format!(
            r#"
            INSERT INTO monitors (user_id, name, data_source_url, analysis_type)
            VALUES ($1, $2, $3, $4)
            RETURNING {MONITOR_COLUMNS}
            "#
        ))
        .bind(owner_id)
        .bind(&monitor.name)
        .bind(&monitor.data_source_url)
        .bind(&monitor.analysis_type)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(created)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Monitor>> {
        let monitor = sqlx::query_as::<_, Monitor>(&format!(
            "SELECT {MONITOR_COLUMNS} FROM monitors WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(monitor)
    }

    async fn get_owned(&self, id: i64, owner_id: i64) -> Result<Option<Monitor>> {
        let monitor = sqlx::query_as::<_, Monitor>(&format!(
            "SELECT {MONITOR_COLUMNS} FROM monitors WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(monitor)
    }

    async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<Monitor>> {
        let monitors = sqlx::query_as::<_, Monitor>(&format!(
            "SELECT {MONITOR_COLUMNS} FROM monitors WHERE user_id = $1 ORDER BY id"
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(monitors)
    }

    async fn update(
        &self,
        id: i64,
        owner_id: i64,
        changes: &MonitorChanges,
    ) -> Result<Option<Monitor>> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query_as::<_, Monitor>(&format!(
            r#"
            UPDATE monitors
            SET name            = COALESCE($3, name),
                data_source_url = COALESCE($4, data_source_url),
                analysis_type   = COALESCE($5, analysis_type),
                is_active       = COALESCE($6, is_active)
            WHERE id = $1 AND user_id = $2
            RETURNING {MONITOR_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(owner_id)
        .bind(changes.name.as_deref())
        .bind(changes.data_source_url.as_deref())
        .bind(changes.analysis_type.as_deref())
        .bind(changes.is_active)
        .fetch_optional(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(updated)
    }

    async fn delete(&self, id: i64, owner_id: i64) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("DELETE FROM monitors WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    async fn record_run(&self, monitor_id: i64, run: &NewMonitorRun) -> Result<MonitorRun> {
        let mut tx = self.pool.begin().await?;

        let touched = sqlx::query("UPDATE monitors SET last_run = $2 WHERE id = $1")
            .bind(monitor_id)
            .bind(run.ran_at)
            .execute(&mut *tx)
            .await?;
        if touched.rows_affected() == 0 {
            // monitor deleted while it was being processed
            return Err(PersistenceError::NotFound);
        }

        let stored = sqlx::query_as::<_, MonitorRun>(
            r#"
            INSERT INTO monitor_runs (monitor_id, ran_at, results, lang, content_checksum)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, monitor_id, ran_at, results, lang, content_checksum
            "#,
        )
        .bind(monitor_id)
        .bind(run.ran_at)
        .bind(&run.results)
        .bind(run.lang.as_deref())
        .bind(&run.content_checksum)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(stored)
    }

    async fn list_runs(
        &self,
        monitor_id: i64,
        owner_id: i64,
        limit: i64,
    ) -> Result<Option<Vec<MonitorRun>>> {
        if self.get_owned(monitor_id, owner_id).await?.is_none() {
            return Ok(None);
        }

        let runs = sqlx::query_as::<_, MonitorRun>(
            r#"
            SELECT id, monitor_id, ran_at, results, lang, content_checksum
            FROM monitor_runs
            WHERE monitor_id = $1
            ORDER BY ran_at DESC, id DESC
            LIMIT $2
            "#,
        )
        .bind(monitor_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(runs))
    }
}
