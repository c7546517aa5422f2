use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

/// --- Tables ---

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub pw_hash: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, ToSchema)]
pub struct Monitor {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub data_source_url: String,
    pub analysis_type: String, // free-form; parsed into AnalysisKind at run time
    pub creation_date: DateTime<Utc>,
    pub last_run: Option<DateTime<Utc>>,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, ToSchema)]
pub struct MonitorRun {
    pub id: i64,
    pub monitor_id: i64,
    pub ran_at: DateTime<Utc>,
    #[schema(value_type = Object)]
    pub results: serde_json::Value,
    pub lang: Option<String>,
    pub content_checksum: String,
}

/// --- Inserts / updates ---

#[derive(Debug, Clone, PartialEq)]
pub struct NewMonitor {
    pub name: String,
    pub data_source_url: String,
    pub analysis_type: String,
}

/// Partial update; `None` leaves the column untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonitorChanges {
    pub name: Option<String>,
    pub data_source_url: Option<String>,
    pub analysis_type: Option<String>,
    pub is_active: Option<bool>,
}

impl MonitorChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.data_source_url.is_none()
            && self.analysis_type.is_none()
            && self.is_active.is_none()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewMonitorRun {
    pub ran_at: DateTime<Utc>,
    pub results: serde_json::Value,
    pub lang: Option<String>,
    pub content_checksum: String,
}
