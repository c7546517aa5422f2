use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};

use crate::{
    analysis::AnalysisResults,
    entities::{MonitorChanges, NewMonitor},
};

pub const MAX_NAME_LEN: usize = 100;
pub const MAX_URL_LEN: usize = 255;
pub const MAX_ANALYSIS_TYPE_LEN: usize = 50;

pub const DEFAULT_RUNS_LIMIT: i64 = 20;
pub const MAX_RUNS_LIMIT: i64 = 100;

const MISSING_FIELDS: &str =
    "Missing required monitor data (name, data_source_url, analysis_type)";

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateMonitorRequest {
    pub name: Option<String>,
    pub data_source_url: Option<String>,
    pub analysis_type: Option<String>,
}

impl CreateMonitorRequest {
    pub fn validate(self) -> Result<NewMonitor, String> {
        let (Some(name), Some(data_source_url), Some(analysis_type)) =
            (self.name, self.data_source_url, self.analysis_type)
        else {
            return Err(MISSING_FIELDS.to_string());
        };
        if name.is_empty() || data_source_url.is_empty() || analysis_type.is_empty() {
            return Err(MISSING_FIELDS.to_string());
        }

        check_len("name", &name, MAX_NAME_LEN)?;
        check_len("data_source_url", &data_source_url, MAX_URL_LEN)?;
        check_len("analysis_type", &analysis_type, MAX_ANALYSIS_TYPE_LEN)?;

        Ok(NewMonitor {
            name,
            data_source_url,
            analysis_type,
        })
    }
}

/// Partial update. Fields are loosely typed so that wrong types get a
/// field-specific message instead of a generic body rejection. An absent key
/// is `None`; a key sent as `null` is `Some(Value::Null)` and gets rejected.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateMonitorRequest {
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<String>)]
    pub name: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<String>)]
    pub data_source_url: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<String>)]
    pub analysis_type: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<bool>)]
    pub is_active: Option<Value>,
}

// Only runs when the key is in the body, so `null` survives as a value.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl UpdateMonitorRequest {
    pub fn validate(self) -> Result<MonitorChanges, String> {
        let is_active = match self.is_active {
            None => None,
            Some(Value::Bool(flag)) => Some(flag),
            Some(_) => return Err("is_active must be a boolean value".to_string()),
        };

        let changes = MonitorChanges {
            name: string_field("name", self.name, MAX_NAME_LEN)?,
            data_source_url: string_field("data_source_url", self.data_source_url, MAX_URL_LEN)?,
            analysis_type: string_field(
                "analysis_type",
                self.analysis_type,
                MAX_ANALYSIS_TYPE_LEN,
            )?,
            is_active,
        };

        if changes.is_empty() {
            return Err("No update data provided".to_string());
        }
        Ok(changes)
    }
}

fn string_field(field: &str, value: Option<Value>, max: usize) -> Result<Option<String>, String> {
    match value {
        None => Ok(None),
        Some(Value::String(s)) if !s.is_empty() => {
            check_len(field, &s, max)?;
            Ok(Some(s))
        }
        Some(_) => Err(format!("{field} must be a non-empty string")),
    }
}

fn check_len(field: &str, value: &str, max: usize) -> Result<(), String> {
    if value.chars().count() > max {
        return Err(format!("{field} must be at most {max} characters"));
    }
    Ok(())
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct TriggerRequest {
    pub monitor_id: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TriggerResponse {
    pub message: String,
    pub monitor_id: i64,
    pub ran_at: DateTime<Utc>,
    pub analysis_results: AnalysisResults,
}

/// Body of a failed trigger run.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TriggerFailure {
    pub error: String,
    /// Stable failure code, e.g. `fetch_error` or `no_data`.
    pub reason: String,
    /// Whether retrying later could succeed.
    pub retriable: bool,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RunsQuery {
    /// Number of runs to return, newest first (1-100, default 20).
    pub limit: Option<i64>,
}

impl RunsQuery {
    pub fn effective_limit(&self) -> i64 {
        self.limit
            .unwrap_or(DEFAULT_RUNS_LIMIT)
            .clamp(1, MAX_RUNS_LIMIT)
    }
}
