//! History entry models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Saved concept explanation owned by a user
#[derive(Debug, Clone, FromRow)]
pub struct HistoryEntry {
    pub id: i64,
    pub user_id: i64,
    pub concept: String,
    pub explanation: String,
    pub created_at: DateTime<Utc>,
}

/// Request for saving a history entry
#[derive(Debug, Clone, Deserialize)]
pub struct SaveHistoryRequest {
    pub concept: String,
    pub explanation: String,
}

/// Query parameters for history listing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryQuery {
    /// Number of entries per page
    pub limit: Option<i64>,
    /// Number of entries to skip
    pub offset: Option<i64>,
}

/// History entry as returned to its owner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntryResponse {
    pub id: i64,
    pub concept: String,
    pub explanation: String,
    pub created_at: DateTime<Utc>,
}

impl From<HistoryEntry> for HistoryEntryResponse {
    fn from(entry: HistoryEntry) -> Self {
        Self {
            id: entry.id,
            concept: entry.concept,
            explanation: entry.explanation,
            created_at: entry.created_at,
        }
    }
}

/// Response for history listing with pagination
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryListResponse {
    pub entries: Vec<HistoryEntryResponse>,
    pub total: i64,
}
