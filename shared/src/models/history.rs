//! Calculation history models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::CalculationRecord;
use crate::types::CalculatorType;

/// Identity of a history entry
///
/// Remote ids are issued by the server; local ids only exist for entries that
/// never reached it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(tag = "origin", content = "value", rename_all = "snake_case")]
pub enum HistoryId {
    Remote(String),
    Local(Uuid),
}

impl HistoryId {
    pub fn is_remote(&self) -> bool {
        matches!(self, HistoryId::Remote(_))
    }

    /// Parse `remote:<id>` or `local:<uuid>`; a bare value is taken as remote
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }
        match s.split_once(':') {
            Some(("local", rest)) => Uuid::parse_str(rest).ok().map(HistoryId::Local),
            Some(("remote", rest)) if !rest.is_empty() => Some(HistoryId::Remote(rest.to_string())),
            Some(("remote", _)) => None,
            _ => Some(HistoryId::Remote(s.to_string())),
        }
    }
}

impl std::fmt::Display for HistoryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HistoryId::Remote(id) => write!(f, "remote:{}", id),
            HistoryId::Local(id) => write!(f, "local:{}", id),
        }
    }
}

/// Whether an entry is known to the remote store
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
    Synced,
    Unsynced,
}

/// One row of a user's calculation history
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryEntry {
    pub id: HistoryId,
    #[serde(flatten)]
    pub record: CalculationRecord,
    pub created_at: DateTime<Utc>,
    pub sync: SyncStatus,
}

impl HistoryEntry {
    pub fn calculator_type(&self) -> CalculatorType {
        self.record.calculator_type()
    }
}
