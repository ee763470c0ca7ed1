//! Calculation history across the remote and local replicas
//!
//! Saves are dual writes: the remote first, then always the local rolling
//! window. Listings prefer the remote, reconciled with local records that
//! never reached it, and fall back to the local window when the remote is
//! unreachable. None of these operations fail the calculation itself.

use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;
use shared::{CalculationRecord, CalculatorType, HistoryEntry, HistoryId};
use uuid::Uuid;

use super::cache::{CacheKey, HistoryCache};
use super::fingerprint::fingerprint;
use super::local_store::{LocalHistory, LocalRecord};
use crate::error::AppError;
use crate::external::{CredentialProvider, RemoteHistory};

// ============================================================================
// Outcomes
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RemoteWrite {
    Saved { id: String },
    Failed { code: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LocalWrite {
    Appended { id: Uuid, evicted: usize },
    Failed { reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SaveStatus {
    /// Stored remotely
    Saved,
    /// Only on this device, shown as unsynced
    LocalOnly,
    /// Neither replica accepted the record
    Unsaved,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaveOutcome {
    pub remote: RemoteWrite,
    pub local: LocalWrite,
}

impl SaveOutcome {
    pub fn status(&self) -> SaveStatus {
        match (&self.remote, &self.local) {
            (RemoteWrite::Saved { .. }, _) => SaveStatus::Saved,
            (RemoteWrite::Failed { .. }, LocalWrite::Appended { .. }) => SaveStatus::LocalOnly,
            (RemoteWrite::Failed { .. }, LocalWrite::Failed { .. }) => SaveStatus::Unsaved,
        }
    }

    /// Soft warning to show next to the result
    pub fn warning(&self) -> Option<&'static str> {
        match self.status() {
            SaveStatus::Saved => None,
            SaveStatus::LocalOnly => {
                Some("Could not reach the server. This calculation was saved on this device only.")
            }
            SaveStatus::Unsaved => Some("This calculation could not be saved to history."),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RemoteDelete {
    Deleted,
    /// The entry only ever existed locally
    NotApplicable,
    Failed { code: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteOutcome {
    pub remote: RemoteDelete,
    /// Local records removed, or why local removal failed
    pub local_removed: Result<usize, String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingSource {
    Remote,
    Cache,
    LocalFallback,
    /// Both replicas failed; the listing is empty
    Unavailable,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryListing {
    pub entries: Vec<HistoryEntry>,
    pub source: ListingSource,
}

// ============================================================================
// Service
// ============================================================================

/// History service for saving, listing and deleting calculations
#[derive(Clone)]
pub struct HistoryService {
    remote: Arc<dyn RemoteHistory>,
    local: LocalHistory,
    cache: HistoryCache,
    credentials: Arc<dyn CredentialProvider>,
}

impl HistoryService {
    pub fn new(
        remote: Arc<dyn RemoteHistory>,
        local: LocalHistory,
        cache: HistoryCache,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Self {
        Self {
            remote,
            local,
            cache,
            credentials,
        }
    }

    pub fn cap(&self) -> usize {
        self.local.cap()
    }

    fn key(&self, calculator_type: CalculatorType) -> CacheKey {
        CacheKey::new(calculator_type, self.credentials.user_id())
    }

    /// Dual write; never fails, every failure is reported in the outcome
    pub async fn save(&self, record: &CalculationRecord) -> SaveOutcome {
        let calculator_type = record.calculator_type();

        let (remote, saved_at) = match self.remote.save(record).await {
            Ok(saved) => (RemoteWrite::Saved { id: saved.id }, saved.created_at),
            Err(err) => {
                tracing::warn!(
                    calculator_type = %calculator_type,
                    code = err.code(),
                    error = %err,
                    "Remote save failed, keeping the calculation locally"
                );
                let failed = RemoteWrite::Failed {
                    code: err.code().to_string(),
                    reason: err.to_string(),
                };
                (failed, None)
            }
        };

        let remote_id = match &remote {
            RemoteWrite::Saved { id } => Some(id.clone()),
            RemoteWrite::Failed { .. } => None,
        };
        let mut local_record = LocalRecord::new(record.clone(), remote_id);
        if let Some(at) = saved_at {
            local_record = local_record.with_timestamp(at);
        }
        let local = match self.local.append(local_record) {
            Ok(appended) => LocalWrite::Appended {
                id: appended.id,
                evicted: appended.evicted,
            },
            Err(err) => {
                tracing::error!(
                    calculator_type = %calculator_type,
                    error = %err,
                    "Local history write failed"
                );
                LocalWrite::Failed {
                    reason: err.to_string(),
                }
            }
        };

        self.cache.invalidate(&self.key(calculator_type)).await;

        let outcome = SaveOutcome { remote, local };
        tracing::info!(
            calculator_type = %calculator_type,
            status = ?outcome.status(),
            "Calculation saved"
        );
        outcome
    }

    /// Delete from the remote when remote-issued and remove at most one local
    /// record; the listing is invalidated whatever happens
    ///
    /// The local record is the one `id` names. A remote entry with no linked
    /// local record falls back to the newest unsynced record with the same
    /// content.
    pub async fn delete(&self, calculator_type: CalculatorType, id: &HistoryId) -> DeleteOutcome {
        let key = self.key(calculator_type);
        let target = match id {
            HistoryId::Remote(_) => self.listed_content(id, &key).await,
            HistoryId::Local(_) => None,
        };

        let remote = match id {
            HistoryId::Remote(remote_id) => match self.remote.delete(remote_id).await {
                Ok(()) => RemoteDelete::Deleted,
                Err(err) => {
                    tracing::warn!(
                        calculator_type = %calculator_type,
                        remote_id = %remote_id,
                        error = %err,
                        "Remote delete failed"
                    );
                    RemoteDelete::Failed {
                        code: err.code().to_string(),
                        reason: err.to_string(),
                    }
                }
            },
            HistoryId::Local(_) => RemoteDelete::NotApplicable,
        };

        let local_removed = self
            .local
            .remove_one(calculator_type, |records| {
                records.iter().position(|r| r.matches(id)).or_else(|| {
                    let fp = target.as_deref()?;
                    records.iter().rposition(|r| {
                        r.remote_id.is_none()
                            && fingerprint(&r.record).ok().as_deref() == Some(fp)
                    })
                })
            })
            .map(|removed| usize::from(removed.is_some()))
            .map_err(|err| {
                tracing::error!(calculator_type = %calculator_type, error = %err, "Local delete failed");
                err.to_string()
            });

        self.cache.invalidate(&key).await;

        DeleteOutcome {
            remote,
            local_removed,
        }
    }

    /// Fingerprint of the entry being deleted, from the last listing
    async fn listed_content(&self, id: &HistoryId, key: &CacheKey) -> Option<String> {
        let entries = self.cache.peek(key).await?;
        entries
            .iter()
            .find(|e| &e.id == id)
            .and_then(|entry| fingerprint(&entry.record).ok())
    }

    /// Most recent entries first, at most the window cap
    pub async fn list(&self, calculator_type: CalculatorType) -> HistoryListing {
        let key = self.key(calculator_type);
        if let Some(entries) = self.cache.get(&key).await {
            return HistoryListing {
                entries,
                source: ListingSource::Cache,
            };
        }

        let generation = self.cache.generation(&key).await;
        match self.remote.list(calculator_type).await {
            Ok(remote_entries) => {
                let local = self.local.load(calculator_type).unwrap_or_else(|err| {
                    tracing::error!(calculator_type = %calculator_type, error = %err, "Local history unreadable");
                    Vec::new()
                });
                let entries = self.finish(reconcile(remote_entries, &local));
                self.cache.put(key, entries.clone(), generation).await;
                HistoryListing {
                    entries,
                    source: ListingSource::Remote,
                }
            }
            Err(err) => self.local_fallback(calculator_type, err),
        }
    }

    fn local_fallback(&self, calculator_type: CalculatorType, err: AppError) -> HistoryListing {
        tracing::warn!(
            calculator_type = %calculator_type,
            error = %err,
            "Remote history unavailable, reading local history"
        );
        match self.local.load(calculator_type) {
            Ok(records) => HistoryListing {
                entries: self.finish(records.iter().map(LocalRecord::to_entry).collect()),
                source: ListingSource::LocalFallback,
            },
            Err(err) => {
                tracing::error!(calculator_type = %calculator_type, error = %err, "Local history unreadable");
                HistoryListing {
                    entries: Vec::new(),
                    source: ListingSource::Unavailable,
                }
            }
        }
    }

    fn finish(&self, mut entries: Vec<HistoryEntry>) -> Vec<HistoryEntry> {
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        entries.truncate(self.cap());
        entries
    }
}

/// Remote entries plus local records that never reached the remote
///
/// A local record with a remote id is either in the remote listing already or
/// was deleted there, so it is never shown twice. Unsynced local records are
/// dropped when a remote entry has the same content.
fn reconcile(remote: Vec<HistoryEntry>, local: &[LocalRecord]) -> Vec<HistoryEntry> {
    let remote_content: HashSet<String> = remote
        .iter()
        .filter_map(|entry| fingerprint(&entry.record).ok())
        .collect();

    let pending = local.iter().filter(|record| {
        record.remote_id.is_none()
            && fingerprint(&record.record)
                .map(|fp| !remote_content.contains(&fp))
                .unwrap_or(true)
    });

    remote
        .into_iter()
        .chain(pending.map(LocalRecord::to_entry))
        .collect()
}
