//! Business logic services for the farm calculators

pub mod cache;
pub mod calculator;
pub mod fingerprint;
pub mod history;
pub mod local_store;

pub use cache::{CacheKey, HistoryCache};
pub use calculator::{CalculationOutcome, CalculatorService};
pub use history::{
    DeleteOutcome, HistoryListing, HistoryService, ListingSource, LocalWrite, RemoteDelete,
    RemoteWrite, SaveOutcome, SaveStatus,
};
pub use local_store::{FileStore, LocalHistory, LocalRecord, LocalStore, MemoryStore};
