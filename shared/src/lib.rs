//! Shared domain crate for the farm calculators
//!
//! Pure computation with no I/O: unit conversions, reference tables, the
//! three calculation strategies, input validation, the wizard state machine
//! and history summaries. Used by the client crate and, through WASM, by the
//! browser frontend.

pub mod calculators;
pub mod models;
pub mod reference;
pub mod summary;
pub mod types;
pub mod units;
pub mod validation;
pub mod wizard;

pub use models::*;
pub use types::*;
pub use validation::*;
